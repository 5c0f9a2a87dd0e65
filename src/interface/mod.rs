use serde::{Serialize, Deserialize};
use std::collections::VecDeque;
use std::option::Option;
use chrono::Local;

use crate::error::HomeError;

pub const APP_NAME : &str = "voice-home-control";
const MAX_DEBUG_LINES : usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
  KitchenLight,
  HallLight,
  HallFan,
  ReadingLight,
}

impl Device {
  pub const ALL : [Device; 4] = [Device::KitchenLight, Device::HallLight, Device::HallFan, Device::ReadingLight];

  pub fn as_str(&self) -> &'static str {
    match self {
      Device::KitchenLight => "kitchen_light",
      Device::HallLight => "hall_light",
      Device::HallFan => "hall_fan",
      Device::ReadingLight => "reading_light",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Device::KitchenLight => "Kitchen Light",
      Device::HallLight => "Hall Light",
      Device::HallFan => "Hall Fan",
      Device::ReadingLight => "Reading Light",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
  All,
  Device(Device),
}

impl Target {
  pub fn as_str(&self) -> &'static str {
    match self {
      Target::All => "all",
      Target::Device( d ) => d.as_str(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  On,
  Off,
  Toggle,
}

impl Action {
  pub fn as_str(&self) -> &'static str {
    match self {
      Action::On => "on",
      Action::Off => "off",
      Action::Toggle => "toggle",
    }
  }
}

// fields missing from /status read as off
#[derive(Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct DeviceStatus {
  pub kitchen_light : bool,
  pub hall_light : bool,
  pub hall_fan : bool,
  pub reading_light : bool,
}

impl DeviceStatus {
  pub fn is_on(&self, device : Device) -> bool {
    match device {
      Device::KitchenLight => self.kitchen_light,
      Device::HallLight => self.hall_light,
      Device::HallFan => self.hall_fan,
      Device::ReadingLight => self.reading_light,
    }
  }
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Reply {
  #[serde(default)]
  pub message : String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
  Connected,
  Disconnected,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEntry {
  pub time : String,
  pub message : String,
}

#[derive(Default, Debug, Clone)]
pub struct DebugLog {
  entries : VecDeque<DebugEntry>,
}

impl DebugLog {
  pub fn push(&mut self, message : impl Into<String>) {
    let message = message.into();
    log::debug!("{}", message);

    self.entries.push_front( DebugEntry {
      time : Local::now().format("%H:%M:%S").to_string(),
      message,
    });
    self.entries.truncate(MAX_DEBUG_LINES);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn get(&self, index : usize) -> Option<&DebugEntry> {
    self.entries.get(index)
  }
}

#[derive(Debug, Clone)]
pub struct HomeState {
  pub connection_message : String,
  pub connection_kind : StatusKind,
  pub voice_message : String,
  pub listening : bool,
  pub devices : Option<DeviceStatus>,
  pub debug_log : DebugLog,
}

impl Default for HomeState {
  fn default() -> Self {
    HomeState {
      connection_message : String::from("Not connected"),
      connection_kind : StatusKind::Disconnected,
      voice_message : String::from("Press \"Speak a command\" or type one below"),
      listening : false,
      devices : None,
      debug_log : DebugLog::default(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeCommand {
  Connect(String),
  GetStatus,
  Control(Target, Action),
  Phrase(String),
  Listen,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HomeControlConfig {
  pub last_address : String,
  pub recognizer : RecognizerConfig,
  pub request_timeout_secs : u64,
}

impl Default for HomeControlConfig {
  fn default() -> Self {
    HomeControlConfig {
      last_address : String::new(),
      recognizer : RecognizerConfig::default(),
      request_timeout_secs : 5,
    }
  }
}

// empty program means no speech recognition
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct RecognizerConfig {
  pub program : String,
  pub args : Vec<String>,
}

impl HomeControlConfig {
  pub fn load() -> Self {
    match confy::load::<HomeControlConfig>(APP_NAME, None) {
      Ok( cfg ) => cfg,
      Err( e ) => {
        log::error!("Failed to load configuration: {}. Using defaults.", e);
        HomeControlConfig::default()
      },
    }
  }

  pub fn store(&self) -> Result<(), HomeError> {
    confy::store(APP_NAME, None, self)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn status_with_missing_fields_reads_as_off() {
    let status : DeviceStatus = serde_json::from_str(r#"{"kitchen_light":true}"#).unwrap();
    assert_eq!(status, DeviceStatus { kitchen_light : true, ..DeviceStatus::default() });
    assert!(!status.is_on(Device::HallFan));
  }

  #[test]
  fn wire_names_match_device_api() {
    let names : Vec<&str> = Device::ALL.iter().map(|d| d.as_str()).collect();
    assert_eq!(names, vec!["kitchen_light", "hall_light", "hall_fan", "reading_light"]);
    assert_eq!(Target::All.as_str(), "all");
    assert_eq!(Target::Device(Device::HallFan).as_str(), "hall_fan");
    assert_eq!(Action::Toggle.as_str(), "toggle");
  }

  #[test]
  fn default_state_is_disconnected_with_prompt() {
    let state = HomeState::default();
    assert_eq!(state.voice_message, "Press \"Speak a command\" or type one below");
    assert_eq!(state.connection_kind, StatusKind::Disconnected);
    assert_eq!(state.devices, None);
  }

  #[test]
  fn debug_log_keeps_newest_first_and_is_bounded() {
    let mut debug_log = DebugLog::default();
    for i in 0..(MAX_DEBUG_LINES + 5) {
      debug_log.push(format!("line {}", i));
    }
    assert_eq!(debug_log.len(), MAX_DEBUG_LINES);
    assert_eq!(debug_log.get(0).map(|e| e.message.as_str()), Some("line 104"));
    assert_eq!(debug_log.get(MAX_DEBUG_LINES - 1).map(|e| e.message.as_str()), Some("line 5"));
  }
}
