use crate::interface::{Action, Device, Target};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
  Control(Target, Action),
  Status,
  Voice(String),
}

const DEVICE_PHRASES : [(&str, Device); 4] = [
  ("kitchen light", Device::KitchenLight),
  ("hall light", Device::HallLight),
  ("hall fan", Device::HallFan),
  ("reading light", Device::ReadingLight),
];

// first match wins
pub fn classify(phrase : &str) -> Intent {
  let lower = phrase.to_lowercase();

  for (pattern, device) in DEVICE_PHRASES {
    if lower.contains(pattern) {
      return Intent::Control(Target::Device(device), on_or_off(&lower));
    }
  }

  if lower.contains("all on") {
    return Intent::Control(Target::All, Action::On);
  }
  if lower.contains("all off") {
    return Intent::Control(Target::All, Action::Off);
  }
  if lower.contains("status") {
    return Intent::Status;
  }

  Intent::Voice(phrase.to_string())
}

// Plain substring test, so "on" inside any other word also counts.
fn on_or_off(lower : &str) -> Action {
  if lower.contains("turn on") || lower.contains("on") {
    Action::On
  } else {
    Action::Off
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn device_phrases() {
    assert_eq!(classify("turn off kitchen light"), Intent::Control(Target::Device(Device::KitchenLight), Action::Off));
    assert_eq!(classify("turn on hall light"), Intent::Control(Target::Device(Device::HallLight), Action::On));
    assert_eq!(classify("hall fan on please"), Intent::Control(Target::Device(Device::HallFan), Action::On));
    assert_eq!(classify("turn off reading light"), Intent::Control(Target::Device(Device::ReadingLight), Action::Off));
  }

  #[test]
  fn all_and_status() {
    assert_eq!(classify("all on"), Intent::Control(Target::All, Action::On));
    assert_eq!(classify("all off"), Intent::Control(Target::All, Action::Off));
    assert_eq!(classify("what is the status"), Intent::Status);
  }

  #[test]
  fn unknown_phrase_is_forwarded_verbatim() {
    assert_eq!(classify("what's the weather"), Intent::Voice(String::from("what's the weather")));
    assert_eq!(classify("Play Some Music"), Intent::Voice(String::from("Play Some Music")));
  }

  #[test]
  fn matching_ignores_case() {
    assert_eq!(classify("Turn ON Kitchen Light"), Intent::Control(Target::Device(Device::KitchenLight), Action::On));
  }

  #[test]
  fn order_decides_between_overlapping_rules() {
    // device rules come before "all on" and "status"
    assert_eq!(classify("kitchen light status"), Intent::Control(Target::Device(Device::KitchenLight), Action::Off));
    assert_eq!(classify("all on except hall fan"), Intent::Control(Target::Device(Device::HallFan), Action::On));
  }

  #[test]
  fn on_inside_another_word_reads_as_on() {
    assert_eq!(classify("switch off kitchen light once"), Intent::Control(Target::Device(Device::KitchenLight), Action::On));
  }
}
