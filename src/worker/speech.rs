use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::time::Duration;
use tokio::process::Command;

use crate::error::SpeechError;
use crate::interface::RecognizerConfig;

pub const SIMULATED_COMMANDS : [&str; 11] = [
  "turn on kitchen light", "turn off kitchen light",
  "turn on hall light", "turn off hall light",
  "turn on hall fan", "turn off hall fan",
  "turn on reading light", "turn off reading light",
  "all on", "all off", "status",
];

#[async_trait]
pub trait Recognizer : Send + Sync {
  fn is_supported(&self) -> bool;

  async fn listen(&self) -> Result<String, SpeechError>;
}

pub struct CommandRecognizer {
  program : String,
  args : Vec<String>,
}

impl CommandRecognizer {
  pub fn new(program : &str, args : &[String]) -> Self {
    CommandRecognizer { program : program.to_string(), args : args.to_vec() }
  }
}

#[async_trait]
impl Recognizer for CommandRecognizer {
  fn is_supported(&self) -> bool {
    true
  }

  async fn listen(&self) -> Result<String, SpeechError> {
    log::debug!("Running recognizer {} {:?}", self.program, self.args);
    let output = Command::new(&self.program)
      .args(&self.args)
      .output()
      .await
      .map_err(|e| SpeechError::Recognition(format!("failed to start {}: {}", self.program, e)))?;

    if !output.status.success() {
      return Err( SpeechError::Recognition(format!("{} exited with {}", self.program, output.status)) );
    }

    let transcript = String::from_utf8_lossy(&output.stdout).trim().to_lowercase();
    if transcript.is_empty() {
      return Err( SpeechError::Recognition(String::from("no-speech")) );
    }
    Ok( transcript )
  }
}

pub struct SimulatedRecognizer {
  delay : Duration,
}

impl SimulatedRecognizer {
  pub fn new(delay : Duration) -> Self {
    SimulatedRecognizer { delay }
  }
}

#[async_trait]
impl Recognizer for SimulatedRecognizer {
  fn is_supported(&self) -> bool {
    false
  }

  async fn listen(&self) -> Result<String, SpeechError> {
    if !self.delay.is_zero() {
      tokio::time::sleep(self.delay).await;
    }
    let command = SIMULATED_COMMANDS
      .choose(&mut rand::thread_rng())
      .copied()
      .unwrap_or("status");
    Ok( command.to_string() )
  }
}

pub fn select_recognizer(cfg : &RecognizerConfig, simulation_delay : Duration) -> Box<dyn Recognizer> {
  if cfg.program.trim().is_empty() {
    log::info!("No speech recognizer configured, commands will be simulated");
    Box::new(SimulatedRecognizer::new(simulation_delay))
  } else {
    log::info!("Using speech recognizer {}", cfg.program);
    Box::new(CommandRecognizer::new(cfg.program.trim(), &cfg.args))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[tokio::test]
  async fn simulated_commands_come_from_the_fixed_list() {
    let recognizer = SimulatedRecognizer::new(Duration::ZERO);
    assert!(!recognizer.is_supported());
    for _ in 0..20 {
      let command = recognizer.listen().await.unwrap();
      assert!(SIMULATED_COMMANDS.contains(&command.as_str()), "unexpected {}", command);
    }
  }

  #[test]
  fn selection_depends_on_configured_program() {
    let unset = RecognizerConfig::default();
    assert!(!select_recognizer(&unset, Duration::ZERO).is_supported());

    let set = RecognizerConfig { program : String::from("whisper-listen"), args : vec![] };
    assert!(select_recognizer(&set, Duration::ZERO).is_supported());
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn command_output_becomes_lowercase_transcript() {
    let recognizer = CommandRecognizer::new("echo", &[String::from("Turn On Kitchen Light")]);
    assert_eq!(recognizer.listen().await.unwrap(), "turn on kitchen light");
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failing_command_is_a_recognition_error() {
    let recognizer = CommandRecognizer::new("false", &[]);
    assert!(matches!(recognizer.listen().await, Err( SpeechError::Recognition(_) )));
  }

  #[tokio::test]
  async fn missing_program_is_a_recognition_error() {
    let recognizer = CommandRecognizer::new("definitely-not-a-real-recognizer", &[]);
    assert!(matches!(recognizer.listen().await, Err( SpeechError::Recognition(_) )));
  }
}
