use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomeError {
  #[error("empty device address")]
  EmptyAddress,

  #[error("not connected to the device")]
  NotConnected,

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("HTTP error! status: {0}")]
  Status(u16),

  #[error("malformed response body: {0}")]
  Body(#[from] serde_json::Error),

  #[error("configuration error: {0}")]
  Config(#[from] confy::ConfyError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
  #[error("speech recognition is not supported")]
  Unsupported,

  #[error("{0}")]
  Recognition(String),
}
