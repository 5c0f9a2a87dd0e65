use crate::error::HomeError;
use crate::interface::DebugLog;
use crate::worker::remote::DeviceApi;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Session {
  base_address : String,
  is_connected : bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
  Connected,
  Fallback,
  Failed,
}

#[derive(Default)]
pub struct ConnectionManager {
  session : Session,
}

impl ConnectionManager {
  pub fn is_connected(&self) -> bool {
    self.session.is_connected
  }

  pub fn base_address(&self) -> &str {
    &self.session.base_address
  }

  pub fn set_address(&mut self, address : &str) -> Result<&str, HomeError> {
    let address = address.trim();
    if address.is_empty() {
      return Err( HomeError::EmptyAddress );
    }
    self.session.base_address = base_url(address);
    Ok( &self.session.base_address )
  }

  pub async fn probe(&mut self, api : &dyn DeviceApi, debug_log : &mut DebugLog) -> ProbeOutcome {
    if self.session.base_address.is_empty() {
      debug_log.push("Probe skipped: no address set");
      return ProbeOutcome::Failed;
    }

    debug_log.push("Testing connection to /test endpoint...");
    let error = match api.test(&self.session.base_address).await {
      Ok( reply ) => {
        self.session.is_connected = true;
        debug_log.push(format!("Connection successful: {}", reply.message));
        return ProbeOutcome::Connected;
      },
      Err( e ) => e,
    };

    self.session.is_connected = false;
    debug_log.push(format!("Connection failed: {}", error));
    debug_log.push("Trying fallback connection...");

    match api.test_plain(&self.session.base_address).await {
      Ok( body ) => {
        debug_log.push(format!("Fallback successful: {}", body));
        self.session.is_connected = true;
        ProbeOutcome::Fallback
      },
      Err( e ) => {
        debug_log.push(format!("Fallback also failed: {}", e));
        ProbeOutcome::Failed
      },
    }
  }
}

fn base_url(address : &str) -> String {
  let url = if address.starts_with("http://") || address.starts_with("https://") {
    address.to_string()
  } else {
    format!("http://{}", address)
  };
  url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn base_url_adds_scheme_once() {
    assert_eq!(base_url("192.168.1.50"), "http://192.168.1.50");
    assert_eq!(base_url("http://esp32.local/"), "http://esp32.local");
    assert_eq!(base_url("https://10.0.0.2:8443"), "https://10.0.0.2:8443");
  }

  #[test]
  fn empty_address_is_rejected_and_keeps_session() {
    let mut manager = ConnectionManager::default();
    assert!(matches!(manager.set_address("   "), Err( HomeError::EmptyAddress )));
    assert_eq!(manager.base_address(), "");
    assert!(!manager.is_connected());
  }

  #[test]
  fn address_is_trimmed_before_storing() {
    let mut manager = ConnectionManager::default();
    assert_eq!(manager.set_address("  192.168.1.50 ").unwrap(), "http://192.168.1.50");
    assert_eq!(manager.base_address(), "http://192.168.1.50");
    assert!(!manager.is_connected());
  }
}
