use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::HomeError;
use crate::interface::{Action, DeviceStatus, Reply, Target};

#[async_trait]
pub trait DeviceApi : Send + Sync {
  async fn test(&self, base : &str) -> Result<Reply, HomeError>;

  // body is taken as plain text whatever the status
  async fn test_plain(&self, base : &str) -> Result<String, HomeError>;

  async fn status(&self, base : &str) -> Result<DeviceStatus, HomeError>;

  async fn control(&self, base : &str, target : Target, action : Action) -> Result<Reply, HomeError>;

  async fn voice(&self, base : &str, command : &str) -> Result<Reply, HomeError>;
}

pub struct HttpDeviceApi {
  client : reqwest::Client,
}

impl HttpDeviceApi {
  pub fn new(timeout : Duration) -> Result<Self, HomeError> {
    let client = reqwest::Client::builder()
      .timeout(timeout)
      .build()?;
    Ok( HttpDeviceApi { client } )
  }
}

#[async_trait]
impl DeviceApi for HttpDeviceApi {
  async fn test(&self, base : &str) -> Result<Reply, HomeError> {
    let response = self.client
      .get(format!("{}/test", base))
      .header(CONTENT_TYPE, "application/json")
      .send()
      .await?;
    parse_json(response).await
  }

  async fn test_plain(&self, base : &str) -> Result<String, HomeError> {
    let response = self.client.get(format!("{}/test", base)).send().await?;
    Ok( response.text().await? )
  }

  async fn status(&self, base : &str) -> Result<DeviceStatus, HomeError> {
    let response = self.client.get(format!("{}/status", base)).send().await?;
    parse_json(response).await
  }

  async fn control(&self, base : &str, target : Target, action : Action) -> Result<Reply, HomeError> {
    let response = self.client
      .get(format!("{}/control", base))
      .query(&[("device", target.as_str()), ("action", action.as_str())])
      .send()
      .await?;
    parse_json(response).await
  }

  async fn voice(&self, base : &str, command : &str) -> Result<Reply, HomeError> {
    let response = self.client
      .get(format!("{}/voice", base))
      .query(&[("command", command)])
      .send()
      .await?;
    parse_json(response).await
  }
}

async fn parse_json<T : DeserializeOwned>(response : Response) -> Result<T, HomeError> {
  let status = response.status();
  log::debug!("Response status: {} from {}", status, response.url());
  if !status.is_success() {
    return Err( HomeError::Status(status.as_u16()) );
  }

  let body = response.text().await?;
  Ok( serde_json::from_str(&body)? )
}
