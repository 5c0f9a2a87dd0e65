use crate::egui::Context; // b/c of re-export
use tokio::sync::mpsc::{Sender, Receiver};
use tokio::sync::mpsc::error::TrySendError;
use tokio;
use log;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{HomeError, SpeechError};
use crate::interface::*;

pub mod connection;
pub mod dispatcher;
pub mod remote;
pub mod speech;

use connection::{ConnectionManager, ProbeOutcome};
use dispatcher::{classify, Intent};
use remote::{DeviceApi, HttpDeviceApi};
use speech::{select_recognizer, Recognizer, SimulatedRecognizer};

const SIMULATION_DELAY : Duration = Duration::from_secs(1);

pub type Notify = Box<dyn Fn(&HomeState) + Send>;

#[tokio::main]
pub async fn worker_thread(sender : Sender<HomeState>, receiver : Receiver<HomeCommand>, ctx : Context, cfg : HomeControlConfig) {
  let result = worker_thread_prime(sender, receiver, ctx, cfg).await;
  if let Err ( e ) = result {
    log::error!("Error in worker_thread : {}. exiting....", e);
  }
}

pub async fn worker_thread_prime(sender : Sender<HomeState>, receiver : Receiver<HomeCommand>, ctx : Context, cfg : HomeControlConfig) -> Result<(), HomeError> {

  let api = HttpDeviceApi::new(Duration::from_secs(cfg.request_timeout_secs))?;
  let recognizer = select_recognizer(&cfg.recognizer, SIMULATION_DELAY);

  let notify : Notify = Box::new(move |state : &HomeState| {
    match sender.try_send(state.clone()) {
      Ok(()) => ctx.request_repaint(),
      Err( TrySendError::Full( _ ) ) => log::warn!("Failed to send data, GUI is not consuming it!"),
      Err( TrySendError::Closed( _ ) ) => log::warn!("Failed to send data - channel is closed. Probably GUI is dead."),
    }
  });

  let mut controller = Controller::new(Arc::new(api), recognizer, SimulatedRecognizer::new(SIMULATION_DELAY), notify);
  if !cfg.last_address.is_empty() {
    controller.debug(format!("Loaded saved IP: {}", cfg.last_address));
  }
  controller.publish();

  execute_command_loop(receiver, controller).await;
  Ok(())
}

async fn execute_command_loop(
  mut receiver : Receiver<HomeCommand>,
  mut controller : Controller,
  )
{
  loop {
      match receiver.recv().await {
      Some( cmd ) => controller.execute( cmd ).await,
      None => {
        log::warn!("Failed to receiver data, probably GUI is dead. Exiting...");
        break;
      },
     };
  }
}

pub struct Controller {
  api : Arc<dyn DeviceApi>,
  connection : ConnectionManager,
  recognizer : Box<dyn Recognizer>,
  simulator : SimulatedRecognizer,
  state : HomeState,
  notify : Notify,
}

impl Controller {
  pub fn new(api : Arc<dyn DeviceApi>, recognizer : Box<dyn Recognizer>, simulator : SimulatedRecognizer, notify : Notify) -> Self {
    Controller {
      api,
      connection : ConnectionManager::default(),
      recognizer,
      simulator,
      state : HomeState::default(),
      notify,
    }
  }

  pub fn state(&self) -> &HomeState {
    &self.state
  }

  pub fn is_connected(&self) -> bool {
    self.connection.is_connected()
  }

  pub fn debug(&mut self, message : impl Into<String>) {
    self.state.debug_log.push(message);
  }

  pub fn publish(&self) {
    (self.notify)(self.state());
  }

  pub async fn execute(&mut self, cmd : HomeCommand) {
    log::debug!("Got CMD: {:?}", cmd);
    match cmd {
      HomeCommand::Connect( address ) => self.connect(&address).await,
      HomeCommand::GetStatus => self.get_status().await,
      HomeCommand::Control( target, action ) => {
        if self.require_connection("Not connected to the device") {
          self.send_control(target, action).await;
        }
      },
      HomeCommand::Phrase( phrase ) => {
        let phrase = phrase.trim().to_string();
        if phrase.is_empty() {
          return;
        }
        if self.require_connection("Not connected to the device") {
          self.debug(format!("Sending custom command: {}", phrase));
          self.process_phrase(&phrase).await;
        }
      },
      HomeCommand::Listen => self.listen().await,
    };
    self.publish();
  }

  pub async fn connect(&mut self, address : &str) {
    let base = match self.connection.set_address(address) {
      Ok( base ) => base.to_string(),
      Err( e ) => {
        self.debug(format!("Connect rejected: {}", e));
        self.set_connection("Please enter the device IP address", StatusKind::Error);
        return;
      },
    };

    self.debug(format!("Trying to connect to: {}", base));
    self.set_connection("Connecting...", StatusKind::Error);
    self.publish();

    let outcome = self.connection.probe(self.api.as_ref(), &mut self.state.debug_log).await;
    match outcome {
      ProbeOutcome::Connected => {
        self.set_connection("Connected to device!", StatusKind::Connected);
        self.refresh_status().await;
      },
      ProbeOutcome::Fallback => self.set_connection("Connected (fallback mode)", StatusKind::Connected),
      ProbeOutcome::Failed => self.set_connection("Connection failed - Check IP/Network", StatusKind::Error),
    }
  }

  pub async fn get_status(&mut self) {
    if self.require_connection("Not connected to the device") {
      self.refresh_status().await;
    }
  }

  pub async fn process_phrase(&mut self, phrase : &str) {
    match classify(phrase) {
      Intent::Control( target, action ) => self.send_control(target, action).await,
      Intent::Status => self.get_status().await,
      Intent::Voice( command ) => self.send_voice(&command).await,
    }
  }

  pub async fn listen(&mut self) {
    if !self.require_connection("Please connect to the device first!") {
      return;
    }

    self.state.listening = true;
    self.state.voice_message = String::from("Listening... Speak your command now!");
    self.publish();

    let heard = if self.recognizer.is_supported() {
      self.recognizer.listen().await
    } else {
      Err( SpeechError::Unsupported )
    };
    self.state.listening = false;

    match heard {
      Ok( transcript ) => {
        self.state.voice_message = format!("Heard: \"{}\"", transcript);
        self.debug(format!("Voice command: {}", transcript));
        self.process_phrase(&transcript).await;
      },
      Err( SpeechError::Unsupported ) => {
        self.state.voice_message = String::from("Speech recognition not supported. Using simulated mode.");
        self.simulate().await;
      },
      Err( e ) => {
        self.state.voice_message = format!("Error: {}", e);
        self.debug(format!("Speech recognition error: {}", e));
        self.simulate().await;
      },
    }
  }

  async fn simulate(&mut self) {
    self.publish();
    match self.simulator.listen().await {
      Ok( command ) => {
        self.state.voice_message = format!("Simulated command: \"{}\"", command);
        self.debug(format!("Simulated command: {}", command));
        self.process_phrase(&command).await;
      },
      Err( e ) => self.debug(format!("Simulation failed: {}", e)),
    }
  }

  async fn send_control(&mut self, target : Target, action : Action) {
    self.debug(format!("Sending control: device={}, action={}", target.as_str(), action.as_str()));
    let result = self.api.control(self.connection.base_address(), target, action).await;
    self.handle_reply("Control", result).await;
  }

  async fn send_voice(&mut self, command : &str) {
    self.debug(format!("Sending voice command: {}", command));
    let result = self.api.voice(self.connection.base_address(), command).await;
    self.handle_reply("Voice", result).await;
  }

  async fn handle_reply(&mut self, kind : &str, result : Result<Reply, HomeError>) {
    match result {
      Ok( reply ) => {
        self.state.voice_message = format!("Response: {}", reply.message);
        self.debug(format!("{} response: {}", kind, reply.message));
        if self.is_connected() {
          self.refresh_status().await;
        }
      },
      Err( e ) => {
        log::warn!("{} command failed: {}", kind, e);
        self.state.voice_message = String::from("Error sending command");
        self.debug(format!("{} command error: {}", kind, e));
      },
    }
  }

  async fn refresh_status(&mut self) {
    self.debug("Fetching device status...");
    match self.api.status(self.connection.base_address()).await {
      Ok( status ) => {
        self.state.devices = Some( status );
        self.state.voice_message = String::from("Status updated successfully");
        self.debug("Status updated successfully");
      },
      Err( e ) => {
        log::warn!("Status request failed: {}", e);
        self.state.voice_message = String::from("Error getting status");
        self.debug(format!("Status error: {}", e));
      },
    }
  }

  fn require_connection(&mut self, message : &str) -> bool {
    if self.connection.is_connected() {
      return true;
    }
    self.state.voice_message = message.to_string();
    self.debug(format!("Rejected: {}", HomeError::NotConnected));
    false
  }

  fn set_connection(&mut self, message : &str, kind : StatusKind) {
    self.state.connection_message = message.to_string();
    self.state.connection_kind = kind;
  }
}
