use eframe::egui;
use crate::egui::*;
use tokio::sync::mpsc::{channel, Sender, Receiver};
use tokio::sync::mpsc::error::TryRecvError;
use std::thread;
use log;
use egui_extras::{TableBuilder, Column};

use crate::interface::*;
use crate::worker::worker_thread;

mod view;
use view::{device_views, DeviceView};

pub struct HomeDashboard {
  state : HomeState,
  cfg : HomeControlConfig,
  address : String,
  custom_command : String,
  receiver : Receiver<HomeState>,
  sender : Sender<HomeCommand>,
}

impl HomeDashboard {
  pub fn new(cc : &eframe::CreationContext<'_>, cfg : HomeControlConfig) -> Self {

    const MAX_NUM_MESSAGES : usize = 10;

    let (worker_sender, gui_receiver) = channel::<HomeState>(MAX_NUM_MESSAGES);
    let (gui_sender, worker_receiver) = channel::<HomeCommand>(MAX_NUM_MESSAGES);

    let ctx = cc.egui_ctx.clone();

    let mut style = (*ctx.style()).clone();
    style.visuals.selection.bg_fill = Color32::DARK_GREEN;
    ctx.set_style(style);

    // it detaches but we are control it via channels
    let worker_cfg = cfg.clone();
    thread::spawn(move|| worker_thread(worker_sender, worker_receiver, ctx, worker_cfg));

    HomeDashboard {
     state : HomeState::default(),
     address : cfg.last_address.clone(),
     cfg,
     custom_command : String::new(),
     receiver : gui_receiver,
     sender : gui_sender,
   }
  }

  fn send_command(&self, cmd : HomeCommand) {
    if let Err( err ) = self.sender.try_send( cmd ) {
      log::error!("Failed to send {:?} command. Ignoring.", err);
    }
  }

  fn connect(&mut self) {
    let address = self.address.trim().to_string();
    if !address.is_empty() && address != self.cfg.last_address {
      self.cfg.last_address = address.clone();
      if let Err( e ) = self.cfg.store() {
        log::error!("Failed to save address {} : {}", address, e);
      }
    }
    self.send_command( HomeCommand::Connect(address) );
  }

  fn send_custom_command(&mut self) {
    let command = self.custom_command.trim().to_string();
    if !command.is_empty() {
      self.send_command( HomeCommand::Phrase(command) );
      self.custom_command.clear();
    }
  }

  fn connection_panel(&mut self, ui : &mut Ui) {
    ui.horizontal(|ui| {
      ui.label(RichText::new("Device IP").heading());
      let response = ui.add( TextEdit::singleline(&mut self.address).hint_text("192.168.1.50") );
      let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
      if ui.button("Connect").clicked() || submitted {
        self.connect();
      }
    });

    let color = match self.state.connection_kind {
      StatusKind::Connected => Color32::GREEN,
      StatusKind::Disconnected => Color32::GRAY,
      StatusKind::Error => Color32::from_rgb(255, 165, 0),
    };
    ui.label( RichText::new(&self.state.connection_message).color(color) );
  }

  fn voice_panel(&self, ui : &mut Ui) {
    ui.vertical_centered(|ui| {
      let text = if self.state.listening { "Listening..." } else { "Speak a command" };
      let button = Button::new( RichText::new(text).heading() );
      if ui.add_enabled(!self.state.listening, button).clicked() {
        self.send_command( HomeCommand::Listen );
      }
      ui.label( RichText::new(&self.state.voice_message).size(18.0) );
    });
  }

  fn device_group(&self, ui : &mut Ui, view : &DeviceView) {
    let state_text = if view.highlighted {
          RichText::new(view.state_text).heading().color(Color32::GREEN)
        } else {
          RichText::new(view.state_text).heading()
    };

    ui.group(|ui| {
      ui.vertical_centered(|ui| {
        ui.heading(view.label);
        ui.label( state_text );
        // the switch mirrors the last status, clicking only asks the device to toggle
        let mut on = view.highlighted;
        if switch_button(ui, &mut on).clicked() {
          self.send_command( HomeCommand::Control(Target::Device(view.device), Action::Toggle) );
        }
      });
    });
  }

  fn devices_grid(&self, ui : &mut Ui) {
    let views = device_views(self.state.devices.as_ref());
    Grid::new("Devices Grid")
      .num_columns(views.len())
      .spacing([20.0, 20.0])
      .show(ui, |ui| {
        for view in &views {
          self.device_group(ui, view);
        }
        ui.end_row();
      });
  }

  fn controls_panel(&mut self, ui : &mut Ui) {
    ui.horizontal(|ui| {
      if ui.button("All On").clicked() {
        self.send_command( HomeCommand::Control(Target::All, Action::On) );
      }
      if ui.button("All Off").clicked() {
        self.send_command( HomeCommand::Control(Target::All, Action::Off) );
      }
      if ui.button("Refresh Status").clicked() {
        self.send_command( HomeCommand::GetStatus );
      }
    });

    ui.horizontal(|ui| {
      let response = ui.add( TextEdit::singleline(&mut self.custom_command).hint_text("e.g. turn on hall fan") );
      let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
      if ui.button("Send").clicked() || submitted {
        self.send_custom_command();
      }
    });
  }

  fn debug_table(&self, ui : &mut Ui) {
    let debug_log = &self.state.debug_log;

    ui.push_id("Debug Log Table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::exact(70.0))
            .column(Column::remainder())
            .body(|body| {
                body.rows(18.0, debug_log.len(), |row_index, mut row| {
                    if let Some( entry ) = debug_log.get(row_index) {
                        row.col(|ui| {
                            ui.monospace( entry.time.as_str() );
                        });
                        row.col(|ui| {
                            ui.label( entry.message.as_str() );
                        });
                    };
                });
            });
      });
  }
}

impl eframe::App for HomeDashboard {
  fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {

    //only last message from channel is actual
    let mut new_state : Option<HomeState> = None;
    loop {
      match self.receiver.try_recv() {
        Ok( state ) => {
            new_state = Some( state );
         },
        Err( TryRecvError::Disconnected ) => {
          log::error!("Worker thread is dead. Closing...");
          frame.close();
          break;
        },
        _ => break,
      }
    }

    if let Some( new_state ) = new_state {
      self.state = new_state;
    }

    egui::TopBottomPanel::top("Connection Panel").show(ctx, |ui| {
      self.connection_panel(ui);
    });

    egui::TopBottomPanel::bottom("Debug Panel")
      .resizable(true)
      .default_height(160.0)
      .show(ctx, |ui| {
        ui.heading("Debug Log");
        self.debug_table(ui);
      });

    egui::CentralPanel::default().show(ctx, |ui| {
      self.voice_panel(ui);
      ui.separator();
      self.devices_grid(ui);
      ui.separator();
      self.controls_panel(ui);
    });

    if ctx.input( |i| i.modifiers.command && i.key_pressed(Key::Q) ) {
      frame.close();
    }
  }

}

fn switch_button(ui: &mut egui::Ui, on: &mut bool) -> egui::Response {
    let desired_size = ui.spacing().interact_size.y * egui::vec2(2.5, 1.0);
    let (rect, mut response) = ui.allocate_exact_size(desired_size, egui::Sense::click());
    if response.clicked() {
        *on = !*on;
        response.mark_changed();
    }
    response.widget_info(|| egui::WidgetInfo::selected(egui::WidgetType::Checkbox, *on, ""));

    if ui.is_rect_visible(rect) {
        let how_on = ui.ctx().animate_bool(response.id, *on);
        let visuals = ui.style().visuals.widgets.style(&response);
        let rect = rect.expand(visuals.expansion);
        let radius = 0.5 * rect.height();
        let bg_fill = if *on { Color32::DARK_GREEN } else { visuals.bg_fill };
        ui.painter()
            .rect(rect, radius, bg_fill, visuals.bg_stroke);
        let circle_x = egui::lerp((rect.left() + radius)..=(rect.right() - radius), how_on);
        let center = egui::pos2(circle_x, rect.center().y);

        let bg_c = Color32::GRAY;
        let mut stroke = visuals.fg_stroke.clone();
        stroke.color = bg_c;
        ui.painter()
            .circle(center, 0.75 * radius, bg_c, stroke);
    }

    response
}
