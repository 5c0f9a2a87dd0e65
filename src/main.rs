mod error;
mod interface;
mod worker;
mod gui;

use eframe::egui;
use env_logger;
use gui::HomeDashboard;
use interface::HomeControlConfig;


fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

  let cfg = HomeControlConfig::load();

  let native_options = eframe::NativeOptions {
    initial_window_size : Some( egui::vec2(960.0, 720.0) ),
    ..Default::default()
  };

  if let Err( e ) = eframe::run_native(
      "Voice Home Control",
      native_options,
      Box::new(move |cc| Box::new(HomeDashboard::new(cc, cfg)) )
    )  {
    log::error!("Failed to run Voice Home Control {:?}", e);
  };
}
