use crate::interface::{Device, DeviceStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceView {
  pub device : Device,
  pub label : &'static str,
  pub state_text : &'static str,
  pub highlighted : bool,
}

pub fn device_views(status : Option<&DeviceStatus>) -> [DeviceView; 4] {
  Device::ALL.map(|device| {
    let is_on = status.map_or(false, |s| s.is_on(device));
    DeviceView {
      device,
      label : device.label(),
      state_text : if is_on { "ON" } else { "OFF" },
      highlighted : is_on,
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn renders_exactly_the_devices_reported_on() {
    let status = DeviceStatus { kitchen_light : true, hall_light : false, hall_fan : false, reading_light : true };
    let views = device_views(Some(&status));

    let on : Vec<&str> = views.iter().filter(|v| v.highlighted).map(|v| v.label).collect();
    assert_eq!(on, vec!["Kitchen Light", "Reading Light"]);

    let texts : Vec<&str> = views.iter().map(|v| v.state_text).collect();
    assert_eq!(texts, vec!["ON", "OFF", "OFF", "ON"]);
  }

  #[test]
  fn nothing_is_on_before_first_status() {
    assert!(device_views(None).iter().all(|v| v.state_text == "OFF" && !v.highlighted));
  }
}
