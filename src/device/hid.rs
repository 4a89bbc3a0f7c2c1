use super::{model_for, DeviceModel, HidTransport, SUPPORTED_MODELS};
use crate::log_debug;
use anyhow::{Context, Result};
use hidapi::{HidApi, HidDevice};
use std::collections::HashSet;

/// `HidTransport` over an opened hidapi device.
pub struct HidapiTransport {
    device: HidDevice,
}

impl std::fmt::Debug for HidapiTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidapiTransport").finish_non_exhaustive()
    }
}

impl HidTransport for HidapiTransport {
    fn write_report(&mut self, report: &[u8]) -> Result<()> {
        self.device
            .write(report)
            .with_context(|| format!("HID write of {} bytes failed", report.len()))?;
        Ok(())
    }

    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        self.device
            .read_timeout(buf, timeout_ms)
            .context("HID read failed")
    }
}

/// Ids of attached supported devices. A panel exposing several HID
/// interfaces shows up once.
fn attached_ids(api: &HidApi) -> HashSet<(u16, u16)> {
    api.device_list()
        .filter_map(|info| model_for(info.vendor_id(), info.product_id()))
        .map(|model| (model.vendor_id, model.product_id))
        .collect()
}

/// Supported models currently attached, in table order.
pub fn list_attached(api: &HidApi) -> Vec<&'static DeviceModel> {
    let attached = attached_ids(api);
    SUPPORTED_MODELS
        .iter()
        .filter(|model| attached.contains(&(model.vendor_id, model.product_id)))
        .collect()
}

/// First attached model in discovery order.
pub fn find_attached(api: &HidApi) -> Option<&'static DeviceModel> {
    let attached = attached_ids(api);
    for model in SUPPORTED_MODELS.iter() {
        let found = attached.contains(&(model.vendor_id, model.product_id));
        log_debug(&format!(
            "searching for {}: {}",
            model.name,
            if found { "found" } else { "not found" }
        ));
        if found {
            return Some(model);
        }
    }
    None
}

pub fn open_model(api: &HidApi, model: &DeviceModel) -> Result<HidapiTransport> {
    let device = api
        .open(model.vendor_id, model.product_id)
        .with_context(|| {
            format!(
                "failed to open {} ({:04x}:{:04x})",
                model.name, model.vendor_id, model.product_id
            )
        })?;
    log_debug(&format!("opened {}", model.name));
    Ok(HidapiTransport { device })
}
