//! Device models and the HID transport seam.
//!
//! Everything above this module talks to the panel through `HidTransport`,
//! so the session and both worker loops can run against the real device or
//! an in-memory recorder.

mod hid;

pub use hid::{find_attached, list_attached, open_model, HidapiTransport};

use anyhow::Result;
use clap::ValueEnum;
use std::borrow::Cow;

pub const MASK_MCDU: u8 = 0x01;
pub const MASK_PFP3N: u8 = 0x02;
pub const MASK_PFP4: u8 = 0x04;
pub const MASK_PFP7: u8 = 0x08;
pub const MASK_CAPTAIN: u8 = 0x10;
pub const MASK_FIRST_OFFICER: u8 = 0x20;
pub const MASK_OBSERVER: u8 = 0x40;

/// A panel the bridge knows how to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceModel {
    pub vendor_id: u16,
    pub product_id: u16,
    pub name: &'static str,
    pub mask: u8,
}

/// Known models in discovery order.
pub const SUPPORTED_MODELS: [DeviceModel; 6] = [
    DeviceModel {
        vendor_id: 0x4098,
        product_id: 0xbb36,
        name: "MCDU - Captain",
        mask: MASK_MCDU | MASK_CAPTAIN,
    },
    DeviceModel {
        vendor_id: 0x4098,
        product_id: 0xbb3e,
        name: "MCDU - First Officer",
        mask: MASK_MCDU | MASK_FIRST_OFFICER,
    },
    DeviceModel {
        vendor_id: 0x4098,
        product_id: 0xbb3a,
        name: "MCDU - Observer",
        mask: MASK_MCDU | MASK_OBSERVER,
    },
    DeviceModel {
        vendor_id: 0x4098,
        product_id: 0xbc1e,
        name: "PFP 3N (not tested)",
        mask: MASK_PFP3N,
    },
    DeviceModel {
        vendor_id: 0x4098,
        product_id: 0xbc1d,
        name: "PFP 4 (not tested)",
        mask: MASK_PFP4,
    },
    DeviceModel {
        vendor_id: 0x4098,
        product_id: 0xba01,
        name: "PFP 7 (not tested)",
        mask: MASK_PFP7,
    },
];

pub fn model_for(vendor_id: u16, product_id: u16) -> Option<&'static DeviceModel> {
    SUPPORTED_MODELS
        .iter()
        .find(|model| model.vendor_id == vendor_id && model.product_id == product_id)
}

/// Seat a unit is built for. Decides which side of the host state it mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DeviceVariant {
    #[default]
    Captain,
    FirstOfficer,
    Observer,
}

const CAPTAIN_COMMAND_PREFIX: &str = "event:left:";
const FIRST_OFFICER_COMMAND_PREFIX: &str = "event:right:";

impl DeviceVariant {
    /// Variant from a capability mask; non-MCDU panels fall back to captain.
    pub fn from_mask(mask: u8) -> Self {
        if mask & MASK_FIRST_OFFICER != 0 {
            DeviceVariant::FirstOfficer
        } else if mask & MASK_OBSERVER != 0 {
            DeviceVariant::Observer
        } else {
            DeviceVariant::Captain
        }
    }

    /// Key of the update sub-object this unit displays.
    pub fn side(self) -> &'static str {
        match self {
            DeviceVariant::Captain | DeviceVariant::Observer => "left",
            DeviceVariant::FirstOfficer => "right",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeviceVariant::Captain => "captain",
            DeviceVariant::FirstOfficer => "first-officer",
            DeviceVariant::Observer => "observer",
        }
    }

    /// Rewrite a captain-side binding target for this unit.
    pub fn remap_target(self, target: &str) -> Cow<'_, str> {
        match self {
            DeviceVariant::FirstOfficer if target.contains(CAPTAIN_COMMAND_PREFIX) => Cow::Owned(
                target.replace(CAPTAIN_COMMAND_PREFIX, FIRST_OFFICER_COMMAND_PREFIX),
            ),
            _ => Cow::Borrowed(target),
        }
    }
}

/// Raw report I/O with the panel.
pub trait HidTransport: Send {
    /// Write one output report; the first byte is the report id.
    fn write_report(&mut self, report: &[u8]) -> Result<()>;

    /// Read one input report into `buf`, waiting at most `timeout_ms`.
    ///
    /// Returns the number of bytes read; `0` means the wait timed out.
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: i32) -> Result<usize>;
}
