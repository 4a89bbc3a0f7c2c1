//! Session state shared by the update and input loops, plus the handlers the
//! channel collaborator calls into.

pub mod input;
pub mod protocol;
mod session;

pub use input::{spawn_input_thread, InputPoller, InputSettings, InputWorker};
pub use protocol::{decode_update, McduState, UpdateError, UPDATE_PREFIX};
pub use session::{BridgeSession, MessageOutcome, BODY_ROWS, ERROR_SCREEN_BACKLIGHT};
