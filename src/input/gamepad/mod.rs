//! Gamepad polling with edge-aware button states
//!
//! A [`ControllerBank`] owns four [`ControllerSlot`]s. The host calls
//! [`ControllerBank::update`] once per frame; every query between two
//! updates reads the cached result of the last one.

pub mod backend;
pub mod bank;
pub mod control;
pub mod deadzone;
pub mod diagnostics;
pub mod edge;
pub mod frame;
pub mod shared;
pub mod slot;

#[cfg(feature = "gilrs-backend")]
pub mod gilrs_convert;
#[cfg(windows)]
pub mod xinput_convert;

pub use backend::{BackendError, BackendKind, PlatformBackend};
pub use bank::{ControllerBank, SLOT_COUNT};
pub use control::Control;
pub use deadzone::Deadzones;
pub use diagnostics::print_gamepad_diagnostics;
pub use edge::EdgeState;
pub use frame::{
    DisconnectedSource, FrameSource, NullSink, RawFrame, RecordingSink, Vibration, VibrationSink,
};
pub use shared::SharedControllerBank;
pub use slot::ControllerSlot;
