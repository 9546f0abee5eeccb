//! padbank - frame-driven gamepad polling
//!
//! Polls up to four controllers once per frame and turns raw samples into
//! four-phase button states (Down/Pressed/Up/Released), deadzone-filtered
//! axes and timed rumble.

pub mod config;
pub mod host;
pub mod input;

pub use input::gamepad::{
    BackendKind, Control, ControllerBank, Deadzones, EdgeState, FrameSource, RawFrame,
    SharedControllerBank, Vibration, VibrationSink, SLOT_COUNT,
};
