//! XInput backend
//!
//! Polls rusty_xinput controller state into [`RawFrame`]s and forwards
//! vibration commands. Any status other than success is reported as a
//! disconnected frame; callers never see the distinction.

use rusty_xinput::{XInputHandle, XInputState, XInputUsageError};
use std::sync::Arc;
use tracing::{debug, trace};

use super::backend::BackendError;
use super::frame::{FrameSource, RawFrame, Vibration, VibrationSink};
use super::bank::SLOT_COUNT;

impl From<&XInputState> for RawFrame {
    fn from(state: &XInputState) -> Self {
        Self {
            connected: true,
            buttons: state.raw.Gamepad.wButtons,
            left_trigger: state.left_trigger(),
            right_trigger: state.right_trigger(),
            left_stick: (state.raw.Gamepad.sThumbLX, state.raw.Gamepad.sThumbLY),
            right_stick: (state.raw.Gamepad.sThumbRX, state.raw.Gamepad.sThumbRY),
        }
    }
}

/// Poll XInput controller and return current state if available
///
/// # Returns
/// - `Ok(Some(state))` if controller is connected
/// - `Ok(None)` if controller is not connected
/// - `Err(_)` if XInput API failed
pub fn poll_xinput_controller(
    handle: &XInputHandle,
    user_index: u32,
) -> Result<Option<XInputState>, XInputUsageError> {
    match handle.get_state(user_index) {
        Ok(state) => Ok(Some(state)),
        Err(XInputUsageError::DeviceNotConnected) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Frame source and vibration sink backed by the XInput DLL
#[derive(Clone)]
pub struct XInputBackend {
    handle: Arc<XInputHandle>,
    /// Slots whose last poll failed with an API error (logged once)
    failing: [bool; SLOT_COUNT],
}

impl XInputBackend {
    /// Load the default XInput library
    pub fn load() -> Result<Self, BackendError> {
        let handle = XInputHandle::load_default()
            .map_err(|e| BackendError::XInputUnavailable(format!("{:?}", e)))?;
        debug!("XInput initialized successfully");

        Ok(Self {
            handle: Arc::new(handle),
            failing: [false; SLOT_COUNT],
        })
    }
}

impl FrameSource for XInputBackend {
    fn read_frame(&mut self, slot: usize) -> RawFrame {
        let Ok(user_index) = u32::try_from(slot) else {
            return RawFrame::disconnected();
        };

        match poll_xinput_controller(&self.handle, user_index) {
            Ok(Some(state)) => {
                if let Some(flag) = self.failing.get_mut(slot) {
                    *flag = false;
                }
                RawFrame::from(&state)
            },
            Ok(None) => RawFrame::disconnected(),
            Err(e) => {
                if let Some(flag) = self.failing.get_mut(slot) {
                    if !*flag {
                        debug!("XInput poll failed for user {}: {:?}", user_index, e);
                        *flag = true;
                    }
                }
                RawFrame::disconnected()
            },
        }
    }
}

impl VibrationSink for XInputBackend {
    fn set_vibration(&mut self, slot: usize, vibration: Vibration) {
        let Ok(user_index) = u32::try_from(slot) else {
            return;
        };

        if let Err(e) = self
            .handle
            .set_state(user_index, vibration.left_motor, vibration.right_motor)
        {
            trace!("XInput vibration for user {} not applied: {:?}", user_index, e);
        }
    }
}
