//! Fixed bank of four controller slots and the public query surface
//!
//! Every method takes a slot index. Indices outside `0..SLOT_COUNT` never
//! fail: queries return `false`/`0`/`Released` and commands do nothing.

use std::time::Duration;

use super::control::Control;
use super::deadzone::Deadzones;
use super::edge::EdgeState;
use super::frame::{FrameSource, VibrationSink};
use super::slot::ControllerSlot;

/// Number of controller slots in a bank
pub const SLOT_COUNT: usize = 4;

/// Generates one named phase query per control
macro_rules! phase_queries {
    ($($name:ident => $control:ident,)*) => {
        $(
            #[doc = concat!("Check the `", stringify!($control), "` control against a queried phase")]
            pub fn $name(&self, index: usize, query: EdgeState) -> bool {
                self.control(index, Control::$control, query)
            }
        )*
    };
}

/// Four controller slots sharing one frame source and one vibration sink
pub struct ControllerBank<S, V> {
    slots: [ControllerSlot; SLOT_COUNT],
    source: S,
    sink: V,
}

impl<S, V> ControllerBank<S, V>
where
    S: FrameSource,
    V: VibrationSink,
{
    /// Create a bank where every slot uses the default deadzones
    pub fn new(source: S, sink: V) -> Self {
        Self::with_deadzones(source, sink, [Deadzones::default(); SLOT_COUNT])
    }

    /// Create a bank with per-slot deadzones
    pub fn with_deadzones(source: S, sink: V, deadzones: [Deadzones; SLOT_COUNT]) -> Self {
        let slots = std::array::from_fn(|index| ControllerSlot::new(index, deadzones[index]));
        Self { slots, source, sink }
    }

    /// Poll every slot once, in index order
    ///
    /// `elapsed` is the time since the previous call; it drives the rumble
    /// countdowns.
    pub fn update(&mut self, elapsed: Duration) {
        for slot in self.slots.iter_mut() {
            slot.update(&mut self.source, &mut self.sink, elapsed);
        }
    }

    /// Get slot by index
    pub fn slot(&self, index: usize) -> Option<&ControllerSlot> {
        self.slots.get(index)
    }

    /// Get all slots (immutable)
    pub fn slots(&self) -> &[ControllerSlot] {
        &self.slots
    }

    /// Indices of slots that were connected at the last update
    pub fn connected_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .filter(|s| s.is_connected())
            .map(|s| s.slot_index())
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &V {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut V {
        &mut self.sink
    }

    /// Check if the controller is connected and ready to use
    pub fn is_connected(&self, index: usize) -> bool {
        self.slot(index).is_some_and(|s| s.is_connected())
    }

    /// Current phase of a control (`Released` for an invalid index)
    pub fn state(&self, index: usize, control: Control) -> EdgeState {
        self.slot(index)
            .map(|s| s.state(control))
            .unwrap_or_default()
    }

    /// Check any control against a queried phase
    ///
    /// `Pressed` also matches `Down`, `Released` also matches `Up`.
    pub fn control(&self, index: usize, control: Control, query: EdgeState) -> bool {
        self.slot(index).is_some_and(|s| s.matches(control, query))
    }

    phase_queries! {
        left_bumper => LeftBumper,
        right_bumper => RightBumper,
        left_trigger => LeftTrigger,
        right_trigger => RightTrigger,
        a => A,
        b => B,
        x => X,
        y => Y,
        dpad_up => DPadUp,
        dpad_down => DPadDown,
        dpad_left => DPadLeft,
        dpad_right => DPadRight,
        start => Start,
        back => Back,
        left_thumb => LeftThumb,
        right_thumb => RightThumb,
        left_analog_left => LeftStickLeft,
        left_analog_right => LeftStickRight,
        left_analog_up => LeftStickUp,
        left_analog_down => LeftStickDown,
        right_analog_left => RightStickLeft,
        right_analog_right => RightStickRight,
        right_analog_up => RightStickUp,
        right_analog_down => RightStickDown,
    }

    /// X amplitude of the left stick, deadzone applied (-32768 to 32767)
    pub fn get_left_analog_x(&self, index: usize) -> i16 {
        self.slot(index).map_or(0, |s| s.left_analog_x())
    }

    /// Y amplitude of the left stick, deadzone applied (-32768 to 32767)
    pub fn get_left_analog_y(&self, index: usize) -> i16 {
        self.slot(index).map_or(0, |s| s.left_analog_y())
    }

    /// X amplitude of the right stick, deadzone applied (-32768 to 32767)
    pub fn get_right_analog_x(&self, index: usize) -> i16 {
        self.slot(index).map_or(0, |s| s.right_analog_x())
    }

    /// Y amplitude of the right stick, deadzone applied (-32768 to 32767)
    pub fn get_right_analog_y(&self, index: usize) -> i16 {
        self.slot(index).map_or(0, |s| s.right_analog_y())
    }

    /// Left trigger amplitude, deadzone applied (0 to 255)
    pub fn get_left_trigger(&self, index: usize) -> i16 {
        self.slot(index).map_or(0, |s| s.left_trigger())
    }

    /// Right trigger amplitude, deadzone applied (0 to 255)
    pub fn get_right_trigger(&self, index: usize) -> i16 {
        self.slot(index).map_or(0, |s| s.right_trigger())
    }

    /// Turn the rumble on for `seconds`
    ///
    /// # Arguments
    /// * `index` - Slot index (0-3)
    /// * `left` - Strength of the left motor (0.0 - 1.0), clamped
    /// * `right` - Strength of the right motor (0.0 - 1.0), clamped
    /// * `seconds` - Duration; negative values are ignored
    pub fn set_rumble_on(&mut self, index: usize, left: f32, right: f32, seconds: f32) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.set_rumble_on(&mut self.sink, left, right, seconds);
        }
    }

    /// Turn the rumble off immediately
    pub fn set_rumble_off(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.set_rumble_off(&mut self.sink);
        }
    }

    pub fn is_rumbling(&self, index: usize) -> bool {
        self.slot(index).is_some_and(|s| s.is_rumbling())
    }
}
