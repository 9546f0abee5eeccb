//! Per-controller state for one fixed slot
//!
//! Each slot owns:
//! - Slot index (0-based) → log prefix (gamepad1, gamepad2, etc.)
//! - One edge state per logical control
//! - Raw analog caches, filtered only when queried
//! - Rumble countdown
//! - Its own deadzone thresholds

use std::time::Duration;
use tracing::{debug, info, trace};

use super::control::{Control, ControlSource, Direction, Side, CONTROL_COUNT};
use super::deadzone::{self, Deadzones};
use super::edge::EdgeState;
use super::frame::{FrameSource, RawFrame, Vibration, VibrationSink};

/// One controller position, polled once per frame
#[derive(Debug, Clone)]
pub struct ControllerSlot {
    /// Slot index (0-based, used to generate gamepad1, gamepad2, etc.)
    slot_index: usize,

    /// Thresholds fixed at construction
    deadzones: Deadzones,

    /// Connectivity reported by the last probe
    connected: bool,

    /// Edge state per control, indexed by `Control::index()`
    states: [EdgeState; CONTROL_COUNT],

    /// Raw values from the last connected frame
    left_stick: (i16, i16),
    right_stick: (i16, i16),
    left_trigger: u8,
    right_trigger: u8,

    /// Seconds of rumble left, counted down by `update`
    rumble_remaining: f32,

    /// Set once the stop command for the current rumble has been sent
    rumble_ended: bool,
}

impl ControllerSlot {
    /// Create a new, disconnected slot
    pub fn new(slot_index: usize, deadzones: Deadzones) -> Self {
        Self {
            slot_index,
            deadzones,
            connected: false,
            states: [EdgeState::Released; CONTROL_COUNT],
            left_stick: (0, 0),
            right_stick: (0, 0),
            left_trigger: 0,
            right_trigger: 0,
            rumble_remaining: 0.0,
            rumble_ended: true,
        }
    }

    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    pub fn deadzones(&self) -> Deadzones {
        self.deadzones
    }

    /// Get log prefix for this slot (e.g., "gamepad1", "gamepad2")
    pub fn control_id_prefix(&self) -> String {
        format!("gamepad{}", self.slot_index + 1)
    }

    /// Poll the source once and advance every control
    ///
    /// A disconnected frame only clears the connectivity flag: edge states,
    /// analog caches and the rumble countdown stay frozen until the
    /// controller comes back.
    pub fn update<S, V>(&mut self, source: &mut S, sink: &mut V, elapsed: Duration)
    where
        S: FrameSource + ?Sized,
        V: VibrationSink + ?Sized,
    {
        let frame = source.read_frame(self.slot_index);

        if frame.connected != self.connected {
            if frame.connected {
                info!("🎮 Gamepad {} connected", self.control_id_prefix());
            } else {
                info!("🔌 Gamepad {} disconnected", self.control_id_prefix());
            }
        }
        self.connected = frame.connected;

        if !self.connected {
            return;
        }

        for control in Control::ALL {
            let raw_active = self.is_raw_active(control, &frame);
            let index = control.index();
            let next = self.states[index].advance(raw_active);
            if next.is_edge() {
                trace!("gamepad{}.{} -> {:?}", self.slot_index + 1, control, next);
            }
            self.states[index] = next;
        }

        self.left_stick = frame.left_stick;
        self.right_stick = frame.right_stick;
        self.left_trigger = frame.left_trigger;
        self.right_trigger = frame.right_trigger;

        self.tick_rumble(sink, elapsed);
    }

    /// Raw "active" sample for one control, before edge tracking
    fn is_raw_active(&self, control: Control, frame: &RawFrame) -> bool {
        match control.source() {
            ControlSource::Button(flag) => frame.is_button_down(flag),
            ControlSource::Trigger(side) => {
                let value = match side {
                    Side::Left => frame.left_trigger,
                    Side::Right => frame.right_trigger,
                };
                value > self.deadzones.trigger
            },
            ControlSource::Stick(side, direction) => {
                let ((x, y), zone) = match side {
                    Side::Left => (frame.left_stick, self.deadzones.left_stick),
                    Side::Right => (frame.right_stick, self.deadzones.right_stick),
                };
                // Directions test one raw component, not the combined filter
                match direction {
                    Direction::Left => deadzone::exceeds_negative(x, zone),
                    Direction::Right => deadzone::exceeds(x, zone),
                    Direction::Up => deadzone::exceeds(y, zone),
                    Direction::Down => deadzone::exceeds_negative(y, zone),
                }
            },
        }
    }

    fn tick_rumble<V>(&mut self, sink: &mut V, elapsed: Duration)
    where
        V: VibrationSink + ?Sized,
    {
        if self.rumble_ended {
            return;
        }

        self.rumble_remaining -= elapsed.as_secs_f32();

        if self.rumble_remaining <= 0.0 {
            sink.set_vibration(self.slot_index, Vibration::OFF);
            self.rumble_ended = true;
            debug!("Rumble on {} finished", self.control_id_prefix());
        }
    }

    /// Start a timed rumble
    ///
    /// Strengths are clamped to `[0.0, 1.0]`. A negative (or NaN) duration
    /// is ignored and leaves any running rumble untouched.
    pub fn set_rumble_on<V>(&mut self, sink: &mut V, left: f32, right: f32, seconds: f32)
    where
        V: VibrationSink + ?Sized,
    {
        if seconds.is_nan() || seconds < 0.0 {
            trace!("Ignoring rumble on {} with duration {}", self.control_id_prefix(), seconds);
            return;
        }

        let vibration = Vibration::from_strength(left, right);
        sink.set_vibration(self.slot_index, vibration);

        self.rumble_remaining = seconds;
        self.rumble_ended = false;
        debug!(
            "Rumble on {}: left={} right={} for {:.3}s",
            self.control_id_prefix(),
            vibration.left_motor,
            vibration.right_motor,
            seconds
        );
    }

    /// Stop the motors now, regardless of the remaining time
    pub fn set_rumble_off<V>(&mut self, sink: &mut V)
    where
        V: VibrationSink + ?Sized,
    {
        self.rumble_remaining = 0.0;
        self.rumble_ended = true;
        sink.set_vibration(self.slot_index, Vibration::OFF);
        debug!("Rumble on {} stopped", self.control_id_prefix());
    }

    /// Check if a rumble is running (stop command not sent yet)
    pub fn is_rumbling(&self) -> bool {
        !self.rumble_ended
    }

    pub fn rumble_remaining(&self) -> f32 {
        self.rumble_remaining.max(0.0)
    }

    /// Check if gamepad is currently connected
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Current phase of a control
    pub fn state(&self, control: Control) -> EdgeState {
        self.states[control.index()]
    }

    /// Check a control against a queried phase (with `Pressed`/`Released` broadening)
    pub fn matches(&self, control: Control, query: EdgeState) -> bool {
        self.state(control).matches(query)
    }

    /// Left stick X with the combined deadzone applied
    pub fn left_analog_x(&self) -> i16 {
        let (x, y) = self.left_stick;
        deadzone::filter(x, y, self.deadzones.left_stick)
    }

    /// Left stick Y with the combined deadzone applied
    pub fn left_analog_y(&self) -> i16 {
        let (x, y) = self.left_stick;
        deadzone::filter(y, x, self.deadzones.left_stick)
    }

    /// Right stick X with the combined deadzone applied
    pub fn right_analog_x(&self) -> i16 {
        let (x, y) = self.right_stick;
        deadzone::filter(x, y, self.deadzones.right_stick)
    }

    /// Right stick Y with the combined deadzone applied
    pub fn right_analog_y(&self) -> i16 {
        let (x, y) = self.right_stick;
        deadzone::filter(y, x, self.deadzones.right_stick)
    }

    /// Left trigger (0-255) with the trigger deadzone applied
    pub fn left_trigger(&self) -> i16 {
        deadzone::filter(
            i16::from(self.left_trigger),
            0,
            i16::from(self.deadzones.trigger),
        )
    }

    /// Right trigger (0-255) with the trigger deadzone applied
    pub fn right_trigger(&self) -> i16 {
        deadzone::filter(
            i16::from(self.right_trigger),
            0,
            i16::from(self.deadzones.trigger),
        )
    }

    /// Unfiltered stick caches, as last sampled: ((lx, ly), (rx, ry))
    pub fn raw_sticks(&self) -> ((i16, i16), (i16, i16)) {
        (self.left_stick, self.right_stick)
    }
}
