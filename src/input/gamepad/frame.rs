//! Platform boundary: raw controller frames in, vibration commands out
//!
//! The slot logic never talks to a device directly. A [`FrameSource`] is
//! asked for one [`RawFrame`] per slot per update, and a [`VibrationSink`]
//! receives motor commands. Closures implement both traits, which is how the
//! tests drive a bank without hardware.

/// Raw controller sample for one slot at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFrame {
    pub connected: bool,
    /// XInput-layout button mask (see [`super::control::button_flags`])
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    /// Left stick (x, y)
    pub left_stick: (i16, i16),
    /// Right stick (x, y)
    pub right_stick: (i16, i16),
}

impl RawFrame {
    /// Frame reported for an empty or failing slot
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Connected frame with everything centered and released
    pub fn idle() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn with_buttons(mut self, buttons: u16) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_triggers(mut self, left: u8, right: u8) -> Self {
        self.left_trigger = left;
        self.right_trigger = right;
        self
    }

    pub fn with_left_stick(mut self, x: i16, y: i16) -> Self {
        self.left_stick = (x, y);
        self
    }

    pub fn with_right_stick(mut self, x: i16, y: i16) -> Self {
        self.right_stick = (x, y);
        self
    }

    pub fn is_button_down(&self, flag: u16) -> bool {
        (self.buttons & flag) != 0
    }
}

/// Motor speeds on the hardware's linear scale (0 = off, `u16::MAX` = full)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Vibration {
    pub left_motor: u16,
    pub right_motor: u16,
}

impl Vibration {
    pub const OFF: Vibration = Vibration { left_motor: 0, right_motor: 0 };

    pub fn new(left_motor: u16, right_motor: u16) -> Self {
        Self { left_motor, right_motor }
    }

    /// Convert motor strengths in `[0.0, 1.0]` to motor speeds
    ///
    /// Out-of-range strengths are clamped; NaN counts as `0.0`.
    pub fn from_strength(left: f32, right: f32) -> Self {
        Self {
            left_motor: strength_to_speed(left),
            right_motor: strength_to_speed(right),
        }
    }

    pub fn is_off(&self) -> bool {
        *self == Self::OFF
    }
}

fn strength_to_speed(strength: f32) -> u16 {
    if strength.is_nan() {
        return 0;
    }
    let clamped = strength.clamp(0.0, 1.0);
    (clamped * f32::from(u16::MAX)).round() as u16
}

/// Supplies one raw frame per slot per update
pub trait FrameSource {
    /// Read the current state of `slot` (0-3)
    ///
    /// Any failure must be reported as a disconnected frame.
    fn read_frame(&mut self, slot: usize) -> RawFrame;
}

/// Receives motor commands; fire-and-forget
pub trait VibrationSink {
    fn set_vibration(&mut self, slot: usize, vibration: Vibration);
}

impl<F> FrameSource for F
where
    F: FnMut(usize) -> RawFrame,
{
    fn read_frame(&mut self, slot: usize) -> RawFrame {
        self(slot)
    }
}

impl<F> VibrationSink for F
where
    F: FnMut(usize, Vibration),
{
    fn set_vibration(&mut self, slot: usize, vibration: Vibration) {
        self(slot, vibration)
    }
}

/// Source for hosts without any usable backend: every slot is empty
#[derive(Debug, Clone, Copy, Default)]
pub struct DisconnectedSource;

impl FrameSource for DisconnectedSource {
    fn read_frame(&mut self, _slot: usize) -> RawFrame {
        RawFrame::disconnected()
    }
}

/// Sink that drops every command
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl VibrationSink for NullSink {
    fn set_vibration(&mut self, _slot: usize, _vibration: Vibration) {}
}

/// Sink that keeps every command it receives, in order
///
/// Useful for headless hosts and tests that need to observe rumble timing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    commands: Vec<(usize, Vibration)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[(usize, Vibration)] {
        &self.commands
    }

    pub fn last(&self) -> Option<(usize, Vibration)> {
        self.commands.last().copied()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of stop commands sent to `slot`
    pub fn stops_for(&self, slot: usize) -> usize {
        self.commands
            .iter()
            .filter(|(index, v)| *index == slot && v.is_off())
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl VibrationSink for RecordingSink {
    fn set_vibration(&mut self, slot: usize, vibration: Vibration) {
        self.commands.push((slot, vibration));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_clamping() {
        assert_eq!(Vibration::from_strength(1.5, -0.5), Vibration::from_strength(1.0, 0.0));
        assert_eq!(Vibration::from_strength(1.0, 0.0), Vibration::new(u16::MAX, 0));
        assert_eq!(Vibration::from_strength(f32::NAN, f32::INFINITY), Vibration::new(0, u16::MAX));
    }

    #[test]
    fn test_strength_rounding() {
        let half = Vibration::from_strength(0.5, 0.25);
        assert_eq!(half.left_motor, 32768);
        assert_eq!(half.right_motor, 16384);
    }

    #[test]
    fn test_closure_source() {
        let mut source = |slot: usize| {
            if slot == 0 {
                RawFrame::idle().with_buttons(0x1000)
            } else {
                RawFrame::disconnected()
            }
        };
        assert!(source.read_frame(0).is_button_down(0x1000));
        assert!(!source.read_frame(1).connected);
    }

    #[test]
    fn test_closure_sink() {
        let mut log = Vec::new();
        {
            let mut sink = |slot: usize, v: Vibration| log.push((slot, v));
            sink.set_vibration(2, Vibration::OFF);
        }
        assert_eq!(log, vec![(2, Vibration::OFF)]);
    }

    #[test]
    fn test_builders() {
        let frame = RawFrame::idle()
            .with_triggers(10, 200)
            .with_left_stick(-5, 7)
            .with_right_stick(i16::MIN, i16::MAX);
        assert!(frame.connected);
        assert_eq!((frame.left_trigger, frame.right_trigger), (10, 200));
        assert_eq!(frame.left_stick, (-5, 7));
        assert_eq!(frame.right_stick, (i16::MIN, i16::MAX));
        assert_eq!(DisconnectedSource.read_frame(0), RawFrame::disconnected());
    }

    #[test]
    fn test_recording_sink_counts_stops() {
        let mut sink = RecordingSink::new();
        sink.set_vibration(0, Vibration::new(10, 10));
        sink.set_vibration(0, Vibration::OFF);
        sink.set_vibration(1, Vibration::OFF);

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.stops_for(0), 1);
        assert_eq!(sink.stops_for(1), 1);
        assert_eq!(sink.last(), Some((1, Vibration::OFF)));

        sink.clear();
        assert!(sink.is_empty());
    }
}
