//! Logical controls tracked per slot
//!
//! Every control is something that can be "active" on a frame: a digital
//! button, a trigger pulled past its deadzone, or a stick pushed in one
//! direction past its deadzone. Each one owns an independent [`EdgeState`].
//!
//! [`EdgeState`]: super::edge::EdgeState

use serde::{Deserialize, Serialize};

/// XInput button bit flags
///
/// Backends that are not XInput translate their buttons into this layout so
/// the slot logic only ever sees one bitmask format.
pub mod button_flags {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// One of the 24 logical controls of a controller slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    A,
    B,
    X,
    Y,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftStickLeft,
    LeftStickRight,
    LeftStickUp,
    LeftStickDown,
    RightStickLeft,
    RightStickRight,
    RightStickUp,
    RightStickDown,
}

/// Where the raw "active" boolean of a control comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSource {
    /// A bit in the button mask
    Button(u16),
    /// A trigger compared against the trigger deadzone
    Trigger(Side),
    /// One direction of a stick compared against that stick's deadzone
    Stick(Side, Direction),
}

/// Which half of the controller a trigger or stick sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Stick direction; Up is positive Y as reported by XInput
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Number of logical controls per slot
pub const CONTROL_COUNT: usize = 24;

impl Control {
    /// All controls, in the order they are evaluated during an update
    pub const ALL: [Control; CONTROL_COUNT] = [
        Control::LeftBumper,
        Control::RightBumper,
        Control::A,
        Control::B,
        Control::X,
        Control::Y,
        Control::Start,
        Control::Back,
        Control::LeftThumb,
        Control::RightThumb,
        Control::DPadUp,
        Control::DPadDown,
        Control::DPadLeft,
        Control::DPadRight,
        Control::LeftTrigger,
        Control::RightTrigger,
        Control::LeftStickLeft,
        Control::LeftStickRight,
        Control::LeftStickUp,
        Control::LeftStickDown,
        Control::RightStickLeft,
        Control::RightStickRight,
        Control::RightStickUp,
        Control::RightStickDown,
    ];

    /// Stable position of this control in [`Control::ALL`]
    pub fn index(self) -> usize {
        match self {
            Control::LeftBumper => 0,
            Control::RightBumper => 1,
            Control::A => 2,
            Control::B => 3,
            Control::X => 4,
            Control::Y => 5,
            Control::Start => 6,
            Control::Back => 7,
            Control::LeftThumb => 8,
            Control::RightThumb => 9,
            Control::DPadUp => 10,
            Control::DPadDown => 11,
            Control::DPadLeft => 12,
            Control::DPadRight => 13,
            Control::LeftTrigger => 14,
            Control::RightTrigger => 15,
            Control::LeftStickLeft => 16,
            Control::LeftStickRight => 17,
            Control::LeftStickUp => 18,
            Control::LeftStickDown => 19,
            Control::RightStickLeft => 20,
            Control::RightStickRight => 21,
            Control::RightStickUp => 22,
            Control::RightStickDown => 23,
        }
    }

    /// Where this control reads its raw sample from
    pub fn source(self) -> ControlSource {
        use button_flags as f;

        match self {
            Control::LeftBumper => ControlSource::Button(f::LEFT_SHOULDER),
            Control::RightBumper => ControlSource::Button(f::RIGHT_SHOULDER),
            Control::A => ControlSource::Button(f::A),
            Control::B => ControlSource::Button(f::B),
            Control::X => ControlSource::Button(f::X),
            Control::Y => ControlSource::Button(f::Y),
            Control::Start => ControlSource::Button(f::START),
            Control::Back => ControlSource::Button(f::BACK),
            Control::LeftThumb => ControlSource::Button(f::LEFT_THUMB),
            Control::RightThumb => ControlSource::Button(f::RIGHT_THUMB),
            Control::DPadUp => ControlSource::Button(f::DPAD_UP),
            Control::DPadDown => ControlSource::Button(f::DPAD_DOWN),
            Control::DPadLeft => ControlSource::Button(f::DPAD_LEFT),
            Control::DPadRight => ControlSource::Button(f::DPAD_RIGHT),
            Control::LeftTrigger => ControlSource::Trigger(Side::Left),
            Control::RightTrigger => ControlSource::Trigger(Side::Right),
            Control::LeftStickLeft => ControlSource::Stick(Side::Left, Direction::Left),
            Control::LeftStickRight => ControlSource::Stick(Side::Left, Direction::Right),
            Control::LeftStickUp => ControlSource::Stick(Side::Left, Direction::Up),
            Control::LeftStickDown => ControlSource::Stick(Side::Left, Direction::Down),
            Control::RightStickLeft => ControlSource::Stick(Side::Right, Direction::Left),
            Control::RightStickRight => ControlSource::Stick(Side::Right, Direction::Right),
            Control::RightStickUp => ControlSource::Stick(Side::Right, Direction::Up),
            Control::RightStickDown => ControlSource::Stick(Side::Right, Direction::Down),
        }
    }

    /// Short name used in logs and diagnostics (e.g. "btn.a", "dpad.up", "ls.left")
    pub fn name(self) -> &'static str {
        match self {
            Control::LeftBumper => "btn.lb",
            Control::RightBumper => "btn.rb",
            Control::A => "btn.a",
            Control::B => "btn.b",
            Control::X => "btn.x",
            Control::Y => "btn.y",
            Control::Start => "btn.start",
            Control::Back => "btn.back",
            Control::LeftThumb => "btn.l3",
            Control::RightThumb => "btn.r3",
            Control::DPadUp => "dpad.up",
            Control::DPadDown => "dpad.down",
            Control::DPadLeft => "dpad.left",
            Control::DPadRight => "dpad.right",
            Control::LeftTrigger => "trigger.lt",
            Control::RightTrigger => "trigger.rt",
            Control::LeftStickLeft => "ls.left",
            Control::LeftStickRight => "ls.right",
            Control::LeftStickUp => "ls.up",
            Control::LeftStickDown => "ls.down",
            Control::RightStickLeft => "rs.left",
            Control::RightStickRight => "rs.right",
            Control::RightStickUp => "rs.up",
            Control::RightStickDown => "rs.down",
        }
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_index_matches_position_in_all() {
        for (position, control) in Control::ALL.iter().enumerate() {
            assert_eq!(control.index(), position, "{:?}", control);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = Control::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(names.len(), CONTROL_COUNT);
    }

    #[test]
    fn test_source_groups() {
        let buttons = Control::ALL
            .iter()
            .filter(|c| matches!(c.source(), ControlSource::Button(_)))
            .count();
        let triggers = Control::ALL
            .iter()
            .filter(|c| matches!(c.source(), ControlSource::Trigger(_)))
            .count();
        let directions = Control::ALL
            .iter()
            .filter(|c| matches!(c.source(), ControlSource::Stick(..)))
            .count();

        assert_eq!(buttons, 14);
        assert_eq!(triggers, 2);
        assert_eq!(directions, 8);
    }

    #[test]
    fn test_button_flags_are_distinct() {
        let flags: HashSet<u16> = Control::ALL
            .iter()
            .filter_map(|c| match c.source() {
                ControlSource::Button(flag) => Some(flag),
                _ => None,
            })
            .collect();
        assert_eq!(flags.len(), 14);
        assert!(flags.iter().all(|f| f.count_ones() == 1));
    }

    #[test]
    fn test_display_uses_short_name() {
        assert_eq!(Control::DPadUp.to_string(), "dpad.up");
        assert_eq!(Control::RightStickDown.to_string(), "rs.down");
    }
}
