//! Deadzone filtering for analog sticks and triggers
//!
//! Sticks use a combined (diamond-shaped) deadzone: the magnitude test sums
//! both axes of the same stick, while the returned value is always the raw
//! primary component. Triggers pass `0` as the secondary value, which turns
//! the same test into a one-sided threshold.

use serde::{Deserialize, Serialize};

/// Default trigger deadzone (range 0-255)
pub const DEFAULT_TRIGGER_DEADZONE: u8 = 30;

/// Default left stick deadzone (range -32768 to 32767)
pub const DEFAULT_LEFT_STICK_DEADZONE: i16 = 12500;

/// Default right stick deadzone (range -32768 to 32767)
pub const DEFAULT_RIGHT_STICK_DEADZONE: i16 = 12500;

/// Filter one analog component through a combined deadzone
///
/// # Arguments
/// * `primary` - The component being queried
/// * `secondary` - The orthogonal axis of the same stick (or `0` for triggers)
/// * `deadzone` - Threshold the combined magnitude must exceed
///
/// # Returns
/// `primary` unchanged if `|primary| + |secondary| > deadzone`, otherwise `0`
pub fn filter(primary: i16, secondary: i16, deadzone: i16) -> i16 {
    // Widen before abs: i16::MIN has no positive counterpart
    let magnitude = i32::from(primary).abs() + i32::from(secondary).abs();

    if magnitude > i32::from(deadzone) {
        primary
    } else {
        0
    }
}

/// Check whether a single signed component points past the deadzone
///
/// Used for stick directions as buttons: each direction tests one raw axis
/// value on its own, never the combined magnitude.
pub fn exceeds(component: i16, deadzone: i16) -> bool {
    i32::from(component) > i32::from(deadzone)
}

/// Same as [`exceeds`] for the negative direction of an axis
pub fn exceeds_negative(component: i16, deadzone: i16) -> bool {
    -i32::from(component) > i32::from(deadzone)
}

/// Deadzone thresholds for one controller slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Deadzones {
    #[serde(default = "default_trigger")]
    pub trigger: u8,
    #[serde(default = "default_left_stick")]
    pub left_stick: i16,
    #[serde(default = "default_right_stick")]
    pub right_stick: i16,
}

impl Default for Deadzones {
    fn default() -> Self {
        Self {
            trigger: DEFAULT_TRIGGER_DEADZONE,
            left_stick: DEFAULT_LEFT_STICK_DEADZONE,
            right_stick: DEFAULT_RIGHT_STICK_DEADZONE,
        }
    }
}

fn default_trigger() -> u8 { DEFAULT_TRIGGER_DEADZONE }
fn default_left_stick() -> i16 { DEFAULT_LEFT_STICK_DEADZONE }
fn default_right_stick() -> i16 { DEFAULT_RIGHT_STICK_DEADZONE }

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_filter_passes_values_outside_deadzone() {
        assert_eq!(filter(100, 0, 50), 100);
        assert_eq!(filter(-100, 0, 50), -100);
    }

    #[test]
    fn test_filter_zeroes_values_inside_deadzone() {
        assert_eq!(filter(10, 10, 50), 0);
        assert_eq!(filter(0, 0, 0), 0);
        // Sum equal to deadzone is still inside
        assert_eq!(filter(25, 25, 50), 0);
    }

    #[test]
    fn test_filter_uses_combined_magnitude() {
        // Primary alone is inside, but the diagonal pushes it out
        assert_eq!(filter(30, 30, 50), 30);
        assert_eq!(filter(-30, 30, 50), -30);
        // A large secondary lets a zero primary through as zero
        assert_eq!(filter(0, 20000, 12500), 0);
    }

    #[test]
    fn test_filter_trigger_as_one_sided_threshold() {
        assert_eq!(filter(31, 0, 30), 31);
        assert_eq!(filter(30, 0, 30), 0);
        assert_eq!(filter(255, 0, 30), 255);
    }

    #[test]
    fn test_filter_extremes_do_not_overflow() {
        assert_eq!(filter(i16::MIN, i16::MIN, i16::MAX), i16::MIN);
        assert_eq!(filter(i16::MAX, i16::MAX, i16::MAX), i16::MAX);
        assert_eq!(filter(i16::MIN, 0, i16::MAX), i16::MIN);
    }

    #[test]
    fn test_direction_thresholds() {
        assert!(exceeds(12501, 12500));
        assert!(!exceeds(12500, 12500));
        assert!(exceeds_negative(-12501, 12500));
        assert!(!exceeds_negative(12501, 12500));
        // -i16::MIN is not representable in i16
        assert!(exceeds_negative(i16::MIN, i16::MAX));
    }

    #[test]
    fn test_default_deadzones() {
        let dz = Deadzones::default();
        assert_eq!(dz.trigger, 30);
        assert_eq!(dz.left_stick, 12500);
        assert_eq!(dz.right_stick, 12500);
    }

    proptest! {
        #[test]
        fn prop_filter_returns_primary_or_zero(p in any::<i16>(), s in any::<i16>(), d in any::<i16>()) {
            let out = filter(p, s, d);
            prop_assert!(out == p || out == 0);
        }

        #[test]
        fn prop_filter_magnitude_is_sign_symmetric(p in -32767i16..=32767, s in -32767i16..=32767, d in any::<i16>()) {
            let kept = filter(p, s, d) != 0 || p == 0;
            let kept_neg = filter(-p, -s, d) != 0 || p == 0;
            prop_assert_eq!(kept, kept_neg);
        }
    }
}
