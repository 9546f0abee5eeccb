//! gilrs backend for controllers XInput cannot see
//!
//! A gamepad claims the first free slot the first time it is seen and keeps
//! it for the lifetime of the backend, so unplugging one pad never shifts
//! the others into a different slot. Buttons
//! are translated into the XInput bit layout by physical position (Xbox
//! convention: South = A, East = B, West = X, North = Y), sticks are scaled
//! from `-1.0..=1.0` to the i16 range and triggers to `0..=255`.

use gilrs::ff::{BaseEffect, BaseEffectType, Effect, EffectBuilder, Repeat, Replay, Ticks};
use gilrs::{Axis, Button, Gamepad, GamepadId, Gilrs};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace, warn};

use super::backend::BackendError;
use super::bank::SLOT_COUNT;
use super::control::button_flags;
use super::frame::{FrameSource, RawFrame, Vibration, VibrationSink};

/// Map gilrs button position to its XInput flag
///
/// Returns `None` for buttons that have no XInput counterpart (Mode, C, Z)
/// and for the analog triggers, which are read as values instead.
pub fn gilrs_button_to_flag(button: Button) -> Option<u16> {
    match button {
        Button::South => Some(button_flags::A),
        Button::East => Some(button_flags::B),
        Button::West => Some(button_flags::X),
        Button::North => Some(button_flags::Y),

        Button::LeftTrigger => Some(button_flags::LEFT_SHOULDER),
        Button::RightTrigger => Some(button_flags::RIGHT_SHOULDER),

        Button::Select => Some(button_flags::BACK),
        Button::Start => Some(button_flags::START),

        Button::LeftThumb => Some(button_flags::LEFT_THUMB),
        Button::RightThumb => Some(button_flags::RIGHT_THUMB),

        Button::DPadUp => Some(button_flags::DPAD_UP),
        Button::DPadDown => Some(button_flags::DPAD_DOWN),
        Button::DPadLeft => Some(button_flags::DPAD_LEFT),
        Button::DPadRight => Some(button_flags::DPAD_RIGHT),

        _ => None,
    }
}

const MAPPED_BUTTONS: [Button; 14] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

/// Scale a gilrs axis value (-1.0 to 1.0) to the XInput stick range
pub fn axis_to_i16(value: f32) -> i16 {
    if value.is_nan() {
        return 0;
    }
    let scaled = (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round();
    scaled as i16
}

/// Scale a gilrs trigger value (0.0 to 1.0) to the XInput trigger range
pub fn trigger_to_u8(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * f32::from(u8::MAX)).round() as u8
}

fn frame_from_gamepad(gamepad: &Gamepad<'_>) -> RawFrame {
    let buttons = MAPPED_BUTTONS
        .iter()
        .filter(|b| gamepad.is_pressed(**b))
        .filter_map(|b| gilrs_button_to_flag(*b))
        .fold(0u16, |mask, flag| mask | flag);

    let trigger = |button: Button| {
        gamepad
            .button_data(button)
            .map(|data| trigger_to_u8(data.value()))
            .unwrap_or(0)
    };

    RawFrame {
        connected: true,
        buttons,
        left_trigger: trigger(Button::LeftTrigger2),
        right_trigger: trigger(Button::RightTrigger2),
        left_stick: (
            axis_to_i16(gamepad.value(Axis::LeftStickX)),
            axis_to_i16(gamepad.value(Axis::LeftStickY)),
        ),
        right_stick: (
            axis_to_i16(gamepad.value(Axis::RightStickX)),
            axis_to_i16(gamepad.value(Axis::RightStickY)),
        ),
    }
}

/// Give every newly seen id the first free slot
///
/// Ids that already own a slot keep it, connected or not. Ids beyond the
/// slot count are left unassigned.
fn assign_slots<T: Copy + PartialEq>(
    assigned: &mut [Option<T>; SLOT_COUNT],
    seen: impl IntoIterator<Item = T>,
) {
    for id in seen {
        if assigned.contains(&Some(id)) {
            continue;
        }
        match assigned.iter_mut().find(|entry| entry.is_none()) {
            Some(entry) => *entry = Some(id),
            None => return,
        }
    }
}

struct GilrsState {
    gilrs: Gilrs,
    /// Gamepad owning each slot, recorded on first sight
    assigned: [Option<GamepadId>; SLOT_COUNT],
    /// Running force-feedback effect per slot
    effects: [Option<Effect>; SLOT_COUNT],
}

impl GilrsState {
    fn refresh_assignments(&mut self) {
        let connected: Vec<GamepadId> = self
            .gilrs
            .gamepads()
            .filter(|(_, gp)| gp.is_connected())
            .map(|(id, _)| id)
            .collect();
        assign_slots(&mut self.assigned, connected);
    }

    /// Id of the slot's gamepad, if it is currently connected
    fn gamepad_id_for_slot(&self, slot: usize) -> Option<GamepadId> {
        self.assigned
            .get(slot)
            .copied()
            .flatten()
            .filter(|id| self.gilrs.gamepad(*id).is_connected())
    }
}

/// Frame source and vibration sink backed by gilrs
///
/// Clones share the same gilrs context, so one instance can serve as both
/// the source and the sink of a bank.
#[derive(Clone)]
pub struct GilrsBackend {
    state: Rc<RefCell<GilrsState>>,
}

impl GilrsBackend {
    pub fn load() -> Result<Self, BackendError> {
        let gilrs = Gilrs::new().map_err(|e| BackendError::GilrsUnavailable(e.to_string()))?;
        debug!("gilrs initialized");

        Ok(Self {
            state: Rc::new(RefCell::new(GilrsState {
                gilrs,
                assigned: [None; SLOT_COUNT],
                effects: Default::default(),
            })),
        })
    }
}

impl FrameSource for GilrsBackend {
    fn read_frame(&mut self, slot: usize) -> RawFrame {
        let mut state = self.state.borrow_mut();

        // Drain pending events so cached gamepad state is current
        while let Some(event) = state.gilrs.next_event() {
            trace!("gilrs event: {:?}", event.event);
        }
        state.refresh_assignments();

        match state.gamepad_id_for_slot(slot) {
            Some(id) => frame_from_gamepad(&state.gilrs.gamepad(id)),
            None => RawFrame::disconnected(),
        }
    }
}

impl VibrationSink for GilrsBackend {
    fn set_vibration(&mut self, slot: usize, vibration: Vibration) {
        let mut state = self.state.borrow_mut();
        let Some(entry) = state.effects.get_mut(slot) else {
            return;
        };

        // Dropping the previous effect stops it
        entry.take();

        if vibration.is_off() {
            return;
        }

        let Some(id) = state.gamepad_id_for_slot(slot) else {
            return;
        };
        if !state.gilrs.gamepad(id).is_ff_supported() {
            trace!("Gamepad in slot {} has no force feedback", slot);
            return;
        }

        let scheduling = || Replay {
            play_for: Ticks::from_ms(100),
            ..Default::default()
        };
        let built = EffectBuilder::new()
            .add_effect(BaseEffect {
                kind: BaseEffectType::Strong { magnitude: vibration.left_motor },
                scheduling: scheduling(),
                ..Default::default()
            })
            .add_effect(BaseEffect {
                kind: BaseEffectType::Weak { magnitude: vibration.right_motor },
                scheduling: scheduling(),
                ..Default::default()
            })
            .repeat(Repeat::Infinitely)
            .gamepads(&[id])
            .finish(&mut state.gilrs);

        match built {
            Ok(effect) => {
                if let Err(e) = effect.play() {
                    warn!("Failed to start rumble on slot {}: {}", slot, e);
                    return;
                }
                state.effects[slot] = Some(effect);
            },
            Err(e) => warn!("Failed to build rumble effect for slot {}: {}", slot, e),
        }
    }
}
