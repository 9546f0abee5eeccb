//! Scripted end-to-end runs of a controller bank

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use padbank::input::gamepad::control::button_flags;
use padbank::input::gamepad::RecordingSink;
use padbank::{Control, ControllerBank, Deadzones, EdgeState, RawFrame, Vibration, SLOT_COUNT};

const FRAME: Duration = Duration::from_millis(16);

/// Frames the bank will read on its next update, one per slot
type Script = Rc<RefCell<[RawFrame; SLOT_COUNT]>>;

fn scripted_bank() -> (
    Script,
    ControllerBank<impl FnMut(usize) -> RawFrame, RecordingSink>,
) {
    let script: Script = Rc::new(RefCell::new([RawFrame::disconnected(); SLOT_COUNT]));
    let reader = Rc::clone(&script);
    let source = move |slot: usize| reader.borrow()[slot];
    (script, ControllerBank::new(source, RecordingSink::new()))
}

#[test]
fn test_button_walks_through_all_four_phases() {
    let (script, mut bank) = scripted_bank();
    let idle = RawFrame::idle();
    let held = RawFrame::idle().with_buttons(button_flags::A);

    let mut seen = Vec::new();
    for frame in [idle, held, held, idle, idle] {
        script.borrow_mut()[0] = frame;
        bank.update(FRAME);
        seen.push(bank.state(0, Control::A));
    }

    assert_eq!(
        seen,
        vec![
            EdgeState::Released,
            EdgeState::Down,
            EdgeState::Pressed,
            EdgeState::Up,
            EdgeState::Released,
        ]
    );
}

#[test]
fn test_queries_broaden_on_edge_frames() {
    let (script, mut bank) = scripted_bank();
    script.borrow_mut()[1] = RawFrame::idle().with_buttons(button_flags::START);
    bank.update(FRAME);

    assert!(bank.start(1, EdgeState::Down));
    assert!(bank.start(1, EdgeState::Pressed));
    assert!(!bank.start(1, EdgeState::Released));

    script.borrow_mut()[1] = RawFrame::idle();
    bank.update(FRAME);

    assert!(bank.start(1, EdgeState::Up));
    assert!(bank.start(1, EdgeState::Released));
    assert!(!bank.start(1, EdgeState::Pressed));
}

#[test]
fn test_rumble_stops_exactly_once() {
    let (script, mut bank) = scripted_bank();
    script.borrow_mut()[0] = RawFrame::idle();
    bank.update(FRAME);

    bank.set_rumble_on(0, 1.0, 0.0, 0.5);
    assert_eq!(bank.sink().last(), Some((0, Vibration::new(65535, 0))));
    assert!(bank.is_rumbling(0));

    bank.update(Duration::from_millis(300));
    assert!(bank.is_rumbling(0));
    assert_eq!(bank.sink().stops_for(0), 0);

    bank.update(Duration::from_millis(300));
    assert!(!bank.is_rumbling(0));
    assert_eq!(bank.sink().stops_for(0), 1);

    for _ in 0..10 {
        bank.update(FRAME);
    }
    assert_eq!(bank.sink().stops_for(0), 1);
}

#[test]
fn test_motor_strengths_are_clamped() {
    let (_script, mut bank) = scripted_bank();

    bank.set_rumble_on(2, 1.5, -0.5, 1.0);
    let clamped = bank.sink().last();
    bank.set_rumble_on(2, 1.0, 0.0, 1.0);

    assert_eq!(clamped, bank.sink().last());
    assert_eq!(clamped, Some((2, Vibration::new(65535, 0))));
}

#[test]
fn test_disconnect_freezes_state_until_reconnect() {
    let (script, mut bank) = scripted_bank();
    let held = RawFrame::idle()
        .with_buttons(button_flags::B)
        .with_left_stick(20000, 0);

    script.borrow_mut()[3] = held;
    bank.update(FRAME);
    bank.set_rumble_on(3, 0.5, 0.5, 0.1);

    script.borrow_mut()[3] = RawFrame::disconnected();
    for _ in 0..20 {
        bank.update(FRAME);
    }

    assert!(!bank.is_connected(3));
    assert_eq!(bank.state(3, Control::B), EdgeState::Down);
    assert_eq!(bank.get_left_analog_x(3), 20000);
    assert!(bank.is_rumbling(3));

    script.borrow_mut()[3] = held;
    bank.update(Duration::from_millis(200));

    assert!(bank.is_connected(3));
    assert_eq!(bank.state(3, Control::B), EdgeState::Pressed);
    assert!(!bank.is_rumbling(3));
}

#[test]
fn test_out_of_range_index_is_inert() {
    let (_script, mut bank) = scripted_bank();
    bank.update(FRAME);

    assert!(!bank.is_connected(SLOT_COUNT));
    assert!(!bank.a(SLOT_COUNT, EdgeState::Pressed));
    assert_eq!(bank.state(7, Control::Y), EdgeState::Released);
    assert_eq!(bank.get_right_trigger(9), 0);

    bank.set_rumble_on(SLOT_COUNT, 1.0, 1.0, 1.0);
    bank.set_rumble_off(SLOT_COUNT);
    assert!(bank.sink().is_empty());
}

#[test]
fn test_diamond_deadzone_on_amplitudes() {
    let script: Script = Rc::new(RefCell::new([RawFrame::disconnected(); SLOT_COUNT]));
    let reader = Rc::clone(&script);
    let deadzones = [Deadzones {
        trigger: 30,
        left_stick: 10000,
        right_stick: 10000,
    }; SLOT_COUNT];
    let mut bank = ControllerBank::with_deadzones(
        move |slot: usize| reader.borrow()[slot],
        RecordingSink::new(),
        deadzones,
    );

    script.borrow_mut()[0] = RawFrame::idle()
        .with_left_stick(6000, 5000)
        .with_right_stick(4000, 4000)
        .with_triggers(31, 30);
    bank.update(FRAME);

    // 6000 + 5000 exceeds 10000 even though neither component does alone
    assert_eq!(bank.get_left_analog_x(0), 6000);
    assert_eq!(bank.get_left_analog_y(0), 5000);
    assert!(!bank.left_analog_right(0, EdgeState::Pressed));

    assert_eq!(bank.get_right_analog_x(0), 0);
    assert_eq!(bank.get_right_analog_y(0), 0);

    assert_eq!(bank.get_left_trigger(0), 31);
    assert_eq!(bank.get_right_trigger(0), 0);
    assert!(bank.left_trigger(0, EdgeState::Down));
    assert!(!bank.right_trigger(0, EdgeState::Pressed));
}
