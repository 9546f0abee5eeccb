//! Gamepad diagnostics tool for troubleshooting detection issues

use std::time::Duration;
use tracing::info;

use super::bank::ControllerBank;
use super::control::Control;
use super::edge::EdgeState;
use super::frame::{FrameSource, VibrationSink};
use super::slot::ControllerSlot;

/// Controls currently held in a slot, by short name
pub fn held_controls(slot: &ControllerSlot) -> Vec<&'static str> {
    Control::ALL
        .iter()
        .filter(|c| slot.matches(**c, EdgeState::Pressed))
        .map(|c| c.name())
        .collect()
}

/// Print detailed information about every slot
///
/// Polls the bank once (with zero elapsed time, so running rumbles are not
/// advanced) and logs connectivity, filtered axes and held controls.
pub fn print_gamepad_diagnostics<S, V>(bank: &mut ControllerBank<S, V>)
where
    S: FrameSource,
    V: VibrationSink,
{
    info!("=== Gamepad Diagnostics ===");
    info!("Platform: {}", std::env::consts::OS);

    bank.update(Duration::ZERO);

    let connected = bank.connected_slots().count();
    if connected == 0 {
        info!("⚠️  No gamepads detected");
        info!("   Please check:");
        info!("   - Gamepad is connected (USB or Bluetooth paired)");
        info!("   - Drivers are installed");
        info!("   - The selected backend supports this controller");
    } else {
        info!("✅ Found {} gamepad(s):", connected);
    }
    info!("");

    for slot in bank.slots() {
        let dz = slot.deadzones();
        info!("📋 Slot {} ({})", slot.slot_index(), slot.control_id_prefix());
        info!("   Connected: {}", slot.is_connected());
        info!(
            "   Deadzones: trigger={} left_stick={} right_stick={}",
            dz.trigger, dz.left_stick, dz.right_stick
        );

        if !slot.is_connected() {
            info!("");
            continue;
        }

        info!("   🕹️  Axes (deadzone applied):");
        info!("      left:    x={:>6} y={:>6}", slot.left_analog_x(), slot.left_analog_y());
        info!("      right:   x={:>6} y={:>6}", slot.right_analog_x(), slot.right_analog_y());
        info!("      triggers: l={:>3} r={:>3}", slot.left_trigger(), slot.right_trigger());

        let ((lx, ly), (rx, ry)) = slot.raw_sticks();
        info!("      raw:     left=({}, {}) right=({}, {})", lx, ly, rx, ry);

        let held = held_controls(slot);
        if held.is_empty() {
            info!("   🎮 (no controls currently held)");
        } else {
            info!("   🎮 Held: {}", held.join(", "));
        }
        info!("");
    }

    info!("=== End Diagnostics ===");
}
