//! Host frame loop
//!
//! Drives a [`ControllerBank`] at the configured frame rate, logs every
//! button edge and plays the configured rumble: A going down starts it,
//! Back going down stops it.

use std::future::Future;
use std::time::Instant;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::{AppConfig, RumbleConfig};
use crate::input::gamepad::{
    Control, ControllerBank, EdgeState, FrameSource, VibrationSink, SLOT_COUNT,
};

/// Poll the bank until `shutdown` resolves or `max_frames` updates have run
///
/// Returns the number of updates performed.
pub async fn run_loop<S, V>(
    bank: &mut ControllerBank<S, V>,
    config: &AppConfig,
    max_frames: Option<u64>,
    shutdown: impl Future<Output = ()>,
) -> u64
where
    S: FrameSource,
    V: VibrationSink,
{
    let mut ticker = interval(config.frame_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Polling {} slots at {} Hz", SLOT_COUNT, config.frame_rate_hz);

    tokio::pin!(shutdown);
    let mut last = Instant::now();
    let mut frames: u64 = 0;

    loop {
        if max_frames.is_some_and(|max| frames >= max) {
            debug!("Frame limit {} reached", frames);
            break;
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let now = Instant::now();
                bank.update(now.duration_since(last));
                last = now;

                for index in 0..SLOT_COUNT {
                    handle_slot_edges(bank, index, &config.rumble);
                }

                frames += 1;
            }
        }
    }

    frames
}

/// React to this frame's edges on one slot
pub fn handle_slot_edges<S, V>(bank: &mut ControllerBank<S, V>, index: usize, rumble: &RumbleConfig)
where
    S: FrameSource,
    V: VibrationSink,
{
    if !bank.is_connected(index) {
        return;
    }

    for control in Control::ALL {
        match bank.state(index, control) {
            EdgeState::Down => info!("🎮 Slot {} {} down", index, control),
            EdgeState::Up => info!("🎮 Slot {} {} up", index, control),
            _ => {},
        }
    }

    if rumble.enabled && bank.a(index, EdgeState::Down) {
        bank.set_rumble_on(index, rumble.left, rumble.right, rumble.seconds);
        debug!("Rumble started on slot {} for {}s", index, rumble.seconds);
    }
    if bank.back(index, EdgeState::Down) && bank.is_rumbling(index) {
        bank.set_rumble_off(index);
        debug!("Rumble stopped on slot {}", index);
    }
}

/// Stop every running rumble; used on exit
pub fn stop_all_rumble<S, V>(bank: &mut ControllerBank<S, V>)
where
    S: FrameSource,
    V: VibrationSink,
{
    for index in 0..SLOT_COUNT {
        if bank.is_rumbling(index) {
            bank.set_rumble_off(index);
        }
    }
}
