//! Coarse-locked bank for hosts that query from more than one thread
//!
//! Per-slot state is not designed for torn reads, so one lock covers the
//! whole bank: `update`, every query and every rumble command.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::bank::ControllerBank;
use super::frame::{FrameSource, VibrationSink};

/// Cloneable handle to a bank behind a single mutex
pub struct SharedControllerBank<S, V> {
    inner: Arc<Mutex<ControllerBank<S, V>>>,
}

impl<S, V> Clone for SharedControllerBank<S, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<S, V> SharedControllerBank<S, V>
where
    S: FrameSource,
    V: VibrationSink,
{
    pub fn new(bank: ControllerBank<S, V>) -> Self {
        Self { inner: Arc::new(Mutex::new(bank)) }
    }

    /// Poll every slot once under the lock
    pub fn update(&self, elapsed: Duration) {
        self.inner.lock().update(elapsed);
    }

    /// Run several queries against one consistent snapshot
    pub fn with<R>(&self, f: impl FnOnce(&ControllerBank<S, V>) -> R) -> R {
        let bank = self.inner.lock();
        f(&bank)
    }

    /// Mutable access for commands that are not wrapped below
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut ControllerBank<S, V>) -> R) -> R {
        let mut bank = self.inner.lock();
        f(&mut bank)
    }

    pub fn is_connected(&self, index: usize) -> bool {
        self.inner.lock().is_connected(index)
    }

    pub fn set_rumble_on(&self, index: usize, left: f32, right: f32, seconds: f32) {
        self.inner.lock().set_rumble_on(index, left, right, seconds);
    }

    pub fn set_rumble_off(&self, index: usize) {
        self.inner.lock().set_rumble_off(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::gamepad::control::button_flags;
    use crate::input::gamepad::edge::EdgeState;
    use crate::input::gamepad::frame::{RawFrame, RecordingSink};
    use std::thread;

    #[test]
    fn test_shared_bank_across_threads() {
        let source = |_slot: usize| RawFrame::idle().with_buttons(button_flags::Y);
        let shared = SharedControllerBank::new(ControllerBank::new(source, RecordingSink::new()));

        let updater = shared.clone();
        thread::spawn(move || {
            updater.update(Duration::from_millis(16));
            updater.set_rumble_on(2, 0.5, 0.5, 1.0);
        })
        .join()
        .unwrap();

        assert!(shared.is_connected(0));
        let (down, rumbling) = shared.with(|bank| (bank.y(3, EdgeState::Down), bank.is_rumbling(2)));
        assert!(down);
        assert!(rumbling);

        shared.set_rumble_off(2);
        assert_eq!(shared.with(|bank| bank.sink().stops_for(2)), 1);
        shared.with_mut(|bank| bank.sink_mut().clear());
        assert!(shared.with(|bank| bank.sink().is_empty()));
    }
}
