//! Four-phase edge state for buttons and button-like controls
//!
//! A plain "is pressed" boolean loses the frame on which a button went down.
//! [`EdgeState`] keeps that information: every contiguous run of active
//! samples produces exactly one `Down`, then `Pressed` while held, exactly
//! one `Up` on release, then `Released` while idle.

use serde::{Deserialize, Serialize};

/// Phase of a logical control on the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeState {
    /// Became active this frame
    Down,
    /// Active, and was already active last frame
    Pressed,
    /// Became inactive this frame
    Up,
    /// Inactive, and was already inactive last frame
    #[default]
    Released,
}

impl EdgeState {
    /// Advance the state machine by one raw sample
    pub fn advance(self, raw_active: bool) -> Self {
        match (self, raw_active) {
            (EdgeState::Released | EdgeState::Up, true) => EdgeState::Down,
            (EdgeState::Down | EdgeState::Pressed, true) => EdgeState::Pressed,
            (EdgeState::Down | EdgeState::Pressed, false) => EdgeState::Up,
            (EdgeState::Released | EdgeState::Up, false) => EdgeState::Released,
        }
    }

    /// Check the current phase against a queried phase
    ///
    /// `Pressed` means "held", so it also matches `Down`. `Released` means
    /// "not held", so it also matches `Up`. `Down` and `Up` only match the
    /// exact edge frame.
    pub fn matches(self, query: EdgeState) -> bool {
        match query {
            EdgeState::Pressed => matches!(self, EdgeState::Pressed | EdgeState::Down),
            EdgeState::Released => matches!(self, EdgeState::Released | EdgeState::Up),
            EdgeState::Down | EdgeState::Up => self == query,
        }
    }

    /// True for `Down` and `Pressed`
    pub fn is_active(self) -> bool {
        self.matches(EdgeState::Pressed)
    }

    /// True for `Down` and `Up`
    pub fn is_edge(self) -> bool {
        matches!(self, EdgeState::Down | EdgeState::Up)
    }
}

/// Free-function form of [`EdgeState::advance`]
pub fn advance(previous: EdgeState, raw_active: bool) -> EdgeState {
    previous.advance(raw_active)
}
