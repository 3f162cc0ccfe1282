//! Input interface
//!
//! The simulation reads discrete control signals from an [`InputSource`]
//! each tick; keyboard/touch wiring lives with the UI layer outside this
//! crate.

/// Discrete control signals for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    /// Steer left
    pub left: bool,
    /// Steer right
    pub right: bool,
    /// Climb
    pub up: bool,
    /// Dive
    pub down: bool,
    /// Boost forward speed
    pub boost: bool,
    /// Fire projectile
    pub fire: bool,
}

/// Source of player control signals
pub trait InputSource {
    /// Sample the current control state
    fn sample(&self) -> InputState;
}

/// Input source that never presses anything (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullInputSource;

impl InputSource for NullInputSource {
    fn sample(&self) -> InputState {
        InputState::default()
    }
}
