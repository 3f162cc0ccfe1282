//! Foundation module - core utilities shared by every subsystem
//!
//! - Math types and transform helpers
//! - Frame timing

pub mod math;
pub mod time;
