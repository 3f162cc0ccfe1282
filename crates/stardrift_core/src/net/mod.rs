//! Network layer
//!
//! - Wire protocol shared with `stardrift_server`
//! - Client-side reconciliation of server broadcasts
//! - Transport seam with the single-player no-op stub

pub mod local;
pub mod protocol;
pub mod reconcile;
