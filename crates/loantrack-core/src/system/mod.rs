//! # System Module
//!
//! The stage list and the tracker that turns a current stage into a
//! display list.
//!
//! Both are pure and deterministic; nothing here performs I/O.

mod stage;
mod tracker;

pub use stage::*;
pub use tracker::*;
