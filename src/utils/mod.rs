//! Utility Module
//!
//! - [`time`]: frame timing for driving animation from a render loop

pub mod time;

pub use time::Timer;
