//! Utility functions and helpers
//!
//! This module contains the bincode serialization layer and the
//! timestamp helper used when recording sensor readings.

pub mod clock;
pub mod serialization;

pub use clock::current_timestamp;
pub use serialization::{deserialize, serialize};
