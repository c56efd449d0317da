//! Data storage and persistence
//!
//! This module manages data persistence for the registry: the sled-backed
//! store holding projects, sensor readings, credit balances and registry
//! metadata, plus the native value bank the purchase flow settles through.

pub mod bank;
pub mod registry_store;

pub use bank::NativeBank;
pub use registry_store::{RegistryStore, PROJECT_COUNT_KEY, READING_COUNT_KEY};
