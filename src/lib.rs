//! # Carbon Registry - My Carbon Credit Registry Implementation
//!
//! This is my registry for conservation projects, IoT sensor data, and
//! carbon credit accounting. When I come back to this code, here's what
//! I need to remember:
//!
//! ## What I Built
//! - **Project Registry**: Conservation project records with a one-way
//!   active/inactive lifecycle
//! - **Sensor Data Log**: Append-only environmental readings, indexed per
//!   project in insertion order
//! - **Credit Ledger**: Per-holder total/available/used accounting with
//!   issuance, transfer and retirement
//! - **Marketplace**: Priced purchases with exact refund of overpayment,
//!   settling through an external value seam
//! - **Single Admin**: One identity fixed at initialization gates every
//!   privileged operation
//!
//! ## How I Organized My Code
//! - `core/`: The heart of the registry (access, projects, sensors, ledger, market)
//! - `storage/`: Sled persistence and the native value bank
//! - `config/`: Configuration management
//! - `utils/`: Serialization helpers and the clock
//! - `cli/`: Command-line interface for all registry operations
//!
//! ## Key Design Decisions I Made
//! - Used Sled embedded database for simplicity and reliability
//! - One exclusive writer lock so every operation is all-or-nothing
//! - Sequential ids owned by the tree they live in, bumped in the same
//!   transaction as the record they number
//! - Credits commit before any value moves in a purchase, so nothing
//!   reentrant can see a half-applied state
//!
//! Remember: every mutation must keep available + used == total for each
//! holder, and minted credits equal to the sum over all projects.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    AccessControl, CreditBalance, CreditLedger, Marketplace, Project, ProjectRegistry,
    PurchaseReceipt, SensorDataLog, SensorReading, ValueTransfer, DEFAULT_PRICE_PER_CREDIT,
    UNITS_PER_TOKEN,
};
pub use error::{RegistryError, Result};
pub use storage::{NativeBank, RegistryStore};
pub use utils::{current_timestamp, deserialize, serialize};
