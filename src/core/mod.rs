//! Core registry functionality
//!
//! This module contains the fundamental registry components: access
//! control, project records, the sensor data log, the credit ledger,
//! and the marketplace.

pub mod access;
pub mod ledger;
pub mod market;
pub mod monetary;
pub mod project;
pub mod sensor;

pub use access::AccessControl;
pub use ledger::{CreditBalance, CreditLedger};
pub use market::{Marketplace, PurchaseReceipt, ValueTransfer};
pub use monetary::{DEFAULT_PRICE_PER_CREDIT, UNITS_PER_TOKEN};
pub use project::{Project, ProjectRegistry};
pub use sensor::{SensorDataLog, SensorReading};
