//! Test utilities for registry testing

use crate::core::market::ValueTransfer;
use crate::core::{CreditLedger, Marketplace, ProjectRegistry, SensorDataLog};
use crate::error::{RegistryError, Result};
use crate::storage::RegistryStore;
use std::collections::HashMap;
use std::sync::RwLock;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_temp_dir() -> Result<TempDir> {
    tempfile::tempdir().map_err(|e| RegistryError::Io(e.to_string()))
}

/// Create a test registry store with temporary storage
pub fn create_test_store(admin: &str) -> Result<(RegistryStore, TempDir)> {
    let temp_dir = create_temp_dir()?;
    let db_path = temp_dir.path().join("test_registry");

    let store = RegistryStore::create_with_path(admin, db_path.to_str().unwrap())?;
    Ok((store, temp_dir))
}

/// Every registry component over one shared store
pub struct TestRegistry {
    pub projects: ProjectRegistry,
    pub sensors: SensorDataLog,
    pub ledger: CreditLedger,
    pub market: Marketplace,
}

/// Create all registry components over a fresh temporary store
pub fn create_test_registry(admin: &str) -> Result<(TestRegistry, TempDir)> {
    let (store, temp_dir) = create_test_store(admin)?;
    let registry = TestRegistry {
        projects: ProjectRegistry::new(store.clone())?,
        sensors: SensorDataLog::new(store.clone())?,
        ledger: CreditLedger::new(store.clone())?,
        market: Marketplace::new(store)?,
    };
    Ok((registry, temp_dir))
}

/// ( K -> account address, V -> native value balance )
///
/// In-memory stand-in for the external value environment, so unit tests
/// can watch exactly what the marketplace pays out
pub struct TestBank {
    inner: RwLock<HashMap<String, u128>>,
}

impl Default for TestBank {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBank {
    pub fn new() -> TestBank {
        TestBank {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn balance_of(&self, address: &str) -> u128 {
        match self.inner.read() {
            Ok(accounts) => accounts.get(address).copied().unwrap_or(0),
            Err(_) => {
                log::error!("Failed to acquire read lock on test bank");
                0
            }
        }
    }
}

impl ValueTransfer for TestBank {
    fn transfer(&self, to: &str, amount: u128) -> Result<()> {
        match self.inner.write() {
            Ok(mut accounts) => {
                *accounts.entry(to.to_string()).or_insert(0) += amount;
                Ok(())
            }
            Err(_) => Err(RegistryError::Database(
                "Failed to acquire write lock on test bank".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_registry() {
        let (registry, _temp_dir) = create_test_registry("admin").unwrap();
        assert_eq!(registry.projects.total_projects().unwrap(), 0);
        assert_eq!(registry.sensors.total_sensor_data().unwrap(), 0);
    }

    #[test]
    fn test_test_bank_accumulates() {
        let bank = TestBank::new();
        bank.transfer("seller", 100).unwrap();
        bank.transfer("seller", 50).unwrap();
        assert_eq!(bank.balance_of("seller"), 150);
        assert_eq!(bank.balance_of("buyer"), 0);
    }
}
