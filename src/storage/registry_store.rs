// This is the persistence layer for the registry - every record lives here
// I'm using Sled as an embedded database, with one named tree per record
// family, so each operation can commit all of its writes in one transaction

use crate::core::monetary::DEFAULT_PRICE_PER_CREDIT;
use crate::error::{RegistryError, Result};
use crate::utils::{deserialize, serialize};
use log::info;
use sled::{Db, Tree};
use std::env::current_dir;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

// I use these constants to organize my database storage
const PROJECTS_TREE: &str = "projects"; // Tree for project records + project counter
const READINGS_TREE: &str = "sensor_readings"; // Tree for readings, per-project index + counter
const BALANCES_TREE: &str = "credit_balances"; // Tree for per-holder credit balances
const META_TREE: &str = "registry_meta"; // Tree for the admin identity and credit price
const VALUE_TREE: &str = "value_accounts"; // Tree for native value balances (the bank)

const ADMIN_ADDRESS_KEY: &str = "admin_address";
const PRICE_PER_CREDIT_KEY: &str = "price_per_credit";

/// Counter key owned by the projects tree (ids issued so far)
pub const PROJECT_COUNT_KEY: &str = "project_count";
/// Counter key owned by the readings tree (ids issued so far)
pub const READING_COUNT_KEY: &str = "reading_count";

// This is the shared store handle every registry component wraps.
// The write lock serializes mutating operations: there is one exclusive
// writer over the entire state at a time, and operations that touch two
// balance records at once rely on it.
#[derive(Clone)]
pub struct RegistryStore {
    db: Db,
    db_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl RegistryStore {
    // When I want to initialize a brand new registry with a fixed admin
    pub fn create(admin_address: &str) -> Result<RegistryStore> {
        Self::create_with_path(admin_address, &Self::default_db_path()?)
    }

    // When I want to open an existing registry from the default location
    pub fn open() -> Result<RegistryStore> {
        Self::open_with_path(&Self::default_db_path()?)
    }

    // I use this to get the default database path from the global config
    fn default_db_path() -> Result<String> {
        let data_dir = crate::config::GLOBAL_CONFIG.get_data_dir();
        Ok(current_dir()?
            .join(data_dir)
            .join("registry")
            .to_string_lossy()
            .to_string())
    }

    // This is where I actually create a new registry database
    // If the database already holds a registry, the recorded admin wins -
    // the admin identity is fixed at initialization and never reassigned
    pub fn create_with_path(admin_address: &str, db_path: &str) -> Result<RegistryStore> {
        if admin_address.is_empty() {
            return Err(RegistryError::Config(
                "Admin address must not be empty".to_string(),
            ));
        }

        let path = PathBuf::from(db_path);
        let db = sled::open(&path)
            .map_err(|e| RegistryError::Database(format!("Failed to open database: {e}")))?;
        let meta_tree = db
            .open_tree(META_TREE)
            .map_err(|e| RegistryError::Database(format!("Failed to open meta tree: {e}")))?;

        let existing = meta_tree
            .get(ADMIN_ADDRESS_KEY)
            .map_err(|e| RegistryError::Database(format!("Failed to get admin address: {e}")))?;

        if let Some(bytes) = existing {
            let recorded = String::from_utf8(bytes.to_vec())
                .map_err(|e| RegistryError::Database(format!("Invalid admin address: {e}")))?;
            info!("Registry already initialized, admin: {recorded}");
        } else {
            info!("Initializing registry, admin: {admin_address}");
            let price_bytes = serialize(&DEFAULT_PRICE_PER_CREDIT)?;
            meta_tree
                .transaction(|tx_db| {
                    tx_db.insert(ADMIN_ADDRESS_KEY, admin_address.as_bytes())?;
                    tx_db.insert(PRICE_PER_CREDIT_KEY, price_bytes.as_slice())?;
                    Ok(())
                })
                .map_err(|e: sled::transaction::TransactionError| {
                    RegistryError::Database(format!("Failed to initialize registry: {e}"))
                })?;
        }

        Ok(RegistryStore {
            db,
            db_path: path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn open_with_path(db_path: &str) -> Result<RegistryStore> {
        let path = PathBuf::from(db_path);
        let db = sled::open(&path)
            .map_err(|e| RegistryError::Database(format!("Failed to open database: {e}")))?;
        let meta_tree = db
            .open_tree(META_TREE)
            .map_err(|e| RegistryError::Database(format!("Failed to open meta tree: {e}")))?;

        meta_tree
            .get(ADMIN_ADDRESS_KEY)
            .map_err(|e| RegistryError::Database(format!("Failed to get admin address: {e}")))?
            .ok_or_else(|| {
                RegistryError::Config("No existing registry found. Create one first.".to_string())
            })?;

        Ok(RegistryStore {
            db,
            db_path: path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn get_db_path(&self) -> &PathBuf {
        &self.db_path
    }

    // Every mutating operation holds this guard for its full
    // validate-then-commit span, so operations never interleave
    pub fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .expect("Failed to acquire registry write lock - this should never happen")
    }

    pub fn projects_tree(&self) -> Result<Tree> {
        self.db
            .open_tree(PROJECTS_TREE)
            .map_err(|e| RegistryError::Database(format!("Failed to open projects tree: {e}")))
    }

    pub fn readings_tree(&self) -> Result<Tree> {
        self.db
            .open_tree(READINGS_TREE)
            .map_err(|e| RegistryError::Database(format!("Failed to open readings tree: {e}")))
    }

    pub fn balances_tree(&self) -> Result<Tree> {
        self.db
            .open_tree(BALANCES_TREE)
            .map_err(|e| RegistryError::Database(format!("Failed to open balances tree: {e}")))
    }

    pub fn value_tree(&self) -> Result<Tree> {
        self.db
            .open_tree(VALUE_TREE)
            .map_err(|e| RegistryError::Database(format!("Failed to open value tree: {e}")))
    }

    fn meta_tree(&self) -> Result<Tree> {
        self.db
            .open_tree(META_TREE)
            .map_err(|e| RegistryError::Database(format!("Failed to open meta tree: {e}")))
    }

    // The admin identity recorded when the registry was created
    pub fn admin_address(&self) -> Result<String> {
        let bytes = self
            .meta_tree()?
            .get(ADMIN_ADDRESS_KEY)
            .map_err(|e| RegistryError::Database(format!("Failed to get admin address: {e}")))?
            .ok_or_else(|| {
                RegistryError::Config("No existing registry found. Create one first.".to_string())
            })?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| RegistryError::Database(format!("Invalid admin address: {e}")))
    }

    pub fn price_per_credit(&self) -> Result<u128> {
        let bytes = self
            .meta_tree()?
            .get(PRICE_PER_CREDIT_KEY)
            .map_err(|e| RegistryError::Database(format!("Failed to get credit price: {e}")))?
            .ok_or_else(|| {
                RegistryError::Config("No existing registry found. Create one first.".to_string())
            })?;
        deserialize(bytes.as_ref())
    }

    pub fn set_price_per_credit(&self, new_price: u128) -> Result<()> {
        let price_bytes = serialize(&new_price)?;
        self.meta_tree()?
            .insert(PRICE_PER_CREDIT_KEY, price_bytes)
            .map_err(|e| RegistryError::Database(format!("Failed to set credit price: {e}")))?;
        Ok(())
    }

    // I keep each sequential id counter inside the tree it governs,
    // so record + counter always commit in the same transaction
    pub fn counter(&self, tree: &Tree, key: &str) -> Result<u64> {
        match tree
            .get(key)
            .map_err(|e| RegistryError::Database(format!("Failed to read counter {key}: {e}")))?
        {
            Some(bytes) => deserialize(bytes.as_ref()),
            None => Ok(0),
        }
    }
}
