// Native value accounts backing the purchase flow.
// The registry itself only ever moves value it already holds: the caller
// collects the attached payment with `withdraw` before a purchase, and the
// marketplace settles through the `ValueTransfer` seam afterwards.

use crate::core::market::ValueTransfer;
use crate::error::{RegistryError, Result};
use crate::storage::RegistryStore;
use crate::utils::{deserialize, serialize};
use log::info;

pub struct NativeBank {
    store: RegistryStore,
}

impl NativeBank {
    pub fn new(store: RegistryStore) -> NativeBank {
        NativeBank { store }
    }

    pub fn balance_of(&self, address: &str) -> Result<u128> {
        let tree = self.store.value_tree()?;
        match tree
            .get(address.as_bytes())
            .map_err(|e| RegistryError::Database(format!("Failed to read value account: {e}")))?
        {
            Some(bytes) => deserialize(bytes.as_ref()),
            None => Ok(0),
        }
    }

    /// Credit an account. Also serves as the demo faucet for the CLI.
    pub fn deposit(&self, to: &str, amount: u128) -> Result<()> {
        let _guard = self.store.lock_writer();

        let balance = self.balance_of(to)?;
        let updated = balance.checked_add(amount).ok_or_else(|| {
            RegistryError::InvalidAmount(format!("Value balance overflow for {to}"))
        })?;

        let tree = self.store.value_tree()?;
        tree.insert(to.as_bytes(), serialize(&updated)?)
            .map_err(|e| RegistryError::Database(format!("Failed to update value account: {e}")))?;
        Ok(())
    }

    /// Collect attached value from an account before an operation spends it
    pub fn withdraw(&self, from: &str, amount: u128) -> Result<()> {
        let _guard = self.store.lock_writer();

        let balance = self.balance_of(from)?;
        if balance < amount {
            return Err(RegistryError::InsufficientPayment {
                required: amount,
                provided: balance,
            });
        }

        let tree = self.store.value_tree()?;
        tree.insert(from.as_bytes(), serialize(&(balance - amount))?)
            .map_err(|e| RegistryError::Database(format!("Failed to update value account: {e}")))?;
        Ok(())
    }
}

impl ValueTransfer for NativeBank {
    fn transfer(&self, to: &str, amount: u128) -> Result<()> {
        self.deposit(to, amount)?;
        info!("Value transfer: {amount} units to {to}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_bank() -> (NativeBank, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("registry");
        let store = RegistryStore::create_with_path("admin", db_path.to_str().unwrap()).unwrap();
        (NativeBank::new(store), temp_dir)
    }

    #[test]
    fn test_deposit_and_withdraw() {
        let (bank, _temp_dir) = test_bank();

        bank.deposit("buyer", 1_000).unwrap();
        assert_eq!(bank.balance_of("buyer").unwrap(), 1_000);

        bank.withdraw("buyer", 400).unwrap();
        assert_eq!(bank.balance_of("buyer").unwrap(), 600);
    }

    #[test]
    fn test_withdraw_rejects_overdraft() {
        let (bank, _temp_dir) = test_bank();

        bank.deposit("buyer", 100).unwrap();
        let result = bank.withdraw("buyer", 101);
        assert!(matches!(
            result,
            Err(RegistryError::InsufficientPayment {
                required: 101,
                provided: 100
            })
        ));
        // The failed withdraw must not touch the balance
        assert_eq!(bank.balance_of("buyer").unwrap(), 100);
    }

    #[test]
    fn test_unknown_account_reads_zero() {
        let (bank, _temp_dir) = test_bank();
        assert_eq!(bank.balance_of("nobody").unwrap(), 0);
    }
}
