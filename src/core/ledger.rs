// This is the credit ledger - the heart of the registry.
// Every holder has one balance record with three counters, and every
// mutation must preserve available + used == total for that holder as
// well as the global match between minted credits and project totals.

use crate::core::access::AccessControl;
use crate::core::project::{project_key, ProjectRegistry};
use crate::error::{RegistryError, Result};
use crate::storage::RegistryStore;
use crate::utils::{deserialize, serialize};
use log::info;
use serde::{Deserialize, Serialize};
use sled::Transactional;

/// Per-holder credit accounting.
///
/// `total_credits` is lifetime credits received (minted or transferred in),
/// `available_credits` can still be transferred, sold or retired, and
/// `used_credits` have been permanently retired for offsetting.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct CreditBalance {
    total_credits: u64,
    available_credits: u64,
    used_credits: u64,
}

impl CreditBalance {
    pub fn get_total_credits(&self) -> u64 {
        self.total_credits
    }

    pub fn get_available_credits(&self) -> u64 {
        self.available_credits
    }

    pub fn get_used_credits(&self) -> u64 {
        self.used_credits
    }
}

pub struct CreditLedger {
    store: RegistryStore,
    access: AccessControl,
    projects: ProjectRegistry,
}

impl CreditLedger {
    pub fn new(store: RegistryStore) -> Result<CreditLedger> {
        let access = AccessControl::load(&store)?;
        let projects = ProjectRegistry::new(store.clone())?;
        Ok(CreditLedger {
            store,
            access,
            projects,
        })
    }

    // This is the sole minting path: credits enter the system only here,
    // tied to an active project, credited to the project owner
    pub fn issue_credits(&self, caller: &str, project_id: u64, amount: u64) -> Result<()> {
        self.access.ensure_admin(caller)?;
        if amount == 0 {
            return Err(RegistryError::InvalidAmount(
                "Credit amount must be positive".to_string(),
            ));
        }

        let _guard = self.store.lock_writer();

        let mut project = self.projects.get_project(project_id)?;
        if !project.is_active() {
            return Err(RegistryError::ProjectInactive(project_id));
        }

        let owner = project.get_owner().to_string();
        let balances_tree = self.store.balances_tree()?;
        let mut balance = self.read_balance(&balances_tree, &owner)?;

        balance.total_credits = balance.total_credits.checked_add(amount).ok_or_else(|| {
            RegistryError::InvalidAmount(format!("Credit balance overflow for {owner}"))
        })?;
        balance.available_credits += amount;
        project.add_issued_credits(amount);

        let projects_tree = self.store.projects_tree()?;
        let project_bytes = serialize(&project)?;
        let balance_bytes = serialize(&balance)?;
        let pkey = project_key(project_id);

        // Project total and owner balance must move together
        (&projects_tree, &balances_tree)
            .transaction(|(projects_tx, balances_tx)| {
                projects_tx.insert(&pkey[..], project_bytes.as_slice())?;
                balances_tx.insert(owner.as_bytes(), balance_bytes.as_slice())?;
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError| {
                RegistryError::Database(format!("Failed to issue credits: {e}"))
            })?;

        info!("Issued {amount} credits to project {project_id}, owner {owner}");
        Ok(())
    }

    // Self-service transfer: the caller is the `from` holder
    pub fn transfer_credits(&self, from: &str, to: &str, amount: u64) -> Result<()> {
        let _guard = self.store.lock_writer();
        self.apply_transfer_locked(from, to, amount)?;
        info!("Transferred {amount} credits from {from} to {to}");
        Ok(())
    }

    // Retirement for offsetting: credits leave the available pool but stay
    // in the lifetime total, so the accounting record is never destroyed
    pub fn use_credits(&self, holder: &str, amount: u64) -> Result<()> {
        if amount == 0 {
            return Err(RegistryError::InvalidAmount(
                "Credit amount must be positive".to_string(),
            ));
        }

        let _guard = self.store.lock_writer();

        let balances_tree = self.store.balances_tree()?;
        let mut balance = self.read_balance(&balances_tree, holder)?;
        if balance.available_credits < amount {
            return Err(RegistryError::InsufficientAvailableCredits {
                required: amount,
                available: balance.available_credits,
            });
        }

        balance.available_credits -= amount;
        balance.used_credits += amount;

        balances_tree
            .insert(holder.as_bytes(), serialize(&balance)?)
            .map_err(|e| RegistryError::Database(format!("Failed to use credits: {e}")))?;

        info!("Retired {amount} credits for {holder}");
        Ok(())
    }

    /// Zero-valued for holders that never participated
    pub fn get_credit_balance(&self, holder: &str) -> Result<CreditBalance> {
        let balances_tree = self.store.balances_tree()?;
        self.read_balance(&balances_tree, holder)
    }

    /// Sum of lifetime credits across all holders, for conservation audits.
    /// Always equals the sum of `carbon_credits` over all projects.
    pub fn total_credits_outstanding(&self) -> Result<u64> {
        let balances_tree = self.store.balances_tree()?;
        let mut total = 0u64;
        for item in balances_tree.iter() {
            let (_, value) = item
                .map_err(|e| RegistryError::Database(format!("Failed to iterate balances: {e}")))?;
            let balance: CreditBalance = deserialize(value.as_ref())?;
            total += balance.get_total_credits();
        }
        Ok(total)
    }

    // Shared credit-movement core for transfer and purchase. The caller
    // must hold the store's writer lock; all preconditions are checked
    // here before the single balances-tree transaction commits both sides.
    pub(crate) fn apply_transfer_locked(&self, from: &str, to: &str, amount: u64) -> Result<()> {
        if to.is_empty() {
            return Err(RegistryError::InvalidRecipient(to.to_string()));
        }
        if to == from {
            // A self-transfer would inflate the lifetime total
            return Err(RegistryError::InvalidRecipient(to.to_string()));
        }
        if amount == 0 {
            return Err(RegistryError::InvalidAmount(
                "Credit amount must be positive".to_string(),
            ));
        }

        let balances_tree = self.store.balances_tree()?;
        let mut from_balance = self.read_balance(&balances_tree, from)?;
        if from_balance.available_credits < amount {
            return Err(RegistryError::InsufficientAvailableCredits {
                required: amount,
                available: from_balance.available_credits,
            });
        }

        let mut to_balance = self.read_balance(&balances_tree, to)?;
        to_balance.total_credits = to_balance.total_credits.checked_add(amount).ok_or_else(
            || RegistryError::InvalidAmount(format!("Credit balance overflow for {to}")),
        )?;
        to_balance.available_credits += amount;
        from_balance.available_credits -= amount;

        let from_bytes = serialize(&from_balance)?;
        let to_bytes = serialize(&to_balance)?;

        balances_tree
            .transaction(|tx_db| {
                tx_db.insert(from.as_bytes(), from_bytes.as_slice())?;
                tx_db.insert(to.as_bytes(), to_bytes.as_slice())?;
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError| {
                RegistryError::Database(format!("Failed to transfer credits: {e}"))
            })?;

        Ok(())
    }

    fn read_balance(&self, balances_tree: &sled::Tree, holder: &str) -> Result<CreditBalance> {
        match balances_tree
            .get(holder.as_bytes())
            .map_err(|e| RegistryError::Database(format!("Failed to read balance: {e}")))?
        {
            Some(bytes) => deserialize(bytes.as_ref()),
            None => Ok(CreditBalance::default()),
        }
    }
}
