// Pricing and the purchase flow - the most delicate part of the registry,
// because one operation moves two different resources: credits inside the
// ledger and native value outside it. Credits commit first; value moves
// only against fully-updated balances.

use crate::core::access::AccessControl;
use crate::core::ledger::CreditLedger;
use crate::error::{RegistryError, Result};
use crate::storage::RegistryStore;
use log::info;

/// Seam to the external value environment.
///
/// The marketplace only ever forwards value it already holds (the attached
/// payment), so implementations move funds without a sufficiency check on
/// the registry's side.
pub trait ValueTransfer {
    fn transfer(&self, to: &str, amount: u128) -> Result<()>;
}

/// Outcome of a purchase: what the buyer actually paid and got back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseReceipt {
    pub cost: u128,
    pub refund: u128,
}

pub struct Marketplace {
    store: RegistryStore,
    access: AccessControl,
    ledger: CreditLedger,
}

impl Marketplace {
    pub fn new(store: RegistryStore) -> Result<Marketplace> {
        let access = AccessControl::load(&store)?;
        let ledger = CreditLedger::new(store.clone())?;
        Ok(Marketplace {
            store,
            access,
            ledger,
        })
    }

    pub fn credit_price(&self) -> Result<u128> {
        self.store.price_per_credit()
    }

    pub fn set_credit_price(&self, caller: &str, new_price: u128) -> Result<()> {
        self.access.ensure_admin(caller)?;

        let _guard = self.store.lock_writer();
        self.store.set_price_per_credit(new_price)?;
        info!("Credit price set to {new_price} units");
        Ok(())
    }

    // Currency-denominated purchase with exact refund of overpayment.
    // `paid_value` is the value attached to the call; the caller has
    // already collected it from the buyer (see `NativeBank::withdraw`).
    pub fn buy_credits(
        &self,
        buyer: &str,
        seller: &str,
        amount: u64,
        paid_value: u128,
        bank: &dyn ValueTransfer,
    ) -> Result<PurchaseReceipt> {
        if buyer.is_empty() {
            return Err(RegistryError::InvalidRecipient(buyer.to_string()));
        }
        if amount == 0 {
            return Err(RegistryError::InvalidAmount(
                "Credit amount must be positive".to_string(),
            ));
        }

        let (cost, refund) = {
            let _guard = self.store.lock_writer();

            let price = self.store.price_per_credit()?;
            let cost = price.checked_mul(amount as u128).ok_or_else(|| {
                RegistryError::InvalidAmount("Purchase cost overflow".to_string())
            })?;
            if paid_value < cost {
                return Err(RegistryError::InsufficientPayment {
                    required: cost,
                    provided: paid_value,
                });
            }

            // Credits move exactly as a plain transfer would, and the
            // commit happens while the writer lock is still held
            self.ledger.apply_transfer_locked(seller, buyer, amount)?;

            (cost, paid_value - cost)
        };

        // Ledger state is fully committed before any external value moves,
        // so a reentrant call through the bank observes only final balances
        if cost > 0 {
            bank.transfer(seller, cost)?;
        }
        if refund > 0 {
            bank.transfer(buyer, refund)?;
        }

        info!(
            "{buyer} bought {amount} credits from {seller} for {cost} units \
             (refunded {refund})"
        );
        Ok(PurchaseReceipt { cost, refund })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::monetary::{DEFAULT_PRICE_PER_CREDIT, UNITS_PER_TOKEN};
    use crate::core::project::ProjectRegistry;
    use crate::testnet::test_utils::TestBank;
    use tempfile::tempdir;

    fn test_market() -> (Marketplace, CreditLedger, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("registry");
        let store = RegistryStore::create_with_path("admin", db_path.to_str().unwrap()).unwrap();
        let projects = ProjectRegistry::new(store.clone()).unwrap();
        projects
            .register_project("admin", "Test Project", "Test Location", "seller", 100)
            .unwrap();
        let ledger = CreditLedger::new(store.clone()).unwrap();
        ledger.issue_credits("admin", 1, 1000).unwrap();
        (Marketplace::new(store).unwrap(), ledger, temp_dir)
    }

    #[test]
    fn test_default_price() {
        let (market, _ledger, _temp_dir) = test_market();
        assert_eq!(market.credit_price().unwrap(), DEFAULT_PRICE_PER_CREDIT);
    }

    #[test]
    fn test_set_price_requires_admin() {
        let (market, _ledger, _temp_dir) = test_market();

        market.set_credit_price("admin", 2 * DEFAULT_PRICE_PER_CREDIT).unwrap();
        assert_eq!(market.credit_price().unwrap(), 2 * DEFAULT_PRICE_PER_CREDIT);

        let result = market.set_credit_price("buyer", 1);
        assert!(matches!(result, Err(RegistryError::NotAuthorized(_))));
        assert_eq!(market.credit_price().unwrap(), 2 * DEFAULT_PRICE_PER_CREDIT);
    }

    #[test]
    fn test_buy_credits_with_exact_refund() {
        let (market, ledger, _temp_dir) = test_market();
        let bank = TestBank::new();

        // 100 credits at 0.01 token each, 1.5 tokens attached
        let paid = UNITS_PER_TOKEN + UNITS_PER_TOKEN / 2;
        let receipt = market
            .buy_credits("buyer", "seller", 100, paid, &bank)
            .unwrap();

        assert_eq!(receipt.cost, UNITS_PER_TOKEN);
        assert_eq!(receipt.refund, UNITS_PER_TOKEN / 2);
        assert_eq!(bank.balance_of("seller"), UNITS_PER_TOKEN);
        assert_eq!(bank.balance_of("buyer"), UNITS_PER_TOKEN / 2);

        let buyer = ledger.get_credit_balance("buyer").unwrap();
        let seller = ledger.get_credit_balance("seller").unwrap();
        assert_eq!(buyer.get_total_credits(), 100);
        assert_eq!(buyer.get_available_credits(), 100);
        assert_eq!(seller.get_available_credits(), 900);
        assert_eq!(seller.get_total_credits(), 1000);
    }

    #[test]
    fn test_underpayment_moves_nothing() {
        let (market, ledger, _temp_dir) = test_market();
        let bank = TestBank::new();

        let cost = DEFAULT_PRICE_PER_CREDIT * 100;
        let result = market.buy_credits("buyer", "seller", 100, cost / 2, &bank);
        assert!(matches!(
            result,
            Err(RegistryError::InsufficientPayment { .. })
        ));

        assert_eq!(bank.balance_of("seller"), 0);
        assert_eq!(bank.balance_of("buyer"), 0);
        assert_eq!(
            ledger
                .get_credit_balance("seller")
                .unwrap()
                .get_available_credits(),
            1000
        );
        assert_eq!(
            ledger.get_credit_balance("buyer").unwrap().get_total_credits(),
            0
        );
    }

    #[test]
    fn test_buy_more_than_seller_has() {
        let (market, _ledger, _temp_dir) = test_market();
        let bank = TestBank::new();

        let paid = DEFAULT_PRICE_PER_CREDIT * 1500;
        let result = market.buy_credits("buyer", "seller", 1500, paid, &bank);
        assert!(matches!(
            result,
            Err(RegistryError::InsufficientAvailableCredits {
                required: 1500,
                available: 1000
            })
        ));
        assert_eq!(bank.balance_of("seller"), 0);
    }

    #[test]
    fn test_buy_zero_credits() {
        let (market, _ledger, _temp_dir) = test_market();
        let bank = TestBank::new();

        let result = market.buy_credits("buyer", "seller", 0, 0, &bank);
        assert!(matches!(result, Err(RegistryError::InvalidAmount(_))));
    }

    #[test]
    fn test_buy_at_zero_price_refunds_everything() {
        let (market, ledger, _temp_dir) = test_market();
        let bank = TestBank::new();

        market.set_credit_price("admin", 0).unwrap();
        let receipt = market
            .buy_credits("buyer", "seller", 50, UNITS_PER_TOKEN, &bank)
            .unwrap();

        assert_eq!(receipt.cost, 0);
        assert_eq!(receipt.refund, UNITS_PER_TOKEN);
        assert_eq!(bank.balance_of("seller"), 0);
        assert_eq!(bank.balance_of("buyer"), UNITS_PER_TOKEN);
        assert_eq!(
            ledger.get_credit_balance("buyer").unwrap().get_total_credits(),
            50
        );
    }
}
