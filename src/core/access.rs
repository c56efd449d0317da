use crate::error::{RegistryError, Result};
use crate::storage::RegistryStore;

/// Guard for admin-only operations.
///
/// The admin identity is fixed when the registry database is created and is
/// never reassigned. Every privileged operation checks it first, before
/// touching any other state.
#[derive(Clone)]
pub struct AccessControl {
    admin: String,
}

impl AccessControl {
    pub fn load(store: &RegistryStore) -> Result<AccessControl> {
        Ok(AccessControl {
            admin: store.admin_address()?,
        })
    }

    pub fn get_admin(&self) -> &str {
        &self.admin
    }

    pub fn is_admin(&self, caller: &str) -> bool {
        caller == self.admin
    }

    pub fn ensure_admin(&self, caller: &str) -> Result<()> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(RegistryError::NotAuthorized(caller.to_string()))
        }
    }
}
