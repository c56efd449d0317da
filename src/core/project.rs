// Conservation project records and their lifecycle.
// Projects are the anchor for everything else: sensor readings reference
// them and credits can only be minted against an active one.

use crate::core::access::AccessControl;
use crate::error::{RegistryError, Result};
use crate::storage::{RegistryStore, PROJECT_COUNT_KEY};
use crate::utils::{deserialize, serialize};
use log::info;
use serde::{Deserialize, Serialize};

/// One registered conservation project
#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Project {
    id: u64,
    name: String,
    location: String,
    owner: String,
    area_hectares: u64,
    carbon_credits: u64,
    is_active: bool,
}

impl Project {
    pub fn get_id(&self) -> u64 {
        self.id
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_location(&self) -> &str {
        &self.location
    }

    pub fn get_owner(&self) -> &str {
        &self.owner
    }

    pub fn get_area_hectares(&self) -> u64 {
        self.area_hectares
    }

    /// Cumulative credits ever issued to this project (never decreases)
    pub fn get_carbon_credits(&self) -> u64 {
        self.carbon_credits
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub(crate) fn add_issued_credits(&mut self, amount: u64) {
        self.carbon_credits += amount;
    }

    pub(crate) fn deactivate(&mut self) {
        self.is_active = false;
    }
}

// Projects are keyed by their big-endian id; the 8-byte keys cannot
// collide with the string counter key living in the same tree
pub(crate) fn project_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

pub struct ProjectRegistry {
    store: RegistryStore,
    access: AccessControl,
}

impl ProjectRegistry {
    pub fn new(store: RegistryStore) -> Result<ProjectRegistry> {
        let access = AccessControl::load(&store)?;
        Ok(ProjectRegistry { store, access })
    }

    // When the admin wants to register a new conservation project.
    // Ids are sequential starting at 1 and are never reused.
    pub fn register_project(
        &self,
        caller: &str,
        name: &str,
        location: &str,
        owner: &str,
        area_hectares: u64,
    ) -> Result<u64> {
        self.access.ensure_admin(caller)?;

        let _guard = self.store.lock_writer();

        let projects_tree = self.store.projects_tree()?;
        let project_id = self.store.counter(&projects_tree, PROJECT_COUNT_KEY)? + 1;

        let project = Project {
            id: project_id,
            name: name.to_string(),
            location: location.to_string(),
            owner: owner.to_string(),
            area_hectares,
            carbon_credits: 0,
            is_active: true,
        };

        let project_bytes = serialize(&project)?;
        let count_bytes = serialize(&project_id)?;
        let key = project_key(project_id);

        projects_tree
            .transaction(|tx_db| {
                tx_db.insert(&key[..], project_bytes.as_slice())?;
                tx_db.insert(PROJECT_COUNT_KEY, count_bytes.as_slice())?;
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError| {
                RegistryError::Database(format!("Failed to register project: {e}"))
            })?;

        info!("Registered project {project_id}: {name} ({location}), owner {owner}");
        Ok(project_id)
    }

    // Deactivation is terminal and idempotent - deactivating an already
    // inactive project is not an error
    pub fn deactivate_project(&self, caller: &str, project_id: u64) -> Result<()> {
        self.access.ensure_admin(caller)?;

        let _guard = self.store.lock_writer();

        let mut project = self.get_project(project_id)?;
        project.deactivate();

        let projects_tree = self.store.projects_tree()?;
        projects_tree
            .insert(project_key(project_id), serialize(&project)?)
            .map_err(|e| RegistryError::Database(format!("Failed to deactivate project: {e}")))?;

        info!("Deactivated project {project_id}");
        Ok(())
    }

    pub fn get_project(&self, project_id: u64) -> Result<Project> {
        let projects_tree = self.store.projects_tree()?;
        let bytes = projects_tree
            .get(project_key(project_id))
            .map_err(|e| RegistryError::Database(format!("Failed to read project: {e}")))?
            .ok_or(RegistryError::ProjectNotFound(project_id))?;
        deserialize(bytes.as_ref())
    }

    pub fn total_projects(&self) -> Result<u64> {
        let projects_tree = self.store.projects_tree()?;
        self.store.counter(&projects_tree, PROJECT_COUNT_KEY)
    }

    /// Sum of credits ever issued across all projects, for conservation audits
    pub fn total_credits_issued(&self) -> Result<u64> {
        let projects_tree = self.store.projects_tree()?;
        let mut total = 0u64;
        for item in projects_tree.iter() {
            let (key, value) = item
                .map_err(|e| RegistryError::Database(format!("Failed to iterate projects: {e}")))?;
            if key.len() != 8 {
                // Counter key, not a project record
                continue;
            }
            let project: Project = deserialize(value.as_ref())?;
            total += project.get_carbon_credits();
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_registry() -> (ProjectRegistry, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("registry");
        let store = RegistryStore::create_with_path("admin", db_path.to_str().unwrap()).unwrap();
        (ProjectRegistry::new(store).unwrap(), temp_dir)
    }

    #[test]
    fn test_register_project_assigns_sequential_ids() {
        let (registry, _temp_dir) = test_registry();

        let first = registry
            .register_project("admin", "Airoli Mangrove Reserve", "Navi Mumbai", "owner-1", 50)
            .unwrap();
        let second = registry
            .register_project("admin", "Thane Creek Mangroves", "Thane", "owner-2", 75)
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(registry.total_projects().unwrap(), 2);
    }

    #[test]
    fn test_registered_project_fields() {
        let (registry, _temp_dir) = test_registry();

        registry
            .register_project("admin", "Airoli Mangrove Reserve", "Navi Mumbai", "owner-1", 50)
            .unwrap();

        let project = registry.get_project(1).unwrap();
        assert_eq!(project.get_id(), 1);
        assert_eq!(project.get_name(), "Airoli Mangrove Reserve");
        assert_eq!(project.get_location(), "Navi Mumbai");
        assert_eq!(project.get_owner(), "owner-1");
        assert_eq!(project.get_area_hectares(), 50);
        assert_eq!(project.get_carbon_credits(), 0);
        assert!(project.is_active());
    }

    #[test]
    fn test_non_admin_cannot_register() {
        let (registry, _temp_dir) = test_registry();

        let result = registry.register_project("buyer", "Project", "Somewhere", "buyer", 10);
        assert!(matches!(result, Err(RegistryError::NotAuthorized(_))));
        assert_eq!(registry.total_projects().unwrap(), 0);
    }

    #[test]
    fn test_deactivate_project() {
        let (registry, _temp_dir) = test_registry();

        registry
            .register_project("admin", "Project", "Location", "owner-1", 100)
            .unwrap();
        registry.deactivate_project("admin", 1).unwrap();
        assert!(!registry.get_project(1).unwrap().is_active());

        // Idempotent
        registry.deactivate_project("admin", 1).unwrap();
        assert!(!registry.get_project(1).unwrap().is_active());
    }

    #[test]
    fn test_deactivate_unknown_project() {
        let (registry, _temp_dir) = test_registry();

        let result = registry.deactivate_project("admin", 42);
        assert!(matches!(result, Err(RegistryError::ProjectNotFound(42))));
    }

    #[test]
    fn test_get_unknown_project() {
        let (registry, _temp_dir) = test_registry();

        let result = registry.get_project(1);
        assert!(matches!(result, Err(RegistryError::ProjectNotFound(1))));
    }
}
