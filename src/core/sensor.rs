// Append-only log of environmental sensor readings.
// Readings are never mutated or deleted; a per-project index keeps
// retrieval in insertion order.

use crate::core::access::AccessControl;
use crate::core::project::ProjectRegistry;
use crate::error::{RegistryError, Result};
use crate::storage::{RegistryStore, READING_COUNT_KEY};
use crate::utils::{current_timestamp, deserialize, serialize};
use log::info;
use serde::{Deserialize, Serialize};

/// One timestamped sensor observation tied to a project
#[derive(Debug, Clone, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct SensorReading {
    id: u64,
    project_id: u64,
    co2_absorbed_kg: i64,
    temperature_centi: i64,
    humidity_centi: i64,
    sensor_id: String,
    timestamp: i64,
}

impl SensorReading {
    pub fn get_id(&self) -> u64 {
        self.id
    }

    pub fn get_project_id(&self) -> u64 {
        self.project_id
    }

    pub fn get_co2_absorbed_kg(&self) -> i64 {
        self.co2_absorbed_kg
    }

    /// Temperature in hundredths of a degree Celsius (28.50C -> 2850)
    pub fn get_temperature_centi(&self) -> i64 {
        self.temperature_centi
    }

    /// Relative humidity in hundredths of a percent (75% -> 7500)
    pub fn get_humidity_centi(&self) -> i64 {
        self.humidity_centi
    }

    pub fn get_sensor_id(&self) -> &str {
        &self.sensor_id
    }

    /// Unix milliseconds at which the reading was recorded
    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }
}

fn reading_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}

fn project_index_key(project_id: u64) -> String {
    format!("project_index_{project_id}")
}

pub struct SensorDataLog {
    store: RegistryStore,
    access: AccessControl,
    projects: ProjectRegistry,
}

impl SensorDataLog {
    pub fn new(store: RegistryStore) -> Result<SensorDataLog> {
        let access = AccessControl::load(&store)?;
        let projects = ProjectRegistry::new(store.clone())?;
        Ok(SensorDataLog {
            store,
            access,
            projects,
        })
    }

    // When the admin records a reading pushed up from an IoT sensor.
    // The referenced project must exist - orphaned readings could never
    // be cleaned out of an append-only log.
    pub fn record_sensor_data(
        &self,
        caller: &str,
        project_id: u64,
        co2_absorbed_kg: i64,
        temperature_centi: i64,
        humidity_centi: i64,
        sensor_id: &str,
    ) -> Result<u64> {
        self.access.ensure_admin(caller)?;

        let _guard = self.store.lock_writer();

        // Read-only reference to the project registry
        self.projects.get_project(project_id)?;

        let readings_tree = self.store.readings_tree()?;
        let reading_id = self.store.counter(&readings_tree, READING_COUNT_KEY)? + 1;

        let reading = SensorReading {
            id: reading_id,
            project_id,
            co2_absorbed_kg,
            temperature_centi,
            humidity_centi,
            sensor_id: sensor_id.to_string(),
            timestamp: current_timestamp()?,
        };

        let mut index = self.read_project_index(&readings_tree, project_id)?;
        index.push(reading_id);

        let reading_bytes = serialize(&reading)?;
        let index_bytes = serialize(&index)?;
        let count_bytes = serialize(&reading_id)?;
        let key = reading_key(reading_id);
        let index_key = project_index_key(project_id);

        readings_tree
            .transaction(|tx_db| {
                tx_db.insert(&key[..], reading_bytes.as_slice())?;
                tx_db.insert(index_key.as_str(), index_bytes.as_slice())?;
                tx_db.insert(READING_COUNT_KEY, count_bytes.as_slice())?;
                Ok(())
            })
            .map_err(|e: sled::transaction::TransactionError| {
                RegistryError::Database(format!("Failed to record sensor data: {e}"))
            })?;

        info!(
            "Recorded reading {reading_id} for project {project_id}: \
             {co2_absorbed_kg} kg CO2, sensor {sensor_id}"
        );
        Ok(reading_id)
    }

    pub fn get_sensor_data(&self, reading_id: u64) -> Result<SensorReading> {
        let readings_tree = self.store.readings_tree()?;
        let bytes = readings_tree
            .get(reading_key(reading_id))
            .map_err(|e| RegistryError::Database(format!("Failed to read sensor data: {e}")))?
            .ok_or(RegistryError::ReadingNotFound(reading_id))?;
        deserialize(bytes.as_ref())
    }

    /// Reading ids for a project, in insertion order; empty when none exist
    pub fn project_sensor_data_ids(&self, project_id: u64) -> Result<Vec<u64>> {
        let readings_tree = self.store.readings_tree()?;
        self.read_project_index(&readings_tree, project_id)
    }

    pub fn total_sensor_data(&self) -> Result<u64> {
        let readings_tree = self.store.readings_tree()?;
        self.store.counter(&readings_tree, READING_COUNT_KEY)
    }

    fn read_project_index(&self, readings_tree: &sled::Tree, project_id: u64) -> Result<Vec<u64>> {
        match readings_tree
            .get(project_index_key(project_id))
            .map_err(|e| RegistryError::Database(format!("Failed to read project index: {e}")))?
        {
            Some(bytes) => deserialize(bytes.as_ref()),
            None => Ok(vec![]),
        }
    }
}
