use crate::error::{RegistryError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix timestamp in milliseconds, used to stamp sensor readings
pub fn current_timestamp() -> Result<i64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| RegistryError::Io(format!("System time error: {e}")))?
        .as_millis();

    // Ensure the timestamp fits in i64
    if duration > i64::MAX as u128 {
        return Err(RegistryError::Io("Timestamp overflow".to_string()));
    }

    Ok(duration as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp() {
        let ts = current_timestamp().unwrap();
        // Anything after 2020 is plausible for a live clock
        assert!(ts > 1_577_836_800_000);
    }
}
