/// Registry monetary system
///
/// This module defines the native value unit the marketplace settles in.
/// Credits themselves are plain counts; payments are denominated in the
/// smallest native unit, 18 decimals per whole token.
///
/// ## Monetary Units
/// - **Unit**: the smallest value denomination
/// - **Token**: 1,000,000,000,000,000,000 units
/// - **Default credit price**: 0.01 token per credit
///
/// Number of units in one whole token
pub const UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Price per credit fixed at registry initialization (0.01 token)
pub const DEFAULT_PRICE_PER_CREDIT: u128 = UNITS_PER_TOKEN / 100;

/// Utility functions for monetary conversions
pub mod conversions {
    use super::*;

    /// Convert whole tokens to units
    ///
    /// # Examples
    /// ```
    /// use carbon_registry::core::monetary::conversions::tokens_to_units;
    /// assert_eq!(tokens_to_units(1.0), 1_000_000_000_000_000_000);
    /// assert_eq!(tokens_to_units(0.5), 500_000_000_000_000_000);
    /// ```
    pub fn tokens_to_units(tokens: f64) -> u128 {
        (tokens * UNITS_PER_TOKEN as f64) as u128
    }

    /// Convert units to whole tokens
    ///
    /// # Examples
    /// ```
    /// use carbon_registry::core::monetary::conversions::units_to_tokens;
    /// assert_eq!(units_to_tokens(1_000_000_000_000_000_000), 1.0);
    /// assert_eq!(units_to_tokens(500_000_000_000_000_000), 0.5);
    /// ```
    pub fn units_to_tokens(units: u128) -> f64 {
        units as f64 / UNITS_PER_TOKEN as f64
    }

    /// Format units as a human-readable string
    ///
    /// # Examples
    /// ```
    /// use carbon_registry::core::monetary::conversions::format_units;
    /// assert_eq!(format_units(1_000_000_000_000_000_000), "1.000000 tokens");
    /// assert_eq!(format_units(10_000_000_000_000_000), "0.010000 tokens");
    /// ```
    pub fn format_units(units: u128) -> String {
        format!("{:.6} tokens", units_to_tokens(units))
    }
}
