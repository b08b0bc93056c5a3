//! Ledger configuration
//!
//! Holds the numeric policy shared by the aggregator and the planner:
//! the rounding tolerance and the number of decimal places used for
//! generated shares and for output.

use rust_decimal::Decimal;

/// Default tolerance: one minor currency unit
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Default number of decimal places for shares and output
pub const DEFAULT_SHARE_SCALE: u32 = 2;

/// Largest scale a `Decimal` can carry
pub const MAX_SHARE_SCALE: u32 = 28;

/// Numeric policy for balance and settlement computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerConfig {
    /// Slack absorbing rounding error (ε)
    ///
    /// A split may differ from its expense amount by at most this much, and
    /// balances may sum to at most this much and still settle.
    pub tolerance: Decimal,

    /// Decimal places for generated equal-split shares and formatted output
    pub share_scale: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            share_scale: DEFAULT_SHARE_SCALE,
        }
    }
}

impl LedgerConfig {
    /// Create a config with a custom tolerance
    ///
    /// A negative tolerance makes no sense; its absolute value is used and a
    /// warning is logged. A share scale above [`MAX_SHARE_SCALE`] is clamped
    /// the same way.
    pub fn new(tolerance: Decimal, share_scale: u32) -> Self {
        let tolerance = if tolerance.is_sign_negative() {
            tracing::warn!(%tolerance, "negative tolerance, using its absolute value");
            tolerance.abs()
        } else {
            tolerance
        };

        let share_scale = if share_scale > MAX_SHARE_SCALE {
            tracing::warn!(share_scale, max = MAX_SHARE_SCALE, "share scale too large, clamping");
            MAX_SHARE_SCALE
        } else {
            share_scale
        };

        Self {
            tolerance,
            share_scale,
        }
    }

    /// Whether `value` is within tolerance of zero
    pub fn is_negligible(&self, value: Decimal) -> bool {
        value.abs() <= self.tolerance
    }
}
