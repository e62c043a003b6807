//! Per-user order statistics
//!
//! The back office shows, for each user, how many orders they placed and how
//! much they spent. Order count never filters by status. Total spend by
//! default sums every order as stored, including unpaid and cancelled ones;
//! [`SpendPolicy::Settled`] restricts the sum to paid, non-cancelled orders
//! for deployments that want "money actually received".

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which orders contribute to a user's total spend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendPolicy {
    /// Every order counts, whatever its status or paid flag
    #[default]
    All,

    /// Only paid orders that were not cancelled
    Settled,
}

impl SpendPolicy {
    /// Bound into SQL as `$n OR (paid AND status <> 'cancelled')`
    pub fn includes_unsettled(&self) -> bool {
        matches!(self, SpendPolicy::All)
    }

    /// Policy name as used in configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            SpendPolicy::All => "all",
            SpendPolicy::Settled => "settled",
        }
    }
}

impl fmt::Display for SpendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpendPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SpendPolicy::All),
            "settled" => Ok(SpendPolicy::Settled),
            other => Err(format!(
                "Unknown spend policy '{}', expected 'all' or 'settled'",
                other
            )),
        }
    }
}

/// Order count and total spend for one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStats {
    /// Number of orders, regardless of status
    pub order_count: i64,

    /// Sum of `total_price` under the active [`SpendPolicy`]; zero without orders
    pub total_spent: Decimal,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            order_count: 0,
            total_spent: Decimal::ZERO,
        }
    }
}
