/**
 * Subscription Plans
 *
 * This module defines the subscription tiers and the rate-limit
 * parameters attached to each tier. A user with no recorded plan is on
 * the free tier.
 */

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod resolver;

pub use resolver::PlanResolver;

/// Subscription tier controlling rate limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Default tier for users with no subscription
    #[default]
    Free,
    /// Paid tier
    Tier2,
    /// Paid tier, highest limits
    Tier3,
}

impl Plan {
    /// Parse a stored plan name, `None` for unknown values
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "free" => Some(Self::Free),
            "tier2" => Some(Self::Tier2),
            "tier3" => Some(Self::Tier3),
            _ => None,
        }
    }

    /// Canonical name stored in the database and the plan cache
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Tier2 => "tier2",
            Self::Tier3 => "tier3",
        }
    }

    /// Trailing window over which requests are counted
    pub fn window(&self) -> Duration {
        Duration::from_secs(3600)
    }

    /// Maximum requests admitted per window
    pub fn max_requests(&self) -> u64 {
        match self {
            Self::Free => 100,
            Self::Tier2 => 500,
            Self::Tier3 => 2000,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
