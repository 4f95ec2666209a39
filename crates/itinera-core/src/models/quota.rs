//! Presentation-oriented view of a user's monthly allowance.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Three-tier classification of how much of the allowance is used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UsageTier {
    /// Below 70 %
    Green,
    /// 70 % up to 90 %
    Yellow,
    /// 90 % and above
    Red,
}

impl UsageTier {
    /// Classify a usage percentage.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 70.0 {
            UsageTier::Green
        } else if percentage < 90.0 {
            UsageTier::Yellow
        } else {
            UsageTier::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageTier::Green => "green",
            UsageTier::Yellow => "yellow",
            UsageTier::Red => "red",
        }
    }
}

/// Aggregate quota view for one user and month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotaInfo {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,

    /// Share of the allowance used, 0–100
    pub percentage: f64,

    pub can_generate: bool,

    /// First day of next month in the quota time zone
    pub reset_date: Date,

    pub tier: UsageTier,
}

impl QuotaInfo {
    /// Derive the aggregate view from a usage count.
    pub fn new(used: u32, limit: u32, reset_date: Date) -> Self {
        let remaining = limit.saturating_sub(used);
        let percentage = if limit == 0 {
            100.0
        } else {
            (f64::from(used) / f64::from(limit) * 100.0).min(100.0)
        };

        Self {
            used,
            limit,
            remaining,
            percentage,
            can_generate: remaining > 0,
            reset_date,
            tier: UsageTier::from_percentage(percentage),
        }
    }
}
