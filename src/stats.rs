//! Dashboard statistics derived from a key snapshot

use serde::Serialize;

use crate::model::{ApiKey, KeyStatus};

/// Headline counts for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub active: usize,
    /// Depleted and expired together
    pub non_active: usize,
}

/// Per-status counts for the status chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusBreakdown {
    pub active: usize,
    pub depleted: usize,
    pub expired: usize,
}

/// Counts by persisted status only; threshold depletion does not count here.
pub fn compute(keys: &[ApiKey]) -> DashboardStats {
    let active = keys.iter().filter(|k| k.status == KeyStatus::Active).count();
    DashboardStats {
        total: keys.len(),
        active,
        non_active: keys.len() - active,
    }
}

pub fn breakdown(keys: &[ApiKey]) -> StatusBreakdown {
    keys.iter().fold(StatusBreakdown::default(), |mut acc, k| {
        match k.status {
            KeyStatus::Active => acc.active += 1,
            KeyStatus::Depleted => acc.depleted += 1,
            KeyStatus::Expired => acc.expired += 1,
        }
        acc
    })
}
