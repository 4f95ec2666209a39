//! Collection wrappers for lists of plans and attempts.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{GenerationAttempt, TravelPlan};

/// Plans rendered as a compact list, one heading per plan.
pub struct Plans(pub Vec<TravelPlan>);

impl Plans {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TravelPlan> {
        self.0.iter()
    }
}

impl IntoIterator for Plans {
    type Item = TravelPlan;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Plans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }
        for plan in &self.0 {
            writeln!(f, "## {} (ID: {})", plan.destination, plan.id)?;
            writeln!(f)?;
            writeln!(
                f,
                "- **Dates**: {} to {} ({} days, {} travellers)",
                plan.start_date,
                plan.end_date(),
                plan.duration_days,
                plan.travelers
            )?;
            writeln!(f, "- **Status**: {}", plan.status)?;
            writeln!(f, "- **Created**: {}", LocalDateTime(&plan.created_at))?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Generation history of a plan.
pub struct Attempts(pub Vec<GenerationAttempt>);

impl Attempts {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Attempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No generation attempts found.");
        }
        for attempt in &self.0 {
            write!(f, "{attempt}")?;
        }
        Ok(())
    }
}
