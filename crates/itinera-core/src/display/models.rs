//! Display implementations for domain models.
//!
//! Everything renders as markdown so the CLI can hand it to a terminal
//! skin unchanged.

use std::fmt;

use super::datetime::{LocalDateTime, Usd};
use crate::{
    generation::CostEstimate,
    models::{
        AttemptStatus, DayPart, GenerationAttempt, PlanDay, PlanPoint, PlanStatus, QuotaInfo,
        TravelPlan, UsageTier,
    },
};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AttemptStatus {
    /// Status with a leading marker, for lists.
    pub fn with_icon(&self) -> String {
        let icon = match self {
            AttemptStatus::Pending => "○",
            AttemptStatus::Processing => "➤",
            AttemptStatus::Completed => "✓",
            AttemptStatus::Failed => "✗",
        };
        format!("{icon} {}", self.as_str())
    }
}

impl fmt::Display for DayPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayPart::Morning => "Morning",
            DayPart::Midday => "Midday",
            DayPart::Afternoon => "Afternoon",
            DayPart::Evening => "Evening",
        };
        f.write_str(label)
    }
}

impl fmt::Display for UsageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TravelPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.destination)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status)?;
        writeln!(
            f,
            "- Dates: {} to {} ({} days)",
            self.start_date,
            self.end_date(),
            self.duration_days
        )?;
        writeln!(f, "- Travellers: {}", self.travelers)?;
        if let Some(budget) = &self.budget {
            write!(f, "- Budget: {:.2} {}", budget.amount, budget.currency)?;
            if let Some(per_person) = self.budget_per_person() {
                if self.travelers > 1 {
                    write!(f, " ({per_person:.2} per person)")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }

        if self.days.is_empty() {
            writeln!(f, "\nNo itinerary generated yet.")?;
        } else {
            writeln!(f, "\n## Itinerary")?;
            writeln!(f)?;
            for day in &self.days {
                write!(f, "{day}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for PlanDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### Day {} ({})", self.day_number, self.date)?;
        writeln!(f)?;
        if let Some(summary) = &self.summary {
            writeln!(f, "{summary}")?;
            writeln!(f)?;
        }
        for point in &self.points {
            write!(f, "{point}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for PlanPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}. **{}** ({}, {} min)",
            self.order_number, self.name, self.day_part, self.duration_minutes
        )?;
        if !self.description.is_empty() {
            writeln!(f, "   {}", self.description)?;
        }
        if !self.justification.is_empty() {
            writeln!(f, "   _{}_", self.justification)?;
        }
        if let Some(url) = &self.map_url {
            writeln!(f, "   [Map]({url})")?;
        } else if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            writeln!(f, "   Location: {lat:.5}, {lon:.5}")?;
        }
        Ok(())
    }
}

impl fmt::Display for GenerationAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### Attempt {} ({})",
            self.id,
            self.status.with_icon()
        )?;
        writeln!(f)?;
        writeln!(f, "- Requested: {}", LocalDateTime(&self.created_at))?;
        if let Some(model) = &self.model {
            writeln!(f, "- Model: {model}")?;
        }
        if let Some(tokens) = self.tokens_used {
            writeln!(f, "- Tokens: {tokens}")?;
        }
        if let Some(cost) = self.cost_usd {
            writeln!(f, "- Cost: {}", Usd(cost))?;
        }
        if let Some(completed_at) = &self.completed_at {
            writeln!(f, "- Finished: {}", LocalDateTime(completed_at))?;
        }
        if let Some(error) = &self.error_message {
            writeln!(f, "- Error: {error}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for QuotaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Monthly generations")?;
        writeln!(f)?;
        writeln!(
            f,
            "- Used: {} of {} ({:.0}%, {})",
            self.used, self.limit, self.percentage, self.tier
        )?;
        writeln!(f, "- Remaining: {}", self.remaining)?;
        writeln!(f, "- Resets on: {}", self.reset_date)?;
        if !self.can_generate {
            writeln!(f)?;
            writeln!(f, "The allowance for this month is used up.")?;
        }
        Ok(())
    }
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Cost estimate")?;
        writeln!(f)?;
        writeln!(f, "- Model: {}", self.model)?;
        writeln!(f, "- Trip length: {} days", self.days)?;
        writeln!(
            f,
            "- Tokens: ~{} prompt, ~{} completion",
            self.prompt_tokens, self.completion_tokens
        )?;
        writeln!(f, "- Estimated cost: {}", Usd(self.cost_usd))
    }
}
