//! Status enumerations for plans, generation attempts and day parts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of travel plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    /// Plan exists but has no generated itinerary yet
    #[default]
    Draft,

    /// An itinerary has been generated for the plan
    Planned,

    /// Trip is over
    Completed,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "planned" => Ok(PlanStatus::Planned),
            "completed" => Ok(PlanStatus::Completed),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Planned => "planned",
            PlanStatus::Completed => "completed",
        }
    }
}

/// Lifecycle of a single generation attempt.
///
/// `Pending` and `Processing` are the only non-terminal states:
///
/// ```text
/// pending ──▶ processing ──▶ completed
///                  │
///                  └───────▶ failed
/// ```
///
/// A pending attempt may also fail directly when the job cannot start.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttemptStatus {
    /// Admitted by the quota service, not yet picked up
    #[default]
    Pending,

    /// The generation job is running
    Processing,

    /// Itinerary persisted
    Completed,

    /// Generation gave up
    Failed,
}

impl FromStr for AttemptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(AttemptStatus::Pending),
            "processing" => Ok(AttemptStatus::Processing),
            "completed" => Ok(AttemptStatus::Completed),
            "failed" => Ok(AttemptStatus::Failed),
            _ => Err(format!("Invalid attempt status: {s}")),
        }
    }
}

impl AttemptStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Pending => "pending",
            AttemptStatus::Processing => "processing",
            AttemptStatus::Completed => "completed",
            AttemptStatus::Failed => "failed",
        }
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AttemptStatus::Completed | AttemptStatus::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: AttemptStatus) -> bool {
        matches!(
            (self, next),
            (AttemptStatus::Pending, AttemptStatus::Processing)
                | (AttemptStatus::Pending, AttemptStatus::Failed)
                | (AttemptStatus::Processing, AttemptStatus::Completed)
                | (AttemptStatus::Processing, AttemptStatus::Failed)
        )
    }
}

/// Coarse time-of-day bucket used to group points within a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayPart {
    #[default]
    Morning,
    Midday,
    Afternoon,
    Evening,
}

impl FromStr for DayPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(DayPart::Morning),
            "midday" | "noon" | "lunch" => Ok(DayPart::Midday),
            "afternoon" => Ok(DayPart::Afternoon),
            "evening" | "night" => Ok(DayPart::Evening),
            _ => Err(format!("Invalid day part: {s}")),
        }
    }
}

impl DayPart {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Midday => "midday",
            DayPart::Afternoon => "afternoon",
            DayPart::Evening => "evening",
        }
    }

    /// Bucket an `HH:MM` (or `H:MM`) clock time.
    pub fn from_clock(time: &str) -> Option<DayPart> {
        let hour: u8 = time.trim().split(':').next()?.trim().parse().ok()?;
        match hour {
            0..=10 => Some(DayPart::Morning),
            11..=13 => Some(DayPart::Midday),
            14..=17 => Some(DayPart::Afternoon),
            18..=23 => Some(DayPart::Evening),
            _ => None,
        }
    }

    /// Pick a day part from whatever the model provided.
    ///
    /// An explicit day part wins, then a clock time, then [`DayPart::Morning`].
    pub fn infer(day_part: Option<&str>, time: Option<&str>) -> DayPart {
        day_part
            .and_then(|part| part.parse().ok())
            .or_else(|| time.and_then(DayPart::from_clock))
            .unwrap_or_default()
    }
}
