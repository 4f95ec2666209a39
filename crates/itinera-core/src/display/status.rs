//! One-line feedback messages.

use std::fmt;

use crate::error::ItineraError;

/// Success or failure line shown after an operation.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }

    /// Failure line carrying the user-facing text of `error`.
    pub fn from_error(error: &ItineraError) -> Self {
        Self::failure(error.user_message())
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{label} {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_operation_status_display() {
        let success = OperationStatus::success("Itinerary generated");
        assert_eq!(success.to_string(), "Success: Itinerary generated\n");

        let failure = OperationStatus::failure("Generation failed");
        assert!(failure.to_string().starts_with("Error:"));
    }

    #[test]
    fn test_quota_error_keeps_actionable_text() {
        let status = OperationStatus::from_error(&ItineraError::QuotaExceeded {
            used: 10,
            limit: 10,
            reset_date: date(2025, 8, 1),
        });
        assert!(!status.success);
        assert!(status.message.contains("2025-08-01"));
    }
}
