#[cfg(test)]
mod model_tests {
    use jiff::{civil::date, Timestamp};
    use serde_json::json;

    use crate::models::{
        AttemptStatus, Budget, DayPart, Itinerary, PlanStatus, Preferences, QuotaInfo,
        TravelPlan, UsageTier,
    };

    fn create_test_plan() -> TravelPlan {
        TravelPlan {
            id: 7,
            user_id: 1,
            destination: "Lisbon".to_string(),
            start_date: date(2025, 6, 29),
            duration_days: 3,
            travelers: 2,
            budget: Some(Budget {
                amount: 1200.0,
                currency: "EUR".to_string(),
            }),
            notes: None,
            status: PlanStatus::Draft,
            created_at: Timestamp::from_second(1_750_000_000).unwrap(),
            updated_at: Timestamp::from_second(1_750_000_000).unwrap(),
            days: vec![],
        }
    }

    #[test]
    fn test_plan_end_date_is_derived() {
        let plan = create_test_plan();
        assert_eq!(plan.end_date(), date(2025, 7, 1));
        assert_eq!(plan.date_of_day(1), date(2025, 6, 29));
        assert_eq!(plan.date_of_day(2), date(2025, 6, 30));
    }

    #[test]
    fn test_plan_budget_per_person() {
        let plan = create_test_plan();
        assert_eq!(plan.budget_per_person(), Some(600.0));
        assert!(!plan.has_ai_plan());
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in [PlanStatus::Draft, PlanStatus::Planned, PlanStatus::Completed] {
            assert_eq!(status.as_str().parse::<PlanStatus>().unwrap(), status);
        }
        for status in [
            AttemptStatus::Pending,
            AttemptStatus::Processing,
            AttemptStatus::Completed,
            AttemptStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<AttemptStatus>().unwrap(), status);
        }
        assert!("archived".parse::<PlanStatus>().is_err());
    }

    #[test]
    fn test_attempt_state_machine() {
        use AttemptStatus::*;

        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Failed));
        assert!(Pending.can_transition_to(Failed));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Processing));
        assert!(Completed.is_terminal() && Failed.is_terminal());
        assert!(!Pending.is_terminal() && !Processing.is_terminal());
    }

    #[test]
    fn test_day_part_inference() {
        assert_eq!(DayPart::infer(Some("evening"), Some("09:00")), DayPart::Evening);
        assert_eq!(DayPart::infer(None, Some("09:30")), DayPart::Morning);
        assert_eq!(DayPart::infer(None, Some("12:15")), DayPart::Midday);
        assert_eq!(DayPart::infer(None, Some("15:00")), DayPart::Afternoon);
        assert_eq!(DayPart::infer(None, Some("20:45")), DayPart::Evening);
        assert_eq!(DayPart::infer(Some("brunch"), None), DayPart::Morning);
        assert_eq!(DayPart::infer(None, None), DayPart::Morning);
    }

    #[test]
    fn test_preferences_accept_either_interest_key() {
        let prefs = Preferences::from_value(&json!({
            "interest_categories": ["museums", " food ", ""],
            "pace": "relaxed",
            "restrictions": "vegetarian",
        }));

        assert_eq!(prefs.interests, vec!["museums", "food"]);
        assert_eq!(prefs.pace, "relaxed");
        assert_eq!(prefs.restrictions, vec!["vegetarian"]);
        assert_eq!(prefs.budget_level, "medium");
        assert_eq!(prefs.transport, "public transport");
    }

    #[test]
    fn test_preferences_from_empty_document() {
        let prefs = Preferences::from_value(&json!({}));
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_itinerary_maps_positions_not_model_numbering() {
        let plan = create_test_plan();
        let itinerary: Itinerary = serde_json::from_value(json!({
            "days": [
                {
                    "day_number": 5,
                    "summary": "Old town",
                    "activities": [
                        {"name": "Castle", "time": "10:00", "duration_minutes": 90},
                        {"title": "Dinner", "day_part": "evening"}
                    ]
                },
                {"summary": "", "activities": []}
            ]
        }))
        .unwrap();

        let days = itinerary.to_new_days(&plan);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day_number, 1);
        assert_eq!(days[0].date, date(2025, 6, 29));
        assert_eq!(days[0].points[0].order_number, 1);
        assert_eq!(days[0].points[0].day_part, DayPart::Morning);
        assert_eq!(days[0].points[1].order_number, 2);
        assert_eq!(days[0].points[1].name, "Dinner");
        assert_eq!(days[0].points[1].duration_minutes, 60);
        assert_eq!(days[1].day_number, 2);
        assert_eq!(days[1].summary, None);
    }

    #[test]
    fn test_quota_info_tiers() {
        let reset = date(2025, 7, 1);

        let fresh = QuotaInfo::new(0, 10, reset);
        assert_eq!(fresh.remaining, 10);
        assert_eq!(fresh.tier, UsageTier::Green);
        assert!(fresh.can_generate);

        assert_eq!(QuotaInfo::new(6, 10, reset).tier, UsageTier::Green);
        assert_eq!(QuotaInfo::new(7, 10, reset).tier, UsageTier::Yellow);
        assert_eq!(QuotaInfo::new(8, 10, reset).tier, UsageTier::Yellow);
        assert_eq!(QuotaInfo::new(9, 10, reset).tier, UsageTier::Red);

        let exhausted = QuotaInfo::new(10, 10, reset);
        assert_eq!(exhausted.remaining, 0);
        assert!(!exhausted.can_generate);
        assert_eq!(exhausted.percentage, 100.0);
    }
}
