//! Prompt text for itinerary generation.

use crate::models::{Preferences, TravelPlan};

const DEFAULT_INTEREST: &str = "general sightseeing";

/// Instructions describing the traveller and the expected answer.
pub fn system_prompt(preferences: &Preferences) -> String {
    let interests = if preferences.interests.is_empty() {
        DEFAULT_INTEREST.to_string()
    } else {
        preferences.interests.join(", ")
    };

    let mut prompt = format!(
        "You are an experienced travel planner. Build a realistic day-by-day itinerary.\n\
         Traveller interests: {interests}.\n\
         Travel pace: {pace}.\n\
         Budget level: {budget}.\n\
         Preferred transport: {transport}.\n",
        pace = preferences.pace,
        budget = preferences.budget_level,
        transport = preferences.transport,
    );

    if !preferences.restrictions.is_empty() {
        prompt.push_str(&format!(
            "Respect these restrictions: {}.\n",
            preferences.restrictions.join(", ")
        ));
    }

    prompt.push_str(
        "For every day give a short summary and its activities in visiting order. \
         For every activity give the part of the day (morning, midday, afternoon or evening), \
         a start time, a name, a description, why it suits the traveller, \
         an estimated duration in minutes and, when known, a map link and coordinates.",
    );
    prompt
}

/// Description of the trip itself.
pub fn user_prompt(plan: &TravelPlan) -> String {
    let day_word = if plan.duration_days == 1 { "day" } else { "days" };
    let traveler_word = if plan.travelers == 1 {
        "traveller"
    } else {
        "travellers"
    };

    let mut prompt = format!(
        "Plan a trip to {destination} for {days} {day_word} for {travelers} {traveler_word}, \
         departing on {start}.",
        destination = plan.destination,
        days = plan.duration_days,
        travelers = plan.travelers,
        start = plan.start_date,
    );

    if let (Some(per_person), Some(budget)) = (plan.budget_per_person(), plan.budget.as_ref()) {
        prompt.push_str(&format!(
            " The budget is about {per_person:.2} {} per person.",
            budget.currency
        ));
    }

    if let Some(notes) = plan.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        prompt.push_str(&format!(" Additional notes: {notes}"));
    }

    prompt
}
