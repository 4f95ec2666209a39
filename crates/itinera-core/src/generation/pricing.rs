//! Per-model token prices and cost arithmetic.

use serde::{Deserialize, Serialize};

use crate::llm::Usage;

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelRates {
    pub input: f64,
    pub output: f64,
}

/// Rates applied to models missing from the table.
pub const FALLBACK_RATES: ModelRates = ModelRates {
    input: 0.15,
    output: 0.60,
};

const RATES: &[(&str, ModelRates)] = &[
    (
        "gpt-4o-mini",
        ModelRates {
            input: 0.15,
            output: 0.60,
        },
    ),
    (
        "gpt-4o",
        ModelRates {
            input: 2.50,
            output: 10.00,
        },
    ),
    (
        "gpt-4.1-mini",
        ModelRates {
            input: 0.40,
            output: 1.60,
        },
    ),
    (
        "gpt-4.1",
        ModelRates {
            input: 2.00,
            output: 8.00,
        },
    ),
    (
        "gpt-3.5-turbo",
        ModelRates {
            input: 0.50,
            output: 1.50,
        },
    ),
];

const ESTIMATED_PROMPT_TOKENS: u32 = 900;
const ESTIMATED_TOKENS_PER_DAY: u32 = 450;
const ESTIMATED_BASE_COMPLETION_TOKENS: u32 = 150;

/// Rates for `model`; dated variants such as `gpt-4o-2024-08-06` resolve
/// to their family.
pub fn rates_for(model: &str) -> ModelRates {
    if let Some((_, rates)) = RATES.iter().find(|(name, _)| *name == model) {
        return *rates;
    }
    // Longest prefix first, so `gpt-4o-mini-…` never resolves to `gpt-4o`.
    RATES
        .iter()
        .filter(|(name, _)| model.starts_with(&format!("{name}-")))
        .max_by_key(|(name, _)| name.len())
        .map(|(_, rates)| *rates)
        .unwrap_or(FALLBACK_RATES)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Cost in USD of the given usage, rounded to 4 decimal places.
pub fn calculate_cost(usage: &Usage, model: &str) -> f64 {
    let rates = rates_for(model);
    round4(
        f64::from(usage.prompt_tokens) / 1e6 * rates.input
            + f64::from(usage.completion_tokens) / 1e6 * rates.output,
    )
}

/// Cost preview computed without calling the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostEstimate {
    pub model: String,
    pub days: u32,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub cost_usd: f64,
}

/// Linear estimate for a trip of `days` days.
pub fn estimate(days: u32, model: &str) -> CostEstimate {
    let usage = Usage {
        prompt_tokens: ESTIMATED_PROMPT_TOKENS,
        completion_tokens: ESTIMATED_BASE_COMPLETION_TOKENS
            .saturating_add(ESTIMATED_TOKENS_PER_DAY.saturating_mul(days)),
        total_tokens: 0,
    };
    CostEstimate {
        model: model.to_string(),
        days,
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        cost_usd: calculate_cost(&usage, model),
    }
}
