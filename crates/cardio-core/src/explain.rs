//! Plain-language explanation of a simulated intervention.
//!
//! Fixed sentence templates only. The same inputs always produce the same text.

use cardio_contracts::{
    action::Action,
    patient::{display_name, is_modifiable, ModifiableMetrics},
    risk::FeatureWeight,
};

/// Risk reduction (percentage points) below which the explanation points at
/// the non-modifiable drivers.
pub const SIGNIFICANT_REDUCTION: f64 = 2.0;

/// How many of the top-ranked features are searched for non-modifiable drivers.
const TOP_DRIVERS: usize = 5;

/// Metric moves smaller than this are reported as no change.
const METRIC_EPSILON: f64 = 0.05;

/// Build the explanation paragraph for one simulation.
pub fn explain(
    current: &ModifiableMetrics,
    simulated: &ModifiableMetrics,
    risk_reduction: f64,
    feature_importance: &[FeatureWeight],
    action: Action,
) -> String {
    if !action.is_active() {
        return "No intervention applied (Monitor Only). Metrics and risk remain unchanged; \
                continue regular checkups to track blood pressure and cholesterol."
            .to_string();
    }

    let mut sentences = Vec::new();
    let changes = metric_changes(current, simulated);

    if changes.is_empty() {
        sentences.push(format!(
            "{} produced no meaningful change in the modifiable metrics, which are already at or near optimal levels.",
            action.name()
        ));
    } else {
        sentences.push(format!("{}.", capitalize(&join_phrases(&changes))));
    }

    if risk_reduction >= SIGNIFICANT_REDUCTION {
        sentences.push(format!(
            "These changes contributed to a {:.1}% risk reduction.",
            risk_reduction
        ));
    } else if risk_reduction > METRIC_EPSILON {
        sentences.push(format!(
            "These changes lowered the estimated risk only slightly ({:.1}%).",
            risk_reduction
        ));
    } else if !changes.is_empty() {
        sentences.push("The model's risk estimate did not decrease despite these changes.".to_string());
    } else {
        sentences.push("The estimated risk is unchanged.".to_string());
    }

    if risk_reduction < SIGNIFICANT_REDUCTION && improved(current, simulated) {
        let drivers: Vec<String> = feature_importance
            .iter()
            .take(TOP_DRIVERS)
            .filter(|w| !is_modifiable(&w.feature))
            .map(|w| display_name(&w.feature).to_string())
            .collect();
        if !drivers.is_empty() {
            sentences.push(format!(
                "The primary risk drivers are {}, which cannot be modified by this intervention.",
                join_phrases(&drivers)
            ));
        }
    }

    sentences.join(" ")
}

/// One phrase per metric that moved, e.g. "blood pressure reduced by 21.7 mmHg".
fn metric_changes(current: &ModifiableMetrics, simulated: &ModifiableMetrics) -> Vec<String> {
    current
        .entries()
        .iter()
        .zip(simulated.entries().iter())
        .filter_map(|((feature, before), (_, after))| {
            let delta = after - before;
            if delta.abs() < METRIC_EPSILON {
                return None;
            }
            let verb = if delta < 0.0 { "reduced" } else { "increased" };
            Some(format!(
                "{} {} by {:.1}{}",
                display_name(feature),
                verb,
                delta.abs(),
                unit(feature)
            ))
        })
        .collect()
}

fn unit(feature: &str) -> &'static str {
    match feature {
        "trestbps" => " mmHg",
        "chol" => " mg/dL",
        "thalach" => " bpm",
        _ => "",
    }
}

/// True if any metric moved in its beneficial direction.
fn improved(current: &ModifiableMetrics, simulated: &ModifiableMetrics) -> bool {
    simulated.trestbps < current.trestbps - METRIC_EPSILON
        || simulated.chol < current.chol - METRIC_EPSILON
        || simulated.thalach > current.thalach + METRIC_EPSILON
        || simulated.oldpeak < current.oldpeak - METRIC_EPSILON
}

/// "a", "a and b", "a, b and c"
fn join_phrases(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
