//! Plain-text output for the CLI.

use cardio_contracts::{
    patient::display_name,
    recommendation::{ComparisonResult, Recommendation},
    risk::RiskResult,
    simulation::SimulationResult,
};

const TOP_FEATURES: usize = 5;

pub fn risk(result: &RiskResult) {
    println!();
    println!("  Risk score:      {:.1}%", result.risk_score);
    println!("  Classification:  {}", result.classification);
    println!("  Disease likely:  {}", if result.has_disease { "yes" } else { "no" });
    println!();
    println!("  Top risk drivers:");
    for w in result.top_features(TOP_FEATURES) {
        println!("    {:<26} {:.3}", display_name(&w.feature), w.weight);
    }
    println!();
}

pub fn recommendation(rec: &Recommendation) {
    println!();
    println!("  Recommended:     [{}] {}", rec.action, rec.action_name);
    println!("  Description:     {}", rec.description);
    println!("  Cost:            {}", rec.cost);
    println!("  Intensity:       {}", rec.intensity);
    println!("  Current risk:    {:.1}%", rec.current_risk);
    println!(
        "  Expected risk:   {:.1}% (reduction {:.1}%)",
        rec.expected_final_risk, rec.expected_risk_reduction
    );
    if rec.was_escalated() {
        println!("  Escalated from:  [{}] {}", rec.base_action, rec.base_action.name());
        for reason in &rec.escalation_reasons {
            println!("    - {}", reason);
        }
    }
    if !rec.risk_factors.is_empty() {
        println!(
            "  Risk factors:    {} severe, {} moderate",
            rec.risk_factors.severe_count, rec.risk_factors.moderate_count
        );
        for detail in &rec.risk_factors.details {
            println!("    - {}", detail);
        }
    }
    println!();
    println!("  {}", rec.rationale);
    println!();
}

pub fn simulation(result: &SimulationResult) {
    println!();
    println!("  Action:          [{}] {}", result.action, result.action.name());
    println!("  Current risk:    {:.1}%", result.current_risk);
    println!("  Expected risk:   {:.1}%", result.expected_risk);
    println!("  Reduction:       {:.1}%", result.risk_reduction);
    if result.risk_capped {
        println!("  Note:            model estimate rose and was capped at the current risk");
    }
    println!();
    println!("  {:<18} {:>10} {:>10}", "Metric", "Current", "Expected");
    let current = result.current_metrics.entries();
    let optimized = result.optimized_metrics.entries();
    for ((name, before), (_, after)) in current.iter().zip(optimized.iter()) {
        println!("  {:<18} {:>10.1} {:>10.1}", display_name(name), before, after);
    }
    println!();
    println!("  {}", result.explanation);
    println!();
}

pub fn comparison(result: &ComparisonResult) {
    println!();
    println!("  Baseline risk:   {:.1}% ({})", result.baseline_risk, result.risk_tier);
    println!("  Recommended:     [{}] {}", result.recommended_action, result.recommendation_name);
    println!("  Alternative:     [{}] {}", result.alternative_action, result.alternative_name);
    println!();
    println!(
        "  {:<3} {:<26} {:>9} {:>9} {:>7}  {:<13} {:<13}",
        "", "Option", "New risk", "Reduced", "Pct", "Cost", "Side effects"
    );
    for option in &result.all_options {
        let marker = if option.is_recommended {
            "*"
        } else if option.is_alternative {
            "+"
        } else {
            ""
        };
        println!(
            "  {:<3} {:<26} {:>8.1}% {:>8.1}% {:>6.1}%  {:<13} {:<13}",
            marker,
            option.name,
            option.new_risk,
            option.risk_reduction,
            option.pct_reduction,
            option.cost,
            option.side_effects
        );
    }
    println!();
    println!("  {}", result.rationale);
    println!();
}
