//! Aggregation of rule failures into a traffic light and scores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Severity, ValidationCategory, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Red,
    Yellow,
    Green,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub results: Vec<ValidationResult>,
    /// Mean of the category scores, 0-100.
    pub score: u32,
    pub status: TrafficLight,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub category_scores: BTreeMap<ValidationCategory, u32>,
}

/// Any error is red, otherwise any warning is yellow, otherwise green.
/// Info results never change the light.
pub fn traffic_light(results: &[ValidationResult]) -> TrafficLight {
    if results.iter().any(|r| r.severity == Severity::Error) {
        TrafficLight::Red
    } else if results.iter().any(|r| r.severity == Severity::Warning) {
        TrafficLight::Yellow
    } else {
        TrafficLight::Green
    }
}

pub fn summarize(results: Vec<ValidationResult>) -> ValidationSummary {
    let count = |severity: Severity| results.iter().filter(|r| r.severity == severity).count();
    let errors = count(Severity::Error);
    let warnings = count(Severity::Warning);
    let infos = count(Severity::Info);

    let category_scores: BTreeMap<ValidationCategory, u32> = ValidationCategory::all()
        .iter()
        .map(|&category| (category, category_score(&results, category)))
        .collect();

    let total: u32 = category_scores.values().sum();
    let score = (f64::from(total) / ValidationCategory::all().len() as f64).round() as u32;

    ValidationSummary {
        status: traffic_light(&results),
        results,
        score,
        errors,
        warnings,
        infos,
        category_scores,
    }
}

/// 100 minus 30 per error and 10 per warning, floored at zero.
fn category_score(results: &[ValidationResult], category: ValidationCategory) -> u32 {
    let penalty: u32 = results
        .iter()
        .filter(|r| r.category == category)
        .map(|r| match r.severity {
            Severity::Error => 30,
            Severity::Warning => 10,
            Severity::Info => 0,
        })
        .sum();
    100u32.saturating_sub(penalty)
}
