use serde::Serialize;

use crate::records::Grade;

/// Weights are considered complete when they sum to 100 within this margin.
const WEIGHT_EPSILON: f64 = 1e-9;

/// One-decimal rounding used for displayed percentages:
/// `floor(10*x + 0.5) / 10`
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// Fraction of the item earned. Items without a positive `maxScore` earn 0.
fn earned_fraction(g: &Grade) -> f64 {
    if g.max_score > 0.0 {
        g.score / g.max_score
    } else {
        0.0
    }
}

/// `Σ (score / maxScore) × percentage` over every grade. Weights are not
/// normalized, so the result is only a true percentage when they sum to 100.
pub fn weighted_total(grades: &[Grade]) -> f64 {
    grades
        .iter()
        .map(|g| earned_fraction(g) * g.percentage)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeLine {
    pub id: String,
    pub title: String,
    pub category: String,
    pub percent: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSummary {
    pub weighted_total: f64,
    pub weighted_total_display: f64,
    pub weight_sum: f64,
    pub weights_complete: bool,
    pub items: Vec<GradeLine>,
}

pub fn grade_summary(grades: &[Grade]) -> GradeSummary {
    let items: Vec<GradeLine> = grades
        .iter()
        .map(|g| {
            let fraction = earned_fraction(g);
            GradeLine {
                id: g.id.clone(),
                title: g.title.clone(),
                category: g.category.as_str().to_string(),
                percent: round_off_1_decimal(100.0 * fraction),
                weight: g.percentage,
                contribution: fraction * g.percentage,
            }
        })
        .collect();

    let total = weighted_total(grades);
    let weight_sum: f64 = grades.iter().map(|g| g.percentage).sum();

    GradeSummary {
        weighted_total: total,
        weighted_total_display: round_off_1_decimal(total),
        weight_sum,
        weights_complete: (weight_sum - 100.0).abs() < WEIGHT_EPSILON,
        items,
    }
}
