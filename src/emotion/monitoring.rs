use serde::{Deserialize, Serialize};

use crate::constants::DISTRIBUTION_SUM_TOLERANCE;
use crate::emotion::types::{EmotionDistribution, EmotionResult};

// 两位小数的和在二进制浮点下可能超出容差一个 ULP
const SUM_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvariantViolation {
    pub field: String,
    pub value: f64,
    pub expected_range: String,
}

pub fn check_distribution(distribution: &EmotionDistribution) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (emotion, value) in distribution.iter() {
        check_range(&mut violations, emotion.as_str(), value, 0.0, 1.0);
    }

    let sum = distribution.sum();
    check_range(
        &mut violations,
        "sum",
        sum,
        1.0 - DISTRIBUTION_SUM_TOLERANCE - SUM_EPSILON,
        1.0 + DISTRIBUTION_SUM_TOLERANCE + SUM_EPSILON,
    );

    violations
}

pub fn check_result(result: &EmotionResult) -> Vec<InvariantViolation> {
    let mut violations = check_distribution(&result.distribution);
    // 置信度取当前帧分布的最大值，与稳定后的标签无关
    let (_, peak) = result.distribution.dominant();
    if result.confidence.is_nan() || (result.confidence - peak).abs() > 1e-9 {
        violations.push(InvariantViolation {
            field: "confidence".to_string(),
            value: result.confidence,
            expected_range: format!("== {peak}"),
        });
    }
    violations
}

fn check_range(
    violations: &mut Vec<InvariantViolation>,
    field: &str,
    value: f64,
    min: f64,
    max: f64,
) {
    if value.is_nan() {
        violations.push(InvariantViolation {
            field: field.to_string(),
            value: f64::NAN,
            expected_range: format!("[{min}, {max}]"),
        });
        return;
    }
    if value < min || value > max {
        violations.push(InvariantViolation {
            field: field.to_string(),
            value,
            expected_range: format!("[{min}, {max}]"),
        });
    }
}

pub fn report(result: &EmotionResult) -> bool {
    let violations = check_result(result);
    if violations.is_empty() {
        return true;
    }
    tracing::warn!(
        emotion = %result.emotion,
        violations = ?violations,
        "Emotion distribution invariant violation"
    );
    false
}
