//! Tunable constants for the allocation heuristics.

use serde::{Deserialize, Serialize};

/// Thresholds and scores used by the fallback heuristics.
///
/// Every field has a default, so a partial JSON policy file only needs to
/// name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllocationPolicy {
    /// Tasks estimated above this many hours get a second assignee
    pub collaboration_hours_threshold: f64,
    /// Confidence attached to heuristic assignments
    pub fallback_confidence: f64,
    /// Maximum personal recommendations returned
    pub max_recommendations: usize,
    /// Fit score of the best-ranked recommendation
    pub top_fit_score: f64,
    /// Fit score decrease per rank
    pub fit_score_step: f64,
    /// Fit score of the single recommendation made when no skill matches
    pub mismatch_fit_score: f64,
    /// Upper bound on the days a suggested timeline spreads over
    pub max_timeline_days: u32,
    /// Hours of work planned per timeline day
    pub hours_per_timeline_day: f64,
    /// Estimate used for tasks without one
    pub default_task_hours: f64,
    /// Active hours are divided by this to get the workload score
    pub workload_hours_divisor: f64,
    /// Workload score above which a member is overloaded
    pub overloaded_score: f64,
    /// Active task count above which a member is overloaded
    pub overloaded_task_count: usize,
    /// Workload score below which a member may be underutilized
    pub underutilized_score: f64,
    /// Active task count below which a member may be underutilized
    pub underutilized_task_count: usize,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            collaboration_hours_threshold: 8.0,
            fallback_confidence: 0.8,
            max_recommendations: 3,
            top_fit_score: 0.95,
            fit_score_step: 0.08,
            mismatch_fit_score: 0.65,
            max_timeline_days: 5,
            hours_per_timeline_day: 2.0,
            default_task_hours: 5.0,
            workload_hours_divisor: 10.0,
            overloaded_score: 7.0,
            overloaded_task_count: 3,
            underutilized_score: 3.0,
            underutilized_task_count: 2,
        }
    }
}

impl AllocationPolicy {
    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the collaboration threshold.
    pub fn with_collaboration_threshold(mut self, hours: f64) -> Self {
        self.collaboration_hours_threshold = hours;
        self
    }

    /// Set the recommendation limit.
    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = max;
        self
    }

    /// Set the overloaded thresholds.
    pub fn with_overloaded(mut self, score: f64, task_count: usize) -> Self {
        self.overloaded_score = score;
        self.overloaded_task_count = task_count;
        self
    }

    /// Set the underutilized thresholds.
    pub fn with_underutilized(mut self, score: f64, task_count: usize) -> Self {
        self.underutilized_score = score;
        self.underutilized_task_count = task_count;
        self
    }

    /// Fit score for a zero-based rank, clamped to [0, 1].
    pub fn fit_score(&self, rank: usize) -> f64 {
        (self.top_fit_score - rank as f64 * self.fit_score_step).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_policy_file() {
        let policy: AllocationPolicy =
            serde_json::from_str(r#"{"collaborationHoursThreshold": 12, "maxRecommendations": 5}"#)
                .unwrap();
        assert_eq!(policy.collaboration_hours_threshold, 12.0);
        assert_eq!(policy.max_recommendations, 5);
        assert_eq!(policy.fallback_confidence, 0.8);
        assert_eq!(policy.overloaded_task_count, 3);
    }

    #[test]
    fn test_fit_score_is_clamped() {
        let policy = AllocationPolicy::new().with_max_recommendations(20);
        assert!((policy.fit_score(0) - 0.95).abs() < 1e-9);
        assert!((policy.fit_score(2) - 0.79).abs() < 1e-9);
        assert_eq!(policy.fit_score(15), 0.0);
    }
}
