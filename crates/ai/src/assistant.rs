//! Model-backed task assistant with deterministic fallbacks.
//!
//! Every request first goes to the generative model under a timeout. If the
//! call fails, times out, or the answer does not validate, the matching
//! heuristic from `eventdesk-allocation` answers instead, so callers always
//! get a result.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use eventdesk_allocation::{
    AllocationPolicy, AssignmentRecommender, PersonalTaskMatcher, Result, WorkloadBalancer,
};
use eventdesk_core::{AllocationResult, RecommendationResult, Task, TeamMember, WorkloadReport};
use serde::Serialize;
use tracing::{info, warn};

use crate::client::{GeminiClient, ModelClient, OfflineClient};
use crate::config::AiConfig;
use crate::error::{AiError, ResponseError};
use crate::prompt;
use crate::response;

/// Where an answer came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AdviceSource {
    /// Validated model answer
    Model,
    /// Heuristic answer; `reason` says why the model was not used
    Fallback {
        /// Why the model answer was discarded
        reason: String,
    },
}

/// An answer plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice<T> {
    /// The answer
    pub result: T,
    /// Provenance
    pub source: AdviceSource,
}

impl<T> Advice<T> {
    fn model(result: T) -> Self {
        Self {
            result,
            source: AdviceSource::Model,
        }
    }

    fn fallback(result: T, reason: impl Into<String>) -> Self {
        Self {
            result,
            source: AdviceSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    /// Whether the heuristic answered.
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, AdviceSource::Fallback { .. })
    }
}

/// Task assignment, personal recommendations and workload insights.
#[derive(Clone)]
pub struct TaskAssistant {
    client: Arc<dyn ModelClient>,
    policy: AllocationPolicy,
    timeout: Duration,
}

impl TaskAssistant {
    /// Create an assistant around `client`.
    pub fn new(client: Arc<dyn ModelClient>, policy: AllocationPolicy, timeout: Duration) -> Self {
        Self {
            client,
            policy,
            timeout,
        }
    }

    /// Use the hosted model when an API key is configured, otherwise run
    /// offline on the heuristics alone.
    pub fn from_config(config: &AiConfig, policy: AllocationPolicy) -> std::result::Result<Self, AiError> {
        let client: Arc<dyn ModelClient> = match config.api_key {
            Some(_) => Arc::new(GeminiClient::from_config(config)?),
            None => {
                info!("No model API key configured, using heuristics only");
                Arc::new(OfflineClient)
            }
        };
        Ok(Self::new(client, policy, config.timeout))
    }

    /// Policy used by the fallbacks.
    pub fn policy(&self) -> &AllocationPolicy {
        &self.policy
    }

    /// Recommend assignees for `task`. Fails only on an empty roster, before
    /// the model is consulted.
    pub async fn assign_task(
        &self,
        task: &Task,
        roster: &[TeamMember],
    ) -> Result<Advice<AllocationResult>> {
        info!(task = %task.id, "Generating task assignment");
        let fallback = AssignmentRecommender::new(self.policy.clone()).recommend(task, roster)?;

        let prompt = prompt::assignment_prompt(task, roster);
        let answer = self
            .ask(&prompt, |text| response::parse_assignment(text, roster))
            .await;

        Ok(match answer {
            Ok(result) => Advice::model(result),
            Err(reason) => Advice::fallback(fallback, reason),
        })
    }

    /// Recommend open tasks for `member`. `candidates` must already exclude
    /// completed and assigned tasks.
    pub async fn recommend_tasks(
        &self,
        member: &TeamMember,
        candidates: &[Task],
    ) -> Advice<RecommendationResult> {
        info!(member = %member.id, candidates = candidates.len(), "Generating task recommendations");
        let matcher = PersonalTaskMatcher::new(self.policy.clone());

        if candidates.is_empty() {
            return Advice::fallback(matcher.recommend(member, candidates), "no candidate tasks");
        }

        let limit = self.policy.max_recommendations;
        let prompt = prompt::recommendation_prompt(member, candidates, limit);
        match self
            .ask(&prompt, |text| response::parse_recommendations(text, candidates, limit))
            .await
        {
            Ok(result) => Advice::model(result),
            Err(reason) => Advice::fallback(matcher.recommend(member, candidates), reason),
        }
    }

    /// Classify the team's workload and suggest redistributions.
    pub async fn workload_insights(
        &self,
        roster: &[TeamMember],
        all_tasks: &[Task],
    ) -> Advice<WorkloadReport> {
        info!(members = roster.len(), tasks = all_tasks.len(), "Generating workload insights");

        let prompt = prompt::workload_prompt(roster, all_tasks, self.policy.default_task_hours);
        match self
            .ask(&prompt, |text| response::parse_workload(text, roster, all_tasks))
            .await
        {
            Ok(result) => Advice::model(result),
            Err(reason) => Advice::fallback(
                WorkloadBalancer::new(self.policy.clone()).analyze(roster, all_tasks),
                reason,
            ),
        }
    }

    /// Call the model and validate its answer. The error is the reason to
    /// fall back.
    async fn ask<T>(
        &self,
        prompt: &str,
        parse: impl FnOnce(&str) -> std::result::Result<T, ResponseError>,
    ) -> std::result::Result<T, String> {
        let reason = match with_timeout(self.timeout, self.client.generate(prompt)).await {
            Ok(text) => match parse(&text) {
                Ok(result) => return Ok(result),
                Err(e) => format!("unusable model response: {e}"),
            },
            Err(e) => e.to_string(),
        };

        warn!(%reason, "Falling back to heuristic");
        Err(reason)
    }
}

async fn with_timeout<F>(limit: Duration, call: F) -> std::result::Result<String, AiError>
where
    F: Future<Output = std::result::Result<String, AiError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(AiError::Timeout(limit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use eventdesk_allocation::AllocationError;
    use eventdesk_core::{Hours, MemberId, Priority, TaskId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedClient {
        reply: std::result::Result<String, u16>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(text: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone().map_err(|status| AiError::Status {
                status,
                body: "boom".to_string(),
            })
        }
    }

    fn assistant(client: Arc<ScriptedClient>) -> TaskAssistant {
        TaskAssistant::new(client, AllocationPolicy::default(), Duration::from_secs(2))
    }

    fn roster() -> Vec<TeamMember> {
        vec![
            TeamMember::new("u1", "John").with_skills(["Design"]).with_current_tasks(["a", "b"]),
            TeamMember::new("u2", "Jane").with_skills(["Design"]),
        ]
    }

    fn task() -> Task {
        Task::new("t1", "Poster", Priority::High, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap())
            .with_skills(["Design"])
            .with_hours(Hours::new(5.0).unwrap())
    }

    #[tokio::test]
    async fn test_valid_model_answer_is_used() {
        let client = ScriptedClient::answering(
            r#"Answer: {"assignedTo":["u1"],"reasoning":"Senior","suggestedTimeline":"Today","confidenceScore":0.95}"#,
        );
        let advice = assistant(client).assign_task(&task(), &roster()).await.unwrap();

        assert_eq!(advice.source, AdviceSource::Model);
        assert_eq!(advice.result.assigned_to, vec![MemberId::new("u1")]);
        assert_eq!(advice.result.confidence_score, 0.95);
    }

    #[tokio::test]
    async fn test_unparsable_answer_falls_back() {
        let client = ScriptedClient::answering("I think Jane should do it.");
        let advice = assistant(client).assign_task(&task(), &roster()).await.unwrap();

        assert!(advice.is_fallback());
        assert_eq!(advice.result.assigned_to, vec![MemberId::new("u2")]);
        assert_eq!(advice.result.confidence_score, 0.8);
    }

    #[tokio::test]
    async fn test_answer_naming_stranger_falls_back() {
        let client = ScriptedClient::answering(
            r#"{"assignedTo":["intern"],"reasoning":"r","suggestedTimeline":"t","confidenceScore":0.9}"#,
        );
        let advice = assistant(client).assign_task(&task(), &roster()).await.unwrap();
        assert!(advice.is_fallback());
        assert_eq!(advice.result.assigned_to, vec![MemberId::new("u2")]);
    }

    #[tokio::test]
    async fn test_client_error_falls_back() {
        let advice = assistant(ScriptedClient::failing(503))
            .workload_insights(&roster(), &[])
            .await;

        match &advice.source {
            AdviceSource::Fallback { reason } => assert!(reason.contains("503")),
            other => panic!("expected fallback, got {other:?}"),
        }
        assert_eq!(advice.result.underutilized.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let client = ScriptedClient::slow(
            r#"{"recommendedTasks":[{"taskId":"t1","reasoning":"r","fitScore":0.5}]}"#,
            Duration::from_secs(60),
        );
        let advice = assistant(client).recommend_tasks(&roster()[1], &[task()]).await;

        match &advice.source {
            AdviceSource::Fallback { reason } => assert!(reason.contains("timed out")),
            other => panic!("expected fallback, got {other:?}"),
        }
        assert_eq!(advice.result.recommended_tasks[0].task_id, TaskId::new("t1"));
        assert!((advice.result.recommended_tasks[0].fit_score - 0.95).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_roster_errors_without_calling_model() {
        let client = ScriptedClient::answering("{}");
        let err = assistant(client.clone()).assign_task(&task(), &[]).await.unwrap_err();

        assert!(matches!(err, AllocationError::InvalidInput(_)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_candidates_skips_model() {
        let client = ScriptedClient::answering("{}");
        let advice = assistant(client.clone()).recommend_tasks(&roster()[0], &[]).await;

        assert!(advice.is_fallback());
        assert!(advice.result.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_offline_assistant_uses_heuristics() {
        let assistant = TaskAssistant::from_config(&AiConfig::default(), AllocationPolicy::default()).unwrap();
        let advice = assistant.workload_insights(&roster(), &[]).await;
        assert!(advice.is_fallback());
    }
}
