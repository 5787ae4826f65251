//! Strict parsing of model responses.
//!
//! The model answers in free text. The outermost `{ ... }` span is taken as
//! the payload, deserialized into a typed wire shape, and checked against
//! the records the prompt was built from. Anything that does not pass is
//! rejected whole; there is no partial recovery.

use std::collections::HashSet;
use std::sync::OnceLock;

use eventdesk_core::{
    check_score, AllocationResult, MemberId, ReassignmentSuggestion, RecommendationResult,
    RecommendedTask, Task, TaskId, TeamMember, WorkloadReport,
};
use regex::Regex;
use serde::Deserialize;

use crate::error::ResponseError;

type Result<T> = std::result::Result<T, ResponseError>;

fn json_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("static regex"))
}

/// The outermost `{ ... }` span of `text`.
pub fn extract_json_object(text: &str) -> Result<&str> {
    json_span()
        .find(text)
        .map(|m| m.as_str())
        .ok_or(ResponseError::NoJsonObject)
}

fn invalid(msg: impl Into<String>) -> ResponseError {
    ResponseError::Invalid(msg.into())
}

fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(invalid(format!("{field} is empty")))
    } else {
        Ok(())
    }
}

fn score(field: &str, value: f64) -> Result<f64> {
    check_score(value).map_err(|e| invalid(format!("{field}: {e}")))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentWire {
    assigned_to: Vec<MemberId>,
    reasoning: String,
    suggested_timeline: String,
    confidence_score: f64,
}

/// Parse an assignment answer for a task offered to `roster`.
pub fn parse_assignment(text: &str, roster: &[TeamMember]) -> Result<AllocationResult> {
    let wire: AssignmentWire = serde_json::from_str(extract_json_object(text)?)?;

    if !(1..=2).contains(&wire.assigned_to.len()) {
        return Err(invalid(format!(
            "expected 1 or 2 assignees, got {}",
            wire.assigned_to.len()
        )));
    }
    let mut seen = HashSet::new();
    for id in &wire.assigned_to {
        if !roster.iter().any(|m| &m.id == id) {
            return Err(invalid(format!("unknown member '{id}'")));
        }
        if !seen.insert(id) {
            return Err(invalid(format!("member '{id}' assigned twice")));
        }
    }
    non_empty("reasoning", &wire.reasoning)?;
    non_empty("suggestedTimeline", &wire.suggested_timeline)?;

    Ok(AllocationResult {
        confidence_score: score("confidenceScore", wire.confidence_score)?,
        assigned_to: wire.assigned_to,
        reasoning: wire.reasoning,
        suggested_timeline: wire.suggested_timeline,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendationWire {
    recommended_tasks: Vec<RecommendedTaskWire>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendedTaskWire {
    task_id: TaskId,
    reasoning: String,
    fit_score: f64,
}

/// Parse a recommendation answer over `candidates`.
pub fn parse_recommendations(
    text: &str,
    candidates: &[Task],
    limit: usize,
) -> Result<RecommendationResult> {
    let wire: RecommendationWire = serde_json::from_str(extract_json_object(text)?)?;

    if wire.recommended_tasks.len() > limit {
        return Err(invalid(format!(
            "expected at most {limit} recommendations, got {}",
            wire.recommended_tasks.len()
        )));
    }

    let mut seen = HashSet::new();
    let mut recommended_tasks = Vec::with_capacity(wire.recommended_tasks.len());
    for rec in wire.recommended_tasks {
        if !candidates.iter().any(|t| t.id == rec.task_id) {
            return Err(invalid(format!("'{}' is not a candidate task", rec.task_id)));
        }
        if !seen.insert(rec.task_id.clone()) {
            return Err(invalid(format!("task '{}' recommended twice", rec.task_id)));
        }
        non_empty("reasoning", &rec.reasoning)?;
        recommended_tasks.push(RecommendedTask {
            fit_score: score("fitScore", rec.fit_score)?,
            task_id: rec.task_id,
            reasoning: rec.reasoning,
        });
    }

    Ok(RecommendationResult { recommended_tasks })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkloadWire {
    workload_analysis: AnalysisWire,
    redistribution_suggestions: Vec<SuggestionWire>,
    general_insights: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisWire {
    overloaded_members: Vec<MemberId>,
    underutilized_members: Vec<MemberId>,
    balanced_members: Vec<MemberId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionWire {
    task_id: TaskId,
    current_assignee: MemberId,
    suggested_assignee: MemberId,
    reasoning: String,
}

/// Parse a workload answer for `roster` and `all_tasks`.
pub fn parse_workload(text: &str, roster: &[TeamMember], all_tasks: &[Task]) -> Result<WorkloadReport> {
    let wire: WorkloadWire = serde_json::from_str(extract_json_object(text)?)?;
    let analysis = wire.workload_analysis;

    let known: HashSet<&MemberId> = roster.iter().map(|m| &m.id).collect();
    let mut placed = HashSet::new();
    for id in analysis
        .overloaded_members
        .iter()
        .chain(&analysis.underutilized_members)
        .chain(&analysis.balanced_members)
    {
        if !known.contains(id) {
            return Err(invalid(format!("unknown member '{id}'")));
        }
        if !placed.insert(id) {
            return Err(invalid(format!("member '{id}' placed in more than one bucket")));
        }
    }
    if placed.len() != known.len() {
        return Err(invalid("workload buckets do not cover the whole roster"));
    }

    let mut suggestions = Vec::with_capacity(wire.redistribution_suggestions.len());
    for s in wire.redistribution_suggestions {
        if !all_tasks.iter().any(|t| t.id == s.task_id) {
            return Err(invalid(format!("unknown task '{}'", s.task_id)));
        }
        for id in [&s.current_assignee, &s.suggested_assignee] {
            if !known.contains(id) {
                return Err(invalid(format!("unknown member '{id}'")));
            }
        }
        suggestions.push(ReassignmentSuggestion {
            task_id: s.task_id,
            from_member: s.current_assignee,
            to_member: s.suggested_assignee,
            reasoning: s.reasoning,
        });
    }
    non_empty("generalInsights", &wire.general_insights)?;

    Ok(WorkloadReport {
        overloaded: analysis.overloaded_members,
        underutilized: analysis.underutilized_members,
        balanced: analysis.balanced_members,
        members: Vec::new(),
        suggestions,
        summary: wire.general_insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use eventdesk_core::Priority;

    fn roster() -> Vec<TeamMember> {
        vec![TeamMember::new("u1", "John"), TeamMember::new("u2", "Jane")]
    }

    fn tasks() -> Vec<Task> {
        let d = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        vec![
            Task::new("t1", "Poster", Priority::High, d),
            Task::new("t2", "Venue", Priority::Low, d),
        ]
    }

    #[test]
    fn test_extract_json_object_from_prose() {
        let text = "Sure! Here you go:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope it helps.";
        assert_eq!(extract_json_object(text).unwrap(), "{\"a\": {\"b\": 1}}");
        assert!(matches!(extract_json_object("no braces"), Err(ResponseError::NoJsonObject)));
    }

    #[test]
    fn test_parse_assignment_valid() {
        let text = r#"{"assignedTo":["u2"],"reasoning":"Has time","suggestedTimeline":"This week","confidenceScore":0.9}"#;
        let result = parse_assignment(text, &roster()).unwrap();
        assert_eq!(result.assigned_to, vec![MemberId::new("u2")]);
        assert_eq!(result.confidence_score, 0.9);
    }

    #[test]
    fn test_parse_assignment_rejects_bad_answers() {
        let cases = [
            r#"{"assignedTo":[],"reasoning":"r","suggestedTimeline":"t","confidenceScore":0.9}"#,
            r#"{"assignedTo":["u1","u2","u1"],"reasoning":"r","suggestedTimeline":"t","confidenceScore":0.9}"#,
            r#"{"assignedTo":["u1","u1"],"reasoning":"r","suggestedTimeline":"t","confidenceScore":0.9}"#,
            r#"{"assignedTo":["ghost"],"reasoning":"r","suggestedTimeline":"t","confidenceScore":0.9}"#,
            r#"{"assignedTo":["u1"],"reasoning":"r","suggestedTimeline":"t","confidenceScore":1.5}"#,
            r#"{"assignedTo":["u1"],"reasoning":"","suggestedTimeline":"t","confidenceScore":0.5}"#,
            r#"{"assignedTo":["u1"],"reasoning":"r","confidenceScore":0.5}"#,
            r#"{"assignedTo":["u1"], "reasoning": "r", // trailing comment
               "suggestedTimeline":"t","confidenceScore":0.5}"#,
        ];
        for text in cases {
            assert!(parse_assignment(text, &roster()).is_err(), "accepted: {text}");
        }
    }

    #[test]
    fn test_parse_recommendations() {
        let text = r#"Here: {"recommendedTasks":[{"taskId":"t2","reasoning":"fits","fitScore":0.7}]}"#;
        let result = parse_recommendations(text, &tasks(), 3).unwrap();
        assert_eq!(result.recommended_tasks[0].task_id, TaskId::new("t2"));

        let unknown = r#"{"recommendedTasks":[{"taskId":"t9","reasoning":"fits","fitScore":0.7}]}"#;
        assert!(parse_recommendations(unknown, &tasks(), 3).is_err());

        let too_many = r#"{"recommendedTasks":[
            {"taskId":"t1","reasoning":"a","fitScore":0.7},
            {"taskId":"t2","reasoning":"b","fitScore":0.6}]}"#;
        assert!(parse_recommendations(too_many, &tasks(), 1).is_err());

        let bad_score = r#"{"recommendedTasks":[{"taskId":"t1","reasoning":"a","fitScore":-1}]}"#;
        assert!(parse_recommendations(bad_score, &tasks(), 3).is_err());
    }

    #[test]
    fn test_parse_workload_requires_partition() {
        let valid = r#"{
            "workloadAnalysis": {"overloadedMembers":["u1"],"underutilizedMembers":["u2"],"balancedMembers":[]},
            "redistributionSuggestions":[{"taskId":"t1","currentAssignee":"u1","suggestedAssignee":"u2","reasoning":"r"}],
            "generalInsights":"Mostly fine"
        }"#;
        let report = parse_workload(valid, &roster(), &tasks()).unwrap();
        assert_eq!(report.overloaded, vec![MemberId::new("u1")]);
        assert_eq!(report.suggestions[0].to_member, MemberId::new("u2"));
        assert_eq!(report.summary, "Mostly fine");

        let missing = valid.replace(r#""underutilizedMembers":["u2"]"#, r#""underutilizedMembers":[]"#);
        assert!(parse_workload(&missing, &roster(), &tasks()).is_err());

        let twice = valid.replace(r#""balancedMembers":[]"#, r#""balancedMembers":["u1"]"#);
        assert!(parse_workload(&twice, &roster(), &tasks()).is_err());

        let unknown_task = valid.replace(r#""taskId":"t1""#, r#""taskId":"t7""#);
        assert!(parse_workload(&unknown_task, &roster(), &tasks()).is_err());
    }
}
