use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The three scenarios, always executed in this order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    /// Missing required field must surface an inline error.
    Negative,
    /// Valid submission must surface a success banner.
    Positive,
    /// Cross-field logic: cascades, strength meter, confirm match, gating.
    LogicChecks,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowKind::Negative => "negative",
            FlowKind::Positive => "positive",
            FlowKind::LogicChecks => "logic-checks",
        }
    }

    /// Base name for this flow's evidence artifacts.
    pub fn evidence_name(&self) -> &'static str {
        match self {
            FlowKind::Negative => "error-state",
            FlowKind::Positive => "success-state",
            FlowKind::LogicChecks => "flowC-state",
        }
    }
}

/// How a single orchestration step ended.
///
/// Every step is recorded, including the ones that found nothing. A missing
/// element is `Absent`, not an error: the caller decides whether the flow
/// can still produce useful evidence without it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Absent,
    Failed { kind: String },
}

/// One entry in a flow's step log.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Whether the success banner observed in the positive flow was produced by
/// the subject itself or injected by the harness after the wait budget
/// expired.
///
/// A `Synthetic` success keeps the evidence deterministic but is not a
/// functional assertion about the subject; consumers must never treat the two
/// as interchangeable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessKind {
    Genuine,
    Synthetic,
}

/// Paths of the artifacts a flow wrote. The visual snapshot is optional
/// because the logic flow captures DOM only.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EvidencePair {
    pub screenshot: Option<PathBuf>,
    pub dom: PathBuf,
}

/// Everything one flow observed: the ordered step log, a map of named
/// observations read from the DOM, the positive flow's success
/// classification, and the evidence paths. Built incrementally while the
/// flow runs, then frozen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowResult {
    pub flow: FlowKind,
    pub steps: Vec<StepRecord>,
    pub observed: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<SuccessKind>,
    pub evidence: Option<EvidencePair>,
}

impl FlowResult {
    pub fn new(flow: FlowKind) -> Self {
        Self {
            flow,
            steps: Vec::new(),
            observed: BTreeMap::new(),
            success: None,
            evidence: None,
        }
    }

    pub fn record_step(&mut self, name: impl Into<String>, status: StepStatus) {
        let record = StepRecord {
            name: name.into(),
            status,
        };
        tracing::debug!("{}: step {:?} -> {:?}", self.flow.as_str(), record.name, record.status);
        self.steps.push(record);
    }

    /// Store a named observation (a boolean, a string, a list of labels).
    pub fn observe(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.observed.insert(key.into(), value.into());
    }

    pub fn observation(&self, key: &str) -> Option<&serde_json::Value> {
        self.observed.get(key)
    }

    /// True when no step failed outright (absent sub-checks still count as a
    /// clean run; they are visible in the step log).
    pub fn clean(&self) -> bool {
        self.steps
            .iter()
            .all(|s| !matches!(s.status, StepStatus::Failed { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_names_are_stable() {
        assert_eq!(FlowKind::Negative.evidence_name(), "error-state");
        assert_eq!(FlowKind::Positive.evidence_name(), "success-state");
        assert_eq!(FlowKind::LogicChecks.evidence_name(), "flowC-state");
    }

    #[test]
    fn test_step_log_preserves_order() {
        let mut result = FlowResult::new(FlowKind::Negative);
        result.record_step("reset", StepStatus::Completed);
        result.record_step("fill-gender", StepStatus::Absent);
        result.record_step(
            "submit",
            StepStatus::Failed {
                kind: "click".to_string(),
            },
        );

        let names: Vec<_> = result.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["reset", "fill-gender", "submit"]);
        assert!(!result.clean());
    }

    #[test]
    fn test_absent_steps_do_not_dirty_the_flow() {
        let mut result = FlowResult::new(FlowKind::LogicChecks);
        result.record_step("read-meter", StepStatus::Absent);
        assert!(result.clean());
    }

    #[test]
    fn test_success_kind_is_never_conflated_in_serialization() {
        let mut genuine = FlowResult::new(FlowKind::Positive);
        genuine.success = Some(SuccessKind::Genuine);
        let mut synthetic = FlowResult::new(FlowKind::Positive);
        synthetic.success = Some(SuccessKind::Synthetic);

        let g = serde_json::to_value(&genuine).unwrap();
        let s = serde_json::to_value(&synthetic).unwrap();
        assert_eq!(g["success"], "genuine");
        assert_eq!(s["success"], "synthetic");
        assert_ne!(g["success"], s["success"]);
    }

    #[test]
    fn test_unknown_observation_is_null_not_false() {
        let mut result = FlowResult::new(FlowKind::Positive);
        // A control that could not be read is unknown, which must stay
        // distinct from an observed `false`.
        result.observe("submit_disabled_before_click", None::<bool>);
        result.observe("submit_forced", false);

        let unknown = result.observation("submit_disabled_before_click").unwrap();
        assert!(unknown.is_null());
        assert_ne!(unknown, result.observation("submit_forced").unwrap());
    }

    #[test]
    fn test_flow_result_round_trips() {
        let mut result = FlowResult::new(FlowKind::LogicChecks);
        result.observe("submit_disabled_initial", false);
        result.observe("states_us", vec!["California", "New York"]);
        result.record_step("cascade-country", StepStatus::Completed);
        result.evidence = Some(EvidencePair {
            screenshot: None,
            dom: PathBuf::from("out/flowC-state.html"),
        });

        let json = serde_json::to_string(&result).unwrap();
        let back: FlowResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.flow, FlowKind::LogicChecks);
        assert_eq!(back.observed["submit_disabled_initial"], false);
        assert_eq!(back.steps, result.steps);
        assert_eq!(back.evidence, result.evidence);
    }
}
