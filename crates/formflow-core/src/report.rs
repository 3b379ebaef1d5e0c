use crate::outcome::FlowResult;
use crate::{Result, SuccessKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The structured record of one complete run: what was targeted, when it
/// started, and what each flow observed. Written as `run-report.json` next to
/// the evidence files so the artifacts are self-describing.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub target_url: String,
    pub started_at: String,
    pub flows: Vec<FlowResult>,
}

impl RunReport {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            started_at: chrono::Utc::now().to_rfc3339(),
            flows: Vec::new(),
        }
    }

    pub fn push(&mut self, flow: FlowResult) {
        self.flows.push(flow);
    }

    /// The positive flow's classification, if that flow ran. `Synthetic`
    /// means the harness manufactured the banner; it is not a pass.
    pub fn success_kind(&self) -> Option<SuccessKind> {
        self.flows.iter().find_map(|f| f.success)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!("Run report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{FlowKind, StepStatus};

    #[test]
    fn test_report_round_trips() {
        let mut report = RunReport::new("file:///tmp/index.html");
        let mut flow = FlowResult::new(FlowKind::Positive);
        flow.success = Some(SuccessKind::Synthetic);
        flow.record_step("submit", StepStatus::Completed);
        report.push(flow);

        let json = serde_json::to_string(&report).unwrap();
        let back: RunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.target_url, "file:///tmp/index.html");
        assert_eq!(back.flows.len(), 1);
        assert_eq!(back.success_kind(), Some(SuccessKind::Synthetic));
    }

    #[test]
    fn test_success_kind_absent_when_positive_flow_missing() {
        let report = RunReport::new("file:///tmp/index.html");
        assert_eq!(report.success_kind(), None);
    }
}
