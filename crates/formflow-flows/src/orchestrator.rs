use crate::{logic, negative, positive};
use formflow_browser::{Error, EvidenceWriter, Result, Session};
use formflow_core::{FlowResult, HarnessConfig, RunReport, StepStatus};

/// Sequences the three scenario flows against one borrowed session.
///
/// The orchestrator never aborts a flow on a step failure: every step runs
/// through [`contain`], which records the outcome and lets the state machine
/// advance so evidence capture is always reached. Only session-level errors
/// propagate, and those unwind to the caller's guaranteed teardown.
pub struct Orchestrator<'a> {
    session: &'a Session,
    evidence: &'a EvidenceWriter,
    config: &'a HarnessConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        session: &'a Session,
        evidence: &'a EvidenceWriter,
        config: &'a HarnessConfig,
    ) -> Self {
        Self {
            session,
            evidence,
            config,
        }
    }

    pub(crate) fn page(&self) -> &chromiumoxide::Page {
        self.session.page()
    }

    pub(crate) fn evidence(&self) -> &EvidenceWriter {
        self.evidence
    }

    pub(crate) fn config(&self) -> &HarnessConfig {
        self.config
    }

    /// Run Flow A, then B, then C, always in this order, pushing each
    /// FlowResult into the report as it completes. On a fatal session error
    /// the report keeps whatever flows already finished.
    pub async fn run(&self, report: &mut RunReport) -> Result<()> {
        tracing::info!("=== Flow A: negative (missing last name) ===");
        report.push(negative::run(self).await?);

        tracing::info!("=== Flow B: positive (valid submit) ===");
        report.push(positive::run(self).await?);

        tracing::info!("=== Flow C: logic and cross-field checks ===");
        report.push(logic::run(self).await?);

        Ok(())
    }
}

/// Containment policy for one orchestration step.
///
/// A missing element is recorded `Absent` and yields `None`; any other
/// non-session error is recorded `Failed` with its kind. Session-level
/// errors are the one thing a flow cannot absorb and are returned to unwind
/// the run.
pub(crate) fn contain<T>(
    flow: &mut FlowResult,
    name: &str,
    outcome: Result<T>,
) -> Result<Option<T>> {
    match outcome {
        Ok(value) => {
            flow.record_step(name, StepStatus::Completed);
            Ok(Some(value))
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(Error::ElementNotFound(locator)) => {
            tracing::warn!("step '{}': no element for {}", name, locator);
            flow.record_step(name, StepStatus::Absent);
            Ok(None)
        }
        Err(e) => {
            tracing::warn!("step '{}' failed: {}", name, e);
            flow.record_step(
                name,
                StepStatus::Failed {
                    kind: error_kind(&e).to_string(),
                },
            );
            Ok(None)
        }
    }
}

fn error_kind(e: &Error) -> &'static str {
    match e {
        Error::ElementNotFound(_) => "element-not-found",
        Error::Evidence(_) => "evidence",
        Error::Cdp(_) => "cdp",
        Error::SessionStart(_) | Error::Session(_) => "session",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_core::FlowKind;

    fn flow() -> FlowResult {
        FlowResult::new(FlowKind::Negative)
    }

    #[test]
    fn test_contain_records_success_and_yields_value() {
        let mut f = flow();
        let out = contain(&mut f, "fill", Ok(42)).unwrap();
        assert_eq!(out, Some(42));
        assert_eq!(f.steps[0].status, StepStatus::Completed);
    }

    #[test]
    fn test_contain_absorbs_missing_elements_as_absent() {
        let mut f = flow();
        let out: Option<()> = contain(
            &mut f,
            "select-gender",
            Err(Error::ElementNotFound("#gender".into())),
        )
        .unwrap();
        assert_eq!(out, None);
        assert_eq!(f.steps[0].status, StepStatus::Absent);
        assert!(f.clean());
    }

    #[test]
    fn test_contain_records_step_failures_with_kind() {
        let mut f = flow();
        let out: Option<()> =
            contain(&mut f, "submit", Err(Error::Cdp("node detached".into()))).unwrap();
        assert_eq!(out, None);
        assert_eq!(
            f.steps[0].status,
            StepStatus::Failed {
                kind: "cdp".to_string()
            }
        );
        assert!(!f.clean());
    }

    #[test]
    fn test_contain_propagates_session_errors() {
        let mut f = flow();
        let err = contain::<()>(&mut f, "reset", Err(Error::Session("ws closed".into())))
            .unwrap_err();
        assert!(err.is_fatal());
        // Nothing recorded: the flow is being abandoned, not degraded.
        assert!(f.steps.is_empty());
    }
}
