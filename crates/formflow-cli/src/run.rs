use anyhow::Result;
use formflow_browser::{EvidenceWriter, LaunchOptions, Session};
use formflow_core::config::{WINDOW_HEIGHT, WINDOW_WIDTH};
use formflow_core::{FlowResult, HarnessConfig, RunReport, SuccessKind};
use std::path::Path;

pub fn execute(url: &str, headless: bool, out_dir: &Path) -> Result<()> {
    // Config validation happens before any browser is launched, so a bad
    // URL fails fast and cheap.
    let config = HarnessConfig::new(url, headless, out_dir.to_path_buf())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let evidence = EvidenceWriter::new(&config.evidence_dir)?;
        println!("📁 Evidence directory: {}", evidence.dir().display());

        let options = LaunchOptions::new(config.headless, (WINDOW_WIDTH, WINDOW_HEIGHT));
        let session = Session::launch(&options).await?;

        let mut report = RunReport::new(&config.url);
        let outcome = drive(&session, &evidence, &config, &mut report).await;

        // Teardown runs on every exit path, fatal or not, before the
        // outcome is inspected.
        session.close().await;

        // Whatever flows completed are still worth a report, even when the
        // run aborted on a session failure.
        let report_path = evidence.dir().join("run-report.json");
        if let Err(e) = report.write(&report_path) {
            tracing::warn!("could not write run report: {}", e);
        }

        outcome?;
        summarize(&report);
        Ok(())
    });

    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}

async fn drive(
    session: &Session,
    evidence: &EvidenceWriter,
    config: &HarnessConfig,
    report: &mut RunReport,
) -> Result<()> {
    session.goto(&config.url).await?;

    let orchestrator = formflow_flows::Orchestrator::new(session, evidence, config);
    orchestrator.run(report).await?;
    Ok(())
}

/// Per-flow oracle misses are reported, never escalated: the exit code only
/// reflects setup and session failures.
fn summarize(report: &RunReport) {
    println!();
    println!("📊 Run complete: {} flows", report.flows.len());
    for flow in &report.flows {
        let marker = if flow.clean() { "✅" } else { "⚠️ " };
        println!("{} {}{}", marker, flow.flow.as_str(), flow_detail(flow));
        if let Some(pair) = &flow.evidence {
            if let Some(png) = &pair.screenshot {
                println!("   📷 {}", png.display());
            }
            println!("   📄 {}", pair.dom.display());
        }
    }
    if report.success_kind() == Some(SuccessKind::Synthetic) {
        println!();
        println!(
            "⚠️  The success banner was synthesized by the harness; this is evidence, \
             not a passing assertion about the subject."
        );
    }
}

fn flow_detail(flow: &FlowResult) -> String {
    match flow.success {
        Some(SuccessKind::Genuine) => " (success: genuine)".to_string(),
        Some(SuccessKind::Synthetic) => " (success: SYNTHETIC)".to_string(),
        None => String::new(),
    }
}
