//! Flow A: all required fields valid except the last name, which is left
//! empty so the subject must show its field-specific inline error.

use crate::fill::apply_cascade;
use crate::orchestrator::{Orchestrator, contain};
use crate::subject::{sel, style};
use formflow_browser::{Result, WaitCondition, dom};
use formflow_core::{FlowKind, FlowResult};
use std::time::Duration;

/// Budget for the inline error to appear after submit.
const ERROR_BUDGET: Duration = Duration::from_secs(4);

pub(crate) async fn run(cx: &Orchestrator<'_>) -> Result<FlowResult> {
    let mut flow = FlowResult::new(FlowKind::Negative);
    let page = cx.page();
    let settle = cx.config().settle;

    contain(
        &mut flow,
        "reset",
        dom::reset_form(page, sel::FORM, settle).await,
    )?;

    contain(
        &mut flow,
        "fill-firstName",
        dom::set_field(page, sel::FIRST_NAME, "AFirst", settle).await,
    )?;
    // lastName deliberately skipped: it is the field under test.
    contain(
        &mut flow,
        "fill-email",
        dom::set_field(page, sel::EMAIL, "auser@example.com", settle).await,
    )?;
    contain(
        &mut flow,
        "fill-phone",
        dom::set_field(page, sel::PHONE, "+911234567890", settle).await,
    )?;
    contain(
        &mut flow,
        "select-gender",
        dom::click(page, &sel::gender("Female")).await,
    )?;

    apply_cascade(cx, &mut flow, "IN", "Maharashtra", "Mumbai").await?;

    contain(
        &mut flow,
        "fill-password",
        dom::set_field(page, sel::PASSWORD, "Weakpass1", settle).await,
    )?;
    contain(
        &mut flow,
        "fill-confirmPassword",
        dom::set_field(page, sel::CONFIRM_PASSWORD, "Weakpass1", settle).await,
    )?;
    contain(
        &mut flow,
        "accept-terms",
        dom::set_checkbox(page, sel::TERMS, true).await,
    )?;

    contain(&mut flow, "submit", dom::click(page, sel::SUBMIT).await)?;

    // The oracle: did the subject surface its last-name inline error? The
    // boolean is recorded either way; an expired budget is an observation,
    // never an error.
    let error_shown = dom::wait_for(
        page,
        &WaitCondition::text_contains(sel::LAST_NAME_ERROR, "Last", ERROR_BUDGET),
    )
    .await;
    flow.observe("last_name_error_shown", error_shown);
    tracing::info!("inline last-name error present: {}", error_shown);

    dom::highlight(page, sel::LAST_NAME_ERROR, style::ERROR_HIGHLIGHT).await;

    // Fixed scroll so the top of the form is in frame across runs.
    contain(&mut flow, "scroll", dom::scroll_to(page, 0, 140).await)?;
    tokio::time::sleep(settle).await;

    let name = flow.flow.evidence_name();
    if let Some(pair) = contain(
        &mut flow,
        "capture",
        cx.evidence().capture(page, name).await,
    )? {
        flow.evidence = Some(pair);
    }

    Ok(flow)
}
