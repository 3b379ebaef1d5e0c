//! Shared fill logic: the cascade helper and the known-good profile used by
//! the positive flow and the gating check.

use crate::orchestrator::{Orchestrator, contain};
use crate::subject::{CASCADE_BUDGET, sel, valid_text_fields};
use formflow_browser::{Result, WaitCondition, dom};
use formflow_core::FlowResult;

/// Apply country → state → city, each level only after the previous
/// selection has repopulated the dependent list. The settling is a bounded
/// wait on the dependent select's contents, not a fixed guess; if a level
/// never repopulates, the deeper selections are skipped and recorded.
pub(crate) async fn apply_cascade(
    cx: &Orchestrator<'_>,
    flow: &mut FlowResult,
    country_value: &str,
    state_label: &str,
    city_label: &str,
) -> Result<()> {
    let page = cx.page();

    if contain(
        flow,
        "select-country",
        dom::select_by_value(page, sel::COUNTRY, country_value).await,
    )?
    .is_none()
    {
        return Ok(());
    }

    let states_ready = dom::wait_for(
        page,
        &WaitCondition::text_contains(sel::STATE, state_label, CASCADE_BUDGET),
    )
    .await;
    if !states_ready {
        tracing::warn!("state list never offered '{}', skipping deeper cascade", state_label);
        flow.record_step("select-state", formflow_core::StepStatus::Absent);
        return Ok(());
    }
    if contain(
        flow,
        "select-state",
        dom::select_by_text(page, sel::STATE, state_label).await,
    )?
    .is_none()
    {
        return Ok(());
    }

    let cities_ready = dom::wait_for(
        page,
        &WaitCondition::text_contains(sel::CITY, city_label, CASCADE_BUDGET),
    )
    .await;
    if !cities_ready {
        tracing::warn!("city list never offered '{}'", city_label);
        flow.record_step("select-city", formflow_core::StepStatus::Absent);
        return Ok(());
    }
    contain(
        flow,
        "select-city",
        dom::select_by_text(page, sel::CITY, city_label).await,
    )?;

    Ok(())
}

/// Fill every field with values that satisfy the subject's validation rules:
/// all text inputs, gender, the IN → Maharashtra → Mumbai cascade, and the
/// consent checkbox.
pub(crate) async fn fill_valid_profile(
    cx: &Orchestrator<'_>,
    flow: &mut FlowResult,
) -> Result<()> {
    let page = cx.page();
    let settle = cx.config().settle;

    for field in valid_text_fields() {
        contain(
            flow,
            &format!("fill-{}", field.field),
            dom::set_field(page, field.locator, field.value, settle).await,
        )?;
    }

    contain(
        flow,
        "select-gender",
        dom::click(page, &sel::gender("Male")).await,
    )?;

    apply_cascade(cx, flow, "IN", "Maharashtra", "Mumbai").await?;

    contain(
        flow,
        "accept-terms",
        dom::set_checkbox(page, sel::TERMS, true).await,
    )?;

    Ok(())
}
