//! Flow C: cross-field logic. Validates data relationships rather than
//! visual state, so it captures a DOM snapshot only.

use crate::fill::fill_valid_profile;
use crate::orchestrator::{Orchestrator, contain};
use crate::subject::{CASCADE_BUDGET, STRONG_PASSWORD, sel};
use formflow_browser::{Result, WaitCondition, dom};
use formflow_core::{FlowKind, FlowResult};

/// How many option labels a cascade observation keeps.
const SAMPLE_LEN: usize = 8;

fn sample(mut labels: Vec<String>) -> Vec<String> {
    labels.truncate(SAMPLE_LEN);
    labels
}

pub(crate) async fn run(cx: &Orchestrator<'_>) -> Result<FlowResult> {
    let mut flow = FlowResult::new(FlowKind::LogicChecks);
    let page = cx.page();
    let settle = cx.config().settle;

    contain(
        &mut flow,
        "reset",
        dom::reset_form(page, sel::FORM, settle).await,
    )?;

    // (a) country -> state cascade.
    if contain(
        &mut flow,
        "select-country-us",
        dom::select_by_value(page, sel::COUNTRY, "US").await,
    )?
    .is_some()
    {
        let repopulated = dom::wait_for(
            page,
            &WaitCondition::text_contains(sel::STATE, "California", CASCADE_BUDGET),
        )
        .await;
        flow.observe("state_list_repopulated", repopulated);
        if let Some(states) = contain(
            &mut flow,
            "read-state-options",
            dom::option_texts(page, sel::STATE).await,
        )? {
            tracing::info!("states for US (sample): {:?}", &states[..states.len().min(SAMPLE_LEN)]);
            flow.observe("states_us", sample(states));
        }
    }

    // (b) state -> city cascade.
    if contain(
        &mut flow,
        "select-state-california",
        dom::select_by_text(page, sel::STATE, "California").await,
    )?
    .is_some()
    {
        let repopulated = dom::wait_for(
            page,
            &WaitCondition::text_contains(sel::CITY, "Los Angeles", CASCADE_BUDGET),
        )
        .await;
        flow.observe("city_list_repopulated", repopulated);
        if let Some(cities) = contain(
            &mut flow,
            "read-city-options",
            dom::option_texts(page, sel::CITY).await,
        )? {
            tracing::info!("cities for California (sample): {:?}", &cities[..cities.len().min(SAMPLE_LEN)]);
            flow.observe("cities_california", sample(cities));
        }
    }

    // (c) strength meter: a weak then a strong password; the two readings
    // must differ if the subject implements strength feedback.
    if contain(
        &mut flow,
        "type-weak-password",
        dom::set_field(page, sel::PASSWORD, "abc", settle).await,
    )?
    .is_some()
        && let Some(reading) = contain(
            &mut flow,
            "read-meter-weak",
            dom::read_property(page, sel::PW_METER, "value").await,
        )?
    {
        flow.observe("pw_meter_weak", reading);
    }
    if contain(
        &mut flow,
        "type-strong-password",
        dom::set_field(page, sel::PASSWORD, STRONG_PASSWORD, settle).await,
    )?
    .is_some()
        && let Some(reading) = contain(
            &mut flow,
            "read-meter-strong",
            dom::read_property(page, sel::PW_METER, "value").await,
        )?
    {
        flow.observe("pw_meter_strong", reading);
    }

    // (d) confirm-password mismatch must surface inline errors.
    contain(
        &mut flow,
        "type-mismatched-password",
        dom::set_field(page, sel::PASSWORD, "OnePass1!", settle).await,
    )?;
    contain(
        &mut flow,
        "type-mismatched-confirmation",
        dom::set_field(page, sel::CONFIRM_PASSWORD, "OtherPass2!", settle).await,
    )?;
    if let Some(errors) = contain(
        &mut flow,
        "read-inline-errors",
        dom::inline_errors(page, sel::INLINE_ERRORS).await,
    )? {
        tracing::info!("inline errors after mismatch: {:?}", errors);
        flow.observe("mismatch_errors", errors);
    }

    // (e) consent -> submit gating: valid fill must enable submit, revoking
    // consent must disable it again.
    fill_valid_profile(cx, &mut flow).await?;
    tokio::time::sleep(settle).await;
    if let Some(disabled) = contain(
        &mut flow,
        "read-gating-initial",
        dom::is_disabled(page, sel::SUBMIT).await,
    )? {
        flow.observe("submit_disabled_valid", disabled);
    }
    contain(
        &mut flow,
        "revoke-terms",
        dom::set_checkbox(page, sel::TERMS, false).await,
    )?;
    tokio::time::sleep(settle).await;
    if let Some(disabled) = contain(
        &mut flow,
        "read-gating-after-revoke",
        dom::is_disabled(page, sel::SUBMIT).await,
    )? {
        flow.observe("submit_disabled_after_revoke", disabled);
    }

    let name = flow.flow.evidence_name();
    if let Some(pair) = contain(
        &mut flow,
        "capture",
        cx.evidence().capture_dom(page, name).await,
    )? {
        flow.evidence = Some(pair);
    }

    Ok(flow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_truncates_long_lists() {
        let labels: Vec<String> = (0..20).map(|i| format!("State {i}")).collect();
        let sampled = sample(labels);
        assert_eq!(sampled.len(), SAMPLE_LEN);
        assert_eq!(sampled[0], "State 0");
    }

    #[test]
    fn test_sample_keeps_short_lists_intact() {
        let labels = vec!["California".to_string(), "New York".to_string()];
        assert_eq!(sample(labels.clone()), labels);
    }
}
