//! Primitive, idempotent operations against the subject's DOM.
//!
//! Everything here goes through CSS selectors and in-page script. Two rules
//! hold throughout: values are typed as keystrokes so the subject's own
//! `input` listeners fire, and `wait_for` is the only way any caller waits on
//! an asynchronous DOM update.

use crate::{Error, Result};
use chromiumoxide::page::Page;
use std::time::{Duration, Instant};

/// Poll interval for `wait_for`.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a bounded wait is watching for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WaitPredicate {
    /// The element exists and has a rendered box.
    Visible,
    /// The element exists and its text content contains the needle.
    TextContains(String),
}

/// A (locator, predicate, timeout) triple. Evaluated repeatedly until
/// satisfied or the timeout elapses; resolves to a boolean, never an error.
#[derive(Clone, Debug)]
pub struct WaitCondition {
    pub selector: String,
    pub predicate: WaitPredicate,
    pub timeout: Duration,
}

impl WaitCondition {
    pub fn visible(selector: impl Into<String>, timeout: Duration) -> Self {
        Self {
            selector: selector.into(),
            predicate: WaitPredicate::Visible,
            timeout,
        }
    }

    pub fn text_contains(
        selector: impl Into<String>,
        needle: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            selector: selector.into(),
            predicate: WaitPredicate::TextContains(needle.into()),
            timeout,
        }
    }

    /// In-page expression that evaluates the predicate to a boolean.
    fn js(&self) -> String {
        let sel = js_string(&self.selector);
        match &self.predicate {
            WaitPredicate::Visible => format!(
                "(() => {{ const el = document.querySelector({sel}); \
                 return !!(el && el.getClientRects().length); }})()"
            ),
            WaitPredicate::TextContains(needle) => {
                let needle = js_string(needle);
                format!(
                    "(() => {{ const el = document.querySelector({sel}); \
                     return !!el && el.textContent.includes({needle}); }})()"
                )
            }
        }
    }
}

/// Embed a Rust string as a JS string literal. Selectors carry quotes and
/// brackets, so this must be a real escape, not naive interpolation.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).expect("string serialization is infallible")
}

/// Evaluate an in-page expression to a boolean; any failure reads as false.
async fn eval_bool(page: &Page, expr: &str) -> bool {
    match page.evaluate(expr).await {
        Ok(eval) => eval.into_value::<bool>().unwrap_or(false),
        Err(e) => {
            tracing::debug!("predicate evaluation failed (treated as false): {}", e);
            false
        }
    }
}

/// Poll the condition until it holds or its timeout elapses. Never errors;
/// an expired budget is an ordinary `false` for the caller's branching.
pub async fn wait_for(page: &Page, condition: &WaitCondition) -> bool {
    let expr = condition.js();
    let start = Instant::now();
    loop {
        if eval_bool(page, &expr).await {
            tracing::debug!(
                "condition on '{}' met after {}ms",
                condition.selector,
                start.elapsed().as_millis()
            );
            return true;
        }
        if start.elapsed() >= condition.timeout {
            tracing::debug!(
                "condition on '{}' not met within {}ms",
                condition.selector,
                condition.timeout.as_millis()
            );
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Clear the input, type the value as keystrokes, then pause briefly so the
/// subject's listeners can update derived state (strength meter, inline
/// errors) before the next step reads it.
pub async fn set_field(page: &Page, selector: &str, value: &str, settle: Duration) -> Result<()> {
    let element = page
        .find_element(selector)
        .await
        .map_err(|_| Error::ElementNotFound(selector.to_string()))?;
    element.click().await?;

    let sel = js_string(selector);
    page.evaluate(format!(
        "(() => {{ const el = document.querySelector({sel}); if (el) el.value = ''; }})()"
    ))
    .await?;

    element.type_str(value).await?;
    tokio::time::sleep(settle).await;
    Ok(())
}

/// Select an option by its `value` attribute and dispatch a `change` event,
/// which is what the subject's cascade listeners react to.
pub async fn select_by_value(page: &Page, selector: &str, value: &str) -> Result<()> {
    select_option(page, selector, "o.value", value).await
}

/// Select an option by its trimmed visible label.
pub async fn select_by_text(page: &Page, selector: &str, text: &str) -> Result<()> {
    select_option(page, selector, "o.textContent.trim()", text).await
}

async fn select_option(page: &Page, selector: &str, key_expr: &str, wanted: &str) -> Result<()> {
    let sel = js_string(selector);
    let wanted_js = js_string(wanted);
    let expr = format!(
        "(() => {{ \
           const el = document.querySelector({sel}); \
           if (!el) return false; \
           const opt = [...el.options].find(o => {key_expr} === {wanted_js}); \
           if (!opt) return false; \
           el.value = opt.value; \
           el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
           return true; \
         }})()"
    );
    if eval_bool(page, &expr).await {
        Ok(())
    } else {
        Err(Error::ElementNotFound(format!(
            "{} option {}",
            selector, wanted
        )))
    }
}

/// Click an element, firing the subject's own handlers.
pub async fn click(page: &Page, selector: &str) -> Result<()> {
    let element = page
        .find_element(selector)
        .await
        .map_err(|_| Error::ElementNotFound(selector.to_string()))?;
    element.click().await?;
    Ok(())
}

/// Bring a checkbox to the wanted state, clicking only on mismatch so the
/// operation is idempotent and still fires the subject's change handlers.
pub async fn set_checkbox(page: &Page, selector: &str, checked: bool) -> Result<()> {
    let current = is_checked(page, selector).await?;
    if current != checked {
        let element = page
            .find_element(selector)
            .await
            .map_err(|_| Error::ElementNotFound(selector.to_string()))?;
        element.click().await?;
    }
    Ok(())
}

pub async fn is_checked(page: &Page, selector: &str) -> Result<bool> {
    read_bool_property(page, selector, "checked").await
}

pub async fn is_disabled(page: &Page, selector: &str) -> Result<bool> {
    read_bool_property(page, selector, "disabled").await
}

async fn read_bool_property(page: &Page, selector: &str, property: &str) -> Result<bool> {
    let sel = js_string(selector);
    let expr = format!(
        "(() => {{ const el = document.querySelector({sel}); \
         return el ? !!el.{property} : null; }})()"
    );
    let eval = page.evaluate(expr).await?;
    eval.into_value::<Option<bool>>()
        .map_err(|e| Error::Cdp(e.to_string()))?
        .ok_or_else(|| Error::ElementNotFound(selector.to_string()))
}

/// String property of an element (a meter's `value`, an input's current
/// text). `None` when the element is absent.
pub async fn read_property(page: &Page, selector: &str, property: &str) -> Result<Option<String>> {
    let sel = js_string(selector);
    let expr = format!(
        "(() => {{ const el = document.querySelector({sel}); \
         return el ? String(el.{property}) : null; }})()"
    );
    let eval = page.evaluate(expr).await?;
    eval.into_value::<Option<String>>()
        .map_err(|e| Error::Cdp(e.to_string()))
}

/// Trimmed labels of a select's real options (placeholder entries with an
/// empty `value` are skipped).
pub async fn option_texts(page: &Page, select_selector: &str) -> Result<Vec<String>> {
    let sel = js_string(&format!("{} option", select_selector));
    let expr = format!(
        "[...document.querySelectorAll({sel})]\
         .filter(o => o.value).map(o => o.textContent.trim())"
    );
    let eval = page.evaluate(expr).await?;
    eval.into_value::<Vec<String>>()
        .map_err(|e| Error::Cdp(e.to_string()))
}

/// Non-empty inline error texts currently shown by the subject.
pub async fn inline_errors(page: &Page, selector: &str) -> Result<Vec<String>> {
    let sel = js_string(selector);
    let expr = format!(
        "[...document.querySelectorAll({sel})]\
         .map(e => e.textContent.trim()).filter(t => t.length)"
    );
    let eval = page.evaluate(expr).await?;
    eval.into_value::<Vec<String>>()
        .map_err(|e| Error::Cdp(e.to_string()))
}

/// Reset the subject form through its own `reset()` so every flow starts
/// from the same blank state.
pub async fn reset_form(page: &Page, form_selector: &str, settle: Duration) -> Result<()> {
    let sel = js_string(form_selector);
    page.evaluate(format!(
        "(() => {{ const f = document.querySelector({sel}); if (f) f.reset(); }})()"
    ))
    .await?;
    tokio::time::sleep(settle).await;
    Ok(())
}

/// Apply inline CSS to make the element obvious in a screenshot and scroll
/// it to a consistent viewport position. Cosmetic and best-effort: a missing
/// element or a failed evaluation is logged, never an error, because
/// highlighting must not block evidence capture.
pub async fn highlight(page: &Page, selector: &str, css_text: &str) {
    let sel = js_string(selector);
    let css = js_string(css_text);
    let expr = format!(
        "(() => {{ try {{ \
           const el = document.querySelector({sel}); \
           if (!el) return false; \
           el.style.cssText += {css}; \
           el.scrollIntoView({{ behavior: 'instant', block: 'center', inline: 'nearest' }}); \
           return true; \
         }} catch (e) {{ return false; }} }})()"
    );
    match page.evaluate(expr).await {
        Ok(eval) => {
            if !eval.into_value::<bool>().unwrap_or(false) {
                tracing::warn!("highlight target '{}' absent, skipping", selector);
            }
        }
        Err(e) => tracing::warn!("highlight of '{}' failed: {}", selector, e),
    }
}

/// Scroll the viewport to a fixed position before a screenshot.
pub async fn scroll_to(page: &Page, x: u32, y: u32) -> Result<()> {
    page.evaluate(format!("window.scrollTo({x}, {y})")).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes_and_brackets() {
        let sel = "small.error[data-for='lastName']";
        let escaped = js_string(sel);
        assert!(escaped.starts_with('"') && escaped.ends_with('"'));
        assert!(escaped.contains("data-for='lastName'"));

        let tricky = js_string("a\"b\\c");
        assert_eq!(tricky, r#""a\"b\\c""#);
    }

    #[test]
    fn test_visible_predicate_checks_rendered_box() {
        let condition =
            WaitCondition::visible(".messages .successTop", Duration::from_secs(5));
        let js = condition.js();
        assert!(js.contains("getClientRects"));
        assert!(js.contains(".messages .successTop"));
    }

    #[test]
    fn test_text_predicate_embeds_needle_safely() {
        let condition = WaitCondition::text_contains(
            "small.error[data-for='lastName']",
            "Last",
            Duration::from_secs(4),
        );
        let js = condition.js();
        assert!(js.contains("textContent.includes(\"Last\")"));
        assert!(js.contains("data-for='lastName'"));
        assert_eq!(condition.timeout, Duration::from_secs(4));
    }

    // The interaction functions themselves need a live page; they are
    // exercised end to end by running the formflow binary.
}
