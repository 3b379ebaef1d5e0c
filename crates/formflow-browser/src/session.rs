use crate::{Error, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

/// Launch configuration for the one Chrome instance a run owns.
#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub headless: bool,
    pub window: (u32, u32),
}

impl LaunchOptions {
    pub fn new(headless: bool, window: (u32, u32)) -> Self {
        Self { headless, window }
    }

    /// Chrome switches for the launch: fixed window dimensions, quiet UI,
    /// no extensions, and autofill/password-manager suppression so the
    /// browser never paints UI over the form in screenshots.
    fn extra_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--window-size={},{}", self.window.0, self.window.1),
            "--disable-infobars".to_string(),
            "--disable-extensions".to_string(),
            "--disable-save-password-bubble".to_string(),
            "--disable-features=AutofillServerCommunication,PasswordLeakDetection".to_string(),
        ];
        if self.headless {
            args.push("--disable-gpu".to_string());
        }
        args
    }
}

/// Exclusive handle to one live Chrome instance plus its single page.
///
/// Created once per run, borrowed by the orchestrator for the run's
/// duration, and closed exactly once on every exit path (the CLI closes it
/// explicitly; dropping an unclosed session still reaps the CDP handler and
/// lets chromiumoxide terminate the child process).
pub struct Session {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl Session {
    /// Start Chrome with the given options and open a blank page.
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        tracing::info!(
            "Launching Chrome (headless: {}, window: {}x{})",
            options.headless,
            options.window.0,
            options.window.1
        );

        let mut builder = BrowserConfig::builder().no_sandbox();
        for arg in options.extra_args() {
            builder = builder.arg(arg);
        }
        if !options.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::SessionStart)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::SessionStart(format!("Chrome did not launch: {}", e)))?;

        // The handler task must run for the lifetime of the session or every
        // CDP command deadlocks.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::SessionStart(format!("could not open a page: {}", e)))?;

        tracing::info!("Chrome session active");
        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Navigate the session's page to the subject and wait for the load to
    /// finish.
    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| Error::Session(format!("navigation to {} failed: {}", url, e)))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| Error::Session(format!("load of {} did not complete: {}", url, e)))?;

        if let Ok(eval) = self.page.evaluate("document.title").await
            && let Ok(title) = eval.into_value::<String>()
        {
            tracing::info!("Page loaded: {}", title);
        }
        Ok(())
    }

    /// The single page all interaction and capture goes through.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser. Consuming `self` makes double-close unexpressible;
    /// teardown failures are logged, not propagated, because the run is
    /// already ending.
    pub async fn close(mut self) {
        tracing::info!("Closing Chrome session");
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Browser close request failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Browser did not exit cleanly: {}", e);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_args_suppress_browser_chrome() {
        let options = LaunchOptions::new(false, (1400, 900));
        let args = options.extra_args();

        assert!(args.contains(&"--window-size=1400,900".to_string()));
        assert!(args.contains(&"--disable-infobars".to_string()));
        assert!(args.contains(&"--disable-extensions".to_string()));
        assert!(args.contains(&"--disable-save-password-bubble".to_string()));
        assert!(args.iter().any(|a| a.starts_with("--disable-features=")));
        assert!(!args.contains(&"--disable-gpu".to_string()));
    }

    #[test]
    fn test_headless_adds_gpu_flag() {
        let options = LaunchOptions::new(true, (1400, 900));
        assert!(options.extra_args().contains(&"--disable-gpu".to_string()));
    }

    // Launch/goto/close require a Chrome binary and are covered by running
    // the formflow binary against a real form.
}
