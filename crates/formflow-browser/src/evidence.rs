use crate::Result;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use formflow_core::EvidencePair;
use std::path::{Path, PathBuf};

/// Writes a flow's artifacts under stable names in one configured directory.
///
/// Capture is unconditional: it runs as the last step of every flow whatever
/// the oracle checks observed, so a degraded flow still leaves inspectable
/// evidence behind. Re-runs overwrite; artifacts are not versioned.
pub struct EvidenceWriter {
    dir: PathBuf,
}

impl EvidenceWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The (visual, DOM) paths a capture of `name` will write.
    pub fn paths_for(&self, name: &str) -> (PathBuf, PathBuf) {
        (
            self.dir.join(format!("{name}.png")),
            self.dir.join(format!("{name}.html")),
        )
    }

    /// Write a viewport screenshot and the full DOM markup.
    pub async fn capture(&self, page: &Page, name: &str) -> Result<EvidencePair> {
        let (png_path, html_path) = self.paths_for(name);

        let png = page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(false)
                    .build(),
            )
            .await?;
        std::fs::write(&png_path, &png)?;
        tracing::info!("Saved screenshot {} ({} bytes)", png_path.display(), png.len());

        let dom = self.write_dom(page, &html_path).await?;
        Ok(EvidencePair {
            screenshot: Some(png_path),
            dom,
        })
    }

    /// Write only the DOM markup, for flows that validate data rather than
    /// visual state.
    pub async fn capture_dom(&self, page: &Page, name: &str) -> Result<EvidencePair> {
        let (_, html_path) = self.paths_for(name);
        let dom = self.write_dom(page, &html_path).await?;
        Ok(EvidencePair {
            screenshot: None,
            dom,
        })
    }

    async fn write_dom(&self, page: &Page, path: &Path) -> Result<PathBuf> {
        let markup = page.content().await?;
        std::fs::write(path, &markup)?;
        tracing::info!("Saved DOM snapshot {} ({} bytes)", path.display(), markup.len());
        Ok(path.to_path_buf())
    }
}
