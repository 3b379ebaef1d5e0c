use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to start browser session: {0}")]
    SessionStart(String),

    #[error("Browser session lost: {0}")]
    Session(String),

    #[error("No element matches locator: {0}")]
    ElementNotFound(String),

    #[error("Failed to write evidence: {0}")]
    Evidence(#[from] std::io::Error),

    #[error("CDP error: {0}")]
    Cdp(String),
}

impl Error {
    /// Session-level errors abort the run; everything else is contained
    /// within the owning flow.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::SessionStart(_) | Error::Session(_))
    }
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_session_errors_are_fatal() {
        assert!(Error::SessionStart("no chrome".into()).is_fatal());
        assert!(Error::Session("ws closed".into()).is_fatal());
        assert!(!Error::ElementNotFound("#missing".into()).is_fatal());
        assert!(!Error::Cdp("oops".into()).is_fatal());
    }
}
