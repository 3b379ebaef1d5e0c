pub mod config;
pub mod error;
pub mod outcome;
pub mod report;

pub use config::HarnessConfig;
pub use error::{Error, Result};
pub use outcome::{EvidencePair, FlowKind, FlowResult, StepRecord, StepStatus, SuccessKind};
pub use report::RunReport;
