mod fill;
mod logic;
mod negative;
mod orchestrator;
mod positive;
pub mod subject;

pub use orchestrator::Orchestrator;
