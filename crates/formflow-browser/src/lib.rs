pub mod dom;
mod error;
pub mod evidence;
pub mod session;

pub use dom::{WaitCondition, WaitPredicate};
pub use error::{Error, Result};
pub use evidence::EvidenceWriter;
pub use session::{LaunchOptions, Session};
