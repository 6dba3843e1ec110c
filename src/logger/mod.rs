//! Process-wide tracing setup plus helpers for keeping secrets out of logs.

mod fingerprint;
mod logger;
pub use fingerprint::*;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
