pub mod probe;
pub mod result;

pub mod prelude {
    pub use super::probe::{HttpProber, Prober};
    pub use super::result::{CheckResult, ProbeError, ProbeOutcome};
}

use std::fmt::Write;

/// Flattens an error and its sources into a single line, so it fits in an event field.
pub(crate) fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
