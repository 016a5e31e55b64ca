use std::error::Error;
use std::fmt;

/// Returned by `min`/`max` style accessors invoked on an empty structure.
///
/// Always recoverable: check `is_empty` first, or treat it as "no data".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyStructureError;

impl fmt::Display for EmptyStructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation requires a non-empty structure")
    }
}

impl Error for EmptyStructureError {}
