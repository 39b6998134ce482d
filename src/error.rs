//! Boundary error taxonomy.
//!
//! Only two conditions cross the component boundary as structured values;
//! everything recoverable inside parsing is absorbed with a defined
//! fallback (unresolvable timestamp → time of parsing, orphan continuation
//! line → dropped) and never surfaces here.

use thiserror::Error;

/// Conditions reported outward to callers.
#[derive(Debug, Error)]
pub enum Error {
    /// An import produced zero records. User-visible, not an internal
    /// fault: the file most likely isn't a recognized export format.
    #[error("no messages found in the import; check the export file format")]
    EmptyImport,

    /// The completion service failed or returned no choices. Recoverable;
    /// whether to retry is the caller's decision.
    #[error("completion service failure: {0}")]
    Completion(String),
}
