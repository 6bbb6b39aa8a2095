use std::path::PathBuf;

use crate::validator::{ParsedPlaylist, RejectReason};

/// What happened to one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Moved to the input location. `recorded` is false if the audit write failed.
    Accepted {
        destination: PathBuf,
        parsed: ParsedPlaylist,
        recorded: bool,
    },
    /// Left in place. `recorded` is false if the audit write failed.
    Rejected { reason: RejectReason, recorded: bool },
    /// Valid name but the move failed; nothing was recorded.
    MoveFailed,
    /// Gone from the watch directory before it could be handled.
    Vanished,
}

impl FileOutcome {
    /// Terminal outcomes are remembered so the file is not handled twice in
    /// one run. A failed move stays eligible for the next pass.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FileOutcome::Accepted { .. } | FileOutcome::Rejected { .. })
    }

    pub fn record_failed(&self) -> bool {
        matches!(
            self,
            FileOutcome::Accepted { recorded: false, .. } | FileOutcome::Rejected { recorded: false, .. }
        )
    }
}
