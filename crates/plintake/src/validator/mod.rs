pub mod filename;

pub use filename::{FilenameTokens, FilenameValidator, ParsedPlaylist, RejectReason, Verdict};
