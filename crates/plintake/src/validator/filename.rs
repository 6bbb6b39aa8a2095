//! Playlist filename grammar and validation.
//!
//! A playlist filename looks like `<prefix><marker><date>-<version>.<ext>`,
//! e.g. `CH1X01012024-003.pls`: a 3-character prefix, one marker character,
//! the date in the channel's format, a `-`, the version and the extension.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use crate::config::channel::normalize_extension;
use crate::config::ChannelConfiguration;
use crate::error::ConfigError;

const GRAMMAR: &str = r"(?s)^(?P<prefix>[^-]{3})[^-](?P<date>[^-]*)-(?P<version>[^.\-]*)";

/// Canonical representation stored in the audit table.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Structural fields of a filename, before any rule is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTokens {
    pub prefix: String,
    pub date: String,
    pub version: String,
    /// Lower-cased with a leading dot, or empty when the name has no extension.
    pub extension: String,
}

/// Why a filename was rejected. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidDateFormat,
    InvalidPrefix,
    InvalidExtension,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::InvalidDateFormat => "Invalid date format",
            RejectReason::InvalidPrefix => "Invalid prefix",
            RejectReason::InvalidExtension => "Invalid file extension",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from an accepted filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPlaylist {
    pub date: NaiveDate,
    pub version: String,
}

impl ParsedPlaylist {
    /// The playlist date as `YYYY-MM-DD`.
    pub fn canonical_date(&self) -> String {
        self.date.format(CANONICAL_DATE_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(ParsedPlaylist),
    Rejected {
        reason: RejectReason,
        /// Best-effort version token; empty if it could not be extracted.
        version: String,
    },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }
}

/// Applies one channel's naming rules to filenames.
#[derive(Debug, Clone)]
pub struct FilenameValidator {
    grammar: Regex,
    prefix: String,
    date_format: String,
    extension: String,
}

impl FilenameValidator {
    pub fn new(config: &ChannelConfiguration) -> Result<Self, ConfigError> {
        Self::with_rules(&config.name_prefix, &config.date_format, &config.extension)
    }

    pub fn with_rules(prefix: &str, date_format: &str, extension: &str) -> Result<Self, ConfigError> {
        let grammar = Regex::new(GRAMMAR).map_err(|e| ConfigError::Validation {
            message: format!("Invalid filename grammar: {}", e),
        })?;

        Ok(Self {
            grammar,
            prefix: prefix.to_string(),
            date_format: date_format.to_string(),
            extension: normalize_extension(extension),
        })
    }

    /// Splits a filename into its structural fields. Returns `None` when the
    /// prefix/date/version segments cannot be located.
    pub fn tokenize(&self, filename: &str) -> Option<FilenameTokens> {
        let captures = self.grammar.captures(filename)?;
        Some(FilenameTokens {
            prefix: captures["prefix"].to_string(),
            date: captures["date"].to_string(),
            version: captures["version"].to_string(),
            extension: extension_of(filename),
        })
    }

    /// Judges a filename. The first failing check wins: date, then prefix,
    /// then extension.
    pub fn validate(&self, filename: &str) -> Verdict {
        let tokens = match self.tokenize(filename) {
            Some(tokens) => tokens,
            None => {
                return Verdict::Rejected {
                    reason: RejectReason::InvalidDateFormat,
                    version: fallback_version(filename),
                }
            }
        };

        let date = match self.parse_date(&tokens.date) {
            Some(date) => date,
            None => {
                return Verdict::Rejected {
                    reason: RejectReason::InvalidDateFormat,
                    version: tokens.version,
                }
            }
        };

        if tokens.prefix != self.prefix {
            return Verdict::Rejected {
                reason: RejectReason::InvalidPrefix,
                version: tokens.version,
            };
        }

        if tokens.extension != self.extension {
            return Verdict::Rejected {
                reason: RejectReason::InvalidExtension,
                version: tokens.version,
            };
        }

        Verdict::Accepted(ParsedPlaylist {
            date,
            version: tokens.version,
        })
    }

    /// Parses the date segment. Only a segment that formats back to the same
    /// digits is accepted, so `1012024` under `%d%m%Y` is not read as year 24.
    fn parse_date(&self, segment: &str) -> Option<NaiveDate> {
        let date = NaiveDate::parse_from_str(segment, &self.date_format).ok()?;
        (date.format(&self.date_format).to_string() == segment).then_some(date)
    }
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Text between the first `-` and the next `.` or `-`, if there is a `-` at all.
fn fallback_version(filename: &str) -> String {
    filename
        .split_once('-')
        .map(|(_, rest)| {
            rest.split(['.', '-'])
                .next()
                .unwrap_or_default()
                .to_string()
        })
        .unwrap_or_default()
}
