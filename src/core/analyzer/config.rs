//! Analyzer configuration.
//!
//! `AnalyzerOptions` makes the reporting policy for semantic findings explicit:
//! references to names that were never declared and redeclarations within the
//! same scope can each be ignored, surfaced as warnings, or surfaced as errors.
//! Options deserialize from JSON so a driver can load them from a file.
//!
//! ## Examples
//! ```
//! # use fpp_rs::core::analyzer::{AnalyzerOptions, ReportLevel};
//! let options = AnalyzerOptions::default()
//!     .with_unknown_identifiers(ReportLevel::Warning)
//!     .with_max_diagnostics(10);
//! assert_eq!(options.unknown_identifiers, ReportLevel::Warning);
//! assert_eq!(options.duplicate_declarations, ReportLevel::Warning);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::analyzer::diagnostics::Severity;

/// How a class of semantic finding is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLevel {
    /// Logged only.
    #[default]
    Off,
    Warning,
    Error,
}

impl ReportLevel {
    /// The diagnostic severity to report with, if any.
    #[must_use]
    pub fn severity(self) -> Option<Severity> {
        match self {
            ReportLevel::Off => None,
            ReportLevel::Warning => Some(Severity::Warning),
            ReportLevel::Error => Some(Severity::Error),
        }
    }
}

/// Configuration for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Policy for references to names with no declaration (so far).
    pub unknown_identifiers: ReportLevel,
    /// Policy for a second declaration of a name in the same scope.
    pub duplicate_declarations: ReportLevel,
    /// Maximum number of diagnostics kept; later ones are dropped.
    pub max_diagnostics: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            unknown_identifiers: ReportLevel::Off,
            duplicate_declarations: ReportLevel::Warning,
            max_diagnostics: 100,
        }
    }
}

impl AnalyzerOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unknown_identifiers(mut self, level: ReportLevel) -> Self {
        self.unknown_identifiers = level;
        self
    }

    #[must_use]
    pub fn with_duplicate_declarations(mut self, level: ReportLevel) -> Self {
        self.duplicate_declarations = level;
        self
    }

    #[must_use]
    pub fn with_max_diagnostics(mut self, max: usize) -> Self {
        self.max_diagnostics = max;
        self
    }

    /// Options that surface every semantic finding as an error.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
            .with_unknown_identifiers(ReportLevel::Error)
            .with_duplicate_declarations(ReportLevel::Error)
    }
}
