//! Structured Feedback Module
//!
//! Machine-readable output of one analysis run:
//! - JSON error reports with fix suggestions
//! - Analysis statistics

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::frontend::semantic::Analysis;
use crate::utils::Error;

// ==================== Structured Error Report ====================

/// A structured error report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Error code (e.g., "E0001")
    pub code: String,

    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    pub location: Option<Location>,

    /// Suggested fixes
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    /// Internal analyzer failure, not a problem in the program
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Description of the fix
    pub message: String,

    /// Confidence in this suggestion (0.0 - 1.0)
    pub confidence: f64,
}

impl Suggestion {
    fn new(message: impl Into<String>, confidence: f64) -> Self {
        Self {
            message: message.into(),
            confidence,
        }
    }
}

// ==================== Analysis Feedback ====================

/// Complete feedback for one analyzed file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFeedback {
    pub success: bool,

    pub source_file: String,

    /// All errors, user-facing first
    pub diagnostics: Vec<ErrorReport>,

    pub stats: AnalysisStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Semantic analysis time in milliseconds
    pub semantic_time_ms: u64,
    pub function_count: usize,
    pub global_count: usize,
    pub annotated_exprs: usize,
    pub error_count: usize,
}

impl From<&Analysis> for AnalysisStats {
    fn from(analysis: &Analysis) -> Self {
        Self {
            semantic_time_ms: 0,
            function_count: analysis.functions,
            global_count: analysis.globals,
            annotated_exprs: analysis.annotated_exprs,
            error_count: analysis.error_count,
        }
    }
}

// ==================== Error Conversion ====================

impl ErrorReport {
    /// Create an error report from an analyzer error
    pub fn from_error(error: &Error, file_name: &str) -> Self {
        let location = error.span().filter(|span| !span.is_dummy()).map(|span| Location {
            file: file_name.to_string(),
            line: span.line,
        });

        let mut report = Self {
            code: error.code().to_string(),
            severity: if error.is_fatal() {
                Severity::Fatal
            } else {
                Severity::Error
            },
            message: error.to_string(),
            location,
            suggestions: suggestions_for(error),
        };
        report.sort_suggestions();
        report
    }

    /// Sort suggestions by confidence (highest first)
    pub fn sort_suggestions(&mut self) {
        self.suggestions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

fn suggestions_for(error: &Error) -> Vec<Suggestion> {
    match error {
        Error::UndefinedVariable { name, .. } => vec![
            Suggestion::new(format!("Declare '{}' before using it", name), 0.8),
            Suggestion::new("Check whether it was declared in a block that has already ended", 0.4),
        ],

        Error::UndefinedFunction { name, .. } => vec![Suggestion::new(
            format!("Define a function named '{}' at the top level", name),
            0.8,
        )],

        Error::ArgCountMismatch { expected, got, .. } => {
            if got < expected {
                vec![Suggestion::new(format!("Add {} more argument(s)", expected - got), 0.9)]
            } else {
                vec![Suggestion::new(format!("Remove {} extra argument(s)", got - expected), 0.9)]
            }
        }

        Error::MissingReturn { .. } => vec![Suggestion::new(
            "Add a return statement at the top level of the function body",
            0.9,
        )],

        Error::BreakOutsideLoop { .. } | Error::ContinueOutsideLoop { .. } => {
            vec![Suggestion::new("Move the statement inside a while or for loop", 0.7)]
        }

        Error::DuplicateVariable { name, .. } | Error::DuplicateFunction { name, .. } => {
            vec![Suggestion::new(format!("Rename one of the '{}' declarations", name), 0.6)]
        }

        _ => vec![],
    }
}

impl AnalysisFeedback {
    /// Build feedback from a finished (or aborted) run
    pub fn new(source_file: String, analysis: Option<&Analysis>, diagnostics: &Diagnostics) -> Self {
        let reports = diagnostics
            .iter()
            .map(|diagnostic| ErrorReport::from_error(&diagnostic.error, &source_file))
            .collect();
        Self {
            success: analysis.is_some_and(Analysis::is_success),
            source_file,
            diagnostics: reports,
            stats: analysis.map(AnalysisStats::from).unwrap_or_default(),
        }
    }

    pub fn with_elapsed_ms(mut self, ms: u64) -> Self {
        self.stats.semantic_time_ms = ms;
        self
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Output as compact JSON (for programmatic use)
    pub fn to_json_compact(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_from_error() {
        let error = Error::ArgCountMismatch {
            function: "f".into(),
            expected: 2,
            got: 3,
            span: Span::new(12),
        };
        let report = ErrorReport::from_error(&error, "prog.json");
        assert_eq!(report.code, "E0018");
        assert_eq!(report.severity, Severity::Error);
        assert_eq!(
            report.location,
            Some(Location { file: "prog.json".into(), line: 12 })
        );
        assert_eq!(report.suggestions[0].message, "Remove 1 extra argument(s)");
    }

    #[test]
    fn test_feedback_for_aborted_run() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(Error::ScopeUnderflow);
        let feedback = AnalysisFeedback::new("prog.json".into(), None, &diagnostics);
        assert!(!feedback.success);
        assert_eq!(feedback.diagnostics[0].severity, Severity::Fatal);
        assert_eq!(feedback.diagnostics[0].location, None);
    }

    #[test]
    fn test_feedback_json() {
        let analysis = Analysis {
            error_count: 0,
            functions: 2,
            globals: 1,
            annotated_exprs: 7,
        };
        let feedback = AnalysisFeedback::new("prog.json".into(), Some(&analysis), &Diagnostics::new());
        let json: serde_json::Value = serde_json::from_str(&feedback.to_json_compact()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["stats"]["annotated_exprs"], 7);
        assert_eq!(json["diagnostics"], serde_json::json!([]));
    }
}
