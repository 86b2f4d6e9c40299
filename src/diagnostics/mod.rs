//! Diagnostic sink
//!
//! Collects user-facing errors in the order they are found and keeps
//! internal (fatal) errors on a separate channel.

use std::fmt;
use std::io::{self, Write};

use log::trace;

use crate::utils::{Error, Span};

/// Printed once when analysis finished with user-facing errors
pub const HALT_BANNER: &str = "Compilation halted due to static semantic errors.";

/// One recorded error with the source line it points at
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub span: Option<Span>,
    pub error: Error,
}

impl From<Error> for Diagnostic {
    fn from(error: Error) -> Self {
        Self {
            span: error.span(),
            error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error.is_fatal() {
            f.write_str("FATAL:")?;
        }
        match self.span {
            Some(span) => write!(f, "{}: {}", span, self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Append-only error list
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
    fatal: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error on the channel its class belongs to
    pub fn report(&mut self, error: Error) {
        trace!("diagnostic {}: {}", error.code(), error);
        if error.is_fatal() {
            self.fatal.push(error.into());
        } else {
            self.errors.push(error.into());
        }
    }

    /// Number of user-facing errors
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_fatal(&self) -> bool {
        !self.fatal.is_empty()
    }

    /// User-facing errors in report order
    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.errors.iter().map(|d| &d.error)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Error> {
        self.fatal.iter().map(|d| &d.error)
    }

    /// Every diagnostic, user-facing first
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.fatal.iter())
    }

    /// Write every diagnostic as one `<line>: <message>` line
    pub fn emit<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for diagnostic in self.iter() {
            writeln!(out, "{}", diagnostic)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_only_user_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(Error::BreakOutsideLoop { span: Span::new(3) });
        diagnostics.report(Error::ScopeUnderflow);
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.has_fatal());
    }

    #[test]
    fn test_emit_format() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(Error::MissingEntry { name: "main".into() });
        diagnostics.report(Error::ScopeUnderflow);
        diagnostics.report(Error::ContinueOutsideLoop { span: Span::new(7) });

        let mut out = Vec::new();
        diagnostics.emit(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "the entry function 'main' does not exist\n\
             7: 'continue' is not inside a loop\n\
             FATAL:scope stack underflow\n"
        );
    }
}
