//! Status reporting and the process exit code.
//!
//! Every human-readable line goes to one writer (stdout in the binary).
//! A run ends in exactly one of two exit codes: [`EXIT_OK`] when the file
//! was written back, [`EXIT_FAILURE`] for anything else.

use std::io::Write;
use std::process::ExitCode;

use crate::encoding::EncodingDescriptor;
use crate::error::Error;
use crate::process::Outcome;

/// Exit code for a completed conversion
pub const EXIT_OK: u8 = 0;
/// Exit code for any failure
pub const EXIT_FAILURE: u8 = 1;

/// Writes status and error lines
pub struct Reporter<W: Write> {
    out: W,
    silent: bool,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter; `silent` suppresses status lines but never errors
    pub fn new(out: W, silent: bool) -> Self {
        Self { out, silent }
    }

    /// Consume the reporter and hand back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // Nowhere left to report a failing stdout
        let _ = writeln!(self.out, "{text}");
    }

    fn status(&mut self, text: &str) {
        if !self.silent {
            self.line(text);
        }
    }

    /// Announce the encoding chosen for the file
    pub fn detected(&mut self, encoding: &EncodingDescriptor) {
        self.status(&format!("Detected encoding: {encoding}"));
    }

    /// Announce a finished conversion
    pub fn converted(&mut self, outcome: &Outcome) {
        let stats = outcome.stats;
        self.status(&format!(
            "Converted {}: {} CRLF, {} LF, {} CR line endings -> CRLF",
            outcome.path.display(),
            stats.crlf,
            stats.lf,
            stats.cr
        ));
    }

    /// Report a pipeline failure
    pub fn failure(&mut self, err: &Error) {
        let message = match err {
            Error::MissingArgument => "Please specify a file name.".to_string(),
            Error::FileNotFound { path } => format!(
                "The specified file does not exist: {}. Check the path for mistakes.",
                path.display()
            ),
            Error::FileInUse { path, .. } => format!(
                "The specified file is in use and cannot be converted: {}",
                path.display()
            ),
            other => other.to_string(),
        };
        self.line(&format!("[ERROR] {}: {message}", err.kind_name()));
        log::debug!(
            "{} raised during {}",
            err.kind_name(),
            if err.is_validation() {
                "validation"
            } else {
                "conversion"
            }
        );

        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            self.line(&format!("  caused by: {cause}"));
            source = cause.source();
        }
    }

    /// Report an error that is not one of the pipeline's own kinds
    pub fn unexpected(&mut self, err: &anyhow::Error) {
        self.line("[ERROR] UnexpectedError: an unexpected error occurred");
        self.line(&format!("{err:?}"));
    }

    /// Report the end of a run and turn it into an exit code
    pub fn finish(&mut self, result: anyhow::Result<Outcome>) -> ExitCode {
        match result {
            Ok(outcome) => {
                self.converted(&outcome);
                ExitCode::from(EXIT_OK)
            }
            Err(err) => {
                match err.downcast_ref::<Error>() {
                    Some(known) => self.failure(known),
                    None => self.unexpected(&err),
                }
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::normalize::LineEndingStats;

    fn output(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_missing_argument_message() {
        let mut reporter = Reporter::new(Vec::new(), false);
        let code = reporter.finish(Err(Error::MissingArgument.into()));
        assert_eq!(code, ExitCode::from(EXIT_FAILURE));
        let text = output(reporter);
        assert!(text.contains("[ERROR] MissingArgument"));
        assert!(text.contains("specify a file name"));
    }

    #[test]
    fn test_in_use_message_with_cause() {
        let mut reporter = Reporter::new(Vec::new(), true);
        reporter.failure(&Error::FileInUse {
            path: PathBuf::from("locked.txt"),
            source: Some(std::io::Error::other("sharing violation")),
        });
        let text = output(reporter);
        assert!(text.contains("in use"));
        assert!(text.contains("locked.txt"));
        assert!(text.contains("caused by: sharing violation"));
    }

    #[test]
    fn test_unexpected_error_has_full_chain() {
        let mut reporter = Reporter::new(Vec::new(), false);
        let err = anyhow::anyhow!("root cause").context("loading config");
        let code = reporter.finish(Err(err));
        assert_eq!(code, ExitCode::from(EXIT_FAILURE));
        let text = output(reporter);
        assert!(text.contains("UnexpectedError"));
        assert!(text.contains("loading config"));
        assert!(text.contains("root cause"));
    }

    #[test]
    fn test_success_summary_and_silent() {
        let outcome = Outcome {
            path: PathBuf::from("a.txt"),
            encoding: EncodingDescriptor::utf8(false),
            stats: LineEndingStats {
                crlf: 1,
                lf: 2,
                cr: 3,
            },
        };

        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.detected(&outcome.encoding);
        assert_eq!(reporter.finish(Ok(outcome.clone())), ExitCode::from(EXIT_OK));
        let text = output(reporter);
        assert!(text.contains("Detected encoding: UTF-8"));
        assert!(text.contains("Converted a.txt: 1 CRLF, 2 LF, 3 CR line endings -> CRLF"));

        let mut silent = Reporter::new(Vec::new(), true);
        silent.detected(&outcome.encoding);
        silent.finish(Ok(outcome));
        assert!(output(silent).is_empty());
    }
}
