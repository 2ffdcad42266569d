//! Command-line interface for convert-crlf.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::config::WriteMode;

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Positional arguments; the first one is the file to convert
    pub inputs: Vec<PathBuf>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Fallback encoding label for non-Unicode content
    pub fallback_encoding: Option<String>,

    /// Skip the statistical encoding guess
    pub no_guess: bool,

    /// How the file is written back
    pub write_mode: Option<WriteMode>,

    /// Silent mode (errors only)
    pub silent: bool,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("convert-crlf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert every line ending of a text file to CRLF, keeping its encoding")
        .arg(
            // Optional here so a missing file is reported by the validator, not clap
            Arg::new("inputs")
                .help("File to convert")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML configuration file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("fallback-encoding")
                .short('e')
                .long("fallback-encoding")
                .help("Legacy encoding used when the content is not Unicode [default: Shift_JIS]")
                .value_name("LABEL"),
        )
        .arg(
            Arg::new("no-guess")
                .long("no-guess")
                .help("Don't guess legacy encodings statistically; use the fallback directly")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("write-mode")
                .short('w')
                .long("write-mode")
                .help("How the file is replaced: atomic (temp file + rename) or truncate [default: atomic]")
                .value_name("MODE")
                .value_parser(["atomic", "truncate"]),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (only errors are printed)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from the process command line
pub fn try_parse_args() -> Result<CliArgs, clap::Error> {
    Ok(args_from_matches(&build_cli().try_get_matches()?))
}

/// Parse CLI arguments from an iterator
pub fn try_parse_args_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(args_from_matches(&build_cli().try_get_matches_from(args)?))
}

/// Parse CLI arguments from an iterator (for testing)
///
/// # Panics
///
/// Panics if the arguments are invalid.
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        fallback_encoding: matches.get_one::<String>("fallback-encoding").cloned(),
        no_guess: matches.get_flag("no-guess"),
        write_mode: matches
            .get_one::<String>("write-mode")
            .and_then(|mode| mode.parse().ok()),
        silent: matches.get_flag("silent"),
        debug: matches.get_flag("debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds() {
        let cmd = build_cli();
        // Just verify it builds without panic
        assert_eq!(cmd.get_name(), "convert-crlf");
        cmd.debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let args = parse_args_from(vec!["convert-crlf"]);
        assert!(args.inputs.is_empty());
        assert!(args.config.is_none());
        assert!(args.fallback_encoding.is_none());
        assert!(!args.no_guess);
        assert!(args.write_mode.is_none());
        assert!(!args.silent);
        assert!(!args.debug);
    }

    #[test]
    fn test_single_file() {
        let args = parse_args_from(vec!["convert-crlf", "notes.txt"]);
        assert_eq!(args.inputs, vec![PathBuf::from("notes.txt")]);
    }

    #[test]
    fn test_extra_inputs_kept_in_order() {
        let args = parse_args_from(vec!["convert-crlf", "a.txt", "b.txt"]);
        assert_eq!(args.inputs[0], PathBuf::from("a.txt"));
        assert_eq!(args.inputs.len(), 2);
    }

    #[test]
    fn test_encoding_options() {
        let args = parse_args_from(vec![
            "convert-crlf",
            "-e",
            "windows-1252",
            "--no-guess",
            "file.txt",
        ]);
        assert_eq!(args.fallback_encoding.as_deref(), Some("windows-1252"));
        assert!(args.no_guess);
    }

    #[test]
    fn test_write_mode() {
        let args = parse_args_from(vec!["convert-crlf", "--write-mode", "truncate", "f.txt"]);
        assert_eq!(args.write_mode, Some(WriteMode::Truncate));
        let args = parse_args_from(vec!["convert-crlf", "-w", "atomic", "f.txt"]);
        assert_eq!(args.write_mode, Some(WriteMode::Atomic));
    }

    #[test]
    fn test_invalid_write_mode_rejected() {
        let result = try_parse_args_from(vec!["convert-crlf", "-w", "append", "f.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_and_silent_flags() {
        let args = parse_args_from(vec!["convert-crlf", "-D", "-S", "file.txt"]);
        assert!(args.debug);
        assert!(args.silent);
    }

    #[test]
    fn test_config_path() {
        let args = parse_args_from(vec!["convert-crlf", "--config", "crlf.toml", "f.txt"]);
        assert_eq!(args.config, Some(PathBuf::from("crlf.toml")));
    }
}
