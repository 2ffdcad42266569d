//! convert-crlf - Normalize the line endings of a text file to CRLF

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use convert_crlf::report::EXIT_FAILURE;
use convert_crlf::{run, try_parse_args, CliArgs, Config, Outcome, PlatformProbe, Reporter};
use log::LevelFilter;

fn main() -> ExitCode {
    let args = match try_parse_args() {
        Ok(args) => args,
        Err(e) => return report_usage_error(&e),
    };

    init_logging(args.debug);

    let mut reporter = Reporter::new(io::stdout(), args.silent);
    let result = convert_from_args(&args, &mut reporter);
    reporter.finish(result)
}

/// Print a clap error or help text to stdout and pick the exit code
fn report_usage_error(e: &clap::Error) -> ExitCode {
    if e.use_stderr() {
        println!("[ERROR] {}", e.render().to_string().trim_end());
        ExitCode::from(EXIT_FAILURE)
    } else {
        // --help and --version
        match e.print() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::from(EXIT_FAILURE),
        }
    }
}

/// Send debug traces to stdout, next to the status lines
fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    };
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

/// Build configuration from CLI args and optional config file
fn build_config(args: &CliArgs) -> anyhow::Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        log::debug!("Using config file: {}", config_path.display());
        Config::from_toml_file(config_path)
            .with_context(|| format!("failed to load config file {}", config_path.display()))?
    } else {
        Config::default()
    };

    // Override with CLI arguments
    if let Some(label) = &args.fallback_encoding {
        config.fallback_encoding.clone_from(label);
    }
    if args.no_guess {
        config.guess = false;
    }
    if let Some(mode) = args.write_mode {
        config.write_mode = mode;
    }

    log::debug!("Configuration: {config:?}");

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Run one conversion described by the command line
fn convert_from_args<W: Write>(
    args: &CliArgs,
    reporter: &mut Reporter<W>,
) -> anyhow::Result<Outcome> {
    let config = build_config(args)?;
    let detector = config.detector()?;
    let outcome = run(
        &args.inputs,
        config.write_mode,
        &PlatformProbe,
        &detector,
        reporter,
    )?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use convert_crlf::{parse_args_from, WriteMode};

    #[test]
    fn test_build_config_defaults() {
        let args = parse_args_from(vec!["convert-crlf", "f.txt"]);
        assert_eq!(build_config(&args).unwrap(), Config::default());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.toml");
        std::fs::write(&path, "fallback_encoding = \"euc-jp\"\nwrite_mode = \"truncate\"\n").unwrap();

        let args = parse_args_from(vec![
            "convert-crlf".to_string(),
            "--config".to_string(),
            path.display().to_string(),
            "-w".to_string(),
            "atomic".to_string(),
            "f.txt".to_string(),
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.fallback_encoding, "euc-jp");
        assert_eq!(config.write_mode, WriteMode::Atomic);
    }

    #[test]
    fn test_invalid_fallback_rejected() {
        let args = parse_args_from(vec!["convert-crlf", "-e", "no-such-charset", "f.txt"]);
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = parse_args_from(vec!["convert-crlf", "-c", "/no/such/crlf.toml", "f.txt"]);
        let err = build_config(&args).unwrap_err();
        assert!(format!("{err:?}").contains("failed to load config file"));
    }
}
