use std::env;
use std::io::{self, Write};

use thiserror::Error;
use tracing::debug;

use crate::parse::ParseError;
use crate::read::Reader;
use crate::Verbosity;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("unable to read input: {0}")]
    Input(#[source] io::Error),
    #[error("unable to write output: {0}")]
    Output(#[source] io::Error),
    #[error("{lineno}:{source}")]
    Parse {
        lineno: usize,
        #[source]
        source: ParseError,
    },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input(_) => 1,
            CliError::Parse { .. } => 2,
            CliError::Output(_) => 3,
        }
    }
}

/// Settings taken from `SLISP_VERBOSE` and `SLISP_STRICT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub verbosity: Verbosity,
    pub strict: bool,
}

impl Config {
    pub fn from_env() -> Config {
        let verbose = env::var("SLISP_VERBOSE").ok();
        let strict = env::var("SLISP_STRICT").ok();
        Config::from_vars(verbose.as_deref(), strict.as_deref())
    }

    pub fn from_vars(verbose: Option<&str>, strict: Option<&str>) -> Config {
        Config {
            verbosity: verbose.map_or(Verbosity::Minimal, Verbosity::from_name),
            strict: matches!(strict, Some("1") | Some("true")),
        }
    }

    pub fn reader(&self) -> Reader {
        if self.strict {
            Reader::strict()
        } else {
            Reader::new()
        }
    }
}

/// Reads every non-blank line of `input` as one expression and writes its
/// rendering to `out`. Stops at the first line the reader rejects. Returns
/// the number of expressions written.
pub fn run<W: Write>(reader: &Reader, input: &str, out: &mut W) -> Result<usize, CliError> {
    let mut written = 0;
    for (i, line) in input.lines().enumerate() {
        let lineno = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let expr = reader
            .read(line)
            .map_err(|source| CliError::Parse { lineno, source })?;
        debug!(lineno, tree = %expr, "read");
        writeln!(out, "{}", expr).map_err(CliError::Output)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_to_string(reader: &Reader, input: &str) -> Result<String, CliError> {
        let mut out = Vec::new();
        run(reader, input, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_run_one_line_per_expression() {
        let input = "(a b)\n\n   \n((x) y)\nfoo \n";
        let mut out = Vec::new();
        assert_eq!(3, run(&Reader::new(), input, &mut out).unwrap());
        assert_eq!(
            "(a b )\n((x ) y )\nfoo\n",
            String::from_utf8(out).unwrap()
        );
    }

    #[test]
    fn test_run_empty_input() {
        assert_eq!("", run_to_string(&Reader::new(), "").unwrap());
        assert_eq!("", run_to_string(&Reader::strict(), "\n \n").unwrap());
    }

    #[test]
    fn test_run_lenient_never_fails() {
        let out = run_to_string(&Reader::new(), "(a (b\na)\nfoo").unwrap();
        assert_eq!("(a () )\na\n()\n", out);
    }

    #[test]
    fn test_run_strict_reports_line() {
        let mut out = Vec::new();
        let err = run(&Reader::strict(), "(a)\n\n(b\n(c)\n", &mut out).unwrap_err();
        match &err {
            CliError::Parse { lineno, source } => {
                assert_eq!(3, *lineno);
                assert_eq!(ParseError::UnclosedList { offset: 0 }, *source);
            }
            e => panic!("unexpected error: {}", e),
        }
        assert_eq!(2, err.exit_code());
        assert_eq!("3:0: sexpr error: abrupt end of list", err.to_string());
        // Lines before the failing one are still written.
        assert_eq!("(a )\n", String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_run_output_error() {
        let err = run(&Reader::new(), "(a)\n", &mut Broken).unwrap_err();
        assert!(matches!(err, CliError::Output(_)));
        assert_eq!(3, err.exit_code());
    }

    #[test]
    fn test_input_error_exit_code() {
        let err = CliError::Input(io::Error::new(io::ErrorKind::Other, "gone"));
        assert_eq!(1, err.exit_code());
        assert_eq!("unable to read input: gone", err.to_string());
    }

    #[test]
    fn test_config_from_vars() {
        let config = Config::from_vars(None, None);
        assert_eq!(Verbosity::Minimal, config.verbosity);
        assert!(!config.strict);
        assert_eq!(Reader::new(), config.reader());

        let config = Config::from_vars(Some("debug"), Some("1"));
        assert_eq!(Verbosity::Debug, config.verbosity);
        assert_eq!(Reader::strict(), config.reader());

        assert!(Config::from_vars(None, Some("true")).strict);
        assert!(!Config::from_vars(None, Some("yes")).strict);
        assert_eq!(
            Verbosity::Verbose,
            Config::from_vars(Some("verbose"), None).verbosity
        );
    }
}
