//! Command-line surface.
//!
//! ```text
//! getaddrinfo <HOST> <SERVICE> [TOKEN ...]
//! ```
//!
//! Arguments are strictly positional. HOST and SERVICE go to the resolver
//! unmodified and every later argument is a hint token, hyphenated or not.
//! There are no options: `--help`, `--log` or `--` in any position are plain
//! values. The structured log is configured through `GAIPROBE_LOG` only.

use std::ffi::OsString;

use clap::Parser;

use crate::error::ProbeError;

/// Raw argument vector as clap sees it: at least two verbatim values.
#[derive(Debug, Parser)]
#[command(name = "getaddrinfo", disable_help_flag = true, disable_version_flag = true)]
struct RawArgs {
    #[arg(value_name = "ARG", required = true, num_args = 2.., allow_hyphen_values = true)]
    values: Vec<OsString>,
}

/// A parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    /// Hostname or numeric address.
    pub host: OsString,
    /// Service name or numeric port.
    pub service: OsString,
    /// Hint tokens (AI_*, SOCK_*, AF_*, IPPROTO_*), applied left to right.
    pub tokens: Vec<OsString>,
}

/// Program name to show in the usage line.
#[must_use]
pub fn program_name(args: &[OsString]) -> String {
    args.first()
        .map(|arg0| arg0.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("getaddrinfo"))
}

/// Parse `args` (including `argv[0]`).
///
/// Fewer than two arguments after `argv[0]` is [`ProbeError::Usage`].
pub fn parse_args(args: &[OsString]) -> Result<Cli, ProbeError> {
    let usage = || ProbeError::Usage {
        program: program_name(args),
    };

    // A leading `--` ends option parsing before the first user argument, so
    // every later `--` or `-x` reaches `values` as written.
    let argv = std::iter::once(OsString::from("getaddrinfo"))
        .chain(std::iter::once(OsString::from("--")))
        .chain(args.iter().skip(1).cloned());
    let raw = RawArgs::try_parse_from(argv).map_err(|_| usage())?;

    let mut values = raw.values.into_iter();
    match (values.next(), values.next()) {
        (Some(host), Some(service)) => Ok(Cli {
            host,
            service,
            tokens: values.collect(),
        }),
        _ => Err(usage()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    fn run(list: &[&str]) -> Cli {
        parse_args(&args(list)).unwrap()
    }

    #[test]
    fn positionals_only() {
        let cli = run(&["getaddrinfo", "localhost", "80"]);
        assert_eq!(cli.host, "localhost");
        assert_eq!(cli.service, "80");
        assert!(cli.tokens.is_empty());
    }

    #[test]
    fn trailing_tokens_keep_order() {
        let cli = run(&["getaddrinfo", "example.com", "https", "AF_INET", "bogus", "SOCK_STREAM"]);
        assert_eq!(cli.tokens, args(&["AF_INET", "bogus", "SOCK_STREAM"]));
    }

    #[test]
    fn hyphenated_first_token_is_a_token() {
        let cli = run(&["getaddrinfo", "h", "80", "--log", "x", "AF_INET"]);
        assert_eq!(cli.tokens, args(&["--log", "x", "AF_INET"]));

        let cli = run(&["getaddrinfo", "h", "80", "-x", "AF_INET", "-h"]);
        assert_eq!(cli.tokens, args(&["-x", "AF_INET", "-h"]));
    }

    #[test]
    fn help_and_version_are_tokens_after_service() {
        let cli = run(&["getaddrinfo", "h", "80", "--help", "--version", "-V"]);
        assert_eq!(cli.tokens, args(&["--help", "--version", "-V"]));
    }

    #[test]
    fn double_dash_is_kept_verbatim() {
        let cli = run(&["getaddrinfo", "h", "80", "--", "AI_PASSIVE", "--"]);
        assert_eq!(cli.tokens, args(&["--", "AI_PASSIVE", "--"]));

        let cli = run(&["getaddrinfo", "--", "80"]);
        assert_eq!(cli.host, "--");
        assert_eq!(cli.service, "80");
    }

    #[test]
    fn hyphenated_host_and_service_are_positionals() {
        let cli = run(&["getaddrinfo", "-h", "--help"]);
        assert_eq!(cli.host, "-h");
        assert_eq!(cli.service, "--help");
        assert!(cli.tokens.is_empty());
    }

    #[test]
    fn empty_strings_are_arguments() {
        let cli = run(&["getaddrinfo", "", "", ""]);
        assert_eq!(cli.host, "");
        assert_eq!(cli.service, "");
        assert_eq!(cli.tokens, args(&[""]));
    }

    #[test]
    fn missing_positionals_is_usage_error() {
        for list in [&["prog"][..], &["prog", "localhost"][..]] {
            let err = parse_args(&args(list)).unwrap_err();
            assert!(matches!(err, ProbeError::Usage { ref program } if program == "prog"));
            assert_eq!(err.exit_code(), 255);
        }
    }

    #[test]
    fn lone_help_or_version_is_usage_error() {
        for flag in ["--help", "-h", "--version", "-V", "--"] {
            let err = parse_args(&args(&["getaddrinfo", flag])).unwrap_err();
            assert!(matches!(err, ProbeError::Usage { .. }), "{flag}");
            assert_eq!(err.exit_code(), 255);
        }
    }

    #[test]
    fn empty_argv_uses_default_program_name() {
        let err = parse_args(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Usage: getaddrinfo <ip/hostname> <port/service> [<flags>]"
        );
    }
}
