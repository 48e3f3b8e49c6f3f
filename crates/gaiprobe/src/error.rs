//! Error taxonomy and process exit codes.

use std::io;
use std::path::PathBuf;

use gaiprobe_abi::GaiError;
use thiserror::Error;

/// Exit code for a successful run.
pub const EXIT_OK: u8 = 0;
/// Exit code when the resolver (or any later step) fails.
pub const EXIT_FAILURE: u8 = 1;
/// Exit code for missing or malformed arguments.
pub const EXIT_USAGE: u8 = 255;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Usage: {program} <ip/hostname> <port/service> [<flags>]")]
    Usage { program: String },
    #[error("getaddrinfo error: {0}")]
    Resolve(#[from] GaiError),
    #[error("cannot open structured log {}: {source}", path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write failed: {0}")]
    Output(#[source] io::Error),
}

impl ProbeError {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage { .. } => EXIT_USAGE,
            Self::Resolve(_) | Self::Log { .. } | Self::Output(_) => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_message_and_code() {
        let err = ProbeError::Usage {
            program: "getaddrinfo".into(),
        };
        assert_eq!(
            err.to_string(),
            "Usage: getaddrinfo <ip/hostname> <port/service> [<flags>]"
        );
        assert_eq!(err.exit_code(), 255);
    }

    #[test]
    fn resolve_message_and_code() {
        let err = ProbeError::from(GaiError {
            code: -2,
            message: "Name or service not known".into(),
            os_error: None,
        });
        assert_eq!(err.to_string(), "getaddrinfo error: Name or service not known");
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn io_failures_exit_one() {
        let log = ProbeError::Log {
            path: PathBuf::from("/nonexistent/trace.jsonl"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(log.to_string().contains("/nonexistent/trace.jsonl"));
        assert_eq!(log.exit_code(), EXIT_FAILURE);

        let out = ProbeError::Output(io::Error::from(io::ErrorKind::BrokenPipe));
        assert_eq!(out.exit_code(), EXIT_FAILURE);
    }
}
