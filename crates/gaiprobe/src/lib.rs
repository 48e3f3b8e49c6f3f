//! # gaiprobe
//!
//! Command-line probe for the platform `getaddrinfo`:
//! - map `AI_*` / `SOCK_*` / `AF_*` / `IPPROTO_*` tokens onto resolver hints
//! - resolve a host/service pair with the system resolver
//! - print one `inet` / `inet6` line per returned address
//!
//! Optional JSONL structured logging of each step (see [`structured_log`]).

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod run;
pub mod structured_log;

pub use cli::{Cli, parse_args};
pub use config::ProbeConfig;
pub use error::ProbeError;
pub use run::{NameResolver, SystemResolver, execute, run};
