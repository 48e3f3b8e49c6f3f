//! # gaiprobe-core
//!
//! Safe building blocks for the `getaddrinfo` probe: symbolic hint vocabularies,
//! the hint record they populate, and the textual form of resolved addresses.
//! No `unsafe` code is permitted at the crate level; the FFI call itself lives
//! in `gaiprobe-abi`.

#![deny(unsafe_code)]

pub mod hints;
pub mod record;
pub mod tokens;

pub use hints::{Hints, TokenOutcome};
pub use record::{AddressRecord, RecordAddress, format_ipv6, write_records};
pub use tokens::{TokenCategory, TokenMatch, classify};
