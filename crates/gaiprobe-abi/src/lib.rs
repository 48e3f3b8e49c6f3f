//! # gaiprobe-abi
//!
//! The FFI boundary of the probe. Everything that touches `struct addrinfo`,
//! `getaddrinfo`, `freeaddrinfo` or `gai_strerror` lives here so the rest of the
//! workspace stays free of `unsafe`.
//!
//! ```text
//! Hints (core) -> resolve (this crate) -> platform resolver -> AddrInfoList -> AddressRecord (core)
//! ```

#![cfg(unix)]

pub mod resolver;

pub use resolver::{AddrInfoList, GaiError, Records, gai_message, resolve};
