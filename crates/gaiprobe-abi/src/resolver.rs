//! Platform `getaddrinfo` boundary (`<netdb.h>`).
//!
//! - [`resolve`]: marshal [`Hints`] into `struct addrinfo` and call the system resolver
//! - [`AddrInfoList`]: owns the returned list, released with `freeaddrinfo` on drop
//! - [`GaiError`]: non-zero status plus the `gai_strerror` description

use std::ffi::{CStr, CString, OsStr, c_int};
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::mem::size_of;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::os::unix::ffi::OsStrExt;
use std::ptr;

use gaiprobe_core::{AddressRecord, Hints};

/// Resolution failure reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaiError {
    /// Raw `EAI_*` status.
    pub code: c_int,
    /// Human-readable description (from `gai_strerror`).
    pub message: String,
    /// `errno` captured when `code == EAI_SYSTEM`.
    pub os_error: Option<i32>,
}

impl GaiError {
    /// Build an error for `code`, looking up its description.
    #[must_use]
    pub fn from_code(code: c_int, os_error: Option<i32>) -> Self {
        Self {
            code,
            message: gai_message(code),
            os_error,
        }
    }

    fn interior_nul(code: c_int, argument: &str) -> Self {
        Self {
            code,
            message: format!("{} ({argument} contains a NUL byte)", gai_message(code)),
            os_error: None,
        }
    }
}

impl fmt::Display for GaiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GaiError {}

/// `gai_strerror(code)` as an owned string.
#[must_use]
pub fn gai_message(code: c_int) -> String {
    // SAFETY: gai_strerror accepts any int and returns a pointer to a static string
    // (or null on some exotic platforms, handled below).
    let msg = unsafe { libc::gai_strerror(code) };
    if msg.is_null() {
        return format!("Unknown error {code}");
    }
    // SAFETY: non-null pointer to a NUL-terminated static string.
    unsafe { CStr::from_ptr(msg) }
        .to_string_lossy()
        .into_owned()
}

/// Owned result list from a successful `getaddrinfo` call.
///
/// Dropping the list calls `freeaddrinfo` exactly once. A null head (an empty
/// result) is never handed to `freeaddrinfo`.
pub struct AddrInfoList {
    head: *mut libc::addrinfo,
}

impl AddrInfoList {
    /// Iterate the records in the order the resolver returned them.
    #[must_use]
    pub fn records(&self) -> Records<'_> {
        Records {
            cur: self.head,
            _list: PhantomData,
        }
    }

    /// Number of entries in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }
}

impl Drop for AddrInfoList {
    fn drop(&mut self) {
        if self.head.is_null() {
            return;
        }
        // SAFETY: head came from a successful getaddrinfo call and is released once.
        unsafe { libc::freeaddrinfo(self.head) };
        self.head = ptr::null_mut();
    }
}

impl fmt::Debug for AddrInfoList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.records()).finish()
    }
}

/// Borrowing iterator over an [`AddrInfoList`].
pub struct Records<'a> {
    cur: *const libc::addrinfo,
    _list: PhantomData<&'a AddrInfoList>,
}

impl Iterator for Records<'_> {
    type Item = AddressRecord;

    fn next(&mut self) -> Option<AddressRecord> {
        if self.cur.is_null() {
            return None;
        }
        // SAFETY: cur is a node of a live list owned by the borrowed AddrInfoList.
        let node = unsafe { &*self.cur };
        self.cur = node.ai_next;
        // SAFETY: node fields were filled in by the platform resolver.
        Some(unsafe { record_from_addrinfo(node) })
    }
}

/// Decode one `struct addrinfo` node.
///
/// # Safety
///
/// `ai.ai_addr` must be null or point to at least `ai.ai_addrlen` readable bytes.
unsafe fn record_from_addrinfo(ai: &libc::addrinfo) -> AddressRecord {
    let addr = ai.ai_addr;
    let len = ai.ai_addrlen as usize;
    if addr.is_null() {
        return AddressRecord::unrecognized(ai.ai_family);
    }
    match ai.ai_family {
        libc::AF_INET if len >= size_of::<libc::sockaddr_in>() => {
            // SAFETY: family and length checked; read_unaligned tolerates any alignment.
            let sin = unsafe { ptr::read_unaligned(addr.cast::<libc::sockaddr_in>()) };
            AddressRecord::v4(Ipv4Addr::from(sin.sin_addr.s_addr.to_ne_bytes()))
        }
        libc::AF_INET6 if len >= size_of::<libc::sockaddr_in6>() => {
            // SAFETY: family and length checked; read_unaligned tolerates any alignment.
            let sin6 = unsafe { ptr::read_unaligned(addr.cast::<libc::sockaddr_in6>()) };
            AddressRecord::v6(Ipv6Addr::from(sin6.sin6_addr.s6_addr))
        }
        family => AddressRecord::unrecognized(family),
    }
}

/// Resolve `host` / `service` with the platform resolver.
///
/// Both strings are passed through unmodified. A NUL byte inside either cannot be
/// expressed as a C string; that is reported as `EAI_NONAME` (host) or
/// `EAI_SERVICE` (service) without calling the resolver.
pub fn resolve(host: &OsStr, service: &OsStr, hints: &Hints) -> Result<AddrInfoList, GaiError> {
    let host = CString::new(host.as_bytes())
        .map_err(|_| GaiError::interior_nul(libc::EAI_NONAME, "host"))?;
    let service = CString::new(service.as_bytes())
        .map_err(|_| GaiError::interior_nul(libc::EAI_SERVICE, "service"))?;

    // SAFETY: addrinfo is plain old data; all-zero is the documented "no hints" value.
    let mut raw: libc::addrinfo = unsafe { std::mem::zeroed() };
    raw.ai_flags = hints.flags;
    raw.ai_family = hints.family;
    raw.ai_socktype = hints.socktype;
    raw.ai_protocol = hints.protocol;

    let mut head: *mut libc::addrinfo = ptr::null_mut();
    // SAFETY: both strings are NUL-terminated and outlive the call; raw and head
    // are valid for the duration of the call.
    let status = unsafe { libc::getaddrinfo(host.as_ptr(), service.as_ptr(), &raw, &mut head) };
    if status != 0 {
        let os_error = if status == libc::EAI_SYSTEM {
            io::Error::last_os_error().raw_os_error()
        } else {
            None
        };
        return Err(GaiError::from_code(status, os_error));
    }
    Ok(AddrInfoList { head })
}
