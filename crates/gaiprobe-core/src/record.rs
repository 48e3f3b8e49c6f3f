//! Resolved address records and their textual form.

use std::fmt;
use std::io::{self, Write};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Family-specific payload of a resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordAddress {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
    /// Any family this tool does not decode; only the raw family number is kept.
    Unrecognized,
}

/// One entry of a resolver result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRecord {
    /// Raw `ai_family` value as reported by the resolver.
    pub family: i32,
    pub address: RecordAddress,
}

impl AddressRecord {
    #[must_use]
    pub fn v4(ip: Ipv4Addr) -> Self {
        Self {
            family: libc::AF_INET,
            address: RecordAddress::V4(ip),
        }
    }

    #[must_use]
    pub fn v6(ip: Ipv6Addr) -> Self {
        Self {
            family: libc::AF_INET6,
            address: RecordAddress::V6(ip),
        }
    }

    #[must_use]
    pub fn unrecognized(family: i32) -> Self {
        Self {
            family,
            address: RecordAddress::Unrecognized,
        }
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            RecordAddress::V4(ip) => {
                let [a, b, c, d] = ip.octets();
                write!(f, "inet {a}.{b}.{c}.{d}")
            }
            RecordAddress::V6(ip) => write!(f, "inet6 {}", format_ipv6(&ip.octets())),
            RecordAddress::Unrecognized => write!(f, "Unrecognized family ({})", self.family),
        }
    }
}

/// Write one line per record, in the order given.
pub fn write_records<'a, W, I>(out: &mut W, records: I) -> io::Result<usize>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a AddressRecord>,
{
    let mut written = 0usize;
    for record in records {
        writeln!(out, "{record}")?;
        written += 1;
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// IPv6 text form
// ---------------------------------------------------------------------------

/// Format 16 octets the way `inet_ntop(AF_INET6, ...)` does.
///
/// The longest run of two or more zero groups collapses to `::` (leftmost run on
/// ties). IPv4-mapped (`::ffff:a.b.c.d`) and IPv4-compatible (`::a.b.c.d`)
/// addresses keep a dotted tail when the last two groups are not themselves
/// swallowed by the zero run, so `::1` and `::2` stay hex.
#[must_use]
pub fn format_ipv6(addr: &[u8; 16]) -> String {
    let mut groups = [0u16; 8];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = u16::from_be_bytes([addr[i * 2], addr[i * 2 + 1]]);
    }

    let (best_start, best_len) = longest_zero_run(&groups);

    let embedded_v4 =
        best_start == 0 && (best_len == 6 || (best_len == 5 && groups[5] == 0xffff));

    let mut out = String::with_capacity(46);
    let mut i = 0usize;
    while i < 8 {
        if best_len > 0 && i == best_start {
            out.push_str("::");
            i += best_len;
            continue;
        }
        if !out.is_empty() && !out.ends_with(':') {
            out.push(':');
        }
        if embedded_v4 && i == 6 {
            out.push_str(&format!(
                "{}.{}.{}.{}",
                addr[12], addr[13], addr[14], addr[15]
            ));
            break;
        }
        out.push_str(&format!("{:x}", groups[i]));
        i += 1;
    }

    out
}

/// Start and length of the longest run of zero groups; length 0 if no run of
/// at least two exists.
fn longest_zero_run(groups: &[u16; 8]) -> (usize, usize) {
    let mut best_start = 0usize;
    let mut best_len = 0usize;
    let mut cur_start = 0usize;
    let mut cur_len = 0usize;

    for (i, &g) in groups.iter().enumerate() {
        if g == 0 {
            if cur_len == 0 {
                cur_start = i;
            }
            cur_len += 1;
            if cur_len > best_len {
                best_start = cur_start;
                best_len = cur_len;
            }
        } else {
            cur_len = 0;
        }
    }

    if best_len < 2 { (0, 0) } else { (best_start, best_len) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v6(s: &str) -> String {
        format_ipv6(&s.parse::<Ipv6Addr>().unwrap().octets())
    }

    #[test]
    fn ipv4_record_line() {
        let r = AddressRecord::v4(Ipv4Addr::new(127, 0, 0, 1));
        assert_eq!(r.to_string(), "inet 127.0.0.1");
        assert_eq!(r.family, libc::AF_INET);
    }

    #[test]
    fn ipv6_record_line() {
        let r = AddressRecord::v6(Ipv6Addr::LOCALHOST);
        assert_eq!(r.to_string(), "inet6 ::1");
        assert_eq!(r.family, libc::AF_INET6);
    }

    #[test]
    fn unrecognized_family_line() {
        let r = AddressRecord::unrecognized(libc::AF_UNIX);
        assert_eq!(r.to_string(), format!("Unrecognized family ({})", libc::AF_UNIX));
        assert_eq!(
            AddressRecord::unrecognized(-3).to_string(),
            "Unrecognized family (-3)"
        );
    }

    #[test]
    fn write_records_preserves_order_and_count() {
        let records = [
            AddressRecord::v6(Ipv6Addr::LOCALHOST),
            AddressRecord::v4(Ipv4Addr::new(10, 0, 0, 1)),
            AddressRecord::unrecognized(99),
            AddressRecord::v4(Ipv4Addr::new(10, 0, 0, 1)),
        ];
        let mut out = Vec::new();
        let n = write_records(&mut out, &records).unwrap();
        assert_eq!(n, 4);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "inet6 ::1\ninet 10.0.0.1\nUnrecognized family (99)\ninet 10.0.0.1\n"
        );
    }

    #[test]
    fn write_records_empty() {
        let none: [AddressRecord; 0] = [];
        let mut out = Vec::new();
        assert_eq!(write_records(&mut out, &none).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn ipv6_unspecified_and_loopback() {
        assert_eq!(v6("::"), "::");
        assert_eq!(v6("::1"), "::1");
    }

    #[test]
    fn ipv6_compresses_longest_run() {
        assert_eq!(v6("2001:db8:0:0:1:0:0:1"), "2001:db8::1:0:0:1");
        assert_eq!(v6("2001:0:0:1:0:0:0:1"), "2001:0:0:1::1");
        assert_eq!(v6("fe80::1:2"), "fe80::1:2");
    }

    #[test]
    fn ipv6_single_zero_group_not_compressed() {
        assert_eq!(v6("2001:db8:0:1:1:1:1:1"), "2001:db8:0:1:1:1:1:1");
    }

    #[test]
    fn ipv6_trailing_run() {
        assert_eq!(v6("2001:db8::"), "2001:db8::");
    }

    #[test]
    fn ipv6_lowercase_hex_without_leading_zeros() {
        assert_eq!(v6("2001:0DB8:00AB::00FF"), "2001:db8:ab::ff");
    }

    #[test]
    fn ipv6_v4_mapped_keeps_dotted_tail() {
        assert_eq!(v6("::ffff:192.0.2.1"), "::ffff:192.0.2.1");
    }

    #[test]
    fn ipv6_v4_compatible_keeps_dotted_tail() {
        assert_eq!(v6("::192.0.2.1"), "::192.0.2.1");
        assert_eq!(v6("::1:2"), "::0.1.0.2");
    }

    #[test]
    fn ipv6_short_tail_stays_hex() {
        assert_eq!(v6("::2"), "::2");
        assert_eq!(v6("::ffff"), "::ffff");
    }

    #[test]
    fn ipv6_no_zero_groups() {
        assert_eq!(v6("1:2:3:4:5:6:7:8"), "1:2:3:4:5:6:7:8");
    }
}
