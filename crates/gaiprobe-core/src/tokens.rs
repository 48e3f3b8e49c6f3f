//! Symbolic hint vocabularies.
//!
//! Four immutable tables map the `<netdb.h>` / `<sys/socket.h>` / `<netinet/in.h>`
//! constant names accepted on the command line to the platform's integer values.
//! A token is classified against the tables in a fixed order (flags, socket type,
//! family, protocol) and only the first table that knows the name is consulted.

use std::fmt;

/// Which `addrinfo` hint field a token controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// `ai_flags`: OR-accumulated.
    Flag,
    /// `ai_socktype`: last token wins.
    Socktype,
    /// `ai_family`: last token wins.
    Family,
    /// `ai_protocol`: last token wins.
    Protocol,
}

impl TokenCategory {
    /// Classification order. A name present in several tables resolves to the
    /// earliest category in this list.
    pub const ORDER: [TokenCategory; 4] = [
        TokenCategory::Flag,
        TokenCategory::Socktype,
        TokenCategory::Family,
        TokenCategory::Protocol,
    ];

    /// Stable lowercase identifier, used in structured logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Socktype => "socktype",
            Self::Family => "family",
            Self::Protocol => "protocol",
        }
    }

    /// The lookup table backing this category.
    #[must_use]
    pub const fn table(self) -> &'static [(&'static str, i32)] {
        match self {
            Self::Flag => FLAG_TOKENS,
            Self::Socktype => SOCKTYPE_TOKENS,
            Self::Family => FAMILY_TOKENS,
            Self::Protocol => PROTOCOL_TOKENS,
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Darwin-only flag names
// ---------------------------------------------------------------------------

// Apple's resolver defines four extra flag names. Elsewhere they are mapped onto
// the closest portable combination so the vocabulary stays identical on every
// target.

#[cfg(target_vendor = "apple")]
const AI_V4MAPPED_CFG: i32 = 0x0000_0200;
#[cfg(target_vendor = "apple")]
const AI_UNUSABLE: i32 = 0x1000_0000;

#[cfg(not(target_vendor = "apple"))]
const AI_V4MAPPED_CFG: i32 = libc::AI_V4MAPPED;
#[cfg(not(target_vendor = "apple"))]
const AI_UNUSABLE: i32 = 0;

const AI_MASK: i32 = libc::AI_PASSIVE
    | libc::AI_CANONNAME
    | libc::AI_NUMERICHOST
    | libc::AI_NUMERICSERV
    | libc::AI_ADDRCONFIG;
const AI_DEFAULT: i32 = AI_V4MAPPED_CFG | libc::AI_ADDRCONFIG;

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// `ai_flags` vocabulary.
pub const FLAG_TOKENS: &[(&str, i32)] = &[
    ("AI_PASSIVE", libc::AI_PASSIVE),
    ("AI_CANONNAME", libc::AI_CANONNAME),
    ("AI_NUMERICHOST", libc::AI_NUMERICHOST),
    ("AI_NUMERICSERV", libc::AI_NUMERICSERV),
    ("AI_ALL", libc::AI_ALL),
    ("AI_ADDRCONFIG", libc::AI_ADDRCONFIG),
    ("AI_V4MAPPED_CFG", AI_V4MAPPED_CFG),
    ("AI_V4MAPPED", libc::AI_V4MAPPED),
    ("AI_UNUSABLE", AI_UNUSABLE),
    ("AI_MASK", AI_MASK),
    ("AI_DEFAULT", AI_DEFAULT),
];

/// `ai_socktype` vocabulary.
pub const SOCKTYPE_TOKENS: &[(&str, i32)] = &[
    ("SOCK_STREAM", libc::SOCK_STREAM),
    ("SOCK_DGRAM", libc::SOCK_DGRAM),
    ("SOCK_RAW", libc::SOCK_RAW),
    ("SOCK_SEQPACKET", libc::SOCK_SEQPACKET),
    ("SOCK_RDM", libc::SOCK_RDM),
];

/// `ai_family` vocabulary.
pub const FAMILY_TOKENS: &[(&str, i32)] = &[
    ("AF_UNSPEC", libc::AF_UNSPEC),
    ("AF_INET", libc::AF_INET),
    ("AF_INET6", libc::AF_INET6),
    ("AF_UNIX", libc::AF_UNIX),
];

/// `ai_protocol` vocabulary.
pub const PROTOCOL_TOKENS: &[(&str, i32)] = &[
    ("IPPROTO_TCP", libc::IPPROTO_TCP),
    ("IPPROTO_UDP", libc::IPPROTO_UDP),
    ("IPPROTO_ICMP", libc::IPPROTO_ICMP),
    ("IPPROTO_IP", libc::IPPROTO_IP),
];

/// A token recognized by one of the vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch {
    pub category: TokenCategory,
    pub name: &'static str,
    pub value: i32,
}

/// Look up `name` in a single table (exact, case-sensitive).
#[must_use]
pub fn lookup(table: &'static [(&'static str, i32)], name: &str) -> Option<(&'static str, i32)> {
    table.iter().copied().find(|(entry, _)| *entry == name)
}

/// Classify a command-line token.
///
/// Tables are searched in [`TokenCategory::ORDER`]; the first hit wins.
#[must_use]
pub fn classify(token: &str) -> Option<TokenMatch> {
    TokenCategory::ORDER.iter().find_map(|&category| {
        lookup(category.table(), token).map(|(name, value)| TokenMatch {
            category,
            name,
            value,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_each_category() {
        let m = classify("AI_CANONNAME").unwrap();
        assert_eq!(m.category, TokenCategory::Flag);
        assert_eq!(m.value, libc::AI_CANONNAME);

        let m = classify("SOCK_DGRAM").unwrap();
        assert_eq!(m.category, TokenCategory::Socktype);
        assert_eq!(m.value, libc::SOCK_DGRAM);

        let m = classify("AF_INET6").unwrap();
        assert_eq!(m.category, TokenCategory::Family);
        assert_eq!(m.value, libc::AF_INET6);

        let m = classify("IPPROTO_UDP").unwrap();
        assert_eq!(m.category, TokenCategory::Protocol);
        assert_eq!(m.value, libc::IPPROTO_UDP);
    }

    #[test]
    fn classify_is_case_sensitive() {
        assert!(classify("af_inet").is_none());
        assert!(classify("Sock_Stream").is_none());
    }

    #[test]
    fn classify_rejects_partial_names() {
        assert!(classify("AF_").is_none());
        assert!(classify("AI_PASSIVE ").is_none());
        assert!(classify("").is_none());
    }

    #[test]
    fn v4mapped_cfg_is_distinct_from_v4mapped_name() {
        // Both names must resolve on their own, not via prefix matching.
        assert_eq!(classify("AI_V4MAPPED").unwrap().name, "AI_V4MAPPED");
        assert_eq!(classify("AI_V4MAPPED_CFG").unwrap().name, "AI_V4MAPPED_CFG");
    }

    #[test]
    fn composite_flags_cover_their_parts() {
        let mask = classify("AI_MASK").unwrap().value;
        for part in [
            libc::AI_PASSIVE,
            libc::AI_CANONNAME,
            libc::AI_NUMERICHOST,
            libc::AI_NUMERICSERV,
            libc::AI_ADDRCONFIG,
        ] {
            assert_eq!(mask & part, part);
        }
        let default = classify("AI_DEFAULT").unwrap().value;
        assert_eq!(default & libc::AI_ADDRCONFIG, libc::AI_ADDRCONFIG);
    }

    #[test]
    fn table_names_are_unique_within_each_table() {
        for category in TokenCategory::ORDER {
            let table = category.table();
            for (i, (a, _)) in table.iter().enumerate() {
                for (b, _) in &table[i + 1..] {
                    assert_ne!(a, b, "duplicate {a} in {category}");
                }
            }
        }
    }

    #[test]
    fn every_table_entry_classifies_to_its_own_category() {
        // No name is shared between tables today; if one ever is, the earlier
        // category must win.
        for category in TokenCategory::ORDER {
            for (name, value) in category.table() {
                let m = classify(name).unwrap();
                let earliest = TokenCategory::ORDER
                    .iter()
                    .copied()
                    .find(|c| lookup(c.table(), name).is_some())
                    .unwrap();
                assert_eq!(m.category, earliest);
                if earliest == category {
                    assert_eq!(m.value, *value);
                }
            }
        }
    }

    #[test]
    fn category_names_are_stable() {
        assert_eq!(TokenCategory::Flag.to_string(), "flag");
        assert_eq!(TokenCategory::Socktype.as_str(), "socktype");
        assert_eq!(TokenCategory::Family.as_str(), "family");
        assert_eq!(TokenCategory::Protocol.as_str(), "protocol");
    }
}
