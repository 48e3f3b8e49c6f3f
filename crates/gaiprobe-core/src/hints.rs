//! Resolver hint record built from command-line tokens.

use std::fmt;

use crate::tokens::{TokenCategory, TokenMatch, classify};

/// The caller-controlled fields of `struct addrinfo` hints.
///
/// Zero in every field means "unspecified" and leaves the choice to the
/// platform resolver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hints {
    pub flags: i32,
    pub socktype: i32,
    pub family: i32,
    pub protocol: i32,
}

/// Result of feeding one token into [`Hints::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    Matched(TokenMatch),
    Unknown(String),
}

impl TokenOutcome {
    /// Returns true if the token was recognized.
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

impl fmt::Display for TokenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Matched(m) => match m.category {
                TokenCategory::Flag => write!(f, "Flag: {} (0x{:x})", m.name, m.value),
                TokenCategory::Socktype => write!(f, "Socktype: {} ({})", m.name, m.value),
                TokenCategory::Family => write!(f, "Family: {} ({})", m.name, m.value),
                TokenCategory::Protocol => write!(f, "Protocol: {} ({})", m.name, m.value),
            },
            Self::Unknown(token) => write!(f, "Unknown option: {token}"),
        }
    }
}

impl Hints {
    /// Apply a single token.
    ///
    /// Flags are OR-ed in; socket type, family and protocol are overwritten.
    /// Unrecognized tokens leave the record untouched.
    pub fn apply(&mut self, token: &str) -> TokenOutcome {
        let Some(m) = classify(token) else {
            return TokenOutcome::Unknown(token.to_string());
        };
        match m.category {
            TokenCategory::Flag => self.flags |= m.value,
            TokenCategory::Socktype => self.socktype = m.value,
            TokenCategory::Family => self.family = m.value,
            TokenCategory::Protocol => self.protocol = m.value,
        }
        TokenOutcome::Matched(m)
    }

    /// Build hints from tokens applied left to right.
    ///
    /// Returns the finished record and one outcome per input token, in order.
    pub fn from_tokens<I, S>(tokens: I) -> (Self, Vec<TokenOutcome>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hints = Self::default();
        let outcomes = tokens
            .into_iter()
            .map(|token| hints.apply(token.as_ref()))
            .collect();
        (hints, outcomes)
    }
}
