//! Identity tokens for codec definition sites.
//!
//! A token is created once where a container codec is defined and never
//! changes afterwards. Define it as a constant:
//!
//! ```
//! use binprims_shape::IdentityToken;
//!
//! const INVENTORY: IdentityToken =
//!     IdentityToken::from_u128(0x5d1c_2e0f_8a41_4f6b_9d37_01a2_b3c4_d5e6);
//! assert_eq!(INVENTORY.to_string(), "5d1c2e0f-8a41-4f6b-9d37-01a2b3c4d5e6");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque per-definition-site tag threaded into shape digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityToken(Uuid);

impl IdentityToken {
    /// Build a token from a literal, usable in `const` items.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random token.
    ///
    /// Only useful for codecs that never cross a process boundary; persisted
    /// or exchanged formats need a fixed token.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The 16 raw bytes of the token.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for IdentityToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Tokens for the codecs shipped with binprims.
///
/// These values are part of the wire contract: changing one changes every
/// digest that mentions it.
pub mod builtin {
    use super::IdentityToken;

    pub const UNIT: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0001);
    pub const BOOL: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0002);
    pub const U8: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0003);
    pub const NAT0: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0004);
    pub const INT: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0005);
    pub const INT64: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0006);
    pub const FLOAT: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0007);
    pub const STRING: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0008);
    pub const BYTES: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0009);
    pub const OPTION: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_000a);

    pub const VEC: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0100);
    pub const VEC_DEQUE: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0101);
    pub const BTREE_SET: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0102);
    pub const HASH_SET: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0103);
    pub const BTREE_MAP: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0104);
    pub const HASH_MAP: IdentityToken = IdentityToken::from_u128(0x0b1f_6e52_4c0a_4f7e_8a55_3c1d_0000_0105);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_roundtrip() {
        let token = IdentityToken::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0);
        let text = token.to_string();
        assert_eq!(text, "12345678-9abc-def0-1234-56789abcdef0");
        assert_eq!(text.parse::<IdentityToken>().unwrap(), token);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not-a-token".parse::<IdentityToken>().is_err());
    }

    #[test]
    fn random_tokens_differ() {
        assert_ne!(IdentityToken::random(), IdentityToken::random());
    }

    #[test]
    fn builtin_tokens_are_distinct() {
        let all = [
            builtin::UNIT,
            builtin::BOOL,
            builtin::U8,
            builtin::NAT0,
            builtin::INT,
            builtin::INT64,
            builtin::FLOAT,
            builtin::STRING,
            builtin::BYTES,
            builtin::OPTION,
            builtin::VEC,
            builtin::VEC_DEQUE,
            builtin::BTREE_SET,
            builtin::HASH_SET,
            builtin::BTREE_MAP,
            builtin::HASH_MAP,
        ];
        let unique: std::collections::BTreeSet<_> = all.iter().collect();
        assert_eq!(unique.len(), all.len());
    }
}
