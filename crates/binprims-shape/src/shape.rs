//! Shape descriptions and their digests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::token::IdentityToken;

/// Structural description of what a codec puts on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// A named layout, identified by its token, applied to argument shapes.
    Basetype {
        token: IdentityToken,
        args: Vec<Shape>,
    },
    /// Fields written back to back with no tag.
    Tuple { items: Vec<Shape> },
}

impl Shape {
    /// Shape of a base type with no arguments.
    pub fn leaf(token: IdentityToken) -> Self {
        Self::Basetype {
            token,
            args: Vec::new(),
        }
    }

    pub fn basetype(token: IdentityToken, args: Vec<Shape>) -> Self {
        Self::Basetype { token, args }
    }

    pub fn tuple(items: Vec<Shape>) -> Self {
        Self::Tuple { items }
    }

    /// Fingerprint of this shape.
    ///
    /// Two shapes have equal digests exactly when they are structurally equal,
    /// tokens included.
    pub fn digest(&self) -> Digest {
        let mut hasher = blake3::Hasher::new();
        self.feed(&mut hasher);
        Digest(*hasher.finalize().as_bytes())
    }

    fn feed(&self, hasher: &mut blake3::Hasher) {
        match self {
            Shape::Basetype { token, args } => {
                hasher.update(b"B");
                hasher.update(token.as_bytes());
                hasher.update(&(args.len() as u64).to_le_bytes());
                for arg in args {
                    arg.feed(hasher);
                }
            }
            Shape::Tuple { items } => {
                hasher.update(b"T");
                hasher.update(&(items.len() as u64).to_le_bytes());
                for item in items {
                    item.feed(hasher);
                }
            }
        }
    }
}

/// 32-byte BLAKE3 fingerprint of a [`Shape`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::builtin;

    #[test]
    fn equal_shapes_have_equal_digests() {
        let a = Shape::basetype(builtin::VEC, vec![Shape::leaf(builtin::INT)]);
        let b = Shape::basetype(builtin::VEC, vec![Shape::leaf(builtin::INT)]);
        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn token_changes_digest() {
        let element = vec![Shape::leaf(builtin::INT)];
        let a = Shape::basetype(builtin::VEC, element.clone());
        let b = Shape::basetype(builtin::VEC_DEQUE, element);
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn nesting_is_not_flattened() {
        let flat = Shape::tuple(vec![
            Shape::leaf(builtin::INT),
            Shape::leaf(builtin::INT),
            Shape::leaf(builtin::INT),
        ]);
        let nested = Shape::tuple(vec![
            Shape::leaf(builtin::INT),
            Shape::tuple(vec![Shape::leaf(builtin::INT), Shape::leaf(builtin::INT)]),
        ]);
        assert_ne!(flat.digest(), nested.digest());
    }

    #[test]
    fn empty_tuple_differs_from_leaf() {
        assert_ne!(
            Shape::tuple(Vec::new()).digest(),
            Shape::leaf(builtin::UNIT).digest()
        );
    }

    #[test]
    fn digest_hex_roundtrip() {
        let digest = Shape::leaf(builtin::STRING).digest();
        let text = digest.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<Digest>().unwrap(), digest);
    }

    #[test]
    fn shape_serializes_with_kind_tag() {
        let shape = Shape::basetype(builtin::OPTION, vec![Shape::leaf(builtin::BOOL)]);
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["kind"], "basetype");
        assert_eq!(json["args"][0]["kind"], "basetype");
        let back: Shape = serde_json::from_value(json).unwrap();
        assert_eq!(back, shape);
    }
}
