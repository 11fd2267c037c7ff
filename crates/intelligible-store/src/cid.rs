//! Content identifiers for stored documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte document identifier, computed as Blake3(finalized text).
///
/// Two documents with the same text have the same id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentCid(pub [u8; 32]);

impl DocumentCid {
    /// Compute the id of a finalized document text.
    pub fn of(text: &str) -> Self {
        Self(*blake3::hash(text.as_bytes()).as_bytes())
    }

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self(arr))
    }

    /// Whether `text` hashes to this id.
    pub fn matches(&self, text: &str) -> bool {
        Self::of(text) == *self
    }
}

impl fmt::Debug for DocumentCid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentCid({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for DocumentCid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for DocumentCid {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for DocumentCid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for DocumentCid {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = slice.try_into()?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_cid_is_content_address() {
        let a = DocumentCid::of("<doc/>");
        assert_eq!(a, DocumentCid::of("<doc/>"));
        assert_ne!(a, DocumentCid::of("<doc />"));
        assert!(a.matches("<doc/>"));
    }

    #[test]
    fn test_hex_round_trip() {
        let cid = DocumentCid::of("hello");
        assert_eq!(cid.to_hex().len(), 64);
        assert_eq!(cid.to_string().parse::<DocumentCid>().unwrap(), cid);
        assert!(DocumentCid::from_hex("abcd").is_err());
    }

    #[test]
    fn test_debug_is_short() {
        let cid = DocumentCid::of("hello");
        assert_eq!(format!("{cid:?}"), format!("DocumentCid({})", &cid.to_hex()[..16]));
    }

    proptest! {
        #[test]
        fn prop_distinct_texts_distinct_cids(a in ".{0,64}", b in ".{0,64}") {
            prop_assume!(a != b);
            prop_assert_ne!(DocumentCid::of(&a), DocumentCid::of(&b));
        }
    }
}
