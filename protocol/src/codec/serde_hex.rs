//! Serde helpers that render fixed-size byte arrays as lowercase hex.
//!
//! Use with `#[serde(with = "crate::codec::serde_hex")]`.

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer, const N: usize>(
    bytes: &[u8; N],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
    deserializer: D,
) -> Result<[u8; N], D::Error> {
    let encoded = String::deserialize(deserializer)?;
    let mut out = [0u8; N];
    hex::decode_to_slice(encoded.trim_start_matches("0x"), &mut out).map_err(D::Error::custom)?;
    Ok(out)
}

/// Same rendering for variable-length byte vectors.
pub mod bytes {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        hex::decode(encoded.trim_start_matches("0x")).map_err(D::Error::custom)
    }
}
