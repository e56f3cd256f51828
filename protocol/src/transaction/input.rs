//! Transaction inputs.
//!
//! ```text
//! UTXO input: [type:1][transaction id:32][output index:2]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{read_array, read_type_and_advance, serde_hex, write_type_header};
use crate::codec::{DeSeriMode, Serializable, TypeSelector};
use crate::config::{ONE_BYTE, TRANSACTION_ID_LENGTH, UINT16_BYTE_SIZE};
use crate::error::{check_min_byte_length, CodecError, TypeFamily};

/// Input referencing an unspent transaction output.
pub const INPUT_UTXO: u64 = 0;

/// Size of a serialized UTXO input with its discriminant.
pub const UTXO_INPUT_SIZE: usize = ONE_BYTE + TRANSACTION_ID_LENGTH + UINT16_BYTE_SIZE;

/// Length of the key identifying the output a UTXO input spends.
pub const UTXO_REF_KEY_LENGTH: usize = TRANSACTION_ID_LENGTH + UINT16_BYTE_SIZE;

/// Identifier of a transaction, the BLAKE3 digest of its encoding.
pub type TransactionId = [u8; TRANSACTION_ID_LENGTH];

// ---------------------------------------------------------------------------
// UtxoInput
// ---------------------------------------------------------------------------

/// Spends output `transaction_output_index` of transaction `transaction_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UtxoInput {
    #[serde(with = "serde_hex")]
    pub transaction_id: TransactionId,
    pub transaction_output_index: u16,
}

impl UtxoInput {
    pub fn new(transaction_id: TransactionId, transaction_output_index: u16) -> Self {
        Self {
            transaction_id,
            transaction_output_index,
        }
    }

    /// Transaction ID followed by the little-endian output index. Two
    /// inputs spend the same output exactly when their keys are equal.
    pub fn ref_key(&self) -> [u8; UTXO_REF_KEY_LENGTH] {
        let mut key = [0u8; UTXO_REF_KEY_LENGTH];
        key[..TRANSACTION_ID_LENGTH].copy_from_slice(&self.transaction_id);
        key[TRANSACTION_ID_LENGTH..].copy_from_slice(&self.transaction_output_index.to_le_bytes());
        key
    }
}

impl fmt::Display for UtxoInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            hex::encode(self.transaction_id),
            self.transaction_output_index
        )
    }
}

impl Serializable for UtxoInput {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        check_min_byte_length(UTXO_INPUT_SIZE, data.len())?;
        let (data, type_len) = read_type_and_advance(data, INPUT_UTXO, TypeFamily::Input, mode)?;
        check_min_byte_length(UTXO_REF_KEY_LENGTH, data.len())?;
        self.transaction_id = read_array(data)?;
        let index: [u8; UINT16_BYTE_SIZE] = read_array(&data[TRANSACTION_ID_LENGTH..])?;
        self.transaction_output_index = u16::from_le_bytes(index);
        Ok(type_len + UTXO_REF_KEY_LENGTH)
    }

    fn encode(&self, _mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        let mut buf = write_type_header(INPUT_UTXO, UTXO_INPUT_SIZE);
        buf.extend_from_slice(&self.ref_key());
        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Every input variant the wire format knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "input", rename_all = "snake_case")]
pub enum Input {
    Utxo(UtxoInput),
}

impl From<UtxoInput> for Input {
    fn from(input: UtxoInput) -> Self {
        Self::Utxo(input)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utxo(input) => write!(f, "utxo:{}", input),
        }
    }
}

impl Serializable for Input {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        match self {
            Self::Utxo(input) => input.decode(data, mode),
        }
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Utxo(input) => input.encode(mode),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Utxo(_) => "UtxoInput",
        }
    }
}

impl TypeSelector for Input {
    const FAMILY: TypeFamily = TypeFamily::Input;

    fn select(ty: u64) -> Result<Self, CodecError> {
        match ty {
            INPUT_UTXO => Ok(Self::Utxo(UtxoInput::default())),
            other => Err(CodecError::UnknownType {
                family: Self::FAMILY,
                discriminant: other,
            }),
        }
    }
}
