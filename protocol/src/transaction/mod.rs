//! # Transaction Module
//!
//! The ledger's value-moving entities and the envelopes that carry them.
//!
//! ## Architecture
//!
//! ```text
//! input.rs    — UTXO inputs and the Input family
//! output.rs   — single-address deposits and the Output family
//! unsigned.rs — UnsignedTransaction: inputs, outputs, optional payload
//! signed.rs   — SignedTransaction: an unsigned transaction plus unlock blocks
//! builder.rs  — UnsignedTransactionBuilder, sorts into wire order
//! ```
//!
//! ## Decode Layers
//!
//! 1. **Structure**: discriminants, counts, fixed-size fields.
//! 2. **Array rules** (validation only): count bounds and strictly
//!    ascending element encodings for inputs and outputs.
//! 3. **Decode validators** (validation only): unique UTXO references and
//!    unique deposit addresses.
//! 4. **Syntactic validity** (explicit call): reference bounds, deposit
//!    amounts and the supply ceiling, see
//!    [`UnsignedTransaction::syntactically_valid`].

pub mod builder;
pub mod input;
pub mod output;
pub mod signed;
pub mod unsigned;

pub use builder::UnsignedTransactionBuilder;
pub use input::{
    Input, TransactionId, UtxoInput, INPUT_UTXO, UTXO_INPUT_SIZE, UTXO_REF_KEY_LENGTH,
};
pub use output::{Output, SigLockedSingleDeposit, OUTPUT_SIG_LOCKED_SINGLE_DEPOSIT};
pub use signed::{SignedTransaction, TRANSACTION_SIGNED};
pub use unsigned::{Payload, UnsignedTransaction, TRANSACTION_UNSIGNED};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::codec::{uvarint, DeSeriMode, Serializable, TypeSelector};
use crate::config::ProtocolParameters;
use crate::error::{CodecError, TypeFamily};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Every transaction variant the wire format knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "transaction", rename_all = "snake_case")]
pub enum Transaction {
    Unsigned(UnsignedTransaction),
    Signed(SignedTransaction),
}

impl Transaction {
    /// Decodes whichever variant `data` starts with, using the bounds in
    /// `params`. Returns the transaction and the bytes consumed.
    pub fn decode_with_params(
        data: &[u8],
        mode: DeSeriMode,
        params: &ProtocolParameters,
    ) -> Result<(Self, usize), CodecError> {
        let (ty, _) = uvarint(data)?;
        let mut tx = Self::select(ty)?;
        let entity = tx.type_name();
        let consumed = match &mut tx {
            Self::Unsigned(inner) => inner.deserialize_with_params(data, mode, params),
            Self::Signed(inner) => inner.deserialize_with_params(data, mode, params),
        }
        .map_err(|e| e.in_entity(entity))?;
        trace!(entity, consumed, "deserialized transaction");
        Ok((tx, consumed))
    }

    /// The unsigned part, whichever variant this is.
    pub fn unsigned(&self) -> &UnsignedTransaction {
        match self {
            Self::Unsigned(tx) => tx,
            Self::Signed(tx) => &tx.transaction,
        }
    }

    pub fn syntactically_valid(&self, params: &ProtocolParameters) -> Result<(), CodecError> {
        match self {
            Self::Unsigned(tx) => tx.syntactically_valid(params),
            Self::Signed(tx) => tx.syntactically_valid(params),
        }
    }
}

impl From<UnsignedTransaction> for Transaction {
    fn from(tx: UnsignedTransaction) -> Self {
        Self::Unsigned(tx)
    }
}

impl From<SignedTransaction> for Transaction {
    fn from(tx: SignedTransaction) -> Self {
        Self::Signed(tx)
    }
}

impl Serializable for Transaction {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        match self {
            Self::Unsigned(tx) => tx.decode(data, mode),
            Self::Signed(tx) => tx.decode(data, mode),
        }
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Unsigned(tx) => tx.encode(mode),
            Self::Signed(tx) => tx.encode(mode),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Unsigned(_) => "UnsignedTransaction",
            Self::Signed(_) => "SignedTransaction",
        }
    }
}

impl TypeSelector for Transaction {
    const FAMILY: TypeFamily = TypeFamily::Transaction;

    fn select(ty: u64) -> Result<Self, CodecError> {
        match ty {
            TRANSACTION_UNSIGNED => Ok(Self::Unsigned(UnsignedTransaction::default())),
            TRANSACTION_SIGNED => Ok(Self::Signed(SignedTransaction::default())),
            other => Err(CodecError::UnknownType {
                family: Self::FAMILY,
                discriminant: other,
            }),
        }
    }
}
