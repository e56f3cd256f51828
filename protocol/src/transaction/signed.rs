//! The signed transaction envelope.
//!
//! ```text
//! [type:1][UnsignedTransaction][unlock block count:varint][UnlockBlock]*
//! ```
//!
//! Unlock block `i` authorizes input `i`. Signatures are carried, not
//! verified.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::input::TransactionId;
use super::unsigned::UnsignedTransaction;
use crate::codec::{deserialize_array_of_objects, read_type_and_advance, write_array_of_objects};
use crate::codec::{write_type_header, DeSeriMode, Serializable, TypeSelector};
use crate::config::{ProtocolParameters, ONE_BYTE};
use crate::error::{CodecError, TypeFamily};
use crate::unlock_block::UnlockBlock;
use crate::validation::{
    unlock_block_refs_validator, unlock_block_signatures_unique_validator, validate,
};

/// Discriminant of [`SignedTransaction`].
pub const TRANSACTION_SIGNED: u64 = 1;

/// An unsigned transaction together with one unlock block per input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: UnsignedTransaction,
    pub unlock_blocks: Vec<UnlockBlock>,
}

impl SignedTransaction {
    pub fn new(transaction: UnsignedTransaction, unlock_blocks: Vec<UnlockBlock>) -> Self {
        Self {
            transaction,
            unlock_blocks,
        }
    }

    /// BLAKE3 digest of the validated encoding.
    pub fn id(&self) -> Result<TransactionId, CodecError> {
        let bytes = self.encode(DeSeriMode::PerformValidation)?;
        Ok(*blake3::hash(&bytes).as_bytes())
    }

    /// Decodes with array bounds taken from `params`.
    pub fn deserialize_with_params(
        &mut self,
        data: &[u8],
        mode: DeSeriMode,
        params: &ProtocolParameters,
    ) -> Result<usize, CodecError> {
        let (data, type_len) =
            read_type_and_advance(data, TRANSACTION_SIGNED, TypeFamily::Transaction, mode)?;

        let mut transaction = UnsignedTransaction::default();
        let tx_len = transaction
            .deserialize_with_params(data, mode, params)
            .map_err(|e| e.in_entity("UnsignedTransaction"))?;

        let rules = params.unlock_blocks_rules();
        let (unlock_blocks, blocks_len) = deserialize_array_of_objects(
            &data[tx_len..],
            mode,
            UnlockBlock::select,
            mode.validates().then_some(&rules),
        )?;

        if mode.validates() {
            check_unlock_blocks(&transaction, &unlock_blocks)?;
        }

        debug!(
            unlock_blocks = unlock_blocks.len(),
            bytes = type_len + tx_len + blocks_len,
            "deserialized signed transaction"
        );

        self.transaction = transaction;
        self.unlock_blocks = unlock_blocks;
        Ok(type_len + tx_len + blocks_len)
    }

    /// Syntactic validity of the inner transaction plus the unlock block
    /// rules.
    pub fn syntactically_valid(&self, params: &ProtocolParameters) -> Result<(), CodecError> {
        self.transaction.syntactically_valid(params)?;
        check_unlock_blocks(&self.transaction, &self.unlock_blocks)
    }
}

impl Serializable for SignedTransaction {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        self.deserialize_with_params(data, mode, &ProtocolParameters::default())
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        if mode.validates() {
            check_unlock_blocks(&self.transaction, &self.unlock_blocks)?;
        }
        let tx = self
            .transaction
            .encode(mode)
            .map_err(|e| e.in_entity("UnsignedTransaction"))?;
        let mut buf = write_type_header(TRANSACTION_SIGNED, ONE_BYTE + tx.len());
        buf.extend_from_slice(&tx);
        write_array_of_objects(&mut buf, &self.unlock_blocks, mode)?;
        Ok(buf)
    }
}

/// One unlock block per input, references pointing back at signature
/// blocks, no signature repeated.
fn check_unlock_blocks(
    transaction: &UnsignedTransaction,
    unlock_blocks: &[UnlockBlock],
) -> Result<(), CodecError> {
    if unlock_blocks.len() != transaction.inputs.len() {
        return Err(CodecError::UnlockBlockCountMismatch {
            inputs: transaction.inputs.len(),
            unlock_blocks: unlock_blocks.len(),
        });
    }
    validate(
        unlock_blocks,
        vec![
            unlock_block_refs_validator(),
            unlock_block_signatures_unique_validator(),
        ],
    )
}
