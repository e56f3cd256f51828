//! The unsigned transaction envelope.
//!
//! ```text
//! [type:1][input count:varint][Input]*[output count:varint][Output]*[payload len:varint][payload]
//! ```
//!
//! Inputs and outputs must each be in strictly ascending order of their
//! encodings. A payload length of zero means there is no payload.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::input::Input;
use super::output::Output;
use crate::codec::{deserialize_array_of_objects, read_type_and_advance, serde_hex};
use crate::codec::{
    check_canonical_uvarint, put_uvarint, uvarint, write_array_of_objects, write_type_header,
};
use crate::codec::{DeSeriMode, Serializable, TypeSelector};
use crate::config::ProtocolParameters;
use crate::error::{check_min_byte_length, CodecError, LengthBound, TypeFamily};
use crate::validation::{
    inputs_utxo_ref_index_bounds_validator, inputs_utxo_refs_unique_validator,
    outputs_addr_unique_validator, outputs_deposit_amount_validator, outputs_sum_validator,
    validate,
};

/// Discriminant of [`UnsignedTransaction`].
pub const TRANSACTION_UNSIGNED: u64 = 0;

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Opaque bytes embedded in a transaction. The codec never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Payload(#[serde(with = "serde_hex::bytes")] pub Vec<u8>);

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// Inputs being spent, outputs being created and an optional payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl UnsignedTransaction {
    /// Creates a transaction without payload. The caller is responsible for
    /// the order of `inputs` and `outputs`, see
    /// [`UnsignedTransactionBuilder`](super::UnsignedTransactionBuilder) for
    /// a constructor that sorts them.
    pub fn new(inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        Self {
            inputs,
            outputs,
            payload: None,
        }
    }

    /// Decodes with array bounds taken from `params` instead of the
    /// defaults.
    pub fn deserialize_with_params(
        &mut self,
        data: &[u8],
        mode: DeSeriMode,
        params: &ProtocolParameters,
    ) -> Result<usize, CodecError> {
        let (data, type_len) =
            read_type_and_advance(data, TRANSACTION_UNSIGNED, TypeFamily::Transaction, mode)?;
        let mut offset = 0;

        let inputs_rules = params.inputs_rules();
        let (inputs, inputs_len) = deserialize_array_of_objects(
            data,
            mode,
            Input::select,
            mode.validates().then_some(&inputs_rules),
        )?;
        if mode.validates() {
            validate(&inputs, vec![inputs_utxo_refs_unique_validator()])?;
        }
        offset += inputs_len;

        let outputs_rules = params.outputs_rules();
        let (outputs, outputs_len) = deserialize_array_of_objects(
            &data[offset..],
            mode,
            Output::select,
            mode.validates().then_some(&outputs_rules),
        )?;
        if mode.validates() {
            validate(&outputs, vec![outputs_addr_unique_validator()])?;
        }
        offset += outputs_len;

        let (payload, payload_len) = read_payload(&data[offset..], mode)?;
        offset += payload_len;

        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            payload = payload.as_ref().map_or(0, Payload::len),
            bytes = type_len + offset,
            "deserialized unsigned transaction"
        );

        self.inputs = inputs;
        self.outputs = outputs;
        self.payload = payload;
        Ok(type_len + offset)
    }

    /// Checks the rules that hold regardless of ledger state: input
    /// references in bounds and unique, outputs to unique addresses with
    /// non-zero deposits that stay within the total supply.
    ///
    /// The shape of the inputs and outputs themselves is not re-checked.
    pub fn syntactically_valid(&self, params: &ProtocolParameters) -> Result<(), CodecError> {
        validate(
            &self.inputs,
            vec![
                inputs_utxo_ref_index_bounds_validator(params.max_utxo_index),
                inputs_utxo_refs_unique_validator(),
            ],
        )?;
        validate(
            &self.outputs,
            vec![
                outputs_addr_unique_validator(),
                outputs_deposit_amount_validator(params.token_supply),
                outputs_sum_validator(params.token_supply),
            ],
        )
    }

    /// Sum of all output deposits.
    pub fn total_deposit(&self) -> Result<u64, CodecError> {
        self.outputs.iter().try_fold(0u64, |total, output| {
            total
                .checked_add(output.amount())
                .ok_or(CodecError::IntegerOverflow {
                    context: "accumulating output deposits",
                })
        })
    }
}

impl Serializable for UnsignedTransaction {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        self.deserialize_with_params(data, mode, &ProtocolParameters::default())
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        if mode.validates() {
            validate(&self.inputs, vec![inputs_utxo_refs_unique_validator()])?;
            validate(&self.outputs, vec![outputs_addr_unique_validator()])?;
            if let Some(payload) = self.payload.as_ref().filter(|p| p.is_empty()) {
                return Err(CodecError::InvalidLength {
                    bound: LengthBound::Min,
                    required: 1,
                    actual: payload.len(),
                });
            }
        }

        let mut buf = write_type_header(TRANSACTION_UNSIGNED, 64);
        write_array_of_objects(&mut buf, &self.inputs, mode)?;
        write_array_of_objects(&mut buf, &self.outputs, mode)?;
        match &self.payload {
            Some(payload) => {
                put_uvarint(&mut buf, payload.len() as u64);
                buf.extend_from_slice(payload.as_bytes());
            }
            None => {
                put_uvarint(&mut buf, 0);
            }
        }
        Ok(buf)
    }
}

/// Reads `[len:varint][bytes]`. Zero length yields no payload.
fn read_payload(data: &[u8], mode: DeSeriMode) -> Result<(Option<Payload>, usize), CodecError> {
    let (len, len_size) = uvarint(data)?;
    if mode.validates() {
        check_canonical_uvarint(len, len_size, "payload length")?;
    }
    if len == 0 {
        return Ok((None, len_size));
    }
    let len = usize::try_from(len).map_err(|_| CodecError::IntegerOverflow {
        context: "payload length",
    })?;
    let data = &data[len_size..];
    check_min_byte_length(len, data.len())?;
    Ok((Some(Payload(data[..len].to_vec())), len_size + len))
}
