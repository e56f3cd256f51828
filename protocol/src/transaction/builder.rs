//! Unsigned transaction construction via the builder pattern.
//!
//! Decoding under validation insists that inputs and outputs appear in
//! ascending order of their encodings. The [`UnsignedTransactionBuilder`]
//! takes them in any order and sorts them at `.build()`, so a built
//! transaction always encodes to bytes that decode again.
//!
//! The builder does not validate. Call
//! [`UnsignedTransaction::syntactically_valid`] on the result for that.

use tracing::trace;

use super::input::Input;
use super::output::Output;
use super::unsigned::{Payload, UnsignedTransaction};
use crate::codec::sort_by_serialized_bytes;
use crate::error::CodecError;

/// Fluent builder for [`UnsignedTransaction`].
///
/// ```rust
/// use ledger_wire::address::Ed25519Address;
/// use ledger_wire::transaction::{SigLockedSingleDeposit, UnsignedTransactionBuilder, UtxoInput};
///
/// let tx = UnsignedTransactionBuilder::new()
///     .input(UtxoInput::new([2u8; 32], 0))
///     .input(UtxoInput::new([1u8; 32], 4))
///     .output(SigLockedSingleDeposit::new(Ed25519Address([7u8; 32]).into(), 1_000))
///     .build()
///     .unwrap();
///
/// assert_eq!(tx.inputs.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct UnsignedTransactionBuilder {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    payload: Option<Payload>,
}

impl UnsignedTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an input.
    pub fn input(mut self, input: impl Into<Input>) -> Self {
        self.inputs.push(input.into());
        self
    }

    /// Adds an output.
    pub fn output(mut self, output: impl Into<Output>) -> Self {
        self.outputs.push(output.into());
        self
    }

    /// Attaches a payload. An empty vector clears it.
    pub fn payload(mut self, data: Vec<u8>) -> Self {
        self.payload = (!data.is_empty()).then_some(Payload(data));
        self
    }

    /// Consumes the builder and produces the transaction with inputs and
    /// outputs in wire order.
    pub fn build(self) -> Result<UnsignedTransaction, CodecError> {
        let inputs = sort_by_serialized_bytes(self.inputs)?;
        let outputs = sort_by_serialized_bytes(self.outputs)?;
        trace!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            "built unsigned transaction"
        );
        Ok(UnsignedTransaction {
            inputs,
            outputs,
            payload: self.payload,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
