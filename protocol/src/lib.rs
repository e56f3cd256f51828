// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Wire — Core Library
//!
//! A binary codec for UTXO ledger transactions: addresses, inputs,
//! outputs, signatures, unlock blocks and the transaction envelopes that
//! hold them. Every object on the wire starts with a varint discriminant
//! naming its variant, arrays are count-prefixed, and fixed-width integers
//! are little-endian.
//!
//! ## Architecture
//!
//! - **codec** — The generic framework: varints, the `Serializable`
//!   contract, type-dispatched object decoding, array rules.
//! - **validation** — Composable per-element validators over decoded
//!   collections.
//! - **address**, **signature**, **unlock_block** — Fixed-shape entities.
//! - **transaction** — Inputs, outputs, unsigned and signed transactions.
//! - **config** — Wire sizes, default bounds and `ProtocolParameters`.
//! - **error** — `CodecError`, the one error type of the crate.
//!
//! ## Decoding Modes
//!
//! Every encode and decode takes a [`DeSeriMode`]. `NoValidation` only
//! checks structure. `PerformValidation` also checks discriminants, array
//! bounds, lexical element order and uniqueness rules.
//!
//! ```rust
//! use ledger_wire::prelude::*;
//!
//! let tx = UnsignedTransactionBuilder::new()
//!     .input(UtxoInput::new([0u8; 32], 0))
//!     .output(SigLockedSingleDeposit::new(Ed25519Address([1u8; 32]).into(), 100))
//!     .build()
//!     .unwrap();
//!
//! let bytes = tx.encode(DeSeriMode::PerformValidation).unwrap();
//! let (decoded, read) =
//!     deserialize_object(&bytes, DeSeriMode::PerformValidation, Transaction::select).unwrap();
//! assert_eq!(read, bytes.len());
//! assert_eq!(decoded, Transaction::Unsigned(tx));
//! ```
//!
//! Nothing here performs I/O, spawns work or keeps state between calls.
//! Signature verification and ledger state checks belong to the caller.

pub mod address;
pub mod codec;
pub mod config;
pub mod error;
pub mod signature;
pub mod transaction;
pub mod unlock_block;
pub mod validation;

pub use codec::{DeSeriMode, Serializable, TypeSelector};
pub use config::ProtocolParameters;
pub use error::CodecError;

/// Everything needed to build, encode and decode transactions.
pub mod prelude {
    pub use crate::address::{Address, Ed25519Address};
    pub use crate::codec::{
        deserialize_array_of_objects, deserialize_object, deserialize_object_exact,
        serialize_array_of_objects, ArrayRules, DeSeriMode, Serializable, TypeSelector,
    };
    pub use crate::config::ProtocolParameters;
    pub use crate::error::CodecError;
    pub use crate::signature::{Ed25519Signature, Signature};
    pub use crate::transaction::{
        Input, Output, Payload, SigLockedSingleDeposit, SignedTransaction, Transaction,
        TransactionId, UnsignedTransaction, UnsignedTransactionBuilder, UtxoInput,
    };
    pub use crate::unlock_block::{ReferenceUnlockBlock, SignatureUnlockBlock, UnlockBlock};
}
