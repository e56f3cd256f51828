//! # Protocol Configuration & Constants
//!
//! Wire sizes, array bounds and the supply ceiling live here. Entity
//! discriminants sit next to the entity types that own them.
//!
//! The total supply is not something this crate derives. It comes in
//! through [`ProtocolParameters`], which defaults to the mainnet values
//! below and can be overridden by whoever embeds the codec.

use ed25519_dalek::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use serde::{Deserialize, Serialize};

use crate::codec::ArrayRules;
use crate::error::CodecError;

// ---------------------------------------------------------------------------
// Field Sizes
// ---------------------------------------------------------------------------

/// A single byte. Every defined discriminant encodes to exactly this.
pub const ONE_BYTE: usize = 1;

/// Size of a little-endian `u16` on the wire.
pub const UINT16_BYTE_SIZE: usize = 2;

/// Size of a little-endian `u64` on the wire.
pub const UINT64_BYTE_SIZE: usize = 8;

/// Length of a transaction ID (BLAKE3 digest).
pub const TRANSACTION_ID_LENGTH: usize = 32;

/// Length of an Ed25519 public key.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = PUBLIC_KEY_LENGTH;

/// Length of an Ed25519 signature.
pub const ED25519_SIGNATURE_LENGTH: usize = SIGNATURE_LENGTH;

// ---------------------------------------------------------------------------
// Supply
// ---------------------------------------------------------------------------

/// Default total supply in the smallest unit. No single output, and no
/// transaction's outputs combined, may exceed it.
pub const TOKEN_SUPPLY: u64 = 2_779_530_283_277_761;

// ---------------------------------------------------------------------------
// Array Bounds
// ---------------------------------------------------------------------------

/// Minimum number of inputs in a transaction.
pub const MIN_INPUTS_COUNT: u64 = 1;

/// Maximum number of inputs in a transaction.
pub const MAX_INPUTS_COUNT: u64 = 126;

/// Minimum number of outputs in a transaction.
pub const MIN_OUTPUTS_COUNT: u64 = 1;

/// Maximum number of outputs in a transaction.
pub const MAX_OUTPUTS_COUNT: u64 = 126;

/// Highest output index an input may reference: the last slot of a
/// transaction holding the maximum number of outputs.
pub const MAX_UTXO_INDEX: u16 = (MAX_OUTPUTS_COUNT - 1) as u16;

/// Rules for the inputs array of an unsigned transaction.
pub const INPUTS_ARRAY_RULES: ArrayRules = ArrayRules {
    name: "inputs",
    min: MIN_INPUTS_COUNT,
    max: MAX_INPUTS_COUNT,
    lexical_order: true,
};

/// Rules for the outputs array of an unsigned transaction.
pub const OUTPUTS_ARRAY_RULES: ArrayRules = ArrayRules {
    name: "outputs",
    min: MIN_OUTPUTS_COUNT,
    max: MAX_OUTPUTS_COUNT,
    lexical_order: true,
};

/// Rules for the unlock blocks of a signed transaction. Order follows the
/// inputs, so no lexical ordering applies.
pub const UNLOCK_BLOCKS_ARRAY_RULES: ArrayRules = ArrayRules {
    name: "unlock blocks",
    min: MIN_INPUTS_COUNT,
    max: MAX_INPUTS_COUNT,
    lexical_order: false,
};

// ---------------------------------------------------------------------------
// ProtocolParameters
// ---------------------------------------------------------------------------

/// Externally supplied limits used by syntactic transaction validation.
///
/// Missing fields fall back to the defaults when deserialized, so a JSON
/// file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParameters {
    /// Upper bound for a single output and for the sum of all outputs.
    pub token_supply: u64,
    /// Minimum inputs per transaction, 0 for none.
    pub min_inputs: u64,
    /// Maximum inputs per transaction, 0 for none.
    pub max_inputs: u64,
    /// Minimum outputs per transaction, 0 for none.
    pub min_outputs: u64,
    /// Maximum outputs per transaction, 0 for none.
    pub max_outputs: u64,
    /// Highest output index an input may reference.
    pub max_utxo_index: u16,
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            token_supply: TOKEN_SUPPLY,
            min_inputs: MIN_INPUTS_COUNT,
            max_inputs: MAX_INPUTS_COUNT,
            min_outputs: MIN_OUTPUTS_COUNT,
            max_outputs: MAX_OUTPUTS_COUNT,
            max_utxo_index: MAX_UTXO_INDEX,
        }
    }
}

impl ProtocolParameters {
    /// Parses parameters from JSON and validates them.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| CodecError::InvalidParameters(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Rejects settings under which no transaction could ever be valid.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.token_supply == 0 {
            return Err(CodecError::InvalidParameters(
                "token supply must be greater than zero".to_string(),
            ));
        }
        if self.max_inputs != 0 && self.min_inputs > self.max_inputs {
            return Err(CodecError::InvalidParameters(format!(
                "min inputs {} exceeds max inputs {}",
                self.min_inputs, self.max_inputs
            )));
        }
        if self.max_outputs != 0 && self.min_outputs > self.max_outputs {
            return Err(CodecError::InvalidParameters(format!(
                "min outputs {} exceeds max outputs {}",
                self.min_outputs, self.max_outputs
            )));
        }
        Ok(())
    }

    /// Count bounds for inputs under these parameters.
    pub fn inputs_rules(&self) -> ArrayRules {
        INPUTS_ARRAY_RULES.with_bounds(self.min_inputs, self.max_inputs)
    }

    /// Count bounds for outputs under these parameters.
    pub fn outputs_rules(&self) -> ArrayRules {
        OUTPUTS_ARRAY_RULES.with_bounds(self.min_outputs, self.max_outputs)
    }

    /// Count bounds for unlock blocks, which follow the inputs.
    pub fn unlock_blocks_rules(&self) -> ArrayRules {
        UNLOCK_BLOCKS_ARRAY_RULES.with_bounds(self.min_inputs, self.max_inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ProtocolParameters::default().validate().is_ok());
    }

    #[test]
    fn utxo_index_fits_max_outputs() {
        // Index is zero-based, so it must stay strictly below the output cap.
        assert!(u64::from(MAX_UTXO_INDEX) < MAX_OUTPUTS_COUNT);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let params = ProtocolParameters::from_json(r#"{ "token_supply": 1000 }"#).unwrap();
        assert_eq!(params.token_supply, 1000);
        assert_eq!(params.max_inputs, MAX_INPUTS_COUNT);
        assert_eq!(params.max_utxo_index, MAX_UTXO_INDEX);
    }

    #[test]
    fn rejects_zero_supply() {
        let err = ProtocolParameters::from_json(r#"{ "token_supply": 0 }"#).unwrap_err();
        assert!(matches!(err, CodecError::InvalidParameters(_)));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let params = ProtocolParameters {
            min_outputs: 10,
            max_outputs: 2,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rules_carry_overrides() {
        let params = ProtocolParameters {
            max_inputs: 4,
            ..Default::default()
        };
        let rules = params.inputs_rules();
        assert_eq!(rules.name, "inputs");
        assert_eq!(rules.max, 4);
        assert!(rules.lexical_order);
    }

    #[test]
    fn crypto_sizes() {
        assert_eq!(ED25519_PUBLIC_KEY_LENGTH, 32);
        assert_eq!(ED25519_SIGNATURE_LENGTH, 64);
        assert_eq!(TRANSACTION_ID_LENGTH, 32);
    }
}
