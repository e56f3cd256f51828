//! Composable validators over decoded collections.
//!
//! A validator is a closure called once per element with the element's
//! index. It may keep state across calls (a set of seen keys, a running
//! sum), which is why validators are built fresh by a constructor function
//! for every run. [`validate`] runs a list of them in the order given and
//! stops at the first failure.
//!
//! ```rust
//! use ledger_wire::validation::{validate, inputs_utxo_refs_unique_validator};
//! use ledger_wire::transaction::{Input, UtxoInput};
//!
//! let inputs = vec![
//!     Input::from(UtxoInput::new([1u8; 32], 0)),
//!     Input::from(UtxoInput::new([1u8; 32], 1)),
//! ];
//! assert!(validate(&inputs, vec![inputs_utxo_refs_unique_validator()]).is_ok());
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::codec::{DeSeriMode, Serializable};
use crate::error::CodecError;
use crate::transaction::{Input, Output, UTXO_REF_KEY_LENGTH};
use crate::unlock_block::UnlockBlock;

/// A stateful per-element check over a collection of `T`.
pub type ValidatorFn<'a, T> = Box<dyn FnMut(usize, &T) -> Result<(), CodecError> + 'a>;

/// Runs every validator against every element, element by element, in the
/// order the validators are given. Returns the first failure.
pub fn validate<T>(
    items: &[T],
    mut validators: Vec<ValidatorFn<'_, T>>,
) -> Result<(), CodecError> {
    for (index, item) in items.iter().enumerate() {
        for validator in validators.iter_mut() {
            if let Err(err) = validator(index, item) {
                debug!(index, error = %err, "collection validation failed");
                return Err(err);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Fails with [`CodecError::DuplicateReference`] if two inputs reference
/// the same (transaction ID, output index) pair.
pub fn inputs_utxo_refs_unique_validator() -> ValidatorFn<'static, Input> {
    let mut seen: HashMap<[u8; UTXO_REF_KEY_LENGTH], usize> = HashMap::new();
    Box::new(move |index, input| match input {
        Input::Utxo(utxo) => {
            if let Some(&duplicate_of) = seen.get(&utxo.ref_key()) {
                return Err(CodecError::DuplicateReference {
                    index,
                    duplicate_of,
                });
            }
            seen.insert(utxo.ref_key(), index);
            Ok(())
        }
    })
}

/// Fails with [`CodecError::InvalidReference`] if an input points past
/// `max_index`. The bound is a policy input, this crate does not know how
/// many outputs the referenced transaction actually has.
pub fn inputs_utxo_ref_index_bounds_validator(max_index: u16) -> ValidatorFn<'static, Input> {
    Box::new(move |index, input| match input {
        Input::Utxo(utxo) if utxo.transaction_output_index > max_index => {
            Err(CodecError::InvalidReference {
                index,
                output_index: utxo.transaction_output_index,
                max: max_index,
            })
        }
        Input::Utxo(_) => Ok(()),
    })
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Fails with [`CodecError::DuplicateDeposit`] if two outputs deposit to
/// the same address. Addresses are compared by their serialized bytes.
pub fn outputs_addr_unique_validator() -> ValidatorFn<'static, Output> {
    let mut seen: HashMap<Vec<u8>, usize> = HashMap::new();
    Box::new(move |index, output| {
        let key = output.address().encode(DeSeriMode::NoValidation)?;
        if let Some(&duplicate_of) = seen.get(&key) {
            return Err(CodecError::DuplicateDeposit {
                index,
                duplicate_of,
            });
        }
        seen.insert(key, index);
        Ok(())
    })
}

/// Fails with [`CodecError::InvalidDepositAmount`] for a zero deposit and
/// with [`CodecError::SupplyExceeded`] for a deposit above `token_supply`.
pub fn outputs_deposit_amount_validator(token_supply: u64) -> ValidatorFn<'static, Output> {
    Box::new(move |index, output| {
        let amount = output.amount();
        if amount == 0 {
            return Err(CodecError::InvalidDepositAmount { index, amount });
        }
        if amount > token_supply {
            return Err(CodecError::SupplyExceeded {
                index,
                amount,
                supply: token_supply,
            });
        }
        Ok(())
    })
}

/// Fails with [`CodecError::SupplySumExceeded`] once the running total of
/// deposits passes `token_supply`, and with [`CodecError::IntegerOverflow`]
/// if the total no longer fits into a `u64`.
pub fn outputs_sum_validator(token_supply: u64) -> ValidatorFn<'static, Output> {
    let mut total: u64 = 0;
    Box::new(move |_, output| {
        total = total
            .checked_add(output.amount())
            .ok_or(CodecError::IntegerOverflow {
                context: "accumulating output deposits",
            })?;
        if total > token_supply {
            return Err(CodecError::SupplySumExceeded {
                total,
                supply: token_supply,
            });
        }
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Unlock blocks
// ---------------------------------------------------------------------------

/// Fails with [`CodecError::InvalidUnlockReference`] unless every reference
/// unlock block points at an earlier signature unlock block.
pub fn unlock_block_refs_validator() -> ValidatorFn<'static, UnlockBlock> {
    let mut is_signature: Vec<bool> = Vec::new();
    Box::new(move |index, block| {
        match block {
            UnlockBlock::Signature(_) => {}
            UnlockBlock::Reference(reference) => {
                let target = usize::from(reference.reference);
                if target >= index || !is_signature.get(target).copied().unwrap_or(false) {
                    return Err(CodecError::InvalidUnlockReference {
                        index,
                        reference: reference.reference,
                    });
                }
            }
        }
        is_signature.push(matches!(block, UnlockBlock::Signature(_)));
        Ok(())
    })
}

/// Fails with [`CodecError::DuplicateSignature`] if two signature unlock
/// blocks carry byte-identical signatures. Shared signatures go through
/// reference unlock blocks instead.
pub fn unlock_block_signatures_unique_validator() -> ValidatorFn<'static, UnlockBlock> {
    let mut seen: HashMap<Vec<u8>, usize> = HashMap::new();
    Box::new(move |index, block| {
        let UnlockBlock::Signature(sig_block) = block else {
            return Ok(());
        };
        let key = sig_block.signature.encode(DeSeriMode::NoValidation)?;
        if let Some(&duplicate_of) = seen.get(&key) {
            return Err(CodecError::DuplicateSignature {
                index,
                duplicate_of,
            });
        }
        seen.insert(key, index);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Ed25519Address;
    use crate::signature::Ed25519Signature;
    use crate::transaction::{SigLockedSingleDeposit, UtxoInput};
    use crate::unlock_block::{ReferenceUnlockBlock, SignatureUnlockBlock};

    fn input(tx: u8, index: u16) -> Input {
        UtxoInput::new([tx; 32], index).into()
    }

    fn output(addr: u8, amount: u64) -> Output {
        SigLockedSingleDeposit::new(Ed25519Address([addr; 32]).into(), amount).into()
    }

    fn sig_block(byte: u8) -> UnlockBlock {
        SignatureUnlockBlock::new(Ed25519Signature::new([byte; 32], [byte; 64])).into()
    }

    #[test]
    fn unique_refs_pass() {
        let inputs = vec![input(1, 0), input(1, 1), input(2, 0)];
        assert!(validate(&inputs, vec![inputs_utxo_refs_unique_validator()]).is_ok());
    }

    #[test]
    fn duplicate_ref_detected() {
        let inputs = vec![input(1, 0), input(2, 0), input(1, 0)];
        assert_eq!(
            validate(&inputs, vec![inputs_utxo_refs_unique_validator()]),
            Err(CodecError::DuplicateReference {
                index: 2,
                duplicate_of: 0
            })
        );
    }

    #[test]
    fn index_bounds() {
        let inputs = vec![input(1, 0), input(1, 9)];
        assert!(validate(&inputs, vec![inputs_utxo_ref_index_bounds_validator(9)]).is_ok());
        assert_eq!(
            validate(&inputs, vec![inputs_utxo_ref_index_bounds_validator(8)]),
            Err(CodecError::InvalidReference {
                index: 1,
                output_index: 9,
                max: 8
            })
        );
    }

    #[test]
    fn duplicate_deposit_detected() {
        let outputs = vec![output(1, 10), output(2, 10), output(1, 20)];
        assert_eq!(
            validate(&outputs, vec![outputs_addr_unique_validator()]),
            Err(CodecError::DuplicateDeposit {
                index: 2,
                duplicate_of: 0
            })
        );
    }

    #[test]
    fn zero_deposit_rejected() {
        let outputs = vec![output(1, 10), output(2, 0)];
        assert_eq!(
            validate(&outputs, vec![outputs_deposit_amount_validator(100)]),
            Err(CodecError::InvalidDepositAmount {
                index: 1,
                amount: 0
            })
        );
    }

    #[test]
    fn single_deposit_over_supply_rejected() {
        let outputs = vec![output(1, 101)];
        assert!(matches!(
            validate(&outputs, vec![outputs_deposit_amount_validator(100)]),
            Err(CodecError::SupplyExceeded { index: 0, amount: 101, supply: 100 })
        ));
    }

    #[test]
    fn sum_over_supply_rejected() {
        let outputs = vec![output(1, 60), output(2, 40), output(3, 1)];
        assert_eq!(
            validate(&outputs, vec![outputs_sum_validator(100)]),
            Err(CodecError::SupplySumExceeded {
                total: 101,
                supply: 100
            })
        );
        // Exactly the supply is fine.
        assert!(validate(&outputs[..2], vec![outputs_sum_validator(100)]).is_ok());
    }

    #[test]
    fn sum_overflow_detected_before_comparison() {
        let outputs = vec![output(1, u64::MAX), output(2, 1)];
        assert!(matches!(
            validate(&outputs, vec![outputs_sum_validator(u64::MAX)]),
            Err(CodecError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn validators_short_circuit_in_declared_order() {
        // Output 0 violates both rules; whichever comes first wins.
        let outputs = vec![output(1, 0)];
        let amount_first = validate(
            &outputs,
            vec![outputs_deposit_amount_validator(100), outputs_sum_validator(0)],
        );
        assert!(matches!(amount_first, Err(CodecError::InvalidDepositAmount { .. })));

        let outputs = vec![output(1, 5)];
        let sum_first = validate(
            &outputs,
            vec![outputs_sum_validator(1), outputs_deposit_amount_validator(2)],
        );
        assert!(matches!(sum_first, Err(CodecError::SupplySumExceeded { .. })));
    }

    #[test]
    fn reference_must_point_back_at_signature() {
        let ok = vec![sig_block(1), ReferenceUnlockBlock::new(0).into(), sig_block(2)];
        assert!(validate(&ok, vec![unlock_block_refs_validator()]).is_ok());

        let forward = vec![ReferenceUnlockBlock::new(1).into(), sig_block(1)];
        assert_eq!(
            validate(&forward, vec![unlock_block_refs_validator()]),
            Err(CodecError::InvalidUnlockReference {
                index: 0,
                reference: 1
            })
        );

        let chained = vec![
            sig_block(1),
            ReferenceUnlockBlock::new(0).into(),
            ReferenceUnlockBlock::new(1).into(),
        ];
        assert!(matches!(
            validate(&chained, vec![unlock_block_refs_validator()]),
            Err(CodecError::InvalidUnlockReference { index: 2, .. })
        ));
    }

    #[test]
    fn duplicate_signatures_rejected() {
        let blocks = vec![sig_block(3), sig_block(3)];
        assert_eq!(
            validate(&blocks, vec![unlock_block_signatures_unique_validator()]),
            Err(CodecError::DuplicateSignature {
                index: 1,
                duplicate_of: 0
            })
        );
    }
}
