//! Transaction outputs.
//!
//! ```text
//! SigLockedSingleDeposit: [type:1][Address][amount:8]
//! ```

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::codec::{deserialize_object, read_array, read_type_and_advance, write_type_header};
use crate::codec::{DeSeriMode, Serializable, TypeSelector};
use crate::config::{ONE_BYTE, UINT64_BYTE_SIZE};
use crate::error::{check_min_byte_length, CodecError, TypeFamily};

/// Output depositing funds to a single address, spendable with a signature.
pub const OUTPUT_SIG_LOCKED_SINGLE_DEPOSIT: u64 = 0;

// ---------------------------------------------------------------------------
// SigLockedSingleDeposit
// ---------------------------------------------------------------------------

/// Deposits `amount` to `address`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SigLockedSingleDeposit {
    pub address: Address,
    pub amount: u64,
}

impl SigLockedSingleDeposit {
    pub fn new(address: Address, amount: u64) -> Self {
        Self { address, amount }
    }
}

impl Serializable for SigLockedSingleDeposit {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        let (data, type_len) = read_type_and_advance(
            data,
            OUTPUT_SIG_LOCKED_SINGLE_DEPOSIT,
            TypeFamily::Output,
            mode,
        )?;
        let (address, addr_len) = deserialize_object(data, mode, Address::select)?;
        let data = &data[addr_len..];
        check_min_byte_length(UINT64_BYTE_SIZE, data.len())?;
        let amount = u64::from_le_bytes(read_array(data)?);

        self.address = address;
        self.amount = amount;
        Ok(type_len + addr_len + UINT64_BYTE_SIZE)
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        let addr = self.address.encode(mode)?;
        let mut buf = write_type_header(
            OUTPUT_SIG_LOCKED_SINGLE_DEPOSIT,
            ONE_BYTE + addr.len() + UINT64_BYTE_SIZE,
        );
        buf.extend_from_slice(&addr);
        buf.extend_from_slice(&self.amount.to_le_bytes());
        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Every output variant the wire format knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "output", rename_all = "snake_case")]
pub enum Output {
    SigLockedSingleDeposit(SigLockedSingleDeposit),
}

impl Output {
    /// The address receiving the deposit.
    pub fn address(&self) -> &Address {
        match self {
            Self::SigLockedSingleDeposit(output) => &output.address,
        }
    }

    /// The deposited amount.
    pub fn amount(&self) -> u64 {
        match self {
            Self::SigLockedSingleDeposit(output) => output.amount,
        }
    }
}

impl From<SigLockedSingleDeposit> for Output {
    fn from(output: SigLockedSingleDeposit) -> Self {
        Self::SigLockedSingleDeposit(output)
    }
}

impl Serializable for Output {
    fn decode(&mut self, data: &[u8], mode: DeSeriMode) -> Result<usize, CodecError> {
        match self {
            Self::SigLockedSingleDeposit(output) => output.decode(data, mode),
        }
    }

    fn encode(&self, mode: DeSeriMode) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::SigLockedSingleDeposit(output) => output.encode(mode),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::SigLockedSingleDeposit(_) => "SigLockedSingleDeposit",
        }
    }
}

impl TypeSelector for Output {
    const FAMILY: TypeFamily = TypeFamily::Output;

    fn select(ty: u64) -> Result<Self, CodecError> {
        match ty {
            OUTPUT_SIG_LOCKED_SINGLE_DEPOSIT => {
                Ok(Self::SigLockedSingleDeposit(SigLockedSingleDeposit::default()))
            }
            other => Err(CodecError::UnknownType {
                family: Self::FAMILY,
                discriminant: other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{Ed25519Address, ADDRESS_ED25519, ED25519_ADDRESS_SERIALIZED_BYTES_SIZE};

    fn rand_deposit() -> (SigLockedSingleDeposit, Vec<u8>) {
        let key: [u8; 32] = rand::random();
        let amount = rand::random::<u64>() % 1_000_000 + 1;
        let mut data = vec![OUTPUT_SIG_LOCKED_SINGLE_DEPOSIT as u8, ADDRESS_ED25519 as u8];
        data.extend_from_slice(&key);
        data.extend_from_slice(&amount.to_le_bytes());
        (
            SigLockedSingleDeposit::new(Ed25519Address(key).into(), amount),
            data,
        )
    }

    #[test]
    fn selector_rejects_unknown_type() {
        assert!(matches!(
            Output::select(100),
            Err(CodecError::UnknownType {
                family: TypeFamily::Output,
                discriminant: 100
            })
        ));
    }

    #[test]
    fn deserialize_ok() {
        let (output, data) = rand_deposit();
        let (decoded, read) =
            deserialize_object(&data, DeSeriMode::PerformValidation, Output::select).unwrap();
        assert_eq!(read, ONE_BYTE + ED25519_ADDRESS_SERIALIZED_BYTES_SIZE + UINT64_BYTE_SIZE);
        assert_eq!(decoded, Output::SigLockedSingleDeposit(output));
        assert_eq!(decoded.amount(), output.amount);
    }

    #[test]
    fn serialize_ok() {
        let (output, data) = rand_deposit();
        assert_eq!(output.encode(DeSeriMode::PerformValidation).unwrap(), data);
    }

    #[test]
    fn truncated_amount_fails() {
        let (_, data) = rand_deposit();
        let truncated = &data[..data.len() - 1];
        let err = deserialize_object(truncated, DeSeriMode::PerformValidation, Output::select)
            .unwrap_err();
        assert!(matches!(err.root_cause(), CodecError::InvalidLength { .. }));
    }

    #[test]
    fn nested_address_error_keeps_outer_context() {
        let (_, mut data) = rand_deposit();
        data[1] = 9; // unknown address type
        let err = deserialize_object(&data, DeSeriMode::PerformValidation, Output::select)
            .unwrap_err();
        assert!(matches!(err, CodecError::Entity { entity: "SigLockedSingleDeposit", .. }));
        assert_eq!(
            err.root_cause(),
            &CodecError::UnknownType {
                family: TypeFamily::Address,
                discriminant: 9
            }
        );
    }

    #[test]
    fn amount_is_little_endian() {
        let output = SigLockedSingleDeposit::new(Ed25519Address([0; 32]).into(), 100);
        let bytes = output.encode(DeSeriMode::NoValidation).unwrap();
        assert_eq!(&bytes[bytes.len() - 8..], &[100, 0, 0, 0, 0, 0, 0, 0]);
    }
}
