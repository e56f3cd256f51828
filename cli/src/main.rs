// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Wire Inspector
//!
//! Entry point for the `ledger-wire` binary. Parses CLI arguments,
//! initializes logging and runs one of:
//!
//! - `decode`  — hex to JSON for any entity family
//! - `encode`  — JSON to hex for any entity family
//! - `tx-id`   — ID of a signed transaction
//! - `check`   — decode a transaction and run syntactic validation
//! - `version` — print build version information

mod cli;
mod logging;

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Serialize;

use ledger_wire::address::Address;
use ledger_wire::codec::deserialize_object_exact;
use ledger_wire::error::CodecError;
use ledger_wire::signature::Signature;
use ledger_wire::transaction::{Input, Output, Transaction};
use ledger_wire::unlock_block::UnlockBlock;
use ledger_wire::{DeSeriMode, ProtocolParameters, Serializable, TypeSelector};

use cli::{Commands, Kind, LedgerWireCli};

fn main() -> Result<()> {
    let cli = LedgerWireCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match cli.command {
        Commands::Decode(args) => {
            let params = load_params(args.params.as_deref())?;
            let bytes = parse_hex(&args.hex)?;
            let mode = mode_for(args.no_validate);
            let (value, consumed) = decode(args.kind, &bytes, mode, &params)?;
            let out = serde_json::json!({ "bytes": consumed, "value": value });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Commands::Encode(args) => {
            let json = read_source(&args.input)?;
            let bytes = encode(args.kind, &json, mode_for(args.no_validate))?;
            println!("{}", hex::encode(bytes));
            Ok(())
        }
        Commands::TxId(args) => {
            let bytes = parse_hex(&args.hex)?;
            println!("{}", hex::encode(transaction_id(&bytes)?));
            Ok(())
        }
        Commands::Check(args) => {
            let params = load_params(args.params.as_deref())?;
            let bytes = parse_hex(&args.hex)?;
            let summary = check(&bytes, &params)?;
            println!("{}", summary);
            Ok(())
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn mode_for(no_validate: bool) -> DeSeriMode {
    if no_validate {
        DeSeriMode::NoValidation
    } else {
        DeSeriMode::PerformValidation
    }
}

/// Reads protocol parameters from a JSON file, or returns the defaults.
fn load_params(path: Option<&Path>) -> Result<ProtocolParameters> {
    let Some(path) = path else {
        return Ok(ProtocolParameters::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parameters from {}", path.display()))?;
    let params = ProtocolParameters::from_json(&json)
        .with_context(|| format!("invalid parameters in {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        token_supply = params.token_supply,
        "loaded protocol parameters"
    );
    Ok(params)
}

/// Accepts hex with an optional `0x` prefix and embedded whitespace.
fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.split_whitespace().collect();
    let cleaned = cleaned.strip_prefix("0x").unwrap_or(&cleaned);
    hex::decode(cleaned).context("input is not valid hex")
}

/// Reads a file, or stdin for `-`.
fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(source).with_context(|| format!("failed to read {}", source))
}

/// Decodes `bytes` as a `kind` that must span the whole buffer.
fn decode(
    kind: Kind,
    bytes: &[u8],
    mode: DeSeriMode,
    params: &ProtocolParameters,
) -> Result<(serde_json::Value, usize)> {
    let value = match kind {
        Kind::Address => decode_exact::<Address>(bytes, mode)?,
        Kind::Input => decode_exact::<Input>(bytes, mode)?,
        Kind::Output => decode_exact::<Output>(bytes, mode)?,
        Kind::Signature => decode_exact::<Signature>(bytes, mode)?,
        Kind::UnlockBlock => decode_exact::<UnlockBlock>(bytes, mode)?,
        Kind::Transaction => serde_json::to_value(decode_transaction(bytes, mode, params)?)?,
    };
    tracing::debug!(?kind, bytes = bytes.len(), "decoded");
    Ok((value, bytes.len()))
}

fn decode_exact<T: TypeSelector + Serialize>(
    bytes: &[u8],
    mode: DeSeriMode,
) -> Result<serde_json::Value> {
    let value = deserialize_object_exact(bytes, mode, T::select)?;
    Ok(serde_json::to_value(value)?)
}

fn decode_transaction(
    bytes: &[u8],
    mode: DeSeriMode,
    params: &ProtocolParameters,
) -> Result<Transaction> {
    let (tx, consumed) = Transaction::decode_with_params(bytes, mode, params)?;
    if consumed != bytes.len() {
        return Err(CodecError::TrailingBytes {
            consumed,
            trailing: bytes.len() - consumed,
        }
        .into());
    }
    Ok(tx)
}

/// Encodes a JSON document describing a `kind`.
fn encode(kind: Kind, json: &str, mode: DeSeriMode) -> Result<Vec<u8>> {
    match kind {
        Kind::Address => encode_json::<Address>(json, mode),
        Kind::Input => encode_json::<Input>(json, mode),
        Kind::Output => encode_json::<Output>(json, mode),
        Kind::Signature => encode_json::<Signature>(json, mode),
        Kind::UnlockBlock => encode_json::<UnlockBlock>(json, mode),
        Kind::Transaction => encode_json::<Transaction>(json, mode),
    }
}

fn encode_json<T: DeserializeOwned + Serializable>(
    json: &str,
    mode: DeSeriMode,
) -> Result<Vec<u8>> {
    let value: T = serde_json::from_str(json).context("JSON does not describe this kind")?;
    Ok(value.encode(mode)?)
}

fn transaction_id(bytes: &[u8]) -> Result<[u8; 32]> {
    let params = ProtocolParameters::default();
    let tx = decode_transaction(bytes, DeSeriMode::PerformValidation, &params)?;
    match tx {
        Transaction::Signed(signed) => Ok(signed.id()?),
        Transaction::Unsigned(_) => bail!("only signed transactions have an ID"),
    }
}

/// Decodes a transaction, runs the syntactic checks and summarizes it.
fn check(bytes: &[u8], params: &ProtocolParameters) -> Result<String> {
    let tx = decode_transaction(bytes, DeSeriMode::PerformValidation, params)?;
    tx.syntactically_valid(params)
        .context("transaction is not syntactically valid")?;

    let unsigned = tx.unsigned();
    let total = unsigned.total_deposit()?;
    tracing::info!(
        inputs = unsigned.inputs.len(),
        outputs = unsigned.outputs.len(),
        total,
        "transaction passed syntactic checks"
    );
    Ok(format!(
        "ok: {} with {} inputs, {} outputs, {} deposited",
        tx.type_name(),
        unsigned.inputs.len(),
        unsigned.outputs.len(),
        total
    ))
}

/// Prints version information to stdout.
fn print_version() {
    println!("ledger-wire {}", env!("CARGO_PKG_VERSION"));
    println!("rustc       {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use ledger_wire::address::Ed25519Address;
    use ledger_wire::signature::Ed25519Signature;
    use ledger_wire::transaction::{
        SigLockedSingleDeposit, SignedTransaction, UnsignedTransactionBuilder, UtxoInput,
    };
    use ledger_wire::unlock_block::SignatureUnlockBlock;

    fn signed_hex() -> String {
        let tx = UnsignedTransactionBuilder::new()
            .input(UtxoInput::new([3; 32], 1))
            .output(SigLockedSingleDeposit::new(Ed25519Address([4; 32]).into(), 77))
            .build()
            .unwrap();
        let block = SignatureUnlockBlock::new(Ed25519Signature::new([5; 32], [6; 64]));
        let signed = SignedTransaction::new(tx, vec![block.into()]);
        hex::encode(
            Transaction::from(signed)
                .encode(DeSeriMode::PerformValidation)
                .unwrap(),
        )
    }

    #[test]
    fn parse_hex_accepts_prefix_and_spaces() {
        assert_eq!(parse_hex("0x01 02\n03").unwrap(), vec![1, 2, 3]);
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn decode_then_encode_is_identity() {
        let bytes = parse_hex(&signed_hex()).unwrap();
        let params = ProtocolParameters::default();
        let (value, consumed) =
            decode(Kind::Transaction, &bytes, DeSeriMode::PerformValidation, &params).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(value["type"], "signed");

        let json = serde_json::to_string(&value).unwrap();
        let encoded = encode(Kind::Transaction, &json, DeSeriMode::PerformValidation).unwrap();
        assert_eq!(encoded, bytes);
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut bytes = parse_hex(&signed_hex()).unwrap();
        bytes.push(0);
        let err = decode(
            Kind::Transaction,
            &bytes,
            DeSeriMode::PerformValidation,
            &ProtocolParameters::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::TrailingBytes { trailing: 1, .. })
        ));
    }

    #[test]
    fn address_kind_roundtrip() {
        let json = format!(
            r#"{{ "type": "ed25519", "address": "0x{}" }}"#,
            hex::encode([1u8; 32])
        );
        let bytes = encode(Kind::Address, &json, DeSeriMode::PerformValidation).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 1);
        let (value, _) = decode(
            Kind::Address,
            &bytes,
            DeSeriMode::PerformValidation,
            &ProtocolParameters::default(),
        )
        .unwrap();
        assert_eq!(value["address"], "01".repeat(32));
    }

    #[test]
    fn tx_id_only_for_signed() {
        let bytes = parse_hex(&signed_hex()).unwrap();
        let id = transaction_id(&bytes).unwrap();
        assert_eq!(id, transaction_id(&bytes).unwrap());

        // The inner unsigned transaction starts right after the signed discriminant.
        let unsigned = Transaction::decode_with_params(
            &bytes,
            DeSeriMode::PerformValidation,
            &ProtocolParameters::default(),
        )
        .unwrap()
        .0
        .unsigned()
        .encode(DeSeriMode::PerformValidation)
        .unwrap();
        assert!(transaction_id(&unsigned).is_err());
    }

    #[test]
    fn check_uses_params_file() {
        let bytes = parse_hex(&signed_hex()).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "token_supply": 50 }}"#).unwrap();
        let params = load_params(Some(file.path())).unwrap();
        assert_eq!(params.token_supply, 50);

        let err = check(&bytes, &params).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CodecError>(),
            Some(CodecError::SupplyExceeded { amount: 77, supply: 50, .. })
        ));

        let summary = check(&bytes, &ProtocolParameters::default()).unwrap();
        assert!(summary.starts_with("ok: SignedTransaction"));
    }

    #[test]
    fn missing_params_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_params(Some(&dir.path().join("absent.json"))).is_err());
        assert_eq!(load_params(None).unwrap(), ProtocolParameters::default());
    }
}
