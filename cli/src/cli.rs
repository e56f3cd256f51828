//! # CLI Interface
//!
//! Defines the command-line argument structure for `ledger-wire` using
//! `clap` derive. Subcommands: `decode`, `encode`, `tx-id`, `check` and
//! `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Inspect ledger wire encodings.
///
/// Decodes hex into JSON, encodes JSON back into hex, computes signed
/// transaction IDs and runs syntactic transaction checks.
#[derive(Parser, Debug)]
#[command(
    name = "ledger-wire",
    about = "Inspect ledger wire encodings",
    version,
    propagate_version = true
)]
pub struct LedgerWireCli {
    /// Default log level when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "LEDGER_WIRE_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a hex-encoded object and print it as JSON.
    Decode(DecodeArgs),
    /// Encode a JSON object and print its hex encoding.
    Encode(EncodeArgs),
    /// Print the ID of a hex-encoded signed transaction.
    TxId(TxIdArgs),
    /// Decode a transaction and run the syntactic validity checks.
    Check(CheckArgs),
    /// Print version information and exit.
    Version,
}

/// Entity family selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Address,
    Input,
    Output,
    Signature,
    UnlockBlock,
    Transaction,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Entity family the bytes belong to.
    #[arg(value_enum)]
    pub kind: Kind,

    /// Hex-encoded bytes, optionally prefixed with `0x`.
    pub hex: String,

    /// Only decode structure; skip discriminant, order and uniqueness checks.
    #[arg(long)]
    pub no_validate: bool,

    /// JSON file with protocol parameters. Defaults apply when omitted.
    #[arg(long, env = "LEDGER_WIRE_PARAMS")]
    pub params: Option<PathBuf>,
}

/// Arguments for the `encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Entity family of the JSON document.
    #[arg(value_enum)]
    pub kind: Kind,

    /// Path to the JSON document, or `-` for stdin.
    pub input: String,

    /// Encode without running pre-encode validation.
    #[arg(long)]
    pub no_validate: bool,
}

/// Arguments for the `tx-id` subcommand.
#[derive(Args, Debug)]
pub struct TxIdArgs {
    /// Hex-encoded signed transaction.
    pub hex: String,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Hex-encoded unsigned or signed transaction.
    pub hex: String,

    /// JSON file with protocol parameters. Defaults apply when omitted.
    #[arg(long, env = "LEDGER_WIRE_PARAMS")]
    pub params: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        LedgerWireCli::command().debug_assert();
    }

    #[test]
    fn parses_decode_with_flags() {
        let cli = LedgerWireCli::try_parse_from([
            "ledger-wire",
            "decode",
            "unlock-block",
            "0x010200",
            "--no-validate",
        ])
        .unwrap();
        match cli.command {
            Commands::Decode(args) => {
                assert_eq!(args.kind, Kind::UnlockBlock);
                assert_eq!(args.hex, "0x010200");
                assert!(args.no_validate);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_log_flags_after_subcommand() {
        let cli = LedgerWireCli::try_parse_from([
            "ledger-wire",
            "tx-id",
            "00",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level, "debug");
    }
}
