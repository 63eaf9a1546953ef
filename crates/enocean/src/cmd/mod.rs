use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use enocean_eep::{ProfileKey, ProfileStore};

use crate::exit::{eep_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod profiles;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode ESP3 telegrams given as hex (arguments or one per stdin line).
    Decode(DecodeArgs),
    /// Build a radio telegram from profile values.
    Encode(EncodeArgs),
    /// List the profiles in the catalog.
    Profiles(ProfilesArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct Context {
    pub format: OutputFormat,
    pub catalog: Option<PathBuf>,
}

impl Context {
    /// The external catalog when one was given, the embedded one otherwise.
    pub fn profiles(&self) -> CliResult<ProfileStore> {
        load_profiles(self.catalog.as_deref())
    }
}

fn load_profiles(catalog: Option<&Path>) -> CliResult<ProfileStore> {
    match catalog {
        Some(path) if path.is_dir() => ProfileStore::from_directory(path)
            .map_err(|err| eep_error(&format!("failed to load catalog {}", path.display()), err)),
        Some(path) => ProfileStore::from_file(path)
            .map_err(|err| eep_error(&format!("failed to load catalog {}", path.display()), err)),
        None => ProfileStore::embedded()
            .map_err(|err| eep_error("embedded catalog is invalid", err)),
    }
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, ctx),
        Command::Encode(args) => encode::run(args, ctx),
        Command::Profiles(args) => profiles::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex telegrams (spaces and colons allowed). Reads stdin when omitted.
    pub telegrams: Vec<String>,
    /// Decode radio telegrams with this profile (e.g. A5-02-05).
    #[arg(long, value_name = "RORG-FUNC-TYPE")]
    pub eep: Option<ProfileKey>,
    /// Profile direction for bidirectional profiles.
    #[arg(long)]
    pub direction: Option<u8>,
    /// Profile command for multi-command profiles; read from the payload otherwise.
    #[arg(long)]
    pub command: Option<u8>,
    /// Secure device store used to decrypt secure telegrams.
    #[arg(long, value_name = "PATH", env = "ENOCEAN_SECURE_STORE")]
    pub secure_store: Option<PathBuf>,
    /// Accept secure teach-in telegrams into the store.
    #[arg(long)]
    pub allow_teach_in: bool,
    /// Weakest signal accepted for secure teach-in.
    #[arg(long, default_value = "-56", allow_hyphen_values = true)]
    pub teach_in_min_dbm: i16,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Profile to encode (e.g. A5-02-05).
    #[arg(long, value_name = "RORG-FUNC-TYPE")]
    pub eep: ProfileKey,
    /// Field values as SHORTCUT=VALUE; values are integers, floats or labels.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub values: Vec<String>,
    /// Sender address (AA:BB:CC:DD). Defaults to a placeholder.
    #[arg(long)]
    pub sender: Option<String>,
    /// Destination address (AA:BB:CC:DD). Defaults to broadcast.
    #[arg(long)]
    pub destination: Option<String>,
    /// Build a teach-in telegram instead of a data telegram.
    #[arg(long)]
    pub learn: bool,
    /// Profile direction for bidirectional profiles.
    #[arg(long)]
    pub direction: Option<u8>,
    /// Profile command for multi-command profiles.
    #[arg(long)]
    pub command: Option<u8>,
}

#[derive(Args, Debug, Default)]
pub struct ProfilesArgs {
    /// Only list profiles with this RORG (hex, e.g. A5).
    #[arg(long, value_parser = parse_hex_byte)]
    pub rorg: Option<u8>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_hex_byte(text: &str) -> Result<u8, String> {
    enocean_eep::catalog::parse_byte(text).ok_or_else(|| format!("invalid hex byte {text:?}"))
}
