use std::fmt;
use std::io;

use enocean_eep::EepError;
use enocean_packet::PacketError;
use enocean_secure::SecureError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn eep_error(context: &str, err: EepError) -> CliError {
    match err {
        EepError::LoadFailed(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        EepError::Json(_) | EepError::InvalidCatalog { .. } | EepError::DuplicateProfile(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(USAGE, format!("{context}: {other}")),
    }
}

pub fn packet_error(context: &str, err: PacketError) -> CliError {
    match err {
        PacketError::Eep(err) => eep_error(context, err),
        PacketError::Frame(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        PacketError::ProfileNotFound(_)
        | PacketError::UnsupportedPacketType(_)
        | PacketError::UnsupportedRorg(_) => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn secure_error(context: &str, err: SecureError) -> CliError {
    match err {
        SecureError::Io(source) => io_error(context, source),
        SecureError::NotPaired(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        SecureError::TeachInProtocolViolation(_)
        | SecureError::ReplayOrTamper
        | SecureError::InvalidTelegram(_)
        | SecureError::Unsupported(_)
        | SecureError::UnsupportedStoreVersion(_)
        | SecureError::Json(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}
