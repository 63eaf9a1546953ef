/// Errors raised by secure teach-in, decryption and the device store.
#[derive(Debug, thiserror::Error)]
pub enum SecureError {
    /// The teach-in telegrams are mismatched, out of order or of the wrong kind.
    #[error("secure teach-in rejected: {0}")]
    TeachInProtocolViolation(String),

    /// No paired device for this sender.
    #[error("device {0} not paired")]
    NotPaired(String),

    /// No rolling code in the window produced a matching CMAC.
    #[error("secure telegram failed verification (replayed or tampered)")]
    ReplayOrTamper,

    /// The packet's RORG does not allow the requested operation.
    #[error("expected RORG 0x{expected:02X}, got 0x{found:02X}")]
    UnexpectedRorg { expected: u8, found: u8 },

    /// The packet is a VLD telegram but not the expected profile.
    #[error("expected profile {expected}, got {found}")]
    UnexpectedProfile { expected: String, found: String },

    /// The device announced algorithms this engine cannot process.
    #[error("unsupported security parameters: {0}")]
    Unsupported(String),

    /// The telegram is too short for the device's MAC and rolling-code layout.
    #[error("invalid secure telegram: {0}")]
    InvalidTelegram(String),

    /// The store file was written by an incompatible version.
    #[error("unsupported secure store version {0}")]
    UnsupportedStoreVersion(u32),

    /// Reading or writing the store file failed.
    #[error("secure store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store file is not valid JSON or has the wrong shape.
    #[error("secure store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SecureError>;
