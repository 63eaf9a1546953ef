/// Errors that can occur during telegram encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The header checksum does not match the length/type bytes.
    #[error("header CRC mismatch (computed 0x{computed:02X}, received 0x{received:02X})")]
    HeaderCrc { computed: u8, received: u8 },

    /// The data checksum does not match the data and optional bytes.
    #[error("data CRC mismatch (computed 0x{computed:02X}, received 0x{received:02X})")]
    DataCrc { computed: u8, received: u8 },

    /// The header announces a telegram longer than the configured maximum.
    #[error("telegram too large ({size} bytes, max {max})")]
    TelegramTooLarge { size: usize, max: usize },

    /// The data section does not fit the 16-bit length field.
    #[error("data section too large ({size} bytes, max 65535)")]
    DataTooLarge { size: usize },

    /// The optional section does not fit the 8-bit length field.
    #[error("optional section too large ({size} bytes, max 255)")]
    OptionalTooLarge { size: usize },

    /// The ESP2 checksum does not match the header and data bytes.
    #[error("ESP2 checksum mismatch (computed 0x{computed:02X}, received 0x{received:02X})")]
    Esp2Checksum { computed: u8, received: u8 },

    /// ESP2 data sections hold 1 to 30 bytes.
    #[error("ESP2 data section of {size} bytes (expected 1..=30)")]
    Esp2Length { size: usize },

    /// The packet type does not fit the 3-bit ESP2 sequence field.
    #[error("packet type 0x{0:02X} does not fit an ESP2 header")]
    Esp2PacketType(u8),

    /// ESP2 telegrams have no optional section.
    #[error("ESP2 telegrams cannot carry {size} optional bytes")]
    Esp2Optional { size: usize },

    /// An I/O error occurred while reading or writing telegrams.
    #[error("telegram I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete telegram was received.
    #[error("connection closed (incomplete telegram)")]
    ConnectionClosed,
}

impl FrameError {
    /// True for errors that only invalidate one telegram; the stream stays usable.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            FrameError::HeaderCrc { .. }
                | FrameError::DataCrc { .. }
                | FrameError::TelegramTooLarge { .. }
                | FrameError::Esp2Checksum { .. }
                | FrameError::Esp2Length { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
