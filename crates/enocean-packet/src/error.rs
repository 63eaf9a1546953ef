use enocean_eep::{EepError, ProfileKey};
use enocean_frame::{FrameError, ParseResult};

/// Errors raised while building or editing packets.
#[derive(Debug, thiserror::Error)]
pub enum PacketError {
    /// Serializing the packet failed (oversized data or optional section).
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A field could not be encoded.
    #[error(transparent)]
    Eep(#[from] EepError),

    /// `set_eep` was called before a profile was selected.
    #[error("no EEP profile selected")]
    NoProfileSelected,

    /// The requested profile (or its direction/command field set) is not in the catalog.
    #[error("EEP profile {0} not found")]
    ProfileNotFound(ProfileKey),

    /// Packets can only be created for radio telegrams.
    #[error("cannot create packets of type 0x{0:02X}")]
    UnsupportedPacketType(u8),

    /// Packets can only be created for RPS, 1BS, 4BS and VLD.
    #[error("cannot create packets for RORG 0x{0:02X}")]
    UnsupportedRorg(u8),

    /// The operation needs a radio telegram carrying sender and status.
    #[error("not a radio packet")]
    NotRadio,

    /// A freshly built ESP2 telegram did not decode again.
    #[error("built ESP2 telegram did not decode ({0:?})")]
    Esp2Roundtrip(ParseResult),

    /// Only UTE teach-in queries can be answered.
    #[error("not a UTE teach-in packet")]
    NotUteTeachIn,
}

pub type Result<T> = std::result::Result<T, PacketError>;
