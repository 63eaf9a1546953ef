//! EnOcean protocol stack: ESP3 framing, equipment profiles, packets and
//! secure telegrams.
//!
//! # Crate Structure
//!
//! - [`frame`]: ESP3 and ESP2 telegram framing with a blocking reader/writer
//! - [`eep`]: EEP catalog and field codec (behind `eep` feature)
//! - [`packet`]: Packet model, EEP bridge and telegram creation (behind `packet` feature)
//! - [`secure`]: Secure teach-in, CMAC/VAES decryption and PTM translation
//!   (behind `secure` feature)

/// Re-export frame types.
pub mod frame {
    pub use enocean_frame::*;
}

/// Re-export profile catalog types (requires `eep` feature).
#[cfg(feature = "eep")]
pub mod eep {
    pub use enocean_eep::*;
}

/// Re-export packet types (requires `packet` feature).
#[cfg(feature = "packet")]
pub mod packet {
    pub use enocean_packet::*;
}

/// Re-export secure telegram types (requires `secure` feature).
#[cfg(feature = "secure")]
pub mod secure {
    pub use enocean_secure::*;
}
