//! EnOcean packet model on top of ESP3 framing.
//!
//! [`Packet::parse`] turns wire bytes into a classified packet (radio, UTE
//! teach-in, response, event or generic). Radio packets bridge to the EEP
//! catalog through [`Packet::select_eep`], [`Packet::parse_eep`] and
//! [`Packet::set_eep`]; [`Packet::create`] builds new radio telegrams from
//! profile values.
//!
//! # Example
//!
//! ```
//! use enocean_eep::ProfileStore;
//! use enocean_packet::Packet;
//!
//! let store = ProfileStore::embedded().unwrap();
//! let wire = [
//!     0x55, 0x00, 0x07, 0x07, 0x01, 0x7A, 0xD5, 0x09, 0x01, 0x82, 0x5D, 0xAB, 0x00, 0x01,
//!     0xFF, 0xFF, 0xFF, 0xFF, 0x36, 0x00, 0xC7,
//! ];
//! let (_, _, packet) = Packet::parse(&wire);
//! let mut packet = packet.unwrap();
//! assert_eq!(packet.parse_eep(&store, 0x00, 0x01, None, None), vec!["CO"]);
//! assert_eq!(packet.parsed()["CO"].value.as_label(), Some("closed"));
//! ```

pub mod address;
pub mod codes;
pub mod create;
pub mod error;
pub mod packet;
pub mod radio;
pub mod response;
pub mod rorg;
pub mod ute;

pub use address::{address_to_int, format_address, parse_address, BROADCAST, DEFAULT_SENDER};
pub use create::CreateOptions;
pub use enocean_frame::ParseResult;
pub use error::{PacketError, Result};
pub use packet::{Packet, PacketKind, SelectedProfile};
pub use radio::RadioInfo;
pub use response::{Event, Response, VersionIdentifier, VersionInfo};
pub use ute::UteInfo;
