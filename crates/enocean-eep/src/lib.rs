//! EnOcean Equipment Profiles: catalog loading and bit-field codec.
//!
//! A [`ProfileStore`] is built once from a JSON catalog (the embedded one via
//! [`ProfileStore::embedded`], or a file) and indexes profiles by
//! RORG/FUNC/TYPE. Each profile holds one or more field sets, partitioned by
//! direction or command. [`decode_field`] and [`encode_field`] convert between
//! raw payload bits and scaled, symbolic or flag values.
//!
//! # Example
//!
//! ```
//! use enocean_eep::{decode_field, ProfileStore};
//!
//! let store = ProfileStore::embedded().unwrap();
//! let profile = store.find(0xA5, 0x02, 0x05).unwrap();
//! let fields = profile.select(None, None, &[]).unwrap();
//! let tmp = decode_field(fields.field("TMP").unwrap(), &[0x00, 0x00, 0x55, 0x08], 0).unwrap();
//! assert_eq!(tmp.raw_value, 85);
//! ```

pub mod bits;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod profile;
pub mod store;

pub use catalog::{
    Bounds, CommandSelector, DataSet, EnumField, EnumItem, Field, ProfileKey, RangeItem,
    StatusField, ValueField,
};
pub use codec::{decode_field, encode_field, DecodedField, EepValue, FieldValue};
pub use config::CatalogConfig;
pub use error::{EepError, Result};
pub use profile::Profile;
pub use store::ProfileStore;
