//! Secure EnOcean telegrams.
//!
//! A secure sender is paired through two RORG SEC_TI telegrams that carry
//! its algorithm parameters, initial rolling code and AES-128 key
//! ([`SecureStore::teach_in`]). Afterwards each RORG SEC telegram is
//! authenticated with a truncated CMAC, tolerating a window of missed
//! rolling codes, and decrypted with the VAES keystream
//! ([`SecureStore::decrypt`]). Decrypted PTM button telegrams translate to
//! their plain RPS form with [`SecureDevice::translate_application`] and
//! [`SecureDevice::translate_profile`].

pub mod config;
pub mod crypto;
pub mod device;
pub mod error;
pub mod store;
pub mod translate;

pub use config::{SecureConfig, TeachInPolicy};
pub use device::{SecureDevice, DATA_ENC_VAES};
pub use error::{Result, SecureError};
pub use store::{SecureStore, STORE_VERSION};
