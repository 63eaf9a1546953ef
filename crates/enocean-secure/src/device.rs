use std::fmt;

use enocean_eep::ProfileStore;
use enocean_packet::{address_to_int, format_address, rorg, Packet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::{self, KEY_LEN, VAES_BLOCK_LEN};
use crate::error::{Result, SecureError};

/// Rolling-code length in bytes, indexed by `rlc_algo`.
const RLC_LEN: [usize; 8] = [0, 0, 2, 2, 3, 3, 4, 4];
/// Bytes of the rolling code sent in the telegram, indexed by `rlc_algo`.
const EXPLICIT_RLC_LEN: [usize; 8] = [0, 0, 0, 0, 0, 3, 3, 4];
/// Truncated CMAC length in bytes, indexed by `mac_algo`.
const MAC_LEN: [usize; 4] = [0, 3, 4, 0];

/// `data_enc` value of the VAES mode.
pub const DATA_ENC_VAES: u8 = 3;

/// Security profile of the teach-in telegrams (35-00-00 in the catalog).
const TEACH_IN_FUNC: u8 = 0x00;
const TEACH_IN_TYPE: u8 = 0x00;
const TEACH_IN_PARTS: u32 = 2;

/// Sender address + status byte trailing every radio data section.
const TRAILER_LEN: usize = 5;

/// A paired secure sender: algorithm parameters, rolling code and key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureDevice {
    #[serde(with = "hex_array")]
    pub sender: [u8; 4],
    /// Pre-shared key flag from the teach-in.
    pub psk: u8,
    /// Non-zero for PTM button modules, whose payload translates to RPS.
    pub ptm: u8,
    pub rlc_algo: u8,
    pub rlc_tx: u8,
    pub mac_algo: u8,
    pub data_enc: u8,
    /// Next rolling code expected from the sender.
    pub rlc: u32,
    #[serde(with = "hex_array")]
    pub key: [u8; KEY_LEN],
}

impl fmt::Debug for SecureDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureDevice")
            .field("sender", &format_address(&self.sender))
            .field("psk", &self.psk)
            .field("ptm", &self.ptm)
            .field("rlc_algo", &self.rlc_algo)
            .field("rlc_tx", &self.rlc_tx)
            .field("mac_algo", &self.mac_algo)
            .field("data_enc", &self.data_enc)
            .field("rlc", &self.rlc)
            .field("key", &format_args!("<redacted:{} bytes>", self.key.len()))
            .finish()
    }
}

impl SecureDevice {
    /// Combine the two halves of a secure teach-in into a device.
    ///
    /// Both packets must be RORG SEC_TI from the same sender and of the same
    /// packet type; the first must announce two parts and carry index 0, the
    /// second index 1. The first five key bytes travel in part one, the
    /// remaining eleven in part two.
    pub fn from_teach_in(profiles: &ProfileStore, first: &Packet, second: &Packet) -> Result<Self> {
        for packet in [first, second] {
            if packet.rorg() != rorg::SEC_TI {
                return Err(violation(format!(
                    "expected RORG 0x{:02X}, got 0x{:02X}",
                    rorg::SEC_TI,
                    packet.rorg()
                )));
            }
        }
        if first.packet_type() != second.packet_type() {
            return Err(violation("packet types differ"));
        }
        let sender = match (first.sender(), second.sender()) {
            (Some(a), Some(b)) if a == b => a,
            _ => return Err(violation("senders differ")),
        };

        let mut first = first.clone();
        if first.parse_eep(profiles, TEACH_IN_FUNC, TEACH_IN_TYPE, None, None).is_empty() {
            return Err(violation("teach-in profile missing from catalog"));
        }
        if raw(&first, "CNT")? != TEACH_IN_PARTS || raw(&first, "IDX")? != 0 {
            return Err(violation("first telegram out of order"));
        }

        let mut second = second.clone();
        second.parse_eep(profiles, TEACH_IN_FUNC, TEACH_IN_TYPE, None, Some(1));
        if raw(&second, "IDX")? != 1 {
            return Err(violation("second telegram out of order"));
        }

        let mut key = Vec::with_capacity(KEY_LEN);
        key.extend_from_slice(key_part(&first, 5)?);
        key.extend_from_slice(key_part(&second, 2)?);
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|key: Vec<u8>| violation(format!("key has {} bytes", key.len())))?;

        let device = Self {
            sender,
            psk: raw_u8(&first, "PSK")?,
            ptm: raw_u8(&first, "TYPE")?,
            rlc_algo: raw_u8(&first, "RLC_ALGO")?,
            rlc_tx: raw_u8(&first, "RLC_TX")?,
            mac_algo: raw_u8(&first, "MAC_ALGO")?,
            data_enc: raw_u8(&first, "DATA_ENC")?,
            rlc: raw(&first, "RLC")?,
            key,
        };
        debug!(?device, "secure teach-in complete");
        Ok(device)
    }

    pub fn sender_int(&self) -> u32 {
        address_to_int(&self.sender)
    }

    pub fn sender_hex(&self) -> String {
        format_address(&self.sender)
    }

    /// Rolling-code length used for CMAC and VAES.
    pub fn rlc_len(&self) -> usize {
        RLC_LEN[usize::from(self.rlc_algo & 0x07)]
    }

    /// Rolling-code bytes carried in each telegram (0 when implicit).
    pub fn explicit_rlc_len(&self) -> usize {
        EXPLICIT_RLC_LEN[usize::from(self.rlc_algo & 0x07)]
    }

    pub fn mac_len(&self) -> usize {
        MAC_LEN[usize::from(self.mac_algo & 0x03)]
    }

    pub fn cmac(&self, rorg: u8, data: &[u8], rlc: u32) -> Vec<u8> {
        crypto::cmac(&self.key, rorg, data, &self.rlc_of(rlc), self.mac_len())
    }

    pub fn verify_cmac(&self, rorg: u8, data: &[u8], rlc: u32, tag: &[u8]) -> bool {
        crypto::verify_cmac(&self.key, rorg, data, &self.rlc_of(rlc), tag)
    }

    /// Encrypt or decrypt `data` for the given rolling code.
    pub fn vaes(&self, data: &[u8], rlc: u32) -> Vec<u8> {
        crypto::vaes(&self.key, &self.rlc_of(rlc), data)
    }

    fn rlc_of(&self, rlc: u32) -> Vec<u8> {
        crypto::rlc_bytes(rlc, self.rlc_len())
    }

    /// Verify and decrypt a RORG SEC telegram in place.
    ///
    /// Rolling codes from the stored one up to `window` past it are tried.
    /// On success the packet becomes RORG SECD with the plaintext payload,
    /// the MAC and explicit rolling code are removed, the status byte is
    /// cleared and the stored rolling code moves past the matched one. On
    /// failure neither the packet nor the device changes.
    pub fn decrypt_sec(&mut self, packet: &mut Packet, window: u32) -> Result<()> {
        if packet.rorg() != rorg::SEC {
            return Err(SecureError::UnexpectedRorg {
                expected: rorg::SEC,
                found: packet.rorg(),
            });
        }
        if self.data_enc != DATA_ENC_VAES {
            return Err(SecureError::Unsupported(format!(
                "data encryption {}",
                self.data_enc
            )));
        }
        let mac_len = self.mac_len();
        if mac_len == 0 {
            return Err(SecureError::Unsupported(format!(
                "MAC algorithm {}",
                self.mac_algo
            )));
        }

        let payload = packet.payload();
        let trailer = mac_len + self.explicit_rlc_len();
        if payload.len() < trailer {
            return Err(SecureError::InvalidTelegram(format!(
                "{} payload bytes, {trailer} needed for MAC and rolling code",
                payload.len()
            )));
        }
        let (encrypted, rest) = payload.split_at(payload.len() - trailer);
        let tag = &rest[rest.len() - mac_len..];
        if encrypted.len() > VAES_BLOCK_LEN {
            return Err(SecureError::InvalidTelegram(format!(
                "{} encrypted bytes exceed one VAES block",
                encrypted.len()
            )));
        }

        let matched = (0..=window)
            .filter_map(|step| self.rlc.checked_add(step))
            .find(|&rlc| self.verify_cmac(rorg::SEC, encrypted, rlc, tag))
            .ok_or(SecureError::ReplayOrTamper)?;
        if matched != self.rlc {
            debug!(
                sender = %self.sender_hex(),
                expected = self.rlc,
                matched,
                "rolling code resynchronized"
            );
        }

        let plain = self.vaes(encrypted, matched);
        let mut data = Vec::with_capacity(1 + plain.len() + TRAILER_LEN);
        data.push(rorg::SECD);
        data.extend_from_slice(&plain);
        data.extend_from_slice(&self.sender);
        data.push(0x00);
        packet.set_data(data);

        self.rlc = matched.saturating_add(1);
        Ok(())
    }
}

fn violation(reason: impl Into<String>) -> SecureError {
    SecureError::TeachInProtocolViolation(reason.into())
}

fn raw(packet: &Packet, shortcut: &str) -> Result<u32> {
    packet
        .parsed()
        .get(shortcut)
        .map(|field| field.raw_value)
        .ok_or_else(|| violation(format!("teach-in field {shortcut} missing")))
}

fn raw_u8(packet: &Packet, shortcut: &str) -> Result<u8> {
    let value = raw(packet, shortcut)?;
    u8::try_from(value).map_err(|_| violation(format!("teach-in field {shortcut} is {value}")))
}

/// Data bytes from `start` up to the sender/status trailer.
fn key_part(packet: &Packet, start: usize) -> Result<&[u8]> {
    let data = packet.data();
    let end = data.len().saturating_sub(TRAILER_LEN);
    data.get(start..end)
        .ok_or_else(|| violation(format!("teach-in telegram too short ({} bytes)", data.len())))
}

/// Fixed-size byte arrays as hex strings.
mod hex_array {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode_upper(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        let mut bytes = [0u8; N];
        hex::decode_to_slice(&text, &mut bytes).map_err(D::Error::custom)?;
        Ok(bytes)
    }
}
