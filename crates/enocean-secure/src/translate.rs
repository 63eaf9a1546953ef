//! Rewrites of decrypted PTM telegrams into their plain equivalents.
//!
//! A decrypted PTM button telegram (RORG SECD) carries the 4-bit rocker
//! state of VLD profile D2-03-00. That state maps onto the RPS telegram of
//! profile F6-02-01 a non-secure PTM would have sent.

use enocean_eep::{ProfileKey, ProfileStore};
use enocean_packet::{rorg, Packet};
use tracing::debug;

use crate::device::SecureDevice;
use crate::error::{Result, SecureError};

const ROCKER_FUNC: u8 = 0x03;
const ROCKER_TYPE: u8 = 0x00;
const RPS_FUNC: u8 = 0x02;
const RPS_TYPE: u8 = 0x01;

/// D2-03-00 rocker state to F6-02-01 (data byte, status byte).
const ROCKER_TO_RPS: [(u8, u8); 16] = [
    (0x00, 0x00), // reserved
    (0x00, 0x00), // reserved
    (0x00, 0x00), // reserved
    (0x00, 0x00), // reserved
    (0x00, 0x00), // reserved
    (0x17, 0x30), // A1 + B0
    (0x70, 0x20), // 3 or 4 buttons
    (0x37, 0x30), // A0 + B0
    (0x10, 0x20), // energy bow only
    (0x15, 0x30), // A1 + B1
    (0x35, 0x30), // A0 + B1
    (0x50, 0x30), // B1
    (0x70, 0x30), // B0
    (0x10, 0x30), // A1
    (0x30, 0x30), // A0
    (0x00, 0x20), // released
];

/// Replace RORG and the single payload byte, keeping sender and status.
fn rewrite(packet: &mut Packet, rorg: u8, payload: u8, status: u8) {
    let mut data = Vec::with_capacity(7);
    data.push(rorg);
    data.push(payload);
    data.extend_from_slice(&packet.sender().unwrap_or_default());
    data.push(status);
    packet.set_data(data);
}

impl SecureDevice {
    /// Turn a decrypted PTM telegram into VLD D2-03-00 and decode it.
    ///
    /// Returns `false` and leaves the packet alone for non-PTM devices.
    pub fn translate_application(
        &self,
        profiles: &ProfileStore,
        packet: &mut Packet,
    ) -> Result<bool> {
        if packet.rorg() != rorg::SECD {
            return Err(SecureError::UnexpectedRorg {
                expected: rorg::SECD,
                found: packet.rorg(),
            });
        }
        if self.ptm == 0 {
            return Ok(false);
        }

        let state = packet.payload().first().copied().unwrap_or_default() & 0x0F;
        let status = packet.status();
        rewrite(packet, rorg::VLD, state, status);
        packet.parse_eep(profiles, ROCKER_FUNC, ROCKER_TYPE, None, None);
        debug!(sender = %self.sender_hex(), state, "secure PTM telegram translated to D2-03-00");
        Ok(true)
    }

    /// Turn a D2-03-00 telegram into the matching F6-02-01 RPS telegram and decode it.
    pub fn translate_profile(&self, profiles: &ProfileStore, packet: &mut Packet) -> Result<()> {
        if packet.rorg() != rorg::VLD {
            return Err(SecureError::UnexpectedRorg {
                expected: rorg::VLD,
                found: packet.rorg(),
            });
        }
        if packet.rorg_func() != Some(ROCKER_FUNC) || packet.rorg_type() != Some(ROCKER_TYPE) {
            let found = match (packet.rorg_func(), packet.rorg_type()) {
                (Some(func), Some(type_)) => ProfileKey::new(rorg::VLD, func, type_).to_string(),
                _ => "no profile".to_string(),
            };
            return Err(SecureError::UnexpectedProfile {
                expected: ProfileKey::new(rorg::VLD, ROCKER_FUNC, ROCKER_TYPE).to_string(),
                found,
            });
        }

        let state = packet.payload().first().copied().unwrap_or_default() & 0x0F;
        let (data, status) = ROCKER_TO_RPS[usize::from(state)];
        rewrite(packet, rorg::RPS, data, status);
        packet.parse_eep(profiles, RPS_FUNC, RPS_TYPE, None, None);
        Ok(())
    }
}
