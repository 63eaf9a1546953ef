use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use enocean_eep::ProfileStore;
use enocean_packet::{format_address, rorg, Packet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{SecureConfig, TeachInPolicy};
use crate::device::SecureDevice;
use crate::error::{Result, SecureError};

/// Version written to and accepted from store files.
pub const STORE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoreDocument {
    version: u32,
    devices: Vec<SecureDevice>,
}

/// Admission state armed by `allow_teach_in`.
#[derive(Debug, Clone, Copy)]
struct TeachInWindow {
    remaining: u32,
    deadline: Instant,
    min_dbm: i16,
}

/// First half of a teach-in waiting for its partner.
#[derive(Debug, Clone)]
struct PendingTeachIn {
    packet: Packet,
    received: Instant,
}

/// Paired secure devices plus the teach-in session state.
///
/// Every change to the paired set and every rolling-code advance is written
/// back to the store file, when there is one. Methods take `&mut self`, so
/// decrypts against one store are serialized; share it across threads
/// behind a `Mutex`.
#[derive(Debug)]
pub struct SecureStore {
    devices: BTreeMap<u32, SecureDevice>,
    path: Option<PathBuf>,
    config: SecureConfig,
    window: Option<TeachInWindow>,
    pending: Option<PendingTeachIn>,
}

impl SecureStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::in_memory_with_config(SecureConfig::default())
    }

    pub fn in_memory_with_config(config: SecureConfig) -> Self {
        Self {
            devices: BTreeMap::new(),
            path: None,
            config,
            window: None,
            pending: None,
        }
    }

    /// Open the store file at `path`; a missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_config(path, SecureConfig::default())
    }

    pub fn open_with_config(path: impl Into<PathBuf>, config: SecureConfig) -> Result<Self> {
        let path = path.into();
        let mut store = Self::in_memory_with_config(config);

        if path.exists() {
            let document: StoreDocument = serde_json::from_slice(&fs::read(&path)?)?;
            if document.version != STORE_VERSION {
                return Err(SecureError::UnsupportedStoreVersion(document.version));
            }
            for device in document.devices {
                store.devices.insert(device.sender_int(), device);
            }
            info!(path = %path.display(), devices = store.devices.len(), "secure store loaded");
        }

        store.path = Some(path);
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> &SecureConfig {
        &self.config
    }

    /// Write the store file: a temporary sibling first, then renamed over the target.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let document = StoreDocument {
            version: STORE_VERSION,
            devices: self.devices.values().cloned().collect(),
        };
        let json = serde_json::to_vec_pretty(&document)?;

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        info!(path = %path.display(), devices = self.devices.len(), "secure store saved");
        Ok(())
    }

    /// Pair a device directly, replacing any device with the same sender.
    pub fn add_device(&mut self, device: SecureDevice) -> Result<()> {
        self.devices.insert(device.sender_int(), device);
        self.save()
    }

    pub fn remove_device(&mut self, sender: [u8; 4]) -> Result<SecureDevice> {
        let device = self
            .devices
            .remove(&u32::from_be_bytes(sender))
            .ok_or_else(|| SecureError::NotPaired(format_address(&sender)))?;
        self.save()?;
        Ok(device)
    }

    /// The paired device matching the packet's sender.
    pub fn get_device(&self, packet: &Packet) -> Option<&SecureDevice> {
        self.devices.get(&packet.sender_int()?)
    }

    pub fn device(&self, sender: [u8; 4]) -> Option<&SecureDevice> {
        self.devices.get(&u32::from_be_bytes(sender))
    }

    pub fn devices(&self) -> impl Iterator<Item = &SecureDevice> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Open a teach-in window under `policy`. Replaces any earlier window.
    pub fn allow_teach_in(&mut self, policy: TeachInPolicy) {
        self.window = Some(TeachInWindow {
            remaining: policy.max_devices,
            deadline: Instant::now() + policy.window,
            min_dbm: policy.min_dbm,
        });
        self.pending = None;
        info!(
            max_devices = policy.max_devices,
            window_secs = policy.window.as_secs(),
            min_dbm = policy.min_dbm,
            "secure teach-in allowed"
        );
    }

    pub fn is_teach_in_allowed(&self) -> bool {
        self.window
            .is_some_and(|window| window.remaining > 0 && Instant::now() <= window.deadline)
    }

    /// Feed one secure teach-in telegram.
    ///
    /// Returns the new device once both halves arrived, `None` while waiting
    /// for the second half or when the window rejects the telegram. A
    /// mismatched pair aborts the session with an error.
    pub fn teach_in(
        &mut self,
        profiles: &ProfileStore,
        packet: &Packet,
    ) -> Result<Option<SecureDevice>> {
        self.teach_in_at(profiles, packet, Instant::now())
    }

    fn teach_in_at(
        &mut self,
        profiles: &ProfileStore,
        packet: &Packet,
        now: Instant,
    ) -> Result<Option<SecureDevice>> {
        let Some(window) = self.window.filter(|window| window.remaining > 0) else {
            info!("max teach-in devices reached, ignoring secure teach-in");
            return Ok(None);
        };
        if now > window.deadline {
            info!("teach-in window expired, ignoring secure teach-in");
            return Ok(None);
        }
        let Some(dbm) = packet.dbm() else {
            info!("signal strength unknown, ignoring secure teach-in");
            return Ok(None);
        };
        if dbm < window.min_dbm {
            info!(dbm, min_dbm = window.min_dbm, "signal too weak, ignoring secure teach-in");
            return Ok(None);
        }

        if packet.rorg() != rorg::SEC_TI {
            self.pending = None;
            return Err(SecureError::TeachInProtocolViolation(format!(
                "expected RORG 0x{:02X}, got 0x{:02X}",
                rorg::SEC_TI,
                packet.rorg()
            )));
        }

        let first = match self.pending.take() {
            Some(pending)
                if now.saturating_duration_since(pending.received)
                    <= self.config.teach_in_pair_timeout =>
            {
                pending.packet
            }
            _ => {
                debug!(sender = ?packet.sender_hex(), "first secure teach-in telegram received");
                self.pending = Some(PendingTeachIn {
                    packet: packet.clone(),
                    received: now,
                });
                return Ok(None);
            }
        };

        debug!(sender = ?packet.sender_hex(), "second secure teach-in telegram received");
        let device = SecureDevice::from_teach_in(profiles, &first, packet)?;
        self.add_device(device.clone())?;
        if let Some(window) = &mut self.window {
            window.remaining = window.remaining.saturating_sub(1);
        }
        info!(sender = %device.sender_hex(), "secure device paired");
        Ok(Some(device))
    }

    /// Verify and decrypt a RORG SEC telegram from a paired device in place.
    ///
    /// The advanced rolling code is persisted before returning. Returns a
    /// snapshot of the device after the update.
    pub fn decrypt(&mut self, packet: &mut Packet) -> Result<SecureDevice> {
        let sender = packet.sender_int();
        let device = sender
            .and_then(|sender| self.devices.get_mut(&sender))
            .ok_or_else(|| {
                SecureError::NotPaired(packet.sender_hex().unwrap_or_else(|| "unknown".to_string()))
            })?;

        device.decrypt_sec(packet, self.config.rlc_window)?;
        let device = device.clone();
        self.save()?;
        Ok(device)
    }
}
