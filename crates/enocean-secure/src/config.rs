use std::time::Duration;

/// Decrypt and teach-in tuning that stays fixed for the life of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecureConfig {
    /// How many rolling-code values past the stored one are tried before a
    /// telegram is rejected.
    pub rlc_window: u32,
    /// Maximum gap between the two halves of a secure teach-in.
    pub teach_in_pair_timeout: Duration,
}

impl Default for SecureConfig {
    fn default() -> Self {
        Self {
            rlc_window: 100,
            teach_in_pair_timeout: Duration::from_secs(4),
        }
    }
}

/// Admission rules for one teach-in window, armed by `SecureStore::allow_teach_in`.
///
/// The default admits a single device within five minutes, at roughly one
/// meter from the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeachInPolicy {
    pub max_devices: u32,
    pub window: Duration,
    /// Weakest accepted signal, in dBm.
    pub min_dbm: i16,
}

impl Default for TeachInPolicy {
    fn default() -> Self {
        Self {
            max_devices: 1,
            window: Duration::from_secs(300),
            min_dbm: -56,
        }
    }
}
