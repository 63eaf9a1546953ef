use std::fmt;

use serde::Serialize;

use crate::codes::return_code;

/// RESPONSE telegram: return code plus command-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub return_code: u8,
    pub data: Vec<u8>,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.return_code == return_code::OK
    }

    /// Base id from a `CO_RD_IDBASE` response.
    pub fn base_id(&self) -> Option<[u8; 4]> {
        if !self.is_ok() {
            return None;
        }
        self.data.get(..4)?.try_into().ok()
    }
}

/// EVENT telegram: event code plus event data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub code: u8,
    pub data: Vec<u8>,
}

/// `main.beta.alpha.build` version quadruple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionIdentifier {
    pub main: u8,
    pub beta: u8,
    pub alpha: u8,
    pub build: u8,
}

impl VersionIdentifier {
    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            main: bytes[0],
            beta: bytes[1],
            alpha: bytes[2],
            build: bytes[3],
        }
    }
}

impl fmt::Display for VersionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}.{}", self.main, self.beta, self.alpha, self.build)
    }
}

/// Decoded `CO_RD_VERSION` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub app_version: VersionIdentifier,
    pub api_version: VersionIdentifier,
    pub chip_id: u32,
    pub chip_version: u32,
    pub app_description: String,
}

const VERSION_RESPONSE_LEN: usize = 4 + 4 + 4 + 4 + 16;

impl VersionInfo {
    /// Returns `None` for error responses or truncated payloads.
    pub fn from_response(response: &Response) -> Option<Self> {
        if !response.is_ok() || response.data.len() < VERSION_RESPONSE_LEN {
            return None;
        }
        let data = &response.data;
        let word =
            |at: usize| u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);

        let description = &data[16..32];
        let end = description
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(description.len());

        Some(Self {
            app_version: VersionIdentifier::from_bytes(&data[0..4]),
            api_version: VersionIdentifier::from_bytes(&data[4..8]),
            chip_id: word(8),
            chip_version: word(12),
            app_description: String::from_utf8_lossy(&description[..end]).into_owned(),
        })
    }
}
