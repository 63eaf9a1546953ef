//! Numeric codes carried in response, event and common-command telegrams.

/// Return codes of RESPONSE telegrams.
pub mod return_code {
    pub const OK: u8 = 0x00;
    pub const ERROR: u8 = 0x01;
    pub const NOT_SUPPORTED: u8 = 0x02;
    pub const WRONG_PARAM: u8 = 0x03;
    pub const OPERATION_DENIED: u8 = 0x04;

    pub fn name(code: u8) -> &'static str {
        match code {
            OK => "OK",
            ERROR => "ERROR",
            NOT_SUPPORTED => "NOT_SUPPORTED",
            WRONG_PARAM => "WRONG_PARAM",
            OPERATION_DENIED => "OPERATION_DENIED",
            _ => "UNKNOWN",
        }
    }
}

/// Event codes of EVENT telegrams.
pub mod event_code {
    pub const SA_RECLAIM_NOT_SUCCESSFUL: u8 = 0x01;
    pub const SA_CONFIRM_LEARN: u8 = 0x02;
    pub const SA_LEARN_ACK: u8 = 0x03;
    pub const CO_READY: u8 = 0x04;
    pub const CO_EVENT_SECUREDEVICES: u8 = 0x05;

    pub fn name(code: u8) -> &'static str {
        match code {
            SA_RECLAIM_NOT_SUCCESSFUL => "SA_RECLAIM_NOT_SUCCESSFUL",
            SA_CONFIRM_LEARN => "SA_CONFIRM_LEARN",
            SA_LEARN_ACK => "SA_LEARN_ACK",
            CO_READY => "CO_READY",
            CO_EVENT_SECUREDEVICES => "CO_EVENT_SECUREDEVICES",
            _ => "UNKNOWN",
        }
    }
}

/// Common command codes (first data byte of COMMON_COMMAND telegrams).
pub mod common_command {
    pub const CO_WR_SLEEP: u8 = 0x01;
    pub const CO_WR_RESET: u8 = 0x02;
    pub const CO_RD_VERSION: u8 = 0x03;
    pub const CO_WR_IDBASE: u8 = 0x07;
    pub const CO_RD_IDBASE: u8 = 0x08;
}

/// UTE request types (bits 5..4 of DB6).
pub mod ute_request {
    pub const TEACH_IN: u8 = 0x00;
    pub const DELETE: u8 = 0x01;
    pub const NOT_SPECIFIC: u8 = 0x02;
}

/// UTE response codes written by `create_response_packet`.
pub mod ute_response {
    pub const NOT_ACCEPTED: u8 = 0x00;
    pub const TEACHIN_ACCEPTED: u8 = 0x01;
    pub const DELETE_ACCEPTED: u8 = 0x02;
    pub const EEP_NOT_SUPPORTED: u8 = 0x03;
}
