//! CRC8 as used by ESP3 (polynomial `x^8 + x^2 + x + 1`, init 0).

const POLYNOMIAL: u8 = 0x07;

/// Lookup table shared by the encoder and the decoder.
pub static CRC8_TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Continue a running checksum over more bytes.
pub fn update(crc: u8, bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(crc, |crc, &byte| CRC8_TABLE[(crc ^ byte) as usize])
}

/// Checksum of a complete byte slice.
pub fn crc8(bytes: &[u8]) -> u8 {
    update(0, bytes)
}
