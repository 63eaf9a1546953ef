//! AES-128 primitives for secure telegrams: truncated CMAC and the VAES keystream.

use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Block};
use cmac::{Cmac, Mac};

pub const KEY_LEN: usize = 16;

/// Largest payload one VAES keystream block covers.
pub const VAES_BLOCK_LEN: usize = 16;

/// Public initialization vector of the VAES mode.
pub const VAES_INIT: [u8; VAES_BLOCK_LEN] = [
    0x34, 0x10, 0xDE, 0x8F, 0x1A, 0xBA, 0x3E, 0xFF, 0x9F, 0x5A, 0x11, 0x71, 0x72, 0xEA, 0xCA, 0xBD,
];

/// The low `len` bytes of the rolling code, big-endian.
pub fn rlc_bytes(rlc: u32, len: usize) -> Vec<u8> {
    let bytes = rlc.to_be_bytes();
    bytes[bytes.len() - len.min(bytes.len())..].to_vec()
}

fn cmac_over(key: &[u8; KEY_LEN], rorg: u8, data: &[u8], rlc: &[u8]) -> Cmac<Aes128> {
    let mut mac = <Cmac<Aes128> as Mac>::new(key.into());
    mac.update(&[rorg]);
    mac.update(data);
    mac.update(rlc);
    mac
}

/// CMAC of `rorg || data || rlc`, truncated to `mac_len` bytes.
pub fn cmac(key: &[u8; KEY_LEN], rorg: u8, data: &[u8], rlc: &[u8], mac_len: usize) -> Vec<u8> {
    let tag = cmac_over(key, rorg, data, rlc).finalize().into_bytes();
    tag[..mac_len.min(tag.len())].to_vec()
}

/// Constant-time check of a truncated CMAC tag.
pub fn verify_cmac(key: &[u8; KEY_LEN], rorg: u8, data: &[u8], rlc: &[u8], tag: &[u8]) -> bool {
    cmac_over(key, rorg, data, rlc)
        .verify_truncated_left(tag)
        .is_ok()
}

/// XOR `data` with the VAES keystream for this rolling code.
///
/// The keystream is `AES(key, VAES_INIT ^ rlc)`, with the rolling code
/// right-padded with zeros. Encryption and decryption are the same
/// operation; callers keep `data` within one block.
pub fn vaes(key: &[u8; KEY_LEN], rlc: &[u8], data: &[u8]) -> Vec<u8> {
    let mut block = Block::from(VAES_INIT);
    for (byte, rlc_byte) in block.iter_mut().zip(rlc) {
        *byte ^= rlc_byte;
    }
    Aes128::new(key.into()).encrypt_block(&mut block);

    data.iter()
        .zip(block.iter())
        .map(|(byte, stream)| byte ^ stream)
        .collect()
}
