use std::fs;
use std::path::PathBuf;

use enocean_eep::ProfileStore;
use enocean_packet::{rorg, Packet, ParseResult};
use enocean_secure::{SecureDevice, SecureError, SecureStore, TeachInPolicy};

const TEACH_IN_1: [u8; 29] = [
    0x55, 0x00, 0x0F, 0x07, 0x01, 0x2B, 0x35, 0x24, 0x4B, 0xC0, 0xFF, 0x45, 0x6E, 0x4F, 0x63,
    0x65, 0x01, 0x9E, 0xB6, 0x3B, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x37, 0x00, 0x71,
];

const TEACH_IN_2: [u8; 32] = [
    0x55, 0x00, 0x12, 0x07, 0x01, 0x18, 0x35, 0x40, 0x61, 0x6E, 0x20, 0x47, 0x6D, 0x62, 0x48,
    0x2E, 0x31, 0x33, 0x00, 0x01, 0x9E, 0xB6, 0x3B, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x37,
    0x00, 0xF0,
];

/// PTM215, rocker A0 pressed.
const A0_PRESSED: [u8; 24] = [
    0x55, 0x00, 0x0A, 0x07, 0x01, 0xEB, 0x30, 0xD0, 0xB5, 0x18, 0xFB, 0x01, 0x9E, 0xB6, 0x3B,
    0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x37, 0x00, 0x4D,
];

/// PTM215, rocker released.
const A0_RELEASED: [u8; 24] = [
    0x55, 0x00, 0x0A, 0x07, 0x01, 0xEB, 0x30, 0x7B, 0xAE, 0xC8, 0x28, 0x01, 0x9E, 0xB6, 0x3B,
    0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x37, 0x00, 0x94,
];

/// The plain RPS telegram a non-secure PTM sends for A0 pressed.
const PLAIN_A0_PRESSED: [u8; 21] = [
    0x55, 0x00, 0x07, 0x07, 0x01, 0x7A, 0xF6, 0x30, 0x01, 0x9E, 0xB6, 0x3B, 0x30, 0x00, 0xFF,
    0xFF, 0xFF, 0xFF, 0x37, 0x00, 0xFB,
];

const SENDER: [u8; 4] = [0x01, 0x9E, 0xB6, 0x3B];
const KEY: [u8; 16] = [
    0x45, 0x6E, 0x4F, 0x63, 0x65, 0x61, 0x6E, 0x20, 0x47, 0x6D, 0x62, 0x48, 0x2E, 0x31, 0x33, 0x00,
];

fn parse(wire: &[u8]) -> Packet {
    let (result, rest, packet) = Packet::parse(wire);
    assert_eq!(result, ParseResult::Ok);
    assert!(rest.is_empty());
    packet.expect("telegram should decode")
}

fn profiles() -> ProfileStore {
    ProfileStore::embedded().expect("embedded catalog should load")
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "enocean-secure-it-{tag}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("temp dir should be created");
    dir
}

fn pair(store: &mut SecureStore, profiles: &ProfileStore) -> SecureDevice {
    store.allow_teach_in(TeachInPolicy {
        min_dbm: -80,
        ..TeachInPolicy::default()
    });
    assert!(store.is_teach_in_allowed());

    let first = parse(&TEACH_IN_1);
    assert_eq!(first.rorg(), rorg::SEC_TI);
    assert!(store
        .teach_in(profiles, &first)
        .expect("first half accepted")
        .is_none());

    let second = parse(&TEACH_IN_2);
    store
        .teach_in(profiles, &second)
        .expect("second half accepted")
        .expect("device paired")
}

#[test]
fn teach_in_rejected_until_allowed() {
    let profiles = profiles();
    let mut store = SecureStore::in_memory();
    assert!(!store.is_teach_in_allowed());

    assert!(store
        .teach_in(&profiles, &parse(&TEACH_IN_1))
        .expect("ignored, not an error")
        .is_none());
    assert!(store
        .teach_in(&profiles, &parse(&TEACH_IN_2))
        .expect("ignored, not an error")
        .is_none());

    let mut packet = parse(&A0_PRESSED);
    let err = store.decrypt(&mut packet).unwrap_err();
    assert!(matches!(err, SecureError::NotPaired(ref sender) if sender == "01:9E:B6:3B"));
    assert_eq!(packet.rorg(), rorg::SEC);
}

#[test]
fn teach_in_pairs_need_order_and_matching_sender() {
    let profiles = profiles();
    let first = parse(&TEACH_IN_1);
    let second = parse(&TEACH_IN_2);
    let data = parse(&A0_PRESSED);

    for (a, b) in [(&second, &first), (&first, &data), (&first, &first)] {
        let err = SecureDevice::from_teach_in(&profiles, a, b).unwrap_err();
        assert!(matches!(err, SecureError::TeachInProtocolViolation(_)), "{err}");
    }

    let mut data = second.data().to_vec();
    data[16] = 0x3C;
    let stranger = Packet::new(second.packet_type(), data, second.optional().to_vec());
    let err = SecureDevice::from_teach_in(&profiles, &first, &stranger).unwrap_err();
    assert!(matches!(
        err,
        SecureError::TeachInProtocolViolation(ref reason) if reason.contains("sender")
    ));
}

#[test]
fn pairing_decrypt_replay_and_translation() {
    let profiles = profiles();
    let mut store = SecureStore::in_memory();
    let device = pair(&mut store, &profiles);

    assert_eq!(device.sender, SENDER);
    assert_eq!(device.psk, 0);
    assert_eq!(device.ptm, 1);
    assert_eq!(device.rlc_algo, 2);
    assert_eq!(device.rlc_tx, 0);
    assert_eq!(device.mac_algo, 1);
    assert_eq!(device.data_enc, 3);
    assert_eq!(device.rlc, 0xC0FF);
    assert_eq!(device.key, KEY);
    assert_eq!(device.rlc_len(), 2);
    assert_eq!(device.explicit_rlc_len(), 0);
    assert_eq!(device.mac_len(), 3);
    assert!(!store.is_teach_in_allowed());

    // A0 pressed
    let mut packet = parse(&A0_PRESSED);
    assert_eq!(packet.rorg(), rorg::SEC);
    let device = store.decrypt(&mut packet).expect("telegram should verify");
    assert_eq!(device.rlc, 0xC100);
    assert_eq!(packet.rorg(), rorg::SECD);

    assert!(device
        .translate_application(&profiles, &mut packet)
        .expect("SECD telegram"));
    assert_eq!(packet.rorg(), rorg::VLD);
    assert_eq!(packet.data()[1], 0x0E);

    device
        .translate_profile(&profiles, &mut packet)
        .expect("D2-03-00 telegram");
    assert_eq!(packet.rorg(), rorg::RPS);
    assert_eq!(packet.build().expect("packet should serialize"), PLAIN_A0_PRESSED);

    let mut plain = parse(&PLAIN_A0_PRESSED);
    plain.parse_eep(&profiles, 0x02, 0x01, None, None);
    assert_eq!(packet.parsed(), plain.parsed());
    assert_eq!(packet.parsed()["R1"].value.as_label(), Some("Button AO"));
    assert_eq!(packet.parsed()["EB"].value.as_label(), Some("pressed"));

    // Replay of the same telegram
    let mut replay = parse(&A0_PRESSED);
    assert!(matches!(store.decrypt(&mut replay), Err(SecureError::ReplayOrTamper)));
    assert_eq!(replay.rorg(), rorg::SEC);
    assert_eq!(store.device(SENDER).map(|device| device.rlc), Some(0xC100));

    // Removed devices cannot decrypt; removing twice fails.
    store.remove_device(SENDER).expect("device was paired");
    let mut released = parse(&A0_RELEASED);
    assert!(matches!(store.decrypt(&mut released), Err(SecureError::NotPaired(_))));
    assert!(matches!(store.remove_device(SENDER), Err(SecureError::NotPaired(_))));
    store.add_device(device).expect("in-memory add");

    // A0 released
    let mut packet = parse(&A0_RELEASED);
    let device = store.decrypt(&mut packet).expect("telegram should verify");
    assert_eq!(device.rlc, 0xC101);
    device
        .translate_application(&profiles, &mut packet)
        .expect("SECD telegram");
    assert_eq!(packet.data()[1], 0x0F);
    device
        .translate_profile(&profiles, &mut packet)
        .expect("D2-03-00 telegram");
    assert_eq!(packet.rorg(), rorg::RPS);
    assert_eq!(packet.parsed()["EB"].value.as_label(), Some("released"));
}

#[test]
fn rolling_code_survives_restart() {
    let profiles = profiles();
    let dir = unique_temp_dir("restart");
    let path = dir.join("secure.json");

    {
        let mut store = SecureStore::open(&path).expect("new store");
        pair(&mut store, &profiles);
        store
            .decrypt(&mut parse(&A0_PRESSED))
            .expect("telegram should verify");
    }

    let mut store = SecureStore::open(&path).expect("existing store");
    assert_eq!(store.device(SENDER).map(|device| device.rlc), Some(0xC100));
    assert!(matches!(
        store.decrypt(&mut parse(&A0_PRESSED)),
        Err(SecureError::ReplayOrTamper)
    ));
    store
        .decrypt(&mut parse(&A0_RELEASED))
        .expect("next telegram should verify");

    let reopened = SecureStore::open(&path).expect("existing store");
    assert_eq!(reopened.device(SENDER).map(|device| device.rlc), Some(0xC101));

    fs::remove_dir_all(dir).expect("temp dir should be removed");
}
