use enocean_eep::ProfileStore;
use enocean_packet::{Packet, ParseResult};

fn store() -> ProfileStore {
    ProfileStore::embedded().expect("embedded catalog should load")
}

fn parse_ok(wire: &[u8]) -> Packet {
    let (result, _, packet) = Packet::parse(wire);
    assert_eq!(result, ParseResult::Ok);
    packet.expect("packet should decode")
}

fn label<'a>(packet: &'a Packet, shortcut: &str) -> &'a str {
    packet.parsed()[shortcut]
        .value
        .as_label()
        .unwrap_or_else(|| panic!("{shortcut} is not an enum label"))
}

fn tenths(value: Option<f64>) -> f64 {
    (value.expect("numeric value") * 10.0).round() / 10.0
}

const TEMPERATURE: [u8; 24] = [
    0x55, 0x00, 0x0A, 0x07, 0x01, 0xEB, 0xA5, 0x00, 0x00, 0x55, 0x08, 0x01, 0x81, 0xB7, 0x44,
    0x00, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x2D, 0x00, 0x75,
];

#[test]
fn temperature_sensor() {
    let store = store();
    let mut packet = parse_ok(&TEMPERATURE);

    assert_eq!(packet.parse_eep(&store, 0x02, 0x05, None, None), vec!["TMP"]);
    let tmp = &packet.parsed()["TMP"];
    assert_eq!(tmp.raw_value, 85);
    assert!((tmp.value.as_f64().expect("numeric value") - 26.7).abs() < 0.1);
    assert_eq!(tmp.unit.as_deref(), Some("°C"));

    assert!(!packet.learn());
    assert!(!packet.contains_eep());
    assert_eq!(packet.sender_hex().as_deref(), Some("01:81:B7:44"));
    assert_eq!(packet.status(), 0x00);
}

#[test]
fn unknown_profile_then_known_profile() {
    let store = store();
    let mut packet = parse_ok(&TEMPERATURE);

    assert!(packet.parse_eep(&store, 0x00, 0x01, None, None).is_empty());
    assert!(packet.selected_profile().is_none());

    assert_eq!(packet.parse_eep(&store, 0x02, 0x05, None, None), vec!["TMP"]);
    let selected = packet.selected_profile().expect("profile selected");
    assert_eq!(selected.key.to_string(), "A5-02-05");
}

#[test]
fn magnetic_contact() {
    let store = store();
    let mut open = parse_ok(&[
        0x55, 0x00, 0x07, 0x07, 0x01, 0x7A, 0xD5, 0x08, 0x01, 0x82, 0x5D, 0xAB, 0x00, 0x01, 0xFF,
        0xFF, 0xFF, 0xFF, 0x36, 0x00, 0x53,
    ]);
    assert_eq!(open.parse_eep(&store, 0x00, 0x01, None, None), vec!["CO"]);
    assert_eq!(label(&open, "CO"), "open");
    assert_eq!(open.parsed()["CO"].raw_value, 0);
    assert!(!open.learn());

    let mut closed = parse_ok(&[
        0x55, 0x00, 0x07, 0x07, 0x01, 0x7A, 0xD5, 0x09, 0x01, 0x82, 0x5D, 0xAB, 0x00, 0x01, 0xFF,
        0xFF, 0xFF, 0xFF, 0x36, 0x00, 0xC7,
    ]);
    assert_eq!(closed.parse_eep(&store, 0x00, 0x01, None, None), vec!["CO"]);
    assert_eq!(label(&closed, "CO"), "closed");
    assert_eq!(closed.parsed()["CO"].raw_value, 1);
}

#[test]
fn rocker_switch_pressed_and_released() {
    let store = store();
    let mut pressed = parse_ok(&[
        0x55, 0x00, 0x07, 0x07, 0x01, 0x7A, 0xF6, 0x50, 0x00, 0x29, 0x89, 0x79, 0x30, 0x01, 0xFF,
        0xFF, 0xFF, 0xFF, 0x37, 0x00, 0x9D,
    ]);
    assert_eq!(
        pressed.parse_eep(&store, 0x02, 0x02, None, None),
        vec!["R1", "EB", "R2", "SA", "T21", "NU"]
    );
    assert_eq!(label(&pressed, "SA"), "No 2nd action");
    assert_eq!(label(&pressed, "EB"), "pressed");
    assert_eq!(label(&pressed, "R1"), "Button BI");
    assert_eq!(pressed.parsed()["T21"].value.as_bool(), Some(true));
    assert_eq!(pressed.parsed()["NU"].value.as_bool(), Some(true));
    assert!(pressed.learn());
    assert_eq!(pressed.status(), 0x30);

    let mut released = parse_ok(&[
        0x55, 0x00, 0x07, 0x07, 0x01, 0x7A, 0xF6, 0x00, 0x00, 0x29, 0x89, 0x79, 0x20, 0x02, 0xFF,
        0xFF, 0xFF, 0xFF, 0x4A, 0x00, 0x03,
    ]);
    released.parse_eep(&store, 0x02, 0x02, None, None);
    assert_eq!(label(&released, "EB"), "released");
    assert_eq!(released.parsed()["T21"].value.as_bool(), Some(true));
    assert_eq!(released.parsed()["NU"].value.as_bool(), Some(false));
    assert_eq!(released.repeater_count(), 0);
}

#[test]
fn actuator_direction_selects_field_set() {
    let store = store();
    let wire = [
        0x55, 0x00, 0x0A, 0x07, 0x01, 0xEB, 0xA5, 0x32, 0x20, 0x89, 0x00, 0xDE, 0xAD, 0xBE, 0xEF,
        0x00, 0x03, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x43,
    ];

    let mut from_device = parse_ok(&wire);
    assert_eq!(
        from_device.parse_eep(&store, 0x20, 0x01, Some(1), None),
        vec!["CV", "SO", "ENIE", "ES", "BCAP", "CCO", "FTS", "DWO", "ACO", "TMP"]
    );
    assert_eq!(from_device.parsed()["CV"].value.as_f64(), Some(50.0));
    assert_eq!(label(&from_device, "ES"), "true");

    let mut to_device = parse_ok(&wire);
    assert_eq!(
        to_device.parse_eep(&store, 0x20, 0x01, Some(2), None),
        vec!["SP", "TMP", "RIN", "LFS", "VO", "VC", "SB", "SPS", "SPN", "RCU"]
    );
    assert_eq!(to_device.parsed()["SP"].value.as_f64(), Some(50.0));
}

#[test]
fn vld_switch_status_reads_command_from_payload() {
    let store = store();
    let mut on = parse_ok(&[
        0x55, 0x00, 0x09, 0x07, 0x01, 0x56, 0xD2, 0x04, 0x00, 0x64, 0x01, 0x94, 0xE3, 0xB9, 0x00,
        0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x40, 0x00, 0xE4,
    ]);
    assert_eq!(
        on.parse_eep(&store, 0x01, 0x01, None, None),
        vec!["PF", "PFD", "CMD", "OC", "EL", "IO", "LC", "OV"]
    );
    assert_eq!(label(&on, "PF"), "Power Failure Detection disabled/not supported");
    assert_eq!(
        label(&on, "PFD"),
        "Power Failure Detection not detected/not supported/disabled"
    );
    assert_eq!(on.parsed()["CMD"].raw_value, 4);
    assert_eq!(label(&on, "OC"), "Over current switch off: ready / not supported");
    assert_eq!(label(&on, "EL"), "Error level 0: hardware OK");
    assert_eq!(label(&on, "IO"), "Output channel 0 (to load)");
    assert_eq!(label(&on, "LC"), "Local control disabled / not supported");
    assert_eq!(label(&on, "OV"), "Output value 100% or ON");
    assert_eq!(on.parsed()["OV"].raw_value, 100);

    let mut off = parse_ok(&[
        0x55, 0x00, 0x09, 0x07, 0x01, 0x56, 0xD2, 0x04, 0x00, 0x00, 0x01, 0x94, 0xE3, 0xB9, 0x00,
        0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x40, 0x00, 0xBF,
    ]);
    off.parse_eep(&store, 0x01, 0x01, None, None);
    assert_eq!(label(&off, "OV"), "Output value 0% or OFF");
}

#[test]
fn explicit_command_overrides_payload() {
    let store = store();
    let mut packet = parse_ok(&[
        0x55, 0x00, 0x09, 0x07, 0x01, 0x56, 0xD2, 0x04, 0x00, 0x64, 0x01, 0x94, 0xE3, 0xB9, 0x00,
        0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x40, 0x00, 0xE4,
    ]);
    assert_eq!(
        packet.parse_eep(&store, 0x01, 0x01, None, Some(3)),
        vec!["CMD", "IO"]
    );
    assert!(packet.parse_eep(&store, 0x01, 0x01, None, Some(9)).is_empty());
}

#[test]
fn weather_station() {
    let store = store();
    let mut packet = parse_ok(&[
        0x55, 0x00, 0x0A, 0x07, 0x01, 0xEB, 0xA5, 0xFF, 0x8A, 0x0A, 0x18, 0x05, 0xA0, 0x8B, 0xD6,
        0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x47, 0x00, 0x00,
    ]);

    assert_eq!(
        packet.parse_eep(&store, 0x13, 0x01, None, None),
        vec!["DWS", "TMP", "WND", "D/N", "RAN"]
    );
    let parsed = packet.parsed();
    assert_eq!(parsed["DWS"].raw_value, 255);
    assert_eq!(tenths(parsed["DWS"].value.as_f64()), 999.0);
    assert_eq!(parsed["TMP"].raw_value, 138);
    assert_eq!(tenths(parsed["TMP"].value.as_f64()), 24.9);
    assert_eq!(parsed["WND"].raw_value, 10);
    assert_eq!(tenths(parsed["WND"].value.as_f64()), 2.7);
    assert_eq!(parsed["D/N"].raw_value, 0);
    assert_eq!(parsed["RAN"].raw_value, 0);
    assert_eq!(label(&packet, "D/N"), "day");

    assert!(!packet.learn());
    assert!(!packet.contains_eep());
    assert_eq!(packet.rorg_func(), Some(0x13));
    assert_eq!(packet.rorg_type(), Some(0x01));
    assert_eq!(packet.status(), 0x00);
    assert_eq!(packet.repeater_count(), 0);
    assert_eq!(packet.sender_hex().as_deref(), Some("05:A0:8B:D6"));
}

#[test]
fn dimmer_power_measurement() {
    let store = store();
    let mut packet = parse_ok(&[
        0x55, 0x00, 0x0C, 0x07, 0x01, 0x96, 0xD2, 0x07, 0x60, 0x00, 0x00, 0x00, 0xFA, 0x01, 0x87,
        0xBC, 0x25, 0x00, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x40, 0x00, 0x74,
    ]);
    assert_eq!(
        packet.parse_eep(&store, 0x01, 0x09, None, None),
        vec!["CMD", "UN", "IO", "MV"]
    );
    assert_eq!(label(&packet, "UN"), "Power [W]");
    assert_eq!(label(&packet, "IO"), "Output channel 0 (to load)");
    assert_eq!(packet.parsed()["MV"].raw_value, 250);
    assert_eq!(packet.parsed()["MV"].value.as_f64(), Some(250.0));
}
