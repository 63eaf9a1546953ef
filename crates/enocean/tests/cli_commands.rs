#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

const CONTACT_CLOSED: &str = "55000707017AD50901825DAB0001FFFFFFFF3600C7";
const SECURE_TEACH_IN_1: &str = "55000F07012B35244BC0FF456E4F6365019EB63B0000FFFFFFFF370071";
const SECURE_TEACH_IN_2: &str = "5500120701183540616E20476D62482E313300019EB63B0000FFFFFFFF3700F0";
const SECURE_A0_PRESSED: &str = "55000A0701EB30D0B518FB019EB63B0000FFFFFFFF37004D";
const PLAIN_A0_PRESSED: &str = "55000707017AF630019EB63B3000FFFFFFFF3700FB";

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "enocean-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn enocean(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_enocean"))
        .env_remove("ENOCEAN_CATALOG")
        .env_remove("ENOCEAN_SECURE_STORE")
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("enocean should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn decode_with_profile() {
    let output = enocean(&["decode", "--eep", "D5-00-01", CONTACT_CLOSED]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("\"sender\":\"01:82:5D:AB\""), "{stdout}");
    assert!(stdout.contains("\"eep\":\"D5-00-01\""), "{stdout}");
    assert!(stdout.contains("\"value\":\"closed\""), "{stdout}");
}

#[test]
fn decode_without_profile_reports_frame_only() {
    let output = enocean(&["decode", CONTACT_CLOSED]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains(&format!("\"telegram\":\"{CONTACT_CLOSED}\"")), "{stdout}");
    assert!(stdout.contains("\"rorg\":\"1BS\""), "{stdout}");
    assert!(!stdout.contains("\"fields\""), "{stdout}");
}

#[test]
fn decode_corrupt_telegram_returns_60() {
    let corrupt = CONTACT_CLOSED.replace("3600C7", "3600C8");
    let output = enocean(&["decode", &corrupt]);

    assert_eq!(output.status.code(), Some(60));
    assert!(stdout(&output).is_empty());
}

#[test]
fn decode_invalid_hex_returns_60() {
    let output = enocean(&["decode", "55zz"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn encode_magnetic_contact() {
    let output = enocean(&[
        "encode",
        "--eep",
        "D5-00-01",
        "--sender",
        "01:82:5D:AB",
        "--set",
        "CO=open",
    ]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(
        stdout.contains("\"telegram\":\"55000707017AD50801825DAB0003FFFFFFFFFF00BA\""),
        "{stdout}"
    );
    assert!(stdout.contains("\"value\":\"open\""), "{stdout}");
}

#[test]
fn encode_unknown_profile_returns_64() {
    let output = enocean(&["encode", "--eep", "A5-7F-7F"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn encode_invalid_enum_value_returns_64() {
    let output = enocean(&["encode", "--eep", "F6-02-02", "--set", "EB=inexisting"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("EB"));
}

#[test]
fn secure_teach_in_decrypt_and_replay() {
    let dir = unique_temp_dir("secure");
    let store = dir.join("secure.json");
    let store_arg = store.to_str().expect("temp path should be UTF-8");

    let unpaired = enocean(&["decode", "--secure-store", store_arg, SECURE_A0_PRESSED]);
    assert_eq!(unpaired.status.code(), Some(1));

    let output = enocean(&[
        "decode",
        "--secure-store",
        store_arg,
        "--allow-teach-in",
        SECURE_TEACH_IN_1,
        SECURE_TEACH_IN_2,
        SECURE_A0_PRESSED,
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = stdout(&output);
    let last = stdout.lines().last().expect("three telegrams printed");
    assert!(last.contains(&format!("\"telegram\":\"{PLAIN_A0_PRESSED}\"")), "{last}");
    assert!(last.contains("\"value\":\"Button AO\""), "{last}");
    assert!(last.contains("\"value\":\"pressed\""), "{last}");

    let saved = std::fs::read_to_string(&store).expect("store should be saved");
    assert!(saved.contains("019EB63B"), "{saved}");

    let replay = enocean(&["decode", "--secure-store", store_arg, SECURE_A0_PRESSED]);
    assert_eq!(replay.status.code(), Some(60));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn teach_in_without_store_is_usage_error() {
    let output = enocean(&["decode", "--allow-teach-in", SECURE_TEACH_IN_1]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn profiles_lists_catalog() {
    let output = enocean(&["profiles", "--rorg", "A5"]);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("\"eep\":\"A5-02-05\""), "{stdout}");
    assert!(!stdout.contains("\"eep\":\"F6-"), "{stdout}");
}

#[test]
fn missing_catalog_file_fails() {
    let dir = unique_temp_dir("catalog");
    let missing = dir.join("missing.json");
    let output = enocean(&[
        "--catalog",
        missing.to_str().expect("temp path should be UTF-8"),
        "profiles",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_reports_package() {
    let output = enocean(&["version"]);

    assert!(output.status.success());
    assert!(stdout(&output).starts_with("enocean "));
}
