use std::io::BufRead;

use enocean_eep::ProfileStore;
use enocean_packet::{rorg, Packet, ParseResult};
use enocean_secure::{SecureStore, TeachInPolicy};
use tracing::{debug, warn};

use crate::cmd::{Context, DecodeArgs};
use crate::exit::{
    io_error, packet_error, secure_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE,
};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: DecodeArgs, ctx: &Context) -> CliResult<i32> {
    if args.allow_teach_in && args.secure_store.is_none() {
        return Err(CliError::new(USAGE, "--allow-teach-in requires --secure-store"));
    }

    let profiles = ctx.profiles()?;
    let mut secure = match &args.secure_store {
        Some(path) => {
            let mut store = SecureStore::open(path).map_err(|err| {
                secure_error(&format!("failed to open secure store {}", path.display()), err)
            })?;
            if args.allow_teach_in {
                store.allow_teach_in(TeachInPolicy {
                    min_dbm: args.teach_in_min_dbm,
                    ..TeachInPolicy::default()
                });
            }
            Some(store)
        }
        None => None,
    };

    let inputs = if args.telegrams.is_empty() {
        read_stdin()?
    } else {
        args.telegrams.clone()
    };

    let mut code = SUCCESS;
    for input in &inputs {
        if let Err(err) = decode_input(input, &profiles, &args, secure.as_mut(), ctx.format) {
            eprintln!("error: {err}");
            code = err.code;
        }
    }
    Ok(code)
}

fn read_stdin() -> CliResult<Vec<String>> {
    let stdin = std::io::stdin();
    let mut inputs = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| io_error("failed to read stdin", err))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        inputs.push(line.to_string());
    }
    Ok(inputs)
}

/// Hex with optional whitespace or colon separators.
fn decode_hex(input: &str) -> CliResult<Vec<u8>> {
    let digits: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&digits)
        .map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex input {input:?}: {err}")))
}

/// Decode every telegram in one input. Keeps going past bad telegrams and
/// reports the first failure.
fn decode_input(
    input: &str,
    profiles: &ProfileStore,
    args: &DecodeArgs,
    mut secure: Option<&mut SecureStore>,
    format: OutputFormat,
) -> CliResult<()> {
    let bytes = decode_hex(input)?;
    let mut failure = None;
    let mut decoded = 0usize;

    let mut rest = bytes.as_slice();
    loop {
        let (result, remainder, packet) = Packet::parse(rest);
        rest = remainder;
        match (result, packet) {
            (ParseResult::Ok, Some(mut packet)) => {
                decoded += 1;
                if let Err(err) = process(&mut packet, profiles, args, secure.as_deref_mut()) {
                    failure = failure.or(Some(err));
                }
                let telegram = packet
                    .build()
                    .map_err(|err| packet_error("failed to serialize telegram", err))?;
                print_packet(&packet, &telegram, format);
            }
            (ParseResult::CrcMismatch, _) => {
                failure = failure.or(Some(CliError::new(DATA_INVALID, "dropped corrupt telegram")));
            }
            _ => break,
        }
    }

    if !rest.is_empty() {
        if decoded == 0 {
            failure = failure.or(Some(CliError::new(DATA_INVALID, "incomplete telegram")));
        } else {
            warn!(bytes = rest.len(), "ignoring trailing bytes");
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn process(
    packet: &mut Packet,
    profiles: &ProfileStore,
    args: &DecodeArgs,
    secure: Option<&mut SecureStore>,
) -> CliResult<()> {
    if packet.radio().is_none() {
        return Ok(());
    }

    if let Some(store) = secure {
        match packet.rorg() {
            rorg::SEC_TI => {
                store
                    .teach_in(profiles, packet)
                    .map_err(|err| secure_error("secure teach-in failed", err))?;
                return Ok(());
            }
            rorg::SEC => {
                let device = store
                    .decrypt(packet)
                    .map_err(|err| secure_error("secure telegram rejected", err))?;
                let translated = device
                    .translate_application(profiles, packet)
                    .map_err(|err| secure_error("secure translation failed", err))?;
                if translated {
                    device
                        .translate_profile(profiles, packet)
                        .map_err(|err| secure_error("secure translation failed", err))?;
                    return Ok(());
                }
            }
            _ => {}
        }
    }

    let Some(key) = args.eep else {
        return Ok(());
    };
    if key.rorg != packet.rorg() {
        warn!(
            profile = %key,
            rorg = packet.rorg(),
            "telegram RORG does not match requested profile"
        );
        return Ok(());
    }
    let fields = packet.parse_eep(profiles, key.func, key.type_, args.direction, args.command);
    debug!(profile = %key, fields = fields.len(), "telegram decoded");
    Ok(())
}
