use enocean_eep::EepValue;
use enocean_packet::{parse_address, CreateOptions, Packet};
use tracing::debug;

use crate::cmd::{Context, EncodeArgs};
use crate::exit::{packet_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::print_packet;

pub fn run(args: EncodeArgs, ctx: &Context) -> CliResult<i32> {
    let profiles = ctx.profiles()?;

    let mut options = CreateOptions::new(args.eep.rorg, args.eep.func, args.eep.type_);
    options.direction = args.direction;
    options.command = args.command;
    options.learn = args.learn;
    if let Some(sender) = &args.sender {
        options.sender = address_arg("--sender", sender)?;
    }
    if let Some(destination) = &args.destination {
        options.destination = address_arg("--destination", destination)?;
    }

    let values = args
        .values
        .iter()
        .map(|assignment| parse_assignment(assignment))
        .collect::<CliResult<Vec<_>>>()?;
    debug!(profile = %args.eep, values = values.len(), "creating telegram");

    let packet = Packet::create(&profiles, &options, values)
        .map_err(|err| packet_error(&format!("failed to create {} telegram", args.eep), err))?;
    let telegram = packet
        .build()
        .map_err(|err| packet_error("failed to serialize telegram", err))?;
    print_packet(&packet, &telegram, ctx.format);
    Ok(SUCCESS)
}

fn address_arg(flag: &str, text: &str) -> CliResult<[u8; 4]> {
    parse_address(text)
        .ok_or_else(|| CliError::new(USAGE, format!("{flag}: expected AA:BB:CC:DD, got {text:?}")))
}

/// `SHORTCUT=VALUE`; `true`/`false` become flags, numbers stay numeric.
fn parse_assignment(assignment: &str) -> CliResult<(&str, EepValue)> {
    let (shortcut, value) = assignment.split_once('=').ok_or_else(|| {
        CliError::new(USAGE, format!("--set: expected KEY=VALUE, got {assignment:?}"))
    })?;
    let shortcut = shortcut.trim();
    if shortcut.is_empty() {
        return Err(CliError::new(USAGE, format!("--set: missing field name in {assignment:?}")));
    }

    let value = match value.trim() {
        "true" => EepValue::Bool(true),
        "false" => EepValue::Bool(false),
        other => EepValue::parse_loose(other),
    };
    Ok((shortcut, value))
}
