use std::collections::BTreeMap;
use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use enocean_eep::{DecodedField, Profile};
use enocean_frame::packet_type_name;
use enocean_packet::{rorg, Event, Packet, RadioInfo, Response, UteInfo};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PacketOutput<'a> {
    packet_type: u8,
    packet_type_name: &'static str,
    telegram: String,
    data: String,
    optional: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rorg: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    radio: Option<&'a RadioInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ute: Option<&'a UteInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<&'a Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    eep: Option<String>,
    #[serde(skip_serializing_if = "no_fields")]
    fields: &'a BTreeMap<String, DecodedField>,
}

impl<'a> PacketOutput<'a> {
    fn new(packet: &'a Packet, telegram: &[u8]) -> Self {
        let radio = packet.radio();
        Self {
            packet_type: packet.packet_type(),
            packet_type_name: packet_type_name(packet.packet_type()),
            telegram: hex::encode_upper(telegram),
            data: hex::encode_upper(packet.data()),
            optional: hex::encode_upper(packet.optional()),
            rorg: radio.map(|_| rorg::rorg_name(packet.rorg())),
            sender: packet.sender_hex(),
            destination: packet.destination_hex(),
            radio,
            ute: packet.ute(),
            response: packet.response(),
            event: packet.event(),
            eep: eep_label(packet),
            fields: packet.parsed(),
        }
    }
}

fn no_fields(fields: &&BTreeMap<String, DecodedField>) -> bool {
    fields.is_empty()
}

fn eep_label(packet: &Packet) -> Option<String> {
    if let Some(selected) = packet.selected_profile() {
        return Some(selected.key.to_string());
    }
    match (packet.rorg_func(), packet.rorg_type()) {
        (Some(func), Some(type_)) => Some(format!("{:02X}-{func:02X}-{type_:02X}", packet.rorg())),
        _ => None,
    }
}

/// Print one packet. `telegram` is its serialized wire form.
pub fn print_packet(packet: &Packet, telegram: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = PacketOutput::new(packet, telegram);
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "RORG", "SENDER", "DBM", "EEP", "TELEGRAM"])
                .add_row(vec![
                    packet_type_name(packet.packet_type()).to_string(),
                    packet
                        .radio()
                        .map(|_| rorg::rorg_name(packet.rorg()).to_string())
                        .unwrap_or_default(),
                    packet.sender_hex().unwrap_or_default(),
                    packet.dbm().map(|dbm| dbm.to_string()).unwrap_or_default(),
                    eep_label(packet).unwrap_or_default(),
                    hex::encode_upper(telegram),
                ]);
            println!("{table}");
            if !packet.parsed().is_empty() {
                println!("{}", fields_table(packet.parsed()));
            }
        }
        OutputFormat::Pretty => println!("{packet}"),
        OutputFormat::Raw => print_raw(telegram),
    }
}

fn fields_table(fields: &BTreeMap<String, DecodedField>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["FIELD", "DESCRIPTION", "VALUE", "UNIT", "RAW"]);
    for (shortcut, field) in fields {
        table.add_row(vec![
            shortcut.clone(),
            field.description.clone(),
            field.value.to_string(),
            field.unit.clone().unwrap_or_default(),
            field.raw_value.to_string(),
        ]);
    }
    table
}

#[derive(Serialize)]
struct ProfileOutput<'a> {
    eep: String,
    description: &'a str,
    func_description: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    directions: Vec<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    commands: Vec<u8>,
}

pub fn print_profiles<'a, I>(profiles: I, format: OutputFormat)
where
    I: IntoIterator<Item = &'a Profile>,
{
    let rows: Vec<ProfileOutput<'_>> = profiles
        .into_iter()
        .map(|profile| ProfileOutput {
            eep: profile.key.to_string(),
            description: &profile.description,
            func_description: &profile.func_description,
            directions: profile.directions(),
            commands: profile.commands(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            for row in &rows {
                println!(
                    "{}",
                    serde_json::to_string(row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["EEP", "FUNCTION", "TYPE", "DIRECTIONS", "COMMANDS"]);
            for row in &rows {
                table.add_row(vec![
                    row.eep.clone(),
                    row.func_description.to_string(),
                    row.description.to_string(),
                    join(&row.directions),
                    join(&row.commands),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &rows {
                println!("{} {}", row.eep, row.description);
            }
        }
    }
}

fn join(values: &[u8]) -> String {
    values
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
