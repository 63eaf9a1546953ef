//! Catalog document shape and the field descriptors built from it.
//!
//! The catalog is a JSON tree `telegrams -> functions -> profiles -> data -> fields`.
//! Numeric identifiers (`rorg`, `func`, `type`) may be written as `"0xA5"` strings
//! or plain integers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level catalog document.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub version: Option<String>,
    pub telegrams: Vec<TelegramSpec>,
}

/// All functions of one RORG.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSpec {
    #[serde(deserialize_with = "hex_byte")]
    pub rorg: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub functions: Vec<FunctionSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionSpec {
    #[serde(deserialize_with = "hex_byte")]
    pub func: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub profiles: Vec<ProfileSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSpec {
    #[serde(rename = "type", deserialize_with = "hex_byte")]
    pub type_: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub command: Option<CommandSelector>,
    pub data: Vec<DataSet>,
}

/// Field whose raw value picks the data set of a multi-command profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommandSelector {
    pub shortcut: String,
    #[serde(default)]
    pub description: String,
    pub offset: usize,
    pub size: usize,
}

/// One field list of a profile, optionally bound to a direction or command.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DataSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<u8>,
    /// Payload length in bytes for telegrams built from this set (VLD only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<usize>,
    pub fields: Vec<Field>,
}

impl DataSet {
    /// Find a field by shortcut.
    pub fn field(&self, shortcut: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.shortcut() == shortcut)
    }

    /// Field shortcuts in catalog order.
    pub fn shortcuts(&self) -> Vec<&str> {
        self.fields.iter().map(Field::shortcut).collect()
    }

    /// Smallest payload (in bytes) that holds every non-status field.
    pub fn min_payload_len(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| !matches!(field, Field::Status(_)))
            .map(|field| (field.offset() + field.size()).div_ceil(8))
            .max()
            .unwrap_or(0)
    }
}

/// A single field descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Field {
    Value(ValueField),
    Enum(EnumField),
    Status(StatusField),
}

impl Field {
    pub fn shortcut(&self) -> &str {
        match self {
            Field::Value(field) => &field.shortcut,
            Field::Enum(field) => &field.shortcut,
            Field::Status(field) => &field.shortcut,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Field::Value(field) => &field.description,
            Field::Enum(field) => &field.description,
            Field::Status(field) => &field.description,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            Field::Value(field) => field.unit.as_deref(),
            Field::Enum(field) => field.unit.as_deref(),
            Field::Status(_) => None,
        }
    }

    pub fn offset(&self) -> usize {
        match self {
            Field::Value(field) => field.offset,
            Field::Enum(field) => field.offset,
            Field::Status(field) => field.offset,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Field::Value(field) => field.size,
            Field::Enum(field) => field.size,
            Field::Status(field) => field.size,
        }
    }
}

/// Linearly scaled numeric field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValueField {
    pub shortcut: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub offset: usize,
    pub size: usize,
    pub range: Bounds,
    pub scale: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Symbolic field mapped through discrete items and/or raw ranges.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnumField {
    pub shortcut: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub offset: usize,
    pub size: usize,
    #[serde(default)]
    pub items: Vec<EnumItem>,
    #[serde(default)]
    pub rangeitems: Vec<RangeItem>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnumItem {
    pub value: u32,
    pub description: String,
}

/// Contiguous raw range sharing one label; `{value}` in the label is replaced by the raw value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RangeItem {
    pub start: u32,
    pub end: u32,
    pub description: String,
}

impl RangeItem {
    pub fn contains(&self, raw: u32) -> bool {
        (self.start..=self.end).contains(&raw)
    }
}

/// Bit of the radio status byte.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StatusField {
    pub shortcut: String,
    #[serde(default)]
    pub description: String,
    pub offset: usize,
    #[serde(default = "one_bit")]
    pub size: usize,
}

fn one_bit() -> usize {
    1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ByteRepr {
    Int(u64),
    Text(String),
}

fn hex_byte<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match ByteRepr::deserialize(deserializer)? {
        ByteRepr::Int(value) => u8::try_from(value).ok(),
        ByteRepr::Text(text) => parse_byte(&text),
    };
    parsed.ok_or_else(|| serde::de::Error::custom("expected a byte as 0x00..0xFF or 0..255"))
}

/// Parse `"0xA5"`, `"A5"` (hex) style identifiers.
pub fn parse_byte(text: &str) -> Option<u8> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u8::from_str_radix(digits, 16).ok()
}

/// Identifies a profile in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProfileKey {
    pub rorg: u8,
    pub func: u8,
    #[serde(rename = "type")]
    pub type_: u8,
}

impl ProfileKey {
    pub const fn new(rorg: u8, func: u8, type_: u8) -> Self {
        Self { rorg, func, type_ }
    }
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}-{:02X}-{:02X}", self.rorg, self.func, self.type_)
    }
}

impl std::str::FromStr for ProfileKey {
    type Err = String;

    /// Parses `A5-02-05` (dashes or colons).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(['-', ':']).collect();
        if parts.len() != 3 {
            return Err(format!("expected RORG-FUNC-TYPE, got {s:?}"));
        }
        let byte = |part: &str| {
            parse_byte(part).ok_or_else(|| format!("invalid hex byte {part:?}"))
        };
        Ok(Self::new(byte(parts[0])?, byte(parts[1])?, byte(parts[2])?))
    }
}
