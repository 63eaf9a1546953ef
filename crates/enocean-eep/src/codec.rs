//! Field decode/encode between raw payload bits and scaled or symbolic values.

use std::fmt;

use serde::Serialize;

use crate::bits;
use crate::catalog::{EnumField, Field, StatusField, ValueField};
use crate::error::{EepError, Result};

/// Decoded form of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Label(String),
    Flag(bool),
    /// Enum raw value with no matching item or range item.
    Unmapped,
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            FieldValue::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Label(label) => f.write_str(label),
            FieldValue::Flag(flag) => write!(f, "{flag}"),
            FieldValue::Unmapped => f.write_str("unmapped"),
        }
    }
}

/// One decoded field as stored in a packet's parsed map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedField {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub value: FieldValue,
    pub raw_value: u32,
}

/// Value supplied when encoding a field.
#[derive(Debug, Clone, PartialEq)]
pub enum EepValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl EepValue {
    /// Interpret command-line style input: integer, then float, else text.
    pub fn parse_loose(input: &str) -> Self {
        if let Ok(value) = input.parse::<i64>() {
            EepValue::Int(value)
        } else if let Ok(value) = input.parse::<f64>() {
            EepValue::Float(value)
        } else {
            EepValue::Text(input.to_string())
        }
    }
}

impl fmt::Display for EepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EepValue::Int(value) => write!(f, "{value}"),
            EepValue::Float(value) => write!(f, "{value}"),
            EepValue::Text(text) => write!(f, "{text:?}"),
            EepValue::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

macro_rules! eep_value_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for EepValue {
            fn from(value: $ty) -> Self {
                EepValue::Int(i64::from(value))
            }
        })*
    };
}

eep_value_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<f64> for EepValue {
    fn from(value: f64) -> Self {
        EepValue::Float(value)
    }
}

impl From<bool> for EepValue {
    fn from(value: bool) -> Self {
        EepValue::Bool(value)
    }
}

impl From<&str> for EepValue {
    fn from(value: &str) -> Self {
        EepValue::Text(value.to_string())
    }
}

impl From<String> for EepValue {
    fn from(value: String) -> Self {
        EepValue::Text(value)
    }
}

/// Decode one field from the payload bits (or the status byte for status fields).
pub fn decode_field(field: &Field, payload: &[u8], status: u8) -> Result<DecodedField> {
    let raw = match field {
        Field::Status(status_field) => read(field, &[status], status_field.offset)?,
        _ => read(field, payload, field.offset())?,
    };

    let value = match field {
        Field::Value(value_field) => FieldValue::Number(scale(value_field, raw)),
        Field::Enum(enum_field) => enum_label(enum_field, raw)
            .map(FieldValue::Label)
            .unwrap_or(FieldValue::Unmapped),
        Field::Status(_) => FieldValue::Flag(raw != 0),
    };

    Ok(DecodedField {
        description: field.description().to_string(),
        unit: field.unit().map(str::to_string),
        value,
        raw_value: raw,
    })
}

/// Encode one field into `payload` (or `status` for status fields).
///
/// On error neither buffer is modified.
pub fn encode_field(
    field: &Field,
    value: &EepValue,
    payload: &mut [u8],
    status: &mut u8,
) -> Result<()> {
    match field {
        Field::Value(value_field) => {
            let raw = unscale(value_field, value)?;
            write(field, payload, raw)
        }
        Field::Enum(enum_field) => {
            let raw = enum_raw(enum_field, value)?;
            write(field, payload, raw)
        }
        Field::Status(status_field) => {
            let raw = status_raw(status_field, value)?;
            let mut byte = [*status];
            write(field, &mut byte, raw)?;
            *status = byte[0];
            Ok(())
        }
    }
}

fn read(field: &Field, bytes: &[u8], offset: usize) -> Result<u32> {
    bits::read_bits(bytes, offset, field.size()).ok_or_else(|| out_of_bounds(field, bytes))
}

fn write(field: &Field, bytes: &mut [u8], raw: u32) -> Result<()> {
    if bits::write_bits(bytes, field.offset(), field.size(), raw) {
        Ok(())
    } else {
        Err(out_of_bounds(field, bytes))
    }
}

fn out_of_bounds(field: &Field, bytes: &[u8]) -> EepError {
    EepError::OutOfBounds {
        shortcut: field.shortcut().to_string(),
        offset: field.offset(),
        size: field.size(),
        available: bytes.len() * 8,
    }
}

fn scale(field: &ValueField, raw: u32) -> f64 {
    let (rmin, rmax) = (field.range.min, field.range.max);
    let (smin, smax) = (field.scale.min, field.scale.max);
    (f64::from(raw) - rmin) * (smax - smin) / (rmax - rmin) + smin
}

fn unscale(field: &ValueField, value: &EepValue) -> Result<u32> {
    let scaled = match value {
        EepValue::Int(value) => *value as f64,
        EepValue::Float(value) => *value,
        EepValue::Text(_) | EepValue::Bool(_) => {
            return Err(EepError::InvalidValue {
                shortcut: field.shortcut.clone(),
                reason: format!("expected a number, got {value}"),
            })
        }
    };
    if !scaled.is_finite() {
        return Err(EepError::InvalidValue {
            shortcut: field.shortcut.clone(),
            reason: format!("{scaled} is not a finite number"),
        });
    }

    let (rmin, rmax) = (field.range.min, field.range.max);
    let (smin, smax) = (field.scale.min, field.scale.max);
    let raw = ((scaled - smin) * (rmax - rmin) / (smax - smin) + rmin).trunc();

    // Raw values past the nominal range still decode, so any raw value the
    // field width can hold is accepted back.
    let highest = f64::from(bits::max_raw(field.size));
    if !(0.0..=highest).contains(&raw) {
        return Err(EepError::InvalidValue {
            shortcut: field.shortcut.clone(),
            reason: format!(
                "{scaled}{} does not fit in {} bits",
                field.unit.as_deref().map(|u| format!(" {u}")).unwrap_or_default(),
                field.size
            ),
        });
    }
    Ok(raw as u32)
}

fn enum_label(field: &EnumField, raw: u32) -> Option<String> {
    if let Some(item) = field.items.iter().find(|item| item.value == raw) {
        return Some(item.description.clone());
    }
    field
        .rangeitems
        .iter()
        .find(|item| item.contains(raw))
        .map(|item| item.description.replace("{value}", &raw.to_string()))
}

fn enum_raw(field: &EnumField, value: &EepValue) -> Result<u32> {
    let invalid = || EepError::EnumValueInvalid {
        shortcut: field.shortcut.clone(),
        value: value.to_string(),
    };

    let raw = match value {
        EepValue::Int(raw) => u32::try_from(*raw).map_err(|_| invalid())?,
        EepValue::Bool(flag) => u32::from(*flag),
        EepValue::Float(raw)
            if raw.fract() == 0.0 && *raw >= 0.0 && *raw <= f64::from(u32::MAX) =>
        {
            *raw as u32
        }
        EepValue::Float(_) => return Err(invalid()),
        EepValue::Text(label) => {
            return field
                .items
                .iter()
                .find(|item| item.description == *label)
                .map(|item| item.value)
                .ok_or_else(invalid)
        }
    };

    let known = field.items.iter().any(|item| item.value == raw)
        || field.rangeitems.iter().any(|item| item.contains(raw));
    if known {
        Ok(raw)
    } else {
        Err(invalid())
    }
}

fn status_raw(field: &StatusField, value: &EepValue) -> Result<u32> {
    match value {
        EepValue::Bool(flag) => Ok(u32::from(*flag)),
        EepValue::Int(raw @ (0 | 1)) => Ok(*raw as u32),
        EepValue::Text(text) if text.eq_ignore_ascii_case("true") => Ok(1),
        EepValue::Text(text) if text.eq_ignore_ascii_case("false") => Ok(0),
        _ => Err(EepError::InvalidValue {
            shortcut: field.shortcut.clone(),
            reason: format!("expected a boolean, got {value}"),
        }),
    }
}
