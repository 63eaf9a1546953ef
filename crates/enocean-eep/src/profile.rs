use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::bits;
use crate::catalog::{CommandSelector, DataSet, Field, ProfileKey, ProfileSpec};
use crate::error::{EepError, Result};

/// A resolved catalog entry for one RORG/FUNC/TYPE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub key: ProfileKey,
    pub description: String,
    pub func_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandSelector>,
    pub data: Vec<Arc<DataSet>>,
}

impl Profile {
    pub(crate) fn from_spec(
        key: ProfileKey,
        func_description: &str,
        spec: ProfileSpec,
    ) -> Result<Self> {
        let profile = Self {
            key,
            description: spec.description,
            func_description: func_description.to_string(),
            command: spec.command,
            data: spec.data.into_iter().map(Arc::new).collect(),
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Pick the field set for a telegram.
    ///
    /// Multi-command profiles resolve the command from `command` or, when not
    /// given, from the selector field in `payload`. A `direction` prefers the
    /// matching set and falls back to a set without direction.
    pub fn select(
        &self,
        direction: Option<u8>,
        command: Option<u8>,
        payload: &[u8],
    ) -> Option<Arc<DataSet>> {
        let command = match &self.command {
            Some(selector) => {
                let resolved = command.or_else(|| {
                    bits::read_bits(payload, selector.offset, selector.size)
                        .and_then(|raw| u8::try_from(raw).ok())
                });
                if resolved.is_none() {
                    debug!(profile = %self.key, "command selector not readable from payload");
                    return None;
                }
                resolved
            }
            None => None,
        };

        let candidates = self
            .data
            .iter()
            .filter(|set| command.is_none() || set.command == command);

        let selected = match direction {
            Some(direction) => {
                let candidates: Vec<&Arc<DataSet>> = candidates.collect();
                candidates
                    .iter()
                    .find(|set| set.direction == Some(direction))
                    .or_else(|| candidates.iter().find(|set| set.direction.is_none()))
                    .map(|set| Arc::clone(set))
            }
            None => candidates.cloned().next(),
        };

        if selected.is_none() {
            debug!(profile = %self.key, ?direction, ?command, "no matching field set");
        }
        selected
    }

    /// Directions offered by this profile, if any.
    pub fn directions(&self) -> Vec<u8> {
        let mut directions: Vec<u8> = self.data.iter().filter_map(|set| set.direction).collect();
        directions.dedup();
        directions
    }

    /// Commands offered by this profile, if any.
    pub fn commands(&self) -> Vec<u8> {
        let mut commands: Vec<u8> = self.data.iter().filter_map(|set| set.command).collect();
        commands.dedup();
        commands
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| EepError::InvalidCatalog {
            profile: self.key.to_string(),
            reason,
        };

        if self.data.is_empty() {
            return Err(invalid("profile has no data sets".into()));
        }
        if let Some(selector) = &self.command {
            if selector.size == 0 || selector.size > 8 {
                return Err(invalid(format!(
                    "command selector {} must be 1..=8 bits wide",
                    selector.shortcut
                )));
            }
        }

        for set in &self.data {
            let mut seen = HashSet::new();
            for field in &set.fields {
                if !seen.insert(field.shortcut()) {
                    return Err(invalid(format!("duplicate shortcut {}", field.shortcut())));
                }
                validate_field(field).map_err(invalid)?;
            }
        }
        Ok(())
    }
}

fn validate_field(field: &Field) -> std::result::Result<(), String> {
    let shortcut = field.shortcut();
    if field.size() == 0 || field.size() > bits::MAX_FIELD_BITS {
        return Err(format!(
            "field {shortcut} must be 1..={} bits wide",
            bits::MAX_FIELD_BITS
        ));
    }

    match field {
        Field::Value(value) => {
            if value.range.min == value.range.max {
                return Err(format!("field {shortcut} has an empty raw range"));
            }
            if value.scale.min == value.scale.max {
                return Err(format!("field {shortcut} has an empty scale"));
            }
        }
        Field::Enum(enumeration) => {
            if let Some(item) = enumeration.rangeitems.iter().find(|item| item.start > item.end) {
                return Err(format!(
                    "field {shortcut} has a reversed range item {}..{}",
                    item.start, item.end
                ));
            }
        }
        Field::Status(status) => {
            if status.offset + status.size > 8 {
                return Err(format!("status field {shortcut} exceeds the status byte"));
            }
        }
    }
    Ok(())
}
