//! Attribute values, their persisted encoding, and per-attribute status.

use super::spec::AttributeKind;
use crate::error::{AttachError, Result};
use crate::model::{MapMode, SupportRef};
use crate::placement::Placement;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Runtime representation of an attribute value.
///
/// Used by the unified `get`/`set` API and by persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Links(Vec<SupportRef>),
    Mode(MapMode),
    Bool(bool),
    Float(f64),
    Placement(Placement),
}

impl AttrValue {
    /// The schema kind this value belongs to.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttrValue::Text(_) => AttributeKind::Text,
            AttrValue::Links(_) => AttributeKind::LinkSubList,
            AttrValue::Mode(_) => AttributeKind::Enum,
            AttrValue::Bool(_) => AttributeKind::Bool,
            AttrValue::Float(_) => AttributeKind::Float,
            AttrValue::Placement(_) => AttributeKind::Placement,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_links(&self) -> Option<&[SupportRef]> {
        match self {
            AttrValue::Links(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mode(&self) -> Option<MapMode> {
        match self {
            AttrValue::Mode(m) => Some(*m),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttrValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_placement(&self) -> Option<Placement> {
        match self {
            AttrValue::Placement(p) => Some(*p),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        let value = match self {
            AttrValue::Text(s) => Value::String(s.clone()),
            AttrValue::Links(links) => serde_json::to_value(links)?,
            AttrValue::Mode(mode) => Value::String(mode.name().to_string()),
            AttrValue::Bool(v) => Value::Bool(*v),
            AttrValue::Float(v) => serde_json::to_value(v)?,
            AttrValue::Placement(p) => serde_json::to_value(p)?,
        };
        Ok(value)
    }

    /// Decode a stored value of the given kind.
    ///
    /// A single `LinkSub` decodes into a one-element (or empty, for `null`)
    /// `Links` value so callers only ever see the list form.
    pub fn from_json(kind: AttributeKind, value: &Value) -> Result<Self> {
        let decoded = match kind {
            AttributeKind::Text => AttrValue::Text(
                value
                    .as_str()
                    .ok_or_else(|| restore_error(kind, value))?
                    .to_string(),
            ),
            AttributeKind::LinkSubList => AttrValue::Links(decode(kind, value)?),
            AttributeKind::LinkSub => {
                let single: Option<SupportRef> = decode(kind, value)?;
                AttrValue::Links(single.into_iter().collect())
            }
            AttributeKind::Enum => {
                let name = value.as_str().ok_or_else(|| restore_error(kind, value))?;
                AttrValue::Mode(name.parse().map_err(AttachError::Restore)?)
            }
            AttributeKind::Bool => {
                AttrValue::Bool(value.as_bool().ok_or_else(|| restore_error(kind, value))?)
            }
            AttributeKind::Float => {
                AttrValue::Float(value.as_f64().ok_or_else(|| restore_error(kind, value))?)
            }
            AttributeKind::Placement => AttrValue::Placement(decode(kind, value)?),
        };
        Ok(decoded)
    }
}

fn decode<T: DeserializeOwned>(kind: AttributeKind, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|_| restore_error(kind, value))
}

fn restore_error(kind: AttributeKind, value: &Value) -> AttachError {
    AttachError::Restore(format!(
        "cannot read {} from stored value {}",
        kind.type_name(),
        value
    ))
}

/// Editor-facing status of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttrStatus {
    pub hidden: bool,
    pub read_only: bool,
}
