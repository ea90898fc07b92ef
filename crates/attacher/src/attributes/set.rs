//! The concrete attribute values owned by one attachment controller.

use super::spec::{
    get_spec, AttributeKind, ATTACHER_TYPE, ATTRIBUTES, MAP_MODE, MAP_REVERSED, OFFSET,
    PATH_PARAMETER, SUPPORT,
};
use super::value::{AttrStatus, AttrValue};
use crate::error::{AttachError, Result};
use crate::model::{MapMode, SupportRef};
use crate::placement::Placement;
use std::collections::HashMap;

/// Typed storage for the attachment attributes plus their editor status.
///
/// Every write goes through a compare-before-write check and reports
/// whether the stored value actually changed, so a caller that reacts to
/// changes can stop when a write is a no-op.
#[derive(Debug, Clone)]
pub struct AttributeSet {
    attacher_type: String,
    support: Vec<SupportRef>,
    mode: MapMode,
    reversed: bool,
    path_parameter: f64,
    offset: Placement,
    status: HashMap<&'static str, AttrStatus>,
}

impl AttributeSet {
    pub fn new(attacher_type: impl Into<String>) -> Self {
        let status = ATTRIBUTES
            .iter()
            .map(|spec| {
                (
                    spec.name,
                    AttrStatus {
                        hidden: spec.hidden,
                        read_only: false,
                    },
                )
            })
            .collect();
        Self {
            attacher_type: attacher_type.into(),
            support: Vec::new(),
            mode: MapMode::Deactivated,
            reversed: false,
            path_parameter: 0.0,
            offset: Placement::identity(),
            status,
        }
    }

    pub fn attacher_type(&self) -> &str {
        &self.attacher_type
    }

    pub fn support(&self) -> &[SupportRef] {
        &self.support
    }

    pub fn mode(&self) -> MapMode {
        self.mode
    }

    pub fn reversed(&self) -> bool {
        self.reversed
    }

    pub fn path_parameter(&self) -> f64 {
        self.path_parameter
    }

    pub fn offset(&self) -> Placement {
        self.offset
    }

    pub fn get(&self, name: &str) -> Option<AttrValue> {
        let value = match name {
            ATTACHER_TYPE => AttrValue::Text(self.attacher_type.clone()),
            SUPPORT => AttrValue::Links(self.support.clone()),
            MAP_MODE => AttrValue::Mode(self.mode),
            MAP_REVERSED => AttrValue::Bool(self.reversed),
            PATH_PARAMETER => AttrValue::Float(self.path_parameter),
            OFFSET => AttrValue::Placement(self.offset),
            _ => return None,
        };
        Some(value)
    }

    /// Store `value` under `name`. Returns `Ok(false)` when the value is
    /// already current.
    pub fn set(&mut self, name: &str, value: AttrValue) -> Result<bool> {
        let spec = get_spec(name)
            .ok_or_else(|| AttachError::Config(format!("Unknown attachment attribute: {}", name)))?;
        if value.kind() != spec.kind {
            return Err(AttachError::Config(format!(
                "{} expects {}, got {}",
                name,
                spec.kind.type_name(),
                value.kind().type_name()
            )));
        }

        let changed = match (spec.kind, value) {
            (AttributeKind::Text, AttrValue::Text(v)) => replace(&mut self.attacher_type, v),
            (AttributeKind::LinkSubList, AttrValue::Links(v)) => replace(&mut self.support, v),
            (AttributeKind::Enum, AttrValue::Mode(v)) => replace(&mut self.mode, v),
            (AttributeKind::Bool, AttrValue::Bool(v)) => replace(&mut self.reversed, v),
            (AttributeKind::Float, AttrValue::Float(v)) => replace(&mut self.path_parameter, v),
            (AttributeKind::Placement, AttrValue::Placement(v)) => replace(&mut self.offset, v),
            _ => false,
        };
        Ok(changed)
    }

    pub fn status(&self, name: &str) -> AttrStatus {
        self.status.get(name).copied().unwrap_or_default()
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        self.status(name).hidden
    }

    pub(crate) fn set_hidden(&mut self, name: &'static str, hidden: bool) {
        self.status.entry(name).or_default().hidden = hidden;
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectId;

    #[test]
    fn defaults_match_schema() {
        let attrs = AttributeSet::new("AttachEngine3D");
        assert_eq!(attrs.attacher_type(), "AttachEngine3D");
        assert_eq!(attrs.mode(), MapMode::Deactivated);
        assert!(attrs.support().is_empty());
        assert!(attrs.is_hidden(ATTACHER_TYPE));
        assert!(attrs.is_hidden(PATH_PARAMETER));
        assert!(!attrs.is_hidden(MAP_MODE));
    }

    #[test]
    fn set_reports_changes_only() {
        let mut attrs = AttributeSet::new("AttachEngine3D");
        assert!(attrs
            .set(MAP_MODE, AttrValue::Mode(MapMode::FlatFace))
            .unwrap());
        assert!(!attrs
            .set(MAP_MODE, AttrValue::Mode(MapMode::FlatFace))
            .unwrap());
        assert_eq!(attrs.mode(), MapMode::FlatFace);
    }

    #[test]
    fn set_rejects_kind_mismatch() {
        let mut attrs = AttributeSet::new("AttachEngine3D");
        let err = attrs.set(MAP_REVERSED, AttrValue::Float(1.0)).unwrap_err();
        assert!(matches!(err, AttachError::Config(_)));
        assert!(!attrs.reversed());
    }

    #[test]
    fn set_rejects_unknown_name() {
        let mut attrs = AttributeSet::new("AttachEngine3D");
        assert!(attrs.set("Placement", AttrValue::Bool(true)).is_err());
    }

    #[test]
    fn get_returns_stored_support() {
        let mut attrs = AttributeSet::new("AttachEngine3D");
        let links = vec![SupportRef::new(ObjectId::new(), "Edge1")];
        attrs.set(SUPPORT, AttrValue::Links(links.clone())).unwrap();
        assert_eq!(attrs.get(SUPPORT), Some(AttrValue::Links(links)));
        assert_eq!(attrs.get("Nope"), None);
    }
}
