//! Legacy attribute names.
//!
//! Documents written by older versions stored some attachment attributes
//! under names (or types) that no longer exist. Each [`MigrationRule`]
//! matches one historical `(name, type)` pair and writes its value into the
//! current schema. Rules are tried in order; anything unmatched is offered
//! to the host.

use super::AttachExtension;
use crate::attributes::{AttrValue, AttributeKind, MAP_MODE, OFFSET, SUPPORT};
use crate::error::Result;
use crate::host::HostObject;
use crate::model::MapMode;
use serde_json::Value;
use tracing::debug;

pub struct MigrationRule {
    pub name: &'static str,
    pub stored_kind: AttributeKind,
    pub migrate: fn(&mut AttachExtension, &Value) -> Result<()>,
}

impl MigrationRule {
    pub fn matches(&self, name: &str, type_name: &str) -> bool {
        self.name == name && self.stored_kind.type_name() == type_name
    }
}

pub const MIGRATIONS: &[MigrationRule] = &[
    MigrationRule {
        name: "superPlacement",
        stored_kind: AttributeKind::Placement,
        migrate: migrate_offset,
    },
    // Earliest format: a single face reference, always flat-face mapped.
    MigrationRule {
        name: "Support",
        stored_kind: AttributeKind::LinkSub,
        migrate: migrate_single_support,
    },
    MigrationRule {
        name: "Support",
        stored_kind: AttributeKind::LinkSubList,
        migrate: migrate_support_list,
    },
];

fn migrate_offset(ext: &mut AttachExtension, value: &Value) -> Result<()> {
    let offset = AttrValue::from_json(AttributeKind::Placement, value)?;
    ext.attrs.set(OFFSET, offset)?;
    Ok(())
}

fn migrate_single_support(ext: &mut AttachExtension, value: &Value) -> Result<()> {
    let support = AttrValue::from_json(AttributeKind::LinkSub, value)?;
    ext.attrs.set(SUPPORT, support)?;
    ext.attrs.set(MAP_MODE, AttrValue::Mode(MapMode::FlatFace))?;
    Ok(())
}

fn migrate_support_list(ext: &mut AttachExtension, value: &Value) -> Result<()> {
    let support = AttrValue::from_json(AttributeKind::LinkSubList, value)?;
    ext.attrs.set(SUPPORT, support)?;
    Ok(())
}

impl AttachExtension {
    /// Map a stored attribute the current schema does not know.
    ///
    /// Returns `Ok(true)` when a migration rule or the host consumed it.
    pub fn handle_renamed_attribute<H: HostObject>(
        &mut self,
        host: &mut H,
        name: &str,
        type_name: &str,
        value: &Value,
    ) -> Result<bool> {
        if let Some(rule) = MIGRATIONS.iter().find(|rule| rule.matches(name, type_name)) {
            (rule.migrate)(self, value)?;
            debug!(attribute = name, stored_type = type_name, "migrated legacy attribute");
            return Ok(true);
        }
        Ok(host.handle_renamed_attribute(name, type_name, value))
    }
}
