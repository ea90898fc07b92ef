//! # Persistence
//!
//! The controller's attributes are stored as `(name, type, value)` tuples,
//! the same shape a host document uses for every attribute it persists.
//! Keeping the stored type next to the value is what lets older documents
//! be recognised and migrated: a name the current schema knows, stored with
//! the type it currently has, restores directly; anything else goes through
//! the legacy rules in [`crate::extension::MIGRATIONS`].
//!
//! [`Document`] is a self-contained JSON file holding one attached object
//! plus the geometry it refers to. [`Session`] is a loaded document: the
//! controller, its in-memory host and the geometry catalog wired together.

use crate::attributes::{get_spec, AttrValue, ATTRIBUTES};
use crate::config::AttacherConfig;
use crate::engine::EngineRegistry;
use crate::error::Result;
use crate::extension::{AttachExtension, VisibilityReport};
use crate::geometry::ShapeCatalog;
use crate::host::memory::MemoryHost;
use crate::host::HostObject;
use crate::placement::Placement;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: Value,
}

impl StoredAttribute {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value,
        }
    }
}

impl AttachExtension {
    /// Current attributes in stored form, in schema order.
    pub fn save_attributes(&self) -> Result<Vec<StoredAttribute>> {
        ATTRIBUTES
            .iter()
            .filter_map(|spec| self.get(spec.name).map(|value| (spec, value)))
            .map(|(spec, value)| {
                Ok(StoredAttribute::new(
                    spec.name,
                    spec.kind.type_name(),
                    value.to_json()?,
                ))
            })
            .collect()
    }

    /// Load stored attributes, then run the post-load update.
    ///
    /// The host is flagged as restoring while attributes are applied, so
    /// individual writes do not trigger resolution. A stored engine type
    /// that cannot be installed, or a value that cannot be decoded, aborts
    /// the restore.
    pub fn restore<H: HostObject>(
        &mut self,
        host: &mut H,
        stored: &[StoredAttribute],
    ) -> Result<VisibilityReport> {
        host.set_restoring(true);
        let loaded = self.restore_attributes(host, stored);
        host.set_restoring(false);
        loaded?;
        Ok(self.on_document_restored(host))
    }

    fn restore_attributes<H: HostObject>(
        &mut self,
        host: &mut H,
        stored: &[StoredAttribute],
    ) -> Result<()> {
        for attr in stored {
            let current = get_spec(&attr.name).filter(|spec| spec.kind.type_name() == attr.type_name);
            if let Some(spec) = current {
                let value = AttrValue::from_json(spec.kind, &attr.value)?;
                self.set(host, spec.name, value)?;
                continue;
            }
            if !self.handle_renamed_attribute(host, &attr.name, &attr.type_name, &attr.value)? {
                warn!(
                    attribute = %attr.name,
                    stored_type = %attr.type_name,
                    "stored attribute not recognised, skipped"
                );
            }
        }
        Ok(())
    }
}

/// A stored attached object with the geometry it refers to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub geometry: ShapeCatalog,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub attributes: Vec<StoredAttribute>,
}

impl Document {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let document = serde_json::from_str(&content)?;
        debug!(path = %path.as_ref().display(), "document loaded");
        Ok(document)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

/// A loaded document: controller, host and geometry.
pub struct Session {
    pub extension: AttachExtension,
    pub host: MemoryHost,
    geometry: Rc<ShapeCatalog>,
}

impl Session {
    /// Build the controller for `document` and run the restore flow.
    pub fn open(document: &Document, config: &AttacherConfig) -> Result<(Self, VisibilityReport)> {
        let geometry = Rc::new(document.geometry.clone());
        let registry = Rc::new(EngineRegistry::with_builtins(geometry.clone()));
        let mut extension = AttachExtension::new(registry, config)?;
        let mut host = MemoryHost::with_placement(document.placement);

        let report = extension.restore(&mut host, &document.attributes)?;
        host.purge_touched();
        Ok((
            Self {
                extension,
                host,
                geometry,
            },
            report,
        ))
    }

    pub fn geometry(&self) -> &ShapeCatalog {
        &self.geometry
    }

    /// Write an attribute and report the resulting editor status.
    pub fn set(&mut self, name: &str, value: AttrValue) -> Result<VisibilityReport> {
        self.extension.set(&mut self.host, name, value)?;
        Ok(self.extension.current_visibility(&self.host))
    }

    pub fn to_document(&self) -> Result<Document> {
        Ok(Document {
            geometry: (*self.geometry).clone(),
            placement: self.host.resolved().unwrap_or_default(),
            attributes: self.extension.save_attributes()?,
        })
    }
}
