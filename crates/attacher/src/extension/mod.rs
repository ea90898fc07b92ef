//! # Attach Extension
//!
//! [`AttachExtension`] is the attachment controller. It owns the six
//! attachment attributes and exactly one [`AttachEngine`], and it writes the
//! engine's result into the host object's placement.
//!
//! ## Flow
//!
//! ```text
//! set(attr) ──► on_changed(attr)
//!                 ├─ configuration attr (not restoring) ──► update_visibility
//!                 │                                          └─► resolve_placement ──► engine.compute
//!                 └─ AttacherType ──► change_engine_by_name ──► install_engine
//!                                          └─► update_visibility (swapped, not restoring)
//!
//! restore(stored) ──► set / handle_renamed_attribute (host restoring)
//!                 └─► on_document_restored ──► update_visibility
//!
//! execute (recompute) ──► resolve_placement, geometry errors become Runtime
//! ```
//!
//! ## Reentrancy
//!
//! Writing `AttacherType` swaps the engine, and swapping the engine writes
//! `AttacherType`. Every internal write is compare-before-write, so the
//! second leg is a no-op and the cycle ends after one step.
//!
//! ## Submodules
//!
//! - `lifecycle`: engine installation and swapping by name
//! - `resolve`: resolution workflow, active-state cache, recompute hook
//! - `visibility`: attribute visibility state machine
//! - `migration`: legacy attribute rules

use crate::attributes::{
    get_spec, AttrValue, AttributeSet, ATTACHER_TYPE, MAP_MODE, MAP_REVERSED, OFFSET,
    PATH_PARAMETER, SUPPORT,
};
use crate::config::AttacherConfig;
use crate::engine::{AttachEngine, EngineRegistry};
use crate::error::{AttachError, Result};
use crate::host::HostObject;
use crate::model::{ActiveState, MapMode, SupportRef};
use crate::placement::Placement;
use once_cell::unsync::OnceCell;
use std::cell::Cell;
use std::rc::Rc;
use uuid::Uuid;

mod lifecycle;
mod migration;
mod resolve;
mod visibility;

pub use migration::{MigrationRule, MIGRATIONS};
pub use visibility::VisibilityReport;

/// Opaque handle given to scripting callers.
///
/// Created once per controller and shared by reference count afterwards.
#[derive(Debug)]
pub struct ScriptObject {
    id: Uuid,
}

impl ScriptObject {
    pub const TYPE_NAME: &'static str = "AttachExtensionPy";

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }
}

pub struct AttachExtension {
    attrs: AttributeSet,
    engine: Option<Box<dyn AttachEngine>>,
    registry: Rc<EngineRegistry>,
    active: Cell<ActiveState>,
    mark_errors: bool,
    script: OnceCell<Rc<ScriptObject>>,
}

impl AttachExtension {
    /// Create a controller with the configured default engine installed.
    pub fn new(registry: Rc<EngineRegistry>, config: &AttacherConfig) -> Result<Self> {
        let mut extension = Self {
            attrs: AttributeSet::new(""),
            engine: None,
            registry,
            active: Cell::new(ActiveState::Unknown),
            mark_errors: config.mark_errors,
            script: OnceCell::new(),
        };
        let engine = extension
            .registry
            .create(&config.default_engine)
            .ok_or_else(|| AttachError::TypeMismatch(config.default_engine.clone()))?;
        extension.install_engine(Some(engine));
        Ok(extension)
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attrs
    }

    pub fn engine(&self) -> Option<&dyn AttachEngine> {
        self.engine.as_deref()
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn get(&self, name: &str) -> Option<AttrValue> {
        self.attrs.get(name)
    }

    /// Write an attachment attribute and run the change handler.
    ///
    /// The handler runs even when the value is unchanged, so re-setting a
    /// value re-resolves the attachment.
    pub fn set<H: HostObject>(&mut self, host: &mut H, name: &str, value: AttrValue) -> Result<()> {
        self.attrs.set(name, value)?;
        host.touch(name);
        self.on_changed(host, name)
    }

    pub fn set_support<H: HostObject>(&mut self, host: &mut H, support: Vec<SupportRef>) -> Result<()> {
        self.set(host, SUPPORT, AttrValue::Links(support))
    }

    pub fn set_mode<H: HostObject>(&mut self, host: &mut H, mode: MapMode) -> Result<()> {
        self.set(host, MAP_MODE, AttrValue::Mode(mode))
    }

    pub fn set_reversed<H: HostObject>(&mut self, host: &mut H, reversed: bool) -> Result<()> {
        self.set(host, MAP_REVERSED, AttrValue::Bool(reversed))
    }

    pub fn set_path_parameter<H: HostObject>(&mut self, host: &mut H, t: f64) -> Result<()> {
        self.set(host, PATH_PARAMETER, AttrValue::Float(t))
    }

    pub fn set_offset<H: HostObject>(&mut self, host: &mut H, offset: Placement) -> Result<()> {
        self.set(host, OFFSET, AttrValue::Placement(offset))
    }

    pub fn set_attacher_type<H: HostObject>(&mut self, host: &mut H, name: &str) -> Result<()> {
        self.set(host, ATTACHER_TYPE, AttrValue::Text(name.to_string()))
    }

    /// Change handler for the extension's own attributes.
    pub fn on_changed<H: HostObject>(&mut self, host: &mut H, name: &str) -> Result<()> {
        let triggers = get_spec(name).is_some_and(|spec| spec.triggers_update);
        if triggers && !host.is_restoring() {
            self.update_visibility(host);
        }

        if name == ATTACHER_TYPE {
            let requested = self.attrs.attacher_type().to_string();
            match self.change_engine_by_name(&requested) {
                Ok(true) if !host.is_restoring() => {
                    self.update_visibility(host);
                }
                Ok(_) => {}
                Err(err) => {
                    let live = self
                        .engine
                        .as_ref()
                        .map(|e| e.type_name().to_string())
                        .unwrap_or_default();
                    self.attrs.set(ATTACHER_TYPE, AttrValue::Text(live))?;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Scripting handle, created on first use.
    pub fn script_object(&self) -> Rc<ScriptObject> {
        self.script
            .get_or_init(|| Rc::new(ScriptObject { id: Uuid::new_v4() }))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;
    use crate::test_utils::{Script, TestEnv};

    #[test]
    fn new_installs_default_engine() {
        let env = TestEnv::new();
        let ext = env.extension();
        assert_eq!(ext.engine().unwrap().type_name(), "AttachEngine3D");
        assert_eq!(ext.attributes().attacher_type(), "AttachEngine3D");
        assert_eq!(ext.attributes().mode(), MapMode::Deactivated);
    }

    #[test]
    fn new_rejects_unknown_default_engine() {
        let env = TestEnv::new();
        let config = AttacherConfig {
            default_engine: "Bogus".into(),
            ..AttacherConfig::default()
        };
        let err = AttachExtension::new(env.registry.clone(), &config).err().unwrap();
        assert!(matches!(err, AttachError::TypeMismatch(ref n) if n == "Bogus"));
    }

    #[test]
    fn setting_attacher_type_swaps_engine() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let mut host = MemoryHost::new();

        ext.set_attacher_type(&mut host, "AttachEnginePoint").unwrap();
        assert_eq!(ext.engine().unwrap().type_name(), "AttachEnginePoint");
        assert_eq!(ext.attributes().attacher_type(), "AttachEnginePoint");
    }

    #[test]
    fn invalid_attacher_type_reverts_attribute() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let mut host = MemoryHost::new();

        let err = ext
            .set_attacher_type(&mut host, "NotARealStrategy")
            .unwrap_err();
        assert!(matches!(err, AttachError::TypeMismatch(_)));
        assert_eq!(ext.attributes().attacher_type(), "AttachEngine3D");
        assert_eq!(ext.engine().unwrap().type_name(), "AttachEngine3D");
    }

    #[test]
    fn empty_attacher_type_removes_engine() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let mut host = MemoryHost::new();

        ext.set_attacher_type(&mut host, "").unwrap();
        assert!(ext.engine().is_none());
        assert_eq!(ext.attributes().attacher_type(), "");
    }

    #[test]
    fn configuration_edits_touch_host() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let mut host = MemoryHost::new();

        ext.set_reversed(&mut host, true).unwrap();
        assert!(host.is_touched(MAP_REVERSED));
        assert!(ext.attributes().reversed());
    }

    #[test]
    fn configuration_edits_are_suppressed_while_restoring() {
        let env = TestEnv::new();
        let (mut ext, script) = env.scripted_extension();
        script.set(Script::Place(env.target()));
        let mut host = MemoryHost::new();
        host.set_restoring(true);

        ext.set_support(&mut host, vec![env.face_ref()]).unwrap();
        ext.set_mode(&mut host, MapMode::FlatFace).unwrap();

        assert_eq!(script.calls(), 0);
        assert_eq!(host.resolved(), Some(Placement::identity()));
    }

    #[test]
    fn script_object_is_created_once() {
        let env = TestEnv::new();
        let ext = env.extension();
        let first = ext.script_object();
        let second = ext.script_object();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.type_name(), "AttachExtensionPy");
        assert_eq!(Rc::strong_count(&first), 3);
    }
}
