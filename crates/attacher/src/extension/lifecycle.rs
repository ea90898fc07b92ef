use super::AttachExtension;
use crate::attributes::{AttrValue, ATTACHER_TYPE};
use crate::engine::{AttachEngine, EngineConfig, Lookup};
use crate::error::{AttachError, Result};
use crate::model::ActiveState;
use tracing::debug;

impl AttachExtension {
    /// Take ownership of `engine`, dropping the previous one.
    ///
    /// `AttacherType` is updated to the new engine's name (or cleared) only
    /// when it differs, which is what stops the
    /// `on_changed -> change_engine_by_name -> install_engine` cycle.
    pub fn install_engine(&mut self, engine: Option<Box<dyn AttachEngine>>) {
        self.engine = engine;
        self.active.set(ActiveState::Unknown);

        let name = self
            .engine
            .as_ref()
            .map(|e| e.type_name())
            .unwrap_or_default();
        // Same-kind write: cannot fail.
        let _ = self.attrs.set(ATTACHER_TYPE, AttrValue::Text(name.to_string()));

        if self.engine.is_some() {
            debug!(engine = name, "attach engine installed");
            self.push_config();
        } else {
            debug!("attach engine removed");
        }
    }

    /// Swap the engine for a new instance of type `name`.
    ///
    /// Returns `Ok(false)` when nothing needed to change. An empty name
    /// removes the engine. A name that is not an engine type fails with
    /// [`AttachError::TypeMismatch`] and leaves the current engine in place.
    pub fn change_engine_by_name(&mut self, name: &str) -> Result<bool> {
        match &self.engine {
            Some(engine) if engine.type_name() == name => return Ok(false),
            None if name.is_empty() => return Ok(false),
            _ => {}
        }

        if name.is_empty() {
            self.install_engine(None);
            return Ok(true);
        }

        let engine = match self.registry.lookup(name) {
            Lookup::Engine(factory) => factory(),
            Lookup::WrongBase | Lookup::NotFound => {
                return Err(AttachError::TypeMismatch(name.to_string()))
            }
        };
        self.install_engine(Some(engine));
        Ok(true)
    }

    pub(crate) fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            support: self.attrs.support().to_vec(),
            mode: self.attrs.mode(),
            reversed: self.attrs.reversed(),
            path_parameter: self.attrs.path_parameter(),
            offset: self.attrs.offset(),
        }
    }

    /// Push the current attribute values into the engine.
    pub(crate) fn push_config(&mut self) {
        let config = self.engine_config();
        if let Some(engine) = self.engine.as_mut() {
            engine.configure(config);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::AttachEngine;
    use crate::error::AttachError;
    use crate::host::memory::MemoryHost;
    use crate::model::MapMode;
    use crate::test_utils::TestEnv;

    fn engine_addr(engine: Option<&dyn AttachEngine>) -> *const () {
        engine.map_or(std::ptr::null(), |e| e as *const dyn AttachEngine as *const ())
    }

    #[test]
    fn same_name_keeps_instance() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let before = engine_addr(ext.engine());

        assert!(!ext.change_engine_by_name("AttachEngine3D").unwrap());
        assert_eq!(engine_addr(ext.engine()), before);
    }

    #[test]
    fn empty_name_without_engine_is_noop() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        assert!(ext.change_engine_by_name("").unwrap());
        assert!(ext.engine().is_none());
        assert!(!ext.change_engine_by_name("").unwrap());
    }

    #[test]
    fn unknown_name_is_type_mismatch_and_keeps_engine() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let before = engine_addr(ext.engine());

        let err = ext.change_engine_by_name("NotARealStrategy").unwrap_err();
        assert!(matches!(err, AttachError::TypeMismatch(ref n) if n == "NotARealStrategy"));
        assert_eq!(engine_addr(ext.engine()), before);
        assert_eq!(ext.attributes().attacher_type(), "AttachEngine3D");
    }

    #[test]
    fn non_engine_type_is_type_mismatch() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let err = ext.change_engine_by_name("PropertyPlacement").unwrap_err();
        assert!(matches!(err, AttachError::TypeMismatch(_)));
    }

    #[test]
    fn new_engine_receives_current_configuration() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let mut host = MemoryHost::new();
        ext.set_support(&mut host, vec![env.vertex_ref()]).unwrap();
        ext.set_mode(&mut host, MapMode::Translate).unwrap();

        assert!(ext.change_engine_by_name("AttachEnginePoint").unwrap());
        let engine = ext.engine().unwrap();
        assert_eq!(engine.type_name(), "AttachEnginePoint");
        assert_eq!(engine.config().mode, MapMode::Translate);
        assert_eq!(engine.support(), &[env.vertex_ref()]);
    }

    #[test]
    fn installing_mirrors_name_into_attribute() {
        let env = TestEnv::new();
        let mut ext = env.extension();
        let engine = env.registry.create("AttachEnginePoint").unwrap();
        ext.install_engine(Some(engine));
        assert_eq!(ext.attributes().attacher_type(), "AttachEnginePoint");

        ext.install_engine(None);
        assert_eq!(ext.attributes().attacher_type(), "");
    }
}
