//! Engine type registry.
//!
//! Maps type names to factories. The registry also knows names of types that
//! live in the same type namespace but are not engines, so a lookup can tell
//! "this is the wrong kind of type" apart from "never heard of it".

use super::builtin::{Engine3D, EnginePoint};
use super::AttachEngine;
use crate::attributes::ATTRIBUTES;
use crate::geometry::GeometrySource;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub type EngineFactory = Rc<dyn Fn() -> Box<dyn AttachEngine>>;

enum Entry {
    Engine(EngineFactory),
    Foreign,
}

/// Result of looking a type name up.
pub enum Lookup<'a> {
    Engine(&'a EngineFactory),
    WrongBase,
    NotFound,
}

impl fmt::Debug for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Engine(_) => f.write_str("Engine"),
            Lookup::WrongBase => f.write_str("WrongBase"),
            Lookup::NotFound => f.write_str("NotFound"),
        }
    }
}

#[derive(Default)]
pub struct EngineRegistry {
    entries: BTreeMap<String, Entry>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the reference engines, reading geometry from `geometry`.
    ///
    /// The attribute type names are registered as foreign types.
    pub fn with_builtins(geometry: Rc<dyn GeometrySource>) -> Self {
        let mut registry = Self::new();

        let source = geometry.clone();
        registry.register(Engine3D::TYPE_NAME, move || -> Box<dyn AttachEngine> {
            Box::new(Engine3D::new(source.clone()))
        });
        let source = geometry;
        registry.register(EnginePoint::TYPE_NAME, move || -> Box<dyn AttachEngine> {
            Box::new(EnginePoint::new(source.clone()))
        });

        for spec in ATTRIBUTES {
            registry.register_foreign(spec.kind.type_name());
        }
        registry
    }

    /// Register an engine factory, replacing any previous entry of that name.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn AttachEngine> + 'static,
    {
        self.entries
            .insert(name.to_string(), Entry::Engine(Rc::new(factory)));
    }

    /// Register a type name that exists but is not an engine.
    pub fn register_foreign(&mut self, name: &str) {
        self.entries
            .entry(name.to_string())
            .or_insert(Entry::Foreign);
    }

    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        match self.entries.get(name) {
            Some(Entry::Engine(factory)) => Lookup::Engine(factory),
            Some(Entry::Foreign) => Lookup::WrongBase,
            None => Lookup::NotFound,
        }
    }

    pub fn is_engine(&self, name: &str) -> bool {
        matches!(self.lookup(name), Lookup::Engine(_))
    }

    /// Construct a new engine, or `None` when `name` is not an engine type.
    pub fn create(&self, name: &str) -> Option<Box<dyn AttachEngine>> {
        match self.lookup(name) {
            Lookup::Engine(factory) => Some(factory()),
            _ => None,
        }
    }

    /// Names of all registered engine types, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::Engine(_)))
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
