//! Fixtures shared by unit and integration tests.
//!
//! [`TestEnv`] builds a small geometry catalog (a box with one face, edge and
//! vertex, plus a cylinder with a circular edge) and an engine registry over
//! it. [`ScriptedEngine`] is an engine whose outcome the test chooses, for
//! exercising controller paths the reference engines cannot reach on demand.

use crate::config::AttacherConfig;
use crate::engine::{AttachEngine, Attachment, EngineConfig, EngineError, EngineRegistry};
use crate::error::GeometryError;
use crate::extension::AttachExtension;
use crate::geometry::{Element, ShapeCatalog, ShapeObject};
use crate::model::{MapMode, ObjectId, SupportRef};
use crate::placement::{Placement, Rotation, Vector3};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What the scripted engine returns from its next `compute` calls.
#[derive(Debug, Clone, Default)]
pub enum Script {
    Place(Placement),
    Rewrite(Placement, Vec<SupportRef>),
    #[default]
    NotApplicable,
    GeometryFailure,
    ConfigFailure,
}

#[derive(Default)]
struct ScriptState {
    script: RefCell<Script>,
    calls: Cell<usize>,
}

/// Test-side control of a [`ScriptedEngine`]. Clones share state.
#[derive(Clone, Default)]
pub struct ScriptHandle(Rc<ScriptState>);

impl ScriptHandle {
    pub fn set(&self, script: Script) {
        *self.0.script.borrow_mut() = script;
    }

    /// Number of `compute` calls so far.
    pub fn calls(&self) -> usize {
        self.0.calls.get()
    }
}

pub struct ScriptedEngine {
    handle: ScriptHandle,
    config: EngineConfig,
}

impl ScriptedEngine {
    pub const TYPE_NAME: &'static str = "ScriptedEngine";

    pub fn new(handle: ScriptHandle) -> Self {
        Self {
            handle,
            config: EngineConfig::default(),
        }
    }
}

impl AttachEngine for ScriptedEngine {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn supported_modes(&self) -> &'static [MapMode] {
        MapMode::ALL
    }

    fn configure(&mut self, config: EngineConfig) {
        self.config = config;
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn compute(&self, _current: &Placement) -> Result<Attachment, EngineError> {
        let state = &self.handle.0;
        state.calls.set(state.calls.get() + 1);
        match &*state.script.borrow() {
            Script::Place(placement) => Ok(Attachment::Applied {
                placement: *placement,
                rewritten: None,
            }),
            Script::Rewrite(placement, support) => Ok(Attachment::Applied {
                placement: *placement,
                rewritten: Some(support.clone()),
            }),
            Script::NotApplicable => Ok(Attachment::NotApplicable),
            Script::GeometryFailure => Err(EngineError::Geometry(GeometryError::Degenerate(
                "scripted kernel failure".into(),
            ))),
            Script::ConfigFailure => Err(EngineError::Config("scripted configuration failure".into())),
        }
    }
}

pub struct TestEnv {
    pub catalog: Rc<ShapeCatalog>,
    pub registry: Rc<EngineRegistry>,
    pub box_id: ObjectId,
    pub cylinder_id: ObjectId,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let catalog = Rc::new(sample_catalog());
        let box_id = catalog
            .find_by_label("Box")
            .map(|o| o.id)
            .expect("sample catalog has a box");
        let cylinder_id = catalog
            .find_by_label("Cylinder")
            .map(|o| o.id)
            .expect("sample catalog has a cylinder");
        let registry = Rc::new(EngineRegistry::with_builtins(catalog.clone()));
        Self {
            catalog,
            registry,
            box_id,
            cylinder_id,
        }
    }

    /// Controller with the default configuration.
    pub fn extension(&self) -> AttachExtension {
        self.extension_with(|_| {})
    }

    pub fn extension_with(&self, adjust: impl FnOnce(&mut AttacherConfig)) -> AttachExtension {
        let mut config = AttacherConfig::default();
        adjust(&mut config);
        AttachExtension::new(self.registry.clone(), &config).expect("builtin default engine")
    }

    /// Controller running a [`ScriptedEngine`], plus the handle steering it.
    pub fn scripted_extension(&self) -> (AttachExtension, ScriptHandle) {
        let handle = ScriptHandle::default();
        let mut registry = EngineRegistry::with_builtins(self.catalog.clone());
        let shared = handle.clone();
        registry.register(ScriptedEngine::TYPE_NAME, move || -> Box<dyn AttachEngine> {
            Box::new(ScriptedEngine::new(shared.clone()))
        });
        let config = AttacherConfig {
            default_engine: ScriptedEngine::TYPE_NAME.to_string(),
            ..AttacherConfig::default()
        };
        let extension =
            AttachExtension::new(Rc::new(registry), &config).expect("scripted engine registered");
        (extension, handle)
    }

    /// A placement no fixture produces by accident.
    pub fn target(&self) -> Placement {
        Placement::new(
            Vector3::new(1.0, -2.0, 3.5),
            Rotation::from_axis_angle(Vector3::Z, 0.25),
        )
    }

    pub fn face_ref(&self) -> SupportRef {
        SupportRef::new(self.box_id, "Face1")
    }

    pub fn edge_ref(&self) -> SupportRef {
        SupportRef::new(self.box_id, "Edge1")
    }

    pub fn vertex_ref(&self) -> SupportRef {
        SupportRef::new(self.box_id, "Vertex1")
    }

    pub fn circle_ref(&self) -> SupportRef {
        SupportRef::new(self.cylinder_id, "Edge1")
    }
}

/// Box with a face pointing +X at height 10, a vertical edge and a vertex;
/// cylinder with a circular edge around +Y.
pub fn sample_catalog() -> ShapeCatalog {
    let mut catalog = ShapeCatalog::new();
    catalog.insert(
        ShapeObject::new("Box", Placement::from_position(Vector3::new(5.0, 0.0, 0.0)))
            .with_element(
                "Face1",
                Element::Plane {
                    origin: Vector3::new(0.0, 0.0, 10.0),
                    normal: Vector3::X,
                },
            )
            .with_element(
                "Edge1",
                Element::Line {
                    start: Vector3::ZERO,
                    end: Vector3::new(0.0, 0.0, 4.0),
                },
            )
            .with_element(
                "Vertex1",
                Element::Vertex {
                    point: Vector3::new(1.0, 2.0, 3.0),
                },
            ),
    );
    catalog.insert(ShapeObject::new("Cylinder", Placement::identity()).with_element(
        "Edge1",
        Element::Circle {
            center: Vector3::new(0.0, 0.0, 7.0),
            normal: Vector3::Y,
            radius: 2.0,
        },
    ));
    catalog
}
