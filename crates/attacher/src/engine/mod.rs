//! # Attach Engines
//!
//! An attach engine is a pluggable algorithm that turns a configuration
//! (support references, mode, reversed flag, path parameter, offset) into a
//! placement. The controller owns exactly one engine at a time and can swap
//! it by type name through the [`EngineRegistry`].
//!
//! ## Outcomes
//!
//! [`AttachEngine::compute`] distinguishes three results:
//!
//! - `Ok(Attachment::Applied { .. })`: a placement was produced. When the
//!   engine had to canonicalize ambiguous sub-element names, `rewritten`
//!   carries the corrected support list.
//! - `Ok(Attachment::NotApplicable)`: the configuration cannot produce a
//!   placement right now (deactivated mode, no references). This is an
//!   expected state, not an error.
//! - `Err(EngineError)`: the configuration is invalid for this engine, or the
//!   geometry kernel failed.
//!
//! ## Implementations
//!
//! - [`builtin::Engine3D`] (`AttachEngine3D`): full frame attachment
//! - [`builtin::EnginePoint`] (`AttachEnginePoint`): origin-only attachment

use crate::error::{AttachError, GeometryError};
use crate::model::{MapMode, SupportRef};
use crate::placement::Placement;
use thiserror::Error;

pub mod builtin;
pub mod registry;

pub use builtin::{Engine3D, EnginePoint};
pub use registry::{EngineFactory, EngineRegistry, Lookup};

/// Everything an engine needs to know about the requested attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub support: Vec<SupportRef>,
    pub mode: MapMode,
    pub reversed: bool,
    pub path_parameter: f64,
    pub offset: Placement,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            support: Vec::new(),
            mode: MapMode::Deactivated,
            reversed: false,
            path_parameter: 0.0,
            offset: Placement::identity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    Applied {
        placement: Placement,
        rewritten: Option<Vec<SupportRef>>,
    },
    NotApplicable,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl From<EngineError> for AttachError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Config(msg) => AttachError::Config(msg),
            EngineError::Geometry(e) => AttachError::Geometry(e),
        }
    }
}

/// Contract every attachment algorithm implements.
pub trait AttachEngine {
    /// Runtime type name, as stored in the `AttacherType` attribute.
    fn type_name(&self) -> &'static str;

    /// Modes this engine can compute.
    fn supported_modes(&self) -> &'static [MapMode];

    /// Replace the engine's configuration.
    fn configure(&mut self, config: EngineConfig);

    fn config(&self) -> &EngineConfig;

    /// Support references the engine currently holds.
    fn support(&self) -> &[SupportRef] {
        &self.config().support
    }

    /// Compute the attached placement. `current` is the host's placement
    /// before attachment; engines that only move the origin keep its
    /// orientation.
    fn compute(&self, current: &Placement) -> Result<Attachment, EngineError>;
}
