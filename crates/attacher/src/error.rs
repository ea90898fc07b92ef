use thiserror::Error;

/// Failure raised by the geometry kernel while evaluating a support reference.
///
/// These come from the engines' internal computation, never from the
/// controller's own bookkeeping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Object {0} not found")]
    ObjectNotFound(String),

    #[error("Sub-element '{sub}' not found on object {object}")]
    ElementNotFound { object: String, sub: String },

    #[error("Degenerate geometry: {0}")]
    Degenerate(String),
}

#[derive(Error, Debug)]
pub enum AttachError {
    #[error("No attach engine is set, cannot position by support")]
    NoEngine,

    #[error("Type is not derived from AttachEngine: {0}")]
    TypeMismatch(String),

    #[error("Host object has no placement attribute")]
    MissingPlacement,

    #[error("Attachment configuration error: {0}")]
    Config(String),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Restore error: {0}")]
    Restore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),
}

impl AttachError {
    /// True for failures that originate in the geometry kernel.
    pub fn is_geometry(&self) -> bool {
        matches!(self, AttachError::Geometry(_))
    }

    /// Short label used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            AttachError::NoEngine => "no_engine",
            AttachError::TypeMismatch(_) => "type_mismatch",
            AttachError::MissingPlacement => "missing_placement",
            AttachError::Config(_) => "config",
            AttachError::Geometry(_) => "geometry",
            AttachError::Runtime(_) => "runtime",
            AttachError::Restore(_) => "restore",
            AttachError::Io(_) => "io",
            AttachError::Serialization(_) => "serialization",
            AttachError::Settings(_) => "settings",
        }
    }

    /// Collapse kernel failures into the generic runtime kind.
    ///
    /// Used at the recompute boundary so the scheduler sees one error type
    /// for geometry failures regardless of which engine raised them.
    pub fn into_recompute(self) -> Self {
        match self {
            AttachError::Geometry(e) => AttachError::Runtime(e.to_string()),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, AttachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_errors_become_runtime_at_recompute() {
        let err = AttachError::from(GeometryError::Degenerate("zero-length edge".into()));
        assert!(err.is_geometry());

        match err.into_recompute() {
            AttachError::Runtime(msg) => assert!(msg.contains("zero-length edge")),
            other => panic!("Expected Runtime, got {:?}", other),
        }
    }

    #[test]
    fn domain_errors_pass_through_recompute() {
        let err = AttachError::NoEngine.into_recompute();
        assert!(matches!(err, AttachError::NoEngine));
        assert!(!err.is_geometry());
    }

    #[test]
    fn type_mismatch_message_names_the_type() {
        let err = AttachError::TypeMismatch("NotARealStrategy".into());
        assert_eq!(
            err.to_string(),
            "Type is not derived from AttachEngine: NotARealStrategy"
        );
        assert_eq!(err.kind(), "type_mismatch");
    }
}
