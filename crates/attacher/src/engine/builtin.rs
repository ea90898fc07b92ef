//! Reference engines.
//!
//! The math here is intentionally plain: enough to give every mode the
//! controller cares about a concrete, testable result. Production kernels
//! plug in through the same [`AttachEngine`] trait.

use super::{AttachEngine, Attachment, EngineConfig, EngineError};
use crate::error::GeometryError;
use crate::geometry::{Element, GeometrySource};
use crate::model::{MapMode, SupportRef};
use crate::placement::{Placement, Rotation, Vector3};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::rc::Rc;

const SUB_ELEMENT_KINDS: &[&str] = &["Face", "Edge", "Vertex"];

/// Canonical spelling of a sub-element name: `face01` becomes `Face1`.
/// Names that do not look like `<Kind><index>` are returned unchanged.
pub fn canonical_sub_name(sub: &str) -> String {
    let split = sub.find(|c: char| c.is_ascii_digit()).unwrap_or(sub.len());
    let (prefix, digits) = sub.split_at(split);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return sub.to_string();
    }
    let Some(kind) = SUB_ELEMENT_KINDS
        .iter()
        .find(|kind| kind.eq_ignore_ascii_case(prefix))
    else {
        return sub.to_string();
    };
    let index = digits.trim_start_matches('0');
    if index.is_empty() {
        return sub.to_string();
    }
    format!("{}{}", kind, index)
}

/// Canonicalize every reference; the list is returned only if a name changed.
fn canonicalize(support: &[SupportRef]) -> (Vec<SupportRef>, Option<Vec<SupportRef>>) {
    let canonical: Vec<SupportRef> = support
        .iter()
        .map(|r| SupportRef::new(r.object, canonical_sub_name(&r.sub)))
        .collect();
    let rewritten = (canonical.as_slice() != support).then(|| canonical.clone());
    (canonical, rewritten)
}

fn unsupported(engine: &str, mode: MapMode) -> EngineError {
    EngineError::Config(format!(
        "Attachment mode {} is not supported by {}",
        mode, engine
    ))
}

fn mismatch(mode: MapMode, expected: &str) -> EngineError {
    EngineError::Config(format!(
        "Mode {} needs {}, references don't match",
        mode, expected
    ))
}

/// Characteristic point of a reference: a vertex, a face origin, a circle
/// center, a line start, or the origin of a whole object.
fn point_of(geometry: &dyn GeometrySource, support: &SupportRef) -> Result<Vector3, GeometryError> {
    if support.sub.is_empty() {
        return Ok(geometry.placement_of(&support.object)?.position);
    }
    let point = match geometry.element(support)? {
        Element::Vertex { point } => point,
        Element::Line { start, .. } => start,
        Element::Circle { center, .. } => center,
        Element::Plane { origin, .. } => origin,
    };
    Ok(point)
}

fn frame(origin: Vector3, z_axis: Vector3) -> Result<Placement, EngineError> {
    let rotation = Rotation::between(Vector3::Z, z_axis)
        .ok_or_else(|| GeometryError::Degenerate("zero-length direction".into()))?;
    Ok(Placement::new(origin, rotation))
}

/// Full-frame attachment engine.
pub struct Engine3D {
    geometry: Rc<dyn GeometrySource>,
    config: EngineConfig,
}

impl Engine3D {
    pub const TYPE_NAME: &'static str = "AttachEngine3D";

    const MODES: &'static [MapMode] = &[
        MapMode::Deactivated,
        MapMode::Translate,
        MapMode::ObjectXY,
        MapMode::ObjectXZ,
        MapMode::ObjectYZ,
        MapMode::FlatFace,
        MapMode::NormalToEdge,
        MapMode::Concentric,
    ];

    pub fn new(geometry: Rc<dyn GeometrySource>) -> Self {
        Self {
            geometry,
            config: EngineConfig::default(),
        }
    }

    fn basis(&self, refs: &[SupportRef], current: &Placement) -> Result<Placement, EngineError> {
        let mode = self.config.mode;
        let first = &refs[0];
        let geometry = self.geometry.as_ref();

        match mode {
            MapMode::Translate => {
                let origin = point_of(geometry, first)?;
                Ok(Placement::new(origin, current.rotation))
            }
            MapMode::ObjectXY | MapMode::ObjectXZ | MapMode::ObjectYZ => {
                let object = geometry.placement_of(&first.object)?;
                let local = match mode {
                    MapMode::ObjectXZ => Rotation::from_axis_angle(Vector3::X, FRAC_PI_2),
                    MapMode::ObjectYZ => {
                        Rotation::from_axis_angle(Vector3::new(1.0, 1.0, 1.0), TAU / 3.0)
                    }
                    _ => Rotation::identity(),
                };
                Ok(object * Placement::new(Vector3::ZERO, local))
            }
            MapMode::FlatFace => match geometry.element(first)? {
                Element::Plane { origin, normal } => frame(origin, normal),
                _ => Err(mismatch(mode, "a planar face")),
            },
            MapMode::NormalToEdge => {
                if refs.len() != 1 {
                    return Err(mismatch(mode, "exactly one edge"));
                }
                let element = geometry.element(first)?;
                let (point, tangent) = element
                    .point_on_curve(self.config.path_parameter)?
                    .ok_or_else(|| mismatch(mode, "an edge"))?;
                frame(point, tangent)
            }
            MapMode::Concentric => match geometry.element(first)? {
                Element::Circle { center, normal, .. } => frame(center, normal),
                _ => Err(mismatch(mode, "a circular edge")),
            },
            other => Err(unsupported(Self::TYPE_NAME, other)),
        }
    }
}

impl AttachEngine for Engine3D {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn supported_modes(&self) -> &'static [MapMode] {
        Self::MODES
    }

    fn configure(&mut self, config: EngineConfig) {
        self.config = config;
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn compute(&self, current: &Placement) -> Result<Attachment, EngineError> {
        let mode = self.config.mode;
        if mode == MapMode::Deactivated || self.config.support.is_empty() {
            return Ok(Attachment::NotApplicable);
        }
        if !Self::MODES.contains(&mode) {
            return Err(unsupported(Self::TYPE_NAME, mode));
        }

        let (refs, rewritten) = canonicalize(&self.config.support);
        let mut basis = self.basis(&refs, current)?;
        if self.config.reversed {
            basis = basis * Placement::new(Vector3::ZERO, Rotation::from_axis_angle(Vector3::X, PI));
        }

        Ok(Attachment::Applied {
            placement: basis * self.config.offset,
            rewritten,
        })
    }
}

/// Origin-only attachment engine: moves the placement, keeps its orientation.
pub struct EnginePoint {
    geometry: Rc<dyn GeometrySource>,
    config: EngineConfig,
}

impl EnginePoint {
    pub const TYPE_NAME: &'static str = "AttachEnginePoint";

    const MODES: &'static [MapMode] = &[MapMode::Deactivated, MapMode::Translate, MapMode::ObjectXY];

    pub fn new(geometry: Rc<dyn GeometrySource>) -> Self {
        Self {
            geometry,
            config: EngineConfig::default(),
        }
    }
}

impl AttachEngine for EnginePoint {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn supported_modes(&self) -> &'static [MapMode] {
        Self::MODES
    }

    fn configure(&mut self, config: EngineConfig) {
        self.config = config;
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn compute(&self, current: &Placement) -> Result<Attachment, EngineError> {
        let mode = self.config.mode;
        if mode == MapMode::Deactivated || self.config.support.is_empty() {
            return Ok(Attachment::NotApplicable);
        }

        let (refs, rewritten) = canonicalize(&self.config.support);
        let origin = match mode {
            MapMode::Translate => point_of(self.geometry.as_ref(), &refs[0])?,
            MapMode::ObjectXY => self.geometry.placement_of(&refs[0].object)?.position,
            other => return Err(unsupported(Self::TYPE_NAME, other)),
        };

        Ok(Attachment::Applied {
            placement: Placement::new(origin, current.rotation) * self.config.offset,
            rewritten,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ShapeCatalog, ShapeObject};
    use crate::model::ObjectId;

    const TOL: f64 = 1e-9;

    struct Fixture {
        catalog: Rc<ShapeCatalog>,
        box_id: ObjectId,
        cyl_id: ObjectId,
    }

    fn fixture() -> Fixture {
        let mut catalog = ShapeCatalog::new();
        let box_id = catalog.insert(
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
        let cyl_id = catalog.insert(ShapeObject::new("Cylinder", Placement::identity()).with_element(
            "Edge1",
            Element::Circle {
                center: Vector3::new(0.0, 0.0, 7.0),
                normal: Vector3::Y,
                radius: 2.0,
            },
        ));
        Fixture {
            catalog: Rc::new(catalog),
            box_id,
            cyl_id,
        }
    }

    fn engine3d(f: &Fixture, support: Vec<SupportRef>, mode: MapMode) -> Engine3D {
        let mut engine = Engine3D::new(f.catalog.clone());
        engine.configure(EngineConfig {
            support,
            mode,
            ..EngineConfig::default()
        });
        engine
    }

    fn applied(result: Result<Attachment, EngineError>) -> (Placement, Option<Vec<SupportRef>>) {
        match result.unwrap() {
            Attachment::Applied {
                placement,
                rewritten,
            } => (placement, rewritten),
            Attachment::NotApplicable => panic!("Expected Applied"),
        }
    }

    #[test]
    fn canonical_names() {
        assert_eq!(canonical_sub_name("face01"), "Face1");
        assert_eq!(canonical_sub_name("EDGE3"), "Edge3");
        assert_eq!(canonical_sub_name("Vertex2"), "Vertex2");
        assert_eq!(canonical_sub_name(""), "");
        assert_eq!(canonical_sub_name("Wire1"), "Wire1");
        assert_eq!(canonical_sub_name("Face0"), "Face0");
    }

    #[test]
    fn deactivated_or_empty_is_not_applicable() {
        let f = fixture();
        let engine = engine3d(&f, vec![SupportRef::new(f.box_id, "Face1")], MapMode::Deactivated);
        assert_eq!(
            engine.compute(&Placement::identity()).unwrap(),
            Attachment::NotApplicable
        );

        let engine = engine3d(&f, vec![], MapMode::FlatFace);
        assert_eq!(
            engine.compute(&Placement::identity()).unwrap(),
            Attachment::NotApplicable
        );
    }

    #[test]
    fn flat_face_aligns_z_with_normal() {
        let f = fixture();
        let engine = engine3d(&f, vec![SupportRef::new(f.box_id, "Face1")], MapMode::FlatFace);
        let (placement, rewritten) = applied(engine.compute(&Placement::identity()));
        assert!(placement
            .position
            .approx_eq(&Vector3::new(0.0, 0.0, 10.0), TOL));
        assert!(placement.z_axis().approx_eq(&Vector3::X, TOL));
        assert!(rewritten.is_none());
    }

    #[test]
    fn ambiguous_names_are_reported_as_rewritten() {
        let f = fixture();
        let engine = engine3d(&f, vec![SupportRef::new(f.box_id, "face01")], MapMode::FlatFace);
        let (_, rewritten) = applied(engine.compute(&Placement::identity()));
        assert_eq!(rewritten, Some(vec![SupportRef::new(f.box_id, "Face1")]));
    }

    #[test]
    fn normal_to_edge_uses_path_parameter() {
        let f = fixture();
        let mut engine = engine3d(&f, vec![SupportRef::new(f.box_id, "Edge1")], MapMode::NormalToEdge);
        let mut config = engine.config().clone();
        config.path_parameter = 0.5;
        engine.configure(config);

        let (placement, _) = applied(engine.compute(&Placement::identity()));
        assert!(placement
            .position
            .approx_eq(&Vector3::new(0.0, 0.0, 2.0), TOL));
        assert!(placement.z_axis().approx_eq(&Vector3::Z, TOL));
    }

    #[test]
    fn concentric_uses_circle_axis() {
        let f = fixture();
        let engine = engine3d(&f, vec![SupportRef::new(f.cyl_id, "Edge1")], MapMode::Concentric);
        let (placement, _) = applied(engine.compute(&Placement::identity()));
        assert!(placement
            .position
            .approx_eq(&Vector3::new(0.0, 0.0, 7.0), TOL));
        assert!(placement.z_axis().approx_eq(&Vector3::Y, TOL));
    }

    #[test]
    fn translate_keeps_current_orientation() {
        let f = fixture();
        let engine = engine3d(&f, vec![SupportRef::new(f.box_id, "Vertex1")], MapMode::Translate);
        let current = Placement::new(Vector3::ZERO, Rotation::from_axis_angle(Vector3::Z, 0.4));
        let (placement, _) = applied(engine.compute(&current));
        assert!(placement
            .position
            .approx_eq(&Vector3::new(1.0, 2.0, 3.0), TOL));
        assert!(placement.rotation.approx_eq(&current.rotation, TOL));
    }

    #[test]
    fn reversed_flips_z_and_offset_is_local() {
        let f = fixture();
        let mut engine = engine3d(&f, vec![SupportRef::whole(f.box_id)], MapMode::ObjectXY);
        engine.configure(EngineConfig {
            support: vec![SupportRef::whole(f.box_id)],
            mode: MapMode::ObjectXY,
            reversed: true,
            path_parameter: 0.0,
            offset: Placement::from_position(Vector3::new(0.0, 0.0, 1.0)),
        });
        let (placement, _) = applied(engine.compute(&Placement::identity()));
        assert!(placement.z_axis().approx_eq(&-Vector3::Z, TOL));
        assert!(placement
            .position
            .approx_eq(&Vector3::new(5.0, 0.0, -1.0), TOL));
    }

    #[test]
    fn mode_and_geometry_mismatch_is_config_error() {
        let f = fixture();
        let engine = engine3d(&f, vec![SupportRef::new(f.box_id, "Edge1")], MapMode::FlatFace);
        assert!(matches!(
            engine.compute(&Placement::identity()),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn unsupported_mode_is_config_error() {
        let f = fixture();
        let engine = engine3d(&f, vec![SupportRef::new(f.box_id, "Face1")], MapMode::Folding);
        let err = engine.compute(&Placement::identity()).unwrap_err();
        assert!(err.to_string().contains("not supported by AttachEngine3D"));
    }

    #[test]
    fn missing_element_is_geometry_error() {
        let f = fixture();
        let engine = engine3d(&f, vec![SupportRef::new(f.box_id, "Face7")], MapMode::FlatFace);
        assert!(matches!(
            engine.compute(&Placement::identity()),
            Err(EngineError::Geometry(GeometryError::ElementNotFound { .. }))
        ));
    }

    #[test]
    fn point_engine_moves_origin_only() {
        let f = fixture();
        let mut engine = EnginePoint::new(f.catalog.clone());
        engine.configure(EngineConfig {
            support: vec![SupportRef::new(f.box_id, "Vertex1")],
            mode: MapMode::Translate,
            ..EngineConfig::default()
        });
        let current = Placement::new(Vector3::ZERO, Rotation::from_axis_angle(Vector3::Y, 1.0));
        let (placement, _) = applied(engine.compute(&current));
        assert!(placement
            .position
            .approx_eq(&Vector3::new(1.0, 2.0, 3.0), TOL));
        assert!(placement.rotation.approx_eq(&current.rotation, TOL));

        engine.configure(EngineConfig {
            support: vec![SupportRef::new(f.box_id, "Face1")],
            mode: MapMode::FlatFace,
            ..EngineConfig::default()
        });
        assert!(matches!(
            engine.compute(&current),
            Err(EngineError::Config(_))
        ));
    }
}
