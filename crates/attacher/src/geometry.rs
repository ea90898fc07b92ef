//! # Geometry Source
//!
//! Engines never own geometry. They ask a [`GeometrySource`] to turn a
//! [`SupportRef`] into an [`Element`] in global coordinates. In a full CAD
//! application this is the shape kernel; [`ShapeCatalog`] is a plain
//! in-memory table used by the CLI and the tests.
//!
//! All lookups return [`GeometryError`] on failure. That error type is the
//! "kernel failure" tier: the controller maps it separately from its own
//! configuration errors.

use crate::error::GeometryError;
use crate::model::{ObjectId, SupportRef};
use crate::placement::{Placement, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sub-element of a shape, in global coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Vertex {
        point: Vector3,
    },
    Line {
        start: Vector3,
        end: Vector3,
    },
    Circle {
        center: Vector3,
        normal: Vector3,
        radius: f64,
    },
    Plane {
        origin: Vector3,
        normal: Vector3,
    },
}

impl Element {
    pub fn is_curve(&self) -> bool {
        matches!(self, Element::Line { .. } | Element::Circle { .. })
    }

    /// Point and unit tangent at normalized parameter `t` along a curve.
    ///
    /// Returns `Ok(None)` for elements that are not curves.
    pub fn point_on_curve(&self, t: f64) -> Result<Option<(Vector3, Vector3)>, GeometryError> {
        match self {
            Element::Line { start, end } => {
                let dir = (*end - *start)
                    .normalized()
                    .ok_or_else(|| GeometryError::Degenerate("zero-length line".into()))?;
                let point = *start + (*end - *start).scale(t);
                Ok(Some((point, dir)))
            }
            Element::Circle {
                center,
                normal,
                radius,
            } => {
                let normal = normal
                    .normalized()
                    .ok_or_else(|| GeometryError::Degenerate("circle without axis".into()))?;
                if *radius <= 0.0 {
                    return Err(GeometryError::Degenerate("circle with zero radius".into()));
                }
                let u = in_plane_axis(normal);
                let v = normal.cross(&u);
                let angle = t * std::f64::consts::TAU;
                let (sin, cos) = angle.sin_cos();
                let point = *center + u.scale(radius * cos) + v.scale(radius * sin);
                let tangent = u.scale(-sin) + v.scale(cos);
                Ok(Some((point, tangent)))
            }
            _ => Ok(None),
        }
    }
}

/// Reference X direction for a plane with the given normal.
pub(crate) fn in_plane_axis(normal: Vector3) -> Vector3 {
    let candidate = if normal.x.abs() < 0.9 {
        Vector3::X
    } else {
        Vector3::Y
    };
    let projected = candidate - normal.scale(normal.dot(&candidate));
    projected.normalized().unwrap_or(Vector3::X)
}

/// Resolves support references into geometry.
pub trait GeometrySource {
    /// Placement of a whole object.
    fn placement_of(&self, object: &ObjectId) -> Result<Placement, GeometryError>;

    /// Geometry of one named sub-element.
    fn element(&self, support: &SupportRef) -> Result<Element, GeometryError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeObject {
    pub id: ObjectId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub elements: BTreeMap<String, Element>,
}

impl ShapeObject {
    pub fn new(label: impl Into<String>, placement: Placement) -> Self {
        Self {
            id: ObjectId::new(),
            label: label.into(),
            placement,
            elements: BTreeMap::new(),
        }
    }

    pub fn with_element(mut self, name: impl Into<String>, element: Element) -> Self {
        self.elements.insert(name.into(), element);
        self
    }
}

/// In-memory geometry table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeCatalog {
    #[serde(default)]
    pub objects: Vec<ShapeObject>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object and return its id.
    pub fn insert(&mut self, object: ShapeObject) -> ObjectId {
        let id = object.id;
        self.objects.retain(|o| o.id != id);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: &ObjectId) -> Option<&ShapeObject> {
        self.objects.iter().find(|o| &o.id == id)
    }

    pub fn find_by_label(&self, label: &str) -> Option<&ShapeObject> {
        self.objects.iter().find(|o| o.label == label)
    }
}

impl GeometrySource for ShapeCatalog {
    fn placement_of(&self, object: &ObjectId) -> Result<Placement, GeometryError> {
        self.get(object)
            .map(|o| o.placement)
            .ok_or_else(|| GeometryError::ObjectNotFound(object.to_string()))
    }

    fn element(&self, support: &SupportRef) -> Result<Element, GeometryError> {
        let object = self
            .get(&support.object)
            .ok_or_else(|| GeometryError::ObjectNotFound(support.object.to_string()))?;
        object
            .elements
            .get(&support.sub)
            .cloned()
            .ok_or_else(|| GeometryError::ElementNotFound {
                object: object.label.clone(),
                sub: support.sub.clone(),
            })
    }
}
