//! Position and orientation values.
//!
//! A [`Placement`] is a rigid transform: a translation plus a [`Rotation`]
//! held as a `nalgebra` unit quaternion. Composition follows the usual
//! convention `(a * b).apply(p) == a.apply(b.apply(p))`, so an attachment
//! offset is applied in the local coordinates of the attachment frame.
//!
//! Stored rotations are `{x, y, z, w}` quaternions. They are normalized on
//! decode; a zero quaternion decodes as the identity.

use nalgebra as na;
use nalgebra::{Isometry3, Point3, Quaternion, Translation3, Unit, UnitQuaternion};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const X: Vector3 = Vector3::new(1.0, 0.0, 0.0);
    pub const Y: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    pub const Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        na::Vector3::from(*self).dot(&na::Vector3::from(*other))
    }

    pub fn cross(&self, other: &Vector3) -> Vector3 {
        na::Vector3::from(*self)
            .cross(&na::Vector3::from(*other))
            .into()
    }

    pub fn length(&self) -> f64 {
        na::Vector3::from(*self).norm()
    }

    pub fn scale(&self, factor: f64) -> Vector3 {
        (na::Vector3::from(*self) * factor).into()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(&self) -> Option<Vector3> {
        na::Vector3::from(*self)
            .try_normalize(EPSILON)
            .map(Vector3::from)
    }

    pub fn approx_eq(&self, other: &Vector3, tolerance: f64) -> bool {
        (*self - *other).length() <= tolerance
    }

    /// Any unit vector perpendicular to this one.
    fn any_orthogonal(&self) -> Vector3 {
        let candidate = if self.x.abs() < 0.9 {
            Vector3::X
        } else {
            Vector3::Y
        };
        self.cross(&candidate).normalized().unwrap_or(Vector3::Z)
    }
}

impl From<Vector3> for na::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        na::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<na::Vector3<f64>> for Vector3 {
    fn from(v: na::Vector3<f64>) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        (na::Vector3::from(self) + na::Vector3::from(rhs)).into()
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        (na::Vector3::from(self) - na::Vector3::from(rhs)).into()
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        (-na::Vector3::from(self)).into()
    }
}

/// Unit quaternion rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredQuaternion", into = "StoredQuaternion")]
pub struct Rotation(UnitQuaternion<f64>);

/// Persisted form of a [`Rotation`].
#[derive(Clone, Copy, Serialize, Deserialize)]
struct StoredQuaternion {
    x: f64,
    y: f64,
    z: f64,
    w: f64,
}

impl From<StoredQuaternion> for Rotation {
    fn from(q: StoredQuaternion) -> Self {
        Rotation::from_quaternion(q.x, q.y, q.z, q.w)
    }
}

impl From<Rotation> for StoredQuaternion {
    fn from(r: Rotation) -> Self {
        let q = r.0.quaternion();
        StoredQuaternion {
            x: q.i,
            y: q.j,
            z: q.k,
            w: q.w,
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Rotation {
    pub fn identity() -> Self {
        Rotation(UnitQuaternion::identity())
    }

    /// Rotation from raw quaternion components, normalized. A zero
    /// quaternion yields identity.
    pub fn from_quaternion(x: f64, y: f64, z: f64, w: f64) -> Self {
        Unit::try_new(Quaternion::new(w, x, y, z), EPSILON)
            .map(Rotation)
            .unwrap_or_else(Self::identity)
    }

    /// Rotation of `angle` radians around `axis`. A zero axis yields identity.
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        match Unit::try_new(na::Vector3::from(axis), EPSILON) {
            Some(axis) => Rotation(UnitQuaternion::from_axis_angle(&axis, angle)),
            None => Self::identity(),
        }
    }

    /// Shortest rotation carrying direction `from` onto direction `to`.
    pub fn between(from: Vector3, to: Vector3) -> Option<Self> {
        let from = from.normalized()?;
        let to = to.normalized()?;
        if from.dot(&to) < -1.0 + EPSILON {
            return Some(Self::from_axis_angle(
                from.any_orthogonal(),
                std::f64::consts::PI,
            ));
        }
        let (from, to): (na::Vector3<f64>, na::Vector3<f64>) = (from.into(), to.into());
        let rotation =
            UnitQuaternion::rotation_between(&from, &to).unwrap_or_else(UnitQuaternion::identity);
        Some(Rotation(rotation))
    }

    pub fn rotate(&self, v: Vector3) -> Vector3 {
        self.0.transform_vector(&v.into()).into()
    }

    pub fn inverse(&self) -> Self {
        Rotation(self.0.inverse())
    }

    /// Same orientation test, treating `q` and `-q` as equal.
    pub fn approx_eq(&self, other: &Rotation, tolerance: f64) -> bool {
        let dot = self.0.coords.dot(&other.0.coords);
        (1.0 - dot.abs()) <= tolerance
    }
}

impl Mul for Rotation {
    type Output = Rotation;

    fn mul(self, rhs: Rotation) -> Rotation {
        Rotation(self.0 * rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vector3,
    pub rotation: Rotation,
}

impl Placement {
    pub fn identity() -> Self {
        Self::from_position(Vector3::ZERO)
    }

    pub fn new(position: Vector3, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vector3) -> Self {
        Self {
            position,
            rotation: Rotation::identity(),
        }
    }

    fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(na::Vector3::from(self.position)),
            self.rotation.0,
        )
    }

    /// Transform a point from local into global coordinates.
    pub fn apply(&self, point: Vector3) -> Vector3 {
        self.isometry()
            .transform_point(&Point3::from(na::Vector3::from(point)))
            .coords
            .into()
    }

    /// Local Z axis expressed in global coordinates.
    pub fn z_axis(&self) -> Vector3 {
        self.rotation.rotate(Vector3::Z)
    }

    pub fn approx_eq(&self, other: &Placement, tolerance: f64) -> bool {
        self.position.approx_eq(&other.position, tolerance)
            && self.rotation.approx_eq(&other.rotation, tolerance)
    }
}

impl From<Isometry3<f64>> for Placement {
    fn from(iso: Isometry3<f64>) -> Self {
        Placement {
            position: iso.translation.vector.into(),
            rotation: Rotation(iso.rotation),
        }
    }
}

impl Mul for Placement {
    type Output = Placement;

    fn mul(self, rhs: Placement) -> Placement {
        (self.isometry() * rhs.isometry()).into()
    }
}
