use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Stable identity of a document object that can be referenced as support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One piece of supporting geometry: an object plus the name of one of its
/// sub-elements (`"Face3"`, `"Edge1"`, `"Vertex2"`). An empty sub-element
/// name refers to the object as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportRef {
    pub object: ObjectId,
    #[serde(default)]
    pub sub: String,
}

impl SupportRef {
    pub fn new(object: ObjectId, sub: impl Into<String>) -> Self {
        Self {
            object,
            sub: sub.into(),
        }
    }

    /// Reference to the whole object.
    pub fn whole(object: ObjectId) -> Self {
        Self {
            object,
            sub: String::new(),
        }
    }
}

impl fmt::Display for SupportRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub.is_empty() {
            write!(f, "{}", self.object)
        } else {
            write!(f, "{}:{}", self.object, self.sub)
        }
    }
}

/// Attachment mode. The persisted name of each variant is its `name()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MapMode {
    #[default]
    Deactivated,
    Translate,
    ObjectXY,
    ObjectXZ,
    ObjectYZ,
    FlatFace,
    TangentPlane,
    NormalToEdge,
    FrenetNB,
    FrenetTN,
    FrenetTB,
    Concentric,
    #[serde(rename = "SectionOfRevolution")]
    RevolutionSection,
    ThreePointsPlane,
    ThreePointsNormal,
    Folding,
    InertialCS,
}

impl MapMode {
    pub const ALL: &'static [MapMode] = &[
        MapMode::Deactivated,
        MapMode::Translate,
        MapMode::ObjectXY,
        MapMode::ObjectXZ,
        MapMode::ObjectYZ,
        MapMode::FlatFace,
        MapMode::TangentPlane,
        MapMode::NormalToEdge,
        MapMode::FrenetNB,
        MapMode::FrenetTN,
        MapMode::FrenetTB,
        MapMode::Concentric,
        MapMode::RevolutionSection,
        MapMode::ThreePointsPlane,
        MapMode::ThreePointsNormal,
        MapMode::Folding,
        MapMode::InertialCS,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MapMode::Deactivated => "Deactivated",
            MapMode::Translate => "Translate",
            MapMode::ObjectXY => "ObjectXY",
            MapMode::ObjectXZ => "ObjectXZ",
            MapMode::ObjectYZ => "ObjectYZ",
            MapMode::FlatFace => "FlatFace",
            MapMode::TangentPlane => "TangentPlane",
            MapMode::NormalToEdge => "NormalToEdge",
            MapMode::FrenetNB => "FrenetNB",
            MapMode::FrenetTN => "FrenetTN",
            MapMode::FrenetTB => "FrenetTB",
            MapMode::Concentric => "Concentric",
            MapMode::RevolutionSection => "SectionOfRevolution",
            MapMode::ThreePointsPlane => "ThreePointsPlane",
            MapMode::ThreePointsNormal => "ThreePointsNormal",
            MapMode::Folding => "Folding",
            MapMode::InertialCS => "InertialCS",
        }
    }

    /// Modes whose placement depends on a position along a single curve.
    pub fn is_curve_parametrized(&self) -> bool {
        matches!(
            self,
            MapMode::NormalToEdge
                | MapMode::FrenetNB
                | MapMode::FrenetTN
                | MapMode::FrenetTB
                | MapMode::RevolutionSection
                | MapMode::Concentric
        )
    }
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown attachment mode: {}", s))
    }
}

/// Cached answer to "would attachment currently succeed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveState {
    #[default]
    Unknown,
    Inactive,
    Active,
}

impl ActiveState {
    pub fn from_flag(active: bool) -> Self {
        if active {
            ActiveState::Active
        } else {
            ActiveState::Inactive
        }
    }
}
