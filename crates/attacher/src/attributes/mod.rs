//! # Attribute System
//!
//! The attachment controller owns six attributes. Instead of handling each of
//! them ad hoc, this module provides:
//!
//! - **Specifications**: name, kind, persisted type, initial visibility and
//!   whether a change re-runs the attachment ([`ATTRIBUTES`])
//! - **Values**: a runtime representation used by the unified get/set API and
//!   by persistence ([`AttrValue`])
//! - **Storage**: the typed [`AttributeSet`] with compare-before-write setters
//!   and per-attribute editor status
//!
//! ## Attributes
//!
//! | Name | Kind | Initially hidden |
//! |------|------|------------------|
//! | `AttacherType` | `Text` | yes |
//! | `AttachmentSupport` | `LinkSubList` | no |
//! | `MapMode` | `Enum` | no |
//! | `MapReversed` | `Bool` | yes |
//! | `MapPathParameter` | `Float` | yes |
//! | `AttachmentOffset` | `Placement` | yes |
//!
//! The resolved `Placement` is not listed: it belongs to the host object.

mod set;
mod spec;
mod value;

pub use set::AttributeSet;
pub use spec::{
    get_spec, update_triggers, AttributeKind, AttributeSpec, ATTACHER_TYPE, ATTRIBUTES, MAP_MODE,
    MAP_REVERSED, OFFSET, PATH_PARAMETER, PLACEMENT, SUPPORT,
};
pub use value::{AttrStatus, AttrValue};
