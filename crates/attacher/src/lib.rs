//! # Attacher Architecture
//!
//! Attacher is a **UI-agnostic attachment controller**. Given "attach this
//! object's placement to that face/edge/vertex using mode M", it drives a
//! pluggable engine, caches whether the attachment currently works, and
//! keeps the dependent attributes' editor status consistent. The `attach`
//! binary is one client of it, not the application itself.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Controller (extension/)                                    │
//! │  - Engine lifecycle, resolution, active cache               │
//! │  - Visibility state machine, legacy migration               │
//! └─────────────────────────────────────────────────────────────┘
//!            │                    │                     │
//!            ▼                    ▼                     ▼
//! ┌──────────────────┐ ┌────────────────────┐ ┌─────────────────────┐
//! │ Engines          │ │ Attributes         │ │ Host                │
//! │ (engine/)        │ │ (attributes/)      │ │ (host/)             │
//! │ trait + registry │ │ schema + storage   │ │ trait + MemoryHost  │
//! └──────────────────┘ └────────────────────┘ └─────────────────────┘
//!            │
//!            ▼
//! ┌──────────────────┐
//! │ Geometry         │
//! │ (geometry.rs)    │
//! └──────────────────┘
//! ```
//!
//! ## Key Principle: the Host Owns the Result
//!
//! The controller owns its six attributes and its engine. The resolved
//! placement, error status, restoring flag and dirty marks belong to the
//! host object and are reached only through [`host::HostObject`]. A failed
//! attachment never writes the placement.
//!
//! ## Error Tiers
//!
//! Not-applicable is a normal outcome ([`engine::Attachment::NotApplicable`]).
//! Domain errors (no engine, wrong engine type, missing placement, bad
//! configuration) and geometry-kernel errors share [`error::AttachError`].
//! Edits catch both and flag the host; recompute lets domain errors through
//! and re-raises kernel errors as `Runtime`.
//!
//! ## Module Overview
//!
//! - [`extension`]: The controller
//! - [`engine`]: Engine trait, registry and reference engines
//! - [`attributes`]: Attribute schema, values and storage
//! - [`host`]: Host object trait and in-memory host
//! - [`geometry`]: Geometry source trait and in-memory catalog
//! - [`document`]: Stored attributes, documents and sessions
//! - [`model`]: Core types (`ObjectId`, `SupportRef`, `MapMode`)
//! - [`placement`]: Vector, rotation and placement math
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod attributes;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod extension;
pub mod geometry;
pub mod host;
pub mod model;
pub mod placement;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
