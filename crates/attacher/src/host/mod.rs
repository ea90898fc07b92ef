//! # Host Object
//!
//! The attachment controller is an extension of some document object: it
//! owns its own attributes but writes its result into the host's placement,
//! reports failures through the host's error status, and asks the host
//! whether it is being restored from storage.
//!
//! The [`HostObject`] trait is that seam. A CAD document model implements it
//! for its objects; [`memory::MemoryHost`] is a self-contained implementation
//! used by the CLI and by tests.

use crate::placement::Placement;
use serde_json::Value;

pub mod memory;

/// What the controller needs from the object it is attached to.
pub trait HostObject {
    /// Read a placement attribute by name. `None` when the host has no such
    /// attribute.
    fn placement(&self, name: &str) -> Option<Placement>;

    /// Write a placement attribute. Returns `false` when the host has no such
    /// attribute.
    fn set_placement(&mut self, name: &str, placement: Placement) -> bool;

    fn set_read_only(&mut self, name: &str, read_only: bool);

    fn is_read_only(&self, name: &str) -> bool;

    /// True while a document load is in progress.
    fn is_restoring(&self) -> bool;

    fn set_restoring(&mut self, restoring: bool);

    /// Flag the object as failed, with a message for status reporting.
    fn set_error(&mut self, message: String);

    fn clear_error(&mut self);

    fn error(&self) -> Option<&str>;

    /// Mark an attribute as changed since the last recompute.
    fn touch(&mut self, attribute: &str);

    fn is_touched(&self, attribute: &str) -> bool;

    /// Forget all touched marks after a recompute.
    fn purge_touched(&mut self);

    /// Fallback for stored attributes whose name the extension does not
    /// recognise. Returns whether the attribute was consumed.
    fn handle_renamed_attribute(&mut self, _name: &str, _type_name: &str, _value: &Value) -> bool {
        false
    }
}
