use super::HostObject;
use crate::attributes::PLACEMENT;
use crate::placement::Placement;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};

/// In-memory host object.
///
/// Holds a `Placement` attribute by default. Stored attributes the
/// extension hands back during restore are consumed only if their name was
/// registered with [`MemoryHost::accept_legacy`], and are kept for
/// inspection.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    placements: HashMap<String, Placement>,
    read_only: HashSet<String>,
    restoring: bool,
    error: Option<String>,
    touched: BTreeSet<String>,
    accepted_legacy: HashSet<String>,
    consumed_legacy: Vec<(String, String, Value)>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::with_placement(Placement::identity())
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placement(placement: Placement) -> Self {
        let mut host = Self::without_placement();
        host.placements.insert(PLACEMENT.to_string(), placement);
        host
    }

    /// A host that lacks the placement attribute entirely.
    pub fn without_placement() -> Self {
        Self {
            placements: HashMap::new(),
            read_only: HashSet::new(),
            restoring: false,
            error: None,
            touched: BTreeSet::new(),
            accepted_legacy: HashSet::new(),
            consumed_legacy: Vec::new(),
        }
    }

    /// Current resolved placement, if the host has one.
    pub fn resolved(&self) -> Option<Placement> {
        self.placement(PLACEMENT)
    }

    pub fn accept_legacy(&mut self, name: &str) {
        self.accepted_legacy.insert(name.to_string());
    }

    pub fn consumed_legacy(&self) -> &[(String, String, Value)] {
        &self.consumed_legacy
    }

    pub fn touched(&self) -> impl Iterator<Item = &str> {
        self.touched.iter().map(|s| s.as_str())
    }
}

impl HostObject for MemoryHost {
    fn placement(&self, name: &str) -> Option<Placement> {
        self.placements.get(name).copied()
    }

    fn set_placement(&mut self, name: &str, placement: Placement) -> bool {
        match self.placements.get_mut(name) {
            Some(slot) => {
                *slot = placement;
                true
            }
            None => false,
        }
    }

    fn set_read_only(&mut self, name: &str, read_only: bool) {
        if read_only {
            self.read_only.insert(name.to_string());
        } else {
            self.read_only.remove(name);
        }
    }

    fn is_read_only(&self, name: &str) -> bool {
        self.read_only.contains(name)
    }

    fn is_restoring(&self) -> bool {
        self.restoring
    }

    fn set_restoring(&mut self, restoring: bool) {
        self.restoring = restoring;
    }

    fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn touch(&mut self, attribute: &str) {
        self.touched.insert(attribute.to_string());
    }

    fn is_touched(&self, attribute: &str) -> bool {
        self.touched.contains(attribute)
    }

    fn purge_touched(&mut self) {
        self.touched.clear();
    }

    fn handle_renamed_attribute(&mut self, name: &str, type_name: &str, value: &Value) -> bool {
        if !self.accepted_legacy.contains(name) {
            return false;
        }
        self.consumed_legacy
            .push((name.to_string(), type_name.to_string(), value.clone()));
        true
    }
}
