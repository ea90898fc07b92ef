//! Attribute specifications and registry.
//!
//! This module defines the schema for the attachment attributes: what kind of
//! value each holds, how it is persisted, and how it behaves when it changes.

/// Name of the host attribute that receives the resolved placement.
pub const PLACEMENT: &str = "Placement";

pub const ATTACHER_TYPE: &str = "AttacherType";
pub const SUPPORT: &str = "AttachmentSupport";
pub const MAP_MODE: &str = "MapMode";
pub const MAP_REVERSED: &str = "MapReversed";
pub const PATH_PARAMETER: &str = "MapPathParameter";
pub const OFFSET: &str = "AttachmentOffset";

/// The kind of value an attribute holds.
///
/// Each kind maps to one persisted type name, which is what the document
/// reader hands back when restoring (and what legacy migration keys on).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Free text (e.g., `AttacherType`)
    Text,

    /// Ordered list of support references (e.g., `AttachmentSupport`)
    LinkSubList,

    /// Single support reference. Only appears in old documents.
    LinkSub,

    /// Closed set of values (e.g., `MapMode`)
    Enum,

    /// Simple boolean (e.g., `MapReversed`)
    Bool,

    /// Real number (e.g., `MapPathParameter`)
    Float,

    /// Position + orientation (e.g., `AttachmentOffset`)
    Placement,
}

impl AttributeKind {
    pub const fn type_name(&self) -> &'static str {
        match self {
            AttributeKind::Text => "PropertyString",
            AttributeKind::LinkSubList => "PropertyLinkSubList",
            AttributeKind::LinkSub => "PropertyLinkSub",
            AttributeKind::Enum => "PropertyEnumeration",
            AttributeKind::Bool => "PropertyBool",
            AttributeKind::Float => "PropertyFloat",
            AttributeKind::Placement => "PropertyPlacement",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        [
            AttributeKind::Text,
            AttributeKind::LinkSubList,
            AttributeKind::LinkSub,
            AttributeKind::Enum,
            AttributeKind::Bool,
            AttributeKind::Float,
            AttributeKind::Placement,
        ]
        .into_iter()
        .find(|kind| kind.type_name() == name)
    }
}

/// Specification for a single attribute.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    /// The attribute name as persisted (e.g., "MapMode")
    pub name: &'static str,

    /// The kind of value this attribute holds
    pub kind: AttributeKind,

    /// Property-editor group
    pub group: &'static str,

    /// One-line description shown to the user
    pub doc: &'static str,

    /// Whether the attribute starts out hidden
    pub hidden: bool,

    /// Whether a change re-runs the resolution and the visibility update
    pub triggers_update: bool,
}

impl AttributeSpec {
    const fn new(name: &'static str, kind: AttributeKind, doc: &'static str) -> Self {
        Self {
            name,
            kind,
            group: "Attachment",
            doc,
            hidden: false,
            triggers_update: false,
        }
    }

    const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    const fn triggers_update(mut self) -> Self {
        self.triggers_update = true;
        self
    }
}

/// Registry of all attachment attributes, in declaration order.
pub const ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::new(
        ATTACHER_TYPE,
        AttributeKind::Text,
        "Class name of attach engine object driving the attachment.",
    )
    .hidden(),
    AttributeSpec::new(SUPPORT, AttributeKind::LinkSubList, "Support of the 2D geometry")
        .triggers_update(),
    AttributeSpec::new(MAP_MODE, AttributeKind::Enum, "Mode of attachment to other object")
        .triggers_update(),
    AttributeSpec::new(
        MAP_REVERSED,
        AttributeKind::Bool,
        "Reverse Z direction (flip sketch upside down)",
    )
    .hidden()
    .triggers_update(),
    AttributeSpec::new(
        PATH_PARAMETER,
        AttributeKind::Float,
        "Sets point of curve to map the sketch to. 0..1 = start..end",
    )
    .hidden()
    .triggers_update(),
    AttributeSpec::new(
        OFFSET,
        AttributeKind::Placement,
        "Extra placement to apply in addition to attachment (in local coordinates)",
    )
    .hidden()
    .triggers_update(),
];

/// Look up an attribute spec by name.
pub fn get_spec(name: &str) -> Option<&'static AttributeSpec> {
    ATTRIBUTES.iter().find(|spec| spec.name == name)
}

/// Names of the attributes whose change re-runs the attachment.
pub fn update_triggers() -> impl Iterator<Item = &'static str> {
    ATTRIBUTES
        .iter()
        .filter(|spec| spec.triggers_update)
        .map(|spec| spec.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_expected_entries() {
        for name in [
            ATTACHER_TYPE,
            SUPPORT,
            MAP_MODE,
            MAP_REVERSED,
            PATH_PARAMETER,
            OFFSET,
        ] {
            assert!(get_spec(name).is_some(), "missing spec for {}", name);
        }
        assert!(get_spec(PLACEMENT).is_none());
    }

    #[test]
    fn attacher_type_is_hidden_and_inert() {
        let spec = get_spec(ATTACHER_TYPE).unwrap();
        assert!(spec.hidden);
        assert!(!spec.triggers_update);
        assert_eq!(spec.kind, AttributeKind::Text);
    }

    #[test]
    fn dependent_attributes_start_hidden() {
        assert!(get_spec(MAP_REVERSED).unwrap().hidden);
        assert!(get_spec(PATH_PARAMETER).unwrap().hidden);
        assert!(get_spec(OFFSET).unwrap().hidden);
        assert!(!get_spec(SUPPORT).unwrap().hidden);
        assert!(!get_spec(MAP_MODE).unwrap().hidden);
    }

    #[test]
    fn update_triggers_are_the_five_configuration_attributes() {
        let triggers: Vec<_> = update_triggers().collect();
        assert_eq!(
            triggers,
            vec![SUPPORT, MAP_MODE, MAP_REVERSED, PATH_PARAMETER, OFFSET]
        );
    }

    #[test]
    fn type_names_round_trip() {
        assert_eq!(
            AttributeKind::from_type_name("PropertyLinkSub"),
            Some(AttributeKind::LinkSub)
        );
        assert_eq!(AttributeKind::from_type_name("PropertyVector"), None);
    }
}
