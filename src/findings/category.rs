//! Closed taxonomy of change categories and their severities.

use serde::{Deserialize, Serialize};

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    /// Breaking: can invalidate a previously valid consumer.
    Major,
    /// Additive: cannot invalidate a previously valid consumer.
    Minor,
}

impl ChangeType {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeType::Major => "MAJOR",
            ChangeType::Minor => "MINOR",
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! finding_categories {
    (
        $(
            $(#[$doc:meta])*
            ($variant:ident, $id:literal, $change_type:ident)
        ),* $(,)?
    ) => {
        /// Category of a detected difference between two snapshots.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum FindingCategory {
            $(
                $(#[$doc])*
                $variant,
            )*
        }

        impl FindingCategory {
            /// Stable identifier, e.g. `FIELD_NAME_CHANGE`.
            pub fn id(&self) -> &'static str {
                match self {
                    $(FindingCategory::$variant => $id,)*
                }
            }

            /// Severity this category carries unless a policy overrides it.
            pub fn default_change_type(&self) -> ChangeType {
                match self {
                    $(FindingCategory::$variant => ChangeType::$change_type,)*
                }
            }

            pub fn from_id(id: &str) -> Option<Self> {
                match id {
                    $($id => Some(FindingCategory::$variant),)*
                    _ => None,
                }
            }

            pub fn all() -> &'static [FindingCategory] {
                &[$(FindingCategory::$variant,)*]
            }
        }
    };
}

finding_categories! {
    (MessageAddition, "MESSAGE_ADDITION", Minor),
    (MessageRemoval, "MESSAGE_REMOVAL", Major),

    (FieldAddition, "FIELD_ADDITION", Minor),
    (FieldRemoval, "FIELD_REMOVAL", Major),
    (FieldNameChange, "FIELD_NAME_CHANGE", Major),
    (FieldTypeChange, "FIELD_TYPE_CHANGE", Major),
    /// optional / required / repeated changed.
    (FieldLabelChange, "FIELD_LABEL_CHANGE", Major),
    (FieldOneofMoveIn, "FIELD_ONEOF_MOVE_IN", Major),
    (FieldOneofMoveOut, "FIELD_ONEOF_MOVE_OUT", Major),

    (EnumAddition, "ENUM_ADDITION", Minor),
    (EnumRemoval, "ENUM_REMOVAL", Major),
    (EnumValueAddition, "ENUM_VALUE_ADDITION", Minor),
    (EnumValueRemoval, "ENUM_VALUE_REMOVAL", Major),
    (EnumValueNameChange, "ENUM_VALUE_NAME_CHANGE", Major),

    (ServiceAddition, "SERVICE_ADDITION", Minor),
    (ServiceRemoval, "SERVICE_REMOVAL", Major),
    (MethodAddition, "METHOD_ADDITION", Minor),
    (MethodRemoval, "METHOD_REMOVAL", Major),
    (MethodInputTypeChange, "METHOD_INPUT_TYPE_CHANGE", Major),
    (MethodResponseTypeChange, "METHOD_RESPONSE_TYPE_CHANGE", Major),
    (MethodClientStreamingChange, "METHOD_CLIENT_STREAMING_CHANGE", Major),
    (MethodServerStreamingChange, "METHOD_SERVER_STREAMING_CHANGE", Major),
    /// `google.api.method_signature` annotations.
    (MethodSignatureAddition, "METHOD_SIGNATURE_ADDITION", Minor),
    (MethodSignatureRemoval, "METHOD_SIGNATURE_REMOVAL", Major),
    (MethodSignatureChange, "METHOD_SIGNATURE_CHANGE", Major),

    (ResourceDefinitionAddition, "RESOURCE_DEFINITION_ADDITION", Minor),
    (ResourceDefinitionRemoval, "RESOURCE_DEFINITION_REMOVAL", Major),
    (ResourcePatternAddition, "RESOURCE_PATTERN_ADDITION", Minor),
    (ResourcePatternRemoval, "RESOURCE_PATTERN_REMOVAL", Major),

    (PackagingOptionAddition, "PACKAGING_OPTION_ADDITION", Minor),
    (PackagingOptionRemoval, "PACKAGING_OPTION_REMOVAL", Major),
    (PackagingOptionChange, "PACKAGING_OPTION_CHANGE", Major),

    /// A type reference changed and could not be resolved in its snapshot.
    /// Severity comes from [`UnresolvedTypePolicy`](crate::config::UnresolvedTypePolicy).
    (TypeReferenceUnresolved, "TYPE_REFERENCE_UNRESOLVED", Minor),
}

impl std::fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for FindingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Unknown finding category: {s}"))
    }
}
