//! The record emitted for one detected difference.

use crate::findings::category::{ChangeType, FindingCategory};
use serde::{Deserialize, Serialize};

/// Where a finding points to in the schema sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Name of the proto file, as recorded in its descriptor.
    pub proto_file_name: String,
    /// Line number (1-based), when the descriptor carries source info.
    pub source_code_line: Option<u32>,
}

impl Location {
    pub fn new(proto_file_name: impl Into<String>, source_code_line: Option<u32>) -> Self {
        Self {
            proto_file_name: proto_file_name.into(),
            source_code_line,
        }
    }
}

/// One difference between the original and the updated snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub change_type: ChangeType,
    pub location: Location,
    /// Primary affected name.
    pub subject: String,
    /// Pre-change name, for rename categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_subject: Option<String>,
    /// Containing scope, e.g. `Message Outer.Inner`.
    pub context: String,
    /// Disambiguating path for nested elements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
}

impl Finding {
    /// Creates a finding with the category's default severity.
    pub fn new(
        category: FindingCategory,
        location: Location,
        subject: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            category,
            change_type: category.default_change_type(),
            location,
            subject: subject.into(),
            old_subject: None,
            context: context.into(),
            extra_info: None,
        }
    }

    pub fn with_change_type(mut self, change_type: ChangeType) -> Self {
        self.change_type = change_type;
        self
    }

    pub fn with_old_subject(mut self, old_subject: impl Into<String>) -> Self {
        self.old_subject = Some(old_subject.into());
        self
    }

    pub fn with_extra_info(mut self, extra_info: impl Into<String>) -> Self {
        self.extra_info = Some(extra_info.into());
        self
    }

    pub fn is_breaking(&self) -> bool {
        self.change_type == ChangeType::Major
    }

    /// One-line plain text description.
    pub fn human_readable_message(&self) -> String {
        let position = match self.location.source_code_line {
            Some(line) => format!("{}:{}", self.location.proto_file_name, line),
            None => self.location.proto_file_name.clone(),
        };
        let subject = match &self.old_subject {
            Some(old) => format!("`{old}` -> `{}`", self.subject),
            None => format!("`{}`", self.subject),
        };
        let mut message = format!(
            "{position}: [{}] {} {subject} in {}",
            self.change_type, self.category, self.context
        );
        if let Some(extra) = &self.extra_info {
            message.push_str(&format!(" ({extra})"));
        }
        message
    }
}
