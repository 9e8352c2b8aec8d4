use crate::compat::enum_value::EnumValueComparator;
use crate::compat::reconcile;
use crate::descriptor::{Enum, EnumValue};
use crate::findings::{Finding, FindingCategory, FindingContainer};

/// Compares one enum across snapshots, then its values keyed by number.
pub struct EnumComparator<'a, 'c> {
    original: Option<Enum<'a>>,
    update: Option<Enum<'a>>,
    context: &'c str,
}

impl<'a, 'c> EnumComparator<'a, 'c> {
    /// `context` names the scope the enum is declared in.
    pub fn new(original: Option<Enum<'a>>, update: Option<Enum<'a>>, context: &'c str) -> Self {
        Self {
            original,
            update,
            context,
        }
    }

    pub fn compare(&self, findings: &mut FindingContainer) {
        match (&self.original, &self.update) {
            (None, None) => {}
            (None, Some(update)) => findings.add_finding(
                Finding::new(
                    FindingCategory::EnumAddition,
                    update.location(),
                    update.name(),
                    self.context,
                )
                .with_extra_info(update.nested_path()),
            ),
            (Some(original), None) => findings.add_finding(
                Finding::new(
                    FindingCategory::EnumRemoval,
                    original.location(),
                    original.name(),
                    self.context,
                )
                .with_extra_info(original.nested_path()),
            ),
            (Some(original), Some(update)) => {
                let context = format!("Enum {}", update.nested_path());
                reconcile(
                    original.values(),
                    update.values(),
                    EnumValue::number,
                    |original, update| {
                        EnumValueComparator::new(original, update, &context).compare(findings)
                    },
                );
            }
        }
    }
}
