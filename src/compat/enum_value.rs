use crate::descriptor::EnumValue;
use crate::findings::{Finding, FindingCategory, FindingContainer};

/// Compares one enum value across snapshots. Values are matched by number,
/// so a matched pair can only differ in its name.
pub struct EnumValueComparator<'a, 'c> {
    original: Option<EnumValue<'a>>,
    update: Option<EnumValue<'a>>,
    context: &'c str,
}

impl<'a, 'c> EnumValueComparator<'a, 'c> {
    pub fn new(original: Option<EnumValue<'a>>, update: Option<EnumValue<'a>>, context: &'c str) -> Self {
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
                    FindingCategory::EnumValueAddition,
                    update.location(),
                    update.name(),
                    self.context,
                )
                .with_extra_info(update.nested_path()),
            ),
            (Some(original), None) => findings.add_finding(
                Finding::new(
                    FindingCategory::EnumValueRemoval,
                    original.location(),
                    original.name(),
                    self.context,
                )
                .with_extra_info(original.nested_path()),
            ),
            (Some(original), Some(update)) => {
                if original.name() != update.name() {
                    findings.add_finding(
                        Finding::new(
                            FindingCategory::EnumValueNameChange,
                            update.location(),
                            update.name(),
                            self.context,
                        )
                        .with_old_subject(original.name())
                        .with_extra_info(update.nested_path()),
                    );
                }
            }
        }
    }
}
