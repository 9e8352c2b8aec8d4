use crate::descriptor::Resource;
use crate::findings::{Finding, FindingCategory, FindingContainer};

/// Compares one resource definition across snapshots. Definitions are keyed
/// by resource type; a matched pair is compared by its pattern sets.
pub struct ResourceComparator<'r, 'c> {
    original: Option<&'r Resource>,
    update: Option<&'r Resource>,
    context: &'c str,
}

impl<'r, 'c> ResourceComparator<'r, 'c> {
    pub fn new(original: Option<&'r Resource>, update: Option<&'r Resource>, context: &'c str) -> Self {
        Self {
            original,
            update,
            context,
        }
    }

    pub fn compare(&self, findings: &mut FindingContainer) {
        match (self.original, self.update) {
            (None, None) => {}
            (None, Some(update)) => findings.add_finding(self.definition_finding(
                FindingCategory::ResourceDefinitionAddition,
                update,
            )),
            (Some(original), None) => findings.add_finding(self.definition_finding(
                FindingCategory::ResourceDefinitionRemoval,
                original,
            )),
            (Some(original), Some(update)) => {
                let original_patterns = original.patterns();
                let update_patterns = update.patterns();
                let context = format!("Resource {}", update.resource_type());
                for pattern in original_patterns.difference(&update_patterns) {
                    findings.add_finding(
                        Finding::new(
                            FindingCategory::ResourcePatternRemoval,
                            update.location.clone(),
                            *pattern,
                            context.as_str(),
                        )
                        .with_extra_info(update.scope.describe()),
                    );
                }
                for pattern in update_patterns.difference(&original_patterns) {
                    findings.add_finding(
                        Finding::new(
                            FindingCategory::ResourcePatternAddition,
                            update.location.clone(),
                            *pattern,
                            context.as_str(),
                        )
                        .with_extra_info(update.scope.describe()),
                    );
                }
            }
        }
    }

    fn definition_finding(&self, category: FindingCategory, resource: &Resource) -> Finding {
        let finding = Finding::new(
            category,
            resource.location.clone(),
            resource.resource_type(),
            self.context,
        );
        match &resource.owner {
            Some(owner) => finding.with_extra_info(owner.trim_start_matches('.')),
            None => finding.with_extra_info(resource.scope.describe()),
        }
    }
}
