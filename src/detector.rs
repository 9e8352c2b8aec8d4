//! One detection run over two snapshots.

use crate::compat::FileSetComparator;
use crate::config::DetectorConfig;
use crate::findings::FindingContainer;
use crate::snapshot::Snapshot;

pub struct Detector<'s> {
    original: &'s Snapshot,
    update: &'s Snapshot,
    config: &'s DetectorConfig,
}

impl<'s> Detector<'s> {
    pub fn new(original: &'s Snapshot, update: &'s Snapshot, config: &'s DetectorConfig) -> Self {
        Self {
            original,
            update,
            config,
        }
    }

    /// Runs the comparison and drops findings of ignored categories.
    pub fn detect(&self) -> FindingContainer {
        let mut all = FindingContainer::new();
        FileSetComparator::new(self.original, self.update, self.config).compare(&mut all);

        let mut findings = FindingContainer::new();
        for finding in all.into_findings() {
            if self.config.ignore_categories.contains(&finding.category) {
                tracing::trace!(category = %finding.category, subject = %finding.subject, "ignored");
                continue;
            }
            findings.add_finding(finding);
        }

        tracing::info!(
            findings = findings.len(),
            breaking = findings.get_actionable_findings().len(),
            "detection finished"
        );
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::FindingCategory;
    use protobuf::descriptor::{FileDescriptorProto, FileDescriptorSet, ServiceDescriptorProto};

    fn snapshot(services: &[&str]) -> Snapshot {
        let mut file = FileDescriptorProto::new();
        file.set_name("a.proto".to_string());
        file.set_package("example.v1".to_string());
        for name in services {
            let mut service = ServiceDescriptorProto::new();
            service.set_name(name.to_string());
            file.service.push(service);
        }
        let mut set = FileDescriptorSet::new();
        set.file.push(file);
        Snapshot::from_descriptor_set(set).unwrap()
    }

    #[test]
    fn ignored_categories_are_dropped() {
        let original = snapshot(&["Gone"]);
        let update = snapshot(&["Fresh"]);

        let config = DetectorConfig::default();
        let findings = Detector::new(&original, &update, &config).detect();
        assert_eq!(findings.len(), 2);

        let config = DetectorConfig {
            ignore_categories: vec![FindingCategory::ServiceRemoval],
            ..Default::default()
        };
        let findings = Detector::new(&original, &update, &config).detect();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.get_all_findings()[0].category, FindingCategory::ServiceAddition);
        assert!(!findings.has_breaking_changes());
    }
}
