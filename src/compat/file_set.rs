//! Entry point of a comparison run.

use crate::compat::file::FileComparator;
use crate::compat::packaging::PackagingOptionsComparator;
use crate::compat::CompareContext;
use crate::config::DetectorConfig;
use crate::descriptor::{File, FileSet};
use crate::findings::FindingContainer;
use crate::registry::TypeRegistry;
use crate::snapshot::Snapshot;
use crate::version::normalize_package;

/// Compares two snapshots.
///
/// Findings are produced in a fixed order: packaging options per package,
/// then the original files in declared order (each compared with its
/// counterpart, or reported as removed), then updated files without a
/// counterpart.
pub struct FileSetComparator<'s> {
    original: &'s Snapshot,
    update: &'s Snapshot,
    config: &'s DetectorConfig,
}

impl<'s> FileSetComparator<'s> {
    pub fn new(original: &'s Snapshot, update: &'s Snapshot, config: &'s DetectorConfig) -> Self {
        Self {
            original,
            update,
            config,
        }
    }

    pub fn compare(&self, findings: &mut FindingContainer) {
        if self.original.fingerprint() == self.update.fingerprint() {
            tracing::debug!(fingerprint = self.original.fingerprint(), "snapshots are identical");
            return;
        }

        let original_files = FileSet::new(self.original.descriptor_set());
        let update_files = FileSet::new(self.update.descriptor_set());
        let original_registry = TypeRegistry::build(&original_files);
        let update_registry = TypeRegistry::build(&update_files);
        tracing::debug!(
            original_types = original_registry.len(),
            update_types = update_registry.len(),
            "built type registries"
        );
        let ctx = CompareContext::new(&original_registry, &update_registry, self.config.unresolved_types);

        let original = self.api_files(&original_files);
        let update = self.api_files(&update_files);

        for (original_group, update_group) in package_groups(&original, &update) {
            PackagingOptionsComparator::new(original_group, update_group).compare(findings);
        }

        for (original, update) in match_files(&original, &update) {
            FileComparator::new(original, update, ctx).compare(findings);
        }
        tracing::debug!(findings = findings.len(), "compared snapshots");
    }

    /// Files under check; the others only take part in type resolution.
    fn api_files<'f, 'a>(&self, files: &'f FileSet<'a>) -> Vec<&'f File<'a>> {
        files
            .files()
            .iter()
            .filter(|file| self.config.includes_package(file.package()))
            .collect()
    }
}

/// Pairs files by name, then by package up to version components. Original
/// files come first in declared order, each with its counterpart if any,
/// followed by the update files left without one.
fn match_files<'f, 'a>(
    original: &[&'f File<'a>],
    update: &[&'f File<'a>],
) -> Vec<(Option<&'f File<'a>>, Option<&'f File<'a>>)> {
    let mut counterparts: Vec<Option<usize>> = vec![None; original.len()];
    let mut taken = vec![false; update.len()];

    for (index, file) in original.iter().enumerate() {
        if let Some(found) = (0..update.len()).find(|&i| !taken[i] && update[i].name() == file.name()) {
            counterparts[index] = Some(found);
            taken[found] = true;
        }
    }

    for (index, file) in original.iter().enumerate() {
        if counterparts[index].is_some() || file.package().is_empty() {
            continue;
        }
        let package = normalize_package(file.package());
        if let Some(found) =
            (0..update.len()).find(|&i| !taken[i] && normalize_package(update[i].package()) == package)
        {
            tracing::debug!(
                original = file.name(),
                update = update[found].name(),
                "matched files by package"
            );
            counterparts[index] = Some(found);
            taken[found] = true;
        }
    }

    let mut pairs: Vec<_> = original
        .iter()
        .zip(counterparts)
        .map(|(file, counterpart)| (Some(*file), counterpart.map(|i| update[i])))
        .collect();
    pairs.extend(
        update
            .iter()
            .zip(taken)
            .filter(|(_, taken)| !taken)
            .map(|(file, _)| (None, Some(*file))),
    );
    pairs
}

/// Groups files by package up to version components, keeping the groups
/// present on both sides in order of first appearance in `original`.
fn package_groups<'f, 'a>(
    original: &[&'f File<'a>],
    update: &[&'f File<'a>],
) -> Vec<(Vec<&'f File<'a>>, Vec<&'f File<'a>>)> {
    let mut groups: Vec<(String, Vec<&'f File<'a>>)> = Vec::new();
    for file in original {
        let package = normalize_package(file.package());
        match groups.iter_mut().find(|(key, _)| *key == package) {
            Some((_, files)) => files.push(*file),
            None => groups.push((package, vec![*file])),
        }
    }
    groups
        .into_iter()
        .filter_map(|(package, files)| {
            let counterparts: Vec<_> = update
                .iter()
                .filter(|file| normalize_package(file.package()) == package)
                .copied()
                .collect();
            (!counterparts.is_empty()).then_some((files, counterparts))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::test_support::file;
    use protobuf::descriptor::{FileDescriptorProto, FileDescriptorSet};

    fn set(files: Vec<FileDescriptorProto>) -> FileDescriptorSet {
        let mut set = FileDescriptorSet::new();
        set.file = files;
        set
    }

    fn names<'a>(pairs: &[(Option<&File<'a>>, Option<&File<'a>>)]) -> Vec<(Option<&'a str>, Option<&'a str>)> {
        pairs
            .iter()
            .map(|(o, u)| (o.map(|f| f.name()), u.map(|f| f.name())))
            .collect()
    }

    #[test]
    fn files_match_by_name_then_package() {
        let original = set(vec![
            file("a.proto", "example.v1", vec![]),
            file("b.proto", "example.v1", vec![]),
            file("gone.proto", "other.v1", vec![]),
        ]);
        let update = set(vec![
            file("new.proto", "fresh", vec![]),
            file("renamed.proto", "example.v1beta1", vec![]),
            file("a.proto", "example.v1beta1", vec![]),
        ]);
        let original_files = FileSet::new(&original);
        let update_files = FileSet::new(&update);
        let original: Vec<_> = original_files.files().iter().collect();
        let update: Vec<_> = update_files.files().iter().collect();

        assert_eq!(
            names(&match_files(&original, &update)),
            vec![
                (Some("a.proto"), Some("a.proto")),
                (Some("b.proto"), Some("renamed.proto")),
                (Some("gone.proto"), None),
                (None, Some("new.proto")),
            ]
        );
    }

    #[test]
    fn files_without_package_only_match_by_name() {
        let original = set(vec![file("a.proto", "", vec![])]);
        let update = set(vec![file("b.proto", "", vec![])]);
        let original_files = FileSet::new(&original);
        let update_files = FileSet::new(&update);
        let original: Vec<_> = original_files.files().iter().collect();
        let update: Vec<_> = update_files.files().iter().collect();

        assert_eq!(
            names(&match_files(&original, &update)),
            vec![(Some("a.proto"), None), (None, Some("b.proto"))]
        );
    }

    #[test]
    fn package_groups_pair_versions() {
        let original = set(vec![
            file("a.proto", "example.v1", vec![]),
            file("b.proto", "example.v1", vec![]),
            file("c.proto", "other.v1", vec![]),
        ]);
        let update = set(vec![file("a.proto", "example.v2", vec![])]);
        let original_files = FileSet::new(&original);
        let update_files = FileSet::new(&update);
        let original: Vec<_> = original_files.files().iter().collect();
        let update: Vec<_> = update_files.files().iter().collect();

        let groups = package_groups(&original, &update);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0.len(), 2);
        assert_eq!(groups[0].1[0].package(), "example.v2");
    }

    #[test]
    fn identical_snapshots_short_circuit() {
        let snapshot = Snapshot::from_descriptor_set(set(vec![file("a.proto", "example.v1", vec![])])).unwrap();
        let mut findings = FindingContainer::new();
        FileSetComparator::new(&snapshot, &snapshot, &DetectorConfig::default()).compare(&mut findings);
        assert!(findings.is_empty());
    }
}
