//! Structural comparators.
//!
//! Every comparator takes an original and an updated element, either of which
//! may be absent, and appends findings to a [`FindingContainer`]. Containers
//! recurse into their children through [`reconcile`], so each comparator can
//! be exercised on its own.
//!
//! [`FindingContainer`]: crate::findings::FindingContainer

pub mod enum_value;
pub mod enums;
pub mod field;
pub mod file;
pub mod file_set;
pub mod message;
pub mod method;
pub mod packaging;
pub mod reconcile;
pub mod resource;
pub mod service;

pub use enum_value::EnumValueComparator;
pub use enums::EnumComparator;
pub use field::FieldComparator;
pub use file::FileComparator;
pub use file_set::FileSetComparator;
pub use message::MessageComparator;
pub use method::MethodComparator;
pub use packaging::PackagingOptionsComparator;
pub use reconcile::reconcile;
pub use resource::ResourceComparator;
pub use service::ServiceComparator;

use crate::config::UnresolvedTypePolicy;
use crate::registry::TypeRegistry;
use crate::version::normalize_full_name;

/// Outcome of comparing two type references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeReference {
    /// Both refer to the same type, allowing for a version bump.
    Same,
    /// Both resolve, to different types.
    Changed,
    /// The reference changed and at least one side does not resolve.
    Unresolved,
}

/// Read-only state shared by every comparator of one run.
#[derive(Debug, Clone, Copy)]
pub struct CompareContext<'a> {
    pub original: &'a TypeRegistry<'a>,
    pub update: &'a TypeRegistry<'a>,
    pub unresolved_types: UnresolvedTypePolicy,
}

impl<'a> CompareContext<'a> {
    pub fn new(
        original: &'a TypeRegistry<'a>,
        update: &'a TypeRegistry<'a>,
        unresolved_types: UnresolvedTypePolicy,
    ) -> Self {
        Self {
            original,
            update,
            unresolved_types,
        }
    }

    /// Compares a reference written in the original snapshot with one written
    /// in the update, each resolved in its own snapshot from its own scope.
    pub fn compare_type_references(
        &self,
        original_name: &str,
        original_scope: &str,
        update_name: &str,
        update_scope: &str,
    ) -> TypeReference {
        let original = self.original.resolve(original_name, original_scope);
        let update = self.update.resolve(update_name, update_scope);
        match (original, update) {
            (Some(original), Some(update)) => {
                if original.normalized_name() == update.normalized_name() {
                    TypeReference::Same
                } else {
                    TypeReference::Changed
                }
            }
            _ if normalize_full_name(original_name) == normalize_full_name(update_name) => {
                TypeReference::Same
            }
            (original, update) => {
                tracing::debug!(
                    original = original_name,
                    original_resolved = original.is_some(),
                    update = update_name,
                    update_resolved = update.is_some(),
                    "unresolved type reference"
                );
                TypeReference::Unresolved
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::descriptor::FileSet;
    use protobuf::descriptor::FileDescriptorSet;

    fn set(package: &str, messages: &[&str]) -> FileDescriptorSet {
        let mut set = FileDescriptorSet::new();
        set.file.push(file(
            "a.proto",
            package,
            messages.iter().map(|name| message(name, vec![])).collect(),
        ));
        set
    }

    #[test]
    fn references_compare_through_resolution() {
        let original_set = set("example.v1", &["Foo", "Bar"]);
        let update_set = set("example.v1beta1", &["Foo", "Bar"]);
        let original_files = FileSet::new(&original_set);
        let update_files = FileSet::new(&update_set);
        let original = TypeRegistry::build(&original_files);
        let update = TypeRegistry::build(&update_files);
        let ctx = CompareContext::new(&original, &update, UnresolvedTypePolicy::Minor);

        assert_eq!(
            ctx.compare_type_references("Foo", ".example.v1.Foo", ".example.v1beta1.Foo", ".example.v1beta1.Foo"),
            TypeReference::Same
        );
        assert_eq!(
            ctx.compare_type_references("Foo", ".example.v1", "Bar", ".example.v1beta1"),
            TypeReference::Changed
        );
        assert_eq!(
            ctx.compare_type_references("Foo", ".example.v1", "Missing", ".example.v1beta1"),
            TypeReference::Unresolved
        );
        assert_eq!(
            ctx.compare_type_references(
                ".google.protobuf.Empty",
                ".example.v1",
                ".google.protobuf.Empty",
                ".example.v1beta1"
            ),
            TypeReference::Same
        );
    }
}
