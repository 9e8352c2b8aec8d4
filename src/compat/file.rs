use crate::compat::enums::EnumComparator;
use crate::compat::message::MessageComparator;
use crate::compat::resource::ResourceComparator;
use crate::compat::service::ServiceComparator;
use crate::compat::{CompareContext, reconcile};
use crate::descriptor::{Enum, File, Message, ResourceIndex, ResourceScope};
use crate::findings::FindingContainer;
use crate::registry::{TypeDefinition, TypeRegistry};

/// Compares one file across snapshots: services, top-level messages and
/// enums, then file-level and message-level resource definitions.
///
/// A side is absent when the file has no counterpart, in which case every
/// child is reported as added or removed. Top-level types and services
/// missing from the counterpart file are first looked up in the whole
/// counterpart snapshot, so a definition that moved to another file is
/// compared instead of reported.
pub struct FileComparator<'a> {
    original: Option<&'a File<'a>>,
    update: Option<&'a File<'a>>,
    ctx: CompareContext<'a>,
}

impl<'a> FileComparator<'a> {
    pub fn new(original: Option<&'a File<'a>>, update: Option<&'a File<'a>>, ctx: CompareContext<'a>) -> Self {
        Self { original, update, ctx }
    }

    pub fn compare(&self, findings: &mut FindingContainer) {
        let Some(name) = self.update.or(self.original).map(File::name) else {
            return;
        };
        let context = format!("File {name}");
        self.compare_services(&context, findings);
        self.compare_messages(&context, findings);
        self.compare_enums(&context, findings);
        self.compare_resources(&context, findings);
    }

    fn compare_services(&self, context: &str, findings: &mut FindingContainer) {
        let ctx = self.ctx;
        reconcile(
            self.original.map(File::services).unwrap_or_default(),
            self.update.map(File::services).unwrap_or_default(),
            |service| service.name(),
            |original, update| match (original, update) {
                (Some(original), None) => {
                    let moved = ctx.update.service(&original.full_name()).cloned();
                    ServiceComparator::new(Some(original), moved, ctx, context).compare(findings)
                }
                (None, Some(update)) => {
                    if ctx.original.service(&update.full_name()).is_none() {
                        ServiceComparator::new(None, Some(update), ctx, context).compare(findings)
                    }
                }
                (original, update) => {
                    ServiceComparator::new(original, update, ctx, context).compare(findings)
                }
            },
        );
    }

    fn compare_messages(&self, context: &str, findings: &mut FindingContainer) {
        let ctx = self.ctx;
        reconcile(
            self.original.map(File::messages).unwrap_or_default(),
            self.update.map(File::messages).unwrap_or_default(),
            Message::normalized_name,
            |original, update| match (original, update) {
                (Some(original), None) => {
                    let moved = match counterpart(
                        ctx.update,
                        ctx.original,
                        original.full_name(),
                        &original.normalized_name(),
                    ) {
                        Some(TypeDefinition::Message(moved)) => Some(moved.clone()),
                        _ => None,
                    };
                    if let Some(moved) = &moved {
                        tracing::debug!(
                            message = original.full_name(),
                            to = moved.file().name(),
                            "message moved to another file"
                        );
                    }
                    MessageComparator::new(Some(original), moved, ctx, context).compare(findings)
                }
                (None, Some(update)) => {
                    if !matches!(
                        counterpart(
                            ctx.original,
                            ctx.update,
                            update.full_name(),
                            &update.normalized_name()
                        ),
                        Some(TypeDefinition::Message(_))
                    ) {
                        MessageComparator::new(None, Some(update), ctx, context).compare(findings)
                    }
                }
                (original, update) => {
                    MessageComparator::new(original, update, ctx, context).compare(findings)
                }
            },
        );
    }

    fn compare_enums(&self, context: &str, findings: &mut FindingContainer) {
        let ctx = self.ctx;
        reconcile(
            self.original.map(File::enums).unwrap_or_default(),
            self.update.map(File::enums).unwrap_or_default(),
            Enum::normalized_name,
            |original, update| match (original, update) {
                (Some(original), None) => {
                    let moved = match counterpart(
                        ctx.update,
                        ctx.original,
                        original.full_name(),
                        &original.normalized_name(),
                    ) {
                        Some(TypeDefinition::Enum(moved)) => Some(moved.clone()),
                        _ => None,
                    };
                    EnumComparator::new(Some(original), moved, context).compare(findings)
                }
                (None, Some(update)) => {
                    if !matches!(
                        counterpart(
                            ctx.original,
                            ctx.update,
                            update.full_name(),
                            &update.normalized_name()
                        ),
                        Some(TypeDefinition::Enum(_))
                    ) {
                        EnumComparator::new(None, Some(update), context).compare(findings)
                    }
                }
                (original, update) => EnumComparator::new(original, update, context).compare(findings),
            },
        );
    }

    fn compare_resources(&self, context: &str, findings: &mut FindingContainer) {
        let original = self.original.map(File::resources).unwrap_or_default();
        let update = self.update.map(File::resources).unwrap_or_default();
        if original.is_empty() && update.is_empty() {
            return;
        }
        for scope in [ResourceScope::File, ResourceScope::Message] {
            self.compare_resource_scope(scope, &original, &update, context, findings);
        }
    }

    fn compare_resource_scope(
        &self,
        scope: ResourceScope,
        original: &ResourceIndex,
        update: &ResourceIndex,
        context: &str,
        findings: &mut FindingContainer,
    ) {
        let ctx = self.ctx;
        reconcile(
            original.in_scope(scope),
            update.in_scope(scope),
            |resource| resource.resource_type().to_string(),
            |original, update| match (original, update) {
                (Some(original), None) => {
                    let moved = ctx.update.resources().get(scope, original.resource_type());
                    ResourceComparator::new(Some(original), moved, context).compare(findings)
                }
                (None, Some(update)) => {
                    if ctx.original.resources().get(scope, update.resource_type()).is_none() {
                        ResourceComparator::new(None, Some(update), context).compare(findings)
                    }
                }
                (original, update) => ResourceComparator::new(original, update, context).compare(findings),
            },
        );
    }
}

/// The definition standing in for `full_name` in `registry`, the other
/// snapshot: the same full name if present, otherwise the same name up to
/// package version components. A candidate of the second kind only counts
/// when its own full name is gone from `own`, the snapshot `full_name` comes
/// from; otherwise it is matched to itself there.
fn counterpart<'r, 'a>(
    registry: &'r TypeRegistry<'a>,
    own: &TypeRegistry<'_>,
    full_name: &str,
    normalized_name: &str,
) -> Option<&'r TypeDefinition<'a>> {
    registry.get(full_name).or_else(|| {
        registry
            .find_normalized(normalized_name)
            .filter(|candidate| own.get(candidate.full_name()).is_none())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::test_support::{enumeration, field, file, message, message_field};
    use crate::config::UnresolvedTypePolicy;
    use crate::descriptor::FileSet;
    use crate::findings::FindingCategory;
    use pretty_assertions::assert_eq;
    use protobuf::descriptor::field_descriptor_proto::Type;
    use protobuf::descriptor::{
        FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
    };

    fn set(files: Vec<FileDescriptorProto>) -> FileDescriptorSet {
        let mut set = FileDescriptorSet::new();
        set.file = files;
        set
    }

    /// Compares the first file of each set, with registries over both sets.
    fn compare_first(original: FileDescriptorSet, update: FileDescriptorSet) -> Vec<(FindingCategory, String, String)> {
        compare_files(original, update, Some(0), Some(0))
    }

    /// Compares the files at the given positions; `None` stands for a file
    /// without counterpart.
    fn compare_files(
        original: FileDescriptorSet,
        update: FileDescriptorSet,
        original_index: Option<usize>,
        update_index: Option<usize>,
    ) -> Vec<(FindingCategory, String, String)> {
        let original_files = FileSet::new(&original);
        let update_files = FileSet::new(&update);
        let original_registry = TypeRegistry::build(&original_files);
        let update_registry = TypeRegistry::build(&update_files);
        let ctx = CompareContext::new(&original_registry, &update_registry, UnresolvedTypePolicy::Minor);

        let mut findings = FindingContainer::new();
        FileComparator::new(
            original_index.and_then(|index| original_files.files().get(index)),
            update_index.and_then(|index| update_files.files().get(index)),
            ctx,
        )
        .compare(&mut findings);
        findings
            .into_findings()
            .into_iter()
            .map(|f| (f.category, f.subject, f.location.proto_file_name))
            .collect()
    }

    fn service(name: &str, methods: &[&str]) -> ServiceDescriptorProto {
        let mut service = ServiceDescriptorProto::new();
        service.set_name(name.to_string());
        for method_name in methods {
            let mut method = MethodDescriptorProto::new();
            method.set_name(method_name.to_string());
            method.set_input_type(".example.v1.Foo".to_string());
            method.set_output_type(".example.v1.Foo".to_string());
            service.method.push(method);
        }
        service
    }

    #[test]
    fn moved_message_is_compared_not_removed() {
        let original = set(vec![file(
            "a.proto",
            "example.v1",
            vec![message("Foo", vec![field("id", 1, Type::TYPE_STRING)])],
        )]);
        let update = set(vec![
            file("a.proto", "example.v1", vec![]),
            file(
                "b.proto",
                "example.v1",
                vec![message("Foo", vec![field("name", 1, Type::TYPE_STRING)])],
            ),
        ]);
        assert_eq!(
            compare_first(original, update),
            vec![(FindingCategory::FieldNameChange, "name".to_string(), "b.proto".to_string())]
        );
    }

    #[test]
    fn type_moved_into_this_file_is_not_an_addition() {
        let original = set(vec![
            file("a.proto", "example.v1", vec![]),
            file("b.proto", "example.v1", vec![message("Foo", vec![])]),
        ]);
        let update = set(vec![file("a.proto", "example.v1", vec![message("Foo", vec![])])]);
        assert!(compare_first(original, update).is_empty());
    }

    #[test]
    fn unmatched_file_reports_every_child() {
        let mut proto = file(
            "a.proto",
            "example.v1",
            vec![message("Foo", vec![message_field("bar", 1, "Bar")]), message("Bar", vec![])],
        );
        proto.enum_type.push(enumeration("Color", &[("RED", 0)]));
        let original = set(vec![proto]);
        let original_files = FileSet::new(&original);
        let registry = TypeRegistry::build(&original_files);
        let empty = TypeRegistry::default();
        let ctx = CompareContext::new(&registry, &empty, UnresolvedTypePolicy::Minor);

        let mut findings = FindingContainer::new();
        FileComparator::new(original_files.files().first(), None, ctx).compare(&mut findings);
        let found: Vec<_> = findings
            .get_all_findings()
            .iter()
            .map(|f| (f.category, f.subject.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (FindingCategory::MessageRemoval, "Bar"),
                (FindingCategory::MessageRemoval, "Foo"),
                (FindingCategory::EnumRemoval, "Color"),
            ]
        );
    }

    #[test]
    fn version_bump_keeps_types_matched() {
        let original = set(vec![file(
            "a.proto",
            "example.v1",
            vec![message("Foo", vec![message_field("bar", 1, ".example.v1.Bar")]), message("Bar", vec![])],
        )]);
        let update = set(vec![file(
            "a.proto",
            "example.v1beta1",
            vec![message("Foo", vec![message_field("bar", 1, ".example.v1beta1.Bar")]), message("Bar", vec![])],
        )]);
        assert!(compare_first(original, update).is_empty());
    }

    #[test]
    fn removed_version_is_not_matched_to_a_surviving_one() {
        let original = set(vec![
            file("example/v1/a.proto", "example.v1", vec![message("Foo", vec![])]),
            file("example/v2/a.proto", "example.v2", vec![message("Foo", vec![])]),
        ]);
        let update = set(vec![file("example/v2/a.proto", "example.v2", vec![message("Foo", vec![])])]);
        assert_eq!(
            compare_files(original, update, Some(0), None),
            vec![(FindingCategory::MessageRemoval, "Foo".to_string(), "example/v1/a.proto".to_string())]
        );
    }

    #[test]
    fn added_version_is_not_matched_to_a_surviving_one() {
        let original = set(vec![file("example/v1/a.proto", "example.v1", vec![message("Foo", vec![])])]);
        let update = set(vec![
            file("example/v1/a.proto", "example.v1", vec![message("Foo", vec![])]),
            file("example/v2/a.proto", "example.v2", vec![message("Foo", vec![])]),
        ]);
        assert_eq!(
            compare_files(original, update, None, Some(1)),
            vec![(FindingCategory::MessageAddition, "Foo".to_string(), "example/v2/a.proto".to_string())]
        );
    }

    #[test]
    fn version_shaped_message_names_are_kept_apart() {
        let original = set(vec![file(
            "a.proto",
            "example.v1",
            vec![message("V1", vec![]), message("V2", vec![])],
        )]);
        let update = set(vec![file("a.proto", "example.v1", vec![message("V1", vec![])])]);
        assert_eq!(
            compare_first(original, update),
            vec![(FindingCategory::MessageRemoval, "V2".to_string(), "a.proto".to_string())]
        );
    }

    #[test]
    fn moved_service_is_compared_not_removed() {
        let mut a = file("a.proto", "example.v1", vec![message("Foo", vec![])]);
        a.service.push(service("Library", &["GetBook", "ListBooks"]));
        let original = set(vec![a, file("b.proto", "example.v1", vec![])]);

        let mut b = file("b.proto", "example.v1", vec![]);
        b.service.push(service("Library", &["GetBook"]));
        let update = set(vec![file("a.proto", "example.v1", vec![message("Foo", vec![])]), b]);

        assert_eq!(
            compare_first(original.clone(), update.clone()),
            vec![(FindingCategory::MethodRemoval, "ListBooks".to_string(), "a.proto".to_string())]
        );
        assert!(compare_files(original, update, Some(1), Some(1)).is_empty());
    }
}
