use crate::compat::{CompareContext, TypeReference};
use crate::descriptor::Field;
use crate::descriptor::message::{FieldType, label_name, scalar_name};
use crate::findings::{Finding, FindingCategory, FindingContainer};

/// Compares one field across snapshots. Fields are matched by number; a
/// matched pair is checked for name, label, oneof membership and type.
pub struct FieldComparator<'a, 'c> {
    original: Option<Field<'a>>,
    update: Option<Field<'a>>,
    ctx: CompareContext<'c>,
    context: &'c str,
}

impl<'a, 'c> FieldComparator<'a, 'c> {
    pub fn new(
        original: Option<Field<'a>>,
        update: Option<Field<'a>>,
        ctx: CompareContext<'c>,
        context: &'c str,
    ) -> Self {
        Self {
            original,
            update,
            ctx,
            context,
        }
    }

    pub fn compare(&self, findings: &mut FindingContainer) {
        match (&self.original, &self.update) {
            (None, None) => {}
            (None, Some(update)) => {
                findings.add_finding(self.finding(FindingCategory::FieldAddition, update))
            }
            (Some(original), None) => {
                findings.add_finding(self.finding(FindingCategory::FieldRemoval, original))
            }
            (Some(original), Some(update)) => self.compare_pair(original, update, findings),
        }
    }

    fn finding(&self, category: FindingCategory, field: &Field<'_>) -> Finding {
        Finding::new(category, field.location(), field.name(), self.context)
            .with_extra_info(field.nested_path())
    }

    fn compare_pair(&self, original: &Field<'_>, update: &Field<'_>, findings: &mut FindingContainer) {
        if original.name() != update.name() {
            findings.add_finding(
                self.finding(FindingCategory::FieldNameChange, update)
                    .with_old_subject(original.name()),
            );
        }

        if original.label() != update.label() {
            tracing::trace!(
                field = update.name(),
                from = label_name(original.label()),
                to = label_name(update.label()),
                "label changed"
            );
            findings.add_finding(self.finding(FindingCategory::FieldLabelChange, update));
        }

        match (original.oneof_name(), update.oneof_name()) {
            (None, Some(_)) => {
                findings.add_finding(self.finding(FindingCategory::FieldOneofMoveIn, update))
            }
            (Some(_), None) => {
                findings.add_finding(self.finding(FindingCategory::FieldOneofMoveOut, update))
            }
            (Some(from), Some(to)) if from != to => {
                findings.add_finding(self.finding(FindingCategory::FieldOneofMoveIn, update))
            }
            _ => {}
        }

        self.compare_types(original, update, findings);
    }

    fn compare_types(&self, original: &Field<'_>, update: &Field<'_>, findings: &mut FindingContainer) {
        let outcome = match (original.field_type(), update.field_type()) {
            (FieldType::Scalar(from), FieldType::Scalar(to)) if from == to => TypeReference::Same,
            (FieldType::Named(from), FieldType::Named(to)) => {
                self.ctx
                    .compare_type_references(&from, original.scope(), &to, update.scope())
            }
            (from, to) => {
                tracing::trace!(
                    field = update.name(),
                    from = %describe(&from),
                    to = %describe(&to),
                    "type changed"
                );
                TypeReference::Changed
            }
        };

        match outcome {
            TypeReference::Same => {}
            TypeReference::Changed => {
                findings.add_finding(self.finding(FindingCategory::FieldTypeChange, update))
            }
            TypeReference::Unresolved => {
                if let Some(change_type) = self.ctx.unresolved_types.change_type() {
                    findings.add_finding(
                        Finding::new(
                            FindingCategory::TypeReferenceUnresolved,
                            update.location(),
                            describe(&update.field_type()),
                            self.context,
                        )
                        .with_change_type(change_type)
                        .with_old_subject(describe(&original.field_type()))
                        .with_extra_info(update.nested_path()),
                    );
                }
            }
        }
    }
}

fn describe(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Scalar(kind) => scalar_name(*kind),
        FieldType::Named(name) => name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::test_support::{field, file, message, message_field};
    use crate::config::UnresolvedTypePolicy;
    use crate::descriptor::FileSet;
    use crate::findings::ChangeType;
    use crate::registry::TypeRegistry;
    use protobuf::descriptor::field_descriptor_proto::{Label, Type};
    use protobuf::descriptor::{FieldDescriptorProto, FileDescriptorSet, OneofDescriptorProto};

    fn set(fields: Vec<FieldDescriptorProto>) -> FileDescriptorSet {
        let mut foo = message("Foo", fields);
        let mut oneof = OneofDescriptorProto::new();
        oneof.set_name("choice".to_string());
        foo.oneof_decl.push(oneof);
        let mut set = FileDescriptorSet::new();
        set.file.push(file(
            "a.proto",
            "example.v1",
            vec![foo, message("Bar", vec![]), message("Baz", vec![])],
        ));
        set
    }

    fn compare_with(
        original: FieldDescriptorProto,
        update: FieldDescriptorProto,
        policy: UnresolvedTypePolicy,
    ) -> FindingContainer {
        let original_set = set(vec![original]);
        let update_set = set(vec![update]);
        let original_files = FileSet::new(&original_set);
        let update_files = FileSet::new(&update_set);
        let original_registry = TypeRegistry::build(&original_files);
        let update_registry = TypeRegistry::build(&update_files);
        let ctx = CompareContext::new(&original_registry, &update_registry, policy);

        let original_field = original_files.files()[0].messages()[0].fields().into_iter().next();
        let update_field = update_files.files()[0].messages()[0].fields().into_iter().next();
        let mut findings = FindingContainer::new();
        FieldComparator::new(original_field, update_field, ctx, "Message Foo").compare(&mut findings);
        findings
    }

    fn compare(original: FieldDescriptorProto, update: FieldDescriptorProto) -> FindingContainer {
        compare_with(original, update, UnresolvedTypePolicy::Minor)
    }

    fn categories(findings: &FindingContainer) -> Vec<FindingCategory> {
        findings.get_all_findings().iter().map(|f| f.category).collect()
    }

    #[test]
    fn rename_keeps_old_name() {
        let findings = compare(field("id", 1, Type::TYPE_STRING), field("name", 1, Type::TYPE_STRING));
        let finding = &findings.get_all_findings()[0];
        assert_eq!(finding.category, FindingCategory::FieldNameChange);
        assert_eq!(finding.subject, "name");
        assert_eq!(finding.old_subject.as_deref(), Some("id"));
        assert_eq!(finding.extra_info.as_deref(), Some("Foo.name"));
    }

    #[test]
    fn scalar_kind_change() {
        let findings = compare(field("id", 1, Type::TYPE_STRING), field("id", 1, Type::TYPE_INT64));
        assert_eq!(categories(&findings), vec![FindingCategory::FieldTypeChange]);
    }

    #[test]
    fn label_change() {
        let mut repeated = field("id", 1, Type::TYPE_STRING);
        repeated.set_label(Label::LABEL_REPEATED);
        let findings = compare(field("id", 1, Type::TYPE_STRING), repeated);
        assert_eq!(categories(&findings), vec![FindingCategory::FieldLabelChange]);
    }

    #[test]
    fn oneof_moves() {
        let mut in_oneof = field("id", 1, Type::TYPE_STRING);
        in_oneof.oneof_index = Some(0);
        let findings = compare(field("id", 1, Type::TYPE_STRING), in_oneof.clone());
        assert_eq!(categories(&findings), vec![FindingCategory::FieldOneofMoveIn]);

        let findings = compare(in_oneof, field("id", 1, Type::TYPE_STRING));
        assert_eq!(categories(&findings), vec![FindingCategory::FieldOneofMoveOut]);
    }

    #[test]
    fn relative_and_absolute_references_to_the_same_type() {
        let findings = compare(
            message_field("bar", 1, "Bar"),
            message_field("bar", 1, ".example.v1.Bar"),
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn reference_to_another_type() {
        let findings = compare(message_field("bar", 1, "Bar"), message_field("bar", 1, "Baz"));
        assert_eq!(categories(&findings), vec![FindingCategory::FieldTypeChange]);
    }

    #[test]
    fn unresolved_reference_follows_policy() {
        let findings = compare(message_field("bar", 1, "Bar"), message_field("bar", 1, "Missing"));
        let finding = &findings.get_all_findings()[0];
        assert_eq!(finding.category, FindingCategory::TypeReferenceUnresolved);
        assert_eq!(finding.change_type, ChangeType::Minor);
        assert_eq!(finding.subject, "Missing");
        assert_eq!(finding.old_subject.as_deref(), Some("Bar"));

        let findings = compare_with(
            message_field("bar", 1, "Bar"),
            message_field("bar", 1, "Missing"),
            UnresolvedTypePolicy::Major,
        );
        assert!(findings.has_breaking_changes());

        let findings = compare_with(
            message_field("bar", 1, "Bar"),
            message_field("bar", 1, "Missing"),
            UnresolvedTypePolicy::Ignore,
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn addition_and_removal() {
        let original_set = set(vec![field("id", 1, Type::TYPE_STRING)]);
        let files = FileSet::new(&original_set);
        let registry = TypeRegistry::build(&files);
        let ctx = CompareContext::new(&registry, &registry, UnresolvedTypePolicy::Minor);
        let id = || files.files()[0].messages()[0].fields().into_iter().next();

        let mut findings = FindingContainer::new();
        FieldComparator::new(None, id(), ctx, "Message Foo").compare(&mut findings);
        FieldComparator::new(id(), None, ctx, "Message Foo").compare(&mut findings);
        assert_eq!(
            categories(&findings),
            vec![FindingCategory::FieldAddition, FindingCategory::FieldRemoval]
        );
        assert!(findings.has_breaking_changes());
    }
}
