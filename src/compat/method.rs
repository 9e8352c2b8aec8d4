use crate::compat::{CompareContext, TypeReference};
use crate::descriptor::Method;
use crate::findings::{Finding, FindingCategory, FindingContainer};
use std::collections::BTreeSet;

/// Compares one RPC across snapshots: request and response types, streaming
/// flags and `google.api.method_signature` annotations.
pub struct MethodComparator<'a, 'c> {
    original: Option<Method<'a>>,
    update: Option<Method<'a>>,
    ctx: CompareContext<'c>,
    context: &'c str,
}

impl<'a, 'c> MethodComparator<'a, 'c> {
    pub fn new(
        original: Option<Method<'a>>,
        update: Option<Method<'a>>,
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
            (None, Some(update)) => findings.add_finding(Finding::new(
                FindingCategory::MethodAddition,
                update.location(),
                update.name(),
                self.context,
            )),
            (Some(original), None) => findings.add_finding(Finding::new(
                FindingCategory::MethodRemoval,
                original.location(),
                original.name(),
                self.context,
            )),
            (Some(original), Some(update)) => {
                self.compare_message_type(
                    FindingCategory::MethodInputTypeChange,
                    (original, original.input_type()),
                    (update, update.input_type()),
                    findings,
                );
                self.compare_message_type(
                    FindingCategory::MethodResponseTypeChange,
                    (original, original.output_type()),
                    (update, update.output_type()),
                    findings,
                );
                if original.client_streaming() != update.client_streaming() {
                    findings.add_finding(self.finding(FindingCategory::MethodClientStreamingChange, update));
                }
                if original.server_streaming() != update.server_streaming() {
                    findings.add_finding(self.finding(FindingCategory::MethodServerStreamingChange, update));
                }
                self.compare_signatures(original, update, findings);
            }
        }
    }

    fn finding(&self, category: FindingCategory, method: &Method<'_>) -> Finding {
        Finding::new(category, method.location(), method.name(), self.context)
    }

    fn compare_message_type(
        &self,
        category: FindingCategory,
        (original, original_type): (&Method<'_>, &str),
        (update, update_type): (&Method<'_>, &str),
        findings: &mut FindingContainer,
    ) {
        let outcome = self.ctx.compare_type_references(
            original_type,
            &original.scope(),
            update_type,
            &update.scope(),
        );
        match outcome {
            TypeReference::Same => {}
            TypeReference::Changed => findings.add_finding(self.finding(category, update)),
            TypeReference::Unresolved => {
                if let Some(change_type) = self.ctx.unresolved_types.change_type() {
                    findings.add_finding(
                        Finding::new(
                            FindingCategory::TypeReferenceUnresolved,
                            update.location(),
                            update_type,
                            self.context,
                        )
                        .with_change_type(change_type)
                        .with_old_subject(original_type)
                        .with_extra_info(update.name()),
                    );
                }
            }
        }
    }

    /// Signatures are compared as written. A signature whose field set is
    /// unchanged but reordered is a change; otherwise it was removed or added.
    fn compare_signatures(&self, original: &Method<'_>, update: &Method<'_>, findings: &mut FindingContainer) {
        let original_signatures = original.method_signatures();
        let update_signatures = update.method_signatures();
        let mut added: Vec<&String> = update_signatures
            .iter()
            .filter(|signature| !original_signatures.contains(signature))
            .collect();

        for signature in original_signatures
            .iter()
            .filter(|signature| !update_signatures.contains(signature))
        {
            let reordered = added
                .iter()
                .position(|candidate| signature_fields(candidate) == signature_fields(signature));
            match reordered {
                Some(index) => {
                    let candidate = added.remove(index);
                    findings.add_finding(
                        Finding::new(
                            FindingCategory::MethodSignatureChange,
                            update.location(),
                            candidate.as_str(),
                            self.context,
                        )
                        .with_old_subject(signature.as_str())
                        .with_extra_info(update.name()),
                    );
                }
                None => findings.add_finding(
                    Finding::new(
                        FindingCategory::MethodSignatureRemoval,
                        original.location(),
                        signature.as_str(),
                        self.context,
                    )
                    .with_extra_info(original.name()),
                ),
            }
        }

        for signature in added {
            findings.add_finding(
                Finding::new(
                    FindingCategory::MethodSignatureAddition,
                    update.location(),
                    signature.as_str(),
                    self.context,
                )
                .with_extra_info(update.name()),
            );
        }
    }
}

fn signature_fields(signature: &str) -> BTreeSet<&str> {
    signature
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect()
}
