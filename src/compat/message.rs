use crate::compat::enums::EnumComparator;
use crate::compat::field::FieldComparator;
use crate::compat::{CompareContext, reconcile};
use crate::descriptor::{Field, Message};
use crate::findings::{Finding, FindingCategory, FindingContainer};

/// Compares one message across snapshots and recurses into its fields
/// (keyed by number), nested messages and nested enums (keyed by name).
pub struct MessageComparator<'a, 'c> {
    original: Option<Message<'a>>,
    update: Option<Message<'a>>,
    ctx: CompareContext<'c>,
    context: &'c str,
}

impl<'a, 'c> MessageComparator<'a, 'c> {
    /// `context` names the scope the message is declared in.
    pub fn new(
        original: Option<Message<'a>>,
        update: Option<Message<'a>>,
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
            (None, Some(update)) => findings.add_finding(
                Finding::new(
                    FindingCategory::MessageAddition,
                    update.location(),
                    update.name(),
                    self.context,
                )
                .with_extra_info(update.nested_path()),
            ),
            (Some(original), None) => findings.add_finding(
                Finding::new(
                    FindingCategory::MessageRemoval,
                    original.location(),
                    original.name(),
                    self.context,
                )
                .with_extra_info(original.nested_path()),
            ),
            (Some(original), Some(update)) => self.compare_pair(original, update, findings),
        }
    }

    fn compare_pair(&self, original: &Message<'a>, update: &Message<'a>, findings: &mut FindingContainer) {
        let context = format!("Message {}", update.nested_path());
        let ctx = self.ctx;

        reconcile(original.fields(), update.fields(), Field::number, |original, update| {
            FieldComparator::new(original, update, ctx, &context).compare(findings)
        });

        reconcile(
            original.nested_messages(),
            update.nested_messages(),
            |message| message.name(),
            |original, update| {
                // Map entries come and go with their map field.
                let one_sided = original.is_none() || update.is_none();
                if one_sided && original.iter().chain(&update).any(Message::is_map_entry) {
                    return;
                }
                MessageComparator::new(original, update, ctx, &context).compare(findings)
            },
        );

        reconcile(
            original.nested_enums(),
            update.nested_enums(),
            |en| en.name(),
            |original, update| EnumComparator::new(original, update, &context).compare(findings),
        );
    }
}
