use crate::compat::method::MethodComparator;
use crate::compat::{CompareContext, reconcile};
use crate::descriptor::Service;
use crate::findings::{Finding, FindingCategory, FindingContainer};

/// Compares one service across snapshots, then its methods keyed by name.
pub struct ServiceComparator<'a, 'c> {
    original: Option<Service<'a>>,
    update: Option<Service<'a>>,
    ctx: CompareContext<'c>,
    context: &'c str,
}

impl<'a, 'c> ServiceComparator<'a, 'c> {
    pub fn new(
        original: Option<Service<'a>>,
        update: Option<Service<'a>>,
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
                FindingCategory::ServiceAddition,
                update.location(),
                update.name(),
                self.context,
            )),
            (Some(original), None) => findings.add_finding(Finding::new(
                FindingCategory::ServiceRemoval,
                original.location(),
                original.name(),
                self.context,
            )),
            (Some(original), Some(update)) => {
                let context = format!("Service {}", update.name());
                let ctx = self.ctx;
                reconcile(
                    original.methods(),
                    update.methods(),
                    |method| method.name(),
                    |original, update| {
                        MethodComparator::new(original, update, ctx, &context).compare(findings)
                    },
                );
            }
        }
    }
}
