//! Resource annotations (`google.api.resource` / `resource_definition`).

use crate::descriptor::options::ResourceDescriptor;
use crate::findings::Location;
use std::collections::{BTreeMap, BTreeSet};

/// Where a resource definition is declared. Definitions are only ever
/// compared with definitions of the same scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceScope {
    File,
    Message,
}

impl ResourceScope {
    pub fn describe(&self) -> &'static str {
        match self {
            ResourceScope::File => "file-level",
            ResourceScope::Message => "message-level",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub definition: ResourceDescriptor,
    pub scope: ResourceScope,
    pub location: Location,
    /// Full name of the annotated message, for message-level definitions.
    pub owner: Option<String>,
}

impl Resource {
    pub fn resource_type(&self) -> &str {
        &self.definition.resource_type
    }

    pub fn patterns(&self) -> BTreeSet<&str> {
        self.definition.patterns.iter().map(String::as_str).collect()
    }
}

/// Resource definitions of one file (or one snapshot), keyed by type per scope.
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex {
    by_scope: BTreeMap<ResourceScope, BTreeMap<String, Resource>>,
}

impl ResourceIndex {
    /// Adds a definition; the first definition of a type within a scope wins.
    pub fn insert(&mut self, resource: Resource) {
        let definitions = self.by_scope.entry(resource.scope).or_default();
        if definitions.contains_key(resource.resource_type()) {
            tracing::debug!(
                resource_type = resource.resource_type(),
                scope = resource.scope.describe(),
                file = %resource.location.proto_file_name,
                "ignoring duplicate resource definition"
            );
            return;
        }
        definitions.insert(resource.resource_type().to_string(), resource);
    }

    pub fn extend(&mut self, other: ResourceIndex) {
        for resource in other.by_scope.into_values().flat_map(BTreeMap::into_values) {
            self.insert(resource);
        }
    }

    pub fn get(&self, scope: ResourceScope, resource_type: &str) -> Option<&Resource> {
        self.by_scope.get(&scope)?.get(resource_type)
    }

    /// Definitions of one scope, ordered by type.
    pub fn in_scope(&self, scope: ResourceScope) -> Vec<&Resource> {
        self.by_scope
            .get(&scope)
            .map(|definitions| definitions.values().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_scope.values().all(BTreeMap::is_empty)
    }
}
