//! Per-snapshot index of every message, enum and service by fully-qualified
//! name.
//!
//! Built once per comparison run and read-only afterwards. Field and method
//! type references are resolved here, which is what lets the comparators tell
//! a type that disappeared from the snapshot apart from a type that merely
//! lives in another file now.

use crate::descriptor::{Enum, FileSet, Message, ResourceIndex, Service, qualify};
use std::collections::HashMap;

/// A message or enum definition found in a snapshot.
#[derive(Debug, Clone)]
pub enum TypeDefinition<'a> {
    Message(Message<'a>),
    Enum(Enum<'a>),
}

impl<'a> TypeDefinition<'a> {
    pub fn full_name(&self) -> &str {
        match self {
            TypeDefinition::Message(message) => message.full_name(),
            TypeDefinition::Enum(en) => en.full_name(),
        }
    }

    pub fn normalized_name(&self) -> String {
        match self {
            TypeDefinition::Message(message) => message.normalized_name(),
            TypeDefinition::Enum(en) => en.normalized_name(),
        }
    }

    pub fn file_name(&self) -> &'a str {
        match self {
            TypeDefinition::Message(message) => message.file().name(),
            TypeDefinition::Enum(en) => en.file().name(),
        }
    }
}

#[derive(Debug, Default)]
pub struct TypeRegistry<'a> {
    types: HashMap<String, TypeDefinition<'a>>,
    normalized: HashMap<String, String>,
    services: HashMap<String, Service<'a>>,
    resources: ResourceIndex,
}

impl<'a> TypeRegistry<'a> {
    /// Indexes every file of `file_set` in one pass.
    pub fn build(file_set: &'a FileSet<'a>) -> Self {
        let mut registry = TypeRegistry::default();
        for file in file_set.files() {
            let definitions = file
                .all_messages()
                .into_iter()
                .map(TypeDefinition::Message)
                .chain(file.all_enums().into_iter().map(TypeDefinition::Enum));
            for definition in definitions {
                registry.insert(definition);
            }
            for service in file.services() {
                registry.services.entry(service.full_name()).or_insert(service);
            }
            registry.resources.extend(file.resources());
        }
        tracing::debug!(
            files = file_set.files().len(),
            types = registry.types.len(),
            services = registry.services.len(),
            "built type registry"
        );
        registry
    }

    fn insert(&mut self, definition: TypeDefinition<'a>) {
        let full_name = definition.full_name().to_string();
        if let Some(existing) = self.types.get(&full_name) {
            tracing::debug!(
                full_name = %full_name,
                kept = existing.file_name(),
                ignored = definition.file_name(),
                "type defined twice in one snapshot"
            );
            return;
        }
        self.normalized
            .entry(definition.normalized_name())
            .or_insert_with(|| full_name.clone());
        self.types.insert(full_name, definition);
    }

    pub fn get(&self, full_name: &str) -> Option<&TypeDefinition<'a>> {
        self.types.get(full_name)
    }

    /// Looks a type up by its version-normalized name (see
    /// [`TypeDefinition::normalized_name`]), so that the `.example.Foo` of a
    /// `.example.v1.Foo` finds `.example.v1beta1.Foo`.
    pub fn find_normalized(&self, normalized_name: &str) -> Option<&TypeDefinition<'a>> {
        self.normalized
            .get(normalized_name)
            .and_then(|full_name| self.types.get(full_name))
    }

    pub fn service(&self, full_name: &str) -> Option<&Service<'a>> {
        self.services.get(full_name)
    }

    /// Resolves a type reference as written in a descriptor.
    ///
    /// Fully-qualified names (leading dot) are looked up directly. Relative
    /// names are searched from `scope` outwards, innermost scope first.
    pub fn resolve(&self, type_name: &str, scope: &str) -> Option<&TypeDefinition<'a>> {
        if type_name.starts_with('.') {
            return self.get(type_name);
        }
        let mut scope = scope;
        loop {
            if let Some(definition) = self.get(&qualify(scope, type_name)) {
                return Some(definition);
            }
            match scope.rfind('.') {
                Some(index) => scope = &scope[..index],
                None => return None,
            }
        }
    }

    /// Resource definitions of the whole snapshot.
    pub fn resources(&self) -> &ResourceIndex {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
