//! View over a `FileDescriptorProto`.

use crate::descriptor::enums::Enum;
use crate::descriptor::message::Message;
use crate::descriptor::options;
use crate::descriptor::resource::{Resource, ResourceIndex, ResourceScope};
use crate::descriptor::service::Service;
use crate::descriptor::{FILE_ENUM, FILE_MESSAGE, FILE_OPTIONS, FILE_SERVICE, qualify};
use crate::findings::Location;
use protobuf::descriptor::{FileDescriptorProto, FileOptions};
use std::collections::HashMap;

#[derive(Debug)]
pub struct File<'a> {
    proto: &'a FileDescriptorProto,
    lines: HashMap<Vec<i32>, u32>,
}

impl<'a> File<'a> {
    pub fn new(proto: &'a FileDescriptorProto) -> Self {
        let mut lines = HashMap::new();
        if let Some(info) = proto.source_code_info.as_ref() {
            for location in &info.location {
                if let Some(&line) = location.span.first() {
                    lines
                        .entry(location.path.clone())
                        .or_insert(line.max(0) as u32 + 1);
                }
            }
        }
        Self { proto, lines }
    }

    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    /// Declared package, without a leading dot.
    pub fn package(&self) -> &'a str {
        self.proto.package().trim_start_matches('.')
    }

    /// Scope prefix for names declared at the top of this file (`.pkg` or empty).
    pub fn scope(&self) -> String {
        match self.package() {
            "" => String::new(),
            package => format!(".{package}"),
        }
    }

    pub fn options(&self) -> &'a FileOptions {
        self.proto.options.get_or_default()
    }

    /// 1-based line of the element at `path`, when source info is present.
    pub fn source_line(&self, path: &[i32]) -> Option<u32> {
        self.lines.get(path).copied()
    }

    pub fn location(&self, path: &[i32]) -> Location {
        Location::new(self.name(), self.source_line(path))
    }

    pub fn messages(&self) -> Vec<Message<'_>> {
        let scope = self.scope();
        self.proto
            .message_type
            .iter()
            .enumerate()
            .map(|(index, proto)| {
                Message::new(
                    proto,
                    self,
                    qualify(&scope, proto.name()),
                    vec![proto.name().to_string()],
                    vec![FILE_MESSAGE, index as i32],
                )
            })
            .collect()
    }

    pub fn enums(&self) -> Vec<Enum<'_>> {
        let scope = self.scope();
        self.proto
            .enum_type
            .iter()
            .enumerate()
            .map(|(index, proto)| {
                Enum::new(
                    proto,
                    self,
                    qualify(&scope, proto.name()),
                    vec![proto.name().to_string()],
                    vec![FILE_ENUM, index as i32],
                )
            })
            .collect()
    }

    pub fn services(&self) -> Vec<Service<'_>> {
        self.proto
            .service
            .iter()
            .enumerate()
            .map(|(index, proto)| Service::new(proto, self, vec![FILE_SERVICE, index as i32]))
            .collect()
    }

    /// Every message declared in this file, nested ones included, parents first.
    pub fn all_messages(&self) -> Vec<Message<'_>> {
        let mut all = Vec::new();
        let mut pending = self.messages();
        pending.reverse();
        while let Some(message) = pending.pop() {
            let mut nested = message.nested_messages();
            nested.reverse();
            pending.extend(nested);
            all.push(message);
        }
        all
    }

    /// Every enum declared in this file, nested ones included.
    pub fn all_enums(&self) -> Vec<Enum<'_>> {
        let mut all = self.enums();
        for message in self.all_messages() {
            all.extend(message.nested_enums());
        }
        all
    }

    /// Resource definitions declared at file level and on messages of this file.
    pub fn resources(&self) -> ResourceIndex {
        let mut index = ResourceIndex::default();
        for (position, definition) in options::resource_definitions(self.options())
            .into_iter()
            .enumerate()
        {
            let path = [FILE_OPTIONS, options::RESOURCE_DEFINITION_EXTENSION as i32, position as i32];
            let line = self
                .source_line(&path)
                .or_else(|| self.source_line(&[FILE_OPTIONS]));
            index.insert(Resource {
                definition,
                scope: ResourceScope::File,
                location: Location::new(self.name(), line),
                owner: None,
            });
        }
        for message in self.all_messages() {
            if let Some(definition) = message.resource() {
                index.insert(Resource {
                    definition,
                    scope: ResourceScope::Message,
                    location: message.location(),
                    owner: Some(message.full_name().to_string()),
                });
            }
        }
        index
    }
}
