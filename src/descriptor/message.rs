//! Views over messages and their fields.

use crate::descriptor::enums::Enum;
use crate::descriptor::file::File;
use crate::descriptor::options::{self, ResourceDescriptor};
use crate::descriptor::{MESSAGE_ENUM, MESSAGE_FIELD, MESSAGE_NESTED, qualify};
use crate::findings::Location;
use crate::version::normalize_type_name;
use protobuf::descriptor::field_descriptor_proto::{Label, Type};
use protobuf::descriptor::{DescriptorProto, FieldDescriptorProto};

#[derive(Debug, Clone)]
pub struct Message<'a> {
    proto: &'a DescriptorProto,
    file: &'a File<'a>,
    full_name: String,
    nested_path: Vec<String>,
    path: Vec<i32>,
}

impl<'a> Message<'a> {
    pub(crate) fn new(
        proto: &'a DescriptorProto,
        file: &'a File<'a>,
        full_name: String,
        nested_path: Vec<String>,
        path: Vec<i32>,
    ) -> Self {
        Self {
            proto,
            file,
            full_name,
            nested_path,
            path,
        }
    }

    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    /// Fully-qualified name with a leading dot, e.g. `.example.v1.Outer.Inner`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Full name with the package's version components dropped, e.g.
    /// `.example.Outer.Inner`.
    pub fn normalized_name(&self) -> String {
        normalize_type_name(self.file.package(), &self.full_name)
    }

    pub fn file(&self) -> &'a File<'a> {
        self.file
    }

    /// Dotted path from the top of the file, e.g. `Outer.Inner`.
    pub fn nested_path(&self) -> String {
        self.nested_path.join(".")
    }

    pub fn location(&self) -> Location {
        self.file.location(&self.path)
    }

    pub fn is_map_entry(&self) -> bool {
        self.proto
            .options
            .as_ref()
            .is_some_and(|options| options.map_entry())
    }

    pub fn fields(&self) -> Vec<Field<'a>> {
        self.proto
            .field
            .iter()
            .enumerate()
            .map(|(index, proto)| {
                let oneof = proto
                    .oneof_index
                    .filter(|_| !proto.proto3_optional())
                    .and_then(|oneof| self.proto.oneof_decl.get(oneof as usize))
                    .map(|decl| decl.name());
                let mut nested_path = self.nested_path.clone();
                nested_path.push(proto.name().to_string());
                let mut path = self.path.clone();
                path.extend([MESSAGE_FIELD, index as i32]);
                Field {
                    proto,
                    file: self.file,
                    scope: self.full_name.clone(),
                    nested_path,
                    path,
                    oneof,
                }
            })
            .collect()
    }

    pub fn nested_messages(&self) -> Vec<Message<'a>> {
        self.proto
            .nested_type
            .iter()
            .enumerate()
            .map(|(index, proto)| {
                let mut nested_path = self.nested_path.clone();
                nested_path.push(proto.name().to_string());
                let mut path = self.path.clone();
                path.extend([MESSAGE_NESTED, index as i32]);
                Message::new(
                    proto,
                    self.file,
                    qualify(&self.full_name, proto.name()),
                    nested_path,
                    path,
                )
            })
            .collect()
    }

    pub fn nested_enums(&self) -> Vec<Enum<'a>> {
        self.proto
            .enum_type
            .iter()
            .enumerate()
            .map(|(index, proto)| {
                let mut nested_path = self.nested_path.clone();
                nested_path.push(proto.name().to_string());
                let mut path = self.path.clone();
                path.extend([MESSAGE_ENUM, index as i32]);
                Enum::new(
                    proto,
                    self.file,
                    qualify(&self.full_name, proto.name()),
                    nested_path,
                    path,
                )
            })
            .collect()
    }

    /// The `google.api.resource` annotation on this message, if any.
    pub fn resource(&self) -> Option<ResourceDescriptor> {
        self.proto
            .options
            .as_ref()
            .and_then(options::message_resource)
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A scalar kind such as `TYPE_STRING`.
    Scalar(Type),
    /// A reference to a message or enum, as written in the descriptor.
    Named(String),
}

#[derive(Debug, Clone)]
pub struct Field<'a> {
    proto: &'a FieldDescriptorProto,
    file: &'a File<'a>,
    scope: String,
    nested_path: Vec<String>,
    path: Vec<i32>,
    oneof: Option<&'a str>,
}

impl<'a> Field<'a> {
    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    /// Wire number, the identity of a field.
    pub fn number(&self) -> i32 {
        self.proto.number()
    }

    pub fn label(&self) -> Label {
        self.proto.label()
    }

    pub fn field_type(&self) -> FieldType {
        if self.proto.type_name().is_empty() {
            FieldType::Scalar(self.proto.type_())
        } else {
            FieldType::Named(self.proto.type_name().to_string())
        }
    }

    /// Full name of the owning message; relative type names resolve from here.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Name of the real (non-synthetic) oneof this field belongs to.
    pub fn oneof_name(&self) -> Option<&'a str> {
        self.oneof
    }

    pub fn file(&self) -> &'a File<'a> {
        self.file
    }

    /// Dotted path from the top of the file, e.g. `Outer.Inner.field`.
    pub fn nested_path(&self) -> String {
        self.nested_path.join(".")
    }

    pub fn location(&self) -> Location {
        self.file.location(&self.path)
    }
}

/// Lower-case scalar name, e.g. `string` for `TYPE_STRING`.
pub fn scalar_name(kind: Type) -> String {
    format!("{kind:?}").to_lowercase().replace("type_", "")
}

pub fn label_name(label: Label) -> &'static str {
    match label {
        Label::LABEL_OPTIONAL => "optional",
        Label::LABEL_REQUIRED => "required",
        Label::LABEL_REPEATED => "repeated",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protobuf::descriptor::{FileDescriptorProto, OneofDescriptorProto};

    fn field(name: &str, number: i32, oneof_index: Option<i32>) -> FieldDescriptorProto {
        let mut field = FieldDescriptorProto::new();
        field.set_name(name.to_string());
        field.set_number(number);
        field.set_type(Type::TYPE_STRING);
        field.oneof_index = oneof_index;
        field
    }

    fn file() -> FileDescriptorProto {
        let mut oneof = OneofDescriptorProto::new();
        oneof.set_name("choice".to_string());
        let mut optional = field("maybe", 3, Some(1));
        optional.set_proto3_optional(true);
        let mut synthetic = OneofDescriptorProto::new();
        synthetic.set_name("_maybe".to_string());

        let mut message = DescriptorProto::new();
        message.set_name("Foo".to_string());
        message.field.push(field("plain", 1, None));
        message.field.push(field("picked", 2, Some(0)));
        message.field.push(optional);
        message.oneof_decl.push(oneof);
        message.oneof_decl.push(synthetic);

        let mut file = FileDescriptorProto::new();
        file.set_name("foo.proto".to_string());
        file.set_package("example.v1".to_string());
        file.message_type.push(message);
        file
    }

    #[test]
    fn fields_know_their_scope_and_path() {
        let proto = file();
        let file = File::new(&proto);
        let message = &file.messages()[0];
        let fields = message.fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].scope(), ".example.v1.Foo");
        assert_eq!(fields[0].nested_path(), "Foo.plain");
        assert_eq!(fields[0].field_type(), FieldType::Scalar(Type::TYPE_STRING));
    }

    #[test]
    fn synthetic_oneofs_are_not_reported() {
        let proto = file();
        let file = File::new(&proto);
        let fields = file.messages()[0].fields();
        assert_eq!(fields[0].oneof_name(), None);
        assert_eq!(fields[1].oneof_name(), Some("choice"));
        assert_eq!(fields[2].oneof_name(), None);
    }

    #[test]
    fn scalar_names_are_lower_case() {
        assert_eq!(scalar_name(Type::TYPE_STRING), "string");
        assert_eq!(scalar_name(Type::TYPE_SFIXED64), "sfixed64");
        assert_eq!(label_name(Label::LABEL_REPEATED), "repeated");
    }
}
