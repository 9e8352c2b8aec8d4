//! Descriptor builders and helpers shared by the integration tests.
#![allow(dead_code)]

use proto_compat::{DetectorConfig, FindingCategory, FindingContainer, Snapshot, detect_breaking_changes};
use protobuf::CodedOutputStream;
use protobuf::descriptor::field_descriptor_proto::{Label, Type};
use protobuf::descriptor::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, FileOptions, MessageOptions, MethodDescriptorProto,
    ServiceDescriptorProto,
};

pub const DEFAULT_FILE: &str = "my_proto.proto";
pub const DEFAULT_PACKAGE: &str = "example.v1";

pub fn make_file(name: &str, package: &str) -> FileDescriptorProto {
    let mut file = FileDescriptorProto::new();
    file.set_name(name.to_string());
    file.set_package(package.to_string());
    file.set_syntax("proto3".to_string());
    file
}

pub fn default_file() -> FileDescriptorProto {
    make_file(DEFAULT_FILE, DEFAULT_PACKAGE)
}

pub fn make_field(name: &str, number: i32) -> FieldDescriptorProto {
    let mut field = FieldDescriptorProto::new();
    field.set_name(name.to_string());
    field.set_number(number);
    field.set_label(Label::LABEL_OPTIONAL);
    field.set_type(Type::TYPE_STRING);
    field
}

/// A field referring to a message or enum by name, as written in a descriptor.
pub fn make_type_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    let mut field = make_field(name, number);
    field.set_type(Type::TYPE_MESSAGE);
    field.set_type_name(type_name.to_string());
    field
}

pub fn make_message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    let mut message = DescriptorProto::new();
    message.set_name(name.to_string());
    message.field = fields;
    message
}

pub fn make_enum(name: &str, values: &[(&str, i32)]) -> EnumDescriptorProto {
    let mut en = EnumDescriptorProto::new();
    en.set_name(name.to_string());
    for (value_name, number) in values {
        let mut value = EnumValueDescriptorProto::new();
        value.set_name(value_name.to_string());
        value.set_number(*number);
        en.value.push(value);
    }
    en
}

pub fn make_method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    let mut method = MethodDescriptorProto::new();
    method.set_name(name.to_string());
    method.set_input_type(input.to_string());
    method.set_output_type(output.to_string());
    method
}

pub fn make_service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    let mut service = ServiceDescriptorProto::new();
    service.set_name(name.to_string());
    service.method = methods;
    service
}

pub fn make_snapshot(files: Vec<FileDescriptorProto>) -> Snapshot {
    let mut set = FileDescriptorSet::new();
    set.file = files;
    Snapshot::from_descriptor_set(set).expect("Failed to encode descriptor set")
}

pub fn empty_snapshot() -> Snapshot {
    make_snapshot(Vec::new())
}

/// Encodes a `google.api.ResourceDescriptor`.
fn encode_resource(resource_type: &str, patterns: &[&str]) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut output = CodedOutputStream::vec(&mut bytes);
        output.write_string(1, resource_type).expect("Failed to encode type");
        for pattern in patterns {
            output.write_string(2, pattern).expect("Failed to encode pattern");
        }
        output.flush().expect("Failed to flush");
    }
    bytes
}

/// File options carrying one `google.api.resource_definition`.
pub fn file_resource_options(resource_type: &str, patterns: &[&str]) -> FileOptions {
    let mut options = FileOptions::new();
    options
        .special_fields
        .mut_unknown_fields()
        .add_length_delimited(1053, encode_resource(resource_type, patterns));
    options
}

/// Message options carrying a `google.api.resource` annotation.
pub fn message_resource_options(resource_type: &str, patterns: &[&str]) -> MessageOptions {
    let mut options = MessageOptions::new();
    options
        .special_fields
        .mut_unknown_fields()
        .add_length_delimited(1053, encode_resource(resource_type, patterns));
    options
}

pub fn compare(original: &Snapshot, update: &Snapshot) -> FindingContainer {
    detect_breaking_changes(original, update, &DetectorConfig::default())
}

pub fn categories(findings: &FindingContainer) -> Vec<FindingCategory> {
    findings.get_all_findings().iter().map(|f| f.category).collect()
}

/// Writes `sources` (path, content) into a temp dir and parses them.
pub fn snapshot_from_sources(sources: &[(&str, &str)]) -> Snapshot {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    for (path, content) in sources {
        let path = dir.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content).expect("Failed to write proto source");
    }
    Snapshot::from_proto_dir(dir.path(), &[]).expect("Failed to parse proto sources")
}
