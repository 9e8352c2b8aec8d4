//! Decoding of `google.api` annotations carried by descriptor options.
//!
//! The descriptors only know the standard `google.protobuf` options, so custom
//! extensions arrive as unknown fields holding the raw wire bytes. The
//! extension numbers used here are fixed by `google/api/resource.proto` and
//! `google/api/client.proto`.

use protobuf::descriptor::{FileOptions, MessageOptions, MethodOptions};
use protobuf::rt::read_unknown_or_skip_group;
use protobuf::{CodedInputStream, UnknownFields, UnknownValueRef};

/// `repeated google.api.ResourceDescriptor resource_definition = 1053` on `FileOptions`.
pub const RESOURCE_DEFINITION_EXTENSION: u32 = 1053;
/// `google.api.ResourceDescriptor resource = 1053` on `MessageOptions`.
pub const RESOURCE_EXTENSION: u32 = 1053;
/// `repeated string method_signature = 1051` on `MethodOptions`.
pub const METHOD_SIGNATURE_EXTENSION: u32 = 1051;

// google.api.ResourceDescriptor field tags (field number << 3 | wire type 2).
const RESOURCE_TYPE_TAG: u32 = (1 << 3) | 2;
const RESOURCE_PATTERN_TAG: u32 = (2 << 3) | 2;

/// The parts of a `google.api.ResourceDescriptor` that matter for compatibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub resource_type: String,
    pub patterns: Vec<String>,
}

fn length_delimited(unknown: &UnknownFields, number: u32) -> impl Iterator<Item = &[u8]> {
    unknown.iter().filter_map(move |(field, value)| match value {
        UnknownValueRef::LengthDelimited(bytes) if field == number => Some(bytes),
        _ => None,
    })
}

fn decode_resource_descriptor(bytes: &[u8]) -> protobuf::Result<ResourceDescriptor> {
    let mut input = CodedInputStream::from_bytes(bytes);
    let mut resource = ResourceDescriptor::default();
    let mut skipped = UnknownFields::new();
    while let Some(tag) = input.read_raw_tag_or_eof()? {
        match tag {
            RESOURCE_TYPE_TAG => resource.resource_type = input.read_string()?,
            RESOURCE_PATTERN_TAG => resource.patterns.push(input.read_string()?),
            _ => read_unknown_or_skip_group(tag, &mut input, &mut skipped)?,
        }
    }
    Ok(resource)
}

fn decode_resources<'a>(payloads: impl Iterator<Item = &'a [u8]>) -> Vec<ResourceDescriptor> {
    payloads
        .filter_map(|bytes| match decode_resource_descriptor(bytes) {
            Ok(resource) => Some(resource),
            Err(error) => {
                tracing::warn!(%error, "skipping malformed google.api.resource annotation");
                None
            }
        })
        .collect()
}

/// File-level `google.api.resource_definition` annotations, in declared order.
pub fn resource_definitions(options: &FileOptions) -> Vec<ResourceDescriptor> {
    decode_resources(length_delimited(
        options.special_fields.unknown_fields(),
        RESOURCE_DEFINITION_EXTENSION,
    ))
}

/// Message-level `google.api.resource` annotation.
pub fn message_resource(options: &MessageOptions) -> Option<ResourceDescriptor> {
    decode_resources(length_delimited(
        options.special_fields.unknown_fields(),
        RESOURCE_EXTENSION,
    ))
    .pop()
}

/// `google.api.method_signature` entries, in declared order.
pub fn method_signatures(options: &MethodOptions) -> Vec<String> {
    length_delimited(
        options.special_fields.unknown_fields(),
        METHOD_SIGNATURE_EXTENSION,
    )
    .filter_map(|bytes| match std::str::from_utf8(bytes) {
        Ok(signature) => Some(signature.to_string()),
        Err(error) => {
            tracing::warn!(%error, "skipping non UTF-8 google.api.method_signature");
            None
        }
    })
    .collect()
}
