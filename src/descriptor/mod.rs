//! Queryable views over raw protobuf descriptors.
//!
//! The views borrow the descriptors of a [`Snapshot`](crate::snapshot::Snapshot)
//! and add what the comparators need: fully-qualified names, the nested path
//! inside the file, the owning file and source lines, and decoded
//! `google.api` annotations.

pub mod enums;
pub mod file;
pub mod message;
pub mod options;
pub mod resource;
pub mod service;

pub use enums::{Enum, EnumValue};
pub use file::File;
pub use message::{Field, Message};
pub use resource::{Resource, ResourceIndex, ResourceScope};
pub use service::{Method, Service};

use protobuf::descriptor::FileDescriptorSet;

// Source-info path components, from the field numbers in descriptor.proto.
pub(crate) const FILE_MESSAGE: i32 = 4;
pub(crate) const FILE_ENUM: i32 = 5;
pub(crate) const FILE_SERVICE: i32 = 6;
pub(crate) const FILE_OPTIONS: i32 = 8;
pub(crate) const MESSAGE_FIELD: i32 = 2;
pub(crate) const MESSAGE_NESTED: i32 = 3;
pub(crate) const MESSAGE_ENUM: i32 = 4;
pub(crate) const ENUM_VALUE: i32 = 2;
pub(crate) const SERVICE_METHOD: i32 = 2;

/// Joins a scope (`.pkg.Outer`, or empty) and a simple name.
pub(crate) fn qualify(scope: &str, name: &str) -> String {
    format!("{scope}.{name}")
}

/// Views over every file of one descriptor set, in declared order.
#[derive(Debug)]
pub struct FileSet<'a> {
    files: Vec<File<'a>>,
}

impl<'a> FileSet<'a> {
    pub fn new(set: &'a FileDescriptorSet) -> Self {
        Self {
            files: set.file.iter().map(File::new).collect(),
        }
    }

    pub fn files(&self) -> &[File<'a>] {
        &self.files
    }
}
