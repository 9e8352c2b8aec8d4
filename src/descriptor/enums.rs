//! Views over enums and enum values.

use crate::descriptor::ENUM_VALUE;
use crate::descriptor::file::File;
use crate::findings::Location;
use crate::version::normalize_type_name;
use protobuf::descriptor::{EnumDescriptorProto, EnumValueDescriptorProto};

#[derive(Debug, Clone)]
pub struct Enum<'a> {
    proto: &'a EnumDescriptorProto,
    file: &'a File<'a>,
    full_name: String,
    nested_path: Vec<String>,
    path: Vec<i32>,
}

impl<'a> Enum<'a> {
    pub(crate) fn new(
        proto: &'a EnumDescriptorProto,
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

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn normalized_name(&self) -> String {
        normalize_type_name(self.file.package(), &self.full_name)
    }

    pub fn file(&self) -> &'a File<'a> {
        self.file
    }

    pub fn nested_path(&self) -> String {
        self.nested_path.join(".")
    }

    pub fn location(&self) -> Location {
        self.file.location(&self.path)
    }

    pub fn values(&self) -> Vec<EnumValue<'a>> {
        self.proto
            .value
            .iter()
            .enumerate()
            .map(|(index, proto)| {
                let mut nested_path = self.nested_path.clone();
                nested_path.push(proto.name().to_string());
                let mut path = self.path.clone();
                path.extend([ENUM_VALUE, index as i32]);
                EnumValue {
                    proto,
                    file: self.file,
                    nested_path,
                    path,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct EnumValue<'a> {
    proto: &'a EnumValueDescriptorProto,
    file: &'a File<'a>,
    nested_path: Vec<String>,
    path: Vec<i32>,
}

impl<'a> EnumValue<'a> {
    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    /// Numeric value, the identity of an enum value.
    pub fn number(&self) -> i32 {
        self.proto.number()
    }

    pub fn proto_file_name(&self) -> &'a str {
        self.file.name()
    }

    pub fn source_code_line(&self) -> Option<u32> {
        self.file.source_line(&self.path)
    }

    /// Dotted path from the top of the file, e.g. `Outer.Color.RED`.
    pub fn nested_path(&self) -> String {
        self.nested_path.join(".")
    }

    pub fn location(&self) -> Location {
        Location::new(self.proto_file_name(), self.source_code_line())
    }
}
