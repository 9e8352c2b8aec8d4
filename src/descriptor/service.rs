//! Views over services and their methods.

use crate::descriptor::{SERVICE_METHOD, qualify};
use crate::descriptor::file::File;
use crate::descriptor::options;
use crate::findings::Location;
use protobuf::descriptor::{MethodDescriptorProto, ServiceDescriptorProto};

#[derive(Debug, Clone)]
pub struct Service<'a> {
    proto: &'a ServiceDescriptorProto,
    file: &'a File<'a>,
    path: Vec<i32>,
}

impl<'a> Service<'a> {
    pub(crate) fn new(proto: &'a ServiceDescriptorProto, file: &'a File<'a>, path: Vec<i32>) -> Self {
        Self { proto, file, path }
    }

    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    /// `.pkg.Service`, the name clients address the service by.
    pub fn full_name(&self) -> String {
        qualify(&self.file.scope(), self.name())
    }

    pub fn location(&self) -> Location {
        self.file.location(&self.path)
    }

    pub fn methods(&self) -> Vec<Method<'a>> {
        self.proto
            .method
            .iter()
            .enumerate()
            .map(|(index, proto)| {
                let mut path = self.path.clone();
                path.extend([SERVICE_METHOD, index as i32]);
                Method {
                    proto,
                    file: self.file,
                    path,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Method<'a> {
    proto: &'a MethodDescriptorProto,
    file: &'a File<'a>,
    path: Vec<i32>,
}

impl<'a> Method<'a> {
    pub fn name(&self) -> &'a str {
        self.proto.name()
    }

    pub fn input_type(&self) -> &'a str {
        self.proto.input_type()
    }

    pub fn output_type(&self) -> &'a str {
        self.proto.output_type()
    }

    pub fn client_streaming(&self) -> bool {
        self.proto.client_streaming()
    }

    pub fn server_streaming(&self) -> bool {
        self.proto.server_streaming()
    }

    /// Scope relative request/response type names resolve from: the file package.
    pub fn scope(&self) -> String {
        self.file.scope()
    }

    pub fn method_signatures(&self) -> Vec<String> {
        self.proto
            .options
            .as_ref()
            .map(options::method_signatures)
            .unwrap_or_default()
    }

    pub fn location(&self) -> Location {
        self.file.location(&self.path)
    }
}
