//! Immutable schema snapshots.
//!
//! A snapshot is a `FileDescriptorSet` plus a SHA-256 fingerprint of its
//! encoded form. It can be built from a serialized descriptor set (as written
//! by `protoc --descriptor_set_out`) or by parsing a directory of `.proto`
//! sources.

use crate::error::{CompatError, Result};
use protobuf::Message;
use protobuf::descriptor::FileDescriptorSet;
use protobuf_parse::Parser;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct Snapshot {
    set: FileDescriptorSet,
    fingerprint: String,
}

impl Snapshot {
    pub fn from_descriptor_set(set: FileDescriptorSet) -> Result<Self> {
        let bytes = set.write_to_bytes()?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let fingerprint = format!("{:x}", hasher.finalize());
        Ok(Self { set, fingerprint })
    }

    /// Decodes a serialized `FileDescriptorSet`.
    pub fn from_descriptor_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_descriptor_set(FileDescriptorSet::parse_from_bytes(bytes)?)
    }

    pub fn from_descriptor_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CompatError::io(path, e))?;
        Self::from_descriptor_bytes(&bytes)
    }

    /// Parses every `.proto` file under `root`. Imports are looked up in
    /// `root` first, then in `includes`; `google/protobuf` imports are built in.
    pub fn from_proto_dir(root: impl AsRef<Path>, includes: &[PathBuf]) -> Result<Self> {
        let root = root.as_ref();
        let inputs = proto_files(root)?;
        if inputs.is_empty() {
            return Err(CompatError::EmptyInput(root.to_path_buf()));
        }
        tracing::debug!(root = %root.display(), files = inputs.len(), "parsing proto sources");

        let mut parser = Parser::new();
        parser.pure().include(root);
        for include in includes {
            parser.include(include);
        }
        let set = parser
            .inputs(&inputs)
            .file_descriptor_set()
            .map_err(|e| CompatError::Parse {
                path: root.to_path_buf(),
                message: format!("{e:#}"),
            })?;
        Self::from_descriptor_set(set)
    }

    /// Loads `path` as a proto source directory when it is a directory and as
    /// a serialized descriptor set otherwise.
    pub fn load(path: impl AsRef<Path>, includes: &[PathBuf]) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_proto_dir(path, includes)
        } else {
            Self::from_descriptor_file(path)
        }
    }

    pub fn descriptor_set(&self) -> &FileDescriptorSet {
        &self.set
    }

    /// Hex-encoded SHA-256 of the encoded descriptor set.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn proto_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            match e.into_io_error() {
                Some(source) => CompatError::io(path, source),
                None => CompatError::Parse {
                    path,
                    message: "filesystem loop while walking proto sources".to_string(),
                },
            }
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "proto") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
