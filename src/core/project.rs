//! In-memory Xcode project document.
//!
//! A [`Project`] owns the parsed `project.pbxproj` tree and remembers where
//! it came from and in which property list flavor, so it can be saved back
//! in place. Objects are addressed by identifier; nothing here copies an
//! object out of the tree.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use plist::{Dictionary, Value};

use crate::core::error::CosignError;
use crate::core::target::{ConfigurationRef, TargetRef};
use crate::pbxproj::{self, Writer};
use crate::util::fs;

/// File name of the document inside a `.xcodeproj` bundle.
pub const DOCUMENT_NAME: &str = "project.pbxproj";

/// Extension of project bundles.
pub const BUNDLE_EXTENSION: &str = "xcodeproj";

/// Serialization flavor of a project document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    /// OpenStep-style ASCII, the format Xcode writes.
    Ascii,
    /// XML property list.
    Xml,
    /// Binary property list.
    Binary,
}

impl ProjectFormat {
    /// Detect the format from the leading bytes of a document.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"bplist") {
            return ProjectFormat::Binary;
        }

        let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
        let start = bytes
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(bytes.len());
        let head = &bytes[start..];

        if head.starts_with(b"<?xml") || head.starts_with(b"<!DOCTYPE") || head.starts_with(b"<plist")
        {
            ProjectFormat::Xml
        } else {
            ProjectFormat::Ascii
        }
    }
}

impl fmt::Display for ProjectFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectFormat::Ascii => f.write_str("ascii"),
            ProjectFormat::Xml => f.write_str("xml"),
            ProjectFormat::Binary => f.write_str("binary"),
        }
    }
}

/// Resolve a user-supplied path to the `project.pbxproj` document.
///
/// Accepts either the `.xcodeproj` bundle directory or the document itself.
pub fn resolve_document_path(path: &Path) -> Result<PathBuf, CosignError> {
    if path.is_dir() {
        let document = path.join(DOCUMENT_NAME);
        if document.is_file() {
            Ok(document)
        } else {
            Err(CosignError::ProjectNotFound { path: document })
        }
    } else if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(CosignError::ProjectNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// A parsed project document.
#[derive(Debug, Clone)]
pub struct Project {
    path: PathBuf,
    format: ProjectFormat,
    document: Dictionary,
}

impl Project {
    /// Open a project from a `.xcodeproj` bundle or `project.pbxproj` path.
    pub fn open(path: &Path) -> Result<Self, CosignError> {
        let path = resolve_document_path(path)?;
        let bytes = std::fs::read(&path).map_err(|source| CosignError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("Read {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(&bytes, path)
    }

    /// Parse a project document from memory.
    ///
    /// `path` is where [`Project::save`] will write it back.
    pub fn from_bytes(bytes: &[u8], path: impl Into<PathBuf>) -> Result<Self, CosignError> {
        let path = path.into();
        let format = ProjectFormat::detect(bytes);

        let value = match format {
            ProjectFormat::Ascii => {
                let text = std::str::from_utf8(bytes).map_err(|e| {
                    CosignError::malformed(format!("{} is not valid UTF-8: {}", path.display(), e))
                })?;
                pbxproj::parse(text, &path.display().to_string()).map_err(|e| {
                    CosignError::Parse {
                        path: path.clone(),
                        source: Box::new(e),
                    }
                })?
            }
            ProjectFormat::Xml | ProjectFormat::Binary => Value::from_reader(Cursor::new(bytes))
                .map_err(|source| CosignError::Plist {
                    path: path.clone(),
                    source,
                })?,
        };

        let document = value
            .into_dictionary()
            .ok_or_else(|| CosignError::malformed("the document is not a dictionary"))?;

        let project = Project {
            path,
            format,
            document,
        };
        project.objects()?;
        project.root_object()?;
        tracing::debug!("Loaded {:?} project document", format);
        Ok(project)
    }

    /// Path of the `project.pbxproj` document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format the document was read in, and will be saved in.
    pub fn format(&self) -> ProjectFormat {
        self.format
    }

    /// The whole document tree.
    pub fn document(&self) -> &Dictionary {
        &self.document
    }

    /// Project name, taken from the enclosing `.xcodeproj` bundle.
    pub fn name(&self) -> Option<&str> {
        let bundle = self.path.parent()?;
        if bundle.extension()? != BUNDLE_EXTENSION {
            return None;
        }
        bundle.file_stem()?.to_str()
    }

    /// Serialize the document in its original format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CosignError> {
        match self.format {
            ProjectFormat::Ascii => Ok(Writer::new()
                .with_project_name(self.name())
                .write_document(&self.document)
                .into_bytes()),
            ProjectFormat::Xml | ProjectFormat::Binary => {
                let value = Value::Dictionary(self.document.clone());
                let mut buf = Vec::new();
                let written = if self.format == ProjectFormat::Xml {
                    value.to_writer_xml(&mut buf)
                } else {
                    value.to_writer_binary(&mut buf)
                };
                written.map_err(|source| CosignError::Plist {
                    path: self.path.clone(),
                    source,
                })?;
                Ok(buf)
            }
        }
    }

    /// Write the document back to [`Project::path`] in one atomic replace.
    pub fn save(&self) -> Result<(), CosignError> {
        let bytes = self.to_bytes()?;
        fs::write_atomic(&self.path, &bytes).map_err(|source| CosignError::Persist {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("Saved {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }

    /// The `objects` dictionary.
    pub fn objects(&self) -> Result<&Dictionary, CosignError> {
        self.document
            .get("objects")
            .and_then(Value::as_dictionary)
            .ok_or_else(|| CosignError::malformed("missing `objects` dictionary"))
    }

    fn objects_mut(&mut self) -> Result<&mut Dictionary, CosignError> {
        self.document
            .get_mut("objects")
            .and_then(Value::as_dictionary_mut)
            .ok_or_else(|| CosignError::malformed("missing `objects` dictionary"))
    }

    /// Look up an object by identifier.
    pub fn object(&self, id: &str) -> Option<&Dictionary> {
        self.objects().ok()?.get(id)?.as_dictionary()
    }

    fn require_object(&self, id: &str) -> Result<&Dictionary, CosignError> {
        self.object(id)
            .ok_or_else(|| CosignError::malformed(format!("object {} is missing", id)))
    }

    fn object_mut(&mut self, id: &str) -> Result<&mut Dictionary, CosignError> {
        self.objects_mut()?
            .get_mut(id)
            .and_then(Value::as_dictionary_mut)
            .ok_or_else(|| CosignError::malformed(format!("object {} is missing", id)))
    }

    /// Identifier of the `PBXProject` root object.
    pub fn root_object_id(&self) -> Result<&str, CosignError> {
        self.document
            .get("rootObject")
            .and_then(Value::as_string)
            .ok_or_else(|| CosignError::malformed("missing `rootObject`"))
    }

    /// The `PBXProject` root object.
    pub fn root_object(&self) -> Result<&Dictionary, CosignError> {
        let id = self.root_object_id()?;
        self.require_object(id)
    }

    /// All targets, in the order of the root object's `targets` array.
    pub fn targets(&self) -> Result<Vec<TargetRef>, CosignError> {
        let ids = self
            .root_object()?
            .get("targets")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        ids.iter()
            .map(|id| {
                let id = id
                    .as_string()
                    .ok_or_else(|| CosignError::malformed("non-string entry in `targets`"))?;
                let object = self.require_object(id)?;
                Ok(TargetRef {
                    id: id.to_string(),
                    name: string_field(object, "name").unwrap_or_default().to_string(),
                    isa: string_field(object, "isa").unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    /// Build configurations of a target, in list order.
    pub fn configurations(&self, target: &TargetRef) -> Result<Vec<ConfigurationRef>, CosignError> {
        let list_id = string_field(self.require_object(&target.id)?, "buildConfigurationList")
            .ok_or_else(|| {
                CosignError::malformed(format!(
                    "target `{}` has no build configuration list",
                    target.name
                ))
            })?;

        let ids = self
            .require_object(list_id)?
            .get("buildConfigurations")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        ids.iter()
            .map(|id| {
                let id = id.as_string().ok_or_else(|| {
                    CosignError::malformed("non-string entry in `buildConfigurations`")
                })?;
                let object = self.require_object(id)?;
                Ok(ConfigurationRef {
                    id: id.to_string(),
                    name: string_field(object, "name").unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    /// The `buildSettings` map of a configuration, if present.
    pub fn build_settings(&self, configuration: &ConfigurationRef) -> Option<&Dictionary> {
        self.object(&configuration.id)?
            .get("buildSettings")?
            .as_dictionary()
    }

    /// The `buildSettings` map of a configuration, created if missing.
    pub fn build_settings_mut(
        &mut self,
        configuration: &ConfigurationRef,
    ) -> Result<&mut Dictionary, CosignError> {
        let object = self.object_mut(&configuration.id)?;
        dictionary_entry_mut(object, "buildSettings")
    }

    /// The `TargetAttributes` entry for a target, if present. Never creates.
    pub fn target_attributes(&self, target: &TargetRef) -> Option<&Dictionary> {
        self.root_object()
            .ok()?
            .get("attributes")?
            .as_dictionary()?
            .get("TargetAttributes")?
            .as_dictionary()?
            .get(&target.id)?
            .as_dictionary()
    }

    /// The `TargetAttributes` entry for a target.
    ///
    /// Creates `attributes`, `TargetAttributes`, and the per-target entry as
    /// needed; existing entries are left as they are.
    pub fn target_attributes_mut(
        &mut self,
        target: &TargetRef,
    ) -> Result<&mut Dictionary, CosignError> {
        let root_id = self.root_object_id()?.to_string();
        let root = self.object_mut(&root_id)?;
        let attributes = dictionary_entry_mut(root, "attributes")?;
        let target_attributes = dictionary_entry_mut(attributes, "TargetAttributes")?;
        dictionary_entry_mut(target_attributes, &target.id)
    }
}

fn string_field<'a>(object: &'a Dictionary, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_string)
}

/// Get the dictionary stored under `key`, inserting an empty one if absent.
///
/// A present value that is not a dictionary is an error; it is never
/// replaced.
pub(crate) fn dictionary_entry_mut<'a>(
    parent: &'a mut Dictionary,
    key: &str,
) -> Result<&'a mut Dictionary, CosignError> {
    if !parent.contains_key(key) {
        parent.insert(key.to_string(), Value::Dictionary(Dictionary::new()));
    }
    parent
        .get_mut(key)
        .and_then(Value::as_dictionary_mut)
        .ok_or_else(|| CosignError::malformed(format!("`{}` is not a dictionary", key)))
}
