//! Type registry bridge.
//!
//! The analyzer never loads code itself. It asks a [`TypeRegistry`] whether a
//! fully-qualified name resolves and, if so, for the structure it exposes.
//! [`ManifestRegistry`] answers from a JSON dump of the loaded environment.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use crate::error::Result;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The type exists but could not be loaded
    #[error("failed to load {fqcn}: {reason}")]
    LoadFailed { fqcn: String, reason: String },
}

/// A named member (property, constant or parameter) and its attribute names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<MemberDescriptor>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    #[must_use]
    pub fn parameter(mut self, parameter: MemberDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// Structure of a resolved type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub properties: Vec<MemberDescriptor>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default)]
    pub constants: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    #[must_use]
    pub fn property(mut self, property: MemberDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn constant(mut self, constant: MemberDescriptor) -> Self {
        self.constants.push(constant);
        self
    }
}

/// Read-only oracle over the loaded type environment
pub trait TypeRegistry {
    /// `Ok(None)` when no loadable type has this name
    fn resolve(&self, fqcn: &str) -> std::result::Result<Option<TypeDescriptor>, RegistryError>;

    /// Whether an attribute's defining type resolves
    fn annotation_definition_exists(&self, name: &str) -> bool;
}

impl<R: TypeRegistry + ?Sized> TypeRegistry for &R {
    fn resolve(&self, fqcn: &str) -> std::result::Result<Option<TypeDescriptor>, RegistryError> {
        (**self).resolve(fqcn)
    }

    fn annotation_definition_exists(&self, name: &str) -> bool {
        (**self).annotation_definition_exists(name)
    }
}

/// Class names ignore a leading separator and ASCII case
pub fn normalize_name(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestType {
    #[serde(flatten)]
    descriptor: TypeDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load_error: Option<String>,
}

/// On-disk manifest layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryManifest {
    /// Loadable names whose structure is irrelevant (e.g. attribute classes)
    #[serde(default)]
    definitions: Vec<String>,
    #[serde(default)]
    types: Vec<ManifestType>,
}

/// Registry backed by a static map, loaded from JSON or built in code
#[derive(Debug, Clone, Default)]
pub struct ManifestRegistry {
    types: HashMap<String, ManifestType>,
    definitions: HashSet<String>,
}

impl ManifestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let manifest: RegistryManifest = serde_json::from_str(raw)?;
        let mut registry = Self::new();
        for name in manifest.definitions {
            registry.definitions.insert(normalize_name(&name));
        }
        for entry in manifest.types {
            registry
                .types
                .insert(normalize_name(&entry.descriptor.name), entry);
        }
        log::debug!(
            "Registry manifest: {} types, {} definitions",
            registry.types.len(),
            registry.definitions.len()
        );
        Ok(registry)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_types(types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        types.into_iter().fold(Self::new(), Self::with_type)
    }

    /// Builder: add a resolvable type
    #[must_use]
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.insert(
            normalize_name(&descriptor.name),
            ManifestType {
                descriptor,
                load_error: None,
            },
        );
        self
    }

    /// Builder: add a loadable name without structure
    #[must_use]
    pub fn with_definition(mut self, name: impl AsRef<str>) -> Self {
        self.definitions.insert(normalize_name(name.as_ref()));
        self
    }

    /// Builder: add a type whose loading fails
    #[must_use]
    pub fn with_load_error(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        let descriptor = TypeDescriptor::new(name);
        self.types.insert(
            normalize_name(&descriptor.name),
            ManifestType {
                descriptor,
                load_error: Some(reason.into()),
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeRegistry for ManifestRegistry {
    fn resolve(&self, fqcn: &str) -> std::result::Result<Option<TypeDescriptor>, RegistryError> {
        match self.types.get(&normalize_name(fqcn)) {
            None => Ok(None),
            Some(ManifestType {
                load_error: Some(reason),
                ..
            }) => Err(RegistryError::LoadFailed {
                fqcn: fqcn.to_string(),
                reason: reason.clone(),
            }),
            Some(entry) => Ok(Some(entry.descriptor.clone())),
        }
    }

    fn annotation_definition_exists(&self, name: &str) -> bool {
        let key = normalize_name(name);
        self.definitions.contains(&key)
            || self
                .types
                .get(&key)
                .is_some_and(|entry| entry.load_error.is_none())
    }
}
