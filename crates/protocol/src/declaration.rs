use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Namespace separator used to build fully-qualified names
pub const NAMESPACE_SEPARATOR: char = '\\';

/// The four top-level declaration kinds a source file is expected to hold
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Trait,
    Interface,
    Abstract,
}

impl DeclarationKind {
    pub const ALL: [DeclarationKind; 4] = [
        DeclarationKind::Class,
        DeclarationKind::Trait,
        DeclarationKind::Interface,
        DeclarationKind::Abstract,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Trait => "trait",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Abstract => "abstract",
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarations found in one source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationRecord {
    pub namespace: Option<String>,

    #[serde(rename = "class")]
    pub classes: Vec<String>,

    #[serde(rename = "trait")]
    pub traits: Vec<String>,

    #[serde(rename = "interface")]
    pub interfaces: Vec<String>,

    #[serde(rename = "abstract")]
    pub abstracts: Vec<String>,

    pub file_name: String,

    /// Structural error that routed this file to the suspect bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl DeclarationRecord {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn names(&self, kind: DeclarationKind) -> &[String] {
        match kind {
            DeclarationKind::Class => &self.classes,
            DeclarationKind::Trait => &self.traits,
            DeclarationKind::Interface => &self.interfaces,
            DeclarationKind::Abstract => &self.abstracts,
        }
    }

    pub fn names_mut(&mut self, kind: DeclarationKind) -> &mut Vec<String> {
        match kind {
            DeclarationKind::Class => &mut self.classes,
            DeclarationKind::Trait => &mut self.traits,
            DeclarationKind::Interface => &mut self.interfaces,
            DeclarationKind::Abstract => &mut self.abstracts,
        }
    }

    /// Total number of names across all four buckets
    pub fn total(&self) -> usize {
        DeclarationKind::ALL
            .iter()
            .map(|kind| self.names(*kind).len())
            .sum()
    }

    pub fn has_declarations(&self) -> bool {
        self.total() > 0
    }

    /// A file is suspect unless it declares exactly one name
    pub fn is_suspect(&self) -> bool {
        self.total() != 1
    }

    /// The single declaration of a non-suspect file
    pub fn sole_declaration(&self) -> Option<(DeclarationKind, &str)> {
        if self.is_suspect() {
            return None;
        }
        DeclarationKind::ALL.iter().find_map(|kind| {
            self.names(*kind)
                .first()
                .map(|name| (*kind, name.as_str()))
        })
    }
}

/// `namespace\name`, or just `name` in the global namespace
pub fn qualify(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{ns}{NAMESPACE_SEPARATOR}{name}"),
        _ => name.to_string(),
    }
}

/// A trait, interface or abstract class found in a non-suspect file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SideRegistryEntry {
    pub namespace: Option<String>,
    pub file_name: String,
    pub names: Vec<String>,
}

/// One declared name, flattened out of a [`SideRegistryEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredName {
    pub namespace: Option<String>,
    pub file_name: String,
    pub name: String,
}
