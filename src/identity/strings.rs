//! String resources consumed by the identity core
//!
//! The core needs exactly one localized label: the description given to
//! revisions created by auto-revisioning.

use std::collections::HashMap;

/// Identifier of a localized string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringId {
    /// Description of automatically created revisions
    AutoRevision,
}

impl StringId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringId::AutoRevision => "auto revision",
        }
    }
}

/// Read-only lookup of localized strings.
pub trait StringProvider: Send + Sync {
    /// Returns the string for `id`, or `None` if the resource is missing.
    fn lookup(&self, id: StringId) -> Option<String>;
}

/// In-memory string table.
#[derive(Debug, Clone, Default)]
pub struct StaticStrings {
    values: HashMap<StringId, String>,
}

impl StaticStrings {
    /// Default English label.
    pub const DEFAULT_AUTO_REVISION_LABEL: &'static str = "Autorevision";

    /// A table with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A table holding the auto-revision label.
    pub fn with_auto_revision_label(label: impl Into<String>) -> Self {
        let mut strings = Self::empty();
        strings.insert(StringId::AutoRevision, label);
        strings
    }

    pub fn insert(&mut self, id: StringId, value: impl Into<String>) {
        self.values.insert(id, value.into());
    }
}

impl StringProvider for StaticStrings {
    fn lookup(&self, id: StringId) -> Option<String> {
        self.values.get(&id).cloned()
    }
}
