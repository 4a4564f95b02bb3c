//! Newtype domain identifiers.
//!
//! Every GitHub concept the workflow touches is represented as a distinct
//! newtype wrapping a primitive. This prevents accidentally interchanging, for
//! example, an [`IssueNumber`] with an [`InstallationId`] even though both are
//! integers under the hood.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (GitHub-assigned integers).
// Generates: struct (Copy), new(), as_u64(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: GitHub-integer-backed
// ---------------------------------------------------------------------------

u64_id! {
    /// The per-repository number GitHub assigns to an issue.
    IssueNumber
}

u64_id! {
    /// Identifies one installation of a GitHub App.
    ///
    /// Every event delivered to an App carries the installation id; API
    /// credentials are minted per installation.
    InstallationId
}

// ---------------------------------------------------------------------------
// Identifiers: String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// The login of the user or organisation that owns a repository.
    RepositoryOwner
}

string_id! {
    /// The short name of a repository (without the owner prefix).
    RepositoryName
}

string_id! {
    /// The name of an issue label, exactly as GitHub reports it.
    ///
    /// Label membership is compared case-sensitively; workflow vocabulary
    /// lookups (see [`crate::WorkflowStatus::from_label`]) are not.
    LabelName
}

impl PartialEq<str> for LabelName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LabelName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl LabelName {
    /// Wraps a compile-time label name; callers guarantee it is non-empty.
    pub(crate) fn from_static(name: &'static str) -> Self {
        Self(name.to_string())
    }
}
