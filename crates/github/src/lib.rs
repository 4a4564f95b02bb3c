//! GitHub REST adapter for the issue workflow.
//!
//! Implements [`workflow::LabelEditor`] with [`GitHubClient`] and
//! [`workflow::LabelEditorProvider`] with [`GitHubClientProvider`], which picks
//! personal-token or GitHub App authentication per event.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain workflow rules. HTTP,
//! authentication, and URL encoding are handled here; the [`workflow`] crate
//! never sees them.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`client`] | [`GitHubClient`]: issue edit, add labels, remove label |
//! | [`app`] | [`AppCredentials`]: App JWT and installation token exchange |
//! | [`provider`] | [`GitHubClientProvider`] |
//! | [`errors`] | [`GitHubError`] |

pub mod app;
pub mod client;
pub mod errors;
pub mod provider;

pub use app::AppCredentials;
pub use client::{GitHubClient, GITHUB_API_URL};
pub use errors::GitHubError;
pub use provider::GitHubClientProvider;
