//! Matching and state-management core for JetBrains recent-project search
//! providers.
//!
//! - `config`: versioned configuration directory resolution.
//! - `projects`: recent projects file parsing and name resolution.
//! - `matching`: two-pass fuzzy ranking of cached projects.
//! - `provider`: per-application provider instance and its project cache.
//! - `launch`: application launch collaborator boundary.

pub mod config;
pub mod error;
pub mod launch;
pub mod matching;
pub mod projects;
pub mod provider;

pub use config::{ConfigLocation, VersionedDir};
pub use error::ProviderCoreError;
pub use launch::{App, AppId, AppLauncher};
pub use matching::find_matching_projects;
pub use projects::{RecentProject, read_recent_projects};
pub use provider::{ResultMeta, SearchProvider};
