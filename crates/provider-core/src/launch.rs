use std::fmt;

use crate::error::ProviderCoreError;

/// The desktop file ID of an application, e.g. `jetbrains-idea-ce.desktop`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// An installed application a provider launches projects with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    /// Desktop file ID.
    pub id: AppId,
    /// Human readable application name.
    pub name: String,
    /// Icon reference, suitable for the `gicon` metadata field.
    pub icon: String,
}

/// Launches applications on behalf of a provider.
///
/// Implementations live outside the core; an application that cannot be
/// launched reports an error which the provider logs and swallows, since the
/// search protocol has no return channel for activation failures.
pub trait AppLauncher {
    /// Launch `app` with `uri` as its target, or without a target when `uri`
    /// is `None`.
    fn launch(&self, app: &AppId, uri: Option<&str>) -> Result<(), ProviderCoreError>;
}
