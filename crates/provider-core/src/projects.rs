use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::debug;

use crate::error::ProviderCoreError;

/// Placeholder the IDE writes in place of the user's home directory.
pub const USER_HOME_TOKEN: &str = "$USER_HOME$";

/// A recently opened project of one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentProject {
    /// Display name of the project.
    pub name: String,
    /// Absolute path of the project directory.
    pub path: PathBuf,
}

/// Read all existing recent projects from `file`.
///
/// Both historical schema variants of the recent projects document are
/// recognized: the legacy `recentPaths` option list and the current
/// `additionalInfo` map of the recent projects manager component. Paths are
/// deduplicated after home expansion; paths that no longer exist on the
/// filesystem are dropped.
pub fn read_recent_projects(
    file: &Path,
    home: &str,
) -> Result<Vec<RecentProject>, ProviderCoreError> {
    let contents = fs::read_to_string(file).map_err(|source| ProviderCoreError::Io {
        path: file.to_path_buf(),
        source,
    })?;

    let paths =
        parse_recent_project_paths(&contents, home).map_err(|source| ProviderCoreError::Xml {
            path: file.to_path_buf(),
            source,
        })?;

    let mut projects = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.exists() {
            debug!(path = %path.display(), "dropping recent project, path no longer exists");
            continue;
        }
        match project_name(&path) {
            Some(name) => projects.push(RecentProject { name, path }),
            None => {
                debug!(path = %path.display(), "skipping recent project, no usable name");
            }
        }
    }
    Ok(projects)
}

/// Extract the deduplicated project paths from a recent projects document.
fn parse_recent_project_paths(
    xml: &str,
    home: &str,
) -> Result<IndexSet<PathBuf>, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut paths = IndexSet::new();

    // Legacy variant: <option name="recentPaths"><list><option value=…/></list></option>
    for list in doc
        .descendants()
        .filter(|node| node.has_tag_name("option"))
        .filter(|node| node.attribute("name") == Some("recentPaths"))
    {
        for value in list
            .descendants()
            .filter(|node| node.has_tag_name("option"))
            .filter_map(|node| node.attribute("value"))
        {
            paths.insert(expand_home(value, home));
        }
    }

    // Current variant: map entry keys under the recent projects manager's
    // additionalInfo option. Rider uses its own component name.
    for component in doc
        .descendants()
        .filter(|node| node.has_tag_name("component"))
        .filter(|node| {
            matches!(
                node.attribute("name"),
                Some("RecentProjectsManager") | Some("RiderRecentProjectsManager")
            )
        })
    {
        for info in component
            .descendants()
            .filter(|node| node.has_tag_name("option"))
            .filter(|node| node.attribute("name") == Some("additionalInfo"))
        {
            for key in info
                .descendants()
                .filter(|node| node.has_tag_name("entry"))
                .filter_map(|node| node.attribute("key"))
            {
                paths.insert(expand_home(key, home));
            }
        }
    }

    Ok(paths)
}

fn expand_home(raw: &str, home: &str) -> PathBuf {
    PathBuf::from(raw.replace(USER_HOME_TOKEN, home))
}

/// Resolve the display name of the project at `path`.
///
/// The trimmed contents of `.idea/.name` win when present and non-empty;
/// otherwise the final path component is used. Projects without a final
/// component yield `None`.
fn project_name(path: &Path) -> Option<String> {
    let marker = path.join(".idea").join(".name");
    match fs::read_to_string(&marker) {
        Ok(contents) => {
            let trimmed = contents.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        Err(error) => {
            debug!(marker = %marker.display(), %error, "no project name marker, falling back to directory name");
        }
    }

    path.file_name()
        .map(|name| name.to_string_lossy().trim().to_string())
        .filter(|name| !name.is_empty())
}
