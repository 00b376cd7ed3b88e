use std::path::{Path, PathBuf};

use globset::Glob;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use walkdir::WalkDir;

/// File name of the recent projects list inside `options/`.
const RECENT_PROJECTS_FILE: &str = "recentProjects.xml";

/// Matches the product version embedded in a configuration directory name,
/// e.g. `IdeaIC2023.1` or `AndroidStudio2022.3`.
#[allow(clippy::expect_used)]
static VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,4}).(\d{1,2})").expect("version pattern must compile"));

/// A configuration directory with the product version parsed from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedDir {
    path: PathBuf,
    version: (u16, u16),
}

impl VersionedDir {
    /// Extract a `(major, minor)` version pair from the final component of
    /// `path`. Directories without a recognizable version yield `None`.
    pub fn from_path(path: PathBuf) -> Option<VersionedDir> {
        let version = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| VERSION_PATTERN.captures(name))
            .and_then(|captures| {
                let major = captures[1].parse().ok()?;
                let minor = captures[2].parse().ok()?;
                Some((major, minor))
            })?;

        Some(VersionedDir { path, version })
    }

    pub fn version(&self) -> (u16, u16) {
        self.version
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// Where a product keeps its versioned configuration directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigLocation {
    /// The vendor directory under the user configuration directory.
    pub vendor_dir: &'static str,
    /// A glob for configuration directories inside the vendor directory.
    pub config_glob: &'static str,
}

impl ConfigLocation {
    /// Find the configuration directory of the latest installed product
    /// version under `config_home`.
    pub fn find_latest_config_dir(&self, config_home: &Path) -> Option<VersionedDir> {
        let matcher = match Glob::new(self.config_glob) {
            Ok(glob) => glob.compile_matcher(),
            Err(error) => {
                warn!(%error, glob = self.config_glob, "invalid config glob");
                return None;
            }
        };

        let vendor_dir = config_home.join(self.vendor_dir);
        WalkDir::new(vendor_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_dir())
            .filter(|entry| matcher.is_match(entry.file_name()))
            .map(walkdir::DirEntry::into_path)
            .filter_map(VersionedDir::from_path)
            .max_by_key(VersionedDir::version)
    }

    /// Find the recent projects file of the latest installed product version,
    /// if that file exists.
    pub fn find_latest_recent_projects_file(&self, config_home: &Path) -> Option<PathBuf> {
        self.find_latest_config_dir(config_home)
            .map(|dir| dir.into_path().join("options").join(RECENT_PROJECTS_FILE))
            .filter(|file| file.is_file())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    const LOCATION: ConfigLocation = ConfigLocation {
        vendor_dir: "JetBrains",
        config_glob: "IdeaIC*",
    };

    fn seed_config_dir(config_home: &Path, name: &str, with_projects_file: bool) {
        let dir = config_home.join("JetBrains").join(name);
        fs::create_dir_all(dir.join("options")).expect("create config dir");
        if with_projects_file {
            fs::write(dir.join("options").join("recentProjects.xml"), "<application/>")
                .expect("write projects file");
        }
    }

    #[test]
    fn latest_version_wins() {
        let temp = tempdir().expect("create temp dir");
        seed_config_dir(temp.path(), "IdeaIC2022.3", true);
        seed_config_dir(temp.path(), "IdeaIC2023.1", true);

        let file = LOCATION
            .find_latest_recent_projects_file(temp.path())
            .expect("should resolve a projects file");

        assert!(
            file.ends_with("IdeaIC2023.1/options/recentProjects.xml"),
            "expected the 2023.1 directory to win, got {}",
            file.display()
        );
    }

    #[test]
    fn version_comparison_is_numeric_not_lexicographic() {
        let temp = tempdir().expect("create temp dir");
        seed_config_dir(temp.path(), "IdeaIC2023.9", true);
        seed_config_dir(temp.path(), "IdeaIC2023.10", true);

        let dir = LOCATION
            .find_latest_config_dir(temp.path())
            .expect("should resolve a config dir");

        assert_eq!(dir.version(), (2023, 10), "minor 10 should beat minor 9");
    }

    #[test]
    fn unversioned_directories_are_discarded() {
        let temp = tempdir().expect("create temp dir");
        seed_config_dir(temp.path(), "IdeaIC", true);
        seed_config_dir(temp.path(), "IdeaICBackup", true);

        assert_eq!(
            LOCATION.find_latest_config_dir(temp.path()),
            None,
            "directories without a version pair should not resolve"
        );
    }

    #[test]
    fn glob_excludes_other_products() {
        let temp = tempdir().expect("create temp dir");
        seed_config_dir(temp.path(), "GoLand2024.1", true);
        seed_config_dir(temp.path(), "IdeaIC2022.3", true);

        let dir = LOCATION
            .find_latest_config_dir(temp.path())
            .expect("should resolve a config dir");

        assert_eq!(
            dir.into_path().file_name().and_then(|n| n.to_str()),
            Some("IdeaIC2022.3")
        );
    }

    #[test]
    fn missing_vendor_dir_resolves_to_none() {
        let temp = tempdir().expect("create temp dir");
        assert_eq!(LOCATION.find_latest_recent_projects_file(temp.path()), None);
    }

    #[test]
    fn missing_projects_file_resolves_to_none() {
        let temp = tempdir().expect("create temp dir");
        seed_config_dir(temp.path(), "IdeaIC2023.1", false);

        assert_eq!(
            LOCATION.find_latest_recent_projects_file(temp.path()),
            None,
            "a config dir without the projects file should not resolve"
        );
    }

    #[test]
    fn version_files_are_ignored() {
        let temp = tempdir().expect("create temp dir");
        let vendor = temp.path().join("JetBrains");
        fs::create_dir_all(&vendor).expect("create vendor dir");
        fs::write(vendor.join("IdeaIC2023.1"), "not a directory").expect("write file");

        assert_eq!(
            LOCATION.find_latest_config_dir(temp.path()),
            None,
            "plain files must not be treated as config dirs"
        );
    }
}
