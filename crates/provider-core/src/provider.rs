use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::ConfigLocation;
use crate::error::ProviderCoreError;
use crate::launch::{App, AppLauncher};
use crate::matching::find_matching_projects;
use crate::projects::{RecentProject, read_recent_projects};

/// Metadata record describing one search result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResultMeta {
    pub id: String,
    pub name: String,
    /// The project path, shown as the result's second line.
    pub description: String,
    /// Icon reference of the owning application.
    pub gicon: String,
}

/// A search provider for the recent projects of one installed application.
///
/// Owns the application's live project cache. The cache is rebuilt wholesale
/// by [`initial_search`](Self::initial_search), the only mutating operation,
/// so metadata and activation lookups always see exactly one generation.
#[derive(Debug)]
pub struct SearchProvider<L> {
    app: App,
    config: ConfigLocation,
    config_home: PathBuf,
    home: String,
    launcher: L,
    projects: IndexMap<String, RecentProject>,
}

impl<L: AppLauncher> SearchProvider<L> {
    /// Create an idle provider with an empty cache.
    ///
    /// `config_home` is the user configuration directory to resolve versioned
    /// product directories under, and `home` is the value substituted for the
    /// home placeholder in recent project entries.
    pub fn new(
        app: App,
        config: ConfigLocation,
        config_home: PathBuf,
        home: String,
        launcher: L,
    ) -> Self {
        Self {
            app,
            config,
            config_home,
            home,
            launcher,
            projects: IndexMap::new(),
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    fn project_id(&self, path: &Path) -> String {
        format!(
            "jetbrains-recent-project-{}-{}",
            self.app.id,
            path.display()
        )
    }

    /// Rebuild the project cache from the current state on disk.
    ///
    /// A missing or unreadable projects file means "no recent projects"; only
    /// a malformed projects file is an error for the caller.
    fn refresh(&mut self) -> Result<(), ProviderCoreError> {
        let mut generation = IndexMap::new();
        if let Some(file) = self.config.find_latest_recent_projects_file(&self.config_home) {
            match read_recent_projects(&file, &self.home) {
                Ok(projects) => {
                    for project in projects {
                        generation.insert(self.project_id(&project.path), project);
                    }
                }
                Err(ProviderCoreError::Io { path, source }) => {
                    debug!(
                        app = %self.app.id,
                        path = %path.display(),
                        %source,
                        "cannot read recent projects file, treating as empty"
                    );
                }
                Err(error) => return Err(error),
            }
        } else {
            debug!(app = %self.app.id, "no recent projects file found");
        }
        info!(app = %self.app.id, count = generation.len(), "refreshed recent projects");
        // The finished map replaces the old one atomically; lookups never see
        // a partially built generation.
        self.projects = generation;
        Ok(())
    }

    /// Start a new search: refresh the cache, then rank the full candidate
    /// set against `terms`.
    pub fn initial_search<S: AsRef<str>>(
        &mut self,
        terms: &[S],
    ) -> Result<Vec<String>, ProviderCoreError> {
        self.refresh()?;
        Ok(find_matching_projects(&self.projects, terms))
    }

    /// Refine a previous search: rank only the cached projects whose IDs
    /// appear in `previous_results`. Does not refresh, so the result is
    /// always a subset of `previous_results`.
    pub fn refine_search<S: AsRef<str>>(
        &self,
        previous_results: &[String],
        terms: &[S],
    ) -> Vec<String> {
        let candidates: IndexMap<String, RecentProject> = previous_results
            .iter()
            .filter_map(|id| {
                self.projects
                    .get(id)
                    .map(|project| (id.clone(), project.clone()))
            })
            .collect();
        find_matching_projects(&candidates, terms)
    }

    /// Describe the given results. IDs from an older cache generation are
    /// silently skipped, so the output may be shorter than the input.
    pub fn result_metas(&self, ids: &[String]) -> Vec<ResultMeta> {
        ids.iter()
            .filter_map(|id| {
                let project = self.projects.get(id)?;
                Some(ResultMeta {
                    id: id.clone(),
                    name: project.name.clone(),
                    description: project.path.to_string_lossy().to_string(),
                    gicon: self.app.icon.clone(),
                })
            })
            .collect()
    }

    /// Open the selected project in the owning application.
    ///
    /// Launch failures are logged and swallowed: the protocol has no return
    /// channel for activation.
    pub fn activate<S: AsRef<str>>(&self, id: &str, terms: &[S], timestamp: u32) {
        debug!(
            app = %self.app.id,
            id,
            timestamp,
            terms = ?terms.iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            "activating result"
        );
        let Some(project) = self.projects.get(id) else {
            warn!(app = %self.app.id, id, "ignoring activation of unknown result");
            return;
        };
        let uri = project.path.to_string_lossy();
        if let Err(err) = self.launcher.launch(&self.app.id, Some(uri.as_ref())) {
            error!(app = %self.app.id, %err, "failed to launch project {uri}");
        }
    }

    /// Launch the owning application without a target.
    pub fn launch_search<S: AsRef<str>>(&self, terms: &[S], timestamp: u32) {
        debug!(
            app = %self.app.id,
            timestamp,
            terms = ?terms.iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            "launching app for search"
        );
        if let Err(err) = self.launcher.launch(&self.app.id, None) {
            error!(app = %self.app.id, %err, "failed to launch app");
        }
    }
}
