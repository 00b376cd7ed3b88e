//! Desktop application lookup and launching.
//!
//! Applications are resolved from freedesktop `.desktop` entries under the
//! XDG data directories. An application that is not installed resolves to
//! `None` and its provider is simply not registered.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use provider_core::{App, AppId, AppLauncher, ProviderCoreError};
use tracing::{debug, info};

/// An installed application together with its launch command line.
#[derive(Debug, Clone)]
pub struct InstalledApp {
    pub app: App,
    /// The `Exec` line of the desktop entry, split into arguments. May
    /// contain one freedesktop field code (`%u`, `%U`, `%f`, `%F`).
    pub exec: Vec<String>,
}

/// Look up `desktop_id` in the XDG application directories.
pub fn find_installed_app(desktop_id: &str) -> Option<InstalledApp> {
    for dir in application_dirs() {
        let path = dir.join(desktop_id);
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        debug!(desktop_id, path = %path.display(), "found desktop entry");
        return parse_desktop_entry(desktop_id, &contents);
    }
    info!(desktop_id, "application not installed");
    None
}

/// `$XDG_DATA_HOME/applications` followed by every `$XDG_DATA_DIRS` entry,
/// with the usual fallbacks.
fn application_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(base) = directories::BaseDirs::new() {
        dirs.push(base.data_dir().join("applications"));
    }

    let data_dirs = env::var("XDG_DATA_DIRS")
        .unwrap_or_else(|_| "/usr/local/share:/usr/share".to_string());
    for dir in data_dirs.split(':').filter(|dir| !dir.is_empty()) {
        dirs.push(PathBuf::from(dir).join("applications"));
    }

    dirs
}

/// Extract `Name`, `Icon` and `Exec` from the `[Desktop Entry]` group.
fn parse_desktop_entry(desktop_id: &str, contents: &str) -> Option<InstalledApp> {
    let mut in_entry_group = false;
    let mut name = None;
    let mut icon = None;
    let mut exec = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_entry_group = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry_group {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "Name" if name.is_none() => name = Some(value.trim().to_string()),
                "Icon" if icon.is_none() => icon = Some(value.trim().to_string()),
                "Exec" if exec.is_none() => exec = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let exec = split_exec(&exec?);
    if exec.is_empty() {
        return None;
    }

    Some(InstalledApp {
        app: App {
            id: AppId::from(desktop_id),
            name: name.unwrap_or_else(|| desktop_id.to_string()),
            icon: icon.unwrap_or_default(),
        },
        exec,
    })
}

/// Split an `Exec` value into arguments following the desktop entry quoting
/// rules: whitespace separates arguments, double quotes group an argument
/// that contains whitespace, and a backslash inside quotes escapes the next
/// character. Toolbox-installed IDEs quote the whole program path.
fn split_exec(exec: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;

    let mut chars = exec.chars();
    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' => quoted = false,
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                _ => current.push(c),
            }
        } else {
            match c {
                '"' => {
                    quoted = true;
                    started = true;
                }
                c if c.is_whitespace() => {
                    if started {
                        args.push(std::mem::take(&mut current));
                        started = false;
                    }
                }
                _ => {
                    current.push(c);
                    started = true;
                }
            }
        }
    }
    if started {
        args.push(current);
    }
    args
}

/// Launches one application by spawning its desktop entry command, detached.
#[derive(Debug, Clone)]
pub struct CommandLauncher {
    exec: Vec<String>,
}

impl CommandLauncher {
    pub fn new(exec: Vec<String>) -> Self {
        Self { exec }
    }

    /// Build the argument list with the field code replaced by `uri`, or
    /// removed when there is no target.
    fn argv(&self, uri: Option<&str>) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.exec.len());
        for arg in &self.exec {
            match arg.as_str() {
                "%u" | "%U" | "%f" | "%F" => {
                    if let Some(uri) = uri {
                        argv.push(uri.to_string());
                    }
                }
                // Informational field codes with no argument equivalent.
                "%i" | "%c" | "%k" => {}
                _ => argv.push(arg.clone()),
            }
        }
        if let Some(uri) = uri {
            if !argv.iter().any(|arg| arg == uri) {
                argv.push(uri.to_string());
            }
        }
        argv
    }
}

impl AppLauncher for CommandLauncher {
    fn launch(&self, app: &AppId, uri: Option<&str>) -> Result<(), ProviderCoreError> {
        let argv = self.argv(uri);
        let Some((program, args)) = argv.split_first() else {
            return Err(ProviderCoreError::Launch {
                app: app.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "desktop entry has an empty Exec line",
                ),
            });
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ProviderCoreError::Launch {
                app: app.to_string(),
                source,
            })?;
        info!(app = %app, pid = child.id(), "launched application");
        Ok(())
    }
}
