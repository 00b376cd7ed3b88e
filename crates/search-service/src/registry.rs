//! Static provider definitions.

use provider_core::ConfigLocation;

/// The well-known bus name of this service.
pub const BUSNAME: &str = "io.github.sympoies.JetBrainsRecentsProvider";

/// Object path prefix all providers register under.
pub const OBJECT_PATH_PREFIX: &str = "/io/github/sympoies/JetBrainsRecentsProvider";

/// A search provider to expose from this service.
#[derive(Debug, Clone, Copy)]
pub struct ProviderDefinition {
    /// A human readable label for this provider.
    pub label: &'static str,
    /// The ID (that is, the filename) of the desktop file of the
    /// corresponding app.
    pub desktop_id: &'static str,
    /// The relative object path to expose this provider at.
    pub relative_obj_path: &'static str,
    /// The location of the configuration of the corresponding product.
    pub config: ConfigLocation,
}

impl ProviderDefinition {
    /// Gets the full object path for this provider.
    pub fn objpath(&self) -> String {
        format!("{OBJECT_PATH_PREFIX}/{}", self.relative_obj_path)
    }
}

/// Known search providers.
///
/// For each definition in this array a corresponding provider file must be
/// installed under `providers/`; the file must refer to the same
/// `desktop_id` and the same object path. Object paths must be unique per
/// desktop ID so the shell always launches the right application.
pub const PROVIDERS: &[ProviderDefinition] = &[
    ProviderDefinition {
        label: "CLion (toolbox)",
        desktop_id: "jetbrains-clion.desktop",
        relative_obj_path: "toolbox/clion",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "CLion*",
        },
    },
    ProviderDefinition {
        label: "GoLand (toolbox)",
        desktop_id: "jetbrains-goland.desktop",
        relative_obj_path: "toolbox/goland",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "GoLand*",
        },
    },
    ProviderDefinition {
        label: "IDEA (toolbox)",
        desktop_id: "jetbrains-idea.desktop",
        relative_obj_path: "toolbox/idea",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "IntelliJIdea*",
        },
    },
    ProviderDefinition {
        label: "IDEA Community Edition (toolbox)",
        desktop_id: "jetbrains-idea-ce.desktop",
        relative_obj_path: "toolbox/ideace",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "IdeaIC*",
        },
    },
    ProviderDefinition {
        label: "PHPStorm (toolbox)",
        desktop_id: "jetbrains-phpstorm.desktop",
        relative_obj_path: "toolbox/phpstorm",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "PhpStorm*",
        },
    },
    ProviderDefinition {
        label: "PyCharm (toolbox)",
        desktop_id: "jetbrains-pycharm.desktop",
        relative_obj_path: "toolbox/pycharm",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "PyCharm*",
        },
    },
    ProviderDefinition {
        label: "Rider (toolbox)",
        desktop_id: "jetbrains-rider.desktop",
        relative_obj_path: "toolbox/rider",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "Rider*",
        },
    },
    ProviderDefinition {
        label: "RubyMine (toolbox)",
        desktop_id: "jetbrains-rubymine.desktop",
        relative_obj_path: "toolbox/rubymine",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "RubyMine*",
        },
    },
    ProviderDefinition {
        label: "RustRover (toolbox)",
        desktop_id: "jetbrains-rustrover.desktop",
        relative_obj_path: "toolbox/rustrover",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "RustRover*",
        },
    },
    ProviderDefinition {
        label: "Android Studio (toolbox)",
        desktop_id: "jetbrains-studio.desktop",
        relative_obj_path: "toolbox/studio",
        config: ConfigLocation {
            vendor_dir: "Google",
            config_glob: "AndroidStudio*",
        },
    },
    ProviderDefinition {
        label: "WebStorm (toolbox)",
        desktop_id: "jetbrains-webstorm.desktop",
        relative_obj_path: "toolbox/webstorm",
        config: ConfigLocation {
            vendor_dir: "JetBrains",
            config_glob: "WebStorm*",
        },
    },
];

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::fs;
    use std::path::Path;

    use super::*;

    /// Parse the flat `key=value` body of a shell search provider descriptor.
    fn parse_descriptor(contents: &str) -> HashMap<String, String> {
        contents
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect()
    }

    fn load_descriptors() -> Vec<HashMap<String, String>> {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("providers");
        let mut descriptors = Vec::new();
        for entry in fs::read_dir(dir).expect("read providers dir") {
            let path = entry.expect("read dir entry").path();
            if path.extension().and_then(|e| e.to_str()) != Some("ini") {
                continue;
            }
            let contents = fs::read_to_string(&path).expect("read descriptor");
            descriptors.push(parse_descriptor(&contents));
        }
        descriptors
    }

    #[test]
    fn every_provider_has_a_matching_descriptor_file() {
        let descriptors = load_descriptors();
        assert_eq!(
            descriptors.len(),
            PROVIDERS.len(),
            "descriptor files and provider definitions must match one to one"
        );
        for provider in PROVIDERS {
            let descriptor = descriptors
                .iter()
                .find(|d| d.get("DesktopId").map(String::as_str) == Some(provider.desktop_id))
                .unwrap_or_else(|| panic!("no descriptor for {}", provider.desktop_id));
            assert_eq!(
                descriptor.get("ObjectPath"),
                Some(&provider.objpath()),
                "descriptor object path must match {}",
                provider.label
            );
            assert_eq!(descriptor.get("BusName"), Some(&BUSNAME.to_string()));
            assert_eq!(descriptor.get("Version").map(String::as_str), Some("2"));
        }
    }

    #[test]
    fn desktop_ids_are_unique() {
        let ids: HashSet<&str> = PROVIDERS.iter().map(|p| p.desktop_id).collect();
        assert_eq!(ids.len(), PROVIDERS.len());
    }

    #[test]
    fn object_paths_are_unique() {
        let paths: HashSet<String> = PROVIDERS.iter().map(ProviderDefinition::objpath).collect();
        assert_eq!(paths.len(), PROVIDERS.len());
    }

    #[test]
    fn object_paths_are_under_the_service_prefix() {
        for provider in PROVIDERS {
            let path = provider.objpath();
            assert!(
                path.starts_with(OBJECT_PATH_PREFIX),
                "{path} should start with the service prefix"
            );
        }
    }

    #[test]
    fn config_globs_compile() {
        for provider in PROVIDERS {
            assert!(
                globset::Glob::new(provider.config.config_glob).is_ok(),
                "glob {} of {} must be valid",
                provider.config.config_glob,
                provider.label
            );
        }
    }
}
