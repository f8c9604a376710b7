use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::naming::{NamingOptions, is_identifier};

/// Project configuration loaded from `.hookgen.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HookgenConfig {
    pub input: String,
    pub output: String,
    /// Base path baked into the generated client.
    pub base_path: String,
    /// Flavor ids such as `react-query`.
    pub flavors: Vec<String>,
    pub naming: NamingConfig,
    pub routes_file: String,
    pub client_file: String,
}

impl Default for HookgenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "src/api".to_string(),
            base_path: String::new(),
            flavors: vec![FlavorId::ReactQuery.as_str().to_string()],
            naming: NamingConfig::default(),
            routes_file: "routes.ts".to_string(),
            client_file: "client.ts".to_string(),
        }
    }
}

/// Naming overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Prepended to every derived base name.
    pub prefix: String,
    /// operationId or `METHOD /path` → replacement base name.
    pub aliases: IndexMap<String, String>,
}

/// The binding flavors hookgen can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlavorId {
    ReactQuery,
    VueQuery,
    SvelteQuery,
    SolidQuery,
    Swr,
}

impl FlavorId {
    pub const ALL: [FlavorId; 5] = [
        FlavorId::ReactQuery,
        FlavorId::VueQuery,
        FlavorId::SvelteQuery,
        FlavorId::SolidQuery,
        FlavorId::Swr,
    ];

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == id)
    }

    /// Id used in configuration and as the output subdirectory.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlavorId::ReactQuery => "react-query",
            FlavorId::VueQuery => "vue-query",
            FlavorId::SvelteQuery => "svelte-query",
            FlavorId::SolidQuery => "solid-query",
            FlavorId::Swr => "swr",
        }
    }
}

impl fmt::Display for FlavorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated configuration handed to the generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub flavors: Vec<FlavorId>,
    pub base_path: String,
    pub naming: NamingOptions,
    pub routes_file: String,
    pub client_file: String,
}

impl GeneratorConfig {
    /// Import specifier of the routes module from a binding module, e.g. `../routes`.
    pub fn routes_import(&self) -> String {
        format!("../{}", strip_ts(&self.routes_file))
    }

    pub fn client_import(&self) -> String {
        format!("../{}", strip_ts(&self.client_file))
    }

    /// Import specifier of the routes module from the client module.
    pub fn routes_import_from_client(&self) -> String {
        format!("./{}", strip_ts(&self.routes_file))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            flavors: vec![FlavorId::ReactQuery],
            base_path: String::new(),
            naming: NamingOptions::default(),
            routes_file: "routes.ts".to_string(),
            client_file: "client.ts".to_string(),
        }
    }
}

fn strip_ts(file: &str) -> &str {
    file.strip_suffix(".ts").unwrap_or(file)
}

impl HookgenConfig {
    /// Validate into a [`GeneratorConfig`]. Any error here stops the run
    /// before a single file is emitted.
    pub fn to_generator_config(&self) -> Result<GeneratorConfig, ConfigError> {
        if self.output.trim().is_empty() {
            return Err(ConfigError::EmptyOutput);
        }
        if self.flavors.is_empty() {
            return Err(ConfigError::NoFlavors);
        }

        let mut flavors = Vec::with_capacity(self.flavors.len());
        for id in &self.flavors {
            let flavor =
                FlavorId::parse(id).ok_or_else(|| ConfigError::UnknownFlavor(id.clone()))?;
            if flavors.contains(&flavor) {
                return Err(ConfigError::DuplicateFlavor(id.clone()));
            }
            flavors.push(flavor);
        }

        validate_file_name("routes_file", &self.routes_file)?;
        validate_file_name("client_file", &self.client_file)?;
        if self.routes_file.eq_ignore_ascii_case(&self.client_file) {
            return Err(ConfigError::SameOutputFile(self.routes_file.clone()));
        }

        if !self.naming.prefix.is_empty() && !is_identifier(&self.naming.prefix) {
            return Err(ConfigError::InvalidPrefix(self.naming.prefix.clone()));
        }
        for (key, value) in &self.naming.aliases {
            if !is_identifier(value) {
                return Err(ConfigError::InvalidAlias {
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }

        Ok(GeneratorConfig {
            flavors,
            base_path: self.base_path.clone(),
            naming: NamingOptions {
                prefix: self.naming.prefix.clone(),
                aliases: self.naming.aliases.clone(),
            },
            routes_file: self.routes_file.clone(),
            client_file: self.client_file.clone(),
        })
    }
}

fn validate_file_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let stem = value.strip_suffix(".ts").unwrap_or_default();
    let valid = !stem.is_empty()
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidFileName {
            field,
            value: value.to_string(),
        })
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".hookgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<HookgenConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let config: HookgenConfig =
        serde_yaml_ng::from_str(&content).map_err(|e| ConfigError::Syntax {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# hookgen configuration
input: openapi.yaml
output: src/api
base_path: ""           # baked into the generated client, e.g. https://api.example.com

flavors:                # react-query | vue-query | svelte-query | solid-query | swr
  - react-query

naming:
  prefix: ""            # prepended to every derived name
  aliases: {}
    # listPets: pets                 # operationId → base name
    # "GET /products/{id}": product  # route → base name

routes_file: routes.ts
client_file: client.ts
"#
}
