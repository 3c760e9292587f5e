use std::fs;
use std::path::Path;

use serde::Deserialize;

use meshviz_error::{Error, Result};

use crate::MeshvizOptions;

/// Optional TOML defaults; command-line flags take precedence.
///
/// ```toml
/// namespace = "bookinfo"
/// pretty = true
/// max_depth = 64
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub pretty: Option<bool>,
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl FileConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::from(e)
                .with_operation("config::from_path")
                .with_context("path", shown.clone())
        })?;
        toml::from_str(&text).map_err(|e| {
            Error::config_invalid(format!("invalid TOML: {}", e.message()))
                .with_operation("config::from_path")
                .with_context("path", shown)
                .set_source(e)
        })
    }

    /// Fill in whatever the command line left unset.
    pub fn resolve(
        &self,
        namespace: Option<String>,
        pretty: Option<bool>,
        max_depth: Option<usize>,
    ) -> Result<MeshvizOptions> {
        let Some(namespace) = namespace.or_else(|| self.namespace.clone()) else {
            return Err(Error::config_invalid(
                "no namespace given: pass --namespace or set `namespace` in the config file",
            )
            .with_operation("config::resolve")
            .with_context("key", "namespace"));
        };
        let mut opts = MeshvizOptions::new(namespace);
        opts.pretty = pretty.or(self.pretty).unwrap_or(false);
        if let Some(depth) = max_depth.or(self.max_depth) {
            opts.max_depth = depth;
        }
        Ok(opts)
    }
}
