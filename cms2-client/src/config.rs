//! Shared configuration loader for the editor integration.
//!
//! `defaults/cms2-client.default.toml` is embedded into the binary so that
//! docs and runtime behavior stay in sync. Hosts layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`ClientConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/cms2-client.default.toml");

/// Server entry point shipped with the extension, relative to its install
/// directory. Used whenever `server.script_path` is left empty.
pub const BUNDLED_SERVER_PATH: &str = "server/cms2_lsp_server.py";

/// Top-level configuration consumed by the integration shim.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub trace: TraceConfig,
}

/// Where and how to launch the external analysis process.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub interpreter_path: String,
    pub script_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraceConfig {
    pub server: TraceLevel,
}

/// Verbosity of protocol-level logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceLevel {
    Off,
    Messages,
    Verbose,
}

impl ClientConfig {
    /// The script path to launch: the configured value verbatim when set,
    /// otherwise the bundled copy under `install_dir`.
    pub fn resolved_script_path(&self, install_dir: &Path) -> PathBuf {
        if self.server.script_path.is_empty() {
            install_dir.join(BUNDLED_SERVER_PATH)
        } else {
            PathBuf::from(&self.server.script_path)
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for host editor settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ClientConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_interpreter_is_bare_python() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.server.interpreter_path, "python");
        assert_eq!(config.trace.server, TraceLevel::Off);
    }

    #[test]
    fn unset_script_path_resolves_to_bundled_copy() {
        let config = load_defaults().unwrap();
        let resolved = config.resolved_script_path(Path::new("/opt/cms2-ext"));
        assert_eq!(
            resolved,
            Path::new("/opt/cms2-ext").join(BUNDLED_SERVER_PATH)
        );
    }

    #[test]
    fn explicit_script_path_is_used_verbatim() {
        let config = Loader::new()
            .set_override("server.script_path", "/srv/custom/server.py")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let resolved = config.resolved_script_path(Path::new("/opt/cms2-ext"));
        assert_eq!(resolved, Path::new("/srv/custom/server.py"));
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[trace]\nserver = \"verbose\"").unwrap();

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("layered config to build");
        assert_eq!(config.trace.server, TraceLevel::Verbose);
        // Untouched keys keep their defaults.
        assert_eq!(config.server.interpreter_path, "python");
    }

    #[test]
    fn absent_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/no/such/cms2.toml")
            .build()
            .expect("defaults still build");
        assert_eq!(config.server.interpreter_path, "python");
    }
}
