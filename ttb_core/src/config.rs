use crate::diagnostic::{DiagResult, Diagnostic};
use crate::graph::filter::GraphFilter;
use crate::track::TrackSettings;
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Contents of a `ttb.toml` file. Every field is optional, command line flags take precedence.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Path of the DOT file to write.
    pub output: Option<PathBuf>,
    /// Basename of the clock signal.
    pub clock: Option<String>,
    pub ignore_constants: bool,
    /// File listing signals to leave out of the output, one full name per line.
    pub ignore_file: Option<PathBuf>,
    /// Signals to leave out of the output, in addition to the ignore file.
    pub ignore: Vec<String>,
}

impl Config {
    pub fn from_toml(src: &str) -> Result<Config, toml::de::Error> {
        // `preserve_order` keeps the inline ignore list in file order
        toml::from_str(src)
    }

    /// Parse the config file at `path`, relative paths in it are resolved against its directory.
    pub fn from_file(path: &Path, src: &str) -> DiagResult<Config> {
        let mut config = Config::from_toml(src).map_err(|e| {
            Diagnostic::new_input(format!("failed to parse config file {path:?}"))
                .note(e.message().to_owned())
                .finish()
        })?;
        if let Some(parent) = path.parent() {
            config.resolve_paths(parent);
        }
        Ok(config)
    }

    pub fn resolve_paths(&mut self, parent: &Path) {
        let Config {
            output,
            clock: _,
            ignore_constants: _,
            ignore_file,
            ignore: _,
        } = self;
        for path in [output, ignore_file].into_iter().flatten() {
            *path = parent.join(&*path).clean();
        }
    }

    pub fn track_settings(&self) -> TrackSettings {
        TrackSettings {
            clock: self.clock.clone(),
        }
    }

    /// Build the output filter, reading the ignore file if there is one.
    pub fn graph_filter(&self) -> DiagResult<GraphFilter> {
        let mut filter = GraphFilter {
            ignore_constants: self.ignore_constants,
            ignore_names: self.ignore.iter().cloned().collect(),
        };
        if let Some(ignore_file) = &self.ignore_file {
            let src = ttb_util::io::read_to_string(ignore_file)
                .map_err(|e| Diagnostic::new_input("failed to read ignore file").note(e.to_string()).finish())?;
            filter.ignore_names.extend(GraphFilter::parse_ignore_list(&src));
        }
        Ok(filter)
    }
}
