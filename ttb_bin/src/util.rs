use path_clean::PathClean;
use std::path::PathBuf;
use ttb_core::diagnostic::{DiagResult, Diagnostic};
use ttb_util::constants::TTB_CONFIG_FILE_NAME;
use ttb_util::io::{find_in_ancestors, read_to_string};

pub struct FoundConfig {
    pub path: PathBuf,
    pub source: String,
}

/// Read the config file at `config_path`, or if none is given, look for one in the working directory
/// and its ancestors. Not finding a config file in the latter case is fine.
pub fn find_and_read_config(config_path: Option<PathBuf>) -> DiagResult<Option<FoundConfig>> {
    let cwd = std::env::current_dir().map_err(|e| {
        Diagnostic::new_input("failed to get current working directory")
            .note(e.to_string())
            .finish()
    })?;

    match config_path {
        Some(config_path) => {
            let path = cwd.join(config_path).clean();
            let source = read_to_string(&path)
                .map_err(|e| Diagnostic::new_input("failed to read config file").note(e.to_string()).finish())?;
            Ok(Some(FoundConfig { path, source }))
        }
        None => match find_in_ancestors(&cwd, TTB_CONFIG_FILE_NAME) {
            Ok(found) => Ok(found.map(|(path, source)| FoundConfig { path, source })),
            Err(e) => Err(Diagnostic::new_input("failed to read config file").note(e.to_string()).finish()),
        },
    }
}
