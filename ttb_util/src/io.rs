use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

#[derive(Debug)]
pub struct IoErrorWithPath {
    pub error: io::Error,
    pub path: PathBuf,
}

pub trait IoErrorExt {
    fn with_path(self, path: PathBuf) -> IoErrorWithPath;
}

impl IoErrorExt for io::Error {
    fn with_path(self, path: PathBuf) -> IoErrorWithPath {
        IoErrorWithPath { error: self, path }
    }
}

impl std::fmt::Display for IoErrorWithPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (path {:?})", self.error, self.path)
    }
}

pub fn read_to_string(path: &Path) -> Result<String, IoErrorWithPath> {
    fs::read_to_string(path).map_err(|e| e.with_path(path.to_owned()))
}

/// Walk up from `start` until a directory containing `file_name` is found.
/// Returns the path of the file together with its contents.
pub fn find_in_ancestors(start: &Path, file_name: &str) -> Result<Option<(PathBuf, String)>, IoErrorWithPath> {
    for ancestor in start.ancestors() {
        let candidate = ancestor.join(file_name);
        match fs::read_to_string(&candidate) {
            Ok(s) => return Ok(Some((candidate, s))),
            Err(e) => match e.kind() {
                ErrorKind::NotFound => continue,
                _ => return Err(e.with_path(candidate)),
            },
        }
    }
    Ok(None)
}

/// Get the given 1-based line of a text file, without the trailing newline.
pub fn read_line(path: &Path, line_1: usize) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    content.lines().nth(line_1.checked_sub(1)?).map(str::to_owned)
}
