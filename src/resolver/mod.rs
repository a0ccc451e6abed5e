use std::io;
use std::path::{Component, Path, PathBuf};
use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::buffer::Buffer;

/// Local namespace alias to the absolute path of the module it imports.
pub type AliasMap = IndexMap<String, PathBuf>;

pub const DEFAULT_IMPORT_LOOKAHEAD: usize = 500;

const NAMESPACE_IMPORT: &str = r"import \* as (\w+) from '(\.\.?/.+\.js)'";

/// Finds `import * as X from './x.js'` statements at the top of a buffer.
pub struct ImportResolver {
    pattern: Regex,
    lookahead: usize,
}

impl ImportResolver {
    pub fn new(lookahead: usize) -> Self {
        Self {
            pattern: Regex::new(NAMESPACE_IMPORT).expect("namespace import pattern is valid"),
            lookahead,
        }
    }

    /// Maps every namespace alias declared in the first `lookahead`
    /// characters of the buffer to the module it points at.
    ///
    /// Relative paths are resolved against the buffer's directory. When an
    /// alias is declared twice the later import wins. An unsaved buffer has
    /// nothing to resolve against and yields an empty map.
    pub fn find_imports(&self, buffer: &dyn Buffer) -> AliasMap {
        let mut imports = AliasMap::new();

        let Some(file_name) = buffer.file_name() else {
            debug!("buffer has no file name, skipping import scan");
            return imports;
        };
        let file_dir = file_name.parent().unwrap_or(Path::new("/"));

        let head = buffer.substring(0, self.lookahead);
        for caps in self.pattern.captures_iter(&head) {
            let alias = caps[1].to_string();
            let path = normalize_path(&file_dir.join(&caps[2]));
            imports.insert(alias, path);
        }

        imports
    }
}

impl Default for ImportResolver {
    fn default() -> Self {
        Self::new(DEFAULT_IMPORT_LOOKAHEAD)
    }
}

/// Anchors a relative path at the current directory and normalizes it.
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    Ok(normalize_path(&std::env::current_dir()?.join(path)))
}

/// Removes `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if matches!(components.last(), Some(Component::Normal(_))) {
                    components.pop();
                }
            }
            Component::CurDir => {}
            c => components.push(c),
        }
    }
    components.iter().collect()
}
