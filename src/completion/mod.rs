//! Turning cursor positions into completion entries.
//!
//! [`CompletionSession`] is the request boundary. It owns the module cache for
//! as long as the editor session lasts and never lets an error escape to the
//! host: failures are logged and reported as "no completions".

use regex::Regex;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::buffer::Buffer;
use crate::cache::{CacheError, ModuleCache};
use crate::config::Config;
use crate::resolver::{AliasMap, ImportResolver};
use crate::signature::ExportEntry;

const CURSOR_TOKEN: &str = r"(\w+)\.?(\w*)$";

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// A single suggestion handed back to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub label: String,
    pub insertion: String,
}

impl CompletionEntry {
    /// Suggests the alias itself when the typed word is only part of one.
    pub fn module(alias: &str) -> Self {
        Self {
            label: format!("{}.js\tmodule", alias),
            insertion: alias.to_string(),
        }
    }
}

impl From<&ExportEntry> for CompletionEntry {
    fn from(entry: &ExportEntry) -> Self {
        Self {
            label: entry.display_label.clone(),
            insertion: entry.insertion_template.clone(),
        }
    }
}

impl Serialize for CompletionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.label)?;
        pair.serialize_element(&self.insertion)?;
        pair.end()
    }
}

/// The `alias.prefix` word at the end of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorToken {
    pub module_alias: String,
    pub export_prefix: String,
}

/// Builds completion lists from buffer text, imports and module exports.
pub struct CompletionAssembler {
    resolver: ImportResolver,
    token: Regex,
}

impl CompletionAssembler {
    pub fn new(resolver: ImportResolver) -> Self {
        Self {
            resolver,
            token: Regex::new(CURSOR_TOKEN).expect("cursor token pattern is valid"),
        }
    }

    /// Reads the token at the end of `line`, if there is one.
    pub fn cursor_token(&self, line: &str) -> Option<CursorToken> {
        let caps = self.token.captures(line)?;
        if caps[0].is_empty() {
            return None;
        }
        Some(CursorToken {
            module_alias: caps[1].to_string(),
            export_prefix: caps[2].to_string(),
        })
    }

    /// Completions for every location, concatenated in location order.
    pub fn completions(
        &self,
        buffer: &dyn Buffer,
        locations: &[usize],
        cache: &mut ModuleCache,
    ) -> Result<Vec<CompletionEntry>, CompletionError> {
        let imports = self.resolver.find_imports(buffer);
        let mut completions = Vec::new();

        for &location in locations {
            let line = buffer.line_containing(location);
            let Some(token) = self.cursor_token(&line) else {
                continue;
            };
            completions.extend(complete_token(&token, &imports, cache)?);
        }

        Ok(completions)
    }
}

fn complete_token(
    token: &CursorToken,
    imports: &AliasMap,
    cache: &mut ModuleCache,
) -> Result<Vec<CompletionEntry>, CompletionError> {
    let Some(path) = imports.get(&token.module_alias) else {
        return Ok(imports
            .keys()
            .filter(|alias| alias.starts_with(&token.module_alias))
            .map(|alias| CompletionEntry::module(alias))
            .collect());
    };

    let exports = cache.exports(path)?;
    Ok(exports
        .iter()
        .filter(|(name, _)| name.starts_with(&token.export_prefix))
        .map(|(_, entry)| CompletionEntry::from(entry))
        .collect())
}

/// One editor session: configuration plus the module cache it keeps alive.
pub struct CompletionSession {
    config: Config,
    assembler: CompletionAssembler,
    cache: ModuleCache,
}

impl CompletionSession {
    pub fn new(config: Config) -> Self {
        let assembler = CompletionAssembler::new(ImportResolver::new(config.import_lookahead));
        Self { config, assembler, cache: ModuleCache::new() }
    }

    /// Completions for a JavaScript buffer, with errors returned to the caller.
    pub fn completions(
        &mut self,
        buffer: &dyn Buffer,
        locations: &[usize],
    ) -> Result<Vec<CompletionEntry>, CompletionError> {
        self.assembler.completions(buffer, locations, &mut self.cache)
    }

    /// Entry point for the editor.
    ///
    /// Returns `None` for buffers that are not JavaScript source, for unsaved
    /// buffers and for requests that failed. The last two are written to the log.
    pub fn query_completions(
        &mut self,
        buffer: &dyn Buffer,
        locations: &[usize],
    ) -> Option<Vec<CompletionEntry>> {
        let Some(file_name) = buffer.file_name() else {
            warn!("buffer has no file name, imports cannot be resolved");
            return None;
        };
        if !self.config.is_javascript_source(Some(file_name)) {
            debug!("buffer is not JavaScript source");
            return None;
        }

        match self.completions(buffer, locations) {
            Ok(completions) => Some(completions),
            Err(e) => {
                error!(error = %e, "completion request failed");
                None
            }
        }
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn labels(entries: &[CompletionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.label.as_str()).collect()
    }

    fn app_buffer(dir: &Path, body: &str) -> TextBuffer {
        let text = format!("import * as lib from './lib.js';\n{}", body);
        TextBuffer::new(text, Some(dir.join("app.js")))
    }

    fn end_of(buffer: &TextBuffer) -> usize {
        buffer.len()
    }

    #[test]
    fn test_cursor_token() {
        let assembler = CompletionAssembler::new(ImportResolver::default());

        let token = assembler.cursor_token("  const x = math.ad").unwrap();
        assert_eq!(token.module_alias, "math");
        assert_eq!(token.export_prefix, "ad");

        let token = assembler.cursor_token("math.").unwrap();
        assert_eq!(token.module_alias, "math");
        assert_eq!(token.export_prefix, "");

        let token = assembler.cursor_token("foo(bar").unwrap();
        assert_eq!(token.module_alias, "bar");

        assert!(assembler.cursor_token("call(").is_none());
        assert!(assembler.cursor_token("").is_none());
    }

    #[test]
    fn test_prefix_filtering_keeps_export_order() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("lib.js"),
            "export const foo = 1;\nexport const bar = 2;\nexport function foobar(x) {}\n",
        ).unwrap();

        let buffer = app_buffer(temp.path(), "lib.foo");
        let mut session = CompletionSession::new(Config::default());
        let entries = session.query_completions(&buffer, &[end_of(&buffer)]).unwrap();

        assert_eq!(labels(&entries), ["foo\tlib.js", "foobar(x)\tlib.js"]);
        assert_eq!(entries[1].insertion, "foobar(${1:x})");
    }

    #[test]
    fn test_empty_prefix_lists_all_exports() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lib.js"), "export const a = 1;\nexport const b = 2;\n").unwrap();

        let buffer = app_buffer(temp.path(), "lib.");
        let mut session = CompletionSession::new(Config::default());
        let entries = session.query_completions(&buffer, &[end_of(&buffer)]).unwrap();
        assert_eq!(labels(&entries), ["a\tlib.js", "b\tlib.js"]);
    }

    #[test]
    fn test_partial_alias_suggests_modules() {
        let temp = TempDir::new().unwrap();
        let text = "import * as import from './import.js';\nimport * as other from './other.js';\nimp";
        let buffer = TextBuffer::new(text, Some(temp.path().join("app.js")));

        let mut session = CompletionSession::new(Config::default());
        let entries = session.query_completions(&buffer, &[buffer.len()]).unwrap();

        assert_eq!(entries, vec![CompletionEntry::module("import")]);
        assert_eq!(entries[0].label, "import.js\tmodule");
        assert_eq!(entries[0].insertion, "import");
        assert_eq!(session.cache().parse_count(), 0);
    }

    #[test]
    fn test_missing_module_yields_no_entries() {
        let temp = TempDir::new().unwrap();
        let buffer = app_buffer(temp.path(), "lib.");

        let mut session = CompletionSession::new(Config::default());
        let entries = session.query_completions(&buffer, &[end_of(&buffer)]).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_parse_error_becomes_none() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lib.js"), "export function (").unwrap();

        let buffer = app_buffer(temp.path(), "lib.");
        let mut session = CompletionSession::new(Config::default());
        assert!(session.completions(&buffer, &[end_of(&buffer)]).is_err());
        assert!(session.query_completions(&buffer, &[end_of(&buffer)]).is_none());
    }

    #[test]
    fn test_non_javascript_buffer_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lib.js"), "export const a = 1;\n").unwrap();
        let text = "import * as lib from './lib.js';\nlib.";
        let buffer = TextBuffer::new(text, Some(temp.path().join("notes.md")));

        let mut session = CompletionSession::new(Config::default());
        assert!(session.query_completions(&buffer, &[buffer.len()]).is_none());
        assert_eq!(session.completions(&buffer, &[buffer.len()]).unwrap().len(), 1);
    }

    #[test]
    fn test_multiple_locations_concatenate() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("lib.js"), "export const alpha = 1;\nexport const beta = 2;\n").unwrap();

        let buffer = app_buffer(temp.path(), "lib.al\nlib.be");
        let first_line_end = "import * as lib from './lib.js';\nlib.al".chars().count();
        let mut session = CompletionSession::new(Config::default());
        let entries = session
            .query_completions(&buffer, &[buffer.len(), first_line_end])
            .unwrap();

        assert_eq!(labels(&entries), ["beta\tlib.js", "alpha\tlib.js"]);
        assert_eq!(session.cache().parse_count(), 1);
    }

    #[test]
    fn test_entry_serializes_as_pair() {
        let json = serde_json::to_string(&CompletionEntry::module("ui")).unwrap();
        assert_eq!(json, r#"["ui.js\tmodule","ui"]"#);
    }
}
