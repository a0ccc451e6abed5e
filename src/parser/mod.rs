mod export_walker;

pub use export_walker::{extract_exports, ModuleExportMap};

use std::path::Path;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse {module}: {message}")]
    SyntaxError { module: String, message: String },
    #[error("Unsupported export in {module}: {detail}")]
    UnsupportedExport { module: String, detail: String },
}

/// Parses `source` as an ES module and collects its named exports.
///
/// Any parser diagnostic fails the whole module, even when oxc managed to
/// recover a partial program.
pub fn parse_module_exports(source: &str, module_name: &str) -> Result<ModuleExportMap, ParseError> {
    let allocator = Allocator::default();
    let parser = Parser::new(&allocator, source, SourceType::mjs());
    let result = parser.parse();

    if result.panicked || !result.errors.is_empty() {
        return Err(ParseError::SyntaxError {
            module: module_name.to_string(),
            message: result.errors.iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    extract_exports(&result.program, module_name)
}

pub fn parse_file(path: &Path) -> Result<ModuleExportMap, ParseError> {
    let source_text = std::fs::read_to_string(path)?;
    parse_module_exports(&source_text, &module_display_name(path))
}

/// The file's base name, used as the annotation in completion labels.
pub fn module_display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
