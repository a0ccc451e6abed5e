use serde::Serialize;

/// One completion candidate for an exported name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEntry {
    /// Shown in the completion popup, e.g. `add(a, b)\tmath.js`.
    pub display_label: String,
    /// Snippet inserted on accept, e.g. `add(${1:a}, ${2:b})`.
    pub insertion_template: String,
}

impl ExportEntry {
    /// Entry for a non-callable export: inserts the bare identifier.
    pub fn value(module_name: &str, name: &str) -> Self {
        Self {
            display_label: format!("{}\t{}", name, module_name),
            insertion_template: name.to_string(),
        }
    }
}

/// Builds the entry for a callable export.
///
/// `params` holds the parameter names that survived filtering, in declaration
/// order. Each one becomes a numbered snippet placeholder pre-filled with the
/// parameter name.
pub fn format_function<S: AsRef<str>>(module_name: &str, name: &str, params: &[S]) -> ExportEntry {
    let names: Vec<&str> = params.iter().map(AsRef::as_ref).collect();

    let placeholders = names
        .iter()
        .enumerate()
        .map(|(i, param)| format!("${{{}:{}}}", i + 1, param))
        .collect::<Vec<_>>()
        .join(", ");

    ExportEntry {
        display_label: format!("{}({})\t{}", name, names.join(", "), module_name),
        insertion_template: format!("{}({})", name, placeholders),
    }
}
