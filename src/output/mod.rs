use crate::completion::CompletionEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    List,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "list" => Ok(OutputFormat::List),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format(entries: &[CompletionEntry], format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => Self::format_json(entries),
            OutputFormat::List => Self::format_list(entries),
        }
    }

    /// `[[label, insertion], ...]`, the shape editors take completion lists in.
    pub fn format_json(entries: &[CompletionEntry]) -> String {
        serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn format_list(entries: &[CompletionEntry]) -> String {
        entries
            .iter()
            .map(|e| format!("{}\t{}", e.label, e.insertion))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
