use std::path::{Path, PathBuf};

/// What the completion engine needs from an editor buffer.
///
/// Offsets count characters, not bytes.
pub trait Buffer {
    /// Absolute path of the file backing the buffer, if it has been saved.
    fn file_name(&self) -> Option<&Path>;

    /// Text between two character offsets, clamped to the buffer.
    fn substring(&self, start: usize, end: usize) -> String;

    /// The full line containing `offset`, without its line terminator.
    fn line_containing(&self, offset: usize) -> String;
}

/// An in-memory buffer.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    file_name: Option<PathBuf>,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>, file_name: Option<PathBuf>) -> Self {
        Self { text: text.into(), file_name }
    }

    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(text, Some(path.to_path_buf())))
    }

    /// Number of characters in the buffer.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_offset(&self, offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

impl Buffer for TextBuffer {
    fn file_name(&self) -> Option<&Path> {
        self.file_name.as_deref()
    }

    fn substring(&self, start: usize, end: usize) -> String {
        if end <= start {
            return String::new();
        }
        self.text.chars().skip(start).take(end - start).collect()
    }

    fn line_containing(&self, offset: usize) -> String {
        let at = self.byte_offset(offset);
        let start = self.text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let end = self.text[at..].find('\n').map(|i| at + i).unwrap_or(self.text.len());

        self.text[start..end].trim_end_matches('\r').to_string()
    }
}
