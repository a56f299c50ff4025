//! Source locations carried by parse nodes and diagnostics

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A unique identifier for a source file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileId(pub u32);

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a span
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Byte range covered by the span
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Length in bytes
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A span with associated file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileSpan {
    /// File the span belongs to
    pub file: FileId,
    /// Offsets within the file
    pub span: Span,
}

impl FileSpan {
    /// Create a file span
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }
}

impl fmt::Display for FileSpan {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "file#{}[{}..{}]",
            self.file.0, self.span.start, self.span.end
        )
    }
}

/// Display paths for the files taking part in one compilation
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    paths: FxHashMap<FileId, String>,
    next_id: u32,
}

impl SourceMap {
    /// Create an empty source map
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file path, returning its id
    ///
    /// Registering the same path twice returns the original id.
    pub fn register(&mut self, path: impl Into<String>) -> FileId {
        let path = path.into();
        if let Some((&file_id, _)) = self.paths.iter().find(|(_, known)| **known == path) {
            return file_id;
        }

        let file_id = FileId(self.next_id);
        self.next_id += 1;
        self.paths.insert(file_id, path);
        file_id
    }

    /// Path registered for a file
    pub fn path(&self, file: FileId) -> Option<&str> {
        self.paths.get(&file).map(String::as_str)
    }

    /// Render a location as `path[start..end]`
    pub fn describe(&self, location: FileSpan) -> String {
        match self.path(location.file) {
            Some(path) => format!("{path}[{}..{}]", location.span.start, location.span.end),
            None => location.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut map = SourceMap::new();
        let first = map.register("shapes.cs");
        let other = map.register("app.cs");
        let again = map.register("shapes.cs");

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(map.path(other), Some("app.cs"));
    }

    #[test]
    fn test_describe_falls_back_to_raw_span() {
        let map = SourceMap::new();
        let location = FileSpan::new(FileId(3), Span::new(4, 9));
        assert_eq!(map.describe(location), "file#3[4..9]");
        assert_eq!(location.span.len(), 5);
    }
}
