//! Line classification for unified diff output.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    /// `+++` / `---` file headers.
    Header,
    Added,
    Removed,
    Hunk,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub text: String,
}

pub fn classify_line(line: &str) -> DiffLineKind {
    if line.starts_with("+++") || line.starts_with("---") {
        DiffLineKind::Header
    } else if line.starts_with('+') {
        DiffLineKind::Added
    } else if line.starts_with('-') {
        DiffLineKind::Removed
    } else if line.starts_with("@@") {
        DiffLineKind::Hunk
    } else {
        DiffLineKind::Context
    }
}

pub fn classify_diff(text: &str) -> Vec<DiffLine> {
    text.lines()
        .map(|line| DiffLine {
            kind: classify_line(line),
            text: line.to_string(),
        })
        .collect()
}
