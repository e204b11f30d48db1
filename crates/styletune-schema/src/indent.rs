//! Indentation detection and normalization for schema block text.
//!
//! The structural parser is indentation-sensitive, and author tooling mixes
//! tabs and spaces inconsistently inside CSS comments. Before parsing, every
//! tab is rewritten to the block's detected space unit (four spaces when the
//! block indents with tabs or detection is inconclusive).

/// The indentation character a block uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentKind {
    Tab,
    Space,
}

/// The detected indentation convention of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedIndent {
    pub kind: IndentKind,
    /// Unit width. Always 1 for tabs; the step size for spaces.
    pub amount: usize,
}

impl DetectedIndent {
    /// The string one indentation level expands to.
    pub fn unit(&self) -> String {
        match self.kind {
            IndentKind::Tab => "\t".to_string(),
            IndentKind::Space => " ".repeat(self.amount),
        }
    }
}

/// Detects the indentation convention of a text by majority vote between
/// tab-led and space-led lines. For spaces, the unit is the most frequent
/// nonzero difference between consecutive lines' leading widths, ties
/// broken toward the smaller unit. Returns `None` when no line is indented.
pub fn detect_indent(text: &str) -> Option<DetectedIndent> {
    let mut tab_lines = 0usize;
    let mut space_lines = 0usize;
    let mut diff_counts: std::collections::BTreeMap<usize, usize> = Default::default();
    let mut previous_width = 0usize;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match line.chars().next() {
            Some('\t') => tab_lines += 1,
            Some(' ') => space_lines += 1,
            _ => {}
        }
        let width = line.len() - line.trim_start_matches(' ').len();
        let diff = width.abs_diff(previous_width);
        if diff > 0 {
            *diff_counts.entry(diff).or_insert(0) += 1;
        }
        previous_width = width;
    }

    if tab_lines == 0 && space_lines == 0 {
        return None;
    }

    if tab_lines >= space_lines {
        return Some(DetectedIndent {
            kind: IndentKind::Tab,
            amount: 1,
        });
    }

    // BTreeMap iteration is ascending by key, so `>` keeps the smaller
    // unit on a tied count.
    let mut best = (0usize, 0usize);
    for (diff, count) in diff_counts {
        if count > best.1 {
            best = (diff, count);
        }
    }

    Some(DetectedIndent {
        kind: IndentKind::Space,
        amount: if best.0 > 0 { best.0 } else { 4 },
    })
}

/// Rewrites every tab character to the detected space unit. When the block
/// indents with tabs or detection is inconclusive, a tab becomes four
/// spaces.
pub fn normalize_indentation(text: &str) -> String {
    let unit = match detect_indent(text) {
        Some(indent @ DetectedIndent {
            kind: IndentKind::Space,
            ..
        }) => indent.unit(),
        _ => "    ".to_string(),
    };
    text.replace('\t', &unit)
}
