//! Text edits against a source string.

use std::collections::BTreeMap;

use platformed_syntax::Span;

/// Replace the text at `span` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub replacement: String,
    /// Line shared with other code, for removals that don't take their line.
    shared_line: Option<Span>,
}

impl Edit {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            shared_line: None,
        }
    }

    /// Delete the statement at `span`.
    ///
    /// A statement alone on its line takes the whole line with it, line
    /// break included. Otherwise only the statement and the horizontal
    /// whitespace after it go, unless [`apply_edits`] finds that removals
    /// emptied the line.
    pub fn remove_statement(source: &str, span: Span) -> Self {
        let line_start = source[..span.start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = source[span.end..]
            .find('\n')
            .map_or(source.len(), |i| span.end + i);

        let alone = source[line_start..span.start].trim().is_empty()
            && source[span.end..line_end].trim().is_empty();
        if alone {
            let end = if line_end < source.len() {
                line_end + 1
            } else {
                line_end
            };
            return Self::replace(Span::new(line_start, end), "");
        }

        let trailing = source[span.end..line_end]
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line_end - span.end);
        Self {
            shared_line: Some(Span::new(line_start, line_end)),
            ..Self::replace(Span::new(span.start, span.end + trailing), "")
        }
    }
}

/// Apply `edits` to `source`.
///
/// Edits are applied in source order. An edit overlapping an earlier one is
/// dropped.
pub fn apply_edits(source: &str, edits: Vec<Edit>) -> String {
    let mut edits = remove_emptied_lines(source, edits);
    edits.sort_by_key(|edit| (edit.span.start, edit.span.end));
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.span.start < cursor {
            continue;
        }
        out.push_str(&source[cursor..edit.span.start]);
        out.push_str(&edit.replacement);
        cursor = edit.span.end;
    }
    out.push_str(&source[cursor..]);
    out
}

/// Replace statement removals that leave their shared line blank with one
/// removal of the whole line.
fn remove_emptied_lines(source: &str, edits: Vec<Edit>) -> Vec<Edit> {
    let mut lines: BTreeMap<Span, Vec<Span>> = BTreeMap::new();
    for edit in &edits {
        if let Some(line) = edit.shared_line {
            lines.entry(line).or_default().push(edit.span);
        }
    }

    let emptied: Vec<Span> = lines
        .into_iter()
        .filter(|(line, removed)| {
            let mut removed = removed.clone();
            removed.sort();
            let mut cursor = line.start;
            for span in removed {
                if span.start > cursor && !source[cursor..span.start].trim().is_empty() {
                    return false;
                }
                cursor = cursor.max(span.end);
            }
            source[cursor.min(line.end)..line.end].trim().is_empty()
        })
        .map(|(line, _)| line)
        .collect();
    if emptied.is_empty() {
        return edits;
    }

    let mut kept: Vec<Edit> = edits
        .into_iter()
        .filter(|edit| !edit.shared_line.is_some_and(|line| emptied.contains(&line)))
        .collect();
    for line in emptied {
        let end = if line.end < source.len() {
            line.end + 1
        } else {
            line.end
        };
        kept.push(Edit::replace(Span::new(line.start, end), ""));
    }
    kept
}
