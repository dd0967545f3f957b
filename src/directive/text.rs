//! Pure text edits used by directive strategies.
//!
//! Every function here takes the current file contents and returns new
//! contents; nothing touches the filesystem. A "unit" is either a
//! whitespace-separated token or a line (without its terminator).

use std::ops::Range;

use regex::Regex;

use super::model::Layout;

/// Byte ranges of every unit in `contents`.
pub fn unit_spans(contents: &str, layout: Layout) -> Vec<Range<usize>> {
    match layout {
        Layout::Tokens => token_spans(contents),
        Layout::Lines => line_spans(contents),
    }
}

fn token_spans(contents: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in contents.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push(s..i);
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(s..contents.len());
    }
    spans
}

fn line_spans(contents: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut offset = 0;
    for raw in contents.split_inclusive('\n') {
        let body = raw.trim_end_matches('\n').trim_end_matches('\r');
        spans.push(offset..offset + body.len());
        offset += raw.len();
    }
    spans
}

/// Units of `contents`, borrowed.
pub fn units(contents: &str, layout: Layout) -> Vec<&str> {
    unit_spans(contents, layout)
        .into_iter()
        .map(|r| &contents[r])
        .collect()
}

/// Append a unit (or a multi-line block in [`Layout::Lines`]).
///
/// Tokens join the end of the first line with a single space. Lines are
/// separated from existing content by exactly one newline; nothing is added
/// after the payload, so appending to an empty file yields the payload alone.
pub fn append_unit(contents: &str, payload: &str, layout: Layout) -> String {
    match layout {
        Layout::Tokens => {
            let end = contents.find('\n').unwrap_or(contents.len());
            let (first, rest) = contents.split_at(end);
            let first = first.trim_end();
            if first.is_empty() {
                format!("{}{}", payload, rest)
            } else {
                format!("{} {}{}", first, payload, rest)
            }
        }
        Layout::Lines => {
            if contents.is_empty() {
                payload.to_string()
            } else if contents.ends_with('\n') {
                format!("{}{}", contents, payload)
            } else {
                format!("{}\n{}", contents, payload)
            }
        }
    }
}

/// Replace every unit matching `pattern` that differs from `replacement`.
///
/// Returns the new contents and the number of units rewritten. Content
/// outside the matching units is preserved byte for byte.
pub fn replace_matching(
    contents: &str,
    pattern: &Regex,
    replacement: &str,
    layout: Layout,
) -> (String, usize) {
    let mut result = String::with_capacity(contents.len() + replacement.len());
    let mut cursor = 0;
    let mut rewritten = 0;

    for span in unit_spans(contents, layout) {
        let unit = &contents[span.clone()];
        if pattern.is_match(unit) && unit != replacement {
            result.push_str(&contents[cursor..span.start]);
            result.push_str(replacement);
            cursor = span.end;
            rewritten += 1;
        }
    }
    result.push_str(&contents[cursor..]);

    (result, rewritten)
}

/// Insert `fragment` immediately before the first occurrence of `anchor`.
///
/// When the anchor starts its own line (only indentation before it), the
/// fragment is inserted as whole lines above it. Returns `None` when the
/// anchor is absent.
pub fn insert_before_anchor(contents: &str, anchor: &str, fragment: &str) -> Option<String> {
    let pos = contents.find(anchor)?;
    let line_start = contents[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);

    let mut result = String::with_capacity(contents.len() + fragment.len() + 1);
    if contents[line_start..pos].trim().is_empty() {
        result.push_str(&contents[..line_start]);
        result.push_str(fragment);
        if !fragment.ends_with('\n') {
            result.push('\n');
        }
        result.push_str(&contents[line_start..]);
    } else {
        result.push_str(&contents[..pos]);
        result.push_str(fragment);
        result.push_str(&contents[pos..]);
    }
    Some(result)
}
