//! Placeholder rendering for payload templates.
//!
//! Payload templates use `${name}` placeholders.
//!
//! # Syntax
//!
//! - `${variable_name}` - replaced with variable value
//! - `$${escaped}` - produces literal `${escaped}` in output
//! - a `$` not followed by `{` is literal, so shell text such as `$(seq 1 5)`
//!   or `$i` passes through untouched
//!
//! # Example
//!
//! ```
//! use kiosk_setup::config::{render, TemplateVars};
//!
//! let mut vars = TemplateVars::new();
//! vars.insert("user".to_string(), "pi".to_string());
//! assert_eq!(render("user = \"${user}\"", &vars).unwrap(), "user = \"pi\"");
//! ```

use crate::error::Result;
use std::collections::BTreeMap;

/// Values available to a template.
pub type TemplateVars = BTreeMap<String, String>;

/// A segment of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text
    Literal(String),
    /// Variable reference: ${name}
    Variable(String),
}

/// Parse a string containing `${var}` placeholders.
pub fn parse_interpolation(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut chars = input.chars().peekable();
    let mut current_literal = String::new();

    while let Some(c) = chars.next() {
        if c != '$' {
            current_literal.push(c);
            continue;
        }

        match chars.peek() {
            Some('$') => {
                chars.next();
                current_literal.push('$');
            }
            Some('{') => {
                chars.next();

                if !current_literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut current_literal)));
                }

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                segments.push(Segment::Variable(var_name.trim().to_string()));
            }
            _ => current_literal.push(c),
        }
    }

    if !current_literal.is_empty() {
        segments.push(Segment::Literal(current_literal));
    }

    segments
}

/// Render a template, substituting every placeholder.
///
/// # Errors
///
/// Returns an error naming the first placeholder without a value.
pub fn render(template: &str, vars: &TemplateVars) -> Result<String> {
    let mut result = String::with_capacity(template.len());

    for segment in parse_interpolation(template) {
        match segment {
            Segment::Literal(text) => result.push_str(&text),
            Segment::Variable(name) => match vars.get(&name) {
                Some(value) => result.push_str(value),
                None => {
                    return Err(anyhow::anyhow!("template placeholder '${{{}}}' has no value", name).into())
                }
            },
        }
    }

    Ok(result)
}
