//! Block-tag extraction from Javadoc comments.

use crate::{Error, Result};

/// One block tag: `@param name some text` is `{ name: "param", values: ["name", "some", "text"] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub values: Vec<String>,
}

/// Split a raw Javadoc comment into its block tags, in source order.
///
/// Fails when an inline tag (`{@...`) is never closed.
pub fn tags(raw: &str) -> Result<Vec<Tag>> {
    check_inline_tags(raw)?;

    let body = raw
        .trim()
        .trim_start_matches("/**")
        .trim_start_matches("/*")
        .trim_end_matches("*/");

    let mut tags: Vec<Tag> = Vec::new();
    for line in body.lines() {
        let line = line.trim().trim_start_matches('*').trim();
        if let Some(rest) = line.strip_prefix('@') {
            let mut tokens = rest.split_whitespace().map(str::to_string);
            let Some(name) = tokens.next() else {
                continue;
            };
            tags.push(Tag {
                name,
                values: tokens.collect(),
            });
        } else if let Some(current) = tags.last_mut() {
            current
                .values
                .extend(line.split_whitespace().map(str::to_string));
        }
    }
    Ok(tags)
}

/// Description of `parameter` from its `@param` tag.
///
/// The first `@param` naming the parameter and carrying at least one more
/// token wins. A tag with only the name documents nothing.
pub fn describe(raw: &str, parameter: &str) -> Result<Option<String>> {
    Ok(tags(raw)?
        .into_iter()
        .filter(|tag| tag.name == "param")
        .find(|tag| tag.values.len() > 1 && tag.values[0] == parameter)
        .map(|tag| tag.values[1..].join(" ")))
}

fn check_inline_tags(raw: &str) -> Result<()> {
    let mut open = 0usize;
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'@') => open += 1,
            '}' if open > 0 => open -= 1,
            _ => {}
        }
    }
    if open > 0 {
        return Err(Error::MalformedJavadoc(format!(
            "{} unterminated inline tag(s) in comment",
            open
        )));
    }
    Ok(())
}
