//! Recursive decomposition of rendered statement rows.
//!
//! An expanded row on a rendered statement page reads back as one block of
//! newline-separated text: the row label, its values, then the label and
//! values of every indented sub-item sharing the same visual row.
//!
//! ```text
//! Total Revenue
//! 260,174,000
//! 265,595,000
//! Operating Revenue
//! 260,174,000
//! 265,595,000
//! ```
//!
//! [`decompose_row`] turns such a block into flat [`LeafRecord`]s. Only two
//! shapes are accepted after the leading label: the parent's own run of
//! values, optionally followed by child groups, or child groups alone. A child
//! group is exactly one label followed by one value per column. Anything else
//! is a [`DataError::MalformedRow`].
//!
//! A parent label with child groups but no values of its own yields no leaf.
//! It survives only as the [`LeafRecord::group`] of its children.

use fundamentals_core::{DataError, Result};

/// One fully decomposed line item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafRecord {
    /// Line-item label.
    pub label: String,
    /// First label of the row this leaf came from. For a parent without
    /// values of its own this is the only place its label is kept.
    pub group: String,
    /// Raw value cells, one per value column.
    pub values: Vec<String>,
}

/// A single non-blank piece of a rendered row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A text line.
    Label(String),
    /// A numeric-looking cell.
    Value(String),
}

impl Token {
    const fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// Splits rendered row text into tokens.
///
/// A line whose whitespace-separated pieces all look numeric yields one value
/// per piece; any other non-blank line is a single label.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let pieces: Vec<&str> = line.split_whitespace().collect();
        if pieces.iter().all(|piece| is_value_token(piece)) {
            tokens.extend(pieces.into_iter().map(|piece| Token::Value(piece.to_string())));
        } else {
            tokens.push(Token::Label(line.to_string()));
        }
    }
    tokens
}

/// Returns true for `-` and for digits with `,`/`.` separators, an optional
/// leading `-` and an optional `B`, `M`, `K`, `T` or `%` suffix.
#[must_use]
pub fn is_value_token(piece: &str) -> bool {
    if piece == "-" {
        return true;
    }
    let body = piece.strip_prefix('-').unwrap_or(piece);
    let body = body
        .strip_suffix(['B', 'M', 'K', 'T', '%'])
        .unwrap_or(body);

    body.bytes().any(|b| b.is_ascii_digit())
        && body.bytes().all(|b| b.is_ascii_digit() || b == b',' || b == b'.')
}

/// Decomposes one rendered row into leaf records.
///
/// `value_columns` is the number of value columns announced by the header.
pub fn decompose_row(text: &str, value_columns: usize) -> Result<Vec<LeafRecord>> {
    let tokens = tokenize(text);

    let Some((Token::Label(group), rest)) = tokens.split_first() else {
        let reason = if tokens.is_empty() {
            "row is empty"
        } else {
            "row does not start with a label"
        };
        return Err(malformed(&preview(text), reason));
    };
    if value_columns == 0 {
        return Err(malformed(group, "header announces no value columns"));
    }

    decompose_group(group, rest, value_columns)
}

/// Decomposes the tokens following a row's leading label.
fn decompose_group(group: &str, rest: &[Token], n: usize) -> Result<Vec<LeafRecord>> {
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let own = rest.iter().take_while(|token| token.is_value()).count();
    if own == 0 {
        return decompose_chunks(group, rest, n);
    }
    if own != n {
        return Err(malformed(
            group,
            &format!("expected {n} values, found a run of {own}"),
        ));
    }

    let (values, children) = rest.split_at(n);
    let mut leaves = vec![leaf(group, group, values)];
    leaves.extend(decompose_chunks(group, children, n)?);
    Ok(leaves)
}

/// Partitions child tokens into label plus `n` value chunks.
fn decompose_chunks(group: &str, tokens: &[Token], n: usize) -> Result<Vec<LeafRecord>> {
    let width = n + 1;
    if tokens.len() % width != 0 {
        return Err(malformed(
            group,
            &format!(
                "{} tokens do not split into groups of one label and {n} values",
                tokens.len()
            ),
        ));
    }

    tokens
        .chunks(width)
        .map(|chunk| match chunk.split_first() {
            Some((Token::Label(label), values)) if values.iter().all(Token::is_value) => {
                Ok(leaf(label, group, values))
            }
            _ => Err(malformed(
                group,
                "child group is not one label followed by values",
            )),
        })
        .collect()
}

fn leaf(label: &str, group: &str, values: &[Token]) -> LeafRecord {
    LeafRecord {
        label: label.to_string(),
        group: group.to_string(),
        values: values
            .iter()
            .filter_map(|token| match token {
                Token::Value(v) => Some(v.clone()),
                Token::Label(_) => None,
            })
            .collect(),
    }
}

fn malformed(label: &str, reason: &str) -> DataError {
    DataError::MalformedRow {
        label: label.to_string(),
        reason: reason.to_string(),
    }
}

fn preview(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}
