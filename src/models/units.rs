//! Nested units blob parsing.
//!
//! A units blob is a `|`-separated list of tuples, each tuple a
//! `;`-separated list of sub-fields, optionally wrapped in one pair of
//! double quotes:
//!
//! ```text
//! "CNPJ1;1;100.00|CNPJ2;2;50.00"
//! ```
//!
//! Parsing is purely syntactic. Quotes are stripped once from each end and
//! never unescaped.

use serde::Serialize;
use std::fmt;

/// Separates tuples inside a units blob.
pub const TUPLE_SEPARATOR: char = '|';

/// Separates sub-fields inside a tuple (and fields in the source table).
pub const FIELD_SEPARATOR: char = ';';

const QUOTE: char = '"';

/// Field values treated as a missing units blob.
///
/// Matches the NA markers of common tabular loaders, compared on the exact
/// field text.
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns true when `raw` encodes a missing value.
#[must_use]
pub fn is_missing_marker(raw: &str) -> bool {
    MISSING_MARKERS.contains(&raw)
}

/// Removes at most one leading and one trailing `"`.
#[must_use]
pub fn strip_outer_quotes(raw: &str) -> &str {
    let raw = raw.strip_prefix(QUOTE).unwrap_or(raw);
    raw.strip_suffix(QUOTE).unwrap_or(raw)
}

/// One group of sub-fields; becomes one output line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Tuple(Vec<String>);

impl Tuple {
    /// Creates a tuple from sub-fields.
    #[must_use]
    pub const fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    /// Splits a tuple string on `;`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.split(FIELD_SEPARATOR).map(String::from).collect())
    }

    /// Returns the sub-fields.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Sub-fields joined by `;`, without line terminator.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.0.join(&FIELD_SEPARATOR.to_string())
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

impl<S: Into<String>> FromIterator<S> for Tuple {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Ordered tuples derived from a units blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParsedUnits(Vec<Tuple>);

impl ParsedUnits {
    /// The empty sequence, produced for a missing blob.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Parses a units blob.
    ///
    /// `None` yields the empty sequence. Any present value, including the
    /// empty string, yields at least one tuple.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map_or_else(Self::empty, |raw| {
            Self(
                strip_outer_quotes(raw)
                    .split(TUPLE_SEPARATOR)
                    .map(Tuple::parse)
                    .collect(),
            )
        })
    }

    /// Returns the tuples in order.
    #[must_use]
    pub fn tuples(&self) -> &[Tuple] {
        &self.0
    }

    /// Number of tuples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates tuples in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tuple> {
        self.0.iter()
    }

    /// Re-encodes the tuples as a quoted blob that parses back to `self`.
    #[must_use]
    pub fn to_blob(&self) -> String {
        let body = self
            .0
            .iter()
            .map(Tuple::to_line)
            .collect::<Vec<_>>()
            .join(&TUPLE_SEPARATOR.to_string());
        format!("{QUOTE}{body}{QUOTE}")
    }
}

impl FromIterator<Tuple> for ParsedUnits {
    fn from_iter<I: IntoIterator<Item = Tuple>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ParsedUnits {
    type Item = &'a Tuple;
    type IntoIter = std::slice::Iter<'a, Tuple>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
