//! Output filename derivation.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Suffix appended to every sanitized reference.
pub const OUTPUT_SUFFIX: &str = "_unidades_recebiveis.csv";

/// Replacement for disallowed characters.
const REPLACEMENT: &str = "_";

/// Any single character outside ASCII word characters, `-`, `.` and space.
static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\-. ]").unwrap_or_else(|_| unreachable!()));

/// A reference identifier made safe for use in a filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SanitizedName(String);

impl SanitizedName {
    /// Sanitizes a raw reference identifier.
    #[must_use]
    pub fn new(reference: &str) -> Self {
        Self(sanitize(reference))
    }

    /// Returns the sanitized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when nothing is left to name the file by.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Output filename for this reference.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}{OUTPUT_SUFFIX}", self.0)
    }

    /// Output path for this reference inside `dir`.
    #[must_use]
    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replaces every character outside `[A-Za-z0-9_.\- ]` with `_`.
///
/// Total and idempotent; the character count is preserved.
#[must_use]
pub fn sanitize(reference: &str) -> String {
    DISALLOWED.replace_all(reference, REPLACEMENT).into_owned()
}
