// This file is part of the uutils procps package.
//
// For the full copyright and license information, please view the LICENSE
// file that was distributed with this source code.

// Name matching shared by every name-based lookup

use crate::record::strip_executable_suffix;

/// Knobs for name based lookups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSettings {
    /// Compare names exactly instead of case-insensitively.
    pub case_sensitive: bool,
}

/// Exact process-name matcher.
///
/// The query is normalized once with the same suffix rule applied to record
/// names, so `foo` and `foo.exe` select the same processes where executables
/// carry that suffix. Substrings never match.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    needle: String,
    suffix: Option<&'static str>,
    case_sensitive: bool,
}

impl NameMatcher {
    pub fn new(query: &str, suffix: Option<&'static str>, settings: MatchSettings) -> Self {
        let stripped = strip_executable_suffix(query, suffix);
        let needle = if settings.case_sensitive {
            stripped.to_string()
        } else {
            stripped.to_lowercase()
        };

        Self {
            needle,
            suffix,
            case_sensitive: settings.case_sensitive,
        }
    }

    /// Match a record name, which is already normalized.
    pub fn matches(&self, name: &str) -> bool {
        if self.case_sensitive {
            name == self.needle
        } else {
            name.to_lowercase() == self.needle
        }
    }

    /// Match a raw platform name that has not been through normalization yet.
    pub fn matches_raw(&self, raw_name: &str) -> bool {
        self.matches(strip_executable_suffix(raw_name, self.suffix))
    }
}
