//! Path Filter (component C1): a default-deny directory walk plus a
//! hand-rolled glob matcher.
//!
//! A general-purpose glob crate is deliberately not used here — glob
//! semantics (what `**` matches, whether `*` crosses `/`, anchoring)
//! differ subtly between libraries, and this filter's correctness is
//! load-bearing for which files get indexed at all. Patterns are compiled
//! to `regex::Regex` by hand instead.

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

use crate::domain::error::DomainError;
use crate::domain::models::Language;

/// Directories skipped unconditionally, regardless of ignore patterns.
const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "target",
    "dist",
    "build",
    "vendor",
    ".venv",
    "__pycache__",
    ".next",
    ".cache",
];

/// A compiled set of glob ignore patterns plus the default-deny policy.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatternSet {
    patterns: Vec<CompiledGlob>,
}

#[derive(Debug, Clone)]
struct CompiledGlob {
    source: String,
    regex: Regex,
    /// Pattern ended in `/`, i.e. only matches directories.
    dir_only: bool,
}

impl IgnorePatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for p in patterns {
            set.add(p.as_ref())?;
        }
        Ok(set)
    }

    pub fn add(&mut self, pattern: &str) -> Result<(), DomainError> {
        let pattern = pattern.trim();
        if pattern.is_empty() || pattern.starts_with('#') {
            return Ok(());
        }
        let dir_only = pattern.ends_with('/');
        let trimmed = pattern.trim_end_matches('/');
        let regex_src = glob_to_regex(trimmed);
        let regex = Regex::new(&regex_src)
            .map_err(|e| DomainError::config(format!("invalid ignore pattern '{pattern}': {e}")))?;
        self.patterns.push(CompiledGlob {
            source: pattern.to_string(),
            regex,
            dir_only,
        });
        Ok(())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }

    /// Whether `relative_path` (forward-slash separated, no leading `/`)
    /// is excluded by a default-deny rule or a user pattern.
    pub fn is_ignored(&self, relative_path: &str, is_dir: bool) -> bool {
        if is_default_denied(relative_path) {
            return true;
        }
        self.patterns.iter().any(|p| {
            if p.dir_only && !is_dir {
                return false;
            }
            p.regex.is_match(relative_path)
        })
    }
}

/// Component C1's extension allowlist: rule 3 of the Path Filter ("if
/// extension is not in the allowlist ⇒ exclude"). Defaults to every
/// extension `Language::all_supported()` recognizes; callers can extend
/// it (e.g. to index a language this crate has no grammar or explicit
/// tag for) without changing what language tag the classifier assigns.
#[derive(Debug, Clone)]
pub struct ExtensionAllowlist {
    extensions: HashSet<String>,
}

impl Default for ExtensionAllowlist {
    fn default() -> Self {
        let extensions = Language::all_supported()
            .iter()
            .flat_map(|lang| lang.extensions().iter().map(|ext| ext.to_string()))
            .collect();
        Self { extensions }
    }
}

impl ExtensionAllowlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for ext in extra {
            set.allow(ext.as_ref());
        }
        set
    }

    /// Adds `ext` (with or without a leading dot) to the allowlist.
    pub fn allow(&mut self, ext: &str) {
        self.extensions.insert(ext.trim_start_matches('.').to_lowercase());
    }

    /// Whether `ext` (no leading dot) is in the allowlist. A file with no
    /// extension at all is never allowed.
    pub fn is_allowed(&self, ext: &str) -> bool {
        !ext.is_empty() && self.extensions.contains(&ext.to_lowercase())
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(|s| s.as_str())
    }
}

fn is_default_denied(relative_path: &str) -> bool {
    relative_path.split('/').any(|segment| {
        segment.starts_with('.') && segment != "." && segment != ".."
            || DEFAULT_SKIP_DIRS.contains(&segment)
    })
}

/// Converts a `.gitignore`-style glob into an anchored regex source.
/// `*` matches any run of characters except `/`; `**` matches any run of
/// characters including `/`; `?` matches a single non-`/` character.
/// Patterns without a `/` match at any depth; patterns containing a `/`
/// are anchored to the root.
fn glob_to_regex(pattern: &str) -> String {
    let anchored = pattern.contains('/');
    let mut out = String::from("^");
    if !anchored {
        out.push_str("(?:.*/)?");
    }

    let chars: Vec<char> = pattern.trim_start_matches('/').chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    out.push_str(".*");
                    i += 2;
                    if i < chars.len() && chars[i] == '/' {
                        i += 1;
                    }
                } else {
                    out.push_str("[^/]*");
                    i += 1;
                }
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            c => {
                if "\\.+^$()[]{}|".contains(c) {
                    out.push('\\');
                }
                out.push(c);
                i += 1;
            }
        }
    }
    out.push('$');
    out
}

/// Determines whether `path` should be walked/indexed at all given an
/// ignore set and an extension allowlist derived from known languages.
/// Returns false (skip) for hidden entries, default-skip directories,
/// anything matched by `ignores`, and — for files — any extension not in
/// `allowed_extensions` (Path Filter rule 3).
pub fn should_visit(
    path: &Path,
    codebase_root: &Path,
    ignores: &IgnorePatternSet,
    allowed_extensions: &ExtensionAllowlist,
) -> bool {
    let relative = match path.strip_prefix(codebase_root) {
        Ok(r) => r,
        Err(_) => return false,
    };
    let relative_str = relative.to_string_lossy().replace('\\', "/");
    if relative_str.is_empty() {
        return true;
    }
    if ignores.is_ignored(&relative_str, path.is_dir()) {
        return false;
    }
    if path.is_dir() {
        return true;
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    allowed_extensions.is_allowed(ext)
}
