//! License headers
//!
//! Prepends the project license to every source file that does not carry it
//! yet, skipping whatever the ignore file (gitignore syntax) excludes.
//!
//! ## Example Config
//!
//! ```yaml
//! license_file: LICENSE
//! directory: .
//! ignore_file: .gitignore
//! extensions: [py]
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// License header configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// File holding the license text
    #[serde(default = "default_license_file")]
    pub license_file: PathBuf,

    /// Directory to walk
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Ignore file in gitignore syntax; patterns are relative to `directory`
    #[serde(default = "default_ignore_file")]
    pub ignore_file: Option<PathBuf>,

    /// File extensions to license, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_license_file() -> PathBuf {
    PathBuf::from("LICENSE")
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_ignore_file() -> Option<PathBuf> {
    Some(PathBuf::from(".gitignore"))
}

fn default_extensions() -> Vec<String> {
    vec!["py".to_string()]
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            license_file: default_license_file(),
            directory: default_directory(),
            ignore_file: default_ignore_file(),
            extensions: default_extensions(),
        }
    }
}

impl LicenseConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Whether a path has one of the configured extensions
    fn wants(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|e| e.trim_start_matches('.') == ext)
    }
}

/// How a header is written into a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `"""license"""` followed by a blank line
    Docstring,
    /// `// ` before every line
    DoubleSlash,
    /// `# ` before every line
    Hash,
}

impl CommentStyle {
    pub fn for_extension(ext: &str) -> Self {
        match ext {
            "py" | "pyi" => CommentStyle::Docstring,
            "rs" | "c" | "h" | "cc" | "cpp" | "hpp" | "cs" | "java" | "kt" | "go" | "js"
            | "jsx" | "ts" | "tsx" | "swift" | "scala" | "dart" => CommentStyle::DoubleSlash,
            _ => CommentStyle::Hash,
        }
    }

    /// Render the license as a header block, blank line included
    pub fn render(self, license: &str) -> String {
        match self {
            CommentStyle::Docstring => format!("\"\"\"{}\"\"\"\n\n", license),
            CommentStyle::DoubleSlash => prefix_lines(license, "//"),
            CommentStyle::Hash => prefix_lines(license, "#"),
        }
    }
}

fn prefix_lines(text: &str, marker: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if line.is_empty() {
            out.push_str(marker);
        } else {
            out.push_str(&format!("{} {}", marker, line));
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// What a license run touched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LicenseReport {
    /// Files that received a header
    pub updated: Vec<PathBuf>,
    /// Files that already carried the license
    pub already_licensed: Vec<PathBuf>,
    /// Matching files skipped by the ignore rules
    pub ignored: Vec<PathBuf>,
}

impl LicenseReport {
    pub fn to_report(&self) -> String {
        let mut out = format!(
            "License headers: {} added, {} already present, {} ignored\n",
            self.updated.len(),
            self.already_licensed.len(),
            self.ignored.len()
        );
        for path in &self.updated {
            out.push_str(&format!("  + {}\n", path.display()));
        }
        out
    }
}

/// Add the license header to every matching file that lacks it
pub fn add_license_header(config: &LicenseConfig) -> Result<LicenseReport> {
    let license = fs::read_to_string(&config.license_file)?;
    let rules = match &config.ignore_file {
        Some(path) if path.exists() => IgnoreRules::from_file(path)?,
        Some(path) => {
            tracing::warn!(path = %path.display(), "ignore file not found, nothing is ignored");
            IgnoreRules::default()
        }
        None => IgnoreRules::default(),
    };

    let mut report = LicenseReport::default();
    let root = config.directory.as_path();
    let mut walker = WalkDir::new(root).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| Error::Other(format!("Failed to walk directory: {}", e)))?;
        let path = entry.path();
        let relative = relative_path(root, path);
        if relative.is_empty() {
            continue;
        }

        let is_dir = entry.file_type().is_dir();
        if is_dir {
            if rules.is_ignored(&relative, true) {
                walker.skip_current_dir();
            }
            continue;
        }
        if !entry.file_type().is_file() || !config.wants(path) {
            continue;
        }
        if rules.is_ignored(&relative, false) {
            report.ignored.push(path.to_path_buf());
            continue;
        }

        let content = fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let header = CommentStyle::for_extension(ext).render(&license);
        if content.contains(license.as_str()) || content.starts_with(&header) {
            report.already_licensed.push(path.to_path_buf());
            continue;
        }

        fs::write(path, format!("{}{}", header, content))?;
        tracing::info!(path = %path.display(), "added license header");
        report.updated.push(path.to_path_buf());
    }

    Ok(report)
}

/// Path below `root` with `/` separators; empty for the root itself
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Compiled gitignore-style patterns
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

#[derive(Debug, Clone)]
struct IgnoreRule {
    regex: Regex,
    negated: bool,
    dir_only: bool,
}

impl IgnoreRules {
    /// Compile the lines of an ignore file
    pub fn parse(text: &str) -> Result<Self> {
        let mut rules = Vec::new();
        for line in text.lines() {
            if let Some(rule) = IgnoreRule::parse(line)? {
                rules.push(rule);
            }
        }
        Ok(Self { rules })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether a `/`-separated relative path is excluded, either itself or
    /// through one of its parent directories
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        for end in 1..parts.len() {
            if self.matches(&parts[..end].join("/"), true) {
                return true;
            }
        }
        self.matches(&parts.join("/"), is_dir)
    }

    /// Last matching rule decides
    fn matches(&self, path: &str, is_dir: bool) -> bool {
        let mut ignored = false;
        for rule in &self.rules {
            if rule.dir_only && !is_dir {
                continue;
            }
            if rule.regex.is_match(path) {
                ignored = !rule.negated;
            }
        }
        ignored
    }
}

impl IgnoreRule {
    fn parse(line: &str) -> Result<Option<Self>> {
        let mut pattern = line.trim_end();
        if pattern.is_empty() || pattern.starts_with('#') {
            return Ok(None);
        }

        let negated = pattern.starts_with('!');
        if negated {
            pattern = &pattern[1..];
        }
        let dir_only = pattern.ends_with('/');
        let pattern = pattern.trim_end_matches('/');
        if pattern.is_empty() {
            return Ok(None);
        }

        // A slash anywhere but the end anchors the pattern to the root
        let anchored = pattern.contains('/');
        let pattern = pattern.trim_start_matches('/');

        let mut source = String::from(if anchored { "^" } else { "^(?:.*/)?" });
        source.push_str(&glob_to_regex(pattern));
        source.push('$');

        let regex = Regex::new(&source)
            .map_err(|e| Error::Pattern(format!("invalid ignore pattern '{}': {}", line, e)))?;
        Ok(Some(Self {
            regex,
            negated,
            dir_only,
        }))
    }
}

/// Translate one gitwildmatch pattern body to a regex
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                // `**` is only special as a whole path segment
                let segment_start = i == 0 || chars[i - 1] == '/';
                match chars.get(i + 2) {
                    Some('/') if segment_start => {
                        out.push_str("(?:.*/)?");
                        i += 3;
                    }
                    None if segment_start => {
                        out.push_str(".*");
                        i += 2;
                    }
                    _ => {
                        out.push_str("[^/]*");
                        i += 2;
                        while chars.get(i) == Some(&'*') {
                            i += 1;
                        }
                    }
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            '[' => match class_to_regex(&chars[i + 1..]) {
                Some((class, consumed)) => {
                    out.push_str(&class);
                    i += 1 + consumed;
                }
                None => {
                    out.push_str("\\[");
                    i += 1;
                }
            },
            '\\' if i + 1 < chars.len() => {
                out.push_str(&regex::escape(&chars[i + 1].to_string()));
                i += 2;
            }
            c => {
                out.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }
    out
}

/// Translate a bracket expression, starting just after `[`.
///
/// Returns the regex class and the number of pattern characters consumed,
/// closing `]` included, or `None` when the class is never closed. A `]`
/// right after the opening bracket (or its negation) is literal.
fn class_to_regex(chars: &[char]) -> Option<(String, usize)> {
    let mut out = String::from("[");
    let mut j = 0;
    if matches!(chars.first(), Some('!') | Some('^')) {
        out.push_str("^/");
        j = 1;
    }
    let first = j;

    while j < chars.len() {
        match chars[j] {
            ']' if j > first => {
                out.push(']');
                return Some((out, j + 1));
            }
            '\\' if j + 1 < chars.len() => {
                push_class_literal(&mut out, chars[j + 1]);
                j += 2;
                continue;
            }
            '-' if j > first && chars.get(j + 1).is_some_and(|&c| c != ']') => out.push('-'),
            c => push_class_literal(&mut out, c),
        }
        j += 1;
    }
    None
}

fn push_class_literal(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~' | '-') {
        out.push('\\');
    }
    out.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unanchored_pattern_matches_any_depth() {
        let rules = IgnoreRules::parse("*.pyc\n").unwrap();
        assert!(rules.is_ignored("a.pyc", false));
        assert!(rules.is_ignored("pkg/sub/a.pyc", false));
        assert!(!rules.is_ignored("a.py", false));
    }

    #[test]
    fn test_directory_pattern_excludes_contents() {
        let rules = IgnoreRules::parse("build/\n").unwrap();
        assert!(rules.is_ignored("build", true));
        assert!(rules.is_ignored("build/lib/x.py", false));
        assert!(!rules.is_ignored("build", false));
    }

    #[test]
    fn test_anchored_pattern() {
        let rules = IgnoreRules::parse("/docs/*.py\n").unwrap();
        assert!(rules.is_ignored("docs/conf.py", false));
        assert!(!rules.is_ignored("src/docs/conf.py", false));
    }

    #[test]
    fn test_double_star_and_negation() {
        let rules = IgnoreRules::parse("# generated\n**/gen_*.py\n!keep/gen_main.py\n").unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.is_ignored("gen_a.py", false));
        assert!(rules.is_ignored("x/y/gen_b.py", false));
        assert!(!rules.is_ignored("keep/gen_main.py", false));
    }

    #[test]
    fn test_character_class() {
        let rules = IgnoreRules::parse("test_[ab].py\n").unwrap();
        assert!(rules.is_ignored("test_a.py", false));
        assert!(!rules.is_ignored("test_c.py", false));
    }

    #[test]
    fn test_double_star_inside_a_segment_stays_in_the_segment() {
        let rules = IgnoreRules::parse("a**b.py\n").unwrap();
        assert!(rules.is_ignored("axyb.py", false));
        assert!(rules.is_ignored("pkg/ab.py", false));
        assert!(!rules.is_ignored("ax/yb.py", false));
    }

    #[test]
    fn test_trailing_double_star() {
        let rules = IgnoreRules::parse("docs/**\n").unwrap();
        assert!(rules.is_ignored("docs/a/b.py", false));
        assert!(!rules.is_ignored("src/docs.py", false));
    }

    #[test]
    fn test_bracket_as_first_class_member() {
        let rules = IgnoreRules::parse("file[]]x.py\nlog[!]0-9].py\n").unwrap();
        assert!(rules.is_ignored("file]x.py", false));
        assert!(!rules.is_ignored("filex.py", false));
        assert!(rules.is_ignored("loga.py", false));
        assert!(!rules.is_ignored("log].py", false));
        assert!(!rules.is_ignored("log5.py", false));
    }

    #[test]
    fn test_unclosed_class_is_literal() {
        let rules = IgnoreRules::parse("weird[name.py\n").unwrap();
        assert!(rules.is_ignored("weird[name.py", false));
    }

    #[test]
    fn test_render_styles() {
        assert_eq!(
            CommentStyle::Docstring.render("MIT"),
            "\"\"\"MIT\"\"\"\n\n"
        );
        assert_eq!(
            CommentStyle::for_extension("rs").render("MIT\n\nText"),
            "// MIT\n//\n// Text\n\n"
        );
        assert_eq!(CommentStyle::for_extension("sh"), CommentStyle::Hash);
    }

    #[test]
    fn test_config_defaults_from_yaml() {
        let config = LicenseConfig::from_yaml("directory: src").unwrap();
        assert_eq!(config.directory, PathBuf::from("src"));
        assert_eq!(config.license_file, PathBuf::from("LICENSE"));
        assert_eq!(config.extensions, vec!["py"]);
    }

    #[test]
    fn test_add_license_header() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("LICENSE"), "MIT License").unwrap();
        fs::write(root.join(".gitignore"), "venv/\n").unwrap();
        fs::create_dir_all(root.join("pkg")).unwrap();
        fs::create_dir_all(root.join("venv")).unwrap();
        fs::write(root.join("pkg/mod.py"), "x = 1\n").unwrap();
        fs::write(root.join("done.py"), "\"\"\"MIT License\"\"\"\n\ny = 2\n").unwrap();
        fs::write(root.join("venv/site.py"), "z = 3\n").unwrap();
        fs::write(root.join("notes.txt"), "plain\n").unwrap();

        let config = LicenseConfig {
            license_file: root.join("LICENSE"),
            directory: root.to_path_buf(),
            ignore_file: Some(root.join(".gitignore")),
            extensions: vec!["py".into()],
        };
        let report = add_license_header(&config).unwrap();

        assert_eq!(report.updated, vec![root.join("pkg/mod.py")]);
        assert_eq!(report.already_licensed, vec![root.join("done.py")]);
        assert_eq!(
            fs::read_to_string(root.join("pkg/mod.py")).unwrap(),
            "\"\"\"MIT License\"\"\"\n\nx = 1\n"
        );
        assert_eq!(fs::read_to_string(root.join("venv/site.py")).unwrap(), "z = 3\n");
        assert_eq!(fs::read_to_string(root.join("notes.txt")).unwrap(), "plain\n");

        // Second run is a no-op
        let again = add_license_header(&config).unwrap();
        assert!(again.updated.is_empty());
        assert_eq!(again.already_licensed.len(), 2);
    }

    #[test]
    fn test_missing_license_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config = LicenseConfig {
            license_file: temp.path().join("LICENSE"),
            directory: temp.path().to_path_buf(),
            ignore_file: None,
            extensions: vec!["py".into()],
        };
        assert!(matches!(add_license_header(&config), Err(Error::Io(_))));
    }
}
