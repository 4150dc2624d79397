// Route template compilation and path normalization

use crate::Error;
use regex::Regex;
use std::sync::OnceLock;

/// The canonical `{identifier}` placeholder grammar, shared by pattern
/// compilation and reverse URL generation.
pub(crate) fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{(\w+)\}").unwrap())
}

/// Normalize a path or template: exactly one leading separator, no trailing
/// separator unless the path is the root separator alone. An empty or
/// whitespace-only input normalizes to the empty string so callers can
/// reject it.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let stripped = trimmed.trim_start_matches('/');
    let mut out = String::with_capacity(stripped.len() + 1);
    out.push('/');
    out.push_str(stripped);
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Join a prefix and a path with a single separator at the joint.
pub fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = normalize_path(prefix);
    let path = normalize_path(path);
    if prefix.is_empty() || prefix == "/" {
        return path;
    }
    if path.is_empty() || path == "/" {
        return prefix;
    }
    format!("{}{}", prefix, path)
}

/// Captures extracted from a matched path, with named placeholder captures
/// separated from purely positional ones.
#[derive(Debug, Clone, Default)]
pub struct PathCaptures {
    /// Placeholder name/value pairs, in capture order
    pub named: Vec<(String, String)>,
    /// Unnamed capture-group values, in capture order
    pub positional: Vec<String>,
}

/// The compiled, matchable form of a route template.
///
/// Every `{identifier}` placeholder becomes a named capture group matching
/// one or more non-separator characters; the rest of the template passes
/// through verbatim, so raw regex groups surface as positional captures.
/// Matching is case-insensitive and anchored at both ends.
#[derive(Debug, Clone)]
pub struct Pattern {
    template: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a route template into a pattern matching the entire path.
    ///
    /// Fails only when the template is empty after normalization; any other
    /// input produces a valid pattern.
    pub fn compile(template: &str) -> Result<Self, Error> {
        Self::compile_inner(template, true)
    }

    /// Compile a template anchored only at the start, matching any path
    /// under the templated prefix. Used for protected-prefix checks.
    pub fn compile_prefix(template: &str) -> Result<Self, Error> {
        Self::compile_inner(template, false)
    }

    fn compile_inner(template: &str, anchor_end: bool) -> Result<Self, Error> {
        let normalized = normalize_path(template);
        if normalized.is_empty() {
            return Err(Error::InvalidTemplate(format!(
                "template {:?} is empty after normalization",
                template
            )));
        }

        let tail = if anchor_end { "$" } else { "" };
        let body = placeholder_regex().replace_all(&normalized, r"(?P<$1>[^/]+)");
        let regex = match Regex::new(&format!("(?i)^{}{}", body, tail)) {
            Ok(regex) => regex,
            // Unbalanced user-supplied groups fall back to a fully escaped
            // literal so compilation stays total.
            Err(_) => Regex::new(&format!("(?i)^{}{}", regex::escape(&normalized), tail))
                .unwrap(),
        };

        Ok(Self {
            template: normalized,
            regex,
        })
    }

    /// The normalized template this pattern was compiled from
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Test the pattern against a normalized path, extracting captures on
    /// success. Pure read; no side effects.
    pub fn match_path(&self, path: &str) -> Option<PathCaptures> {
        let caps = self.regex.captures(path)?;
        let mut extracted = PathCaptures::default();
        for (i, name) in self.regex.capture_names().enumerate() {
            if i == 0 {
                continue; // whole-match group
            }
            match name {
                Some(n) => {
                    if let Some(m) = caps.name(n) {
                        extracted.named.push((n.to_string(), m.as_str().to_string()));
                    }
                }
                None => {
                    if let Some(m) = caps.get(i) {
                        extracted.positional.push(m.as_str().to_string());
                    }
                }
            }
        }
        Some(extracted)
    }

    /// Whether the pattern matches the path
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}
