//! The project manifest, `few.litany.yaml`
//!
//! A YAML mapping whose `words` key lists package tokens in the order they
//! were added. Other keys belong to the user and survive every edit.
//!
//! ```yaml
//! # project dependencies
//! words:
//!   - foo/bar
//!   - https://example.com/tools/baz.git
//! ```
//!
//! Appends are done as a text edit so comments and formatting are kept. When
//! the file is laid out in a way the text edit does not understand (a flow
//! list such as `words: [a, b]`), the manifest is rewritten structurally
//! instead; that keeps every field but drops comments.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use few_fs::{FewPath, NormalizedPath, io};

use crate::{Error, Result};

const WORDS_KEY: &str = "words";

/// Content written for a freshly created manifest.
pub const EMPTY_MANIFEST: &str = "words: []\n";

/// Handle to a `few.litany.yaml` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Litany {
    path: NormalizedPath,
}

impl Litany {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    /// The manifest of the project rooted at `root`.
    pub fn for_project(root: &NormalizedPath) -> Self {
        Self::new(root.join(FewPath::LitanyFile))
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the manifest with an empty `words` list if it does not exist.
    ///
    /// Returns `true` when the file was created.
    pub fn create_empty(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        io::write_text(&self.path, EMPTY_MANIFEST)?;
        debug!(path = %self.path.as_str(), "Created manifest");
        Ok(true)
    }

    /// Declared tokens in file order, duplicates removed.
    ///
    /// A missing file, an empty file, or a missing/null `words` key all yield
    /// an empty list.
    ///
    /// # Errors
    ///
    /// [`Error::ManifestError`] when the file is not valid YAML, its top level
    /// is not a mapping, or `words` is not a list of strings.
    pub fn load(&self) -> Result<Vec<String>> {
        match io::read_text_if_exists(&self.path)? {
            Some(content) => self.parse_words(&content),
            None => Ok(Vec::new()),
        }
    }

    /// Add `token` to the `words` list unless it is already present.
    ///
    /// Comparison is exact and case-sensitive. Returns `true` when the file
    /// was changed.
    pub fn append(&self, token: &str) -> Result<bool> {
        let content = io::read_text_if_exists(&self.path)?.unwrap_or_default();
        let mut expected = self.parse_words(&content)?;
        if expected.iter().any(|existing| existing == token) {
            debug!(token, "Token already in manifest");
            return Ok(false);
        }
        expected.push(token.to_string());

        let edited = insert_block_item(&content, token)
            .filter(|candidate| matches!(self.parse_words(candidate), Ok(words) if words == expected));

        let updated = match edited {
            Some(text) => text,
            None => {
                debug!(path = %self.path.as_str(), "Rewriting manifest structurally");
                self.rewrite_with(&content, token)?
            }
        };

        io::write_text(&self.path, &updated)?;
        Ok(true)
    }

    fn parse_words(&self, content: &str) -> Result<Vec<String>> {
        let root = self.parse_root(content)?;
        let Some(mapping) = root else {
            return Ok(Vec::new());
        };

        let items = match mapping.get(WORDS_KEY) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Sequence(items)) => items,
            Some(_) => return Err(self.invalid("'words' must be a list of package identifiers")),
        };

        let mut words: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            let Value::String(token) = item else {
                return Err(self.invalid(format!(
                    "'words' entries must be strings, found {}",
                    describe(item)
                )));
            };
            if !words.contains(token) {
                words.push(token.clone());
            }
        }
        Ok(words)
    }

    /// Parse the top level, `None` for an empty document.
    fn parse_root(&self, content: &str) -> Result<Option<Mapping>> {
        let blank = content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(None);
        }
        let value: Value = serde_yaml::from_str(content).map_err(|e| self.invalid(e.to_string()))?;
        match value {
            Value::Null => Ok(None),
            Value::Mapping(mapping) => Ok(Some(mapping)),
            other => Err(self.invalid(format!(
                "top level must be a mapping, found {}",
                describe(&other)
            ))),
        }
    }

    fn rewrite_with(&self, content: &str, token: &str) -> Result<String> {
        let mut mapping = self.parse_root(content)?.unwrap_or_default();
        let key = Value::String(WORDS_KEY.to_string());

        match mapping.get_mut(&key) {
            Some(Value::Sequence(items)) => items.push(Value::String(token.to_string())),
            _ => {
                mapping.insert(key, Value::Sequence(vec![Value::String(token.to_string())]));
            }
        }
        serde_yaml::to_string(&Value::Mapping(mapping)).map_err(|e| self.invalid(e.to_string()))
    }

    fn invalid(&self, message: impl Into<String>) -> Error {
        Error::ManifestError {
            path: self.path.to_native(),
            message: message.into(),
        }
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Text edit adding `- token` to the block-style `words` list.
///
/// Returns `None` when the layout is not one this edit handles. The file's
/// line ending is kept.
fn insert_block_item(content: &str, token: &str) -> Option<String> {
    let item = scalar(token)?;
    let eol = line_ending(content);
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();

    let Some(key_index) = lines.iter().position(|line| is_words_key(line)) else {
        let mut out = content.to_string();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push_str(eol);
        }
        out.push_str(&format!("{}:{eol}- {}{eol}", WORDS_KEY, item));
        return Some(out);
    };

    let value = strip_comment(&lines[key_index][WORDS_KEY.len() + 1..])
        .trim()
        .to_string();
    match value.as_str() {
        "" => {}
        "[]" | "~" | "null" => {
            lines[key_index] = format!("{}:", WORDS_KEY);
            lines.insert(key_index + 1, format!("- {}", item));
            return Some(join_lines(&lines, eol));
        }
        _ => return None,
    }

    // Block list: indented lines, or `-` items at column zero
    let mut last_item = None;
    let mut item_indent = None;
    for (index, line) in lines.iter().enumerate().skip(key_index + 1) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - trimmed.len();
        if indent == 0 && !trimmed.starts_with('-') {
            break;
        }
        if item_indent.is_none() && trimmed.starts_with('-') {
            item_indent = Some(indent);
        }
        last_item = Some(index);
    }

    let insert_at = last_item.map_or(key_index + 1, |index| index + 1);
    let indent = " ".repeat(item_indent.unwrap_or(0));
    lines.insert(insert_at, format!("{}- {}", indent, item));
    Some(join_lines(&lines, eol))
}

fn is_words_key(line: &str) -> bool {
    line.strip_prefix(WORDS_KEY)
        .is_some_and(|rest| rest.starts_with(':'))
}

fn strip_comment(value: &str) -> &str {
    match value.find(" #") {
        Some(index) => &value[..index],
        None if value.trim_start().starts_with('#') => "",
        None => value,
    }
}

/// `token` as a single-line YAML scalar, quoted only when YAML needs it.
fn scalar(token: &str) -> Option<String> {
    let rendered = serde_yaml::to_string(&Value::String(token.to_string())).ok()?;
    let rendered = rendered.trim_end();
    (!rendered.contains('\n')).then(|| rendered.to_string())
}

fn line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") { "\r\n" } else { "\n" }
}

fn join_lines(lines: &[String], eol: &str) -> String {
    let mut out = lines.join(eol);
    out.push_str(eol);
    out
}
