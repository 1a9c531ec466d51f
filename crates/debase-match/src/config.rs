//! The JSON configuration loader.
//!
//! ```json
//! {
//!   "files":    "path"  |  ["path", ...],
//!   "patterns": "pat"   |  ["pat", ...]
//!             | { "ctor": [...], "dtor": [...], "all": [...] }
//! }
//! ```
//!
//! `files` entries resolve relative to the config file's directory and are
//! `..`-normalized without touching the filesystem. Flat `patterns` feed
//! both sets; the object form feeds `ctor ∪ all` and `dtor ∪ all`.
//!
//! The shape is interpreted by walking `serde_json::Value` rather than a
//! derive, so permissive mode can skip exactly the offending field.

use std::path::{Path, PathBuf};

use normalize_path::NormalizePath;
use serde_json::Value;

use crate::error::PatternError;
use crate::matcher::SymbolMatcher;

/// Which set a pattern list feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternRole {
    Ctor,
    Dtor,
    All,
}

impl SymbolMatcher {
    /// Load a config file into this matcher. Input files listed in the
    /// config are appended, as normalized absolute paths, to `out_files`.
    ///
    /// A matcher holds at most one config; a second load fails.
    pub fn load_config(
        &mut self,
        path: &Path,
        mut out_files: Option<&mut Vec<PathBuf>>,
    ) -> Result<(), PatternError> {
        if let Some(existing) = &self.config_path {
            return Err(PatternError::ConfigAlreadyLoaded {
                path: existing.clone(),
            });
        }

        let shape = |detail: String| PatternError::ConfigShape { detail };

        let abs = std::path::absolute(path)
            .map_err(|e| shape(format!("cannot resolve {}: {e}", path.display())))?;
        let text = std::fs::read_to_string(&abs)
            .map_err(|e| shape(format!("failed to read {}: {e}", abs.display())))?;
        let doc: Value = serde_json::from_str(&text)
            .map_err(|e| shape(format!("invalid JSON in {}: {e}", abs.display())))?;
        let Value::Object(root) = doc else {
            return Err(shape(format!(
                "{}: top level must be an object",
                abs.display()
            )));
        };

        let config_dir = abs.parent().map_or_else(PathBuf::new, Path::to_path_buf);

        if let Some(files) = root.get("files") {
            match string_list("files", files) {
                Ok(entries) => {
                    for entry in entries {
                        match self.resolve_input_file(&config_dir, &entry) {
                            Ok(resolved) => {
                                if let Some(out) = out_files.as_deref_mut() {
                                    out.push(resolved);
                                }
                            }
                            Err(err) => self.fail_or_warn(err)?,
                        }
                    }
                }
                Err(err) => self.fail_or_warn(err)?,
            }
        }

        let Some(patterns) = root.get("patterns") else {
            return Err(PatternError::ConfigMissingPatterns);
        };
        self.load_patterns(patterns)?;

        self.config_path = Some(abs);
        Ok(())
    }

    fn load_patterns(&mut self, patterns: &Value) -> Result<(), PatternError> {
        match patterns {
            Value::String(_) | Value::Array(_) => {
                let list = match string_list("patterns", patterns) {
                    Ok(list) => list,
                    Err(err) => return self.fail_or_warn(err),
                };
                if list.is_empty() {
                    return Err(PatternError::ConfigMissingPatterns);
                }
                for pattern in &list {
                    self.add_role_pattern(PatternRole::All, pattern)?;
                }
                Ok(())
            }
            Value::Object(map) => {
                let mut total = 0;
                for (key, value) in map {
                    let role = match key.as_str() {
                        "ctor" => PatternRole::Ctor,
                        "dtor" => PatternRole::Dtor,
                        "all" => PatternRole::All,
                        other => {
                            let err = PatternError::ConfigShape {
                                detail: format!("unknown patterns key `{other}`"),
                            };
                            self.fail_or_warn(err)?;
                            continue;
                        }
                    };
                    let list = match string_list(key, value) {
                        Ok(list) => list,
                        Err(err) => {
                            self.fail_or_warn(err)?;
                            continue;
                        }
                    };
                    total += list.len();
                    for pattern in &list {
                        self.add_role_pattern(role, pattern)?;
                    }
                }
                if total == 0 {
                    return Err(PatternError::ConfigMissingPatterns);
                }
                Ok(())
            }
            other => {
                let err = PatternError::ConfigShape {
                    detail: format!(
                        "`patterns` must be a string, array, or object (got {})",
                        type_name(other)
                    ),
                };
                self.fail_or_warn(err)?;
                Err(PatternError::ConfigMissingPatterns)
            }
        }
    }

    /// Compile one pattern into its role's set(s), honoring permissive
    /// mode on compile failure.
    fn add_role_pattern(&mut self, role: PatternRole, pattern: &str) -> Result<(), PatternError> {
        let result = match role {
            PatternRole::Ctor => self.add_ctor_pattern(pattern),
            PatternRole::Dtor => self.add_dtor_pattern(pattern),
            PatternRole::All => self.add_pattern(pattern),
        };
        match result {
            Ok(_) => Ok(()),
            Err(err) => self.fail_or_warn(err),
        }
    }

    /// Resolve one `files` entry: config-relative, `..`-normalized, and
    /// existence-checked as a regular file.
    fn resolve_input_file(
        &self,
        config_dir: &Path,
        entry: &str,
    ) -> Result<PathBuf, PatternError> {
        let candidate = if Path::new(entry).is_absolute() {
            PathBuf::from(entry)
        } else {
            config_dir.join(entry)
        };
        let normalized = candidate.normalize();
        match std::fs::metadata(&normalized) {
            Ok(meta) if meta.is_file() => Ok(normalized),
            Ok(_) => Err(PatternError::ConfigShape {
                detail: format!("{} is not a regular file", normalized.display()),
            }),
            Err(e) => Err(PatternError::ConfigShape {
                detail: format!("input file {}: {e}", normalized.display()),
            }),
        }
    }

    /// Permissive mode turns the error into a warning; strict mode
    /// propagates it.
    fn fail_or_warn(&mut self, err: PatternError) -> Result<(), PatternError> {
        if self.permissive {
            self.warn(err.to_string());
            Ok(())
        } else {
            Err(err)
        }
    }
}

/// Interpret a string-or-array-of-strings value.
fn string_list(key: &str, value: &Value) -> Result<Vec<String>, PatternError> {
    match value {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(PatternError::ConfigShape {
                    detail: format!(
                        "`{key}` entries must be strings (got {})",
                        type_name(other)
                    ),
                }),
            })
            .collect(),
        other => Err(PatternError::ConfigShape {
            detail: format!(
                "`{key}` must be a string or an array of strings (got {})",
                type_name(other)
            ),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
