//! Template preprocessing applied to document text before parsing.
//!
//! [`EnvTemplate`] substitutes `${NAME}` with the value of variable `NAME`.
//! `${NAME:-fallback}` uses `fallback` when `NAME` is undefined, `$$` renders
//! as a single `$`, and any other `$` is left alone.

use std::collections::HashMap;

use super::ConfigError;

/// Renders raw document text into the text handed to the parser.
pub trait Preprocessor: Send + Sync + std::fmt::Debug {
    fn render(&self, text: &str) -> Result<String, ConfigError>;
}

/// `${VAR}` substitution from explicit variables and, optionally, the
/// process environment.
///
/// ```
/// use configit::{EnvTemplate, Preprocessor};
///
/// let template = EnvTemplate::isolated().with_var("PORT", "8080");
/// let text = template.render("port = ${PORT}\nhost = \"${HOST:-localhost}\"")?;
/// assert_eq!(text, "port = 8080\nhost = \"localhost\"");
/// # Ok::<(), configit::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvTemplate {
    vars: HashMap<String, String>,
    use_process_env: bool,
}

impl EnvTemplate {
    /// Resolves variables from the process environment.
    pub fn from_env() -> Self {
        Self {
            vars: HashMap::new(),
            use_process_env: true,
        }
    }

    /// Resolves only variables added with [`with_var`](Self::with_var).
    pub fn isolated() -> Self {
        Self::default()
    }

    /// Adds a variable. Explicit variables take precedence over the environment.
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    fn lookup(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        if self.use_process_env {
            return std::env::var(name).ok();
        }
        None
    }

    fn resolve(&self, reference: &str) -> Result<String, ConfigError> {
        let (name, fallback) = match reference.split_once(":-") {
            Some((name, fallback)) => (name.trim(), Some(fallback)),
            None => (reference.trim(), None),
        };

        if name.is_empty() {
            return Err(ConfigError::InvalidReference(reference.to_string()));
        }

        match (self.lookup(name), fallback) {
            (Some(value), _) => Ok(value),
            (None, Some(fallback)) => Ok(fallback.to_string()),
            (None, None) => Err(ConfigError::UndefinedVariable(name.to_string())),
        }
    }
}

impl Preprocessor for EnvTemplate {
    fn render(&self, text: &str) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(at) = rest.find('$') {
            out.push_str(&rest[..at]);
            let after = &rest[at + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
            } else if let Some(body) = after.strip_prefix('{') {
                let end = body.find('}').ok_or(ConfigError::UnclosedReference)?;
                out.push_str(&self.resolve(&body[..end])?);
                rest = &body[end + 1..];
            } else {
                out.push('$');
                rest = after;
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}
