use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use crate::convert::Converters;
use crate::schema::Schema;
use crate::value::RawValue;

use super::{ConfigError, ConfigInstance, EnvTemplate, Parser, Preprocessor, TomlParser};

/// Loads documents into [`ConfigInstance`]s checked against a [`Schema`].
///
/// Loading runs in four steps:
/// 1. Render the text through the preprocessor (unless disabled).
/// 2. Parse it into a key/value document.
/// 3. Store every key the schema declares; record
///    `"<key> is not a valid attribute"` for every other key and carry on.
/// 4. Record `"<name> is a required attribute"` for required attributes
///    left without a value or default (unless disabled).
///
/// Preprocessing and parse failures abort the load. Everything in steps 3
/// and 4 is collected in [`ConfigInstance::errors`].
///
/// ## Example
///
/// ```
/// use configit::{AttributeOptions, Loader, Schema, TypeTag};
///
/// let mut builder = Schema::builder();
/// builder.attribute("name", AttributeOptions::new().required(true))?;
/// builder.attribute("port", AttributeOptions::new().of_type(TypeTag::INTEGER).default(80))?;
///
/// let loader = Loader::new(builder.build());
/// let config = loader.load_from_string("name = \"svc\"\nport = 8080")?;
///
/// assert!(config.is_valid());
/// assert_eq!(config.get_integer("port")?, 8080);
/// # Ok::<(), configit::Error>(())
/// ```
#[derive(Debug)]
pub struct Loader {
    schema: Arc<Schema>,
    converters: Arc<Converters>,
    parser: Box<dyn Parser>,
    preprocessor: Box<dyn Preprocessor>,
    evaluate_templates: bool,
    enforce_required: bool,
}

impl Loader {
    /// Creates a loader with TOML parsing, environment templates and the
    /// standard converters.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            converters: Converters::standard(),
            parser: Box::new(TomlParser),
            preprocessor: Box::new(EnvTemplate::from_env()),
            evaluate_templates: true,
            enforce_required: true,
        }
    }

    /// Enables or disables template preprocessing. Enabled by default.
    #[must_use]
    pub fn evaluate_templates(mut self, enabled: bool) -> Self {
        self.evaluate_templates = enabled;
        self
    }

    pub fn set_evaluate_templates(&mut self, enabled: bool) {
        self.evaluate_templates = enabled;
    }

    /// Sets the preprocessing switch from a raw value, such as one read
    /// from another document. Anything but a boolean is rejected.
    pub fn set_evaluate_templates_from(&mut self, value: &RawValue) -> Result<(), ConfigError> {
        let enabled = value.as_bool().ok_or_else(|| ConfigError::InvalidSwitch {
            switch: "evaluate_templates",
            value: value.to_string(),
        })?;
        self.evaluate_templates = enabled;
        Ok(())
    }

    pub fn evaluates_templates(&self) -> bool {
        self.evaluate_templates
    }

    /// Enables or disables the required-attribute check after loading.
    /// Enabled by default.
    #[must_use]
    pub fn enforce_required(mut self, enabled: bool) -> Self {
        self.enforce_required = enabled;
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: impl Parser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.preprocessor = Box::new(preprocessor);
        self
    }

    #[must_use]
    pub fn with_converters(mut self, converters: Arc<Converters>) -> Self {
        self.converters = converters;
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Loads a configuration from document text.
    pub fn load_from_string(&self, text: &str) -> Result<ConfigInstance, ConfigError> {
        let rendered;
        let text = if self.evaluate_templates {
            rendered = self.preprocessor.render(text)?;
            tracing::debug!(bytes = rendered.len(), "rendered config template");
            rendered.as_str()
        } else {
            text
        };

        let document = self.parser.parse(text)?;
        tracing::debug!(entries = document.len(), "parsed config document");

        let mut config =
            ConfigInstance::with_converters(Arc::clone(&self.schema), Arc::clone(&self.converters));

        for (key, value) in document {
            if self.schema.contains(&key) {
                config.insert_raw(key, value);
            } else {
                tracing::warn!(attribute = %key, "ignoring undeclared attribute");
                config.push_error(format!("{key} is not a valid attribute"));
            }
        }

        if self.enforce_required {
            config.validate();
        }

        tracing::debug!(
            attributes = config.attributes().len(),
            errors = config.errors().len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Loads a configuration from a file.
    ///
    /// Fails without parsing if the file does not exist or cannot be opened
    /// for reading.
    pub fn load_from_file(&self, path: impl AsRef<Path>) -> Result<ConfigInstance, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading config file");

        let contents = read_config_file(path)?;
        self.load_from_string(&contents)
    }
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(ConfigError::FileNotReadable {
                path: path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(contents)
}
