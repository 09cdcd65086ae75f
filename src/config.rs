use crate::builder::NotEqualBinding;
use crate::core::{DbError, Result};

pub const ENV_TIMESTAMP_FORMAT: &str = "ROWBIND_TIMESTAMP_FORMAT";
pub const ENV_NOT_EQUAL_BINDING: &str = "ROWBIND_NOT_EQUAL_BINDING";
pub const ENV_LOG_STATEMENTS: &str = "ROWBIND_LOG_STATEMENTS";

/// Mapper configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrmConfig {
    /// Default parse format for timestamp fields without their own format.
    /// `None` means RFC 3339.
    pub timestamp_format: Option<String>,

    /// How `!=` filters bind their value
    pub not_equal_binding: NotEqualBinding,

    /// Emit rendered statements at debug level
    pub log_statements: bool,
}

impl OrmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timestamp format (chrono `strftime` syntax)
    pub fn timestamp_format(mut self, format: &str) -> Self {
        self.timestamp_format = Some(format.to_string());
        self
    }

    pub fn not_equal_binding(mut self, binding: NotEqualBinding) -> Self {
        self.not_equal_binding = binding;
        self
    }

    pub fn log_statements(mut self, enabled: bool) -> Self {
        self.log_statements = enabled;
        self
    }

    /// Reads overrides from the environment, starting from the defaults.
    ///
    /// - `ROWBIND_TIMESTAMP_FORMAT`: default timestamp format
    /// - `ROWBIND_NOT_EQUAL_BINDING`: `bound` or `legacy`
    /// - `ROWBIND_LOG_STATEMENTS`: `true`/`false`/`1`/`0`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(format) = lookup(ENV_TIMESTAMP_FORMAT) {
            config.timestamp_format = Some(format);
        }
        if let Some(binding) = lookup(ENV_NOT_EQUAL_BINDING) {
            config.not_equal_binding = binding.parse()?;
        }
        if let Some(flag) = lookup(ENV_LOG_STATEMENTS) {
            config.log_statements = match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                other => {
                    return Err(DbError::Config(format!(
                        "{} must be a boolean, got '{}'",
                        ENV_LOG_STATEMENTS, other
                    )));
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.timestamp_format {
            if format.trim().is_empty() {
                return Err(DbError::Config("timestamp format must not be empty".into()));
            }
        }
        Ok(())
    }
}
