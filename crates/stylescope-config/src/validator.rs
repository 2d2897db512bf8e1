//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_retries(config, &mut result);
        Self::validate_analysis(config, &mut result);
        Self::validate_picker(config, &mut result);
        Self::validate_export(config, &mut result);

        result
    }

    fn validate_retries(config: &Config, result: &mut ValidationResult) {
        if config.injection.max_attempts == 0 {
            result.add_error(ValidationError::new(
                "injection.max_attempts",
                "max_attempts must be at least 1",
            ));
        }
        if config.handshake.max_attempts == 0 {
            result.add_error(ValidationError::new(
                "handshake.max_attempts",
                "max_attempts must be at least 1",
            ));
        }
        if config.handshake.max_delay_ms < config.handshake.step_delay_ms {
            result.add_warning(ValidationWarning::new(
                "handshake.max_delay_ms",
                "max_delay_ms is below step_delay_ms, every attempt will use the cap",
            ));
        }
        if config.injection.max_attempts > 10 {
            result.add_warning(ValidationWarning::new(
                "injection.max_attempts",
                "more than 10 injection attempts keeps the popup waiting for a long time",
            ));
        }
    }

    fn validate_analysis(config: &Config, result: &mut ValidationResult) {
        if config.analysis.max_colors == 0 {
            result.add_error(ValidationError::new(
                "analysis.max_colors",
                "max_colors must be greater than 0",
            ));
        }
        if config.analysis.max_fonts == 0 {
            result.add_error(ValidationError::new(
                "analysis.max_fonts",
                "max_fonts must be greater than 0",
            ));
        }
    }

    fn validate_picker(config: &Config, result: &mut ValidationResult) {
        if config.picker.cursor.trim().is_empty() {
            result.add_error(ValidationError::new("picker.cursor", "cursor cannot be empty"));
        }
    }

    fn validate_export(config: &Config, result: &mut ValidationResult) {
        if config.export.file_name.is_empty() {
            result.add_error(ValidationError::new(
                "export.file_name",
                "file_name cannot be empty",
            ));
        }
        if config.export.file_name.contains('/') || config.export.file_name.contains('\\') {
            result.add_error(ValidationError::new(
                "export.file_name",
                "file_name must not contain path separators",
            ));
        }
        if config.export.key_prefix.is_empty() {
            result.add_warning(ValidationWarning::new(
                "export.key_prefix",
                "empty key_prefix produces bare numeric keys",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
