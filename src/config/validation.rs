use http::Method;

use crate::{
    config::models::{RouteEntry, RouteTableConfig, RouterConfig},
    core::{RouteError, RouteTree},
};

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid method '{method}' for route '{pattern}'")]
    InvalidMethod { method: String, pattern: String },

    #[error("routes[{index}] rejected: {source}")]
    InvalidRoute {
        index: usize,
        #[source]
        source: RouteError,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Route table validator
pub struct RouteTableValidator;

impl RouteTableValidator {
    /// Validate the entire route table, collecting every problem found.
    pub fn validate(config: &RouteTableConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_router_config(&config.router) {
            errors.push(e);
        }

        if config.routes.is_empty() {
            errors.push(ValidationError::MissingField {
                field: "routes".to_string(),
            });
        } else {
            errors.extend(Self::check_routes(config));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            })
        }
    }

    /// Parse an entry's method, accepting any valid token but normalising case.
    pub fn parse_method(entry: &RouteEntry) -> ValidationResult<Method> {
        let upper = entry.method.trim().to_ascii_uppercase();
        if upper.is_empty() {
            return Err(ValidationError::InvalidMethod {
                method: entry.method.clone(),
                pattern: entry.pattern.clone(),
            });
        }
        Method::from_bytes(upper.as_bytes()).map_err(|_| ValidationError::InvalidMethod {
            method: entry.method.clone(),
            pattern: entry.pattern.clone(),
        })
    }

    fn validate_router_config(router: &RouterConfig) -> ValidationResult<()> {
        if router.max_path_segments == 0 {
            return Err(ValidationError::InvalidField {
                field: "router.max_path_segments".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Register every route into a scratch tree so conflicts and duplicates
    /// surface exactly as they would at startup.
    fn check_routes(config: &RouteTableConfig) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut scratch: RouteTree<()> = RouteTree::new(config.router.clone());

        for (index, entry) in config.routes.iter().enumerate() {
            if entry.handler.trim().is_empty() {
                errors.push(ValidationError::InvalidField {
                    field: format!("routes[{index}].handler"),
                    message: "Handler name must not be empty".to_string(),
                });
            }

            let method = match Self::parse_method(entry) {
                Ok(method) => method,
                Err(e) => {
                    errors.push(e);
                    continue;
                }
            };

            if let Err(source) = scratch.insert(method, &entry.pattern, ()) {
                errors.push(ValidationError::InvalidRoute { index, source });
            }
        }
        errors
    }

    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        if errors.is_empty() {
            return "No errors".to_string();
        }

        if errors.len() == 1 {
            return errors[0].to_string();
        }

        let mut message = format!("Found {} validation errors:\n", errors.len());
        for (i, error) in errors.iter().enumerate() {
            message.push_str(&format!("  {}. {}\n", i + 1, error));
        }
        message
    }
}
