//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parseable)
//! - Catch settings the rest of the system cannot work with
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: SiteConfig → Result<(), Vec<_>>
//! - Runs before a config is accepted into the settings store

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::SiteConfig;

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.site.title.trim().is_empty() {
        errors.push(ValidationError {
            field: "site.title",
            message: "must not be empty".to_string(),
        });
    }

    if config.site.base_url.trim().is_empty() {
        errors.push(ValidationError {
            field: "site.base_url",
            message: "must not be empty".to_string(),
        });
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "server.bind_address",
            message: format!("not a valid socket address: {}", config.server.bind_address),
        });
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "server.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for id in &config.plugins.enabled {
        if !seen.insert(id) {
            errors.push(ValidationError {
                field: "plugins.enabled",
                message: format!("duplicate plugin id: {}", id),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
