//! Backend connection and dialog policy validation.

use crate::schema::ParleyConfig;

use super::helpers::{validate_not_blank, validate_range};

pub(crate) fn validate_backend(errors: &mut Vec<String>, config: &ParleyConfig) {
    let endpoint = config.backend.endpoint.trim();
    validate_not_blank(errors, "backend.endpoint", endpoint);
    if !endpoint.is_empty()
        && !endpoint.starts_with("http://")
        && !endpoint.starts_with("https://")
    {
        errors.push(format!(
            "backend.endpoint = {endpoint:?} must be an http:// or https:// URL"
        ));
    }
    validate_range(errors, "backend.timeout_secs", config.backend.timeout_secs, 1, 120);
    validate_range(
        errors,
        "backend.connect_timeout_secs",
        config.backend.connect_timeout_secs,
        1,
        60,
    );
}

pub(crate) fn validate_dialog(errors: &mut Vec<String>, config: &ParleyConfig) {
    validate_range(errors, "dialog.max_retries", config.dialog.max_retries, 1, 10);
}
