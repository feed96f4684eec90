use crate::domain::model::Platform;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{CheckError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CheckError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let extension = std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(ext) if allowed_extensions.contains(&ext.as_str()) => Ok(()),
        Some(ext) => Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // Written so NaN fails too.
    if !(value >= min && value <= max) {
        return Err(CheckError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_platforms(field_name: &str, platforms: &[Platform]) -> Result<()> {
    if platforms.is_empty() {
        return Err(CheckError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    let mut keys = HashSet::new();
    let mut domains = HashSet::new();
    for platform in platforms {
        validate_non_empty_string(&format!("{}.key", field_name), &platform.key)?;
        validate_non_empty_string(&format!("{}.domain", field_name), &platform.domain)?;
        if !keys.insert(platform.key.as_str()) {
            return Err(CheckError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: platform.key.clone(),
                reason: "Duplicate platform key".to_string(),
            });
        }
        if !domains.insert(platform.domain.trim().to_ascii_lowercase()) {
            return Err(CheckError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: platform.domain.clone(),
                reason: "Duplicate platform domain".to_string(),
            });
        }
    }
    Ok(())
}

/// Checks every value a configuration source hands to the checker.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    let search = config.search_settings();
    validate_url("search.endpoint", &search.endpoint)?;
    validate_non_empty_string("search.provider_domain", &search.provider_domain)?;
    validate_non_empty_string("search.redirect_param", &search.redirect_param)?;

    let retry = config.retry_policy();
    validate_positive_number("retry.max_attempts", retry.max_attempts as usize, 1)?;

    let scoring = config.scoring_policy();
    validate_positive_number("scoring.max_candidates", scoring.max_candidates, 1)?;
    validate_range("scoring.domain_weight", scoring.domain_weight, 0.0, 1.0)?;
    validate_range("scoring.similarity_weight", scoring.similarity_weight, 0.0, 1.0)?;
    validate_range(
        "scoring.weights",
        scoring.domain_weight + scoring.similarity_weight,
        0.0,
        1.0,
    )?;
    validate_range("scoring.sure_similarity", scoring.sure_similarity, 0.0, 1.0)?;

    validate_platforms("platforms", &config.platforms())
}
