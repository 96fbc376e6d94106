use url::Url;

use crate::error::ConfigError;

/// Check that `target` is an absolute http(s) URL with a host
pub fn validate_target_url(target: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidTarget { target: target.to_string(), reason };

    if target.trim().is_empty() {
        return Err(invalid("target is blank".into()));
    }

    let url = Url::parse(target).map_err(|e| {
        if target.contains("://") {
            invalid(format!("not a URL: {e}"))
        } else {
            invalid("missing scheme, expected http:// or https://".into())
        }
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("scheme '{other}' is not http or https"))),
    }

    if url.host_str().is_none() {
        return Err(invalid("no host".into()));
    }

    Ok(())
}
