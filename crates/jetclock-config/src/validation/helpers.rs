//! Shared validation helpers.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is not an absolute hierarchical URL.
pub(crate) fn validate_url(errors: &mut Vec<String>, name: &str, value: &str) {
    match url::Url::parse(value) {
        Ok(parsed) if !parsed.cannot_be_a_base() => {}
        Ok(_) => errors.push(format!("{name} = {value:?} is not a hierarchical URL")),
        Err(e) => errors.push(format!("{name} = {value:?} is not a URL: {e}")),
    }
}
