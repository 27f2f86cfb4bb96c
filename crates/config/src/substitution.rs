use anyhow::Result;
use regex::{Captures, Regex};
use std::env;
use tracing::{debug, warn};

const PLACEHOLDER_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

/// Substitute environment variables written as `${VAR_NAME}` or `$VAR_NAME`.
///
/// Unset variables keep their placeholder so that the YAML parser or the
/// validator reports them in context.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(PLACEHOLDER_PATTERN)?;
    let mut missing_vars = Vec::new();

    let substituted = re.replace_all(content, |caps: &Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();

        match env::var(name) {
            Ok(value) => {
                debug!(var = name, "Substituting environment variable");
                value
            }
            Err(_) => {
                warn!(var = name, "Environment variable not set");
                missing_vars.push(name.to_string());
                caps[0].to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!(?missing_vars, "Placeholders left unresolved");
    }

    Ok(substituted.into_owned())
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    Regex::new(PLACEHOLDER_PATTERN)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}
