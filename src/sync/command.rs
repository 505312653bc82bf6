//! Remote-copy command template.

use crate::{Error, Result};

/// Placeholder replaced with the target identifier.
pub const POD_PLACEHOLDER: &str = "{pod}";

/// A shell command line with an optional `{pod}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate(String);

impl CommandTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn needs_target(&self) -> bool {
        self.0.contains(POD_PLACEHOLDER)
    }

    /// Substitute the target. Fails when the template needs a target and none
    /// (or an unsafe one) is given.
    pub fn render(&self, pod: Option<&str>) -> Result<String> {
        if !self.needs_target() {
            return Ok(self.0.clone());
        }
        let pod = pod.filter(|p| !p.is_empty()).ok_or_else(|| {
            Error::Config(format!(
                "sync command '{}' needs a target for {POD_PLACEHOLDER}; pass --pod or set sync.pod",
                self.0
            ))
        })?;
        validate_target(pod)?;
        Ok(self.0.replace(POD_PLACEHOLDER, pod))
    }
}

/// The target lands unquoted in a shell command line.
fn validate_target(pod: &str) -> Result<()> {
    let valid_chars = pod
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !valid_chars || pod.starts_with('-') {
        return Err(Error::Config(format!(
            "invalid sync target '{pod}': use letters, digits, '.', '_' or '-'"
        )));
    }
    Ok(())
}
