//! Interceptor configuration.

use serde::Deserialize;

/// What the before hook does when the handler type cannot be resolved.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Log the failure, skip the handler, and return the error.
    #[default]
    Propagate,
    /// Log the failure, then log the call with an empty description and run
    /// the handler as usual.
    LogAndContinue,
}

/// Settings for [`SysLogInterceptor`](crate::middleware::SysLogInterceptor).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use marklog::{ResolutionPolicy, SysLogConfig};
///
/// let config: SysLogConfig =
///     serde_json::from_str(r#"{ "on_resolution_failure": "log_and_continue" }"#).unwrap();
/// assert_eq!(config.on_resolution_failure, ResolutionPolicy::LogAndContinue);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct SysLogConfig {
    pub on_resolution_failure: ResolutionPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_propagate() {
        let config: SysLogConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SysLogConfig::default());
        assert_eq!(config.on_resolution_failure, ResolutionPolicy::Propagate);
    }

    #[test]
    fn rejects_unknown_policy() {
        let res = serde_json::from_str::<SysLogConfig>(r#"{ "on_resolution_failure": "ignore" }"#);
        assert!(res.is_err());
    }
}
