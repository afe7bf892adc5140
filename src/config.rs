use thiserror::Error;

/// Environment variable overriding [`FrontendConfig::max_depth`].
pub const MAX_DEPTH_ENV: &str = "EXPRLANG_MAX_DEPTH";
/// Environment variable overriding [`FrontendConfig::max_operators`].
pub const MAX_OPERATORS_ENV: &str = "EXPRLANG_MAX_OPERATORS";

pub const DEFAULT_MAX_DEPTH: usize = 256;
pub const DEFAULT_MAX_OPERATORS: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {name}: expected a positive integer")]
    InvalidLimit { name: &'static str, value: String },
}

/// Limits shared by the parser and the semantic analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Deepest nesting of parentheses and call arguments. The parser rejects
    /// anything deeper, and the analyzer applies the same bound to nested
    /// calls. Operator chains do not count toward it.
    pub max_depth: usize,
    /// Most binary operators one statement may hold. Longer statements are
    /// a syntax error.
    pub max_operators: usize,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_operators: DEFAULT_MAX_OPERATORS,
        }
    }
}

impl FrontendConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_operators(mut self, max_operators: usize) -> Self {
        self.max_operators = max_operators;
        self
    }

    /// Defaults, overridden by `EXPRLANG_MAX_DEPTH` and
    /// `EXPRLANG_MAX_OPERATORS` when they are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(MAX_DEPTH_ENV) {
            config = config.with_max_depth(parse_limit(MAX_DEPTH_ENV, &value)?);
        }
        if let Ok(value) = std::env::var(MAX_OPERATORS_ENV) {
            config = config.with_max_operators(parse_limit(MAX_OPERATORS_ENV, &value)?);
        }
        Ok(config)
    }
}

pub fn parse_limit(name: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidLimit {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_limits() {
        assert_eq!(parse_limit("--max-depth", " 64 "), Ok(64));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        for value in ["0", "-3", "deep", ""] {
            let err = parse_limit("--max-operators", value).expect_err("invalid limit");
            assert!(err.to_string().contains("--max-operators"));
        }
    }

    #[test]
    fn builder_overrides_default() {
        let config = FrontendConfig::default()
            .with_max_depth(8)
            .with_max_operators(16);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.max_operators, 16);
        assert_eq!(FrontendConfig::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(FrontendConfig::default().max_operators, DEFAULT_MAX_OPERATORS);
    }
}
