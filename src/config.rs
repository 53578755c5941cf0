use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};
use crate::query::types::BoolOperator;

/// Field searched when a comparison names none
pub const DEFAULT_FIELD: &str = "_all";

/// What to do with free-text clauses while compiling for a filter context
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    /// Fail the compile
    #[default]
    Reject,
    /// Compile match and phrase literals as exact-term leaves
    Downgrade,
}

/// Compiler configuration, supplied by the caller for each compile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Operator for groups that never name one explicitly
    pub default_operator: BoolOperator,
    /// Field applied when a comparison omits one
    pub default_field: String,
    /// Whether the output will be evaluated as a non-scoring filter
    pub filter_context: bool,
    /// Handling of match/phrase literals when `filter_context` is set
    pub filter_policy: FilterPolicy,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_operator: BoolOperator::And,
            default_field: DEFAULT_FIELD.to_string(),
            filter_context: false,
            filter_policy: FilterPolicy::Reject,
        }
    }
}

/// Configuration presets for the contexts a compiled query is used in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompileProfile {
    /// Relevance-scored search; every leaf kind allowed
    Query,
    /// Non-scoring filter; free text is an error
    Filter,
    /// Non-scoring filter; free text compiles as exact terms
    LenientFilter,
}

impl CompileProfile {
    pub fn filter_context(&self) -> bool {
        !matches!(self, CompileProfile::Query)
    }

    pub fn filter_policy(&self) -> FilterPolicy {
        match self {
            CompileProfile::LenientFilter => FilterPolicy::Downgrade,
            CompileProfile::Query | CompileProfile::Filter => FilterPolicy::Reject,
        }
    }

    /// Apply this profile to a CompilerConfig
    pub fn apply_to(&self, config: &mut CompilerConfig) {
        config.filter_context = self.filter_context();
        config.filter_policy = self.filter_policy();
    }
}

impl CompilerConfig {
    /// Create a configuration with explicit defaults
    pub fn new(default_operator: BoolOperator, default_field: impl Into<String>) -> Self {
        Self {
            default_operator,
            default_field: default_field.into(),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON document; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CompileError::Configuration(format!("Invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce valid leaves
    pub fn validate(&self) -> Result<()> {
        if self.default_field.trim().is_empty() {
            return Err(CompileError::Configuration(
                "default_field must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_default_operator(mut self, operator: BoolOperator) -> Self {
        self.default_operator = operator;
        self
    }

    pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
        self.default_field = field.into();
        self
    }

    pub fn with_filter_context(mut self, filter_context: bool) -> Self {
        self.filter_context = filter_context;
        self
    }

    pub fn with_filter_policy(mut self, policy: FilterPolicy) -> Self {
        self.filter_policy = policy;
        self
    }

    /// Apply a compile profile to this configuration
    pub fn with_profile(mut self, profile: CompileProfile) -> Self {
        profile.apply_to(&mut self);
        self
    }
}
