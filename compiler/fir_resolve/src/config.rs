//! Session configuration.

use fir_tree::MAX_FUNCTION_ARITY;

/// Knobs a host sets before creating a [`FirSession`](crate::FirSession).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveConfig {
    /// Packages every file star-imports implicitly, lowest priority.
    pub default_star_imports: Vec<String>,
    /// Fully qualified names every file imports implicitly.
    pub default_imports: Vec<String>,
    /// Largest `FunctionN` arity registered as a builtin.
    pub max_function_arity: usize,
    /// Register `kotlin.Any`, `kotlin.Int`, ... when the session is created.
    pub register_builtins: bool,
    /// Report non-exhaustive `when` expressions used as values.
    pub report_non_exhaustive_when: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig {
            default_star_imports: vec!["kotlin".to_owned(), "kotlin.collections".to_owned()],
            default_imports: Vec::new(),
            max_function_arity: MAX_FUNCTION_ARITY,
            register_builtins: true,
            report_non_exhaustive_when: true,
        }
    }
}

impl ResolveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_default_star_import(mut self, package: impl Into<String>) -> Self {
        self.default_star_imports.push(package.into());
        self
    }

    #[must_use]
    pub fn with_default_import(mut self, fq_name: impl Into<String>) -> Self {
        self.default_imports.push(fq_name.into());
        self
    }

    /// Clamped to the arities `StandardClassIds` knows about.
    #[must_use]
    pub fn with_max_function_arity(mut self, arity: usize) -> Self {
        self.max_function_arity = arity.min(MAX_FUNCTION_ARITY);
        self
    }

    #[must_use]
    pub fn with_builtins(mut self, register: bool) -> Self {
        self.register_builtins = register;
        self
    }

    #[must_use]
    pub fn with_non_exhaustive_when_reports(mut self, report: bool) -> Self {
        self.report_non_exhaustive_when = report;
        self
    }
}
