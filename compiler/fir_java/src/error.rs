//! Failures while reading Java inputs.

use thiserror::Error;

/// A signature allow-list entry that does not have the
/// `owner/Internal.name(params)ret` shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WhitelistError {
    #[error("whitelist entry `{entry}` has no parameter list")]
    MissingParameterList { entry: String },

    #[error("whitelist entry `{entry}` does not name an owner class")]
    MissingOwner { entry: String },

    #[error("whitelist entry `{entry}` has an empty method name")]
    EmptyName { entry: String },

    #[error("whitelist entry `{entry}` has a malformed descriptor at byte {offset}")]
    MalformedDescriptor { entry: String, offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JavaLoadError {
    #[error("`{0}` is not a valid internal class name")]
    InvalidInternalName(String),

    /// Nested classes are loaded through their outer class.
    #[error("`{0}` is a nested class; load its outer class instead")]
    NestedWithoutOuter(String),

    #[error("class `{0}` is already registered in this session")]
    DuplicateClass(String),
}
