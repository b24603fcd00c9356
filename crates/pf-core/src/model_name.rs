//! Strongly-typed name wrappers for models and execution environments.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Strongly-typed wrapper for model names.
    ///
    /// Prevents accidental mixing of model names with environment names,
    /// fingerprints, or other string types.
    pub struct ModelName;
}

define_newtype_string! {
    /// Strongly-typed wrapper for execution environment (warehouse) identifiers.
    pub struct EnvironmentName;
}
