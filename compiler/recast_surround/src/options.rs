//! Classifier configuration.

/// Options that change which contexts are supported and how synthesized
/// code is spelled.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SurroundOptions {
    /// The language level allows statements before `this(..)` and
    /// `super(..)` in a constructor. When unset, arguments of those calls
    /// cannot be surrounded.
    pub statements_before_super: bool,
    /// Name of the method synthesized around enum-constant arguments.
    pub anonymous_method_name: String,
    /// Base type of the anonymous class synthesized around enum-constant
    /// arguments.
    pub anonymous_base_type: String,
}

impl Default for SurroundOptions {
    fn default() -> Self {
        SurroundOptions {
            statements_before_super: false,
            anonymous_method_name: "get".to_owned(),
            anonymous_base_type: "Object".to_owned(),
        }
    }
}

impl SurroundOptions {
    #[must_use]
    pub fn with_statements_before_super(mut self, allowed: bool) -> Self {
        self.statements_before_super = allowed;
        self
    }

    #[must_use]
    pub fn with_anonymous_method_name(mut self, name: impl Into<String>) -> Self {
        self.anonymous_method_name = name.into();
        self
    }

    #[must_use]
    pub fn with_anonymous_base_type(mut self, ty: impl Into<String>) -> Self {
        self.anonymous_base_type = ty.into();
        self
    }
}
