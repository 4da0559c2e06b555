//! Scalar coercion options.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Controls which plain scalars are coerced away from strings.
///
/// Each switch is independent. Quoted scalars are never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParseOptions {
    /// Turn numeric text into numbers (default: true)
    pub convert_numbers: bool,
    /// Turn `true`/`false` into booleans (default: true)
    pub convert_booleans: bool,
    /// Turn `null` into null (default: true)
    pub convert_nulls: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            convert_numbers: true,
            convert_booleans: true,
            convert_nulls: true,
        }
    }
}

impl ParseOptions {
    /// All coercions disabled: every scalar stays a string.
    pub fn strings() -> Self {
        Self {
            convert_numbers: false,
            convert_booleans: false,
            convert_nulls: false,
        }
    }

    /// Set number coercion.
    pub fn with_numbers(mut self, enabled: bool) -> Self {
        self.convert_numbers = enabled;
        self
    }

    /// Set boolean coercion.
    pub fn with_booleans(mut self, enabled: bool) -> Self {
        self.convert_booleans = enabled;
        self
    }

    /// Set null coercion.
    pub fn with_nulls(mut self, enabled: bool) -> Self {
        self.convert_nulls = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_everything() {
        let opts = ParseOptions::default();
        assert!(opts.convert_numbers);
        assert!(opts.convert_booleans);
        assert!(opts.convert_nulls);
    }

    #[test]
    fn test_builders_are_independent() {
        let opts = ParseOptions::default().with_numbers(false);
        assert!(!opts.convert_numbers);
        assert!(opts.convert_booleans);
        assert!(opts.convert_nulls);

        let opts = ParseOptions::strings().with_nulls(true);
        assert!(!opts.convert_numbers);
        assert!(!opts.convert_booleans);
        assert!(opts.convert_nulls);
    }
}
