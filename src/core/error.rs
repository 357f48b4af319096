// Copyright 2026 Varsift Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for varsift
//!
//! This module defines all error types produced during expression
//! compilation and record evaluation.

use thiserror::Error;

/// Result type alias for varsift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for filter compilation and evaluation
///
/// Compile errors abort compilation; evaluation errors are fatal for the
/// current record. Missing data is never an error and flows through the
/// value domain as empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // =========================================================================
    // Syntax errors
    // =========================================================================
    /// Unterminated string literal
    #[error("missing quotes in: {0}")]
    MissingQuotes(String),

    /// Unbalanced parentheses
    #[error("unbalanced parentheses in: {0}")]
    UnbalancedParens(String),

    /// Expression could not be parsed
    #[error("could not parse the expression: {0}")]
    BadExpression(String),

    /// The operand next to %TYPE or %FILTER was not a string literal
    #[error("expected a quoted string next to {tag}: {expr}")]
    ExpectedString { tag: &'static str, expr: String },

    /// Unknown variant-type vocabulary word
    #[error("the type \"{0}\" is not recognised")]
    UnknownVariantType(String),

    // =========================================================================
    // Name errors
    // =========================================================================
    /// Tag not present in the header dictionary
    #[error("the tag \"{0}\" is not defined in the header")]
    TagNotDefined(String),

    /// Tag present but not declared as an INFO field
    #[error("no such INFO field: {0}")]
    NoSuchInfoField(String),

    /// Tag present but not declared as a FORMAT field
    #[error("no such FORMAT field: {0}")]
    NoSuchFormatField(String),

    /// Filter name not declared in the header
    #[error("the filter \"{0}\" is not present in the header")]
    FilterNotDefined(String),

    /// Vector-valued tag referenced without a subscript
    #[error("arrays must be subscripted, e.g. {0}[0]")]
    NotSubscripted(String),

    // =========================================================================
    // Type errors
    // =========================================================================
    /// Mixed string/numeric comparison
    #[error("comparing string to numeric value: {0}")]
    StringNumericCompare(String),

    /// Strings only support == and !=
    #[error("wrong operator in string comparison: {0}")]
    StringOperator(String),

    /// Two per-sample string vectors of different length
    #[error("cannot compare vectors of different length: {0}")]
    VectorLengthMismatch(String),

    /// Logical operator applied to an operand that carries no verdict
    #[error("logical operator applied to a non-boolean operand: {0}")]
    LogicOperand(String),

    /// Field type the engine cannot bind (e.g. subscripted string vector)
    #[error("unsupported field type for \"{0}\"")]
    UnsupportedFieldType(String),

    // =========================================================================
    // Arity errors
    // =========================================================================
    /// Operator found fewer operands on the stack than it needs
    #[error("evaluation stack underflow while processing \"{0}\"")]
    StackUnderflow(String),

    /// Evaluation finished with more than one value on the stack
    #[error("evaluation stack not reduced to a single value in \"{0}\"")]
    StackResidue(String),
}

impl Error {
    /// Check if this is a syntax error (compile time)
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::MissingQuotes(_)
                | Error::UnbalancedParens(_)
                | Error::BadExpression(_)
                | Error::ExpectedString { .. }
                | Error::UnknownVariantType(_)
        )
    }

    /// Check if this is a name-resolution error (compile time)
    pub fn is_name(&self) -> bool {
        matches!(
            self,
            Error::TagNotDefined(_)
                | Error::NoSuchInfoField(_)
                | Error::NoSuchFormatField(_)
                | Error::FilterNotDefined(_)
                | Error::NotSubscripted(_)
        )
    }

    /// Check if this is a type error
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Error::StringNumericCompare(_)
                | Error::StringOperator(_)
                | Error::VectorLengthMismatch(_)
                | Error::LogicOperand(_)
                | Error::UnsupportedFieldType(_)
        )
    }

    /// Check if this is an evaluation-stack arity error
    pub fn is_arity(&self) -> bool {
        matches!(self, Error::StackUnderflow(_) | Error::StackResidue(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::MissingQuotes("%TYPE=\"snp".to_string()).to_string(),
            "missing quotes in: %TYPE=\"snp"
        );
        assert_eq!(
            Error::TagNotDefined("XY".to_string()).to_string(),
            "the tag \"XY\" is not defined in the header"
        );
        assert_eq!(
            Error::NotSubscripted("DP4".to_string()).to_string(),
            "arrays must be subscripted, e.g. DP4[0]"
        );
        assert_eq!(
            Error::FilterNotDefined("q10".to_string()).to_string(),
            "the filter \"q10\" is not present in the header"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::MissingQuotes(String::new()).is_syntax());
        assert!(Error::UnbalancedParens(String::new()).is_syntax());
        assert!(Error::TagNotDefined(String::new()).is_name());
        assert!(Error::NoSuchFormatField(String::new()).is_name());
        assert!(Error::StringOperator(String::new()).is_type());
        assert!(Error::StackUnderflow(String::new()).is_arity());

        assert!(!Error::TagNotDefined(String::new()).is_syntax());
        assert!(!Error::StackUnderflow(String::new()).is_type());
    }
}
