//! Diagnostic codes
//!
//! Stable identifiers for every validation failure the resolvers can report.
//! The serialized form is the PascalCase wire ID consumed by downstream
//! tooling.

use crate::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Shared structural checks
    DuplicateListing,
    EmptyList,
    UnrecognizedEnumValue,

    // Type-category cross-references
    TypeAlreadyDefined,
    TypeNotBiasedScalar,
    TypeNotQuantity,
    TypeNotScalar,
    TypeNotUnit,
    TypeNotVector,
    TypeNotVectorGroup,
    CyclicallySpecializedType,

    // Unit instances
    InvalidUnitInstanceName,
    InvalidUnitPluralForm,
    DuplicateUnitName,
    DuplicateUnitPluralForm,
    UnrecognizedUnitInstanceName,
    CyclicallyModifiedUnitInstances,
    BiasedUnitDefinedButUnitNotBiased,
    InvalidBiasedUnitExpression,

    // Derivations
    InvalidDerivationExpression,
    InvalidDerivationSignature,
    #[serde(rename = "AmbiguousDerivationSignatureNotSpecified")]
    AmbiguousDerivationSignatureNotSpecified,
    MultipleDerivationSignaturesButNotNamed,
    DerivationSignatureNotPermutable,
    #[serde(rename = "DuplicateUnitDerivationID")]
    DuplicateUnitDerivationId,
    DuplicateUnitDerivationSignature,
    ExpressionDoesNotIncludeUnit,
    UnmatchedDerivationExpressionUnit,
    IncompatibleDerivedUnitListSize,
    #[serde(rename = "UnrecognizedUnitDerivationID")]
    UnrecognizedUnitDerivationId,
    UnitNotDerivable,
    DerivableUnitShouldNotUseFixed,
    UnitWithBiasTermCannotBeDerived,
    UnitNotIncludingBiasTerm,

    // Constants
    InvalidConstantName,
    DuplicateConstantName,

    // Vectors and groups
    InvalidVectorDimension,
    VectorUnexpectedDimension,
    VectorGroupAlreadyContainsDimension,
}

impl DiagnosticCode {
    /// Severity this code is reported at unless a caller overrides it.
    /// Valid-with-diagnostic findings are warnings; everything else is an
    /// error.
    pub fn default_severity(self) -> Severity {
        match self {
            Self::DerivationSignatureNotPermutable | Self::VectorUnexpectedDimension => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    /// Wire ID of this code.
    pub fn id(self) -> &'static str {
        match self {
            Self::DuplicateListing => "DuplicateListing",
            Self::EmptyList => "EmptyList",
            Self::UnrecognizedEnumValue => "UnrecognizedEnumValue",
            Self::TypeAlreadyDefined => "TypeAlreadyDefined",
            Self::TypeNotBiasedScalar => "TypeNotBiasedScalar",
            Self::TypeNotQuantity => "TypeNotQuantity",
            Self::TypeNotScalar => "TypeNotScalar",
            Self::TypeNotUnit => "TypeNotUnit",
            Self::TypeNotVector => "TypeNotVector",
            Self::TypeNotVectorGroup => "TypeNotVectorGroup",
            Self::CyclicallySpecializedType => "CyclicallySpecializedType",
            Self::InvalidUnitInstanceName => "InvalidUnitInstanceName",
            Self::InvalidUnitPluralForm => "InvalidUnitPluralForm",
            Self::DuplicateUnitName => "DuplicateUnitName",
            Self::DuplicateUnitPluralForm => "DuplicateUnitPluralForm",
            Self::UnrecognizedUnitInstanceName => "UnrecognizedUnitInstanceName",
            Self::CyclicallyModifiedUnitInstances => "CyclicallyModifiedUnitInstances",
            Self::BiasedUnitDefinedButUnitNotBiased => "BiasedUnitDefinedButUnitNotBiased",
            Self::InvalidBiasedUnitExpression => "InvalidBiasedUnitExpression",
            Self::InvalidDerivationExpression => "InvalidDerivationExpression",
            Self::InvalidDerivationSignature => "InvalidDerivationSignature",
            Self::AmbiguousDerivationSignatureNotSpecified => {
                "AmbiguousDerivationSignatureNotSpecified"
            }
            Self::MultipleDerivationSignaturesButNotNamed => {
                "MultipleDerivationSignaturesButNotNamed"
            }
            Self::DerivationSignatureNotPermutable => "DerivationSignatureNotPermutable",
            Self::DuplicateUnitDerivationId => "DuplicateUnitDerivationID",
            Self::DuplicateUnitDerivationSignature => "DuplicateUnitDerivationSignature",
            Self::ExpressionDoesNotIncludeUnit => "ExpressionDoesNotIncludeUnit",
            Self::UnmatchedDerivationExpressionUnit => "UnmatchedDerivationExpressionUnit",
            Self::IncompatibleDerivedUnitListSize => "IncompatibleDerivedUnitListSize",
            Self::UnrecognizedUnitDerivationId => "UnrecognizedUnitDerivationID",
            Self::UnitNotDerivable => "UnitNotDerivable",
            Self::DerivableUnitShouldNotUseFixed => "DerivableUnitShouldNotUseFixed",
            Self::UnitWithBiasTermCannotBeDerived => "UnitWithBiasTermCannotBeDerived",
            Self::UnitNotIncludingBiasTerm => "UnitNotIncludingBiasTerm",
            Self::InvalidConstantName => "InvalidConstantName",
            Self::DuplicateConstantName => "DuplicateConstantName",
            Self::InvalidVectorDimension => "InvalidVectorDimension",
            Self::VectorUnexpectedDimension => "VectorUnexpectedDimension",
            Self::VectorGroupAlreadyContainsDimension => "VectorGroupAlreadyContainsDimension",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}
