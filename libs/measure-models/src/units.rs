//! Raw unit declarations
//!
//! A unit declaration carries the unit's identity, the scalar quantity it
//! measures, a bias-capability flag, its instance declarations and its
//! derivation signatures. Instance definitions reference other instances of
//! the same unit by name; binding those references is the resolver's job.

use crate::derivations::DerivationDeclaration;
use crate::identity::{SourceRef, TypeIdentity};
use serde::{Deserialize, Serialize};

/// One declared unit type, unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDeclaration {
    pub identity: TypeIdentity,

    /// The scalar quantity this unit measures.
    pub quantity: TypeIdentity,

    /// Whether instances of this unit may carry a bias term (as degrees
    /// Celsius are biased against kelvin).
    #[serde(default)]
    pub bias_term: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<UnitInstanceDeclaration>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivations: Vec<DerivationDeclaration>,

    pub location: SourceRef,
}

/// One declared unit instance, unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInstanceDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural_form: Option<String>,

    pub definition: UnitInstanceDefinition,

    pub location: SourceRef,
}

impl UnitInstanceDeclaration {
    pub fn new(
        name: impl Into<String>,
        plural_form: impl Into<String>,
        definition: UnitInstanceDefinition,
        location: SourceRef,
    ) -> Self {
        Self {
            name: Some(name.into()),
            plural_form: Some(plural_form.into()),
            definition,
            location,
        }
    }
}

/// How a unit instance is defined. Every variant except `Fixed` and
/// `Derived` names one other instance of the same unit it is modified from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnitInstanceDefinition {
    /// Anchor instance with no dependencies.
    Fixed,

    /// Another name for an existing instance.
    Alias {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original: Option<String>,
    },

    /// An existing instance scaled by a constant factor.
    Scaled {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original: Option<String>,
        factor: f64,
    },

    /// An existing instance scaled by a metric or binary prefix. The prefix
    /// arrives as a name and is resolved against the known prefix sets.
    Prefixed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
    },

    /// An existing instance offset by a bias, given either as a number or as
    /// an expression over the original instance.
    Biased {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        original: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expression: Option<String>,
    },

    /// An instance derived from instances of other units, according to one of
    /// the unit's derivation signatures.
    Derived {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        derivation_id: Option<String>,
        /// Names of the source instances, one per signature element.
        #[serde(default)]
        units: Vec<String>,
    },
}

impl UnitInstanceDefinition {
    /// Name of the instance this definition is modified from, if any.
    pub fn original(&self) -> Option<&str> {
        match self {
            Self::Alias { original }
            | Self::Scaled { original, .. }
            | Self::Prefixed { original, .. }
            | Self::Biased { original, .. } => original.as_deref(),
            Self::Fixed | Self::Derived { .. } => None,
        }
    }

    /// Whether this definition is a modification of another instance.
    pub fn is_modified(&self) -> bool {
        !matches!(self, Self::Fixed | Self::Derived { .. })
    }
}

/// Metric prefixes, yotta through yocto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricPrefix {
    Yotta,
    Zetta,
    Exa,
    Peta,
    Tera,
    Giga,
    Mega,
    Kilo,
    Hecto,
    Deca,
    Deci,
    Centi,
    Milli,
    Micro,
    Nano,
    Pico,
    Femto,
    Atto,
    Zepto,
    Yocto,
}

impl MetricPrefix {
    /// Base-ten exponent of the prefix.
    pub fn exponent(self) -> i32 {
        match self {
            Self::Yotta => 24,
            Self::Zetta => 21,
            Self::Exa => 18,
            Self::Peta => 15,
            Self::Tera => 12,
            Self::Giga => 9,
            Self::Mega => 6,
            Self::Kilo => 3,
            Self::Hecto => 2,
            Self::Deca => 1,
            Self::Deci => -1,
            Self::Centi => -2,
            Self::Milli => -3,
            Self::Micro => -6,
            Self::Nano => -9,
            Self::Pico => -12,
            Self::Femto => -15,
            Self::Atto => -18,
            Self::Zepto => -21,
            Self::Yocto => -24,
        }
    }

    pub fn factor(self) -> f64 {
        10f64.powi(self.exponent())
    }

    pub fn parse_name(name: &str) -> Option<Self> {
        let prefix = match name.to_ascii_lowercase().as_str() {
            "yotta" => Self::Yotta,
            "zetta" => Self::Zetta,
            "exa" => Self::Exa,
            "peta" => Self::Peta,
            "tera" => Self::Tera,
            "giga" => Self::Giga,
            "mega" => Self::Mega,
            "kilo" => Self::Kilo,
            "hecto" => Self::Hecto,
            "deca" => Self::Deca,
            "deci" => Self::Deci,
            "centi" => Self::Centi,
            "milli" => Self::Milli,
            "micro" => Self::Micro,
            "nano" => Self::Nano,
            "pico" => Self::Pico,
            "femto" => Self::Femto,
            "atto" => Self::Atto,
            "zepto" => Self::Zepto,
            "yocto" => Self::Yocto,
            _ => return None,
        };
        Some(prefix)
    }
}

/// Binary prefixes, kibi through yobi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryPrefix {
    Kibi,
    Mebi,
    Gibi,
    Tebi,
    Pebi,
    Exbi,
    Zebi,
    Yobi,
}

impl BinaryPrefix {
    /// Base-two exponent of the prefix.
    pub fn exponent(self) -> i32 {
        match self {
            Self::Kibi => 10,
            Self::Mebi => 20,
            Self::Gibi => 30,
            Self::Tebi => 40,
            Self::Pebi => 50,
            Self::Exbi => 60,
            Self::Zebi => 70,
            Self::Yobi => 80,
        }
    }

    pub fn factor(self) -> f64 {
        2f64.powi(self.exponent())
    }

    pub fn parse_name(name: &str) -> Option<Self> {
        let prefix = match name.to_ascii_lowercase().as_str() {
            "kibi" => Self::Kibi,
            "mebi" => Self::Mebi,
            "gibi" => Self::Gibi,
            "tebi" => Self::Tebi,
            "pebi" => Self::Pebi,
            "exbi" => Self::Exbi,
            "zebi" => Self::Zebi,
            "yobi" => Self::Yobi,
            _ => return None,
        };
        Some(prefix)
    }
}

/// A resolved prefix, metric or binary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Prefix {
    Metric(MetricPrefix),
    Binary(BinaryPrefix),
}

impl Prefix {
    pub fn factor(self) -> f64 {
        match self {
            Self::Metric(prefix) => prefix.factor(),
            Self::Binary(prefix) => prefix.factor(),
        }
    }

    /// Resolve a prefix name against the metric set first, then the binary
    /// set.
    pub fn parse_name(name: &str) -> Option<Self> {
        MetricPrefix::parse_name(name)
            .map(Self::Metric)
            .or_else(|| BinaryPrefix::parse_name(name).map(Self::Binary))
    }
}
