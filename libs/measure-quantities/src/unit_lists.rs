//! Unit inclusion and exclusion lists
//!
//! A quantity's effective unit set starts from everything the owning unit
//! instantiates, or from the inherited set when the type is a specialization
//! that inherits unit lists. Lists then apply in declaration order: the first
//! inclusion replaces the set outright, further inclusions combine according
//! to their own stacking mode, and exclusions always subtract.

use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{InclusionStackingMode, UnitListDeclaration, UnitListOperation};
use mensura_units::UnitType;
use std::collections::BTreeSet;

/// Apply one type's unit lists on top of `start`, which is either the owning
/// unit's full instance set or the inherited effective set.
pub fn apply_unit_lists(
    start: BTreeSet<String>,
    unit: &UnitType,
    lists: &[UnitListDeclaration],
) -> Validated<BTreeSet<String>> {
    let mut result = Validated::ok(start);
    let mut inclusion_seen = false;

    for list in lists {
        let Some(names) = listed_names(list, unit, &mut result.diagnostics) else {
            continue;
        };

        match list.operation {
            UnitListOperation::Include { stacking } => {
                if !inclusion_seen {
                    result.value = names;
                    inclusion_seen = true;
                } else {
                    match stacking {
                        InclusionStackingMode::Unify => result.value.extend(names),
                        InclusionStackingMode::Intersect => {
                            result.value = result.value.intersection(&names).cloned().collect();
                        }
                    }
                }
            }
            UnitListOperation::Exclude => {
                for name in &names {
                    result.value.remove(name);
                }
            }
        }
    }

    result
}

/// Validate one list declaration and return the recognized names. `None`
/// when the list is empty or absent, which never contributes.
fn listed_names(
    list: &UnitListDeclaration,
    unit: &UnitType,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<BTreeSet<String>> {
    let units = match &list.units {
        Some(units) if !units.is_empty() => units,
        _ => {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::EmptyList,
                "the list of unit instances must be populated",
                list.location.clone(),
            ));
            return None;
        }
    };

    let mut names = BTreeSet::new();

    for (index, name) in units.iter().enumerate() {
        if names.contains(name) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::DuplicateListing,
                format!("\"{name}\" is already listed"),
                list.location.clone().index(index),
            ));
            continue;
        }

        if unit.instance(name).is_none() {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::UnrecognizedUnitInstanceName,
                format!("{} does not define an instance named \"{name}\"", unit.identity),
                list.location.clone().index(index),
            ));
            continue;
        }

        names.insert(name.clone());
    }

    Some(names)
}
