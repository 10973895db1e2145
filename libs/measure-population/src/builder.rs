//! The resolution pipeline
//!
//! Units resolve first, since every quantity is validated against its owning
//! unit. Each quantity family then resolves bases before specializations: an
//! iterative fixed point picks up every specialization whose original has
//! settled, and whatever remains afterwards is either part of a
//! specialization cycle or downstream of a failure that already carries its
//! diagnostic.

use crate::cancellation::CancellationToken;
use crate::index::{DeclarationIndex, DeclarationKind};
use crate::{Population, Resolution};
use mensura_diagnostics::{Diagnostic, DiagnosticCode, Validated};
use mensura_models::{
    DeclarationSet, QuantityBasis, ScalarDeclaration, SourceRef, TypeIdentity, VectorDeclaration,
    VectorGroupDeclaration,
};
use mensura_quantities::{diagnose_chain, resolve_scalar, ChainFailure, ResolvedScalar};
use mensura_units::{resolve_unit, UnitType};
use mensura_vectors::{
    resolve_group, resolve_group_member, resolve_vector, ResolvedVector, ResolvedVectorGroup,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Resolve one declaration set into a population and its diagnostics.
///
/// Cancellation is checked between top-level resolutions; a cancelled run
/// returns whatever had settled by then, still internally consistent.
pub fn resolve(declarations: &DeclarationSet, cancellation: &CancellationToken) -> Resolution {
    let mut population = Population::default();
    let mut diagnostics = Vec::new();

    let index = DeclarationIndex::new(declarations);

    debug!(count = declarations.units.len(), "resolving units");
    let mut seen = HashSet::new();
    for declaration in &declarations.units {
        if cancellation.is_cancelled() {
            return Resolution { population, diagnostics };
        }

        if !index.is(&declaration.identity, DeclarationKind::Unit)
            || !seen.insert(&declaration.identity)
        {
            record_duplicate(
                &declaration.identity,
                &declaration.location,
                &mut population.duplicate_types,
                &mut diagnostics,
            );
            continue;
        }

        let unit = resolve_unit(declaration, |identity| {
            index.is(identity, DeclarationKind::Scalar)
        })
        .drain_into(&mut diagnostics);

        if let Some(unit) = unit {
            population.units.insert(declaration.identity.clone(), unit);
        }
    }

    debug!(count = declarations.scalars.len(), "resolving scalars");
    population.scalars = resolve_family(
        &declarations.scalars,
        DeclarationKind::Scalar,
        &population.units,
        &index,
        cancellation,
        &mut population.duplicate_types,
        &mut diagnostics,
    );

    debug!(count = declarations.vectors.len(), "resolving vectors");
    population.vectors = resolve_family(
        &declarations.vectors,
        DeclarationKind::Vector,
        &population.units,
        &index,
        cancellation,
        &mut population.duplicate_types,
        &mut diagnostics,
    );

    debug!(count = declarations.groups.len(), "resolving vector groups");
    population.groups = resolve_family(
        &declarations.groups,
        DeclarationKind::VectorGroup,
        &population.units,
        &index,
        cancellation,
        &mut population.duplicate_types,
        &mut diagnostics,
    );

    let mut group_by_identity: HashMap<&TypeIdentity, &VectorGroupDeclaration> = HashMap::new();
    for group in &declarations.groups {
        if index.is(&group.identity, DeclarationKind::VectorGroup) {
            group_by_identity.entry(&group.identity).or_insert(group);
        }
    }
    for identity in population.groups.keys() {
        if let Some(base) = ground_base(identity, &group_by_identity) {
            population.members_by_group.entry(base.clone()).or_default();
            population.group_bases.insert(identity.clone(), base);
        }
    }

    debug!(count = declarations.group_members.len(), "resolving group members");
    let mut seen = HashSet::new();
    for declaration in &declarations.group_members {
        if cancellation.is_cancelled() {
            return Resolution { population, diagnostics };
        }

        if !index.is(&declaration.identity, DeclarationKind::GroupMember)
            || !seen.insert(&declaration.identity)
        {
            record_duplicate(
                &declaration.identity,
                &declaration.location,
                &mut population.duplicate_types,
                &mut diagnostics,
            );
            continue;
        }

        if !index.is(&declaration.group, DeclarationKind::VectorGroup) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::TypeNotVectorGroup,
                format!(
                    "expected a vector group, but {} is not declared as one",
                    declaration.group
                ),
                declaration.location.clone().argument("group"),
            ));
            continue;
        }

        // A group that failed to resolve already carries its diagnostics.
        let Some(group) = population.groups.get(&declaration.group) else {
            continue;
        };
        let Some(unit) = population.units.get(&group.unit) else {
            continue;
        };
        let Some(base) = population.group_bases.get(&declaration.group).cloned() else {
            continue;
        };

        let Some(member) = resolve_group_member(declaration, unit).drain_into(&mut diagnostics)
        else {
            continue;
        };

        let registered = population.members_by_group.entry(base).or_default();
        if registered.contains_key(&member.dimension) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::VectorGroupAlreadyContainsDimension,
                format!(
                    "{} already contains a member of dimension {}",
                    declaration.group, member.dimension
                ),
                declaration.location.clone().argument("dimension"),
            ));
            continue;
        }

        registered.insert(member.dimension, member.identity.clone());
        population.group_members.insert(member.identity.clone(), member);
    }

    debug!(
        diagnostics = diagnostics.len(),
        "resolution pass complete"
    );
    Resolution { population, diagnostics }
}

/// Diagnose one later declaration of an already-taken identity, at its own
/// position in declaration order, and record the site.
fn record_duplicate(
    identity: &TypeIdentity,
    location: &SourceRef,
    duplicates: &mut BTreeMap<TypeIdentity, Vec<SourceRef>>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    diagnostics.push(Diagnostic::new(
        DiagnosticCode::TypeAlreadyDefined,
        format!("{identity} is already defined"),
        location.clone(),
    ));
    duplicates
        .entry(identity.clone())
        .or_default()
        .push(location.clone());
}

/// One quantity family (scalars, vectors or vector groups) as seen by the
/// bases-first fixed point.
trait Specializable {
    type Resolved;

    const MISSING_CODE: DiagnosticCode;
    const DESCRIPTOR: &'static str;

    fn identity(&self) -> &TypeIdentity;
    fn basis(&self) -> &QuantityBasis;
    fn location(&self) -> &SourceRef;

    fn unit_of(resolved: &Self::Resolved) -> &TypeIdentity;

    fn resolve(
        &self,
        index: &DeclarationIndex,
        unit: &UnitType,
        original: Option<&Self::Resolved>,
    ) -> Validated<Option<Self::Resolved>>;
}

/// Resolve one family: bases directly, specializations once their original
/// has settled, and diagnose whatever never settles. Duplicate identities
/// are diagnosed inline, where they appear in the list.
fn resolve_family<'a, D: Specializable>(
    declarations: &'a [D],
    kind: DeclarationKind,
    units: &BTreeMap<TypeIdentity, UnitType>,
    index: &DeclarationIndex,
    cancellation: &CancellationToken,
    duplicates: &mut BTreeMap<TypeIdentity, Vec<SourceRef>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> BTreeMap<TypeIdentity, D::Resolved> {
    let mut resolved: BTreeMap<TypeIdentity, D::Resolved> = BTreeMap::new();
    let mut failed: HashSet<&'a TypeIdentity> = HashSet::new();
    let mut pending: Vec<&'a D> = Vec::new();

    let mut seen = HashSet::new();
    let mut by_identity: HashMap<&TypeIdentity, &D> = HashMap::new();

    for declaration in declarations {
        if cancellation.is_cancelled() {
            return resolved;
        }

        if !index.is(declaration.identity(), kind) || !seen.insert(declaration.identity()) {
            record_duplicate(
                declaration.identity(),
                declaration.location(),
                duplicates,
                diagnostics,
            );
            continue;
        }
        by_identity.insert(declaration.identity(), declaration);

        let unit = match declaration.basis() {
            QuantityBasis::Base { unit } => unit,
            QuantityBasis::Specialization { .. } => {
                pending.push(declaration);
                continue;
            }
        };

        if !index.is(unit, DeclarationKind::Unit) {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::TypeNotUnit,
                format!("expected a unit, but {unit} is not declared as one"),
                declaration.location().clone().argument("unit"),
            ));
            failed.insert(declaration.identity());
            continue;
        }

        match units.get(unit) {
            Some(unit) => {
                match declaration.resolve(index, unit, None).drain_into(diagnostics) {
                    Some(value) => {
                        resolved.insert(declaration.identity().clone(), value);
                    }
                    None => {
                        failed.insert(declaration.identity());
                    }
                }
            }
            // The unit is declared but failed to resolve; its diagnostics
            // were emitted with it.
            None => {
                failed.insert(declaration.identity());
            }
        }
    }

    loop {
        let mut progressed = false;
        let mut still = Vec::new();

        for declaration in pending {
            if cancellation.is_cancelled() {
                return resolved;
            }

            let Some(original) = declaration.basis().original() else {
                continue;
            };

            if failed.contains(original) {
                failed.insert(declaration.identity());
                progressed = true;
                continue;
            }

            let outcome = match resolved.get(original) {
                Some(resolved_original) => {
                    let Some(unit) = units.get(D::unit_of(resolved_original)) else {
                        continue;
                    };
                    declaration
                        .resolve(index, unit, Some(resolved_original))
                        .drain_into(diagnostics)
                }
                None => {
                    still.push(declaration);
                    continue;
                }
            };

            progressed = true;
            match outcome {
                Some(value) => {
                    resolved.insert(declaration.identity().clone(), value);
                }
                None => {
                    failed.insert(declaration.identity());
                }
            }
        }

        pending = still;
        if !progressed || pending.is_empty() {
            break;
        }
    }

    // Whatever never settled has a broken chain of originals.
    for declaration in pending {
        let failure = diagnose_chain(declaration.identity(), |identity| {
            by_identity
                .get(identity)
                .map(|declaration| declaration.basis().original().cloned())
        });

        match failure {
            ChainFailure::MissingOriginal(named) => diagnostics.push(Diagnostic::new(
                D::MISSING_CODE,
                format!(
                    "expected a {}, but {named} is not declared as one",
                    D::DESCRIPTOR
                ),
                declaration.location().clone().argument("original"),
            )),
            ChainFailure::Cycle => diagnostics.push(Diagnostic::new(
                DiagnosticCode::CyclicallySpecializedType,
                format!(
                    "the chain of specialized types containing {} is cyclic",
                    declaration.identity()
                ),
                declaration.location().clone().argument("original"),
            )),
            ChainFailure::Upstream => {}
        }
    }

    resolved
}

fn quantity_check(
    index: &DeclarationIndex,
) -> impl FnMut(&TypeIdentity) -> Option<DiagnosticCode> + '_ {
    move |identity| {
        if index.is_quantity(identity) {
            None
        } else {
            Some(DiagnosticCode::TypeNotQuantity)
        }
    }
}

fn conversion_check(
    index: &DeclarationIndex,
    expected: DeclarationKind,
    mismatch: DiagnosticCode,
) -> impl FnMut(&TypeIdentity) -> Option<DiagnosticCode> + '_ {
    move |identity| match index.kind(identity) {
        Some(kind) if kind == expected => None,
        Some(_) => Some(mismatch),
        None => Some(DiagnosticCode::TypeNotQuantity),
    }
}

impl Specializable for ScalarDeclaration {
    type Resolved = ResolvedScalar;

    const MISSING_CODE: DiagnosticCode = DiagnosticCode::TypeNotScalar;
    const DESCRIPTOR: &'static str = "scalar quantity";

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn basis(&self) -> &QuantityBasis {
        &self.basis
    }

    fn location(&self) -> &SourceRef {
        &self.location
    }

    fn unit_of(resolved: &ResolvedScalar) -> &TypeIdentity {
        &resolved.unit
    }

    fn resolve(
        &self,
        index: &DeclarationIndex,
        unit: &UnitType,
        original: Option<&ResolvedScalar>,
    ) -> Validated<Option<ResolvedScalar>> {
        resolve_scalar(
            self,
            unit,
            original,
            quantity_check(index),
            conversion_check(index, DeclarationKind::Scalar, DiagnosticCode::TypeNotScalar),
        )
        .map(Some)
    }
}

impl Specializable for VectorDeclaration {
    type Resolved = ResolvedVector;

    const MISSING_CODE: DiagnosticCode = DiagnosticCode::TypeNotVector;
    const DESCRIPTOR: &'static str = "vector quantity";

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn basis(&self) -> &QuantityBasis {
        &self.basis
    }

    fn location(&self) -> &SourceRef {
        &self.location
    }

    fn unit_of(resolved: &ResolvedVector) -> &TypeIdentity {
        &resolved.unit
    }

    fn resolve(
        &self,
        index: &DeclarationIndex,
        unit: &UnitType,
        original: Option<&ResolvedVector>,
    ) -> Validated<Option<ResolvedVector>> {
        resolve_vector(
            self,
            unit,
            original,
            quantity_check(index),
            conversion_check(index, DeclarationKind::Vector, DiagnosticCode::TypeNotVector),
        )
    }
}

impl Specializable for VectorGroupDeclaration {
    type Resolved = ResolvedVectorGroup;

    const MISSING_CODE: DiagnosticCode = DiagnosticCode::TypeNotVectorGroup;
    const DESCRIPTOR: &'static str = "vector group";

    fn identity(&self) -> &TypeIdentity {
        &self.identity
    }

    fn basis(&self) -> &QuantityBasis {
        &self.basis
    }

    fn location(&self) -> &SourceRef {
        &self.location
    }

    fn unit_of(resolved: &ResolvedVectorGroup) -> &TypeIdentity {
        &resolved.unit
    }

    fn resolve(
        &self,
        index: &DeclarationIndex,
        unit: &UnitType,
        original: Option<&ResolvedVectorGroup>,
    ) -> Validated<Option<ResolvedVectorGroup>> {
        resolve_group(
            self,
            unit,
            original,
            quantity_check(index),
            conversion_check(
                index,
                DeclarationKind::VectorGroup,
                DiagnosticCode::TypeNotVectorGroup,
            ),
        )
        .map(Some)
    }
}

/// Ground a resolved group's identity to the base of its specialization
/// chain. Resolved groups always ground; the step bound only guards against
/// inconsistent input.
fn ground_base(
    start: &TypeIdentity,
    by_identity: &HashMap<&TypeIdentity, &VectorGroupDeclaration>,
) -> Option<TypeIdentity> {
    let mut current = start;

    for _ in 0..=by_identity.len() {
        let declaration = by_identity.get(current)?;
        match declaration.basis.original() {
            Some(original) => current = original,
            None => return Some(current.clone()),
        }
    }

    None
}
