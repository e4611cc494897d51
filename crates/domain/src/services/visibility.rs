//! Conditional visibility of dependent settings.
//!
//! Governing booleans gate groups of dependent fields. The relations are
//! declared once in [`SETTINGS_DEPENDENCIES`] and evaluated by a single
//! generic resolver: a field is active when it is ungoverned, or when its
//! governor is itself active and currently true.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::models::{FormValues, SettingField};

/// Deepest allowed governor chain (a boolean gating a nested boolean).
pub const MAX_DEPENDENCY_DEPTH: usize = 2;

/// One governing boolean and the fields it gates.
#[derive(Debug, Clone, Copy)]
pub struct DependencyRule {
    pub governor: SettingField,
    pub dependents: &'static [SettingField],
}

/// Governor → dependents relations of the settings screen.
pub const SETTINGS_DEPENDENCIES: &[DependencyRule] = &[
    DependencyRule {
        governor: SettingField::PermitCancellations,
        dependents: &[SettingField::CancellationDeadline],
    },
    DependencyRule {
        governor: SettingField::PermitMakeUpCredits,
        dependents: &[
            SettingField::ExpireMakeUpCredits,
            SettingField::LimitTotalMakeUpCredits,
            SettingField::IssueMakeUpCreditBeforeDeadline,
        ],
    },
    DependencyRule {
        governor: SettingField::ExpireMakeUpCredits,
        dependents: &[SettingField::MaxCreditAge],
    },
    DependencyRule {
        governor: SettingField::LimitTotalMakeUpCredits,
        dependents: &[SettingField::MaxTotalMakeUpCredits],
    },
    DependencyRule {
        governor: SettingField::PermitEventRegistration,
        dependents: &[SettingField::EventRegistrationDeadline],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyTableError {
    #[error("{0} is governed by more than one field")]
    MultipleGovernors(SettingField),

    #[error("{0} is a non-boolean governor")]
    NotBoolean(SettingField),

    #[error("governor chain through {0} forms a cycle")]
    Cycle(SettingField),

    #[error("{field} is nested {depth} levels deep (max {max})", max = MAX_DEPENDENCY_DEPTH)]
    TooDeep { field: SettingField, depth: usize },
}

/// Validated governor relations. Guaranteed acyclic and at most
/// [`MAX_DEPENDENCY_DEPTH`] deep.
#[derive(Debug, Clone)]
pub struct DependencyTable {
    governor_of: BTreeMap<SettingField, SettingField>,
}

lazy_static::lazy_static! {
    static ref SETTINGS_TABLE: DependencyTable = DependencyTable::new(SETTINGS_DEPENDENCIES)
        .expect("settings dependency table must be a shallow tree");
}

impl DependencyTable {
    pub fn new(rules: &[DependencyRule]) -> Result<Self, DependencyTableError> {
        let mut governor_of = BTreeMap::new();
        for rule in rules {
            if !rule.governor.is_boolean() {
                return Err(DependencyTableError::NotBoolean(rule.governor));
            }
            for dependent in rule.dependents {
                if governor_of.insert(*dependent, rule.governor).is_some() {
                    return Err(DependencyTableError::MultipleGovernors(*dependent));
                }
            }
        }

        let table = Self { governor_of };
        for field in table.governor_of.keys() {
            table.checked_depth(*field)?;
        }
        Ok(table)
    }

    /// The table of the studio settings screen.
    pub fn settings() -> &'static DependencyTable {
        &SETTINGS_TABLE
    }

    pub fn governor_of(&self, field: SettingField) -> Option<SettingField> {
        self.governor_of.get(&field).copied()
    }

    pub fn dependents_of(&self, governor: SettingField) -> Vec<SettingField> {
        self.governor_of
            .iter()
            .filter(|(_, g)| **g == governor)
            .map(|(dependent, _)| *dependent)
            .collect()
    }

    /// Number of governors above `field`.
    pub fn depth(&self, field: SettingField) -> usize {
        let mut depth = 0;
        let mut current = field;
        while let Some(governor) = self.governor_of(current) {
            depth += 1;
            current = governor;
        }
        depth
    }

    fn checked_depth(&self, field: SettingField) -> Result<usize, DependencyTableError> {
        let mut seen = BTreeSet::from([field]);
        let mut depth = 0;
        let mut current = field;
        while let Some(governor) = self.governor_of(current) {
            if !seen.insert(governor) {
                return Err(DependencyTableError::Cycle(field));
            }
            depth += 1;
            current = governor;
        }
        if depth > MAX_DEPENDENCY_DEPTH {
            return Err(DependencyTableError::TooDeep { field, depth });
        }
        Ok(depth)
    }

    pub fn is_active(&self, field: SettingField, values: &FormValues) -> bool {
        match self.governor_of(field) {
            None => true,
            Some(governor) => values.is_true(governor) && self.is_active(governor, values),
        }
    }

    pub fn resolve(&self, values: &FormValues) -> ActiveFields {
        ActiveFields(
            SettingField::ALL
                .into_iter()
                .filter(|field| self.is_active(*field, values))
                .collect(),
        )
    }
}

/// Fields currently shown and enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFields(BTreeSet<SettingField>);

impl ActiveFields {
    pub fn contains(&self, field: SettingField) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = SettingField> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves the active fields of the settings screen for `values`.
pub fn resolve_active_fields(values: &FormValues) -> ActiveFields {
    DependencyTable::settings().resolve(values)
}
