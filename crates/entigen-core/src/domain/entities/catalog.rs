//! Enum lookup for one generation batch.

use std::collections::{HashMap, HashSet};

use crate::domain::{
    entities::{
        entity::Entity,
        enum_definition::{EnumDefinition, EnumId},
    },
    error::DomainError,
};

/// Index of a batch's enum definitions by identity.
///
/// Borrowed for the duration of one generation; the definitions themselves
/// stay owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct EnumCatalog<'a> {
    by_id: HashMap<EnumId, &'a EnumDefinition>,
}

impl<'a> EnumCatalog<'a> {
    pub fn new(enums: &'a [EnumDefinition]) -> Self {
        Self {
            by_id: enums.iter().map(|e| (e.id, e)).collect(),
        }
    }

    pub fn get(&self, id: EnumId) -> Option<&'a EnumDefinition> {
        self.by_id.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolve every property's enum reference, in property order.
    ///
    /// Properties without a reference resolve to `None`; a reference that is
    /// not in the catalog fails instead of degrading to "no enum".
    pub fn resolve(
        &self,
        entity: &Entity,
    ) -> Result<Vec<Option<&'a EnumDefinition>>, DomainError> {
        entity
            .properties
            .iter()
            .map(|property| match property.enum_ref {
                None => Ok(None),
                Some(id) => self.get(id).map(Some).ok_or_else(|| {
                    DomainError::UnresolvedEnumReference {
                        entity: entity.name.clone(),
                        property: property.name.clone(),
                    }
                }),
            })
            .collect()
    }
}

/// Enums referenced directly by `entity`, taken from `pool`.
///
/// Order is first reference in property order; each enum appears once.
/// References missing from the pool are skipped here and surface later as
/// [`DomainError::UnresolvedEnumReference`] when the entity is rendered.
pub fn enum_closure<'a>(entity: &Entity, pool: &'a [EnumDefinition]) -> Vec<&'a EnumDefinition> {
    let catalog = EnumCatalog::new(pool);
    let mut seen = HashSet::new();

    entity
        .enum_refs()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| catalog.get(id))
        .collect()
}
