//! RAP Model Catalog
//!
//! Every entity and nested value type of the RAP vocabulary, declared once
//! as a [`ModelDef`] and collected into a flat, name-keyed [`ModelCatalog`].
//! Definitions reference each other by catalog name; the catalog checks that
//! every reference resolves before anything projects or validates against it.

pub mod aggregate;
pub mod api_descriptor;
pub mod collection;
pub mod common;
pub mod descriptor;
pub mod measurements;
pub mod participant;
pub mod research_product;
pub mod vector_data;

use std::collections::{HashMap, HashSet};

pub use descriptor::{format_literals, Constraints, ExtraPolicy, FieldDef, ModelDef, TypeDesc};

use crate::error::DefinitionError;

// =============================================================================
// Catalog
// =============================================================================

/// Immutable, name-keyed set of definitions
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    definitions: HashMap<&'static str, ModelDef>,
    /// Declaration order, kept for stable iteration
    order: Vec<&'static str>,
}

impl ModelCatalog {
    /// Build a catalog, rejecting duplicate names
    pub fn from_definitions(defs: Vec<ModelDef>) -> Result<Self, DefinitionError> {
        let mut definitions = HashMap::with_capacity(defs.len());
        let mut order = Vec::with_capacity(defs.len());

        for def in defs {
            let name = def.name;
            if definitions.insert(name, def).is_some() {
                return Err(DefinitionError::DuplicateDefinition(name.to_string()));
            }
            order.push(name);
        }

        Ok(Self { definitions, order })
    }

    /// The RAP vocabulary, built and verified
    pub fn standard() -> Result<Self, DefinitionError> {
        let catalog = Self::from_definitions(standard_definitions())?;
        catalog.verify()?;
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&ModelDef> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Definitions in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ModelDef> {
        self.order.iter().filter_map(move |name| self.definitions.get(name))
    }

    /// Check the catalog is internally consistent.
    ///
    /// Every referenced definition must exist, wire names must be unique
    /// within a definition, and every tagged-union variant must declare the
    /// discriminator field as a literal.
    pub fn verify(&self) -> Result<(), DefinitionError> {
        for def in self.iter() {
            let mut seen: HashMap<&str, &str> = HashMap::new();
            for field in &def.fields {
                if let Some(first) = seen.insert(field.wire_name(), field.name) {
                    return Err(DefinitionError::ConflictingAlias {
                        definition: def.name.to_string(),
                        wire_name: field.wire_name().to_string(),
                        first: first.to_string(),
                        second: field.name.to_string(),
                    });
                }

                for target in field.ty.references() {
                    if !self.contains(target) {
                        return Err(DefinitionError::UndeclaredReference {
                            definition: def.name.to_string(),
                            field: field.wire_name().to_string(),
                            target: target.to_string(),
                        });
                    }
                }

                if let TypeDesc::Tagged { discriminator, variants } = &field.ty {
                    self.verify_tagged(def.name, field.wire_name(), discriminator, variants)?;
                }
            }
        }
        Ok(())
    }

    fn verify_tagged(
        &self,
        definition: &str,
        field: &str,
        discriminator: &str,
        variants: &[&'static str],
    ) -> Result<(), DefinitionError> {
        let mut tags = HashSet::new();
        for variant in variants {
            let literal = self
                .get(variant)
                .and_then(|v| v.wire_field(discriminator))
                .and_then(|f| f.literal_values());
            // Each variant needs exactly one tag, and no two variants may share it
            let ok = match literal {
                Some([tag]) => tags.insert(*tag),
                _ => false,
            };
            if !ok {
                return Err(DefinitionError::MissingDiscriminator {
                    definition: definition.to_string(),
                    field: field.to_string(),
                    variant: variant.to_string(),
                    discriminator: discriminator.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Definitions reachable from `root`, `root` first, then in first-reference order
    pub fn reachable(&self, root: &str) -> Vec<&ModelDef> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.visit(root, &mut seen, &mut out);
        out
    }

    fn visit<'a>(&'a self, name: &str, seen: &mut HashSet<&'a str>, out: &mut Vec<&'a ModelDef>) {
        let Some(def) = self.get(name) else { return };
        if !seen.insert(def.name) {
            return;
        }
        out.push(def);
        for field in &def.fields {
            for target in field.ty.references() {
                self.visit(target, seen, out);
            }
        }
    }
}

/// All RAP definitions, grouped by the module that declares them
pub fn standard_definitions() -> Vec<ModelDef> {
    let mut defs = Vec::new();
    defs.extend(common::definitions());
    defs.extend(measurements::definitions());
    defs.extend(vector_data::definitions());
    defs.extend(research_product::definitions());
    defs.extend(participant::definitions());
    defs.extend(collection::definitions());
    defs.extend(aggregate::definitions());
    defs.extend(api_descriptor::definitions());
    defs
}
