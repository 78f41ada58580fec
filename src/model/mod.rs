//! The in-memory class model for one conversion run.
//!
//! `Model` is the mutable aggregate the front-ends and the relationship
//! engine fill in. [`assembler::Assembler`] turns it into a frozen
//! [`assembler::AssembledModel`] with stable identifiers.

pub mod assembler;

use std::collections::HashMap;

use tracing::warn;

use crate::extractors::base::{Relationship, TypeDeclaration};
use crate::typeref::PRIMITIVE_TYPES;

pub use assembler::{AssembledModel, Assembler, IdRegistry, TypeRef};

/// Types keyed by unique name, in first-seen order, plus relationships
#[derive(Debug, Clone, Default)]
pub struct Model {
    name: String,
    types: Vec<TypeDeclaration>,
    index: HashMap<String, usize>,
    relationships: Vec<Relationship>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a declaration. A name already present is replaced in place (its
    /// position is kept) and the earlier declaration returned.
    pub fn add_type(&mut self, decl: TypeDeclaration) -> Option<TypeDeclaration> {
        match self.index.get(&decl.name) {
            Some(&slot) => {
                warn!(
                    "duplicate type `{}`: later declaration replaces the earlier one",
                    decl.name
                );
                Some(std::mem::replace(&mut self.types[slot], decl))
            }
            None => {
                self.index.insert(decl.name.clone(), self.types.len());
                self.types.push(decl);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDeclaration> {
        self.index.get(name).map(|&slot| &self.types[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn types(&self) -> &[TypeDeclaration] {
        &self.types
    }

    pub fn primitive_types(&self) -> &'static [&'static str] {
        PRIMITIVE_TYPES
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Append a relationship whose endpoints are both modeled types.
    /// Returns `false` (and keeps the model unchanged) otherwise.
    pub fn add_relationship(&mut self, relationship: Relationship) -> bool {
        if !self.contains(&relationship.source) || !self.contains(&relationship.target) {
            return false;
        }
        self.relationships.push(relationship);
        true
    }

    /// Keep only the types matching `keep`; relationships touching a removed
    /// type go with it
    pub fn retain_types<F>(&mut self, mut keep: F)
    where
        F: FnMut(&TypeDeclaration) -> bool,
    {
        self.types.retain(|t| keep(t));
        self.reindex();
    }

    /// Keep the first `max` types in insertion order
    pub fn truncate(&mut self, max: usize) {
        if self.types.len() > max {
            self.types.truncate(max);
            self.reindex();
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .types
            .iter()
            .enumerate()
            .map(|(slot, t)| (t.name.clone(), slot))
            .collect();
        let index = &self.index;
        self.relationships
            .retain(|r| index.contains_key(&r.source) && index.contains_key(&r.target));
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
