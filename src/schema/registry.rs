use std::collections::HashMap;
use std::sync::Arc;

use super::{AttributeDefinition, SchemaBuilder};

/// The frozen set of attribute definitions for one kind of configuration.
///
/// Built once through [`SchemaBuilder`] and shared read-only behind an
/// [`Arc`] by every loader and instance that uses it.
#[derive(Debug, Default)]
pub struct Schema {
    definitions: Vec<AttributeDefinition>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new schema builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub(super) fn from_parts(
        definitions: Vec<AttributeDefinition>,
        index: HashMap<String, usize>,
    ) -> Arc<Self> {
        Arc::new(Self { definitions, index })
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterates definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a AttributeDefinition;
    type IntoIter = std::slice::Iter<'a, AttributeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.iter()
    }
}
