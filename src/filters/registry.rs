//! Filter registry for managing available operation types.

use crate::core::context::OperationContext;
use crate::core::error::OperationError;
use crate::core::operation::{Category, ConfigurableOperation, ImageOperation, OperationMetadata};
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory function building a configured operator from descriptor parameters.
pub type OperationFactory = Arc<
    dyn Fn(&OperationContext<'_>) -> Result<Box<dyn ImageOperation>, OperationError> + Send + Sync,
>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: OperationFactory,
    /// Metadata of the operation type.
    pub metadata: OperationMetadata,
    /// Whether this operation is enabled.
    pub enabled: bool,
}

/// Registry for all available operation types.
///
/// The registry maps descriptor types to operator factories. Dispatch by
/// name happens once per pipeline step, never inside pixel loops.
pub struct FilterRegistry {
    /// Operations indexed by their descriptor type.
    operations: IndexMap<String, RegistryEntry>,
    /// Operation ids grouped by category.
    categories: IndexMap<Category, Vec<String>>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            operations: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in operations.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register an operation type.
    pub fn register<T: ConfigurableOperation>(&mut self) {
        self.register_factory(T::metadata(), |ctx| {
            T::from_context(ctx).map(|op| Box::new(op) as Box<dyn ImageOperation>)
        });
    }

    /// Register an operation with an explicit factory.
    ///
    /// Registering an id twice replaces the earlier entry.
    pub fn register_factory<F>(&mut self, metadata: OperationMetadata, factory: F)
    where
        F: Fn(&OperationContext<'_>) -> Result<Box<dyn ImageOperation>, OperationError>
            + Send
            + Sync
            + 'static,
    {
        let id = metadata.id.clone();
        let category = metadata.category;

        if let Some(previous) = self.operations.shift_remove(&id) {
            self.remove_from_category(&previous.metadata.category, &id);
        }

        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
            enabled: true,
        };
        self.operations.insert(id.clone(), entry);

        self.categories.entry(category).or_default().push(id);
    }

    /// Build an operator for the context's operation type.
    pub fn create(&self, ctx: &OperationContext<'_>) -> Result<Box<dyn ImageOperation>, OperationError> {
        match self.operations.get(ctx.operation) {
            Some(entry) if entry.enabled => (entry.factory)(ctx),
            _ => Err(OperationError::UnsupportedOperation {
                operation: ctx.operation.to_string(),
            }),
        }
    }

    /// Get metadata for an operation without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&OperationMetadata> {
        self.operations.get(id).map(|e| &e.metadata)
    }

    /// Get a registry entry.
    pub fn get_entry(&self, id: &str) -> Option<&RegistryEntry> {
        self.operations.get(id)
    }

    /// Check if an operation is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.operations.contains_key(id)
    }

    /// Check if an operation is registered and enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.operations.get(id).is_some_and(|e| e.enabled)
    }

    /// Get all registered operation ids.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(|s| s.as_str())
    }

    /// Get operation ids by category.
    pub fn by_category(&self, category: &Category) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Enable or disable an operation.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        if let Some(entry) = self.operations.get_mut(id) {
            entry.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// Unregister an operation.
    pub fn unregister(&mut self, id: &str) -> bool {
        if let Some(entry) = self.operations.shift_remove(id) {
            self.remove_from_category(&entry.metadata.category, id);
            true
        } else {
            false
        }
    }

    fn remove_from_category(&mut self, category: &Category, id: &str) {
        if let Some(ids) = self.categories.get_mut(category) {
            ids.retain(|i| i != id);
        }
    }

    /// Get the total number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Get enabled operations grouped by category for display.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&OperationMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&OperationMetadata>> = IndexMap::new();

        for category in Category::all() {
            let mut entries: Vec<&OperationMetadata> = self
                .by_category(category)
                .into_iter()
                .filter_map(|id| self.operations.get(id))
                .filter(|e| e.enabled)
                .map(|e| &e.metadata)
                .collect();
            if !entries.is_empty() {
                entries.sort_by(|a, b| a.name.cmp(&b.name));
                grouped.insert(*category, entries);
            }
        }

        grouped
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
