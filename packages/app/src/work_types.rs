//! Work-type list with a current selection.

use store::models::find_by_label;
use store::repo::validate_label;
use store::{Store, StoreError, WorkType, WorkTypeStore};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct WorkTypeRegistry<S> {
    store: S,
    work_types: Vec<WorkType>,
    selected: Option<String>,
}

impl<S: Store> WorkTypeRegistry<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            work_types: Vec::new(),
            selected: None,
        }
    }

    pub fn work_types(&self) -> &[WorkType] {
        &self.work_types
    }

    pub fn selected(&self) -> Option<&WorkType> {
        let id = self.selected.as_deref()?;
        self.work_types.iter().find(|wt| wt.id == id)
    }

    /// Returns false if `id` is not a known work type.
    pub fn select(&mut self, id: &str) -> bool {
        if self.work_types.iter().any(|wt| wt.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Work types whose label contains `query`, ignoring case. A blank query matches all.
    pub fn search(&self, query: &str) -> Vec<&WorkType> {
        let query = query.trim().to_lowercase();
        self.work_types
            .iter()
            .filter(|wt| wt.label.to_lowercase().contains(&query))
            .collect()
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.work_types
            .iter()
            .find(|wt| wt.id == id)
            .map(|wt| wt.label.as_str())
    }

    /// Reload from the store. The first work type is selected if nothing valid is.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        self.work_types = self.store.list_work_types().await?;
        self.keep_selection_valid();
        Ok(())
    }

    /// The work type labelled `label` (any case), creating it if needed. The
    /// result becomes the selection.
    ///
    /// A conflict from the store means another writer got there first, so the
    /// list is re-fetched and the match returned instead of the create response.
    pub async fn ensure(&mut self, label: &str) -> Result<WorkType, StoreError> {
        let label = validate_label(label)?;
        let work_type = match find_by_label(&self.work_types, label) {
            Some(existing) => existing.clone(),
            None => self.create_or_resolve(label).await?,
        };
        self.selected = Some(work_type.id.clone());
        Ok(work_type)
    }

    async fn create_or_resolve(&mut self, label: &str) -> Result<WorkType, StoreError> {
        match self.store.create_work_type(label).await {
            Ok(created) => {
                debug!(id = %created.id, "work type created");
                self.work_types.push(created.clone());
                Ok(created)
            }
            Err(StoreError::Conflict(message)) => {
                warn!(label, "work type create conflicted, re-fetching");
                self.refresh().await?;
                find_by_label(&self.work_types, label)
                    .cloned()
                    .ok_or(StoreError::Conflict(message))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a work type. Its sessions and tasks stay behind.
    pub async fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        self.store.delete_work_type(id).await?;
        self.work_types.retain(|wt| wt.id != id);
        self.keep_selection_valid();
        Ok(())
    }

    fn keep_selection_valid(&mut self) {
        let valid = self
            .selected
            .as_deref()
            .is_some_and(|id| self.work_types.iter().any(|wt| wt.id == id));
        if !valid {
            self.selected = self.work_types.first().map(|wt| wt.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{LocalStore, MemoryStorage};

    fn registry() -> (WorkTypeRegistry<LocalStore<MemoryStorage>>, LocalStore<MemoryStorage>) {
        let store = LocalStore::new(MemoryStorage::new());
        (WorkTypeRegistry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_ensure_reuses_known_label() {
        let (mut registry, store) = registry();
        let reading = registry.ensure("Reading").await.unwrap();
        let again = registry.ensure("reading").await.unwrap();
        assert_eq!(reading.id, again.id);
        assert_eq!(store.list_work_types().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_resolves_conflict_by_refetching() {
        let (mut registry, store) = registry();
        // Created elsewhere; the registry has not seen it yet.
        let existing = store.create_work_type("Reading").await.unwrap();

        let resolved = registry.ensure("READING").await.unwrap();
        assert_eq!(resolved.id, existing.id);
        assert_eq!(registry.work_types().len(), 1);
    }

    #[tokio::test]
    async fn test_first_work_type_is_selected_after_refresh() {
        let (mut registry, store) = registry();
        let math = store.create_work_type("Math").await.unwrap();
        store.create_work_type("Art").await.unwrap();
        assert!(registry.selected().is_none());
        registry.refresh().await.unwrap();
        assert_eq!(registry.selected().map(|wt| wt.id.as_str()), Some(math.id.as_str()));
    }

    #[tokio::test]
    async fn test_ensured_work_type_becomes_selected() {
        let (mut registry, store) = registry();
        let math = registry.ensure("Math").await.unwrap();
        let art = registry.ensure("Art").await.unwrap();
        assert_eq!(registry.selected().map(|wt| wt.id.as_str()), Some(art.id.as_str()));

        // Known label, any case.
        registry.ensure("MATH").await.unwrap();
        assert_eq!(registry.selected().map(|wt| wt.id.as_str()), Some(math.id.as_str()));

        // Resolved after a conflict.
        let reading = store.create_work_type("Reading").await.unwrap();
        registry.ensure("reading").await.unwrap();
        assert_eq!(registry.selected().map(|wt| wt.id.as_str()), Some(reading.id.as_str()));
    }

    #[tokio::test]
    async fn test_search_ignores_case() {
        let (mut registry, _) = registry();
        for label in ["Math", "Reading", "Creative writing"] {
            registry.ensure(label).await.unwrap();
        }
        let labels = |query: &str| -> Vec<String> {
            registry.search(query).iter().map(|wt| wt.label.clone()).collect()
        };
        assert_eq!(labels("READ"), vec!["Reading"]);
        assert_eq!(labels("ing"), vec!["Reading", "Creative writing"]);
        assert_eq!(labels("  ").len(), 3);
        assert!(labels("art").is_empty());
    }

    #[tokio::test]
    async fn test_remove_moves_selection() {
        let (mut registry, _) = registry();
        let math = registry.ensure("Math").await.unwrap();
        let art = registry.ensure("Art").await.unwrap();
        registry.select(&math.id);
        registry.remove(&math.id).await.unwrap();
        assert_eq!(registry.selected().map(|wt| wt.id.clone()), Some(art.id));
        assert!(registry.label_of(&math.id).is_none());
    }

    #[tokio::test]
    async fn test_blank_label_never_reaches_the_store() {
        let (mut registry, store) = registry();
        assert!(matches!(
            registry.ensure("   ").await,
            Err(StoreError::Validation(_))
        ));
        assert!(store.list_work_types().await.unwrap().is_empty());
    }
}
