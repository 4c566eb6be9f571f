use std::sync::Arc;

use roam_types::{Comment, Conversation, Notification, Post, UserProfile};

/// Anything kept in a [`Collection`], keyed by a string id
pub trait Entity {
    fn id(&self) -> &str;
}

impl Entity for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for UserProfile {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Conversation {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Comment {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Immutable ordered list of shared entities.
///
/// Every "mutating" method returns a new collection; cloning is a pointer copy,
/// which is what stores use for rollback snapshots.
#[derive(Debug)]
pub struct Collection<T> {
    items: Arc<Vec<Arc<T>>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
        }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items.into_iter().map(Arc::new).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&Arc<T>> {
        self.items.first()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<T>> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// True when both handles point at the same underlying list
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// New collection with `item` in front
    pub fn prepended(&self, item: T) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.push(Arc::new(item));
        items.extend(self.items.iter().cloned());
        Self {
            items: Arc::new(items),
        }
    }

    /// New collection with `item` at the end
    pub fn appended(&self, item: T) -> Self {
        let mut items: Vec<Arc<T>> = self.items.iter().cloned().collect();
        items.push(Arc::new(item));
        Self {
            items: Arc::new(items),
        }
    }

    /// New collection where the entity with `id` is replaced by `item`.
    /// Every entity is shared with `self` when `id` is absent.
    pub fn replaced(&self, id: &str, item: T) -> Self {
        let mut item = Some(item);
        let items = self
            .items
            .iter()
            .map(|existing| {
                if existing.id() == id {
                    if let Some(replacement) = item.take() {
                        return Arc::new(replacement);
                    }
                }
                Arc::clone(existing)
            })
            .collect();
        Self {
            items: Arc::new(items),
        }
    }

    /// New collection where the entity with `id` is removed and `item` put in front
    pub fn promoted(&self, id: &str, item: T) -> Self {
        let mut items = Vec::with_capacity(self.items.len());
        items.push(Arc::new(item));
        items.extend(self.items.iter().filter(|existing| existing.id() != id).cloned());
        Self {
            items: Arc::new(items),
        }
    }

    /// New collection where `update` is applied to every entity. Entities for
    /// which it returns `None` are kept as the same `Arc`.
    pub fn updated_all<F>(&self, mut update: F) -> Self
    where
        F: FnMut(&T) -> Option<T>,
    {
        let items = self
            .items
            .iter()
            .map(|existing| match update(&**existing) {
                Some(replacement) => Arc::new(replacement),
                None => Arc::clone(existing),
            })
            .collect();
        Self {
            items: Arc::new(items),
        }
    }

    /// Owned copies of every entity, in order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().map(|item| T::clone(item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        value: u32,
    }

    impl Entity for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, value: u32) -> Item {
        Item {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_replaced_keeps_other_entities_shared() {
        let collection = Collection::new(vec![item("a", 1), item("b", 2)]);
        let next = collection.replaced("a", item("a", 10));

        assert!(!next.same_as(&collection));
        assert_eq!(next.get("a").unwrap().value, 10);
        assert!(Arc::ptr_eq(next.get("b").unwrap(), collection.get("b").unwrap()));
        assert_eq!(collection.get("a").unwrap().value, 1);
    }

    #[test]
    fn test_replaced_missing_id_changes_nothing() {
        let collection = Collection::new(vec![item("a", 1)]);
        let next = collection.replaced("zzz", item("zzz", 5));
        assert_eq!(next.len(), 1);
        assert!(Arc::ptr_eq(next.get("a").unwrap(), collection.get("a").unwrap()));
    }

    #[test]
    fn test_prepended_and_appended_order() {
        let collection = Collection::new(vec![item("b", 2)]);
        let next = collection.prepended(item("a", 1)).appended(item("c", 3));
        let ids: Vec<_> = next.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_promoted_moves_to_front() {
        let collection = Collection::new(vec![item("a", 1), item("b", 2), item("c", 3)]);
        let next = collection.promoted("c", item("c", 30));
        let ids: Vec<_> = next.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(next.first().unwrap().value, 30);
    }

    #[test]
    fn test_updated_all_shares_untouched() {
        let collection = Collection::new(vec![item("a", 1), item("b", 2)]);
        let next = collection.updated_all(|i| (i.value == 1).then(|| item(&i.id, 0)));
        assert_eq!(next.get("a").unwrap().value, 0);
        assert!(Arc::ptr_eq(next.get("b").unwrap(), collection.get("b").unwrap()));
    }

    #[test]
    fn test_clone_is_same_list() {
        let collection = Collection::new(vec![item("a", 1)]);
        assert!(collection.clone().same_as(&collection));
    }
}
