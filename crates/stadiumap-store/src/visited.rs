//! Per-identity set of visited stadium ids, stored as a JSON list.

use crate::error::StoreError;
use crate::identity::Identity;
use crate::kv::KeyValueStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    ids: Vec<String>,
}

impl VisitedSet {
    /// Read the set stored for `identity`.
    ///
    /// A missing key is an empty set. So is a value that does not parse as a
    /// list of strings; that case is logged and the bad value left in place
    /// until the next save overwrites it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store itself cannot be read.
    pub fn load<S: KeyValueStore + ?Sized>(
        store: &S,
        identity: &Identity,
    ) -> Result<Self, StoreError> {
        let key = identity.visited_key();
        let Some(raw) = store.get(&key)? else {
            return Ok(Self::default());
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => Ok(ids.into_iter().collect()),
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "stored visited list is unreadable, starting empty"
                );
                Ok(Self::default())
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be written.
    pub fn save<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        identity: &Identity,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_string(&self.ids)?;
        store.set(&identity.visited_key(), &value)
    }

    /// Flip `stadium_id`. Returns `true` when it is now marked visited.
    pub fn toggle(&mut self, stadium_id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|id| id == stadium_id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(stadium_id.to_owned());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, stadium_id: &str) -> bool {
        self.ids.iter().any(|id| id == stadium_id)
    }

    /// Ids in the order they were marked.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            if !set.contains(&id) {
                set.ids.push(id);
            }
        }
        set
    }
}

/// Load, flip and save in one step. Returns `true` when `stadium_id` is now
/// marked visited for `identity`.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be read or written.
pub fn toggle_visited<S: KeyValueStore + ?Sized>(
    store: &S,
    identity: &Identity,
    stadium_id: &str,
) -> Result<bool, StoreError> {
    let mut visited = VisitedSet::load(store, identity)?;
    let now_visited = visited.toggle(stadium_id);
    visited.save(store, identity)?;
    tracing::debug!(%identity, stadium = stadium_id, now_visited, "toggled visited");
    Ok(now_visited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[test]
    fn toggle_adds_then_removes() {
        let mut visited = VisitedSet::default();
        assert!(visited.toggle("camp-nou"));
        assert!(visited.contains("camp-nou"));
        assert!(!visited.toggle("camp-nou"));
        assert!(visited.is_empty());
    }

    #[test]
    fn identities_do_not_share_sets() {
        let store = MemoryStore::new();
        let ana = Identity::user("ana").unwrap();

        toggle_visited(&store, &ana, "wembley").unwrap();
        toggle_visited(&store, &Identity::Guest, "anfield").unwrap();

        let ana_set = VisitedSet::load(&store, &ana).unwrap();
        let guest_set = VisitedSet::load(&store, &Identity::Guest).unwrap();
        assert_eq!(ana_set.iter().collect::<Vec<_>>(), vec!["wembley"]);
        assert_eq!(guest_set.iter().collect::<Vec<_>>(), vec!["anfield"]);
    }

    #[test]
    fn stored_value_is_a_json_list() {
        let store = MemoryStore::new();
        toggle_visited(&store, &Identity::Guest, "maracana").unwrap();
        toggle_visited(&store, &Identity::Guest, "azteca").unwrap();
        assert_eq!(
            store.get("visited_guest").unwrap().as_deref(),
            Some(r#"["maracana","azteca"]"#)
        );
    }

    #[test]
    fn unreadable_value_loads_as_empty() {
        let store = MemoryStore::new();
        store.set("visited_guest", "{not a list").unwrap();
        let visited = VisitedSet::load(&store, &Identity::Guest).unwrap();
        assert!(visited.is_empty());

        assert!(toggle_visited(&store, &Identity::Guest, "lusail").unwrap());
        let reloaded = VisitedSet::load(&store, &Identity::Guest).unwrap();
        assert!(reloaded.contains("lusail"));
    }

    #[test]
    fn duplicate_ids_in_storage_collapse() {
        let set: VisitedSet = vec!["a".to_owned(), "b".to_owned(), "a".to_owned()]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }
}
