//! Keyed, creation-ordered record table.

use std::collections::{BTreeMap, HashMap};

use crate::error::{StoreError, StoreResult};
use crate::record::Record;

/// A collection of records keyed by id, iterated in insertion order.
///
/// Rows are stored under a monotonically increasing sequence number, so
/// removal from the middle keeps the remaining order intact and a
/// sequence number is never handed out twice.
#[derive(Debug, Clone)]
pub struct Collection<R: Record> {
    rows: BTreeMap<u64, R>,
    index: HashMap<R::Id, u64>,
    next_seq: u64,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<R: Record> Collection<R> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the collection holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if a record with `id` exists.
    #[must_use]
    pub fn contains(&self, id: R::Id) -> bool {
        self.index.contains_key(&id)
    }

    /// Lookup by id.
    #[must_use]
    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.index.get(&id).and_then(|seq| self.rows.get(seq))
    }

    /// Mutable lookup for in-place field updates.
    ///
    /// Callers must not change the record's id.
    pub fn get_mut(&mut self, id: R::Id) -> Option<&mut R> {
        let seq = *self.index.get(&id)?;
        self.rows.get_mut(&seq)
    }

    /// All records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.rows.values()
    }

    /// Records matching `pred`, in creation order.
    pub fn filter<'a, F>(&'a self, mut pred: F) -> impl Iterator<Item = &'a R> + 'a
    where
        F: FnMut(&R) -> bool + 'a,
    {
        self.rows.values().filter(move |r| pred(*r))
    }

    /// Returns true if any record matches `pred`.
    pub fn any<F>(&self, pred: F) -> bool
    where
        F: FnMut(&R) -> bool,
    {
        self.rows.values().any(pred)
    }

    /// Append a record. Fails if the id is already present.
    pub fn insert(&mut self, record: R) -> StoreResult<()> {
        let id = record.id();
        if self.index.contains_key(&id) {
            return Err(StoreError::internal(format!(
                "duplicate {} id: {id}",
                R::KIND
            )));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(id, seq);
        self.rows.insert(seq, record);
        Ok(())
    }

    /// Remove by id, returning the removed record.
    pub fn remove(&mut self, id: R::Id) -> Option<R> {
        let seq = self.index.remove(&id)?;
        self.rows.remove(&seq)
    }

    /// Remove every record matching `pred`, returning them in creation order.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<R>
    where
        F: FnMut(&R) -> bool,
    {
        let doomed: Vec<u64> = self
            .rows
            .iter()
            .filter(|(_, r)| pred(*r))
            .map(|(seq, _)| *seq)
            .collect();

        let mut removed = Vec::with_capacity(doomed.len());
        for seq in doomed {
            if let Some(record) = self.rows.remove(&seq) {
                self.index.remove(&record.id());
                removed.push(record);
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::user::{CreateUser, User, UserId};

    fn user(name: &str) -> User {
        CreateUser::new(name, format!("{name}@x.com")).into_user(UserId::new())
    }

    #[test]
    fn insert_get_remove() {
        let mut users = Collection::new();
        let a = user("a");
        users.insert(a.clone()).unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users.get(a.id), Some(&a));
        assert!(users.contains(a.id));

        assert_eq!(users.remove(a.id), Some(a.clone()));
        assert!(users.is_empty());
        assert!(users.get(a.id).is_none());
        assert!(users.remove(a.id).is_none());
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut users = Collection::new();
        let a = user("a");
        users.insert(a.clone()).unwrap();
        let err = users.insert(a).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn iteration_keeps_creation_order_after_removal() {
        let mut users = Collection::new();
        let names = ["a", "b", "c", "d"];
        let rows: Vec<User> = names.iter().map(|n| user(n)).collect();
        for r in &rows {
            users.insert(r.clone()).unwrap();
        }

        users.remove(rows[1].id);
        users.insert(user("e")).unwrap();

        let order: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "d", "e"]);
    }

    #[test]
    fn remove_where_returns_matches_in_order() {
        let mut users = Collection::new();
        for n in ["ann", "bob", "amy"] {
            users.insert(user(n)).unwrap();
        }
        let removed = users.remove_where(|u| u.name.starts_with('a'));
        let names: Vec<&str> = removed.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["ann", "amy"]);
        assert_eq!(users.len(), 1);
        assert!(users.any(|u| u.name == "bob"));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut users = Collection::new();
        let a = user("a");
        users.insert(a.clone()).unwrap();
        users.get_mut(a.id).unwrap().name = "renamed".to_string();
        assert_eq!(users.get(a.id).unwrap().name, "renamed");
        assert_eq!(users.filter(|u| u.name == "renamed").count(), 1);
    }
}
