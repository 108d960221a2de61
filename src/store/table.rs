use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Rows keyed by their assigned id plus a unique index on the natural key.
///
/// Ids only ever grow, so iterating `rows` yields records in insertion order.
#[derive(Debug)]
pub(super) struct Table<K, V> {
    rows: BTreeMap<i64, V>,
    index: HashMap<K, i64>,
    next_id: i64,
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash,
{
    pub(super) fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next_id: 1,
        }
    }

    pub(super) fn len(&self) -> usize {
        assert_eq!(
            self.rows.len(),
            self.index.len(),
            "Table index out of sync with rows"
        );
        self.rows.len()
    }

    pub(super) fn get(&self, key: &K) -> Option<&V> {
        let id = self.index.get(key)?;
        self.rows.get(id)
    }

    pub(super) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.index.get(key)?;
        self.rows.get_mut(id)
    }

    pub(super) fn get_by_id(&self, id: i64) -> Option<&V> {
        self.rows.get(&id)
    }

    /// Inserts a fresh row built from the next id. Returns `None` without
    /// consuming an id when the key is already taken.
    pub(super) fn insert_new(&mut self, key: K, build: impl FnOnce(i64) -> V) -> Option<&V> {
        if self.index.contains_key(&key) {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        assert!(id > 0, "Row ids must be positive");
        self.index.insert(key, id);
        Some(self.rows.entry(id).or_insert(build(id)))
    }

    /// Applies `update` to the existing row or inserts the one built by `build`.
    pub(super) fn upsert(
        &mut self,
        key: K,
        update: impl FnOnce(&mut V),
        build: impl FnOnce(i64) -> V,
    ) -> &V {
        if let Some(id) = self.index.get(&key).copied() {
            let row = self
                .rows
                .get_mut(&id)
                .expect("Indexed row missing from table");
            update(row);
            return row;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.index.insert(key, id);
        self.rows.entry(id).or_insert(build(id))
    }

    pub(super) fn values(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    pub(super) fn filter_cloned(&self, predicate: impl Fn(&V) -> bool) -> Vec<V>
    where
        V: Clone,
    {
        self.rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_and_duplicates_are_refused() {
        let mut table: Table<&str, (i64, &str)> = Table::new();
        assert_eq!(table.insert_new("a", |id| (id, "a")), Some(&(1, "a")));
        assert_eq!(table.insert_new("b", |id| (id, "b")), Some(&(2, "b")));
        assert_eq!(table.insert_new("a", |id| (id, "again")), None);
        assert_eq!(table.insert_new("c", |id| (id, "c")), Some(&(3, "c")));
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&"a"), Some(&(1, "a")));
        assert_eq!(table.get_by_id(3), Some(&(3, "c")));
    }

    #[test]
    fn filter_preserves_insertion_order() {
        let mut table: Table<u32, u32> = Table::new();
        for value in [5, 3, 8, 1, 6] {
            table.insert_new(value, |_| value);
        }
        assert_eq!(table.filter_cloned(|value| *value > 2), vec![5, 3, 8, 6]);
    }

    #[test]
    fn upsert_updates_in_place() {
        let mut table: Table<&str, (i64, u32)> = Table::new();
        table.upsert("k", |row| row.1 += 1, |id| (id, 0));
        table.upsert("k", |row| row.1 += 1, |id| (id, 0));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&"k"), Some(&(1, 1)));
    }
}
