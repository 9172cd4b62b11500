use std::collections::HashMap;

/// A map that remembers the order in which keys were first inserted.
///
/// Re-inserting an existing key replaces its value but keeps its original
/// position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    keys: Vec<String>,
    values: HashMap<String, V>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        OrderedMap {
            keys: Vec::new(),
            values: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(slot) = self.values.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.keys.push(key.clone());
        self.values.insert(key, value);
        None
    }

    /// Returns the value under `key`, inserting one built by `f` at the end
    /// if the key is new.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: &str, f: F) -> &mut V {
        if !self.values.contains_key(key) {
            self.keys.push(key.to_owned());
        }
        self.values.entry(key.to_owned()).or_insert_with(f)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.keys.iter().map(move |k| (k.as_str(), &self.values[k]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_insertion_order() {
        let mut m = OrderedMap::new();
        m.insert("b", 1);
        m.insert("a", 2);
        m.insert("c", 3);
        assert_eq!(m.keys().collect::<Vec<_>>(), ["b", "a", "c"]);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut m = OrderedMap::new();
        m.insert("x", "1");
        m.insert("y", "2");
        assert_eq!(m.insert("x", "3"), Some("1"));
        assert_eq!(
            m.iter().collect::<Vec<_>>(),
            [("x", &"3"), ("y", &"2")]
        );
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn get_or_insert_with_appends_once() {
        let mut m: OrderedMap<Vec<u8>> = OrderedMap::new();
        m.get_or_insert_with("k", Vec::new).push(1);
        m.get_or_insert_with("k", Vec::new).push(2);
        assert_eq!(m.get("k"), Some(&vec![1, 2]));
        assert_eq!(m.len(), 1);
    }
}
