use std::{
    collections::BTreeMap,
    fmt,
    ops::{Deref, DerefMut},
};

use super::Value;

/// An ordered list of strings.
pub type StringList = Vec<String>;

/// An ordered list of [`Value`]s. Element order is preserved.
#[derive(Debug, Clone, Default, PartialEq, PartialOrd)]
pub struct ValueList(Vec<Value>);

/// A string-keyed map of [`Value`]s.
///
/// Keys are unique and kept sorted, so two maps built in different
/// insertion orders are equal.
#[derive(Debug, Clone, Default, PartialEq, PartialOrd)]
pub struct ValueMap(BTreeMap<String, Value>);

////////////////////////////////////////////////////////////////////////////////
// ValueList
////////////////////////////////////////////////////////////////////////////////

impl ValueList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends `value` and returns the list, for chained construction.
    pub fn with(
        mut self,
        value: impl Into<Value>,
    ) -> Self {
        self.0.push(value.into());
        self
    }
}

impl Deref for ValueList {
    type Target = Vec<Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ValueList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Value>> for ValueList {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for ValueList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueList {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValueList {
    /// Elements' string forms joined with `", "`.
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&value.as_string())?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// ValueMap
////////////////////////////////////////////////////////////////////////////////

impl ValueMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts `key -> value` and returns the map, for chained construction.
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl Deref for ValueMap {
    type Target = BTreeMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ValueMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<BTreeMap<String, Value>> for ValueMap {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for ValueMap {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_list_display_joins_with_comma() {
        let list = ValueList::new().with("test 1").with("test 2").with(3);
        assert_eq!(list.to_string(), "test 1, test 2, 3");
        assert_eq!(ValueList::new().to_string(), "");
    }

    #[test]
    fn test_value_list_preserves_order() {
        let list: ValueList = (0..5).map(Value::from).collect();
        let back: Vec<i32> = list.iter().map(Value::as_i32).collect();
        assert_eq!(back, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_value_map_with_overwrites_duplicate_key() {
        let map = ValueMap::new().with("k", 1).with("k", 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("k").map(Value::as_i32), Some(2));
    }
}
