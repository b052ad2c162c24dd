// ABOUTME: Immutable per-instance properties store
// ABOUTME: Read-only data that is deliberately kept out of interpolation

use indexmap::IndexMap;
use serde_json::Value;
use std::rc::Rc;

/// Static configuration handed to a view at creation. Never interpolated.
#[derive(Debug, Clone, Default)]
pub struct Props {
    values: Rc<IndexMap<String, Value>>,
}

impl Props {
    pub fn new(values: IndexMap<String, Value>) -> Self {
        Self {
            values: Rc::new(values),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<IndexMap<String, Value>> for Props {
    fn from(values: IndexMap<String, Value>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_props_are_read_only_copies() {
        let mut values = IndexMap::new();
        values.insert("model".to_string(), json!("foo"));

        let props = Props::new(values);
        let shared = props.clone();

        assert_eq!(props.get("model"), Some(&json!("foo")));
        assert!(shared.contains("model"));
        assert_eq!(props.len(), 1);
        assert!(Props::default().is_empty());
    }
}
