//! Read-only view of the host's global namespace

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// Lookup surface for symbols published by external scripts
pub trait GlobalScope: Send + Sync {
    type Value: Clone + Send;

    /// Current value of `name`, or `None` while it is undefined
    fn lookup(&self, name: &str) -> Option<Self::Value>;
}

/// In-memory global namespace. A `null` value counts as undefined.
#[derive(Default)]
pub struct MemoryGlobals {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryGlobals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a global, as a loaded SDK script would
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.values.write().insert(name.into(), value);
    }

    pub fn undefine(&self, name: &str) {
        self.values.write().remove(name);
    }
}

impl GlobalScope for MemoryGlobals {
    type Value = Value;

    fn lookup(&self, name: &str) -> Option<Value> {
        self.values
            .read()
            .get(name)
            .filter(|value| !value.is_null())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup() {
        let globals = MemoryGlobals::new();
        assert!(globals.lookup("Hls").is_none());

        globals.define("Hls", json!({ "version": "1.5.0" }));
        assert_eq!(globals.lookup("Hls"), Some(json!({ "version": "1.5.0" })));

        globals.undefine("Hls");
        assert!(globals.lookup("Hls").is_none());
    }

    #[test]
    fn test_null_is_undefined() {
        let globals = MemoryGlobals::new();
        globals.define("dashjs", Value::Null);
        assert!(globals.lookup("dashjs").is_none());
    }
}
