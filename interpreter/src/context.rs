use ahash::AHashMap;

pub const CURRENT_MESSAGE_CONTEXT: &str = "current_message_context";
pub const REFERENCED_MESSAGE: &str = "referenced_message";

/// Read-only named strings handed in by the host, e.g. the text of the chat message a script was
/// invoked on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraContext {
    values: AHashMap<String, String>,
}

impl ExtraContext {
    pub fn new() -> Self {
        ExtraContext {
            values: AHashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(String::from(key), String::from(value));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn current_message(&self) -> Option<&str> {
        self.get(CURRENT_MESSAGE_CONTEXT)
    }

    pub fn referenced_message(&self) -> Option<&str> {
        self.get(REFERENCED_MESSAGE)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtraContext {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ExtraContext {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::{ExtraContext, CURRENT_MESSAGE_CONTEXT, REFERENCED_MESSAGE};

    #[test]
    fn test_builder() {
        let extra = ExtraContext::new()
            .with(CURRENT_MESSAGE_CONTEXT, "hello")
            .with("other", "x");

        assert_eq!(extra.current_message(), Some("hello"));
        assert_eq!(extra.referenced_message(), None);
        assert_eq!(extra.get("other"), Some("x"));
        assert!(!extra.is_empty());
    }

    #[test]
    fn test_from_iter() {
        let extra: ExtraContext = [(REFERENCED_MESSAGE, "quoted")].into_iter().collect();

        assert_eq!(extra.referenced_message(), Some("quoted"));
        assert_eq!(extra.current_message(), None);
        assert!(ExtraContext::new().is_empty());
    }
}
