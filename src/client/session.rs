use std::collections::HashMap;
use std::sync::Mutex;

/// Key under which the bearer token is persisted. Removing it is logout.
pub const TOKEN_KEY: &str = "token";

/// Injected client-side persistence capability for the session token.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
    fn clear(&self, key: &str);
}

pub struct InMemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn clear(&self, key: &str) {
        self.values.lock().unwrap().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let store = InMemorySessionStore::new();
        store.save(TOKEN_KEY, "abc.def.ghi");

        assert_eq!(store.load(TOKEN_KEY), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn test_load_missing_key_returns_none() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.load(TOKEN_KEY), None);
    }

    #[test]
    fn test_clear_removes_token() {
        let store = InMemorySessionStore::new();
        store.save(TOKEN_KEY, "abc");
        store.clear(TOKEN_KEY);

        assert_eq!(store.load(TOKEN_KEY), None);
    }
}
