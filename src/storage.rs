use crate::errors::StoreError;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use std::collections::HashMap;

/// Browsers drop cookies whose encoded `name=value` exceeds this many bytes.
pub const MAX_COOKIE_BYTES: usize = 4096;

/// A small durable slot store with per-entry max age.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String, max_age: Duration) -> Result<(), StoreError>;

    /// Invalidates the slot. Later `get` calls return `None`.
    fn remove(&mut self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String, max_age: Duration) -> Result<(), StoreError> {
        (**self).set(key, value, max_age)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    max_age: Duration,
}

#[derive(Debug)]
pub struct MemoryStore {
    entries: HashMap<String, MemoryEntry>,
    writable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            writable: true,
        }
    }

    /// A store that refuses every write, like a browser with cookies disabled.
    pub fn disabled() -> Self {
        Self {
            entries: HashMap::new(),
            writable: false,
        }
    }

    /// Seeds a slot without going through `set`.
    pub fn insert_raw(&mut self, key: &str, value: impl Into<String>) {
        self.entries.insert(
            key.to_owned(),
            MemoryEntry {
                value: value.into(),
                max_age: Duration::zero(),
            },
        );
    }

    pub fn max_age(&self, key: &str) -> Option<Duration> {
        self.entries.get(key).map(|entry| entry.max_age)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&mut self, key: &str, value: String, max_age: Duration) -> Result<(), StoreError> {
        if !self.writable {
            return Err(StoreError::Unavailable("memory store is read-only".into()));
        }
        self.entries
            .insert(key.to_owned(), MemoryEntry { value, max_age });
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Site-wide cookies of one request/response exchange.
#[derive(Debug, Default)]
pub struct CookieStore {
    jar: CookieJar,
}

impl CookieStore {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar }
    }

    /// Hands back the jar, including every cookie written or removed.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl KeyValueStore for CookieStore {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).map(|cookie| cookie.value().to_owned())
    }

    fn set(&mut self, key: &str, value: String, max_age: Duration) -> Result<(), StoreError> {
        let size = Cookie::new(key.to_owned(), value.as_str())
            .encoded()
            .to_string()
            .len();
        if size > MAX_COOKIE_BYTES {
            return Err(StoreError::TooLarge {
                key: key.to_owned(),
                size,
                limit: MAX_COOKIE_BYTES,
            });
        }

        let cookie = Cookie::build((key.to_owned(), value))
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(cookie_duration(max_age))
            .build();
        self.jar = std::mem::take(&mut self.jar).add(cookie);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        let cookie = Cookie::build((key.to_owned(), "")).path("/").build();
        self.jar = std::mem::take(&mut self.jar).remove(cookie);
    }
}

fn cookie_duration(max_age: Duration) -> time::Duration {
    time::Duration::seconds(max_age.num_seconds())
}
