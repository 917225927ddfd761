use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::{Result, ShapeError};
use crate::shape::{Digest, Shape};

struct Entry {
    shape: Shape,
    digest: Digest,
}

/// Name-keyed registry of shape digests.
pub struct ShapeRegistry {
    entries: HashMap<String, Entry>,
    config: RegistryConfig,
}

impl ShapeRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    /// Register a shape under a name and return its digest.
    ///
    /// Registering the same shape twice is a no-op.
    pub fn register(&mut self, name: &str, shape: Shape) -> Result<Digest> {
        let digest = shape.digest();

        if let Some(existing) = self.entries.get(name) {
            if existing.digest == digest {
                return Ok(digest);
            }
            return Err(ShapeError::Conflict {
                name: name.to_owned(),
                existing: existing.digest,
                attempted: digest,
            });
        }

        if self.entries.len() >= self.config.max_shapes {
            return Err(ShapeError::LimitExceeded {
                max: self.config.max_shapes,
            });
        }

        debug!(name, %digest, "registered shape");
        self.entries.insert(name.to_owned(), Entry { shape, digest });
        Ok(digest)
    }

    /// Load digests announced by a peer.
    pub fn from_embedded(shapes: &[(&str, Shape)]) -> Result<Self> {
        let mut registry = Self::new();
        for (name, shape) in shapes {
            registry.register(name, shape.clone())?;
        }
        Ok(registry)
    }

    /// Check a digest received from elsewhere against the registered one.
    pub fn check(&self, name: &str, expected: &Digest) -> Result<()> {
        match self.entries.get(name) {
            Some(entry) if entry.digest == *expected => Ok(()),
            Some(entry) => {
                warn!(name, %expected, actual = %entry.digest, "shape digest mismatch");
                Err(ShapeError::Incompatible {
                    name: name.to_owned(),
                    expected: *expected,
                    actual: entry.digest,
                })
            }
            None if self.config.fail_on_missing_shape => Err(ShapeError::NoShape(name.to_owned())),
            None => Ok(()),
        }
    }

    /// Digest registered under a name.
    pub fn digest(&self, name: &str) -> Option<Digest> {
        self.entries.get(name).map(|entry| entry.digest)
    }

    /// Shape registered under a name.
    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.entries.get(name).map(|entry| &entry.shape)
    }

    pub fn has_shape(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Render every entry as `{ name: { digest, shape } }`.
    pub fn to_json(&self) -> Result<Value> {
        let mut out = Map::new();
        for name in self.names() {
            let entry = &self.entries[name];
            let mut item = Map::new();
            item.insert("digest".to_owned(), Value::String(entry.digest.to_hex()));
            item.insert("shape".to_owned(), serde_json::to_value(&entry.shape)?);
            out.insert(name.to_owned(), Value::Object(item));
        }
        Ok(Value::Object(out))
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
