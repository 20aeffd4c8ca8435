use crate::app::echo::{self, EchoFactory};
use crate::core::ApplicationFactory;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Compile-time table of application entry points, looked up by name.
#[derive(Clone, Default)]
pub struct Registry {
    entries: HashMap<String, Arc<dyn ApplicationFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every application linked into this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(echo::NAME, EchoFactory);
        registry
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: ApplicationFactory + 'static,
    {
        let name = name.into();
        if self.entries.insert(name.clone(), Arc::new(factory)).is_some() {
            tracing::debug!(application = %name, "Replaced registered application");
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ApplicationFactory>> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("applications", &self.names())
            .finish()
    }
}
