//! Per-window application content.
//!
//! Providers are registered per app id; each window gets its own instance,
//! created on first use and dropped once the window is gone.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::apps::AppId;
use crate::components::{
    AppContent, CalculatorComponent, DocsComponent, PlaceholderComponent, TerminalComponent,
};
use crate::window::WindowId;

pub type ContentFactory = Box<dyn Fn() -> Box<dyn AppContent>>;

pub struct ContentRegistry {
    factories: BTreeMap<AppId, ContentFactory>,
    instances: HashMap<WindowId, Box<dyn AppContent>>,
}

impl fmt::Debug for ContentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRegistry")
            .field("providers", &self.factories.keys().collect::<Vec<_>>())
            .field("instances", &self.instances.len())
            .finish()
    }
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRegistry {
    /// A registry with no providers: every window shows the placeholder.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            instances: HashMap::new(),
        }
    }

    /// Providers for NemeCalc, NemeDocs and NemeTerm. `user` is what the
    /// terminal's `whoami` reports.
    pub fn with_builtin_apps(user: &str) -> Self {
        let mut registry = Self::new();
        registry.register(AppId::NemeCalc, || Box::new(CalculatorComponent::new()));
        registry.register(AppId::NemeDocs, || Box::new(DocsComponent::default()));
        let user = user.to_string();
        registry.register(AppId::NemeTerm, move || {
            Box::new(TerminalComponent::new(user.clone()))
        });
        registry
    }

    pub fn register<F>(&mut self, app: AppId, factory: F)
    where
        F: Fn() -> Box<dyn AppContent> + 'static,
    {
        self.factories.insert(app, Box::new(factory));
    }

    /// Whether `app` has its own provider rather than the placeholder.
    pub fn renders(&self, app: AppId) -> bool {
        self.factories.contains_key(&app)
    }

    /// Content of window `id`, created on first request.
    pub fn content_for(&mut self, id: &WindowId, app: AppId) -> &mut dyn AppContent {
        let factories = &self.factories;
        self.instances
            .entry(id.clone())
            .or_insert_with(|| match factories.get(&app) {
                Some(factory) => factory(),
                None => Box::new(PlaceholderComponent),
            })
            .as_mut()
    }

    pub fn get_mut(&mut self, id: &WindowId) -> Option<&mut dyn AppContent> {
        self.instances
            .get_mut(id)
            .map(|content| &mut **content as &mut dyn AppContent)
    }

    pub fn contains(&self, id: &WindowId) -> bool {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Drop instances whose window is no longer alive.
    pub fn prune(&mut self, mut is_alive: impl FnMut(&WindowId) -> bool) {
        self.instances.retain(|id, _| is_alive(id));
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }
}
