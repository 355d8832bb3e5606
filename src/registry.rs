//! This module isolates the one side effect in Viridian: making a finished colormap available for
//! later lookup by name, the way plotting backends expect. The generators themselves never touch
//! a registry — they return pure values — so anything that wants to collect colormaps implements
//! [`ColormapSink`] and gets handed the finished maps explicitly. [`CmapRegistry`] is the
//! batteries-included sink: an in-memory name-to-colormap store for tests, tools, and programs
//! without a plotting backend of their own.

use std::collections::HashMap;

use colormap::Colormap;

/// A destination for finished colormaps. Implementations decide what registration means: storing
/// the map in memory, handing it to a plotting backend, writing it to disk. Registering never
/// fails from the generator's point of view; a sink that can fail should handle or surface that
/// on its own terms.
pub trait ColormapSink {
    /// Accepts a finished colormap under its own name.
    fn register(&mut self, cmap: Colormap);
}

/// An in-memory colormap registry keyed by name. Registering a second colormap under a name that
/// is already taken replaces the earlier one, matching how plotting libraries treat re-registration.
#[derive(Debug, Clone, Default)]
pub struct CmapRegistry {
    maps: HashMap<String, Colormap>,
}

impl CmapRegistry {
    /// Creates an empty registry.
    pub fn new() -> CmapRegistry {
        CmapRegistry {
            maps: HashMap::new(),
        }
    }

    /// Looks up a colormap by the name it was registered under.
    pub fn get(&self, name: &str) -> Option<&Colormap> {
        self.maps.get(name)
    }

    /// The names of every registered colormap, sorted for stable iteration.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.maps.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    /// The number of registered colormaps.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether the registry has no colormaps yet.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl ColormapSink for CmapRegistry {
    fn register(&mut self, cmap: Colormap) {
        self.maps.insert(cmap.name().to_string(), cmap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color::RGBColor;

    fn two_point_map(name: &str, end: RGBColor) -> Colormap {
        Colormap::new(
            name,
            vec![(0.0, RGBColor::from((0, 0, 0))), (1.0, end)],
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CmapRegistry::new();
        assert!(registry.is_empty());
        let cmap = two_point_map("fade", RGBColor::from((255, 255, 255)));
        registry.register(cmap.clone());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("fade"), Some(&cmap));
        assert_eq!(registry.get("missing"), None);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = CmapRegistry::new();
        registry.register(two_point_map("fade", RGBColor::from((255, 255, 255))));
        let replacement = two_point_map("fade", RGBColor::from((200, 0, 0)));
        registry.register(replacement.clone());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("fade"), Some(&replacement));
    }

    #[test]
    fn test_names_are_sorted() {
        let mut registry = CmapRegistry::new();
        for name in &["zinc", "amber", "mauve"] {
            registry.register(two_point_map(name, RGBColor::from((255, 255, 255))));
        }
        assert_eq!(registry.names(), vec!["amber", "mauve", "zinc"]);
    }

    #[test]
    fn test_works_through_the_trait_object() {
        let mut registry = CmapRegistry::new();
        {
            let sink: &mut dyn ColormapSink = &mut registry;
            sink.register(two_point_map("fade", RGBColor::from((10, 20, 30))));
        }
        assert!(registry.get("fade").is_some());
    }
}
