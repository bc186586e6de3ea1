use super::beat_drop::BeatDropFactory;
use super::identity::IdentityFactory;
use super::normalize::NormalizeFactory;
use super::reverse::ReverseFactory;
use super::silence::SilenceFactory;
use super::stretch::StretchFactory;
use super::trim::TrimFactory;
use super::{ModifierOptions, SampleModifier, SampleModifierFactory};
use crate::error::{AudioError, AudioResult};
use log::warn;
use std::collections::BTreeMap;

/// Table of modifier factories keyed by id, kept sorted by id.
///
/// Populated explicitly at startup; the pipeline itself only ever receives
/// an already created modifier.
#[derive(Default)]
pub struct ModifierRegistry {
    by_id: BTreeMap<&'static str, Box<dyn SampleModifierFactory>>,
}

impl ModifierRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in modifier
    pub fn with_builtins() -> Self {
        let mut registry = ModifierRegistry::new();
        registry
            .register(BeatDropFactory)
            .register(IdentityFactory)
            .register(NormalizeFactory)
            .register(ReverseFactory)
            .register(SilenceFactory)
            .register(StretchFactory)
            .register(TrimFactory);
        registry
    }

    /// Add a factory, replacing any factory with the same id
    pub fn register<F: SampleModifierFactory + 'static>(&mut self, factory: F) -> &mut Self {
        let id = factory.id();
        if self.by_id.insert(id, Box::new(factory)).is_some() {
            warn!("Replacing modifier factory '{}'", id);
        }
        self
    }

    /// Look up a factory
    pub fn get_by_id(&self, id: &str) -> AudioResult<&dyn SampleModifierFactory> {
        self.by_id
            .get(id)
            .map(|factory| &**factory)
            .ok_or_else(|| AudioError::UnknownModifier(id.to_string()))
    }

    /// Look up a factory and create a modifier from it
    pub fn create(&self, id: &str, options: &ModifierOptions) -> AudioResult<Box<dyn SampleModifier>> {
        self.get_by_id(id)?.create(options)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_id.keys().copied()
    }

    /// Registered factories in id order
    pub fn factories(&self) -> impl Iterator<Item = &dyn SampleModifierFactory> + '_ {
        self.by_id.values().map(|factory| &**factory)
    }

    /// Ids one per line, each indented with a tab
    pub fn format_available_for_cli(&self) -> String {
        self.ids()
            .map(|id| format!("\t{}", id))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
