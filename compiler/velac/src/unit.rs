//! Compilation units: what the markup walker hands to a session.

use rustc_hash::FxHashMap;
use vela_bind::{BindingTarget, Scope};

/// One attribute to compile.
#[derive(Clone, Debug)]
pub struct BindingSite {
    /// Attribute text as written, `${...}` expressions included.
    pub source: String,
    pub target: Option<BindingTarget>,
}

impl BindingSite {
    pub fn new(source: impl Into<String>) -> Self {
        BindingSite {
            source: source.into(),
            target: None,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: BindingTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// `element.property`, or the source text for untargeted sites.
    pub fn describe(&self) -> String {
        match &self.target {
            Some(target) => match &target.element {
                Some(element) => format!("{element}.{}", target.property),
                None => target.property.clone(),
            },
            None => self.source.clone(),
        }
    }
}

/// A markup file: its scope, the files it includes and its bindings.
#[derive(Clone, Debug, Default)]
pub struct Unit {
    pub scope: Scope,
    /// Locations of included units, compiled before this one.
    pub includes: Vec<String>,
    pub sites: Vec<BindingSite>,
}

impl Unit {
    pub fn new(scope: Scope) -> Self {
        Unit {
            scope,
            ..Unit::default()
        }
    }

    #[must_use]
    pub fn include(mut self, location: impl Into<String>) -> Self {
        self.includes.push(location.into());
        self
    }

    #[must_use]
    pub fn site(mut self, site: BindingSite) -> Self {
        self.sites.push(site);
        self
    }
}

/// Where a session finds units.
pub trait UnitLoader {
    fn load(&self, location: &str) -> Option<Unit>;
}

/// Units held in memory, keyed by location.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    units: FxHashMap<String, Unit>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, unit: Unit) {
        self.units.insert(location.into(), unit);
    }
}

impl UnitLoader for MemoryLoader {
    fn load(&self, location: &str) -> Option<Unit> {
        self.units.get(location).cloned()
    }
}
