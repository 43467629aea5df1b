use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::pipeline::module::EffectModule;
use crate::pipeline::modules;

/// Closed set of effect identifiers. The registry never grows at runtime;
/// adding an effect means adding a variant here and a module to match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectId {
    Blur,
    Brightness,
    Contrast,
    Grayscale,
    SaltPepper,
    NoiseRemoval,
}

impl EffectId {
    pub const ALL: &'static [EffectId] = &[
        EffectId::Blur,
        EffectId::Brightness,
        EffectId::Contrast,
        EffectId::Grayscale,
        EffectId::SaltPepper,
        EffectId::NoiseRemoval,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectId::Blur => "blur",
            EffectId::Brightness => "brightness",
            EffectId::Contrast => "contrast",
            EffectId::Grayscale => "grayscale",
            EffectId::SaltPepper => "salt_pepper",
            EffectId::NoiseRemoval => "noise_removal",
        }
    }

    pub fn parse(s: &str) -> Option<EffectId> {
        EffectId::ALL.iter().copied().find(|id| id.as_str() == s)
    }
}

/// One adjustable parameter of an effect, as advertised to callers.
///
/// The ranges are UI hints only: supplied values are never validated against
/// them. Each transform clamps or defaults its own inputs.
#[derive(Clone, Debug, Serialize)]
pub struct ParamSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

/// Capability metadata for one effect.
#[derive(Clone, Debug, Serialize)]
pub struct EffectSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

/// Effects advertised by [`Registry::describe`]. Everything implemented is
/// currently enabled; a transform can be staged out of this list while its
/// module stays registered.
const ENABLED_EFFECTS: &[EffectId] = EffectId::ALL;

/// Fixed table mapping effect identifiers to their transforms. Built once at
/// first use and never mutated, so shared access needs no synchronization.
pub struct Registry {
    modules: Vec<Box<dyn EffectModule>>,
}

impl Registry {
    fn new() -> Self {
        Self {
            modules: vec![
                Box::new(modules::Blur),
                Box::new(modules::Brightness),
                Box::new(modules::Contrast),
                Box::new(modules::Grayscale),
                Box::new(modules::SaltPepper),
                Box::new(modules::NoiseRemoval),
            ],
        }
    }

    /// Look up a transform by its string identifier. Unknown identifiers
    /// resolve to `None`; the pipeline treats that as a pass-through.
    pub fn resolve(&self, id: &str) -> Option<&dyn EffectModule> {
        let id = EffectId::parse(id)?;
        self.modules
            .iter()
            .find(|m| m.id() == id)
            .map(|m| m.as_ref())
    }

    /// Capability metadata for every registered *and* enabled effect.
    pub fn describe(&self) -> BTreeMap<&'static str, EffectSpec> {
        self.modules
            .iter()
            .filter(|m| ENABLED_EFFECTS.contains(&m.id()))
            .map(|m| (m.id().as_str(), m.spec()))
            .collect()
    }
}

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Capability discovery surface: identifier -> {name, description, params}.
pub fn list_effects() -> BTreeMap<&'static str, EffectSpec> {
    REGISTRY.describe()
}
