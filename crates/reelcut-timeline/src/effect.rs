//! Effects attached to clips and the registry that describes them.
//!
//! The timeline never interprets effect parameters; it only checks them
//! against the schema the registry declares for each effect type.

use std::collections::BTreeMap;

use reelcut_core::{ReelcutError, Result};
use serde::{Deserialize, Serialize};

/// Effect parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Linear RGBA, each channel in `[0, 1]`.
    Color([f32; 4]),
}

impl ParamValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Bool(_) => ParamKind::Bool,
            Self::Number(_) => ParamKind::Number,
            Self::Text(_) => ParamKind::Text,
            Self::Color(_) => ParamKind::Color,
        }
    }
}

/// Collection of parameter values, keyed by parameter name.
pub type ParamValues = BTreeMap<String, ParamValue>;

/// Kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Bool,
    Number,
    Text,
    Color,
}

/// An effect applied to a clip: a type tag plus its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Effect type tag (e.g. `"glow"`).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub params: ParamValues,
}

impl Effect {
    /// Create an effect with no parameters set.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: ParamValues::new(),
        }
    }

    /// Builder-style parameter setter.
    pub fn with_param(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(name.into(), value);
        self
    }
}

// ── Schema ──────────────────────────────────────────────────────

/// Effect parameter descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub display_name: String,
    pub kind: ParamKind,
    pub required: bool,
    /// Inclusive numeric bounds, only meaningful for `Number`.
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ParamDescriptor {
    fn number(name: &str, display_name: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            kind: ParamKind::Number,
            required: false,
            min: Some(min),
            max: Some(max),
        }
    }

    fn other(name: &str, display_name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            kind,
            required: false,
            min: None,
            max: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Check one value against this descriptor.
    pub fn check(&self, value: &ParamValue) -> std::result::Result<(), String> {
        if value.kind() != self.kind {
            return Err(format!(
                "parameter '{}' expects {:?}, got {:?}",
                self.name,
                self.kind,
                value.kind()
            ));
        }
        match value {
            ParamValue::Number(n) => {
                if !n.is_finite() {
                    return Err(format!("parameter '{}' is not a finite number", self.name));
                }
                let below = self.min.is_some_and(|min| *n < min);
                let above = self.max.is_some_and(|max| *n > max);
                if below || above {
                    return Err(format!(
                        "parameter '{}' = {} is outside [{}, {}]",
                        self.name,
                        n,
                        self.min.unwrap_or(f64::NEG_INFINITY),
                        self.max.unwrap_or(f64::INFINITY)
                    ));
                }
            }
            ParamValue::Color(channels) => {
                if channels.iter().any(|c| !(0.0..=1.0).contains(c)) {
                    return Err(format!("parameter '{}' has a channel outside [0, 1]", self.name));
                }
            }
            ParamValue::Bool(_) | ParamValue::Text(_) => {}
        }
        Ok(())
    }
}

/// Whether an effect applies to one clip or bridges two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectCategory {
    Effect,
    Transition,
}

/// Schema of one effect type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectDescriptor {
    /// Tag stored in `Effect::kind`.
    pub kind: String,
    pub display_name: String,
    pub category: EffectCategory,
    pub params: Vec<ParamDescriptor>,
}

impl EffectDescriptor {
    fn new(
        kind: &str,
        display_name: &str,
        category: EffectCategory,
        params: Vec<ParamDescriptor>,
    ) -> Self {
        Self {
            kind: kind.into(),
            display_name: display_name.into(),
            category,
            params,
        }
    }

    fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Built-in effects registry.
#[derive(Debug, Clone)]
pub struct EffectRegistry {
    descriptors: Vec<EffectDescriptor>,
}

impl EffectRegistry {
    /// Create a new registry with built-in effects and transitions.
    pub fn new() -> Self {
        use EffectCategory::{Effect as Fx, Transition as Tr};

        let intensity = || ParamDescriptor::number("intensity", "Intensity", 0.0, 1.0);
        let tint = || ParamDescriptor::other("color", "Color", ParamKind::Color);
        let duration = || ParamDescriptor::number("duration", "Duration", 0.1, 5.0).required();

        Self {
            descriptors: vec![
                EffectDescriptor::new("glow", "Mystical Glow", Fx, vec![intensity(), tint()]),
                EffectDescriptor::new(
                    "enchantment",
                    "Dark Enchantment",
                    Fx,
                    vec![intensity(), ParamDescriptor::other("invert", "Invert", ParamKind::Bool)],
                ),
                EffectDescriptor::new(
                    "sparkles",
                    "Magical Sparkles",
                    Fx,
                    vec![ParamDescriptor::number("density", "Density", 0.0, 1.0), tint()],
                ),
                EffectDescriptor::new(
                    "brew",
                    "Witch's Brew",
                    Fx,
                    vec![ParamDescriptor::number("hue", "Hue", 0.0, 360.0), intensity()],
                ),
                EffectDescriptor::new(
                    "runes",
                    "Ancient Runes",
                    Fx,
                    vec![
                        ParamDescriptor::other("text", "Text", ParamKind::Text).required(),
                        ParamDescriptor::number("opacity", "Opacity", 0.0, 1.0),
                    ],
                ),
                EffectDescriptor::new("fade", "Fade", Tr, vec![duration()]),
                EffectDescriptor::new("dissolve", "Dissolve", Tr, vec![duration()]),
                EffectDescriptor::new(
                    "swirl",
                    "Magical Swirl",
                    Tr,
                    vec![duration(), ParamDescriptor::number("turns", "Turns", 0.0, 10.0)],
                ),
                EffectDescriptor::new("smoke", "Smoke", Tr, vec![duration(), tint()]),
                EffectDescriptor::new("portal", "Portal", Tr, vec![duration()]),
            ],
        }
    }

    /// Register an additional effect type, replacing any with the same tag.
    pub fn register(&mut self, descriptor: EffectDescriptor) {
        self.descriptors.retain(|d| d.kind != descriptor.kind);
        self.descriptors.push(descriptor);
    }

    /// Get all registered effect types.
    pub fn descriptors(&self) -> &[EffectDescriptor] {
        &self.descriptors
    }

    /// Registered types of one category, in registration order.
    pub fn by_category(&self, category: EffectCategory) -> impl Iterator<Item = &EffectDescriptor> {
        self.descriptors.iter().filter(move |d| d.category == category)
    }

    /// Find an effect type by tag.
    pub fn find(&self, kind: &str) -> Option<&EffectDescriptor> {
        self.descriptors.iter().find(|d| d.kind == kind)
    }

    /// Validate an effect against its registered schema.
    pub fn validate(&self, effect: &Effect) -> Result<()> {
        let descriptor = self
            .find(&effect.kind)
            .ok_or_else(|| ReelcutError::Validation(format!("unknown effect type '{}'", effect.kind)))?;

        for (name, value) in &effect.params {
            let param = descriptor.param(name).ok_or_else(|| {
                ReelcutError::Validation(format!(
                    "effect '{}' has no parameter '{}'",
                    effect.kind, name
                ))
            })?;
            param
                .check(value)
                .map_err(|msg| ReelcutError::Validation(format!("effect '{}': {}", effect.kind, msg)))?;
        }

        if let Some(missing) = descriptor
            .params
            .iter()
            .find(|p| p.required && !effect.params.contains_key(&p.name))
        {
            return Err(ReelcutError::Validation(format!(
                "effect '{}' is missing required parameter '{}'",
                effect.kind, missing.name
            )));
        }
        Ok(())
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
