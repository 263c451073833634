use adjusted_core::{InputError, Real, TimeWeighting};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::TransformChain;
use crate::transform::{Transform, TransformKind};

/// Seconds per day, for memories expressed in days.
pub const DAY: Real = 86400.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid chain json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step {step}: {source}")]
    Step {
        step: usize,
        #[source]
        source: InputError,
    },
}

/// Serializable description of one [`Transform`].
///
/// ```json
/// { "type": "translate_origins", "memory": 864000.0, "causal": false }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(rename = "type")]
    pub kind: TransformKind,
    /// Decay memory in time units; absent means no decay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Real>,
    #[serde(default)]
    pub causal: bool,
}

impl TransformConfig {
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            memory: None,
            causal: false,
        }
    }

    pub fn build(&self) -> Result<Transform, InputError> {
        let weighting = match self.memory {
            Some(memory) => TimeWeighting::new(memory)?,
            None => TimeWeighting::uniform(),
        };
        Ok(Transform::new(self.kind).with_weighting(weighting.with_causal(self.causal)))
    }
}

impl From<&Transform> for TransformConfig {
    fn from(t: &Transform) -> Self {
        Self {
            kind: t.kind,
            memory: (!t.weighting.is_uniform()).then_some(t.weighting.memory()),
            causal: t.weighting.causal(),
        }
    }
}

/// Serializable description of a [`TransformChain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub steps: Vec<TransformConfig>,
}

impl Default for ChainConfig {
    /// Horizontal rigid fit with a 100-day memory, then a baseline
    /// translation with a 10-day memory, both using samples on either side
    /// of the reference time.
    fn default() -> Self {
        Self {
            steps: vec![
                TransformConfig {
                    kind: TransformKind::RotationTranslationXY,
                    memory: Some(100.0 * DAY),
                    causal: false,
                },
                TransformConfig {
                    kind: TransformKind::TranslateOrigins,
                    memory: Some(10.0 * DAY),
                    causal: false,
                },
            ],
        }
    }
}

impl ChainConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build(&self) -> Result<TransformChain, ConfigError> {
        self.steps
            .iter()
            .enumerate()
            .map(|(step, cfg)| cfg.build().map_err(|source| ConfigError::Step { step, source }))
            .collect()
    }
}
