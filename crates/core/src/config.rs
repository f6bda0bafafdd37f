//! Engine runtime configuration.
//!
//! The tuning tables the engine depends on (scoring weights, campaign
//! eligibility, propensity bands and reactivation message templates) are
//! resolved once at startup and injected into services rather than read
//! from process state during request handling. Every table ships a default
//! matching production behaviour and can be overridden from a YAML document
//! so tuning never requires a code change.

use crate::activity::ActivityStatus;
use crate::constants::{
    DEFAULT_ELIGIBILITY_THRESHOLD, DEFAULT_HIGH_BAND_MIN, DEFAULT_MEDIUM_BAND_MIN,
    WEIGHT_SUM_TOLERANCE,
};
use crate::error::{EngageError, EngageResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Signal weights applied by the propensity scorer.
///
/// The four weights must be non-negative and sum to 1.0; anything else
/// would let the score drift outside its documented bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    pub recency: f64,
    pub frequency: f64,
    pub value: f64,
    pub balance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            recency: 0.40,
            frequency: 0.30,
            value: 0.20,
            balance: 0.10,
        }
    }
}

impl ScoringWeights {
    /// Sum of the four signal weights.
    pub fn sum(&self) -> f64 {
        self.recency + self.frequency + self.value + self.balance
    }

    fn validate(&self) -> EngageResult<()> {
        let named = [
            ("recency", self.recency),
            ("frequency", self.frequency),
            ("value", self.value),
            ("balance", self.balance),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngageError::InvalidConfig(format!(
                    "scoring weight '{name}' must be a non-negative number, got {weight}"
                )));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngageError::InvalidConfig(format!(
                "scoring weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Coarse propensity band used by the engagement statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropensityBand {
    High,
    Medium,
    Low,
}

/// Lower bounds of the high and medium propensity bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropensityBands {
    pub high_min: u8,
    pub medium_min: u8,
}

impl Default for PropensityBands {
    fn default() -> Self {
        Self {
            high_min: DEFAULT_HIGH_BAND_MIN,
            medium_min: DEFAULT_MEDIUM_BAND_MIN,
        }
    }
}

impl PropensityBands {
    /// Band a propensity score falls into.
    pub fn band_of(&self, score: u8) -> PropensityBand {
        if score >= self.high_min {
            PropensityBand::High
        } else if score >= self.medium_min {
            PropensityBand::Medium
        } else {
            PropensityBand::Low
        }
    }

    fn validate(&self) -> EngageResult<()> {
        if self.high_min > 100 {
            return Err(EngageError::InvalidConfig(format!(
                "high propensity band lower bound must be at most 100, got {}",
                self.high_min
            )));
        }
        if self.medium_min >= self.high_min {
            return Err(EngageError::InvalidConfig(format!(
                "medium band lower bound ({}) must be below the high band lower bound ({})",
                self.medium_min, self.high_min
            )));
        }
        Ok(())
    }
}

/// Reactivation message variants, keyed by the recipient's status.
///
/// Templates carry `{nome}` and `{clinica}` placeholders resolved at
/// dispatch time. `fallback` covers statuses without a dedicated variant,
/// in practice `lost` recipients targeted by a recovery batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReactivationTemplates {
    pub at_risk: String,
    pub inactive: String,
    pub dormant: String,
    pub fallback: String,
}

impl Default for ReactivationTemplates {
    fn default() -> Self {
        Self {
            at_risk: "Olá {nome}! Já está na altura da sua consulta de revisão na {clinica}. \
                      A prevenção é o melhor cuidado. Responda a esta mensagem para agendar."
                .to_owned(),
            inactive: "Olá {nome}, sentimos a sua falta na {clinica}. Preparámos 20% de \
                       desconto na sua próxima consulta. Esperamos por si!"
                .to_owned(),
            dormant: "{nome}, há demasiado tempo que não o vemos na {clinica}. Temos uma \
                      oferta exclusiva de 30% de desconto para o seu regresso. Marque já!"
                .to_owned(),
            fallback: "Olá {nome}, a equipa da {clinica} gostava de voltar a cuidar da sua \
                       saúde. Contacte-nos e conheça as nossas condições especiais."
                .to_owned(),
        }
    }
}

impl ReactivationTemplates {
    /// Template variant for a recipient's status.
    pub fn for_status(&self, status: ActivityStatus) -> &str {
        match status {
            ActivityStatus::AtRisk => &self.at_risk,
            ActivityStatus::Inactive => &self.inactive,
            ActivityStatus::Dormant => &self.dormant,
            ActivityStatus::Active | ActivityStatus::Lost => &self.fallback,
        }
    }

    fn validate(&self) -> EngageResult<()> {
        let named = [
            ("at_risk", &self.at_risk),
            ("inactive", &self.inactive),
            ("dormant", &self.dormant),
            ("fallback", &self.fallback),
        ];
        for (name, template) in named {
            if template.trim().is_empty() {
                return Err(EngageError::InvalidConfig(format!(
                    "reactivation template '{name}' cannot be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Engine configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub weights: ScoringWeights,
    /// Minimum propensity score a patient needs to enter a reactivation batch.
    pub eligibility_threshold: u8,
    pub bands: PropensityBands,
    pub templates: ReactivationTemplates,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            eligibility_threshold: DEFAULT_ELIGIBILITY_THRESHOLD,
            bands: PropensityBands::default(),
            templates: ReactivationTemplates::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration document, falling back to defaults for any
    /// omitted table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed YAML and `InvalidConfig` when a
    /// table fails validation.
    pub fn from_yaml_str(yaml: &str) -> EngageResult<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(EngageError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigRead` if the file cannot be read, plus everything
    /// [`EngineConfig::from_yaml_str`] can return.
    pub fn from_path(path: &Path) -> EngageResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(EngageError::ConfigRead)?;
        Self::from_yaml_str(&contents)
    }

    /// Validates every table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the offending table.
    pub fn validate(&self) -> EngageResult<()> {
        self.weights.validate()?;
        self.bands.validate()?;
        self.templates.validate()?;
        if self.eligibility_threshold > 100 {
            return Err(EngageError::InvalidConfig(format!(
                "eligibility threshold must be at most 100, got {}",
                self.eligibility_threshold
            )));
        }
        Ok(())
    }
}
