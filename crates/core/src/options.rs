//! Options catalog: the legal values for every enum-valued preference.
//!
//! The catalog is global configuration. The built-in default can be replaced
//! at startup with a JSON document of the same shape, which is how a
//! deployment narrows or widens the choices offered to merchants.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Field names (used in validation errors)
   -------------------------------------------------------------------------- */

pub const FIELD_TONE: &str = "tone";
pub const FIELD_TARGET_AUDIENCE: &str = "target_audience";
pub const FIELD_WRITING_STYLE: &str = "writing_style";
pub const FIELD_DESCRIPTION_LENGTH: &str = "description_length";
pub const FIELD_SEO_KEYWORDS_FOCUS: &str = "seo_keywords_focus";
pub const FIELD_BRAND_PERSONALITY: &str = "brand_voice.personality";
pub const FIELD_BRAND_EMOTION: &str = "brand_voice.emotion";
pub const FIELD_BRAND_FORMALITY: &str = "brand_voice.formality";
pub const FIELD_TECHNICAL_LEVEL: &str = "industry_specific.technical_level";
pub const FIELD_TEMPLATE_SECTIONS: &str = "template_sections";

/// Legal values for the three brand-voice sub-fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandVoiceOptions {
    pub personality: Vec<String>,
    pub emotion: Vec<String>,
    pub formality: Vec<String>,
}

/// Legal values for every enum-valued preference field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsCatalog {
    pub tones: Vec<String>,
    pub target_audiences: Vec<String>,
    pub writing_styles: Vec<String>,
    pub description_lengths: Vec<String>,
    pub seo_keywords_focus: Vec<String>,
    pub brand_voice_options: BrandVoiceOptions,
    pub technical_levels: Vec<String>,
    pub template_sections: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

impl Default for OptionsCatalog {
    fn default() -> Self {
        Self {
            tones: owned(&[
                "professional",
                "casual",
                "friendly",
                "luxury",
                "formal",
                "technical",
                "conversational",
                "enthusiastic",
                "authoritative",
            ]),
            target_audiences: owned(&[
                "general",
                "technical",
                "business",
                "casual",
                "luxury",
                "luxury-shoppers",
                "budget-conscious",
                "professionals",
                "enthusiasts",
            ]),
            writing_styles: owned(&[
                "descriptive",
                "concise",
                "storytelling",
                "technical",
                "persuasive",
                "informative",
                "narrative",
                "comparative",
                "minimalist",
            ]),
            description_lengths: owned(&["short", "medium", "long", "comprehensive"]),
            seo_keywords_focus: owned(&["low", "balanced", "high", "aggressive", "minimal", "natural"]),
            brand_voice_options: BrandVoiceOptions {
                personality: owned(&[
                    "professional",
                    "friendly",
                    "expert",
                    "innovative",
                    "traditional",
                    "luxurious",
                    "playful",
                ]),
                emotion: owned(&[
                    "neutral",
                    "positive",
                    "excited",
                    "confident",
                    "empathetic",
                    "passionate",
                ]),
                formality: owned(&["formal", "semi-formal", "casual", "conversational"]),
            },
            technical_levels: owned(&["basic", "moderate", "advanced", "expert"]),
            template_sections: owned(&[
                "introduction",
                "key_features",
                "benefits",
                "specifications",
                "use_cases",
                "testimonials",
                "call_to_action",
                "warranty_info",
                "shipping_info",
                "care_instructions",
            ]),
        }
    }
}

impl OptionsCatalog {
    /// Load a catalog from a JSON file and check that it is usable.
    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Internal(format!(
                "Failed to read options catalog {}: {e}",
                path.display()
            ))
        })?;
        let catalog: Self = serde_json::from_str(&raw).map_err(|e| {
            CoreError::Internal(format!(
                "Failed to parse options catalog {}: {e}",
                path.display()
            ))
        })?;
        catalog.check_complete()?;
        Ok(catalog)
    }

    /// Every list must be non-empty and must contain the documented default,
    /// otherwise freshly onboarded stores would start out invalid.
    pub fn check_complete(&self) -> Result<(), CoreError> {
        let defaults = crate::preferences::PromptPreferences::default();
        let checks: [(&str, &[String], &str); 9] = [
            (FIELD_TONE, &self.tones, &defaults.tone),
            (FIELD_TARGET_AUDIENCE, &self.target_audiences, &defaults.target_audience),
            (FIELD_WRITING_STYLE, &self.writing_styles, &defaults.writing_style),
            (
                FIELD_DESCRIPTION_LENGTH,
                &self.description_lengths,
                &defaults.description_length,
            ),
            (
                FIELD_SEO_KEYWORDS_FOCUS,
                &self.seo_keywords_focus,
                &defaults.seo_keywords_focus,
            ),
            (
                FIELD_BRAND_PERSONALITY,
                &self.brand_voice_options.personality,
                &defaults.brand_voice.personality,
            ),
            (
                FIELD_BRAND_EMOTION,
                &self.brand_voice_options.emotion,
                &defaults.brand_voice.emotion,
            ),
            (
                FIELD_BRAND_FORMALITY,
                &self.brand_voice_options.formality,
                &defaults.brand_voice.formality,
            ),
            (
                FIELD_TECHNICAL_LEVEL,
                &self.technical_levels,
                &defaults.industry_specific.technical_level,
            ),
        ];

        for (field, allowed, default) in checks {
            if !allowed.iter().any(|v| v == default) {
                return Err(CoreError::Internal(format!(
                    "Options catalog for {field} must include the default '{default}'"
                )));
            }
        }
        for section in &defaults.template_sections {
            if !self.template_sections.contains(section) {
                return Err(CoreError::Internal(format!(
                    "Options catalog for {FIELD_TEMPLATE_SECTIONS} must include the default '{section}'"
                )));
            }
        }
        Ok(())
    }
}

/// Validate that `value` is one of `allowed`, naming `field` on failure.
pub fn validate_choice(field: &str, value: &str, allowed: &[String]) -> Result<(), CoreError> {
    if allowed.iter().any(|v| v == value) {
        Ok(())
    } else {
        Err(CoreError::invalid_option(field, value, allowed))
    }
}
