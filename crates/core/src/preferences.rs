//! Prompt preferences: the per-store configuration that steers description
//! generation, and the partial-update type used to change it.
//!
//! Updates follow absence-means-unchanged semantics. Every field of
//! [`PromptPreferencesUpdate`] is optional; a field that is absent leaves the
//! stored value alone, explicit `null` is rejected, and unrecognized fields
//! are rejected. Nested records (`brand_voice`, `industry_specific`) merge per
//! sub-field; lists are replaced as a whole. An empty string clears an
//! optional text field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::options::{self, validate_choice, OptionsCatalog};

/* --------------------------------------------------------------------------
   Limits
   -------------------------------------------------------------------------- */

/// Maximum number of key features a store may curate.
pub const MAX_KEY_FEATURES: usize = 20;

/// Maximum number of entries in the other free-text lists.
pub const MAX_LIST_ITEMS: usize = 50;

/// Maximum length of a single list entry in characters.
pub const MAX_LIST_ITEM_LEN: usize = 200;

/// Maximum length of custom instructions in characters.
pub const MAX_CUSTOM_INSTRUCTIONS_LEN: usize = 2_000;

/// Maximum length of the example description in characters.
pub const MAX_EXAMPLE_DESCRIPTION_LEN: usize = 5_000;

/// Maximum length of the industry name in characters.
pub const MAX_INDUSTRY_LEN: usize = 100;

/* --------------------------------------------------------------------------
   Stored record
   -------------------------------------------------------------------------- */

/// Brand voice, each sub-field drawn from the catalog's brand voice options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandVoice {
    pub personality: String,
    pub emotion: String,
    pub formality: String,
}

impl Default for BrandVoice {
    fn default() -> Self {
        Self {
            personality: "professional".to_string(),
            emotion: "neutral".to_string(),
            formality: "formal".to_string(),
        }
    }
}

/// Industry context for the store's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndustrySpecific {
    pub industry: Option<String>,
    pub specializations: Vec<String>,
    pub technical_level: String,
}

impl Default for IndustrySpecific {
    fn default() -> Self {
        Self {
            industry: None,
            specializations: Vec::new(),
            technical_level: "moderate".to_string(),
        }
    }
}

/// The full preference record for one store.
///
/// Missing fields fall back to defaults when decoding stored rows written
/// before a field existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptPreferences {
    pub tone: String,
    pub target_audience: String,
    pub writing_style: String,
    pub description_length: String,
    pub seo_keywords_focus: String,
    pub brand_voice: BrandVoice,
    pub key_features: Vec<String>,
    pub custom_instructions: Option<String>,
    pub example_description: Option<String>,
    pub industry_specific: IndustrySpecific,
    pub avoid_words: Vec<String>,
    pub must_include_elements: Vec<String>,
    pub template_sections: Vec<String>,
}

impl Default for PromptPreferences {
    fn default() -> Self {
        Self {
            tone: "professional".to_string(),
            target_audience: "general".to_string(),
            writing_style: "descriptive".to_string(),
            description_length: "medium".to_string(),
            seo_keywords_focus: "balanced".to_string(),
            brand_voice: BrandVoice::default(),
            key_features: Vec::new(),
            custom_instructions: None,
            example_description: None,
            industry_specific: IndustrySpecific::default(),
            avoid_words: Vec::new(),
            must_include_elements: Vec::new(),
            template_sections: [
                "introduction",
                "key_features",
                "benefits",
                "specifications",
                "call_to_action",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

impl PromptPreferences {
    /// Merge `update` into this record, leaving absent fields untouched.
    ///
    /// The update is assumed to have been validated already.
    pub fn apply(&mut self, update: &PromptPreferencesUpdate) {
        if let Some(ref v) = update.tone {
            self.tone = v.clone();
        }
        if let Some(ref v) = update.target_audience {
            self.target_audience = v.clone();
        }
        if let Some(ref v) = update.writing_style {
            self.writing_style = v.clone();
        }
        if let Some(ref v) = update.description_length {
            self.description_length = v.clone();
        }
        if let Some(ref v) = update.seo_keywords_focus {
            self.seo_keywords_focus = v.clone();
        }
        if let Some(ref bv) = update.brand_voice {
            if let Some(ref v) = bv.personality {
                self.brand_voice.personality = v.clone();
            }
            if let Some(ref v) = bv.emotion {
                self.brand_voice.emotion = v.clone();
            }
            if let Some(ref v) = bv.formality {
                self.brand_voice.formality = v.clone();
            }
        }
        if let Some(ref v) = update.key_features {
            self.key_features = v.clone();
        }
        if let Some(ref v) = update.custom_instructions {
            self.custom_instructions = non_empty(v);
        }
        if let Some(ref v) = update.example_description {
            self.example_description = non_empty(v);
        }
        if let Some(ref ind) = update.industry_specific {
            if let Some(ref v) = ind.industry {
                self.industry_specific.industry = non_empty(v);
            }
            if let Some(ref v) = ind.specializations {
                self.industry_specific.specializations = v.clone();
            }
            if let Some(ref v) = ind.technical_level {
                self.industry_specific.technical_level = v.clone();
            }
        }
        if let Some(ref v) = update.avoid_words {
            self.avoid_words = v.clone();
        }
        if let Some(ref v) = update.must_include_elements {
            self.must_include_elements = v.clone();
        }
        if let Some(ref v) = update.template_sections {
            self.template_sections = v.clone();
        }
    }

    /// Return a copy of this record with `update` merged in.
    pub fn merged(&self, update: &PromptPreferencesUpdate) -> Self {
        let mut next = self.clone();
        next.apply(update);
        next
    }
}

/// Empty strings clear optional text fields.
fn non_empty(v: &str) -> Option<String> {
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

/* --------------------------------------------------------------------------
   Partial update
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrandVoiceUpdate {
    pub personality: Option<String>,
    pub emotion: Option<String>,
    pub formality: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndustrySpecificUpdate {
    pub industry: Option<String>,
    pub specializations: Option<Vec<String>>,
    pub technical_level: Option<String>,
}

/// A partial preferences update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptPreferencesUpdate {
    pub tone: Option<String>,
    pub target_audience: Option<String>,
    pub writing_style: Option<String>,
    pub description_length: Option<String>,
    pub seo_keywords_focus: Option<String>,
    pub brand_voice: Option<BrandVoiceUpdate>,
    pub key_features: Option<Vec<String>>,
    pub custom_instructions: Option<String>,
    pub example_description: Option<String>,
    pub industry_specific: Option<IndustrySpecificUpdate>,
    pub avoid_words: Option<Vec<String>>,
    pub must_include_elements: Option<Vec<String>>,
    pub template_sections: Option<Vec<String>>,
}

impl PromptPreferencesUpdate {
    /// Parse an update from a raw JSON body.
    ///
    /// Rejects non-objects, empty objects, explicit `null` values, and
    /// unrecognized fields at any nesting level.
    pub fn from_json(value: Value) -> Result<Self, CoreError> {
        let Value::Object(ref map) = value else {
            return Err(CoreError::Validation(
                "Preferences update must be a JSON object".to_string(),
            ));
        };
        if map.is_empty() {
            return Err(CoreError::Validation(
                "Preferences update must contain at least one field".to_string(),
            ));
        }
        reject_nulls("", map)?;

        serde_json::from_value(value)
            .map_err(|e| CoreError::Validation(format!("Invalid preferences update: {e}")))
    }

    /// Validate every present field against the catalog and the length limits.
    pub fn validate(&self, catalog: &OptionsCatalog) -> Result<(), CoreError> {
        if let Some(ref v) = self.tone {
            validate_choice(options::FIELD_TONE, v, &catalog.tones)?;
        }
        if let Some(ref v) = self.target_audience {
            validate_choice(options::FIELD_TARGET_AUDIENCE, v, &catalog.target_audiences)?;
        }
        if let Some(ref v) = self.writing_style {
            validate_choice(options::FIELD_WRITING_STYLE, v, &catalog.writing_styles)?;
        }
        if let Some(ref v) = self.description_length {
            validate_choice(
                options::FIELD_DESCRIPTION_LENGTH,
                v,
                &catalog.description_lengths,
            )?;
        }
        if let Some(ref v) = self.seo_keywords_focus {
            validate_choice(
                options::FIELD_SEO_KEYWORDS_FOCUS,
                v,
                &catalog.seo_keywords_focus,
            )?;
        }
        if let Some(ref bv) = self.brand_voice {
            let opts = &catalog.brand_voice_options;
            if let Some(ref v) = bv.personality {
                validate_choice(options::FIELD_BRAND_PERSONALITY, v, &opts.personality)?;
            }
            if let Some(ref v) = bv.emotion {
                validate_choice(options::FIELD_BRAND_EMOTION, v, &opts.emotion)?;
            }
            if let Some(ref v) = bv.formality {
                validate_choice(options::FIELD_BRAND_FORMALITY, v, &opts.formality)?;
            }
        }
        if let Some(ref v) = self.key_features {
            validate_text_list("key_features", v, MAX_KEY_FEATURES)?;
        }
        if let Some(ref v) = self.custom_instructions {
            validate_text_len("custom_instructions", v, MAX_CUSTOM_INSTRUCTIONS_LEN)?;
        }
        if let Some(ref v) = self.example_description {
            validate_text_len("example_description", v, MAX_EXAMPLE_DESCRIPTION_LEN)?;
        }
        if let Some(ref ind) = self.industry_specific {
            if let Some(ref v) = ind.industry {
                validate_text_len("industry_specific.industry", v, MAX_INDUSTRY_LEN)?;
            }
            if let Some(ref v) = ind.specializations {
                validate_text_list("industry_specific.specializations", v, MAX_LIST_ITEMS)?;
            }
            if let Some(ref v) = ind.technical_level {
                validate_choice(options::FIELD_TECHNICAL_LEVEL, v, &catalog.technical_levels)?;
            }
        }
        if let Some(ref v) = self.avoid_words {
            validate_text_list("avoid_words", v, MAX_LIST_ITEMS)?;
        }
        if let Some(ref v) = self.must_include_elements {
            validate_text_list("must_include_elements", v, MAX_LIST_ITEMS)?;
        }
        if let Some(ref sections) = self.template_sections {
            for (i, section) in sections.iter().enumerate() {
                validate_choice(
                    options::FIELD_TEMPLATE_SECTIONS,
                    section,
                    &catalog.template_sections,
                )?;
                if sections[..i].contains(section) {
                    return Err(CoreError::Validation(format!(
                        "template_sections contains '{section}' more than once"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Names of the top-level fields present in this update, for logging.
    pub fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let checks: [(&'static str, bool); 13] = [
            ("tone", self.tone.is_some()),
            ("target_audience", self.target_audience.is_some()),
            ("writing_style", self.writing_style.is_some()),
            ("description_length", self.description_length.is_some()),
            ("seo_keywords_focus", self.seo_keywords_focus.is_some()),
            ("brand_voice", self.brand_voice.is_some()),
            ("key_features", self.key_features.is_some()),
            ("custom_instructions", self.custom_instructions.is_some()),
            ("example_description", self.example_description.is_some()),
            ("industry_specific", self.industry_specific.is_some()),
            ("avoid_words", self.avoid_words.is_some()),
            ("must_include_elements", self.must_include_elements.is_some()),
            ("template_sections", self.template_sections.is_some()),
        ];
        for (name, present) in checks {
            if present {
                fields.push(name);
            }
        }
        fields
    }
}

/// Walk an object (and nested objects) rejecting explicit `null` values.
fn reject_nulls(prefix: &str, map: &Map<String, Value>) -> Result<(), CoreError> {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Null => {
                return Err(CoreError::Validation(format!(
                    "{path} must not be null; omit the field to leave it unchanged"
                )));
            }
            Value::Object(inner) => reject_nulls(&path, inner)?,
            _ => {}
        }
    }
    Ok(())
}

fn validate_text_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

fn validate_text_list(field: &str, items: &[String], max_items: usize) -> Result<(), CoreError> {
    if items.len() > max_items {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum of {max_items} entries (got {})",
            items.len()
        )));
    }
    for item in items {
        if item.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "{field} entries must not be blank"
            )));
        }
        validate_text_len(field, item, MAX_LIST_ITEM_LEN)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
