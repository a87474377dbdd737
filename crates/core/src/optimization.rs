//! Optimization request handling: per-request overrides, prompt
//! construction, and normalization of generated output.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::generation::{GenerationError, GenerationRequest};
use crate::options::{self, validate_choice, OptionsCatalog};
use crate::preferences::{PromptPreferences, MAX_CUSTOM_INSTRUCTIONS_LEN};
use crate::types::{DbId, Timestamp};

/// Sampling temperature used for description generation.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/* --------------------------------------------------------------------------
   Overrides
   -------------------------------------------------------------------------- */

/// Per-request overrides. Applied on top of stored preferences for one call
/// and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizeOverrides {
    pub tone: Option<String>,
    /// Replaces the stored custom instructions for this request.
    pub custom_prompt: Option<String>,
}

impl OptimizeOverrides {
    /// Parse overrides from a raw request body. An empty body means no
    /// overrides.
    pub fn from_slice(body: &[u8]) -> Result<Self, CoreError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| CoreError::Validation(format!("Invalid optimize request: {e}")))
    }

    pub fn validate(&self, catalog: &OptionsCatalog) -> Result<(), CoreError> {
        if let Some(ref tone) = self.tone {
            validate_choice(options::FIELD_TONE, tone, &catalog.tones)?;
        }
        if let Some(ref prompt) = self.custom_prompt {
            let len = prompt.chars().count();
            if len > MAX_CUSTOM_INSTRUCTIONS_LEN {
                return Err(CoreError::Validation(format!(
                    "custom_prompt exceeds maximum length of {MAX_CUSTOM_INSTRUCTIONS_LEN} characters (got {len})"
                )));
            }
        }
        Ok(())
    }

    /// Compute the effective preferences for one request.
    ///
    /// Shallow, field-level: only `tone` and `custom_instructions` can
    /// change. A blank `custom_prompt` is treated as absent.
    pub fn apply_to(&self, stored: &PromptPreferences) -> PromptPreferences {
        let mut effective = stored.clone();
        if let Some(ref tone) = self.tone {
            effective.tone = tone.clone();
        }
        if let Some(ref prompt) = self.custom_prompt {
            if !prompt.trim().is_empty() {
                effective.custom_instructions = Some(prompt.clone());
            }
        }
        effective
    }
}

/* --------------------------------------------------------------------------
   Product context
   -------------------------------------------------------------------------- */

/// The product attributes that feed into a prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductContext {
    pub title: String,
    pub description: Option<String>,
    pub product_type: Option<String>,
    pub vendor: Option<String>,
    pub tags: Vec<String>,
}

impl ProductContext {
    /// The current description, or empty when the product has none.
    pub fn original_description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// A product with neither title nor description cannot be optimized.
    pub fn ensure_usable(&self) -> Result<(), GenerationError> {
        if self.title.trim().is_empty() && self.original_description().trim().is_empty() {
            return Err(GenerationError::invalid_input(
                "Product has neither a title nor a description",
            ));
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
   Prompt preview
   -------------------------------------------------------------------------- */

/// Title used for prompt previews when the caller supplies none.
pub const SAMPLE_PRODUCT_TITLE: &str = "Sample Product";

/// Description used for prompt previews when the caller supplies none.
pub const SAMPLE_PRODUCT_DESCRIPTION: &str = "This is a sample product description.";

/// Request body for rendering a prompt without calling the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptPreviewRequest {
    pub tone: Option<String>,
    pub custom_prompt: Option<String>,
    pub product_title: Option<String>,
    pub original_description: Option<String>,
}

impl PromptPreviewRequest {
    /// Parse a preview request from a raw body. An empty body previews the
    /// stored preferences against the sample product.
    pub fn from_slice(body: &[u8]) -> Result<Self, CoreError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| CoreError::Validation(format!("Invalid preview request: {e}")))
    }

    pub fn overrides(&self) -> OptimizeOverrides {
        OptimizeOverrides {
            tone: self.tone.clone(),
            custom_prompt: self.custom_prompt.clone(),
        }
    }

    /// The product to render against, falling back to the sample product.
    pub fn sample_product(&self) -> ProductContext {
        ProductContext {
            title: self
                .product_title
                .clone()
                .unwrap_or_else(|| SAMPLE_PRODUCT_TITLE.to_string()),
            description: Some(
                self.original_description
                    .clone()
                    .unwrap_or_else(|| SAMPLE_PRODUCT_DESCRIPTION.to_string()),
            ),
            ..ProductContext::default()
        }
    }
}

/* --------------------------------------------------------------------------
   Result
   -------------------------------------------------------------------------- */

/// Outcome of a successful optimization. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub product_id: DbId,
    pub original_description: String,
    pub optimized_description: String,
    pub generated_at: Timestamp,
}

/* --------------------------------------------------------------------------
   Prompt construction
   -------------------------------------------------------------------------- */

/// Output budget per description length.
pub fn max_output_tokens(description_length: &str) -> u32 {
    match description_length {
        "short" => 512,
        "long" => 2048,
        "comprehensive" => 4096,
        _ => 1024,
    }
}

/// Rough word target per description length, stated in the prompt.
fn word_target(description_length: &str) -> &'static str {
    match description_length {
        "short" => "about 50-100 words",
        "long" => "about 300-450 words",
        "comprehensive" => "450 words or more",
        _ => "about 150-250 words",
    }
}

/// Render the prompt sent to the generator.
pub fn build_prompt(prefs: &PromptPreferences, product: &ProductContext) -> String {
    let mut p = String::new();

    p.push_str(
        "You are an expert e-commerce copywriter and SEO specialist. Rewrite the product \
         description below so it is engaging, search-engine friendly and conversion focused. \
         Keep every factual claim from the original and do not invent specifications.\n\n",
    );

    let _ = writeln!(p, "Product title: {}", product.title.trim());
    if let Some(ref product_type) = product.product_type {
        let _ = writeln!(p, "Product type: {product_type}");
    }
    if let Some(ref vendor) = product.vendor {
        let _ = writeln!(p, "Vendor: {vendor}");
    }
    if !product.tags.is_empty() {
        let _ = writeln!(p, "Tags: {}", product.tags.join(", "));
    }
    let _ = writeln!(
        p,
        "Original description:\n{}\n",
        product.original_description().trim()
    );

    p.push_str("Guidelines:\n");
    let _ = writeln!(p, "- Maintain a {} tone", prefs.tone);
    let _ = writeln!(p, "- Write for a {} audience", prefs.target_audience);
    let _ = writeln!(p, "- Use a {} writing style", prefs.writing_style);
    let _ = writeln!(
        p,
        "- Apply {} SEO keyword optimization",
        prefs.seo_keywords_focus
    );
    let _ = writeln!(
        p,
        "- Length: {} ({})",
        prefs.description_length,
        word_target(&prefs.description_length)
    );
    if !prefs.key_features.is_empty() {
        let _ = writeln!(
            p,
            "- Highlight these key features: {}",
            prefs.key_features.join(", ")
        );
    }
    let bv = &prefs.brand_voice;
    let _ = writeln!(
        p,
        "- Brand voice: {} personality, {} emotion, {} formality",
        bv.personality, bv.emotion, bv.formality
    );

    let ind = &prefs.industry_specific;
    if let Some(ref industry) = ind.industry {
        let _ = write!(p, "- Industry: {industry}");
        if !ind.specializations.is_empty() {
            let _ = write!(p, " (specializing in {})", ind.specializations.join(", "));
        }
        p.push('\n');
    }
    let _ = writeln!(p, "- Technical level: {}", ind.technical_level);

    if !prefs.avoid_words.is_empty() {
        let _ = writeln!(p, "- Avoid these words: {}", prefs.avoid_words.join(", "));
    }
    if !prefs.must_include_elements.is_empty() {
        let _ = writeln!(
            p,
            "- Must include: {}",
            prefs.must_include_elements.join(", ")
        );
    }
    if !prefs.template_sections.is_empty() {
        let sections: Vec<String> = prefs
            .template_sections
            .iter()
            .map(|s| s.replace('_', " "))
            .collect();
        let _ = writeln!(
            p,
            "- Structure the description in these sections, in order: {}",
            sections.join(", ")
        );
    }
    if let Some(ref instructions) = prefs.custom_instructions {
        let _ = writeln!(p, "- Custom instructions: {instructions}");
    }
    if let Some(ref example) = prefs.example_description {
        let _ = writeln!(
            p,
            "\nMatch the style of this example description:\n{example}"
        );
    }

    p.push_str(
        "\nReturn only the new description as Shopify-ready HTML, without commentary or \
         Markdown.\n",
    );
    p
}

/// Build the full generator request for a product.
pub fn build_generation_request(
    prefs: &PromptPreferences,
    product: &ProductContext,
) -> GenerationRequest {
    GenerationRequest {
        prompt: build_prompt(prefs, product),
        max_output_tokens: max_output_tokens(&prefs.description_length),
        temperature: GENERATION_TEMPERATURE,
    }
}

/* --------------------------------------------------------------------------
   Output normalization
   -------------------------------------------------------------------------- */

/// Clean up generator output into a Shopify-ready HTML fragment.
///
/// Strips a surrounding Markdown code fence, trims whitespace, and wraps
/// plain text in `<p>` tags. Empty output is malformed.
pub fn normalize_output(raw: &str) -> Result<String, GenerationError> {
    let mut text = raw.trim();

    if let Some(fenced) = text.strip_prefix("```") {
        let fenced = fenced.strip_suffix("```").unwrap_or(fenced);
        text = strip_info_string(fenced).trim();
    }

    if text.is_empty() {
        return Err(GenerationError::malformed_output(
            "Generator returned an empty description",
        ));
    }

    if text.starts_with('<') {
        Ok(text.to_string())
    } else {
        Ok(format!("<p>{text}</p>"))
    }
}

/// Drop the info string (e.g. `html`) that may follow an opening fence,
/// whether the body starts on the next line or on the fence line itself.
fn strip_info_string(fenced: &str) -> &str {
    match fenced.split_once('\n') {
        Some((first, rest)) if !first.contains('<') => rest,
        _ => fenced
            .find(|c: char| c == '<' || c.is_whitespace())
            .map_or("", |i| &fenced[i..]),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
