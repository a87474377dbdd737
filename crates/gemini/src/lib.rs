//! Google Gemini client used as the description generator.
//!
//! [`GeminiClient`] implements
//! [`shopseo_core::generation::DescriptionGenerator`] on top of the
//! `generateContent` REST endpoint and classifies every failure into a
//! [`shopseo_core::generation::GenerationErrorKind`].

pub mod client;
pub mod config;
pub mod messages;

pub use client::{GeminiClient, GeminiError};
pub use config::GeminiConfig;
