//! Core download identifiers and request types.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use super::errors::FetchError;

// ============================================================================
// Model Identifier
// ============================================================================

/// A remote model identifier such as `"unsloth/Llama-3-GGUF"`.
///
/// The `namespace/name` shape is a convention, not a requirement: a bare
/// `"gpt2"` is accepted. The only invariant is that the identifier is not
/// empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelIdentifier(String);

impl ModelIdentifier {
    /// Create an identifier, rejecting empty input.
    pub fn new(raw: impl Into<String>) -> Result<Self, FetchError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FetchError::invalid_request("model identifier cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The full identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final `/`-delimited segment (the repository name).
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The leading segment when the identifier has a namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once('/').map(|(ns, _)| ns)
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelIdentifier {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ModelIdentifier {
    type Error = FetchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelIdentifier> for String {
    fn from(id: ModelIdentifier) -> Self {
        id.0
    }
}

impl AsRef<str> for ModelIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Category
// ============================================================================

/// Closed set of named subfolders used to organize downloads by asset type.
///
/// The string forms are the folder names on disk and are matched exactly.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
pub enum Category {
    /// No category; the default subfolder is used.
    #[default]
    #[strum(serialize = "none")]
    #[serde(rename = "none")]
    None,
    #[strum(serialize = "animatediff_models")]
    #[serde(rename = "animatediff_models")]
    AnimatediffModels,
    #[strum(serialize = "animatediff_motion_lora")]
    #[serde(rename = "animatediff_motion_lora")]
    AnimatediffMotionLora,
    #[strum(serialize = "animatediff_video_formats")]
    #[serde(rename = "animatediff_video_formats")]
    AnimatediffVideoFormats,
    #[strum(serialize = "blip")]
    #[serde(rename = "blip")]
    Blip,
    #[strum(serialize = "checkpoints")]
    #[serde(rename = "checkpoints")]
    Checkpoints,
    #[strum(serialize = "classifiers")]
    #[serde(rename = "classifiers")]
    Classifiers,
    #[strum(serialize = "clip")]
    #[serde(rename = "clip")]
    Clip,
    #[strum(serialize = "clip_vision")]
    #[serde(rename = "clip_vision")]
    ClipVision,
    #[strum(serialize = "CogVideo")]
    #[serde(rename = "CogVideo")]
    CogVideo,
    #[strum(serialize = "configs")]
    #[serde(rename = "configs")]
    Configs,
    #[strum(serialize = "controlnet")]
    #[serde(rename = "controlnet")]
    Controlnet,
    #[strum(serialize = "control-lora")]
    #[serde(rename = "control-lora")]
    ControlLora,
    #[strum(serialize = "deforum")]
    #[serde(rename = "deforum")]
    Deforum,
    #[strum(serialize = "diffusers")]
    #[serde(rename = "diffusers")]
    Diffusers,
    #[strum(serialize = "diffusion_models")]
    #[serde(rename = "diffusion_models")]
    DiffusionModels,
    #[strum(serialize = "embeddings")]
    #[serde(rename = "embeddings")]
    Embeddings,
    #[strum(serialize = "emotion2vec")]
    #[serde(rename = "emotion2vec")]
    Emotion2vec,
    #[strum(serialize = "facedetection")]
    #[serde(rename = "facedetection")]
    Facedetection,
    #[strum(serialize = "FILM")]
    #[serde(rename = "FILM")]
    Film,
    #[strum(serialize = "gligen")]
    #[serde(rename = "gligen")]
    Gligen,
    #[strum(serialize = "hypernetworks")]
    #[serde(rename = "hypernetworks")]
    Hypernetworks,
    #[strum(serialize = "insightface")]
    #[serde(rename = "insightface")]
    Insightface,
    #[strum(serialize = "Joy_caption")]
    #[serde(rename = "Joy_caption")]
    JoyCaption,
    #[strum(serialize = "layerstyle")]
    #[serde(rename = "layerstyle")]
    Layerstyle,
    #[strum(serialize = "liveportrait")]
    #[serde(rename = "liveportrait")]
    Liveportrait,
    #[strum(serialize = "LLM")]
    #[serde(rename = "LLM")]
    Llm,
    #[strum(serialize = "loras")]
    #[serde(rename = "loras")]
    Loras,
    #[strum(serialize = "onnx")]
    #[serde(rename = "onnx")]
    Onnx,
    #[strum(serialize = "photomaker")]
    #[serde(rename = "photomaker")]
    Photomaker,
    #[strum(serialize = "style_models")]
    #[serde(rename = "style_models")]
    StyleModels,
    #[strum(serialize = "unet")]
    #[serde(rename = "unet")]
    Unet,
    #[strum(serialize = "upscale_models")]
    #[serde(rename = "upscale_models")]
    UpscaleModels,
    #[strum(serialize = "vae")]
    #[serde(rename = "vae")]
    Vae,
    #[strum(serialize = "vae_approx")]
    #[serde(rename = "vae_approx")]
    VaeApprox,
    #[strum(serialize = "wav2vec")]
    #[serde(rename = "wav2vec")]
    Wav2vec,
    #[strum(serialize = "xlabs")]
    #[serde(rename = "xlabs")]
    Xlabs,
}

impl Category {
    /// Parse a category name, listing the valid names on failure.
    pub fn parse(name: &str) -> Result<Self, FetchError> {
        Self::from_str(name.trim()).map_err(|_| {
            FetchError::invalid_request(format!(
                "unknown category '{name}'. Valid categories: {}",
                Self::names().join(", ")
            ))
        })
    }

    /// Whether this is the `none` placeholder.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// The subfolder name, or `None` for [`Category::None`].
    pub fn folder(self) -> Option<&'static str> {
        if self.is_none() {
            None
        } else {
            Some(self.into())
        }
    }

    /// All category names in declaration order, `none` first.
    pub fn names() -> Vec<&'static str> {
        Self::iter().map(Into::into).collect()
    }
}

// ============================================================================
// Download Request
// ============================================================================

/// How a model is transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStrategy {
    /// Fetch the entire remote tree as one logical unit.
    Snapshot,
    /// Fetch an explicit list of relative file paths, one by one.
    #[default]
    Selective,
}

impl DownloadStrategy {
    /// Map the host UI's boolean toggle (`true` = full model) to a strategy.
    #[must_use]
    pub const fn from_full_model_flag(full_model: bool) -> Self {
        if full_model {
            Self::Snapshot
        } else {
            Self::Selective
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empties.
///
/// `" a.bin, ,b.bin ,"` yields `["a.bin", "b.bin"]`.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// One invocation's worth of download intent.
///
/// Built once and not mutated by the orchestrator.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Model identifier, collection slug or collection URL as typed by the user.
    pub identifier: String,
    /// Requested relative file paths; empty means "all".
    pub files: Vec<String>,
    /// Destination category.
    pub category: Category,
    /// Explicit destination directory override (may be empty or the placeholder).
    pub destination_override: Option<PathBuf>,
    /// Relative paths that must not end up in the destination.
    pub exclude: Vec<String>,
    /// Transfer strategy.
    pub strategy: DownloadStrategy,
    /// Explicit per-call credential.
    pub token: Option<String>,
    /// Treat a bare slug as a collection even when it is not a URL.
    pub expand_collection: bool,
    /// Send the ambient credential with the collection lookup.
    pub authorize_collection: bool,
}

impl DownloadRequest {
    /// Create a request for one identifier with default options.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            files: Vec::new(),
            category: Category::None,
            destination_override: None,
            exclude: Vec::new(),
            strategy: DownloadStrategy::default(),
            token: None,
            expand_collection: false,
            authorize_collection: true,
        }
    }

    /// Set the requested files from a comma-separated string.
    #[must_use]
    pub fn with_files_csv(mut self, raw: &str) -> Self {
        self.files = split_list(raw);
        self
    }

    /// Set the requested files.
    #[must_use]
    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }

    /// Set the exclusion list from a comma-separated string.
    #[must_use]
    pub fn with_exclude_csv(mut self, raw: &str) -> Self {
        self.exclude = split_list(raw);
        self
    }

    /// Set the destination category.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the explicit destination override.
    #[must_use]
    pub fn with_destination(mut self, path: Option<PathBuf>) -> Self {
        self.destination_override = path;
        self
    }

    /// Set the transfer strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: DownloadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the explicit credential. Empty strings count as "not provided".
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Treat the identifier as a collection slug.
    #[must_use]
    pub const fn with_expand_collection(mut self, expand: bool) -> Self {
        self.expand_collection = expand;
        self
    }

    /// Choose between an authorized and a public collection lookup.
    #[must_use]
    pub const fn with_authorize_collection(mut self, authorize: bool) -> Self {
        self.authorize_collection = authorize;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rejects_empty() {
        assert!(ModelIdentifier::new("").is_err());
        assert!(ModelIdentifier::new("   ").is_err());
    }

    #[test]
    fn test_identifier_segments() {
        let id = ModelIdentifier::new(" unsloth/Llama-3-GGUF ").unwrap();
        assert_eq!(id.as_str(), "unsloth/Llama-3-GGUF");
        assert_eq!(id.name(), "Llama-3-GGUF");
        assert_eq!(id.namespace(), Some("unsloth"));

        let bare = ModelIdentifier::new("gpt2").unwrap();
        assert_eq!(bare.name(), "gpt2");
        assert_eq!(bare.namespace(), None);
    }

    #[test]
    fn test_identifier_serde() {
        let id: ModelIdentifier = serde_json::from_str("\"org/model\"").unwrap();
        assert_eq!(id.as_str(), "org/model");
        assert!(serde_json::from_str::<ModelIdentifier>("\"\"").is_err());
    }

    #[test]
    fn test_category_parse_exact_names() {
        assert_eq!(Category::parse("loras").unwrap(), Category::Loras);
        assert_eq!(Category::parse("control-lora").unwrap(), Category::ControlLora);
        assert_eq!(Category::parse("FILM").unwrap(), Category::Film);
        assert_eq!(Category::parse("none").unwrap(), Category::None);
        assert!(Category::parse("Loras").is_err());
    }

    #[test]
    fn test_category_parse_error_lists_names() {
        let err = Category::parse("nope").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("checkpoints"));
        assert!(msg.contains("xlabs"));
    }

    #[test]
    fn test_category_folder_matches_display() {
        for category in Category::iter() {
            match category.folder() {
                None => assert!(category.is_none()),
                Some(folder) => assert_eq!(folder, category.to_string()),
            }
        }
        assert_eq!(Category::names().len(), 37);
        assert_eq!(Category::names()[0], "none");
    }

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(split_list(" a.bin, ,b.bin ,"), vec!["a.bin", "b.bin"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,, ").is_empty());
    }

    #[test]
    fn test_request_builder() {
        let request = DownloadRequest::new("org/model")
            .with_files_csv("a.bin, b.bin")
            .with_exclude_csv("b.bin")
            .with_category(Category::Vae)
            .with_strategy(DownloadStrategy::from_full_model_flag(false))
            .with_token(Some(String::new()));

        assert_eq!(request.files, vec!["a.bin", "b.bin"]);
        assert_eq!(request.exclude, vec!["b.bin"]);
        assert_eq!(request.category, Category::Vae);
        assert_eq!(request.strategy, DownloadStrategy::Selective);
        assert!(request.token.is_none());
        assert!(request.authorize_collection);
        assert!(!request.expand_collection);
    }

    #[test]
    fn test_strategy_from_flag() {
        assert_eq!(
            DownloadStrategy::from_full_model_flag(true),
            DownloadStrategy::Snapshot
        );
        assert_eq!(
            DownloadStrategy::from_full_model_flag(false),
            DownloadStrategy::Selective
        );
    }
}
