use serde::{Deserialize, Serialize};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_SESSION_ID: &str = "default";
pub const APOLOGY_TEXT: &str =
    "I apologize, but I'm having trouble processing your request right now. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Transport,
    Guide,
    Festival,
    Accommodation,
    Adventure,
    Food,
    Weather,
    Plan,
    Default,
}

impl Intent {
    /// Priority order used by the classifier, `Default` last.
    pub const ALL: [Intent; 10] = [
        Intent::Greeting,
        Intent::Transport,
        Intent::Guide,
        Intent::Festival,
        Intent::Accommodation,
        Intent::Adventure,
        Intent::Food,
        Intent::Weather,
        Intent::Plan,
        Intent::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Transport => "transport",
            Self::Guide => "guide",
            Self::Festival => "festival",
            Self::Accommodation => "accommodation",
            Self::Adventure => "adventure",
            Self::Food => "food",
            Self::Weather => "weather",
            Self::Plan => "plan",
            Self::Default => "default",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    Remote,
    Fallback,
    Error,
}

impl ProcessingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Fallback => "fallback",
            Self::Error => "error",
        }
    }
}

/// Normalizes a caller supplied language tag: `" hi-IN "` becomes `"hi"`,
/// blank or missing input becomes `"en"`.
pub fn normalize_language_code(value: Option<&str>) -> String {
    let trimmed = value.map(str::trim).unwrap_or_default().to_lowercase();
    let primary = trimmed
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_string();

    if primary.is_empty() {
        DEFAULT_LANGUAGE.to_string()
    } else {
        primary
    }
}

pub fn session_or_default(session_id: Option<&str>) -> String {
    match session_id.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_SESSION_ID.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    pub message: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "response")]
    pub text: String,
    pub language: String,
    pub processing_mode: ProcessingMode,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_mode: Option<String>,
}

impl ResponseEnvelope {
    pub fn remote(
        text: String,
        language: String,
        session_id: String,
        backend_mode: Option<String>,
    ) -> Self {
        Self {
            text,
            language,
            processing_mode: ProcessingMode::Remote,
            session_id,
            intent: None,
            backend_mode,
        }
    }

    pub fn fallback(text: String, language: String, session_id: String, intent: Intent) -> Self {
        Self {
            text,
            language,
            processing_mode: ProcessingMode::Fallback,
            session_id,
            intent: Some(intent),
            backend_mode: None,
        }
    }

    pub fn error(language: String, session_id: String) -> Self {
        Self {
            text: APOLOGY_TEXT.to_string(),
            language,
            processing_mode: ProcessingMode::Error,
            session_id,
            intent: None,
            backend_mode: None,
        }
    }
}
