//! Request and response models for the backend API.
//!
//! Field names follow the backend's JSON exactly (camelCase where the page
//! sent camelCase), so these types are the wire format.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Search keywords.
    pub keywords: String,
    /// arXiv category to scope the query (e.g. "cs.CL").
    pub category: String,
    /// Time range: all, week, month, or year.
    #[serde(rename = "dateRange")]
    pub date_range: String,
    /// Sort rule: date or correlation.
    pub selectivityrule: String,
}

/// One paper in a search response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Paper {
    /// Paper title.
    pub title: String,
    /// Abstract text.
    #[serde(rename = "abstract")]
    pub summary: String,
    /// Author names.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Publication date, ISO formatted.
    pub date: String,
    /// Direct PDF link.
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
    /// TeX source archive link, when the backend includes one.
    #[serde(rename = "sourceUrl", default)]
    pub source_url: Option<String>,
}

/// Body for `POST /api/settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsRequest {
    /// Model API base URL.
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    /// Model API key.
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// Model name.
    pub model: String,
}

/// Acknowledgement from `POST /api/settings`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SettingsAck {
    /// Human-readable confirmation message.
    pub message: String,
}

/// Body for the chat endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRequest {
    /// The user's message.
    pub message: String,
}

/// Body for `POST /api/pdf/sections`.
///
/// Either a direct PDF URL or a paper title to match; both may be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionsRequest {
    /// Direct PDF URL to parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Paper title to match on arXiv.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Response from `POST /api/pdf/sections`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionsResponse {
    /// Section titles, document order not guaranteed by the backend.
    #[serde(default)]
    pub sections: Vec<String>,
    /// PDF link the backend matched for a title query, if any.
    #[serde(default)]
    pub matched_pdf: Option<String>,
}

/// Chat function selector, mirroring the page's function dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatMode {
    /// Translate a paper passage.
    Translate,
    /// Summarise a paper passage.
    Summarize,
    /// Explain a paper passage.
    Explain,
    /// Multi-round conversation.
    #[default]
    Multichat,
}

impl ChatMode {
    /// All modes, in dropdown order.
    pub const ALL: &'static [ChatMode] = &[
        ChatMode::Translate,
        ChatMode::Summarize,
        ChatMode::Explain,
        ChatMode::Multichat,
    ];

    /// Endpoint path for this mode.
    pub fn path(&self) -> &'static str {
        match self {
            ChatMode::Translate => "/api/translate",
            ChatMode::Summarize => "/api/summarize",
            ChatMode::Explain => "/api/explain",
            ChatMode::Multichat => "/api/multichat",
        }
    }

    /// The next mode in dropdown order, wrapping around.
    pub fn next(&self) -> ChatMode {
        match self {
            ChatMode::Translate => ChatMode::Summarize,
            ChatMode::Summarize => ChatMode::Explain,
            ChatMode::Explain => ChatMode::Multichat,
            ChatMode::Multichat => ChatMode::Translate,
        }
    }

    /// Parse a mode name as passed on the command line.
    pub fn parse(name: &str) -> Option<ChatMode> {
        match name {
            "translate" => Some(ChatMode::Translate),
            "summarize" => Some(ChatMode::Summarize),
            "explain" => Some(ChatMode::Explain),
            "multichat" => Some(ChatMode::Multichat),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChatMode::Translate => "translate",
            ChatMode::Summarize => "summarize",
            ChatMode::Explain => "explain",
            ChatMode::Multichat => "multichat",
        };
        write!(f, "{}", name)
    }
}
