// Google Cloud Translation v2 wire types
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Body of `POST /language/translate/v2`.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateTextRequest {
    /// Texts to translate. Results come back in the same order.
    pub q: Vec<String>,
    /// Source language; omitted to let Google detect it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub target: String,
    /// `text` keeps the output free of HTML entities.
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateTextResponse {
    pub data: Option<TranslationsData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationsData {
    #[serde(default)]
    pub translations: Vec<TranslationItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationItem {
    pub translated_text: String,
    pub detected_source_language: Option<String>,
}

/// Google API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: Option<GoogleErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorDetail {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl GoogleErrorResponse {
    /// Extract the most useful message from a raw error body.
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: GoogleErrorResponse = serde_json::from_str(body).ok()?;
        let error = parsed.error?;
        error.message.or(error.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_source() {
        let request = TranslateTextRequest {
            q: vec!["Hello".to_string()],
            source: None,
            target: "ja".to_string(),
            format: "text".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("source").is_none());
        assert_eq!(json["q"][0], "Hello");
        assert_eq!(json["format"], "text");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"data":{"translations":[{"translatedText":"こんにちは","detectedSourceLanguage":"en"}]}}"#;
        let response: TranslateTextResponse = serde_json::from_str(body).unwrap();
        let item = &response.data.unwrap().translations[0];
        assert_eq!(item.translated_text, "こんにちは");
        assert_eq!(item.detected_source_language.as_deref(), Some("en"));
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error":{"code":403,"message":"API key not valid.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            GoogleErrorResponse::message_from(body).as_deref(),
            Some("API key not valid.")
        );
        assert_eq!(GoogleErrorResponse::message_from("not json"), None);
    }
}
