//! Data models shared across en2ja.
//!
//! - `language`: the supported content languages and their codes
//! - `google`: request/response bodies of the Google Cloud Translation v2 API
//! - `content`: localized CMS fields and their translation state

// Author: kelexine (https://github.com/kelexine)

pub mod content;
pub mod google;
pub mod language;

pub use content::{LocalizedText, TranslationState};
pub use language::Language;
