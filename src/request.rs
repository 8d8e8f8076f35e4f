use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, TalkSubError};
use crate::format::SubtitleFormat;

/// One rendering job: which talk, which language(s), in which format.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleRequest {
    talk_id: String,
    languages: Vec<String>,
    base_filename: String,
    time_lag_ms: f64,
    format: SubtitleFormat,
}

impl SubtitleRequest {
    pub fn new<S: Into<String>>(
        talk_id: impl Into<String>,
        base_filename: impl Into<String>,
        languages: Vec<S>,
        time_lag_ms: f64,
        format: SubtitleFormat,
    ) -> Result<Self> {
        let talk_id = talk_id.into();
        let base_filename = base_filename.into();
        let languages: Vec<String> = languages.into_iter().map(Into::into).collect();

        if talk_id.trim().is_empty() {
            return Err(invalid("talk id is empty".to_string()));
        }
        if languages.is_empty() || languages.len() > 2 {
            return Err(invalid(format!(
                "expected one or two languages, got {}",
                languages.len()
            )));
        }
        if let Some(code) = languages.iter().find(|l| !language_code().is_match(l.as_str())) {
            return Err(invalid(format!("invalid language code '{}'", code)));
        }
        if base_filename.is_empty()
            || base_filename == "."
            || base_filename == ".."
            || base_filename.contains(|c: char| c == '/' || c == '\\' || c == '\0')
        {
            return Err(invalid(format!("invalid base filename '{}'", base_filename)));
        }
        if !time_lag_ms.is_finite() {
            return Err(invalid("time lag must be a finite number".to_string()));
        }

        Ok(Self {
            talk_id,
            languages,
            base_filename,
            time_lag_ms,
            format,
        })
    }

    pub fn talk_id(&self) -> &str {
        &self.talk_id
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn base_filename(&self) -> &str {
        &self.base_filename
    }

    pub fn time_lag_ms(&self) -> f64 {
        self.time_lag_ms
    }

    pub fn format(&self) -> SubtitleFormat {
        self.format
    }

    /// The same job restricted to a single language.
    pub fn for_language(&self, language: &str) -> Self {
        Self {
            languages: vec![language.to_string()],
            ..self.clone()
        }
    }
}

fn language_code() -> &'static Regex {
    static CODE: OnceLock<Regex> = OnceLock::new();
    CODE.get_or_init(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]+)*$").expect("valid language regex"))
}

fn invalid(msg: String) -> TalkSubError {
    TalkSubError::InvalidRequest(msg)
}
