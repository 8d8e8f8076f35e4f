use std::time::Duration;

use serde::Deserialize;

/// A single timed caption as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptionItem {
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(rename = "content")]
    pub text: String,
    #[serde(rename = "startOfParagraph", default)]
    pub is_paragraph_start: bool,
    #[serde(rename = "startTime")]
    pub start_time_ms: u64,
}

impl CaptionItem {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Captions for one talk in one language, in temporal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaptionTrack {
    pub captions: Vec<CaptionItem>,
}

impl CaptionTrack {
    pub fn new(captions: Vec<CaptionItem>) -> Self {
        Self { captions }
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.captions.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaptionItem> {
        self.captions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialises_provider_payload() {
        let body = r#"{"captions":[
            {"duration":2000,"content":"Hello","startOfParagraph":true,"startTime":61000},
            {"duration":0,"content":"world","startOfParagraph":false,"startTime":63000}
        ]}"#;

        let track: CaptionTrack = serde_json::from_str(body).unwrap();

        assert_eq!(track.len(), 2);
        assert_eq!(track.captions[0].start_time_ms, 61_000);
        assert_eq!(track.captions[0].duration(), Duration::from_secs(2));
        assert!(track.captions[0].is_paragraph_start);
        assert_eq!(track.captions[1].text, "world");
    }

    #[test]
    fn missing_paragraph_flag_defaults_to_false() {
        let body = r#"{"captions":[{"duration":10,"content":"x","startTime":0}]}"#;
        let track: CaptionTrack = serde_json::from_str(body).unwrap();
        assert!(!track.captions[0].is_paragraph_start);
    }
}
