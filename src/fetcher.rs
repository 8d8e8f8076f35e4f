use crate::caption::CaptionTrack;
use crate::config::Config;
use crate::error::{Result, TalkSubError};

use reqwest::StatusCode;
use tracing::{info, warn};

/// Where caption data comes from. Failures are returned, never retried.
pub trait CaptionSource: Send + Sync {
    /// Timed captions for a talk in one language.
    fn fetch(&self, talk_id: &str, language: &str) -> Result<CaptionTrack>;

    /// The provider's HTML transcript page for a talk in one language.
    fn fetch_transcript_html(&self, talk_id: &str, language: &str) -> Result<String>;
}

pub struct HttpCaptionSource {
    provider_url: String,
    client: reqwest::blocking::Client,
}

impl HttpCaptionSource {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            provider_url: config.provider_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn captions_url(&self, talk_id: &str, language: &str) -> String {
        format!(
            "{}/talks/subtitles/id/{}/lang/{}",
            self.provider_url, talk_id, language
        )
    }

    pub fn transcript_url(&self, talk_id: &str, language: &str) -> String {
        format!("{}/format/html", self.captions_url(talk_id, language))
    }

    fn get(&self, url: &str) -> Result<String> {
        info!("GET {}", url);
        let resp = self.client.get(url).send().map_err(|e| {
            warn!("GET {} failed: {}", url, e);
            TalkSubError::Network(format!("GET {}: {}", url, e))
        })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TalkSubError::NotFound(format!("GET {} returned 404", url)));
        }
        if !status.is_success() {
            warn!("GET {} returned {}", url, status);
            return Err(TalkSubError::Network(format!(
                "GET {} returned {}",
                url, status
            )));
        }

        resp.text()
            .map_err(|e| TalkSubError::Network(format!("failed to read body of {}: {}", url, e)))
    }
}

impl CaptionSource for HttpCaptionSource {
    fn fetch(&self, talk_id: &str, language: &str) -> Result<CaptionTrack> {
        let body = self.get(&self.captions_url(talk_id, language))?;
        parse_captions(&body).map_err(|err| match err {
            TalkSubError::NotFound(_) => TalkSubError::NotFound(format!(
                "talk {} has no '{}' captions",
                talk_id, language
            )),
            other => other,
        })
    }

    fn fetch_transcript_html(&self, talk_id: &str, language: &str) -> Result<String> {
        self.get(&self.transcript_url(talk_id, language))
    }
}

/// Decodes the provider's caption JSON. An empty caption list means the
/// provider has nothing for that language.
pub fn parse_captions(body: &str) -> Result<CaptionTrack> {
    let track: CaptionTrack = serde_json::from_str(body)
        .map_err(|e| TalkSubError::Parse(format!("invalid caption payload: {}", e)))?;
    if track.is_empty() {
        return Err(TalkSubError::NotFound("empty caption list".to_string()));
    }
    Ok(track)
}
