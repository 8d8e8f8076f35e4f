use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::TalkSubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum SubtitleFormat {
    /// SubRip, comma before milliseconds.
    Srt,
    /// WebVTT, with a `WEBVTT` header.
    Vtt,
    /// Plain transcript text.
    Txt,
}

impl SubtitleFormat {
    /// Cache directory, relative to the base directory.
    pub fn directory(self) -> &'static str {
        match self {
            SubtitleFormat::Srt => "static/srt",
            SubtitleFormat::Vtt => "static/vtt",
            SubtitleFormat::Txt => "static/txt",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            SubtitleFormat::Srt => ".srt",
            SubtitleFormat::Vtt => ".vtt",
            SubtitleFormat::Txt => ".txt",
        }
    }

    pub fn is_timed(self) -> bool {
        self != SubtitleFormat::Txt
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubtitleFormat::Srt => write!(fmt, "srt"),
            SubtitleFormat::Vtt => write!(fmt, "vtt"),
            SubtitleFormat::Txt => write!(fmt, "txt"),
        }
    }
}

impl FromStr for SubtitleFormat {
    type Err = TalkSubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "srt" => Ok(SubtitleFormat::Srt),
            "vtt" | "webvtt" => Ok(SubtitleFormat::Vtt),
            "txt" | "text" => Ok(SubtitleFormat::Txt),
            other => Err(TalkSubError::InvalidRequest(format!(
                "unsupported subtitle format '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_suffixes() {
        assert_eq!("srt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Srt);
        assert_eq!(".VTT".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Vtt);
        assert_eq!("txt".parse::<SubtitleFormat>().unwrap(), SubtitleFormat::Txt);
        assert!("ass".parse::<SubtitleFormat>().is_err());
    }

    #[test]
    fn only_txt_is_untimed() {
        assert!(SubtitleFormat::Srt.is_timed());
        assert!(SubtitleFormat::Vtt.is_timed());
        assert!(!SubtitleFormat::Txt.is_timed());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for format in [SubtitleFormat::Srt, SubtitleFormat::Vtt, SubtitleFormat::Txt] {
            assert_eq!(format.to_string().parse::<SubtitleFormat>().unwrap(), format);
            assert!(format.suffix().ends_with(&format.to_string()));
        }
    }
}
