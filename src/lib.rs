//! Fetches talk captions from the provider, renders them as SRT, VTT or plain
//! text, merges two languages into one bilingual file and caches the results
//! on disk.

pub mod caption;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod format;
pub mod merger;
pub mod parser;
pub mod paths;
pub mod request;
pub mod serialiser;
pub mod service;

pub use caption::{CaptionItem, CaptionTrack};
pub use config::Config;
pub use error::{Result, TalkSubError};
pub use fetcher::{CaptionSource, HttpCaptionSource};
pub use format::SubtitleFormat;
pub use request::SubtitleRequest;
pub use service::SubtitleService;
