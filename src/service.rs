//! Cache-or-fetch orchestration of subtitle files.
//!
//! A file that exists at its cache path is final: it is returned as-is and
//! never refreshed. Work for one cache path is serialised, so concurrent
//! callers asking for the same file trigger a single fetch.

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{CaptionSource, HttpCaptionSource};
use crate::format::SubtitleFormat;
use crate::merger;
use crate::parser;
use crate::paths::resolve_path;
use crate::request::SubtitleRequest;
use crate::serialiser;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

pub struct SubtitleService<S = HttpCaptionSource> {
    base_dir: PathBuf,
    source: S,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl SubtitleService<HttpCaptionSource> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(&config.base_dir, HttpCaptionSource::new(config)?))
    }
}

impl<S: CaptionSource> SubtitleService<S> {
    pub fn new(base_dir: impl Into<PathBuf>, source: S) -> Self {
        Self {
            base_dir: base_dir.into(),
            source,
            locks: DashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Cache path the request resolves to.
    pub fn resolve(&self, request: &SubtitleRequest) -> PathBuf {
        resolve_path(
            &self.base_dir,
            request.base_filename(),
            request.languages(),
            request.format(),
        )
    }

    /// Returns the path of the requested subtitle file, producing it first
    /// if it is not cached yet. On failure nothing is written at the path.
    pub fn get_subtitle(&self, request: &SubtitleRequest) -> Result<PathBuf> {
        let result = match request.languages() {
            [language] => self.get_single(request, language),
            [first, second] => self.get_merged(request, first, second),
            _ => unreachable!("SubtitleRequest always holds one or two languages"),
        };
        if let Err(err) = &result {
            warn!(
                "no subtitle for talk {} ({}, {}): {}",
                request.talk_id(),
                request.languages().join("+"),
                request.format(),
                err
            );
        }
        result
    }

    /// Convenience wrapper building the request from its parts.
    pub fn subtitle_for(
        &self,
        talk_id: &str,
        base_filename: &str,
        languages: &[&str],
        time_lag_ms: f64,
        format: SubtitleFormat,
    ) -> Result<PathBuf> {
        let request = SubtitleRequest::new(
            talk_id,
            base_filename,
            languages.to_vec(),
            time_lag_ms,
            format,
        )?;
        self.get_subtitle(&request)
    }

    fn get_single(&self, request: &SubtitleRequest, language: &str) -> Result<PathBuf> {
        let path = resolve_path(
            &self.base_dir,
            request.base_filename(),
            &[language],
            request.format(),
        );
        self.with_key(&path, || {
            let contents = self.render(request, language)?;
            write_atomic(&path, contents.as_bytes())
        })?;
        Ok(path)
    }

    fn get_merged(&self, request: &SubtitleRequest, first: &str, second: &str) -> Result<PathBuf> {
        let path = self.resolve(request);
        self.with_key(&path, || {
            let first_path = self.get_single(&request.for_language(first), first)?;
            let second_path = self.get_single(&request.for_language(second), second)?;
            let first_text = fs::read_to_string(&first_path)?;
            let second_text = fs::read_to_string(&second_path)?;

            let merged = merger::merge_text(&first_text, &second_text);
            write_atomic(&path, merged.as_bytes())
        })?;
        Ok(path)
    }

    fn render(&self, request: &SubtitleRequest, language: &str) -> Result<String> {
        let talk_id = request.talk_id();
        info!(
            "fetching '{}' captions for talk {} as {}",
            language,
            talk_id,
            request.format()
        );
        let format = request.format();
        if format.is_timed() {
            let track = self.source.fetch(talk_id, language)?;
            serialiser::render_timed(&track, request.time_lag_ms(), format)
        } else {
            let html = self.source.fetch_transcript_html(talk_id, language)?;
            parser::render_plain_text(&html)
        }
    }

    /// Runs `produce` under the lock for `path` unless the file already exists.
    fn with_key<F>(&self, path: &Path, produce: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        if path.exists() {
            debug!("cache hit: {}", path.display());
            return Ok(());
        }

        let lock = self
            .locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let result = {
            let _guard = lock.lock();
            if path.exists() {
                debug!("cache filled while waiting: {}", path.display());
                Ok(())
            } else {
                produce()
            }
        };
        drop(lock);
        self.locks
            .remove_if(path, |_, lock| Arc::strong_count(lock) == 1);
        result
    }
}

/// Writes `contents` to `path` so that the path either doesn't exist or holds
/// the complete contents.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    info!("wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
