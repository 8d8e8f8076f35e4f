use crate::caption::{CaptionItem, CaptionTrack};
use crate::error::{Result, TalkSubError};
use crate::format::SubtitleFormat;

use std::io::Write;
use std::time::Duration;

/// Renders a caption track as SRT or VTT, shifting every start time by
/// `time_lag_ms`. Fractional lag is floored.
pub fn render_timed(track: &CaptionTrack, time_lag_ms: f64, format: SubtitleFormat) -> Result<String> {
    let separator = match format {
        SubtitleFormat::Srt => ',',
        SubtitleFormat::Vtt => '.',
        SubtitleFormat::Txt => {
            return Err(TalkSubError::InvalidRequest(
                "plain text is not a timed format".to_string(),
            ))
        }
    };

    let mut buf = Vec::new();
    if format == SubtitleFormat::Vtt {
        writeln!(buf, "WEBVTT")?;
        writeln!(buf)?;
    }
    write_items(&mut buf, track, lag_millis(time_lag_ms), separator)?;

    String::from_utf8(buf).map_err(|e| TalkSubError::Parse(e.to_string()))
}

fn lag_millis(time_lag_ms: f64) -> i64 {
    if time_lag_ms.is_finite() {
        time_lag_ms.floor() as i64
    } else {
        0
    }
}

fn write_items<W: Write>(buf: &mut W, track: &CaptionTrack, lag: i64, separator: char) -> Result<()> {
    for (index, item) in track.iter().enumerate() {
        write_item(buf, index + 1, item, lag, separator)?;
    }
    Ok(())
}

fn write_item<W: Write>(buf: &mut W, sequence_number: usize, item: &CaptionItem, lag: i64, separator: char) -> Result<()> {
    // Starts pushed before zero by a negative lag are clamped.
    let start = (i128::from(item.start_time_ms) + i128::from(lag)).max(0);
    let start = u64::try_from(start).unwrap_or(u64::MAX);
    let show_at = Duration::from_millis(start);
    let hide_at = show_at + item.duration();

    writeln!(buf, "{}", sequence_number)?;
    write_ts(buf, show_at, separator)?;
    write!(buf, " --> ")?;
    write_ts(buf, hide_at, separator)?;
    writeln!(buf)?;
    writeln!(buf, "{}", item.text)?;
    writeln!(buf)?;
    Ok(())
}

fn write_ts<W: Write>(buf: &mut W, timestamp: Duration, separator: char) -> Result<()> {
    let total_secs = timestamp.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = timestamp.as_millis() % 1000;
    write!(
        buf,
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, seconds, separator, millis
    )?;
    Ok(())
}
