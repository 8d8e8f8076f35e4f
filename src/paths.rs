use std::path::{Path, PathBuf};

use crate::format::SubtitleFormat;

/// Computes the cache file for a slug, language list and format:
/// `<base_dir>/static/<fmt>/<slug>.<lang1>[.<lang2>].<fmt>`.
///
/// Languages are joined in the order given, so `en,fr` and `fr,en` are
/// different cache entries.
pub fn resolve_path<S: AsRef<str>>(
    base_dir: &Path,
    base_filename: &str,
    languages: &[S],
    format: SubtitleFormat,
) -> PathBuf {
    let languages: Vec<&str> = languages.iter().map(AsRef::as_ref).collect();
    let file_name = format!(
        "{}.{}{}",
        base_filename,
        languages.join("."),
        format.suffix()
    );
    base_dir.join(format.directory()).join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_language_path() {
        let path = resolve_path(Path::new("/srv"), "talk_x", &["en"], SubtitleFormat::Vtt);
        assert_eq!(path, PathBuf::from("/srv/static/vtt/talk_x.en.vtt"));
    }

    #[test]
    fn two_language_path_keeps_order() {
        let base = Path::new("/srv");
        let en_fr = resolve_path(base, "talk_x", &["en", "fr"], SubtitleFormat::Srt);
        let fr_en = resolve_path(base, "talk_x", &["fr", "en"], SubtitleFormat::Srt);

        assert_eq!(en_fr, PathBuf::from("/srv/static/srt/talk_x.en.fr.srt"));
        assert_ne!(en_fr, fr_en);
    }

    #[test]
    fn merged_path_differs_from_single_paths() {
        let base = Path::new(".");
        let merged = resolve_path(base, "slug", &["en", "fr"], SubtitleFormat::Txt);
        let en = resolve_path(base, "slug", &["en"], SubtitleFormat::Txt);
        let fr = resolve_path(base, "slug", &["fr"], SubtitleFormat::Txt);

        assert_ne!(merged, en);
        assert_ne!(merged, fr);
        assert!(merged.ends_with("static/txt/slug.en.fr.txt"));
    }

    #[test]
    fn same_inputs_resolve_identically() {
        let a = resolve_path(Path::new("base"), "s", &["pt-br"], SubtitleFormat::Srt);
        let b = resolve_path(Path::new("base"), "s", &[String::from("pt-br")], SubtitleFormat::Srt);
        assert_eq!(a, b);
    }
}
