use talksub::config::{Config, DEFAULT_PROVIDER_URL};
use talksub::format::SubtitleFormat;
use talksub::{merger, paths, service, SubtitleRequest, SubtitleService};

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,talksub=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(ClapParser)]
#[command(name = "talksub", version, about = "Fetch, cache and merge talk subtitles")]
struct Cli {
    #[arg(
        long,
        value_name = "DIR",
        env = "TALKSUB_BASE_DIR",
        default_value = ".",
        help = "Directory holding the static/{srt,vtt,txt} cache."
    )]
    base_dir: PathBuf,
    #[arg(
        long,
        value_name = "URL",
        env = "TALKSUB_PROVIDER_URL",
        default_value = DEFAULT_PROVIDER_URL,
        help = "Caption provider to fetch from."
    )]
    provider_url: String,
    #[arg(
        long,
        value_name = "SECS",
        env = "TALKSUB_TIMEOUT_SECS",
        default_value_t = 30,
        help = "HTTP timeout in seconds."
    )]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch (or reuse) a subtitle file and print its path.
    Get {
        #[arg(long, help = "Provider talk id.")]
        talk_id: String,
        #[arg(long, help = "Talk slug, used as the base file name.")]
        slug: String,
        #[arg(
            short,
            long = "lang",
            required = true,
            num_args = 1,
            help = "Language code; pass twice for a bilingual file."
        )]
        languages: Vec<String>,
        #[arg(short, long, value_enum, default_value_t = SubtitleFormat::Srt)]
        format: SubtitleFormat,
        #[arg(
            long,
            default_value_t = 0.0,
            allow_negative_numbers = true,
            help = "Milliseconds added to every start time."
        )]
        time_lag: f64,
    },
    /// Merge two local subtitle files line by line.
    Merge {
        #[arg(value_name = "FILE")]
        first: PathBuf,
        #[arg(value_name = "FILE")]
        second: PathBuf,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The file to write to. If not supplied, the result will be written to standard output."
        )]
        output: Option<PathBuf>,
    },
    /// Print the cache path a request resolves to.
    Path {
        #[arg(long)]
        slug: String,
        #[arg(short, long = "lang", required = true, num_args = 1)]
        languages: Vec<String>,
        #[arg(short, long, value_enum, default_value_t = SubtitleFormat::Srt)]
        format: SubtitleFormat,
    },
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::default()
        .with_base_dir(cli.base_dir)
        .with_provider_url(cli.provider_url)
        .with_timeout(Duration::from_secs(cli.timeout_secs));

    match cli.command {
        Command::Get {
            talk_id,
            slug,
            languages,
            format,
            time_lag,
        } => {
            let request = SubtitleRequest::new(talk_id, slug, languages, time_lag, format)
                .context("Invalid subtitle request")?;
            let service =
                SubtitleService::from_config(&config).context("Failed to set up HTTP client")?;
            let path = service.get_subtitle(&request).context(format!(
                "No subtitle available for talk {}",
                request.talk_id()
            ))?;
            println!("{}", path.display());
        }
        Command::Merge {
            first,
            second,
            output,
        } => {
            let a = std::fs::read_to_string(&first)
                .context(format!("Failed to open input file: '{}'", first.display()))?;
            let b = std::fs::read_to_string(&second)
                .context(format!("Failed to open input file: '{}'", second.display()))?;
            let merged = merger::merge_text(&a, &b);
            match output {
                Some(path) => service::write_atomic(&path, merged.as_bytes())
                    .context(format!("Failed to write output file: '{}'", path.display()))?,
                None => write_merged(io::stdout(), &merged)?,
            }
        }
        Command::Path {
            slug,
            languages,
            format,
        } => {
            // Validates the same way `get` does, with a placeholder talk id.
            let request = SubtitleRequest::new("-", slug, languages, 0.0, format)
                .context("Invalid subtitle request")?;
            let path = paths::resolve_path(
                &config.base_dir,
                request.base_filename(),
                request.languages(),
                request.format(),
            );
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Same bytes as `service::write_atomic` puts in a file.
fn write_merged<W: Write>(mut out: W, merged: &str) -> io::Result<()> {
    write!(out, "{}", merged)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdout_and_file_output_match() {
        let merged = merger::merge_text("1\nhello\n\n", "1\nbonjour\n\n");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.srt");

        let mut stdout = Vec::new();
        write_merged(&mut stdout, &merged).unwrap();
        service::write_atomic(&path, merged.as_bytes()).unwrap();

        assert_eq!(stdout, std::fs::read(&path).unwrap());
        assert_eq!(stdout, b"1\nhello\nbonjour\n");
    }
}
