use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};
use tracing::info;

use crate::config::{AnalyzerConfig, DirectionMode, SamplingStrategy};
use crate::constants::config::{DEFAULT_SEED, DEFAULT_THRESHOLD, DEFAULT_TOP_N};
use crate::errors::AnalyzerError;
use crate::pipeline::{Analysis, Pipeline};
use crate::query::QueryLoop;
use crate::report::{render_partner_chart, render_ranking, render_store_summary};
use crate::source::load_archives;

#[derive(Debug, Parser)]
#[command(
    name = "parley",
    version,
    disable_help_subcommand = true,
    about = "Find out who you sound like in your text messages",
    long_about = "Group an SMS archive by conversation partner, report each partner's most distinguishing words and phrases, then train a classifier and guess the partner behind any text you type.",
    after_help = "INPUT may be an XML backup, a JSON-lines file, or a directory containing either. Type 'quit' (or close input) to end the guessing game."
)]
struct AnalyzerCli {
    #[arg(
        long,
        short = 'i',
        value_name = "PATH",
        help = "Archive file or directory of archives"
    )]
    input: PathBuf,
    #[arg(
        long,
        default_value_t = DEFAULT_THRESHOLD,
        help = "Minimum messages a partner needs to be analyzed"
    )]
    threshold: usize,
    #[arg(
        long,
        value_parser = parse_mode_arg,
        default_value = "received",
        help = "Messages to analyze: received, sent, or both (legacy 1/2/3)"
    )]
    mode: DirectionMode,
    #[arg(
        long = "top-n",
        default_value_t = DEFAULT_TOP_N,
        help = "Unigrams and bigrams reported per partner"
    )]
    top_n: usize,
    #[arg(
        long,
        value_parser = parse_sampling_arg,
        default_value = "over",
        help = "Class balancing: none, under, or over (legacy 3/1/2)"
    )]
    sampling: SamplingStrategy,
    #[arg(
        long,
        default_value_t = DEFAULT_SEED,
        help = "Seed for reproducible resampling"
    )]
    seed: u64,
    #[arg(long = "no-ranking", help = "Skip the discriminative term report")]
    no_ranking: bool,
    #[arg(
        long = "no-classifier",
        help = "Skip classifier training and the guessing game"
    )]
    no_classifier: bool,
    #[arg(long, help = "Print a bar chart of messages per partner")]
    chart: bool,
}

impl AnalyzerCli {
    fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            threshold: self.threshold,
            mode: self.mode,
            top_n: self.top_n,
            sampling: self.sampling,
            seed: self.seed,
            enable_ranking: !self.no_ranking,
            enable_classifier: !self.no_classifier,
        }
    }
}

/// Run the analyzer CLI.
///
/// `args_iter` excludes the program name. Reports are written to `output`;
/// guessing-game lines are read from `input`. Help and version requests
/// print and return `Ok(())`.
pub fn run_analyzer<I, R, W>(args_iter: I, input: R, mut output: W) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
    R: BufRead,
    W: Write,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let Some(cli) = parse_cli::<AnalyzerCli, _>(std::iter::once("parley".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let pipeline = Pipeline::new(cli.analyzer_config())?;
    let snapshot = load_archives(&cli.input)?;
    info!(
        "[parley:cli] loaded {} entries from {}",
        snapshot.entries.len(),
        cli.input.display()
    );
    let Analysis {
        store,
        ranking,
        model,
    } = pipeline.run(snapshot)?;

    write!(output, "{}", render_store_summary(&store))?;
    if cli.chart {
        write!(output, "{}", render_partner_chart(&store))?;
    }
    if let Some(ranking) = &ranking {
        write!(output, "{}", render_ranking(ranking))?;
    }
    if let Some(model) = &model {
        let session = QueryLoop::new(model, store.display_names()).run(input, &mut output)?;
        info!("[parley:cli] {} guesses made", session.predictions);
    }
    output.flush()?;
    Ok(())
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

fn parse_mode_arg(raw: &str) -> Result<DirectionMode, String> {
    raw.parse().map_err(|err: AnalyzerError| err.to_string())
}

fn parse_sampling_arg(raw: &str) -> Result<SamplingStrategy, String> {
    raw.parse().map_err(|err: AnalyzerError| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn args(list: &[&str]) -> std::vec::IntoIter<String> {
        list.iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn cli_defaults_map_onto_config() {
        let cli = AnalyzerCli::try_parse_from(["parley", "--input", "texts.xml"]).unwrap();
        assert_eq!(cli.analyzer_config(), AnalyzerConfig::default());
        assert!(!cli.chart);
    }

    #[test]
    fn legacy_codes_are_accepted() {
        let cli = AnalyzerCli::try_parse_from([
            "parley", "--input", "x.xml", "--mode", "3", "--sampling", "1",
        ])
        .unwrap();
        assert_eq!(cli.mode, DirectionMode::Both);
        assert_eq!(cli.sampling, SamplingStrategy::Undersample);
    }

    #[test]
    fn invalid_values_are_rejected_before_reading() {
        assert!(AnalyzerCli::try_parse_from(["parley", "--input", "x.xml", "--mode", "7"]).is_err());
        let err = run_analyzer(
            args(&["--input", "/definitely/missing.xml", "--threshold", "0"]),
            Cursor::new(""),
            Vec::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn help_exits_cleanly() {
        assert!(run_analyzer(args(&["--help"]), Cursor::new(""), Vec::new()).is_ok());
    }

    #[test]
    fn missing_input_is_reported() {
        let err = run_analyzer(
            args(&["--input", "/definitely/missing.xml"]),
            Cursor::new(""),
            Vec::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing.xml"));
    }
}
