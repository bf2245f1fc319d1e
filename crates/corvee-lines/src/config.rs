use anyhow::bail;
use clap::Parser;
use core::num::NonZeroUsize;
use std::path::PathBuf;

/// Runtime configuration for the `corvee-lines` binary.
///
/// All values are parsed from CLI arguments or environment variables, with
/// defaults suitable for cleaning a conversational corpus on a developer
/// machine.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "corvee-lines",
    version,
    about = "Parallel line cleaner for conversational corpora"
)]
pub struct CliArgs {
    /// Path to the input corpus, one record per line.
    ///
    /// Environment variable: `INPUT_PATH`
    #[arg(long, env = "INPUT_PATH")]
    pub input: PathBuf,

    /// Where to write the cleaned lines. Omit to write to stdout.
    ///
    /// Environment variable: `OUTPUT_PATH`
    #[arg(long, env = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Number of worker threads cleaning lines concurrently.
    ///
    /// Omit to use the host's available parallelism.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS")]
    pub num_workers: Option<usize>,

    /// Treat the input as plain text lines instead of `+++$+++`-separated
    /// corpus records. Skips utterance extraction entirely.
    #[arg(long, default_value_t = false)]
    pub raw: bool,
}

/// Validated pipeline configuration derived from [`CliArgs`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// `None` defers to the pool's host-parallelism default.
    pub workers: Option<NonZeroUsize>,
    pub raw: bool,
}

impl TryFrom<CliArgs> for PipelineConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let workers = match args.num_workers {
            Some(0) => bail!("NUM_WORKERS must be greater than 0"),
            Some(count) => NonZeroUsize::new(count),
            None => None,
        };

        Ok(Self {
            input: args.input,
            output: args.output,
            workers,
            raw: args.raw,
        })
    }
}
