use core::time::Duration;

use anyhow::bail;
use clap::{Parser, ValueEnum};
use snowgen::{MESSENGER_EPOCH, MessengerId, SnowflakeId, SystemClock};

/// Whether the sequence counter may wrap within a millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Never block; the counter wraps to zero after 2047 and may repeat IDs.
    Wrap,
    /// Never repeat or go backward; wait for the clock instead.
    Strict,
}

/// How the generator shares its state between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Mutex-guarded state.
    Lock,
    /// Lock-free atomic state.
    Atomic,
    /// Unsynchronized state; one thread, `wrap` mode only.
    Basic,
}

/// Runtime configuration for the `snowgen` binary.
///
/// Every flag can also be set through its environment variable, or through a
/// `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowgen",
    version,
    about = "Mint coordination-free 63-bit Snowflake identifiers"
)]
pub struct CliArgs {
    /// Worker identity stamped into every identifier.
    ///
    /// Must be unique among all processes sharing an epoch. Values above 1023
    /// are reduced modulo 1024.
    ///
    /// Environment variable: `SNOWGEN_WORKER_ID`
    #[arg(long, env = "SNOWGEN_WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Epoch, in milliseconds since the Unix epoch, that timestamps count from.
    ///
    /// Environment variable: `SNOWGEN_EPOCH_MS`
    #[arg(long, env = "SNOWGEN_EPOCH_MS", default_value_t = MESSENGER_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// Number of identifiers minted by each thread.
    ///
    /// Environment variable: `SNOWGEN_COUNT`
    #[arg(short = 'n', long, env = "SNOWGEN_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Number of threads sharing one generator.
    ///
    /// Environment variable: `SNOWGEN_THREADS`
    #[arg(short, long, env = "SNOWGEN_THREADS", default_value_t = 1)]
    pub threads: usize,

    /// Generation mode.
    ///
    /// Environment variable: `SNOWGEN_MODE`
    #[arg(long, env = "SNOWGEN_MODE", value_enum, default_value_t = Mode::Wrap)]
    pub mode: Mode,

    /// Generator backend.
    ///
    /// Environment variable: `SNOWGEN_BACKEND`
    #[arg(long, env = "SNOWGEN_BACKEND", value_enum, default_value_t = Backend::Lock)]
    pub backend: Backend,

    /// Print the bit layout of every identifier after its decimal value.
    #[arg(short, long, default_value_t = false)]
    pub explain: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub worker_id: u64,
    pub epoch: Duration,
    pub count: usize,
    pub threads: usize,
    pub total: usize,
    pub mode: Mode,
    pub backend: Backend,
    pub explain: bool,
}

impl TryFrom<CliArgs> for GeneratorConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("SNOWGEN_COUNT must be greater than 0");
        }

        if args.threads == 0 {
            bail!("SNOWGEN_THREADS must be greater than 0");
        }

        if args.backend == Backend::Basic && args.threads > 1 {
            bail!(
                "the basic backend is single-threaded (SNOWGEN_THREADS = {})",
                args.threads
            );
        }

        if args.backend == Backend::Basic && args.mode == Mode::Strict {
            bail!("the basic backend only supports wrap mode");
        }

        let Some(total) = args.count.checked_mul(args.threads) else {
            bail!(
                "SNOWGEN_COUNT ({}) x SNOWGEN_THREADS ({}) overflows",
                args.count,
                args.threads
            );
        };

        let epoch = Duration::from_millis(args.epoch_ms);
        SystemClock::try_with_epoch(epoch)?;

        let worker_space = MessengerId::max_machine_id() + 1;
        let worker_id = args.worker_id % worker_space;
        if worker_id != args.worker_id {
            tracing::warn!(
                requested = args.worker_id,
                effective = worker_id,
                "worker ID exceeds {} and was reduced",
                MessengerId::max_machine_id()
            );
        }

        Ok(Self {
            worker_id,
            epoch,
            count: args.count,
            threads: args.threads,
            total,
            mode: args.mode,
            backend: args.backend,
            explain: args.explain,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<GeneratorConfig> {
        let argv = core::iter::once("snowgen").chain(args.iter().copied());
        GeneratorConfig::try_from(CliArgs::try_parse_from(argv)?)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.worker_id, 0);
        assert_eq!(config.epoch, MESSENGER_EPOCH);
        assert_eq!((config.count, config.threads, config.total), (1, 1, 1));
        assert_eq!(config.mode, Mode::Wrap);
        assert_eq!(config.backend, Backend::Lock);
        assert!(!config.explain);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--worker-id",
            "17",
            "--count",
            "5",
            "--threads",
            "4",
            "--mode",
            "strict",
            "--backend",
            "atomic",
            "--explain",
        ])
        .unwrap();
        assert_eq!(config.worker_id, 17);
        assert_eq!(config.total, 20);
        assert_eq!(config.mode, Mode::Strict);
        assert_eq!(config.backend, Backend::Atomic);
        assert!(config.explain);
    }

    #[test]
    fn oversized_worker_id_is_reduced() {
        let config = parse(&["--worker-id", "1025"]).unwrap();
        assert_eq!(config.worker_id, 1);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(parse(&["--count", "0"]).is_err());
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert!(parse(&["--threads", "0"]).is_err());
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let count = usize::MAX.to_string();
        assert!(parse(&["--count", &count, "--threads", "2"]).is_err());
    }

    #[test]
    fn future_epoch_is_rejected() {
        let err = parse(&["--epoch-ms", &u64::MAX.to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<snowgen::Error>(),
            Some(snowgen::Error::ClockBeforeEpoch { .. })
        ));
    }

    #[test]
    fn basic_backend_is_single_threaded_wrap_only() {
        assert!(parse(&["--backend", "basic"]).is_ok());
        assert!(parse(&["--backend", "basic", "--threads", "2"]).is_err());
        assert!(parse(&["--backend", "basic", "--mode", "strict"]).is_err());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(CliArgs::try_parse_from(["snowgen", "--mode", "lenient"]).is_err());
    }
}
