use std::{collections::HashSet, io::Write, thread::scope, time::Instant};

use anyhow::anyhow;
use snowgen::{
    AtomicMonoSnowflakeGenerator, AtomicSnowflakeGenerator, BasicSnowflakeGenerator,
    LockMonoSnowflakeGenerator, LockSnowflakeGenerator, MessengerId, MonoSnowflakeGenerator,
    MonotonicClock, SystemClock,
};

use crate::cli::config::{Backend, GeneratorConfig, Mode};

/// Mints `config.total` identifiers and writes them to `out`, one per line.
pub fn run(config: &GeneratorConfig, out: &mut impl Write) -> anyhow::Result<()> {
    tracing::info!(
        worker_id = config.worker_id,
        epoch_ms = config.epoch.as_millis() as u64,
        threads = config.threads,
        count = config.count,
        mode = ?config.mode,
        backend = ?config.backend,
        "minting identifiers"
    );

    let start = Instant::now();
    let ids = mint(config)?;
    let elapsed = start.elapsed();

    let duplicates = count_duplicates(&ids);
    if duplicates > 0 {
        tracing::warn!(
            duplicates,
            "sequence wrapped within a millisecond; identifiers repeated"
        );
    }
    tracing::info!(minted = ids.len(), ?elapsed, "done");

    write_ids(out, &ids, config.explain)?;
    Ok(())
}

/// Builds the configured generator and mints identifiers from every thread.
///
/// Identifiers are returned grouped by thread, in the order each thread
/// produced them.
pub fn mint(config: &GeneratorConfig) -> anyhow::Result<Vec<MessengerId>> {
    match config.mode {
        Mode::Wrap => {
            let clock = SystemClock::try_with_epoch(config.epoch)?;
            match config.backend {
                Backend::Basic => {
                    let generator =
                        BasicSnowflakeGenerator::<MessengerId, _>::new(config.worker_id, clock);
                    Ok((0..config.count).map(|_| generator.next_id()).collect())
                }
                Backend::Lock => {
                    let generator =
                        LockSnowflakeGenerator::<MessengerId, _>::new(config.worker_id, clock);
                    mint_parallel(config, || generator.next_id())
                }
                Backend::Atomic => {
                    let generator =
                        AtomicSnowflakeGenerator::<MessengerId, _>::new(config.worker_id, clock);
                    mint_parallel(config, || generator.next_id())
                }
            }
        }
        Mode::Strict => {
            let clock = MonotonicClock::try_with_epoch(config.epoch)?;
            match config.backend {
                Backend::Basic => Err(anyhow!("the basic backend only supports wrap mode")),
                Backend::Lock => {
                    let generator =
                        LockMonoSnowflakeGenerator::<MessengerId, _>::new(config.worker_id, clock);
                    mint_parallel(config, || generator.next_id(|_| std::thread::yield_now()))
                }
                Backend::Atomic => {
                    let generator = AtomicMonoSnowflakeGenerator::<MessengerId, _>::new(
                        config.worker_id,
                        clock,
                    );
                    mint_parallel(config, || generator.next_id(|_| std::thread::yield_now()))
                }
            }
        }
    }
}

fn mint_parallel<F>(config: &GeneratorConfig, next_id: F) -> anyhow::Result<Vec<MessengerId>>
where
    F: Fn() -> MessengerId + Sync,
{
    let next_id = &next_id;
    let count = config.count;

    scope(|s| {
        let handles: Vec<_> = (0..config.threads)
            .map(|_| s.spawn(move || (0..count).map(|_| next_id()).collect::<Vec<_>>()))
            .collect();

        let mut ids = Vec::with_capacity(config.total);
        for handle in handles {
            let batch = handle
                .join()
                .map_err(|_| anyhow!("a minting thread panicked"))?;
            ids.extend(batch);
        }
        Ok(ids)
    })
}

fn count_duplicates(ids: &[MessengerId]) -> usize {
    let distinct: HashSet<_> = ids.iter().collect();
    ids.len() - distinct.len()
}

/// Writes each identifier as a decimal line, followed by its bit layout when
/// `explain` is set.
pub fn write_ids(out: &mut impl Write, ids: &[MessengerId], explain: bool) -> std::io::Result<()> {
    for id in ids {
        writeln!(out, "{id}")?;
        if explain {
            writeln!(out, "{id:?}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config::CliArgs;
    use clap::Parser;
    use snowgen::SnowflakeId;

    fn config(args: &[&str]) -> GeneratorConfig {
        let argv = core::iter::once("snowgen").chain(args.iter().copied());
        GeneratorConfig::try_from(CliArgs::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn mints_count_per_thread() {
        let config = config(&["--count", "10", "--threads", "3", "--worker-id", "9"]);
        let ids = mint(&config).unwrap();
        assert_eq!(ids.len(), 30);
        assert!(ids.iter().all(|id| id.machine_id() == 9));
        assert!(ids.iter().all(|id| id.to_i64() >= 0));
    }

    #[test]
    fn every_backend_in_wrap_mode() {
        for backend in ["lock", "atomic", "basic"] {
            let config = config(&["--count", "100", "--backend", backend]);
            let ids = mint(&config).unwrap();
            assert_eq!(ids.len(), 100);
            assert_eq!(count_duplicates(&ids), 0, "{backend}");
        }
    }

    #[test]
    fn strict_mode_never_repeats() {
        for backend in ["lock", "atomic"] {
            let config = config(&[
                "--count",
                "5000",
                "--threads",
                "4",
                "--mode",
                "strict",
                "--backend",
                backend,
            ]);
            let ids = mint(&config).unwrap();
            assert_eq!(ids.len(), 20_000);
            assert_eq!(count_duplicates(&ids), 0, "{backend}");
        }
    }

    #[test]
    fn strict_mode_is_ordered_per_thread() {
        let config = config(&["--count", "4096", "--mode", "strict"]);
        let ids = mint(&config).unwrap();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn duplicates_are_counted() {
        let id = MessengerId::from_components(1, 2, 3);
        let other = MessengerId::from_components(1, 2, 4);
        assert_eq!(count_duplicates(&[id, other, id, id]), 2);
        assert_eq!(count_duplicates(&[]), 0);
    }

    #[test]
    fn writes_one_decimal_per_line() {
        let ids = [MessengerId::from_raw(2_097_152), MessengerId::from_raw(42)];
        let mut out = Vec::new();
        write_ids(&mut out, &ids, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2097152\n42\n");
    }

    #[test]
    fn explain_appends_the_layout() {
        let ids = [MessengerId::from_components(1, 2, 3)];
        let mut out = Vec::new();
        write_ids(&mut out, &ids, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("2101251\n"));
        assert!(text.contains("timestamp"));
        assert!(text.contains("worker_id"));
    }

    #[test]
    fn run_writes_every_identifier() {
        let config = config(&["--count", "7", "--threads", "2", "--backend", "atomic"]);
        let mut out = Vec::new();
        run(&config, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 14);
        assert!(text.lines().all(|line| line.parse::<i64>().is_ok_and(|v| v >= 0)));
    }
}
