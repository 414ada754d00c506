use core::{cell::Cell, convert::Infallible};
use std::{collections::HashSet, rc::Rc, sync::Mutex, thread::scope};

use crate::{
    AtomicMonoSnowflakeGenerator, IdGenStatus, LockMonoSnowflakeGenerator, MessengerId,
    MonoSnowflakeGenerator, MonotonicClock, SnowflakeId, TimeSource,
};

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

impl SharedMockStepTime {
    fn new(values: Vec<u64>) -> Self {
        Self {
            clock: Rc::new(MockStepTime {
                values,
                index: Cell::new(0),
            }),
        }
    }

    fn advance(&self) {
        self.clock.index.set(self.clock.index.get() + 1);
    }
}

impl TimeSource for SharedMockStepTime {
    fn current_millis(&self) -> u64 {
        self.clock.values[self.clock.index.get()]
    }
}

struct MockStepTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

const WINDOW: u64 = MessengerId::SEQUENCE_MASK + 1;

fn expect_ready<ID>(status: IdGenStatus<ID>) -> ID {
    match status {
        IdGenStatus::Ready { id } => id,
        IdGenStatus::Pending { yield_for } => panic!("unexpected pending ({yield_for} ms)"),
    }
}

fn run_sequence_increments_within_same_tick<G>(generator: &G)
where
    G: MonoSnowflakeGenerator<MessengerId, MockTime, Err = Infallible>,
{
    // The generator starts from (ts 42, seq 0) so the first call increments.
    let ids: Vec<MessengerId> = (1..WINDOW)
        .map(|_| expect_ready(generator.poll_id()))
        .collect();

    for (i, id) in ids.iter().enumerate() {
        assert_eq!(id.timestamp(), 42);
        assert_eq!(id.machine_id(), 5);
        assert_eq!(id.sequence(), i as u64 + 1);
    }
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));

    assert_eq!(generator.poll_id(), IdGenStatus::Pending { yield_for: 1 });
}

fn run_exhausted_sequence_is_pending<G>(generator: &G)
where
    G: MonoSnowflakeGenerator<MessengerId, MockTime, Err = Infallible>,
{
    for _ in 0..3 {
        assert_eq!(generator.poll_id(), IdGenStatus::Pending { yield_for: 1 });
    }
}

fn run_rollover_resets_sequence<G>(generator: &G, shared_time: &SharedMockStepTime)
where
    G: MonoSnowflakeGenerator<MessengerId, SharedMockStepTime, Err = Infallible>,
{
    assert_eq!(generator.poll_id(), IdGenStatus::Pending { yield_for: 1 });

    shared_time.advance();
    let id = expect_ready(generator.poll_id());
    assert_eq!((id.timestamp(), id.sequence()), (43, 0));

    let id = expect_ready(generator.poll_id());
    assert_eq!((id.timestamp(), id.sequence()), (43, 1));
}

fn run_clock_behind_is_pending<G>(generator: &G, shared_time: &SharedMockStepTime)
where
    G: MonoSnowflakeGenerator<MessengerId, SharedMockStepTime, Err = Infallible>,
{
    let last = expect_ready(generator.poll_id());
    assert_eq!(last.timestamp(), 50);

    // 50 -> 46: refuse until the clock catches up.
    shared_time.advance();
    assert_eq!(generator.poll_id(), IdGenStatus::Pending { yield_for: 4 });

    shared_time.advance();
    let next = expect_ready(generator.poll_id());
    assert_eq!(next.timestamp(), 50);
    assert!(next > last);
}

fn run_next_id_backs_off_until_ready<G>(generator: &G, shared_time: &SharedMockStepTime)
where
    G: MonoSnowflakeGenerator<MessengerId, SharedMockStepTime, Err = Infallible>,
{
    let mut waits = Vec::new();
    let id = generator.next_id(|yield_for| {
        waits.push(yield_for);
        shared_time.advance();
    });

    assert_eq!(waits, vec![1, 2]);
    assert_eq!((id.timestamp(), id.sequence()), (11, 0));
}

fn run_monotonic_on_real_clock<G>(generator: &G)
where
    G: MonoSnowflakeGenerator<MessengerId, MonotonicClock, Err = Infallible>,
{
    let mut last = generator.next_id(|_| std::thread::yield_now());
    for _ in 0..(WINDOW * 64) {
        let id = generator.next_id(|_| std::thread::yield_now());
        assert!(id > last, "{id:?} is not after {last:?}");
        assert!(id.is_valid());
        last = id;
    }
}

fn run_threaded_ids_are_unique<G>(generator: &G)
where
    G: MonoSnowflakeGenerator<MessengerId, MonotonicClock, Err = Infallible> + Sync,
{
    const THREADS: usize = 100;
    const IDS_PER_THREAD: usize = 1000;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let seen_ids = Mutex::new(HashSet::with_capacity(TOTAL_IDS));

    scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let mut local = Vec::with_capacity(IDS_PER_THREAD);
                for _ in 0..IDS_PER_THREAD {
                    local.push(generator.next_id(|_| std::thread::yield_now()));
                }
                // Each thread observes its own IDs in increasing order.
                assert!(local.windows(2).all(|pair| pair[0] < pair[1]));

                let mut seen = seen_ids.lock().unwrap();
                for id in local {
                    assert!(seen.insert(id), "duplicate {id}");
                }
            });
        }
    });

    assert_eq!(seen_ids.into_inner().unwrap().len(), TOTAL_IDS);
}

#[test]
fn lock_mono_sequence_increments() {
    let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
        LockMonoSnowflakeGenerator::from_components(42, 5, 0, MockTime { millis: 42 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn atomic_mono_sequence_increments() {
    let generator: AtomicMonoSnowflakeGenerator<MessengerId, _> =
        AtomicMonoSnowflakeGenerator::from_components(42, 5, 0, MockTime { millis: 42 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn lock_mono_pending_when_exhausted() {
    let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
        LockMonoSnowflakeGenerator::from_components(
            42,
            0,
            MessengerId::max_sequence(),
            MockTime { millis: 42 },
        );
    run_exhausted_sequence_is_pending(&generator);
}

#[test]
fn atomic_mono_pending_when_exhausted() {
    let generator: AtomicMonoSnowflakeGenerator<MessengerId, _> =
        AtomicMonoSnowflakeGenerator::from_components(
            42,
            0,
            MessengerId::max_sequence(),
            MockTime { millis: 42 },
        );
    run_exhausted_sequence_is_pending(&generator);
}

#[test]
fn lock_mono_rollover() {
    let shared_time = SharedMockStepTime::new(vec![42, 43]);
    let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
        LockMonoSnowflakeGenerator::from_components(
            42,
            1,
            MessengerId::max_sequence(),
            shared_time.clone(),
        );
    run_rollover_resets_sequence(&generator, &shared_time);
}

#[test]
fn atomic_mono_rollover() {
    let shared_time = SharedMockStepTime::new(vec![42, 43]);
    let generator: AtomicMonoSnowflakeGenerator<MessengerId, _> =
        AtomicMonoSnowflakeGenerator::from_components(
            42,
            1,
            MessengerId::max_sequence(),
            shared_time.clone(),
        );
    run_rollover_resets_sequence(&generator, &shared_time);
}

#[test]
fn lock_mono_clock_behind() {
    let shared_time = SharedMockStepTime::new(vec![50, 46, 50]);
    let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
        LockMonoSnowflakeGenerator::new(0, shared_time.clone());
    run_clock_behind_is_pending(&generator, &shared_time);
}

#[test]
fn atomic_mono_clock_behind() {
    let shared_time = SharedMockStepTime::new(vec![50, 46, 50]);
    let generator: AtomicMonoSnowflakeGenerator<MessengerId, _> =
        AtomicMonoSnowflakeGenerator::new(0, shared_time.clone());
    run_clock_behind_is_pending(&generator, &shared_time);
}

#[test]
fn lock_mono_next_id_backs_off() {
    // Last issued at ts 10 with a full sequence; the clock then reads 10, 8, 11.
    let shared_time = SharedMockStepTime::new(vec![10, 8, 11]);
    let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
        LockMonoSnowflakeGenerator::from_components(
            10,
            0,
            MessengerId::max_sequence(),
            shared_time.clone(),
        );
    run_next_id_backs_off_until_ready(&generator, &shared_time);
}

#[test]
fn atomic_mono_next_id_backs_off() {
    let shared_time = SharedMockStepTime::new(vec![10, 8, 11]);
    let generator: AtomicMonoSnowflakeGenerator<MessengerId, _> =
        AtomicMonoSnowflakeGenerator::from_components(
            10,
            0,
            MessengerId::max_sequence(),
            shared_time.clone(),
        );
    run_next_id_backs_off_until_ready(&generator, &shared_time);
}

#[test]
fn lock_mono_monotonic() {
    let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
        LockMonoSnowflakeGenerator::new(12, MonotonicClock::default());
    run_monotonic_on_real_clock(&generator);
}

#[test]
fn atomic_mono_monotonic() {
    let generator: AtomicMonoSnowflakeGenerator<MessengerId, _> =
        AtomicMonoSnowflakeGenerator::new(12, MonotonicClock::default());
    run_monotonic_on_real_clock(&generator);
}

#[test]
fn lock_mono_threaded_unique() {
    let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
        LockMonoSnowflakeGenerator::new(0, MonotonicClock::default());
    run_threaded_ids_are_unique(&generator);
}

#[test]
fn atomic_mono_threaded_unique() {
    let generator: AtomicMonoSnowflakeGenerator<MessengerId, _> =
        AtomicMonoSnowflakeGenerator::new(0, MonotonicClock::default());
    run_threaded_ids_are_unique(&generator);
}

#[test]
fn mono_worker_id_is_reduced() {
    for worker_id in [0, 1023, 1024, 1025, u64::MAX] {
        let lock: LockMonoSnowflakeGenerator<MessengerId, _> =
            LockMonoSnowflakeGenerator::new(worker_id, MockTime { millis: 3 });
        let atomic: AtomicMonoSnowflakeGenerator<MessengerId, _> =
            AtomicMonoSnowflakeGenerator::new(worker_id, MockTime { millis: 3 });

        assert_eq!(lock.worker_id(), worker_id % 1024);
        assert_eq!(atomic.worker_id(), worker_id % 1024);
        assert_eq!(expect_ready(lock.poll_id()).machine_id(), worker_id % 1024);
        assert_eq!(expect_ready(atomic.poll_id()).machine_id(), worker_id % 1024);
    }
}

#[cfg(not(feature = "parking-lot"))]
#[test]
fn lock_mono_recovers_from_poisoned_lock() {
    let generator: LockMonoSnowflakeGenerator<MessengerId, _> =
        LockMonoSnowflakeGenerator::from_components(42, 4, 7, MockTime { millis: 42 });

    scope(|s| {
        let handle = s.spawn(|| -> () {
            let _guard = generator.state.lock().unwrap();
            panic!("poison the state lock")
        });
        assert!(handle.join().is_err());
    });
    assert!(generator.state.is_poisoned());

    let id = expect_ready(generator.poll_id());
    assert_eq!((id.timestamp(), id.machine_id(), id.sequence()), (42, 4, 8));
}
