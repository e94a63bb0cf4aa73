use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use singletonrs::{
    Difficulty, GameSettings, InitError, LazyLock, LazySingletonHolder, SettingsSnapshot,
    SynchronizedHolder,
};

fn addr(settings: &GameSettings) -> usize {
    settings as *const GameSettings as usize
}

#[test]
fn stress_hundred_concurrent_callers() {
    const CALLERS: usize = 100;

    let built = AtomicUsize::new(0);
    let holder = LazySingletonHolder::new(|| {
        built.fetch_add(1, Ordering::SeqCst);
        /* Keep the window open so the other callers pile up on the lock */
        thread::sleep(Duration::from_millis(5));
        GameSettings::new()
    });
    let barrier = Barrier::new(CALLERS);

    let addrs = thread::scope(|s| {
        let handles = (0..CALLERS).map(|_| {
            s.spawn(|| {
                barrier.wait();
                addr(holder.get_instance())
            })
        }).collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
    });

    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(addrs.len(), CALLERS);
    assert!(addrs.iter().all(|a| *a == addrs[0]));
}

#[test]
fn late_callers_see_the_fully_built_value() {
    let holder = LazySingletonHolder::new(|| {
        thread::sleep(Duration::from_millis(10));
        GameSettings::with_values(11, 22, Difficulty::Hard)
    });
    let barrier = Barrier::new(16);

    let snapshots = thread::scope(|s| {
        let handles = (0..16).map(|_| {
            s.spawn(|| {
                barrier.wait();
                holder.get_instance().snapshot()
            })
        }).collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
    });

    let expected = SettingsSnapshot { volume: 11, brightness: 22, difficulty: Difficulty::Hard };
    assert!(snapshots.iter().all(|s| *s == expected));
}

#[test]
fn mutation_is_shared_between_references() {
    let holder = LazySingletonHolder::new(GameSettings::new);

    let r1 = holder.get_instance();
    let r2 = holder.get_instance();
    r1.set_brightness(5);
    r1.set_difficulty(Difficulty::Easy);

    assert_eq!(r2.brightness(), 5);
    assert_eq!(r2.difficulty(), Difficulty::Easy);
}

#[test]
fn mutation_from_another_thread_is_visible() {
    let holder = LazySingletonHolder::new(GameSettings::new);

    thread::scope(|s| {
        s.spawn(|| holder.get_instance().set_volume(33));
    });

    assert_eq!(holder.get_instance().volume(), 33);
}

#[test]
fn plain_constructor_gives_independent_records() {
    let menu = GameSettings::new();
    let gameplay = GameSettings::new();

    assert_ne!(addr(&menu), addr(&gameplay));

    menu.set_volume(80);
    assert_eq!(menu.volume(), 80);
    assert_eq!(gameplay.volume(), 50);
}

#[test]
fn end_to_end_volume_update() {
    let holder = LazySingletonHolder::new(|| {
        GameSettings::with_values(50, 70, Difficulty::Medium)
    });

    let settings = holder.get_instance();
    assert_eq!(settings.volume(), 50);
    settings.set_volume(80);

    let again = holder.get_instance();
    assert_eq!(again.volume(), 80);
    assert_eq!(again.brightness(), 70);
}

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("settings backend unavailable")]
struct BackendDown;

#[test]
fn failed_construction_is_reported_then_retried() {
    let attempts = AtomicUsize::new(0);
    let holder = LazySingletonHolder::new(|| {
        match attempts.fetch_add(1, Ordering::SeqCst) {
            0 => Err(BackendDown),
            _ => Ok(GameSettings::new()),
        }
    });

    let err = holder.try_get_instance().map(addr).unwrap_err();
    assert_eq!(err, InitError::Construction(BackendDown));
    assert_eq!(err.to_string(), "singleton construction failed");
    let source = std::error::Error::source(&err).map(|e| e.to_string());
    assert_eq!(source.as_deref(), Some("settings backend unavailable"));
    assert!(holder.get().is_none());

    let first = holder.try_get_instance().map(addr).unwrap();
    let second = holder.try_get_instance().map(addr).unwrap();
    assert_eq!(first, second);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn panicking_factory_leaves_holder_retryable() {
    let attempts = AtomicUsize::new(0);
    let holder = LazySingletonHolder::new(|| {
        if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("first construction panics");
        }
        GameSettings::new()
    });

    let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        holder.get_instance();
    }));
    assert!(res.is_err());
    assert!(!holder.is_initialized());

    assert_eq!(holder.get_instance().volume(), 50);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn synchronized_holder_builds_once() {
    let built = AtomicUsize::new(0);
    let holder = SynchronizedHolder::new(|| {
        built.fetch_add(1, Ordering::SeqCst);
        GameSettings::new()
    });
    let barrier = Barrier::new(32);

    let addrs = thread::scope(|s| {
        let handles = (0..32).map(|_| {
            s.spawn(|| {
                barrier.wait();
                addr(holder.get_instance())
            })
        }).collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
    });

    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(addrs.iter().all(|a| *a == addrs[0]));
}

#[test]
fn lazy_lock_static_is_shared() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);
    static SETTINGS: LazyLock<GameSettings> = LazyLock::new(|| {
        BUILT.fetch_add(1, Ordering::SeqCst);
        GameSettings::new()
    });

    let addrs = thread::scope(|s| {
        let handles = (0..8).map(|_| s.spawn(|| addr(&SETTINGS))).collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
    });

    assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    assert!(addrs.iter().all(|a| *a == addrs[0]));
}

proptest! {
    #[test]
    fn repeated_access_never_rebuilds(calls in 1usize..200) {
        let built = AtomicUsize::new(0);
        let holder = LazySingletonHolder::new(|| {
            built.fetch_add(1, Ordering::SeqCst);
            GameSettings::new()
        });

        let first = addr(holder.get_instance());
        for _ in 1..calls {
            prop_assert_eq!(addr(holder.get_instance()), first);
        }
        prop_assert_eq!(built.load(Ordering::SeqCst), 1);
    }
}
