//! Concurrency Tests for the Context Cache
//!
//! Exercises the cache from many threads at once:
//! - puts on distinct keys do not interfere
//! - a reader racing a writer sees the old or the new value, never anything else
//! - racing `get_or_create` calls converge on one shared context
//! - snapshots taken during writes only contain fully stored values

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use polyglot_cache::{ContextCache, LocalizedContext};
use polyglot_test_utils::{fixtures, init_test_tracing, MockContext, MockContextFactory};

const THREADS: usize = 8;
const PER_THREAD: usize = 200;

#[test]
fn test_concurrent_puts_on_distinct_keys() {
    init_test_tracing();
    let cache: ContextCache<MockContext> = ContextCache::new();

    thread::scope(|s| {
        for t in 0..THREADS {
            let cache = &cache;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    let namespace = format!("ns{}.{}", t, i);
                    cache.put(&namespace, MockContext::new(namespace.as_str(), fixtures::en_us()));
                }
            });
        }
    });

    assert_eq!(cache.len(), THREADS * PER_THREAD);
    for t in 0..THREADS {
        for i in 0..PER_THREAD {
            let namespace = format!("ns{}.{}", t, i);
            let ctx = cache.lookup(&namespace, &fixtures::en_us()).unwrap();
            assert_eq!(ctx.namespace(), namespace);
        }
    }
}

#[test]
fn test_reader_sees_old_or_new_value() {
    init_test_tracing();
    let cache: ContextCache<MockContext> = ContextCache::new();
    let values: Vec<Arc<MockContext>> = (0..64)
        .map(|_| Arc::new(MockContext::new("pkg", fixtures::de_de())))
        .collect();
    let known: HashSet<_> = values.iter().map(|ctx| ctx.id()).collect();
    cache.put("pkg", Arc::clone(&values[0]));

    let done = AtomicBool::new(false);
    thread::scope(|s| {
        s.spawn(|| {
            for ctx in &values {
                cache.put("pkg", Arc::clone(ctx));
            }
            done.store(true, Ordering::SeqCst);
        });

        for _ in 0..4 {
            s.spawn(|| {
                while !done.load(Ordering::SeqCst) {
                    let found = cache.lookup("pkg", &fixtures::de_de()).unwrap();
                    assert!(known.contains(&found.id()));
                }
            });
        }
    });

    let last = cache.lookup("pkg", &fixtures::de_de()).unwrap();
    assert!(Arc::ptr_eq(&last, values.last().unwrap()));
}

#[test]
fn test_racing_get_or_create_converges() {
    init_test_tracing();
    let cache: ContextCache<MockContext> = ContextCache::new();
    let factory = MockContextFactory::new().with_delay(Duration::from_millis(5));
    let barrier = Barrier::new(THREADS);

    let results: Vec<Arc<MockContext>> = thread::scope(|s| {
        let (cache, factory, barrier) = (&cache, &factory, &barrier);
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_create("pkg", &fixtures::ja_jp(), factory)
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let stored = cache.lookup("pkg", &fixtures::ja_jp()).unwrap();
    for ctx in &results {
        assert!(Arc::ptr_eq(ctx, &stored));
    }
    assert_eq!(cache.len(), 1);
    assert!(factory.created() >= 1);
    assert!(factory.created() <= THREADS);
    assert_eq!(cache.stats().inserts, 1);
}

#[test]
fn test_snapshot_during_writes_is_consistent() {
    init_test_tracing();
    let cache: ContextCache<MockContext> = ContextCache::new();
    let written: Vec<Arc<MockContext>> = (0..THREADS * PER_THREAD)
        .map(|i| Arc::new(MockContext::new(format!("ns{}", i), fixtures::fr_fr())))
        .collect();
    let known: HashSet<_> = written.iter().map(|ctx| ctx.id()).collect();

    thread::scope(|s| {
        for chunk in written.chunks(PER_THREAD) {
            let cache = &cache;
            s.spawn(move || {
                for ctx in chunk {
                    cache.put(ctx.namespace(), Arc::clone(ctx));
                }
            });
        }

        s.spawn(|| {
            let mut previous = 0;
            for _ in 0..50 {
                let snapshot = cache.snapshot();
                let ids: HashSet<_> = snapshot.iter().map(|ctx| ctx.id()).collect();
                assert_eq!(ids.len(), snapshot.len(), "snapshot holds duplicates");
                assert!(ids.is_subset(&known));
                // Nothing is removed while writers run, so snapshots only grow.
                assert!(snapshot.len() >= previous);
                previous = snapshot.len();
            }
        });
    });

    assert_eq!(cache.snapshot().len(), THREADS * PER_THREAD);
}

#[test]
fn test_clear_racing_puts_leaves_no_torn_entries() {
    init_test_tracing();
    let cache: ContextCache<MockContext> = ContextCache::new();

    thread::scope(|s| {
        for t in 0..THREADS {
            let cache = &cache;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    let namespace = format!("ns{}.{}", t, i % 16);
                    cache.put(&namespace, MockContext::new(namespace.as_str(), fixtures::en()));
                }
            });
        }
        s.spawn(|| {
            for _ in 0..20 {
                cache.clear();
                thread::yield_now();
            }
        });
    });

    let mut visited = 0;
    cache.visit(|ctx| {
        assert_eq!(ctx.locale().to_string(), "en");
        assert!(cache.contains(ctx.namespace(), &fixtures::en()));
        visited += 1;
    });
    assert_eq!(visited, cache.len());
    assert!(cache.len() <= THREADS * 16);
}
