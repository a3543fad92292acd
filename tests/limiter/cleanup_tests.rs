// tests/limiter/cleanup_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::limiter_with;
    use crate::fixtures::test_clock::TestClock;
    use brute_limiter::{BruteLimiterConfig, BucketStorage, MemoryBucketStorage, MemoryNetStorage};
    use std::time::Duration;

    #[test]
    fn cleanup_removes_stale_buckets() {
        let clock = TestClock::new(0.0);
        let buckets = MemoryBucketStorage::new();
        let limiter = limiter_with(
            BruteLimiterConfig::new(5, 5, 5),
            buckets.clone(),
            MemoryNetStorage::new(),
            clock.clone(),
        );

        assert!(limiter.allow("a", "a", 1).unwrap()); // windows end at t=60
        clock.set_time(100.0);
        assert!(limiter.allow("b", "b", 2).unwrap()); // windows end at t=160
        assert_eq!(buckets.len(), 6);

        // cutoff is 120 - 30 = 90, so only the first set is stale
        clock.set_time(120.0);
        let removed = limiter
            .cleanup_stale_buckets(Duration::from_secs(30))
            .unwrap();
        assert_eq!(removed, 3);
        assert!(buckets.get("login:a").unwrap().is_none());
        assert!(buckets.get("login:b").unwrap().is_some());

        // everything is stale once its window has passed
        clock.set_time(200.0);
        assert_eq!(limiter.cleanup_stale_buckets(Duration::ZERO).unwrap(), 3);
        assert!(buckets.is_empty());
    }

    #[test]
    fn cleanup_handles_empty_state() {
        let limiter = limiter_with(
            BruteLimiterConfig::new(5, 5, 5),
            MemoryBucketStorage::new(),
            MemoryNetStorage::new(),
            TestClock::new(0.0),
        );
        assert_eq!(limiter.cleanup_stale_buckets(Duration::ZERO).unwrap(), 0);
    }

    #[test]
    fn cleanup_preserves_live_windows() {
        let clock = TestClock::new(100.0);
        let buckets = MemoryBucketStorage::new();
        let limiter = limiter_with(
            BruteLimiterConfig::new(5, 5, 5),
            buckets.clone(),
            MemoryNetStorage::new(),
            clock.clone(),
        );

        for i in 0..5 {
            let login = format!("user{}", i);
            assert!(limiter.allow(&login, "p", 1).unwrap());
            clock.advance(0.01);
        }
        let before = buckets.len();

        assert_eq!(limiter.cleanup_stale_buckets(Duration::ZERO).unwrap(), 0);
        assert_eq!(buckets.len(), before);
    }

    #[test]
    fn evicted_bucket_behaves_like_refilled_one() {
        let clock = TestClock::new(0.0);
        let limiter = limiter_with(
            BruteLimiterConfig::new(1, 5, 5),
            MemoryBucketStorage::new(),
            MemoryNetStorage::new(),
            clock.clone(),
        );

        assert!(limiter.allow("u", "p", 1).unwrap());
        assert!(!limiter.allow("u", "p", 1).unwrap());

        clock.set_time(61.0);
        limiter.cleanup_stale_buckets(Duration::ZERO).unwrap();
        assert!(limiter.allow("u", "p", 1).unwrap());
        assert!(!limiter.allow("u", "p", 1).unwrap());
    }
}
