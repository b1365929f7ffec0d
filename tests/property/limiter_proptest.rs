//! Property-based tests for the sliding-window limiter

use std::sync::Arc;

use proptest::prelude::*;
use sketchsync::cache::MemoryStore;
use sketchsync::plans::Plan;
use sketchsync::rate_limit::SlidingWindowLimiter;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For any non-decreasing request sequence, the number of admitted
    /// requests inside any trailing window never exceeds the plan max.
    #[test]
    fn test_admissions_never_exceed_max_in_any_window(
        offsets in proptest::collection::vec(0u64..7_200_000, 1..300)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        runtime.block_on(async {
            let mut times = offsets;
            times.sort_unstable();

            let limiter = SlidingWindowLimiter::new(Arc::new(MemoryStore::new()));
            let window_ms = Plan::Free.window().as_millis() as u64;
            let max = Plan::Free.max_requests() as usize;
            let mut admitted: Vec<u64> = Vec::new();

            for now in times {
                let decision = limiter
                    .check_and_record_at("u1", Plan::Free, now)
                    .await
                    .unwrap();
                if decision.is_allowed() {
                    admitted.push(now);
                }

                let window_start = now.saturating_sub(window_ms);
                let in_window = admitted.iter().filter(|&&t| t >= window_start).count();
                prop_assert!(
                    in_window <= max,
                    "{in_window} admissions inside one window (max {max})"
                );
            }
            Ok(())
        })?;
    }
}
