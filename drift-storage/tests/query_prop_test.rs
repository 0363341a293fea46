//! Property tests for the query planner: pagination windows always agree
//! with the unpaginated result, for arbitrary offsets and limits.

use drift_core::types::{DetectionMethod, Pattern};
use drift_storage::repository::query::{run_query, Pagination, QueryOptions};
use proptest::prelude::*;

fn patterns(n: usize) -> Vec<Pattern> {
    (0..n)
        .map(|i| {
            Pattern::discovered(
                format!("p{i:03}"),
                "structural",
                format!("pattern {i}"),
                "structural/shape",
                DetectionMethod::Structural,
                (i as f64 / n.max(1) as f64).clamp(0.0, 1.0),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn pagination_windows_tile_the_result(
        n in 0usize..40,
        offset in 0usize..50,
        limit in 0usize..50,
    ) {
        let all = patterns(n);
        let unpaginated = run_query(&all, &QueryOptions::default());
        let page = run_query(
            &all,
            &QueryOptions {
                pagination: Some(Pagination { offset, limit }),
                ..Default::default()
            },
        );

        prop_assert_eq!(page.total, unpaginated.total);
        let expected: Vec<&Pattern> = unpaginated
            .patterns
            .iter()
            .skip(offset)
            .take(limit)
            .collect();
        prop_assert_eq!(page.patterns.len(), expected.len());
        for (got, want) in page.patterns.iter().zip(expected) {
            prop_assert_eq!(&got.id, &want.id);
        }
        prop_assert_eq!(page.has_more, offset.saturating_add(limit) < unpaginated.total);
    }
}
