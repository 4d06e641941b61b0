//! Property tests for the in-memory store's list operations.

use proptest::prelude::*;
use relic_core::{ArtifactDraft, ArtifactFilter, CreatorDraft, CreatorId, PageRequest};
use relic_storage::{InMemoryStore, RelicStore};

#[derive(Debug, Clone)]
struct Row {
    creator: usize,
    origin: Option<&'static str>,
    year: Option<i32>,
    power: Option<i32>,
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        0usize..3,
        proptest::option::of(prop_oneof![Just("Mordor"), Just("eregion"), Just("Gondor")]),
        proptest::option::of(0i32..3000),
        proptest::option::of(0i32..=10_000),
    )
        .prop_map(|(creator, origin, year, power)| Row {
            creator,
            origin,
            year,
            power,
        })
}

fn filter_strategy() -> impl Strategy<Value = ArtifactFilter> {
    (
        proptest::option::of(1i64..4),
        proptest::option::of(prop_oneof![Just("MORDOR"), Just("Eregion")]),
        proptest::option::of(0i32..3000),
        proptest::option::of(0i32..3000),
        proptest::option::of(0i32..=10_000),
    )
        .prop_map(|(creator, origin, year_from, year_to, power_from)| ArtifactFilter {
            creator_id: creator.map(CreatorId),
            origin: origin.map(str::to_string),
            year: relic_core::RangeFilter::new(year_from, year_to),
            power: relic_core::RangeFilter::new(power_from, None),
        })
}

async fn seed(store: &InMemoryStore, rows: &[Row]) -> Vec<CreatorId> {
    let mut creators = Vec::new();
    for name in ["Sauron", "Celebrimbor", "Telchar"] {
        let draft = CreatorDraft::new(Some(name.to_string()), None, None).unwrap();
        creators.push(store.creator_insert(&draft).await.unwrap().id);
    }
    for (i, row) in rows.iter().enumerate() {
        let draft = ArtifactDraft::new(
            Some(format!("Artifact {i}")),
            Some(creators[row.creator]),
            row.origin.map(str::to_string),
            None,
            row.year,
            row.power,
        )
        .unwrap();
        store.artifact_insert(&draft).await.unwrap();
    }
    creators
}

proptest! {
    /// Concatenating every page reproduces the unpaginated query exactly once.
    #[test]
    fn prop_pages_reproduce_query(
        rows in proptest::collection::vec(row_strategy(), 0..40),
        filter in filter_strategy(),
        size in 1i64..10,
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let store = InMemoryStore::new();
            seed(&store, &rows).await;

            let all = store.artifact_query(&filter).await.unwrap();
            prop_assert!(all.windows(2).all(|w| w[0].id < w[1].id));
            prop_assert!(all.iter().all(|a| filter.matches(a)));

            let first = store
                .artifact_page(&filter, PageRequest::new(0, size).unwrap())
                .await
                .unwrap();
            prop_assert_eq!(first.total_items, all.len() as u64);

            let mut collected = Vec::new();
            for page in 0..first.total_pages {
                let request = PageRequest::new(page as i64, size).unwrap();
                let chunk = store.artifact_page(&filter, request).await.unwrap();
                prop_assert_eq!(chunk.total_pages, first.total_pages);
                collected.extend(chunk.items);
            }
            prop_assert_eq!(collected, all);
            Ok(())
        })?;
    }
}
