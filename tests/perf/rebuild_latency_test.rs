use std::time::Instant;

use crate::config::MenuConfig;
use crate::entry_store::Snapshot;
use crate::menu_tree::MenuTreeBuilder;
use crate::model::{Folder, HistoryEntry, Snippet};
use crate::query::QueryState;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

fn large_snapshot() -> Snapshot {
    let history = (0..5_000)
        .map(|i| HistoryEntry::new(&format!("clip-{i}"), &format!("Copied text number {i:05}"), i))
        .collect();
    let folders = (0..50)
        .map(|f| {
            (0..40).fold(Folder::new(&format!("f{f}"), &format!("Folder {f}"), f), |folder, s| {
                folder.with_snippet(Snippet::new(
                    &format!("s{f}-{s}"),
                    &format!("Snippet {f}/{s}"),
                    &format!("body of snippet {s} in folder {f}"),
                    s,
                ))
            })
        })
        .collect();
    Snapshot::from_parts(history, folders)
}

#[test]
fn filtered_rebuild_p95_under_50ms() {
    let snapshot = large_snapshot();
    let builder = MenuTreeBuilder::default();
    let config = MenuConfig {
        max_history_size: 5_000,
        inline_capacity: 10,
        ..MenuConfig::default()
    };
    let query = QueryState::new("number 04");

    for _ in 0..10 {
        let _ = builder.build(&snapshot, &query, &config);
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(40);
        for _ in 0..40 {
            let start = Instant::now();
            let _ = builder.build(&snapshot, &query, &config);
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 50.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 50.0ms); batches={batch_p95:?}",
    );
}
