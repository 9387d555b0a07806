pub mod config;
pub mod contract;
pub mod display;
pub mod entry_store;
pub mod filter;
pub mod live_query;
pub mod logging;
pub mod menu_tree;
pub mod model;
pub mod pagination;
pub mod query;
pub mod runtime;
pub mod search_window;
pub mod title;
pub mod transport;

#[cfg(test)]
mod tests {
    mod rebuild_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/rebuild_latency_test.rs"
        ));
    }
}
