use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::debug;

use crate::config::ConfigSource;
use crate::display::DisplayNode;
use crate::entry_store::{EntryStore, HistoryOrder, Snapshot};
use crate::menu_tree::{MenuTreeBuilder, RebuildMode, HISTORY_LABEL, SNIPPETS_LABEL};
use crate::query::QueryState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Typing,
}

/// Something that makes the current tree stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    QueryChanged(String),
    QueryCleared,
    StoreChanged,
    ConfigChanged,
}

/// Cloneable handle for posting triggers from other threads. Nothing is
/// rebuilt until the owning thread calls [`LiveQueryController::pump`].
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    sender: Sender<Trigger>,
}

impl ChangeNotifier {
    /// Returns `false` once the controller is gone.
    pub fn post(&self, trigger: Trigger) -> bool {
        self.sender.send(trigger).is_ok()
    }

    pub fn store_changed(&self) -> bool {
        self.post(Trigger::StoreChanged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    pub generation: u64,
    pub mode: RebuildMode,
    /// Labels of sections rendered empty because the store was unavailable.
    pub unavailable: Vec<&'static str>,
}

/// An image lookup the UI should run for a leaf of a given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    pub generation: u64,
    pub payload_id: String,
    pub thumbnail_ref: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Patch,
    Full,
}

impl Pending {
    fn merge(current: Option<Pending>, next: Pending) -> Pending {
        match (current, next) {
            (Some(Pending::Full), _) | (_, Pending::Full) => Pending::Full,
            _ => Pending::Patch,
        }
    }
}

pub struct LiveQueryController<S, C> {
    store: S,
    config: C,
    builder: MenuTreeBuilder,
    query: QueryState,
    phase: QueryPhase,
    tree: Option<DisplayNode>,
    generation: u64,
    pending: Option<Pending>,
    sender: Sender<Trigger>,
    receiver: Receiver<Trigger>,
}

impl<S: EntryStore, C: ConfigSource> LiveQueryController<S, C> {
    pub fn new(store: S, config: C, builder: MenuTreeBuilder) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            store,
            config,
            builder,
            query: QueryState::empty(),
            phase: QueryPhase::Idle,
            tree: None,
            generation: 0,
            pending: None,
            sender,
            receiver,
        }
    }

    pub fn notifier(&self) -> ChangeNotifier {
        ChangeNotifier {
            sender: self.sender.clone(),
        }
    }

    pub fn tree(&self) -> Option<&DisplayNode> {
        self.tree.as_ref()
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn phase(&self) -> QueryPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Full rebuild from the current store and configuration.
    pub fn refresh(&mut self) -> RebuildReport {
        self.drain_queued();
        self.mark_dirty(Pending::Full);
        self.rebuild_pending()
    }

    pub fn on_query_text_changed(&mut self, text: &str) -> RebuildReport {
        self.handle_direct(Trigger::QueryChanged(text.to_string()))
    }

    pub fn on_query_cleared(&mut self) -> RebuildReport {
        self.handle_direct(Trigger::QueryCleared)
    }

    pub fn on_config_changed(&mut self) -> RebuildReport {
        self.handle_direct(Trigger::ConfigChanged)
    }

    /// Drains every queued trigger and rebuilds at most once, using the
    /// latest query that was posted.
    pub fn pump(&mut self) -> Option<RebuildReport> {
        let drained = self.drain_queued();
        if self.pending.is_none() {
            return None;
        }
        debug!(drained, "coalesced queued triggers");
        Some(self.rebuild_pending())
    }

    pub fn thumbnail_requests(&self) -> Vec<ThumbnailRequest> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        tree.leaves()
            .into_iter()
            .filter(|leaf| leaf.image.is_none())
            .filter_map(|leaf| {
                leaf.thumbnail.as_ref().map(|thumbnail_ref| ThumbnailRequest {
                    generation: self.generation,
                    payload_id: leaf.payload_id.clone(),
                    thumbnail_ref: thumbnail_ref.clone(),
                })
            })
            .collect()
    }

    /// Completion of a lookup from [`Self::thumbnail_requests`]. A request
    /// issued for an older tree, or whose leaf has disappeared, is ignored.
    pub fn apply_thumbnail(&mut self, request: &ThumbnailRequest, image: &str) -> bool {
        if request.generation != self.generation {
            debug!(
                request_generation = request.generation,
                generation = self.generation,
                "dropping stale thumbnail"
            );
            return false;
        }
        let Some(tree) = self.tree.as_mut() else {
            return false;
        };
        match tree.find_leaf_mut(&request.payload_id) {
            Some(leaf) if leaf.thumbnail.as_deref() == Some(request.thumbnail_ref.as_str()) => {
                leaf.image = Some(image.to_string());
                true
            }
            _ => false,
        }
    }

    /// Queued triggers are older than one delivered directly, so they are
    /// applied first and folded into the same rebuild.
    fn handle_direct(&mut self, trigger: Trigger) -> RebuildReport {
        let drained = self.drain_queued();
        if drained > 0 {
            debug!(drained, "folded queued triggers into direct rebuild");
        }
        self.apply(trigger);
        self.rebuild_pending()
    }

    fn drain_queued(&mut self) -> usize {
        let mut drained = 0usize;
        loop {
            match self.receiver.try_recv() {
                Ok(trigger) => {
                    drained += 1;
                    self.apply(trigger);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }

    fn apply(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::QueryChanged(text) => {
                self.set_query(QueryState::new(&text));
                self.mark_dirty(Pending::Patch);
            }
            Trigger::QueryCleared => {
                self.set_query(QueryState::empty());
                self.mark_dirty(Pending::Patch);
            }
            Trigger::StoreChanged | Trigger::ConfigChanged => self.mark_dirty(Pending::Full),
        }
    }

    fn set_query(&mut self, query: QueryState) {
        let phase = if query.is_active() {
            QueryPhase::Typing
        } else {
            QueryPhase::Idle
        };
        if phase != self.phase {
            debug!(from = ?self.phase, to = ?phase, "query phase changed");
        }
        self.query = query;
        self.phase = phase;
    }

    fn mark_dirty(&mut self, request: Pending) {
        self.pending = Some(Pending::merge(self.pending, request));
    }

    fn rebuild_pending(&mut self) -> RebuildReport {
        let request = self.pending.take().unwrap_or(Pending::Full);
        let config = self.config.snapshot();
        let snapshot = Snapshot::take(
            &self.store,
            HistoryOrder::from_reorder_after_paste(config.reorder_after_paste),
        );

        let (tree, mode) = match (request, self.tree.take()) {
            (Pending::Patch, Some(previous)) => {
                self.builder.patch(previous, &snapshot, &self.query, &config)
            }
            _ => (
                self.builder.build(&snapshot, &self.query, &config),
                RebuildMode::Full,
            ),
        };

        let mut unavailable = Vec::new();
        if !snapshot.history.is_available() {
            unavailable.push(HISTORY_LABEL);
        }
        if !snapshot.folders.is_available() {
            unavailable.push(SNIPPETS_LABEL);
        }

        self.generation += 1;
        debug!(
            generation = self.generation,
            ?mode,
            nodes = tree.node_count(),
            query = self.query.text(),
            "menu rebuilt"
        );
        self.tree = Some(tree);

        RebuildReport {
            generation: self.generation,
            mode,
            unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LiveQueryController, Pending, QueryPhase, Trigger};
    use crate::config::MenuConfig;
    use crate::entry_store::MemoryStore;
    use crate::menu_tree::{MenuTreeBuilder, RebuildMode};
    use crate::model::HistoryEntry;

    fn controller() -> LiveQueryController<MemoryStore, MenuConfig> {
        let store = MemoryStore::default();
        store.push_history(HistoryEntry::new("1", "alpha", 1)).unwrap();
        store.push_history(HistoryEntry::new("2", "beta", 2)).unwrap();
        LiveQueryController::new(store, MenuConfig::default(), MenuTreeBuilder::default())
    }

    #[test]
    fn full_dominates_when_merging() {
        assert_eq!(Pending::merge(None, Pending::Patch), Pending::Patch);
        assert_eq!(Pending::merge(Some(Pending::Full), Pending::Patch), Pending::Full);
        assert_eq!(Pending::merge(Some(Pending::Patch), Pending::Full), Pending::Full);
    }

    #[test]
    fn typing_then_clearing_walks_the_phases() {
        let mut controller = controller();
        controller.refresh();
        assert_eq!(controller.phase(), QueryPhase::Idle);

        let report = controller.on_query_text_changed("Al");
        assert_eq!(controller.phase(), QueryPhase::Typing);
        assert_eq!(report.mode, RebuildMode::Patched);
        assert_eq!(controller.query().text(), "al");

        controller.on_query_cleared();
        assert_eq!(controller.phase(), QueryPhase::Idle);
        assert!(!controller.query().is_active());
    }

    #[test]
    fn first_query_without_a_tree_builds_fully() {
        let mut controller = controller();
        let report = controller.on_query_text_changed("beta");
        assert_eq!(report.mode, RebuildMode::Full);
        assert_eq!(report.generation, 1);
    }

    #[test]
    fn pump_without_triggers_does_nothing() {
        let mut controller = controller();
        assert!(controller.pump().is_none());
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn notifier_reports_dropped_controller() {
        let notifier = controller().notifier();
        assert!(!notifier.post(Trigger::StoreChanged));
    }
}
