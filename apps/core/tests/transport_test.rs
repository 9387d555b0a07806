use clipmenu_core::config::MenuConfig;
use clipmenu_core::contract::{MenuRequest, MenuResponse, QueryChangedRequest};
use clipmenu_core::entry_store::MemoryStore;
use clipmenu_core::live_query::LiveQueryController;
use clipmenu_core::menu_tree::{MenuTreeBuilder, RebuildMode};
use clipmenu_core::model::HistoryEntry;
use clipmenu_core::transport::{handle_json, handle_request, ErrorCode, TransportResponse};

fn controller() -> LiveQueryController<MemoryStore, MenuConfig> {
    let store = MemoryStore::default();
    for i in 0..15 {
        store
            .push_history(HistoryEntry::new(&i.to_string(), &format!("note {i}"), i))
            .unwrap();
    }
    let mut controller =
        LiveQueryController::new(store, MenuConfig::default(), MenuTreeBuilder::default());
    controller.refresh();
    controller
}

#[test]
fn query_request_returns_patched_tree() {
    let mut controller = controller();
    let response = handle_request(
        &mut controller,
        MenuRequest::QueryChanged(QueryChangedRequest {
            text: "note 1".into(),
        }),
    );

    let TransportResponse::Ok {
        response: MenuResponse::Tree(tree),
    } = response
    else {
        panic!("expected a tree response");
    };
    assert_eq!(tree.mode, Some(RebuildMode::Patched));
    assert_eq!(tree.generation, 2);
    let root = tree.root.unwrap();
    let history = root.find_section("History").unwrap();
    assert_eq!(history.children()[0].label(), Some("Search Results"));
    assert_eq!(history.leaves().len(), 6);
}

#[test]
fn handles_json_roundtrip() {
    let mut controller = controller();
    let payload = r#"{"kind":"QueryChanged","payload":{"text":"note 3"}}"#;
    let raw = handle_json(&mut controller, payload);

    assert!(raw.contains(r#""status":"ok""#));
    assert!(raw.contains("Search Results"));

    let current = handle_json(&mut controller, r#"{"kind":"CurrentTree"}"#);
    assert!(current.contains(r#""mode":null"#));
}

#[test]
fn invalid_json_returns_error_code() {
    let mut controller = controller();
    let raw = handle_json(&mut controller, "{not json");
    assert!(raw.contains(r#""status":"err""#));
    assert!(raw.contains("invalid_json"));
}

#[test]
fn offline_store_reports_store_unavailable() {
    let mut controller = controller();
    controller.store().set_offline(Some("volume unmounted")).unwrap();

    let response = handle_request(&mut controller, MenuRequest::StoreChanged);
    let TransportResponse::Err { error } = response else {
        panic!("expected an error response");
    };
    assert_eq!(error.code, ErrorCode::StoreUnavailable);

    controller.store().set_offline(None).unwrap();
    let response = handle_request(&mut controller, MenuRequest::StoreChanged);
    assert!(matches!(response, TransportResponse::Ok { .. }));
}
