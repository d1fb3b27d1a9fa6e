use parking_lot::Mutex;
use quotevault_core::{
    CategoryFilter, KeyValueStore, MemoryStore, NetworkError, Notifier, Quote, QuoteRepository,
    QuoteService, RemoteSource, RepoError, TickOutcome, SYNC_SUCCESS_MESSAGE,
};
use std::sync::Arc;

struct StaticRemote(Result<Vec<Quote>, NetworkError>);

impl RemoteSource for StaticRemote {
    fn fetch(&self) -> Result<Vec<Quote>, NetworkError> {
        self.0.clone()
    }
}

#[derive(Default)]
struct Inbox(Mutex<Vec<String>>);

impl Notifier for Inbox {
    fn notify(&self, message: &str) {
        self.0.lock().push(message.to_string());
    }
}

fn service_with(
    durable: MemoryStore,
    session: MemoryStore,
) -> QuoteService<MemoryStore, MemoryStore> {
    let repo = Arc::new(Mutex::new(QuoteRepository::open(durable)));
    QuoteService::new(repo, session)
}

#[test]
fn show_random_records_last_viewed_in_session_store_only() {
    let durable = MemoryStore::new();
    let session = MemoryStore::new();
    let service = service_with(durable.clone(), session.clone());
    assert_eq!(service.last_viewed(), None);

    let shown = service.show_random().unwrap();
    assert_eq!(service.last_viewed(), Some(shown));
    assert_eq!(durable.get("lastViewedQuote").unwrap(), None);

    session.clear();
    assert_eq!(service.last_viewed(), None);
}

#[test]
fn corrupt_last_viewed_is_ignored() {
    let session = MemoryStore::new();
    session.set("lastViewedQuote", "{broken").unwrap();
    let service = service_with(MemoryStore::new(), session);
    assert_eq!(service.last_viewed(), None);
}

#[test]
fn show_random_respects_selected_category() {
    let service = service_with(MemoryStore::new(), MemoryStore::new());
    let visible = service.select_category("Courage").unwrap();
    assert_eq!(visible.len(), 1);

    for _ in 0..5 {
        assert_eq!(service.show_random().unwrap().category, "Courage");
    }
    assert_eq!(
        service.selected_category(),
        CategoryFilter::Category("Courage".to_string())
    );
}

#[test]
fn show_random_on_empty_selection_reports_empty_collection() {
    let service = service_with(MemoryStore::new(), MemoryStore::new());
    assert!(service.select_category("Nobody").unwrap().is_empty());

    let err = service.show_random().unwrap_err();
    assert!(matches!(err, RepoError::EmptyCollection));

    service.select_category("all").unwrap();
    assert!(service.show_random().is_ok());
}

#[test]
fn selection_persists_across_service_instances() {
    let durable = MemoryStore::new();
    {
        let service = service_with(durable.clone(), MemoryStore::new());
        service.add_quote("New wisdom", "Fresh").unwrap();
        service.select_category("Fresh").unwrap();
    }

    let service = service_with(durable, MemoryStore::new());
    assert_eq!(service.visible_quotes().len(), 1);
    assert_eq!(
        service.categories(),
        vec!["Motivation", "Life", "Courage", "Fresh"]
    );
}

#[test]
fn sync_now_merges_remote_and_notifies() {
    let service = service_with(MemoryStore::new(), MemoryStore::new());
    let inbox = Inbox::default();
    let remote = StaticRemote(Ok(vec![Quote {
        text: "From the server".to_string(),
        category: "Server".to_string(),
    }]));

    let outcome = service.sync_now(&remote, &inbox);
    assert!(matches!(outcome, TickOutcome::Merged(report) if report.added == 1));
    assert!(service.categories().contains(&"Server".to_string()));
    assert_eq!(inbox.0.lock().as_slice(), [SYNC_SUCCESS_MESSAGE.to_string()]);
}

#[test]
fn sync_now_failure_keeps_collection() {
    let service = service_with(MemoryStore::new(), MemoryStore::new());
    let before = service.export_json().unwrap();
    let inbox = Inbox::default();

    let outcome = service.sync_now(
        &StaticRemote(Err(NetworkError::Transport("timed out".to_string()))),
        &inbox,
    );
    assert!(!outcome.is_success());
    assert_eq!(service.export_json().unwrap(), before);
    assert_eq!(inbox.0.lock().len(), 1);
}

#[test]
fn import_and_export_through_service() {
    let service = service_with(MemoryStore::new(), MemoryStore::new());
    let summary = service
        .import_json(r#"[{"text":"Imported","category":"File"},{"bad":true}]"#)
        .unwrap();
    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.skipped, 1);
    assert!(service.export_json().unwrap().contains("\"Imported\""));
    assert!(Arc::strong_count(&service.repository()) >= 2);
}
