mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::employee_json;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use stockdesk::client::ClientError;
use stockdesk::config::DashboardConfig;
use stockdesk::list::{DeletePolicy, Deleter, ListController, ListEvent};
use stockdesk::query::{QueryParams, QuerySync};
use stockdesk::resource::{CatalogItem, PersonRecord};
use stockdesk::ui::app::{App, Focus, LoadState, Screen, UiCommand};
use stockdesk::ui::input::handle_key;
use stockdesk::ui::modal::{EmployeeModalState, FormField};
use tokio::sync::mpsc;

struct RecordingDeleter {
    calls: AtomicUsize,
}

#[async_trait]
impl Deleter<CatalogItem> for RecordingDeleter {
    async fn delete(&self, _id: u64) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Deleter<PersonRecord> for RecordingDeleter {
    async fn delete(&self, _id: String) -> Result<(), ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn product(id: u64) -> CatalogItem {
    CatalogItem {
        id,
        title: format!("Product {id}"),
        price: 1.5,
        thumbnail: String::new(),
        category: "misc".to_string(),
    }
}

fn employee(id: &str, first: &str, last: &str) -> PersonRecord {
    PersonRecord::validate(&employee_json(id, first, last)).unwrap()
}

struct Fixture {
    app: App,
    commands: mpsc::Receiver<UiCommand>,
    query: QuerySync,
}

fn fixture(initial: QueryParams) -> Fixture {
    let config = DashboardConfig::default();
    let query = QuerySync::new(initial, config.search_debounce());
    let deleter = Arc::new(RecordingDeleter {
        calls: AtomicUsize::new(0),
    });
    let products: ListController<CatalogItem> =
        ListController::new(DeletePolicy::Optimistic, deleter.clone());
    let employees: ListController<PersonRecord> =
        ListController::new(DeletePolicy::ConfirmThenHide, deleter);
    let mut app = App::new(&config, query.clone(), products, employees);
    let (tx, rx) = mpsc::channel(16);
    app.set_command_sender(tx);
    Fixture {
        app,
        commands: rx,
        query,
    }
}

fn drain(rx: &mut mpsc::Receiver<UiCommand>) -> Vec<UiCommand> {
    let mut out = Vec::new();
    while let Ok(command) = rx.try_recv() {
        out.push(command);
    }
    out
}

#[tokio::test]
async fn start_loads_catalog_with_categories_and_employees() {
    let mut f = fixture(QueryParams::new("phone", ""));
    f.app.start();

    let commands = drain(&mut f.commands);
    assert_eq!(commands.len(), 2);
    match &commands[0] {
        UiCommand::LoadCatalog {
            params,
            include_categories,
        } => {
            assert_eq!(params, &QueryParams::new("phone", ""));
            assert!(*include_categories);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(commands[1], UiCommand::LoadEmployees));
}

#[tokio::test]
async fn stale_product_results_are_dropped() {
    let mut f = fixture(QueryParams::new("shoe", ""));
    f.app
        .on_products_loaded(QueryParams::new("sho", ""), Ok(vec![product(99)]));
    assert_eq!(f.app.products_state(), &LoadState::Loading);

    f.app.on_products_loaded(
        QueryParams::new("shoe", ""),
        Ok((1..=30).map(product).collect()),
    );
    assert_eq!(f.app.products_state(), &LoadState::Ready);
    assert_eq!(f.app.product_page().len(), 12);
    assert_eq!(f.app.product_page_info(), (0, 3));

    f.app.next_product_page();
    f.app.next_product_page();
    f.app.next_product_page();
    assert_eq!(f.app.product_page_info(), (2, 3));
    assert_eq!(f.app.product_page().len(), 6);
}

#[tokio::test(start_paused = true)]
async fn typing_commits_one_query_after_quiet_period() {
    let mut f = fixture(QueryParams::default());
    let mut committed = f.query.subscribe();

    f.app.set_focus(Focus::Search);
    for ch in "shoe".chars() {
        handle_key(&mut f.app, key(KeyCode::Char(ch)));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(f.app.query().search_buffer(), "shoe");
    assert_eq!(f.query.commit_count(), 0);

    tokio::time::sleep(Duration::from_millis(400)).await;
    committed.changed().await.unwrap();
    let params = committed.borrow_and_update().clone();
    assert_eq!(params.q, "shoe");
    assert_eq!(f.query.commit_count(), 1);

    f.app.on_query_committed(params);
    match drain(&mut f.commands).as_slice() {
        [UiCommand::LoadCatalog {
            params,
            include_categories: false,
        }] => assert_eq!(params.q, "shoe"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn sidebar_selection_commits_category_immediately() {
    let mut f = fixture(QueryParams::default());
    f.app.on_categories_loaded(Ok(vec![
        stockdesk::resource::Category {
            slug: "beauty".to_string(),
            name: "Beauty".to_string(),
        },
        stockdesk::resource::Category {
            slug: "laptops".to_string(),
            name: "Laptops".to_string(),
        },
    ]));

    handle_key(&mut f.app, key(KeyCode::Tab));
    handle_key(&mut f.app, key(KeyCode::Tab));
    assert_eq!(f.app.focus(), Focus::Sidebar);
    handle_key(&mut f.app, key(KeyCode::Down));
    handle_key(&mut f.app, key(KeyCode::Down));
    handle_key(&mut f.app, key(KeyCode::Enter));

    assert_eq!(f.query.current().category, "laptops");
    assert!(!f.query.has_pending_search());
}

#[tokio::test]
async fn deleting_a_product_hides_it_at_once() {
    let mut f = fixture(QueryParams::default());
    f.app
        .on_products_loaded(QueryParams::default(), Ok(vec![product(1), product(2)]));

    handle_key(&mut f.app, key(KeyCode::Char('d')));
    let ids: Vec<u64> = f.app.product_page().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2]);

    f.app.on_product_list_event(ListEvent::DeleteFailed {
        id: 1,
        message: "Failed to delete product".to_string(),
    });
    assert!(f.app.notice().unwrap().contains("product 1"));
    assert_eq!(f.app.product_page().len(), 1);
}

#[tokio::test]
async fn employee_delete_waits_for_confirmation() {
    let mut f = fixture(QueryParams::default());
    f.app.on_employees_loaded(Ok(vec![
        employee("a", "Sara", "Haddad"),
        employee("b", "Omar", "Saleh"),
    ]));

    handle_key(&mut f.app, key(KeyCode::Char('2')));
    assert_eq!(f.app.screen(), Screen::Employees);

    handle_key(&mut f.app, key(KeyCode::Char('d')));
    let confirming = f.app.confirming_employee().unwrap();
    assert_eq!(confirming.profile.name1st, "Sara");
    assert_eq!(f.app.employee_page().len(), 2);

    // Anything but y/n is swallowed by the prompt
    handle_key(&mut f.app, key(KeyCode::Char('q')));
    assert!(!f.app.should_quit());

    handle_key(&mut f.app, key(KeyCode::Char('n')));
    assert!(f.app.confirming_employee().is_none());
    assert_eq!(f.app.employee_page().len(), 2);
}

#[tokio::test]
async fn refresh_request_closes_modal_and_reloads() {
    let mut f = fixture(QueryParams::default());
    let records = vec![employee("a", "Sara", "Haddad"), employee("b", "Omar", "Saleh")];
    f.app.on_employees_loaded(Ok(records));
    f.app.set_screen(Screen::Employees);

    handle_key(&mut f.app, key(KeyCode::Enter));
    assert!(matches!(f.app.modal(), EmployeeModalState::Viewing { .. }));
    handle_key(&mut f.app, key(KeyCode::Esc));

    handle_key(&mut f.app, key(KeyCode::Char('d')));
    handle_key(&mut f.app, key(KeyCode::Char('y')));

    let settled = common::eventually(Duration::from_secs(2), || {
        f.app.employees_snapshot().refresh_requested
    })
    .await;
    assert!(settled);
    assert_eq!(f.app.employee_page().len(), 1);

    drain(&mut f.commands);
    f.app.on_employee_list_event(ListEvent::RefreshRequested);
    assert_eq!(f.app.employees_state(), &LoadState::Loading);
    assert!(matches!(
        drain(&mut f.commands).as_slice(),
        [UiCommand::LoadEmployees]
    ));
    assert!(!f.app.employees_snapshot().refresh_requested);
}

#[tokio::test]
async fn edit_form_sends_full_record_with_nulls() {
    let mut f = fixture(QueryParams::default());
    let mut record = employee("a", "Sara", "Haddad");
    record.profile.address = Some("Amman".to_string());
    f.app.on_employees_loaded(Ok(vec![record]));
    f.app.set_screen(Screen::Employees);

    handle_key(&mut f.app, key(KeyCode::Char('e')));
    assert_eq!(f.app.modal().focused_field(), Some(FormField::FirstName));
    handle_key(&mut f.app, key(KeyCode::Char('h')));
    // Jump to Address and clear it
    for _ in 0..5 {
        handle_key(&mut f.app, key(KeyCode::Tab));
    }
    for _ in 0.."Amman".len() {
        handle_key(&mut f.app, key(KeyCode::Backspace));
    }
    handle_key(&mut f.app, key(KeyCode::Enter));
    assert!(f.app.modal().is_saving());

    let record = match drain(&mut f.commands).pop() {
        Some(UiCommand::SaveEmployee { record }) => record,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(record.id, "a");
    assert_eq!(record.profile.name1st, "Sarah");
    assert_eq!(record.profile.address, None);
    assert_eq!(record.profile.name_last, "Haddad");

    // Esc is ignored while the save is in flight
    handle_key(&mut f.app, key(KeyCode::Esc));
    assert!(f.app.modal().is_visible());

    f.app.on_employee_saved(Err("Failed to update employee".to_string()));
    match f.app.modal() {
        EmployeeModalState::Editing { error, saving, .. } => {
            assert_eq!(error.as_deref(), Some("Failed to update employee"));
            assert!(!saving);
        }
        other => panic!("unexpected {other:?}"),
    }

    handle_key(&mut f.app, key(KeyCode::Char('s')).with_ctrl());
    drain(&mut f.commands);
    f.app.on_employee_saved(Ok(()));
    assert!(!f.app.modal().is_visible());
    assert!(matches!(
        drain(&mut f.commands).as_slice(),
        [UiCommand::LoadEmployees]
    ));
}

#[tokio::test]
async fn fetch_failure_is_shown_inline() {
    let mut f = fixture(QueryParams::default());
    f.app.on_employees_loaded(Err("Failed to fetch employees".to_string()));
    assert_eq!(
        f.app.employees_state(),
        &LoadState::Failed("Failed to fetch employees".to_string())
    );

    // The rest of the dashboard stays usable
    handle_key(&mut f.app, key(KeyCode::Char('1')));
    assert_eq!(f.app.screen(), Screen::Products);
    handle_key(&mut f.app, key(KeyCode::Char('q')));
    assert!(f.app.should_quit());
}

trait WithCtrl {
    fn with_ctrl(self) -> Self;
}

impl WithCtrl for KeyEvent {
    fn with_ctrl(mut self) -> Self {
        self.modifiers |= KeyModifiers::CONTROL;
        self
    }
}

#[tokio::test]
async fn query_commit_keeps_product_page_within_bounds() {
    let mut f = fixture(QueryParams::default());
    f.app
        .on_products_loaded(QueryParams::default(), Ok((1..=30).map(product).collect()));
    f.app.next_product_page();
    f.app.next_product_page();
    assert_eq!(f.app.product_page_info(), (2, 3));

    f.app.on_query_committed(QueryParams::default());
    f.app
        .on_products_loaded(QueryParams::default(), Ok((1..=30).map(product).collect()));
    assert_eq!(f.app.product_page_info(), (2, 3));

    // A shorter result set shows its last page instead of an empty one
    f.app
        .on_products_loaded(QueryParams::default(), Ok((1..=5).map(product).collect()));
    assert_eq!(f.app.product_page_info(), (0, 1));
    assert_eq!(f.app.product_page().len(), 5);
}

#[tokio::test]
async fn address_bar_navigates_to_typed_query() {
    let mut f = fixture(QueryParams::new("phone", ""));
    let mut committed = f.query.subscribe();
    f.app.on_categories_loaded(Ok(vec![
        stockdesk::resource::Category {
            slug: "beauty".to_string(),
            name: "Beauty".to_string(),
        },
        stockdesk::resource::Category {
            slug: "laptops".to_string(),
            name: "Laptops".to_string(),
        },
    ]));
    f.app.set_screen(Screen::Employees);

    handle_key(&mut f.app, key(KeyCode::Char('g')));
    assert_eq!(f.app.screen(), Screen::Products);
    assert_eq!(f.app.address_buffer(), Some("q=phone"));

    for _ in 0.."q=phone".len() {
        handle_key(&mut f.app, key(KeyCode::Backspace));
    }
    for ch in "q=mac+book&category=laptops".chars() {
        handle_key(&mut f.app, key(KeyCode::Char(ch)));
    }
    // Typed characters go to the address, not to global shortcuts
    assert!(!f.app.should_quit());
    handle_key(&mut f.app, key(KeyCode::Enter));

    assert_eq!(f.app.address_buffer(), None);
    assert_eq!(f.query.current(), QueryParams::new("mac book", "laptops"));
    assert_eq!(f.app.query().search_buffer(), "mac book");
    assert_eq!(f.app.category_cursor(), 2);
    assert_eq!(f.query.commit_count(), 1);
    assert!(committed.has_changed().unwrap());
}

#[tokio::test]
async fn cancelled_address_edit_changes_nothing() {
    let mut f = fixture(QueryParams::new("", "beauty"));
    handle_key(&mut f.app, key(KeyCode::Char('g')));
    handle_key(&mut f.app, key(KeyCode::Char('x')));
    handle_key(&mut f.app, key(KeyCode::Esc));

    assert_eq!(f.app.address_buffer(), None);
    assert_eq!(f.query.current(), QueryParams::new("", "beauty"));
    assert_eq!(f.query.commit_count(), 0);
}
