use std::io;
use std::sync::mpsc::{RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::client::{CatalogApi, CatalogRemoval, EmployeeApi, EmployeeRemoval};
use crate::config::Config;
use crate::list::{DeletePolicy, ListController};
use crate::query::{QueryParams, QuerySync};
use crate::resource::{CatalogItem, PersonRecord};
use crate::ui::app::{App, UiCommand};
use crate::ui::events::{AppEvent, EventHandler};
use crate::ui::input::handle_key;
use crate::ui::render::draw;
use crate::ui::terminal_guard::setup_terminal;

const COMMAND_QUEUE: usize = 64;
/// Everything the employees screen shows, paged locally.
const EMPLOYEE_FETCH_LIMIT: usize = 10_000;

/// Runs the dashboard until the user quits.
///
/// The loop itself is synchronous; background work is spawned on `handle`.
pub fn run(
    config: &Config,
    initial: QueryParams,
    catalog: Arc<dyn CatalogApi>,
    employees: Arc<dyn EmployeeApi>,
    handle: &Handle,
) -> io::Result<()> {
    let _runtime = handle.enter();
    let (mut terminal, guard) = setup_terminal()?;
    let tick_rate = Duration::from_millis(250);
    let events = EventHandler::new(tick_rate);

    let query = QuerySync::new(initial, config.dashboard.search_debounce());

    let product_events = events.sender();
    let products: ListController<CatalogItem> = ListController::new(
        DeletePolicy::Optimistic,
        Arc::new(CatalogRemoval(Arc::clone(&catalog))),
    )
    .with_notifier(move |event| {
        let _ = product_events.send(AppEvent::ProductList(event));
    });

    let employee_events = events.sender();
    let employee_list: ListController<PersonRecord> = ListController::new(
        DeletePolicy::ConfirmThenHide,
        Arc::new(EmployeeRemoval(Arc::clone(&employees))),
    )
    .with_notifier(move |event| {
        let _ = employee_events.send(AppEvent::EmployeeList(event));
    });

    let mut app = App::new(&config.dashboard, query.clone(), products, employee_list);

    let mut commits = query.subscribe();
    let commit_events = events.sender();
    tokio::spawn(async move {
        while commits.changed().await.is_ok() {
            let params = commits.borrow_and_update().clone();
            if commit_events.send(AppEvent::QueryCommitted(params)).is_err() {
                break;
            }
        }
    });

    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
    tokio::spawn(command_worker(command_rx, catalog, employees, events.sender()));
    app.set_command_sender(command_tx);
    app.start();

    loop {
        terminal.draw(|frame| draw(frame, &app))?;
        if app.should_quit() {
            break;
        }

        match events.next(tick_rate) {
            Ok(AppEvent::Key(key)) => handle_key(&mut app, key),
            Ok(AppEvent::Tick) | Ok(AppEvent::Resize(..)) => {}
            Ok(AppEvent::QueryCommitted(params)) => app.on_query_committed(params),
            Ok(AppEvent::CategoriesLoaded(result)) => app.on_categories_loaded(result),
            Ok(AppEvent::ProductsLoaded { params, result }) => app.on_products_loaded(params, result),
            Ok(AppEvent::EmployeesLoaded(result)) => app.on_employees_loaded(result),
            Ok(AppEvent::ProductList(event)) => app.on_product_list_event(event),
            Ok(AppEvent::EmployeeList(event)) => app.on_employee_list_event(event),
            Ok(AppEvent::EmployeeSaved(result)) => app.on_employee_saved(result),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    drop(guard);
    Ok(())
}

/// Executes UI commands concurrently, posting each outcome back as an event.
async fn command_worker(
    mut commands: mpsc::Receiver<UiCommand>,
    catalog: Arc<dyn CatalogApi>,
    employees: Arc<dyn EmployeeApi>,
    events: Sender<AppEvent>,
) {
    while let Some(command) = commands.recv().await {
        tokio::spawn(execute(
            command,
            Arc::clone(&catalog),
            Arc::clone(&employees),
            events.clone(),
        ));
    }
    tracing::debug!("UI command channel closed");
}

async fn execute(
    command: UiCommand,
    catalog: Arc<dyn CatalogApi>,
    employees: Arc<dyn EmployeeApi>,
    events: Sender<AppEvent>,
) {
    let outcome = match command {
        UiCommand::LoadCatalog {
            params,
            include_categories,
        } => {
            let products = catalog.list_items(&params.q, &params.category);
            if include_categories {
                let (categories, products) = tokio::join!(catalog.list_categories(), products);
                let _ = events.send(AppEvent::CategoriesLoaded(
                    categories.map_err(|e| e.to_string()),
                ));
                events.send(AppEvent::ProductsLoaded {
                    params,
                    result: products.map_err(|e| e.to_string()),
                })
            } else {
                let result = products.await.map_err(|e| e.to_string());
                events.send(AppEvent::ProductsLoaded { params, result })
            }
        }
        UiCommand::LoadEmployees => {
            let result = employees
                .list(0, EMPLOYEE_FETCH_LIMIT)
                .await
                .map(|page| page.employees)
                .map_err(|e| e.to_string());
            events.send(AppEvent::EmployeesLoaded(result))
        }
        UiCommand::SaveEmployee { record } => {
            let result = employees.update(&record).await;
            if let Err(err) = &result {
                tracing::warn!(id = %record.id, error = %err, "Employee update failed");
            }
            events.send(AppEvent::EmployeeSaved(
                result.map(|_| ()).map_err(|e| e.to_string()),
            ))
        }
    };

    if outcome.is_err() {
        tracing::debug!("Dashboard closed before a result was delivered");
    }
}
