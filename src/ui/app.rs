use std::collections::BTreeSet;

use tokio::sync::mpsc;

use crate::config::DashboardConfig;
use crate::list::{ListController, ListEvent, ListState};
use crate::paginate::Paginator;
use crate::query::{QueryParams, QuerySync};
use crate::resource::{CatalogItem, Category, PersonRecord};
use crate::ui::modal::{EmployeeModalIntent, EmployeeModalReducer, EmployeeModalState};
use crate::ui::mvi::Reducer;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    Products,
    Employees,
}

/// Which part of the products screen receives keys.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Focus {
    Grid,
    Search,
    Sidebar,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// Work handed to the background worker.
#[derive(Debug)]
pub enum UiCommand {
    /// Fetch products for `params`; categories too when asked, in parallel.
    LoadCatalog {
        params: QueryParams,
        include_categories: bool,
    },
    LoadEmployees,
    SaveEmployee { record: PersonRecord },
}

pub type UiCommandSender = mpsc::Sender<UiCommand>;

macro_rules! dispatch_mvi {
    ($self:expr, $field:ident, $reducer:ty, $intent:expr) => {
        $self.$field = <$reducer>::reduce(std::mem::take(&mut $self.$field), $intent);
    };
}

pub struct App {
    should_quit: bool,
    screen: Screen,
    focus: Focus,
    query: QuerySync,
    categories: Vec<Category>,
    categories_state: LoadState,
    /// Sidebar row; 0 is "All".
    category_cursor: usize,
    products: ListController<CatalogItem>,
    products_state: LoadState,
    product_pager: Paginator,
    product_cursor: usize,
    employees: ListController<PersonRecord>,
    employees_state: LoadState,
    employee_pager: Paginator,
    employee_cursor: usize,
    /// Employee view/edit modal (MVI pattern).
    modal: EmployeeModalState,
    commands: Option<UiCommandSender>,
    /// One-line message for the status bar.
    notice: Option<String>,
    /// Address bar text while it is being edited.
    address: Option<String>,
}

impl App {
    pub fn new(
        config: &DashboardConfig,
        query: QuerySync,
        products: ListController<CatalogItem>,
        employees: ListController<PersonRecord>,
    ) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Products,
            focus: Focus::Grid,
            query,
            categories: Vec::new(),
            categories_state: LoadState::Loading,
            category_cursor: 0,
            products,
            products_state: LoadState::Loading,
            product_pager: Paginator::new(config.catalog_page_size),
            product_cursor: 0,
            employees,
            employees_state: LoadState::Loading,
            employee_pager: Paginator::new(config.employee_page_size),
            employee_cursor: 0,
            modal: EmployeeModalState::default(),
            commands: None,
            notice: None,
            address: None,
        }
    }

    pub fn set_command_sender(&mut self, sender: UiCommandSender) {
        self.commands = Some(sender);
    }

    /// Initial fetches: categories and products together, employees alongside.
    pub fn start(&mut self) {
        let params = self.query.current();
        self.send_command(UiCommand::LoadCatalog {
            params,
            include_categories: true,
        });
        self.send_command(UiCommand::LoadEmployees);
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.focus = Focus::Grid;
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Grid → Search → Sidebar → Grid.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Grid => Focus::Search,
            Focus::Search => Focus::Sidebar,
            Focus::Sidebar => Focus::Grid,
        };
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    // ------------------------------------------------------------------
    // Query
    // ------------------------------------------------------------------

    pub fn query(&self) -> &QuerySync {
        &self.query
    }

    pub fn search_input(&mut self, ch: char) {
        let mut buffer = self.query.search_buffer();
        buffer.push(ch);
        self.query.input_search(buffer);
    }

    pub fn search_backspace(&mut self) {
        let mut buffer = self.query.search_buffer();
        if buffer.pop().is_some() {
            self.query.input_search(buffer);
        }
    }

    pub fn on_query_committed(&mut self, params: QueryParams) {
        tracing::debug!(query = %params.to_query_string(), "Reloading products");
        self.products_state = LoadState::Loading;
        self.product_cursor = 0;
        self.send_command(UiCommand::LoadCatalog {
            params,
            include_categories: false,
        });
    }

    // ------------------------------------------------------------------
    // Address bar
    // ------------------------------------------------------------------

    pub fn address_buffer(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Starts editing the address bar from the committed query.
    pub fn open_address(&mut self) {
        self.address = Some(self.query.current().to_query_string());
        self.set_screen(Screen::Products);
    }

    pub fn address_input(&mut self, ch: char) {
        if let Some(address) = self.address.as_mut() {
            address.push(ch);
        }
    }

    pub fn address_backspace(&mut self) {
        if let Some(address) = self.address.as_mut() {
            address.pop();
        }
    }

    pub fn cancel_address(&mut self) {
        self.address = None;
    }

    /// Navigates to the edited address, replacing search and category at once.
    pub fn commit_address(&mut self) {
        let Some(address) = self.address.take() else {
            return;
        };
        let params = QueryParams::from_query_str(&address);
        self.sync_category_cursor(&params.category);
        self.query.navigate(params);
    }

    fn sync_category_cursor(&mut self, slug: &str) {
        self.category_cursor = self
            .categories
            .iter()
            .position(|c| c.slug == slug)
            .map_or(0, |index| index + 1);
    }

    // ------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_state(&self) -> &LoadState {
        &self.categories_state
    }

    pub fn category_cursor(&self) -> usize {
        self.category_cursor
    }

    pub fn on_categories_loaded(&mut self, result: Result<Vec<Category>, String>) {
        match result {
            Ok(categories) => {
                self.categories = categories;
                self.categories_state = LoadState::Ready;
                let current = self.query.current().category;
                self.sync_category_cursor(&current);
            }
            Err(message) => self.categories_state = LoadState::Failed(message),
        }
    }

    pub fn move_category(&mut self, delta: isize) {
        let rows = self.categories.len() + 1;
        self.category_cursor = self.category_cursor.saturating_add_signed(delta).min(rows - 1);
    }

    /// Commits the highlighted sidebar entry; "All" clears the filter.
    pub fn select_category(&mut self) {
        let slug = match self.category_cursor {
            0 => String::new(),
            n => match self.categories.get(n - 1) {
                Some(category) => category.slug.clone(),
                None => return,
            },
        };
        self.query.select_category(slug);
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub fn products_state(&self) -> &LoadState {
        &self.products_state
    }

    pub fn products_snapshot(&self) -> ListState<CatalogItem> {
        self.products.snapshot()
    }

    pub fn on_products_loaded(&mut self, params: QueryParams, result: Result<Vec<CatalogItem>, String>) {
        if params != self.query.current() {
            tracing::debug!(query = %params.to_query_string(), "Dropping stale product results");
            return;
        }
        match result {
            Ok(items) => {
                self.products.replace(items);
                self.products_state = LoadState::Ready;
            }
            Err(message) => self.products_state = LoadState::Failed(message),
        }
    }

    pub fn on_product_list_event(&mut self, event: ListEvent<u64>) {
        if let ListEvent::DeleteFailed { id, message } = event {
            self.notice = Some(format!("Delete of product {id} failed: {message}"));
        }
    }

    pub fn product_page(&self) -> Vec<CatalogItem> {
        let visible = self.products.visible();
        self.product_pager.slice(&visible).to_vec()
    }

    /// Zero-based current page and page count.
    pub fn product_page_info(&self) -> (usize, usize) {
        let total = self.products.snapshot().visible_len();
        (
            self.product_pager.current_page(total),
            self.product_pager.page_count(total),
        )
    }

    pub fn product_cursor(&self) -> usize {
        self.product_cursor
    }

    pub fn next_product_page(&mut self) {
        let total = self.products.snapshot().visible_len();
        self.product_pager.next(total);
        self.product_cursor = 0;
    }

    pub fn prev_product_page(&mut self) {
        let total = self.products.snapshot().visible_len();
        self.product_pager.prev(total);
        self.product_cursor = 0;
    }

    pub fn move_product_cursor(&mut self, delta: isize) {
        let len = self.product_page().len();
        self.product_cursor = clamp_cursor(self.product_cursor, delta, len);
    }

    /// Removes the highlighted product from view at once; the delete runs in
    /// the background and is never undone locally.
    pub fn delete_selected_product(&mut self) {
        let page = self.product_page();
        let Some(item) = page.get(self.product_cursor.min(page.len().saturating_sub(1))) else {
            return;
        };
        self.notice = None;
        if self.products.request_delete(item.id).is_some() {
            tracing::info!(id = item.id, "Product removal requested");
        }
    }

    // ------------------------------------------------------------------
    // Employees
    // ------------------------------------------------------------------

    pub fn employees_state(&self) -> &LoadState {
        &self.employees_state
    }

    pub fn employees_snapshot(&self) -> ListState<PersonRecord> {
        self.employees.snapshot()
    }

    pub fn reload_employees(&mut self) {
        self.employees_state = LoadState::Loading;
        self.send_command(UiCommand::LoadEmployees);
    }

    pub fn on_employees_loaded(&mut self, result: Result<Vec<PersonRecord>, String>) {
        match result {
            Ok(records) => {
                self.employees.replace(records);
                self.employee_pager.reset();
                self.employee_cursor = 0;
                self.employees_state = LoadState::Ready;
            }
            Err(message) => self.employees_state = LoadState::Failed(message),
        }
    }

    pub fn on_employee_list_event(&mut self, event: ListEvent<String>) {
        if event == ListEvent::RefreshRequested && self.employees.take_refresh_request() {
            self.dispatch_modal(EmployeeModalIntent::Close);
            self.reload_employees();
        }
    }

    pub fn employee_page(&self) -> Vec<PersonRecord> {
        let visible = self.employees.visible();
        self.employee_pager.slice(&visible).to_vec()
    }

    pub fn employee_page_info(&self) -> (usize, usize) {
        let total = self.employees.snapshot().visible_len();
        (
            self.employee_pager.current_page(total),
            self.employee_pager.page_count(total),
        )
    }

    pub fn employee_cursor(&self) -> usize {
        self.employee_cursor
    }

    pub fn next_employee_page(&mut self) {
        let total = self.employees.snapshot().visible_len();
        self.employee_pager.next(total);
        self.employee_cursor = 0;
    }

    pub fn prev_employee_page(&mut self) {
        let total = self.employees.snapshot().visible_len();
        self.employee_pager.prev(total);
        self.employee_cursor = 0;
    }

    pub fn move_employee_cursor(&mut self, delta: isize) {
        let len = self.employee_page().len();
        self.employee_cursor = clamp_cursor(self.employee_cursor, delta, len);
    }

    pub fn selected_employee(&self) -> Option<PersonRecord> {
        self.employee_page().get(self.employee_cursor).cloned()
    }

    /// Asks for confirmation; nothing is hidden yet.
    pub fn delete_selected_employee(&mut self) {
        if let Some(record) = self.selected_employee() {
            self.employees.request_delete(record.id);
        }
    }

    /// Record awaiting the delete confirmation, if any.
    pub fn confirming_employee(&self) -> Option<PersonRecord> {
        let snapshot = self.employees.snapshot();
        let id = snapshot.confirming.as_ref()?;
        snapshot.items.iter().find(|r| &r.id == id).cloned()
    }

    pub fn confirm_employee_delete(&mut self) {
        let controller = self.employees.clone();
        tokio::spawn(async move {
            controller.confirm_delete().await;
        });
    }

    pub fn cancel_employee_delete(&mut self) {
        self.employees.cancel_delete();
    }

    pub fn dismiss_employee_error(&mut self) {
        self.employees.dismiss_error();
    }

    /// Ids of employees whose delete is in flight.
    pub fn employees_pending(&self) -> BTreeSet<String> {
        self.employees.snapshot().pending
    }

    // ------------------------------------------------------------------
    // Employee modal (MVI pattern)
    // ------------------------------------------------------------------

    pub fn modal(&self) -> &EmployeeModalState {
        &self.modal
    }

    pub fn dispatch_modal(&mut self, intent: EmployeeModalIntent) {
        dispatch_mvi!(self, modal, EmployeeModalReducer, intent);
    }

    pub fn view_selected_employee(&mut self) {
        if let Some(record) = self.selected_employee() {
            self.dispatch_modal(EmployeeModalIntent::View { record });
        }
    }

    pub fn edit_selected_employee(&mut self) {
        if let Some(record) = self.selected_employee() {
            self.dispatch_modal(EmployeeModalIntent::Edit { record });
        }
    }

    /// Sends the edit form. Ignored unless the form is open and idle.
    pub fn save_modal(&mut self) {
        let EmployeeModalState::Editing {
            record,
            form,
            saving: false,
            ..
        } = &self.modal
        else {
            return;
        };
        let record = form.apply(record);
        self.dispatch_modal(EmployeeModalIntent::SaveStarted);
        if !self.send_command(UiCommand::SaveEmployee { record }) {
            self.dispatch_modal(EmployeeModalIntent::SaveFailed {
                message: "Failed to save".to_string(),
            });
        }
    }

    pub fn on_employee_saved(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.dispatch_modal(EmployeeModalIntent::SaveSucceeded);
                self.reload_employees();
            }
            Err(message) => self.dispatch_modal(EmployeeModalIntent::SaveFailed { message }),
        }
    }

    /// Re-fetches whatever the current screen shows.
    pub fn reload(&mut self) {
        match self.screen {
            Screen::Products => {
                let params = self.query.current();
                self.products_state = LoadState::Loading;
                self.send_command(UiCommand::LoadCatalog {
                    params,
                    include_categories: !matches!(self.categories_state, LoadState::Ready),
                });
            }
            Screen::Employees => self.reload_employees(),
        }
    }

    fn send_command(&mut self, command: UiCommand) -> bool {
        let Some(sender) = &self.commands else {
            return false;
        };
        match sender.try_send(command) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Dropped UI command");
                self.notice = Some(format!("Request not sent: {err}"));
                false
            }
        }
    }
}

fn clamp_cursor(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.min(len - 1).saturating_add_signed(delta).min(len - 1)
}
