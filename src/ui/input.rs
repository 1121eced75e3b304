use crate::ui::app::{App, Focus, Screen};
use crate::ui::modal::{EmployeeModalIntent, EmployeeModalState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Routes one key press. Overlays take priority over the screen beneath:
/// delete confirmation, then the employee modal, then the search box.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if is_ctrl_char(key, 'q') {
        app.request_quit();
        return;
    }

    if app.confirming_employee().is_some() {
        handle_confirm_key(app, key);
        return;
    }

    if app.modal().is_visible() {
        handle_modal_key(app, key);
        return;
    }

    if app.address_buffer().is_some() {
        handle_address_key(app, key);
        return;
    }

    if app.screen() == Screen::Products && app.focus() == Focus::Search {
        handle_search_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('1') => {
            app.set_screen(Screen::Products);
            return;
        }
        KeyCode::Char('2') => {
            app.set_screen(Screen::Employees);
            return;
        }
        KeyCode::Char('q') => {
            app.request_quit();
            return;
        }
        KeyCode::Char('r') => {
            app.clear_notice();
            app.reload();
            return;
        }
        KeyCode::Char('g') => {
            app.open_address();
            return;
        }
        _ => {}
    }

    match app.screen() {
        Screen::Products => handle_products_key(app, key),
        Screen::Employees => handle_employees_key(app, key),
    }
}

fn handle_address_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_address(),
        KeyCode::Esc => app.cancel_address(),
        KeyCode::Backspace => app.address_backspace(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.address_input(ch),
        _ => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_employee_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_employee_delete(),
        _ => {}
    }
}

fn handle_modal_key(app: &mut App, key: KeyEvent) {
    if matches!(app.modal(), EmployeeModalState::Viewing { .. }) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.dispatch_modal(EmployeeModalIntent::Close),
            KeyCode::Char('e') => app.dispatch_modal(EmployeeModalIntent::StartEdit),
            _ => {}
        }
        return;
    }

    if is_ctrl_char(key, 's') {
        app.save_modal();
        return;
    }

    match key.code {
        KeyCode::Esc => app.dispatch_modal(EmployeeModalIntent::Close),
        KeyCode::Enter => app.save_modal(),
        KeyCode::Tab | KeyCode::Down => app.dispatch_modal(EmployeeModalIntent::FocusNext),
        KeyCode::BackTab | KeyCode::Up => app.dispatch_modal(EmployeeModalIntent::FocusPrev),
        KeyCode::Backspace => app.dispatch_modal(EmployeeModalIntent::Backspace),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.dispatch_modal(EmployeeModalIntent::Type(ch));
        }
        _ => {}
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.set_focus(Focus::Grid),
        KeyCode::Tab => app.cycle_focus(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input(ch);
        }
        _ => {}
    }
}

fn handle_products_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => {
            app.cycle_focus();
            return;
        }
        KeyCode::Char('/') => {
            app.set_focus(Focus::Search);
            return;
        }
        _ => {}
    }

    match app.focus() {
        Focus::Sidebar => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.move_category(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_category(1),
            KeyCode::Enter => app.select_category(),
            KeyCode::Esc => app.set_focus(Focus::Grid),
            _ => {}
        },
        Focus::Grid => match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.move_product_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.move_product_cursor(1),
            KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => app.next_product_page(),
            KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => app.prev_product_page(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_product(),
            KeyCode::Esc => app.clear_notice(),
            _ => {}
        },
        Focus::Search => {}
    }
}

fn handle_employees_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_employee_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_employee_cursor(1),
        KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => app.next_employee_page(),
        KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => app.prev_employee_page(),
        KeyCode::Enter => app.view_selected_employee(),
        KeyCode::Char('e') => app.edit_selected_employee(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_employee(),
        KeyCode::Char('x') => app.dismiss_employee_error(),
        _ => {}
    }
}

fn is_ctrl_char(key: KeyEvent, needle: char) -> bool {
    matches!(key.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&needle))
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.contains(KeyModifiers::SHIFT)
}
