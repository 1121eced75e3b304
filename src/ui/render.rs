use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::resource::PersonRecord;
use crate::ui::app::{App, Focus, LoadState, Screen};
use crate::ui::footer::Footer;
use crate::ui::header::Header;
use crate::ui::layout::{centered_rect_by_size, employees_regions, layout_regions, products_regions};
use crate::ui::modal::{EmployeeModalState, FormField};
use crate::ui::theme::{
    ACCENT, ACTIVE_HIGHLIGHT, GLOBAL_BORDER, HEADER_TEXT, MUTED_TEXT, POPUP_BORDER, STATUS_ERROR,
    STATUS_OK, STATUS_WARN,
};

const MODAL_WIDTH: u16 = 64;
const CONFIRM_WIDTH: u16 = 48;

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let (header, body, footer) = layout_regions(frame.area());
    let query = app.query().current();

    frame.render_widget(
        Header::new(app.screen(), &query)
            .editing(app.address_buffer())
            .widget(),
        header,
    );
    frame.render_widget(Clear, body);
    match app.screen() {
        Screen::Products => draw_products(frame, app, body),
        Screen::Employees => draw_employees(frame, app, body),
    }
    frame.render_widget(Footer::new(app.screen()).widget(footer), footer);

    if let Some(record) = app.confirming_employee() {
        draw_confirm(frame, body, &record);
    }
    if app.modal().is_visible() {
        draw_modal(frame, body, app.modal());
    }
}

fn panel(title: &str, focused: bool) -> Block<'static> {
    let border = if focused { ACCENT } else { GLOBAL_BORDER };
    Block::default()
        .title(Span::styled(format!(" {title} "), Style::default().fg(HEADER_TEXT)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn message(text: String, color: ratatui::style::Color) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color)))).wrap(Wrap { trim: true })
}

fn draw_products(frame: &mut Frame<'_>, app: &App, body: Rect) {
    let regions = products_regions(body);
    let current = app.query().current();

    // Sidebar
    let mut lines = Vec::new();
    let entries = std::iter::once(("All", "")).chain(
        app.categories()
            .iter()
            .map(|c| (c.name.as_str(), c.slug.as_str())),
    );
    for (row, (name, slug)) in entries.enumerate() {
        let selected = slug == current.category;
        let marker = if selected { "● " } else { "  " };
        let mut style = Style::default().fg(if selected { ACCENT } else { HEADER_TEXT });
        if row == app.category_cursor() && app.focus() == Focus::Sidebar {
            style = style.bg(ACTIVE_HIGHLIGHT);
        }
        lines.push(Line::from(Span::styled(format!("{marker}{name}"), style)));
    }
    if let LoadState::Failed(error) = app.categories_state() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(STATUS_ERROR))));
    }
    let scroll = app.category_cursor().saturating_sub(regions.sidebar.height.saturating_sub(3) as usize);
    frame.render_widget(
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .block(panel("Categories", app.focus() == Focus::Sidebar)),
        regions.sidebar,
    );

    // Search bar
    let buffer = app.query().search_buffer();
    let mut search = vec![Span::styled(buffer, Style::default().fg(HEADER_TEXT))];
    if app.focus() == Focus::Search {
        search.push(Span::styled("▏", Style::default().fg(ACCENT)));
    }
    if app.query().has_pending_search() {
        search.push(Span::styled("  …", Style::default().fg(MUTED_TEXT)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(search)).block(panel("Search", app.focus() == Focus::Search)),
        regions.search,
    );

    // Grid
    let grid_block = panel("Products", app.focus() == Focus::Grid);
    match app.products_state() {
        LoadState::Loading => {
            frame.render_widget(message("Loading products…".to_string(), MUTED_TEXT).block(grid_block), regions.grid);
        }
        LoadState::Failed(error) => {
            frame.render_widget(
                message(format!("Could not load products: {error}"), STATUS_ERROR).block(grid_block),
                regions.grid,
            );
        }
        LoadState::Ready => {
            let page = app.product_page();
            if page.is_empty() {
                frame.render_widget(message("No products found.".to_string(), MUTED_TEXT).block(grid_block), regions.grid);
            } else {
                let cursor = app.product_cursor().min(page.len() - 1);
                let rows = page.iter().enumerate().map(|(index, item)| {
                    let row = Row::new(vec![
                        Cell::from(format!("#{}", item.id)),
                        Cell::from(item.title.clone()),
                        Cell::from(item.category.clone()),
                        Cell::from(format!("${:.2}", item.price)),
                    ]);
                    if index == cursor && app.focus() == Focus::Grid {
                        row.style(Style::default().bg(ACTIVE_HIGHLIGHT))
                    } else {
                        row
                    }
                });
                let table = Table::new(
                    rows,
                    [
                        Constraint::Length(6),
                        Constraint::Min(20),
                        Constraint::Length(20),
                        Constraint::Length(10),
                    ],
                )
                .header(header_row(["ID", "Title", "Category", "Price"]))
                .block(grid_block);
                frame.render_widget(table, regions.grid);
            }
        }
    }

    // Status line
    let snapshot = app.products_snapshot();
    let (page, pages) = app.product_page_info();
    let mut status = vec![Span::styled(
        format!(
            " {} items │ page {} of {}",
            snapshot.visible_len(),
            page + 1,
            pages.max(1)
        ),
        Style::default().fg(MUTED_TEXT),
    )];
    if !snapshot.pending.is_empty() {
        status.push(Span::styled(
            format!(" │ removing {}", snapshot.pending.len()),
            Style::default().fg(STATUS_WARN),
        ));
    }
    if let Some(notice) = app.notice() {
        status.push(Span::styled(format!(" │ {notice}"), Style::default().fg(STATUS_ERROR)));
    }
    frame.render_widget(Paragraph::new(Line::from(status)), regions.status);
}

fn draw_employees(frame: &mut Frame<'_>, app: &App, body: Rect) {
    let (table_area, status_area) = employees_regions(body);
    let block = panel("Employees", true);

    match app.employees_state() {
        LoadState::Loading => {
            frame.render_widget(message("Loading employees…".to_string(), MUTED_TEXT).block(block), table_area);
        }
        LoadState::Failed(error) => {
            frame.render_widget(
                message(format!("Could not load employees: {error}"), STATUS_WARN).block(block),
                table_area,
            );
        }
        LoadState::Ready => {
            let page = app.employee_page();
            if page.is_empty() {
                frame.render_widget(message("No employees found.".to_string(), MUTED_TEXT).block(block), table_area);
            } else {
                let pending = app.employees_pending();
                let rows = page.iter().enumerate().map(|(index, record)| {
                    let p = &record.profile;
                    let mut style = Style::default();
                    if pending.contains(&record.id) {
                        style = style.fg(MUTED_TEXT).add_modifier(Modifier::CROSSED_OUT);
                    }
                    if index == app.employee_cursor() {
                        style = style.bg(ACTIVE_HIGHLIGHT);
                    }
                    Row::new(vec![
                        Cell::from(record.initials()),
                        Cell::from(record.full_name()),
                        Cell::from(p.mobile_no.clone()),
                        Cell::from(p.address.clone().unwrap_or_else(|| "—".to_string())),
                        Cell::from(p.date_of_birth.clone().unwrap_or_else(|| "—".to_string())),
                        Cell::from(p.identity_number.clone().unwrap_or_else(|| "—".to_string())),
                    ])
                    .style(style)
                });
                let table = Table::new(
                    rows,
                    [
                        Constraint::Length(4),
                        Constraint::Min(18),
                        Constraint::Length(16),
                        Constraint::Min(16),
                        Constraint::Length(12),
                        Constraint::Length(14),
                    ],
                )
                .header(header_row(["", "Name", "Mobile", "Address", "DOB", "ID Number"]))
                .block(block);
                frame.render_widget(table, table_area);
            }
        }
    }

    let snapshot = app.employees_snapshot();
    let (page, pages) = app.employee_page_info();
    let mut status = vec![Span::styled(
        format!(" {} employees │ page {} of {}", snapshot.visible_len(), page + 1, pages.max(1)),
        Style::default().fg(MUTED_TEXT),
    )];
    if let Some(error) = &snapshot.last_error {
        status.push(Span::styled(
            format!(" │ {error} (x to dismiss)"),
            Style::default().fg(STATUS_ERROR),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(status)), status_area);
}

fn header_row<const N: usize>(labels: [&'static str; N]) -> Row<'static> {
    Row::new(labels.map(Cell::from)).style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
}

fn draw_confirm(frame: &mut Frame<'_>, body: Rect, record: &PersonRecord) {
    let lines = vec![
        Line::from(format!(
            "Delete {} {}?",
            record.profile.name1st, record.profile.name_last
        )),
        Line::from(""),
        Line::from(Span::styled("y: Delete   n/Esc: Cancel", Style::default().fg(MUTED_TEXT))),
    ];
    let area = centered_rect_by_size(body, CONFIRM_WIDTH, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(popup("Confirm")), area);
}

fn popup(title: &str) -> Block<'static> {
    Block::default()
        .title(Span::styled(format!(" {title} "), Style::default().fg(ACCENT)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(POPUP_BORDER))
}

fn draw_modal(frame: &mut Frame<'_>, body: Rect, state: &EmployeeModalState) {
    let (title, lines) = match state {
        EmployeeModalState::Hidden => return,
        EmployeeModalState::Viewing { record } => ("View", view_lines(record)),
        EmployeeModalState::Editing {
            record,
            form,
            focused,
            saving,
            error,
        } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("{}  {}", record.initials(), record.full_name()),
                    Style::default().fg(HEADER_TEXT).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            for (index, field) in FormField::ALL.iter().enumerate() {
                let mut style = Style::default().fg(HEADER_TEXT);
                let mut value = form.value(*field).to_string();
                if index == *focused {
                    style = style.bg(ACTIVE_HIGHLIGHT);
                    value.push('▏');
                }
                lines.push(Line::from(vec![
                    Span::styled(format!("{:<14}", field.label()), Style::default().fg(MUTED_TEXT)),
                    Span::styled(value, style),
                ]));
            }
            lines.push(Line::from(""));
            if *saving {
                lines.push(Line::from(Span::styled("Saving…", Style::default().fg(STATUS_WARN))));
            } else if let Some(error) = error {
                lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(STATUS_ERROR))));
            }
            lines.push(Line::from(Span::styled(
                "Tab: Next field  Enter: Save  Esc: Cancel",
                Style::default().fg(MUTED_TEXT),
            )));
            ("Edit", lines)
        }
    };

    let area = centered_rect_by_size(body, MODAL_WIDTH, lines.len() as u16 + 2);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(popup(title)),
        area,
    );
}

fn view_lines(record: &PersonRecord) -> Vec<Line<'static>> {
    let p = &record.profile;
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), Style::default().fg(MUTED_TEXT)),
            Span::styled(value, Style::default().fg(HEADER_TEXT)),
        ])
    };
    let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "—".to_string());
    let count = |items: &Option<Vec<serde_json::Value>>| items.as_ref().map_or(0, Vec::len).to_string();
    let identity_type = match &p.identity_type {
        None | Some(serde_json::Value::Null) => "—".to_string(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };

    vec![
        Line::from(Span::styled(
            format!("{}  {}", record.initials(), record.full_name()),
            Style::default().fg(HEADER_TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Mobile", p.mobile_no.clone()),
        field("Address", or_dash(&p.address)),
        field("Date of birth", or_dash(&p.date_of_birth)),
        field("ID type", identity_type),
        field("ID number", or_dash(&p.identity_number)),
        field("Photo", record.avatar().map_or("—".to_string(), |_| "on file".to_string())),
        field("Devices", count(&p.employee_devices)),
        field("Documents", count(&p.employee_documents)),
        field("References", count(&p.employee_references)),
        Line::from(""),
        Line::from(Span::styled(
            "e: Edit  Esc: Close",
            Style::default().fg(MUTED_TEXT),
        )),
        Line::from(Span::styled(format!("id {}", record.id), Style::default().fg(STATUS_OK))),
    ]
}
