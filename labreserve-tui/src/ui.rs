//! Rendering: pure functions from application state to the frame

use ratatui::{prelude::*, widgets::*};
use tui_input::Input;

use crate::app::{App, Route};
use crate::composer::{ComposerField, ReservationForm};
use crate::gate;
use crate::screens::lab_works::LabWorkForm;
use crate::screens::login::LoginField;
use crate::screens::register::RegisterField;

const TABS: [Route; 4] = [
    Route::Labs,
    Route::Equipment,
    Route::LabWorks,
    Route::Reservations,
];

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    match app.route {
        Route::Login => draw_login(f, app, chunks[1]),
        Route::Register => draw_register(f, app, chunks[1]),
        Route::Labs => draw_labs(f, app, chunks[1]),
        Route::Equipment => draw_equipment(f, app, chunks[1]),
        Route::LabWorks => draw_lab_works(f, app, chunks[1]),
        Route::Reservations => draw_reservations(f, app, chunks[1]),
    }
    draw_status(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" labreserve ")];
    for (i, route) in TABS.iter().enumerate() {
        let label = format!(" {}:{} ", i + 1, route.title());
        if *route == app.route {
            spans.push(Span::styled(
                label,
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        }
    }
    if let (Some(username), Some(role)) = (app.username(), app.role()) {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("{} ({})", username, role.as_str()),
            Style::default().fg(Color::Green),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some(notice) = &app.notice {
        (notice.clone(), Style::default().fg(Color::Yellow))
    } else if let Some(error) = current_error(app) {
        (error, Style::default().fg(Color::Red))
    } else {
        (key_help(app), Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn current_error(app: &App) -> Option<String> {
    match app.route {
        Route::Login | Route::Register => None,
        Route::Labs => app.labs_error.clone().or_else(|| app.labs.error.clone()),
        Route::Equipment => app.equipment.error.clone(),
        Route::LabWorks => app.lab_works.error.clone(),
        Route::Reservations => app.reservations.error.clone(),
    }
}

fn key_help(app: &App) -> String {
    let can_manage = gate::can_manage_resources(app.role());
    match app.route {
        Route::Login => "Enter sign in | F2 register | Esc quit".to_string(),
        Route::Register => "Enter create account | Esc back".to_string(),
        Route::Labs if can_manage => {
            "n new | e edit | d delete | r refresh | 1-4 switch | o sign out | q quit".to_string()
        }
        Route::Labs => "r refresh | 1-4 switch | o sign out | q quit".to_string(),
        Route::Equipment if can_manage => {
            "f filter | n new | e edit | d delete | r refresh | q quit".to_string()
        }
        Route::Equipment => "f filter | r refresh | 1-4 switch | o sign out | q quit".to_string(),
        Route::LabWorks => {
            "v view | n new | e edit | d delete | r refresh | 1-4 switch | q quit".to_string()
        }
        Route::Reservations if can_manage => {
            "n new | a approve | x reject | d delete | r refresh | q quit".to_string()
        }
        Route::Reservations => "n new | d cancel | r refresh | 1-4 switch | q quit".to_string(),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn input_line<'a>(label: &'a str, input: &'a Input, focused: bool, masked: bool) -> Line<'a> {
    let value = if masked {
        "*".repeat(input.value().chars().count())
    } else {
        input.value().to_string()
    };
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let marker = if focused { "> " } else { "  " };
    Line::from(vec![
        Span::styled(format!("{}{:<12}", marker, label), style),
        Span::styled(value, style),
        if focused {
            Span::styled("_", style.add_modifier(Modifier::SLOW_BLINK))
        } else {
            Span::raw("")
        },
    ])
}

fn choice_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let marker = if focused { "> " } else { "  " };
    Line::from(vec![
        Span::styled(format!("{}{:<12}", marker, label), style),
        Span::styled(if focused { format!("< {} >", value) } else { value }, style),
    ])
}

fn error_line(error: Option<&str>) -> Line<'_> {
    match error {
        Some(message) => Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        None => Line::from(""),
    }
}

fn form_popup(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let height = lines.len() as u16 + 2;
    let popup = centered(area, 60, height);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title));
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

fn draw_login(f: &mut Frame, app: &App, area: Rect) {
    let screen = &app.login;
    let lines = vec![
        input_line(
            "Username",
            &screen.username,
            screen.focus == LoginField::Username,
            false,
        ),
        input_line(
            "Password",
            &screen.password,
            screen.focus == LoginField::Password,
            true,
        ),
        Line::from(""),
        if screen.submitting {
            Line::from(Span::styled("Signing in...", Style::default().fg(Color::Cyan)))
        } else {
            error_line(screen.error.as_deref())
        },
    ];
    form_popup(f, area, "Sign in", lines);
}

fn draw_register(f: &mut Frame, app: &App, area: Rect) {
    let screen = &app.register;
    let lines = vec![
        input_line(
            "Username",
            &screen.username,
            screen.focus == RegisterField::Username,
            false,
        ),
        input_line(
            "Password",
            &screen.password,
            screen.focus == RegisterField::Password,
            true,
        ),
        choice_line(
            "Role",
            screen.role.as_str().to_string(),
            screen.focus == RegisterField::Role,
        ),
        Line::from(""),
        if screen.submitting {
            Line::from(Span::styled("Creating...", Style::default().fg(Color::Cyan)))
        } else {
            error_line(screen.error.as_deref())
        },
    ];
    form_popup(f, area, "Register", lines);
}

fn table_block(title: String, loading: bool) -> Block<'static> {
    let title = if loading {
        format!(" {} (loading...) ", title)
    } else {
        format!(" {} ", title)
    };
    Block::default().borders(Borders::ALL).title(title)
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn draw_labs(f: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .labs_catalog
        .iter()
        .enumerate()
        .map(|(i, lab)| {
            Row::new(vec![
                lab.name.clone(),
                lab.location.clone(),
                lab.capacity.to_string(),
                lab.description.clone().unwrap_or_default(),
            ])
            .style(row_style(i == app.labs.cursor))
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Length(8),
            Constraint::Percentage(45),
        ],
    )
    .header(Row::new(vec!["Name", "Location", "Capacity", "Description"]).bold())
    .block(table_block("Labs".to_string(), app.labs_loading));
    f.render_widget(table, area);

    if let Some(form) = &app.labs.form {
        let title = if form.editing.is_some() { "Edit lab" } else { "New lab" };
        let lines = vec![
            input_line("Name", &form.name, form.focus == 0, false),
            input_line("Location", &form.location, form.focus == 1, false),
            input_line("Capacity", &form.capacity, form.focus == 2, false),
            input_line("Description", &form.description, form.focus == 3, false),
            Line::from(""),
            error_line(form.error.as_deref()),
        ];
        form_popup(f, area, title, lines);
    }
}

fn draw_equipment(f: &mut Frame, app: &App, area: Rect) {
    let screen = &app.equipment;
    let filter = match screen.filter_lab {
        Some(id) => app
            .labs_catalog
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| format!("lab {}", id)),
        None => "all labs".to_string(),
    };
    let rows: Vec<Row> = screen
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            Row::new(vec![
                item.name.clone(),
                item.inventory_number.clone(),
                item.status.as_str().to_string(),
                item.lab_name
                    .clone()
                    .unwrap_or_else(|| item.lab_id.to_string()),
            ])
            .style(row_style(i == screen.cursor))
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Percentage(30),
        ],
    )
    .header(Row::new(vec!["Name", "Inventory #", "Status", "Lab"]).bold())
    .block(table_block(format!("Equipment - {}", filter), screen.loading));
    f.render_widget(table, area);

    if let Some(form) = &screen.form {
        let title = if form.editing.is_some() {
            "Edit equipment"
        } else {
            "New equipment"
        };
        let lab_name = app
            .labs_catalog
            .get(form.lab_index)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| "-".to_string());
        let lines = vec![
            input_line("Name", &form.name, form.focus == 0, false),
            input_line("Inventory #", &form.inventory_number, form.focus == 1, false),
            choice_line("Status", form.status.as_str().to_string(), form.focus == 2),
            choice_line("Lab", lab_name, form.focus == 3),
            Line::from(""),
            error_line(form.error.as_deref()),
        ];
        form_popup(f, area, title, lines);
    }
}

fn draw_lab_works(f: &mut Frame, app: &App, area: Rect) {
    let screen = &app.lab_works;
    let rows: Vec<Row> = screen
        .items
        .iter()
        .enumerate()
        .map(|(i, work)| {
            Row::new(vec![
                work.title.clone(),
                work.author_username.clone(),
                work.status.as_str().to_string(),
                work.required_equipment.len().to_string(),
                work.updated_at
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
            ])
            .style(row_style(i == screen.cursor))
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(15),
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(17),
        ],
    )
    .header(Row::new(vec!["Title", "Author", "Status", "Equip", "Updated"]).bold())
    .block(table_block(
        format!("Lab works - {}", screen.view.label()),
        screen.loading,
    ));
    f.render_widget(table, area);

    if let Some(form) = &screen.form {
        draw_lab_work_form(f, area, form);
    }
}

fn draw_lab_work_form(f: &mut Frame, area: Rect, form: &LabWorkForm) {
    let title = if form.editing.is_some() {
        "Edit lab work"
    } else {
        "New lab work"
    };
    let mut lines = vec![
        input_line("Title", &form.title, form.focus == 0, false),
        input_line("Description", &form.description, form.focus == 1, false),
    ];
    lines.push(equipment_header(form.focus == 2, form.options_loading));
    lines.extend(equipment_checklist(
        &form.options,
        &form.selected,
        form.cursor,
        form.focus == 2,
    ));
    if let Some(status) = form.status {
        lines.push(choice_line(
            "Status",
            status.as_str().to_string(),
            form.focus == 3,
        ));
    }
    lines.push(Line::from(""));
    lines.push(error_line(form.error.as_deref()));
    form_popup(f, area, title, lines);
}

fn equipment_header(focused: bool, loading: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let marker = if focused { "> " } else { "  " };
    let label = if loading {
        "Equipment (loading...)"
    } else {
        "Equipment (space toggles)"
    };
    Line::from(Span::styled(format!("{}{}", marker, label), style))
}

fn equipment_checklist<'a>(
    options: &'a [shared::models::Equipment],
    selected: &std::collections::BTreeSet<i64>,
    cursor: usize,
    focused: bool,
) -> Vec<Line<'a>> {
    options
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let mark = if selected.contains(&item.id) { "[x]" } else { "[ ]" };
            let style = if focused && i == cursor {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("    {} {} ({})", mark, item.name, item.inventory_number),
                style,
            ))
        })
        .collect()
}

fn draw_reservations(f: &mut Frame, app: &App, area: Rect) {
    let screen = &app.reservations;
    let rows: Vec<Row> = screen
        .items
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Row::new(vec![
                r.lab_name.clone().unwrap_or_else(|| r.lab_id.to_string()),
                r.lab_work_title.clone().unwrap_or_default(),
                r.start_time
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
                r.end_time
                    .with_timezone(&chrono::Local)
                    .format("%H:%M")
                    .to_string(),
                r.status.as_str().to_string(),
                r.username.clone().unwrap_or_default(),
            ])
            .style(row_style(i == screen.cursor))
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Length(17),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Percentage(15),
        ],
    )
    .header(Row::new(vec!["Lab", "Work", "Start", "End", "Status", "By"]).bold())
    .block(table_block("Reservations".to_string(), screen.loading));
    f.render_widget(table, area);

    if let Some(form) = &screen.form {
        draw_composer(f, app, area, form);
    }
}

fn draw_composer(f: &mut Frame, app: &App, area: Rect, form: &ReservationForm) {
    let lab_name = match form.lab_id {
        Some(id) => app
            .labs_catalog
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| format!("lab {}", id)),
        None => "-".to_string(),
    };
    let template = match form.template_id {
        Some(id) => form
            .published
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.title.clone())
            .unwrap_or_else(|| format!("work {}", id)),
        None => "none".to_string(),
    };
    let mut lines = vec![
        choice_line("Lab", lab_name, form.focus == ComposerField::Lab),
        choice_line("Template", template, form.focus == ComposerField::Template),
    ];
    lines.push(equipment_header(
        form.focus == ComposerField::Equipment,
        form.inventory_loading,
    ));
    lines.extend(equipment_checklist(
        &form.inventory,
        &form.selected_equipment,
        form.equipment_cursor,
        form.focus == ComposerField::Equipment,
    ));
    lines.push(input_line(
        "Start",
        &form.start,
        form.focus == ComposerField::Start,
        false,
    ));
    lines.push(input_line(
        "End",
        &form.end,
        form.focus == ComposerField::End,
        false,
    ));
    lines.push(input_line(
        "Purpose",
        &form.purpose,
        form.focus == ComposerField::Purpose,
        false,
    ));
    lines.push(Line::from(Span::styled(
        "Times are local, e.g. 2025-06-01 10:00",
        Style::default().fg(Color::DarkGray),
    )));
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Cyan),
        )));
    } else {
        lines.push(error_line(form.error.as_deref()));
    }
    form_popup(f, area, "New reservation", lines);
}
