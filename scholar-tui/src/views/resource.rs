//! Generic resource list view.

use crate::page::{PageContext, ResourcePage};
use crate::widgets::{DetailPanel, FilterBar, FilterOption, MenuPanel, ModalPanel, Related, StatusIndicator};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};
use scholar_client::resources::Resource;
use scholar_client::{render_decision, ListRender, ListRow, ModalMode, ModalPhase};

pub fn render<R: Resource>(f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>, page: &mut ResourcePage<R>) {
    let theme = ctx.theme;
    let body = if R::filters().is_empty() {
        area
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        render_filters(f, chunks[0], ctx, page);
        chunks[1]
    };

    let (list_area, detail_area) = if page.detail.is_some() {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(body);
        (chunks[0], Some(chunks[1]))
    } else {
        (body, None)
    };

    let state = page.controller.read();
    let title = match page.controller.filters().len() {
        0 => R::TITLE.to_string(),
        n => format!("{} ({} filter{})", R::TITLE, n, if n == 1 { "" } else { "s" }),
    };

    match render_decision(&state, R::EMPTY_MESSAGE) {
        ListRender::Loading => StatusIndicator {
            title: &title,
            status: "Loading...".to_string(),
            style: Style::default().fg(theme.text_dim),
        }
        .render(f, list_area),
        ListRender::Failed { message, retryable } => {
            let status = if retryable {
                format!("{}\n\nPress r to retry.", message)
            } else {
                message
            };
            StatusIndicator {
                title: &title,
                status,
                style: Style::default().fg(theme.error),
            }
            .render(f, list_area);
        }
        ListRender::Empty { message } => StatusIndicator {
            title: &title,
            status: message.to_string(),
            style: Style::default().fg(theme.text_dim),
        }
        .render(f, list_area),
        ListRender::Items(items) => {
            page.selected = page.selected.min(items.len().saturating_sub(1));
            render_table::<R>(f, list_area, ctx, &title, items, page.selected);

            if let (Some(area), Some(id)) = (detail_area, page.detail.as_ref()) {
                if let Some(item) = items.iter().find(|item| &R::id(item) == id) {
                    let fields = R::Item::columns()
                        .iter()
                        .map(|column| column.title)
                        .zip(item.cells())
                        .collect();
                    DetailPanel {
                        title: "Details",
                        fields,
                        related: page.section.as_ref().map(|section| Related {
                            title: section.title,
                            lines: section.lines(id),
                        }),
                        style: Style::default().fg(theme.secondary),
                    }
                    .render(f, area);
                }
            }
        }
    }

    if page.modal.is_open() {
        let heading = match page.modal.mode() {
            ModalMode::Create => format!("New {}", R::LABEL),
            ModalMode::Edit(_) => format!("Edit {}", R::LABEL),
        };
        let fields = page.inputs.lines();
        let error = page.input_error.as_deref().or(page.modal.error());
        ModalPanel {
            title: &heading,
            message: None,
            fields: &fields,
            error,
            busy: (page.modal.phase() == ModalPhase::Submitting).then_some("Saving..."),
            hint: "Tab next field • Enter save • Esc cancel",
        }
        .render(f, area, theme);
    }

    if let Some(highlighted) = page.tool_menu {
        let entries: Vec<&str> = page.tools.iter().map(|tool| tool.label).collect();
        MenuPanel {
            title: "Tools",
            entries: &entries,
            highlighted,
            hint: "j/k choose • Enter open • Esc close",
        }
        .render(f, area, theme);
    }

    if let Some(prompt) = page.tool_prompt.as_ref() {
        let title = page
            .tools
            .get(prompt.index)
            .map(|tool| tool.label)
            .unwrap_or("Tool");
        let fields = prompt.inputs.lines();
        ModalPanel {
            title,
            message: None,
            fields: &fields,
            error: None,
            busy: None,
            hint: "Tab next field • Enter run • Esc cancel",
        }
        .render(f, area, theme);
    }

    if let Some(prompt) = page.confirm.prompt() {
        ModalPanel {
            title: "Confirm",
            message: Some(prompt.as_str()),
            fields: &[],
            error: None,
            busy: None,
            hint: "Enter/y delete • Esc keep",
        }
        .render(f, area, theme);
    }
}

fn render_table<R: Resource>(
    f: &mut Frame<'_>,
    area: Rect,
    ctx: &PageContext<'_>,
    title: &str,
    items: &[R::Item],
    selected: usize,
) {
    let theme = ctx.theme;
    let columns = R::Item::columns();
    let score_column = R::Item::score_column();

    let header = Row::new(columns.iter().map(|column| Cell::from(column.title)))
        .style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            let score = item.score();
            let cells = item.cells().into_iter().enumerate().map(|(idx, text)| {
                let cell = Cell::from(text);
                match (score_column, score) {
                    (Some(col), Some(value)) if col == idx => {
                        let tone = ctx.bands.band(value).tone();
                        cell.style(Style::default().fg(theme.tone(tone)))
                    }
                    _ => cell,
                }
            });
            Row::new(cells.collect::<Vec<_>>())
        })
        .collect();

    let widths: Vec<Constraint> = columns
        .iter()
        .map(|column| Constraint::Percentage(column.width))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .highlight_style(Style::default().bg(theme.bg_highlight).fg(theme.text))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(selected));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_filters<R: Resource>(f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>, page: &ResourcePage<R>) {
    let theme = ctx.theme;
    let options: Vec<FilterOption> = R::filters()
        .iter()
        .enumerate()
        .map(|(idx, field)| match &page.filter_edit {
            Some(edit) => FilterOption {
                label: field.label.to_string(),
                value: edit
                    .value(field.name)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
                focused: edit.focus() == idx,
            },
            None => FilterOption {
                label: field.label.to_string(),
                value: page.controller.filters().get(field.name).map(str::to_string),
                focused: false,
            },
        })
        .collect();

    let note = match (&page.filter_edit, &page.filter_note) {
        (Some(_), Some(note)) => note(),
        _ => None,
    };
    let title = match (page.filter_edit.is_some(), note) {
        (true, Some(note)) => format!("Filters (editing) · {note}"),
        (true, None) => "Filters (editing)".to_string(),
        (false, _) => "Filters (f edit, c clear)".to_string(),
    };
    FilterBar {
        title: &title,
        filters: &options,
        active_style: Style::default().fg(theme.success),
        inactive_style: Style::default().fg(theme.text_dim),
        focus_style: Style::default().fg(theme.bg).bg(theme.primary),
    }
    .render(f, area);
}
