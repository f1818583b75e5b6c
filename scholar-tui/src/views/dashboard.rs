//! Dashboard view.
//!
//! Each panel renders its own loading, error and empty states, so a slow or
//! failing metric never blanks the others.

use crate::page::PageContext;
use crate::widgets::{ScoreBar, StatusIndicator};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use scholar_client::resources::dashboard::{Dashboard, Metric};
use scholar_client::{format_date, QueryState, QueryStatus};

/// Data to draw, or the message to show in its place. Only a settled
/// success is drawn; a reload shows Loading even when older data exists.
fn panel<'a, T>(state: &'a QueryState<T>, is_empty: impl Fn(&T) -> bool) -> Result<&'a T, (String, bool)> {
    match (state.status, state.data()) {
        (QueryStatus::Idle | QueryStatus::Loading, _) => Err(("Loading...".to_string(), false)),
        (QueryStatus::Error, _) => {
            let message = state
                .error
                .as_ref()
                .map(|err| {
                    if err.retryable() {
                        format!("{} (r to retry)", err.message)
                    } else {
                        err.message.clone()
                    }
                })
                .unwrap_or_else(|| "Something went wrong".to_string());
            Err((message, true))
        }
        (QueryStatus::Success, Some(data)) if is_empty(data) => {
            Err(("Nothing to show yet".to_string(), false))
        }
        (QueryStatus::Success, Some(data)) => Ok(data),
        (QueryStatus::Success, None) => Err(("Nothing to show yet".to_string(), false)),
    }
}

fn placeholder(f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>, metric: Metric, message: String, failed: bool) {
    let color = if failed { ctx.theme.error } else { ctx.theme.text_dim };
    StatusIndicator {
        title: metric.title(),
        status: message,
        style: Style::default().fg(color),
    }
    .render(f, area);
}

pub fn render(f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>, dashboard: &Dashboard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    render_overview(f, rows[0], ctx, dashboard);
    render_performance(f, columns[0], ctx, dashboard);
    render_recent_activities(f, right[0], ctx, dashboard);
    render_interventions(f, right[1], ctx, dashboard);
}

fn render_overview(f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>, dashboard: &Dashboard) {
    let state = dashboard.overview();
    let overview = match panel(&state, |_| false) {
        Ok(overview) => overview,
        Err((message, failed)) => return placeholder(f, area, ctx, Metric::Overview, message, failed),
    };

    let tiles = [
        ("Students", overview.total_students),
        ("Classes", overview.total_classes),
        ("Teachers", overview.total_teachers),
        ("Pending activities", overview.pending_activities),
    ];
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);
    for ((label, value), chunk) in tiles.into_iter().zip(chunks.iter()) {
        StatusIndicator {
            title: label,
            status: value.to_string(),
            style: Style::default().fg(ctx.theme.text),
        }
        .render(f, *chunk);
    }
}

fn render_performance(f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>, dashboard: &Dashboard) {
    let state = dashboard.performance();
    let slices = match panel(&state, Vec::is_empty) {
        Ok(slices) => slices,
        Err((message, failed)) => return placeholder(f, area, ctx, Metric::Performance, message, failed),
    };

    let block = Block::default()
        .title(Metric::Performance.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ctx.theme.border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = (inner.height / 3) as usize;
    let constraints: Vec<Constraint> = slices
        .iter()
        .take(visible)
        .map(|_| Constraint::Length(3))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);
    for (slice, chunk) in slices.iter().zip(chunks.iter()) {
        ScoreBar {
            title: &slice.label,
            value: slice.average_score,
            thresholds: ctx.bands,
        }
        .render(f, *chunk, ctx.theme);
    }
}

fn render_recent_activities(f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>, dashboard: &Dashboard) {
    let state = dashboard.recent_activities();
    let activities = match panel(&state, Vec::is_empty) {
        Ok(activities) => activities,
        Err((message, failed)) => {
            return placeholder(f, area, ctx, Metric::RecentActivities, message, failed)
        }
    };
    let items: Vec<ListItem> = activities
        .iter()
        .map(|activity| {
            ListItem::new(format!(
                "{} [{} · {}] {}",
                activity.title,
                activity.kind,
                activity.status,
                format_date(activity.created_at)
            ))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(Metric::RecentActivities.title())
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

fn render_interventions(f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>, dashboard: &Dashboard) {
    let state = dashboard.interventions();
    let interventions = match panel(&state, Vec::is_empty) {
        Ok(interventions) => interventions,
        Err((message, failed)) => return placeholder(f, area, ctx, Metric::Interventions, message, failed),
    };
    let items: Vec<ListItem> = interventions
        .iter()
        .map(|intervention| {
            let student = intervention
                .student_name
                .clone()
                .unwrap_or_else(|| intervention.student_id.to_string());
            ListItem::new(format!(
                "{}: {} ({})",
                student, intervention.title, intervention.status
            ))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(Metric::Interventions.title())
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholar_client::{ErrorKind, QueryError};
    use std::sync::Arc;

    fn state(status: QueryStatus, data: Option<Vec<u8>>, error: Option<QueryError>) -> QueryState<Vec<u8>> {
        QueryState {
            status,
            data: data.map(Arc::new),
            error,
            fetched_at: None,
            stale: false,
        }
    }

    #[test]
    fn panel_states_are_independent_of_each_other() {
        let loading = state(QueryStatus::Loading, None, None);
        assert_eq!(panel(&loading, Vec::is_empty), Err(("Loading...".to_string(), false)));

        let refreshing = state(QueryStatus::Loading, Some(vec![1, 2]), None);
        assert_eq!(panel(&refreshing, Vec::is_empty), Err(("Loading...".to_string(), false)));

        let reloading_empty = state(QueryStatus::Loading, Some(vec![]), None);
        assert_eq!(
            panel(&reloading_empty, Vec::is_empty),
            Err(("Loading...".to_string(), false))
        );

        let loaded = state(QueryStatus::Success, Some(vec![1, 2]), None);
        assert_eq!(panel(&loaded, Vec::is_empty), Ok(&vec![1, 2]));

        let empty = state(QueryStatus::Success, Some(vec![]), None);
        assert_eq!(
            panel(&empty, Vec::is_empty),
            Err(("Nothing to show yet".to_string(), false))
        );

        let failed = state(
            QueryStatus::Error,
            Some(vec![1]),
            Some(QueryError::new(ErrorKind::Server, "Something went wrong on the server")),
        );
        assert_eq!(
            panel(&failed, Vec::is_empty),
            Err(("Something went wrong on the server (r to retry)".to_string(), true))
        );
    }
}
