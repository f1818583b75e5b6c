//! Generic list page: table, filters, create/edit modal and delete
//! confirmation for any [`Resource`].

use super::tools::{DetailSection, FilterNote, Tool, ToolPrompt};
use super::{Page, PageContext};
use crate::events::TuiEvent;
use crate::input::{InputOutcome, TextFields};
use crate::keys::{Action, TextKey};
use crate::nav::View;
use crate::notifications::NotificationLevel;
use crate::views;
use ratatui::{layout::Rect, Frame};
use scholar_client::resources::Resource;
use scholar_client::{
    ApiClient, ConfirmDialog, Draft, FormModal, ListRow, ModalMode, ModalPhase, QueryCache,
    QueryState, ResourceController, RowAction, RowActions,
};
use std::sync::mpsc as std_mpsc;
use tokio::sync::mpsc;

pub struct ResourcePage<R: Resource> {
    pub(crate) view: View,
    pub(crate) controller: ResourceController<R>,
    pub(crate) selected: usize,
    pub(crate) modal: FormModal<R::Draft>,
    pub(crate) inputs: TextFields,
    /// Field-level parse error from applying the buffers to the draft.
    pub(crate) input_error: Option<String>,
    pub(crate) confirm: ConfirmDialog<R::Id>,
    pub(crate) filter_edit: Option<TextFields>,
    pub(crate) detail: Option<R::Id>,
    pub(crate) tools: Vec<Tool<R::Id>>,
    /// Highlighted entry while the tool menu is open.
    pub(crate) tool_menu: Option<usize>,
    pub(crate) tool_prompt: Option<ToolPrompt<R::Id>>,
    pub(crate) section: Option<DetailSection<R::Id>>,
    pub(crate) filter_note: Option<FilterNote>,
    actions: RowActions<R::Id>,
    requests: std_mpsc::Receiver<(RowAction, R::Id)>,
    events: mpsc::Sender<TuiEvent>,
}

fn forward<Id>(tx: &std_mpsc::Sender<(RowAction, Id)>, action: RowAction) -> impl Fn(&Id) + Send + Sync + 'static
where
    Id: Clone + Send + 'static,
{
    let tx = tx.clone();
    move |id: &Id| {
        let _ = tx.send((action, id.clone()));
    }
}

impl<R: Resource> ResourcePage<R> {
    pub fn new(view: View, api: &ApiClient, cache: &QueryCache, events: &mpsc::Sender<TuiEvent>) -> Self {
        let (tx, requests) = std_mpsc::channel();
        let mut actions = RowActions::new()
            .on_view(forward(&tx, RowAction::View))
            .on_delete(forward(&tx, RowAction::Delete));
        if R::EDITABLE {
            actions = actions.on_edit(forward(&tx, RowAction::Edit));
        }
        if R::SECONDARY.is_some() {
            actions = actions.on_secondary(forward(&tx, RowAction::Secondary));
        }

        Self {
            view,
            controller: ResourceController::new(api.clone(), cache.clone()),
            selected: 0,
            modal: FormModal::new(),
            inputs: TextFields::new(),
            input_error: None,
            confirm: ConfirmDialog::default(),
            filter_edit: None,
            detail: None,
            tools: Vec::new(),
            tool_menu: None,
            tool_prompt: None,
            section: None,
            filter_note: None,
            actions,
            requests,
            events: events.clone(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<Tool<R::Id>>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_section(mut self, section: DetailSection<R::Id>) -> Self {
        self.section = Some(section);
        self
    }

    pub fn with_filter_note(mut self, note: FilterNote) -> Self {
        self.filter_note = Some(note);
        self
    }

    /// Last known rows for the current key, without triggering a fetch.
    pub(crate) fn items(&self) -> Vec<R::Item> {
        let state: QueryState<Vec<R::Item>> = self.controller.cache().peek(&self.controller.query_key());
        state.last_data().cloned().unwrap_or_default()
    }

    fn find(&self, id: &R::Id) -> Option<R::Item> {
        self.items().into_iter().find(|item| &R::id(item) == id)
    }

    fn request(&mut self, action: RowAction) {
        let Some(item) = self.items().into_iter().nth(self.selected) else {
            return;
        };
        if !self.actions.dispatch(action, &R::id(&item)) {
            tracing::debug!(resource = R::NAME, ?action, "row action not offered");
        }
    }

    fn drain_requests(&mut self) {
        while let Ok((action, id)) = self.requests.try_recv() {
            match action {
                RowAction::View => {
                    self.detail = if self.detail.as_ref() == Some(&id) { None } else { Some(id) };
                }
                RowAction::Edit => {
                    if let Some(item) = self.find(&id) {
                        self.modal.open_edit(id, &item);
                        self.load_inputs();
                    }
                }
                RowAction::Delete => {
                    if let Some(item) = self.find(&id) {
                        self.confirm.request(id, item.title());
                    }
                }
                RowAction::Secondary => self.spawn_secondary(id),
            }
        }
    }

    fn open_create(&mut self) {
        self.modal.open_create();
        self.load_inputs();
    }

    fn load_inputs(&mut self) {
        self.inputs = TextFields::from_form(self.modal.draft().fields());
        self.input_error = None;
    }

    fn open_filters(&mut self) {
        let filters = R::filters();
        if filters.is_empty() {
            return;
        }
        let current = self.controller.filters();
        let edit = filters.iter().fold(TextFields::new(), |edit, field| {
            edit.with_field(field.name, field.label, current.get(field.name).unwrap_or_default())
        });
        self.filter_edit = Some(edit);
    }

    fn submit(&mut self) {
        for (name, value) in self.inputs.values() {
            if let Err(err) = self.modal.set_field(name, value) {
                self.input_error = Some(err.to_string());
                return;
            }
        }
        self.input_error = None;

        let submission = match self.modal.begin_submit() {
            Ok(submission) => submission,
            // Validation errors are already shown inline by the modal.
            Err(err) => {
                tracing::debug!(resource = R::NAME, error = %err, "submit blocked");
                return;
            }
        };

        let create = self.controller.create().clone();
        let update = self.controller.update().clone();
        let events = self.events.clone();
        let view = self.view;
        tokio::spawn(async move {
            let result = match submission.mode {
                ModalMode::Create => create.execute(submission.input).await.map(|_| ()),
                ModalMode::Edit(id) => update.execute((id, submission.input)).await.map(|_| ()),
            };
            let _ = events
                .send(TuiEvent::Submitted {
                    view,
                    epoch: submission.epoch,
                    result: result.map_err(|err| err.to_string()),
                })
                .await;
        });
    }

    fn spawn_delete(&mut self, id: R::Id) {
        if self.detail.as_ref() == Some(&id) {
            self.detail = None;
        }
        let delete = self.controller.delete().clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match delete.execute(id).await {
                Ok(()) => TuiEvent::Notify(NotificationLevel::Success, format!("Deleted {}", R::LABEL)),
                Err(err) => TuiEvent::Notify(NotificationLevel::Error, err.to_string()),
            };
            let _ = events.send(event).await;
        });
    }

    fn spawn_secondary(&mut self, id: R::Id) {
        let Some(label) = R::SECONDARY else {
            return;
        };
        let secondary = self.controller.secondary().clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match secondary.execute(id).await {
                Ok(()) => TuiEvent::Notify(NotificationLevel::Success, format!("{} {}: done", label, R::LABEL)),
                Err(err) => TuiEvent::Notify(NotificationLevel::Error, err.to_string()),
            };
            let _ = events.send(event).await;
        });
    }

    fn selected_id(&self) -> Option<R::Id> {
        self.items().get(self.selected).map(R::id)
    }

    fn handle_tool_menu(&mut self, action: Action) {
        let Some(highlight) = self.tool_menu else {
            return;
        };
        match action {
            Action::MoveUp => self.tool_menu = Some(highlight.saturating_sub(1)),
            Action::MoveDown => {
                self.tool_menu = Some((highlight + 1).min(self.tools.len().saturating_sub(1)));
            }
            Action::Confirm => {
                self.tool_menu = None;
                self.open_tool(highlight);
            }
            Action::Cancel | Action::OpenTools => self.tool_menu = None,
            _ => {}
        }
    }

    fn open_tool(&mut self, index: usize) {
        let Some(tool) = self.tools.get(index) else {
            return;
        };
        let target = self.selected_id();
        if tool.needs_row && target.is_none() {
            self.notify(NotificationLevel::Warning, format!("Select a {} first", R::LABEL));
            return;
        }
        self.tool_prompt = Some(ToolPrompt {
            index,
            target: if tool.needs_row { target } else { None },
            inputs: tool.prompt(),
        });
    }

    fn run_tool(&mut self, prompt: ToolPrompt<R::Id>) {
        let Some(tool) = self.tools.get(prompt.index) else {
            return;
        };
        let label = tool.label;
        let task = tool.run(prompt.target.clone(), prompt.values());
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match task.await {
                Ok(message) => TuiEvent::Notify(NotificationLevel::Success, message),
                Err(message) => {
                    tracing::info!(tool = label, error = %message, "tool failed");
                    TuiEvent::Notify(NotificationLevel::Error, message)
                }
            };
            let _ = events.send(event).await;
        });
    }

    fn notify(&self, level: NotificationLevel, message: String) {
        if self.events.try_send(TuiEvent::Notify(level, message)).is_err() {
            tracing::warn!(resource = R::NAME, "event queue full, notification dropped");
        }
    }
}

impl<R: Resource> Page for ResourcePage<R> {
    fn view(&self) -> View {
        self.view
    }

    fn render(&mut self, f: &mut Frame<'_>, area: Rect, ctx: &PageContext<'_>) {
        views::resource::render(f, area, ctx, self);
    }

    fn handle(&mut self, action: Action) {
        if self.tool_menu.is_some() {
            self.handle_tool_menu(action);
            return;
        }
        if self.confirm.is_open() {
            match action {
                Action::Confirm => {
                    if let Some(id) = self.confirm.confirm() {
                        self.spawn_delete(id);
                    }
                }
                Action::Cancel => self.confirm.cancel(),
                _ => {}
            }
            return;
        }

        match action {
            Action::MoveUp => self.selected = self.selected.saturating_sub(1),
            Action::MoveDown => {
                if self.selected + 1 < self.items().len() {
                    self.selected += 1;
                }
            }
            Action::NewItem => self.open_create(),
            Action::EditItem => self.request(RowAction::Edit),
            Action::DeleteItem => self.request(RowAction::Delete),
            Action::Secondary => self.request(RowAction::Secondary),
            Action::OpenTools => {
                if !self.tools.is_empty() {
                    self.tool_menu = Some(0);
                }
            }
            Action::Confirm => self.request(RowAction::View),
            Action::Cancel => self.detail = None,
            Action::EditFilters => self.open_filters(),
            Action::ClearFilters => {
                if self.controller.clear_filters() {
                    self.selected = 0;
                }
            }
            Action::Refresh => self.refetch(),
            _ => {}
        }
        self.drain_requests();
    }

    fn captures_text(&self) -> bool {
        self.modal.is_open() || self.filter_edit.is_some() || self.tool_prompt.is_some()
    }

    fn handle_text(&mut self, key: TextKey) {
        if let Some(prompt) = self.tool_prompt.as_mut() {
            match prompt.inputs.apply(key) {
                InputOutcome::Editing => {}
                InputOutcome::Cancel => self.tool_prompt = None,
                InputOutcome::Submit => {
                    if let Some(prompt) = self.tool_prompt.take() {
                        self.run_tool(prompt);
                    }
                }
            }
            return;
        }

        if let Some(edit) = self.filter_edit.as_mut() {
            match edit.apply(key) {
                InputOutcome::Editing => {}
                InputOutcome::Cancel => self.filter_edit = None,
                InputOutcome::Submit => {
                    let mut changed = false;
                    if let Some(edit) = self.filter_edit.take() {
                        for (name, value) in edit.values() {
                            changed |= self.controller.set_filter(name, value.trim());
                        }
                    }
                    if changed {
                        self.selected = 0;
                        self.detail = None;
                    }
                }
            }
            return;
        }

        if self.modal.phase() == ModalPhase::Submitting {
            if key == TextKey::Cancel {
                self.modal.cancel();
            }
            return;
        }
        if !self.modal.is_open() {
            return;
        }
        match self.inputs.apply(key) {
            InputOutcome::Editing => self.input_error = None,
            InputOutcome::Cancel => self.modal.cancel(),
            InputOutcome::Submit => self.submit(),
        }
    }

    fn on_submitted(&mut self, epoch: u64, result: Result<(), String>) {
        let saved = result.is_ok();
        let was_edit = matches!(self.modal.mode(), ModalMode::Edit(_));
        if self.modal.finish_submit(epoch, result) && saved {
            let verb = if was_edit { "Updated" } else { "Created" };
            self.notify(NotificationLevel::Success, format!("{} {}", verb, R::LABEL));
        }
    }

    fn refetch(&mut self) {
        self.controller.refetch();
    }

    fn hint(&self) -> &'static str {
        if self.tool_menu.is_some() {
            "j/k choose • Enter open • Esc close"
        } else if self.tool_prompt.is_some() {
            "Tab next field • Enter run • Esc cancel"
        } else if self.confirm.is_open() {
            "Enter/y confirm • Esc cancel"
        } else if self.filter_edit.is_some() {
            "Tab next filter • Enter apply • Esc cancel"
        } else if self.modal.is_open() {
            "Tab next field • Enter save • Esc cancel"
        } else if !self.tools.is_empty() {
            "j/k move • Enter details • n new • e edit • d delete • t tools • f filter • r refresh • q quit"
        } else if R::SECONDARY.is_some() {
            "j/k move • Enter details • n new • e edit • d delete • a action • f filter • r refresh • q quit"
        } else {
            "j/k move • Enter details • n new • e edit • d delete • f filter • r refresh • q quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::tools;
    use scholar_client::resources::{Classes, Topics};
    use scholar_client::{ClientConfig, SessionService};

    fn api() -> ApiClient {
        let config = ClientConfig {
            api_base_url: "http://127.0.0.1:1/api".to_string(),
            request_timeout_ms: 1_000,
            upload_timeout_ms: 1_000,
            session_path: "session.json".into(),
        };
        ApiClient::new(&config, SessionService::in_memory()).unwrap()
    }

    #[tokio::test]
    async fn row_tools_need_a_selected_row() {
        let api = api();
        let cache = QueryCache::new();
        let (tx, mut rx) = mpsc::channel(8);
        let mut page = ResourcePage::<Classes>::new(View::Classes, &api, &cache, &tx)
            .with_tools(tools::class_tools(&api, &cache));

        page.handle(Action::OpenTools);
        assert_eq!(page.tool_menu, Some(0));
        page.handle(Action::MoveDown);
        page.handle(Action::MoveDown);
        assert_eq!(page.tool_menu, Some(2));

        page.handle(Action::Confirm);
        assert!(page.tool_menu.is_none());
        assert!(page.tool_prompt.is_none());
        assert!(matches!(
            rx.try_recv(),
            Ok(TuiEvent::Notify(NotificationLevel::Warning, ref message)) if message == "Select a class first"
        ));
    }

    #[tokio::test]
    async fn list_tools_open_a_prompt_that_owns_the_keyboard() {
        let api = api();
        let cache = QueryCache::new();
        let (tx, _rx) = mpsc::channel(8);
        let mut page = ResourcePage::<Topics>::new(View::Topics, &api, &cache, &tx)
            .with_tools(tools::topic_tools(&api, &cache));

        page.handle(Action::OpenTools);
        page.handle(Action::Confirm);
        assert!(page.captures_text());
        let prompt = page.tool_prompt.as_ref().unwrap();
        assert_eq!(prompt.target, None);
        assert_eq!(prompt.inputs.value("path"), Some(""));

        page.handle_text(TextKey::Char('x'));
        assert_eq!(page.tool_prompt.as_ref().unwrap().inputs.value("path"), Some("x"));
        page.handle_text(TextKey::Cancel);
        assert!(!page.captures_text());
    }

    #[tokio::test]
    async fn pages_without_tools_ignore_the_tools_key() {
        let api = api();
        let cache = QueryCache::new();
        let (tx, _rx) = mpsc::channel(8);
        let mut page = ResourcePage::<Classes>::new(View::Classes, &api, &cache, &tx);
        page.handle(Action::OpenTools);
        assert!(page.tool_menu.is_none());
    }
}
