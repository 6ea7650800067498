// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use cubby_app::{
    AppCommand, AppEvent, AppState, CategoryDraft, DetailNavigator, DraftError, FormTarget,
    ImagePick, Item, ItemDraft, ItemId, ListQuery, Screen, SortKey,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const IMAGE_MARK: &str = "▣";
const FIELD_CURSOR: &str = "▌";

/// Everything the screens need from the outside world. The CLI backs this
/// with the sqlite store and a filesystem image picker; tests use an
/// in-memory fake.
pub trait AppRuntime {
    fn load_items(&mut self) -> Result<Vec<Item>>;
    fn load_categories(&mut self) -> Result<Vec<String>>;
    fn create_item(&mut self, draft: &ItemDraft) -> Result<ItemId>;
    /// `Ok(false)` when the item disappeared before the save landed.
    fn update_item(&mut self, id: &ItemId, draft: &ItemDraft) -> Result<bool>;
    fn delete_item(&mut self, id: &ItemId) -> Result<bool>;
    fn add_category(&mut self, draft: &CategoryDraft) -> Result<()>;
    fn pick_image(&mut self, request: &str) -> Result<ImagePick>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    Quantity,
    Category,
    Image,
}

impl FormField {
    const ALL: [Self; 4] = [Self::Name, Self::Quantity, Self::Category, Self::Image];

    const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Quantity => "Quantity",
            Self::Category => "Category",
            Self::Image => "Image",
        }
    }

    fn step(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let index = Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0) as isize;
        Self::ALL[(index + delta).rem_euclid(len) as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemFormUiState {
    target: FormTarget,
    draft: ItemDraft,
    image_request: String,
    image_dirty: bool,
    field: FormField,
}

impl ItemFormUiState {
    fn new(target: FormTarget, items: &[Item]) -> Self {
        let draft = match &target {
            FormTarget::Create => ItemDraft::default(),
            FormTarget::Edit(id) => items
                .iter()
                .find(|item| item.id == *id)
                .map(ItemDraft::from_item)
                .unwrap_or_default(),
        };
        let image_request = draft.image.clone().unwrap_or_default();
        Self {
            target,
            draft,
            image_request,
            image_dirty: false,
            field: FormField::Name,
        }
    }

    fn active_text_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.draft.name,
            FormField::Quantity => &mut self.draft.quantity,
            FormField::Category => &mut self.draft.category,
            FormField::Image => {
                self.image_dirty = true;
                &mut self.image_request
            }
        }
    }

    fn submit_label(&self) -> &'static str {
        match self.target {
            FormTarget::Create => "Add Item",
            FormTarget::Edit(_) => "Save Changes",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CategoryFormUiState {
    draft: CategoryDraft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Dialog {
    Alert { title: String, message: String },
    ConfirmDelete { id: ItemId, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    items: Vec<Item>,
    categories: Vec<String>,
    query: ListQuery,
    search_focused: bool,
    selected_row: usize,
    form: Option<ItemFormUiState>,
    category_form: Option<CategoryFormUiState>,
    dialog: Option<Dialog>,
    status_token: u64,
}

/// Run the terminal UI until the user quits. `query` seeds the list's
/// initial sort.
pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    query: ListQuery,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        query,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(runtime, &mut view_data) {
        tracing::warn!("initial load failed: {error:#}");
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error:#}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn show_alert(view_data: &mut ViewData, title: &str, message: impl Into<String>) {
    view_data.dialog = Some(Dialog::Alert {
        title: title.to_owned(),
        message: message.into(),
    });
}

fn refresh_view_data<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    view_data.items = runtime.load_items().context("load items")?;
    view_data.categories = runtime.load_categories().context("load categories")?;
    clamp_selected_row(view_data);
    Ok(())
}

fn should_refresh_view(events: &[AppEvent]) -> bool {
    events
        .iter()
        .any(|event| matches!(event, AppEvent::ScreenChanged(_) | AppEvent::ItemsChanged))
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    if should_refresh_view(&events)
        && let Err(error) = refresh_view_data(runtime, view_data)
    {
        tracing::warn!("reload failed: {error:#}");
        emit_status(state, view_data, internal_tx, format!("load failed: {error:#}"));
    }
    sync_form_ui_state(state, view_data);
}

/// Build or drop per-form editing state so it follows the active screen.
fn sync_form_ui_state(state: &AppState, view_data: &mut ViewData) {
    match &state.screen {
        Screen::ItemForm(target) => {
            let stale = view_data
                .form
                .as_ref()
                .is_none_or(|form| form.target != *target);
            if stale {
                view_data.form = Some(ItemFormUiState::new(target.clone(), &view_data.items));
            }
            view_data.category_form = None;
        }
        Screen::CategoryForm => {
            if view_data.category_form.is_none() {
                view_data.category_form = Some(CategoryFormUiState::default());
            }
        }
        Screen::List | Screen::Detail(_) => {
            view_data.form = None;
            view_data.category_form = None;
        }
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.dialog.is_some() {
        handle_dialog_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match state.screen.clone() {
        Screen::List => handle_list_key(state, runtime, view_data, internal_tx, key),
        Screen::Detail(id) => handle_detail_key(state, runtime, view_data, internal_tx, id, key),
        Screen::ItemForm(_) => handle_item_form_key(state, runtime, view_data, internal_tx, key),
        Screen::CategoryForm => {
            handle_category_form_key(state, runtime, view_data, internal_tx, key);
        }
    }
    false
}

fn handle_dialog_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(dialog) = view_data.dialog.clone() else {
        return;
    };
    match dialog {
        Dialog::Alert { .. } => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                view_data.dialog = None;
            }
        }
        Dialog::ConfirmDelete { id, name } => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                view_data.dialog = None;
                delete_item(state, runtime, view_data, internal_tx, &id, &name);
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                view_data.dialog = None;
            }
            _ => {}
        },
    }
}

fn delete_item<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    id: &ItemId,
    name: &str,
) {
    match runtime.delete_item(id) {
        Ok(removed) => {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::ItemDeleted(id.clone()),
            );
            let message = if removed {
                format!("removed {name}")
            } else {
                "item no longer exists".to_owned()
            };
            emit_status(state, view_data, internal_tx, message);
        }
        Err(error) => {
            tracing::warn!(%id, "delete failed: {error:#}");
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("delete failed: {error:#}"),
            );
        }
    }
}

fn confirm_delete(view_data: &mut ViewData, item: &Item) {
    view_data.dialog = Some(Dialog::ConfirmDelete {
        id: item.id.clone(),
        name: item.name.clone(),
    });
}

fn handle_list_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.search_focused {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => view_data.search_focused = false,
            KeyCode::Backspace => {
                view_data.query.search.pop();
                view_data.selected_row = 0;
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                view_data.query.search.push(ch);
                view_data.selected_row = 0;
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('/') => view_data.search_focused = true,
        KeyCode::Char('j') | KeyCode::Down => move_selected_row(view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_selected_row(view_data, -1),
        KeyCode::Char('n') => press_sort(state, view_data, internal_tx, SortKey::Name),
        KeyCode::Char('q') => press_sort(state, view_data, internal_tx, SortKey::Quantity),
        KeyCode::Char('x') => {
            view_data.query.clear_sort();
            emit_status(state, view_data, internal_tx, "sort cleared");
        }
        KeyCode::Char('r') => match refresh_view_data(runtime, view_data) {
            Ok(()) => emit_status(state, view_data, internal_tx, "reloaded"),
            Err(error) => {
                tracing::warn!("reload failed: {error:#}");
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("load failed: {error:#}"),
                );
            }
        },
        KeyCode::Enter => {
            if let Some(id) = selected_item(view_data).map(|item| item.id.clone()) {
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::OpenDetail(id),
                );
            }
        }
        KeyCode::Char('a') => dispatch_and_refresh(
            state,
            runtime,
            view_data,
            internal_tx,
            AppCommand::OpenCreateForm,
        ),
        KeyCode::Char('e') => {
            if let Some(id) = selected_item(view_data).map(|item| item.id.clone()) {
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::OpenEditForm(id),
                );
            }
        }
        KeyCode::Char('d') => {
            if let Some(item) = selected_item(view_data).cloned() {
                confirm_delete(view_data, &item);
            }
        }
        KeyCode::Char('c') => dispatch_and_refresh(
            state,
            runtime,
            view_data,
            internal_tx,
            AppCommand::OpenCategoryForm,
        ),
        _ => {}
    }
}

fn press_sort(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: SortKey,
) {
    let direction = view_data.query.press_sort(key);
    view_data.selected_row = 0;
    emit_status(
        state,
        view_data,
        internal_tx,
        format!("sort {} {}", key.as_str(), direction.as_str()),
    );
}

fn selected_item(view_data: &ViewData) -> Option<&Item> {
    view_data
        .query
        .project(&view_data.items)
        .get(view_data.selected_row)
}

fn move_selected_row(view_data: &mut ViewData, delta: isize) {
    let len = view_data.query.project(&view_data.items).len();
    if len == 0 {
        view_data.selected_row = 0;
        return;
    }
    let next = (view_data.selected_row as isize + delta).clamp(0, len as isize - 1);
    view_data.selected_row = next as usize;
}

fn clamp_selected_row(view_data: &mut ViewData) {
    let len = view_data.query.project(&view_data.items).len();
    view_data.selected_row = view_data.selected_row.min(len.saturating_sub(1));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailStep {
    First,
    Previous,
    Next,
    Last,
}

fn detail_step_for_key(key: KeyEvent) -> Option<DetailStep> {
    match key.code {
        KeyCode::Char('g') | KeyCode::Home => Some(DetailStep::First),
        KeyCode::Char('h') | KeyCode::Left => Some(DetailStep::Previous),
        KeyCode::Char('l') | KeyCode::Right => Some(DetailStep::Next),
        KeyCode::Char('G') | KeyCode::End => Some(DetailStep::Last),
        _ => None,
    }
}

fn step_detail(items: &[Item], focused: &ItemId, step: DetailStep) -> Option<ItemId> {
    let mut navigator = DetailNavigator::new(items, focused.clone());
    let target = match step {
        DetailStep::First => navigator.first(),
        DetailStep::Previous => navigator.previous(),
        DetailStep::Next => navigator.next(),
        DetailStep::Last => navigator.last(),
    };
    target.map(|item| item.id.clone())
}

fn handle_detail_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    id: ItemId,
    key: KeyEvent,
) {
    if let Some(step) = detail_step_for_key(key) {
        if let Some(target) = step_detail(&view_data.items, &id, step)
            && target != id
        {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::FocusDetail(target),
            );
        }
        return;
    }

    match key.code {
        KeyCode::Char('e') => dispatch_and_refresh(
            state,
            runtime,
            view_data,
            internal_tx,
            AppCommand::OpenEditForm(id),
        ),
        KeyCode::Char('d') => {
            let focused = view_data.items.iter().find(|item| item.id == id).cloned();
            match focused {
                Some(item) => confirm_delete(view_data, &item),
                None => emit_status(state, view_data, internal_tx, "item no longer exists"),
            }
        }
        KeyCode::Esc | KeyCode::Backspace => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::Back);
        }
        _ => {}
    }
}

fn handle_item_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let categories = &view_data.categories;
    let Some(form) = view_data.form.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::Back);
        }
        KeyCode::Tab | KeyCode::Down => form.field = form.field.step(1),
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.step(-1),
        KeyCode::Left | KeyCode::Right if form.field == FormField::Category => {
            let delta = if key.code == KeyCode::Right { 1 } else { -1 };
            if !cycle_category(&mut form.draft, categories, delta) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    "no categories yet; type one or add one from the list with c",
                );
            }
        }
        KeyCode::Enter if form.field == FormField::Image => {
            if let Err(error) = apply_image_request(runtime, view_data) {
                tracing::warn!("image pick failed: {error:#}");
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("image pick failed: {error:#}"),
                );
            }
        }
        KeyCode::Enter => submit_item_form(state, runtime, view_data, internal_tx),
        KeyCode::Backspace => {
            form.active_text_mut().pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.active_text_mut().push(ch);
        }
        _ => {}
    }
}

/// Step the draft's category through the registry, wrapping at both ends.
/// Free text not in the registry starts from the first or last entry.
fn cycle_category(draft: &mut ItemDraft, categories: &[String], delta: isize) -> bool {
    if categories.is_empty() {
        return false;
    }
    let len = categories.len() as isize;
    let next = match categories.iter().position(|name| *name == draft.category) {
        Some(index) => (index as isize + delta).rem_euclid(len),
        None if delta > 0 => 0,
        None => len - 1,
    };
    draft.category = categories[next as usize].clone();
    true
}

/// Hand the typed image reference to the picker. An empty request clears the
/// image; a denial raises the alert and leaves the previous image in place.
fn apply_image_request<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let Some(form) = view_data.form.as_mut() else {
        return Ok(());
    };
    form.image_dirty = false;

    let request = form.image_request.trim().to_owned();
    if request.is_empty() {
        form.draft.image = None;
        return Ok(());
    }

    let pick = runtime.pick_image(&request)?;
    match form.draft.apply_image_pick(pick) {
        Some(alert) => {
            form.image_request = form.draft.image.clone().unwrap_or_default();
            show_alert(view_data, "Permission denied", alert);
        }
        None => form.image_request = form.draft.image.clone().unwrap_or_default(),
    }
    Ok(())
}

fn submit_item_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if view_data.form.as_ref().is_some_and(|form| form.image_dirty) {
        if let Err(error) = apply_image_request(runtime, view_data) {
            tracing::warn!("image pick failed: {error:#}");
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("image pick failed: {error:#}"),
            );
            return;
        }
        if view_data.dialog.is_some() {
            return;
        }
    }

    let Some(form) = view_data.form.clone() else {
        return;
    };
    if let Err(error) = form.draft.validate() {
        show_alert(view_data, "Error", error.to_string());
        return;
    }

    let result = match &form.target {
        FormTarget::Create => runtime.create_item(&form.draft).map(|_| true),
        FormTarget::Edit(id) => runtime.update_item(id, &form.draft),
    };
    match result {
        Ok(saved) => {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::FormSubmitted,
            );
            let message = if saved {
                format!("saved {}", form.draft.name)
            } else {
                "item no longer exists; nothing saved".to_owned()
            };
            emit_status(state, view_data, internal_tx, message);
        }
        Err(error) if error.downcast_ref::<DraftError>().is_some() => {
            show_alert(view_data, "Error", error.to_string());
        }
        Err(error) => {
            tracing::warn!("save failed: {error:#}");
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("save failed: {error:#}"),
            );
        }
    }
}

fn handle_category_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(form) = view_data.category_form.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::Back);
        }
        KeyCode::Enter => {
            let draft = form.draft.clone();
            if let Err(error) = draft.validate() {
                show_alert(view_data, "Error", error.to_string());
                return;
            }
            match runtime.add_category(&draft) {
                Ok(()) => {
                    dispatch_and_refresh(
                        state,
                        runtime,
                        view_data,
                        internal_tx,
                        AppCommand::FormSubmitted,
                    );
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("category added: {}", draft.name),
                    );
                }
                Err(error) => {
                    tracing::warn!("add category failed: {error:#}");
                    emit_status(
                        state,
                        view_data,
                        internal_tx,
                        format!("add category failed: {error:#}"),
                    );
                }
            }
        }
        KeyCode::Backspace => {
            form.draft.name.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.draft.name.push(ch);
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state, view_data))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().title("cubby").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    match &state.screen {
        Screen::List => render_list(frame, layout[1], view_data),
        Screen::Detail(id) => {
            let body = Paragraph::new(render_detail_text(&view_data.items, id))
                .block(Block::default().borders(Borders::ALL).title("detail"));
            frame.render_widget(body, layout[1]);
        }
        Screen::ItemForm(_) => {
            let text = view_data
                .form
                .as_ref()
                .map(|form| render_item_form_text(form, &view_data.categories))
                .unwrap_or_default();
            let body =
                Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("item"));
            frame.render_widget(body, layout[1]);
        }
        Screen::CategoryForm => {
            let text = view_data
                .category_form
                .as_ref()
                .map(render_category_form_text)
                .unwrap_or_default();
            let body = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title("category"));
            frame.render_widget(body, layout[1]);
        }
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(dialog) = &view_data.dialog {
        let area = centered_rect(60, 30, frame.area());
        let (title, text) = render_dialog_text(dialog);
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(text)
            .style(Style::default().fg(Color::White))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(overlay, area);
    }
}

fn render_list(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let search_style = if view_data.search_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_text(view_data))
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title("search"));
    frame.render_widget(search, sections[0]);

    let projection = view_data.query.project(&view_data.items);
    let header = Row::new(["Name", "Category", "Qty", ""].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = projection.iter().enumerate().map(|(row_index, item)| {
        let style = if row_index == view_data.selected_row {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(list_row_cells(item)).style(style)
    });
    let widths = [
        Constraint::Min(16),
        Constraint::Min(10),
        Constraint::Length(8),
        Constraint::Length(2),
    ];
    let title = format!("{} items", projection.len());
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, sections[1]);
}

fn list_row_cells(item: &Item) -> [String; 4] {
    [
        item.name.clone(),
        item.category.clone(),
        item.quantity_label(),
        if item.image.is_some() {
            IMAGE_MARK.to_owned()
        } else {
            String::new()
        },
    ]
}

fn header_text(state: &AppState, view_data: &ViewData) -> String {
    let title = state.screen.title();
    match (&state.screen, view_data.query.sort) {
        (Screen::List, Some(key)) => format!(
            "{title} | sort: {} {}",
            key.as_str(),
            view_data.query.direction.as_str()
        ),
        (Screen::List, None) => format!("{title} | sort: none"),
        _ => title.to_owned(),
    }
}

fn search_text(view_data: &ViewData) -> String {
    if view_data.search_focused {
        return format!("{}{FIELD_CURSOR}", view_data.query.search);
    }
    if view_data.query.search.is_empty() {
        return "Search Item(s)".to_owned();
    }
    view_data.query.search.clone()
}

fn render_detail_text(items: &[Item], id: &ItemId) -> String {
    let navigator = DetailNavigator::new(items, id.clone());
    let (Some(item), Some((index, total))) = (navigator.current(), navigator.position()) else {
        return "This item is no longer in your inventory.".to_owned();
    };

    let image = item.image.as_deref().unwrap_or("(no image)");
    format!(
        "image: {image}\n\n{}\n\nCategory: {}\nQuantity: {}\n\n{} of {total}",
        item.name,
        item.category,
        item.quantity_label(),
        index + 1,
    )
}

fn render_item_form_text(form: &ItemFormUiState, categories: &[String]) -> String {
    let mut lines = Vec::with_capacity(FormField::ALL.len() + 3);
    for field in FormField::ALL {
        let value = match field {
            FormField::Name => form.draft.name.as_str(),
            FormField::Quantity => form.draft.quantity.as_str(),
            FormField::Category => form.draft.category.as_str(),
            FormField::Image => form.image_request.as_str(),
        };
        let active = field == form.field;
        let marker = if active { ">" } else { " " };
        let cursor = if active { FIELD_CURSOR } else { "" };
        lines.push(format!("{marker} {:<9} {value}{cursor}", field.label()));
    }

    lines.push(String::new());
    if categories.is_empty() {
        lines.push("categories: (none)".to_owned());
    } else {
        lines.push(format!("categories: {}", categories.join(", ")));
    }
    lines.push(format!("[enter] {}", form.submit_label()));
    lines.join("\n")
}

fn render_category_form_text(form: &CategoryFormUiState) -> String {
    format!(
        "> Name      {}{FIELD_CURSOR}\n\n[enter] Add Category",
        form.draft.name
    )
}

fn render_dialog_text(dialog: &Dialog) -> (String, String) {
    match dialog {
        Dialog::Alert { title, message } => {
            (title.clone(), format!("{message}\n\n[enter] OK"))
        }
        Dialog::ConfirmDelete { name, .. } => (
            "Remove item".to_owned(),
            format!("Are you sure you want to remove {name}?\n\n[y] Remove  [n] Cancel"),
        ),
    }
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let hints = match &state.screen {
        Screen::List if view_data.search_focused => "type to search | enter/esc done",
        Screen::List => {
            "j/k move | / search | n/q sort x clear | enter open | a add e edit d del | c category | ctrl+q"
        }
        Screen::Detail(_) => "g/h/l/G first/prev/next/last | e edit | d del | esc back | ctrl+q",
        Screen::ItemForm(_) => {
            "tab/shift+tab field | left/right category | enter on image picks | enter submit | esc cancel"
        }
        Screen::CategoryForm => "enter add | esc cancel",
    };
    match &state.status_line {
        Some(status) => format!("{status} | {hints}"),
        None => hints.to_owned(),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
