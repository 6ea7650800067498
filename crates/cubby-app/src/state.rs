// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ItemId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit(ItemId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail(ItemId),
    ItemForm(FormTarget),
    CategoryForm,
}

impl Screen {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::List => "Inventory List",
            Self::Detail(_) => "Detail",
            Self::ItemForm(FormTarget::Create) => "Add Item",
            Self::ItemForm(FormTarget::Edit(_)) => "Edit Item",
            Self::CategoryForm => "Add Category",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub screen: Screen,
    pub back_stack: Vec<Screen>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::List,
            back_stack: Vec::new(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenDetail(ItemId),
    FocusDetail(ItemId),
    OpenCreateForm,
    OpenEditForm(ItemId),
    OpenCategoryForm,
    Back,
    FormSubmitted,
    ItemDeleted(ItemId),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ScreenChanged(Screen),
    ItemsChanged,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::OpenDetail(id) => self.push(Screen::Detail(id)),
            AppCommand::FocusDetail(id) => {
                // Stepping between items swaps the detail in place instead of stacking.
                self.screen = Screen::Detail(id);
                vec![AppEvent::ScreenChanged(self.screen.clone())]
            }
            AppCommand::OpenCreateForm => self.push(Screen::ItemForm(FormTarget::Create)),
            AppCommand::OpenEditForm(id) => self.push(Screen::ItemForm(FormTarget::Edit(id))),
            AppCommand::OpenCategoryForm => self.push(Screen::CategoryForm),
            AppCommand::Back => self.pop(),
            AppCommand::FormSubmitted => {
                let mut events = vec![AppEvent::ItemsChanged];
                events.extend(self.pop());
                events
            }
            AppCommand::ItemDeleted(id) => {
                let mut events = vec![AppEvent::ItemsChanged];
                if self.screen == Screen::Detail(id) {
                    events.extend(self.pop());
                }
                events
            }
            AppCommand::SetStatus(message) => vec![self.set_status(message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn push(&mut self, screen: Screen) -> Vec<AppEvent> {
        let previous = std::mem::replace(&mut self.screen, screen);
        self.back_stack.push(previous);
        vec![AppEvent::ScreenChanged(self.screen.clone())]
    }

    fn pop(&mut self) -> Vec<AppEvent> {
        let Some(previous) = self.back_stack.pop() else {
            return Vec::new();
        };
        self.screen = previous;
        vec![AppEvent::ScreenChanged(self.screen.clone())]
    }

    fn set_status(&mut self, message: String) -> AppEvent {
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}
