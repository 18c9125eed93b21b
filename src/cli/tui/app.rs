//! TUI application state and key handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;

use super::event::{Event, EventHandler};
use super::views;
use super::Terminal;
use crate::controller::{Action, Controller, Dispatch, FormField, InputForm};
use crate::domain::{Priority, TaskId};
use crate::view::{BoardView, Filter};

const HELP: &str =
    "n:new j/k:move tab:switch list space:done/undo d:delete s:sort f/0-3:filter q:quit";

/// Which list has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Pending,
    Completed,
}

impl Focus {
    fn toggle(self) -> Self {
        match self {
            Focus::Pending => Focus::Completed,
            Focus::Completed => Focus::Pending,
        }
    }
}

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Adding,
}

/// Application state
pub struct App {
    controller: Controller,

    /// Last rendered view; rebuilt after every action and on every tick
    view: BoardView,

    form: InputForm,
    default_priority: Priority,
    input_mode: InputMode,
    focus: Focus,
    pending_index: usize,
    completed_index: usize,
    status_message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(mut controller: Controller, default_priority: Priority, filter: Filter) -> Self {
        controller.set_filter(filter);
        let view = controller.view();

        Self {
            controller,
            view,
            form: InputForm::new(default_priority),
            default_priority,
            input_mode: InputMode::Normal,
            focus: Focus::Pending,
            pending_index: 0,
            completed_index: 0,
            status_message: None,
            should_quit: false,
        }
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal, events: &EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            match events.next()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize => {}
                Event::Tick => self.refresh(),
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        views::board::draw(frame, self);
    }

    /// Recomputes the view against the current time and clamps selections
    fn refresh(&mut self) {
        self.view = self.controller.view();
        self.pending_index = clamp_index(self.pending_index, self.view.pending.len());
        self.completed_index = clamp_index(self.completed_index, self.view.completed.len());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Adding => self.handle_form_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Char('l') => {
                self.focus = self.focus.toggle();
            }

            KeyCode::Char('n') | KeyCode::Char('a') => {
                self.input_mode = InputMode::Adding;
                self.status_message = None;
            }
            KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.apply(Action::Toggle(id));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.apply(Action::Delete(id));
                }
            }
            KeyCode::Char('s') => self.apply(Action::Sort),

            KeyCode::Char('f') => {
                let next = self.controller.filter().cycle();
                self.apply(Action::SetFilter(next));
            }
            KeyCode::Char(c @ '0'..='3') => {
                let filter = Filter::ALL[c as usize - '0' as usize];
                self.apply(Action::SetFilter(filter));
            }

            KeyCode::Char('?') => self.status_message = Some(HELP.to_string()),

            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.form.reset(self.default_priority);
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Tab => self.form.field = self.form.field.next(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Backspace => self.form.pop_char(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.form.field == FormField::Priority =>
            {
                self.form.priority = self.form.priority.cycle();
            }
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let action = match self.form.to_action() {
            Ok(action) => action,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };

        match self.controller.dispatch(action) {
            Ok(Dispatch::Ignored) => {}
            Ok(outcome) => {
                self.form.reset(self.default_priority);
                self.input_mode = InputMode::Normal;
                self.status_message = Some(outcome.to_string());
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
        self.refresh();
    }

    /// Dispatches an action and redraws from the fresh view
    fn apply(&mut self, action: Action) {
        match self.controller.dispatch(action) {
            Ok(outcome) => self.status_message = Some(outcome.to_string()),
            Err(e) => self.status_message = Some(e.to_string()),
        }
        self.refresh();
    }

    fn move_selection(&mut self, delta: isize) {
        let (index, len) = match self.focus {
            Focus::Pending => (&mut self.pending_index, self.view.pending.len()),
            Focus::Completed => (&mut self.completed_index, self.view.completed.len()),
        };
        if len == 0 {
            return;
        }
        *index = (*index as isize + delta).rem_euclid(len as isize) as usize;
    }

    fn selected_id(&self) -> Option<TaskId> {
        match self.focus {
            Focus::Pending => self.view.pending.get(self.pending_index),
            Focus::Completed => self.view.completed.get(self.completed_index),
        }
        .map(|item| item.id.clone())
    }

    // Accessors for views

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    pub fn form(&self) -> &InputForm {
        &self.form
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn pending_index(&self) -> usize {
        self.pending_index
    }

    pub fn completed_index(&self) -> usize {
        self.completed_index
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn task_count(&self) -> usize {
        self.controller.store().len()
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}
