//! Application state for the interactive view
//!
//! Binds one request controller to the terminal: keeps the latest published
//! state for rendering, handles keyboard input, and schedules the initial
//! fetch and any retries on the runtime.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use fetchstate::controller::ControllerState;
use fetchstate::{RequestController, Transport};

/// Main application struct holding the bound controller and view state
pub struct App<Tr: Transport<Value>> {
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for the response body
    pub scroll_offset: u16,
    /// Flag indicating a retry has been requested
    pub retry_requested: bool,
    /// When the displayed state was last published
    pub last_update: Option<DateTime<Local>>,
    controller: RequestController<Value, Tr>,
    updates: watch::Receiver<ControllerState<Value, Tr>>,
    state: ControllerState<Value, Tr>,
}

impl<Tr> App<Tr>
where
    Tr: Transport<Value> + 'static,
{
    /// Creates a new App bound to `controller`
    pub fn new(controller: RequestController<Value, Tr>) -> Self {
        let updates = controller.subscribe();
        let state = controller.snapshot();
        Self {
            should_quit: false,
            show_help: false,
            scroll_offset: 0,
            retry_requested: false,
            last_update: None,
            controller,
            updates,
            state,
        }
    }

    pub fn controller(&self) -> &RequestController<Value, Tr> {
        &self.controller
    }

    /// The state currently shown
    pub fn state(&self) -> &ControllerState<Value, Tr> {
        &self.state
    }

    /// Pulls the latest published state, if any
    ///
    /// Returns `true` when the view needs to be redrawn.
    pub fn sync_state(&mut self) -> bool {
        if !self.updates.has_changed().unwrap_or(false) {
            return false;
        }
        self.state = self.updates.borrow_and_update().clone();
        self.last_update = Some(Local::now());
        self.scroll_offset = 0;
        true
    }

    /// Spawns the initial fetch; repeated calls fetch nothing
    pub fn spawn_attach(&self) -> JoinHandle<()> {
        let controller = self.controller.clone();
        tokio::spawn(async move {
            controller.attach().await;
        })
    }

    /// Spawns a retry if one was requested since the last call
    pub fn spawn_pending_retry(&mut self) -> Option<JoinHandle<()>> {
        if !std::mem::take(&mut self.retry_requested) {
            return None;
        }
        let controller = self.controller.clone();
        Some(tokio::spawn(async move {
            controller.retry().await;
        }))
    }

    /// Handles a keyboard event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.retry_requested = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            _ => {}
        }
    }
}
