//! Event handling for the journey TUI.
//!
//! Raw key events are mapped here into either immediate state changes or
//! [`Command`]s for the main loop to execute. The walk itself only ever sees
//! the two boolean movement intents on the [`App`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use odyssey_core::Phase;

use crate::app::{App, Command};

/// Result of handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    NeedsRedraw,
    Quit,
    Command(Command),
}

/// Handle a terminal event.
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcut, works in every phase.
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    match app.phase() {
        Phase::Landing => handle_landing(app, key),
        Phase::Listing => handle_listing(app, key),
        Phase::IntroForm => handle_intro_form(app, key),
        // Generation is awaited inline by the main loop; nothing to do here.
        Phase::Generating => EventResult::Continue,
        Phase::Playing => handle_playing(app, key),
        Phase::Finished => handle_finished(app, key),
    }
}

fn handle_landing(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('n') => {
            app.error = None;
            app.controller.open_intro_form();
            EventResult::NeedsRedraw
        }
        KeyCode::Char('f') => EventResult::Command(Command::FetchSaved),
        KeyCode::Char('r') => EventResult::Command(Command::ResumeLast),
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,
        _ => EventResult::Continue,
    }
}

fn handle_listing(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous();
            EventResult::NeedsRedraw
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => EventResult::Command(Command::ResumeSelected),
        KeyCode::Esc | KeyCode::Char('q') => {
            app.controller.back_to_landing();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_intro_form(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.error = None;
            app.controller.back_to_landing();
            EventResult::NeedsRedraw
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form.focus = app.form.focus.next();
            EventResult::NeedsRedraw
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form.focus = app.form.focus.prev();
            EventResult::NeedsRedraw
        }
        KeyCode::Enter => {
            if app.form.focus.is_last() {
                EventResult::Command(Command::SubmitForm)
            } else {
                app.form.focus = app.form.focus.next();
                EventResult::NeedsRedraw
            }
        }
        KeyCode::Backspace => {
            app.form.focused_value_mut().pop();
            EventResult::NeedsRedraw
        }
        KeyCode::Char(c) => {
            app.form.focused_value_mut().push(c);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

fn handle_playing(app: &mut App, key: KeyEvent) -> EventResult {
    if app.show_milestone_dialog {
        return match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.dismiss_milestone_dialog();
                EventResult::NeedsRedraw
            }
            _ => EventResult::Continue,
        };
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w') => {
            app.forward_intent = true;
            app.backward_intent = false;
            EventResult::NeedsRedraw
        }
        KeyCode::Down | KeyCode::Char('s') => {
            app.backward_intent = true;
            app.forward_intent = false;
            EventResult::NeedsRedraw
        }
        KeyCode::Char(' ') => {
            app.forward_intent = false;
            app.backward_intent = false;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('q') => EventResult::Quit,
        _ => EventResult::Continue,
    }
}

fn handle_finished(_app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Enter | KeyCode::Char('r') => EventResult::Command(Command::Restart),
        KeyCode::Char('q') | KeyCode::Esc => EventResult::Quit,
        _ => EventResult::Continue,
    }
}
