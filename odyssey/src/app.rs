//! Main application state and logic.

use odyssey_core::{JourneyController, Phase, TickEvent, UserContext};

use crate::ui::theme::JourneyTheme;

/// Fields of the intro form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    CurrentStatus,
    TenYearGoal,
}

impl FormField {
    pub fn next(self) -> FormField {
        match self {
            FormField::Name => FormField::CurrentStatus,
            FormField::CurrentStatus => FormField::TenYearGoal,
            FormField::TenYearGoal => FormField::Name,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Name => FormField::TenYearGoal,
            FormField::CurrentStatus => FormField::Name,
            FormField::TenYearGoal => FormField::CurrentStatus,
        }
    }

    pub fn is_last(self) -> bool {
        self == FormField::TenYearGoal
    }
}

/// Contents and focus of the intro form.
///
/// Retained across a failed generation so resubmission is a plain retry.
#[derive(Debug, Clone)]
pub struct IntroForm {
    pub name: String,
    pub current_status: String,
    pub ten_year_goal: String,
    pub focus: FormField,
}

impl Default for IntroForm {
    fn default() -> Self {
        Self {
            name: "Gabriel".to_string(),
            current_status: String::new(),
            ten_year_goal: String::new(),
            focus: FormField::default(),
        }
    }
}

impl IntroForm {
    /// Build the journey context from the current field values.
    pub fn context(&self) -> UserContext {
        UserContext::new(
            self.name.trim(),
            self.current_status.trim(),
            self.ten_year_goal.trim(),
        )
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::CurrentStatus => &mut self.current_status,
            FormField::TenYearGoal => &mut self.ten_year_goal,
        }
    }
}

/// A slow controller operation requested by a key press and executed by the
/// main loop after drawing a transitional frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchSaved,
    SubmitForm,
    ResumeSelected,
    ResumeLast,
    Restart,
}

/// Main application state.
pub struct App {
    pub controller: JourneyController,
    pub theme: JourneyTheme,

    // Movement intents; plain booleans read at each tick.
    pub forward_intent: bool,
    pub backward_intent: bool,

    // UI state
    pub form: IntroForm,
    pub list_selected: usize,
    pub show_milestone_dialog: bool,
    pub error: Option<String>,

    // Animation
    pub animation_frame: u8,
}

impl App {
    pub fn new(controller: JourneyController) -> Self {
        Self {
            controller,
            theme: JourneyTheme::default(),
            forward_intent: false,
            backward_intent: false,
            form: IntroForm::default(),
            list_selected: 0,
            show_milestone_dialog: false,
            error: None,
            animation_frame: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    /// One simulation tick.
    ///
    /// The open milestone dialog pauses the walk entirely; otherwise the
    /// intent flags drive the engine, and a reveal cancels forward intent.
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);

        if self.show_milestone_dialog {
            return;
        }

        match self
            .controller
            .apply_tick(self.forward_intent, self.backward_intent)
        {
            Some(TickEvent::Milestone(_)) => {
                self.forward_intent = false;
                self.show_milestone_dialog = true;
            }
            Some(TickEvent::Finished) => {
                self.forward_intent = false;
                self.backward_intent = false;
            }
            None => {}
        }
    }

    /// Close the milestone dialog and let the walk continue.
    pub fn dismiss_milestone_dialog(&mut self) {
        self.show_milestone_dialog = false;
    }

    /// Move the saved-journey selection.
    pub fn select_previous(&mut self) {
        self.list_selected = self.list_selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let count = self.controller.saved().len();
        if count > 0 {
            self.list_selected = (self.list_selected + 1).min(count - 1);
        }
    }

    /// Execute a slow command against the controller.
    pub async fn run_command(&mut self, command: Command) {
        self.error = None;
        match command {
            Command::FetchSaved => {
                self.list_selected = 0;
                if let Err(e) = self.controller.list_saved().await {
                    self.error = Some(e.to_string());
                }
            }
            Command::SubmitForm => {
                match self.controller.start_new_journey(self.form.context()).await {
                    Ok(()) => self.reset_walk_state(),
                    // The form is retained; the message invites a retry.
                    Err(e) => self.error = Some(e.to_string()),
                }
            }
            Command::ResumeSelected => {
                let Some(journey) = self.controller.saved().get(self.list_selected).cloned()
                else {
                    return;
                };
                match self.controller.resume(journey).await {
                    Ok(()) => self.reset_walk_state(),
                    Err(e) => self.error = Some(e.to_string()),
                }
            }
            Command::ResumeLast => match self.controller.resume_last().await {
                Ok(true) => self.reset_walk_state(),
                Ok(false) => {
                    self.error = Some("No saved journey found on this device.".to_string());
                }
                Err(e) => self.error = Some(e.to_string()),
            },
            Command::Restart => {
                self.controller.discard_and_restart().await;
                self.reset_walk_state();
                self.form = IntroForm::default();
                self.list_selected = 0;
            }
        }
    }

    fn reset_walk_state(&mut self) {
        self.forward_intent = false;
        self.backward_intent = false;
        self.show_milestone_dialog = false;
    }
}
