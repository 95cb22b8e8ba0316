use egui::{Color32, Key, RichText, ScrollArea, Ui};

use crate::constant::PROMPT_HISTORY_CAPACITY;
use crate::history::PromptHistory;
use crate::remote::{ChatMessage, Role};

#[derive(Debug)]
pub enum ChatAction {
    Submit(String),
}

/// Chat transcript plus the prompt editor.
///
/// ArrowUp/ArrowDown while the editor has focus walk the prompt history;
/// Ctrl+Enter (or the Send button) submits. The pane keeps a local echo of
/// the submitted message until the server transcript catches up.
pub struct ChatPane {
    transcript: Vec<ChatMessage>,
    pending_echo: Option<ChatMessage>,
    draft: String,
    history: PromptHistory,
    sending: bool,
}

impl Default for ChatPane {
    fn default() -> Self {
        Self {
            transcript: Vec::new(),
            pending_echo: None,
            draft: String::new(),
            history: PromptHistory::new(PROMPT_HISTORY_CAPACITY),
            sending: false,
        }
    }
}

impl ChatPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
        self.pending_echo = None;
        self.sending = false;
    }

    pub fn set_transcript(&mut self, messages: Vec<ChatMessage>) {
        // The echo is redundant once the server returns it.
        if let Some(echo) = &self.pending_echo
            && messages.iter().any(|m| m.text() == echo.text() && m.role == Role::User)
        {
            self.pending_echo = None;
        }
        self.transcript = messages;
    }

    pub fn set_sending(&mut self, sending: bool) {
        self.sending = sending;
        if !sending {
            self.pending_echo = None;
        }
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn show(&mut self, ui: &mut Ui, can_send: bool) -> Option<ChatAction> {
        let mut action = None;

        egui::TopBottomPanel::bottom("prompt_editor")
            .resizable(false)
            .show_inside(ui, |ui| {
                action = self.show_editor(ui, can_send);
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in &self.transcript {
                        show_message(ui, message);
                    }
                    if let Some(echo) = &self.pending_echo {
                        show_message(ui, echo);
                    }
                    if self.sending {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("agent is working...").weak());
                        });
                    }
                });
        });

        action
    }

    fn show_editor(&mut self, ui: &mut Ui, can_send: bool) -> Option<ChatAction> {
        let mut action = None;

        ui.add_space(4.0);
        let editor = ui.add_enabled(
            can_send && !self.sending,
            egui::TextEdit::multiline(&mut self.draft)
                .desired_rows(3)
                .desired_width(f32::INFINITY)
                .hint_text("Prompt the agent (Ctrl+Enter to send)"),
        );

        if editor.has_focus() {
            if ui.input(|i| i.key_pressed(Key::ArrowUp))
                && let Some(text) = self.history.previous(&self.draft)
            {
                self.draft = text;
            }
            if ui.input(|i| i.key_pressed(Key::ArrowDown))
                && let Some(text) = self.history.next()
            {
                self.draft = text;
            }
        }

        let submit_key =
            editor.has_focus() && ui.input(|i| i.modifiers.ctrl && i.key_pressed(Key::Enter));

        ui.horizontal(|ui| {
            let can_submit =
                can_send && !self.sending && !self.draft.trim().is_empty();
            if (ui.add_enabled(can_submit, egui::Button::new("Send")).clicked() || submit_key)
                && can_submit
            {
                let prompt = self.draft.trim().to_string();
                self.history.push(&prompt);
                self.draft.clear();
                self.sending = true;
                self.pending_echo = Some(ChatMessage::local_user(&prompt));
                action = Some(ChatAction::Submit(prompt));
            }
            if !can_send {
                ui.label(RichText::new("session is not ready").weak().small());
            } else if self.history.is_browsing() {
                ui.label(RichText::new("history").weak().small());
            }
        });
        ui.add_space(4.0);

        action
    }
}

fn show_message(ui: &mut Ui, message: &ChatMessage) {
    let (who, color) = match message.role {
        Role::User => ("you", Color32::from_rgb(60, 80, 180)),
        Role::Assistant => ("agent", Color32::from_rgb(0, 110, 60)),
        Role::System => ("system", Color32::from_gray(120)),
    };
    ui.horizontal(|ui| {
        ui.label(RichText::new(who).color(color).strong().small());
        if let Some(at) = message.created_at {
            ui.label(RichText::new(at.format("%H:%M:%S").to_string()).weak().small());
        }
    });
    let text = message.text();
    if text.is_empty() {
        ui.label(RichText::new("(no text content)").weak().italics());
    } else {
        ui.label(text);
    }
    ui.add_space(8.0);
}
