use egui::{Align, Color32, Layout, RichText, Ui};

use crate::remote::{SessionStatus, SessionSummary};

pub enum TitleBarAction {
    RefreshAll,
}

pub struct TitleBar;

impl TitleBar {
    pub fn show(
        ui: &mut Ui,
        title: &str,
        server_url: &str,
        session: Option<&SessionSummary>,
    ) -> Option<TitleBarAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                ui.label(RichText::new(title).strong());
                ui.add_space(12.0);
                if let Some(session) = session {
                    ui.label(&session.name);
                    ui.label(
                        RichText::new(status_label(session.status))
                            .color(status_color(session.status))
                            .small(),
                    );
                    if let Some(message) = &session.error_message {
                        ui.label(RichText::new(message).color(Color32::from_rgb(150, 0, 0)).small());
                    }
                } else {
                    ui.label(RichText::new("no session selected").weak());
                }
            });

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("⟳").on_hover_text("Refresh everything").clicked() {
                    action = Some(TitleBarAction::RefreshAll);
                }
                ui.label(RichText::new(server_url).weak().small());
            });
        });

        action
    }
}

pub fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Initializing => "initializing",
        SessionStatus::Cloning => "cloning",
        SessionStatus::CreatingSandbox => "creating sandbox",
        SessionStatus::StartingAgent => "starting agent",
        SessionStatus::Running => "running",
        SessionStatus::Error => "error",
        SessionStatus::Closed => "closed",
    }
}

pub fn status_color(status: SessionStatus) -> Color32 {
    match status {
        SessionStatus::Running => Color32::from_rgb(0, 120, 0),
        SessionStatus::Error => Color32::from_rgb(170, 30, 30),
        SessionStatus::Closed => Color32::from_gray(120),
        _ => Color32::from_rgb(180, 120, 0),
    }
}
