use egui::{RichText, ScrollArea, Ui};

use super::title_bar::{status_color, status_label};
use crate::remote::{AgentInfo, WorkspaceInfo, WorkspaceStatus};
use crate::sessions::SessionBoard;

#[derive(Debug)]
pub enum SessionPanelAction {
    Select(String),
    Refresh,
    Create {
        workspace_id: String,
        agent_id: Option<String>,
        name: String,
    },
}

/// Left-hand session list plus the new-session dialog.
#[derive(Default)]
pub struct SessionPanel {
    dialog_open: bool,
    name_input: String,
    workspace_choice: Option<String>,
    agent_choice: Option<String>,
}

impl SessionPanel {
    pub fn show(
        &mut self,
        ui: &mut Ui,
        board: &SessionBoard,
        workspaces: &[WorkspaceInfo],
        agents: &[AgentInfo],
    ) -> Option<SessionPanelAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading("Sessions");
            if ui.button("＋").on_hover_text("New session").clicked() {
                self.dialog_open = true;
                if self.agent_choice.is_none() {
                    self.agent_choice = agents.iter().find(|a| a.is_default).map(|a| a.id.clone());
                }
            }
            if ui.button("⟳").on_hover_text("Refresh sessions").clicked() {
                action = Some(SessionPanelAction::Refresh);
            }
        });
        ui.separator();

        ScrollArea::vertical().show(ui, |ui| {
            if board.is_empty() {
                ui.label(RichText::new("No sessions yet.").weak());
                return;
            }
            for session in board.sessions() {
                let selected = board.selected_id() == Some(session.id.as_str());
                let response = ui.selectable_label(selected, &session.name);
                ui.horizontal(|ui| {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(status_label(session.status))
                            .color(status_color(session.status))
                            .small(),
                    );
                    ui.label(
                        RichText::new(session.updated_at.format("%m-%d %H:%M").to_string())
                            .weak()
                            .small(),
                    );
                });
                if response.clicked() {
                    action = Some(SessionPanelAction::Select(session.id.clone()));
                }
            }
        });

        if let Some(created) = self.show_dialog(ui, workspaces, agents) {
            action = Some(created);
        }

        action
    }

    fn show_dialog(
        &mut self,
        ui: &Ui,
        workspaces: &[WorkspaceInfo],
        agents: &[AgentInfo],
    ) -> Option<SessionPanelAction> {
        if !self.dialog_open {
            return None;
        }

        let mut open = true;
        let mut action = None;

        egui::Window::new("New session")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(320.0)
            .show(ui.ctx(), |ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut self.name_input);

                ui.add_space(4.0);
                ui.label("Workspace");
                let workspace_text = self
                    .workspace_choice
                    .as_deref()
                    .and_then(|id| workspaces.iter().find(|w| w.id == id))
                    .map(|w| w.path.clone())
                    .unwrap_or_else(|| "choose...".to_string());
                egui::ComboBox::from_id_salt("workspace_choice")
                    .selected_text(workspace_text)
                    .width(280.0)
                    .show_ui(ui, |ui| {
                        for workspace in workspaces {
                            let ready = workspace.status == WorkspaceStatus::Ready;
                            let label = if ready {
                                workspace.path.clone()
                            } else {
                                format!("{} ({:?})", workspace.path, workspace.status)
                            };
                            ui.add_enabled_ui(ready, |ui| {
                                if ui
                                    .selectable_label(
                                        self.workspace_choice.as_deref() == Some(&workspace.id),
                                        label,
                                    )
                                    .clicked()
                                {
                                    self.workspace_choice = Some(workspace.id.clone());
                                }
                            });
                        }
                    });

                ui.add_space(4.0);
                ui.label("Agent");
                let agent_text = self
                    .agent_choice
                    .as_deref()
                    .and_then(|id| agents.iter().find(|a| a.id == id))
                    .map(|a| a.name.clone())
                    .unwrap_or_else(|| "default".to_string());
                egui::ComboBox::from_id_salt("agent_choice")
                    .selected_text(agent_text)
                    .width(280.0)
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_label(self.agent_choice.is_none(), "default")
                            .clicked()
                        {
                            self.agent_choice = None;
                        }
                        for agent in agents {
                            if ui
                                .selectable_label(
                                    self.agent_choice.as_deref() == Some(&agent.id),
                                    &agent.name,
                                )
                                .clicked()
                            {
                                self.agent_choice = Some(agent.id.clone());
                            }
                        }
                    });

                ui.add_space(8.0);
                let can_create =
                    !self.name_input.trim().is_empty() && self.workspace_choice.is_some();
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(can_create, egui::Button::new("Create"))
                        .clicked()
                        && let Some(workspace_id) = self.workspace_choice.clone()
                    {
                        action = Some(SessionPanelAction::Create {
                            workspace_id,
                            agent_id: self.agent_choice.clone(),
                            name: self.name_input.trim().to_string(),
                        });
                        self.dialog_open = false;
                        self.name_input.clear();
                    }
                    if ui.button("Cancel").clicked() {
                        self.dialog_open = false;
                    }
                });
            });

        if !open {
            self.dialog_open = false;
        }
        action
    }
}
