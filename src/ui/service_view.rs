use egui::{Color32, RichText, ScrollArea, Ui};

use crate::logs::ServiceTail;
use crate::remote::{ServiceInfo, ServiceStatus};

#[derive(Debug)]
pub enum ServiceViewAction {
    Start(String),
    Stop(String),
    Follow(String),
    Refresh,
}

pub struct ServiceView;

impl ServiceView {
    pub fn show(
        ui: &mut Ui,
        services: &[ServiceInfo],
        tail: &ServiceTail,
    ) -> Option<ServiceViewAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading("Services");
            if ui.button("⟳").on_hover_text("Refresh services").clicked() {
                action = Some(ServiceViewAction::Refresh);
            }
        });
        ui.separator();

        if services.is_empty() {
            ui.label(RichText::new("No services defined in this sandbox.").weak());
            return action;
        }

        for service in services {
            let followed = tail.service_id() == Some(service.id.as_str());
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(status_color(service.status)).small());
                if ui.selectable_label(followed, &service.name).clicked() {
                    action = Some(ServiceViewAction::Follow(service.id.clone()));
                }
                ui.label(RichText::new(status_text(service)).weak().small());
                if let Some(port) = service.http {
                    ui.label(RichText::new(format!(":{port}")).weak().small());
                }
                match service.status {
                    ServiceStatus::Stopped => {
                        if ui.small_button("start").clicked() {
                            action = Some(ServiceViewAction::Start(service.id.clone()));
                        }
                    }
                    ServiceStatus::Running => {
                        if ui.small_button("stop").clicked() {
                            action = Some(ServiceViewAction::Stop(service.id.clone()));
                        }
                    }
                    ServiceStatus::Starting | ServiceStatus::Stopping => {
                        ui.spinner();
                    }
                }
            });
        }

        ui.separator();
        show_output(ui, tail);

        action
    }
}

fn show_output(ui: &mut Ui, tail: &ServiceTail) {
    if tail.service_id().is_none() {
        ui.label(RichText::new("Select a service to follow its output.").weak());
        return;
    }

    ScrollArea::both()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.style_mut().spacing.item_spacing.y = 0.0;
            for line in tail.lines() {
                ui.add(
                    egui::Label::new(RichText::new(line).monospace().size(12.0))
                        .wrap_mode(egui::TextWrapMode::Extend),
                );
            }
            if tail.is_finished() {
                ui.add_space(4.0);
                ui.label(RichText::new("— stream ended —").weak().small());
            }
        });
}

fn status_text(service: &ServiceInfo) -> String {
    match (service.status, service.exit_code) {
        (ServiceStatus::Stopped, Some(code)) => format!("stopped (exit {code})"),
        (status, _) => format!("{status:?}").to_lowercase(),
    }
}

fn status_color(status: ServiceStatus) -> Color32 {
    match status {
        ServiceStatus::Running => Color32::from_rgb(0, 150, 0),
        ServiceStatus::Stopped => Color32::from_gray(140),
        ServiceStatus::Starting | ServiceStatus::Stopping => Color32::from_rgb(200, 140, 0),
    }
}
