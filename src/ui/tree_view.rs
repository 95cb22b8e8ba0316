use egui::{Color32, RichText, ScrollArea, Ui};

use crate::remote::{ChangeKind, EntryKind};
use crate::tree::{FileTree, LoadState, TreeNode};

#[derive(Debug)]
pub enum TreeAction {
    Toggle(String),
    Open(String),
    Refresh,
}

const INDENT_STEP: f32 = 14.0;

pub struct TreeView;

impl TreeView {
    pub fn show(ui: &mut Ui, tree: &FileTree, selected: Option<&str>) -> Option<TreeAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.heading("Files");
            if ui.button("⟳").on_hover_text("Refresh tree").clicked() {
                action = Some(TreeAction::Refresh);
            }
            if tree.dir_has_changes(crate::tree::ROOT_PATH) {
                ui.label(RichText::new("●").color(Color32::from_rgb(180, 120, 0)).small());
            }
        });
        ui.separator();

        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            if tree.root().state == LoadState::Loading {
                ui.spinner();
                return;
            }
            for child in &tree.root().children {
                render_node(ui, tree, child, selected, 0, &mut action);
            }
        });

        action
    }
}

fn render_node(
    ui: &mut Ui,
    tree: &FileTree,
    node: &TreeNode,
    selected: Option<&str>,
    depth: usize,
    action: &mut Option<TreeAction>,
) {
    ui.horizontal(|ui| {
        ui.add_space(INDENT_STEP * depth as f32);
        match node.kind {
            EntryKind::Directory => {
                let expanded = tree.is_expanded(&node.path);
                let arrow = if expanded { "▾" } else { "▸" };
                let mut label = RichText::new(format!("{arrow} {}", node.name));
                if tree.dir_has_changes(&node.path) {
                    label = label.color(Color32::from_rgb(150, 100, 0));
                }
                if ui.selectable_label(false, label).clicked() {
                    *action = Some(TreeAction::Toggle(node.path.clone()));
                }
                if expanded && node.state == LoadState::Loading {
                    ui.spinner();
                }
            }
            EntryKind::File => {
                let badge = tree.badge(&node.path);
                let is_selected = selected == Some(node.path.as_str());
                let mut label = RichText::new(&node.name).monospace();
                if let Some(kind) = badge {
                    label = label.color(badge_color(kind));
                }
                if ui.selectable_label(is_selected, label).clicked() {
                    *action = Some(TreeAction::Open(node.path.clone()));
                }
                if let Some(kind) = badge {
                    ui.label(
                        RichText::new(badge_letter(kind))
                            .color(badge_color(kind))
                            .small(),
                    );
                }
            }
        }
    });

    if node.kind == EntryKind::Directory && tree.is_expanded(&node.path) {
        for child in &node.children {
            render_node(ui, tree, child, selected, depth + 1, action);
        }
    }
}

fn badge_letter(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "A",
        ChangeKind::Modified => "M",
        ChangeKind::Deleted => "D",
        ChangeKind::Renamed => "R",
    }
}

fn badge_color(kind: ChangeKind) -> Color32 {
    match kind {
        ChangeKind::Added => Color32::from_rgb(0, 120, 0),
        ChangeKind::Modified => Color32::from_rgb(180, 120, 0),
        ChangeKind::Deleted => Color32::from_rgb(170, 30, 30),
        ChangeKind::Renamed => Color32::from_rgb(60, 80, 180),
    }
}
