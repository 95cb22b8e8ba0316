use egui::{Color32, Context, Stroke, Style, Visuals};

pub fn configure_style(ctx: &Context) {
    let mut style = Style::default();

    // Dense workbench layout: tighter than egui's defaults so the session
    // list, tree and transcript fit side by side.
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = egui::Margin::same(10);

    ctx.set_style(style);

    let mut visuals = Visuals::light();
    visuals.window_shadow = egui::epaint::Shadow::NONE;
    visuals.popup_shadow = egui::epaint::Shadow::NONE;

    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, Color32::from_gray(225));
    visuals.widgets.inactive.bg_fill = Color32::TRANSPARENT;
    visuals.widgets.hovered.bg_fill = Color32::from_gray(240);
    visuals.widgets.active.bg_fill = Color32::from_gray(230);

    visuals.selection.bg_fill = Color32::from_rgb(205, 225, 250);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_gray(100));

    ctx.set_visuals(visuals);
}
