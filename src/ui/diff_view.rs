use egui::{Color32, FontId, RichText, ScrollArea, TextFormat, Ui, text::LayoutJob};
use similar::{ChangeTag, TextDiff};

use crate::diff::{
    DiffGate, DiffRow, DiffTotals, LineOpKind, REJECT_OPERATIONS, SizeTier, WARN_OPERATIONS,
    build_patch, classify_size, compute_diff, project_rows, summarize,
};
use crate::remote::client::ApiError;

const REMOVED_LINE_BG: Color32 = Color32::from_rgb(255, 230, 230);
const ADDED_LINE_BG: Color32 = Color32::from_rgb(230, 255, 230);
const REMOVED_WORD_BG: Color32 = Color32::from_rgb(255, 170, 170);
const ADDED_WORD_BG: Color32 = Color32::from_rgb(170, 255, 170);
const REMOVED_TEXT_COLOR: Color32 = Color32::from_rgb(150, 0, 0);
const ADDED_TEXT_COLOR: Color32 = Color32::from_rgb(0, 100, 0);

const ROW_FONT_SIZE: f32 = 13.0;

/// Diff pane for the selected file: original-vs-current comparison with
/// the size gate in front of the table.
///
/// Both file versions arrive asynchronously; the diff is recomputed when
/// the pair is complete and cached until the next load. A missing base
/// version (newly added file) or missing current version (deleted file)
/// diffs against empty text.
#[derive(Default)]
pub struct DiffPane {
    file: Option<String>,
    original: Option<String>,
    current: Option<String>,
    rows: Vec<DiffRow>,
    totals: DiffTotals,
    operation_count: usize,
    tier: SizeTier,
    gate: DiffGate,
    show_current_only: bool,
    error: Option<String>,
}

impl DiffPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus a file and drop previously loaded content. The gate keeps its
    /// force-load override only when the path is unchanged.
    pub fn open_file(&mut self, path: &str) {
        self.gate.focus_file(path);
        self.file = Some(path.to_string());
        self.original = None;
        self.current = None;
        self.rows.clear();
        self.error = None;
        self.show_current_only = false;
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Accept one side of the comparison from the file worker. A 404 on
    /// either side means the file does not exist in that version, which is
    /// a legitimate empty side, not a failure.
    pub fn set_result(&mut self, path: &str, from_base: bool, result: Result<String, ApiError>) {
        if self.file.as_deref() != Some(path) {
            return;
        }
        let text = match result {
            Ok(text) => text,
            Err(ApiError::Status { status: 404, .. }) => String::new(),
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };
        if from_base {
            self.original = Some(text);
        } else {
            self.current = Some(text);
        }
        if self.original.is_some() && self.current.is_some() {
            self.recompute();
        }
    }

    fn recompute(&mut self) {
        let ops = compute_diff(self.original.as_deref(), self.current.as_deref());
        self.operation_count = ops.len();
        self.tier = classify_size(self.operation_count);
        self.totals = summarize(&ops);
        self.rows = project_rows(&ops);
    }

    pub fn show(&mut self, ui: &mut Ui) {
        let Some(file) = self.file.clone() else {
            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Select a file to compare.").weak());
            });
            return;
        };

        if let Some(error) = &self.error {
            ui.label(RichText::new(error).color(REMOVED_TEXT_COLOR));
            return;
        }
        if self.original.is_none() || self.current.is_none() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new(&file).monospace());
            });
            return;
        }

        self.show_header(ui, &file);
        ui.separator();

        if self.show_current_only {
            self.show_current_text(ui);
        } else if self.gate.should_render(self.tier) {
            self.show_table(ui);
        } else {
            self.show_fallback(ui, &file);
        }
    }

    fn show_header(&self, ui: &mut Ui, file: &str) {
        ui.horizontal(|ui| {
            ui.label(RichText::new(file).monospace());
            ui.label(
                RichText::new(format!("+{}", self.totals.additions)).color(ADDED_TEXT_COLOR),
            );
            ui.label(
                RichText::new(format!("-{}", self.totals.deletions)).color(REMOVED_TEXT_COLOR),
            );
            ui.label(
                RichText::new(format!("{} lines", self.operation_count))
                    .weak()
                    .small(),
            );
        });
    }

    fn show_table(&self, ui: &mut Ui) {
        let row_height = ui.text_style_height(&egui::TextStyle::Monospace).max(16.0);
        ScrollArea::both()
            .auto_shrink([false, false])
            .show_rows(ui, row_height, self.rows.len(), |ui, range| {
                ui.style_mut().spacing.item_spacing.y = 0.0;
                for index in range {
                    let row = &self.rows[index];
                    let counterpart = self.highlight_counterpart(index);
                    ui.add(
                        egui::Label::new(layout_row(row, counterpart))
                            .wrap_mode(egui::TextWrapMode::Extend),
                    );
                }
            });
    }

    /// For a Removed/Added pair sharing a line number, the other half is
    /// used for intra-line character highlighting.
    fn highlight_counterpart(&self, index: usize) -> Option<&DiffRow> {
        let row = &self.rows[index];
        match row.kind {
            LineOpKind::Removed => self
                .rows
                .get(index + 1)
                .filter(|next| next.kind == LineOpKind::Added && next.line_number == row.line_number),
            LineOpKind::Added => index
                .checked_sub(1)
                .and_then(|i| self.rows.get(i))
                .filter(|prev| {
                    prev.kind == LineOpKind::Removed && prev.line_number == row.line_number
                }),
            LineOpKind::Unchanged => None,
        }
    }

    fn show_current_text(&mut self, ui: &mut Ui) {
        if ui.button("Back to diff view").clicked() {
            self.show_current_only = false;
        }
        ui.add_space(4.0);
        let current = self.current.clone().unwrap_or_default();
        ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            ui.style_mut().spacing.item_spacing.y = 0.0;
            for line in current.split('\n') {
                ui.add(
                    egui::Label::new(RichText::new(line).monospace().size(ROW_FONT_SIZE))
                        .wrap_mode(egui::TextWrapMode::Extend),
                );
            }
        });
    }

    fn show_fallback(&mut self, ui: &mut Ui, file: &str) {
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            match self.tier {
                SizeTier::WarnLargeLoadable => {
                    ui.heading("Large diff");
                    ui.label(format!(
                        "{} lines exceed the {} line render limit. Loading may be slow.",
                        self.operation_count, WARN_OPERATIONS
                    ));
                }
                SizeTier::RejectedTooLarge => {
                    ui.heading("Diff too large to display");
                    ui.label(format!(
                        "{} lines exceed the {} line hard limit.",
                        self.operation_count, REJECT_OPERATIONS
                    ));
                }
                SizeTier::Normal => {}
            }
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if self.tier == SizeTier::WarnLargeLoadable
                    && ui.button("Load diff anyway").clicked()
                {
                    self.gate.request_force_load(self.tier);
                }
                if ui.button("View current file").clicked() {
                    self.show_current_only = true;
                }
                if ui.button("Download patch").clicked() {
                    self.download_patch(file);
                }
            });
        });
    }

    /// Build the patch and offer it as `{name}.patch` via a save dialog on
    /// a background thread. Failures are log-only; the UI does not retry.
    fn download_patch(&self, file: &str) {
        let patch = build_patch(
            file,
            self.original.as_deref().unwrap_or_default(),
            self.current.as_deref().unwrap_or_default(),
        );
        let suggested = format!(
            "{}.patch",
            file.rsplit('/').next().unwrap_or(file)
        );
        std::thread::spawn(move || {
            if let Some(path) = rfd::FileDialog::new().set_file_name(&suggested).save_file() {
                if let Err(e) = std::fs::write(&path, patch) {
                    tracing::warn!(error = %e, ?path, "failed to write patch file");
                }
            }
        });
    }
}

/// Lay out one table row: gutter, prefix, text, backgrounds. When a
/// counterpart row is present, characters unique to this side get the
/// stronger word-level highlight on top of the line background.
fn layout_row(row: &DiffRow, counterpart: Option<&DiffRow>) -> LayoutJob {
    let font_id = FontId::monospace(ROW_FONT_SIZE);
    let (line_bg, text_color, prefix) = match row.kind {
        LineOpKind::Unchanged => (Color32::TRANSPARENT, Color32::from_gray(60), ' '),
        LineOpKind::Added => (ADDED_LINE_BG, ADDED_TEXT_COLOR, '+'),
        LineOpKind::Removed => (REMOVED_LINE_BG, REMOVED_TEXT_COLOR, '-'),
    };

    let mut job = LayoutJob::default();
    let base = TextFormat {
        font_id: font_id.clone(),
        color: text_color,
        background: line_bg,
        ..Default::default()
    };

    job.append(
        &format!("{:>5} {prefix} ", row.line_number),
        0.0,
        TextFormat {
            font_id: font_id.clone(),
            color: Color32::from_gray(150),
            background: line_bg,
            ..Default::default()
        },
    );

    match (row.kind, counterpart) {
        (LineOpKind::Removed, Some(added)) => {
            append_char_diff(&mut job, &row.text, &added.text, true, &base);
        }
        (LineOpKind::Added, Some(removed)) => {
            append_char_diff(&mut job, &removed.text, &row.text, false, &base);
        }
        _ => job.append(&row.text, 0.0, base),
    }

    job
}

fn append_char_diff(
    job: &mut LayoutJob,
    removed_text: &str,
    added_text: &str,
    is_removed_side: bool,
    base: &TextFormat,
) {
    let word_bg = if is_removed_side {
        REMOVED_WORD_BG
    } else {
        ADDED_WORD_BG
    };
    let diff = TextDiff::from_chars(removed_text, added_text);
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Equal => job.append(change.value(), 0.0, base.clone()),
            ChangeTag::Delete if is_removed_side => job.append(
                change.value(),
                0.0,
                TextFormat {
                    background: word_bg,
                    ..base.clone()
                },
            ),
            ChangeTag::Insert if !is_removed_side => job.append(
                change.value(),
                0.0,
                TextFormat {
                    background: word_bg,
                    ..base.clone()
                },
            ),
            _ => {}
        }
    }
}
