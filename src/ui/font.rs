/// Font setup for the workbench.
///
/// Most of the window is code: diffs, file paths, service logs. A real
/// system monospace font is loaded for those panes, plus a CJK-capable
/// proportional font so chat transcripts render for non-Latin users.
/// Everything falls back to egui's embedded fonts when lookup fails.
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use font_kit::source::SystemSource;

pub fn setup_fonts() -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    let source = SystemSource::new();

    if let Some(name) = register_first(&mut fonts, &source, &monospace_candidates(), "DeckMono") {
        if let Some(family) = fonts.families.get_mut(&FontFamily::Monospace) {
            family.insert(0, name.clone());
        }
        tracing::info!("Using system font '{}' for code panes", name);
    } else {
        tracing::warn!("No system monospace font found, using embedded default");
    }

    if let Some(name) = register_first(&mut fonts, &source, &cjk_candidates(), "DeckCJK") {
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            if let Some(list) = fonts.families.get_mut(&family) {
                list.push(name.clone());
            }
        }
        tracing::info!("Using system font '{}' for CJK fallback", name);
    }

    fonts
}

fn monospace_candidates() -> Vec<&'static str> {
    match std::env::consts::OS {
        "macos" => vec!["SF Mono", "Menlo", "Monaco"],
        "windows" => vec!["Cascadia Mono", "Consolas"],
        "linux" => vec!["JetBrains Mono", "DejaVu Sans Mono", "Liberation Mono"],
        _ => vec![],
    }
}

fn cjk_candidates() -> Vec<&'static str> {
    match std::env::consts::OS {
        "macos" => vec!["PingFang SC", "Hiragino Sans GB"],
        "windows" => vec!["Microsoft YaHei", "SimSun"],
        "linux" => vec!["Noto Sans CJK SC", "Noto Sans CJK TC"],
        _ => vec![],
    }
}

/// Try each family name in order; register the first that loads under
/// `registered_as` and return that key.
fn register_first(
    fonts: &mut FontDefinitions,
    source: &SystemSource,
    candidates: &[&str],
    registered_as: &str,
) -> Option<String> {
    for name in candidates {
        if let Ok(family) = source.select_family_by_name(name)
            && let Some(handle) = family.fonts().first()
            && let Ok(bytes) = match handle {
                font_kit::handle::Handle::Memory { bytes, .. } => Ok(bytes.to_vec()),
                font_kit::handle::Handle::Path { path, .. } => std::fs::read(path),
            }
        {
            fonts
                .font_data
                .insert(registered_as.to_owned(), FontData::from_owned(bytes).into());
            return Some(registered_as.to_owned());
        }
    }
    None
}
