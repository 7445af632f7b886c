//! Gujarati font discovery. egui's bundled faces only cover Latin scripts.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use eframe::egui::{self, FontData, FontDefinitions, FontFamily};

/// Environment variable naming a Gujarati-capable `.ttf`/`.otf`/`.ttc` file.
pub const GUJARATI_FONT_ENV: &str = "VACHANAMRUT_GUJARATI_FONT";

const GUJARATI_FONT_NAME: &str = "gujarati";

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansGujarati-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansGujarati-Regular.ttf",
    "/usr/share/fonts/google-noto/NotoSansGujarati-Regular.ttf",
    "/usr/share/fonts/google-noto-vf/NotoSansGujarati[wght].ttf",
    "/usr/share/fonts/truetype/lohit-gujarati/Lohit-Gujarati.ttf",
    "/usr/share/fonts/lohit-gujarati/Lohit-Gujarati.ttf",
    "/usr/share/fonts/truetype/samyak-fonts/Samyak-Gujarati.ttf",
    "/System/Library/Fonts/Supplemental/Gujarati Sangam MN.ttc",
    "/Library/Fonts/NotoSansGujarati-Regular.ttf",
    "C:\\Windows\\Fonts\\Nirmala.ttf",
    "C:\\Windows\\Fonts\\shruti.ttf",
];

/// Sample used to check coverage.
pub const GUJARATI_SAMPLE: &str = "વચનામૃત";

/// Explicit path first, then the well-known system locations.
pub fn gujarati_font_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONT_PATHS.iter().map(PathBuf::from))
        .collect()
}

fn looks_like_font(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(..4),
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"OTTO") | Some(b"true") | Some(b"ttcf")
    )
}

/// Reads the first candidate that exists and carries a font signature.
pub fn load_first_font(candidates: &[PathBuf]) -> Option<(PathBuf, Vec<u8>)> {
    candidates.iter().find_map(|path| {
        let bytes = fs::read(path).ok()?;
        if looks_like_font(&bytes) {
            Some((path.clone(), bytes))
        } else {
            tracing::warn!(path = %path.display(), "fonts: not a TrueType/OpenType file, skipping");
            None
        }
    })
}

/// egui defaults plus `bytes` as the last fallback of every family.
pub fn definitions_with_gujarati(bytes: Vec<u8>) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    fonts.font_data.insert(
        GUJARATI_FONT_NAME.to_string(),
        Arc::new(FontData::from_owned(bytes)),
    );
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(GUJARATI_FONT_NAME.to_string());
    }
    fonts
}

/// Installs a Gujarati fallback on `ctx`. Returns the file used, if any.
pub fn install_gujarati_font(ctx: &egui::Context, explicit: Option<&Path>) -> Option<PathBuf> {
    let Some((path, bytes)) = load_first_font(&gujarati_font_candidates(explicit)) else {
        tracing::warn!(
            "fonts: no Gujarati font found; Gujarati text will not render. Set {GUJARATI_FONT_ENV} or pass --gujarati-font"
        );
        return None;
    };
    tracing::info!(path = %path.display(), "fonts: using Gujarati font");
    ctx.set_fonts(definitions_with_gujarati(bytes));
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covers_gujarati(ctx: &egui::Context) -> bool {
        let _ = ctx.run(egui::RawInput::default(), |_| {});
        ctx.fonts_mut(|fonts| {
            fonts.has_glyphs(&egui::FontId::proportional(14.0), GUJARATI_SAMPLE)
        })
    }

    #[test]
    fn bundled_egui_fonts_do_not_cover_gujarati() {
        let ctx = egui::Context::default();
        assert!(!covers_gujarati(&ctx));
    }

    #[test]
    fn system_gujarati_font_is_used_for_proportional_text() {
        let Some((path, bytes)) = load_first_font(&gujarati_font_candidates(None)) else {
            eprintln!("no Gujarati font installed on this machine; glyph check skipped");
            return;
        };
        let ctx = egui::Context::default();
        ctx.set_fonts(definitions_with_gujarati(bytes));
        assert!(covers_gujarati(&ctx), "{} lacks Gujarati glyphs", path.display());
    }

    #[test]
    fn gujarati_face_is_last_fallback_of_each_family() {
        let fonts = definitions_with_gujarati(vec![0x00, 0x01, 0x00, 0x00]);
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            let chain = fonts.families.get(&family).expect("family present");
            assert_eq!(chain.last().map(String::as_str), Some(GUJARATI_FONT_NAME));
            assert!(chain.len() > 1, "defaults kept ahead of the fallback");
        }
    }

    #[test]
    fn explicit_path_is_tried_first_and_non_fonts_are_skipped() {
        let dir = std::env::temp_dir().join(format!("vachanamrut-fonts-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("temp dir");
        let bogus = dir.join("not-a-font.ttf");
        fs::write(&bogus, b"plain text").expect("write");

        let candidates = gujarati_font_candidates(Some(&bogus));
        assert_eq!(candidates.first(), Some(&bogus));
        assert!(load_first_font(&[bogus.clone(), dir.join("missing.ttf")]).is_none());

        let _ = fs::remove_dir_all(&dir);
    }
}
