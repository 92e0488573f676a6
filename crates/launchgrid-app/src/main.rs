#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use app::LauncherApp;
use eframe::egui;
use launchgrid_core::Launchgrid;
use tracing::Level;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_target(false)
        .compact()
        .init();

    let engine = match Launchgrid::open_default() {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("Failed to open data root: {}", e);
            std::process::exit(1);
        }
    };
    let settings = engine.load_settings();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "launchgrid",
        options,
        Box::new(|cc| {
            install_cjk_font_fallback(&cc.egui_ctx);
            Ok(Box::new(LauncherApp::new(engine, settings)))
        }),
    )
}

/// Group and shortcut names are frequently CJK; egui's bundled fonts cannot
/// render them, so pull in a system font when one is available.
fn install_cjk_font_fallback(ctx: &egui::Context) {
    let candidates: &[(&str, &str)] = &[
        #[cfg(target_os = "windows")]
        ("yahei", r"C:\Windows\Fonts\msyh.ttc"),
        #[cfg(target_os = "windows")]
        ("simhei", r"C:\Windows\Fonts\simhei.ttf"),
        #[cfg(target_os = "macos")]
        ("pingfang", "/System/Library/Fonts/PingFang.ttc"),
        #[cfg(all(unix, not(target_os = "macos")))]
        (
            "noto_cjk",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        ),
        #[cfg(all(unix, not(target_os = "macos")))]
        ("wqy", "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc"),
    ];

    let mut fonts = egui::FontDefinitions::default();
    for (name, path) in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts
                .font_data
                .insert((*name).to_owned(), egui::FontData::from_owned(data).into());
            if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Proportional) {
                family.push((*name).to_owned());
            }
            if let Some(family) = fonts.families.get_mut(&egui::FontFamily::Monospace) {
                family.push((*name).to_owned());
            }
            break;
        }
    }
    ctx.set_fonts(fonts);
}
