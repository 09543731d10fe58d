// Configuration loading, themes, key handling through the App, terminal
// presentation, and the headless runner.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use radiolume::action::Action;
use radiolume::app::App;
use radiolume::components::visualizer_panel::{raster_size, VisualizerPanel};
use radiolume::config::Config;
use radiolume::engine::driver::FixedStepDriver;
use radiolume::engine::modes::hexagon::DEFAULT_HEX_SIZE;
use radiolume::engine::modes::{Family, ModeKind};
use radiolume::engine::surface::{Raster, Rgb, Surface};
use radiolume::engine::EngineOptions;
use radiolume::headless;
use radiolume::logging;
use radiolume::theme::Theme;
use radiolume::ui;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn test_app() -> App {
    let mut config = Config::default();
    config.visualizer.seed = Some(3);
    App::new(config).unwrap()
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    app.flush_actions().unwrap();
}

/// Run one frame so pending engine requests take effect.
fn tick(app: &mut App) {
    app.handle_action(Action::Tick).unwrap();
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

// ── Config ───────────────────────────────────────────────────────────────────

#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config.general.frame_rate, 30.0);
    assert_eq!(config.general.supersample, 2);
    assert_eq!(config.visualizer.family, Family::Geometric);
    assert_eq!(config.visualizer.mode, 0);
    assert!(config.visualizer.enabled);
    assert_eq!(config.visualizer.theme, "dark");
    assert_eq!(config.visualizer.seed, None);
    assert_eq!(config.general.log_dir, None);
}

#[test]
fn test_partial_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[general]
frame_rate = 60.0

[visualizer]
family = "elemental"
mode = 3
theme = "light"
seed = 7
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.general.frame_rate, 60.0);
    assert_eq!(config.general.supersample, 2);

    let options = config.visualizer.engine_options();
    assert_eq!(options.family, Family::Elemental);
    assert_eq!(options.mode, 3);
    assert_eq!(options.seed, 7);
    assert_eq!(options.background, Theme::light().background);
    assert_eq!(options.lightning_intensity, 1.0);
}

#[test]
fn test_log_dir_setting_receives_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, format!("[general]\nlog_dir = {:?}\n", log_dir.display().to_string())).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.general.log_dir.as_deref(), Some(log_dir.as_path()));

    let guard = logging::init(config.general.log_dir.as_deref()).unwrap();
    drop(guard);
    let written = std::fs::read_to_string(log_dir.join(logging::LOG_FILE)).unwrap();
    assert!(written.contains("logging initialized"));
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[visualizer\nmode = ").unwrap();
    assert!(Config::load_from(&path).is_err());

    std::fs::write(&path, "[visualizer]\nfamily = \"cubist\"\n").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn test_engine_options_clamp_out_of_range_values() {
    let mut config = Config::default();
    config.visualizer.lightning_intensity = 9.0;
    config.visualizer.fft_size = 0;
    config.visualizer.hex_size = 1.0;
    let options = config.visualizer.engine_options();
    assert_eq!(options.lightning_intensity, 3.0);
    assert_eq!(options.fft_size, 32);
    assert_eq!(options.hex_size, DEFAULT_HEX_SIZE);

    config.visualizer.hex_size = f32::NAN;
    assert_eq!(config.visualizer.engine_options().hex_size, DEFAULT_HEX_SIZE);

    config.visualizer.fft_size = usize::MAX;
    assert_eq!(config.visualizer.engine_options().fft_size, 32768);
    config.visualizer.fft_size = 300;
    assert_eq!(config.visualizer.engine_options().fft_size, 512);

    config.general.supersample = u16::MAX;
    assert_eq!(config.general.supersample(), 8);
    config.general.supersample = 0;
    assert_eq!(config.general.supersample(), 1);
}

#[test]
fn test_oversized_config_values_build_a_bounded_app() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[general]\nsupersample = 65535\n\n[visualizer]\nfft_size = 9223372036854775807\nseed = 1\n",
    )
    .unwrap();
    let config = Config::load_from(&path).unwrap();
    let app = App::new(config).unwrap();
    assert_eq!(app.visualizer().supersample(), 8);
    assert_eq!(app.engine.sampler().bin_count(), 16384);
    assert_eq!(raster_size(Rect::new(0, 0, 80, 20), u16::MAX), (640, 320));
}

#[test]
fn test_config_path_location() {
    let path = Config::config_path();
    assert!(path.ends_with("radiolume/config.toml"));
}

// ── Themes ───────────────────────────────────────────────────────────────────

#[test]
fn test_theme_lookup_and_toggle() {
    assert_eq!(Theme::from_name("light").name, "light");
    assert_eq!(Theme::from_name("solarized").name, "dark");
    assert_eq!(Theme::default().background, Rgb::new(6, 6, 14));
    assert_eq!(Theme::dark().toggled().name, "light");
    assert_eq!(Theme::light().toggled().name, "dark");
    assert_ne!(Theme::dark().background, Theme::light().background);
}

// ── Visualizer panel ─────────────────────────────────────────────────────────

#[test]
fn test_raster_size_for_area() {
    assert_eq!(raster_size(Rect::new(0, 0, 80, 20), 2), (160, 80));
    assert_eq!(raster_size(Rect::new(0, 0, 80, 20), 1), (80, 40));
    assert_eq!(raster_size(Rect::new(0, 0, 0, 0), 2), (1, 1));
}

#[test]
fn test_capture_stacks_two_pixels_per_cell() {
    let red = Rgb::new(255, 0, 0);
    let blue = Rgb::new(0, 0, 255);
    let mut raster = Raster::new(4, 4);
    raster.fill_rect(0.0, 0.0, 4.0, 1.0, red, 1.0).unwrap();
    raster.fill_rect(0.0, 1.0, 4.0, 1.0, blue, 1.0).unwrap();

    let mut panel = VisualizerPanel::new(1);
    panel.capture(&raster);
    assert_eq!(panel.size(), (4, 2));
    assert_eq!(panel.cell(0, 0), Some([red, blue]));
    assert_eq!(panel.cell(3, 1), Some([Rgb::BLACK, Rgb::BLACK]));
    assert_eq!(panel.cell(4, 0), None);
}

#[test]
fn test_capture_box_filters_supersampled_pixels() {
    let mut raster = Raster::new(4, 8);
    // Left column of the first 2x2 block only.
    raster.fill_rect(0.0, 0.0, 1.0, 2.0, Rgb::WHITE, 1.0).unwrap();

    let mut panel = VisualizerPanel::new(2);
    panel.capture(&raster);
    assert_eq!(panel.size(), (2, 2));
    let [top, bottom] = panel.cell(0, 0).unwrap();
    assert_eq!(top, Rgb::new(127, 127, 127));
    assert_eq!(bottom, Rgb::BLACK);
}

// ── App key handling ─────────────────────────────────────────────────────────

#[test]
fn test_app_starts_with_configured_mode() {
    let app = test_app();
    assert!(app.is_running());
    assert_eq!(app.engine.active_kind(), ModeKind::HexagonGrid);
    assert_eq!(app.theme.name, "dark");
    assert!(!app.show_help);
    let status = app.status_bar().status().unwrap();
    assert_eq!(status.mode, ModeKind::HexagonGrid);
}

#[test]
fn test_mode_keys() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('n'));
    tick(&mut app);
    assert_eq!(app.engine.active_index(), 1);

    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Left);
    tick(&mut app);
    assert_eq!(app.engine.active_index(), 7);

    press(&mut app, KeyCode::Char('6'));
    tick(&mut app);
    assert_eq!(app.engine.active_kind(), ModeKind::EnergyOrbs);

    press(&mut app, KeyCode::Char('9'));
    press(&mut app, KeyCode::Char('0'));
    tick(&mut app);
    assert_eq!(app.engine.active_index(), 5);
    assert_eq!(app.status_bar().status().unwrap().mode, ModeKind::EnergyOrbs);
}

#[test]
fn test_family_key() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('f'));
    tick(&mut app);
    assert_eq!(app.engine.family(), Family::Elemental);
    assert_eq!(app.engine.active_kind(), ModeKind::LightningStorm);
    press(&mut app, KeyCode::Char('f'));
    tick(&mut app);
    assert_eq!(app.engine.family(), Family::Geometric);
}

#[test]
fn test_space_pauses_visualizer() {
    let mut app = test_app();
    tick(&mut app);
    press(&mut app, KeyCode::Char(' '));
    tick(&mut app);
    assert!(!app.engine.is_enabled());
    assert!(!app.visualizer().is_enabled());
    assert_eq!(app.engine.active_slot().entity_count(), 0);

    press(&mut app, KeyCode::Char(' '));
    tick(&mut app);
    assert!(app.engine.is_enabled());
    assert!(app.visualizer().is_enabled());
}

#[test]
fn test_intensity_keys_clamp() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('+'));
    press(&mut app, KeyCode::Char('='));
    assert_eq!(app.engine.pending_intensity(), 1.5);
    tick(&mut app);
    assert_eq!(app.engine.intensity(), 1.5);

    for _ in 0..10 {
        press(&mut app, KeyCode::Char('-'));
    }
    tick(&mut app);
    assert_eq!(app.engine.intensity(), 0.25);

    for _ in 0..20 {
        press(&mut app, KeyCode::Char('+'));
    }
    tick(&mut app);
    assert_eq!(app.engine.intensity(), 3.0);
}

#[test]
fn test_theme_key_updates_background() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.theme.name, "light");
    tick(&mut app);
    assert_eq!(app.engine.background(), Theme::light().background);
}

#[test]
fn test_help_overlay_swallows_next_key() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('?'));
    assert!(app.show_help);
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.show_help);
    assert!(app.is_running());

    press(&mut app, KeyCode::Char('q'));
    assert!(!app.is_running());
}

#[test]
fn test_resize_sizes_raster_to_panel() {
    let mut app = test_app();
    app.handle_action(Action::Resize(100, 30)).unwrap();
    tick(&mut app);
    // The status bar takes four rows; each remaining row is two pixels tall.
    assert_eq!(app.engine.surface().width(), 200.0);
    assert_eq!(app.engine.surface().height(), 104.0);
    assert_eq!(app.visualizer().size(), (100, 26));
}

// ── Presentation ─────────────────────────────────────────────────────────────

#[test]
fn test_draw_renders_half_blocks_and_status() {
    let mut app = test_app();
    app.handle_action(Action::Resize(60, 14)).unwrap();
    tick(&mut app);

    let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
    let state = ui::DrawState {
        visualizer: app.visualizer(),
        status_bar: app.status_bar(),
        theme: &app.theme,
        show_help: false,
    };
    terminal.draw(|frame| ui::draw(frame, &state)).unwrap();

    let buffer = terminal.backend().buffer();
    assert_eq!(buffer[(0, 0)].symbol(), "▀");
    assert!(screen_text(&terminal).contains("Hexagon Grid"));
}

#[test]
fn test_draw_help_and_paused_states() {
    let mut app = test_app();
    app.handle_action(Action::Resize(60, 24)).unwrap();
    press(&mut app, KeyCode::Char(' '));
    tick(&mut app);

    let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
    let state = ui::DrawState {
        visualizer: app.visualizer(),
        status_bar: app.status_bar(),
        theme: &app.theme,
        show_help: false,
    };
    terminal.draw(|frame| ui::draw(frame, &state)).unwrap();
    assert!(screen_text(&terminal).contains("Visualizer paused"));

    let state = ui::DrawState {
        show_help: true,
        ..state
    };
    terminal.draw(|frame| ui::draw(frame, &state)).unwrap();
    assert!(screen_text(&terminal).contains("Keybindings"));
}

// ── Headless runner ──────────────────────────────────────────────────────────

#[test]
fn test_headless_report() {
    let options = EngineOptions {
        mode: 3,
        seed: 1,
        ..EngineOptions::default()
    };
    let mut driver = FixedStepDriver::new(16.0, 20);
    let report = headless::run(options, 64, 48, &mut driver);

    assert_eq!(report.mode, "Voronoi Cells");
    assert_eq!(report.family, "Geometric");
    assert_eq!((report.width, report.height), (64, 48));
    assert_eq!(report.state, "Active");
    assert_eq!(report.entities, 15);
    assert_eq!(report.stats.frames, 20);
    assert_eq!(report.stats.drawn, 20);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["stats"]["frames"], 20);
    assert!(json["performance"]["quality"].is_number());
}
