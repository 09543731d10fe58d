// User configuration loaded from ~/.config/radiolume/config.toml.
// Falls back to sensible defaults when the file is missing.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::modes::hexagon::DEFAULT_HEX_SIZE;
use crate::engine::modes::Family;
use crate::engine::sampler::DEFAULT_FFT_SIZE;
use crate::engine::EngineOptions;
use crate::theme::{Theme, THEME_DARK};

/// Analysis window bounds; sizes in between round up to a power of two.
pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32768;
/// Largest raster pixels-per-column factor.
pub const MAX_SUPERSAMPLE: u16 = 8;

/// Application configuration, deserialized from `~/.config/radiolume/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub visualizer: VisualizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Target TUI refresh rate in frames per second (default: 30).
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
    /// Raster pixels per terminal column (default: 2).
    #[serde(default = "default_supersample")]
    pub supersample: u16,
    /// Directory for `radiolume.log` (default: platform data dir).
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_frame_rate() -> f64 {
    30.0
}

fn default_supersample() -> u16 {
    2
}

impl GeneralConfig {
    /// Supersample factor limited to `1..=MAX_SUPERSAMPLE`.
    pub fn supersample(&self) -> u16 {
        self.supersample.clamp(1, MAX_SUPERSAMPLE)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            supersample: default_supersample(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualizerConfig {
    #[serde(default)]
    pub family: Family,
    #[serde(default)]
    pub mode: usize,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_intensity")]
    pub lightning_intensity: f32,
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_hex_size")]
    pub hex_size: f32,
    /// Fixed seed for reproducible layouts. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

fn default_theme() -> String {
    THEME_DARK.to_string()
}

fn default_intensity() -> f32 {
    1.0
}

fn default_fft_size() -> usize {
    DEFAULT_FFT_SIZE
}

fn default_hex_size() -> f32 {
    DEFAULT_HEX_SIZE
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            family: Family::default(),
            mode: 0,
            enabled: default_enabled(),
            theme: default_theme(),
            lightning_intensity: default_intensity(),
            fft_size: default_fft_size(),
            hex_size: default_hex_size(),
            seed: None,
        }
    }
}

impl VisualizerConfig {
    /// Engine settings for this configuration. Out-of-range values are
    /// clamped rather than rejected.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            family: self.family,
            mode: self.mode,
            enabled: self.enabled,
            background: Theme::from_name(&self.theme).background,
            lightning_intensity: self.lightning_intensity.clamp(0.25, 3.0),
            fft_size: self.fft_size.clamp(MIN_FFT_SIZE, MAX_FFT_SIZE).next_power_of_two(),
            hex_size: if self.hex_size.is_finite() && self.hex_size >= 4.0 {
                self.hex_size
            } else {
                DEFAULT_HEX_SIZE
            },
            seed: self.seed.unwrap_or_else(|| fastrand::u64(..)),
        }
    }
}

impl Config {
    /// Read config from disk, or return defaults if the file doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("radiolume")
            .join("config.toml")
    }
}
