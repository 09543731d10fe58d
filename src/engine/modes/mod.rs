// Mode registry: the sixteen visual algorithms, their kind/family enums,
// the shared behavior trait, and the tagged `Mode` enum the scheduler owns.

pub mod aurora;
pub mod crystal;
pub mod dust;
pub mod fireflies;
pub mod hexagon;
pub mod lava;
pub mod lightning;
pub mod magnetic;
pub mod neural;
pub mod ocean;
pub mod orbs;
pub mod parallax;
pub mod rings;
pub mod smoke;
pub mod spiral;
pub mod voronoi;

use serde::{Deserialize, Serialize};

use super::sampler::FrequencySample;
use super::surface::{Rgb, Surface};

/// Number of modes in each family. Mode-change indices wrap modulo this.
pub const MODES_PER_FAMILY: usize = 8;

/// Everything a mode needs to lay itself out after a reset.
#[derive(Debug, Clone, Copy)]
pub struct ResetContext {
    pub width: f32,
    pub height: f32,
    pub seed: u64,
    pub hex_size: f32,
}

/// Per-frame inputs. `time` counts frames since the mode was last reset.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub sample: &'a FrequencySample,
    pub quality: f32,
    pub time: f32,
    pub now_ms: f64,
    pub width: f32,
    pub height: f32,
    /// Lightning intensity multiplier from settings.
    pub intensity: f32,
    pub background: Rgb,
}

/// How the scheduler prepares the surface before a mode draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    Clear,
    /// Blend the background over the previous frame at this alpha.
    Fade(f32),
}

/// The lifecycle hooks every mode implements.
pub trait ModeBehavior {
    /// Drop every entity and remember the new layout. Collections stay
    /// empty until `init_step` runs.
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()>;

    /// Build (part of) the entity collection. Returns `Ok(true)` once
    /// initialization is complete.
    fn init_step(&mut self) -> anyhow::Result<bool> {
        Ok(true)
    }

    fn update_and_draw(
        &mut self,
        frame: &FrameContext,
        surface: &mut dyn Surface,
    ) -> anyhow::Result<()>;

    /// Release all entities and timers, cancelling pending init batches.
    fn dispose(&mut self);

    fn entity_count(&self) -> usize;

    fn backdrop(&self) -> Backdrop {
        Backdrop::Clear
    }
}

/// The two groups of eight modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    #[default]
    Geometric,
    Elemental,
}

impl Family {
    pub fn modes(self) -> [ModeKind; MODES_PER_FAMILY] {
        use ModeKind::*;
        match self {
            Self::Geometric => [
                HexagonGrid,
                SpiralGalaxy,
                CrystalFormation,
                VoronoiCells,
                NeuralNetwork,
                EnergyOrbs,
                FrequencyRings,
                ParallaxStarfield,
            ],
            Self::Elemental => [
                LightningStorm,
                SmokePlume,
                OceanWaves,
                CosmicDust,
                MagneticField,
                LavaLamp,
                AuroraCurtains,
                Fireflies,
            ],
        }
    }

    /// Mode at `index`, wrapped modulo the family size.
    pub fn mode(self, index: usize) -> ModeKind {
        self.modes()[index % MODES_PER_FAMILY]
    }

    pub fn next(self) -> Self {
        match self {
            Self::Geometric => Self::Elemental,
            Self::Elemental => Self::Geometric,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Geometric => "Geometric",
            Self::Elemental => "Elemental",
        }
    }
}

/// Identifies one of the sixteen modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeKind {
    HexagonGrid,
    SpiralGalaxy,
    CrystalFormation,
    VoronoiCells,
    NeuralNetwork,
    EnergyOrbs,
    FrequencyRings,
    ParallaxStarfield,
    LightningStorm,
    SmokePlume,
    OceanWaves,
    CosmicDust,
    MagneticField,
    LavaLamp,
    AuroraCurtains,
    Fireflies,
}

impl ModeKind {
    pub fn family(self) -> Family {
        if Family::Geometric.modes().contains(&self) {
            Family::Geometric
        } else {
            Family::Elemental
        }
    }

    /// Position within the family.
    pub fn index(self) -> usize {
        self.family()
            .modes()
            .iter()
            .position(|&k| k == self)
            .unwrap_or(0)
    }

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::HexagonGrid => "Hexagon Grid",
            Self::SpiralGalaxy => "Spiral Galaxy",
            Self::CrystalFormation => "Crystal Formation",
            Self::VoronoiCells => "Voronoi Cells",
            Self::NeuralNetwork => "Neural Network",
            Self::EnergyOrbs => "Energy Orbs",
            Self::FrequencyRings => "Frequency Rings",
            Self::ParallaxStarfield => "Parallax Starfield",
            Self::LightningStorm => "Lightning Storm",
            Self::SmokePlume => "Smoke Plume",
            Self::OceanWaves => "Ocean Waves",
            Self::CosmicDust => "Cosmic Dust",
            Self::MagneticField => "Magnetic Field",
            Self::LavaLamp => "Lava Lamp",
            Self::AuroraCurtains => "Aurora Curtains",
            Self::Fireflies => "Fireflies",
        }
    }
}

/// A mode instance, tagged by kind.
pub enum Mode {
    HexagonGrid(hexagon::HexagonGrid),
    SpiralGalaxy(spiral::SpiralGalaxy),
    CrystalFormation(crystal::CrystalFormation),
    VoronoiCells(voronoi::VoronoiCells),
    NeuralNetwork(neural::NeuralNetwork),
    EnergyOrbs(orbs::EnergyOrbs),
    FrequencyRings(rings::FrequencyRings),
    ParallaxStarfield(parallax::ParallaxStarfield),
    LightningStorm(lightning::LightningStorm),
    SmokePlume(smoke::SmokePlume),
    OceanWaves(ocean::OceanWaves),
    CosmicDust(dust::CosmicDust),
    MagneticField(magnetic::MagneticField),
    LavaLamp(lava::LavaLamp),
    AuroraCurtains(aurora::AuroraCurtains),
    Fireflies(fireflies::Fireflies),
}

impl Mode {
    pub fn new(kind: ModeKind) -> Self {
        match kind {
            ModeKind::HexagonGrid => Self::HexagonGrid(Default::default()),
            ModeKind::SpiralGalaxy => Self::SpiralGalaxy(Default::default()),
            ModeKind::CrystalFormation => Self::CrystalFormation(Default::default()),
            ModeKind::VoronoiCells => Self::VoronoiCells(Default::default()),
            ModeKind::NeuralNetwork => Self::NeuralNetwork(Default::default()),
            ModeKind::EnergyOrbs => Self::EnergyOrbs(Default::default()),
            ModeKind::FrequencyRings => Self::FrequencyRings(Default::default()),
            ModeKind::ParallaxStarfield => Self::ParallaxStarfield(Default::default()),
            ModeKind::LightningStorm => Self::LightningStorm(Default::default()),
            ModeKind::SmokePlume => Self::SmokePlume(Default::default()),
            ModeKind::OceanWaves => Self::OceanWaves(Default::default()),
            ModeKind::CosmicDust => Self::CosmicDust(Default::default()),
            ModeKind::MagneticField => Self::MagneticField(Default::default()),
            ModeKind::LavaLamp => Self::LavaLamp(Default::default()),
            ModeKind::AuroraCurtains => Self::AuroraCurtains(Default::default()),
            ModeKind::Fireflies => Self::Fireflies(Default::default()),
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Self::HexagonGrid(_) => ModeKind::HexagonGrid,
            Self::SpiralGalaxy(_) => ModeKind::SpiralGalaxy,
            Self::CrystalFormation(_) => ModeKind::CrystalFormation,
            Self::VoronoiCells(_) => ModeKind::VoronoiCells,
            Self::NeuralNetwork(_) => ModeKind::NeuralNetwork,
            Self::EnergyOrbs(_) => ModeKind::EnergyOrbs,
            Self::FrequencyRings(_) => ModeKind::FrequencyRings,
            Self::ParallaxStarfield(_) => ModeKind::ParallaxStarfield,
            Self::LightningStorm(_) => ModeKind::LightningStorm,
            Self::SmokePlume(_) => ModeKind::SmokePlume,
            Self::OceanWaves(_) => ModeKind::OceanWaves,
            Self::CosmicDust(_) => ModeKind::CosmicDust,
            Self::MagneticField(_) => ModeKind::MagneticField,
            Self::LavaLamp(_) => ModeKind::LavaLamp,
            Self::AuroraCurtains(_) => ModeKind::AuroraCurtains,
            Self::Fireflies(_) => ModeKind::Fireflies,
        }
    }

    pub fn behavior(&self) -> &dyn ModeBehavior {
        match self {
            Self::HexagonGrid(m) => m,
            Self::SpiralGalaxy(m) => m,
            Self::CrystalFormation(m) => m,
            Self::VoronoiCells(m) => m,
            Self::NeuralNetwork(m) => m,
            Self::EnergyOrbs(m) => m,
            Self::FrequencyRings(m) => m,
            Self::ParallaxStarfield(m) => m,
            Self::LightningStorm(m) => m,
            Self::SmokePlume(m) => m,
            Self::OceanWaves(m) => m,
            Self::CosmicDust(m) => m,
            Self::MagneticField(m) => m,
            Self::LavaLamp(m) => m,
            Self::AuroraCurtains(m) => m,
            Self::Fireflies(m) => m,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn ModeBehavior {
        match self {
            Self::HexagonGrid(m) => m,
            Self::SpiralGalaxy(m) => m,
            Self::CrystalFormation(m) => m,
            Self::VoronoiCells(m) => m,
            Self::NeuralNetwork(m) => m,
            Self::EnergyOrbs(m) => m,
            Self::FrequencyRings(m) => m,
            Self::ParallaxStarfield(m) => m,
            Self::LightningStorm(m) => m,
            Self::SmokePlume(m) => m,
            Self::OceanWaves(m) => m,
            Self::CosmicDust(m) => m,
            Self::MagneticField(m) => m,
            Self::LavaLamp(m) => m,
            Self::AuroraCurtains(m) => m,
            Self::Fireflies(m) => m,
        }
    }
}

// ── Shared helpers ───────────────────────────────────────────────────────────

/// Fail a reset that has nothing to lay out on.
pub(crate) fn ensure_area(width: f32, height: f32) -> anyhow::Result<()> {
    anyhow::ensure!(
        width.is_finite() && height.is_finite() && width >= 1.0 && height >= 1.0,
        "surface has no drawable area ({width}x{height})"
    );
    Ok(())
}

/// Move `current` a fraction `rate` of the way toward `target`.
pub(crate) fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// `count` scaled by quality, never zero for a non-empty collection.
pub(crate) fn scaled_count(count: usize, quality: f32) -> usize {
    ((count as f32 * quality.clamp(0.0, 1.0)).ceil() as usize).min(count)
}

/// Seeded RNG so each reset of a mode is reproducible.
pub(crate) fn mode_rng(seed: u64, kind: ModeKind) -> fastrand::Rng {
    fastrand::Rng::with_seed(seed ^ (kind as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Uniform value in `lo..hi`.
pub(crate) fn range(rng: &mut fastrand::Rng, lo: f32, hi: f32) -> f32 {
    lo + rng.f32() * (hi - lo)
}
