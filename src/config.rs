use crate::gfx::math::Color;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on `parts`; more stages than this cannot be told apart on screen.
pub const MAX_PARTS: u32 = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,

    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default)]
    pub variant: Variant,

    #[serde(default = "default_parts")]
    pub parts: u32,

    #[serde(default = "default_size_factor")]
    pub size_factor: f32,

    #[serde(default)]
    pub stroke: StrokeConfig,

    /// Progress added per tick; derived from `variant` and `parts` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f32>,

    /// Tick interval; derived from `variant` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,

    #[serde(default)]
    pub surface: SurfaceConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Eased with `sinify`, `parts * 2` stages, 20ms ticks.
    #[default]
    Oscillating,
    /// Plain progress, `parts` stages, 90ms ticks.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StrokeConfig {
    /// Width is `min(width, height) / factor`.
    Relative { factor: f32 },
    Fixed { width: f32 },
}

impl Default for StrokeConfig {
    fn default() -> Self {
        StrokeConfig::Relative { factor: 90.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Fixed surface size; the surface covers the whole output when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,

    #[serde(default = "default_anchor")]
    pub anchor: Anchor,

    #[serde(default = "default_margins")]
    pub margins: Margins,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            size: None,
            anchor: default_anchor(),
            margins: default_margins(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            background: default_background(),
            variant: Variant::default(),
            parts: default_parts(),
            size_factor: default_size_factor(),
            stroke: StrokeConfig::default(),
            gap: None,
            delay_ms: None,
            surface: SurfaceConfig::default(),
        }
    }
}

fn default_colors() -> Vec<String> {
    ["#2196F3", "#4CAF50", "#F44336", "#3F51B5", "#FF9800"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_background() -> String {
    "#bdbdbd".to_string()
}

fn default_parts() -> u32 {
    4
}

fn default_size_factor() -> f32 {
    2.9
}

fn default_anchor() -> Anchor {
    Anchor::Center
}

fn default_margins() -> Margins {
    Margins {
        top: 0,
        right: 0,
        bottom: 0,
        left: 0,
    }
}

/// How one progress value is split into drawing stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagePlan {
    pub parts: u32,
    /// Distance between the stage indices that drive the shape.
    pub stride: u32,
    /// Run progress through `sinify` before staging.
    pub eased: bool,
}

impl StagePlan {
    pub fn stage_count(&self) -> u32 {
        self.parts.saturating_mul(self.stride)
    }
}

/// Validated, immutable settings handed to the renderer. Only
/// [`Config::scene`] builds one, so `colors` is never empty.
#[derive(Debug, Clone)]
pub struct Scene {
    colors: Vec<Color>,
    background: Color,
    plan: StagePlan,
    stroke: StrokeConfig,
    size_factor: f32,
    gap: f32,
    interval: Duration,
}

impl Scene {
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn plan(&self) -> &StagePlan {
        &self.plan
    }

    pub fn stroke(&self) -> StrokeConfig {
        self.stroke
    }

    pub fn size_factor(&self) -> f32 {
        self.size_factor
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("anglechain").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            Self::from_toml(&contents).with_context(|| format!("parsing {}", config_path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::path()?;
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn plan(&self) -> StagePlan {
        match self.variant {
            Variant::Oscillating => StagePlan { parts: self.parts, stride: 2, eased: true },
            Variant::Linear => StagePlan { parts: self.parts, stride: 1, eased: false },
        }
    }

    pub fn gap(&self) -> f32 {
        self.gap.unwrap_or_else(|| match self.variant {
            Variant::Oscillating => 0.02 / (self.parts as f32 * 2.0),
            Variant::Linear => 0.1 / self.parts as f32,
        })
    }

    pub fn interval(&self) -> Duration {
        let ms = self.delay_ms.unwrap_or(match self.variant {
            Variant::Oscillating => 20,
            Variant::Linear => 90,
        });
        Duration::from_millis(ms)
    }

    /// Validates the config and resolves it into a [`Scene`].
    pub fn scene(&self) -> Result<Scene> {
        ensure!(!self.colors.is_empty(), "at least one color is required");
        ensure!(
            self.parts > 0 && self.parts <= MAX_PARTS,
            "parts must be in 1..={}, got {}",
            MAX_PARTS,
            self.parts
        );
        ensure!(self.size_factor > 0.0, "size_factor must be positive");
        match self.stroke {
            StrokeConfig::Relative { factor } => ensure!(factor > 0.0, "stroke factor must be positive"),
            StrokeConfig::Fixed { width } => ensure!(width > 0.0, "stroke width must be positive"),
        }

        let gap = self.gap();
        ensure!(gap > 0.0 && gap <= 1.0, "gap must be in (0, 1], got {}", gap);
        let interval = self.interval();
        ensure!(!interval.is_zero(), "delay_ms must be positive");

        let colors = self
            .colors
            .iter()
            .map(|c| Color::from_hex(c))
            .collect::<Result<Vec<_>>>()?;
        let background = Color::from_hex(&self.background)?;

        Ok(Scene {
            colors,
            background,
            plan: self.plan(),
            stroke: self.stroke,
            size_factor: self.size_factor,
            gap,
            interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_resolves() {
        let scene = Config::default().scene().unwrap();
        assert_eq!(scene.colors.len(), 5);
        assert_eq!(scene.colors[0], Color::rgba(0x21, 0x96, 0xF3, 255));
        assert_eq!(scene.plan, StagePlan { parts: 4, stride: 2, eased: true });
        assert!((scene.gap - 0.0025).abs() < 1e-7);
        assert_eq!(scene.interval, Duration::from_millis(20));
    }

    #[test]
    fn linear_variant_uses_its_own_preset() {
        let config = Config::from_toml("variant = \"linear\"\n").unwrap();
        let scene = config.scene().unwrap();
        assert_eq!(scene.plan, StagePlan { parts: 4, stride: 1, eased: false });
        assert_eq!(scene.plan.stage_count(), 4);
        assert_eq!(scene.interval, Duration::from_millis(90));
        assert!((scene.gap - 0.025).abs() < 1e-7);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r##"
            colors = ["#000000", "#ffffff"]
            delay_ms = 5

            [stroke]
            kind = "fixed"
            width = 3.0

            [surface]
            size = { width = 400, height = 300 }
            "##,
        )
        .unwrap();

        assert_eq!(config.colors.len(), 2);
        assert_eq!(config.background, "#bdbdbd");
        assert_eq!(config.stroke, StrokeConfig::Fixed { width: 3.0 });
        assert_eq!(config.surface.size, Some(Size { width: 400, height: 300 }));
        assert_eq!(config.surface.anchor, Anchor::Center);
        assert_eq!(config.interval(), Duration::from_millis(5));
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut config = Config::default();
        config.colors.clear();
        assert!(config.scene().is_err());

        let mut config = Config::default();
        config.parts = 0;
        assert!(config.scene().is_err());

        let mut config = Config::default();
        config.gap = Some(0.0);
        assert!(config.scene().is_err());

        let mut config = Config::default();
        config.colors.push("blue".to_string());
        assert!(config.scene().is_err());

        let mut config = Config::default();
        config.delay_ms = Some(0);
        assert!(config.scene().is_err());
    }

    #[test]
    fn rejects_oversized_parts() {
        let config = Config::from_toml("parts = 3000000000\n").unwrap();
        assert!(config.scene().is_err());

        let config = Config::from_toml("variant = \"linear\"\nparts = 3000000000\n").unwrap();
        assert!(config.scene().is_err());

        let mut config = Config::default();
        config.parts = MAX_PARTS;
        assert!(config.scene().is_ok());
        config.parts = MAX_PARTS + 1;
        assert!(config.scene().is_err());
    }

    #[test]
    fn stage_count_saturates() {
        let plan = StagePlan { parts: u32::MAX, stride: 2, eased: true };
        assert_eq!(plan.stage_count(), u32::MAX);
    }

    #[test]
    fn scene_exposes_resolved_values() {
        let mut config = Config::default();
        config.colors = vec!["#ff0000".to_string()];
        config.stroke = StrokeConfig::Fixed { width: 4.0 };
        let scene = config.scene().unwrap();
        assert_eq!(scene.colors(), &[Color::rgba(255, 0, 0, 255)]);
        assert_eq!(scene.background(), Color::rgba(0xbd, 0xbd, 0xbd, 255));
        assert_eq!(scene.stroke(), StrokeConfig::Fixed { width: 4.0 });
        assert_eq!(scene.size_factor(), 2.9);
        assert!((scene.gap() - 0.0025).abs() < 1e-7);
        assert_eq!(scene.interval(), Duration::from_millis(20));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.colors, config.colors);
        assert_eq!(parsed.variant, config.variant);
        assert_eq!(parsed.stroke, config.stroke);
    }
}
