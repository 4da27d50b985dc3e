//! Viewer settings, persisted as JSON in the user's config directory

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use shared::{DimensionReadout, Dimensions};

use crate::geometry::{AnalysisOptions, NormalMode};

/// Length unit used to label dimensions.
///
/// STL files carry no units; this only changes the suffix shown next to the
/// numbers, never the numbers themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    Millimeters,
    Centimeters,
    Meters,
    Inches,
}

impl Units {
    /// Get the abbreviation for this unit
    pub fn abbrev(&self) -> &'static str {
        match self {
            Units::Millimeters => "mm",
            Units::Centimeters => "cm",
            Units::Meters => "m",
            Units::Inches => "in",
        }
    }

    /// Get the display name for this unit
    pub fn display_name(&self) -> &'static str {
        match self {
            Units::Millimeters => "Millimeters",
            Units::Centimeters => "Centimeters",
            Units::Meters => "Meters",
            Units::Inches => "Inches",
        }
    }

    /// All available units
    pub fn all() -> &'static [Units] {
        &[Units::Millimeters, Units::Centimeters, Units::Meters, Units::Inches]
    }
}

/// UI language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    En,
    Fr,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Fr]
    }
}

/// Grid display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Show grid
    pub visible: bool,
    /// Grid cell size in model units (ignored when `fit_to_model` is on)
    pub size: f32,
    /// Number of grid lines in each direction from origin
    pub range: i32,
    /// Grid line opacity (0.0 - 1.0)
    pub opacity: f32,
    /// Pick the cell size from the loaded model's extent
    pub fit_to_model: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 10.0,
            range: 10,
            opacity: 0.6,
            fit_to_model: true,
        }
    }
}

impl GridSettings {
    /// Cell size to draw for a model of the given diagonal
    pub fn cell_size_for(&self, diagonal: Option<f32>) -> f32 {
        match diagonal {
            Some(d) if self.fit_to_model && d.is_finite() && d > 0.0 => {
                // Power of ten so that the grid spans roughly the model
                let target = d / self.range.max(1) as f32;
                10f32.powf(target.log10().round())
            }
            _ => self.size,
        }
    }
}

/// Axis display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    /// Show axes
    pub visible: bool,
    /// Axis length as a fraction of the grid extent
    pub length: f32,
    /// Show axis labels (X, Y, Z)
    pub show_labels: bool,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            visible: true,
            length: 0.5,
            show_labels: true,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Model surface color RGB
    pub model_color: [u8; 3],
    /// Enable anti-aliasing
    pub antialiasing: bool,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
            model_color: [0, 212, 255],
            antialiasing: true,
        }
    }
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    pub language: Language,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Language::En,
        }
    }
}

/// Dimension readout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionSettings {
    /// Number of decimal places for dimension values
    pub precision: usize,
    /// Show dimension units suffix
    pub show_units: bool,
}

impl Default for DimensionSettings {
    fn default() -> Self {
        Self {
            precision: 2,
            show_units: true,
        }
    }
}

impl DimensionSettings {
    /// Readout strings for `dims`, with the unit suffix when enabled
    pub fn readout(&self, dims: &Dimensions, units: Units) -> DimensionReadout {
        let mut readout = dims.formatted(self.precision);
        if self.show_units {
            for value in [&mut readout.width, &mut readout.height, &mut readout.depth] {
                value.push(' ');
                value.push_str(units.abbrev());
            }
        }
        readout
    }
}

/// What to do with a selection above the size ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeLimitPolicy {
    /// Refuse the selection
    Reject,
    /// Load it anyway and log a warning
    #[default]
    Warn,
}

/// Selection screening and analysis options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingSettings {
    /// Size ceiling in bytes; `None` disables the check
    pub size_limit_bytes: Option<u64>,
    pub size_limit_policy: SizeLimitPolicy,
    /// Refuse names that do not end in `.stl`
    pub require_stl_extension: bool,
    pub normal_mode: NormalMode,
    /// Weld shared corners into an index buffer
    pub build_index: bool,
}

impl Default for LoadingSettings {
    fn default() -> Self {
        Self {
            size_limit_bytes: Some(256 * 1024 * 1024),
            size_limit_policy: SizeLimitPolicy::Warn,
            require_stl_extension: true,
            normal_mode: NormalMode::Smooth,
            build_index: true,
        }
    }
}

impl LoadingSettings {
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            normal_mode: self.normal_mode,
            build_index: self.build_index,
        }
    }
}

/// All viewer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerSettings {
    /// Units label for dimensions
    pub units: Units,
    pub grid: GridSettings,
    pub axes: AxisSettings,
    pub viewport: ViewportSettings,
    pub ui: UiSettings,
    pub dimensions: DimensionSettings,
    pub loading: LoadingSettings,
}

impl ViewerSettings {
    /// Default settings file location
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stl-viewer", "stl-viewer")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load from an explicit path; missing or unparsable files yield defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::error!("Failed to save settings: {}", e);
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: ViewerSettings =
            serde_json::from_str(r#"{"dimensions":{"precision":3}}"#).unwrap();
        assert_eq!(settings.dimensions.precision, 3);
        assert!(settings.dimensions.show_units);
        assert_eq!(settings.loading, LoadingSettings::default());
    }

    #[test]
    fn test_readout_with_and_without_units() {
        let dims = Dimensions {
            width: 10.123,
            height: 5.0,
            depth: 2.5,
        };
        let mut settings = DimensionSettings::default();
        let readout = settings.readout(&dims, Units::Millimeters);
        assert_eq!(readout.width, "10.12 mm");
        assert_eq!(readout.depth, "2.50 mm");

        settings.show_units = false;
        settings.precision = 1;
        assert_eq!(settings.readout(&dims, Units::Inches).height, "5.0");
    }

    #[test]
    fn test_grid_cell_fits_model() {
        let grid = GridSettings::default();
        assert_eq!(grid.cell_size_for(None), 10.0);
        assert_eq!(grid.cell_size_for(Some(100.0)), 10.0);
        approx::assert_relative_eq!(grid.cell_size_for(Some(1.0)), 0.1, epsilon = 1e-6);

        let fixed = GridSettings {
            fit_to_model: false,
            ..GridSettings::default()
        };
        assert_eq!(fixed.cell_size_for(Some(1.0)), 10.0);
    }
}
