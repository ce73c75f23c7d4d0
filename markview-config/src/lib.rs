//! Shared configuration loader for markview.
//!
//! `defaults/markview.default.toml` is embedded into every binary so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those defaults via
//! [`Loader`] before deserializing into [`MarkviewConfig`].

use config::builder::DefaultState;
pub use config::ConfigError;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use markview_engine::markup::spans::Category;
use markview_engine::ReflowOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/markview.default.toml");

/// Top-level configuration consumed by markview applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkviewConfig {
    pub reflow: ReflowConfig,
    pub render: RenderConfig,
}

/// Mirrors [`ReflowOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct ReflowConfig {
    pub indent_unit: String,
    pub guard_literals: bool,
    pub flat_declarations: bool,
}

impl ReflowConfig {
    pub fn to_options(&self) -> ReflowOptions {
        ReflowOptions::default()
            .with_indent_unit(self.indent_unit.clone())
            .with_guard_literals(self.guard_literals)
            .with_flat_declarations(self.flat_declarations)
    }

    /// An indent unit holding a line break would split every indented line in two.
    fn check(&self) -> Result<(), ConfigError> {
        if self.indent_unit.contains(['\n', '\r']) {
            return Err(ConfigError::Message(format!(
                "reflow.indent_unit must not contain line breaks, got {:?}",
                self.indent_unit
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub color: ColorMode,
    pub italic_comments: bool,
    pub bold_tag_names: bool,
    pub palette: PaletteConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// One terminal colour per display category.
#[derive(Debug, Clone, Deserialize)]
pub struct PaletteConfig {
    pub punctuation: PaletteColor,
    pub tag_name: PaletteColor,
    pub attribute_name: PaletteColor,
    pub attribute_value: PaletteColor,
    pub text: PaletteColor,
    pub comment: PaletteColor,
    pub processing_instruction: PaletteColor,
}

impl PaletteConfig {
    pub fn color_for(&self, category: Category) -> PaletteColor {
        match category {
            Category::Punctuation => self.punctuation,
            Category::TagName => self.tag_name,
            Category::AttributeName => self.attribute_name,
            Category::AttributeValue => self.attribute_value,
            Category::Text => self.text,
            Category::Comment => self.comment,
            Category::ProcessingInstruction => self.processing_instruction,
        }
    }
}

/// The sixteen ANSI colours plus the terminal default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteColor {
    Reset,
    Black,
    DarkGrey,
    Grey,
    Red,
    DarkRed,
    Green,
    DarkGreen,
    Yellow,
    DarkYellow,
    Blue,
    DarkBlue,
    Magenta,
    DarkMagenta,
    Cyan,
    DarkCyan,
    White,
}

/// Settings sources for a [MarkviewConfig], lowest precedence first: the embedded defaults,
/// then each file in the order it was added, then overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file that has to exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists, such as a `markview.toml` next to the document.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(file);
        self
    }

    /// Set one dotted key, e.g. `reflow.indent_unit`, above every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge all layers into a checked [MarkviewConfig].
    pub fn build(self) -> Result<MarkviewConfig, ConfigError> {
        let config: MarkviewConfig = self.builder.build()?.try_deserialize()?;
        config.reflow.check()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<MarkviewConfig, ConfigError> {
    Loader::new().build()
}
