//! Configuration loading for sketchbook.
//!
//! Configuration is layered: `config.default.toml`, then the file named on
//! the command line, then `SKETCHBOOK_*` environment variables with `__`
//! between section and key (`SKETCHBOOK_OUTPUT__WIDTH=512`).

use crate::error::Result;
use crate::nn::ModelKind;
use crate::sketches::SketchContext;
use crate::stream::FrameSettings;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config.default.toml";
pub const ENV_PREFIX: &str = "SKETCHBOOK";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SketchbookConfig {
    #[serde(default)]
    pub output: OutputConfig,

    /// Fixed seed for every sketch; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

/// Frame overrides. A missing key keeps the sketch's own value.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub framerate: Option<u32>,

    #[serde(default)]
    pub length: Option<u32>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            width: None,
            height: None,
            framerate: None,
            length: None,
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("output")
}

impl OutputConfig {
    /// Lay these overrides over a sketch's defaults.
    pub fn apply(&self, defaults: FrameSettings) -> FrameSettings {
        FrameSettings {
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            framerate: self.framerate.unwrap_or(defaults.framerate),
            length: self.length.unwrap_or(defaults.length),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ImageConfig {
    /// Source picture for sketches that sample one.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub kind: ModelKind,

    #[serde(default = "default_depth")]
    pub depth: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::default(),
            depth: default_depth(),
        }
    }
}

fn default_depth() -> usize {
    2
}

/// Command-line values that win over both the config file and the sketch's
/// own defaults. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub framerate: Option<u32>,
    pub length: Option<u32>,
    pub seed: Option<u64>,
    pub image: Option<PathBuf>,
    pub model: Option<ModelKind>,
    pub depth: Option<usize>,
}

impl RunOverrides {
    fn frame(&self) -> OutputConfig {
        OutputConfig {
            width: self.width,
            height: self.height,
            framerate: self.framerate,
            length: self.length,
            ..OutputConfig::default()
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl SketchbookConfig {
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_layers(path, environment())
    }

    fn load_layers(path: &Path, env: Environment) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse a single TOML document with no other layers.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Construction context for a sketch run with `seed`.
    pub fn context(&self, seed: u64) -> SketchContext {
        SketchContext {
            seed,
            model: self.model.kind,
            depth: self.model.depth,
            image: self.image.path.clone(),
        }
    }

    /// Seed for a run: the flag, then the config file. `None` means pick one.
    pub fn seed(&self, flags: &RunOverrides) -> Option<u64> {
        flags.seed.or(self.seed)
    }

    /// Frame settings with flags over config over `defaults`.
    pub fn frame_settings(&self, defaults: FrameSettings, flags: &RunOverrides) -> FrameSettings {
        flags.frame().apply(self.output.apply(defaults))
    }

    /// [`Self::context`] with the model, depth and image flags laid on top.
    pub fn resolve_context(&self, seed: u64, flags: &RunOverrides) -> SketchContext {
        let mut ctx = self.context(seed);
        if let Some(model) = flags.model {
            ctx.model = model;
        }
        if let Some(depth) = flags.depth {
            ctx.depth = depth;
        }
        if flags.image.is_some() {
            ctx.image = flags.image.clone();
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = SketchbookConfig::load(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.output.directory, PathBuf::from("output"));
        assert_eq!(config.model.depth, 2);
        assert_eq!(config.model.kind, ModelKind::Dense);
        assert!(config.image.path.is_none());
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let config = SketchbookConfig::from_toml(
            r#"
            seed = 11

            [output]
            width = 512

            [model]
            kind = "transformer"
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.output.width, Some(512));
        assert_eq!(config.output.height, None);
        assert_eq!(config.model.kind, ModelKind::Transformer);
        assert_eq!(config.model.depth, 2);
    }

    #[test]
    fn overrides_apply_per_field() {
        let output = OutputConfig {
            width: Some(64),
            length: Some(1),
            ..OutputConfig::default()
        };
        let settings = output.apply(FrameSettings::new(1024, 1024, 15, 6));
        assert_eq!(settings, FrameSettings::new(64, 1024, 15, 1));
    }

    #[test]
    fn unknown_model_is_an_error() {
        assert!(SketchbookConfig::from_toml("[model]\nkind = \"lstm\"\n").is_err());
    }

    #[test]
    fn context_carries_model_and_image() {
        let config = SketchbookConfig::from_toml(
            "[model]\nkind = \"resnet\"\ndepth = 3\n[image]\npath = \"in.png\"\n",
        )
        .unwrap();
        let ctx = config.context(5);
        assert_eq!(ctx.seed, 5);
        assert_eq!(ctx.model, ModelKind::ResNet);
        assert_eq!(ctx.depth, 3);
        assert_eq!(ctx.image, Some(PathBuf::from("in.png")));
    }

    #[test]
    fn environment_layer_uses_double_underscore() {
        let mut vars = ::config::Map::new();
        vars.insert("SKETCHBOOK_OUTPUT__WIDTH".to_string(), "512".to_string());
        vars.insert("SKETCHBOOK_SEED".to_string(), "77".to_string());
        vars.insert("SKETCHBOOK_MODEL__KIND".to_string(), "transformer".to_string());
        vars.insert("OTHER_SEED".to_string(), "3".to_string());

        let config = SketchbookConfig::load_layers(
            Path::new("does-not-exist.toml"),
            environment().source(Some(vars)),
        )
        .unwrap();
        assert_eq!(config.output.width, Some(512));
        assert_eq!(config.output.height, None);
        assert_eq!(config.seed, Some(77));
        assert_eq!(config.model.kind, ModelKind::Transformer);
        assert_eq!(config.model.depth, 2);
    }

    #[test]
    fn flags_win_over_config_over_defaults() {
        let config = SketchbookConfig::from_toml(
            "seed = 9\n[output]\nwidth = 512\nheight = 300\n",
        )
        .unwrap();
        let flags = RunOverrides {
            height: Some(100),
            length: Some(2),
            ..RunOverrides::default()
        };
        let settings = config.frame_settings(FrameSettings::new(1024, 1024, 15, 6), &flags);
        assert_eq!(settings, FrameSettings::new(512, 100, 15, 2));

        assert_eq!(config.seed(&flags), Some(9));
        let flags = RunOverrides {
            seed: Some(4),
            ..flags
        };
        assert_eq!(config.seed(&flags), Some(4));
        assert_eq!(SketchbookConfig::default().seed(&RunOverrides::default()), None);
    }

    #[test]
    fn context_flags_replace_only_what_they_name() {
        let config = SketchbookConfig::from_toml(
            "[model]\nkind = \"resnet\"\ndepth = 3\n[image]\npath = \"in.png\"\n",
        )
        .unwrap();

        let ctx = config.resolve_context(1, &RunOverrides::default());
        assert_eq!(ctx.model, ModelKind::ResNet);
        assert_eq!(ctx.depth, 3);
        assert_eq!(ctx.image, Some(PathBuf::from("in.png")));

        let flags = RunOverrides {
            model: Some(ModelKind::Transformer),
            image: Some(PathBuf::from("other.png")),
            ..RunOverrides::default()
        };
        let ctx = config.resolve_context(1, &flags);
        assert_eq!(ctx.model, ModelKind::Transformer);
        assert_eq!(ctx.depth, 3);
        assert_eq!(ctx.image, Some(PathBuf::from("other.png")));
    }
}
