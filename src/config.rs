// Config module - Configuration management and command-line argument parsing
use anyhow::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::field::PatternSelect;
use crate::patterns::Pattern;
use crate::render::Paints;
use crate::types::Rgb;

// Global storage for custom config path
static CUSTOM_CONFIG_PATH: OnceLock<Option<String>> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Procedural dot-matrix watchface for the terminal",
    long_about = "Renders a clock as a circular field of dots: a library of \
                  time-driven procedural patterns crossfades in the outer rows \
                  while bitmap digits morph in the middle band."
)]
pub struct Args {
    /// Color for positive intensities (hex, e.g. FFFFFF)
    #[arg(short = 'p', long)]
    pub positive_color: Option<String>,

    /// Color for negative intensities (hex, e.g. FF3E4B)
    #[arg(short = 'n', long)]
    pub negative_color: Option<String>,

    /// Target framerate
    #[arg(long)]
    pub fps: Option<f64>,

    /// Pattern selection: "cycle" or a fixed pattern name
    /// (noise, raindrops, alien, circles, sunrise, heart, heart2, xor)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Pattern cycle speed (library entries per second of epoch time)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Overlay drawn beneath the dots: "none" or "seconds"
    #[arg(long)]
    pub overlay: Option<String>,

    /// Config file path or name (e.g. --cfg /full/path or --cfg myface for
    /// ~/.config/dotclock/myface.conf)
    #[arg(long)]
    pub cfg: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    pub positive_color: String,
    pub negative_color: String,
    pub fps: f64,
    pub pattern: String,
    pub pattern_speed: f64,
    pub overlay: String,
}

impl Default for FaceConfig {
    fn default() -> Self {
        FaceConfig {
            config_path: None,
            positive_color: "FFFFFF".to_string(),
            negative_color: "FF3E4B".to_string(),
            fps: 60.0,
            pattern: "cycle".to_string(),
            pattern_speed: 0.025,
            overlay: "none".to_string(),
        }
    }
}

impl FaceConfig {
    pub fn merge_with_args(&mut self, args: &Args) -> bool {
        let mut args_provided = false;

        if let Some(ref color) = args.positive_color {
            self.positive_color = color.clone();
            args_provided = true;
        }
        if let Some(ref color) = args.negative_color {
            self.negative_color = color.clone();
            args_provided = true;
        }
        if let Some(fps) = args.fps {
            self.fps = fps;
            args_provided = true;
        }
        if let Some(ref pattern) = args.pattern {
            self.pattern = pattern.clone();
            args_provided = true;
        }
        if let Some(speed) = args.speed {
            self.pattern_speed = speed;
            args_provided = true;
        }
        if let Some(ref overlay) = args.overlay {
            self.overlay = overlay.clone();
            args_provided = true;
        }

        args_provided
    }

    /// Set the global config path (called once at startup)
    pub fn set_config_path(cfg: Option<String>) {
        let _ = CUSTOM_CONFIG_PATH.set(cfg);
    }

    fn get_config_path_arg() -> Option<&'static str> {
        CUSTOM_CONFIG_PATH.get().and_then(|opt| opt.as_deref())
    }

    pub fn config_path(cfg_arg: Option<&str>) -> Result<PathBuf> {
        // Priority: explicit arg > global > default location
        let cfg = cfg_arg.or_else(|| Self::get_config_path_arg());

        if let Some(cfg) = cfg {
            let path = PathBuf::from(cfg);
            if path.is_absolute() {
                return Ok(path);
            }
            if cfg.contains('/') || cfg.contains('\\') {
                return Ok(path);
            }

            // Otherwise treat as a config name in the config directory
            let config_dir = Self::config_dir()?;
            let filename = if cfg.ends_with(".conf") {
                cfg.to_string()
            } else {
                format!("{}.conf", cfg)
            };
            Ok(config_dir.join(filename))
        } else {
            Ok(Self::config_dir()?.join("config.conf"))
        }
    }

    fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        let config_dir = PathBuf::from(home).join(".config").join("dotclock");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    pub fn load_with_path(cfg_arg: Option<&str>) -> Result<Self> {
        let path = Self::config_path(cfg_arg)?;
        let contents = std::fs::read_to_string(&path)?;
        let mut parsed: Self = toml::from_str(&contents)?;
        parsed.config_path = Some(path);
        parsed.sanitize();
        Ok(parsed)
    }

    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    pub fn save(&self) -> Result<()> {
        let path = self
            .config_path
            .clone()
            .map_or_else(|| Self::config_path(None), Ok)?;
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Clamp out-of-range numeric values instead of failing on them.
    pub fn sanitize(&mut self) {
        if !self.fps.is_finite() || self.fps < 1.0 {
            self.fps = 1.0;
        }
        if self.fps > 240.0 {
            self.fps = 240.0;
        }
        if !self.pattern_speed.is_finite() || self.pattern_speed <= 0.0 {
            self.pattern_speed = 0.025;
        }
    }

    /// Resolve the configured colors into renderer paints.
    pub fn paints(&self) -> Result<Paints> {
        Ok(Paints {
            positive: Rgb::from_hex(&self.positive_color)?,
            negative: Rgb::from_hex(&self.negative_color)?,
        })
    }

    /// Resolve the pattern selection mode.
    pub fn pattern_select(&self) -> Result<PatternSelect> {
        if self.pattern.to_lowercase() == "cycle" {
            return Ok(PatternSelect::Cycle { speed: self.pattern_speed });
        }
        match Pattern::from_string(&self.pattern) {
            Some(p) => Ok(PatternSelect::Fixed(p)),
            None => anyhow::bail!("Unknown pattern: {}", self.pattern),
        }
    }

    pub fn seconds_overlay(&self) -> bool {
        self.overlay.to_lowercase() == "seconds"
    }
}
