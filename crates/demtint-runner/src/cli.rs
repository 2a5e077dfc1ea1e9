//! Command-line interface definition.

use crate::config::RenderConfig;
use crate::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Render DEM rasters as semi-transparent web map overlays.
#[derive(Debug, Parser)]
#[command(name = "demtint", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Color a DEM and write `<name>.png` plus a `<name>.json` overlay descriptor.
    Render(RenderArgs),
    /// List the available gradients.
    Gradients,
}

/// Flags for `demtint render`. Flags override values from `--config`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// GeoTIFF elevation raster.
    pub input: Option<PathBuf>,

    /// YAML render configuration.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Base name of the output files (defaults to the input file stem).
    #[arg(long)]
    pub name: Option<String>,

    /// Gradient name (see `demtint gradients`).
    #[arg(short, long)]
    pub gradient: Option<String>,

    /// Opacity of cells with data, in (0, 1].
    #[arg(long)]
    pub opacity: Option<f32>,

    /// No-data sentinel, overriding the file's GDAL_NODATA tag.
    #[arg(long, allow_hyphen_values = true)]
    pub no_data: Option<f32>,

    /// Elevation mapped to the low end of the gradient.
    #[arg(long, allow_hyphen_values = true, requires = "max")]
    pub min: Option<f32>,

    /// Elevation mapped to the high end of the gradient.
    #[arg(long, allow_hyphen_values = true, requires = "min")]
    pub max: Option<f32>,

    /// Keep every n-th row and column.
    #[arg(long)]
    pub stride: Option<usize>,

    /// Map cells on a single thread.
    #[arg(long)]
    pub sequential: bool,
}

impl RenderArgs {
    /// Merge the optional config file with the command-line flags.
    pub fn into_config(self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::from_yaml_file(path)?,
            None => RenderConfig::default(),
        };

        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if self.name.is_some() {
            config.name = self.name;
        }
        if let Some(gradient) = self.gradient {
            config.gradient = gradient;
        }
        if let Some(opacity) = self.opacity {
            config.opacity = opacity;
        }
        if self.no_data.is_some() {
            config.no_data = self.no_data;
        }
        if self.min.is_some() {
            config.value_min = self.min;
            config.value_max = self.max;
        }
        if let Some(stride) = self.stride {
            config.stride = stride;
        }
        if self.sequential {
            config.parallel = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(args: &[&str]) -> RenderArgs {
        let mut argv = vec!["demtint", "render"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Render(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_flags_into_config() {
        let config = render_args(&[
            "n48w123.tif",
            "--gradient",
            "viridis",
            "--opacity",
            "0.4",
            "--no-data",
            "-9999",
            "--min",
            "-50",
            "--max",
            "4000",
            "--stride",
            "8",
            "--sequential",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.input, PathBuf::from("n48w123.tif"));
        assert_eq!(config.gradient, "viridis");
        assert_eq!(config.opacity, 0.4);
        assert_eq!(config.no_data, Some(-9999.0));
        assert_eq!(config.value_min, Some(-50.0));
        assert_eq!(config.value_max, Some(4000.0));
        assert_eq!(config.stride, 8);
        assert!(!config.parallel);
    }

    #[test]
    fn test_min_requires_max() {
        assert!(Cli::try_parse_from(["demtint", "render", "a.tif", "--min", "0"]).is_err());
    }

    #[test]
    fn test_missing_input_rejected() {
        assert!(render_args(&[]).into_config().is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        std::fs::write(&path, "input: a.tif\ngradient: inferno\nstride: 2\n").unwrap();

        let config = render_args(&["--config", path.to_str().unwrap(), "--gradient", "terrain"])
            .into_config()
            .unwrap();
        assert_eq!(config.input, PathBuf::from("a.tif"));
        assert_eq!(config.gradient, "terrain");
        assert_eq!(config.stride, 2);
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["demtint", "gradients", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Gradients));
    }
}
