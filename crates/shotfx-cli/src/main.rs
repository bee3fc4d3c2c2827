//! shotfx - apply screenshot effect chains from the command line

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use image::{DynamicImage, ImageFormat};
use shotfx_core::{apply_effects, ImageEffect, RasterBuffer, Resolution};
use tracing_subscriber::EnvFilter;

mod chain;

use chain::EffectArg;

#[derive(Parser, Debug)]
#[command(name = "shotfx", version, about = "Apply screenshot effects to an image")]
#[command(long_about = "
Applies an ordered chain of effects to an image and prints the accumulated
affine transform (a b c d e f) that maps input coordinates to output.

Examples:
  shotfx in.png out.png -e border -e drop-shadow
  shotfx in.png out.png -e 'torn-edge=ToothHeight:8|Edges:True,False,True,False'
  shotfx in.png out.jpg -e 'resize=Width:800|Height:0|MaintainAspectRatio:True'
")]
struct Cli {
    /// Input image (PNG or JPEG).
    input: PathBuf,

    /// Output image; the format follows the extension.
    output: PathBuf,

    /// Effect to apply, as KIND or KIND=Key:Value|Key:Value. Repeatable, applied in order.
    #[arg(short = 'e', long = "effect", value_name = "KIND[=ENCODED]")]
    effects: Vec<EffectArg>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let effects: Vec<ImageEffect> = cli.effects.into_iter().map(|arg| arg.0).collect();
    for line in chain::describe(&effects) {
        tracing::info!(effect = %line, "queued");
    }

    let source = load(&cli.input)?;
    let (output, transform) = apply_effects(&source, &effects)
        .with_context(|| format!("apply effects to '{}'", cli.input.display()))?;
    save(&output, &cli.output)?;

    let [a, b, c, d, e, f] = transform.as_coeffs();
    println!("{a} {b} {c} {d} {e} {f}");
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<RasterBuffer> {
    let img = image::open(path).with_context(|| format!("open '{}'", path.display()))?;
    let buffer = RasterBuffer::from_rgba_image(img.to_rgba8(), Resolution::default());
    tracing::debug!(
        width = buffer.width,
        height = buffer.height,
        "loaded {}",
        path.display()
    );
    Ok(buffer)
}

fn save(buffer: &RasterBuffer, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("unknown output format for '{}'", path.display()))?;
    let rgba = buffer.to_rgba_image()?;

    // JPEG has no alpha channel
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba).to_rgb8()),
        _ => DynamicImage::ImageRgba8(rgba),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(path, format)
        .with_context(|| format!("write '{}'", path.display()))?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_effect_chain() {
        let cli = Cli::try_parse_from([
            "shotfx",
            "in.png",
            "out.png",
            "-e",
            "border=Width:3",
            "--effect",
            "invert",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.input, PathBuf::from("in.png"));
        assert_eq!(cli.effects.len(), 2);
        assert_eq!(cli.effects[1].0.kind(), shotfx_core::EffectKind::Invert);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_rejects_unknown_effect() {
        let result = Cli::try_parse_from(["shotfx", "in.png", "out.png", "-e", "sparkle"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
