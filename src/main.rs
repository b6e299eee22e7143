#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use gl_options::config::{ConfigStore, DesktopBounds, Environment};
use gl_options::{SettingsContext, gui};

/// Renderer settings panel host
#[derive(Parser, Debug)]
#[command(version, about = "Edit renderer settings with a staged settings panel")]
struct Args {
    /// Settings file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Desktop size used for window ranges, as WxH
    #[arg(short, long, value_parser = parse_desktop, default_value = "1920x1080")]
    desktop: DesktopBounds,

    /// Renderer runs in glide mode
    #[arg(short, long)]
    glide: bool,

    /// Print the normalized settings document and exit
    #[arg(short, long)]
    print: bool,
}

fn parse_desktop(raw: &str) -> Result<DesktopBounds> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("expected WxH, got {raw:?}"))?;
    let width = w.trim().parse().with_context(|| format!("invalid width {w:?}"))?;
    let height = h.trim().parse().with_context(|| format!("invalid height {h:?}"))?;
    Ok(DesktopBounds { x: 0, y: 0, width, height })
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let env = Environment {
        desktop: args.desktop,
        glide: args.glide,
        ..Environment::default()
    };
    let path = args.config.unwrap_or_else(ConfigStore::default_path);
    info!(path = %path.display(), desktop = ?env.desktop, glide = env.glide, "Starting settings host");

    let settings = SettingsContext::load(path, env);
    if args.print {
        print!("{}", settings.store().document());
        return Ok(());
    }

    gui::run_gui(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_desktop() {
        let bounds = parse_desktop("2560x1440").expect("valid");
        assert_eq!((bounds.width, bounds.height), (2560, 1440));
        assert!(parse_desktop("2560").is_err());
        assert!(parse_desktop("widexhigh").is_err());
    }
}
