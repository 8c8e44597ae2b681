use anyhow::Result;
use clap::Parser;
use oldes_icon::{
    config::{parse_css_color, DEFAULT_OUTPUT_PATH},
    font::sources_from_config,
    render_icon, save_png, RenderConfig,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "oldes-icon",
    about = "Render the oldes application icon to a PNG file"
)]
struct Args {
    /// Output PNG file. Parent directories are created as needed.
    #[clap(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// JSON file overriding any of the default render settings
    #[clap(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Canvas edge length; margins and font sizes scale with it
    #[clap(short, long, value_name = "PX")]
    size: Option<u32>,

    /// Label drawn in the middle of the icon
    #[clap(short, long)]
    text: Option<String>,

    /// Gradient color of the top row (CSS color format)
    #[clap(long)]
    top_color: Option<String>,

    /// Gradient color of the bottom row (CSS color format)
    #[clap(long)]
    bottom_color: Option<String>,

    /// Border color (CSS color format)
    #[clap(long)]
    border_color: Option<String>,

    /// Label color (CSS color format)
    #[clap(long)]
    text_color: Option<String>,

    /// Font file to try before the default candidates. Can be repeated.
    #[clap(short, long = "font", value_name = "FILE")]
    fonts: Vec<PathBuf>,

    /// Don't try the default platform fonts
    #[clap(long)]
    no_system_fonts: bool,
}

fn build_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };

    if let Some(size) = args.size {
        config = config.scaled_to(size);
    }

    if let Some(text) = &args.text {
        config.text = text.clone();
    }

    for (value, target) in [
        (&args.top_color, &mut config.top),
        (&args.bottom_color, &mut config.bottom),
        (&args.border_color, &mut config.border_color),
        (&args.text_color, &mut config.text_color),
    ] {
        if let Some(value) = value {
            *target = parse_css_color(value)?;
        }
    }

    if args.no_system_fonts {
        config.font_candidates.clear();
    }
    let mut candidates = args.fonts.clone();
    candidates.append(&mut config.font_candidates);
    config.font_candidates = candidates;

    config.validate()?;
    Ok(config)
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

fn main() -> Result<()> {
    init_logger();

    let args = Args::parse();
    let config = build_config(&args)?;

    log::info!("Rendering {0}x{0} icon", config.size);
    let fonts = sources_from_config(&config);
    let canvas = render_icon(&config, &fonts)?;
    save_png(&canvas, &args.output)?;

    println!("Icon written to {}", args.output.display());
    Ok(())
}
