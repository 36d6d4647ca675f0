use anyhow::Context;
use clap::{Parser, ValueEnum};
use ringtext::config;
use ringtext::page::Page;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ringtext", version, about, long_about = None)]
struct Cli {
    /// Document holding the phrase elements (well-formed XHTML or XML)
    input: Option<PathBuf>,

    /// Where to write the result (stdout for text formats when omitted)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value_t = Format::Markup)]
    format: Format,

    /// Config file to use instead of the user config
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// The input document with an inline SVG in each phrase element
    Markup,
    /// One standalone SVG with every phrase
    Svg,
    /// Raster image painted with cairo
    Png,
    /// Vector image painted with cairo
    CairoSvg,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.init_config {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let Some(input) = cli.input else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => config::load_config(Some(path.as_path()))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load_or_default(),
    };

    let source = fs_err::read_to_string(&input)?;
    let page = Page::load(source, &config)
        .with_context(|| format!("Failed to lay out {}", input.display()))?;

    match cli.format {
        Format::Markup => emit(cli.output, page.to_markup()?),
        Format::Svg => emit(cli.output, page.to_svg()?),
        Format::Png => {
            let output = cli.output.context("--output is required for png")?;
            Ok(page.write_png(&config, &output)?)
        }
        Format::CairoSvg => {
            let output = cli.output.context("--output is required for cairo-svg")?;
            Ok(page.write_cairo_svg(&config, &output)?)
        }
    }
}

fn emit(output: Option<PathBuf>, text: String) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs_err::write(&path, text)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
