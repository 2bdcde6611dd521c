use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

#[derive(Debug, Parser)]
#[command(name = "notebook")]
#[command(bin_name = "notebook")]
#[command(version)]
#[command(about = "A personal, menu-driven notebook kept in a local JSON file")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'f',
        long,
        help = "Path to the notes JSON file (default: notes.json)."
    )]
    pub file: Option<PathBuf>,

    #[arg(
        short = 'c',
        long,
        help = "Path to a TOML config file (password gate, logging, notes file)."
    )]
    pub config: Option<PathBuf>,
}
