mod app;
mod cli;
mod config;
mod console;
mod domain;
mod gate;
mod listing;
mod logging;
mod menu;
mod storage;
mod store;
mod ui;

use std::io;

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), app::AppError> {
    use clap::Parser;

    let cli = cli::Cli::parse();
    let stdin = io::stdin();
    let console = console::Console::new(stdin.lock(), io::stdout(), ui::Palette::auto());
    app::run(&cli, console)
}
