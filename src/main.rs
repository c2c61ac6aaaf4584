use anyhow::{Context, Result};
use clap::Parser;

use shower_plot::app;
use shower_plot::config::Cli;
use shower_plot::export;
use shower_plot::state::ViewerState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let recipe = cli.plot_recipe().context("reading plot recipe")?;
    let options = cli.plot_options();

    let plotted = recipe
        .plot_file(&cli.input, &options)
        .with_context(|| format!("plotting {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => export::save(&plotted.chart, path, cli.image_size())
            .with_context(|| format!("writing {}", path.display())),
        None => {
            let mut state = ViewerState::new(plotted, recipe, options, cli.input.clone());
            state.image_size = cli.image_size();
            app::run(state)
        }
    }
}
