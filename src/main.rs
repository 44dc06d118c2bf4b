use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::info;

use gridfill::{
    find_fill, load_structure, load_vocabulary, render_grid, render_image, FillFailure,
    PuzzleDefinition, SearchConfig,
};

#[derive(Parser)]
#[command(name = "gridfill")]
#[command(author, version, about = "Fill a crossword grid from a word list", long_about = None)]
struct Cli {
    /// Structure file: `_` for fillable cells, `#` for blocks
    structure: PathBuf,

    /// Word list, one word per line
    words: PathBuf,

    /// Also draw the filled grid to this image file (format taken from the extension)
    output: Option<PathBuf>,

    /// Give up after visiting this many search states
    #[arg(long)]
    max_states: Option<u64>,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let structure = fs::read_to_string(&cli.structure)
        .with_context(|| format!("reading structure from {:?}", cli.structure))?;
    let grid = load_structure(&structure)
        .with_context(|| format!("parsing structure from {:?}", cli.structure))?;

    let words = fs::read_to_string(&cli.words)
        .with_context(|| format!("reading words from {:?}", cli.words))?;
    let vocabulary = load_vocabulary(&words);

    let definition = PuzzleDefinition::build(&grid, &vocabulary)?;
    info!(
        "Loaded {}x{} grid with {} slots and {} words",
        grid.height(),
        grid.width(),
        definition.slot_count(),
        definition.word_count(),
    );

    let config = SearchConfig {
        max_states: cli.max_states,
        time_limit: cli.timeout.map(Duration::from_secs),
    };

    match find_fill(&definition, config) {
        Ok(result) => {
            info!("{:?}", result.statistics);

            let display_grid = render_grid(&definition, &result.assignment);
            println!("{}", display_grid);

            if let Some(output) = &cli.output {
                render_image(&definition, &result.assignment)
                    .save(output)
                    .with_context(|| format!("writing image to {:?}", output))?;
                info!("Wrote image to {:?}", output);
            }
        }
        Err(failure) => {
            if failure == FillFailure::BudgetExhausted {
                info!("Stopped after {:?}", config);
            }
            println!("{}", failure);
        }
    }

    Ok(())
}
