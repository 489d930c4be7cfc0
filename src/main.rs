use std::path::PathBuf;

use clap::Parser;
use edo_recipe_scraper::{
    filter_valid_recipes, output, scraper_from_config, ScraperConfig, Selection,
};
use log::{error, info, warn};

const DEFAULT_RECIPE_COUNT: usize = 5;

/// Scrape Edo-period egg recipes into JSON and CSV
#[derive(Parser, Debug)]
#[command(name = "edo-recipe-scraper", version, about)]
struct Cli {
    /// Only report how many recipes the listing has
    #[arg(long)]
    count_only: bool,

    /// Number of recipes to scrape, 0 for all [default: 5]
    #[arg(short, long, conflicts_with = "get_recipe")]
    num_recipes: Option<usize>,

    /// Scrape only the recipe with this id
    #[arg(short, long)]
    get_recipe: Option<u32>,

    /// Seconds to wait before each page request
    #[arg(short, long)]
    sleep_time: Option<f64>,

    /// Output path without extension; writes BASE.json and BASE.csv
    #[arg(short, long, default_value = "edo_recipes")]
    output: PathBuf,

    /// Recipe index page to start from
    #[arg(long)]
    base_url: Option<String>,

    /// Only save recipes that have ingredients
    #[arg(long)]
    valid_only: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn selection(&self) -> edo_recipe_scraper::Result<Selection> {
        let count = match self.get_recipe {
            Some(_) => self.num_recipes,
            None => Some(self.num_recipes.unwrap_or(DEFAULT_RECIPE_COUNT)),
        };
        Selection::from_options(count, self.get_recipe)
    }

    /// Command line flags take priority over file and environment settings.
    fn apply_overrides(&self, config: &mut ScraperConfig) {
        if let Some(secs) = self.sleep_time {
            config.delay_secs = secs;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = ScraperConfig::load()?;
    cli.apply_overrides(&mut config);
    let selection = cli.selection()?;

    let scraper = scraper_from_config(&config)?;

    if cli.count_only {
        let count = scraper.count().await?;
        println!("{} recipes available at {}", count, config.base_url);
        return Ok(());
    }

    let stop = scraper.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current recipe");
            stop.stop();
        }
    });

    let outcome = scraper.run(selection).await?;
    let succeeded = outcome.succeeded();
    let skipped = outcome.skipped.len();
    for item in &outcome.skipped {
        error!("Skipped #{} '{}': {}", item.listing.id, item.listing.name, item.reason);
    }

    let mut recipes = outcome.recipes;
    if cli.valid_only {
        let before = recipes.len();
        recipes = filter_valid_recipes(recipes);
        info!("Kept {} of {} recipe(s) with ingredients", recipes.len(), before);
    }

    let (json_path, csv_path) = output::save_outputs(&cli.output, &recipes).await?;

    println!(
        "Scraped {} recipe(s), {} skipped{}",
        succeeded,
        skipped,
        if outcome.stopped { " (interrupted)" } else { "" }
    );
    println!("Saved {} and {}", json_path.display(), csv_path.display());

    Ok(())
}
