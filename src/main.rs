use clap::Parser;
use log::{info, LevelFilter};
use metatags::application::{expand, MetaTagsService};
use metatags::cli::{origin, Cli, Commands, PageArgs};
use metatags::domain::BaseUrlAssets;
use metatags::error::{MetaTagsError, Result};
use metatags::infrastructure::Config;
use std::fs;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            path,
            app_name,
            locale,
            force,
        } => {
            if path.exists() && !force {
                return Err(MetaTagsError::Config(format!(
                    "Config file already exists: {}. Use --force to overwrite.",
                    path.display()
                )));
            }

            Config::with_defaults(&app_name, &locale).save_to_file(&path)?;
            info!("Wrote default config for '{}'", app_name);
            println!("Created {}", path.display());
            Ok(())
        }
        Commands::Render { page, set, key } => {
            let mut service = load_service(&page)?;
            service.set_many(set);
            print!("{}", service.to_html(key.as_deref())?);
            Ok(())
        }
        Commands::Expand { template, page } => {
            let mut service = load_service(&page)?;
            let contents = fs::read_to_string(&template)?;
            print!("{}", expand(&contents, &mut service)?);
            Ok(())
        }
    }
}

/// Load the config and build the service for the requested page
fn load_service(page: &PageArgs) -> Result<MetaTagsService> {
    let config = Config::load_from_file(&page.config)?;
    let asset_base = page
        .asset_base
        .clone()
        .unwrap_or_else(|| origin(&page.url).to_string());

    info!(
        "Rendering {} with config {}",
        page.url,
        page.config.display()
    );

    Ok(MetaTagsService::new(
        &config,
        page.url.as_str(),
        Box::new(BaseUrlAssets::new(asset_base)),
    ))
}
