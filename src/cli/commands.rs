//! CLI command definitions

use crate::infrastructure::DEFAULT_CONFIG_FILE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::output::parse_assignment;

#[derive(Parser, Debug)]
#[command(name = "metatags")]
#[command(about = "Generate HTML meta tags from a declarative configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Page inputs shared by the rendering commands
#[derive(Args, Debug)]
pub struct PageArgs {
    /// Config file to load
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Canonical URL of the page
    #[arg(short, long)]
    pub url: String,

    /// Base URL for [asset:path] values (default: origin of --url)
    #[arg(long)]
    pub asset_base: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        /// Config file to create
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Application name used in titles and site name tags
        #[arg(long, default_value = "App")]
        app_name: String,

        /// Locale for og:locale
        #[arg(long, default_value = "en")]
        locale: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print all tags, or a single tag
    Render {
        #[command(flatten)]
        page: PageArgs,

        /// Set a tag before rendering (repeatable), e.g. --set title=Home
        #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Only render this tag
        key: Option<String>,
    },

    /// Expand @meta directives in a template file
    Expand {
        /// Template file
        template: PathBuf,

        #[command(flatten)]
        page: PageArgs,
    },
}
