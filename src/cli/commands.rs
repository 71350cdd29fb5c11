use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mn", about = concat!("@ mn v", env!("CARGO_PKG_VERSION"), " - comments with @mentions"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Catalog of mentionable tasks, files and members (.toml or .json)
    #[arg(short = 'c', long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Config file (default: ./mentions.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "mentions=trace" (overrides config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log file (default: mentions.log in the temp dir)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the comment composer and print what was submitted
    Compose(ComposeArgs),
    /// Render stored comment content with badges
    Render(TextArgs),
    /// List the mentions in stored comment content
    Mentions(TextArgs),
    /// List mentionable items, optionally filtered like the dropdown
    Items(ItemsArgs),
    /// Show the avatar lookup built from catalog members
    Avatars,
}

#[derive(Args)]
pub struct ComposeArgs {
    /// Text to start the composer with
    #[arg(long, default_value = "")]
    pub text: String,
    /// Name shown on submitted comments
    #[arg(long, default_value = "you")]
    pub author: String,
}

#[derive(Args)]
pub struct TextArgs {
    /// Comment content; "-" reads stdin
    pub text: String,
}

#[derive(Args)]
pub struct ItemsArgs {
    /// Case-insensitive label filter
    pub query: Option<String>,
    /// Only this kind (task, file, user)
    #[arg(long)]
    pub kind: Option<String>,
}
