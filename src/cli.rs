use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "link-atlas")]
#[command(about = "Browse bookmarks, synced tabs and recent history as one filterable tree")]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the aggregated tree from a platform dump
    Render {
        /// Path to the JSON platform dump
        #[arg(short, long)]
        dump: String,
        /// Filter link titles by this text
        #[arg(short, long, default_value = "")]
        query: String,
        /// Print the render model as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Print matching links as a flat list; an empty query still prints the tree
        #[arg(long)]
        flat: bool,
    },
    /// Replay a command against a platform dump and print the resulting view
    Execute {
        /// Path to the JSON platform dump
        #[arg(short, long)]
        dump: String,
        /// Command to execute (e.g., "search:rust", "toggle:0", "sequence:[search:a,open_all:0]")
        #[arg(short = 'x', long)]
        command: String,
        /// Print the view model as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Open every link under the folder at a rendered row
    OpenAll {
        /// Path to the JSON platform dump
        #[arg(short, long)]
        dump: String,
        /// Row number of the folder, as shown by `render`
        #[arg(short, long)]
        row: usize,
        /// Filter applied before rows are numbered
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print the effective configuration as JSON
    Config,
}
