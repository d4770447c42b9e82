use catalens::ops;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "catalens",
    version,
    about = "Catalog analytics engine: normalization, hierarchy rollups, keyword ranking, and engagement clustering"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize raw catalog records into canonical entries
    Normalize {
        /// JSON field carrying each row's category ("Movie" or "TV")
        #[arg(long, default_value = "Type")]
        category_field: String,
        /// Metric mode: hours, views
        #[arg(short, long, default_value = "hours")]
        mode: String,
        /// Keep one entry per title instead of fanning out per genre
        #[arg(long)]
        no_split: bool,
    },
    /// Build the pruned Category > Genre > Language aggregation tree
    Hierarchy {
        /// JSON field carrying each row's category ("Movie" or "TV")
        #[arg(long, default_value = "Type")]
        category_field: String,
        /// Metric mode: hours, views
        #[arg(short, long, default_value = "hours")]
        mode: String,
        /// Keep one entry per title instead of fanning out per genre
        #[arg(long)]
        no_split: bool,
    },
    /// Rank keywords for one category/genre group
    Keywords {
        /// JSON field carrying each row's category ("Movie" or "TV")
        #[arg(long, default_value = "Type")]
        category_field: String,
        /// Metric mode used for keyword weighting: hours, views
        #[arg(short, long, default_value = "hours")]
        mode: String,
        /// Keep one entry per title instead of fanning out per genre
        #[arg(long)]
        no_split: bool,
        /// Category to query: movie, tv
        #[arg(short, long)]
        category: String,
        /// Genre to query (exact name as it appears in the tree)
        #[arg(short, long)]
        genre: String,
        /// Optional language to narrow the group
        #[arg(short, long)]
        language: Option<String>,
        /// Number of keywords to return
        #[arg(short = 'n', long, default_value_t = 3)]
        limit: usize,
    },
    /// Segment titles into engagement clusters over both metrics
    Matrix {
        /// JSON field carrying each row's category ("Movie" or "TV")
        #[arg(long, default_value = "Type")]
        category_field: String,
        /// Number of clusters
        #[arg(short, long, default_value_t = 4)]
        k: usize,
        /// Random seed for centroid initialization
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Normalize {
            category_field,
            mode,
            no_split,
        } => {
            let rows = read_stdin_json();
            print_result(ops::op_normalize(&rows, &category_field, &mode, !no_split));
        }
        Commands::Hierarchy {
            category_field,
            mode,
            no_split,
        } => {
            let rows = read_stdin_json();
            print_result(ops::op_hierarchy(&rows, &category_field, &mode, !no_split));
        }
        Commands::Keywords {
            category_field,
            mode,
            no_split,
            category,
            genre,
            language,
            limit,
        } => {
            let rows = read_stdin_json();
            print_result(ops::op_keywords(
                &rows,
                &category_field,
                &mode,
                !no_split,
                &category,
                &genre,
                language.as_deref(),
                limit,
            ));
        }
        Commands::Matrix {
            category_field,
            k,
            seed,
        } => {
            let rows = read_stdin_json();
            print_result(ops::op_matrix(&rows, &category_field, k, seed));
        }
    }
}

fn read_stdin_json() -> Vec<Value> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .expect("failed to read stdin");
    let parsed: Value = serde_json::from_str(&buf).expect("invalid JSON on stdin");
    match parsed {
        Value::Array(arr) => arr,
        single => vec![single],
    }
}

fn print_result(result: Result<Value, String>) {
    match result {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value).unwrap()),
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}
