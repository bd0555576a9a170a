//! CLI entry point for dirtree

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use dirtree::{ListOption, PrintMode, list, print_json, write};

/// Field selectable with --mode
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Field {
    /// f, d or ? for files, directories and anything else
    Kind,
    /// Size in bytes of regular files
    Size,
    /// CRC-32 of regular file content
    Checksum,
    /// Whether the node is a symlink
    Symlink,
    /// Unix permission bits
    Perm,
    /// Kind and size
    Default,
    /// Every field
    All,
}

impl Field {
    fn print_mode(self) -> PrintMode {
        match self {
            Field::Kind => PrintMode::KIND,
            Field::Size => PrintMode::SIZE,
            Field::Checksum => PrintMode::CHECKSUM,
            Field::Symlink => PrintMode::SYMLINK,
            Field::Perm => PrintMode::PERM,
            Field::Default => PrintMode::DEFAULT,
            Field::All => PrintMode::ALL,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dirtree")]
#[command(about = "dirtree recursively lists a directory content")]
#[command(version)]
struct Args {
    /// Directory to list
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Fields printed before each path, comma separated
    #[arg(
        short = 'm',
        long = "mode",
        value_name = "FIELDS",
        value_delimiter = ',',
        default_value = "all"
    )]
    mode: Vec<Field>,

    /// Only list these kinds: f (files), d (directories), ? (anything else)
    #[arg(short = 't', long = "type", value_name = "TYPES")]
    types: Option<String>,

    /// Descend only N levels deep (0 = no limit)
    #[arg(short = 'L', long = "level")]
    level: Option<u32>,

    /// Ignore paths matching pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "GLOB")]
    ignore: Vec<String>,

    /// Only list paths matching pattern (can be used multiple times)
    #[arg(short = 'P', long = "match", value_name = "GLOB")]
    matches: Vec<String>,

    /// Don't list the root directory itself
    #[arg(long = "exclude-root")]
    exclude_root: bool,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,
}

impl Args {
    fn list_options(&self) -> Vec<ListOption> {
        let mode = self
            .mode
            .iter()
            .fold(PrintMode::empty(), |mode, field| mode | field.print_mode());

        let mut opts = vec![ListOption::Mode(mode)];
        if let Some(ref types) = self.types {
            opts.push(ListOption::Type(types.clone()));
        }
        if let Some(level) = self.level {
            opts.push(ListOption::Depth(i64::from(level)));
        }
        if self.exclude_root {
            opts.push(ListOption::EXCLUDE_ROOT);
        }
        opts.extend(self.ignore.iter().cloned().map(ListOption::Ignore));
        opts.extend(self.matches.iter().cloned().map(ListOption::Match));
        opts
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let opts = args.list_options();

    let result = if args.json {
        list(&args.path, &opts).and_then(|entries| print_json(&entries))
    } else {
        write(io::stdout().lock(), &args.path, &opts)
    };

    if let Err(e) = result {
        eprintln!("dirtree: error: {}", e);
        process::exit(1);
    }
}
