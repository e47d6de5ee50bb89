//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "jxref",
    version,
    about = "Java cross-reference indexer and navigator",
    long_about = "Indexes Java sources into a SQLite cross-reference graph and answers \
                  navigation queries against it: definitions, usages, callers, overrides, \
                  implementations, reads and writes."
)]
pub struct Cli {
    /// Store path (default: `database` from configuration)
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Configuration file (default: jxref.toml in the root)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit JSON wrapped in a versioned envelope
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Index every Java source under ROOT
    Index {
        /// Root directory (default: current directory)
        root: Option<PathBuf>,

        /// Worker threads (0 = one per core)
        #[arg(long)]
        threads: Option<usize>,

        /// Skip files unchanged since the last run
        #[arg(long)]
        changed_only: bool,

        /// Only index files matching this glob (repeatable)
        #[arg(long = "include", value_name = "GLOB")]
        include: Vec<String>,

        /// Skip files matching this glob (repeatable)
        #[arg(long = "exclude", value_name = "GLOB")]
        exclude: Vec<String>,
    },

    /// Show store contents and files needing reindex
    Status,

    /// Occurrence at a position (line 1-based, column 0-based)
    At {
        file: String,
        line: usize,
        column: usize,
    },

    /// Occurrence and its properties
    Show { id: i64 },

    /// Reference kinds supported by an occurrence
    Kinds { id: i64 },

    /// Run a reference query, e.g. `refs 42 callers`
    Refs {
        id: i64,
        kind: String,

        /// Keep results carrying this tag (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Print only the number of results
        #[arg(long)]
        count: bool,
    },

    /// File-scoped query: imports, types, constructors or methods
    FileRefs {
        file: String,
        kind: String,

        #[arg(long)]
        count: bool,
    },

    /// Documentation of an occurrence
    Doc { id: i64 },

    /// Print the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "jxref", "refs", "12", "callers", "--tag", "static", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Refs { id, kind, tags, count } => {
                assert_eq!(id, 12);
                assert_eq!(kind, "callers");
                assert_eq!(tags, vec!["static".to_string()]);
                assert!(!count);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_index_flags() {
        let cli = Cli::try_parse_from([
            "jxref",
            "--db",
            "x.db",
            "index",
            "src",
            "--changed-only",
            "--exclude",
            "gen/**",
        ])
        .unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        match cli.command {
            Command::Index {
                root,
                changed_only,
                exclude,
                threads,
                ..
            } => {
                assert_eq!(root, Some(PathBuf::from("src")));
                assert!(changed_only);
                assert_eq!(exclude, vec!["gen/**".to_string()]);
                assert_eq!(threads, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
