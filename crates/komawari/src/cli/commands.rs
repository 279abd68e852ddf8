//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Komawari - split narrative prose into labeled comic cuts
#[derive(Parser, Debug)]
#[command(name = "komawari")]
#[command(about = "Split narrative prose into labeled comic cuts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level, overriding RUST_LOG
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a text file into labeled cuts (JSON)
    Cut(CutArgs),

    /// Extract the character relationship graph of a text file
    Graph {
        /// Source text file
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = GraphFormat::Dot)]
        format: GraphFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the cuts that mention a character
    Brief {
        /// Cuts JSON produced by `komawari cut`
        cuts: PathBuf,

        /// Character name
        name: String,

        /// Maximum number of cuts to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Propose rewrites of a passage that keep its meaning
    Variants {
        /// Passage to rewrite
        text: String,

        /// Style to aim for
        #[arg(long, default_value = "")]
        style_hint: String,

        /// Number of variants to return
        #[arg(long, default_value_t = 3)]
        count: usize,
    },

    /// Draft a Markdown character sheet from the cuts that mention a character
    Sheet {
        /// Cuts JSON produced by `komawari cut`
        cuts: PathBuf,

        /// Character name
        name: String,

        /// Maximum number of cuts to show the oracle
        #[arg(long, default_value_t = 30)]
        limit: usize,

        /// Style to aim for
        #[arg(long, default_value = "")]
        style_hint: String,
    },
}

/// Arguments of the `cut` command
#[derive(Args, Debug, Clone, Default)]
pub struct CutArgs {
    /// Source text file (UTF-8, UTF-16 with BOM, or Shift_JIS)
    pub input: PathBuf,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target cut length in characters
    #[arg(long)]
    pub target: Option<usize>,

    /// Window size in characters
    #[arg(long)]
    pub window: Option<usize>,

    /// Overlap between consecutive windows in characters
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Style hint sent with every window
    #[arg(long)]
    pub style_hint: Option<String>,

    /// JSON array of `{"name", "details"}` character entries
    #[arg(long)]
    pub glossary: Option<PathBuf>,

    /// JSON array of canonical character names
    #[arg(long)]
    pub roster: Option<PathBuf>,

    /// Segment with the deterministic splitter only, without calling the oracle
    #[arg(long)]
    pub offline: bool,
}

/// Output format of the `graph` command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    /// Graphviz DOT
    Dot,
    /// JSON nodes and edges
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_flags() {
        let cli = Cli::try_parse_from([
            "komawari",
            "cut",
            "novel.txt",
            "--target",
            "120",
            "--window",
            "1500",
            "--offline",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(!cli.json_logs);
        let Commands::Cut(args) = cli.command else {
            panic!("expected cut command");
        };
        assert_eq!(args.input, PathBuf::from("novel.txt"));
        assert_eq!(args.target, Some(120));
        assert_eq!(args.window, Some(1500));
        assert_eq!(args.overlap, None);
        assert!(args.offline);
    }

    #[test]
    fn test_graph_format_defaults_to_dot() {
        let cli = Cli::try_parse_from(["komawari", "graph", "novel.txt"]).unwrap();
        match cli.command {
            Commands::Graph { format, output, .. } => {
                assert_eq!(format, GraphFormat::Dot);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "komawari", "brief", "cuts.json", "Giovanni", "--config", "k.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("k.toml")));
        match cli.command {
            Commands::Brief { name, limit, .. } => {
                assert_eq!(name, "Giovanni");
                assert_eq!(limit, 20);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_graph_format_is_rejected() {
        assert!(Cli::try_parse_from(["komawari", "graph", "a.txt", "--format", "svg"]).is_err());
    }

    #[test]
    fn test_json_logs_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["komawari", "graph", "a.txt", "--json-logs"]).unwrap();
        assert!(cli.json_logs);
        assert!(!cli.verbose);
    }
}
