//! CLI surface: the `clap` subcommands the `codeindex` binary exposes.
//! Kept separate from `main.rs` so the argument shape can be unit-tested
//! without pulling in the binary's I/O wiring.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Index every file under `path` not excluded by the path filter.
    Index {
        /// Codebase root to index.
        path: String,
    },

    /// Reconcile `path` against the previous run's snapshot, indexing
    /// only what changed.
    Reindex {
        /// Codebase root to reconcile.
        path: String,
    },

    /// Search a previously indexed codebase.
    Search {
        /// Codebase root that was indexed.
        path: String,

        /// The search query.
        query: String,

        /// Maximum number of results.
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Minimum similarity score (0.0 to 1.0).
        #[arg(short, long)]
        min_score: Option<f32>,

        /// Filter by language tag (e.g. rust, python).
        #[arg(short = 'L', long)]
        language: Option<Vec<String>>,
    },

    /// Drop a codebase's collection and its on-disk snapshot.
    Clear {
        /// Codebase root to clear.
        path: String,
    },

    /// Report whether a codebase already has an index.
    HasIndex {
        /// Codebase root to check.
        path: String,
    },

    /// Set the ignore glob patterns used by subsequent `index`/`reindex`
    /// runs against `path`.
    Ignore {
        /// Codebase root the patterns apply to.
        path: String,

        /// Glob patterns, e.g. "*.lock" or "vendor/**".
        patterns: Vec<String>,
    },
}
