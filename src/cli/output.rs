//! Output handlers for CLI commands
//!
//! Supports console (pretty), JSON, and quiet output modes.

use crate::tracker::StoreStatistics;
use serde::Serialize;
use std::path::PathBuf;

/// Output mode for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Console,
    Json,
    Quiet,
}

impl OutputMode {
    /// Pick the mode from the command-line flags; `--json` wins over `--quiet`
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if json {
            Self::Json
        } else if quiet {
            Self::Quiet
        } else {
            Self::Console
        }
    }
}

/// Events emitted by the CLI commands
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum OutputEvent {
    RunStart {
        catalog: String,
        limit: usize,
    },
    CatalogFetched {
        count: usize,
    },
    Selected {
        featured: usize,
    },
    NothingNew,
    PreviewWritten {
        path: PathBuf,
    },
    EmailSent {
        recipient: String,
        models: usize,
    },
    Statistics {
        statistics: StoreStatistics,
    },
    Exported {
        path: PathBuf,
        rows: usize,
    },
    Debug {
        message: String,
    },
}

/// Output handler trait
pub trait OutputHandler: Send + Sync {
    /// Emit an event
    fn emit(&self, event: OutputEvent);

    /// Write final result
    fn result(&self, success: bool, output: Option<&str>);
}

/// Console output handler
pub struct ConsoleHandler {
    debug: bool,
}

impl ConsoleHandler {
    /// Create a new console handler
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Date part of a stored RFC 3339 stamp
    fn short_date(stamp: &str) -> &str {
        stamp.get(..10).unwrap_or(stamp)
    }

    fn format_statistics(stats: &StoreStatistics) -> String {
        let mut out = String::from("=== Newsletter Database Statistics ===\n\n");
        out.push_str(&format!("Total models highlighted: {}\n", stats.total_count));

        out.push_str("\nTop 5 Authors:\n");
        for owner in &stats.top_owners {
            out.push_str(&format!("  - {}: {} models\n", owner.owner, owner.count));
        }

        out.push_str("\nMost Recent Highlights:\n");
        for recent in &stats.recently_featured {
            out.push_str(&format!(
                "  - {} by {} ({})\n",
                recent.id,
                recent.owner,
                Self::short_date(&recent.last_featured_at)
            ));
        }

        out.push_str("\nMost Liked Models:\n");
        for liked in &stats.most_liked {
            out.push_str(&format!(
                "  - {} by {}: {} likes\n",
                liked.id, liked.owner, liked.likes
            ));
        }

        out
    }
}

impl OutputHandler for ConsoleHandler {
    fn emit(&self, event: OutputEvent) {
        match event {
            OutputEvent::RunStart { catalog, limit } => {
                eprintln!("Fetching top {} models from {}...", limit, catalog);
            }
            OutputEvent::CatalogFetched { count } => {
                eprintln!("Fetched {} models", count);
            }
            OutputEvent::Selected { featured } => {
                eprintln!("Found {} new or updated models", featured);
            }
            OutputEvent::NothingNew => {
                eprintln!("No new or updated models found");
            }
            OutputEvent::PreviewWritten { path } => {
                eprintln!("✓ Preview written to {}", path.display());
            }
            OutputEvent::EmailSent { recipient, models } => {
                eprintln!("✓ Newsletter with {} models sent to {}", models, recipient);
            }
            OutputEvent::Statistics { statistics } => {
                print!("{}", Self::format_statistics(&statistics));
            }
            OutputEvent::Exported { path, rows } => {
                eprintln!("✓ Exported {} rows to {}", rows, path.display());
            }
            OutputEvent::Debug { message } => {
                if self.debug {
                    eprintln!("[debug] {}", message);
                }
            }
        }
    }

    fn result(&self, _success: bool, output: Option<&str>) {
        if let Some(out) = output {
            println!("{}", out);
        }
    }
}

/// JSON output handler
pub struct JsonHandler {
    pretty: bool,
}

impl JsonHandler {
    /// Create a new JSON handler
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Option<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        json.ok()
    }
}

impl OutputHandler for JsonHandler {
    fn emit(&self, event: OutputEvent) {
        if let Some(s) = self.to_json(&event) {
            println!("{}", s);
        }
    }

    fn result(&self, success: bool, output: Option<&str>) {
        #[derive(Serialize)]
        struct FinalResult<'a> {
            success: bool,
            output: Option<&'a str>,
        }

        if let Some(s) = self.to_json(&FinalResult { success, output }) {
            println!("{}", s);
        }
    }
}

/// Quiet handler: only statistics and the final output
pub struct QuietHandler;

impl OutputHandler for QuietHandler {
    fn emit(&self, event: OutputEvent) {
        if let OutputEvent::Statistics { statistics } = event {
            print!("{}", ConsoleHandler::format_statistics(&statistics));
        }
    }

    fn result(&self, _success: bool, output: Option<&str>) {
        if let Some(out) = output {
            println!("{}", out);
        }
    }
}

/// Create an output handler based on mode
pub fn create_handler(mode: OutputMode, debug: bool) -> Box<dyn OutputHandler> {
    match mode {
        OutputMode::Console => Box::new(ConsoleHandler::new(debug)),
        OutputMode::Json => Box::new(JsonHandler::new(true)),
        OutputMode::Quiet => Box::new(QuietHandler),
    }
}
