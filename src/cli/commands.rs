use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - an in-memory kanban board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Board config file (default: ./board.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Seed the board from a JSON dataset instead of the demo data
    #[arg(long, global = true)]
    pub seed: Option<String>,
}

/// A single board command. Also the grammar of each session line.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List tasks, optionally filtered
    List(FilterArgs),
    /// Show tasks grouped into columns
    Board(BoardArgs),
    /// Show task counts for the whole board
    Counts,
    /// Show one task in detail
    Show(IdArg),
    /// List the user roster
    Users,
    /// Create a task
    Add(AddArgs),
    /// Change fields of a task
    Edit(EditArgs),
    /// Delete a task
    Rm(IdArg),
    /// Move a task to another column
    Mv(MvArgs),
    /// Record completed subtasks and recompute progress
    Progress(ProgressArgs),
    /// Duplicate a task into the todo column
    Dup(IdArg),
    /// Move several tasks to one column
    Bulk(BulkArgs),
    /// Drive a drag-and-drop gesture
    #[command(subcommand)]
    Drag(DragCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    /// Case-insensitive text to find in title or category
    #[arg(long, short)]
    pub search: Option<String>,
    /// Only these statuses (repeatable)
    #[arg(long)]
    pub status: Vec<String>,
    /// Only these priorities (repeatable)
    #[arg(long)]
    pub priority: Vec<String>,
    /// Only tasks assigned to these users, by id or name (repeatable)
    #[arg(long)]
    pub assignee: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct BoardArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Lay the columns out side by side
    #[arg(long)]
    pub wide: bool,
    /// Column width in cells for --wide
    #[arg(long, default_value = "36")]
    pub width: usize,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    #[arg(long)]
    pub category: Option<String>,
    /// Initial status (default from config)
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// Display date (default: today)
    #[arg(long)]
    pub date: Option<String>,
    /// Assign a user by id or name (repeatable)
    #[arg(long)]
    pub assignee: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    /// Progress percentage (not derived from the counters)
    #[arg(long)]
    pub progress: Option<u8>,
    #[arg(long)]
    pub total: Option<u32>,
    #[arg(long)]
    pub completed: Option<u32>,
    #[arg(long)]
    pub comments: Option<u32>,
    #[arg(long)]
    pub attachments: Option<u32>,
    /// Replace assignees with these users (repeatable)
    #[arg(long)]
    pub assignee: Vec<String>,
    /// Remove every assignee
    #[arg(long, conflicts_with = "assignee")]
    pub clear_assignees: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct MvArgs {
    /// Task ID
    pub id: String,
    /// Target status (todo, inprogress, done)
    pub status: String,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ProgressArgs {
    /// Task ID
    pub id: String,
    /// Number of completed subtasks
    pub completed: u32,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct BulkArgs {
    /// Target status (todo, inprogress, done)
    pub status: String,
    /// Task IDs
    #[arg(required = true)]
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Drag gesture
// ---------------------------------------------------------------------------

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum DragCmd {
    /// Pick up a card
    Start(IdArg),
    /// Hover over a column
    Over(ColumnArg),
    /// Stop hovering over a column
    Leave(ColumnArg),
    /// Release: on a column, or outside every column when omitted
    Drop(DropArgs),
    /// End the gesture without dropping
    End,
    /// Show the gesture state
    Status,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ColumnArg {
    /// Column status (todo, inprogress, done)
    pub status: String,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DropArgs {
    /// Column status; omit to drop outside the board
    pub status: Option<String>,
}

/// Grammar for one line of session input
#[derive(Parser, Debug)]
#[command(name = "tb", no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: Commands,
    /// Output this command as JSON
    #[arg(long, global = true)]
    pub json: bool,
}
