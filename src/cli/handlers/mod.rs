mod session;
pub use session::run_session;

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::{config_io, seed_io};
use crate::model::config::BoardConfig;
use crate::model::criteria::FilterCriteria;
use crate::model::store::TaskStore;
use crate::model::task::{TaskDraft, TaskId, TaskPatch};
use crate::model::user::{Roster, UserId};
use crate::ops::drag::{DragController, DragEffect, DragEvent};
use crate::ops::query::{self, ViewCache};
use crate::ops::task_ops::{self, TaskError};

pub type CmdResult = Result<(), Box<dyn Error>>;

/// One live board: the store plus the state that sits beside it
#[derive(Debug)]
pub struct Board {
    pub store: TaskStore,
    pub config: BoardConfig,
    pub drag: DragController,
    pub cache: ViewCache,
}

impl Board {
    pub fn new(store: TaskStore, config: BoardConfig) -> Self {
        Board {
            store,
            config,
            drag: DragController::new(),
            cache: ViewCache::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// The config for this invocation: `--config`, else ./board.toml, else defaults.
pub fn load_config(cli: &Cli) -> Result<BoardConfig, Box<dyn Error>> {
    let cwd = std::env::current_dir()?;
    let explicit = cli.config.as_deref().map(PathBuf::from);
    Ok(config_io::load_config(explicit.as_deref(), &cwd)?)
}

/// A fresh board seeded from `--seed` or the demo data.
pub fn load_board(cli: &Cli, config: BoardConfig) -> Result<Board, Box<dyn Error>> {
    let dataset = seed_io::dataset_or_mock(cli.seed.as_deref().map(Path::new))?;
    let store = TaskStore::seeded(dataset, config.defaults.clone())?;
    Ok(Board::new(store, config))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli, config: BoardConfig) -> CmdResult {
    let json = cli.json;
    let mut board = load_board(&cli, config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        // No subcommand → read commands from stdin
        None => {
            let stdin = std::io::stdin();
            run_session(&mut board, stdin.lock(), &mut out, json)
        }
        Some(cmd) => execute(&mut board, cmd, json, &mut out),
    }
}

/// Run one command against `board`, writing its output to `out`.
pub fn execute(board: &mut Board, cmd: Commands, json: bool, out: &mut dyn Write) -> CmdResult {
    match cmd {
        // Read commands
        Commands::List(args) => cmd_list(board, args, json, out),
        Commands::Board(args) => cmd_board(board, args, json, out),
        Commands::Counts => cmd_counts(board, json, out),
        Commands::Show(args) => cmd_show(board, args, json, out),
        Commands::Users => cmd_users(board, json, out),

        // Write commands
        Commands::Add(args) => cmd_add(board, args, json, out),
        Commands::Edit(args) => cmd_edit(board, args, json, out),
        Commands::Rm(args) => cmd_rm(board, args, json, out),
        Commands::Mv(args) => cmd_mv(board, args, json, out),
        Commands::Progress(args) => cmd_progress(board, args, json, out),
        Commands::Dup(args) => cmd_dup(board, args, json, out),
        Commands::Bulk(args) => cmd_bulk(board, args, json, out),

        // Drag-and-drop
        Commands::Drag(args) => cmd_drag(board, args, json, out),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid(msg: String) -> TaskError {
    TaskError::InvalidInput(msg)
}

/// Map a user reference (id or name) to a roster id. Unknown references pass
/// through unchanged.
fn resolve_user(roster: &Roster, key: &str) -> UserId {
    roster
        .resolve(key)
        .map(|u| u.id.clone())
        .unwrap_or_else(|| UserId::from(key))
}

fn resolve_users(roster: &Roster, keys: &[String]) -> Vec<UserId> {
    keys.iter().map(|k| resolve_user(roster, k)).collect()
}

fn criteria_from(args: &FilterArgs, roster: &Roster) -> Result<FilterCriteria, TaskError> {
    let mut criteria = FilterCriteria::new();
    criteria.search = args.search.clone();
    for s in &args.status {
        criteria.statuses.insert(parse_status(s).map_err(invalid)?);
    }
    for p in &args.priority {
        criteria.priorities.insert(parse_priority(p).map_err(invalid)?);
    }
    for a in &args.assignee {
        criteria.assignees.insert(resolve_user(roster, a));
    }
    Ok(criteria)
}

fn print_json<T: serde::Serialize>(out: &mut dyn Write, value: &T) -> CmdResult {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn print_task(board: &Board, task: &crate::model::task::Task, out: &mut dyn Write) -> CmdResult {
    print_json(out, &task_to_json(task, board.store.roster()))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(board: &mut Board, args: FilterArgs, json: bool, out: &mut dyn Write) -> CmdResult {
    let criteria = criteria_from(&args, board.store.roster())?;
    let search = criteria.search_text().map(query::search_regex).transpose()?;
    let active = criteria.active_filter_count();
    let Board { store, cache, .. } = board;
    let view = cache.view(store, &criteria);

    if json {
        let tasks = view
            .filtered
            .iter()
            .map(|t| searched_task_to_json(t, store.roster(), search.as_ref()))
            .collect();
        return print_json(
            out,
            &TaskListJson {
                results: view.results,
                active_filters: active,
                tasks,
            },
        );
    }

    for task in &view.filtered {
        let fields = match &search {
            Some(re) => format_match_fields(&query::search_hits(task, re)),
            None => String::new(),
        };
        writeln!(out, "{}{}", format_task_line(task, store.roster()), fields)?;
    }
    if !view.filtered.is_empty() {
        writeln!(out)?;
    }
    writeln!(out, "{}", format_results(view.results, active))?;
    Ok(())
}

fn cmd_board(board: &mut Board, args: BoardArgs, json: bool, out: &mut dyn Write) -> CmdResult {
    let criteria = criteria_from(&args.filter, board.store.roster())?;
    let search = criteria.search_text().map(query::search_regex).transpose()?;
    let active = criteria.active_filter_count();
    let Board {
        store,
        cache,
        config,
        ..
    } = board;
    let view = cache.view(store, &criteria);

    if json {
        return print_json(
            out,
            &board_to_json(
                &config.board.name,
                view,
                active,
                search.as_ref(),
                &config.columns,
                store.roster(),
            ),
        );
    }

    let columns = view.columns();
    let lines = if args.wide {
        let mut lines = format_board_wide(&columns, &view.counts, &config.columns, args.width);
        lines.push(String::new());
        lines.push(format_results(view.results, active));
        lines
    } else {
        format_board(
            &columns,
            &view.counts,
            view.results,
            active,
            &config.columns,
            store.roster(),
        )
    };
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn cmd_counts(board: &Board, json: bool, out: &mut dyn Write) -> CmdResult {
    let counts = query::counts(&board.store);
    if json {
        return print_json(out, &counts);
    }
    writeln!(out, "{}", format_counts(&counts, &board.config.columns))?;
    Ok(())
}

fn cmd_show(board: &Board, args: IdArg, json: bool, out: &mut dyn Write) -> CmdResult {
    let id = TaskId::from(args.id);
    let task = board
        .store
        .get(&id)
        .ok_or_else(|| TaskError::NotFound(id.clone()))?;
    if json {
        return print_task(board, task, out);
    }
    for line in format_task_detail(task, board.store.roster(), &board.config.columns) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn cmd_users(board: &Board, json: bool, out: &mut dyn Write) -> CmdResult {
    if json {
        let users: Vec<_> = board.store.roster().iter().collect();
        return print_json(out, &users);
    }
    for user in board.store.roster().iter() {
        writeln!(out, "{}", format_user_line(user))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(board: &mut Board, args: AddArgs, json: bool, out: &mut dyn Write) -> CmdResult {
    let draft = TaskDraft {
        title: Some(args.title),
        category: args.category,
        date: args.date,
        status: args.status.as_deref().map(parse_status).transpose().map_err(invalid)?,
        priority: args
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()
            .map_err(invalid)?,
        assignees: if args.assignee.is_empty() {
            None
        } else {
            Some(resolve_users(board.store.roster(), &args.assignee))
        },
    };
    let task = task_ops::add_task(&mut board.store, draft);
    if json {
        return print_task(board, &task, out);
    }
    writeln!(out, "Added {}: {}", task.id, task.title)?;
    Ok(())
}

fn cmd_edit(board: &mut Board, args: EditArgs, json: bool, out: &mut dyn Write) -> CmdResult {
    let assignees = if args.clear_assignees {
        Some(Vec::new())
    } else if args.assignee.is_empty() {
        None
    } else {
        Some(resolve_users(board.store.roster(), &args.assignee))
    };
    let patch = TaskPatch {
        title: args.title,
        category: args.category,
        status: args.status.as_deref().map(parse_status).transpose().map_err(invalid)?,
        priority: args
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()
            .map_err(invalid)?,
        progress: args.progress,
        total_tasks: args.total,
        completed_tasks: args.completed,
        date: args.date,
        comments: args.comments,
        attachments: args.attachments,
        assignees,
    };
    if patch.is_empty() {
        return Err(invalid("nothing to change (pass at least one field flag)".into()).into());
    }
    let task = task_ops::update_task(&mut board.store, &TaskId::from(args.id), patch)?;
    if json {
        return print_task(board, &task, out);
    }
    writeln!(out, "Updated {}", format_task_line(&task, board.store.roster()))?;
    Ok(())
}

fn cmd_rm(board: &mut Board, args: IdArg, json: bool, out: &mut dyn Write) -> CmdResult {
    let id = TaskId::from(args.id);
    let task = task_ops::delete_task(&mut board.store, &id).ok_or(TaskError::NotFound(id))?;
    if json {
        return print_task(board, &task, out);
    }
    writeln!(out, "Deleted {}: {}", task.id, task.title)?;
    Ok(())
}

fn cmd_mv(board: &mut Board, args: MvArgs, json: bool, out: &mut dyn Write) -> CmdResult {
    let status = parse_status(&args.status).map_err(invalid)?;
    let task = task_ops::move_task(&mut board.store, &TaskId::from(args.id), status)?;
    if json {
        return print_task(board, &task, out);
    }
    writeln!(
        out,
        "Moved {} to {}",
        task.id,
        board.config.columns.title(status)
    )?;
    Ok(())
}

fn cmd_progress(
    board: &mut Board,
    args: ProgressArgs,
    json: bool,
    out: &mut dyn Write,
) -> CmdResult {
    let task = task_ops::update_progress(&mut board.store, &TaskId::from(args.id), args.completed)?;
    if json {
        return print_task(board, &task, out);
    }
    writeln!(
        out,
        "{}: {}/{} ({}%)",
        task.id, task.completed_tasks, task.total_tasks, task.progress
    )?;
    Ok(())
}

fn cmd_dup(board: &mut Board, args: IdArg, json: bool, out: &mut dyn Write) -> CmdResult {
    let source = TaskId::from(args.id);
    let task = task_ops::duplicate_task(&mut board.store, &source)?;
    if json {
        return print_task(board, &task, out);
    }
    writeln!(out, "Duplicated {} as {}: {}", source, task.id, task.title)?;
    Ok(())
}

fn cmd_bulk(board: &mut Board, args: BulkArgs, json: bool, out: &mut dyn Write) -> CmdResult {
    let status = parse_status(&args.status).map_err(invalid)?;
    // repeated ids count once, first occurrence wins the order
    let ids: IndexSet<TaskId> = args.ids.into_iter().map(TaskId::from).collect();
    let ids: Vec<TaskId> = ids.into_iter().collect();
    let updated = task_ops::bulk_update_status(&mut board.store, &ids, status);
    if json {
        return print_json(out, &BulkJson { status, updated });
    }
    writeln!(
        out,
        "Moved {} of {} tasks to {}",
        updated,
        ids.len(),
        board.config.columns.title(status)
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Drag-and-drop
// ---------------------------------------------------------------------------

fn cmd_drag(board: &mut Board, cmd: DragCmd, json: bool, out: &mut dyn Write) -> CmdResult {
    let Board { store, drag, .. } = board;
    match cmd {
        DragCmd::Start(args) => {
            drag.handle(store, DragEvent::Start { payload: args.id });
        }
        DragCmd::Over(args) => {
            let status = parse_status(&args.status).map_err(invalid)?;
            drag.handle(store, DragEvent::Enter(status));
        }
        DragCmd::Leave(args) => {
            let status = parse_status(&args.status).map_err(invalid)?;
            drag.handle(store, DragEvent::Leave(status));
        }
        DragCmd::Drop(args) => {
            let target = args
                .status
                .as_deref()
                .map(parse_status)
                .transpose()
                .map_err(invalid)?;
            let was_dragging = drag.state().is_active();
            let effect = drag.drop_on(store, target);
            if !json {
                report_drop(store, &effect, was_dragging, out)?;
            }
        }
        DragCmd::End => {
            drag.handle(store, DragEvent::End);
        }
        DragCmd::Status => {}
    }

    if json {
        return print_json(out, &drag_to_json(drag.state(), drag.highlight()));
    }
    writeln!(out, "drag: {}", format_drag_state(drag.state(), drag.highlight()))?;
    Ok(())
}

fn report_drop(
    store: &TaskStore,
    effect: &DragEffect,
    was_dragging: bool,
    out: &mut dyn Write,
) -> CmdResult {
    match effect {
        DragEffect::Move { task_id, status } if store.contains(task_id) => {
            writeln!(out, "Moved {} to {}", task_id, status)?
        }
        DragEffect::Move { task_id, .. } => {
            writeln!(out, "task not found: {} (drop ignored)", task_id)?
        }
        DragEffect::None if was_dragging => writeln!(out, "Drop cancelled")?,
        DragEffect::None => writeln!(out, "Nothing is being dragged")?,
    }
    Ok(())
}
