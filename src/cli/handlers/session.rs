use std::io::{BufRead, Write};

use clap::Parser;
use clap::error::ErrorKind;

use super::{Board, CmdResult, execute};
use crate::cli::commands::SessionLine;

/// Outcome of one session line
#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Continue,
    Quit,
}

/// Read commands line by line until EOF or `quit`/`exit`.
///
/// Each line uses the same grammar as a single `tb` invocation minus the
/// binary name. A failing line reports `error: ...` on stderr and the
/// session carries on with the board it had.
pub fn run_session(
    board: &mut Board,
    input: impl BufRead,
    out: &mut dyn Write,
    json: bool,
) -> CmdResult {
    tracing::info!(tasks = board.store.len(), "session started");
    let mut lines = 0usize;
    for line in input.lines() {
        let line = line?;
        lines += 1;
        match run_line(board, &line, out, json) {
            Ok(LineOutcome::Quit) => break,
            Ok(LineOutcome::Continue) => {}
            Err(e) => eprintln!("error: {}", e),
        }
        out.flush()?;
    }
    tracing::info!(lines, "session ended");
    Ok(())
}

fn run_line(
    board: &mut Board,
    line: &str,
    out: &mut dyn Write,
    json: bool,
) -> Result<LineOutcome, Box<dyn std::error::Error>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(LineOutcome::Continue);
    }
    if line == "quit" || line == "exit" {
        return Ok(LineOutcome::Quit);
    }

    let words = shlex::split(line).ok_or("unbalanced quotes")?;
    let parsed = match SessionLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp) => {
            write!(out, "{}", e.render())?;
            return Ok(LineOutcome::Continue);
        }
        Err(e) => return Err(e.render().to_string().trim_end().into()),
    };
    tracing::debug!(command = ?parsed.command, "session line");
    execute(board, parsed.command, json || parsed.json, out)?;
    Ok(LineOutcome::Continue)
}
