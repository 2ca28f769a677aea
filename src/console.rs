//! Console driver plumbing: argument parsing, stdin command words and
//! snapshot rendering for the `tetris-engine` binary.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::core::{GameState, Phase, Piece};
use crate::runtime::RuntimeConfig;
use crate::types::{Command, BOARD_ROWS, BOARD_WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsoleArgs {
    pub seed: Option<u64>,
    pub bag_copies: Option<usize>,
    pub settings_path: Option<PathBuf>,
    pub json: bool,
}

impl ConsoleArgs {
    /// Apply command-line overrides on top of an environment config
    pub fn apply_to(&self, config: &mut RuntimeConfig) {
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(copies) = self.bag_copies {
            config.bag_copies = copies.max(1);
        }
        if self.settings_path.is_some() {
            config.settings_path = self.settings_path.clone();
        }
    }
}

/// Parse `[--seed N] [--bag-copies N] [--settings PATH] [--json]` (program name excluded)
pub fn parse_args(args: &[String]) -> Result<ConsoleArgs> {
    let mut parsed = ConsoleArgs::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                parsed.seed = Some(
                    v.parse::<u64>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--bag-copies" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --bag-copies"))?;
                let copies = v
                    .parse::<usize>()
                    .map_err(|_| anyhow!("invalid --bag-copies value: {}", v))?;
                if copies == 0 {
                    return Err(anyhow!("--bag-copies must be at least 1"));
                }
                parsed.bag_copies = Some(copies);
            }
            "--settings" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --settings"))?;
                parsed.settings_path = Some(PathBuf::from(v));
            }
            "--json" => parsed.json = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(parsed)
}

/// One line of console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInput {
    Command(Command),
    Quit,
}

/// Map a stdin line to an input; blank or unknown lines yield `None`.
///
/// A line consisting only of spaces is the hard-drop alias.
pub fn parse_input(line: &str) -> Option<ConsoleInput> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if !line.is_empty() && line.trim().is_empty() {
        return Some(ConsoleInput::Command(Command::HardDrop));
    }
    let word = line.trim().to_lowercase();
    let command = match word.as_str() {
        "left" | "h" => Command::MoveLeft,
        "right" | "l" => Command::MoveRight,
        "down" | "j" => Command::SoftDrop,
        "drop" | "space" => Command::HardDrop,
        "cw" | "k" => Command::RotateCw,
        "ccw" | "z" => Command::RotateCcw,
        "hold" | "c" => Command::Hold,
        "pause" | "p" => Command::Pause,
        "resume" | "r" => Command::Resume,
        "restart" | "n" => Command::Restart,
        "quit" | "q" => return Some(ConsoleInput::Quit),
        other => return Command::from_str(other).map(ConsoleInput::Command),
    };
    Some(ConsoleInput::Command(command))
}

/// Text frame: board with the current piece (`#`) and ghost (`:`), then a status line
pub fn render_text(state: &GameState, show_ghost: bool) -> String {
    let mut grid = [[b'.'; BOARD_WIDTH as usize]; BOARD_ROWS];
    let mut codes = [[0u8; BOARD_WIDTH as usize]; BOARD_ROWS];
    state.board.write_u8_grid(&mut codes);
    for (y, row) in codes.iter().enumerate() {
        for (x, &code) in row.iter().enumerate() {
            if code != 0 {
                grid[y][x] = b'0' + code;
            }
        }
    }
    if show_ghost {
        if let Some(ghost) = state.ghost {
            paint(&mut grid, &ghost, b':');
        }
    }
    if let Some(current) = state.current {
        paint(&mut grid, &current, b'#');
    }

    let mut out = String::new();
    for (y, row) in grid.iter().enumerate() {
        let marker = if state.clearing_lines.contains(&y) { '*' } else { '|' };
        let _ = writeln!(out, "{}{}{}", marker, String::from_utf8_lossy(row), marker);
    }
    let _ = writeln!(
        out,
        "score {}  lines {}  next {}  hold {}  {}",
        state.score,
        state.lines_cleared,
        state.next.kind().as_str(),
        state.held.map_or("-", |p| p.kind().as_str()),
        phase_label(state),
    );
    out
}

fn paint(grid: &mut [[u8; BOARD_WIDTH as usize]; BOARD_ROWS], piece: &Piece, glyph: u8) {
    for (x, y) in piece.cells() {
        if x >= 0 && (x as usize) < BOARD_WIDTH as usize && y >= 0 && (y as usize) < BOARD_ROWS {
            grid[y as usize][x as usize] = glyph;
        }
    }
}

fn phase_label(state: &GameState) -> &'static str {
    if state.paused {
        return "paused";
    }
    match state.phase {
        Phase::Falling => "falling",
        Phase::Locking => "locking",
        Phase::Clearing => "clearing",
        Phase::GameOver => "game over",
    }
}

/// One JSON object per snapshot
pub fn render_json(state: &GameState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_args_reads_all_flags() {
        let parsed = parse_args(&args(&[
            "--seed",
            "9",
            "--bag-copies",
            "5",
            "--settings",
            "s.json",
            "--json",
        ]))
        .unwrap();
        assert_eq!(parsed.seed, Some(9));
        assert_eq!(parsed.bag_copies, Some(5));
        assert_eq!(parsed.settings_path, Some(PathBuf::from("s.json")));
        assert!(parsed.json);
    }

    #[test]
    fn parse_args_rejects_bad_input() {
        assert!(parse_args(&args(&["--seed"])).is_err());
        assert!(parse_args(&args(&["--seed", "x"])).is_err());
        assert!(parse_args(&args(&["--fast"])).is_err());
        assert!(parse_args(&args(&["--bag-copies", "0"])).is_err());
    }

    #[test]
    fn parse_input_words_and_aliases() {
        assert_eq!(parse_input("left"), Some(ConsoleInput::Command(Command::MoveLeft)));
        assert_eq!(parse_input("K\n"), Some(ConsoleInput::Command(Command::RotateCw)));
        assert_eq!(parse_input(" "), Some(ConsoleInput::Command(Command::HardDrop)));
        assert_eq!(parse_input("hardDrop"), Some(ConsoleInput::Command(Command::HardDrop)));
        assert_eq!(parse_input("q"), Some(ConsoleInput::Quit));
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("jump"), None);
    }

    #[test]
    fn apply_to_overrides_env_values() {
        let mut config = RuntimeConfig {
            seed: Some(1),
            ..RuntimeConfig::default()
        };
        ConsoleArgs::default().apply_to(&mut config);
        assert_eq!(config.seed, Some(1));
        ConsoleArgs {
            seed: Some(2),
            ..ConsoleArgs::default()
        }
        .apply_to(&mut config);
        assert_eq!(config.seed, Some(2));
        assert_eq!(config.bag_copies, 1);

        ConsoleArgs {
            bag_copies: Some(5),
            ..ConsoleArgs::default()
        }
        .apply_to(&mut config);
        assert_eq!(config.bag_copies, 5);
        assert_eq!(config.seed, Some(2));
    }
}
