// ============================================================================
// REPLAY — line-oriented editor scripts for headless runs
// ============================================================================
//
// One command per line, `#` starts a comment:
//
//   select Dirt          pick the catalog entry listing this block name
//   variant shadow       shadow | normal | light | deep
//   tool circle          brush | fill | square | circle | triangle | stamp
//   size 3               brush size (1..10)
//   zoom 2               view zoom (1..4, 0.5 steps)
//   stamp derp           grin | derp
//   down 10 10           pointer press on a grid cell
//   move 20 14 [lock]    pointer drag, optionally axis-locked
//   up 20 14             pointer release
//   click 5 5            press + release on the same cell
//   clear                erase everything

use crate::canvas::GridPos;
use crate::components::tools::{Editor, Tool};
use crate::ops::stamp::StampPattern;
use crate::palette::Variant;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Select(String),
    Variant(Variant),
    Tool(Tool),
    Size(i32),
    Zoom(f32),
    Stamp(StampPattern),
    Down(GridPos),
    Move { pos: GridPos, lock: bool },
    Up(GridPos),
    Click(GridPos),
    Clear,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReplayError {
    #[error("line {line}: unknown command '{word}'")]
    UnknownCommand { line: usize, word: String },
    #[error("line {line}: {message}")]
    BadArgument { line: usize, message: String },
}

/// Outcome of a replay run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub commands: usize,
    /// `select` lines naming blocks missing from the catalog.
    pub unknown_blocks: Vec<String>,
}

fn parse_pos(line: usize, args: &[&str]) -> Result<GridPos, ReplayError> {
    let bad = |message: String| ReplayError::BadArgument { line, message };
    if args.len() < 2 {
        return Err(bad("expected two coordinates".to_string()));
    }
    let x = args[0].parse::<i32>().map_err(|_| bad(format!("bad x coordinate '{}'", args[0])))?;
    let y = args[1].parse::<i32>().map_err(|_| bad(format!("bad y coordinate '{}'", args[1])))?;
    Ok(GridPos::new(x, y))
}

fn parse_line(line: usize, text: &str) -> Result<Option<Command>, ReplayError> {
    let text = text.split('#').next().unwrap_or("").trim();
    if text.is_empty() {
        return Ok(None);
    }
    let mut words = text.split_whitespace();
    let Some(word) = words.next() else { return Ok(None) };
    let args: Vec<&str> = words.collect();
    let bad = |message: String| ReplayError::BadArgument { line, message };
    let first = args.first().copied().unwrap_or("");

    let cmd = match word.to_lowercase().as_str() {
        "select" => {
            if args.is_empty() {
                return Err(bad("expected a block name".to_string()));
            }
            Command::Select(args.join(" "))
        }
        "variant" => Command::Variant(Variant::from_key(first).ok_or_else(|| bad(format!("unknown variant '{}'", first)))?),
        "tool" => Command::Tool(Tool::from_key(first).ok_or_else(|| bad(format!("unknown tool '{}'", first)))?),
        "stamp" => Command::Stamp(StampPattern::from_key(first).ok_or_else(|| bad(format!("unknown stamp '{}'", first)))?),
        "size" => Command::Size(first.parse().map_err(|_| bad(format!("bad size '{}'", first)))?),
        "zoom" => Command::Zoom(first.parse().map_err(|_| bad(format!("bad zoom '{}'", first)))?),
        "down" => Command::Down(parse_pos(line, &args)?),
        "up" => Command::Up(parse_pos(line, &args)?),
        "click" => Command::Click(parse_pos(line, &args)?),
        "move" => {
            let pos = parse_pos(line, &args)?;
            let lock = match args.get(2) {
                None => false,
                Some(&"lock") => true,
                Some(other) => return Err(bad(format!("unexpected modifier '{}'", other))),
            };
            Command::Move { pos, lock }
        }
        "clear" => Command::Clear,
        _ => {
            return Err(ReplayError::UnknownCommand {
                line,
                word: word.to_string(),
            })
        }
    };
    Ok(Some(cmd))
}

/// Parse a whole script, stopping at the first malformed line.
pub fn parse_script(src: &str) -> Result<Vec<Command>, ReplayError> {
    let mut commands = Vec::new();
    for (idx, text) in src.lines().enumerate() {
        if let Some(cmd) = parse_line(idx + 1, text)? {
            commands.push(cmd);
        }
    }
    Ok(commands)
}

/// Feed one command to the editor. Returns `false` only for a `select`
/// naming an unknown block; everything else is tolerated.
pub fn apply(editor: &mut Editor, cmd: &Command) -> bool {
    match cmd {
        Command::Select(name) => return editor.select_block(name),
        Command::Variant(v) => editor.set_variant(*v),
        Command::Tool(t) => editor.set_tool(*t),
        Command::Size(s) => editor.set_brush_size(*s),
        Command::Zoom(z) => editor.set_zoom(*z),
        Command::Stamp(p) => editor.set_stamp(*p),
        Command::Down(pos) => editor.pointer_down(*pos),
        Command::Move { pos, lock } => editor.pointer_move(*pos, *lock),
        Command::Up(pos) => editor.pointer_up(*pos),
        Command::Click(pos) => {
            editor.pointer_down(*pos);
            editor.pointer_up(*pos);
        }
        Command::Clear => editor.clear(),
    }
    true
}

/// Parse and replay `src` on `editor`.
pub fn run_script(editor: &mut Editor, src: &str) -> Result<ReplaySummary, ReplayError> {
    let commands = parse_script(src)?;
    let mut summary = ReplaySummary::default();
    for cmd in &commands {
        if !apply(editor, cmd)
            && let Command::Select(name) = cmd
        {
            log_warn!("Script selects unknown block '{}'", name);
            summary.unknown_blocks.push(name.clone());
        }
        summary.commands += 1;
    }
    Ok(summary)
}
