//! Terminal front end for the gridsage engine.
//!
//! Usage: `gridsage [-g N] [-h] [file]` - start game `N`, show help, or
//! open a saved game. A small line-based command loop then drives the
//! session.

use std::{
    io::{self, BufRead as _, Write as _},
    path::{Path, PathBuf},
    process::ExitCode,
    time::{SystemTime, UNIX_EPOCH},
};

use gridsage_core::{CellFlags, CellRef, Symbol};
use gridsage_game::{EnterMode, PlayDuration, Session, Status, UiCallbacks};
use log::error;

const USAGE: &str = "\
usage: gridsage [-g N] [-h] [file]
  -g N   start with game number N (1-10000)
  -h     show this help
  file   open a saved game

commands:
  s R C   select row R, column C (1-9)    u / r   undo / redo
  e N     toggle symbol N in selection    m / b   set / return to bookmark
  x       erase selection                 c       check solvability
  f / F   pencil selection / everything   v       solve from here
  h       hint                            t       apply one hint step
  w FILE  save to FILE                    q       quit";

/// Callback table printing to stdout.
struct TerminalUi;

impl UiCallbacks for TerminalUi {
    fn set_window_name(&mut self, name: &str) {
        println!("== {name} ==");
    }

    fn set_status(&mut self, status: Status) {
        match status {
            Status::Blank => {}
            Status::Duplicate => println!("duplicate symbol"),
            Status::Mark(n) => println!("bookmark {n} set"),
            Status::Back(n) => println!("back at bookmark ({n} left)"),
            Status::Check(true) => println!("still solvable"),
            Status::Check(false) => println!("no longer solvable"),
            Status::Hint(Some(kind)) => println!("hint: {kind:?}"),
            Status::Hint(None) => println!("no hint found"),
            Status::NoSolution => println!("no solution"),
            Status::OneSolution => println!("exactly one solution"),
            Status::SeveralSolutions => println!("several solutions"),
            Status::Over => println!("game over"),
        }
    }

    fn set_enter_mode(&mut self, mode: EnterMode) {
        let _ = mode;
    }

    fn success_dialog(&mut self, duration: PlayDuration) {
        println!(
            "solved in {:02}:{:02}:{:02} - congratulations!",
            duration.hours, duration.minutes, duration.seconds
        );
    }
}

fn print_grid(session: &Session<TerminalUi>) {
    let grid = session.grid();
    for row in 0..9u8 {
        if row % 3 == 0 {
            println!("+---------+---------+---------+");
        }
        let mut line = String::new();
        for col in 0..9u8 {
            if col % 3 == 0 {
                line.push('|');
            }
            let cell = grid.cell(CellRef::new(row, col));
            let selected = cell.flags().contains(CellFlags::SELECTED);
            let hinted = cell.flags().contains(CellFlags::HINT);
            let body = match cell.symbol() {
                Some(symbol) => symbol.as_char(),
                None if cell.is_empty() => ' ',
                None => '*', // penciled cell
            };
            let (open, close) = if selected {
                ('[', ']')
            } else if hinted {
                ('>', '<')
            } else {
                (' ', ' ')
            };
            line.push(open);
            line.push(body);
            line.push(close);
        }
        line.push('|');
        println!("{line}");
    }
    println!("+---------+---------+---------+");
}

struct Args {
    game_number: Option<u32>,
    file: Option<PathBuf>,
    help: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        game_number: None,
        file: None,
        help: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => args.help = true,
            "-g" => {
                let value = iter.next().ok_or("-g needs a game number")?;
                let number = value
                    .parse::<u32>()
                    .map_err(|_| format!("invalid game number {value:?}"))?;
                args.game_number = Some(number);
            }
            _ if arg.starts_with('-') => return Err(format!("unknown option {arg:?}")),
            _ => args.file = Some(PathBuf::from(arg)),
        }
    }
    Ok(args)
}

fn parse_coord(token: Option<&str>) -> Option<u8> {
    let value: u8 = token?.parse().ok()?;
    (1..=9).contains(&value).then_some(value - 1)
}

fn run_command(session: &mut Session<TerminalUi>, line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    match tokens.next() {
        None => {}
        Some("q") => return false,
        Some("s") => {
            let (Some(row), Some(col)) = (parse_coord(tokens.next()), parse_coord(tokens.next()))
            else {
                println!("usage: s R C with R, C in 1-9");
                return true;
            };
            session.set_selection(Some(CellRef::new(row, col)));
        }
        Some("e") => match parse_coord(tokens.next()) {
            Some(index) => session.enter_symbol(Symbol::from_index(index)),
            None => println!("usage: e N with N in 1-9"),
        },
        Some("x") => session.erase_selection(),
        Some("u") => session.undo(),
        Some("r") => session.redo(),
        Some("m") => session.mark_state(),
        Some("b") => session.back_to_mark(),
        Some("c") => session.check_from_current_position(),
        Some("v") => session.solve_from_current_position(),
        Some("f") => session.fill(true),
        Some("F") => session.fill_all(true),
        Some("h") => session.hint(),
        Some("t") => {
            session.step();
        }
        Some("w") => match tokens.next() {
            Some(path) => {
                if let Err(err) = session.save_file(Path::new(path)) {
                    error!("save failed: {err}");
                }
            }
            None => println!("usage: w FILE"),
        },
        Some(other) => println!("unknown command {other:?} (try -h)"),
    }
    true
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let entropy = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let mut session = Session::new(TerminalUi, entropy);

    if let Some(path) = &args.file {
        if let Err(err) = session.open_file(path) {
            eprintln!("cannot open {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
    } else {
        session.random_game(args.game_number);
    }

    let stdin = io::stdin();
    loop {
        print_grid(&session);
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if !run_command(&mut session, &line) {
                    break;
                }
            }
            Err(err) => {
                error!("stdin: {err}");
                break;
            }
        }
    }
    ExitCode::SUCCESS
}
