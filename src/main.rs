use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::mpsc::{channel, Sender};
use std::thread;
use std::time::Duration;

use env_logger::Env;
use log::{error, warn};

use arcade_chess::utils::algebraic::{parse_square, square_name};
use arcade_chess::utils::render_game_state::render_board;
use arcade_chess::{ChessErrors, GameConfig, GameSession, Side, TurnClock};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

enum Event {
    Tick,
    Line(String),
    InputClosed,
}

fn spawn_ticker(tx: Sender<Event>) {
    thread::spawn(move || loop {
        thread::sleep(TICK_INTERVAL);
        if tx.send(Event::Tick).is_err() {
            break;
        }
    });
}

fn spawn_stdin_reader(tx: Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let trimmed = line.trim().to_owned();
            if !trimmed.is_empty() && tx.send(Event::Line(trimmed)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::InputClosed);
    });
}

fn print_position(session: &GameSession, clock: &TurnClock) {
    println!("{}", render_board(session.board()));
    println!(
        "White {}  Black {}  |  {} to move, {}",
        clock.formatted(Side::White),
        clock.formatted(Side::Black),
        session.side_to_move(),
        session.status()
    );
    if let Some(row) = session.move_rows().last() {
        println!("{}. {} {}", row.move_number, row.white, row.black);
    }
    print!("> ");
    io::stdout().flush().ok();
}

fn print_help() {
    println!("Enter moves as e2e4 / e7e8q or in SAN (Nf3, O-O, exd8=Q).");
    println!("Commands: moves <square>, board, clock, history, pgn, json, reset, help, quit");
}

/// Returns false when the loop should stop.
fn handle_line(line: &str, session: &mut GameSession, clock: &mut TurnClock) -> bool {
    let mut words = line.split_whitespace();
    match (words.next().unwrap_or_default(), words.next()) {
        ("quit" | "exit", _) => return false,
        ("help", _) => print_help(),
        ("board", _) => {}
        ("clock", _) => println!(
            "White {}  Black {}",
            clock.formatted(Side::White),
            clock.formatted(Side::Black)
        ),
        ("history", _) => {
            for row in session.move_rows() {
                println!("{:>3}. {:<8} {}", row.move_number, row.white, row.black);
            }
        }
        ("moves", Some(square)) => match parse_square(square) {
            Ok(sq) => {
                let targets: Vec<String> = session
                    .legal_moves_from(sq)
                    .iter()
                    .map(|mv| square_name(mv.to()))
                    .collect();
                println!("{square}: {}", targets.join(" "));
            }
            Err(err) => println!("{err}"),
        },
        ("pgn", _) => match session.to_pgn() {
            Ok(pgn) => println!("{pgn}"),
            Err(err) => error!("could not export PGN: {err}"),
        },
        ("json", _) => match session.snapshot(clock).to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => error!("could not serialize snapshot: {err}"),
        },
        ("reset", _) => {
            session.reset();
            clock.reset();
        }
        _ => {
            let attempt = session
                .attempt_long_algebraic(line)
                .or_else(|err| match err {
                    ChessErrors::InvalidLongAlgebraic(_) => session.attempt_san(line),
                    other => Err(other),
                });
            match attempt {
                Ok(entry) => {
                    if session.is_terminal() {
                        println!("{}: {} ({})", entry.san, session.status(), session.result_text());
                    }
                }
                Err(err) => println!("{err}"),
            }
        }
    }

    print_position(session, clock);
    true
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::new().default_filter_or("info"));

    let config = GameConfig::from_env();
    let mut session = match GameSession::with_config(config) {
        Ok(session) => session,
        Err(err) => {
            error!("cannot start game: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut clock = TurnClock::new();

    let (tx, rx) = channel::<Event>();
    spawn_ticker(tx.clone());
    spawn_stdin_reader(tx);

    print_help();
    print_position(&session, &clock);

    for event in rx {
        match event {
            Event::Tick => clock.tick(&session),
            Event::Line(line) => {
                if !handle_line(&line, &mut session, &mut clock) {
                    break;
                }
            }
            Event::InputClosed => {
                warn!("stdin closed, leaving the game");
                break;
            }
        }
    }

    ExitCode::SUCCESS
}
