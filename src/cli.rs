/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    str::FromStr,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{bail, Context, Result};
use clap::{builder::PossibleValue, Parser, ValueEnum};

use crate::{
    rules::{divide, perft},
    Color, Engine, Evaluator, GameError, Move, SearchConfig, Square, State,
    DEFAULT_DEPTH,
};

/// Play chess against the computer from the terminal.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// How many plies the computer searches ahead.
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Which side the human plays. The computer plays the other.
    #[arg(long, value_enum, default_value_t = Color::White)]
    pub human: Color,

    /// Start from this position instead of the standard one.
    #[arg(long)]
    pub fen: Option<String>,

    /// Search without alpha-beta pruning (plain minimax).
    #[arg(long, default_value = "false")]
    pub no_pruning: bool,

    /// Log filter, such as `info` or `gambit=debug`. Overridden by `RUST_LOG`.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// The search configuration requested on the command line.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            alpha_beta: !self.no_pruning,
        }
    }
}

/// A command typed at the console.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<COMMAND> | <FROM><TO>")
)]
pub enum EngineCommand {
    /// Play a move, such as `move e2 e4` or `move e2e4`. The computer replies automatically.
    #[command(alias = "m")]
    Move {
        /// Source square, or the whole move if `to` is omitted.
        from: String,

        /// Destination square.
        to: Option<String>,
    },

    /// Let the computer play a move for the side to move.
    Go,

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print an evaluation of the current position.
    Eval {
        /// If set, a breakdown of every evaluation term will be printed.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Shows all legal moves in the current position, or for a specific piece.
    Moves {
        square: Option<Square>,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are listed in the order the search considers them.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Set up the position from a FEN string. Clears the move history.
    #[command(alias = "pos")]
    Position {
        fen: Vec<String>, // This is a vector in order to support FENs containing spaces
    },

    /// Print whether the side to move is in check, checkmated, or stalemated.
    Status,

    /// Print every move played so far.
    History,

    /// Display the search depth, or change it.
    Depth { depth: Option<usize> },

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Start a new game from the standard position.
    New,

    /// Quit the game.
    #[command(alias = "quit")]
    Exit,
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    ///
    /// If this fails, it will attempt to parse the string as a bare move, such as `e2e4`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::try_parse_from(s.split_ascii_whitespace()) {
            Ok(cmd) => Ok(cmd),
            Err(e) => {
                if let Ok(mv) = Move::from_uci(s) {
                    Ok(Self::Move {
                        from: mv.from().to_string(),
                        to: Some(mv.to().to_string()),
                    })
                } else {
                    Err(e)
                }
            }
        }
    }
}

impl ValueEnum for Color {
    fn value_variants<'a>() -> &'a [Self] {
        &[Color::White, Color::Black]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = match self {
            Color::White => PossibleValue::new("white").alias("w"),
            Color::Black => PossibleValue::new("black").alias("b"),
        };

        Some(value)
    }
}

/// The console game: a human at the keyboard against the [`Engine`].
#[derive(Debug)]
pub struct Console {
    /// The game being played.
    engine: Engine,

    /// The side the human plays.
    human: Color,

    /// One half of a channel, responsible for sending commands to the console to execute.
    sender: Sender<EngineCommand>,

    /// One half of a channel, responsible for receiving commands for the console to execute.
    receiver: Receiver<EngineCommand>,
}

impl Console {
    /// Constructs a new [`Console`] from parsed command-line arguments.
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = cli.search_config();
        let engine = match &cli.fen {
            Some(fen) => Engine::from_fen(fen, config)?,
            None => Engine::new(config),
        };

        let (sender, receiver) = channel();

        Ok(Self {
            engine,
            human: cli.human,
            sender,
            receiver,
        })
    }

    /// Fetches the game being played.
    #[inline(always)]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Execute the main event loop of the game.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        println!("{}\n", self.engine.state());

        // If the human plays Black, the computer opens
        self.reply_if_computers_turn();

        while let Ok(cmd) = self.receiver.recv() {
            // Keep running, even on error
            match self.execute(cmd) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => eprintln!("Error: {e}"),
            }
        }

        Ok(())
    }

    /// Executes a single command, returning `false` if the console should stop.
    pub fn execute(&mut self, cmd: EngineCommand) -> Result<bool> {
        match cmd {
            EngineCommand::Move { from, to } => self.human_move(&from, to.as_deref())?,

            EngineCommand::Go => self.computer_move()?,

            EngineCommand::Display => println!("{}", self.engine.state()),

            EngineCommand::Eval { pretty } => self.eval(pretty),

            EngineCommand::Moves { square, sort } => {
                // Get the legal moves
                let mut moves = if let Some(square) = square {
                    self.engine.legal_moves_from(square)
                } else {
                    self.engine.legal_moves()
                };

                if sort {
                    moves.sort_by_key(|mv| mv.to_string());
                }

                println!("{}", list_moves(moves));
            }

            EngineCommand::Fen => println!("{}", self.engine.state().to_fen()),

            EngineCommand::Position { fen } => {
                let state = State::from_fen(&fen.join(" "))?;
                self.engine.set_state(state);
                println!("{}", self.engine.state());
            }

            EngineCommand::Status => println!("{}", self.engine.status()),

            EngineCommand::History => {
                for (i, event) in self.engine.history().iter().enumerate() {
                    println!("{:>3}. {event}", i + 1);
                }
            }

            EngineCommand::Depth { depth } => {
                if let Some(depth) = depth {
                    self.engine.set_depth(depth);
                }
                println!("depth {}", self.engine.depth());
            }

            EngineCommand::Perft { depth } => {
                let nodes = perft(self.engine.state(), depth);
                println!("{nodes}");
            }

            EngineCommand::Splitperft { depth } => {
                let split = divide(self.engine.state(), depth);
                let total: u64 = split.iter().map(|&(_, nodes)| nodes).sum();
                for (mv, nodes) in split {
                    println!("{mv}\t{nodes}");
                }
                println!("\n{total}");
            }

            EngineCommand::New => {
                self.engine.new_game();
                println!("{}\n", self.engine.state());
                self.reply_if_computers_turn();
            }

            EngineCommand::Exit => return Ok(false),
        }

        Ok(true)
    }

    /// Plays the human's move and, if the game goes on, the computer's reply.
    fn human_move(&mut self, from: &str, to: Option<&str>) -> Result<()> {
        let event = match to {
            Some(to) => self.engine.apply_move(from, to)?,
            None => {
                let mv = Move::from_uci(from)?;
                self.engine.play(mv)?
            }
        };

        println!("{event}\n\n{}\n", self.engine.state());

        self.reply_if_computers_turn();
        Ok(())
    }

    /// Asks the engine for a move and plays it.
    fn computer_move(&mut self) -> Result<()> {
        let res = self.engine.think()?;
        let event = match res.bestmove {
            Some(mv) => self.engine.play(mv)?,
            None => bail!("Search at depth {} found no move", res.depth),
        };

        println!(
            "{event} [depth {} score {} nodes {}]\n\n{}\n",
            res.depth,
            res.score,
            res.nodes,
            self.engine.state()
        );
        Ok(())
    }

    /// Lets the computer move if the game is not over and it is not the human's turn.
    fn reply_if_computers_turn(&mut self) {
        if self.engine.current_turn() == self.human {
            return;
        }

        match self.computer_move() {
            Ok(()) => {}
            Err(e) => match e.downcast_ref::<GameError>() {
                // The game is over; that is an outcome, not a failure
                Some(GameError::NoLegalMoves { status, .. }) => println!("Game over: {status}"),
                _ => eprintln!("Error: {e}"),
            },
        }
    }

    /// Executes the `eval` command, printing an evaluation of the current position.
    fn eval(&self, pretty: bool) {
        let evaluator = Evaluator::new(self.engine.state());
        if pretty {
            println!("{evaluator}");
        } else {
            println!("{}", evaluator.eval());
        }
    }
}

/// Joins moves by comma-space, or `(none)` if there are none.
fn list_moves(moves: impl IntoIterator<Item = Move>) -> String {
    let moves = moves
        .into_iter()
        .map(|mv| mv.to_string())
        .collect::<Vec<_>>();

    if moves.is_empty() {
        String::from("(none)")
    } else {
        moves.join(", ")
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            sender
                .send(EngineCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            return Ok(());
        }

        // Ignore empty lines
        let buf = buffer.trim();
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<EngineCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to console")?,

            // If an invalid command was received, just print the error and continue running
            Err(err) => eprintln!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(args: &[&str]) -> Console {
        let args = std::iter::once("gambit").chain(args.iter().copied());
        let cli = Cli::try_parse_from(args).unwrap();
        Console::new(&cli).unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["gambit"]).unwrap();
        assert_eq!(cli.depth, 4);
        assert_eq!(cli.human, Color::White);
        assert!(cli.fen.is_none());
        assert_eq!(cli.search_config(), SearchConfig::default());
    }

    #[test]
    fn test_cli_options() {
        let args = ["gambit", "--depth", "2", "--human", "black", "--no-pruning"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.human, Color::Black);
        assert_eq!(
            cli.search_config(),
            SearchConfig {
                depth: 2,
                alpha_beta: false
            }
        );

        assert!(Cli::try_parse_from(["gambit", "--human", "purple"]).is_err());
    }

    #[test]
    fn test_parse_commands() {
        assert!(matches!("d".parse::<EngineCommand>(), Ok(EngineCommand::Display)));
        assert!(matches!("go".parse::<EngineCommand>(), Ok(EngineCommand::Go)));
        assert!(matches!(
            "eval --pretty".parse::<EngineCommand>(),
            Ok(EngineCommand::Eval { pretty: true })
        ));
        assert!(matches!(
            "moves e2".parse::<EngineCommand>(),
            Ok(EngineCommand::Moves {
                square: Some(Square::E2),
                sort: false
            })
        ));
        assert!(matches!(
            "perft 3".parse::<EngineCommand>(),
            Ok(EngineCommand::Perft { depth: 3 })
        ));
        assert!("fly".parse::<EngineCommand>().is_err());
    }

    #[test]
    fn test_parse_moves() {
        let Ok(EngineCommand::Move { from, to }) = "m e2 e4".parse::<EngineCommand>() else {
            panic!("expected a move command");
        };
        assert_eq!((from.as_str(), to.as_deref()), ("e2", Some("e4")));

        let Ok(EngineCommand::Move { from, to }) = "g1f3".parse::<EngineCommand>() else {
            panic!("expected a bare move to be accepted");
        };
        assert_eq!((from.as_str(), to.as_deref()), ("g1", Some("f3")));
    }

    #[test]
    fn test_human_move_gets_a_reply() {
        let mut console = console(&["--depth", "1"]);
        let cmd = "e2e4".parse().unwrap();
        assert!(console.execute(cmd).unwrap());

        let history = console.engine().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].side, Color::White);
        assert_eq!(history[1].side, Color::Black);
        assert_eq!(console.engine().current_turn(), Color::White);
    }

    #[test]
    fn test_rejected_move_gets_no_reply() {
        let mut console = console(&["--depth", "1"]);
        assert!(console.execute("e2e5".parse().unwrap()).is_err());
        assert!(console.engine().history().is_empty());
    }

    #[test]
    fn test_position_and_exit() {
        let mut console = console(&[]);
        let cmd = "position 4k3/8/8/8/8/8/8/4K3 b".parse().unwrap();
        assert!(console.execute(cmd).unwrap());
        assert_eq!(console.engine().current_turn(), Color::Black);

        // A layout no game can reach is refused, and the current game is kept
        let cmd = "position Q2Q4/1Q4Q1/4Q3/2Q4R/Q4Q2/3Q4/1Q4Rp/1K1BBNNk w".parse().unwrap();
        assert!(console.execute(cmd).is_err());
        assert_eq!(console.engine().current_turn(), Color::Black);

        assert!(!console.execute(EngineCommand::Exit).unwrap());
    }
}
