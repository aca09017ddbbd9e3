use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{info, LevelFilter, Log, Metadata, Record};
use rand::{rngs::StdRng, SeedableRng};
use solitaire::{deck, AutoMove, DrawMode, Game, GameEvent, PileId, StockAction};
use std::io::{self, BufRead, Write};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DrawArg {
    #[value(name = "1")]
    One,
    #[value(name = "3")]
    Three,
}

impl From<DrawArg> for DrawMode {
    fn from(arg: DrawArg) -> Self {
        match arg {
            DrawArg::One => DrawMode::One,
            DrawArg::Three => DrawMode::Three,
        }
    }
}

/// Play Klondike solitaire in the terminal.
#[derive(Debug, Parser)]
#[command(version)]
struct Options {
    /// Cards turned over per draw
    #[arg(short, long, value_enum, default_value = "3")]
    draw: DrawArg,
    /// Seed for the shuffle; every deal of the session follows from it
    #[arg(short, long)]
    seed: Option<u64>,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    log::set_logger(&LOGGER).map_err(|err| anyhow!("{}", err))?;
    log::set_max_level(level);
    Ok(())
}

const HELP: &str = "\
commands:
  new [1|3]               deal again
  draw                    draw from the stock (or recycle the waste)
  move <from> [i] <to>    move cards; i is the card index shown by `show`
  auto <pile>             send the top card to a foundation
  flip <column>           turn up the top face-down card of a column
  pick <pile> [i]         pick cards up
  drop <pile> | <x> <y>   drop held cards on a pile or at a table position
  cancel                  put held cards back
  show | stats | json | help | quit
piles: stock, waste, f1..f4, c1..c7";

struct Session {
    game: Game,
    rng: StdRng,
}

impl Session {
    fn deal(&mut self, mode: DrawMode) {
        let cards = deck::shuffled_with(&mut self.rng);
        self.game.new_game_with_deck(mode, cards);
    }

    /// Defaults to the top card of `pile`.
    fn index_or_top(&self, pile: PileId, index: Option<&str>) -> Result<usize> {
        match index {
            Some(text) => text
                .parse()
                .with_context(|| format!("`{}` is not a card index", text)),
            None => Ok(self.game.pile_snapshot(pile).cards.len().saturating_sub(1)),
        }
    }

    fn run(&mut self, line: &str) -> Result<bool> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return Ok(true);
        };
        match (command, args) {
            ("quit" | "q" | "exit", _) => return Ok(false),
            ("help" | "h" | "?", _) => println!("{}", HELP),
            ("show", _) => println!("{}", self.game),
            ("stats", _) => {
                let stats = self.game.stats();
                println!("wins {} / losses {}", stats.wins, stats.losses);
            }
            ("json", _) => println!("{}", self.game.snapshot().to_json()?),
            ("new", []) => {
                let mode = self.game.stats().draw_mode.unwrap_or_default();
                self.deal(mode);
                println!("{}", self.game);
            }
            ("new", [count]) => {
                let count: u8 = count.parse().context("draw mode must be 1 or 3")?;
                let mode = DrawMode::try_from(count)
                    .map_err(|count| anyhow!("cannot draw {} cards at a time", count))?;
                self.deal(mode);
                println!("{}", self.game);
            }
            ("draw" | "d", []) => {
                match self.game.draw() {
                    StockAction::Drawn(cards) => println!("drew {} card(s)", cards.len()),
                    StockAction::Recycled(count) => println!("recycled {} card(s)", count),
                    StockAction::NoOp => println!("nothing left to draw"),
                }
                println!("{}", self.game);
            }
            ("move" | "m", [from, rest @ ..]) if !rest.is_empty() && rest.len() <= 2 => {
                let from: PileId = from.parse()?;
                let (index, to) = match rest {
                    [to] => (None, *to),
                    [index, to] => (Some(*index), *to),
                    _ => unreachable!(),
                };
                let to: PileId = to.parse()?;
                let index = self.index_or_top(from, index)?;
                self.game.pick_up(from, index)?;
                let outcome = self.game.drop_on(Some(to))?;
                println!("{:?}", outcome);
                println!("{}", self.game);
            }
            ("auto" | "a", [pile]) => {
                match self.game.auto_move(pile.parse::<PileId>()?) {
                    AutoMove::Moved { from, to, card } => {
                        println!("{} moved from {} to {}", card, from, to)
                    }
                    AutoMove::NoOp => println!("no foundation takes that card"),
                }
                println!("{}", self.game);
            }
            ("flip", [pile]) => {
                let PileId::Column(column) = pile.parse::<PileId>()? else {
                    bail!("only columns can be flipped");
                };
                if !self.game.flip_column(column) {
                    println!("nothing to turn over");
                }
                println!("{}", self.game);
            }
            ("pick", [pile, index @ ..]) if index.len() <= 1 => {
                let pile: PileId = pile.parse()?;
                let index = self.index_or_top(pile, index.first().copied())?;
                let held = self.game.pick_up(pile, index)?;
                println!("holding {} card(s)", held.len());
            }
            ("drop", [pile]) => {
                let outcome = self.game.drop_on(Some(pile.parse::<PileId>()?))?;
                println!("{:?}", outcome);
                println!("{}", self.game);
            }
            ("drop", [x, y]) => {
                let x: i32 = x.parse().context("x must be a number")?;
                let y: i32 = y.parse().context("y must be a number")?;
                let region = self.game.layout().run_bounds(x, y, self.game.held().len());
                let outcome = self.game.drop_at(region)?;
                println!("{:?}", outcome);
                println!("{}", self.game);
            }
            ("cancel", []) => match self.game.cancel_transfer() {
                Some(origin) => println!("cards returned to {}", origin),
                None => println!("not holding anything"),
            },
            _ => bail!("unrecognized command `{}` (try `help`)", line.trim()),
        }
        self.report_events();
        Ok(true)
    }

    fn report_events(&mut self) {
        for event in self.game.drain_events() {
            if event == GameEvent::WinDetected {
                let deal = self.game.deal_number();
                let mut frames = 0;
                while self.game.step_celebration(deal).is_some() {
                    frames += 1;
                }
                info!("celebration finished after {} frames", frames);
                let stats = self.game.stats();
                println!("You won! wins {} / losses {}", stats.wins, stats.losses);
            }
        }
    }
}

fn main() -> Result<()> {
    let options = Options::parse();
    init_logging(options.verbose)?;

    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session {
        game: Game::new(),
        rng,
    };
    session.deal(options.draw.into());
    println!("{}", session.game);
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match session.run(&line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("error: {:#}", err),
        }
    }
    Ok(())
}
