use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use ntd_core::{commit, Die, Digest, Key};
use ntd_game::{
    parse_dice, Game, GameConfig, GameError, Player, Purpose, RoundEvent, RoundOutcome, Side,
};
use tracing_subscriber::EnvFilter;

const EXAMPLE: &str = "ntd 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7";

/// Non-transitive dice game with provably fair rolls.
#[derive(Debug, Parser)]
#[clap(name = "ntd", version, args_conflicts_with_subcommands = true)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,

    /// Dice as comma-separated faces, e.g. 2,2,4,4,9,9
    #[clap(value_name = "DIE", allow_hyphen_values = true)]
    dice: Vec<String>,

    /// Log filter used when RUST_LOG is not set
    #[clap(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Checks a revealed key and value against a published HMAC
    Verify {
        /// The revealed key, hex encoded
        #[clap(long)]
        key: String,
        /// The revealed value
        #[clap(long)]
        value: u64,
        /// The HMAC published before the reveal, hex encoded
        #[clap(long)]
        digest: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(&cli.log_level);

    let result = match cli.command {
        Some(Command::Verify { key, value, digest }) => {
            verify(&key, value, &digest).map(report_verification)
        }
        None => play(&cli.dice).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(err @ GameError::Parse(_)) => {
            eprintln!("Error: {err}");
            eprintln!("Each die is a comma-separated list of integers, for example:");
            eprintln!("  {EXAMPLE}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns `true` if `digest` matches the hex encoded `key` and `value`.
fn verify(key: &str, value: u64, digest: &str) -> Result<bool, GameError> {
    let key = Key::from_hex(key)?;
    let digest = Digest::from_hex(digest)?;

    Ok(commit::verify(key.as_bytes(), value, digest.as_bytes())?)
}

fn report_verification(matched: bool) -> ExitCode {
    if matched {
        println!("OK: the HMAC matches the key and value.");
        ExitCode::SUCCESS
    } else {
        println!("MISMATCH: the HMAC does not match the key and value.");
        ExitCode::FAILURE
    }
}

fn play(args: &[String]) -> Result<(), GameError> {
    let config = GameConfig::default();
    let dice = parse_dice(args, &config)?;

    let mut game = Game::new(dice, config)?;
    let mut player = ConsolePlayer::new(io::stdin().lock(), game.help_table());

    loop {
        match game.play_round(&mut player) {
            Ok(outcome) => print_outcome(&outcome),
            Err(GameError::Quit) => break,
            Err(err) => return Err(err),
        }

        match player.confirm("Play again? (y/n)") {
            Ok(true) => {}
            Ok(false) | Err(GameError::Quit) => break,
            Err(err) => return Err(err),
        }
    }

    println!("Goodbye!");

    Ok(())
}

fn print_outcome(outcome: &RoundOutcome) {
    let (player, house) = (outcome.player_face, outcome.house_face);

    match outcome.winner() {
        Some(Side::Player) => println!("You win ({player} > {house})!"),
        Some(Side::House) => println!("I win ({house} > {player})!"),
        None => println!("It's a tie ({player} = {house})!"),
    }
}

enum Input {
    Exit,
    Help,
    Line(String),
}

/// A player answering prompts on the terminal.
struct ConsolePlayer<B> {
    input: B,
    help: String,
    digest: Option<Digest>,
}

impl<B: BufRead> ConsolePlayer<B> {
    fn new(input: B, help: String) -> Self {
        Self {
            input,
            help,
            digest: None,
        }
    }

    fn read(&mut self, prompt: &str) -> Result<Input, GameError> {
        print!("{prompt} ");
        io::stdout().flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(Input::Exit);
        }

        let line = line.trim();
        Ok(if line.eq_ignore_ascii_case("x") {
            Input::Exit
        } else if line == "?" {
            Input::Help
        } else {
            Input::Line(line.to_string())
        })
    }

    /// Asks until `parse` accepts the answer.
    fn ask<T>(
        &mut self,
        prompt: &str,
        mut parse: impl FnMut(&str) -> Option<T>,
    ) -> Result<T, GameError> {
        loop {
            match self.read(prompt)? {
                Input::Exit => return Err(GameError::Quit),
                Input::Help => print!("{}", self.help),
                Input::Line(line) => match parse(&line) {
                    Some(value) => return Ok(value),
                    None => println!("Invalid selection, try again."),
                },
            }
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, GameError> {
        self.ask(prompt, |answer| match answer.to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(true),
            "n" | "no" => Some(false),
            _ => None,
        })
    }
}

impl<B: BufRead> Player for ConsolePlayer<B> {
    fn contribute(
        &mut self,
        purpose: Purpose,
        range: u64,
        digest: &Digest,
    ) -> Result<u64, GameError> {
        match purpose {
            Purpose::MoveOrder => println!("Let's determine who makes the first move."),
            Purpose::HouseRoll => println!("It's time for my roll."),
            Purpose::PlayerRoll => println!("It's time for your roll."),
        }
        println!(
            "I selected a random value in the range 0..{} (HMAC={digest}).",
            range - 1
        );
        match purpose {
            Purpose::MoveOrder => {
                println!("Add your number modulo {range}. You pick first if the result is 1.")
            }
            _ => println!("Add your number modulo {range}."),
        }
        for value in 0..range {
            println!("{value} - {value}");
        }
        println!("X - exit");
        println!("? - help");

        self.digest = Some(*digest);

        self.ask("Your selection:", |answer| {
            answer.parse::<u64>().ok().filter(|value| *value < range)
        })
    }

    fn select_die(&mut self, dice: &[Die], taken: Option<usize>) -> Result<usize, GameError> {
        println!("Choose your dice:");
        for (index, die) in dice.iter().enumerate() {
            if Some(index) != taken {
                println!("{index} - {die}");
            }
        }
        println!("X - exit");
        println!("? - help");

        self.ask("Your selection:", |answer| {
            answer
                .parse::<usize>()
                .ok()
                .filter(|index| *index < dice.len() && Some(*index) != taken)
        })
    }

    fn observe(&mut self, event: &RoundEvent<'_>) {
        match event {
            RoundEvent::FirstMove(Side::House) => println!("I make the first move."),
            RoundEvent::FirstMove(Side::Player) => println!("You make the first move."),
            RoundEvent::DieSelected {
                side: Side::House,
                die,
                ..
            } => println!("I choose the [{die}] dice."),
            RoundEvent::DieSelected {
                side: Side::Player,
                die,
                ..
            } => println!("You choose the [{die}] dice."),
            RoundEvent::Revealed { purpose, reveal } => {
                println!(
                    "My number is {} (KEY={}).",
                    reveal.hidden_value,
                    reveal.key.to_hex()
                );
                if *purpose != Purpose::MoveOrder {
                    println!(
                        "The fair number generation result is {} + {} = {} (mod {}).",
                        reveal.hidden_value,
                        reveal.counterpart_value,
                        reveal.result,
                        reveal.range
                    );
                }

                // Check the reveal independently of the house.
                if let Some(digest) = self.digest.take() {
                    if !matches!(reveal.verify(&digest), Ok(true)) {
                        println!("WARNING: the revealed key and number do not match the HMAC!");
                    }
                }
            }
            RoundEvent::Rolled {
                side: Side::House,
                face,
            } => println!("My roll result is {face}."),
            RoundEvent::Rolled {
                side: Side::Player,
                face,
            } => println!("Your roll result is {face}."),
        }
    }
}
