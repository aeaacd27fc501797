//! Tabletop simulator - command line driver
//!
//! `sim play` runs one game with a readable log; `sim batch` runs many games
//! in parallel and prints win statistics.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tabletop_sim::{
    config::SimulationConfig,
    experiment::Experiment,
    game::{GameSimulator, StrategyKind, VerbosityLevel},
    loader::{extend_catalog_from_file, CardCatalog, DeckSource, DefinedPlayer, GameInitializer},
    Result,
};

#[derive(Parser)]
#[command(name = "sim")]
#[command(about = "Two-player card game simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game and print its log
    Play {
        #[command(flatten)]
        setup: GameArgs,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityLevel>,
    },

    /// Run many games in parallel and report statistics
    Batch {
        #[command(flatten)]
        setup: GameArgs,

        /// Number of games
        #[arg(long, short = 'g', default_value_t = 100)]
        games: u64,
    },

    /// List the built-in decks
    Decks,
}

#[derive(Args)]
struct GameArgs {
    /// Deck code (e.g. mono-red) or .dck file for player 1
    #[arg(value_name = "PLAYER1_DECK", default_value = "mono-green")]
    deck1: DeckSource,

    /// Deck code or .dck file for player 2
    #[arg(value_name = "PLAYER2_DECK", default_value = "mono-red")]
    deck2: DeckSource,

    /// Player 1 strategy (zero, random)
    #[arg(long, default_value = "zero")]
    p1: StrategyKind,

    /// Player 2 strategy (zero, random)
    #[arg(long, default_value = "random")]
    p2: StrategyKind,

    #[arg(long, default_value = "Player 1")]
    p1_name: String,

    #[arg(long, default_value = "Player 2")]
    p2_name: String,

    /// JSON configuration file; flags below override it
    #[arg(long, value_name = "CONFIG_JSON")]
    config: Option<PathBuf>,

    /// Extra JSON card catalog merged over the built-in cards
    #[arg(long, value_name = "CATALOG_JSON")]
    catalog: Option<PathBuf>,

    /// Set random seed for deterministic games
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_turns: Option<u32>,

    /// End the game at the first illegal action
    #[arg(long)]
    terminate_on_illegal: bool,
}

impl GameArgs {
    fn config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(max_turns) = self.max_turns {
            config = config.with_max_turns(max_turns);
        }
        if self.terminate_on_illegal {
            config = config.with_terminate_on_illegal_action(true);
        }
        Ok(config)
    }

    fn players(&self) -> [DefinedPlayer; 2] {
        [
            DefinedPlayer::new(self.p1_name.as_str(), self.deck1.clone(), self.p1),
            DefinedPlayer::new(self.p2_name.as_str(), self.deck2.clone(), self.p2),
        ]
    }

    async fn catalog(&self) -> Result<CardCatalog> {
        let mut catalog = CardCatalog::builtin();
        if let Some(path) = &self.catalog {
            extend_catalog_from_file(&mut catalog, path).await?;
        }
        Ok(catalog)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { setup, verbosity } => run_play(setup, verbosity).await?,
        Commands::Batch { setup, games } => run_batch(setup, games).await?,
        Commands::Decks => {
            let catalog = CardCatalog::builtin();
            for code in catalog.deck_codes() {
                let deck = catalog.deck(code)?;
                println!("{code:12} {} ({} cards)", deck.name, deck.len());
            }
        }
    }

    Ok(())
}

async fn run_play(setup: GameArgs, verbosity: Option<VerbosityLevel>) -> Result<()> {
    let mut config = setup.config()?;
    if let Some(level) = verbosity {
        config = config.with_verbosity(level);
    }
    let catalog = setup.catalog().await?;
    let players = setup.players();
    let seats = GameInitializer::new(&catalog).seats(&players).await?;

    let mut tabletop = GameInitializer::init_game(seats, &config);
    let mut judge = GameInitializer::judge_for(&mut tabletop, &players, &config);
    let result = GameSimulator::new(config).run(tabletop, &mut judge)?;

    println!("\n=== Game Over ===");
    match result.winner.and_then(|w| result.tabletop.player(w).ok()) {
        Some(winner) => println!("Winner: {} ({:?})", winner.name, result.end_reason),
        None => println!("No winner ({:?})", result.end_reason),
    }
    println!("Turns played: {}", result.turns_played);
    for player in result.tabletop.players() {
        println!("  {}: {} life, {} cards in library", player.name, player.life, player.library.quantity());
    }
    if !result.messages.is_empty() {
        println!("Validation failures:");
        for message in &result.messages {
            println!("  {message}");
        }
    }
    Ok(())
}

async fn run_batch(setup: GameArgs, games: u64) -> Result<()> {
    let config = setup.config()?;
    let catalog = setup.catalog().await?;
    let players = setup.players();
    let seats = GameInitializer::new(&catalog).seats(&players).await?;

    println!(
        "Running {games} games: {} ({}) vs {} ({}), seed {}",
        seats[0].deck.name, players[0].strategy, seats[1].deck.name, players[1].strategy, config.seed
    );
    let report = Experiment::new(players, seats, config, games).run()?;
    println!("{report}");
    Ok(())
}
