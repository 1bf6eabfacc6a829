use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use pickem::config::Config;
use pickem::mode::WagerMode;
use pickem::payout::payout_table;
use pickem::props::PropBoard;
use pickem::settle::{settle, CoinFlip, Settlement};
use pickem::slip::PickSlip;
use pickem::store::UserStore;
use pickem::Result;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pick'em slips with PowerPlay and Flex payouts", long_about = None)]
struct Args {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Props file (.csv or .json), overrides the config
    #[arg(long)]
    props: Option<PathBuf>,

    /// User database JSON file, overrides the config
    #[arg(long)]
    store: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every PowerPlay and Flex multiplier
    Payouts,

    /// List the players on the board
    Players,

    /// List props, optionally for one player
    Props {
        #[arg(short, long)]
        player: Option<String>,
    },

    /// Build a slip, then settle it
    Slip {
        /// "player|stat|over" or "player|stat|line|under", player may be a name fragment or list number
        #[arg(short, long = "pick", required = true)]
        picks: Vec<String>,

        #[arg(short, long)]
        bet: f64,

        #[arg(short, long, default_value_t = WagerMode::PowerPlay)]
        mode: WagerMode,

        /// Settle against this account's balance and record it in their history
        #[arg(short, long, requires = "password")]
        user: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// Seed the coin flip
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Create an account
    Register {
        username: String,

        #[arg(long)]
        password: String,

        #[arg(short, long, default_value = "")]
        email: String,
    },

    /// Show an account's balance and past slips
    History {
        username: String,

        #[arg(long)]
        password: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    if let Some(props) = &args.props {
        config.props_path = props.clone();
    }

    if let Some(store) = &args.store {
        config.store_path = store.clone();
    }

    debug!(?config, "loaded config");
    Ok(config)
}

fn open_store(config: &Config) -> Result<UserStore> {
    Ok(UserStore::open(&config.store_path)?.with_starting_balance(config.starting_balance))
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    match args.command {
        Command::Payouts => {
            println!("{}", payout_table());
        }
        Command::Players => {
            let board = PropBoard::from_path(&config.props_path)?;
            for (index, name) in board.players().iter().enumerate() {
                println!("{}. {name}", index + 1);
            }
        }
        Command::Props { player } => {
            let board = PropBoard::from_path(&config.props_path)?;
            match player {
                Some(query) => {
                    let name = board.select_player(&query)?;
                    println!("{}", PropBoard::table_of(board.find_player_props(name)));
                }
                None => println!("{}", board.table()),
            }
        }
        Command::Slip {
            picks,
            bet,
            mode,
            user,
            password,
            seed,
        } => {
            let board = PropBoard::from_path(&config.props_path)?;

            let mut slip = PickSlip::new();
            for pick_arg in &picks {
                slip.add(board.parse_pick(pick_arg)?)?;
            }

            // goes through the same gate as flipping the mode in a live slip
            let mode = match mode {
                WagerMode::Flex => WagerMode::PowerPlay.toggled(slip.len())?,
                WagerMode::PowerPlay => WagerMode::PowerPlay,
            };

            println!("{}", slip.table());
            for line in slip.payouts().lines(mode.is_flex()) {
                println!("{line}");
            }

            let mut store = user.as_ref().map(|_| open_store(&config)).transpose()?;
            let balance = match (&store, &user) {
                (Some(store), Some(username)) => {
                    store
                        .authenticate(username, password.as_deref().unwrap_or_default())?
                        .balance
                }
                _ => config.starting_balance,
            };

            let settlement: Settlement = match seed {
                Some(seed) => settle(
                    &slip,
                    mode,
                    bet,
                    balance,
                    &mut CoinFlip::new(StdRng::seed_from_u64(seed)),
                )?,
                None => settle(&slip, mode, bet, balance, &mut CoinFlip::default())?,
            };

            println!();
            println!("{}", settlement.summary());

            if let (Some(store), Some(username)) = (store.as_mut(), user.as_deref()) {
                store.record_settlement(username, &slip, &settlement)?;
                if settlement.balance_after <= 0.0 {
                    println!("You are out of money!");
                }
            }
        }
        Command::Register {
            username,
            password,
            email,
        } => {
            let mut store = open_store(&config)?;
            let account = store.register(&username, &password, &email)?;
            println!(
                "Registered {} with a balance of ${:.2}",
                account.username, account.balance
            );
        }
        Command::History { username, password } => {
            let store = open_store(&config)?;
            let account = store.authenticate(&username, &password)?;

            println!("{}: ${:.2}", account.username, account.balance);

            if account.picks_history.is_empty() {
                println!("No past picks available.");
            }

            for record in account.picks_history.iter().rev() {
                println!();
                println!("Pick Slip - {}", record.created_at.format("%Y-%m-%d %H:%M"));
                for pick in &record.picks {
                    println!("- {pick}");
                }
                println!("Bet: ${:.2} | Mode: {}", record.bet, record.mode);
                if record.won {
                    println!("Result: WIN! Payout: ${:.2}", record.payout);
                } else {
                    println!("Result: LOSS");
                }
            }
        }
    }

    Ok(())
}
