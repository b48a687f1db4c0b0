use anyhow::Result;
use clap::{Parser, Subcommand};

use treasure::cli::{
    handle_line_command, handle_rules_command, handle_run_command, LineArgs, RulesArgs, RunArgs,
};
use treasure::config::{Settings, TreasurePaths};
use treasure::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "treasure",
    author = "Jason Hwang",
    version,
    about = "Categorize bank statements and compare spending against your line",
    long_about = "treasure reads your bank statement exports, sorts every transaction \
                  into income, expenses and giving using your own rules, and compares \
                  what you spent with a monthly line derived from household size, an \
                  income percentile and the federal, FICA and state tax tables."
)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Categorize a folder of statements and report against the line
    Run(RunArgs),

    /// Compute the line for a household size and percentile
    Line(LineArgs),

    /// Validate and inspect the rules file
    Rules(RulesArgs),

    /// Create the configuration directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = TreasurePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    if cli.no_color || !settings.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Some(Commands::Run(args)) => handle_run_command(&paths, &settings, args)?,
        Some(Commands::Line(args)) => handle_line_command(&paths, &settings, args)?,
        Some(Commands::Rules(args)) => handle_rules_command(&paths, args)?,
        Some(Commands::Init) => {
            println!("Initializing treasure at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;

            let rules_file = paths.rules_file();
            if !rules_file.exists() {
                let empty = treasure::config::RulesFile::default();
                std::fs::write(&rules_file, serde_json::to_string_pretty(&empty)?)?;
                println!("Created empty rules file: {}", rules_file.display());
            }

            println!("Initialization complete!");
            println!();
            println!(
                "Place numbers.json and the income/bracket CSVs in: {}",
                paths.dataset_dir().display()
            );
            println!("Then run 'treasure rules check' to validate your processors.");
        }
        Some(Commands::Config) => {
            println!("treasure Configuration");
            println!("======================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Rules file:        {}", paths.rules_file().display());
            println!("Dataset directory: {}", paths.dataset_dir().display());
            println!();
            println!("Settings:");
            println!("  Household size:  {}", settings.household_size);
            println!("  Percentile:      {}", settings.percentile);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Color:           {}", settings.color);
        }
        None => {
            println!("treasure - know where your money went, and where your line is");
            println!();
            println!("Run 'treasure --help' for usage information.");
        }
    }

    Ok(())
}
