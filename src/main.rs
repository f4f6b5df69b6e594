use anyhow::Result;
use clap::{Parser, Subcommand};
use ninjacat::commands::validators;
use ninjacat::{commands::*, config::Config, constants, logging};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "ninjacat")]
#[command(about = "A cli tool for the Ninjacat reporting API")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value_t = constants::config::DEFAULT_CONFIG_FILE.to_string())]
    config: String,

    /// Enable debug logging of API calls
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Exchange the configured credentials for a session token
    Auth {
        /// Output in JSON format for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// List advertisers of the configured agency
    Advertisers {
        /// Output in JSON format for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Request and poll reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Create a ninjacat.yaml configuration template
    Init {
        /// Output file name
        #[arg(short, long, default_value_t = constants::config::DEFAULT_CONFIG_FILE.to_string())]
        output: String,

        /// Overwrite existing file if it exists
        #[arg(long)]
        overwrite: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ReportAction {
    /// Start a report run for a template and advertiser
    Request {
        /// Report template id
        template_id: String,

        /// Advertiser id
        advertiser_id: String,

        /// First day of the report window (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// Last day of the report window (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        /// Poll until the report is ready
        #[arg(short, long)]
        wait: bool,

        /// Seconds between polls when waiting
        #[arg(long, default_value_t = constants::report::DEFAULT_POLL_INTERVAL_SECS)]
        interval: u64,

        /// Maximum number of polls when waiting
        #[arg(long, default_value_t = constants::report::DEFAULT_MAX_POLLS)]
        max_polls: u32,

        /// Output in JSON format for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Poll a report run once
    Get {
        /// Request id returned when the report was requested
        request_id: u64,

        /// Output in JSON format for machine consumption
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(command) => execute_command(command, &cli.config).await,
        None => {
            // No command provided, print help
            anyhow::bail!("No command provided. Use --help for usage information.");
        }
    }
}

async fn execute_command(command: Commands, config_path: &str) -> Result<()> {
    match command {
        Commands::Auth { json } => {
            let context = CommandContext::new(Config::load(config_path)?, json);
            AuthCommand.execute(&context).await?;
        }
        Commands::Advertisers { json } => {
            let context = CommandContext::new(Config::load(config_path)?, json);
            AdvertisersCommand.execute(&context).await?;
        }
        Commands::Report {
            action:
                ReportAction::Request {
                    template_id,
                    advertiser_id,
                    start_date,
                    end_date,
                    wait,
                    interval,
                    max_polls,
                    json,
                },
        } => {
            // Validate arguments before touching the configuration
            let template_id = validators::validate_identifier("TEMPLATE_ID", &template_id)?;
            let advertiser_id = validators::validate_identifier("ADVERTISER_ID", &advertiser_id)?;
            let range = validators::validate_report_range(&start_date, &end_date)?;
            if wait {
                validators::validate_polling(interval, max_polls)?;
            }

            let context = CommandContext::new(Config::load(config_path)?, json);
            RequestReportCommand {
                template_id,
                advertiser_id,
                range,
                wait,
                interval: Duration::from_secs(interval),
                max_polls,
            }
            .execute(&context)
            .await?;
        }
        Commands::Report {
            action: ReportAction::Get { request_id, json },
        } => {
            let context = CommandContext::new(Config::load(config_path)?, json);
            GetReportCommand { request_id }.execute(&context).await?;
        }
        Commands::Init { output, overwrite } => {
            // Init command doesn't need config since it creates one
            InitCommand { output, overwrite }
                .execute(&CommandContext::default())
                .await?;
        }
    }

    Ok(())
}
