//! ilMeteo CLI
//!
//! Command-line front end for the ilMeteo forecast scraper.

#![allow(clippy::print_stdout)]

mod settings;

use clap::{Parser, Subcommand};
use integration_ilmeteo::{
    DailyForecastItem, ForecastClient, HourlyForecastItem, HumidityLabel, IlMeteoConfig,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::CliConfig;

/// ilMeteo CLI
#[derive(Parser)]
#[command(name = "ilmeteo-cli")]
#[command(author, version, about = "ilMeteo forecast scraper CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print records as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file (`.toml` extension optional)
    #[arg(short, long, default_value = "config", env = "ILMETEO_CONFIG")]
    config: String,

    /// Override the base URL of the city pages
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the daily forecast of a city
    ///
    /// Example: ilmeteo-cli daily "Reggio Emilia"
    Daily {
        /// City name as used by the site
        city: String,
    },

    /// Show the hourly forecast of one day
    ///
    /// LINK is the detail link printed by `daily`.
    /// Example: ilmeteo-cli hourly Pinerolo /meteo/Pinerolo/domani
    Hourly {
        /// City name as used by the site
        city: String,

        /// Detail link of the day
        link: String,
    },

    /// Check that the site is reachable and still parseable
    Health,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn print_daily(days: &[DailyForecastItem]) {
    if days.is_empty() {
        println!("No forecast found on the page");
        return;
    }

    for day in days {
        if day.is_error() {
            println!("❌ {}: {}", day.date, day.description);
            continue;
        }
        println!("{}", day.summary());
        if day.has_detail() {
            println!("    ↳ {}", day.link);
        }
    }
}

fn hourly_header(label: HumidityLabel) -> String {
    format!(
        "{:>5} {:>5} {:<12} {:<14} {}",
        "Time", "Temp", "Rain", "Wind", label
    )
}

fn print_hourly(hours: &[HourlyForecastItem]) {
    let Some(first) = hours.first() else {
        println!("No hourly forecast found on the page");
        return;
    };

    println!("{}", hourly_header(first.humidity_label));
    for hour in hours {
        println!("{}", hour.summary());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = CliConfig::load(&cli.config, cli.base_url)?;
    let config: IlMeteoConfig = settings.ilmeteo;
    debug!(base_url = %config.base_url, "Configuration loaded");

    let client = ForecastClient::new(config)?;

    match cli.command {
        Commands::Daily { city } => {
            let days = client.daily_forecast(&city).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                println!("📅 {city}");
                print_daily(&days);
            }
        },

        Commands::Hourly { city, link } => {
            let hours = client.hourly_forecast(&city, &link).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hours)?);
            } else {
                println!("🕒 {city} ({link})");
                print_hourly(&hours);
            }
        },

        Commands::Health => {
            let city = client.config().health_check_city.clone();
            if client.is_healthy().await {
                println!("✅ Healthy ({city})");
            } else {
                println!("❌ Unhealthy: no forecast for {city}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn hourly_header_names_humidity_column() {
        let header = hourly_header(HumidityLabel::HumidityPercent);
        assert!(header.starts_with(" Time"));
        assert!(header.ends_with("UR%"));
    }

    #[test]
    fn hourly_header_names_perceived_temperature_column() {
        assert!(hourly_header(HumidityLabel::PerceivedTemperature).ends_with("TP°"));
    }

    #[test]
    fn config_path_reads_environment() {
        use clap::CommandFactory;

        let command = Cli::command();
        let config = command
            .get_arguments()
            .find(|arg| arg.get_id() == "config")
            .unwrap();
        assert_eq!(
            config.get_env(),
            Some(std::ffi::OsStr::new("ILMETEO_CONFIG"))
        );
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
