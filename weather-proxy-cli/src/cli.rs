use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_proxy_core::{
    Config, OpenWeatherClient, WeatherResponse, WeatherService, config::DEFAULT_BASE_URL,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-proxy", version, about = "City weather lookups over OpenWeatherMap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and base URL.
    Configure,

    /// Show current weather for one or more cities.
    Show {
        /// City names, passed to the geocoder as written.
        #[arg(required = true)]
        cities: Vec<String>,

        /// Print the status code and JSON body instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<bool> {
        match self.command {
            Command::Configure => configure().map(|()| true),
            Command::Show { cities, json } => show(&cities, json).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(true)
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut cfg = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    cfg.set_api_key(api_key.trim().to_string());

    let current_url = cfg.base_url.clone();
    cfg.base_url = Text::new("Base API URL:")
        .with_default(&current_url)
        .with_help_message(&format!("OpenWeatherMap default is {DEFAULT_BASE_URL}"))
        .prompt()
        .context("Failed to read base URL")?;

    cfg.save()?;
    tracing::info!("Saved configuration to {}", path.display());
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Returns `false` if any city produced an error response.
async fn show(cities: &[String], json: bool) -> anyhow::Result<bool> {
    let cfg = Config::load()?;
    let client = OpenWeatherClient::new(cfg.client_config()?)?;
    let service = WeatherService::new(client, cfg.cache_ttl());

    let mut all_ok = true;
    for city in cities {
        let response = service.respond(city).await;
        all_ok &= response.is_success();

        if json {
            print_json(&response)?;
        } else {
            print_summary(city, &response);
        }
    }

    Ok(all_ok)
}

fn print_json(response: &WeatherResponse) -> anyhow::Result<()> {
    let body =
        serde_json::to_string_pretty(&response.body).context("Failed to render response body")?;
    println!("HTTP {}\n{body}", response.status);
    Ok(())
}

fn print_summary(city: &str, response: &WeatherResponse) {
    let field = |key: &str| response.body.get(key).and_then(|v| v.as_str()).unwrap_or("-");

    if !response.is_success() {
        println!("{city}: {}", field("message"));
        return;
    }

    println!("{}", field("city"));
    println!(
        "  Temperature:  {} (min {}, max {})",
        field("temperature"),
        field("minTemperature"),
        field("maxTemperature"),
    );
    println!("  Conditions:   {}", field("description"));
    println!("  Humidity:     {}", field("humidity"));
    println!("  Pressure:     {}", field("pressure"));
    println!("  Wind:         {} from the {}", field("windSpeed"), field("windDirection"));
}
