use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fedex_locations::{AddressInput, Location, LocationClient, LocationQueryOptions};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fedex-cli")]
#[command(about = "FedEx web-services command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find FedEx drop-off locations near an address
    Locations(LocationsArgs),
}

#[derive(Debug, Args)]
struct LocationsArgs {
    /// Street line of the search address
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
    /// State or province code. FedEx ignores it for location searches
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long, default_value = "US")]
    country: String,
    #[arg(long)]
    phone: Option<String>,
    /// Carrier-encoded geographic coordinates
    #[arg(long)]
    coordinates: Option<String>,
    /// Ship date (YYYY-MM-DD); defaults to two days out
    #[arg(long)]
    ship_date: Option<NaiveDate>,
    /// Print results as a JSON array
    #[arg(long)]
    json: bool,
}

impl LocationsArgs {
    /// Options for the search. The address is omitted entirely when no
    /// address field was given, so the client reports it as missing.
    fn into_options(self) -> LocationQueryOptions {
        let has_address = self.street.is_some()
            || self.city.is_some()
            || self.state.is_some()
            || self.postal_code.is_some();
        let address = has_address.then(|| AddressInput {
            address: self.street,
            street: None,
            city: self.city,
            state_or_province_code: self.state,
            postal_code: self.postal_code,
            country: Some(self.country),
        });

        LocationQueryOptions {
            address,
            phone_number: self.phone,
            coordinates: self.coordinates,
            ship_date: self.ship_date,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = fedex_core::load_fedex_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(mode = %config.mode, endpoint = %config.endpoint, "loaded FedEx config");

    match cli.command {
        Commands::Locations(args) => run_locations(&config, args).await,
    }
}

async fn run_locations(
    config: &fedex_core::FedexConfig,
    args: LocationsArgs,
) -> anyhow::Result<()> {
    let json = args.json;
    let client = LocationClient::from_config(config)?;
    let locations = client.process_request(args.into_options()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&locations)?);
    } else {
        print_locations(&locations);
    }
    Ok(())
}

fn print_locations(locations: &[Location]) {
    if locations.is_empty() {
        println!("no locations found");
        return;
    }
    for (index, location) in locations.iter().enumerate() {
        match location.distance() {
            Some(d) => println!("{:>2}. {} ({} {})", index + 1, location.address(), d.value, d.units),
            None => println!("{:>2}. {}", index + 1, location.address()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locations_command() {
        let cli = Cli::try_parse_from([
            "fedex-cli",
            "locations",
            "--street",
            "123 Main St",
            "--city",
            "Springfield",
            "--postal-code",
            "62701",
            "--ship-date",
            "2025-04-02",
        ])
        .expect("expected valid cli args");

        let Commands::Locations(args) = cli.command;
        assert_eq!(args.street.as_deref(), Some("123 Main St"));
        assert_eq!(args.country, "US");
        assert_eq!(args.ship_date, NaiveDate::from_ymd_opt(2025, 4, 2));
        assert!(!args.json);
    }

    #[test]
    fn rejects_malformed_ship_date() {
        let result = Cli::try_parse_from([
            "fedex-cli",
            "locations",
            "--street",
            "1 Loop",
            "--ship-date",
            "04/02/2025",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn options_without_address_fields_have_no_address() {
        let cli = Cli::try_parse_from(["fedex-cli", "locations", "--phone", "5555550100"])
            .expect("expected valid cli args");
        let Commands::Locations(args) = cli.command;
        let options = args.into_options();
        assert!(options.address.is_none());
        assert_eq!(options.phone_number.as_deref(), Some("5555550100"));
    }

    #[test]
    fn state_alone_counts_as_address() {
        let cli = Cli::try_parse_from(["fedex-cli", "locations", "--state", "IL"])
            .expect("expected valid cli args");
        let Commands::Locations(args) = cli.command;
        let address = args.into_options().address.expect("address expected");
        assert_eq!(address.state_or_province_code.as_deref(), Some("IL"));
        assert!(address.address.is_none());
    }

    #[test]
    fn options_carry_address_fields() {
        let cli = Cli::try_parse_from([
            "fedex-cli",
            "locations",
            "--street",
            "9 Elm Rd",
            "--state",
            "IL",
            "--country",
            "CA",
        ])
        .expect("expected valid cli args");
        let Commands::Locations(args) = cli.command;
        let address = args.into_options().address.expect("address expected");
        assert_eq!(address.address.as_deref(), Some("9 Elm Rd"));
        assert_eq!(address.state_or_province_code.as_deref(), Some("IL"));
        assert_eq!(address.country.as_deref(), Some("CA"));
    }
}
