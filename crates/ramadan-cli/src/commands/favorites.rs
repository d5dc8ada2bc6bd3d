use clap::Subcommand;
use ramadan_core::{Config, Favorites, Location, SqliteStore};

use super::CliResult;

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// Save a city
    Add {
        city: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long, default_value = "")]
        country: String,
    },
    /// List saved cities
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a saved city
    Remove { city: String },
    /// Remove all saved cities
    Clear,
    /// Make a saved city the current location
    Use { city: String },
}

pub fn run(action: FavoritesAction) -> CliResult {
    let store = SqliteStore::open()?;
    let favorites = Favorites::new(&store);

    match action {
        FavoritesAction::Add {
            city,
            lat,
            lng,
            country,
        } => {
            let location = Location {
                city,
                country,
                latitude: lat,
                longitude: lng,
            };
            location.validate()?;
            let name = location.city.clone();
            if favorites.add(location)? {
                println!("added {name}");
            } else {
                println!("{name} is already a favorite");
            }
        }
        FavoritesAction::List { json } => {
            let all = favorites.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else if all.is_empty() {
                println!("no favorite cities");
            } else {
                for location in all {
                    println!(
                        "{} ({:.4}, {:.4}) {}",
                        location.city, location.latitude, location.longitude, location.country
                    );
                }
            }
        }
        FavoritesAction::Remove { city } => {
            if !favorites.remove(&city)? {
                return Err(format!("no favorite named {city}").into());
            }
            println!("removed {city}");
        }
        FavoritesAction::Clear => {
            favorites.clear()?;
            println!("favorites cleared");
        }
        FavoritesAction::Use { city } => {
            let location = favorites
                .find(&city)?
                .ok_or_else(|| format!("no favorite named {city}"))?;
            let mut config = Config::load()?;
            println!("location set to {}", location.city);
            config.location = location;
            config.save()?;
        }
    }
    Ok(())
}
