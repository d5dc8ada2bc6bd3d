use chrono::NaiveDate;
use clap::Args;
use ramadan_core::{Config, SqliteStore};

use super::{load_day, today, CliResult};

#[derive(Args)]
pub struct HijriArgs {
    /// Gregorian day to convert (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub fn run(args: HijriArgs) -> CliResult {
    let config = Config::load()?;
    let store = SqliteStore::open()?;
    let day = load_day(&store, &config, args.date.unwrap_or_else(today))?;
    let hijri = &day.hijri;

    println!("{} {} {} ({hijri})", hijri.day, hijri.month_name, hijri.year);
    match hijri.ramadan_day() {
        Some(n) => println!("Ramadan day {n}"),
        None => println!("Not Ramadan"),
    }
    Ok(())
}
