use chrono::NaiveDate;
use clap::Args;
use ramadan_core::{format_hms, Config, PrayerTimeline, SqliteStore};

use super::{load_day, now, today, CliResult};

#[derive(Args)]
pub struct TimesArgs {
    /// Day to show (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: TimesArgs) -> CliResult {
    let config = Config::load()?;
    let store = SqliteStore::open()?;
    let date = args.date.unwrap_or_else(today);
    let day = load_day(&store, &config, date)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&day)?);
        return Ok(());
    }

    println!("{} ({})", config.location.city, day.date);
    println!("Hijri: {} {} {}", day.hijri.day, day.hijri.month_name, day.hijri.year);
    for (prayer, time) in day.schedule.iter() {
        println!("  {:<8} {time}", prayer.name());
    }

    if date == today() {
        let now = now();
        if let Some(position) = PrayerTimeline::at(&day.schedule, now) {
            let remaining = position.remaining(now).num_seconds().max(0) as u64;
            println!(
                "Next: {} in {} ({:.0}% since {})",
                position.next,
                format_hms(remaining),
                position.progress_pct,
                position.previous
            );
        }
    }
    Ok(())
}
