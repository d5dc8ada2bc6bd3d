use std::io::Write;
use std::thread;
use std::time::Duration;

use clap::Args;
use ramadan_core::{
    Alert, AlertDispatcher, AnchorEvent, Config, CountdownEngine, CountdownSnapshot,
    NotificationSink, SqliteStore,
};
use tracing::{info, warn};

use super::{load_day, now, CliResult};

#[derive(Args)]
pub struct CountdownArgs {
    /// Keep ticking and alert when Iftar or Suhoor is reached
    #[arg(long)]
    watch: bool,
    /// Tick cadence in watch mode
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(100..=60_000))]
    interval_ms: u64,
}

/// Prints alerts to the terminal; a sound is a bell character.
struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn deliver(&self, alert: &Alert) {
        let mut out = std::io::stdout().lock();
        if alert.notify {
            let _ = writeln!(out, "\n{}: {}", alert.title, alert.body);
        }
        if alert.sound.is_some() {
            let _ = write!(out, "\x07");
        }
        let _ = out.flush();
    }
}

fn render(snapshot: &CountdownSnapshot) -> String {
    if !snapshot.is_available() {
        return "prayer times unavailable".into();
    }
    AnchorEvent::ALL
        .into_iter()
        .filter_map(|anchor| snapshot.countdown(anchor))
        .map(|c| format!("{} {} ({} {})", c.anchor.label(), c.display(), c.prayer, c.scheduled))
        .collect::<Vec<_>>()
        .join("  |  ")
}

pub fn run(args: CountdownArgs) -> CliResult {
    let config = Config::load()?;
    let store = SqliteStore::open()?;
    let mut engine = CountdownEngine::new().with_prayer_tracking(config.notifications.notify_prayer);

    let start = now();
    engine.load_schedule(load_day(&store, &config, start.date())?.schedule)?;

    if !args.watch {
        println!("{}", render(&engine.tick(start)));
        return Ok(());
    }

    let interval = Duration::from_millis(args.interval_ms);
    loop {
        let snapshot = engine.tick(now());

        if snapshot.day_rolled_over {
            let date = snapshot.at.date();
            info!(%date, "refreshing prayer times for new day");
            match load_day(&store, &config, date) {
                Ok(day) => {
                    if let Err(e) = engine.load_schedule(day.schedule) {
                        warn!(%e, "keeping previous day's schedule");
                    }
                }
                Err(e) => warn!(%e, "could not fetch prayer times, keeping previous day's"),
            }
        }

        AlertDispatcher::dispatch(&snapshot, &config.notifications, &TerminalSink);

        print!("\r{}", render(&snapshot));
        std::io::stdout().flush()?;
        thread::sleep(interval);
    }
}
