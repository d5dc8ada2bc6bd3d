use ramadan_core::{Config, CountdownEngine, KvStore, SqliteStore};
use serde_json::json;
use tracing::warn;

use super::{load_day, now, CliResult};

const ENGINE_KEY: &str = "countdown_engine";

fn load_engine(store: &SqliteStore) -> CountdownEngine {
    match store.get_json::<CountdownEngine>(ENGINE_KEY) {
        Ok(Some(engine)) => engine,
        Ok(None) => CountdownEngine::new(),
        Err(e) => {
            warn!(%e, "discarding unreadable engine state");
            CountdownEngine::new()
        }
    }
}

pub fn run() -> CliResult {
    let config = Config::load()?;
    let store = SqliteStore::open()?;
    let mut engine = load_engine(&store);
    engine.set_prayer_tracking(config.notifications.notify_prayer);

    let now = now();
    match load_day(&store, &config, now.date()) {
        Ok(day) => engine.load_schedule(day.schedule)?,
        Err(e) if engine.is_loaded() => warn!(%e, "using previously loaded schedule"),
        Err(e) => return Err(e),
    }

    let snapshot = engine.tick(now);
    store.set_json(ENGINE_KEY, &engine)?;

    let events = snapshot.events();
    let out = json!({
        "snapshot": snapshot,
        "events": events,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
