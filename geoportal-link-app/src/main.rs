use geoportal_link::prelude::*;
use std::{env, fs};

/// Writes every link to stdout instead of opening a browser
struct StdoutOpener;

impl LinkOpener for StdoutOpener {
    fn open(&self, href: &str, target: &str) -> Result<()> {
        println!("[{}] {}", target, href);
        Ok(())
    }
}

/// Resolves the links of every configured action for a saved viewer state
///
/// Usage: geoportal-link-app <config.json> <state.json> [action-id]
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("usage: geoportal-link-app <config.json> <state.json> [action-id]");
        std::process::exit(2);
    }

    let config = PluginConfig::from_json(&fs::read_to_string(&args[0])?)?;
    let state = AppState::from_json(&fs::read_to_string(&args[1])?)?;
    let host = Arc::new(StaticHost::new(state));

    let plugin = GeoportalPlugin::initialize(config, host.clone());
    log::info!(
        "{} {}: {} action(s) registered",
        GeoportalPlugin::name(),
        GeoportalPlugin::version(),
        plugin.actions().len()
    );

    let requested = args.get(2).map(String::as_str);
    for action in plugin.actions() {
        if requested.map_or(false, |id| id != action.id()) {
            continue;
        }
        if action.trigger(host.as_ref(), &StdoutOpener).await?.is_none() {
            eprintln!("{}: nothing to open for the current view", action.id());
        }
    }

    Ok(())
}
