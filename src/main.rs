use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use tagboard::app::{AppEvent, Command, Controller};
use tagboard::config::Config;
use tagboard::logging::{json_log, obj, v_num, v_str, Domain};
use tagboard::nav::MemoryHistory;
use tagboard::refresh::{run_refresh_loop, HttpFetcher};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    json_log(
        Domain::System,
        "start",
        obj(&[
            ("data_url", v_str(&cfg.data_url())),
            ("refresh_secs", v_num(cfg.refresh_secs as f64)),
        ]),
    );

    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(64);
    let (refresh_tx, refresh_rx) = mpsc::channel::<()>(16);

    let fetcher = Arc::new(HttpFetcher::new(&cfg));
    tokio::spawn(run_refresh_loop(
        fetcher,
        cfg.refresh_secs,
        refresh_rx,
        event_tx.clone(),
    ));

    let watch = cfg.watch;
    let mut controller = Controller::new(cfg.clone(), MemoryHistory::new());

    // The page path comes from the command line, falling back to config.
    let raw = std::env::args().nth(1).unwrap_or_else(|| cfg.page_path.clone());
    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path.to_string(), query.to_string()),
        None => (raw, String::new()),
    };

    dispatch(&mut controller, AppEvent::Loaded { path, query }, &refresh_tx);

    while let Some(event) = event_rx.recv().await {
        let had_snapshot = matches!(event, AppEvent::SnapshotReplaced { .. });
        dispatch(&mut controller, event, &refresh_tx);

        if had_snapshot {
            if let Some(tree) = controller.app.mounted() {
                println!("{}", tree);
            }
            if !watch {
                break;
            }
        }
    }

    json_log(Domain::System, "stop", obj(&[]));
    Ok(())
}

fn dispatch(
    controller: &mut Controller<MemoryHistory>,
    event: AppEvent,
    refresh_tx: &mpsc::Sender<()>,
) {
    for command in controller.handle(event) {
        if let Command::RequestRefresh = command {
            // The driver coalesces queued requests; a full queue means a
            // fetch is already pending, so dropping this one is fine.
            let _ = refresh_tx.try_send(());
        }
    }
}
