//! Stardrift relay server
//!
//! Accepts websocket connections, parses the browser-compatible JSON
//! protocol, and drives the [`relay::Relay`] state machine. The server
//! self-selects its listening port starting from a default and exposes
//! the chosen port on a plain HTTP `/config` endpoint so clients can
//! discover it.

#![forbid(unsafe_code)]

mod relay;

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use stardrift_core::net::protocol::{ClientMessage, ServerMessage};
use stardrift_core::player::PlayerId;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use warp::ws::{Message, WebSocket};
use warp::Filter;

use crate::relay::{Relay, RelayCommand, COUNTDOWN_SECS};

/// First port tried when binding
const DEFAULT_PORT: u16 = 8090;

/// How many consecutive ports are probed before giving up
const PORT_SCAN_LIMIT: u16 = 16;

type SharedRelay = Arc<Mutex<Relay>>;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(err) = run().await {
        log::error!("server failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // the listener stays bound from here on, so the advertised port can
    // never be stolen between the scan and serving
    let listener = bind_listener()
        .ok_or_else(|| format!("no free port in {DEFAULT_PORT}..{}", DEFAULT_PORT + PORT_SCAN_LIMIT))?;
    let port = listener.local_addr()?.port();
    listener.set_nonblocking(true)?;
    let listener = tokio::net::TcpListener::from_std(listener)?;

    let relay: SharedRelay = Arc::new(Mutex::new(Relay::new()));
    let relay = warp::any().map(move || Arc::clone(&relay));

    let ws_route = warp::path("ws")
        .and(warp::ws())
        .and(relay)
        .map(|ws: warp::ws::Ws, relay: SharedRelay| {
            ws.on_upgrade(move |socket| handle_connection(socket, relay))
        });

    // clients discover the self-selected port through this endpoint
    let config_route =
        warp::path("config").map(move || warp::reply::json(&serde_json::json!({ "port": port })));

    log::info!("listening on port {port}");
    let incoming = futures::stream::unfold(listener, |listener| async move {
        let conn = listener.accept().await.map(|(stream, _)| stream);
        Some((conn, listener))
    });
    warp::serve(ws_route.or(config_route))
        .run_incoming(incoming)
        .await;
    Ok(())
}

/// Probe ports upward from the default, keeping the first successful bind
fn bind_listener() -> Option<std::net::TcpListener> {
    (DEFAULT_PORT..DEFAULT_PORT + PORT_SCAN_LIMIT).find_map(|port| {
        match std::net::TcpListener::bind(("0.0.0.0", port)) {
            Ok(listener) => Some(listener),
            Err(err) => {
                log::debug!("port {port} unavailable: {err}");
                None
            }
        }
    })
}

/// Per-connection task: writer channel out, message loop in
async fn handle_connection(socket: WebSocket, relay: SharedRelay) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // serialize and forward everything the relay queues for this socket
    tokio::spawn(async move {
        while let Some(msg) = outbox_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(text) => {
                    if ws_tx.send(Message::text(text)).await.is_err() {
                        break;
                    }
                }
                Err(err) => log::error!("encode failed: {err}"),
            }
        }
    });

    let mut player_id: Option<PlayerId> = None;
    while let Some(result) = ws_rx.next().await {
        let frame = match result {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("socket error: {err}");
                break;
            }
        };
        if frame.is_close() {
            break;
        }
        let Ok(text) = frame.to_str() else {
            continue; // ping/pong/binary frames
        };
        let parsed: ClientMessage = match serde_json::from_str(text) {
            Ok(msg) => msg,
            Err(err) => {
                log::warn!("unparseable message dropped: {err}");
                continue;
            }
        };

        match (player_id, parsed) {
            (None, ClientMessage::Join { name }) => {
                player_id = Some(relay.lock().await.join(name, outbox.clone()));
            }
            (None, other) => {
                log::warn!("message before join ignored: {other:?}");
            }
            (Some(id), msg) => {
                let command = relay.lock().await.handle(id, msg);
                if let Some(RelayCommand::BeginCountdown { generation }) = command {
                    tokio::spawn(run_countdown(Arc::clone(&relay), generation));
                }
            }
        }
    }

    if let Some(id) = player_id {
        relay.lock().await.disconnect(id);
    }
}

/// Broadcast 3-2-1, then hand the start decision back to the relay.
/// The generation tag lets the relay discard this countdown if the lobby
/// changed while it was sleeping.
async fn run_countdown(relay: SharedRelay, generation: u64) {
    for remaining in (1..=COUNTDOWN_SECS).rev() {
        relay.lock().await.broadcast_countdown(generation, remaining);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    relay.lock().await.confirm_start(generation);
}
