//! Websocket client for the SimBridge MCDU feed.

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use mcdu_bridge::bridge::BridgeSession;
use mcdu_bridge::config::AppConfig;
use mcdu_bridge::device::HidTransport;
use mcdu_bridge::{log_debug, log_debug_content};
use std::io::ErrorKind;
use std::net::TcpStream;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// Socket read timeout, bounds how long queued commands wait.
const CHANNEL_POLL: Duration = Duration::from_millis(20);

/// How one connection ended.
enum Disconnect {
    Closed,
    Failed(anyhow::Error),
}

/// Connect, serve and reconnect for as long as the process runs.
pub(crate) fn run_channel_loop<T: HidTransport>(
    session: &BridgeSession<T>,
    config: &AppConfig,
    commands: &Receiver<String>,
) -> Result<()> {
    loop {
        match serve_connection(session, &config.url, commands) {
            Disconnect::Closed => {
                report(session.on_close(), "close handler");
            }
            Disconnect::Failed(err) => {
                report(session.on_error(&format!("{err:#}")), "error handler");
            }
        }
        thread::sleep(config.reconnect_delay());
        report(session.show_startup_screen(), "startup screen");
    }
}

fn report(result: Result<()>, what: &str) {
    if let Err(err) = result {
        warn!("{what} failed: {err:#}");
        log_debug(&format!("{what} failed: {err:#}"));
    }
}

fn serve_connection<T: HidTransport>(
    session: &BridgeSession<T>,
    url: &str,
    commands: &Receiver<String>,
) -> Disconnect {
    let mut socket = match connect(url) {
        Ok(socket) => socket,
        Err(err) => return Disconnect::Failed(err),
    };
    info!(url, "connected to update channel");
    log_debug(&format!("connected to {url}"));

    let stale = commands.try_iter().count();
    if stale > 0 {
        log_debug(&format!("dropped {stale} commands queued while offline"));
    }
    report(session.on_open(), "open handler");

    loop {
        for command in commands.try_iter() {
            log_debug_content(&format!("send command {command}"));
            if let Err(err) = socket.send(Message::Text(command)) {
                return Disconnect::Failed(anyhow::Error::new(err).context("channel send"));
            }
        }

        match socket.read() {
            Ok(Message::Text(text)) => match session.on_message(&text) {
                Ok(outcome) => log_debug(&format!("message handled: {outcome:?}")),
                Err(err) => report(Err(err), "update"),
            },
            Ok(Message::Close(frame)) => {
                log_debug(&format!("channel closed by host: {frame:?}"));
                return Disconnect::Closed;
            }
            Ok(_) => {}
            Err(tungstenite::Error::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(tungstenite::Error::ConnectionClosed) => return Disconnect::Closed,
            Err(err) => {
                return Disconnect::Failed(anyhow::Error::new(err).context("channel read"))
            }
        }
    }
}

fn connect(url: &str) -> Result<WebSocket<MaybeTlsStream<TcpStream>>> {
    let (mut socket, _response) =
        tungstenite::connect(url).with_context(|| format!("connect to {url}"))?;
    if let MaybeTlsStream::Plain(stream) = socket.get_mut() {
        stream
            .set_read_timeout(Some(CHANNEL_POLL))
            .context("set channel read timeout")?;
    }
    Ok(socket)
}
