use crate::events::{AppEvent, ControlCommand};
use async_channel::Sender;
use std::io::Write;
use std::os::unix::net::UnixStream;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const SOCKET_PATH: &str = "/tmp/ringnav.sock";

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };
    log::info!("Listening for commands on {}", SOCKET_PATH);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match line.parse::<ControlCommand>() {
                            Ok(command) => {
                                log::debug!("Control command: {}", command);
                                if tx.send(AppEvent::from(command)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => log::warn!("Ignoring control line '{}': {}", line, e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Client side, used by the CLI to drive a running instance.
pub fn send_command(command: ControlCommand) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to ringnav at {}: {}. Is ringnav running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}
