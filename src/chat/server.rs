use super::ChatRelay;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::{self, Message};

/// Pause after a failed accept, so fd exhaustion does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Source of incoming chat sockets.
#[async_trait]
trait Acceptor: Send + Sync + 'static {
    async fn accept(&self) -> io::Result<(TcpStream, SocketAddr)>;
}

#[async_trait]
impl Acceptor for TcpListener {
    async fn accept(&self) -> io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self).await
    }
}

/// Accepts WebSocket clients forever, one task per connection.
pub async fn serve(listener: TcpListener, relay: Arc<ChatRelay>) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("💬 Chat relay listening on ws://{}", addr);
    }

    accept_loop(listener, relay).await
}

async fn accept_loop<A: Acceptor>(acceptor: A, relay: Arc<ChatRelay>) -> io::Result<()> {
    loop {
        let (stream, peer) = match acceptor.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                log::warn!("⚠️  Chat accept failed: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        let relay = relay.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, relay).await {
                log::debug!("💬 Chat connection {} ended with error: {}", peer, e);
            }
        });
    }
}

async fn handle_connection(stream: TcpStream, relay: Arc<ChatRelay>) -> Result<(), tungstenite::Error> {
    let socket = tokio_tungstenite::accept_async(stream).await?;
    let (mut sink, mut source) = socket.split();

    let (id, mut outbound) = relay.connect();
    log::info!("💬 Chat client connected ({} online)", relay.connection_count());

    // Ends once the relay drops this connection's sender, then completes
    // the closing handshake.
    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if sink.send(message).await.is_err() {
                return;
            }
        }
        let _ = sink.close().await;
    });

    let mut result = Ok(());
    while let Some(frame) = source.next().await {
        match frame {
            Ok(message @ (Message::Text(_) | Message::Binary(_))) => {
                relay.broadcast(&id, message);
            }
            Ok(Message::Close(_)) => break,
            // ping/pong are answered by tungstenite itself
            Ok(_) => {}
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    relay.disconnect(&id);
    let _ = writer.await;
    log::info!("💬 Chat client disconnected ({} online)", relay.connection_count());

    result
}
