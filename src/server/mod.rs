//! Single-client serve loop
//!
//! One planning cycle runs to completion per inbound frame before the next
//! is read; there is no concurrency within a cycle and the only mutable
//! state is the session owned by the connection.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::common::{FrenetProjector, PlannerError, PlannerResult};
use crate::planning::PlannerConfig;
use crate::protocol::{classify, control_frame, encode_frame, manual_frame, FrameCodec, Inbound};
use crate::session::PlannerSession;

/// Handle one decoded frame body: run a cycle if it is telemetry, answer
/// manual if there is no payload, stay silent otherwise.
pub fn handle_frame<M: FrenetProjector>(
    session: &mut PlannerSession<'_, M>,
    body: &str,
) -> PlannerResult<Option<String>> {
    match classify(body) {
        Inbound::Telemetry(telemetry) => {
            let trajectory = session.run_cycle(&telemetry.into_cycle_input())?;
            Ok(Some(control_frame(&trajectory)))
        }
        Inbound::Manual => Ok(Some(manual_frame())),
        Inbound::Ignored => {
            debug!(len = body.len(), "ignoring frame");
            Ok(None)
        }
    }
}

/// Accept clients one at a time and serve each until it disconnects.
///
/// Connection-level failures (I/O, stream corruption) end that connection
/// only; planning contract violations are fatal because they mean the
/// vehicle state or map data is inconsistent.
pub async fn run<M: FrenetProjector>(
    addr: &str,
    map: &M,
    cfg: PlannerConfig,
) -> PlannerResult<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        info!(%peer, "connected");
        match serve_connection(stream, map, cfg).await {
            Ok(()) => info!(%peer, "disconnected"),
            Err(err @ PlannerError::Geometry(_)) | Err(err @ PlannerError::Numerical(_)) => {
                return Err(err);
            }
            Err(err) => warn!(%peer, error = %err, "connection ended"),
        }
    }
}

async fn serve_connection<M: FrenetProjector>(
    mut stream: TcpStream,
    map: &M,
    cfg: PlannerConfig,
) -> PlannerResult<()> {
    let mut session = PlannerSession::new(map, cfg);
    let mut codec = FrameCodec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        codec.extend(&chunk[..n]);
        while let Some(body) = codec.next_frame()? {
            if let Some(reply) = handle_frame(&mut session, &body)? {
                stream.write_all(encode_frame(&reply).as_bytes()).await?;
            }
        }
    }
}
