//! Two peers on their own tasks, kept in sync over in-process channels.

use anyhow::{Context, Result, bail};
use crosslines_rules::{
    GameSession, Outcome, RulesConfig, SyncPublisher, Transport, TransportError,
    apply_remote_move, apply_role, begin_role_handshake, export_snapshot,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, instrument, warn};

/// What travels between the peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Role side channel: a bare `"p1"` or `"p2"`.
    Role(String),
    /// Move envelope.
    Move(String),
}

/// Transport that wraps payloads into frames on a channel.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: UnboundedSender<Frame>,
    wrap: fn(String) -> Frame,
}

impl ChannelTransport {
    /// Sends move envelopes.
    pub fn moves(tx: UnboundedSender<Frame>) -> Self {
        Self {
            tx,
            wrap: Frame::Move,
        }
    }

    /// Sends role strings.
    pub fn roles(tx: UnboundedSender<Frame>) -> Self {
        Self {
            tx,
            wrap: Frame::Role,
        }
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, payload: &str) -> Result<(), TransportError> {
        self.tx
            .send((self.wrap)(payload.to_string()))
            .map_err(|_| TransportError::new("peer hung up"))
    }
}

/// How one peer saw the match end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerReport {
    /// Peer name.
    pub name: &'static str,
    /// Final board snapshot.
    pub snapshot: String,
    /// Outcome, if the game finished.
    pub outcome: Option<Outcome>,
    /// Committed moves.
    pub moves: usize,
    /// Final board rendering.
    pub board: String,
}

struct Peer {
    name: &'static str,
    session: GameSession,
    inbox: UnboundedReceiver<Frame>,
    rng: StdRng,
}

impl Peer {
    fn new(
        name: &'static str,
        config: RulesConfig,
        outbox: UnboundedSender<Frame>,
        inbox: UnboundedReceiver<Frame>,
        seed: u64,
    ) -> Self {
        let publisher = SyncPublisher::new(ChannelTransport::moves(outbox));
        let session = GameSession::new(config).with_move_observer(publisher);
        Self {
            name,
            session,
            inbox,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn moves(&self) -> usize {
        self.session.board().segments().len()
    }

    /// Plays on local turns and replays frames otherwise, until the game
    /// ends, the move cap is hit, or the peer goes away.
    #[instrument(skip(self), fields(peer = self.name))]
    async fn run(mut self, max_moves: usize) -> Result<PeerReport> {
        while self.session.outcome().is_none() && self.moves() < max_moves {
            if self.session.local_role().is_some() && self.session.is_local_turn() {
                let moves = self.session.legal_moves();
                let Some(&mov) = moves.choose(&mut self.rng) else {
                    bail!("{}: no legal move while the game is in progress", self.name);
                };
                self.session
                    .propose_move(mov.from, mov.to, mov.player)
                    .with_context(|| format!("{}: own move {} rejected", self.name, mov))?;
                debug!(%mov, "Played");
                continue;
            }

            match self.inbox.recv().await {
                Some(Frame::Role(role)) => {
                    let role = apply_role(&mut self.session, &role)
                        .with_context(|| format!("{}: bad role", self.name))?;
                    info!(%role, "Role assigned by host");
                }
                Some(Frame::Move(payload)) => {
                    if let Err(code) = apply_remote_move(&mut self.session, &payload) {
                        bail!("{}: peer move rejected with {}", self.name, code);
                    }
                }
                None => {
                    warn!("Peer went away");
                    break;
                }
            }
        }

        Ok(PeerReport {
            name: self.name,
            snapshot: export_snapshot(&self.session),
            outcome: self.session.outcome(),
            moves: self.moves(),
            board: self.session.board().to_string(),
        })
    }
}

/// Runs a duel and checks both peers finished with identical boards.
#[instrument(skip(config))]
pub async fn run(
    config: RulesConfig,
    seed: u64,
    max_moves: usize,
) -> Result<(PeerReport, PeerReport)> {
    let (to_guest, guest_inbox) = unbounded_channel();
    let (to_host, host_inbox) = unbounded_channel();

    let mut host = Peer::new("host", config.clone(), to_guest.clone(), host_inbox, seed);
    let guest = Peer::new("guest", config, to_host, guest_inbox, seed.wrapping_add(1));

    let mut roles = ChannelTransport::roles(to_guest);
    let role = begin_role_handshake(&mut host.session, &mut host.rng, &mut roles)
        .context("sending role to guest")?;
    info!(%role, seed, "Duel started");

    let host = tokio::spawn(host.run(max_moves));
    let guest = tokio::spawn(guest.run(max_moves));
    let host = host.await.context("host task panicked")??;
    let guest = guest.await.context("guest task panicked")??;

    if host.snapshot != guest.snapshot {
        bail!(
            "peers diverged after {} / {} moves:\n{}\n{}",
            host.moves,
            guest.moves,
            host.snapshot,
            guest.snapshot
        );
    }
    info!(moves = host.moves, outcome = ?host.outcome, "Duel finished in sync");
    Ok((host, guest))
}
