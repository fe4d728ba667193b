//! Role negotiation over the side channel.
//!
//! Roles travel as the bare strings `"p1"` and `"p2"`, not as envelopes.

use super::super::game::GameSession;
use super::super::types::Player;
use super::transport::{Transport, TransportError};
use derive_more::{Display, Error};
use rand::Rng;
use std::str::FromStr;
use tracing::{info, instrument, warn};

/// Which player the local client controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Role {
    /// Controls [`Player::P1`].
    #[display("p1")]
    P1,
    /// Controls [`Player::P2`].
    #[display("p2")]
    P2,
}

impl Role {
    /// The player this role controls.
    pub fn player(self) -> Player {
        match self {
            Role::P1 => Player::P1,
            Role::P2 => Player::P2,
        }
    }

    /// The role of the counterpart.
    pub fn opposite(self) -> Self {
        match self {
            Role::P1 => Role::P2,
            Role::P2 => Role::P1,
        }
    }

    /// Wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::P1 => "p1",
            Role::P2 => "p2",
        }
    }
}

impl From<Player> for Role {
    fn from(player: Player) -> Self {
        match player {
            Player::P1 => Role::P1,
            Player::P2 => Role::P2,
        }
    }
}

/// Role string other than `"p1"` or `"p2"`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("invalid_role")]
pub struct RoleError {
    /// The rejected string.
    pub received: String,
}

impl RoleError {
    /// Wire error code.
    pub fn code(&self) -> &'static str {
        "invalid_role"
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "p1" => Ok(Role::P1),
            "p2" => Ok(Role::P2),
            other => Err(RoleError {
                received: other.to_string(),
            }),
        }
    }
}

/// Picks a role uniformly at random.
pub fn decide_random_role(rng: &mut impl Rng) -> Role {
    if rng.random_bool(0.5) { Role::P1 } else { Role::P2 }
}

/// Adopts the role the counterpart assigned to us.
#[instrument(skip(session))]
pub fn apply_role(session: &mut GameSession, role: &str) -> Result<Role, RoleError> {
    let role = role.parse::<Role>().inspect_err(|e| {
        warn!(received = %e.received, "Rejected role assignment");
    })?;
    session.set_local_role(role);
    Ok(role)
}

/// Creator side of the handshake: pick a role, keep it, send the other one.
///
/// The local role is set even when the send fails; the caller decides whether
/// to retry.
#[instrument(skip_all)]
pub fn begin_role_handshake(
    session: &mut GameSession,
    rng: &mut impl Rng,
    transport: &mut impl Transport,
) -> Result<Role, TransportError> {
    let mine = decide_random_role(rng);
    session.set_local_role(mine);
    info!(%mine, theirs = %mine.opposite(), "Role handshake started");
    transport.send(mine.opposite().as_str())?;
    Ok(mine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_parse_roles() {
        assert_eq!("p1".parse::<Role>(), Ok(Role::P1));
        assert_eq!("p2".parse::<Role>(), Ok(Role::P2));
        let err = "P1".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "invalid_role");
        assert_eq!(err.received, "P1");
    }

    #[test]
    fn test_random_role_is_seeded() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let picks_a: Vec<Role> = (0..16).map(|_| decide_random_role(&mut a)).collect();
        let picks_b: Vec<Role> = (0..16).map(|_| decide_random_role(&mut b)).collect();
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.contains(&Role::P1));
        assert!(picks_a.contains(&Role::P2));
    }

    #[test]
    fn test_apply_role() {
        let mut session = GameSession::default();
        assert_eq!(apply_role(&mut session, "p2"), Ok(Role::P2));
        assert_eq!(session.local_role(), Some(Role::P2));
        assert!(apply_role(&mut session, "both").is_err());
        assert_eq!(session.local_role(), Some(Role::P2));
    }

    #[test]
    fn test_handshake_sends_opposite_role() {
        let mut session = GameSession::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut sent = Vec::new();
        let mut transport = |payload: &str| -> Result<(), TransportError> {
            sent.push(payload.to_string());
            Ok(())
        };
        let mine = begin_role_handshake(&mut session, &mut rng, &mut transport).unwrap();
        assert_eq!(session.local_role(), Some(mine));
        assert_eq!(sent, vec![mine.opposite().as_str().to_string()]);
    }
}
