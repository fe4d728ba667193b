//! Game session: the state machine that owns all mutable match state.

use super::action::{Move, MoveCommitted, MoveError, MoveOrigin, Transition};
use super::board::Board;
use super::config::RulesConfig;
use super::contracts::{Contract, MoveContract};
use super::observer::{MoveObserver, StatusObserver};
use super::rules::{
    StepKind, has_any_move, legal_destinations, legal_moves, valid_origins, winner_after,
};
use super::state::{GameState, Phase};
use super::sync::Role;
use super::types::{Outcome, Player, Point};
use tracing::{debug, info, instrument, warn};

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The point became the move origin.
    Selected(Point),
    /// The selected origin was clicked again and released.
    Deselected,
    /// The point completed a move.
    Moved(Transition),
}

/// Why a click was refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ClickError {
    /// A role is set and it is the opponent's turn.
    #[display("Waiting for the opponent's move")]
    NotLocalTurn,

    /// First move origin off the player's start edge.
    #[display("{} is not on your start edge", _0)]
    NotStartEdge(Point),

    /// First move origin already taken.
    #[display("{} is already used", _0)]
    PointUsed(Point),

    /// Later move origin that is not an end of the line.
    #[display("{} is not an end of your line", _0)]
    NotEndpoint(Point),

    /// The destination click was rejected.
    #[display("{}", _0)]
    Move(MoveError),
}

impl std::error::Error for ClickError {}

/// One match between two players, with undo history and observers.
pub struct GameSession {
    state: GameState,
    config: RulesConfig,
    history: Vec<GameState>,
    local_role: Option<Role>,
    move_observer: Option<Box<dyn MoveObserver>>,
    status_observer: Option<Box<dyn StatusObserver>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("history", &self.history.len())
            .field("local_role", &self.local_role)
            .field("move_observer", &self.move_observer.is_some())
            .field("status_observer", &self.status_observer.is_some())
            .finish()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(RulesConfig::default())
    }
}

impl GameSession {
    /// Creates a session with an empty board sized by the config.
    #[instrument(skip(config), fields(board_size = config.board_size()))]
    pub fn new(config: RulesConfig) -> Self {
        info!("Creating new game session");
        Self {
            state: GameState::new(*config.board_size()),
            config,
            history: Vec::new(),
            local_role: None,
            move_observer: None,
            status_observer: None,
        }
    }

    /// Registers the move observer at construction time.
    pub fn with_move_observer(mut self, observer: impl MoveObserver + 'static) -> Self {
        self.move_observer = Some(Box::new(observer));
        self
    }

    /// Registers the status observer at construction time.
    pub fn with_status_observer(mut self, observer: impl StatusObserver + 'static) -> Self {
        self.status_observer = Some(Box::new(observer));
        self
    }

    /// Replaces the move observer.
    pub fn set_move_observer(&mut self, observer: impl MoveObserver + 'static) {
        self.move_observer = Some(Box::new(observer));
    }

    /// Replaces the status observer.
    pub fn set_status_observer(&mut self, observer: impl StatusObserver + 'static) {
        self.status_observer = Some(Box::new(observer));
    }

    /// Removes the move observer.
    pub fn clear_move_observer(&mut self) {
        self.move_observer = None;
    }

    /// Returns the full game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        self.state.board()
    }

    /// Returns the rules in effect.
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Rule toggles; read on every query, so changes apply immediately.
    pub fn config_mut(&mut self) -> &mut RulesConfig {
        &mut self.config
    }

    /// Returns the player to move.
    pub fn current_player(&self) -> Player {
        self.state.current_player()
    }

    /// Returns the selected origin, if any.
    pub fn selected(&self) -> Option<Point> {
        self.state.selected()
    }

    /// Returns the outcome once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    /// Returns the current interaction phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Number of undoable steps.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Proposes a locally originated move.
    pub fn propose_move(
        &mut self,
        from: Point,
        to: Point,
        player: Player,
    ) -> Result<Transition, MoveError> {
        self.commit(Move::new(player, from, to), MoveOrigin::Local)
    }

    /// Validates and commits a move, then settles win, stalemate and turn.
    ///
    /// Works on a copy of the state; nothing changes unless every check
    /// passes.
    #[instrument(skip(self, mov), fields(mov = %mov))]
    pub(crate) fn commit(
        &mut self,
        mov: Move,
        origin: MoveOrigin,
    ) -> Result<Transition, MoveError> {
        let kind = match MoveContract::pre(&self.state, &self.config, &mov) {
            Ok(kind) => kind,
            Err(err) => {
                self.log_rejection(&mov, &err);
                return Err(err);
            }
        };

        let before = self.state.clone();
        let mut next = self.state.clone();
        if !next.board.draw(mov.player, mov.from, mov.to) {
            let err = MoveError::NotEndpoint(mov.from);
            self.log_rejection(&mov, &err);
            return Err(err);
        }
        let is_double_step = kind == StepKind::Double;
        if is_double_step {
            next.board.consume_double_step(mov.player);
        }
        MoveContract::post(&before, &next)?;

        next.selected = None;
        let transition = if let Some(winner) = winner_after(mov.player, next.board()) {
            let outcome = Outcome::ReachedGoal(winner);
            next.outcome = Some(outcome);
            Transition::Finished(outcome)
        } else {
            let opponent = mov.player.opponent();
            next.current_player = opponent;
            if has_any_move(opponent, next.board(), &self.config) {
                Transition::Continue(opponent)
            } else {
                let outcome = Outcome::Stalemate {
                    winner: mov.player,
                    stuck: opponent,
                };
                next.outcome = Some(outcome);
                Transition::Finished(outcome)
            }
        };

        self.history.push(before);
        self.state = next;
        info!(?origin, is_double_step, "Move committed");

        if origin == MoveOrigin::Local
            && let Some(observer) = self.move_observer.as_mut()
        {
            observer.on_move_committed(&MoveCommitted::new(
                mov.from,
                mov.to,
                mov.player,
                is_double_step,
            ));
        }

        if let Transition::Finished(outcome) = transition {
            info!(%outcome, "Game over");
        }
        self.emit_status();
        Ok(transition)
    }

    fn log_rejection(&self, mov: &Move, err: &MoveError) {
        if *self.config.debug_logging() {
            warn!(%mov, reason = %err, "Move rejected");
        } else {
            debug!(%mov, reason = %err, "Move rejected");
        }
    }

    /// Two-phase pointer input: pick an origin, then a destination.
    #[instrument(skip(self))]
    pub fn click(&mut self, point: Point) -> Result<ClickOutcome, ClickError> {
        let result = self.click_inner(point);
        match &result {
            Ok(ClickOutcome::Moved(_)) => {}
            Ok(_) => self.emit_status(),
            Err(err) => {
                let text = err.to_string();
                self.notify_status(&text);
            }
        }
        result
    }

    fn click_inner(&mut self, point: Point) -> Result<ClickOutcome, ClickError> {
        if self.state.outcome.is_some() {
            return Err(ClickError::Move(MoveError::GameOver));
        }
        if !self.is_local_turn() {
            return Err(ClickError::NotLocalTurn);
        }

        let player = self.state.current_player;
        let board = self.state.board();
        let selected = self.state.selected;
        match selected {
            Some(selected) if selected == point => {
                self.state.selected = None;
                Ok(ClickOutcome::Deselected)
            }
            Some(selected) => self
                .propose_move(selected, point, player)
                .map(ClickOutcome::Moved)
                .map_err(ClickError::Move),
            None if board.is_first_move(player) => {
                if !board.is_start_edge(player, point) {
                    Err(ClickError::NotStartEdge(point))
                } else if *self.config.forbid_point_reuse() && board.is_used(point) {
                    Err(ClickError::PointUsed(point))
                } else {
                    self.state.selected = Some(point);
                    Ok(ClickOutcome::Selected(point))
                }
            }
            None => {
                if board.end_at(player, point).is_some() {
                    self.state.selected = Some(point);
                    Ok(ClickOutcome::Selected(point))
                } else {
                    Err(ClickError::NotEndpoint(point))
                }
            }
        }
    }

    /// Drops the pending origin.
    pub fn clear_selection(&mut self) {
        if self.state.selected.take().is_some() {
            self.emit_status();
        }
    }

    /// Points worth highlighting for the player to move.
    ///
    /// Start points with a move before the first move, destinations of the
    /// selection once one is picked, nothing otherwise or when hints are off.
    pub fn hint_points(&self) -> Vec<Point> {
        if !*self.config.show_hints() || self.state.outcome.is_some() {
            return Vec::new();
        }
        let player = self.state.current_player;
        let board = self.state.board();
        match self.state.selected {
            Some(selected) => legal_destinations(selected, player, board, &self.config),
            None if board.is_first_move(player) => valid_origins(player, board, &self.config)
                .into_iter()
                .filter(|&from| !legal_destinations(from, player, board, &self.config).is_empty())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every move the player to move may play; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.state.outcome.is_some() {
            return Vec::new();
        }
        let player = self.state.current_player;
        legal_moves(player, self.state.board(), &self.config)
            .into_iter()
            .map(|(from, to)| Move::new(player, from, to))
            .collect()
    }

    /// Double-step counter shown to players: 1 until that player's double
    /// step is spent, 0 after. Says nothing about the grant.
    pub fn double_step_remaining(&self, player: Player) -> u8 {
        u8::from(!self.state.board().double_step_used(player))
    }

    /// Restores the most recent snapshot. Returns `false` with no history.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.state = previous;
                debug!(remaining = self.history.len(), "Undo");
                self.emit_status();
                true
            }
            None => {
                debug!("Nothing to undo");
                false
            }
        }
    }

    /// Starts over with P1 to move; `full` also restores the default sides.
    #[instrument(skip(self))]
    pub fn reset(&mut self, full: bool) {
        self.history.clear();
        self.clear_position();
        if full {
            self.state.board.set_swapped(false);
        }
        info!(swapped = self.state.board.swapped(), "Game reset");
        self.emit_status();
    }

    /// Exchanges start and goal edges and starts over; undoable.
    #[instrument(skip(self))]
    pub fn swap_sides(&mut self) {
        self.history.push(self.state.clone());
        let swapped = !self.state.board.swapped();
        self.clear_position();
        self.state.board.set_swapped(swapped);
        info!(swapped, "Sides swapped");
        self.emit_status();
    }

    fn clear_position(&mut self) {
        self.state.board.clear();
        self.state.current_player = Player::P1;
        self.state.selected = None;
        self.state.outcome = None;
    }

    /// Replaces the board with an imported one, keeping the old state undoable.
    pub(crate) fn restore_board(&mut self, board: Board) {
        self.history.push(self.state.clone());
        self.state.board = board;
        self.state.current_player = Player::P1;
        self.state.selected = None;
        self.state.outcome = None;
        self.emit_status();
    }

    /// Assigns the local role; local input is accepted only on its turns.
    #[instrument(skip(self))]
    pub fn set_local_role(&mut self, role: Role) {
        self.local_role = Some(role);
        info!(%role, "Local role set");
        self.notify_status(&format!("You play {}", role.player()));
    }

    /// Returns to hot-seat mode.
    pub fn clear_local_role(&mut self) {
        self.local_role = None;
    }

    /// Returns the local role, if one is set.
    pub fn local_role(&self) -> Option<Role> {
        self.local_role
    }

    /// Whether local input may act now. Always true in hot-seat mode.
    pub fn is_local_turn(&self) -> bool {
        self.local_role
            .is_none_or(|role| role.player() == self.state.current_player)
    }

    /// Human-readable description of the current phase.
    pub fn status_text(&self) -> String {
        let remaining = |player| self.double_step_remaining(player);
        match self.phase() {
            Phase::GameOver(outcome) => outcome.to_string(),
            Phase::AwaitingFirstMove(player) => format!(
                "{}: pick a start point on your edge (double-step left: {})",
                player,
                remaining(player)
            ),
            Phase::AwaitingEndpointSelection(player) => format!(
                "{}: pick one end of your line (double-step left: {})",
                player,
                remaining(player)
            ),
            Phase::AwaitingDestination(player, from) => format!(
                "{}: pick a destination from {} (double-step left: {})",
                player,
                from,
                remaining(player)
            ),
        }
    }

    fn emit_status(&mut self) {
        let text = self.status_text();
        self.notify_status(&text);
    }

    fn notify_status(&mut self, text: &str) {
        debug!(status = text, "Status");
        if let Some(observer) = self.status_observer.as_mut() {
            observer.on_status(text);
        }
    }
}
