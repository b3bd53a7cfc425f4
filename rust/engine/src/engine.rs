use std::collections::HashMap;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde_json::json;

use crate::balance::BalanceStore;
use crate::betting::BettingRound;
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::events::{SeatInfo, TableEvent};
use crate::game::{GameStatus, HandOutcome, ShowdownHand, TableRules, TurnTicket, MAX_SEATS};
use crate::hand::best_category;
use crate::logger::{format_hand_id, today, ActionRecord, HandRecord, ShowdownInfo, Street};
use crate::player::{Chips, Player, PlayerAction, PlayerId, CPU_ID_BASE};
use crate::registry::{PlayerRegistry, Seat};
use crate::strategy::{AiPolicy, TableView};

/// One poker table: roster, deck, betting rounds, pot and the hand lifecycle.
///
/// The controller is single-threaded; hosts that share a table between tasks
/// wrap it in a mutex. Human chips live in the [`BalanceStore`]: a human's
/// table stack is bought in from their balance at hand start, and their
/// contributions are debited from the store each time a round is collected.
/// AI seats get a fixed stack per hand and never touch the store.
///
/// AI turns are played synchronously inside the call that hands them the
/// turn, so every public method returns with either a human to act, or the
/// hand over.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use jetons_engine::balance::InMemoryBalanceStore;
/// use jetons_engine::engine::GameController;
/// use jetons_engine::game::{GameStatus, TableRules};
/// use jetons_engine::player::{Player, PlayerId};
///
/// let store = Arc::new(InMemoryBalanceStore::new());
/// let mut table = GameController::with_seed(TableRules::default(), store, 7);
/// table.initialize().unwrap();
/// table.add_player(Player::human(PlayerId(1), "alice"));
/// table.add_player(Player::human(PlayerId(2), "bob"));
/// table.start_game().unwrap();
///
/// assert_eq!(table.status(), GameStatus::Running);
/// assert_eq!(table.current_player(), Some(PlayerId(1)));
/// assert_eq!(table.target(), 20);
///
/// table.fold(PlayerId(1)).unwrap();
/// assert_eq!(table.status(), GameStatus::Ended);
/// assert_eq!(table.winners(), &[PlayerId(2)]);
/// ```
pub struct GameController {
    rules: TableRules,
    status: GameStatus,
    registry: PlayerRegistry,
    round: BettingRound,
    deck: Deck,
    community: Vec<Card>,
    pot: Chips,
    // chips swept into the pot this hand, per player
    collected: HashMap<PlayerId, Chips>,
    winners: Vec<PlayerId>,
    last_outcome: Option<HandOutcome>,
    balances: Arc<dyn BalanceStore>,
    rng: ChaCha20Rng,
    hand_number: u64,
    turn_seq: u64,
    actions: Vec<ActionRecord>,
    events: Vec<TableEvent>,
}

impl GameController {
    pub fn new(rules: TableRules, balances: Arc<dyn BalanceStore>) -> Self {
        Self::with_seed(rules, balances, rand::random())
    }

    /// Every deck dealt by this table derives from `seed`.
    pub fn with_seed(rules: TableRules, balances: Arc<dyn BalanceStore>, seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let deck = Deck::new_with_seed(rng.random());
        Self {
            rules,
            status: GameStatus::Off,
            registry: PlayerRegistry::new(),
            round: BettingRound::new(),
            deck,
            community: Vec::with_capacity(5),
            pot: 0,
            collected: HashMap::new(),
            winners: Vec::new(),
            last_outcome: None,
            balances,
            rng,
            hand_number: 0,
            turn_seq: 0,
            actions: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Opens the lobby (`Off -> Init`). Calling it on an open lobby is a
    /// no-op, on a finished hand it resets the table.
    pub fn initialize(&mut self) -> Result<(), GameError> {
        match self.status {
            GameStatus::Off => {
                self.status = GameStatus::Init;
                Ok(())
            }
            GameStatus::Init => Ok(()),
            GameStatus::Ended => self.reset_game(),
            GameStatus::Running => Err(GameError::HandInProgress),
        }
    }

    fn seat_limit(&self) -> usize {
        self.rules.max_players.min(MAX_SEATS)
    }

    /// Seats a player. Returns `false` (and changes nothing) while a hand is
    /// running, when the table is full or when the id is already seated.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.status == GameStatus::Running || self.registry.len() >= self.seat_limit() {
            return false;
        }
        self.registry.add_player(player)
    }

    /// Seats a computer player named `CPU_<n>` with id `9000 + n`.
    pub fn add_cpu_player(&mut self, policy: Arc<dyn AiPolicy>) -> Option<PlayerId> {
        let mut n = self.registry.ai_count() as u64;
        while self.registry.contains(PlayerId(CPU_ID_BASE + n)) {
            n += 1;
        }
        let id = PlayerId(CPU_ID_BASE + n);
        let player = Player::ai(id, format!("CPU_{}", n), policy);
        self.add_player(player).then_some(id)
    }

    /// Removes a player from the table.
    ///
    /// Outside a hand the seat is freed at once. During a hand the player is
    /// folded (whoever holds the turn) and the seat is freed at the next
    /// reset; chips they already put in stay in the pot.
    pub fn leave(&mut self, player: PlayerId) -> Result<bool, GameError> {
        if !self.registry.contains(player) {
            return Ok(false);
        }
        self.events.push(TableEvent::PlayerLeft { player_id: player });
        if self.status != GameStatus::Running {
            self.registry.remove_player(player);
            return Ok(true);
        }
        if let Some(seat) = self.registry.seat_mut(player) {
            seat.leaving = true;
        }
        if self.registry.is_folded(player) {
            return Ok(true);
        }
        let held_turn = self.round.current_player() == Some(player);
        self.round.force_fold(&mut self.registry, player)?;
        self.record(player, PlayerAction::Fold, 0);
        if held_turn || self.registry.active_count() <= 1 {
            self.drive()?;
        }
        Ok(true)
    }

    pub fn can_start(&self) -> bool {
        self.status == GameStatus::Init && self.registry.len() >= self.rules.min_players
    }

    /// Deals a new hand (`Init -> Running`).
    ///
    /// Human stacks are bought in as the floor of their balance; humans with
    /// nothing to bring sit the hand out. Fails with
    /// [`GameError::CannotStart`] before touching any state when fewer than
    /// `min_players` seats could play.
    pub fn start_game(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::Init {
            return Err(GameError::CannotStart("the table is not waiting for players"));
        }
        if self.registry.len() < self.rules.min_players {
            return Err(GameError::CannotStart("not enough players"));
        }

        let mut stacks = Vec::with_capacity(self.registry.len());
        for seat in self.registry.seats() {
            let id = seat.id();
            let stack = match &seat.player {
                Player::Ai { .. } => self.rules.ai_stack,
                Player::Human { .. } => {
                    self.balances.ensure_exists(id)?;
                    let balance = self.balances.get_balance(id)?.unwrap_or(0.0);
                    balance.max(0.0).floor() as Chips
                }
            };
            stacks.push((id, stack));
        }
        let funded = stacks.iter().filter(|(_, s)| *s > 0).count();
        if funded < self.rules.min_players {
            return Err(GameError::CannotStart("not enough players with chips"));
        }

        self.clear_hand();
        self.hand_number += 1;
        self.deck = Deck::new_with_seed(self.rng.random());
        for &(id, stack) in &stacks {
            if let Some(seat) = self.registry.seat_mut(id) {
                seat.stack = stack;
            }
            if stack == 0 {
                self.registry.fold(id);
            }
        }
        self.events.push(TableEvent::HandStarted {
            hand_number: self.hand_number,
            seats: self.registry.seats().iter().map(seat_info).collect(),
        });
        for id in self.registry.active_ids() {
            let cards = self.deck.draw_n(2)?;
            if let Some(seat) = self.registry.seat_mut(id) {
                seat.hole = cards.clone();
            }
            self.events.push(TableEvent::CardsDealt {
                player_id: id,
                cards,
            });
        }
        self.round.open(&self.registry, self.rules.floor_bet);
        self.status = GameStatus::Running;
        self.drive()
    }

    pub fn act(&mut self, player: PlayerId, action: PlayerAction) -> Result<Chips, GameError> {
        match action {
            PlayerAction::Fold => self.fold(player).map(|_| 0),
            PlayerAction::Check => self.check(player),
            PlayerAction::Bet(amount) => self.bet(player, amount),
        }
    }

    /// Raises the target by `amount`. Returns the chips taken from the stack.
    pub fn bet(&mut self, player: PlayerId, amount: Chips) -> Result<Chips, GameError> {
        self.ensure_running()?;
        let paid = self.round.bet(&mut self.registry, player, amount)?;
        self.record(player, PlayerAction::Bet(amount), paid);
        self.drive()?;
        Ok(paid)
    }

    /// Checks, or calls up to the target (all-in when short).
    pub fn check(&mut self, player: PlayerId) -> Result<Chips, GameError> {
        self.ensure_running()?;
        let paid = self.round.check(&mut self.registry, player)?;
        self.record(player, PlayerAction::Check, paid);
        self.drive()?;
        Ok(paid)
    }

    pub fn fold(&mut self, player: PlayerId) -> Result<(), GameError> {
        self.ensure_running()?;
        self.round.fold(&mut self.registry, player)?;
        self.record(player, PlayerAction::Fold, 0);
        self.drive()
    }

    /// Folds the ticket's player if the ticket still names the live turn.
    /// Returns `Ok(false)` without touching anything for a stale ticket.
    pub fn timeout_fold(&mut self, ticket: TurnTicket) -> Result<bool, GameError> {
        if self.status != GameStatus::Running || self.current_turn() != Some(ticket) {
            return Ok(false);
        }
        self.fold(ticket.player_id)?;
        Ok(true)
    }

    /// Cancels the running hand: uncollected bets go back to the stacks,
    /// collected human chips go back to the balance store, and the table
    /// returns to `Off`.
    pub fn abort_hand(&mut self) -> Result<(), GameError> {
        self.abort_with("hand aborted")
    }

    // Always lands in `Off`; the first refund failure is reported after.
    fn abort_with(&mut self, reason: &str) -> Result<(), GameError> {
        let mut refund_error = None;
        if self.status == GameStatus::Running {
            for (id, amount) in self.round.collect() {
                if let Err(e) = self.registry.credit(id, amount) {
                    refund_error.get_or_insert(e);
                }
            }
            let collected: Vec<(PlayerId, Chips)> = self.collected.drain().collect();
            for (id, amount) in collected {
                if let Err(e) = self.registry.credit(id, amount) {
                    refund_error.get_or_insert(e);
                }
                if self.is_human(id) {
                    if let Err(e) = self.balances.add_balance(id, amount as f64) {
                        refund_error.get_or_insert(e.into());
                    }
                }
            }
        }
        self.clear_hand();
        self.registry.remove_leavers();
        self.status = GameStatus::Off;
        self.events.push(TableEvent::HandAborted {
            reason: reason.to_string(),
        });
        match refund_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Clears the finished hand and reopens the lobby (`Ended -> Init`).
    /// Players who left during the hand lose their seat here.
    pub fn reset_game(&mut self) -> Result<(), GameError> {
        if self.status == GameStatus::Running {
            return Err(GameError::HandInProgress);
        }
        self.clear_hand();
        self.registry.remove_leavers();
        self.deck = Deck::new_with_seed(self.rng.random());
        if self.status != GameStatus::Off {
            self.status = GameStatus::Init;
        }
        Ok(())
    }

    fn clear_hand(&mut self) {
        self.round = BettingRound::new();
        self.community.clear();
        self.pot = 0;
        self.collected.clear();
        self.winners.clear();
        self.actions.clear();
        self.registry.clear_folds();
        self.registry.clear_hands();
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.status != GameStatus::Running {
            return Err(GameError::NoHandInProgress);
        }
        Ok(())
    }

    fn is_human(&self, id: PlayerId) -> bool {
        self.registry
            .seat(id)
            .is_some_and(|s| !s.player.is_ai())
    }

    fn record(&mut self, player: PlayerId, action: PlayerAction, paid: Chips) {
        self.actions.push(ActionRecord {
            player_id: player,
            street: self.street(),
            action,
        });
        self.events.push(TableEvent::PlayerActed {
            player_id: player,
            action,
            paid,
        });
    }

    // Moves the hand forward until a human must act or the hand is over.
    fn drive(&mut self) -> Result<(), GameError> {
        loop {
            self.round.advance_turn(&self.registry);
            let Some(id) = self.round.current_player() else {
                if self.close_round()? {
                    continue;
                }
                return Ok(());
            };
            self.turn_seq += 1;
            self.events.push(TableEvent::TurnChanged {
                player_id: id,
                seq: self.turn_seq,
                to_call: self.round.to_call(id),
            });
            let policy = match self.registry.seat(id) {
                Some(seat) => seat.player.policy().cloned(),
                None => {
                    self.abort_with("turn holder is not seated")?;
                    return Err(GameError::Internal("turn holder is not seated"));
                }
            };
            match policy {
                Some(policy) => self.play_ai_turn(id, policy.as_ref())?,
                None => return Ok(()),
            }
        }
    }

    fn play_ai_turn(&mut self, id: PlayerId, policy: &dyn AiPolicy) -> Result<(), GameError> {
        let decision = {
            let view = self.view_for(id)?;
            policy.decide(&view)
        };
        let (action, paid) = match decision {
            PlayerAction::Bet(amount) => match self.round.bet(&mut self.registry, id, amount) {
                Ok(paid) => (decision, paid),
                Err(GameError::InvalidAmount(_)) | Err(GameError::InsufficientChips { .. }) => {
                    self.ai_check_or_fold(id)?
                }
                Err(e) => return Err(e),
            },
            PlayerAction::Check => self.ai_check_or_fold(id)?,
            PlayerAction::Fold => {
                self.round.fold(&mut self.registry, id)?;
                (PlayerAction::Fold, 0)
            }
        };
        self.record(id, action, paid);
        Ok(())
    }

    fn ai_check_or_fold(&mut self, id: PlayerId) -> Result<(PlayerAction, Chips), GameError> {
        match self.round.check(&mut self.registry, id) {
            Ok(paid) => Ok((PlayerAction::Check, paid)),
            Err(_) => {
                self.round.fold(&mut self.registry, id)?;
                Ok((PlayerAction::Fold, 0))
            }
        }
    }

    fn view_for(&self, id: PlayerId) -> Result<TableView<'_>, GameError> {
        let seat = self
            .registry
            .seat(id)
            .ok_or(GameError::Internal("turn holder is not seated"))?;
        Ok(TableView {
            player_id: id,
            hole: &seat.hole,
            board: &self.community,
            street: self.street(),
            target: self.round.target(),
            contribution: self.round.contribution(id),
            to_call: self.round.to_call(id),
            stack: seat.stack,
            pot: self.pot,
            active_players: self.registry.active_count(),
        })
    }

    // Sweeps the round into the pot. Returns true when a new round opened.
    fn close_round(&mut self) -> Result<bool, GameError> {
        if let Err(e) = self.sweep_round() {
            self.abort_with("balance store failure")?;
            return Err(e);
        }
        self.events.push(TableEvent::RoundClosed {
            street: self.street(),
            pot: self.pot,
        });

        if self.registry.active_count() <= 1 || self.community.len() >= 5 {
            self.finish()?;
            return Ok(false);
        }

        let n = if self.community.is_empty() { 3 } else { 1 };
        let cards = self.deck.draw_n(n)?;
        self.community.extend_from_slice(&cards);
        self.events.push(TableEvent::StreetRevealed {
            street: self.street(),
            cards,
        });
        self.round.open(&self.registry, 0);
        Ok(true)
    }

    // A contribution leaves the round only once its human debit went
    // through, so an abort refunds each chip exactly once.
    fn sweep_round(&mut self) -> Result<(), GameError> {
        for (id, amount) in self.round.pending() {
            if self.is_human(id) {
                self.balances.add_balance(id, -(amount as f64))?;
            }
            self.round.take(id);
            self.pot += amount;
            *self.collected.entry(id).or_insert(0) += amount;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), GameError> {
        self.round.close();
        let active = self.registry.active_ids();
        let mut showdown = Vec::new();
        let (winners, category) = if active.len() <= 1 {
            (active, None)
        } else {
            for &id in &active {
                let Some(seat) = self.registry.seat(id) else {
                    continue;
                };
                let mut cards = seat.hole.clone();
                cards.extend_from_slice(&self.community);
                showdown.push(ShowdownHand {
                    player_id: id,
                    cards: seat.hole.clone(),
                    category: best_category(&cards),
                });
            }
            let best = showdown.iter().map(|h| h.category).max();
            let winners = showdown
                .iter()
                .filter(|h| Some(h.category) == best)
                .map(|h| h.player_id)
                .collect();
            (winners, best)
        };
        if winners.is_empty() {
            self.abort_with("no player left to award the pot")?;
            return Err(GameError::Internal("no player left to award the pot"));
        }

        let share = self.pot as f64 / winners.len() as f64;
        let table_share = self.pot / winners.len() as Chips;
        let mut paid = Vec::with_capacity(winners.len());
        for &id in &winners {
            if self.is_human(id) {
                if let Err(e) = self.balances.add_balance(id, share) {
                    for &done in &paid {
                        let _ = self.balances.add_balance(done, -share);
                    }
                    self.abort_with("balance store failure")?;
                    return Err(e.into());
                }
                paid.push(id);
            }
        }
        for &id in &winners {
            self.registry.credit(id, table_share)?;
        }

        let outcome = HandOutcome {
            hand_number: self.hand_number,
            winners: winners.clone(),
            category,
            pot: self.pot,
            share,
            showdown,
        };
        self.winners = winners;
        self.last_outcome = Some(outcome.clone());
        self.status = GameStatus::Ended;
        self.events.push(TableEvent::HandEnded { outcome });
        Ok(())
    }

    /// History of the finished hand, `None` until a hand has ended.
    pub fn hand_record(&self) -> Option<HandRecord> {
        if self.status != GameStatus::Ended {
            return None;
        }
        let outcome = self.last_outcome.as_ref()?;
        let names: Vec<String> = outcome.winners.iter().map(|id| id.to_string()).collect();
        let result = match outcome.category {
            None => format!("{} wins {} uncontested", names.join(", "), outcome.pot),
            Some(category) => format!(
                "{} {} {} with {}",
                names.join(", "),
                if names.len() > 1 { "split" } else { "wins" },
                outcome.pot,
                category.label()
            ),
        };
        let notes = if outcome.won_by_fold() {
            Some("won by fold".to_string())
        } else if outcome.winners.len() > 1 {
            Some("split pot".to_string())
        } else {
            None
        };
        Some(HandRecord {
            hand_id: format_hand_id(&today(), self.hand_number),
            seed: Some(self.deck.seed()),
            actions: self.actions.clone(),
            board: self.community.clone(),
            result: Some(result),
            ts: None,
            meta: Some(json!({
                "pot": outcome.pot,
                "share": outcome.share,
                "players": self.registry.len(),
            })),
            showdown: Some(ShowdownInfo {
                winners: outcome.winners.clone(),
                notes,
            }),
        })
    }

    /// Drains the events queued since the last call.
    pub fn take_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn players(&self) -> &[Seat] {
        self.registry.seats()
    }

    pub fn seat(&self, id: PlayerId) -> Option<&Seat> {
        self.registry.seat(id)
    }

    pub fn is_seated(&self, id: PlayerId) -> bool {
        self.registry.contains(id)
    }

    pub fn is_folded(&self, id: PlayerId) -> bool {
        self.registry.is_folded(id)
    }

    pub fn stack(&self, id: PlayerId) -> Option<Chips> {
        self.registry.stack(id)
    }

    pub fn contribution(&self, id: PlayerId) -> Chips {
        self.round.contribution(id)
    }

    pub fn target(&self) -> Chips {
        self.round.target()
    }

    pub fn to_call(&self, id: PlayerId) -> Chips {
        self.round.to_call(id)
    }

    pub fn min_bet_tour(&self) -> Chips {
        self.round.min_bet_tour()
    }

    pub fn first_max_bet_player(&self) -> Option<PlayerId> {
        self.round.first_max_bet_player()
    }

    /// Chips collected from closed rounds.
    pub fn pot(&self) -> Chips {
        self.pot
    }

    /// Chips still sitting in the open round.
    pub fn pending_bets(&self) -> Chips {
        self.round.total()
    }

    pub fn community_cards(&self) -> &[Card] {
        &self.community
    }

    pub fn hole_cards(&self, id: PlayerId) -> Option<&[Card]> {
        self.registry.seat(id).map(|s| s.hole.as_slice())
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        if self.status != GameStatus::Running {
            return None;
        }
        self.round.current_player()
    }

    pub fn current_turn(&self) -> Option<TurnTicket> {
        self.current_player().map(|player_id| TurnTicket {
            player_id,
            seq: self.turn_seq,
        })
    }

    pub fn winners(&self) -> &[PlayerId] {
        &self.winners
    }

    pub fn last_outcome(&self) -> Option<&HandOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    pub fn street(&self) -> Street {
        Street::from_board_len(self.community.len())
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }
}

fn seat_info(seat: &Seat) -> SeatInfo {
    SeatInfo {
        player_id: seat.id(),
        name: seat.player.name().to_string(),
        stack: seat.stack,
        is_ai: seat.player.is_ai(),
    }
}
