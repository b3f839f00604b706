use std::rc::Rc;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::card_generator::generate_card_from;
use super::store::{
    load_json, save_json, KeyValueStore, ACHIEVED_BINGO_KEY, CARD_ID_KEY, CARD_KEY,
};
use super::win_detector::{check_blackout, check_bingo, count_marked};
use crate::clock::Clock;
use crate::error::{BingoError, Result};
use crate::events::EventEmitter;
use crate::model::{
    Card, CardId, CellPosition, GameEvent, SessionState, WinState, BINGO_EVENTS, GRID_SIZE,
};

/// Owns the card in play and decides what each toggle means.
pub struct GameSession {
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    rng: StdRng,
    catalog: Vec<&'static str>,
    card: Option<Rc<Card>>,
    card_id: Option<CardId>,
    win_state: WinState,
    marked_count: u8,
    /// Set once a win has been reported for this card; only a blackout is reported after.
    has_achieved_bingo: bool,
    state: SessionState,
    game_event_emitter: EventEmitter<GameEvent>,
}

impl GameSession {
    /// Restores the last card from `store` when one is saved and still valid.
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        game_event_emitter: EventEmitter<GameEvent>,
    ) -> Self {
        let mut session = Self {
            store,
            clock,
            rng: StdRng::from_os_rng(),
            catalog: BINGO_EVENTS.to_vec(),
            card: None,
            card_id: None,
            win_state: WinState::none(),
            marked_count: 0,
            has_achieved_bingo: false,
            state: SessionState::NoCard,
            game_event_emitter,
        };
        session.restore();
        session
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<&'static str>) -> Self {
        self.catalog = catalog;
        self
    }

    fn restore(&mut self) {
        let Some(card) = load_json::<Card>(self.store.as_ref(), CARD_KEY) else {
            return;
        };
        if let Err(e) = card.validate() {
            warn!(target: "game_session", "Discarding stored card: {}", e);
            return;
        }
        let card_id = load_json::<CardId>(self.store.as_ref(), CARD_ID_KEY).unwrap_or_else(|| {
            let card_id = CardId::generate(self.clock.now_millis());
            save_json(self.store.as_ref(), CARD_ID_KEY, &card_id);
            card_id
        });
        self.has_achieved_bingo =
            load_json::<bool>(self.store.as_ref(), ACHIEVED_BINGO_KEY).unwrap_or(false);
        self.state = match (self.has_achieved_bingo, check_blackout(&card)) {
            (true, true) => SessionState::Blackout,
            (true, false) => SessionState::Won,
            (false, _) => SessionState::Active,
        };
        self.marked_count = count_marked(&card);
        info!(
            target: "game_session",
            "Restored card {}; state: {:?}; marked: {}",
            card_id,
            self.state,
            self.marked_count
        );
        self.card = Some(Rc::new(card));
        self.card_id = Some(card_id);
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_deref()
    }

    pub fn card_id(&self) -> Option<&CardId> {
        self.card_id.as_ref()
    }

    pub fn win_state(&self) -> &WinState {
        &self.win_state
    }

    pub fn marked_count(&self) -> u8 {
        self.marked_count
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn has_achieved_bingo(&self) -> bool {
        self.has_achieved_bingo
    }

    /// Deals a fresh random card. On failure the current card is kept as it was.
    pub fn initialize_card(&mut self) -> Result<()> {
        let card = generate_card_from(&self.catalog, true, None, &mut self.rng)?;
        self.install_card(card);
        Ok(())
    }

    pub fn reset_game(&mut self) -> Result<()> {
        self.initialize_card()
    }

    /// Deals a card holding `events` in row-major order, falling back to a random card
    /// when the list cannot form one.
    pub fn load_shared_card(&mut self, events: &[String]) -> Result<()> {
        let card = match generate_card_from(&self.catalog, true, Some(events), &mut self.rng) {
            Ok(card) => card,
            Err(e) => {
                warn!(
                    target: "game_session",
                    "Shared event list rejected ({}); dealing a random card",
                    e
                );
                generate_card_from(&self.catalog, true, None, &mut self.rng)?
            }
        };
        self.install_card(card);
        Ok(())
    }

    fn install_card(&mut self, card: Card) {
        let previous_state = self.state;
        let card_id = CardId::generate(self.clock.now_millis());
        info!(target: "game_session", "New card {}", card_id);

        self.marked_count = count_marked(&card);
        self.card = Some(Rc::new(card));
        self.card_id = Some(card_id.clone());
        self.win_state = WinState::none();
        self.has_achieved_bingo = false;
        self.state = SessionState::Active;
        self.persist_card();
        save_json(self.store.as_ref(), CARD_ID_KEY, &card_id);

        self.game_event_emitter
            .emit(GameEvent::CardDealt { card_id });
        if previous_state != self.state {
            self.game_event_emitter
                .emit(GameEvent::SessionStateChanged(self.state));
        }
        self.game_event_emitter
            .emit(GameEvent::WinStateChanged(self.win_state.clone()));
        self.game_event_emitter
            .emit(GameEvent::MarkedCountChanged(self.marked_count));
    }

    fn persist_card(&self) {
        if let Some(card) = &self.card {
            save_json(self.store.as_ref(), CARD_KEY, card.as_ref());
        }
        save_json(
            self.store.as_ref(),
            ACHIEVED_BINGO_KEY,
            &self.has_achieved_bingo,
        );
    }

    fn check_toggle(&self, row: usize, col: usize) -> Result<&Rc<Card>> {
        let card = self.card.as_ref().ok_or(BingoError::NoCard)?;
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(BingoError::InvalidCoordinates { row, col });
        }
        match card.get(row, col) {
            Some(cell) if cell.is_free => Err(BingoError::FreeCell),
            Some(_) => Ok(card),
            None => Err(BingoError::InvalidCoordinates { row, col }),
        }
    }

    /// Flips one square and re-evaluates the win. Invalid requests are logged and
    /// ignored; returns whether the card changed.
    pub fn toggle_square(&mut self, row: usize, col: usize) -> bool {
        let card = match self.check_toggle(row, col) {
            Ok(card) => card,
            Err(e) => {
                error!(target: "game_session", "Ignoring toggle at ({}, {}): {}", row, col, e);
                return false;
            }
        };

        let position = CellPosition::new(row, col);
        let new_card = card.with_toggled(position);
        let previous_win = std::mem::take(&mut self.win_state);
        let previous_state = self.state;

        if check_blackout(&new_card) {
            self.win_state = WinState::blackout();
            self.has_achieved_bingo = true;
            self.state = SessionState::Blackout;
            info!(target: "game_session", "Blackout!");
        } else if !self.has_achieved_bingo {
            let result = check_bingo(&new_card);
            if result.has_bingo {
                info!(target: "game_session", "Bingo: {:?}", result.win_type);
                self.win_state = WinState {
                    has_bingo: true,
                    win_type: result.win_type,
                    is_blackout: false,
                    winning_cells: result.winning_cells,
                };
                self.has_achieved_bingo = true;
                self.state = SessionState::Won;
            }
        }
        // an already-reported line win is not reported again; win_state stays empty

        let marked = new_card.cell(position).map(|c| c.marked).unwrap_or(false);
        self.marked_count = count_marked(&new_card);
        self.card = Some(Rc::new(new_card));
        self.persist_card();

        self.game_event_emitter
            .emit(GameEvent::SquareToggled { position, marked });
        if previous_state != self.state {
            self.game_event_emitter
                .emit(GameEvent::SessionStateChanged(self.state));
        }
        if previous_win != self.win_state {
            self.game_event_emitter
                .emit(GameEvent::WinStateChanged(self.win_state.clone()));
        }
        self.game_event_emitter
            .emit(GameEvent::MarkedCountChanged(self.marked_count));
        if WinState::is_new_win(&previous_win, &self.win_state) {
            self.game_event_emitter
                .emit(GameEvent::NewWin(self.win_state.clone()));
        }
        true
    }
}
