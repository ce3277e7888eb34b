use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use chrono::{DateTime, Utc};
use core::mem;
use serde::Serialize;
use smallvec::SmallVec;

use crate::*;

pub const HINTS_PER_SESSION: Count = 3;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Source of the current time, used to date records.
pub type Clock = fn() -> DateTime<Utc>;

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

/// Ids of the face up cards waiting to be compared, at most two.
pub type Selection = SmallVec<[CardId; 2]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Ready,
    AwaitingFirstFlip,
    AwaitingSecondFlip,
    Resolving,
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    NoChange,
    Flipped,
    Matched,
    Mismatched,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Everything a view needs to draw the board.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub cards: Vec<Card>,
    pub flipped_selection: Selection,
    pub moves: Count,
    pub elapsed_secs: Count,
    pub matched_pairs: Count,
    pub streak: Count,
    pub max_streak: Count,
    pub hints_used: Count,
    pub hints_remaining: Count,
    pub score: Score,
    pub is_checking: bool,
    /// A hint is revealing the board, cleared when its `EndHint` runs.
    pub is_hint_showing: bool,
    pub is_paused: bool,
    pub is_won: bool,
}

impl SessionState {
    fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            flipped_selection: Selection::new(),
            moves: 0,
            elapsed_secs: 0,
            matched_pairs: 0,
            streak: 0,
            max_streak: 0,
            hints_used: 0,
            hints_remaining: HINTS_PER_SESSION,
            score: 0,
            is_checking: false,
            is_hint_showing: false,
            is_paused: false,
            is_won: false,
        }
    }
}

/// Produced once, when the last pair is matched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinSummary {
    pub score: Score,
    pub rating: Rating,
    pub stars: u8,
    pub perfect: bool,
    pub new_best: bool,
    pub leaderboard_rank: Option<u32>,
}

#[derive(Copy, Clone, Debug)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub seed: u64,
    pub catalog: Catalog,
    pub clock: Clock,
}

impl SessionConfig {
    pub fn new(difficulty: Difficulty, mode: GameMode) -> Self {
        Self {
            difficulty,
            mode,
            seed: 0,
            catalog: Catalog::default(),
            clock: unix_epoch,
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn with_catalog(self, catalog: Catalog) -> Self {
        Self { catalog, ..self }
    }

    pub fn with_clock(self, clock: Clock) -> Self {
        Self { clock, ..self }
    }
}

/// One game of concentration and the records it reads and writes.
///
/// Intents (`flip_card`, `use_hint`, ...) never fail, anything that does not
/// apply in the current state is ignored. Delayed effects are queued as
/// [`Deferred`] values tagged with the current generation; the host collects
/// them with [`take_scheduled`](Self::take_scheduled) and hands each back to
/// [`run_deferred`](Self::run_deferred) once its delay passed. A reset bumps
/// the generation, so effects of the previous deal are dropped.
#[derive(Debug)]
pub struct MatchSession<S> {
    store: S,
    catalog: Catalog,
    generator: RandomDeckGenerator,
    clock: Clock,
    difficulty: Difficulty,
    mode: GameMode,
    player_name: String,
    generation: Generation,
    state: SessionState,
    best_score: Option<BestScoreRecord>,
    win_summary: Option<WinSummary>,
    celebrating: bool,
    scheduled: Vec<Deferred>,
    cues: Vec<Cue>,
}

impl<S: KeyValueStore> MatchSession<S> {
    pub fn new(store: S, config: SessionConfig) -> Self {
        let SessionConfig {
            difficulty,
            mode,
            seed,
            catalog,
            clock,
        } = config;

        let mut generator = RandomDeckGenerator::new(seed);
        let cards = generator.generate(&catalog, difficulty);
        let best_score = BestScoreRecord::load(&store, difficulty, mode);

        Self {
            store,
            catalog,
            generator,
            clock,
            difficulty,
            mode,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            generation: 0,
            state: SessionState::new(cards),
            best_score,
            win_summary: None,
            celebrating: false,
            scheduled: Vec::new(),
            cues: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn cards(&self) -> &[Card] {
        &self.state.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.state.cards.iter().find(|card| card.id == id)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn pair_count(&self) -> Count {
        self.difficulty.pair_count()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn best_score(&self) -> Option<&BestScoreRecord> {
        self.best_score.as_ref()
    }

    pub fn win_summary(&self) -> Option<&WinSummary> {
        self.win_summary.as_ref()
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Name written into new records, blank names fall back to the default.
    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        self.player_name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.to_string()
        };
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn leaderboard(&self) -> Leaderboard {
        Leaderboard::load(&self.store)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::load_or_default(&self.store)
    }

    pub fn phase(&self) -> Phase {
        let state = &self.state;
        if state.is_won {
            Phase::Won
        } else if state.is_checking {
            Phase::Resolving
        } else if state.flipped_selection.len() == 1 {
            Phase::AwaitingSecondFlip
        } else if state.moves == 0 && state.matched_pairs == 0 {
            Phase::Ready
        } else {
            Phase::AwaitingFirstFlip
        }
    }

    /// Whether [`tick`](Self::tick) currently counts time.
    pub fn is_timer_running(&self) -> bool {
        let state = &self.state;
        state.matched_pairs > 0 && !state.is_won && !state.is_paused
    }

    pub fn metrics(&self) -> GameMetrics {
        GameMetrics {
            moves: self.state.moves,
            elapsed_secs: self.state.elapsed_secs,
            difficulty: self.difficulty,
            max_streak: self.state.max_streak,
            hints_used: self.state.hints_used,
            pair_count: self.pair_count(),
            mode: self.mode,
        }
    }

    /// Deferred effects queued since the last call, to be scheduled by the host.
    pub fn take_scheduled(&mut self) -> Vec<Deferred> {
        mem::take(&mut self.scheduled)
    }

    /// Cues emitted since the last call.
    pub fn take_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.cues)
    }

    pub fn flip_card(&mut self, id: CardId) -> FlipOutcome {
        let state = &self.state;
        if state.is_checking || state.is_paused || state.is_won || state.flipped_selection.len() >= 2
        {
            log::trace!("flip {} ignored in {:?}", id, self.phase());
            return FlipOutcome::NoChange;
        }

        let Some(index) = self.card_index(id) else {
            log::trace!("flip of unknown card {} ignored", id);
            return FlipOutcome::NoChange;
        };
        if !self.state.cards[index].is_selectable() {
            return FlipOutcome::NoChange;
        }

        self.state.cards[index].is_flipped = true;
        self.state.flipped_selection.push(id);
        self.cues.push(Cue::Flip);

        let [first, second] = match self.state.flipped_selection[..] {
            [first, second] => [first, second],
            _ => return FlipOutcome::Flipped,
        };

        self.state.moves = self.state.moves.saturating_add(1);
        self.state.is_checking = true;

        let is_match = self.card(first).map(|card| card.value) == self.card(second).map(|card| card.value);
        log::debug!("move {}: {} / {} match={}", self.state.moves, first, second, is_match);
        if is_match {
            self.schedule(DeferredAction::ResolveMatch(first, second));
            FlipOutcome::Matched
        } else {
            self.schedule(DeferredAction::ResolveMismatch(first, second));
            FlipOutcome::Mismatched
        }
    }

    /// Advances the clock by one second when the timer runs, returns whether it did.
    pub fn tick(&mut self) -> bool {
        if !self.is_timer_running() {
            return false;
        }
        self.state.elapsed_secs = self.state.elapsed_secs.saturating_add(1);
        true
    }

    pub fn use_hint(&mut self) -> bool {
        let state = &self.state;
        if state.hints_remaining == 0 || state.is_hint_showing || state.is_paused || state.is_won {
            log::trace!("hint ignored, {} left", state.hints_remaining);
            return false;
        }

        self.state.hints_remaining -= 1;
        self.state.is_hint_showing = true;
        self.state.hints_used = self.state.hints_used.saturating_add(1);
        for card in self.state.cards.iter_mut().filter(|card| !card.is_matched) {
            card.is_flipped = true;
        }
        self.cues.push(Cue::Hint);
        self.schedule(DeferredAction::EndHint);
        log::debug!("hint used, {} left", self.state.hints_remaining);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        if self.state.is_won {
            return false;
        }
        self.state.is_paused = !self.state.is_paused;
        log::debug!("paused: {}", self.state.is_paused);
        true
    }

    /// Runs `deferred` unless it belongs to an older deal, returns whether it
    /// changed anything.
    pub fn run_deferred(&mut self, deferred: Deferred) -> bool {
        if deferred.generation != self.generation {
            log::debug!(
                "dropping {:?} from generation {}, now at {}",
                deferred.action,
                deferred.generation,
                self.generation
            );
            return false;
        }

        match deferred.action {
            DeferredAction::ResolveMatch(first, second) => self.resolve_match(first, second),
            DeferredAction::ResolveMismatch(first, second) => self.resolve_mismatch(first, second),
            DeferredAction::EndHint => self.end_hint(),
            DeferredAction::EndCelebration => mem::replace(&mut self.celebrating, false),
        }
    }

    /// Deals a new board, optionally for another difficulty or mode. An
    /// unfinished game leaves no trace in the stored records.
    pub fn reset_session(&mut self, difficulty: Option<Difficulty>, mode: Option<GameMode>) {
        self.generation = self.generation.wrapping_add(1);
        self.difficulty = difficulty.unwrap_or(self.difficulty);
        self.mode = mode.unwrap_or(self.mode);

        let cards = self.generator.generate(&self.catalog, self.difficulty);
        self.state = SessionState::new(cards);
        self.best_score = BestScoreRecord::load(&self.store, self.difficulty, self.mode);
        self.win_summary = None;
        self.celebrating = false;
        self.scheduled.clear();
        self.cues.clear();
        log::debug!(
            "new {} {} game, generation {}",
            self.difficulty,
            self.mode,
            self.generation
        );
    }

    /// Applies a settings change, persisting it and redealing when the
    /// difficulty or mode changed.
    pub fn change_setting(&mut self, settings: &mut Settings, change: SettingChange) -> bool {
        if !settings.apply_and_save(change, &mut self.store) {
            return false;
        }
        if change.restarts_session() {
            self.reset_session(Some(settings.difficulty), Some(settings.mode));
        }
        true
    }

    fn card_index(&self, id: CardId) -> Option<usize> {
        self.state.cards.iter().position(|card| card.id == id)
    }

    fn schedule(&mut self, action: DeferredAction) {
        self.scheduled.push(Deferred::new(self.generation, action));
    }

    fn is_pending_pair(&self, first: CardId, second: CardId) -> bool {
        self.state.is_checking && self.state.flipped_selection[..] == [first, second]
    }

    fn resolve_match(&mut self, first: CardId, second: CardId) -> bool {
        if !self.is_pending_pair(first, second) {
            return false;
        }

        for card in self
            .state
            .cards
            .iter_mut()
            .filter(|card| card.id == first || card.id == second)
        {
            card.is_flipped = true;
            card.is_matched = true;
        }

        let state = &mut self.state;
        state.matched_pairs += 1;
        state.streak += 1;
        state.max_streak = state.max_streak.max(state.streak);
        state.flipped_selection.clear();
        state.is_checking = false;
        self.cues.push(Cue::Match);

        self.check_win();
        true
    }

    fn resolve_mismatch(&mut self, first: CardId, second: CardId) -> bool {
        if !self.is_pending_pair(first, second) {
            return false;
        }

        for card in self
            .state
            .cards
            .iter_mut()
            .filter(|card| (card.id == first || card.id == second) && !card.is_matched)
        {
            card.is_flipped = false;
        }

        let state = &mut self.state;
        state.streak = 0;
        state.flipped_selection.clear();
        state.is_checking = false;
        true
    }

    fn end_hint(&mut self) -> bool {
        let mut updated = mem::replace(&mut self.state.is_hint_showing, false);
        let selection = &self.state.flipped_selection;
        for card in self.state.cards.iter_mut() {
            if card.is_flipped && !card.is_matched && !selection.contains(&card.id) {
                card.is_flipped = false;
                updated = true;
            }
        }
        updated
    }

    fn check_win(&mut self) {
        if self.state.is_won || self.state.matched_pairs != self.pair_count() {
            return;
        }

        let metrics = self.metrics();
        let score = metrics.score();
        let date = (self.clock)();
        self.state.is_won = true;
        self.state.score = score;

        let new_best = BestScoreRecord::is_improved_by(self.best_score.as_ref(), score);
        if new_best {
            let record = BestScoreRecord {
                moves: metrics.moves,
                time: metrics.elapsed_secs,
                difficulty: self.difficulty,
                mode: self.mode,
                score,
                player_name: self.player_name.clone(),
                date,
            };
            record.save(&mut self.store);
            self.best_score = Some(record);
        }

        let mut leaderboard = self.leaderboard();
        let leaderboard_rank = leaderboard.insert(LeaderboardEntry {
            rank: 0,
            player_name: self.player_name.clone(),
            score,
            moves: metrics.moves,
            time: metrics.elapsed_secs,
            difficulty: self.difficulty,
            mode: self.mode,
            date,
        });
        leaderboard.save(&mut self.store);

        let mut statistics = self.statistics();
        statistics.record_win(&metrics, score);
        statistics.save(&mut self.store);

        self.win_summary = Some(WinSummary {
            score,
            rating: rating_tier(score),
            stars: star_rating(score),
            perfect: metrics.is_perfect(),
            new_best,
            leaderboard_rank,
        });
        self.celebrating = true;
        self.cues.push(Cue::Win);
        self.schedule(DeferredAction::EndCelebration);
        log::debug!(
            "won in {} moves and {}s, score {} ({})",
            metrics.moves,
            metrics.elapsed_secs,
            score,
            rating_tier(score)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn session(difficulty: Difficulty) -> MatchSession<MemoryStore> {
        MatchSession::new(
            MemoryStore::new(),
            SessionConfig::new(difficulty, GameMode::Classic).with_seed(5),
        )
    }

    /// Ids `2k` and `2k + 1` always share a symbol.
    fn twin(id: CardId) -> CardId {
        id ^ 1
    }

    fn run_all(session: &mut MatchSession<MemoryStore>) {
        for deferred in session.take_scheduled() {
            session.run_deferred(deferred);
        }
    }

    fn match_pair(session: &mut MatchSession<MemoryStore>, id: CardId) {
        assert_eq!(session.flip_card(id), FlipOutcome::Flipped);
        assert_eq!(session.flip_card(twin(id)), FlipOutcome::Matched);
        run_all(session);
    }

    fn win(session: &mut MatchSession<MemoryStore>) {
        for pair in 0..session.pair_count() as CardId {
            match_pair(session, pair * 2);
        }
    }

    fn matched_count(session: &MatchSession<MemoryStore>) -> usize {
        session.cards().iter().filter(|card| card.is_matched).count()
    }

    #[test]
    fn new_session_is_ready() {
        let session = session(Difficulty::Medium);
        let state = session.state();

        assert_eq!(state.cards.len(), 16);
        assert_eq!(state.hints_remaining, HINTS_PER_SESSION);
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.best_score().is_none());
        assert!(!session.is_timer_running());
    }

    #[test]
    fn matching_pair_resolves_after_delay() {
        let mut session = session(Difficulty::Easy);

        assert_eq!(session.flip_card(0), FlipOutcome::Flipped);
        assert_eq!(session.phase(), Phase::AwaitingSecondFlip);
        assert_eq!(session.flip_card(1), FlipOutcome::Matched);
        assert_eq!(session.phase(), Phase::Resolving);
        assert_eq!(session.state().moves, 1);
        assert!(session.state().is_checking);

        let scheduled = session.take_scheduled();
        assert_eq!(
            scheduled,
            vec![Deferred::new(0, DeferredAction::ResolveMatch(0, 1))]
        );
        assert_eq!(scheduled[0].delay, MATCH_DELAY);
        assert!(session.run_deferred(scheduled[0]));

        let state = session.state();
        assert_eq!(state.matched_pairs, 1);
        assert_eq!(state.streak, 1);
        assert_eq!(state.max_streak, 1);
        assert!(state.flipped_selection.is_empty());
        assert!(!state.is_checking);
        assert!(session.card(0).unwrap().is_matched);
        assert!(session.card(1).unwrap().is_matched);
        assert_eq!(matched_count(&session), 2);
        assert_eq!(session.phase(), Phase::AwaitingFirstFlip);
        assert_eq!(session.take_cues(), [Cue::Flip, Cue::Flip, Cue::Match]);
    }

    #[test]
    fn third_flip_while_checking_is_ignored() {
        let mut session = session(Difficulty::Easy);
        session.flip_card(0);
        session.flip_card(2);

        assert_eq!(session.flip_card(4), FlipOutcome::NoChange);
        assert!(!session.card(4).unwrap().is_flipped);
        assert_eq!(session.state().flipped_selection.len(), 2);
        assert_eq!(session.state().moves, 1);
    }

    #[test]
    fn mismatch_flips_both_back_and_breaks_streak() {
        let mut session = session(Difficulty::Easy);
        match_pair(&mut session, 0);

        assert_eq!(session.flip_card(2), FlipOutcome::Flipped);
        assert_eq!(session.flip_card(4), FlipOutcome::Mismatched);
        let scheduled = session.take_scheduled();
        assert_eq!(scheduled[0].delay, MISMATCH_DELAY);
        assert!(session.run_deferred(scheduled[0]));

        let state = session.state();
        assert_eq!(state.streak, 0);
        assert_eq!(state.max_streak, 1);
        assert_eq!(state.moves, 2);
        assert!(!state.is_checking);
        assert!(session.card(2).unwrap().is_selectable());
        assert!(session.card(4).unwrap().is_selectable());
        assert_eq!(session.flip_card(2), FlipOutcome::Flipped);
    }

    #[test]
    fn matched_and_unknown_cards_are_never_flippable() {
        let mut session = session(Difficulty::Easy);
        match_pair(&mut session, 0);

        assert_eq!(session.flip_card(0), FlipOutcome::NoChange);
        assert_eq!(session.flip_card(1), FlipOutcome::NoChange);
        assert_eq!(session.flip_card(999), FlipOutcome::NoChange);
        session.flip_card(2);
        assert_eq!(session.flip_card(2), FlipOutcome::NoChange);
        assert_eq!(session.state().moves, 1);
    }

    #[test]
    fn repeated_resolution_is_ignored() {
        let mut session = session(Difficulty::Easy);
        session.flip_card(0);
        session.flip_card(1);
        let deferred = session.take_scheduled()[0];

        assert!(session.run_deferred(deferred));
        assert!(!session.run_deferred(deferred));
        assert_eq!(session.state().matched_pairs, 1);
        assert_eq!(session.state().streak, 1);
    }

    #[test]
    fn timer_starts_with_first_match() {
        let mut session = session(Difficulty::Easy);
        assert!(!session.tick());
        session.flip_card(0);
        assert!(!session.tick());

        session.flip_card(1);
        run_all(&mut session);
        assert!(session.tick());
        assert!(session.tick());
        assert_eq!(session.state().elapsed_secs, 2);
    }

    #[test]
    fn pause_freezes_input_timer_and_hints() {
        let mut session = session(Difficulty::Easy);
        match_pair(&mut session, 0);
        session.tick();

        assert!(session.toggle_pause());
        assert!(!session.is_timer_running());
        assert!(!session.tick());
        assert_eq!(session.flip_card(2), FlipOutcome::NoChange);
        assert!(!session.use_hint());
        assert_eq!(session.state().elapsed_secs, 1);

        assert!(session.toggle_pause());
        assert!(session.tick());
        assert_eq!(session.state().elapsed_secs, 2);
        assert_eq!(session.flip_card(2), FlipOutcome::Flipped);
    }

    #[test]
    fn resolution_still_lands_while_paused() {
        let mut session = session(Difficulty::Easy);
        session.flip_card(0);
        session.flip_card(1);
        session.toggle_pause();
        run_all(&mut session);

        assert_eq!(session.state().matched_pairs, 1);
        assert!(session.state().is_paused);
        assert!(!session.is_timer_running());
    }

    #[test]
    fn hint_reveals_then_hides_all_but_selection() {
        let mut session = session(Difficulty::Easy);
        match_pair(&mut session, 0);
        session.flip_card(2);
        session.take_cues();

        assert!(session.use_hint());
        assert!(session.cards().iter().all(|card| card.is_face_up()));
        assert_eq!(session.state().hints_remaining, 2);
        assert_eq!(session.state().hints_used, 1);
        assert_eq!(session.take_cues(), [Cue::Hint]);

        let scheduled = session.take_scheduled();
        assert_eq!(scheduled[0].action, DeferredAction::EndHint);
        assert_eq!(scheduled[0].delay, HINT_DURATION);
        assert!(session.run_deferred(scheduled[0]));

        for card in session.cards() {
            let should_show = card.is_matched || card.id == 2;
            assert_eq!(card.is_face_up(), should_show, "card {}", card.id);
        }
        assert_eq!(session.phase(), Phase::AwaitingSecondFlip);
    }

    #[test]
    fn hints_run_out() {
        let mut session = session(Difficulty::Easy);
        for _ in 0..HINTS_PER_SESSION {
            assert!(session.use_hint());
            run_all(&mut session);
        }
        assert!(!session.use_hint());
        assert_eq!(session.state().hints_remaining, 0);
        assert_eq!(session.state().hints_used, HINTS_PER_SESSION);
    }

    #[test]
    fn win_is_recorded_exactly_once() {
        let mut session = session(Difficulty::Easy);
        win(&mut session);

        assert_eq!(session.phase(), Phase::Won);
        assert!(session.state().is_won);
        assert_eq!(matched_count(&session), 12);
        // 10000 - 6 * 50 + 6 * 100 + 2000 perfect + 1500 fast
        assert_eq!(session.state().score, 13_800);

        let summary = *session.win_summary().unwrap();
        assert_eq!(summary.rating, Rating::Legendary);
        assert_eq!(summary.stars, 5);
        assert!(summary.perfect);
        assert!(summary.new_best);
        assert_eq!(summary.leaderboard_rank, Some(1));
        assert!(session.is_celebrating());
        assert_eq!(session.take_cues().last(), Some(&Cue::Win));

        // nothing can move the session once won
        assert!(!session.tick());
        assert!(!session.toggle_pause());
        assert!(!session.use_hint());
        assert_eq!(session.flip_card(0), FlipOutcome::NoChange);

        let scheduled = session.take_scheduled();
        assert_eq!(scheduled, vec![Deferred::new(0, DeferredAction::EndCelebration)]);
        assert!(session.run_deferred(scheduled[0]));
        assert!(!session.is_celebrating());

        assert_eq!(session.leaderboard().len(), 1);
        let statistics = session.statistics();
        assert_eq!(statistics.total_wins, 1);
        assert_eq!(statistics.total_games, 1);
        assert_eq!(statistics.perfect_games, 1);
        assert_eq!(statistics.best_score, 13_800);

        let best = BestScoreRecord::load(session.store(), Difficulty::Easy, GameMode::Classic);
        assert_eq!(best.map(|record| record.score), Some(13_800));
    }

    #[test]
    fn lower_score_keeps_previous_best() {
        let mut session = session(Difficulty::Easy);
        win(&mut session);
        session.reset_session(None, None);
        assert_eq!(session.best_score().map(|record| record.score), Some(13_800));

        // one wasted move: 2 extra flips and no perfect bonus
        session.flip_card(0);
        session.flip_card(2);
        run_all(&mut session);
        win(&mut session);

        let summary = session.win_summary().unwrap();
        assert!(!summary.new_best);
        assert_eq!(summary.leaderboard_rank, Some(2));
        assert_eq!(session.best_score().map(|record| record.score), Some(13_800));
        assert_eq!(session.leaderboard().len(), 2);
        assert_eq!(session.statistics().total_wins, 2);
    }

    #[test]
    fn reset_drops_stale_deferred_effects() {
        let mut session = session(Difficulty::Easy);
        session.flip_card(0);
        session.flip_card(1);
        let stale = session.take_scheduled();

        session.reset_session(None, None);
        assert_eq!(session.generation(), 1);
        assert!(!session.run_deferred(stale[0]));
        assert_eq!(session.state().matched_pairs, 0);
        assert!(session.cards().iter().all(|card| card.is_selectable()));
    }

    #[test]
    fn stale_resolution_cannot_touch_new_selection() {
        let mut session = session(Difficulty::Easy);
        session.flip_card(0);
        session.flip_card(1);
        let stale = session.take_scheduled();

        session.reset_session(None, None);
        session.flip_card(0);
        session.flip_card(1);
        assert!(!session.run_deferred(stale[0]));
        assert!(session.state().is_checking);
        assert_eq!(session.state().matched_pairs, 0);
    }

    #[test]
    fn reset_can_change_difficulty_and_mode() {
        let mut session = session(Difficulty::Easy);
        session.reset_session(Some(Difficulty::Hard), Some(GameMode::Timed));

        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert_eq!(session.mode(), GameMode::Timed);
        assert_eq!(session.cards().len(), 24);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn custom_catalog_supplies_the_faces() {
        const LETTERS: [&str; 12] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"];
        let catalog = Catalog::new(&LETTERS).unwrap();
        let config = SessionConfig::new(Difficulty::Easy, GameMode::Classic)
            .with_seed(5)
            .with_catalog(catalog);
        let mut session = MatchSession::new(MemoryStore::new(), config);

        let faces = |session: &MatchSession<MemoryStore>| {
            let mut faces: Vec<_> = session.cards().iter().map(|card| card.value).collect();
            faces.sort_unstable();
            faces
        };
        assert_eq!(faces(&session), ["A", "A", "B", "B", "C", "C", "D", "D", "E", "E", "F", "F"]);

        session.reset_session(Some(Difficulty::Hard), None);
        assert_eq!(faces(&session).len(), 24);
        assert!(faces(&session).iter().all(|face| LETTERS.contains(face)));
    }

    #[test]
    fn unfinished_game_leaves_records_untouched() {
        let mut session = session(Difficulty::Easy);
        match_pair(&mut session, 0);
        session.flip_card(2);
        session.flip_card(4);
        run_all(&mut session);
        session.tick();
        session.reset_session(None, None);

        assert!(session.store().is_empty());
        assert_eq!(session.statistics(), Statistics::default());
        assert_eq!(session.statistics().win_rate(), 0.0);
    }

    #[test]
    fn hint_cannot_stack_on_a_showing_hint() {
        let mut session = session(Difficulty::Easy);
        assert!(session.use_hint());
        assert!(session.state().is_hint_showing);
        assert!(!session.use_hint());
        assert_eq!(session.state().hints_remaining, HINTS_PER_SESSION - 1);
        assert_eq!(session.take_scheduled().len(), 1);

        assert!(session.run_deferred(Deferred::new(0, DeferredAction::EndHint)));
        assert!(!session.state().is_hint_showing);
        assert!(session.use_hint());
    }

    #[test]
    fn malformed_best_score_is_ignored() {
        let mut store = MemoryStore::new();
        store.set("bestScore_easy_classic", "{\"score\":\"lots\"}".into());
        let mut session = MatchSession::new(
            store,
            SessionConfig::new(Difficulty::Easy, GameMode::Classic),
        );
        assert!(session.best_score().is_none());

        win(&mut session);
        assert!(session.win_summary().unwrap().new_best);
    }

    #[test]
    fn records_use_player_name_and_clock() {
        fn fixed_clock() -> DateTime<Utc> {
            DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap()
        }

        let mut session = MatchSession::new(
            MemoryStore::new(),
            SessionConfig::new(Difficulty::Easy, GameMode::LimitedMoves).with_clock(fixed_clock),
        );
        session.set_player_name("  Ana ");
        win(&mut session);

        let best = session.best_score().unwrap();
        assert_eq!(best.player_name, "Ana");
        assert_eq!(best.date, fixed_clock());
        assert_eq!(best.mode, GameMode::LimitedMoves);
        // 13800 * 1.3
        assert_eq!(best.score, 17_940);

        session.set_player_name("   ");
        assert_eq!(session.player_name(), DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn difficulty_setting_redeals() {
        let mut session = session(Difficulty::Easy);
        let mut settings = Settings {
            difficulty: Difficulty::Easy,
            ..Settings::default()
        };
        session.flip_card(0);

        assert!(session.change_setting(&mut settings, SettingChange::Difficulty(Difficulty::Hard)));
        assert_eq!(session.cards().len(), 24);
        assert_eq!(session.generation(), 1);
        assert_eq!(Settings::load(session.store()).difficulty, Difficulty::Hard);

        assert!(session.change_setting(&mut settings, SettingChange::SoundEnabled(false)));
        assert_eq!(session.generation(), 1);
        assert!(!session.change_setting(&mut settings, SettingChange::SoundEnabled(false)));
    }
}
