use crate::overlays::*;
use crate::storage::LocalStore;
use crate::utils::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use parejas_core as game;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Msg {
    Flip(game::CardId),
    RunDeferred(game::Deferred),
    Tick,
    NewGame,
    TogglePause,
    UseHint,
    ChangeSetting(game::SettingChange),
    OpenOverlay(Overlay),
    CloseOverlay,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    card: game::Card,
    locked: bool,
    callback: Callback<game::CardId>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        card,
        locked,
        callback,
    } = props.clone();

    let class = classes!(
        "card",
        card.is_face_up().then_some("flipped"),
        card.is_matched.then_some("matched"),
        locked.then_some("locked"),
    );
    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", card.id);
        callback.emit(card.id);
    });

    html! {
        <button {class} {onclick} disabled={locked || !card.is_selectable()}>
            <span class="back">{"?"}</span>
            <span class="front">{card.value}</span>
        </button>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Name written into the leaderboard
    #[arg(short, long)]
    player: Option<String>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    session: game::MatchSession<LocalStore>,
    settings: game::Settings,
    overlay: Option<Overlay>,
    _tick_interval: Interval,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        let period = game::TICK_PERIOD.as_millis() as u32;
        Interval::new(period, move || link.send_message(Msg::Tick))
    }

    /// Hands every newly queued effect to a browser timer. Timers are never
    /// cancelled, the session drops the ones from an older generation.
    fn schedule_deferred(&mut self, ctx: &Context<Self>) {
        for deferred in self.session.take_scheduled() {
            let link = ctx.link().clone();
            let delay = deferred.delay.as_millis() as u32;
            log::trace!("scheduling {:?} in {}ms", deferred.action, delay);
            Timeout::new(delay, move || link.send_message(Msg::RunDeferred(deferred))).forget();
        }
    }

    fn play_cues(&mut self) {
        let cues = self.session.take_cues();
        if self.settings.sound_enabled {
            for cue in cues {
                log::debug!("cue: {:?}", cue);
            }
        }
    }

    fn state_class(&self) -> Classes {
        use game::Phase::*;
        let state = self.session.state();
        classes!(
            match self.session.phase() {
                Ready => "not-started",
                AwaitingFirstFlip | AwaitingSecondFlip => "in-progress",
                Resolving => "checking",
                Won => "win",
            },
            state.is_paused.then_some("paused"),
            self.session.is_celebrating().then_some("celebrating"),
        )
    }

    fn view_status(&self) -> Html {
        let state = self.session.state();
        let best = self
            .session
            .best_score()
            .map_or_else(|| "-".to_string(), |record| record.score.to_string());

        html! {
            <nav class="status">
                <aside>{format!("Moves: {}", state.moves)}</aside>
                <aside>{format!("Time: {}", game::format_time(state.elapsed_secs))}</aside>
                <aside>{format!("Pairs: {}/{}", state.matched_pairs, self.session.pair_count())}</aside>
                <aside>{format!("Streak: {}", state.streak)}</aside>
                <aside>{format!("Best: {}", best)}</aside>
            </nav>
        }
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let state = self.session.state();
        let locked = state.is_checking || state.is_paused || state.is_won;
        let columns = self.session.difficulty().column_count();
        let style = format!("grid-template-columns: repeat({}, 1fr)", columns);
        let callback = ctx.link().callback(Msg::Flip);

        html! {
            <main class="board" {style}>
                {
                    for state.cards.iter().map(|&card| html! {
                        <CardView key={card.id} {card} {locked} callback={callback.clone()}/>
                    })
                }
            </main>
        }
    }

    fn view_overlay(&self, ctx: &Context<Self>) -> Html {
        let on_close = ctx.link().callback(|_| Msg::CloseOverlay);
        match self.overlay {
            None => html! {},
            Some(Overlay::Settings) => html! {
                <SettingsView
                    settings={self.settings}
                    on_change={ctx.link().callback(Msg::ChangeSetting)}
                    {on_close}
                />
            },
            Some(Overlay::Leaderboard) => html! {
                <LeaderboardView leaderboard={self.session.leaderboard()} {on_close}/>
            },
            Some(Overlay::Statistics) => html! {
                <StatisticsView statistics={self.session.statistics()} {on_close}/>
            },
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let settings = game::Settings::load(&LocalStore);
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        let config = game::SessionConfig::new(settings.difficulty, settings.mode)
            .with_seed(seed)
            .with_clock(utc_now);
        let mut session = game::MatchSession::new(LocalStore, config);
        if let Some(player) = &props.player {
            session.set_player_name(player);
        }

        Self {
            session,
            settings,
            overlay: None,
            _tick_interval: GameView::create_timer(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Flip(id) => self.session.flip_card(id).has_update(),
            RunDeferred(deferred) => self.session.run_deferred(deferred),
            Tick => self.session.tick(),
            NewGame => {
                self.session.reset_session(None, None);
                true
            }
            TogglePause => self.session.toggle_pause(),
            UseHint => self.session.use_hint(),
            ChangeSetting(change) => {
                let changed = self.session.change_setting(&mut self.settings, change);
                if changed {
                    if let game::SettingChange::Theme(theme) = change {
                        crate::theme::apply(theme);
                    }
                }
                changed
            }
            OpenOverlay(overlay) => self.overlay.replace(overlay) != Some(overlay),
            CloseOverlay => self.overlay.take().is_some(),
        };

        self.schedule_deferred(ctx);
        self.play_cues();
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let state = self.session.state();
        let cb_new_game = ctx.link().callback(|_| NewGame);
        let cb_play_again = ctx.link().callback(|()| NewGame);
        let cb_pause = ctx.link().callback(|_| TogglePause);
        let cb_hint = ctx.link().callback(|_| UseHint);
        let cb_settings = ctx.link().callback(|_| OpenOverlay(Overlay::Settings));
        let cb_leaderboard = ctx.link().callback(|_| OpenOverlay(Overlay::Leaderboard));
        let cb_statistics = ctx.link().callback(|_| OpenOverlay(Overlay::Statistics));

        html! {
            <div class={classes!("parejas", self.state_class())}>
                <header>
                    <h1>{"Memory Match"}</h1>
                    <small>{format!("{} · {}", self.session.difficulty(), self.session.mode())}</small>
                </header>
                {self.view_status()}
                <menu>
                    <button onclick={cb_new_game}>{"New Game"}</button>
                    <button onclick={cb_pause} disabled={state.is_won}>
                        {if state.is_paused { "Resume" } else { "Pause" }}
                    </button>
                    <button onclick={cb_hint} disabled={state.hints_remaining == 0 || state.is_hint_showing || state.is_paused || state.is_won}>
                        {format!("Hint ({})", state.hints_remaining)}
                    </button>
                    <button onclick={cb_settings}>{"Settings"}</button>
                    <button onclick={cb_leaderboard}>{"Leaderboard"}</button>
                    <button onclick={cb_statistics}>{"Statistics"}</button>
                </menu>
                {self.view_board(ctx)}
                if let Some(summary) = self.session.win_summary() {
                    <WinView
                        summary={*summary}
                        moves={state.moves}
                        elapsed_secs={state.elapsed_secs}
                        on_new_game={cb_play_again}
                    />
                }
                {self.view_overlay(ctx)}
            </div>
        }
    }
}
