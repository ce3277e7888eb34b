use parejas_core::{
    Difficulty, GameMode, Leaderboard, SettingChange, Settings, Statistics, Theme, WinSummary,
    format_time,
};
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::utils::*;

/// Entries shown by the leaderboard overlay.
pub(crate) const LEADERBOARD_SHOWN: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Overlay {
    Settings,
    Leaderboard,
    Statistics,
}

#[derive(Properties, PartialEq)]
struct DialogProps {
    title: AttrValue,
    on_close: Callback<()>,
    #[prop_or_default]
    children: Html,
}

#[function_component]
fn Dialog(props: &DialogProps) -> Html {
    let on_close = props.on_close.reform(|_: MouseEvent| ());
    html! {
        <Modal>
            <dialog class="overlay" open={true}>
                <article>
                    <header>
                        <h2>{props.title.clone()}</h2>
                        <button class="close" onclick={on_close}>{"✕"}</button>
                    </header>
                    {props.children.clone()}
                </article>
            </dialog>
        </Modal>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    pub settings: Settings,
    pub on_change: Callback<SettingChange>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let settings = props.settings;
    let option = |label: String, selected: bool, change: SettingChange| {
        let onclick = props.on_change.reform(move |_: MouseEvent| change);
        html! {
            <button class={classes!(selected.then_some("selected"))} {onclick}>{label}</button>
        }
    };

    html! {
        <Dialog title="Settings" on_close={props.on_close.clone()}>
            <section>
                <h3>{"Difficulty"}</h3>
                {
                    for Difficulty::ALL.into_iter().map(|difficulty| option(
                        format!("{} ({} pairs)", difficulty, difficulty.pair_count()),
                        settings.difficulty == difficulty,
                        SettingChange::Difficulty(difficulty),
                    ))
                }
            </section>
            <section>
                <h3>{"Game Mode"}</h3>
                {
                    for GameMode::ALL.into_iter().map(|mode| option(
                        mode.to_string(),
                        settings.mode == mode,
                        SettingChange::Mode(mode),
                    ))
                }
            </section>
            <section>
                <h3>{"Theme"}</h3>
                {
                    for Theme::ALL.into_iter().map(|theme| option(
                        theme.display_name().to_string(),
                        settings.theme == theme,
                        SettingChange::Theme(theme),
                    ))
                }
            </section>
            <section>
                <h3>{"Sound Effects"}</h3>
                {
                    option(
                        if settings.sound_enabled { "🔊 ON" } else { "🔇 OFF" }.to_string(),
                        settings.sound_enabled,
                        SettingChange::SoundEnabled(!settings.sound_enabled),
                    )
                }
            </section>
        </Dialog>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct LeaderboardProps {
    pub leaderboard: Leaderboard,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn LeaderboardView(props: &LeaderboardProps) -> Html {
    let entries = props.leaderboard.top(LEADERBOARD_SHOWN);
    let body = if entries.is_empty() {
        html! { <p>{"No games won yet."}</p> }
    } else {
        html! {
            <table>
                <tr>
                    <th>{"#"}</th>
                    <th>{"Player"}</th>
                    <th>{"Score"}</th>
                    <th>{"Moves"}</th>
                    <th>{"Time"}</th>
                    <th>{"Level"}</th>
                </tr>
                {
                    for entries.iter().map(|entry| html! {
                        <tr>
                            <td>{entry.rank}</td>
                            <td>{entry.player_name.clone()}</td>
                            <td>{entry.score}</td>
                            <td>{entry.moves}</td>
                            <td>{format_time(entry.time)}</td>
                            <td>{format!("{} / {}", entry.difficulty, entry.mode)}</td>
                        </tr>
                    })
                }
            </table>
        }
    };

    html! {
        <Dialog title="Leaderboard" on_close={props.on_close.clone()}>
            {body}
        </Dialog>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct StatisticsProps {
    pub statistics: Statistics,
    pub on_close: Callback<()>,
}

fn statistic_rows(stats: &Statistics) -> [(&'static str, &'static str, String); 11] {
    [
        ("🎮", "Total Games", stats.total_games.to_string()),
        ("🏆", "Games Won", stats.total_wins.to_string()),
        ("📊", "Win Rate", format!("{:.1}%", stats.win_rate())),
        ("⭐", "Best Score", stats.best_score.to_string()),
        ("💯", "Avg Score", format!("{:.0}", stats.average_score)),
        ("🎯", "Perfect Games", stats.perfect_games.to_string()),
        ("👆", "Total Moves", stats.total_moves.to_string()),
        ("📈", "Avg Moves/Game", format!("{:.1}", stats.average_moves())),
        ("⏱️", "Total Time", format_time(stats.total_time)),
        ("⏰", "Avg Time/Game", format_time(stats.average_time())),
        ("💡", "Hints Used", stats.hints_used.to_string()),
    ]
}

#[function_component]
pub(crate) fn StatisticsView(props: &StatisticsProps) -> Html {
    html! {
        <Dialog title="Statistics" on_close={props.on_close.clone()}>
            <ul class="statistics">
                {
                    for statistic_rows(&props.statistics).into_iter().map(|(icon, label, value)| html! {
                        <li>
                            <span class="icon">{icon}</span>
                            <strong>{value}</strong>
                            <small>{label}</small>
                        </li>
                    })
                }
            </ul>
        </Dialog>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct WinProps {
    pub summary: WinSummary,
    pub moves: u32,
    pub elapsed_secs: u32,
    pub on_new_game: Callback<()>,
}

#[function_component]
pub(crate) fn WinView(props: &WinProps) -> Html {
    let summary = props.summary;
    let on_new_game = props.on_new_game.reform(|_: MouseEvent| ());

    html! {
        <Modal>
            <dialog class="overlay win" open={true}>
                <article>
                    <h2>{"🎉 You Won!"}</h2>
                    <p class="stars">{stars(summary.stars)}</p>
                    <p class="rating">{summary.rating.label()}</p>
                    <p class="score">{summary.score}</p>
                    <p>{format!("{} moves in {}", props.moves, format_time(props.elapsed_secs))}</p>
                    if summary.perfect {
                        <p class="badge">{"Perfect game!"}</p>
                    }
                    if summary.new_best {
                        <p class="badge">{"New best score!"}</p>
                    }
                    if let Some(rank) = summary.leaderboard_rank {
                        <p>{format!("Leaderboard rank #{}", rank)}</p>
                    }
                    <footer>
                        <button onclick={on_new_game}>{"Play Again"}</button>
                    </footer>
                </article>
            </dialog>
        </Modal>
    }
}
