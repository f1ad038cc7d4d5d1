use crate::api::ApiClient;
use crate::app::App;
use crate::time_utils;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use super::action_queue::{channel, enqueue_action, Action};
use super::actions::run_action;
use super::views::handle_view_key;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: &ApiClient,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();

    let today = time_utils::today();
    enqueue_action(&action_tx, Action::LoadDay(app.board.select_day(today)));
    enqueue_action(
        &action_tx,
        Action::LoadMonth(app.board.select_month(habitus_core::MonthKey::of(today))),
    );
    enqueue_action(&action_tx, Action::LoadHabits);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.is_loading() {
            app.throbber_state.calc_next();
        }

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_view_key(key, app, &action_tx);
                }
            }
        }

        if let Some(interval) = app.tick(time_utils::now()) {
            enqueue_action(&action_tx, Action::ReportInterval(interval));
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, client, &action_tx);
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
