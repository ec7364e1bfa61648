use std::{sync::Arc, time::Duration};

use log::{debug, info};

use crate::{
    commands::markdown_response::{
        format_board, format_cancelled, format_lost, format_superseded, format_timeout,
        format_turn_prompt, format_won,
    },
    minesweeper::{Board, Coord, GameError, GameStatus, Mark, render::render_game},
    sessions::SessionStore,
    turns::{EventWaiter, MessageRef, RenderSink, Symbol, WaitError},
};

/// How a turn ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The move was applied and the game goes on
    Continued,
    Won,
    Lost,
    /// The player picked the cancel symbol, nothing changed
    Cancelled,
    /// No input arrived in time, the session was abandoned
    TimedOut,
    /// The game was already over, no input was awaited
    Ended,
    /// The game was replaced or removed during the wait, nothing was applied
    Superseded,
}

/// Runs click turns against the shared [`SessionStore`].
pub struct TurnController<S, W> {
    store: SessionStore,
    sink: Arc<S>,
    waiter: Arc<W>,
    turn_timeout: Duration,
}

impl<S, W> TurnController<S, W>
where
    S: RenderSink,
    W: EventWaiter,
{
    pub fn new(store: SessionStore, sink: Arc<S>, waiter: Arc<W>, turn_timeout: Duration) -> Self {
        TurnController {
            store,
            sink,
            waiter,
            turn_timeout,
        }
    }

    /// Plays one turn on the cell at the 1-based column `x` and row `y`.
    ///
    /// The session owner is the sender of `origin`. Fails without waiting when
    /// the owner has no game or the coordinates are outside the board.
    pub async fn click(&self, origin: &MessageRef, x: i64, y: i64) -> Result<TurnOutcome, GameError> {
        let owner = origin.sender_id.as_str();
        debug!("{} clicked at {},{}", owner, x, y);

        // Touch before waiting so the sweep keeps the session during the wait
        let (id, coord, board, status) = self
            .store
            .with_session(owner, |session| {
                let coord = to_coord(session.engine.board(), x, y)?;
                session.touch();
                Ok::<_, GameError>((
                    session.id,
                    coord,
                    render_game(&session.engine),
                    session.engine.status(),
                ))
            })
            .await??;

        if status.is_finished() {
            self.sink.send(origin, &format_board(&board)).await;
            return Ok(TurnOutcome::Ended);
        }

        self.sink.send(origin, &format_turn_prompt(&board)).await;

        let symbol = match self
            .waiter
            .wait_one(origin, &Symbol::ALL, self.turn_timeout)
            .await
        {
            Ok(symbol) => symbol,
            Err(WaitError::Timeout) => {
                if !self.store.remove_if(owner, id).await {
                    debug!("turn of {} timed out on a replaced game", owner);
                    return Ok(TurnOutcome::Superseded);
                }
                info!("game of {} timed out", owner);
                self.sink.send(origin, &format_timeout()).await;
                return Ok(TurnOutcome::TimedOut);
            }
        };
        debug!("{} picked {:?}", owner, symbol);

        if symbol == Symbol::Cancel {
            self.sink.send(origin, &format_cancelled()).await;
            return Ok(TurnOutcome::Cancelled);
        }

        let applied = self
            .store
            .with_session_if(owner, id, |session| {
                let status = match symbol {
                    Symbol::Reveal => session.engine.reveal(coord),
                    Symbol::Flag => session.engine.set_mark(coord, Mark::Flag),
                    Symbol::Mark => session.engine.set_mark(coord, Mark::Question),
                    Symbol::Clear => session.engine.set_mark(coord, Mark::Clear),
                    Symbol::Cancel => Ok(session.engine.status()),
                }?;
                Ok::<_, GameError>((status, render_game(&session.engine)))
            })
            .await;
        let (status, board) = match applied {
            Ok(applied) => applied?,
            Err(_) => {
                debug!("{} reacted on a replaced game", owner);
                self.sink.send(origin, &format_superseded()).await;
                return Ok(TurnOutcome::Superseded);
            }
        };

        let outcome = match status {
            GameStatus::Won => {
                self.store.remove_if(owner, id).await;
                info!("{} won their game", owner);
                self.sink.send(origin, &format_won(&board)).await;
                TurnOutcome::Won
            }
            GameStatus::Lost => {
                self.store.remove_if(owner, id).await;
                info!("{} lost their game", owner);
                self.sink.send(origin, &format_lost(&board)).await;
                TurnOutcome::Lost
            }
            GameStatus::NotStarted | GameStatus::InProgress => {
                self.sink.send(origin, &format_board(&board)).await;
                TurnOutcome::Continued
            }
        };

        Ok(outcome)
    }
}

/// Converts 1-based `(x, y)` = (column, row) into a board coordinate.
fn to_coord(board: &Board, x: i64, y: i64) -> Result<Coord, GameError> {
    let to_index = |value: i64| usize::try_from(value).ok()?.checked_sub(1);

    match (to_index(y), to_index(x)) {
        (Some(row), Some(col)) if board.contains((row, col)) => Ok((row, col)),
        _ => Err(GameError::OutOfBounds),
    }
}
