use std::error::Error;

use services::{QuizSession, SessionAction, SessionSnapshot, Stage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use ui::vm::option_index;
use ui::{Screen, render_timer_notice};

/// A parsed line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Action(SessionAction),
    /// Retry whatever failed: the load or the submission.
    Retry,
    Help,
    Quit,
    Empty,
    Unknown,
}

#[must_use]
pub fn parse_input(line: &str) -> Input {
    let word = line.trim().to_ascii_lowercase();
    match word.as_str() {
        "" => Input::Empty,
        "start" | "begin" => Input::Action(SessionAction::Start),
        "n" | "next" => Input::Action(SessionAction::Next),
        "p" | "prev" | "previous" => Input::Action(SessionAction::Previous),
        "submit" => Input::Action(SessionAction::Submit),
        "resume" => Input::Action(SessionAction::Resume),
        "restart" | "again" => Input::Action(SessionAction::Restart),
        "retry" => Input::Retry,
        "help" | "?" => Input::Help,
        "q" | "quit" | "exit" => Input::Quit,
        other => parse_choice(other).map_or(Input::Unknown, |index| {
            Input::Action(SessionAction::SelectAnswer(index))
        }),
    }
}

fn parse_choice(word: &str) -> Option<usize> {
    let mut chars = word.chars();
    let (Some(ch), None) = (chars.next(), chars.next()) else {
        return None;
    };
    match ch {
        '1'..='9' => ch.to_digit(10).map(|digit| digit as usize - 1),
        _ => option_index(ch),
    }
}

/// Map `retry` onto the action that recovers the failed stage.
fn retry_action(snapshot: &SessionSnapshot) -> Option<SessionAction> {
    match snapshot.failed_stage()? {
        Stage::Load => Some(SessionAction::Load),
        Stage::Submit => Some(SessionAction::Submit),
    }
}

const HELP: &str = "\
Commands:
  start              begin the quiz
  a-z or 1-9         choose an answer for the current question
  n, next            next question
  p, prev            previous question
  submit             submit your answers
  resume             go back to answering after a failed submission
  retry              retry a failed load or submission
  restart            take the quiz again
  quit               leave";

/// Snapshot fields that change what the current screen looks like, ignoring
/// the ticking clock.
fn screen_key(snapshot: &SessionSnapshot) -> SessionSnapshot {
    let mut key = snapshot.clone();
    key.time_left_secs = 0;
    key
}

struct Presenter {
    shown: Option<SessionSnapshot>,
}

impl Presenter {
    fn present(&mut self, snapshot: &SessionSnapshot) {
        let key = screen_key(snapshot);
        if self.shown.as_ref() == Some(&key) {
            if let Some(notice) = render_timer_notice(snapshot) {
                println!("{notice}");
            }
            return;
        }
        println!("\n{}", Screen::from_snapshot(snapshot).render());
        self.shown = Some(key);
    }
}

/// Drive `session` from stdin until the user quits or input ends.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the session stops unexpectedly.
pub async fn run_console(session: QuizSession) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = session.subscribe();
    let mut presenter = Presenter { shown: None };
    presenter.present(&updates.borrow_and_update().clone());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                presenter.present(&snapshot);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = parse_input(&line);
                debug!(?input, "console input");
                let action = match input {
                    Input::Quit => break,
                    Input::Empty => continue,
                    Input::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    Input::Unknown => {
                        println!("Unknown command. Type `help` for the list.");
                        continue;
                    }
                    Input::Retry => match retry_action(&session.snapshot()) {
                        Some(action) => action,
                        None => {
                            println!("Nothing to retry.");
                            continue;
                        }
                    },
                    Input::Action(action) => action,
                };

                let outcome = session.dispatch(action).await?;
                if !outcome.applied {
                    println!("That is not available right now.");
                }
            }
        }
    }

    session.shutdown();
    Ok(())
}
