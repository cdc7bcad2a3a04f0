use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Terminal-side events driving the main loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  /// Key press (releases and repeats are dropped)
  Key(KeyEvent),
  /// Terminal resized; a redraw is enough
  Resize,
  /// No input within the tick rate: poll queries and mutations
  Tick,
}

impl Event {
  fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
    match event {
      CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
      CrosstermEvent::Resize(_, _) => Some(Event::Resize),
      _ => None,
    }
  }
}

/// Reads the terminal on a blocking thread and forwards events to the loop
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // crossterm's poll blocks, keep it off the runtime's worker threads
    tokio::task::spawn_blocking(move || loop {
      let next = match event::poll(tick_rate) {
        Ok(true) => match event::read() {
          Ok(evt) => Event::from_crossterm(evt),
          Err(_) => None,
        },
        Ok(false) => Some(Event::Tick),
        Err(_) => break,
      };
      if let Some(next) = next {
        if tx.send(next).is_err() {
          break;
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

  #[test]
  fn test_only_presses_are_forwarded() {
    let press = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
    assert_eq!(
      Event::from_crossterm(CrosstermEvent::Key(press)),
      Some(Event::Key(press))
    );

    let release = KeyEvent {
      code: KeyCode::Char('a'),
      modifiers: KeyModifiers::NONE,
      kind: KeyEventKind::Release,
      state: KeyEventState::NONE,
    };
    assert_eq!(Event::from_crossterm(CrosstermEvent::Key(release)), None);
    assert_eq!(
      Event::from_crossterm(CrosstermEvent::Resize(80, 24)),
      Some(Event::Resize)
    );
  }
}
