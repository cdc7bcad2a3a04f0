use crate::api::{CachedEmployeeClient, EmployeeGateway, HttpClient};
use crate::cache::{MemoryStorage, NoopStorage, QueryClient};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::mutation::Notification;
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::EmployeesView;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How long a notification stays in the footer
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

const TICK_RATE: Duration = Duration::from_millis(100);

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Command palette (after pressing :)
  command_input: CommandInput,

  /// Latest notification and when it was raised
  notification: Option<(Notification, Instant)>,

  config: Config,

  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let client = build_client(&config)?;
    let root = EmployeesView::new(client, config.table.page_size);
    Ok(Self::with_root(config, Box::new(root)))
  }

  pub fn with_root(config: Config, root: Box<dyn View>) -> Self {
    Self {
      view_stack: vec![root],
      command_input: CommandInput::new(),
      notification: None,
      config,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let result = self.event_loop().await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
  }

  async fn event_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  pub fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => self.tick(),
      Event::Resize => {}
    }
  }

  fn tick(&mut self) {
    if let Some(view) = self.view_stack.last_mut() {
      view.tick();
      if let Some(notification) = view.take_notification() {
        info!(message = %notification.message, "Notification");
        self.notification = Some((notification, Instant::now()));
      }
    }

    if self
      .notification
      .as_ref()
      .is_some_and(|(_, raised)| raised.elapsed() >= NOTIFICATION_TTL)
    {
      self.notification = None;
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let capturing = self
      .view_stack
      .last()
      .is_some_and(|view| view.is_capturing_input());
    if !capturing || self.command_input.is_active() {
      match self.command_input.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(command)) => {
          self.execute_command(&command);
          return;
        }
        KeyResult::NotHandled => {}
        _ => return,
      }
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::Pop,
    };
    if action == ViewAction::Pop {
      self.view_stack.pop();
      if self.view_stack.is_empty() {
        self.should_quit = true;
      }
    }
  }

  fn execute_command(&mut self, command: &str) {
    if command == "quit" {
      self.should_quit = true;
      return;
    }
    let handled = self
      .view_stack
      .last_mut()
      .is_some_and(|view| view.handle_command(command));
    if !handled {
      warn!(command, "Unknown command");
      self.notification = Some((
        Notification::error(format!("Unknown command: {}", command)),
        Instant::now(),
      ));
    }
  }

  // Accessors for UI rendering

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command_input
  }

  pub fn notification(&self) -> Option<&Notification> {
    self.notification.as_ref().map(|(n, _)| n)
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}

/// Wire the HTTP client, gateway and cache from configuration
pub fn build_client(config: &Config) -> Result<CachedEmployeeClient> {
  let gateway = EmployeeGateway::new(HttpClient::new()?, &config.api.base_url)?;
  let cache = if config.cache.enabled {
    QueryClient::new(MemoryStorage::new())
  } else {
    QueryClient::new(NoopStorage)
  };
  let stale_time = chrono::Duration::from_std(config.cache.stale_time())
    .wrap_err("cache.stale_time_secs is out of range")?;
  let cache = cache.with_stale_time(stale_time);
  info!(base_url = %config.api.base_url, cache = config.cache.enabled, "API client ready");
  Ok(CachedEmployeeClient::new(gateway, cache))
}
