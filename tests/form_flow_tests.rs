//! End-to-end form flows through the employee page, driven by key presses
//! against a wiremock API.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster::api::{CachedEmployeeClient, EmployeeGateway, HttpClient};
use roster::cache::QueryClient;
use roster::mutation::{Notification, NotificationLevel};
use roster::ui::view::View;
use roster::ui::views::EmployeesView;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn press(view: &mut EmployeesView, code: KeyCode) {
  view.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(view: &mut EmployeesView, text: &str) {
  for c in text.chars() {
    press(view, KeyCode::Char(c));
  }
}

/// Fill the add form top to bottom and submit it
fn fill_create_form(view: &mut EmployeesView, registration_number: &str) {
  press(view, KeyCode::Char('a'));
  type_text(view, "Ann");
  press(view, KeyCode::Tab);
  type_text(view, "Lee");
  press(view, KeyCode::Tab);
  type_text(view, registration_number);
  press(view, KeyCode::Tab);
  type_text(view, "ann.lee@example.com");
  press(view, KeyCode::Tab);
  type_text(view, "1990-04-12");
  press(view, KeyCode::Tab);
  press(view, KeyCode::Right);
  press(view, KeyCode::Tab);
  type_text(view, "Engineer");
  press(view, KeyCode::Tab);
  press(view, KeyCode::Right);
  press(view, KeyCode::Enter);
}

async fn page(server: &MockServer) -> EmployeesView {
  let gateway = EmployeeGateway::new(HttpClient::new().unwrap(), &server.uri()).unwrap();
  let client = CachedEmployeeClient::new(gateway, QueryClient::in_memory());
  let mut view = EmployeesView::new(client, 10);
  for _ in 0..300 {
    view.tick();
    if view.has_data() {
      break;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  assert!(view.has_data(), "employee list never loaded");
  view
}

/// Tick until the page raises a notification
async fn next_notification(view: &mut EmployeesView) -> Notification {
  for _ in 0..300 {
    view.tick();
    if let Some(notification) = view.take_notification() {
      return notification;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  panic!("no notification raised");
}

async fn mount_list(server: &MockServer, expected: u64) {
  Mock::given(method("GET"))
    .and(path("/employees"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
    .expect(expected)
    .mount(server)
    .await;
}

#[tokio::test]
async fn test_invalid_registration_number_never_reaches_the_api() {
  let server = MockServer::start().await;
  mount_list(&server, 1).await;
  Mock::given(method("POST"))
    .and(path("/employees"))
    .respond_with(ResponseTemplate::new(201))
    .expect(0)
    .mount(&server)
    .await;

  let mut view = page(&server).await;
  fill_create_form(&mut view, "-5");

  // Still open, showing the error
  assert!(view.is_capturing_input());
  for _ in 0..5 {
    view.tick();
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  assert!(view.take_notification().is_none());
}

#[tokio::test]
async fn test_valid_submit_creates_and_reloads() {
  let server = MockServer::start().await;
  mount_list(&server, 2).await;
  Mock::given(method("POST"))
    .and(path("/employees"))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({
      "id": "51",
      "firstName": "Ann",
      "lastName": "Lee",
      "registrationNumber": 1001,
      "email": "ann.lee@example.com",
      "dateOfBirth": "1990-04-12",
      "gender": "male",
      "jobTitle": "Engineer",
      "department": "IT",
      "createdAt": "2024-01-01T00:00:00.000Z"
    })))
    .expect(1)
    .mount(&server)
    .await;

  let mut view = page(&server).await;
  fill_create_form(&mut view, "1001");

  let notification = next_notification(&mut view).await;
  assert_eq!(notification.level, NotificationLevel::Success);
  assert_eq!(notification.message, "Employee added successfully");
  assert!(!view.is_capturing_input());

  // The invalidated list is fetched again in the background
  for _ in 0..30 {
    view.tick();
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
}

#[tokio::test]
async fn test_failed_delete_keeps_dialog_open() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/employees"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
      "id": "42",
      "firstName": "Ann",
      "lastName": "Lee",
      "registrationNumber": 1001,
      "email": "ann.lee@example.com",
      "dateOfBirth": "1990-04-12",
      "gender": "female",
      "jobTitle": "Engineer",
      "department": "IT",
      "createdAt": "2024-01-01T00:00:00.000Z"
    }])))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("DELETE"))
    .and(path("/employees/42"))
    .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not found"})))
    .expect(1)
    .mount(&server)
    .await;

  let mut view = page(&server).await;
  press(&mut view, KeyCode::Char('d'));
  press(&mut view, KeyCode::Char('y'));

  let notification = next_notification(&mut view).await;
  assert_eq!(notification.level, NotificationLevel::Error);
  assert_eq!(notification.message, "Not found");
  // The dialog is usable again for a retry or cancel
  assert!(view.is_capturing_input());
}

#[tokio::test]
async fn test_reload_goes_to_the_network_within_stale_time() {
  let server = MockServer::start().await;
  mount_list(&server, 3).await;

  let mut view = page(&server).await;
  press(&mut view, KeyCode::Char('r'));
  for _ in 0..300 {
    view.tick();
    if server.received_requests().await.unwrap_or_default().len() >= 2 {
      break;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  assert_eq!(server.received_requests().await.unwrap_or_default().len(), 2);

  // The palette command reloads the same way
  assert!(view.handle_command("employees"));
  for _ in 0..300 {
    view.tick();
    if server.received_requests().await.unwrap_or_default().len() >= 3 {
      break;
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  assert!(view.has_data());
}
