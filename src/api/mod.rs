//! Remote employee API: HTTP wrapper, typed gateway and cached client.

mod cached_client;
mod employees;
pub mod http;
mod keys;
pub mod types;

pub use cached_client::{
  CachedEmployeeClient, UpdateEmployee, CREATE_MESSAGES, DELETE_MESSAGES, UPDATE_MESSAGES,
};
pub use employees::EmployeeGateway;
pub use http::{HttpClient, RequestConfig};
pub use keys::EmployeeQueryKey;
pub use types::{CreateEmployeeRequest, Department, Employee, Gender, UpdateEmployeeRequest};
