//! Employee client with cache coherence.
//!
//! Reads go through the [`QueryClient`] (cache-first, de-duplicated); writes
//! go straight to the gateway and invalidate the affected keys on success.

use tracing::info;

use crate::cache::{QueryClient, QueryKey};
use crate::error::Result;
use crate::mutation::{Mutation, MutationMessages};
use crate::query::Query;

use super::employees::EmployeeGateway;
use super::keys::EmployeeQueryKey;
use super::types::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};

pub const CREATE_MESSAGES: MutationMessages = MutationMessages {
  success: "Employee added successfully",
  failure: "Failed to add employee",
};

pub const UPDATE_MESSAGES: MutationMessages = MutationMessages {
  success: "Employee updated successfully",
  failure: "Failed to update employee",
};

pub const DELETE_MESSAGES: MutationMessages = MutationMessages {
  success: "Employee deleted successfully",
  failure: "Failed to delete employee",
};

/// Variables for the update mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateEmployee {
  pub id: String,
  pub request: UpdateEmployeeRequest,
}

/// Employee client with transparent caching support.
#[derive(Clone)]
pub struct CachedEmployeeClient {
  inner: EmployeeGateway,
  cache: QueryClient,
}

impl CachedEmployeeClient {
  pub fn new(inner: EmployeeGateway, cache: QueryClient) -> Self {
    Self { inner, cache }
  }

  pub fn cache(&self) -> &QueryClient {
    &self.cache
  }

  pub fn gateway(&self) -> &EmployeeGateway {
    &self.inner
  }

  /// The whole collection, cached under the list key.
  pub async fn list(&self) -> Result<Vec<Employee>> {
    let inner = self.inner.clone();
    let result = self
      .cache
      .fetch_query(&EmployeeQueryKey::List, move || async move {
        inner.list().await
      })
      .await?;
    Ok(result.data)
  }

  /// One employee, cached under its own detail key.
  pub async fn get(&self, id: &str) -> Result<Employee> {
    let inner = self.inner.clone();
    let owned_id = id.to_string();
    let key = EmployeeQueryKey::Detail { id: id.to_string() };
    let result = self
      .cache
      .fetch_query(&key, move || async move { inner.get(&owned_id).await })
      .await?;
    Ok(result.data)
  }

  /// Create, then invalidate the list.
  pub async fn create(&self, request: &CreateEmployeeRequest) -> Result<Employee> {
    let created = self.inner.create(request).await?;
    info!(id = %created.id, "Employee created");
    self.cache.invalidate_queries(&EmployeeQueryKey::List);
    Ok(created)
  }

  /// Update the job title, then invalidate the list and the record's detail.
  pub async fn update(&self, id: &str, request: &UpdateEmployeeRequest) -> Result<Employee> {
    let updated = self.inner.update(id, request).await?;
    info!(id, "Employee updated");
    self.cache.invalidate_queries(&EmployeeQueryKey::List);
    self.cache.invalidate_queries(&EmployeeQueryKey::Detail { id: id.to_string() });
    Ok(updated)
  }

  /// Delete, then invalidate the list.
  pub async fn delete(&self, id: &str) -> Result<Employee> {
    let deleted = self.inner.delete(id).await?;
    info!(id, "Employee deleted");
    self.cache.invalidate_queries(&EmployeeQueryKey::List);
    Ok(deleted)
  }

  /// Observable list query; refetches whenever the list is invalidated.
  pub fn list_query(&self) -> Query<Vec<Employee>> {
    let client = self.clone();
    Query::new(move || {
      let client = client.clone();
      async move { client.list().await }
    })
    .watching(self.cache.clone(), EmployeeQueryKey::List.cache_key())
  }

  /// Observable detail query. Only built when there is an id to fetch.
  pub fn detail_query(&self, id: Option<&str>) -> Option<Query<Employee>> {
    let id = id.map(str::trim).filter(|id| !id.is_empty())?.to_string();
    let key = EmployeeQueryKey::Detail { id: id.clone() }.cache_key();
    let client = self.clone();
    let query = Query::new(move || {
      let client = client.clone();
      let id = id.clone();
      async move { client.get(&id).await }
    })
    .watching(self.cache.clone(), key);
    Some(query)
  }

  pub fn create_mutation(&self) -> Mutation<CreateEmployeeRequest, Employee> {
    let client = self.clone();
    Mutation::new(CREATE_MESSAGES, move |request: CreateEmployeeRequest| {
      let client = client.clone();
      async move { client.create(&request).await }
    })
  }

  pub fn update_mutation(&self) -> Mutation<UpdateEmployee, Employee> {
    let client = self.clone();
    Mutation::new(UPDATE_MESSAGES, move |vars: UpdateEmployee| {
      let client = client.clone();
      async move { client.update(&vars.id, &vars.request).await }
    })
  }

  pub fn delete_mutation(&self) -> Mutation<String, Employee> {
    let client = self.clone();
    Mutation::new(DELETE_MESSAGES, move |id: String| {
      let client = client.clone();
      async move { client.delete(&id).await }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::http::HttpClient;

  fn client() -> CachedEmployeeClient {
    let gateway = EmployeeGateway::new(
      HttpClient::with_client(reqwest::Client::new()),
      "http://127.0.0.1:9",
    )
    .expect("valid base url");
    CachedEmployeeClient::new(gateway, QueryClient::in_memory())
  }

  #[test]
  fn test_detail_query_requires_id() {
    let client = client();
    assert!(client.detail_query(None).is_none());
    assert!(client.detail_query(Some("")).is_none());
    assert!(client.detail_query(Some("   ")).is_none());
  }

  #[tokio::test]
  async fn test_detail_query_built_with_id() {
    let client = client();
    let query = client.detail_query(Some("42")).expect("id present");
    assert!(!query.is_fetching());
  }

  #[tokio::test]
  async fn test_list_served_from_seeded_cache() {
    let client = client();
    client
      .cache()
      .set_query_data(&EmployeeQueryKey::List, &Vec::<Employee>::new(), None)
      .expect("serializable");

    // Nothing listens on the gateway's port; a fresh entry means no request
    let employees = client.list().await.expect("served from cache");
    assert!(employees.is_empty());
  }
}
