//! Record CRUD for a single collection

mod params;
mod types;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::PocketBase;

pub use params::Params;
pub use types::{ListResult, Record};

use params::{FIELDS, FILTER, PAGE, PER_PAGE, SKIP_TOTAL};
use types::RecordId;

/// Identifies a collection and its records endpoint. Memoized per name by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionHandle {
    id_or_name: String,
    base_path: String,
}

impl CollectionHandle {
    pub(crate) fn new(id_or_name: &str) -> Self {
        Self {
            id_or_name: id_or_name.to_string(),
            base_path: format!(
                "/api/collections/{}/records",
                urlencoding::encode(id_or_name)
            ),
        }
    }

    pub fn id_or_name(&self) -> &str {
        &self.id_or_name
    }

    /// `/api/collections/{name}/records`
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    fn record_path(&self, id: &str) -> String {
        format!("{}/{}", self.base_path, urlencoding::encode(id))
    }
}

/// Record operations on one collection, borrowed from a [`PocketBase`] client
#[derive(Clone)]
pub struct Collection<'a> {
    client: &'a PocketBase,
    handle: Arc<CollectionHandle>,
}

impl<'a> Collection<'a> {
    pub(crate) fn new(client: &'a PocketBase, handle: Arc<CollectionHandle>) -> Self {
        Self { client, handle }
    }

    pub fn handle(&self) -> &Arc<CollectionHandle> {
        &self.handle
    }

    /// Fetch one record by id
    pub async fn get(&self, id: &str, params: Option<&Params>) -> Result<Record> {
        self.client
            .send(&self.handle.record_path(id), Method::GET, params, None)
            .await
    }

    /// Fetch one record by id and deserialize it
    pub async fn get_as<T: DeserializeOwned>(&self, id: &str, params: Option<&Params>) -> Result<T> {
        let record = self.get(id, params).await?;
        Ok(serde_json::from_value(record)?)
    }

    /// First record matching `params`, or `None` when nothing matches
    pub async fn get_one(&self, params: &Params) -> Result<Option<Record>> {
        let mut params = params.clone();
        params.insert(PAGE, 1);
        params.insert(PER_PAGE, 1);
        params.insert(SKIP_TOTAL, true);

        let list = self.list(&params).await?;
        Ok(list.items.into_iter().next())
    }

    /// One page of records. `skipTotal` defaults to `true` unless set by the caller.
    pub async fn list(&self, params: &Params) -> Result<ListResult> {
        let value = self.list_raw(params).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Like [`Collection::list`], returning the envelope exactly as the server sent it
    pub async fn list_raw(&self, params: &Params) -> Result<Value> {
        let mut params = params.clone();
        if !params.contains(SKIP_TOTAL) {
            params.insert(SKIP_TOTAL, true);
        }

        self.client
            .send(self.handle.base_path(), Method::GET, Some(&params), None)
            .await
    }

    /// Only the `items` of [`Collection::list`]
    pub async fn list_items(&self, params: &Params) -> Result<Vec<Record>> {
        Ok(self.list(params).await?.items)
    }

    /// Only the `items` of [`Collection::list`], deserialized
    pub async fn list_items_as<T: DeserializeOwned>(&self, params: &Params) -> Result<Vec<T>> {
        self.list_items(params)
            .await?
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Error::from))
            .collect()
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Record> {
        let body = serde_json::to_value(body)?;
        self.client
            .send(self.handle.base_path(), Method::POST, None, Some(body))
            .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<Record> {
        let body = serde_json::to_value(body)?;
        self.client
            .send(&self.handle.record_path(id), Method::PATCH, None, Some(body))
            .await
    }

    /// Delete a record; the server answers with an empty payload
    pub async fn delete(&self, id: &str) -> Result<Value> {
        self.client
            .send(&self.handle.record_path(id), Method::DELETE, None, None)
            .await
    }

    /// Create, or return `None` if a unique field already holds the value
    pub async fn create_or_ignore<B: Serialize + ?Sized>(&self, body: &B) -> Result<Option<Record>> {
        match self.create(body).await {
            Ok(record) => Ok(Some(record)),
            Err(err) if err.is_validation_not_unique() => {
                log::debug!(
                    "create in {} ignored: unique value already exists",
                    self.handle.id_or_name()
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Update the record matching `unique_filter`, or create it when none matches.
    ///
    /// The lookup and the write are two separate requests; a concurrent writer
    /// can slip in between them.
    pub async fn create_or_update<B: Serialize + ?Sized>(
        &self,
        body: &B,
        unique_filter: &str,
    ) -> Result<Record> {
        let lookup = Params::new().set(FILTER, unique_filter).set(FIELDS, "id");

        match self.get_one(&lookup).await? {
            None => self.create(body).await,
            Some(existing) => {
                let RecordId { id } = serde_json::from_value(existing)?;
                self.update(&id, body).await
            }
        }
    }
}
