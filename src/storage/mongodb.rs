//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoBackend`, a [`DocumentBackend`] backed by a
//! `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! posted = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! One collection per entity type. The identifier lives in `_id` as a native
//! `ObjectId`. Date fields (`created` by default) are stored as native BSON
//! dates at millisecond precision; every other field is converted from its
//! JSON form. On read, every BSON date is rendered back as an RFC 3339
//! string.
//!
//! # Error mapping
//!
//! Duplicate-key write errors become validation errors and BSON
//! (de)serialization failures become decode errors. Every other driver
//! failure (I/O, server selection, pool clears, timeouts) is transient.

use crate::core::query::ID_FIELD;
use crate::core::{DocumentBackend, FieldValue, Filter, FindOptions, PostedError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind as DriverErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use serde_json::Value;
use std::time::Duration;

const DUPLICATE_KEY: i32 = 11000;

/// Top-level fields stored as native BSON dates unless configured otherwise
pub const DEFAULT_DATE_FIELDS: &[&str] = &["created"];

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// turning the hex `_id` into a native ObjectId and RFC 3339 strings in
/// `date_fields` into native dates.
fn json_to_document(json: Value, date_fields: &[String]) -> Result<Document> {
    let bson_val =
        mongodb::bson::to_bson(&json).map_err(|e| PostedError::decode("document", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(PostedError::decode("document", "expected a JSON object")),
    };

    match doc.remove(ID_FIELD) {
        Some(Bson::String(hex)) => {
            let oid = ObjectId::parse_str(&hex)
                .map_err(|e| PostedError::validation(ID_FIELD, e.to_string()))?;
            doc.insert(ID_FIELD, oid);
        }
        Some(other) => {
            doc.insert(ID_FIELD, other);
        }
        None => {}
    }

    for field in date_fields {
        let parsed = match doc.get(field) {
            Some(Bson::String(raw)) => mongodb::bson::DateTime::parse_rfc3339_str(raw).ok(),
            _ => None,
        };
        // Strings that are not RFC 3339 are kept as they are
        if let Some(date) = parsed {
            doc.insert(field.as_str(), date);
        }
    }

    Ok(doc)
}

/// Render every BSON date as an RFC 3339 string.
fn dates_to_strings(value: Bson) -> Bson {
    match value {
        Bson::DateTime(date) => match date.try_to_rfc3339_string() {
            Ok(text) => Bson::String(text),
            Err(_) => Bson::DateTime(date),
        },
        Bson::Document(doc) => Bson::Document(
            doc.into_iter()
                .map(|(k, v)| (k, dates_to_strings(v)))
                .collect(),
        ),
        Bson::Array(items) => Bson::Array(items.into_iter().map(dates_to_strings).collect()),
        other => other,
    }
}

/// Convert a BSON Document back into a serde_json::Value,
/// rendering the ObjectId `_id` as its hex string.
fn document_to_json(mut doc: Document) -> Value {
    if let Some(Bson::ObjectId(oid)) = doc.get(ID_FIELD) {
        let hex = oid.to_hex();
        doc.insert(ID_FIELD, hex);
    }

    dates_to_strings(Bson::Document(doc)).into_relaxed_extjson()
}

/// Convert a filter value into the BSON values a stored field may hold.
fn field_bson(value: &FieldValue) -> Vec<Bson> {
    match value {
        FieldValue::String(s) => vec![Bson::String(s.clone())],
        FieldValue::Integer(i) => {
            let mut variants = vec![Bson::Int64(*i)];
            if let Ok(small) = i32::try_from(*i) {
                variants.push(Bson::Int32(small));
            }
            variants
        }
        FieldValue::Boolean(b) => vec![Bson::Boolean(*b)],
        FieldValue::Id(id) => vec![Bson::ObjectId(ObjectId::from_bytes(id.bytes()))],
        FieldValue::Null => vec![Bson::Null],
    }
}

fn filter_to_document(filter: &Filter) -> Document {
    match filter {
        Filter::All => doc! {},
        Filter::Eq { field, value } => {
            let mut variants = match value {
                // Hex ids compare against the stored ObjectId
                FieldValue::String(hex) if field == ID_FIELD => match ObjectId::parse_str(hex) {
                    Ok(oid) => vec![Bson::ObjectId(oid)],
                    Err(_) => field_bson(value),
                },
                _ => field_bson(value),
            };
            if variants.len() == 1 {
                let only = variants.remove(0);
                doc! { field.as_str(): only }
            } else {
                doc! { field.as_str(): { "$in": variants } }
            }
        }
    }
}

fn driver_error(operation: &str, err: mongodb::error::Error) -> PostedError {
    match err.kind.as_ref() {
        DriverErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY => {
            PostedError::validation(ID_FIELD, format!("duplicate identifier: {}", we.message))
        }
        DriverErrorKind::BsonDeserialization(e) => PostedError::decode("document", e),
        DriverErrorKind::BsonSerialization(e) => PostedError::decode("document", e),
        _ => PostedError::transient(operation, err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// MongoBackend
// ---------------------------------------------------------------------------

/// Document backend backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use posted::storage::{MongoBackend, StoreAdapter};
///
/// let backend = MongoBackend::connect("mongodb://localhost:27017", "posted", timeout).await?;
/// let store = StoreAdapter::new(backend).with_timeout(timeout);
/// ```
#[derive(Clone, Debug)]
pub struct MongoBackend {
    database: Database,
    date_fields: Vec<String>,
}

impl MongoBackend {
    /// Create a new `MongoBackend` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            date_fields: DEFAULT_DATE_FIELDS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Replace the set of top-level fields stored as native dates.
    pub fn with_date_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Connect to `uri` and select `database_name`.
    ///
    /// `timeout` bounds server selection and connection establishment so a
    /// missing server fails calls instead of hanging them.
    pub async fn connect(uri: &str, database_name: &str, timeout: Duration) -> Result<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| driver_error("parse connection string", e))?;
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);

        let client =
            Client::with_options(options).map_err(|e| driver_error("create client", e))?;

        tracing::info!(database = database_name, "connected to MongoDB");
        Ok(Self::new(client.database(database_name)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.database.collection(name)
    }
}

#[async_trait]
impl DocumentBackend for MongoBackend {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        let doc = self
            .collection(collection)
            .find_one(filter_to_document(filter))
            .await
            .map_err(|e| driver_error("find_one", e))?;

        Ok(doc.map(document_to_json))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>> {
        let coll = self.collection(collection);
        let mut find = coll.find(filter_to_document(filter));
        if options.newest_first {
            find = find.sort(doc! { ID_FIELD: -1 });
        }
        if let Some(limit) = options.limit {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let cursor = find.await.map_err(|e| driver_error("find_many", e))?;
        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| driver_error("find_many", e))?;

        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn insert_one(&self, collection: &str, document: Value) -> Result<()> {
        let doc = json_to_document(document, &self.date_fields)?;

        self.collection(collection)
            .insert_one(doc)
            .await
            .map_err(|e| driver_error("insert_one", e))?;

        Ok(())
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let result = self
            .collection(collection)
            .delete_one(filter_to_document(filter))
            .await
            .map_err(|e| driver_error("delete_one", e))?;

        Ok(result.deleted_count)
    }
}
