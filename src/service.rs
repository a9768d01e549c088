//! Plant Service
//!
//! The plant-detail flow behind the Plant Details page:
//! exists? -> fetch, or generate -> ingest (-> cleanup -> publish) -> fetch.
//!
//! Store and git work is blocking and runs on the blocking thread pool.
//! Generation on a miss is serialized behind one async mutex, and the store
//! is checked again once the lock is held, so concurrent requests for the
//! same missing plant generate it only once per process. Store reads share
//! a read lock; ingestion takes it exclusively.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::config::AppConfig;
use crate::error::{PlantError, Result};
use crate::ingest::{IngestReport, ResponseIngestor};
use crate::lookup::LookupService;
use crate::profile::{ChatCompletionsClient, ProfileGenerator, TextGenerator};
use crate::store::{normalize_name, PlantRecord, PlantTable, RecordStore};
use crate::sync::{publisher_for, Publisher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    /// Served straight from the store.
    Cached,
    /// Generated on this request, then stored.
    Generated,
}

#[derive(Debug, Clone)]
pub struct PlantDetails {
    /// Normalized plant name.
    pub name: String,
    pub source: DetailSource,
    /// `label: value` rendering of every matching row.
    pub text: String,
    pub records: Vec<PlantRecord>,
}

pub struct PlantService {
    store: RecordStore,
    lookup: LookupService,
    generator: ProfileGenerator,
    ingestor: Arc<ResponseIngestor>,
    write_lock: Mutex<()>,
    store_lock: RwLock<()>,
}

impl PlantService {
    pub fn new(
        store: RecordStore,
        generator: Arc<dyn TextGenerator>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            lookup: LookupService::new(store.clone()),
            generator: ProfileGenerator::new(generator),
            ingestor: Arc::new(ResponseIngestor::new(store.clone(), publisher)),
            store,
            write_lock: Mutex::new(()),
            store_lock: RwLock::new(()),
        }
    }

    /// Production wiring: chat-completions client plus git publisher when a
    /// working copy is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = ChatCompletionsClient::new(&config.provider)?;
        Ok(Self::new(
            RecordStore::new(&config.store_path),
            Arc::new(client),
            publisher_for(config.sync.as_ref()),
        ))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Details for `name`, generating and storing a profile on a miss.
    pub async fn details(&self, name: &str) -> Result<PlantDetails> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(PlantError::InvalidName(name.to_string()));
        }

        if self.exists(&key).await? {
            tracing::debug!(plant = %key, "store hit");
            return self.fetch(key, DetailSource::Cached).await;
        }

        let _guard = self.write_lock.lock().await;
        if self.exists(&key).await? {
            tracing::debug!(plant = %key, "stored by a concurrent request");
            return self.fetch(key, DetailSource::Cached).await;
        }

        tracing::info!(plant = %key, "store miss, generating profile");
        let raw = self.generator.generate(&key).await?;
        let report = self.ingest(key.clone(), raw).await?;
        if !report.stored {
            tracing::warn!(plant = %key, skipped = report.skipped, "generated profile had no usable sections");
        }

        self.fetch(key, DetailSource::Generated).await
    }

    /// The whole store, for the database page.
    pub async fn database(&self) -> Result<PlantTable> {
        let _read = self.store_lock.read().await;
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.load()).await?
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let _read = self.store_lock.read().await;
        let lookup = self.lookup.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || lookup.exists(&key)).await?
    }

    async fn ingest(&self, key: String, raw: String) -> Result<IngestReport> {
        let _write = self.store_lock.write().await;
        let ingestor = Arc::clone(&self.ingestor);
        tokio::task::spawn_blocking(move || ingestor.ingest(&key, &raw)).await?
    }

    async fn fetch(&self, key: String, source: DetailSource) -> Result<PlantDetails> {
        let _read = self.store_lock.read().await;
        let lookup = self.lookup.clone();
        tokio::task::spawn_blocking(move || -> Result<PlantDetails> {
            let text = lookup.fetch(&key)?;
            let records = lookup.fetch_records(&key)?;
            Ok(PlantDetails {
                name: key,
                source,
                text,
                records,
            })
        })
        .await?
    }
}
