//! Dataset storage and the bootstrap flow that uploads the fixtures.
//!
//! The pipeline never touches a store. Stores exist so the built-in datasets
//! can be published to a tracing backend and checked there later.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use qa_agent::SecretString;

use crate::config::LangfuseConfig;
use crate::error::StoreError;
use crate::fixtures::{Dataset, DatasetItem};

/// Persistence for named datasets.
#[async_trait]
pub trait DatasetStore: Send + Sync {
    async fn create_dataset(
        &self,
        name: &str,
        description: &str,
        metadata: Value,
    ) -> Result<(), StoreError>;

    async fn create_item(&self, dataset: &str, item: &DatasetItem) -> Result<(), StoreError>;

    /// All items of a dataset. `NotFound` if it does not exist.
    async fn get_dataset(&self, name: &str) -> Result<Vec<DatasetItem>, StoreError>;
}

#[derive(Debug, Clone, Default)]
struct StoredDataset {
    description: String,
    metadata: Value,
    items: Vec<DatasetItem>,
}

/// In-memory dataset store.
///
/// Useful for testing; data is lost on restart.
#[derive(Default)]
pub struct MemoryDatasetStore {
    datasets: RwLock<HashMap<String, StoredDataset>>,
}

impl MemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Description and metadata of a stored dataset.
    pub fn info(&self, name: &str) -> Option<(String, Value)> {
        self.datasets
            .read()
            .ok()?
            .get(name)
            .map(|d| (d.description.clone(), d.metadata.clone()))
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Config("dataset store lock poisoned".into())
}

#[async_trait]
impl DatasetStore for MemoryDatasetStore {
    async fn create_dataset(
        &self,
        name: &str,
        description: &str,
        metadata: Value,
    ) -> Result<(), StoreError> {
        let mut datasets = self.datasets.write().map_err(poisoned)?;
        if datasets.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        datasets.insert(
            name.to_string(),
            StoredDataset {
                description: description.to_string(),
                metadata,
                items: Vec::new(),
            },
        );
        Ok(())
    }

    async fn create_item(&self, dataset: &str, item: &DatasetItem) -> Result<(), StoreError> {
        self.datasets
            .write()
            .map_err(poisoned)?
            .get_mut(dataset)
            .ok_or_else(|| StoreError::NotFound(dataset.to_string()))?
            .items
            .push(item.clone());
        Ok(())
    }

    async fn get_dataset(&self, name: &str) -> Result<Vec<DatasetItem>, StoreError> {
        self.datasets
            .read()
            .map_err(poisoned)?
            .get(name)
            .map(|d| d.items.clone())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}

/// Dataset item as the Langfuse public API spells it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LangfuseItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dataset_name: Option<String>,
    #[serde(default)]
    input: Value,
    #[serde(default)]
    expected_output: Value,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Deserialize)]
struct LangfusePage {
    data: Vec<LangfuseItem>,
    meta: LangfuseMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LangfuseMeta {
    page: u32,
    total_pages: u32,
}

const PAGE_LIMIT: u32 = 50;

/// Dataset store backed by the Langfuse public REST API.
pub struct LangfuseStore {
    client: reqwest::Client,
    host: String,
    public_key: SecretString,
    secret_key: SecretString,
}

impl LangfuseStore {
    pub fn new(config: &LangfuseConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self {
            client,
            host: config.host.trim_end_matches('/').to_string(),
            public_key: config.public_key.clone(),
            secret_key: config.secret_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/public/{}", self.host, path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .basic_auth(self.public_key.expose(), Some(self.secret_key.expose()))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, error = %body, "Langfuse API error");
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DatasetStore for LangfuseStore {
    async fn create_dataset(
        &self,
        name: &str,
        description: &str,
        metadata: Value,
    ) -> Result<(), StoreError> {
        let response = self
            .post("datasets")
            .json(&json!({
                "name": name,
                "description": description,
                "metadata": metadata,
            }))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        Self::check(response).await?;
        debug!(dataset = name, "Langfuse dataset created");
        Ok(())
    }

    async fn create_item(&self, dataset: &str, item: &DatasetItem) -> Result<(), StoreError> {
        let body = LangfuseItem {
            dataset_name: Some(dataset.to_string()),
            input: item.input.clone(),
            expected_output: item.expected_output.clone(),
            metadata: item.metadata.clone(),
        };

        let response = self
            .post("dataset-items")
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_dataset(&self, name: &str) -> Result<Vec<DatasetItem>, StoreError> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let response = self
                .client
                .get(self.url("dataset-items"))
                .basic_auth(self.public_key.expose(), Some(self.secret_key.expose()))
                .query(&[
                    ("datasetName", name.to_string()),
                    ("page", page.to_string()),
                    ("limit", PAGE_LIMIT.to_string()),
                ])
                .send()
                .await
                .map_err(|e| StoreError::Network(e.to_string()))?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(StoreError::NotFound(name.to_string()));
            }

            let body: LangfusePage = Self::check(response)
                .await?
                .json()
                .await
                .map_err(|e| StoreError::Parse(e.to_string()))?;

            items.extend(
                body.data
                    .into_iter()
                    .map(|i| DatasetItem::new(i.input, i.expected_output, i.metadata)),
            );

            if body.meta.page >= body.meta.total_pages {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

/// Result of uploading one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupOutcome {
    pub dataset: String,
    /// False when an existing dataset was reused.
    pub created: bool,
    pub added: usize,
    pub total: usize,
    /// Set when the dataset could be neither created nor read.
    pub error: Option<String>,
}

impl SetupOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Create each dataset (reusing it if it already exists) and add its items.
pub async fn setup_datasets<S>(store: &S, datasets: &[Dataset]) -> Vec<SetupOutcome>
where
    S: DatasetStore + ?Sized,
{
    let mut outcomes = Vec::with_capacity(datasets.len());

    for dataset in datasets {
        let metadata = json!({
            "created_date": Utc::now().to_rfc3339(),
            "metrics": dataset.primary_metrics,
            "item_count": dataset.len(),
            "purpose": "saudi_arabia_agent_evaluation",
        });

        let created = match store
            .create_dataset(&dataset.name, &dataset.description, metadata)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(dataset = %dataset.name, error = %e, "Dataset creation failed, trying existing dataset");
                if let Err(e) = store.get_dataset(&dataset.name).await {
                    outcomes.push(SetupOutcome {
                        dataset: dataset.name.clone(),
                        created: false,
                        added: 0,
                        total: dataset.len(),
                        error: Some(e.to_string()),
                    });
                    continue;
                }
                false
            }
        };

        let mut added = 0;
        for (index, item) in dataset.items.iter().enumerate() {
            match store.create_item(&dataset.name, item).await {
                Ok(()) => added += 1,
                Err(e) => warn!(dataset = %dataset.name, index, error = %e, "Failed to add dataset item"),
            }
        }

        info!(dataset = %dataset.name, added, total = dataset.len(), "Dataset uploaded");
        outcomes.push(SetupOutcome {
            dataset: dataset.name.clone(),
            created,
            added,
            total: dataset.len(),
            error: None,
        });
    }

    outcomes
}

/// Stored item count compared with the fixture count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetCheck {
    pub dataset: String,
    pub exists: bool,
    pub item_count: usize,
    pub expected_count: usize,
    pub complete: bool,
    pub error: Option<String>,
}

pub async fn verify_datasets<S>(store: &S, datasets: &[Dataset]) -> Vec<DatasetCheck>
where
    S: DatasetStore + ?Sized,
{
    let mut checks = Vec::with_capacity(datasets.len());

    for dataset in datasets {
        let check = match store.get_dataset(&dataset.name).await {
            Ok(items) => DatasetCheck {
                dataset: dataset.name.clone(),
                exists: true,
                item_count: items.len(),
                expected_count: dataset.len(),
                complete: items.len() == dataset.len(),
                error: None,
            },
            Err(e) => DatasetCheck {
                dataset: dataset.name.clone(),
                exists: false,
                item_count: 0,
                expected_count: dataset.len(),
                complete: false,
                error: Some(e.to_string()),
            },
        };
        checks.push(check);
    }

    checks
}
