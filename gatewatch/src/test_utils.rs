//! In-memory collaborators and constructors shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::{Credentials, provider::SharedCredentialsProvider};
use axum_test::TestServer;
use chrono::Utc;
use uuid::Uuid;

use crate::AppState;
use crate::config::{Config, DetectionConfig};
use crate::db::{IdentityRecords, errors::DbError, models::images::ImageRecord};
use crate::detection::{self, DetectLabelsRequest, DetectionError, Label, LabelDetector};
use crate::intruder::IntruderDetection;
use crate::storage::{self, ObjectStore, PutObjectRequest, StorageError, StoredObject};

/// SDK config with static credentials, usable against a mock endpoint.
pub fn test_sdk_config(region: &'static str) -> SdkConfig {
    SdkConfig::builder()
        .region(Region::new(region))
        .credentials_provider(SharedCredentialsProvider::new(Credentials::new(
            "AKIDTEST", "test-secret", None, None, "test",
        )))
        .behavior_version(BehaviorVersion::latest())
        .build()
}

/// Object store that keeps writes in memory.
#[derive(Default)]
pub struct MockObjectStore {
    objects: Mutex<Vec<PutObjectRequest>>,
    fixed_url: Option<String>,
    fail: bool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write reports `url`, whatever the key
    pub fn with_fixed_url(url: &str) -> Self {
        Self {
            fixed_url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn url_for(&self, key: &str) -> String {
        self.fixed_url
            .clone()
            .unwrap_or_else(|| format!("https://{}.s3.amazonaws.com/{}", storage::UPLOAD_BUCKET, key))
    }

    pub fn objects(&self) -> Vec<PutObjectRequest> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(&self, request: PutObjectRequest) -> storage::Result<StoredObject> {
        if self.fail {
            return Err(StorageError::Upload {
                key: request.key,
                source: "store unreachable".into(),
            });
        }

        let stored = StoredObject {
            bucket: request.bucket.clone(),
            key: request.key.clone(),
            url: self.url_for(&request.key),
        };
        self.objects.lock().unwrap().push(request);
        Ok(stored)
    }
}

/// Detector that answers every request with the same labels.
#[derive(Default)]
pub struct MockDetector {
    labels: Vec<Label>,
    requests: Mutex<Vec<DetectLabelsRequest>>,
    fail: bool,
}

impl MockDetector {
    pub fn with_labels(names: &[&str]) -> Self {
        Self {
            labels: names
                .iter()
                .map(|name| Label {
                    name: name.to_string(),
                    confidence: 95.0,
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<DetectLabelsRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LabelDetector for MockDetector {
    async fn detect_labels(&self, request: &DetectLabelsRequest) -> detection::Result<Vec<Label>> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(DetectionError::Service("detector unavailable".into()));
        }
        Ok(self.labels.clone())
    }
}

/// Identity mapping held in a map, recording every lookup.
#[derive(Default)]
pub struct MockIdentityRecords {
    records: Mutex<HashMap<String, String>>,
    lookups: Mutex<Vec<String>>,
    fail: bool,
}

impl MockIdentityRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, image_url: &str, person_name: &str) {
        self.records
            .lock()
            .unwrap()
            .insert(image_url.to_string(), person_name.to_string());
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityRecords for MockIdentityRecords {
    async fn find_by_image_url(&self, image_url: &str) -> crate::db::errors::Result<Option<ImageRecord>> {
        self.lookups.lock().unwrap().push(image_url.to_string());
        if self.fail {
            return Err(DbError::Other(anyhow::anyhow!("connection refused")));
        }

        Ok(self.records.lock().unwrap().get(image_url).map(|person_name| ImageRecord {
            id: Uuid::new_v4(),
            image_url: image_url.to_string(),
            person_name: person_name.clone(),
            created_at: Utc::now(),
        }))
    }
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.database.url = Some("postgres://localhost/gatewatch_test".to_string());
    config
}

pub fn create_test_state(
    store: Arc<MockObjectStore>,
    detector: Arc<MockDetector>,
    identities: Arc<MockIdentityRecords>,
) -> AppState {
    let config = create_test_config();
    let detection = IntruderDetection::new(store, detector, identities, DetectionConfig::default());
    AppState::builder().config(config).detection(detection).build()
}

pub fn create_test_app(state: AppState) -> TestServer {
    let router = crate::build_router(&state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}
