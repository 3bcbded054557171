use crate::types::{DigestError, FetchConfig, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Default sleep between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default overall deadline for one generation.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// REST client for a remote image-generation server.
pub struct GenerationClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct QueueAck {
    prompt_id: Option<String>,
}

/// One tracked generation in a server history payload.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub status: HistoryStatus,
    #[serde(default)]
    pub outputs: BTreeMap<String, NodeOutput>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryStatus {
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct NodeOutput {
    #[serde(default)]
    pub images: Vec<OutputImage>,
}

/// One image produced by a completed generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputImage {
    pub filename: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(rename = "type", default = "default_image_type")]
    pub image_type: String,
}

fn default_image_type() -> String {
    "output".to_string()
}

impl GenerationClient {
    pub fn new(base_url: &str, config: FetchConfig) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("failed to create HTTP client");

        Ok(Self { client, base_url })
    }

    /// Queue a text-to-image prompt on the server; returns the id to poll
    /// with. The id is generated client-side and the server may echo its
    /// own back.
    pub async fn queue_prompt(&self, prompt: &str) -> Result<String> {
        let prompt_id = Uuid::new_v4().to_string();
        let payload = json!({
            "prompt": default_workflow(prompt),
            "prompt_id": prompt_id,
        });

        let url = self.base_url.join("prompt")?;
        let response = self.client.post(url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DigestError::General(format!(
                "failed to queue prompt (HTTP {status}): {body}"
            )));
        }

        let ack: QueueAck = response.json().await?;
        let prompt_id = ack.prompt_id.unwrap_or(prompt_id);
        info!("queued generation {}", prompt_id);
        Ok(prompt_id)
    }

    /// Fetch the history entry for one generation. A non-success status
    /// means the entry is not ready yet and yields an empty map.
    pub async fn history(&self, prompt_id: &str) -> Result<BTreeMap<String, HistoryEntry>> {
        let url = self.base_url.join(&format!("history/{prompt_id}"))?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Ok(BTreeMap::new());
        }
        Ok(response.json().await?)
    }

    /// The server-side queue, as the server reports it.
    pub async fn queue_status(&self) -> Result<Value> {
        let url = self.base_url.join("queue")?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    /// Sleep/poll at a fixed interval until the generation completes, then
    /// return its output images. Gives up with a timeout error once the
    /// overall deadline passes.
    pub async fn wait_for_outputs(
        &self,
        prompt_id: &str,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Vec<OutputImage>> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() >= deadline {
                warn!("generation {} timed out after {:?}", prompt_id, timeout);
                return Err(DigestError::Timeout(timeout.as_secs()));
            }
            tokio::time::sleep(poll_interval).await;

            let history = self.history(prompt_id).await?;
            match completed_outputs(&history, prompt_id) {
                Some(images) => {
                    info!(
                        "generation {} finished with {} images",
                        prompt_id,
                        images.len()
                    );
                    return Ok(images);
                }
                None => debug!("generation {} still running", prompt_id),
            }
        }
    }

    /// Download one output image.
    pub async fn download(&self, image: &OutputImage) -> Result<Vec<u8>> {
        let url = self.base_url.join("view")?;
        let response = self
            .client
            .get(url.clone())
            .query(&[
                ("filename", image.filename.as_str()),
                ("subfolder", image.subfolder.as_str()),
                ("type", image.image_type.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Extract the output images for `prompt_id` once its history entry reports
/// completion; `None` while the generation is absent or still running.
pub fn completed_outputs(
    history: &BTreeMap<String, HistoryEntry>,
    prompt_id: &str,
) -> Option<Vec<OutputImage>> {
    let entry = history.get(prompt_id)?;
    if !entry.status.completed {
        return None;
    }
    Some(
        entry
            .outputs
            .values()
            .flat_map(|node| node.images.iter().cloned())
            .collect(),
    )
}

/// Minimal text-to-image graph with the prompt patched into the
/// text-encode node.
fn default_workflow(prompt: &str) -> Value {
    let seed = chrono::Utc::now().timestamp_millis() % 1_000_000_000_000;
    json!({
        "3": {
            "class_type": "KSampler",
            "inputs": {
                "seed": seed,
                "steps": 20,
                "cfg": 8,
                "sampler_name": "euler",
                "scheduler": "normal",
                "model": ["4", 0],
                "positive": ["6", 0],
                "latent_image": ["8", 0]
            }
        },
        "4": { "class_type": "CheckpointLoaderSimple", "inputs": { "ckpt_name": "sd15_default.safetensors" } },
        "6": { "class_type": "CLIPTextEncode", "inputs": { "text": prompt, "clip": ["4", 1] } },
        "7": { "class_type": "VAELoader", "inputs": { "vae_name": "vae-ft-mse-840000-ema-pruned.safetensors" } },
        "8": { "class_type": "EmptyLatentImage", "inputs": { "width": 512, "height": 512, "batch_size": 1 } },
        "9": { "class_type": "VAEDecode", "inputs": { "samples": ["3", 0], "vae": ["7", 0] } },
        "10": { "class_type": "SaveImage", "inputs": { "images": ["9", 0], "filename_prefix": "signal" } }
    })
}

/// A generation tracked in memory while its poll loop runs.
#[derive(Debug, Clone)]
pub struct TrackedGeneration {
    pub prompt: String,
    pub prompt_id: String,
    pub started_at: Instant,
}

/// Bounded in-memory tracker for in-flight generations. Entries expire
/// after `ttl`; when the map is full the oldest entry is evicted.
#[derive(Debug)]
pub struct GenerationTracker {
    entries: HashMap<Uuid, TrackedGeneration>,
    capacity: usize,
    ttl: Duration,
}

impl GenerationTracker {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            ttl,
        }
    }

    /// Track a queued generation and return its local handle.
    pub fn insert(&mut self, prompt: &str, prompt_id: &str) -> Uuid {
        self.purge_expired();
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self
                .entries
                .iter()
                .max_by_key(|(_, tracked)| tracked.started_at.elapsed())
                .map(|(key, _)| *key)
            {
                debug!("evicting oldest tracked generation {}", oldest);
                self.entries.remove(&oldest);
            }
        }
        let key = Uuid::new_v4();
        self.entries.insert(
            key,
            TrackedGeneration {
                prompt: prompt.to_string(),
                prompt_id: prompt_id.to_string(),
                started_at: Instant::now(),
            },
        );
        key
    }

    pub fn get(&self, key: &Uuid) -> Option<&TrackedGeneration> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &Uuid) -> Option<TrackedGeneration> {
        self.entries.remove(key)
    }

    /// Drop entries older than the ttl.
    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, tracked| tracked.started_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
