//! Reqwest-based client for the analysis backend endpoints.

use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use reqwest::multipart::{Form, Part};
use serde::{de::DeserializeOwned, Deserialize};

use crate::config::Config;

pub mod types;

use types::{Execution, ExecutionResult, GeneratedCode, HistoryEntry, Metadata};

/// One backend action; each has its own in-flight slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Upload,
    Transcribe,
    Generate,
    Execute,
    AddHistory,
    GetHistory,
    DeleteHistory,
}

impl Action {
    fn idx(self) -> usize {
        match self {
            Action::Upload => 0,
            Action::Transcribe => 1,
            Action::Generate => 2,
            Action::Execute => 3,
            Action::AddHistory => 4,
            Action::GetHistory => 5,
            Action::DeleteHistory => 6,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Action::Upload => "upload",
            Action::Transcribe => "transcribe",
            Action::Generate => "generate",
            Action::Execute => "execute",
            Action::AddHistory => "add-history",
            Action::GetHistory => "get-history",
            Action::DeleteHistory => "delete-history",
        }
    }
}

#[derive(Debug, Default)]
struct InFlight([AtomicBool; 7]);

/// Releases the action slot when dropped, including on error paths.
#[derive(Debug)]
struct Gate {
    flags: Arc<InFlight>,
    idx: usize,
}

impl Drop for Gate {
    fn drop(&mut self) {
        self.flags.0[self.idx].store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    csrf: Option<String>,
    in_flight: Arc<InFlight>,
}

impl ApiClient {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout()))
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url(),
            csrf: cfg.csrf_token(),
            in_flight: Arc::new(InFlight::default()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reserve the slot for `action`; fails fast while a call is in flight.
    fn begin(&self, action: Action) -> Result<Gate> {
        let idx = action.idx();
        if self.in_flight.0[idx]
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            bail!("a {} request is already in flight", action.name());
        }
        Ok(Gate { flags: Arc::clone(&self.in_flight), idx })
    }

    fn csrf(&self) -> Result<&str> {
        self.csrf
            .as_deref()
            .ok_or_else(|| anyhow!("no CSRF token available; set CSRF_TOKEN or COOKIE_FILE"))
    }

    pub async fn upload_data(&self, path: &Path) -> Result<Metadata> {
        let _gate = self.begin(Action::Upload)?;
        let token = self.csrf()?.to_string();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".into());
        let form = Form::new().part("file", Part::bytes(bytes).file_name(name));

        let resp = self
            .http
            .post(self.url("/upload_data/"))
            .header("X-CSRFToken", token)
            .multipart(form)
            .send()
            .await
            .context("upload request failed")?;
        let body: UploadResponse = read_json(resp).await?;
        check(&body.status, body.message)?;
        body.metadata.ok_or_else(|| anyhow!("backend response missing metadata"))
    }

    pub async fn transcribe(&self, wav: Vec<u8>) -> Result<String> {
        let _gate = self.begin(Action::Transcribe)?;
        let token = self.csrf()?.to_string();
        let part = Part::bytes(wav)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .context("invalid audio part")?;
        let form = Form::new().part("file", part);

        let resp = self
            .http
            .post(self.url("/transcribe/"))
            .header("X-CSRFToken", token)
            .multipart(form)
            .send()
            .await
            .context("transcription request failed")?;
        let body: TranscribeResponse = read_json(resp).await?;
        check(&body.status, body.message)?;
        body.text.ok_or_else(|| anyhow!("backend response missing text"))
    }

    pub async fn generate_code(&self, command: &str) -> Result<GeneratedCode> {
        let _gate = self.begin(Action::Generate)?;
        let token = self.csrf()?.to_string();
        let resp = self
            .http
            .post(self.url("/generate_code/"))
            .header("X-CSRFToken", token)
            .json(&serde_json::json!({ "command": command }))
            .send()
            .await
            .context("code generation request failed")?;
        let body: GenerateResponse = read_json(resp).await?;
        let message = body.message.clone();
        check(&body.status, body.message)?;
        let code = body.code.ok_or_else(|| anyhow!("backend response missing code"))?;
        Ok(GeneratedCode { code, message, audio: body.audio })
    }

    pub async fn execute_code(&self, code: &str) -> Result<Execution> {
        let _gate = self.begin(Action::Execute)?;
        let token = self.csrf()?.to_string();
        let resp = self
            .http
            .post(self.url("/execute_code/"))
            .header("X-CSRFToken", token)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await
            .context("execution request failed")?;
        let body: ExecuteResponse = read_json(resp).await?;
        check(&body.status, body.message)?;
        let result = body.result.ok_or_else(|| anyhow!("backend response missing result"))?;
        Ok(Execution { result, metadata: body.metadata })
    }

    pub async fn add_history(&self, command: &str, code: &str) -> Result<()> {
        let _gate = self.begin(Action::AddHistory)?;
        let token = self.csrf()?.to_string();
        let resp = self
            .http
            .post(self.url("/add_history/"))
            .header("X-CSRFToken", token)
            .json(&serde_json::json!({ "command": command, "code": code }))
            .send()
            .await
            .context("add-history request failed")?;
        let body: AckResponse = read_json(resp).await?;
        check(&body.status, body.message)
    }

    /// Fetched fresh on every call; entries arrive oldest first.
    pub async fn get_history(&self) -> Result<Vec<HistoryEntry>> {
        let _gate = self.begin(Action::GetHistory)?;
        let resp = self
            .http
            .get(self.url("/get_history/"))
            .send()
            .await
            .context("get-history request failed")?;
        let body: HistoryResponse = read_json(resp).await?;
        check(&body.status, body.message)?;
        Ok(body.history.unwrap_or_default())
    }

    pub async fn delete_history(&self) -> Result<()> {
        let _gate = self.begin(Action::DeleteHistory)?;
        let token = self.csrf()?.to_string();
        let resp = self
            .http
            .post(self.url("/delete_history/"))
            .header("X-CSRFToken", token)
            .send()
            .await
            .context("delete-history request failed")?;
        let body: AckResponse = read_json(resp).await?;
        check(&body.status, body.message)
    }
}

/// Decode a backend response, folding non-2xx statuses into errors. Error
/// bodies still carry the `{status, message}` envelope when the backend
/// produced them.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    let text = resp.text().await.context("failed to read response body")?;
    if !status.is_success() {
        if let Ok(env) = serde_json::from_str::<AckResponse>(&text) {
            if let Some(msg) = env.message {
                bail!("{}", msg);
            }
        }
        bail!("backend returned {}", status);
    }
    serde_json::from_str(&text).context("unexpected response body")
}

fn check(status: &str, message: Option<String>) -> Result<()> {
    if status == "success" {
        Ok(())
    } else {
        bail!("{}", message.unwrap_or_else(|| format!("backend status: {}", status)))
    }
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct TranscribeResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<ExecutionResult>,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    history: Option<Vec<HistoryEntry>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: "http://localhost:8000".into(),
            csrf: Some("tok".into()),
            in_flight: Arc::new(InFlight::default()),
        }
    }

    #[test]
    fn in_flight_guard_rejects_second_call() {
        let api = client();
        let gate = api.begin(Action::Execute).unwrap();
        let err = api.begin(Action::Execute).unwrap_err();
        assert!(err.to_string().contains("already in flight"));
        drop(gate);
        // slot is free again once the first call resolves
        assert!(api.begin(Action::Execute).is_ok());
    }

    #[test]
    fn guard_is_per_action() {
        let api = client();
        let _upload = api.begin(Action::Upload).unwrap();
        assert!(api.begin(Action::Generate).is_ok());
    }

    #[test]
    fn backend_error_status_surfaces_message() {
        let err = check("error", Some("no dataset loaded".into())).unwrap_err();
        assert_eq!(err.to_string(), "no dataset loaded");
    }
}
