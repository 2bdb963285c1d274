use std::{
    collections::HashMap,
    env, fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::from_file(default_config_path())
    }

    /// Build from a specific rc file; env vars still overlay its values.
    pub fn from_file(config_path: PathBuf) -> Self {
        let mut map = default_map();

        // Read .voxdatarc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn base_url(&self) -> String {
        let url = self
            .get("API_BASE_URL")
            .unwrap_or_else(|| "http://localhost:8000".into());
        url.trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> u64 {
        self.get("REQUEST_TIMEOUT")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60)
    }

    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(self.get("REPORT_PATH").unwrap_or_else(|| "voxdata-report.html".into()))
    }

    pub fn record_command(&self) -> String {
        self.get("RECORD_COMMAND")
            .unwrap_or_else(|| "arecord -q -f cd -t wav -".into())
    }

    /// The opaque CSRF credential attached to mutating requests. Taken from
    /// CSRF_TOKEN directly, or from the `csrftoken` entry of a Netscape-format
    /// cookie file named by COOKIE_FILE.
    pub fn csrf_token(&self) -> Option<String> {
        if let Some(t) = self.get("CSRF_TOKEN") {
            if !t.trim().is_empty() {
                return Some(t.trim().to_string());
            }
        }
        let path = self.get("COOKIE_FILE")?;
        let text = fs::read_to_string(path).ok()?;
        csrf_from_cookie_text(&text)
    }
}

/// Extract the `csrftoken` cookie value from a Netscape cookies.txt document.
pub fn csrf_from_cookie_text(text: &str) -> Option<String> {
    for line in text.lines() {
        // #HttpOnly_ lines are real cookies, other # lines are comments
        let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() == 7 && fields[5] == "csrftoken" {
            return Some(fields[6].trim().to_string());
        }
    }
    None
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "API_BASE_URL",
        "REQUEST_TIMEOUT",
        "CSRF_TOKEN",
        "COOKIE_FILE",
        "RECORD_COMMAND",
        "PLAY_COMMAND",
        "REPORT_PATH",
        "AUTO_EXECUTE",
    ];

    KEYS.contains(&k) || k.starts_with("VOXDATA_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("voxdata").join(".voxdatarc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("API_BASE_URL".into(), "http://localhost:8000".into());
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("REPORT_PATH".into(), "voxdata-report.html".into());
    m.insert("RECORD_COMMAND".into(), "arecord -q -f cd -t wav -".into());
    m.insert("AUTO_EXECUTE".into(), "false".into());

    m
}
