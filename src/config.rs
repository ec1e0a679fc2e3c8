use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::dataset::LANGUAGE_PLACEHOLDER;

pub const DEFAULT_DATASET_URL: &str = "https://api.unfoldingword.org/obs/txt/1/en/obs-{lang}.json";
pub const DEFAULT_REGEN_SCRIPT: &str =
    "/var/www/vhosts/door43.org/tools/obs/dokuwiki/obs-gen-changes-pages.sh";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Wiki pages root holding one directory per language namespace.
    pub pages_dir: PathBuf,
    /// Dataset URL; `{lang}` is replaced by the source language code.
    pub dataset_url: String,
    pub regen_script: Option<PathBuf>,
    pub git_bin: String,
    pub git_remote: String,
    pub git_branch: String,
    /// When false the regeneration script and git are never run.
    pub publish: bool,
    /// Server names for which command output is echoed back.
    pub dev_hosts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pages_dir: PathBuf::from("data/pages"),
            dataset_url: DEFAULT_DATASET_URL.to_owned(),
            regen_script: Some(PathBuf::from(DEFAULT_REGEN_SCRIPT)),
            git_bin: "git".to_owned(),
            git_remote: "origin".to_owned(),
            git_branch: "master".to_owned(),
            publish: true,
            dev_hosts: vec!["localhost".to_owned(), "test.door43.org".to_owned()],
        }
    }
}

impl Config {
    /// Defaults, then the YAML file (if any), then `OBS_POPULATE_*` variables.
    /// Callers apply their own overrides and then [`Config::validate`].
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)
                    .with_context(|| format!("read config: {}", path.display()))?;
                serde_yaml::from_str(&yaml)
                    .with_context(|| format!("parse config: {}", path.display()))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = var("OBS_POPULATE_PAGES_DIR") {
            self.pages_dir = PathBuf::from(v);
        }
        if let Some(v) = var("OBS_POPULATE_DATASET_URL") {
            self.dataset_url = v;
        }
        if let Some(v) = var("OBS_POPULATE_REGEN_SCRIPT") {
            let v = v.trim();
            self.regen_script = (!v.is_empty()).then(|| PathBuf::from(v));
        }
        if let Some(v) = var("OBS_POPULATE_GIT_BIN") {
            self.git_bin = v;
        }
        if let Some(v) = var("OBS_POPULATE_PUBLISH") {
            self.publish = parse_bool(&v)
                .with_context(|| format!("invalid OBS_POPULATE_PUBLISH={v:?}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.dataset_url.contains(LANGUAGE_PLACEHOLDER) {
            anyhow::bail!(
                "dataset_url must contain {LANGUAGE_PLACEHOLDER}: {}",
                self.dataset_url
            );
        }
        let probe = self.dataset_url.replace(LANGUAGE_PLACEHOLDER, "en");
        let url = url::Url::parse(&probe)
            .with_context(|| format!("parse dataset_url: {}", self.dataset_url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("dataset_url must be http/https: {}", self.dataset_url);
        }
        if self.git_bin.trim().is_empty() {
            anyhow::bail!("git_bin is empty");
        }
        Ok(())
    }

    pub fn is_dev_host(&self, server_name: Option<&str>) -> bool {
        server_name.is_some_and(|name| self.dev_hosts.iter().any(|h| h.eq_ignore_ascii_case(name)))
    }
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}
