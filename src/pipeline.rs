use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::dataset::{DatasetSource, HttpDatasetSource};
use crate::language::{LanguageCode, LanguageCodeError};
use crate::locks::DestinationLocks;
use crate::publish::{GitCli, PublishReport, PublishTarget, Vcs};
use crate::workspace::{DestinationWorkspace, Validation};

/// The two inputs of an import: a source code and a destination display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateObsRequest {
    pub source_lang: String,
    pub destination_lang: String,
}

impl CreateObsRequest {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let field = |name: &str| {
            params
                .get(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("missing parameter: {name}"))
        };
        Ok(Self {
            source_lang: field("sourceLang")?,
            destination_lang: field("destinationLang")?,
        })
    }
}

#[derive(Debug)]
pub enum Outcome {
    InvalidLanguage(LanguageCodeError),
    NamespaceNotFound {
        destination: LanguageCode,
    },
    SourceNotFound {
        source: LanguageCode,
    },
    AlreadyPopulated {
        destination: LanguageCode,
    },
    Created {
        destination: LanguageCode,
        publish: PublishReport,
    },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidLanguage(_) | Self::NamespaceNotFound { .. } | Self::SourceNotFound { .. }
        )
    }
}

#[derive(Clone)]
pub struct Pipeline {
    config: Arc<Config>,
    dataset: Arc<dyn DatasetSource>,
    vcs: Arc<dyn Vcs>,
    locks: DestinationLocks,
}

impl Pipeline {
    pub fn new(config: Config, dataset: Arc<dyn DatasetSource>, vcs: Arc<dyn Vcs>) -> Self {
        Self {
            config: Arc::new(config),
            dataset,
            vcs,
            locks: DestinationLocks::new(),
        }
    }

    /// HTTP dataset source and the `git` CLI, both as configured.
    pub fn from_config(config: Config) -> Self {
        let dataset = Arc::new(HttpDatasetSource::new(config.dataset_url.clone()));
        let vcs = Arc::new(GitCli {
            bin: config.git_bin.clone(),
            remote: config.git_remote.clone(),
            branch: config.git_branch.clone(),
        });
        Self::new(config, dataset, vcs)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gates first (no writes), then fetch, assemble and publish.
    pub fn run(&self, request: &CreateObsRequest, today: NaiveDate) -> anyhow::Result<Outcome> {
        let source = match LanguageCode::new(request.source_lang.as_str()) {
            Ok(code) => code,
            Err(err) => return Ok(Outcome::InvalidLanguage(err)),
        };
        let destination = match crate::language::resolve(&request.destination_lang) {
            Ok(code) => code,
            Err(err) => return Ok(Outcome::InvalidLanguage(err)),
        };
        tracing::info!(%source, %destination, "create obs");

        let _guard = self.locks.acquire(&destination);

        let workspace =
            DestinationWorkspace::new(&self.config.pages_dir, source.clone(), destination.clone());
        let workspace = match crate::workspace::validate(workspace).context("validate workspace")? {
            Validation::Ready(workspace) => workspace,
            Validation::NamespaceNotFound => return Ok(Outcome::NamespaceNotFound { destination }),
            Validation::SourceNotFound => return Ok(Outcome::SourceNotFound { source }),
            Validation::AlreadyPopulated => return Ok(Outcome::AlreadyPopulated { destination }),
        };

        let collection = self.dataset.fetch(&source).context("fetch dataset")?;

        crate::assemble::assemble(&workspace, &collection, today).context("assemble pages")?;

        let publish = if self.config.publish {
            let targets = [
                PublishTarget {
                    dir: workspace.admin_dir(),
                    message: format!("Added uwadmin obs page for {destination}"),
                },
                PublishTarget {
                    dir: workspace.namespace_dir(),
                    message: "Initial import of OBS".to_owned(),
                },
            ];
            crate::publish::publish(
                self.vcs.as_ref(),
                self.config.regen_script.as_deref(),
                &targets,
            )
        } else {
            tracing::info!("publishing disabled; skipping git");
            PublishReport::skipped()
        };

        tracing::info!(%destination, published = publish.all_succeeded(), "obs created");
        Ok(Outcome::Created {
            destination,
            publish,
        })
    }
}
