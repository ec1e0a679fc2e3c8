#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use obs_populate::dataset::{DatasetError, DatasetSource};
use obs_populate::formats::StoryCollection;
use obs_populate::language::LanguageCode;
use obs_populate::publish::{CommandOutput, Vcs};

pub const DATASET_JSON: &str = r#"{
  "app_words": {
    "languages": "Languages",
    "cancel": "Cancel",
    "chapters": "Chapters"
  },
  "chapters": [
    {
      "frames": [
        {"id": "01-01", "img": "https://cdn.example.org/obs/01-01.jpg", "text": "This is how God made everything in the beginning."},
        {"id": "01-02", "img": "https://cdn.example.org/obs/01-02.jpg", "text": "Then God said, \"Let there be light!\""}
      ],
      "number": "01",
      "ref": "A Bible story from: Genesis 1-2",
      "title": "1. The Creation"
    },
    {
      "frames": [
        {"id": "02-01", "img": "https://cdn.example.org/obs/02-01.jpg", "text": "Adam and his wife were very happy."}
      ],
      "number": "02",
      "ref": "A Bible story from: Genesis 3",
      "title": "2. Sin Enters the World"
    }
  ]
}"#;

pub fn collection() -> StoryCollection {
    serde_json::from_str(DATASET_JSON).expect("parse fixture dataset")
}

/// Pages root with an `en` source, an empty `fr` namespace and the templates.
pub fn pages_fixture(root: &Path) -> anyhow::Result<PathBuf> {
    let pages = root.join("pages");
    write(&pages.join("en/obs/front-matter.txt"), "front matter\n")?;
    write(&pages.join("en/obs/back-matter.txt"), "back matter\n")?;
    write(&pages.join("en/obs/01.txt"), "english chapter\n")?;
    fs::create_dir_all(pages.join("fr"))?;

    write(
        &pages.join("templates/obs.txt"),
        "====== Open Bible Stories ======\n{{page>LANGCODE:obs:stories}}\n",
    )?;
    write(&pages.join("templates/home.txt"), "====== LANGCODE ======\n")?;
    write(&pages.join("templates/sidebar.txt"), "**LANGCODE**\n")?;
    write(
        &pages.join("templates/status.txt"),
        "^ Language ^ LANGCODE ^\n^ Imported ^ ORIGDATE ^\n",
    )?;
    write(
        &pages.join("templates/obs3/obs/sidebar.txt"),
        "  * [[LANGCODE:obs|OBS]]\n",
    )?;
    write(
        &pages.join("templates/obs3/obs/stories.txt"),
        "[[LANGCODE:obs:01|1. The Creation]]\n",
    )?;
    Ok(pages)
}

pub fn write(path: &Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}

/// Relative path → contents for every file below `dir`.
pub fn snapshot(dir: &Path) -> anyhow::Result<BTreeMap<PathBuf, Vec<u8>>> {
    let mut files = BTreeMap::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(current)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let rel = path.strip_prefix(dir)?.to_path_buf();
            files.insert(rel, fs::read(&path)?);
        }
    }
    Ok(files)
}

pub struct FixtureDataset {
    pub collection: StoryCollection,
    pub fetches: AtomicUsize,
}

impl FixtureDataset {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            collection: collection(),
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DatasetSource for FixtureDataset {
    fn fetch(&self, _source: &LanguageCode) -> Result<StoryCollection, DatasetError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.collection.clone())
    }
}

#[derive(Default)]
pub struct RecordingVcs {
    pub calls: Mutex<Vec<(PathBuf, String)>>,
}

impl RecordingVcs {
    fn record(&self, dir: &Path, what: String) -> CommandOutput {
        self.calls
            .lock()
            .unwrap()
            .push((dir.to_path_buf(), what.clone()));
        CommandOutput {
            program: "git".to_owned(),
            args: Vec::new(),
            dir: dir.to_path_buf(),
            success: true,
            output: format!("ok: {what}"),
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Vcs for RecordingVcs {
    fn stage(&self, dir: &Path) -> CommandOutput {
        self.record(dir, "add .".to_owned())
    }
    fn commit(&self, dir: &Path, message: &str) -> CommandOutput {
        self.record(dir, format!("commit -am {message}"))
    }
    fn push(&self, dir: &Path) -> CommandOutput {
        self.record(dir, "push origin master".to_owned())
    }
}

/// Serves `/obs-en.json`; every other path is a 404.
pub struct DatasetStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl DatasetStub {
    pub fn spawn() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start dataset stub server");
        let base_url = format!("http://{}", server.server_addr());
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let response = if request.url() == "/obs-en.json" {
                    let header = tiny_http::Header::from_bytes(
                        &b"Content-Type"[..],
                        &b"application/json"[..],
                    )
                    .expect("build header");
                    tiny_http::Response::from_string(DATASET_JSON).with_header(header)
                } else {
                    tiny_http::Response::from_string("not found").with_status_code(404)
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn url_template(&self) -> String {
        format!("{}/obs-{{lang}}.json", self.base_url)
    }
}

impl Drop for DatasetStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
