use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The decoded OBS dataset for one source language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryCollection {
    pub chapters: Vec<Chapter>,
    pub app_words: AppWords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub number: String,
    pub title: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "img")]
    pub image_url: String,
    pub text: String,
}

/// Interface words of the mobile app, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct AppWords(Vec<(String, String)>);

impl AppWords {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AppWords {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Map<String, Value>> for AppWords {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect()
    }
}

impl From<AppWords> for Map<String, Value> {
    fn from(words: AppWords) -> Self {
        words
            .0
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    }
}
