use std::path::{Path, PathBuf};

use crate::formats::{Chapter, Frame, StoryCollection};

pub const APP_WORDS_FILE: &str = "app_words.txt";
const APP_WORDS_HEADER: &str = "//Translation for the unfoldingWord mobile app interface//\n";

/// Writes `<number>.txt` for each chapter, then `app_words.txt`.
/// Returns the written paths in order.
pub fn generate(collection: &StoryCollection, dest_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    // Chapter numbers come from the dataset and become file names.
    for chapter in &collection.chapters {
        if !crate::workspace::is_path_component(&chapter.number) {
            anyhow::bail!("invalid chapter number: {:?}", chapter.number);
        }
    }

    let mut written = Vec::with_capacity(collection.chapters.len() + 1);

    for chapter in &collection.chapters {
        let path = dest_dir.join(format!("{}.txt", chapter.number));
        crate::workspace::write_text_file(&path, &render_chapter(chapter))?;
        written.push(path);
    }

    let path = dest_dir.join(APP_WORDS_FILE);
    crate::workspace::write_text_file(&path, &render_app_words(collection))?;
    written.push(path);

    tracing::info!(
        dir = %dest_dir.display(),
        chapters = collection.chapters.len(),
        "wrote chapter files"
    );
    Ok(written)
}

pub fn render_chapter(chapter: &Chapter) -> String {
    let mut text = format!("====== {} ======\n\n", chapter.title);
    for frame in &chapter.frames {
        text.push_str(&render_frame(frame));
    }
    text.push_str(&format!("//{}//\n\n\n", chapter.reference));
    text
}

fn render_frame(frame: &Frame) -> String {
    // Trailing blank lines are where the translation goes.
    format!("\n{{{{{}}}}}\n\n\n{}\n\n\n\n", frame.image_url, frame.text)
}

pub fn render_app_words(collection: &StoryCollection) -> String {
    let mut text = APP_WORDS_HEADER.to_owned();
    for (key, value) in collection.app_words.iter() {
        text.push_str(&format!("\n\n{key}: {value}\n"));
    }
    text
}
