use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;
use chrono::NaiveDate;

use crate::formats::StoryCollection;
use crate::language::LanguageCode;
use crate::workspace::DestinationWorkspace;

/// Copied verbatim from the source language when present.
pub const STATIC_FILES: [&str; 3] = ["back-matter.txt", "front-matter.txt", "cover-matter.txt"];
/// Rendered from `templates/obs3/obs` into the destination.
pub const OBS_TEMPLATES: [&str; 2] = ["sidebar.txt", "stories.txt"];

/// Populates the destination tree: chapters, static files, templated pages,
/// the namespace home/sidebar and the admin status page.
pub fn assemble(
    workspace: &DestinationWorkspace,
    collection: &StoryCollection,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let dst = &workspace.destination;
    let dest_dir = workspace.destination_dir();
    crate::workspace::create_dir(&dest_dir)?;

    crate::chapters::generate(collection, &dest_dir).context("generate chapter files")?;

    copy_static_files(&workspace.source_dir(), &dest_dir)?;

    let obs_templates = workspace.obs_templates_dir();
    for name in OBS_TEMPLATES {
        crate::template::render_file(&obs_templates.join(name), &dest_dir.join(name), dst)?;
    }

    let templates = workspace.templates_dir();
    let namespace_dir = workspace.namespace_dir();
    crate::template::render_file(
        &templates.join("obs.txt"),
        &namespace_dir.join("obs.txt"),
        dst,
    )?;

    update_namespace_page(
        &templates.join("home.txt"),
        &namespace_dir.join("home.txt"),
        dst,
        &home_resources_block(dst),
    )
    .context("update home page")?;
    update_namespace_page(
        &templates.join("sidebar.txt"),
        &namespace_dir.join("sidebar.txt"),
        dst,
        &sidebar_resources_block(dst),
    )
    .context("update sidebar page")?;

    write_status_page(workspace, today).context("write status page")?;

    Ok(())
}

fn copy_static_files(source_dir: &Path, dest_dir: &Path) -> anyhow::Result<()> {
    for name in STATIC_FILES {
        let from = source_dir.join(name);
        if !from.is_file() {
            tracing::debug!(file = %from.display(), "static file absent; skipping");
            continue;
        }
        crate::workspace::copy_file(&from, &dest_dir.join(name))?;
    }
    Ok(())
}

/// Seeds `page` from `template` if it does not exist, then appends `block`.
///
/// The append is unconditional: running twice leaves the block in the page twice.
pub fn update_namespace_page(
    template: &Path,
    page: &Path,
    code: &LanguageCode,
    block: &str,
) -> anyhow::Result<()> {
    if !page.is_file() {
        crate::template::render_file(template, page, code)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(page)
        .with_context(|| format!("open for append: {}", page.display()))?;
    file.write_all(block.as_bytes())
        .with_context(|| format!("append: {}", page.display()))?;
    Ok(())
}

pub fn home_resources_block(code: &LanguageCode) -> String {
    format!("\n===== Resources =====\n\n  * **[[{code}:obs|Open Bible Stories ({code})]]**")
}

pub fn sidebar_resources_block(code: &LanguageCode) -> String {
    format!(
        "\n**Resources**\n\n  * [[{code}:obs|Open Bible Stories ({code})]]\n\n**Latest OBS Status**\n{{{{page>en:uwadmin:{code}:obs:status}}}}"
    )
}

fn write_status_page(workspace: &DestinationWorkspace, today: NaiveDate) -> anyhow::Result<()> {
    let status_dir = workspace.status_dir();
    crate::workspace::create_dir(&status_dir)?;

    let template = crate::template::load(&workspace.templates_dir().join("status.txt"))?;
    let text = crate::template::render_status(&template, &workspace.destination, today);
    crate::workspace::write_text_file(&status_dir.join("status.txt"), &text)
}
