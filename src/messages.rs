use crate::pipeline::Outcome;
use crate::publish::PublishReport;

const ERROR_COLOR: &str = "#990000";
const SUCCESS_COLOR: &str = "#005500";

fn span(color: &str, text: &str) -> String {
    format!("<span style=\"color: {color};\">{text}</span><br>")
}

pub fn error(text: &str) -> String {
    span(ERROR_COLOR, text)
}

pub fn success(text: &str) -> String {
    span(SUCCESS_COLOR, text)
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Response body for one request. Command output is only included when
/// `show_diagnostics` is set.
pub fn render(outcome: &Outcome, show_diagnostics: bool) -> String {
    match outcome {
        Outcome::InvalidLanguage(err) => error(&escape(&err.to_string())),
        Outcome::NamespaceNotFound { destination } => error(&format!(
            "The namespace \"{}\" was not found. Please create it first.",
            escape(destination.as_str())
        )),
        Outcome::SourceNotFound { source } => error(&format!(
            "The source OBS directory for \"{}\" was not found.",
            escape(source.as_str())
        )),
        Outcome::AlreadyPopulated { destination } => {
            let dst = escape(destination.as_str());
            success(&format!(
                "Open Bible Stories already exist at <a href=\"/{dst}/obs\">{dst}/obs</a>."
            ))
        }
        Outcome::Created {
            destination,
            publish,
        } => {
            let dst = escape(destination.as_str());
            let mut body = String::new();
            if show_diagnostics {
                body.push_str(&diagnostics(publish));
            }
            body.push_str(&success(&format!(
                "Open Bible Stories were created for {dst}: <a href=\"/{dst}/obs\">/{dst}/obs</a>."
            )));
            body
        }
    }
}

fn diagnostics(report: &PublishReport) -> String {
    if report.skipped {
        return "<br>Git Response: publishing disabled<br><br>".to_owned();
    }
    report
        .commands
        .iter()
        .map(|c| format!("<br>Git Response: {}<br><br>", escape(&c.output)))
        .collect()
}
