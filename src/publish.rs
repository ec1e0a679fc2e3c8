use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Captured result of one external command. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
    pub success: bool,
    pub output: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub skipped: bool,
    /// Set once the regeneration script was started, whatever its exit status.
    pub regen_script_ran: bool,
    pub commands: Vec<CommandOutput>,
}

impl PublishReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.commands.iter().all(|c| c.success)
    }
}

/// One directory root to commit, with its commit message.
#[derive(Debug, Clone)]
pub struct PublishTarget {
    pub dir: PathBuf,
    pub message: String,
}

/// Version control seam: stage, commit and push one working tree.
pub trait Vcs: Send + Sync {
    fn stage(&self, dir: &Path) -> CommandOutput;
    fn commit(&self, dir: &Path, message: &str) -> CommandOutput;
    fn push(&self, dir: &Path) -> CommandOutput;
}

#[derive(Debug, Clone)]
pub struct GitCli {
    pub bin: String,
    pub remote: String,
    pub branch: String,
}

impl GitCli {
    fn run(&self, dir: &Path, args: &[&str]) -> CommandOutput {
        run_captured(&self.bin, args, dir)
    }
}

impl Vcs for GitCli {
    fn stage(&self, dir: &Path) -> CommandOutput {
        self.run(dir, &["add", "."])
    }

    fn commit(&self, dir: &Path, message: &str) -> CommandOutput {
        self.run(dir, &["commit", "-am", message])
    }

    fn push(&self, dir: &Path) -> CommandOutput {
        self.run(dir, &["push", &self.remote, &self.branch])
    }
}

/// Runs `program` with an argument vector in `dir`, folding stderr into the output text.
pub fn run_captured(program: &str, args: &[&str], dir: &Path) -> CommandOutput {
    let mut captured = CommandOutput {
        program: program.to_owned(),
        args: args.iter().map(|a| (*a).to_owned()).collect(),
        dir: dir.to_path_buf(),
        success: false,
        output: String::new(),
    };

    match Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
    {
        Ok(out) => {
            captured.success = out.status.success();
            captured.output = String::from_utf8_lossy(&out.stdout).into_owned();
            captured
                .output
                .push_str(&String::from_utf8_lossy(&out.stderr));
        }
        Err(err) => {
            captured.output = format!("spawn {program}: {err}");
        }
    }

    if captured.success {
        tracing::debug!(program, ?args, dir = %dir.display(), output = %captured.output, "command ok");
    } else {
        tracing::warn!(program, ?args, dir = %dir.display(), output = %captured.output, "command failed");
    }
    captured
}

/// Runs the regeneration script (if it exists), then stage/commit/push for every
/// target in order. Each step runs even when the one before it failed.
pub fn publish(vcs: &dyn Vcs, regen_script: Option<&Path>, targets: &[PublishTarget]) -> PublishReport {
    let mut report = PublishReport::default();

    if let Some(script) = regen_script.filter(|s| s.is_file()) {
        tracing::info!(script = %script.display(), "run change-log regeneration script");
        match Command::new(script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) => {
                if !status.success() {
                    tracing::warn!(script = %script.display(), %status, "regeneration script failed");
                }
                report.regen_script_ran = true;
            }
            Err(err) => tracing::warn!(script = %script.display(), %err, "spawn regeneration script"),
        }
    }

    for target in targets {
        tracing::info!(dir = %target.dir.display(), message = %target.message, "publish");
        report.commands.push(vcs.stage(&target.dir));
        report.commands.push(vcs.commit(&target.dir, &target.message));
        report.commands.push(vcs.push(&target.dir));
    }

    report
}
