use anyhow::Context;
use mozi_core::{console::Console, install::Installer, paths, tools::SystemTools};
use std::path::Path;

use crate::templates;

/// `mozi install` — copy bundled commands and their role-bound rules into
/// `<base>/.cursor/`, prompting on every conflicting file.
pub fn run(dir: Option<&Path>, home: bool, editor: &str) -> anyhow::Result<()> {
    let base = paths::resolve_base(dir, home).context("cannot resolve target directory")?;
    tracing::info!(base = %base.display(), editor, "installing");

    let store = templates::store();
    let tools = SystemTools::new(editor);
    let mut console = Console::stdio();

    let report = Installer::new(&store, &tools, &base)
        .run(&mut console)
        .with_context(|| format!("failed to install into {}", paths::cursor_dir(&base).display()))?;

    tracing::debug!(
        commands = report.commands,
        rules = report.total_rules(),
        roles = report.role_rules.len(),
        "install finished"
    );
    Ok(())
}
