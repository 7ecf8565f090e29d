//! Install commands, then the rules each command's role refers to.
//!
//! Phase 1 walks `commands/`, records `role -> [rule ids]` from each command's
//! "Related Rules" section and copies the command into `.cursor/commands/`.
//! Phase 2 walks `rules/` once per role and copies only the rules that role
//! refers to into `.cursor/rules/mozi/<role>/`.

use std::collections::{BTreeMap, HashSet};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::conflict::Resolver;
use crate::console::Console;
use crate::error::{MoziError, Result};
use crate::paths;
use crate::rules;
use crate::store::ContentStore;
use crate::tools::ExternalTools;

/// Rule identifiers referenced by each role, in the order found.
pub type RoleRules = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub commands: usize,
    pub rules_by_role: BTreeMap<String, usize>,
    pub role_rules: RoleRules,
}

impl InstallReport {
    pub fn total_rules(&self) -> usize {
        self.rules_by_role.values().sum()
    }
}

pub struct Installer<'a, S: ?Sized, T: ?Sized> {
    store: &'a S,
    resolver: Resolver<'a, S, T>,
    base: PathBuf,
}

impl<'a, S, T> Installer<'a, S, T>
where
    S: ContentStore + ?Sized,
    T: ExternalTools + ?Sized,
{
    pub fn new(store: &'a S, tools: &'a T, base: impl Into<PathBuf>) -> Self {
        Self {
            store,
            resolver: Resolver::new(store, tools),
            base: base.into(),
        }
    }

    /// Install every command and its role's rules. Any error aborts the run;
    /// files already written stay in place.
    pub fn run<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<InstallReport> {
        let cursor_dir = paths::cursor_dir(&self.base);
        crate::io::ensure_dir(&paths::commands_dir(&self.base))?;

        console.line(format!(
            "Installing commands and rules to {}",
            cursor_dir.display()
        ))?;
        console.blank()?;

        let (role_rules, commands) = self.install_commands(console)?;

        let mut rules_by_role = BTreeMap::new();
        for (role, rule_ids) in &role_rules {
            let count = self.install_rules_for_role(console, role, rule_ids)?;
            rules_by_role.insert(role.clone(), count);
        }

        let report = InstallReport {
            commands,
            rules_by_role,
            role_rules,
        };

        console.blank()?;
        console.line(format!(
            "✓ Successfully installed {} commands and {} rules to {}",
            report.commands,
            report.total_rules(),
            cursor_dir.display()
        ))?;

        Ok(report)
    }

    /// Copy command documents into place and collect each role's rule list.
    /// Returns the mapping and how many commands were actually written.
    pub fn install_commands<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<(RoleRules, usize)> {
        let mut role_rules = RoleRules::new();
        let mut count = 0;

        for entry in self.store.entries(paths::COMMANDS_GROUP) {
            if !entry.is_document() || !paths::has_extension(&entry.path, paths::COMMAND_EXT) {
                continue;
            }
            let source = entry.path.as_str();
            let role = paths::document_stem(source).to_string();

            let rule_ids = rules::rules_for_command(self.store, source)
                .map_err(|e| MoziError::installing(source, e))?;
            tracing::debug!(role = %role, rules = ?rule_ids, "bound rules to role");
            role_rules.insert(role, rule_ids);

            let relative = paths::relative_to_group(paths::COMMANDS_GROUP, source);
            let dest = paths::command_target(&self.base, relative);
            if let Some(parent) = dest.parent() {
                crate::io::ensure_dir(parent).map_err(|e| MoziError::installing(source, e))?;
            }

            let outcome = self
                .resolver
                .install(console, source, &dest)
                .map_err(|e| MoziError::installing(source, e))?;
            if outcome.is_installed() {
                console.line(format!("  ✓ Installed command: {relative}"))?;
                count += 1;
            }
        }

        Ok((role_rules, count))
    }

    /// Copy the rule documents `rule_ids` refers to into the role's directory.
    /// Rules the role does not mention are left alone.
    pub fn install_rules_for_role<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
        role: &str,
        rule_ids: &[String],
    ) -> Result<usize> {
        let wanted: HashSet<&str> = rule_ids.iter().map(String::as_str).collect();
        let mut count = 0;

        for entry in self.store.entries(paths::RULES_GROUP) {
            if !entry.is_document() || !paths::has_extension(&entry.path, paths::RULE_EXT) {
                continue;
            }
            let source = entry.path.as_str();
            let rule_id = paths::document_stem(source);
            if !wanted.contains(rule_id) {
                tracing::trace!(role, rule_id, "rule not referenced by role");
                continue;
            }

            let dest = paths::rule_target(&self.base, role, rule_id);
            let outcome = self
                .resolver
                .install(console, source, &dest)
                .map_err(|e| MoziError::installing(source, e))?;
            if outcome.is_installed() {
                console.line(format!("  ✓ Installed rule for {role}: {rule_id}"))?;
                count += 1;
            }
        }

        Ok(count)
    }
}
