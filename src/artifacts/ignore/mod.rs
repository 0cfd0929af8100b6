//! Ignore rule parsing and path matching
//!
//! Rules come from two kinds of sources. Scoped rulesets are the
//! `.gitignore` files recorded in the index, read back from the object
//! store and keyed by their containing directory. Absolute rulesets
//! apply repository-wide: `.git/info/exclude` and the user's global
//! ignore file.
//!
//! A path is checked against the scoped ruleset of its nearest
//! ancestor first; within a file the last matching rule wins, and the
//! first scope producing any match decides. Only when no scope matches
//! do the absolute rulesets get a say, in registration order.

use crate::areas::database::Database;
use crate::areas::index::Index;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const IGNORE_FILE_NAME: &str = ".gitignore";

/// One parsed ignore line: the pattern and whether a match means the
/// path is ignored (`!` lines flip this to false).
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: glob::Pattern,
    ignored: bool,
}

impl IgnoreRule {
    /// Parse a single line. Comments, blank lines and unparsable
    /// patterns yield no rule.
    fn parse(line: &str) -> Option<IgnoreRule> {
        let line = line.trim();

        let (raw, ignored) = match line.chars().next() {
            None | Some('#') => return None,
            Some('!') => (&line[1..], false),
            Some('\\') => (&line[1..], true),
            Some(_) => (line, true),
        };

        let pattern = glob::Pattern::new(raw).ok()?;
        Some(IgnoreRule { pattern, ignored })
    }
}

fn parse_rules(content: &str) -> Vec<IgnoreRule> {
    content.lines().filter_map(IgnoreRule::parse).collect()
}

/// Last matching rule in file order decides; no match is None.
fn check_rules(rules: &[IgnoreRule], path: &str) -> Option<bool> {
    let mut result = None;
    for rule in rules {
        if rule.pattern.matches(path) {
            result = Some(rule.ignored);
        }
    }
    result
}

/// All ignore rules applicable to a repository.
#[derive(Debug, Default)]
pub struct IgnoreRules {
    /// `.gitignore` rulesets keyed by the directory holding the file
    scoped: BTreeMap<PathBuf, Vec<IgnoreRule>>,
    /// repository-wide rulesets, in registration order
    absolute: Vec<Vec<IgnoreRule>>,
}

impl IgnoreRules {
    /// Collect every ruleset: staged `.gitignore` blobs, the
    /// repository's `info/exclude` and the user's global ignore file.
    pub fn load(
        index: &Index,
        database: &Database,
        metadata_path: &Path,
    ) -> anyhow::Result<IgnoreRules> {
        let mut rules = IgnoreRules::default();

        for entry in index.entries() {
            if entry.name.file_name().and_then(|name| name.to_str()) != Some(IGNORE_FILE_NAME) {
                continue;
            }

            let blob = database
                .parse_object_as_blob(&entry.oid)?
                .with_context(|| format!("staged ignore file is not a blob: {:?}", entry.name))?;
            let content = String::from_utf8_lossy(blob.content()).to_string();

            let scope = entry.name.parent().map(PathBuf::from).unwrap_or_default();
            rules.scoped.insert(scope, parse_rules(&content));
        }

        let exclude_path = metadata_path.join("info").join("exclude");
        if let Some(ruleset) = read_rules_file(&exclude_path)? {
            rules.absolute.push(ruleset);
        }

        if let Some(global_path) = global_ignore_path()
            && let Some(ruleset) = read_rules_file(&global_path)?
        {
            rules.absolute.push(ruleset);
        }

        Ok(rules)
    }

    /// Whether the given worktree-relative path is ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();

        let mut scope = path.parent();
        while let Some(dir) = scope {
            if let Some(ruleset) = self.scoped.get(dir)
                && let Some(decision) = check_rules(ruleset, &name)
            {
                return decision;
            }
            scope = dir.parent();
        }

        for ruleset in &self.absolute {
            if let Some(decision) = check_rules(ruleset, &name) {
                return decision;
            }
        }

        false
    }
}

fn read_rules_file(path: &Path) -> anyhow::Result<Option<Vec<IgnoreRule>>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    Ok(Some(parse_rules(&content)))
}

fn global_ignore_path() -> Option<PathBuf> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(config_home).join("git").join("ignore"));
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("git").join("ignore"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ruleset(lines: &str) -> Vec<IgnoreRule> {
        parse_rules(lines)
    }

    #[rstest]
    #[case("# only a comment\n\n", 0)]
    #[case("*.log\n!keep.log\n", 2)]
    #[case("\\#literal\n", 1)]
    fn skips_comments_and_blanks(#[case] content: &str, #[case] parsed: usize) {
        assert_eq!(ruleset(content).len(), parsed);
    }

    #[test]
    fn last_matching_rule_wins() {
        let rules = ruleset("*.log\n!important.log\n");

        assert_eq!(check_rules(&rules, "debug.log"), Some(true));
        assert_eq!(check_rules(&rules, "important.log"), Some(false));
        assert_eq!(check_rules(&rules, "notes.txt"), None);
    }

    #[test]
    fn escaped_leading_bang_is_literal() {
        let rules = ruleset("\\!readme\n");

        assert_eq!(check_rules(&rules, "!readme"), Some(true));
        assert_eq!(check_rules(&rules, "readme"), None);
    }

    #[test]
    fn patterns_reach_across_directories() {
        // fnmatch semantics, `*` is allowed to cross `/`
        let rules = ruleset("*.log\n");

        assert_eq!(check_rules(&rules, "src/deep/trace.log"), Some(true));
    }

    #[test]
    fn nearest_scope_decides_before_absolute_rules() {
        let mut rules = IgnoreRules::default();
        rules
            .scoped
            .insert(PathBuf::from("src"), ruleset("!src/generated.rs\n"));
        rules.absolute.push(ruleset("*.rs\n"));

        assert!(!rules.is_ignored(Path::new("src/generated.rs")));
        assert!(rules.is_ignored(Path::new("src/main.rs")));
        assert!(rules.is_ignored(Path::new("lib.rs")));
    }

    #[test]
    fn unmatched_paths_are_not_ignored() {
        let rules = IgnoreRules::default();
        assert!(!rules.is_ignored(Path::new("anything/at/all.txt")));
    }
}
