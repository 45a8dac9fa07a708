//! Per-file orchestration of the call-site and style-table passes.

use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::callsite::migrate_call_sites;
use crate::config::Config;
use crate::context::ContextEvaluator;
use crate::error::Result;
use crate::extract::extract_style_table;
use crate::imports::{add_default_import, add_named_exports, has_named_imports, remove_named_imports};
use crate::log::ErrorLog;
use crate::source::{Dialect, Document};

/// Result of migrating one file. Nothing has been written yet.
#[derive(Debug)]
pub struct Migration {
    pub source: String,
    pub stylesheet: Option<Stylesheet>,
    pub changed: bool,
}

/// Sibling stylesheet produced from the file's style table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub path: PathBuf,
    /// Stylesheet text with its final newline.
    pub contents: String,
}

#[derive(Debug)]
pub struct Migrator {
    config: Config,
    context: ContextEvaluator,
    errors: ErrorLog,
}

impl Migrator {
    pub fn new(config: Config) -> Self {
        Self {
            context: ContextEvaluator::new(config.context_path.clone()),
            errors: ErrorLog::new(config.error_log_path.clone()),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Migrate `source`, read from `path`. A failure is appended to the error
    /// log before it is returned.
    pub fn migrate(&self, path: &Path, source: &str) -> Result<Migration> {
        self.transform(path, source).inspect_err(|err| {
            error!(file = %path.display(), "{err}");
            if let Err(log_err) = self.errors.record(&err.to_string(), path) {
                warn!(log = %self.errors.path().display(), "could not record failure: {log_err}");
            }
        })
    }

    fn transform(&self, path: &Path, source: &str) -> Result<Migration> {
        let config = &self.config;
        let module = config.helper_module.as_str();
        let helper = config.helper_name.as_str();
        let factory = config.factory_object.as_str();

        let mut doc = Document::parse(source, Dialect::from_path(path))?;
        let has_helper_import = has_named_imports(&doc, module, &[helper])?;
        let has_factory_import = has_named_imports(&doc, module, &[factory])?;
        debug!(file = %path.display(), has_helper_import, has_factory_import, "scanned imports");

        if has_helper_import {
            let calls = migrate_call_sites(&doc, config)?;
            doc = doc.reparse(calls.source)?;
            if calls.fully_migrated {
                doc = doc.reparse(remove_named_imports(&doc, module, &[helper])?)?;
            }
            if calls.used_composer {
                doc = doc.reparse(add_default_import(&doc, &config.composer_module, &config.composer_name)?)?;
            }
        }

        let mut stylesheet = None;
        if has_factory_import {
            let extraction = extract_style_table(&doc, config, &self.context)?;
            if let Some(table) = extraction.table {
                doc = doc.reparse(extraction.source)?;
                doc = doc.reparse(remove_named_imports(&doc, module, &[factory])?)?;

                let (sheet_path, import_path) = stylesheet_paths(path, &config.stylesheet_suffix);
                doc = doc.reparse(add_default_import(&doc, &import_path, &table.name)?)?;
                if table.exported {
                    doc = doc.reparse(add_named_exports(doc.text(), &[table.name.as_str()]))?;
                }

                stylesheet = Some(Stylesheet {
                    path: sheet_path,
                    contents: format!("{}\n", table.css),
                });
            }
        }

        let source_out = doc.into_text();
        Ok(Migration {
            changed: source_out != source || stylesheet.is_some(),
            source: source_out,
            stylesheet,
        })
    }
}

/// `(file path, import specifier)` of the stylesheet next to `source`:
/// `src/A.tsx` gives `src/A.module.css` imported as `./A.module.css`.
pub fn stylesheet_paths(source: &Path, suffix: &str) -> (PathBuf, String) {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{stem}{suffix}");
    (source.with_file_name(&file_name), format!("./{file_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MigrateError;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn migrator(dir: &Path) -> Migrator {
        fs::write(
            dir.join("context.js"),
            "const colors = { primary: 'var(--bs-primary)' };\n",
        )
        .unwrap();
        Migrator::new(Config {
            error_log_path: dir.join("errors.txt"),
            context_path: dir.join("context.js"),
            ..Config::default()
        })
    }

    #[test]
    fn stylesheet_sits_next_to_the_source() {
        let (path, import) = stylesheet_paths(Path::new("src/components/Card.tsx"), ".module.css");
        assert_eq!(path, PathBuf::from("src/components/Card.module.css"));
        assert_eq!(import, "./Card.module.css");
    }

    #[test]
    fn migrates_calls_and_table() {
        let dir = tempfile::tempdir().unwrap();
        let src = r#"import { css, StyleSheet } from "aphrodite";

export const Card = ({ active }) => (
  <div className={css(styles.card, active && styles.active)}>
    <span className={css(styles.title)} />
  </div>
);

const styles = StyleSheet.create({
  card: { padding: 8, color: colors.primary },
  active: { opacity: 1 },
  title: { fontSize: 12 },
});
"#;
        let out = migrator(dir.path()).migrate(Path::new("src/Card.jsx"), src).unwrap();
        assert_eq!(
            out.source,
            r#"import styles from "./Card.module.css";
import classNames from "classnames";

export const Card = ({ active }) => (
  <div className={// TODO: check CSS precedence
  classNames(styles.card, active && styles.active)}>
    <span className={styles.title} />
  </div>
);
"#
        );
        let sheet = out.stylesheet.unwrap();
        assert_eq!(sheet.path, PathBuf::from("src/Card.module.css"));
        assert_eq!(
            sheet.contents,
            ".card {\n  padding: 8px;\n  color: var(--bs-primary);\n}\n\n.active {\n  opacity: 1;\n}\n\n.title {\n  font-size: 12px;\n}\n"
        );
        assert!(out.changed);
    }

    #[test]
    fn files_without_helper_imports_are_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let src = "const a = css(s.a);\nconst styles = StyleSheet.create({ a: { top: 1 } });\n";
        let out = migrator(dir.path()).migrate(Path::new("A.js"), src).unwrap();
        assert_eq!(out.source, src);
        assert!(out.stylesheet.is_none());
        assert!(!out.changed);
    }

    #[test]
    fn exported_tables_are_re_exported() {
        let dir = tempfile::tempdir().unwrap();
        let src = "import { StyleSheet } from \"aphrodite\";\n\nexport const styles = StyleSheet.create({ a: { top: 1 } });\n\nexport default 1;\n";
        let out = migrator(dir.path()).migrate(Path::new("A.ts"), src).unwrap();
        assert_eq!(
            out.source,
            "import styles from \"./A.module.css\";\nexport default 1;\n\nexport { styles };\n"
        );
    }

    #[test]
    fn failures_are_logged_with_the_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let migrator = migrator(dir.path());
        let src = "import { css } from \"aphrodite\";\nconst a = css(s);\n";

        let err = migrator.migrate(Path::new("src/Bad.js"), src).unwrap_err();
        assert!(matches!(err, MigrateError::UnhandledShape { .. }));

        let log = fs::read_to_string(dir.path().join("errors.txt")).unwrap();
        assert_eq!(log, "arg.type of \"identifier\" is not handled src/Bad.js\n");
    }
}
