use std::path::{Path, PathBuf};

use tessel_io::{
    check_references, collect_descriptor_files, load_entity_file, load_entity_source,
    save_entity_file,
};
use tessel_project::ProjectConfig;
use tessel_scene::{Severity, parse_entity, source_has_comments, validate, write_entity};

#[derive(Debug, Default)]
pub struct CheckReport {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
    pub lines: Vec<String>,
}

impl CheckReport {
    fn push(&mut self, severity: Severity, line: String) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
        self.lines.push(line);
    }
}

#[derive(Debug, Default)]
pub struct FmtOutcome {
    pub changed: Vec<PathBuf>,
    pub failures: Vec<String>,
}

fn descriptor_files(project_dir: &Path, config: &ProjectConfig) -> Result<Vec<PathBuf>, String> {
    collect_descriptor_files(project_dir, &config.extensions)
        .map_err(|err| format!("failed to scan {}: {err}", project_dir.display()))
}

fn display_path<'a>(path: &'a Path, project_dir: &Path) -> std::path::Display<'a> {
    path.strip_prefix(project_dir).unwrap_or(path).display()
}

pub fn check_project(project_dir: &Path, config: &ProjectConfig) -> Result<CheckReport, String> {
    let mut report = CheckReport::default();

    for path in descriptor_files(project_dir, config)? {
        report.files += 1;
        let shown = display_path(&path, project_dir);

        let entity = match load_entity_file(&path) {
            Ok(entity) => entity,
            Err(err) => {
                log::debug!("{err:?}");
                report.push(Severity::Error, format!("error: {err}"));
                continue;
            }
        };

        for diagnostic in validate(&entity) {
            report.push(diagnostic.severity, format!("{shown}: {diagnostic}"));
        }

        if config.check_references {
            for missing in check_references(&entity, config, project_dir) {
                report.push(
                    Severity::Error,
                    format!(
                        "{shown}: error: `{}`: missing resource `{}` (looked for {})",
                        missing.field,
                        missing.resource,
                        missing.resolved.display()
                    ),
                );
            }
        }
    }

    Ok(report)
}

/// Rewrites every descriptor that differs from its canonical layout. With
/// `write == false` only reports which files would change. Files holding
/// comments are left alone and listed as failures.
pub fn fmt_project(
    project_dir: &Path,
    config: &ProjectConfig,
    write: bool,
) -> Result<FmtOutcome, String> {
    let mut outcome = FmtOutcome::default();

    for path in descriptor_files(project_dir, config)? {
        let src = match load_entity_source(&path) {
            Ok(src) => src,
            Err(err) => {
                outcome.failures.push(err.to_string());
                continue;
            }
        };
        let entity = match parse_entity(&src) {
            Ok(entity) => entity,
            Err(err) => {
                outcome
                    .failures
                    .push(format!("{}: {err}", display_path(&path, project_dir)));
                continue;
            }
        };

        if matches!(source_has_comments(&src), Ok(true)) {
            outcome.failures.push(format!(
                "{}: contains comments, which formatting would drop",
                display_path(&path, project_dir)
            ));
            continue;
        }

        if write_entity(&entity) == src {
            continue;
        }
        if write {
            save_entity_file(&path, &entity).map_err(|err| err.to_string())?;
        }
        outcome.changed.push(path);
    }

    Ok(outcome)
}

pub fn dump_file(path: &Path) -> Result<String, String> {
    let entity = load_entity_file(path).map_err(|err| err.to_string())?;
    serde_json::to_string_pretty(&entity)
        .map_err(|err| format!("failed to serialize {}: {err}", path.display()))
}
