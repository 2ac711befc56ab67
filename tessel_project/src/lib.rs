use std::{
    fmt::{Display, Formatter},
    fs,
    path::{Path, PathBuf},
};
use toml::Value;

pub const PROJECT_FILE: &str = "tessel.toml";

const DEFAULT_EXTENSIONS: &[&str] = &["go"];
const DEFAULT_BUILTIN_PREFIXES: &[&str] = &["/builtins/"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    /// Directory that absolute virtual paths resolve against, relative to the project root.
    pub assets_root: String,
    pub extensions: Vec<String>,
    pub builtin_prefixes: Vec<String>,
    pub check_references: bool,
}

impl ProjectConfig {
    pub fn default_for_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assets_root: ".".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            builtin_prefixes: DEFAULT_BUILTIN_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            check_references: true,
        }
    }

    /// Engine-provided resources never exist in the project tree.
    pub fn is_builtin(&self, path: &str) -> bool {
        self.builtin_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn assets_dir(&self, project_root: &Path) -> PathBuf {
        if self.assets_root == "." || self.assets_root.is_empty() {
            return project_root.to_path_buf();
        }
        project_root.join(&self.assets_root)
    }

    /// Disk location of a virtual path, or `None` for builtin and non-absolute paths.
    pub fn resolve(&self, path: &str, project_root: &Path) -> Option<PathBuf> {
        if self.is_builtin(path) {
            return None;
        }
        resolve_virtual_path(path, &self.assets_dir(project_root))
    }
}

#[derive(Debug)]
pub enum ProjectError {
    Io(std::io::Error),
    ParseToml(toml::de::Error),
    MissingField(&'static str),
    InvalidField(&'static str, String),
    AlreadyExists(PathBuf),
}

impl Display for ProjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::ParseToml(err) => write!(f, "{err}"),
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::InvalidField(field, reason) => write!(f, "invalid field `{field}`: {reason}"),
            Self::AlreadyExists(path) => {
                write!(f, "project directory already exists: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ProjectError {}

impl From<std::io::Error> for ProjectError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::de::Error> for ProjectError {
    fn from(value: toml::de::Error) -> Self {
        Self::ParseToml(value)
    }
}

/// Maps `/a/b.ext` onto `assets_root/a/b.ext`. Returns `None` for paths that
/// are not absolute virtual paths or that climb out with `..`.
pub fn resolve_virtual_path(input: &str, assets_root: &Path) -> Option<PathBuf> {
    let rel = input.strip_prefix('/')?;
    let mut resolved = assets_root.to_path_buf();
    for part in rel.split('/') {
        match part {
            "" | "." => {}
            ".." => return None,
            part => resolved.push(part),
        }
    }
    Some(resolved)
}

/// Walks up from `start` to the first directory holding a project file.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_FILE).is_file())
        .map(Path::to_path_buf)
}

pub fn create_new_project(project_root: &Path, project_name: &str) -> Result<(), ProjectError> {
    if project_root.exists() {
        return Err(ProjectError::AlreadyExists(project_root.to_path_buf()));
    }
    fs::create_dir_all(project_root)?;
    ensure_project_toml(project_root, project_name)?;
    ensure_project_scaffold(project_root)?;
    log::debug!("created project `{project_name}` at {}", project_root.display());
    Ok(())
}

pub fn ensure_project_scaffold(root: &Path) -> std::io::Result<()> {
    let main_dir = root.join("main");
    let scripts_dir = root.join("scripts");
    fs::create_dir_all(&main_dir)?;
    fs::create_dir_all(&scripts_dir)?;

    write_if_missing(main_dir.join("main.go"), &default_main_descriptor())?;
    write_if_missing(scripts_dir.join("main.script"), &default_main_script())?;
    Ok(())
}

pub fn ensure_project_toml(root: &Path, default_name: &str) -> std::io::Result<()> {
    let project_toml = root.join(PROJECT_FILE);
    if project_toml.exists() {
        return Ok(());
    }
    fs::write(project_toml, default_project_toml(default_name))
}

pub fn default_project_toml(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
assets_root = "."

[check]
extensions = ["go"]
builtin_prefixes = ["/builtins/"]
check_references = true
"#
    )
}

pub fn load_project_toml(root: &Path) -> Result<ProjectConfig, ProjectError> {
    let path = root.join(PROJECT_FILE);
    log::debug!("loading {}", path.display());
    let project_toml = fs::read_to_string(path)?;
    parse_project_toml(&project_toml)
}

pub fn parse_project_toml(contents: &str) -> Result<ProjectConfig, ProjectError> {
    let value: Value = contents.parse::<Value>()?;
    let project_table = value
        .get("project")
        .and_then(Value::as_table)
        .ok_or(ProjectError::MissingField("project"))?;

    let name = project_table
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ProjectError::MissingField("project.name"))?
        .to_string();

    let mut config = ProjectConfig::default_for_name(name);

    if let Some(raw) = project_table.get("assets_root") {
        let assets_root = raw.as_str().ok_or_else(|| {
            ProjectError::InvalidField("project.assets_root", "must be a string".to_string())
        })?;
        if Path::new(assets_root).is_absolute() {
            return Err(ProjectError::InvalidField(
                "project.assets_root",
                "must be relative to the project root".to_string(),
            ));
        }
        config.assets_root = assets_root.to_string();
    }

    let Some(check) = value.get("check") else {
        return Ok(config);
    };
    let check = check.as_table().ok_or_else(|| {
        ProjectError::InvalidField("check", "must be a table".to_string())
    })?;

    if let Some(raw) = check.get("extensions") {
        let extensions = string_list("check.extensions", raw)?;
        if extensions.is_empty() {
            return Err(ProjectError::InvalidField(
                "check.extensions",
                "at least one extension is required".to_string(),
            ));
        }
        config.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
    }

    if let Some(raw) = check.get("builtin_prefixes") {
        let prefixes = string_list("check.builtin_prefixes", raw)?;
        if let Some(bad) = prefixes.iter().find(|p| !p.starts_with('/')) {
            return Err(ProjectError::InvalidField(
                "check.builtin_prefixes",
                format!("`{bad}` must start with `/`"),
            ));
        }
        config.builtin_prefixes = prefixes;
    }

    if let Some(raw) = check.get("check_references") {
        config.check_references = raw.as_bool().ok_or_else(|| {
            ProjectError::InvalidField("check.check_references", "must be a boolean".to_string())
        })?;
    }

    Ok(config)
}

fn string_list(field: &'static str, raw: &Value) -> Result<Vec<String>, ProjectError> {
    let invalid = || ProjectError::InvalidField(field, "must be an array of strings".to_string());
    raw.as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

fn write_if_missing(path: PathBuf, contents: &str) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, contents)
}

fn default_main_descriptor() -> String {
    r#"components {
  id: "main"
  component: "/scripts/main.script"
}
embedded_components {
  id: "title"
  type: "label"
  data: "size {\n"
  "  x: 256.0\n"
  "  y: 32.0\n"
  "}\n"
  "text: \"Hello\"\n"
  "font: \"/builtins/fonts/default.font\"\n"
  "material: \"/builtins/fonts/label-df.material\"\n"
  ""
  position {
    x: 480.0
    y: 320.0
  }
}
"#
    .to_string()
}

fn default_main_script() -> String {
    r#"function init(self)
end
"#
    .to_string()
}
