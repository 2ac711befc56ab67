use std::fmt::{Display, Formatter};

use crate::{EmbeddedData, Entity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: `{}`: {}", self.severity, self.path, self.message)
    }
}

struct Lints {
    out: Vec<Diagnostic>,
}

impl Lints {
    fn push(&mut self, severity: Severity, path: String, message: impl Into<String>) {
        self.out.push(Diagnostic {
            severity,
            path,
            message: message.into(),
        });
    }

    fn id(&mut self, path: String, id: &str) {
        if id.trim().is_empty() {
            self.push(Severity::Error, path, "id is empty");
        }
    }

    fn resource(&mut self, path: String, value: &str, extension: Option<&str>) {
        if !value.starts_with('/') {
            self.push(
                Severity::Error,
                path,
                format!("resource `{value}` is not an absolute virtual path"),
            );
            return;
        }
        if let Some(ext) = extension {
            if !value.ends_with(ext) {
                self.push(
                    Severity::Warning,
                    path,
                    format!("resource `{value}` does not end in `{ext}`"),
                );
            }
        }
    }
}

/// Lints an already decoded entity. Decoding enforces the schema; this
/// catches values that are well-typed but unlikely to load.
pub fn validate(entity: &Entity) -> Vec<Diagnostic> {
    let mut lints = Lints { out: Vec::new() };

    for (i, component) in entity.components.iter().enumerate() {
        let base = format!("components[{i}]");
        lints.id(format!("{base}.id"), &component.id);
        lints.resource(
            format!("{base}.component"),
            &component.component,
            Some(".script"),
        );
    }

    for (i, embedded) in entity.embedded_components.iter().enumerate() {
        let base = format!("embedded_components[{i}]");
        lints.id(format!("{base}.id"), &embedded.id);

        match &embedded.data {
            EmbeddedData::Sprite(sprite) => {
                lints.resource(
                    format!("{base}.data.material"),
                    &sprite.material,
                    Some(".material"),
                );
                for (t, texture) in sprite.textures.iter().enumerate() {
                    lints.resource(
                        format!("{base}.data.textures[{t}].texture"),
                        &texture.texture,
                        None,
                    );
                }
                if sprite.default_animation.is_empty() {
                    lints.push(
                        Severity::Warning,
                        format!("{base}.data.default_animation"),
                        "default animation is empty",
                    );
                }
            }
            EmbeddedData::Label(label) => {
                lints.resource(format!("{base}.data.font"), &label.font, Some(".font"));
                lints.resource(
                    format!("{base}.data.material"),
                    &label.material,
                    Some(".material"),
                );
                if label.size.x <= 0.0 || label.size.y <= 0.0 {
                    lints.push(
                        Severity::Warning,
                        format!("{base}.data.size"),
                        "label size should be positive",
                    );
                }
            }
        }
    }

    lints.out
}
