use std::path::{Path, PathBuf};

use tessel_project::ProjectConfig;
use tessel_scene::{EmbeddedData, Entity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    /// Field path inside the descriptor, e.g. `components[0].component`.
    pub field: String,
    pub resource: String,
    pub resolved: PathBuf,
}

/// Every resource path an entity points at, with the field it came from.
pub fn resource_refs(entity: &Entity) -> Vec<(String, &str)> {
    let mut refs = Vec::new();

    for (i, component) in entity.components.iter().enumerate() {
        refs.push((
            format!("components[{i}].component"),
            component.component.as_str(),
        ));
    }

    for (i, embedded) in entity.embedded_components.iter().enumerate() {
        let base = format!("embedded_components[{i}].data");
        match &embedded.data {
            EmbeddedData::Sprite(sprite) => {
                refs.push((format!("{base}.material"), sprite.material.as_str()));
                for (t, texture) in sprite.textures.iter().enumerate() {
                    refs.push((
                        format!("{base}.textures[{t}].texture"),
                        texture.texture.as_str(),
                    ));
                }
            }
            EmbeddedData::Label(label) => {
                refs.push((format!("{base}.font"), label.font.as_str()));
                refs.push((format!("{base}.material"), label.material.as_str()));
            }
        }
    }

    refs
}

/// Resources that resolve into the project tree but are not on disk.
/// Builtin and non-absolute paths are not checked here.
pub fn check_references(
    entity: &Entity,
    config: &ProjectConfig,
    project_root: &Path,
) -> Vec<MissingReference> {
    resource_refs(entity)
        .into_iter()
        .filter_map(|(field, resource)| {
            let resolved = config.resolve(resource, project_root)?;
            if resolved.exists() {
                return None;
            }
            Some(MissingReference {
                field,
                resource: resource.to_string(),
                resolved,
            })
        })
        .collect()
}
