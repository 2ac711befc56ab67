use std::{fs, path::Path};

use tessel_scene::{Entity, parse_entity, write_entity};

use crate::IoError;

pub fn load_entity_source(path: &Path) -> Result<String, IoError> {
    fs::read_to_string(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_entity_file(path: &Path) -> Result<Entity, IoError> {
    let src = load_entity_source(path)?;
    let entity = parse_entity(&src).map_err(|source| IoError::Scene {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "loaded {} ({} components, {} embedded)",
        path.display(),
        entity.components.len(),
        entity.embedded_components.len()
    );
    Ok(entity)
}

/// Writes the canonical layout, creating parent directories as needed.
pub fn save_entity_file(path: &Path, entity: &Entity) -> Result<(), IoError> {
    let write_err = |source| IoError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(path, write_entity(entity)).map_err(write_err)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
