pub mod discovery;
pub mod entity_io;
pub mod error;
pub mod references;

pub use discovery::*;
pub use entity_io::*;
pub use error::*;
pub use references::*;

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use tessel_project::ProjectConfig;
    use tessel_scene::{EmbeddedComponent, Entity, LabelDesc, SceneError, SpriteDesc, Vec2, Vec3};

    use super::*;

    static TEST_DIR_SEQ: AtomicU64 = AtomicU64::new(0);

    fn temp_test_dir() -> PathBuf {
        let seq = TEST_DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let pid = std::process::id();
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tessel_io_test_{pid}_{nonce}_{seq}"))
    }

    fn token_entity() -> Entity {
        Entity::new()
            .with_component("token", "/scripts/token.script")
            .with_embedded(EmbeddedComponent::sprite(
                "sprite",
                SpriteDesc::new("token", "/builtins/materials/sprite.material", "/assets/tile.atlas"),
            ))
            .with_embedded(
                EmbeddedComponent::label(
                    "label",
                    LabelDesc::new(
                        "x",
                        "/builtins/fonts/default.font",
                        "/builtins/fonts/label-df.material",
                        Vec2::new(64.0, 64.0),
                    ),
                )
                .with_position(Vec3::new(0.0, 0.0, 0.5)),
            )
    }

    #[test]
    fn collects_descriptors_sorted_and_skips_hidden() -> io::Result<()> {
        let base = temp_test_dir();
        fs::create_dir_all(base.join("main/nested"))?;
        fs::create_dir_all(base.join(".git"))?;
        fs::create_dir_all(base.join("target"))?;

        fs::write(base.join("main/token.go"), "")?;
        fs::write(base.join("main/cell.go"), "")?;
        fs::write(base.join("main/nested/ui.go"), "")?;
        fs::write(base.join("main/ui.script"), "")?;
        fs::write(base.join(".git/stale.go"), "")?;
        fs::write(base.join("target/copy.go"), "")?;

        let files = collect_descriptor_files(&base, &["go".to_string()])?;
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(&base).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("main/cell.go"),
                PathBuf::from("main/nested/ui.go"),
                PathBuf::from("main/token.go"),
            ]
        );

        let _ = fs::remove_dir_all(&base);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_loop_is_not_followed() -> io::Result<()> {
        let base = temp_test_dir();
        fs::create_dir_all(base.join("main"))?;
        fs::write(base.join("main/a.go"), "")?;
        std::os::unix::fs::symlink(&base, base.join("main/loop"))?;

        let files = collect_descriptor_files(&base, &["go".to_string()])?;
        assert_eq!(files, vec![base.join("main/a.go")]);

        let _ = fs::remove_dir_all(&base);
        Ok(())
    }

    #[test]
    fn save_then_load_entity_file() {
        let base = temp_test_dir();
        let path = base.join("main").join("token.go");
        let entity = token_entity();

        save_entity_file(&path, &entity).expect("save");
        let loaded = load_entity_file(&path).expect("load");
        assert_eq!(loaded, entity);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn load_reports_path_with_scene_error() {
        let base = temp_test_dir();
        fs::create_dir_all(&base).expect("mkdir");
        let path = base.join("broken.go");
        fs::write(&path, "components {\n").expect("write");

        let err = load_entity_file(&path).expect_err("expected failure");
        assert!(matches!(
            err,
            IoError::Scene {
                source: SceneError::Syntax { .. },
                ..
            }
        ));
        assert!(err.to_string().contains("broken.go"));

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let err = load_entity_file(&temp_test_dir().join("absent.go")).expect_err("expected failure");
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn resource_refs_lists_every_path_field() {
        let entity = token_entity();
        let refs = resource_refs(&entity);
        assert_eq!(
            refs.iter().map(|(field, _)| field.as_str()).collect::<Vec<_>>(),
            [
                "components[0].component",
                "embedded_components[0].data.material",
                "embedded_components[0].data.textures[0].texture",
                "embedded_components[1].data.font",
                "embedded_components[1].data.material",
            ]
        );
    }

    #[test]
    fn check_references_reports_only_missing_project_files() {
        let base = temp_test_dir();
        fs::create_dir_all(base.join("scripts")).expect("mkdir");
        fs::write(base.join("scripts/token.script"), "").expect("write");

        let config = ProjectConfig::default_for_name("Tiles");
        let missing = check_references(&token_entity(), &config, &base);

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].field, "embedded_components[0].data.textures[0].texture");
        assert_eq!(missing[0].resource, "/assets/tile.atlas");
        assert_eq!(missing[0].resolved, base.join("assets").join("tile.atlas"));

        let _ = fs::remove_dir_all(&base);
    }
}
