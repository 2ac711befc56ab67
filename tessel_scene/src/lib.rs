pub mod decode;
pub mod entity;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod record;
pub mod validate;
pub mod writer;

pub use decode::*;
pub use entity::*;
pub use error::*;
pub use lexer::*;
pub use parser::*;
pub use record::*;
pub use validate::*;
pub use writer::*;

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: &str = include_str!("../fixtures/cell.go");
    const UI: &str = include_str!("../fixtures/ui.go");
    const TOKEN: &str = include_str!("../fixtures/token.go");
    const GENERATOR_ICON: &str = include_str!("../fixtures/generator_icon.go");

    #[test]
    fn parse_validate_write_pipeline() {
        for src in [CELL, UI, TOKEN, GENERATOR_ICON] {
            let entity = parse_entity(src).expect("failed to parse");
            assert!(validate(&entity).is_empty(), "{:#?}", validate(&entity));
            assert_eq!(write_entity(&entity), src);
        }
    }

    #[test]
    fn hand_built_entity_matches_parsed_file() {
        let built = Entity::new()
            .with_component("ui_script", "/scripts/ui.script")
            .with_embedded(
                EmbeddedComponent::label(
                    "info_label",
                    LabelDesc::new(
                        "Label",
                        "/assets/iosevka.font",
                        "/builtins/fonts/label-df.material",
                        Vec2::new(300.0, 32.0),
                    ),
                )
                .with_position(Vec3::new(300.0, 420.0, 0.0)),
            );

        assert_eq!(parse_entity(UI).expect("failed to parse"), built);
        assert_eq!(write_entity(&built), UI);
    }

    #[test]
    fn every_embedded_type_is_recognized() {
        let entity = parse_entity(UI).expect("failed to parse");
        for embedded in &entity.embedded_components {
            assert!(EmbeddedKind::from_name(embedded.kind().as_str()).is_some());
        }
    }
}
