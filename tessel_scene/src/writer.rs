use crate::{
    Color, EmbeddedComponent, EmbeddedData, Entity, LabelDesc, Quat, SpriteDesc, TextRecord,
    TextValue, Vec2, Vec3,
};

const INDENT: &str = "  ";

/// Renders an entity in the canonical layout.
pub fn write_entity(entity: &Entity) -> String {
    write_record(&encode_entity(entity))
}

pub fn write_record(record: &TextRecord) -> String {
    let mut out = String::new();
    write_fields(&mut out, record, 0);
    out
}

fn write_fields(out: &mut String, record: &TextRecord, depth: usize) {
    let pad = INDENT.repeat(depth);
    for (key, value) in &record.fields {
        match value {
            TextValue::Block(inner) => {
                out.push_str(&format!("{pad}{key} {{\n"));
                write_fields(out, inner, depth + 1);
                out.push_str(&format!("{pad}}}\n"));
            }
            TextValue::Str(s) => write_string(out, &pad, key, s),
            TextValue::Number(n) => out.push_str(&format!("{pad}{key}: {}\n", format_number(*n))),
            TextValue::Ident(word) => out.push_str(&format!("{pad}{key}: {word}\n")),
        }
    }
}

/// Multi-line strings go out one literal per line, closed by an empty `""`.
fn write_string(out: &mut String, pad: &str, key: &str, s: &str) {
    if !s.contains('\n') {
        out.push_str(&format!("{pad}{key}: \"{}\"\n", escape(s)));
        return;
    }

    for (i, line) in s.split_inclusive('\n').enumerate() {
        if i == 0 {
            out.push_str(&format!("{pad}{key}: \"{}\"\n", escape(line)));
        } else {
            out.push_str(&format!("{pad}\"{}\"\n", escape(line)));
        }
    }
    if s.ends_with('\n') {
        out.push_str(&format!("{pad}\"\"\n"));
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Whole numbers keep a `.0` so they read back as floats.
pub fn format_number(n: f32) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{n:.1}")
    } else {
        format!("{n}")
    }
}

pub fn encode_entity(entity: &Entity) -> TextRecord {
    let mut record = TextRecord::new();
    for component in &entity.components {
        record.push(
            "components",
            TextValue::Block(
                TextRecord::new()
                    .with("id", str_value(&component.id))
                    .with("component", str_value(&component.component)),
            ),
        );
    }
    for embedded in &entity.embedded_components {
        record.push(
            "embedded_components",
            TextValue::Block(encode_embedded(embedded)),
        );
    }
    record
}

fn encode_embedded(embedded: &EmbeddedComponent) -> TextRecord {
    let data = match &embedded.data {
        EmbeddedData::Sprite(sprite) => encode_sprite(sprite),
        EmbeddedData::Label(label) => encode_label(label),
    };

    let mut record = TextRecord::new()
        .with("id", str_value(&embedded.id))
        .with("type", str_value(embedded.kind().as_str()))
        .with("data", TextValue::Str(write_record(&data)));

    if let Some(position) = embedded.position {
        record.push("position", vec3_block(position, Vec3::ZERO));
    }
    if let Some(rotation) = embedded.rotation {
        record.push("rotation", quat_block(rotation));
    }
    if let Some(scale) = embedded.scale {
        record.push("scale", vec3_block(scale, Vec3::ONE));
    }
    record
}

pub fn encode_sprite(sprite: &SpriteDesc) -> TextRecord {
    let mut record = TextRecord::new()
        .with("default_animation", str_value(&sprite.default_animation))
        .with("material", str_value(&sprite.material));
    if let Some(size) = sprite.size {
        record.push("size", vec2_block(size));
    }
    if let Some(mode) = sprite.size_mode {
        record.push("size_mode", TextValue::Ident(mode.as_str().to_string()));
    }
    for texture in &sprite.textures {
        record.push(
            "textures",
            TextValue::Block(
                TextRecord::new()
                    .with("sampler", str_value(&texture.sampler))
                    .with("texture", str_value(&texture.texture)),
            ),
        );
    }
    record
}

pub fn encode_label(label: &LabelDesc) -> TextRecord {
    let mut record = TextRecord::new().with("size", vec2_block(label.size));
    if let Some(color) = label.color {
        record.push("color", color_block(color));
    }
    if let Some(pivot) = label.pivot {
        record.push("pivot", TextValue::Ident(pivot.as_str().to_string()));
    }
    if let Some(line_break) = label.line_break {
        record.push("line_break", TextValue::Ident(line_break.to_string()));
    }
    record
        .with("text", str_value(&label.text))
        .with("font", str_value(&label.font))
        .with("material", str_value(&label.material))
}

fn str_value(s: &str) -> TextValue {
    TextValue::Str(s.to_string())
}

fn vec2_block(v: Vec2) -> TextValue {
    TextValue::Block(
        TextRecord::new()
            .with("x", TextValue::Number(v.x))
            .with("y", TextValue::Number(v.y)),
    )
}

/// `z` is left out when it matches the block's default.
fn vec3_block(v: Vec3, default: Vec3) -> TextValue {
    let mut record = TextRecord::new()
        .with("x", TextValue::Number(v.x))
        .with("y", TextValue::Number(v.y));
    if v.z != default.z {
        record.push("z", TextValue::Number(v.z));
    }
    TextValue::Block(record)
}

fn quat_block(q: Quat) -> TextValue {
    TextValue::Block(
        TextRecord::new()
            .with("x", TextValue::Number(q.x))
            .with("y", TextValue::Number(q.y))
            .with("z", TextValue::Number(q.z))
            .with("w", TextValue::Number(q.w)),
    )
}

fn color_block(c: Color) -> TextValue {
    TextValue::Block(
        TextRecord::new()
            .with("x", TextValue::Number(c.r))
            .with("y", TextValue::Number(c.g))
            .with("z", TextValue::Number(c.b))
            .with("w", TextValue::Number(c.a)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Pivot, SizeMode, parse_entity};

    const GENERATOR_ICON: &str = include_str!("../fixtures/generator_icon.go");
    const TOKEN: &str = include_str!("../fixtures/token.go");

    #[test]
    fn canonical_files_are_reproduced_exactly() {
        for src in [GENERATOR_ICON, TOKEN] {
            let entity = parse_entity(src).expect("parse");
            assert_eq!(write_entity(&entity), src);
        }
    }

    #[test]
    fn omitted_scale_axis_is_not_invented() {
        let entity = parse_entity(GENERATOR_ICON).expect("parse");
        assert_eq!(
            entity.embedded_components[0].scale,
            Some(Vec3::new(1.0, 1.0, 1.0))
        );
        assert!(!write_entity(&entity).contains("z:"));
    }

    #[test]
    fn written_entity_reads_back_equal() {
        let mut sprite = SpriteDesc::new("walk", "/m/sprite.material", "/a/hero.atlas")
            .with_size(Vec2::new(16.0, 24.5));
        sprite.size_mode = Some(SizeMode::Manual);

        let mut label = LabelDesc::new(
            "Score: \"0\"\nBest: 10",
            "/f/main.font",
            "/m/label.material",
            Vec2::new(128.0, 32.0),
        );
        label.color = Some(Color::new(1.0, 0.25, 0.0, 0.5));
        label.pivot = Some(Pivot::Se);
        label.line_break = Some(true);

        let entity = Entity::new()
            .with_component("hero", "/scripts/hero.script")
            .with_embedded(
                EmbeddedComponent::sprite("body", sprite)
                    .with_position(Vec3::new(-4.0, 2.5, 0.3))
                    .with_rotation(Quat::new(0.0, 0.0, 0.38268343, 0.9238795)),
            )
            .with_embedded(
                EmbeddedComponent::label("score", label).with_scale(Vec3::new(0.5, 0.5, 2.0)),
            );

        let text = write_entity(&entity);
        assert_eq!(parse_entity(&text).expect("reparse"), entity);
        assert_eq!(write_entity(&parse_entity(&text).expect("reparse")), text);
    }

    #[test]
    fn empty_entity_writes_nothing() {
        assert_eq!(write_entity(&Entity::new()), "");
    }

    #[test]
    fn formats_numbers_with_fraction() {
        assert_eq!(format_number(32.0), "32.0");
        assert_eq!(format_number(-1.0), "-1.0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn single_line_strings_stay_on_one_line() {
        let record = TextRecord::new().with("text", TextValue::Str("say \"hi\"".into()));
        assert_eq!(write_record(&record), "text: \"say \\\"hi\\\"\"\n");
    }
}
