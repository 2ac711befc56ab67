use std::collections::HashSet;

use crate::{
    Color, ComponentRef, EmbeddedComponent, EmbeddedData, EmbeddedKind, Entity, LabelDesc, Pivot,
    Quat, SceneError, SizeMode, SpriteDesc, TextRecord, TextValue, TextureBinding, Vec2, Vec3,
    has_comment, parse_record,
};

/// Read-only view of a record that knows its dotted path for error reporting.
struct Fields<'a> {
    record: &'a TextRecord,
    path: String,
}

impl<'a> Fields<'a> {
    fn new(record: &'a TextRecord, path: impl Into<String>) -> Self {
        Self {
            record,
            path: path.into(),
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn only_known(&self, known: &[&str]) -> Result<(), SceneError> {
        match self
            .record
            .fields
            .iter()
            .find(|(key, _)| !known.contains(&key.as_str()))
        {
            Some((key, _)) => Err(SceneError::UnknownField(self.child_path(key))),
            None => Ok(()),
        }
    }

    fn single(&self, key: &str) -> Result<Option<&'a TextValue>, SceneError> {
        let mut values = self.record.get_all(key);
        let first = values.next();
        if values.next().is_some() {
            return Err(SceneError::DuplicateField(self.child_path(key)));
        }
        Ok(first)
    }

    fn required(&self, key: &str) -> Result<&'a TextValue, SceneError> {
        self.single(key)?
            .ok_or_else(|| SceneError::MissingField(self.child_path(key)))
    }

    fn mismatch(&self, key: &str, expected: &str, got: &TextValue) -> SceneError {
        SceneError::invalid(
            self.child_path(key),
            format!("expected {expected}, got {}", got.kind()),
        )
    }

    fn as_str(&self, key: &str, value: &'a TextValue) -> Result<&'a str, SceneError> {
        match value {
            TextValue::Str(s) => Ok(s.as_str()),
            other => Err(self.mismatch(key, "string", other)),
        }
    }

    fn required_str(&self, key: &str) -> Result<String, SceneError> {
        let value = self.required(key)?;
        self.as_str(key, value).map(str::to_string)
    }

    fn optional_f32(&self, key: &str) -> Result<Option<f32>, SceneError> {
        match self.single(key)? {
            None => Ok(None),
            Some(TextValue::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(self.mismatch(key, "number", other)),
        }
    }

    fn optional_ident(&self, key: &str) -> Result<Option<&'a str>, SceneError> {
        match self.single(key)? {
            None => Ok(None),
            Some(TextValue::Ident(word)) => Ok(Some(word.as_str())),
            Some(other) => Err(self.mismatch(key, "identifier", other)),
        }
    }

    fn optional_bool(&self, key: &str) -> Result<Option<bool>, SceneError> {
        match self.optional_ident(key)? {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(other) => Err(SceneError::invalid(
                self.child_path(key),
                format!("expected `true` or `false`, got `{other}`"),
            )),
        }
    }

    fn optional_block(&self, key: &str) -> Result<Option<Fields<'a>>, SceneError> {
        match self.single(key)? {
            None => Ok(None),
            Some(TextValue::Block(record)) => Ok(Some(Fields::new(record, self.child_path(key)))),
            Some(other) => Err(self.mismatch(key, "block", other)),
        }
    }

    fn required_block(&self, key: &str) -> Result<Fields<'a>, SceneError> {
        self.optional_block(key)?
            .ok_or_else(|| SceneError::MissingField(self.child_path(key)))
    }

    /// Every occurrence of a repeatable block, indexed in the path as `key[i]`.
    fn blocks(&self, key: &str) -> Result<Vec<Fields<'a>>, SceneError> {
        self.record
            .get_all(key)
            .enumerate()
            .map(|(i, value)| {
                let path = format!("{}[{i}]", self.child_path(key));
                match value {
                    TextValue::Block(record) => Ok(Fields::new(record, path)),
                    other => Err(SceneError::invalid(
                        path,
                        format!("expected block, got {}", other.kind()),
                    )),
                }
            })
            .collect()
    }
}

pub fn parse_entity(src: &str) -> Result<Entity, SceneError> {
    let record = parse_record(src)?;
    decode_entity(&record)
}

/// Whether a descriptor, or the `data` record of any embedded component,
/// carries a `#` comment. Decoding drops comments.
pub fn source_has_comments(src: &str) -> Result<bool, SceneError> {
    if has_comment(src)? {
        return Ok(true);
    }
    let record = parse_record(src)?;
    for embedded in record.get_all("embedded_components") {
        let TextValue::Block(block) = embedded else {
            continue;
        };
        for data in block.get_all("data") {
            if let TextValue::Str(data) = data {
                if has_comment(data)? {
                    return Ok(true);
                }
            }
        }
    }
    Ok(false)
}

pub fn decode_entity(record: &TextRecord) -> Result<Entity, SceneError> {
    let root = Fields::new(record, "");
    root.only_known(&["components", "embedded_components"])?;

    let components = root
        .blocks("components")?
        .iter()
        .map(decode_component)
        .collect::<Result<Vec<_>, _>>()?;

    let embedded_components = root
        .blocks("embedded_components")?
        .iter()
        .map(decode_embedded)
        .collect::<Result<Vec<_>, _>>()?;

    let entity = Entity {
        components,
        embedded_components,
    };
    check_unique_ids(&entity)?;
    Ok(entity)
}

fn check_unique_ids(entity: &Entity) -> Result<(), SceneError> {
    let mut seen = HashSet::new();
    let paths = (0..entity.components.len())
        .map(|i| format!("components[{i}].id"))
        .chain((0..entity.embedded_components.len()).map(|i| format!("embedded_components[{i}].id")));

    for (id, path) in entity.ids().zip(paths) {
        if !seen.insert(id) {
            return Err(SceneError::DuplicateId {
                path,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

fn decode_component(fields: &Fields<'_>) -> Result<ComponentRef, SceneError> {
    fields.only_known(&["id", "component"])?;
    Ok(ComponentRef {
        id: fields.required_str("id")?,
        component: fields.required_str("component")?,
    })
}

fn decode_embedded(fields: &Fields<'_>) -> Result<EmbeddedComponent, SceneError> {
    fields.only_known(&["id", "type", "data", "position", "rotation", "scale"])?;

    let id = fields.required_str("id")?;
    let ty = fields.required_str("type")?;
    let kind = EmbeddedKind::from_name(&ty).ok_or_else(|| SceneError::UnknownEmbeddedType {
        path: fields.child_path("type"),
        ty: ty.clone(),
    })?;

    let data_path = fields.child_path("data");
    let raw = fields.required_str("data")?;
    log::trace!("decoding {} data for `{id}`", kind.as_str());
    let record = parse_record(&raw).map_err(|source| SceneError::Data {
        path: data_path.clone(),
        source: Box::new(source),
    })?;
    let data_fields = Fields::new(&record, data_path);
    let data = match kind {
        EmbeddedKind::Sprite => EmbeddedData::Sprite(decode_sprite(&data_fields)?),
        EmbeddedKind::Label => EmbeddedData::Label(decode_label(&data_fields)?),
    };

    Ok(EmbeddedComponent {
        id,
        data,
        position: fields
            .optional_block("position")?
            .map(|b| decode_vec3(&b, Vec3::ZERO))
            .transpose()?,
        rotation: fields
            .optional_block("rotation")?
            .map(|b| decode_quat(&b))
            .transpose()?,
        scale: fields
            .optional_block("scale")?
            .map(|b| decode_vec3(&b, Vec3::ONE))
            .transpose()?,
    })
}

fn decode_sprite(fields: &Fields<'_>) -> Result<SpriteDesc, SceneError> {
    fields.only_known(&["default_animation", "material", "size", "size_mode", "textures"])?;

    let textures = fields
        .blocks("textures")?
        .iter()
        .map(|t| -> Result<TextureBinding, SceneError> {
            t.only_known(&["sampler", "texture"])?;
            Ok(TextureBinding {
                sampler: t.required_str("sampler")?,
                texture: t.required_str("texture")?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if textures.is_empty() {
        return Err(SceneError::MissingField(fields.child_path("textures")));
    }

    let size_mode = match fields.optional_ident("size_mode")? {
        None => None,
        Some(name) => Some(SizeMode::from_name(name).ok_or_else(|| {
            SceneError::invalid(
                fields.child_path("size_mode"),
                format!("unknown size mode `{name}`"),
            )
        })?),
    };

    Ok(SpriteDesc {
        default_animation: fields.required_str("default_animation")?,
        material: fields.required_str("material")?,
        size: fields
            .optional_block("size")?
            .map(|b| decode_vec2(&b))
            .transpose()?,
        size_mode,
        textures,
    })
}

fn decode_label(fields: &Fields<'_>) -> Result<LabelDesc, SceneError> {
    fields.only_known(&[
        "size",
        "color",
        "pivot",
        "line_break",
        "text",
        "font",
        "material",
    ])?;

    let pivot = match fields.optional_ident("pivot")? {
        None => None,
        Some(name) => Some(Pivot::from_name(name).ok_or_else(|| {
            SceneError::invalid(fields.child_path("pivot"), format!("unknown pivot `{name}`"))
        })?),
    };

    Ok(LabelDesc {
        size: decode_vec2(&fields.required_block("size")?)?,
        color: fields
            .optional_block("color")?
            .map(|b| decode_color(&b))
            .transpose()?,
        pivot,
        line_break: fields.optional_bool("line_break")?,
        text: fields.required_str("text")?,
        font: fields.required_str("font")?,
        material: fields.required_str("material")?,
    })
}

fn decode_vec2(fields: &Fields<'_>) -> Result<Vec2, SceneError> {
    fields.only_known(&["x", "y"])?;
    Ok(Vec2 {
        x: fields.optional_f32("x")?.unwrap_or(0.0),
        y: fields.optional_f32("y")?.unwrap_or(0.0),
    })
}

/// Missing axes fall back to the matching axis of `default`.
fn decode_vec3(fields: &Fields<'_>, default: Vec3) -> Result<Vec3, SceneError> {
    fields.only_known(&["x", "y", "z"])?;
    Ok(Vec3 {
        x: fields.optional_f32("x")?.unwrap_or(default.x),
        y: fields.optional_f32("y")?.unwrap_or(default.y),
        z: fields.optional_f32("z")?.unwrap_or(default.z),
    })
}

fn decode_quat(fields: &Fields<'_>) -> Result<Quat, SceneError> {
    fields.only_known(&["x", "y", "z", "w"])?;
    let d = Quat::IDENTITY;
    Ok(Quat {
        x: fields.optional_f32("x")?.unwrap_or(d.x),
        y: fields.optional_f32("y")?.unwrap_or(d.y),
        z: fields.optional_f32("z")?.unwrap_or(d.z),
        w: fields.optional_f32("w")?.unwrap_or(d.w),
    })
}

fn decode_color(fields: &Fields<'_>) -> Result<Color, SceneError> {
    fields.only_known(&["x", "y", "z", "w"])?;
    let d = Color::WHITE;
    Ok(Color {
        r: fields.optional_f32("x")?.unwrap_or(d.r),
        g: fields.optional_f32("y")?.unwrap_or(d.g),
        b: fields.optional_f32("z")?.unwrap_or(d.b),
        a: fields.optional_f32("w")?.unwrap_or(d.a),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: &str = include_str!("../fixtures/cell.go");
    const UI: &str = include_str!("../fixtures/ui.go");

    fn embedded(src: &str, data: &str, extra: &str) -> String {
        format!(
            "embedded_components {{\n  id: \"e\"\n  type: \"{src}\"\n  data: \"{}\"\n{extra}}}\n",
            data.replace('"', "\\\"").replace('\n', "\\n")
        )
    }

    #[test]
    fn decodes_sprite_entity() {
        let entity = parse_entity(CELL).expect("failed to parse cell");

        assert_eq!(entity.components.len(), 1);
        assert_eq!(entity.components[0].id, "item_script");
        assert_eq!(entity.components[0].component, "/scripts/item_script.script");

        let sprite = entity.embedded("sprite").expect("sprite");
        assert_eq!(sprite.kind(), EmbeddedKind::Sprite);
        assert_eq!(sprite.position, None);
        assert_eq!(sprite.scale(), Vec3::ONE);

        let desc = sprite.as_sprite().expect("sprite data");
        assert_eq!(desc.default_animation, "tile");
        assert_eq!(desc.material, "/builtins/materials/sprite.material");
        assert_eq!(
            desc.textures,
            vec![TextureBinding {
                sampler: "texture_sampler".into(),
                texture: "/assets/tile.atlas".into(),
            }]
        );
    }

    #[test]
    fn decodes_label_with_partial_position() {
        let entity = parse_entity(UI).expect("failed to parse ui");
        let label = entity.embedded("info_label").expect("label");
        assert_eq!(label.position, Some(Vec3::new(300.0, 420.0, 0.0)));

        let desc = label.as_label().expect("label data");
        assert_eq!(desc.size, Vec2::new(300.0, 32.0));
        assert_eq!(desc.text, "Label");
        assert_eq!(desc.font, "/assets/iosevka.font");
        assert_eq!(desc.color(), Color::WHITE);
    }

    #[test]
    fn partial_scale_fills_missing_axis_with_one() {
        let src = embedded(
            "sprite",
            "default_animation: \"a\"\nmaterial: \"/m.material\"\nsize { x: 32 y: 32 }\ntextures { sampler: \"s\" texture: \"/t.atlas\" }\n",
            "  scale {\n    x: 2.0\n  }\n",
        );
        let entity = parse_entity(&src).expect("parse");
        let sprite = &entity.embedded_components[0];
        assert_eq!(sprite.scale, Some(Vec3::new(2.0, 1.0, 1.0)));
        assert_eq!(
            sprite.as_sprite().and_then(|s| s.size),
            Some(Vec2::new(32.0, 32.0))
        );
    }

    #[test]
    fn decodes_optional_label_fields() {
        let src = embedded(
            "label",
            "size { x: 1 y: 2 }\ncolor { x: 0.5 }\npivot: PIVOT_NW\nline_break: true\ntext: \"\"\nfont: \"/f.font\"\nmaterial: \"/m.material\"\n",
            "  rotation {\n    z: 0.7071\n    w: 0.7071\n  }\n",
        );
        let entity = parse_entity(&src).expect("parse");
        let label = &entity.embedded_components[0];
        assert_eq!(label.rotation, Some(Quat::new(0.0, 0.0, 0.7071, 0.7071)));
        let desc = label.as_label().expect("label");
        assert_eq!(desc.color, Some(Color::new(0.5, 1.0, 1.0, 1.0)));
        assert_eq!(desc.pivot(), Pivot::Nw);
        assert!(desc.line_break());
    }

    #[test]
    fn rejects_unknown_embedded_type() {
        let src = embedded("model", "mesh: \"/a.mesh\"\n", "");
        let err = parse_entity(&src).expect_err("expected failure");
        assert_eq!(
            err,
            SceneError::UnknownEmbeddedType {
                path: "embedded_components[0].type".into(),
                ty: "model".into(),
            }
        );
    }

    #[test]
    fn rejects_duplicate_ids_across_namespaces() {
        let src = format!(
            "components {{\n  id: \"e\"\n  component: \"/a.script\"\n}}\n{}",
            embedded(
                "sprite",
                "default_animation: \"a\"\nmaterial: \"/m.material\"\ntextures { sampler: \"s\" texture: \"/t.atlas\" }\n",
                "",
            )
        );
        let err = parse_entity(&src).expect_err("expected failure");
        assert_eq!(
            err,
            SceneError::DuplicateId {
                path: "embedded_components[0].id".into(),
                id: "e".into(),
            }
        );
    }

    #[test]
    fn reports_missing_and_unknown_fields_with_path() {
        let err = parse_entity("components {\n  id: \"a\"\n}\n").expect_err("expected failure");
        assert_eq!(err, SceneError::MissingField("components[0].component".into()));

        let err = parse_entity("prototype: \"/a.go\"\n").expect_err("expected failure");
        assert_eq!(err, SceneError::UnknownField("prototype".into()));

        let src = embedded("label", "size { x: 1 y: 1 }\ntext: \"a\"\nfont: \"/f.font\"\n", "");
        let err = parse_entity(&src).expect_err("expected failure");
        assert_eq!(
            err,
            SceneError::MissingField("embedded_components[0].data.material".into())
        );
    }

    #[test]
    fn reports_type_mismatch_and_duplicate_field() {
        let err = parse_entity("components {\n  id: 3\n  component: \"/a.script\"\n}\n")
            .expect_err("expected failure");
        assert!(matches!(
            err,
            SceneError::InvalidField { ref path, .. } if path == "components[0].id"
        ));

        let err = parse_entity("components {\n  id: \"a\"\n  id: \"b\"\n  component: \"/a.script\"\n}\n")
            .expect_err("expected failure");
        assert_eq!(err, SceneError::DuplicateField("components[0].id".into()));
    }

    #[test]
    fn sprite_requires_a_texture() {
        let src = embedded(
            "sprite",
            "default_animation: \"a\"\nmaterial: \"/m.material\"\n",
            "",
        );
        let err = parse_entity(&src).expect_err("expected failure");
        assert_eq!(
            err,
            SceneError::MissingField("embedded_components[0].data.textures".into())
        );
    }

    #[test]
    fn syntax_error_inside_data_is_wrapped() {
        let src = embedded("sprite", "default_animation: \"a\"\ntextures {\n", "");
        match parse_entity(&src).expect_err("expected failure") {
            SceneError::Data { path, source } => {
                assert_eq!(path, "embedded_components[0].data");
                assert!(matches!(*source, SceneError::Syntax { line: 3, .. }));
            }
            other => panic!("expected data error, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_axis_is_a_syntax_error() {
        let src = embedded("label", "", "  position {\n    x: 1e39\n    y: 0.0\n  }\n");
        let err = parse_entity(&src).expect_err("expected failure");
        assert!(matches!(err, SceneError::Syntax { line: 6, column: 8, .. }), "{err:?}");
    }

    #[test]
    fn finds_comments_at_top_level_and_inside_data() {
        assert!(!source_has_comments(CELL).expect("lex"));
        assert!(source_has_comments(&format!("# owned by gameplay\n{UI}")).expect("lex"));

        let src = embedded("label", "# layout\ntext: \"#1\"\n", "");
        assert!(source_has_comments(&src).expect("lex"));

        let src = embedded("label", "text: \"#1\"\n", "");
        assert!(!source_has_comments(&src).expect("lex"));
    }

    #[test]
    fn empty_document_is_empty_entity() {
        assert_eq!(parse_entity("").expect("parse"), Entity::new());
    }
}
