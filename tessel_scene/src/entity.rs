use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// RGBA, stored in the file as an `x y z w` block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Script component: a reference to logic living outside the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRef {
    pub id: String,
    pub component: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddedKind {
    Sprite,
    Label,
}

impl EmbeddedKind {
    pub const ALL: [Self; 2] = [Self::Sprite, Self::Label];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sprite => "sprite",
            Self::Label => "label",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMode {
    Auto,
    Manual,
}

impl SizeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "SIZE_MODE_AUTO",
            Self::Manual => "SIZE_MODE_MANUAL",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Auto, Self::Manual]
            .into_iter()
            .find(|mode| mode.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pivot {
    #[default]
    Center,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl Pivot {
    const ALL: [Self; 9] = [
        Self::Center,
        Self::N,
        Self::Ne,
        Self::E,
        Self::Se,
        Self::S,
        Self::Sw,
        Self::W,
        Self::Nw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "PIVOT_CENTER",
            Self::N => "PIVOT_N",
            Self::Ne => "PIVOT_NE",
            Self::E => "PIVOT_E",
            Self::Se => "PIVOT_SE",
            Self::S => "PIVOT_S",
            Self::Sw => "PIVOT_SW",
            Self::W => "PIVOT_W",
            Self::Nw => "PIVOT_NW",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pivot| pivot.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub sampler: String,
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDesc {
    pub default_animation: String,
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_mode: Option<SizeMode>,
    pub textures: Vec<TextureBinding>,
}

impl SpriteDesc {
    pub const DEFAULT_SAMPLER: &'static str = "texture_sampler";

    /// Sprite with a single texture bound to the default sampler.
    pub fn new(
        default_animation: impl Into<String>,
        material: impl Into<String>,
        texture: impl Into<String>,
    ) -> Self {
        Self {
            default_animation: default_animation.into(),
            material: material.into(),
            size: None,
            size_mode: None,
            textures: vec![TextureBinding {
                sampler: Self::DEFAULT_SAMPLER.to_string(),
                texture: texture.into(),
            }],
        }
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = Some(size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDesc {
    pub size: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<Pivot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_break: Option<bool>,
    pub text: String,
    pub font: String,
    pub material: String,
}

impl LabelDesc {
    pub fn new(
        text: impl Into<String>,
        font: impl Into<String>,
        material: impl Into<String>,
        size: Vec2,
    ) -> Self {
        Self {
            size,
            color: None,
            pivot: None,
            line_break: None,
            text: text.into(),
            font: font.into(),
            material: material.into(),
        }
    }

    pub fn color(&self) -> Color {
        self.color.unwrap_or(Color::WHITE)
    }

    pub fn pivot(&self) -> Pivot {
        self.pivot.unwrap_or_default()
    }

    pub fn line_break(&self) -> bool {
        self.line_break.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmbeddedData {
    Sprite(SpriteDesc),
    Label(LabelDesc),
}

impl EmbeddedData {
    pub fn kind(&self) -> EmbeddedKind {
        match self {
            Self::Sprite(_) => EmbeddedKind::Sprite,
            Self::Label(_) => EmbeddedKind::Label,
        }
    }
}

/// Inline sprite or label. Transforms are `None` when the file omits them;
/// the accessors fill in the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedComponent {
    pub id: String,
    pub data: EmbeddedData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Quat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec3>,
}

impl EmbeddedComponent {
    pub fn new(id: impl Into<String>, data: EmbeddedData) -> Self {
        Self {
            id: id.into(),
            data,
            position: None,
            rotation: None,
            scale: None,
        }
    }

    pub fn sprite(id: impl Into<String>, sprite: SpriteDesc) -> Self {
        Self::new(id, EmbeddedData::Sprite(sprite))
    }

    pub fn label(id: impl Into<String>, label: LabelDesc) -> Self {
        Self::new(id, EmbeddedData::Label(label))
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn kind(&self) -> EmbeddedKind {
        self.data.kind()
    }

    pub fn position(&self) -> Vec3 {
        self.position.unwrap_or(Vec3::ZERO)
    }

    pub fn rotation(&self) -> Quat {
        self.rotation.unwrap_or(Quat::IDENTITY)
    }

    pub fn scale(&self) -> Vec3 {
        self.scale.unwrap_or(Vec3::ONE)
    }

    pub fn as_sprite(&self) -> Option<&SpriteDesc> {
        match &self.data {
            EmbeddedData::Sprite(sprite) => Some(sprite),
            EmbeddedData::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&LabelDesc> {
        match &self.data {
            EmbeddedData::Label(label) => Some(label),
            EmbeddedData::Sprite(_) => None,
        }
    }
}

/// One descriptor file: script components plus inline sprites and labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub components: Vec<ComponentRef>,
    #[serde(default)]
    pub embedded_components: Vec<EmbeddedComponent>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, id: impl Into<String>, component: impl Into<String>) -> Self {
        self.components.push(ComponentRef {
            id: id.into(),
            component: component.into(),
        });
        self
    }

    pub fn with_embedded(mut self, embedded: EmbeddedComponent) -> Self {
        self.embedded_components.push(embedded);
        self
    }

    pub fn component(&self, id: &str) -> Option<&ComponentRef> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn embedded(&self, id: &str) -> Option<&EmbeddedComponent> {
        self.embedded_components.iter().find(|e| e.id == id)
    }

    /// Ids of components then embedded components, in file order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components
            .iter()
            .map(|c| c.id.as_str())
            .chain(self.embedded_components.iter().map(|e| e.id.as_str()))
    }
}
