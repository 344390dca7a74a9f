//! The fixed catalog of material slots a PLT pixel can belong to.
//!
//! The slot order is part of the on-disk format: a slot's position in the
//! catalog is the material tag stored in the pixel stream.

/// Number of material slots in the catalog.
pub const MATERIAL_COUNT: usize = 10;

/// One of the ten canonical material slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Material {
    Skin = 0,
    Hair,
    Metal1,
    Metal2,
    Cloth1,
    Cloth2,
    Leather1,
    Leather2,
    Tattoo1,
    Tattoo2,
}

impl Material {
    /// All materials in catalog order (tag order).
    pub const ALL: [Material; MATERIAL_COUNT] = [
        Material::Skin,
        Material::Hair,
        Material::Metal1,
        Material::Metal2,
        Material::Cloth1,
        Material::Cloth2,
        Material::Leather1,
        Material::Leather2,
        Material::Tattoo1,
        Material::Tattoo2,
    ];

    /// The canonical layer name for this material.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Material::Skin => "skin",
            Material::Hair => "hair",
            Material::Metal1 => "metal1",
            Material::Metal2 => "metal2",
            Material::Cloth1 => "cloth1",
            Material::Cloth2 => "cloth2",
            Material::Leather1 => "leather1",
            Material::Leather2 => "leather2",
            Material::Tattoo1 => "tattoo1",
            Material::Tattoo2 => "tattoo2",
        }
    }

    /// Looks up a material by layer name, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Material> {
        Material::ALL
            .into_iter()
            .find(|material| material.name().eq_ignore_ascii_case(name))
    }

    /// The on-disk material tag for this slot.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid material tag: {0}")]
pub struct InvalidMaterialTag(u8);

impl InvalidMaterialTag {
    #[must_use]
    pub fn tag(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Material {
    type Error = InvalidMaterialTag;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Material::Skin),
            1 => Ok(Material::Hair),
            2 => Ok(Material::Metal1),
            3 => Ok(Material::Metal2),
            4 => Ok(Material::Cloth1),
            5 => Ok(Material::Cloth2),
            6 => Ok(Material::Leather1),
            7 => Ok(Material::Leather2),
            8 => Ok(Material::Tattoo1),
            9 => Ok(Material::Tattoo2),
            other => Err(InvalidMaterialTag(other)),
        }
    }
}

impl From<Material> for u8 {
    fn from(value: Material) -> u8 {
        value as u8
    }
}
