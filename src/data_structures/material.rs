//! Shading parameter bundles.
//!
//! A [`Material`] is either a fixed-function bundle ([`Shading::Standard`],
//! [`Shading::Phong`], [`Shading::Basic`]) or a [`Shading::Programmable`] material whose
//! time-varying inputs are a typed [`ShaderUniforms`] variant. Capability accessors
//! (`emissive_intensity_mut`, `roughness_mut`, `time_mut`, `opacity_mut`) answer
//! "does this material expose that channel" by matching on the variant.

use crate::data_structures::texture::TextureId;

/// Index into the material table of a scene context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

/// Linear RGB in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const CYAN: Color = Color::hex(0x00ffff);
    pub const MAGENTA: Color = Color::hex(0xff00ff);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`.
    pub const fn hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// Metalness/roughness surface.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub map: Option<TextureId>,
    pub normal_map: Option<TextureId>,
    pub roughness_map: Option<TextureId>,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub transparent: bool,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            map: None,
            normal_map: None,
            roughness_map: None,
            metalness: 0.0,
            roughness: 1.0,
            emissive: Color::BLACK,
            emissive_intensity: 1.0,
            opacity: 1.0,
            transparent: false,
        }
    }
}

/// Specular surface used by the glowing magnetic rings.
#[derive(Clone, Debug, PartialEq)]
pub struct PhongMaterial {
    pub color: Color,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub shininess: f32,
    pub opacity: f32,
    pub transparent: bool,
}

/// Unlit flat color.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
}

/// The uniforms each shader program animates. Every variant carries `time`.
#[derive(Clone, Debug, PartialEq)]
pub enum ShaderUniforms {
    /// Spiralling stripes scrolled along a fan's air tube.
    AirFlow { time: f32, color: Color, opacity: f32 },
    /// Pulsing hexagon field on a dome layer.
    DomeEnergy {
        time: f32,
        base_color: Color,
        pulse_color: Color,
        glow_color: Color,
        energy_intensity: f32,
        rotation_speed: f32,
    },
    /// Particle spray; points advance along their velocity by `time`.
    Spray { time: f32, sprite: TextureId },
}

impl ShaderUniforms {
    pub fn time(&self) -> f32 {
        match self {
            ShaderUniforms::AirFlow { time, .. }
            | ShaderUniforms::DomeEnergy { time, .. }
            | ShaderUniforms::Spray { time, .. } => *time,
        }
    }

    pub fn time_mut(&mut self) -> &mut f32 {
        match self {
            ShaderUniforms::AirFlow { time, .. }
            | ShaderUniforms::DomeEnergy { time, .. }
            | ShaderUniforms::Spray { time, .. } => time,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgrammableMaterial {
    pub uniforms: ShaderUniforms,
    pub blend: BlendMode,
    pub side: Side,
    pub depth_write: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shading {
    Standard(StandardMaterial),
    Phong(PhongMaterial),
    Basic(BasicMaterial),
    Programmable(ProgrammableMaterial),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub shading: Shading,
}

impl Material {
    pub fn new(name: &str, shading: Shading) -> Self {
        Self {
            name: name.to_string(),
            shading,
        }
    }

    pub fn standard(name: &str, standard: StandardMaterial) -> Self {
        Self::new(name, Shading::Standard(standard))
    }

    pub fn programmable(name: &str, uniforms: ShaderUniforms, blend: BlendMode) -> Self {
        Self::new(
            name,
            Shading::Programmable(ProgrammableMaterial {
                uniforms,
                blend,
                side: Side::Double,
                depth_write: false,
            }),
        )
    }

    pub fn emissive_intensity_mut(&mut self) -> Option<&mut f32> {
        match &mut self.shading {
            Shading::Standard(m) => Some(&mut m.emissive_intensity),
            Shading::Phong(m) => Some(&mut m.emissive_intensity),
            Shading::Basic(_) | Shading::Programmable(_) => None,
        }
    }

    pub fn roughness_mut(&mut self) -> Option<&mut f32> {
        match &mut self.shading {
            Shading::Standard(m) => Some(&mut m.roughness),
            _ => None,
        }
    }

    pub fn opacity_mut(&mut self) -> Option<&mut f32> {
        match &mut self.shading {
            Shading::Standard(m) => Some(&mut m.opacity),
            Shading::Phong(m) => Some(&mut m.opacity),
            Shading::Basic(m) => Some(&mut m.opacity),
            Shading::Programmable(ProgrammableMaterial {
                uniforms: ShaderUniforms::AirFlow { opacity, .. },
                ..
            }) => Some(opacity),
            Shading::Programmable(_) => None,
        }
    }

    pub fn uniforms(&self) -> Option<&ShaderUniforms> {
        match &self.shading {
            Shading::Programmable(p) => Some(&p.uniforms),
            _ => None,
        }
    }

    pub fn time_mut(&mut self) -> Option<&mut f32> {
        match &mut self.shading {
            Shading::Programmable(p) => Some(p.uniforms.time_mut()),
            _ => None,
        }
    }

    /// Goes to the blended batch: programmable materials, or anything flagged transparent.
    pub fn is_transparent(&self) -> bool {
        match &self.shading {
            Shading::Standard(m) => m.transparent,
            Shading::Phong(m) => m.transparent,
            Shading::Basic(m) => m.transparent,
            Shading::Programmable(_) => true,
        }
    }

    /// Every texture this material samples.
    pub fn textures(&self) -> Vec<TextureId> {
        match &self.shading {
            Shading::Standard(m) => [m.map, m.normal_map, m.roughness_map]
                .into_iter()
                .flatten()
                .collect(),
            Shading::Programmable(ProgrammableMaterial {
                uniforms: ShaderUniforms::Spray { sprite, .. },
                ..
            }) => vec![*sprite],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_decode_per_channel() {
        let c = Color::hex(0x9932cc);
        assert!((c.r - 0x99 as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0x32 as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0xcc as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn capabilities_follow_the_variant() {
        let mut basic = Material::new(
            "flat",
            Shading::Basic(BasicMaterial {
                color: Color::CYAN,
                opacity: 0.8,
                transparent: true,
            }),
        );
        assert!(basic.emissive_intensity_mut().is_none());
        assert!(basic.roughness_mut().is_none());
        assert!(basic.time_mut().is_none());
        assert_eq!(basic.opacity_mut().copied(), Some(0.8));

        let mut flow = Material::programmable(
            "air",
            ShaderUniforms::AirFlow {
                time: 0.0,
                color: Color::CYAN,
                opacity: 0.6,
            },
            BlendMode::Additive,
        );
        if let Some(time) = flow.time_mut() {
            *time = 4.0;
        }
        assert_eq!(flow.uniforms().map(ShaderUniforms::time), Some(4.0));
        assert!(flow.is_transparent());
    }
}
