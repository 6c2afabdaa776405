//! Material sets for every part family.
//!
//! Textures are synthesized once through the context's RNG and shared between the
//! sets that sample them, so a run with a given seed always produces the same maps.

use crate::{
    config::TextureSizes,
    context::SceneContext,
    data_structures::{
        material::{
            BasicMaterial, BlendMode, Color, Material, MaterialId, PhongMaterial, Shading,
            ShaderUniforms, StandardMaterial,
        },
        texture::TextureId,
    },
    error::Result,
    synthesis::{self, metal, sprites, tech, terrain},
};

/// Maps sampled by more than one material set.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceTextures {
    pub nano: TextureId,
    pub tech: TextureId,
    pub metal: TextureId,
    pub normal: TextureId,
}

impl SurfaceTextures {
    pub fn synthesize(ctx: &mut SceneContext, sizes: &TextureSizes) -> Result<Self> {
        let nano = synthesis::timed("nano", || tech::nano(sizes.nano, sizes.nano, &mut ctx.rng))?;
        let grid = synthesis::timed("tech grid", || {
            tech::tech_grid(sizes.tech, sizes.tech, &mut ctx.rng)
        })?;
        let plating = synthesis::timed("metal", || {
            metal::metal(sizes.metal, sizes.metal, &mut ctx.rng)
        })?;
        let bumps = synthesis::timed("normal", || {
            metal::random_normal_map(sizes.normal, sizes.normal, &mut ctx.rng)
        })?;
        Ok(Self {
            nano: ctx.add_texture(nano),
            tech: ctx.add_texture(grid),
            metal: ctx.add_texture(plating),
            normal: ctx.add_texture(bumps),
        })
    }
}

/// Transparent cyan surface that glows with `intensity`.
fn cyan_glow(ctx: &mut SceneContext, name: &str, opacity: f32, intensity: f32) -> MaterialId {
    ctx.add_material(Material::standard(
        name,
        StandardMaterial {
            color: Color::CYAN,
            emissive: Color::CYAN,
            emissive_intensity: intensity,
            opacity,
            transparent: true,
            ..Default::default()
        },
    ))
}

fn unlit(ctx: &mut SceneContext, name: &str, color: Color, opacity: f32) -> MaterialId {
    ctx.add_material(Material::new(
        name,
        Shading::Basic(BasicMaterial {
            color,
            opacity,
            transparent: true,
        }),
    ))
}

#[derive(Clone, Copy, Debug)]
pub struct TurretMaterials {
    pub armor: MaterialId,
    pub tech: MaterialId,
    pub metal: MaterialId,
    pub scope: MaterialId,
    pub coolant: MaterialId,
    /// Unlit cyan strips and cells.
    pub energy: MaterialId,
    /// Unlit magenta rings.
    pub plasma: MaterialId,
    pub barrel_glow: MaterialId,
    pub lens: MaterialId,
    pub panel_light: MaterialId,
}

impl TurretMaterials {
    pub fn create(ctx: &mut SceneContext, textures: &SurfaceTextures) -> Self {
        let armor = ctx.add_material(Material::standard(
            "turret armor",
            StandardMaterial {
                map: Some(textures.nano),
                normal_map: Some(textures.normal),
                metalness: 0.8,
                roughness: 0.3,
                emissive: Color::hex(0x330000),
                emissive_intensity: 0.2,
                ..Default::default()
            },
        ));
        let tech = ctx.add_material(Material::standard(
            "turret tech",
            StandardMaterial {
                map: Some(textures.tech),
                normal_map: Some(textures.normal),
                metalness: 0.9,
                roughness: 0.2,
                emissive: Color::hex(0x001100),
                emissive_intensity: 0.3,
                ..Default::default()
            },
        ));
        let metal = ctx.add_material(Material::standard(
            "turret metal",
            StandardMaterial {
                map: Some(textures.metal),
                normal_map: Some(textures.normal),
                metalness: 1.0,
                roughness: 0.1,
                ..Default::default()
            },
        ));
        let scope = ctx.add_material(Material::standard(
            "turret scope",
            StandardMaterial {
                color: Color::hex(0x222222),
                metalness: 1.0,
                roughness: 0.1,
                emissive: Color::hex(0x00ff00),
                emissive_intensity: 0.5,
                ..Default::default()
            },
        ));
        let coolant = ctx.add_material(Material::standard(
            "turret coolant",
            StandardMaterial {
                color: Color::hex(0x444444),
                metalness: 1.0,
                roughness: 0.2,
                emissive: Color::CYAN,
                emissive_intensity: 0.5,
                ..Default::default()
            },
        ));
        Self {
            armor,
            tech,
            metal,
            scope,
            coolant,
            energy: unlit(ctx, "turret energy", Color::CYAN, 0.8),
            plasma: unlit(ctx, "turret plasma", Color::MAGENTA, 0.6),
            barrel_glow: cyan_glow(ctx, "barrel glow", 0.7, 0.5),
            lens: cyan_glow(ctx, "sensor lens", 0.9, 0.8),
            panel_light: cyan_glow(ctx, "panel light", 0.8, 0.6),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FanMaterials {
    pub body: MaterialId,
    pub air_flow: MaterialId,
}

impl FanMaterials {
    pub fn create(ctx: &mut SceneContext) -> Self {
        let body = ctx.add_material(Material::standard(
            "fan body",
            StandardMaterial {
                color: Color::hex(0x2a2a2a),
                metalness: 0.9,
                roughness: 0.2,
                ..Default::default()
            },
        ));
        let air_flow = ctx.add_material(Material::programmable(
            "fan air flow",
            ShaderUniforms::AirFlow {
                time: 0.0,
                color: Color::CYAN,
                opacity: 0.6,
            },
            BlendMode::Additive,
        ));
        Self { body, air_flow }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SprayerMaterials {
    pub metal: MaterialId,
    pub pipe: MaterialId,
    pub glow: MaterialId,
    pub spray: MaterialId,
}

impl SprayerMaterials {
    pub fn create(
        ctx: &mut SceneContext,
        textures: &SurfaceTextures,
        sizes: &TextureSizes,
    ) -> Result<Self> {
        let sprite = synthesis::timed("spray sprite", || sprites::spray_sprite(sizes.sprite))?;
        let sprite = ctx.add_texture(sprite);
        let metal = ctx.add_material(Material::standard(
            "sprayer metal",
            StandardMaterial {
                color: Color::hex(0x444444),
                map: Some(textures.nano),
                normal_map: Some(textures.normal),
                metalness: 0.9,
                roughness: 0.3,
                ..Default::default()
            },
        ));
        let pipe = ctx.add_material(Material::standard(
            "sprayer pipe",
            StandardMaterial {
                color: Color::hex(0x666666),
                map: Some(textures.nano),
                metalness: 0.8,
                roughness: 0.4,
                emissive: Color::CYAN,
                emissive_intensity: 0.2,
                ..Default::default()
            },
        ));
        let glow = cyan_glow(ctx, "sprayer glow", 0.8, 0.5);
        let spray = ctx.add_material(Material::programmable(
            "spray particles",
            ShaderUniforms::Spray { time: 0.0, sprite },
            BlendMode::Additive,
        ));
        Ok(Self {
            metal,
            pipe,
            glow,
            spray,
        })
    }
}

/// Shared by every magnetic system, so one update per frame animates them all.
#[derive(Clone, Copy, Debug)]
pub struct MagnetMaterials {
    pub ring: MaterialId,
    pub beam: MaterialId,
}

impl MagnetMaterials {
    pub fn create(ctx: &mut SceneContext) -> Self {
        let phong = |emissive_intensity: f32, opacity: f32| {
            Shading::Phong(PhongMaterial {
                color: Color::CYAN,
                emissive: Color::CYAN,
                emissive_intensity,
                shininess: 100.0,
                opacity,
                transparent: true,
            })
        };
        Self {
            ring: ctx.add_material(Material::new("magnet ring", phong(0.5, 0.8))),
            beam: ctx.add_material(Material::new("laser beam", phong(0.8, 0.6))),
        }
    }
}

/// Energy material of dome layer `index`; inner layers pulse softer and spin faster.
pub fn dome_layer_material(ctx: &mut SceneContext, index: usize) -> MaterialId {
    let i = index as f32;
    ctx.add_material(Material::programmable(
        &format!("dome layer {index}"),
        ShaderUniforms::DomeEnergy {
            time: 0.0,
            base_color: Color::hex(0x9932cc),
            pulse_color: Color::hex(0xe6e6fa),
            glow_color: Color::hex(0x800080),
            energy_intensity: 0.6 + i * 0.1,
            rotation_speed: 0.2 - i * 0.05,
        },
        BlendMode::Additive,
    ))
}

pub fn ground_material(ctx: &mut SceneContext, sizes: &TextureSizes) -> Result<MaterialId> {
    let size = sizes.ground;
    let color = synthesis::timed("ground", || terrain::ground(size, size, &mut ctx.rng))?;
    let normal = synthesis::timed("ground normal", || {
        terrain::ground_normal(size, size, &mut ctx.rng)
    })?;
    let roughness = synthesis::timed("ground roughness", || {
        terrain::ground_roughness(size, size, &mut ctx.rng)
    })?;
    let material = StandardMaterial {
        map: Some(ctx.add_texture(color)),
        normal_map: Some(ctx.add_texture(normal)),
        roughness_map: Some(ctx.add_texture(roughness)),
        metalness: 0.8,
        roughness: 0.7,
        ..Default::default()
    };
    Ok(ctx.add_material(Material::standard("ground", material)))
}
