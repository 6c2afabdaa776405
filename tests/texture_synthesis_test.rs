use bastion::{
    BuildError,
    data_structures::texture::{ColorSpace, Texture},
    noise::NoiseEngine,
    synthesis::{self, atmosphere, metal, sprites, tech, terrain},
};
use rand::{SeedableRng, rngs::StdRng};

fn rng() -> StdRng {
    StdRng::seed_from_u64(21)
}

#[test]
fn nano_circuit_is_opaque_and_full_size() {
    let texture = tech::nano(512, 512, &mut rng()).unwrap();
    assert_eq!((texture.width(), texture.height()), (512, 512));
    assert_eq!(texture.as_bytes().len(), 512 * 512 * 4);
    assert!(texture.image().pixels().all(|p| p[3] == 255));
    assert_eq!(texture.repeat, [2.0, 2.0]);
}

#[test]
fn repeated_calls_keep_dimensions() {
    let mut rng = rng();
    let first = tech::tech_grid(64, 32, &mut rng).unwrap();
    let second = tech::tech_grid(64, 32, &mut rng).unwrap();
    assert_eq!((first.width(), first.height()), (64, 32));
    assert_eq!((second.width(), second.height()), (64, 32));
}

#[test]
fn same_rng_state_reproduces_the_raster() {
    let a = metal::metal(48, 48, &mut rng()).unwrap();
    let b = metal::metal(48, 48, &mut rng()).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn zero_dimensions_are_rejected() {
    let noise = NoiseEngine::from_seed(1);
    assert_eq!(
        tech::nano(0, 512, &mut rng()).unwrap_err(),
        BuildError::InvalidDimensions {
            width: 0,
            height: 512
        }
    );
    assert!(matches!(
        terrain::fractal_noise(16, 0, &noise),
        Err(BuildError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        sprites::particle_sprite(0),
        Err(BuildError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        atmosphere::cloud(0, 0, &mut rng()),
        Err(BuildError::InvalidDimensions { .. })
    ));
}

#[test]
fn terrain_uses_only_jittered_surface_colors() {
    let noise = NoiseEngine::from_seed(4);
    let texture = terrain::terrain_color(64, 64, &noise, &mut rng()).unwrap();
    let palette = [
        terrain::Surface::Soil,
        terrain::Surface::Grass,
        terrain::Surface::Rock,
        terrain::Surface::Sand,
    ]
    .map(terrain::Surface::rgb);
    for px in texture.image().pixels() {
        let near = palette.iter().any(|rgb| {
            rgb.iter()
                .zip(px.0.iter())
                .all(|(&c, &p)| (c as i32 - p as i32).abs() <= 10)
        });
        assert!(near, "pixel {:?} is off palette", px.0);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn surface_thresholds() {
    use terrain::Surface;
    assert_eq!(Surface::classify(0.0), Surface::Soil);
    assert_eq!(Surface::classify(0.29), Surface::Soil);
    assert_eq!(Surface::classify(0.3), Surface::Grass);
    assert_eq!(Surface::classify(0.6), Surface::Rock);
    assert_eq!(Surface::classify(0.8), Surface::Sand);
    assert_eq!(Surface::classify(1.0), Surface::Sand);
}

#[test]
fn normal_maps_point_outward_and_are_linear() {
    let noise = NoiseEngine::from_seed(8);
    let texture = terrain::perlin_normal_map(32, 32, &noise).unwrap();
    assert_eq!(texture.color_space, ColorSpace::Linear);
    // nz is fixed at 1 before normalizing, so blue stays in the upper half
    assert!(texture.image().pixels().all(|p| p[2] >= 128));

    let random = metal::random_normal_map(32, 32, &mut rng()).unwrap();
    assert_eq!(random.color_space, ColorSpace::Linear);
}

fn assert_unit_normals(texture: &Texture) {
    for px in texture.image().pixels() {
        let [x, y, z] = terrain::decode_normal(*px);
        let length = (x * x + y * y + z * z).sqrt();
        assert!((length - 1.0).abs() < 0.02, "{} has |n| = {length}", texture.label);
        assert!(z > -0.01);
    }
}

#[test]
fn blurred_normal_maps_stay_unit_length() {
    let mut rng = rng();
    assert_unit_normals(&metal::random_normal_map(64, 64, &mut rng).unwrap());
    assert_unit_normals(&terrain::ground_normal(64, 64, &mut rng).unwrap());
    let noise = NoiseEngine::from_seed(8);
    assert_unit_normals(&terrain::perlin_normal_map(64, 64, &noise).unwrap());
}

#[test]
fn flat_normal_encodes_to_straight_up() {
    assert_eq!(terrain::encode_normal(0.0, 0.0, 1.0).0, [128, 128, 255, 255]);
    assert_eq!(terrain::encode_normal(0.0, 0.0, 0.0).0, [128, 128, 255, 255]);
}

#[test]
fn panorama_is_twice_as_wide() {
    let texture = atmosphere::space_panorama(128, 64, &mut rng()).unwrap();
    assert_eq!((texture.width(), texture.height()), (128, 64));
}

#[test]
fn catalog_covers_every_unassigned_generator() {
    let noise = NoiseEngine::from_seed(2);
    let textures = synthesis::catalog(16, &noise, &mut rng()).unwrap();
    assert_eq!(textures.len(), 14);
    let panorama = textures
        .iter()
        .find(|t| t.label == "space panorama")
        .unwrap();
    assert_eq!((panorama.width(), panorama.height()), (32, 16));
    assert!(textures.iter().all(|t| t.width() > 0 && t.height() > 0));
}

#[test]
fn catalog_rejects_zero_size() {
    let noise = NoiseEngine::from_seed(2);
    assert!(matches!(
        synthesis::catalog(0, &noise, &mut rng()),
        Err(BuildError::InvalidDimensions { .. })
    ));
}
