/// End-to-end checks through the flat-buffer entry points a JS host uses.

use fake_glow::engine::raster::PreviewView;
use fake_glow::glow::params::PARAMS_LEN;
use fake_glow::material::MATERIAL_BUFFER_LEN;
use fake_glow::math::math3d;
use fake_glow::{
    composite_additive, default_params, evaluate_fragments, material_from_toml, material_to_toml,
    parameter_descriptors, parse_glow_color, render_preview, tone_map, FakeGlowMaterial, FragmentContext,
    FresnelGuard, Rgb, SharedParameters, ToneMapping, Vec3D,
};

const CAMERA: [f64; 3] = [0.0, 0.0, 6.0];

/// Fragments on the +Z face of a unit sphere, sweeping from facing to grazing.
fn sphere_arc(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for i in 0..n {
        let angle = i as f64 / (n - 1) as f64 * std::f64::consts::FRAC_PI_2;
        let (s, c) = angle.sin_cos();
        positions.extend_from_slice(&[s, 0.0, c]);
        normals.extend_from_slice(&[s, 0.0, c]);
    }
    (positions, normals)
}

#[test]
fn test_default_buffer_roundtrips_through_material() {
    let buf = default_params();
    assert_eq!(buf.len(), MATERIAL_BUFFER_LEN);
    assert_eq!(FakeGlowMaterial::from_buffer(&buf), FakeGlowMaterial::default());
}

#[test]
fn test_evaluate_fragments_bounds() {
    let (positions, normals) = sphere_arc(33);
    let mut rgba = vec![0.0; 33 * 4];
    let shaded = evaluate_fragments(&default_params(), &[], &CAMERA, &positions, &normals, &mut rgba, 0, 1);
    assert_eq!(shaded, 33);

    for px in rgba.chunks_exact(4) {
        for &v in px {
            assert!((0.0..=1.0).contains(&v), "{px:?}");
        }
    }
    // Facing fragment saturates to full opacity; the grazing one fades out
    assert_eq!(rgba[3], 1.0);
    assert!(rgba[32 * 4 + 3] < 1e-6);
}

#[test]
fn test_evaluate_fragments_alpha_monotonic_toward_rim() {
    let (positions, normals) = sphere_arc(17);
    let mut material = FakeGlowMaterial::default();
    material.params.opacity = 10.0; // keep the opacity clamp out of the way
    material.params.falloff = 1.0;
    let mut rgba = vec![0.0; 17 * 4];
    evaluate_fragments(&material.to_buffer(), &[], &CAMERA, &positions, &normals, &mut rgba, 0, 1);

    let alphas: Vec<f64> = rgba.chunks_exact(4).map(|px| px[3]).collect();
    for pair in alphas.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12, "{alphas:?}");
    }
}

#[test]
fn test_model_matrix_matches_prepared_world_space() {
    let model = math3d::mat4_from_rotation_scale_translation(
        &math3d::mat3_from_euler(0.2, -0.4, 0.1),
        1.0,
        &Vec3D::new(0.0, -0.3, 0.0),
    );
    let mut cols = [0.0; 16];
    for row in 0..4 {
        for col in 0..4 {
            cols[col * 4 + row] = model.m[row][col];
        }
    }

    let (positions, normals) = sphere_arc(5);
    let mut via_model = vec![0.0; 20];
    evaluate_fragments(&default_params(), &cols, &CAMERA, &positions, &normals, &mut via_model, 0, 1);

    let material = FakeGlowMaterial::default();
    for i in 0..5 {
        let ctx = FragmentContext::from_object_space(
            &model,
            &Vec3D::from_slice(&positions, i * 3),
            &Vec3D::from_slice(&normals, i * 3),
            Vec3D::new(0.0, 0.0, 6.0),
        );
        let expected = material.evaluate(&ctx).to_rgba();
        for (a, b) in via_model[i * 4..i * 4 + 4].iter().zip(expected) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}

#[test]
fn test_tone_map_modes_agree_at_unit_exposure() {
    let colors = [0.0, 0.0, 0.0, 0.25, 0.5, 0.75, 1.0, 1.0, 1.0, 4.0, 2.0, 0.5];
    let mut delegated = [0.0; 12];
    let mut inline = [0.0; 12];
    assert_eq!(tone_map(&colors, 1.0, 0, &mut delegated), 4);
    assert_eq!(tone_map(&colors, 1.0, 1, &mut inline), 4);
    for (a, b) in delegated.iter().zip(inline) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn test_tone_map_white_fixture() {
    let mut out = [0.0; 3];
    tone_map(&[1.0, 1.0, 1.0], 0.6, 1, &mut out);
    assert!((out[0] - 0.619115).abs() < 1e-5);
    assert!((out[1] - 0.619115).abs() < 1e-5);
    assert!((out[2] - 0.619109).abs() < 1e-5);
}

#[test]
fn test_composite_over_preview() {
    let view = PreviewView { width: 16, height: 16, ..Default::default() };
    let mut view_buf = vec![16.0, 16.0];
    for v in [view.camera_pos, view.ray_dir_base, view.ray_dx, view.ray_dy, view.sphere_center] {
        view_buf.extend_from_slice(&[v.x, v.y, v.z]);
    }
    view_buf.push(view.sphere_radius);
    view_buf.extend_from_slice(&view.background.to_array());

    let mut fb = vec![0.0; 16 * 16 * 4];
    let rows_a = render_preview(&view_buf, &default_params(), &mut fb, 0, 2);
    let rows_b = render_preview(&view_buf, &default_params(), &mut fb, 1, 2);
    assert_eq!(rows_a + rows_b, 16);

    // Adding a zero-alpha layer leaves the frame unchanged
    let before = fb.clone();
    let layer = vec![1.0, 1.0, 1.0, 0.0].repeat(16 * 16);
    assert_eq!(composite_additive(&mut fb, &layer), 256);
    assert_eq!(fb, before);
}

#[test]
fn test_preset_to_buffer() {
    let buf = material_from_toml("fresnel_guard = \"unguarded\"\n[params]\nfalloff = 0.25\n").unwrap();
    assert_eq!(buf[0], 0.25);
    assert_eq!(buf[PARAMS_LEN + 1], FresnelGuard::Unguarded.id() as f64);

    let text = material_to_toml(&buf).unwrap();
    assert!(text.contains("falloff = 0.25"));
}

#[test]
fn test_color_and_descriptors() {
    let c = parse_glow_color("#8039ea").unwrap();
    assert_eq!(c.len(), 3);
    assert!((c[0] - 128.0 / 255.0).abs() < 1e-12);

    let descriptors = parameter_descriptors();
    let lines: Vec<&str> = descriptors.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("falloff,Falloff,0,1,"));
}

#[test]
fn test_frame_snapshot_drives_evaluation() {
    let shared = SharedParameters::default();
    let material = FakeGlowMaterial::default().with_tone_mapping(ToneMapping::Delegated);
    let evaluator = material.evaluator();
    let ctx = FragmentContext::new(Vec3D::ZERO, Vec3D::new(0.0, 0.0, 1.0), Vec3D::new(0.0, 0.0, 6.0));

    let frame1 = shared.snapshot();
    shared.update(|p| p.glow_color = Rgb::new(0.0, 1.0, 0.0));
    let frame2 = shared.snapshot();

    let a = evaluator.evaluate(&frame1.params, &ctx);
    let b = evaluator.evaluate(&frame2.params, &ctx);
    assert_eq!(a.alpha, b.alpha);
    assert_ne!(a.color, b.color);
    assert!(frame2.revision > frame1.revision);
}
