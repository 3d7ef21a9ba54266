use ndarray::{Array3, Axis};
use noisy_dataset::{NoiseError, NoiseMode, NoiseModel, NoiseParam};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

/// Three identical channels holding a smooth ramp.
fn rgb_ramp() -> Array3<f64> {
    Array3::from_shape_fn((24, 32, 3), |(y, x, _)| (y * 32 + x) as f64 / 767.0)
}

fn all_models() -> Vec<NoiseModel> {
    vec![
        NoiseModel::gaussian(0.0, 0.01),
        NoiseModel::speckle(0.0, 0.05),
        NoiseModel::poisson(),
        NoiseModel::salt_and_pepper(0.1, 0.5),
    ]
}

// -- Construction --

#[test]
fn every_allowed_subset_constructs() {
    for mode in NoiseMode::ALL {
        let allowed = mode.allowed_params();
        for mask in 0..(1u32 << allowed.len()) {
            let params: Vec<(&str, f64)> = allowed
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, p)| (p.name(), 0.1))
                .collect();
            assert!(
                NoiseModel::new(mode.name(), params.clone()).is_ok(),
                "{} with {params:?}",
                mode.name()
            );
        }
    }
}

#[test]
fn every_disallowed_key_is_rejected() {
    for mode in NoiseMode::ALL {
        for param in NoiseParam::ALL {
            if mode.allows(*param) {
                continue;
            }
            let result = NoiseModel::new(mode.name(), [(param.name(), 0.1)]);
            assert_eq!(
                result,
                Err(NoiseError::InvalidParameter {
                    key: param.name().to_owned(),
                    mode: *mode,
                })
            );
            let typed = NoiseModel::with_params(*mode, [(*param, Some(0.1))]);
            assert!(matches!(typed, Err(NoiseError::InvalidParameter { .. })));
        }
    }
}

#[test]
fn unknown_keys_are_rejected() {
    let result = NoiseModel::new("gaussian", [("sigma", 0.1)]);
    assert!(matches!(
        result,
        Err(NoiseError::InvalidParameter { ref key, mode: NoiseMode::Gaussian }) if key == "sigma"
    ));
}

#[test]
fn unknown_modes_are_rejected() {
    for mode in ["", "blur", "salt_and_pepper", "Poisson", "s & p"] {
        assert_eq!(
            NoiseModel::new(mode, Vec::<(&str, f64)>::new()),
            Err(NoiseError::InvalidMode(mode.to_owned()))
        );
    }
}

#[test]
fn out_of_range_values_construct() {
    assert!(NoiseModel::new("gaussian", [("var", -1.0)]).is_ok());
    assert!(NoiseModel::new("s&p", [("amount", 2.0)]).is_ok());
}

// -- Canonical name --

#[test]
fn canonical_name_examples() {
    let model = NoiseModel::new("gaussian", [("mean", 0.0), ("var", 0.001)]).unwrap();
    assert_eq!(model.canonical_name(), "gaussian_mean0_var0p001");

    let model = NoiseModel::new("poisson", Vec::<(&str, f64)>::new()).unwrap();
    assert_eq!(model.canonical_name(), "poisson");

    let model = NoiseModel::new("s&p", [("amount", 0.05), ("salt_vs_pepper", 0.5)]).unwrap();
    assert_eq!(model.canonical_name(), "s&p_amount0p05_salt_vs_pepper0p5");
}

#[test]
fn canonical_name_is_stable() {
    let a = NoiseModel::new("speckle", [("mean", 0.0), ("var", 0.1)]).unwrap();
    let b = NoiseModel::new("speckle", [("mean", 0.0), ("var", 0.1)]).unwrap();
    assert_eq!(a.canonical_name(), a.canonical_name());
    assert_eq!(a.canonical_name(), b.canonical_name());
}

#[test]
fn canonical_name_follows_insertion_order() {
    let model = NoiseModel::new("gaussian", [("var", 0.01), ("mean", 0.5)]).unwrap();
    assert_eq!(model.canonical_name(), "gaussian_var0p01_mean0p5");
}

#[test]
fn changing_a_value_changes_the_name() {
    let base = NoiseModel::gaussian(0.0, 0.01).canonical_name();
    assert_ne!(NoiseModel::gaussian(0.0, 0.02).canonical_name(), base);
    assert_ne!(NoiseModel::gaussian(0.1, 0.01).canonical_name(), base);
    assert_ne!(NoiseModel::speckle(0.0, 0.01).canonical_name(), base);
}

#[test]
fn canonical_name_has_no_dots_or_separators() {
    for model in all_models() {
        let name = model.canonical_name();
        assert!(!name.contains('.'), "{name}");
        assert!(!name.contains('/'), "{name}");
        assert!(!name.ends_with('_'), "{name}");
    }
}

// -- apply --

#[test]
fn apply_preserves_shape() {
    let image = rgb_ramp();
    for model in all_models() {
        let noisy = model.apply(&image, &mut test_rng()).unwrap();
        assert_eq!(noisy.dim(), image.dim(), "{}", model.canonical_name());
    }
}

#[test]
fn apply_does_not_mutate_input() {
    let image = rgb_ramp();
    let snapshot = image.clone();
    for model in all_models() {
        model.apply(&image, &mut test_rng()).unwrap();
        assert_eq!(image, snapshot);
    }
}

#[test]
fn apply_keeps_unit_range() {
    let image = rgb_ramp();
    for model in all_models() {
        let noisy = model.apply(&image, &mut test_rng()).unwrap();
        assert!(
            noisy.iter().all(|v| (0.0..=1.0).contains(v)),
            "{}",
            model.canonical_name()
        );
    }
}

#[test]
fn zero_noise_parameters_are_identity() {
    let image = rgb_ramp();
    for model in [
        NoiseModel::gaussian(0.0, 0.0),
        NoiseModel::speckle(0.0, 0.0),
        NoiseModel::salt_and_pepper(0.0, 0.5),
    ] {
        let noisy = model.apply(&image, &mut test_rng()).unwrap();
        for (out, orig) in noisy.iter().zip(image.iter()) {
            assert!((out - orig).abs() < 1e-12, "{}", model.canonical_name());
        }
    }
}

#[test]
fn channels_receive_independent_noise() {
    let image = Array3::from_elem((16, 16, 3), 0.5);
    for model in all_models() {
        let noisy = model.apply(&image, &mut test_rng()).unwrap();
        let red = noisy.index_axis(Axis(2), 0);
        let green = noisy.index_axis(Axis(2), 1);
        let blue = noisy.index_axis(Axis(2), 2);
        assert_ne!(red, green, "{}", model.canonical_name());
        assert_ne!(green, blue, "{}", model.canonical_name());
    }
}

#[test]
fn single_channel_images_are_supported() {
    let image = Array3::from_elem((10, 10, 1), 0.25);
    for model in all_models() {
        let noisy = model.apply(&image, &mut test_rng()).unwrap();
        assert_eq!(noisy.dim(), (10, 10, 1));
    }
}

#[test]
fn same_seed_reproduces_output() {
    let image = rgb_ramp();
    for model in all_models() {
        let a = model.apply(&image, &mut test_rng()).unwrap();
        let b = model.apply(&image, &mut test_rng()).unwrap();
        assert_eq!(a, b, "{}", model.canonical_name());
    }
}

#[test]
fn successive_calls_draw_fresh_noise() {
    let image = rgb_ramp();
    let mut rng = test_rng();
    let model = NoiseModel::gaussian(0.0, 0.01);
    let a = model.apply(&image, &mut rng).unwrap();
    let b = model.apply(&image, &mut rng).unwrap();
    assert_ne!(a, b);
}

#[test]
fn invalid_values_fail_at_apply() {
    let image = rgb_ramp();
    let model = NoiseModel::new("gaussian", [("var", -1.0)]).unwrap();
    assert!(matches!(
        model.apply(&image, &mut test_rng()),
        Err(NoiseError::Distribution(_))
    ));
    let model = NoiseModel::new("s&p", [("amount", 2.0)]).unwrap();
    assert!(matches!(
        model.apply(&image, &mut test_rng()),
        Err(NoiseError::Distribution(_))
    ));
}
