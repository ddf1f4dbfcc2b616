use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use retouch::prelude::*;

/// Images up to 8x8 with samples in [0, 1]; channel count 0 stands for a
/// two-dimensional grayscale buffer.
fn image_strategy() -> impl Strategy<Value = PixelBuffer> {
    (1usize..8, 1usize..8, prop::sample::select(vec![0usize, 1, 3, 4])).prop_flat_map(
        |(height, width, channels)| {
            prop::collection::vec(0.0f32..=1.0, height * width * channels.max(1)).prop_map(
                move |data| {
                    if channels == 0 {
                        PixelBuffer::grayscale(height, width, data).unwrap()
                    } else {
                        PixelBuffer::interleaved(height, width, channels, data).unwrap()
                    }
                },
            )
        },
    )
}

fn operator_strategy() -> impl Strategy<Value = Box<dyn ImageOperation>> {
    prop_oneof![
        (0i64..4, 0i64..4).prop_map(|(w, h)| {
            Box::new(BoxBlur::new(2 * w + 1, 2 * h + 1).unwrap()) as Box<dyn ImageOperation>
        }),
        (-2.0f32..3.0).prop_map(|alpha| Box::new(Sharpen::new(alpha)) as Box<dyn ImageOperation>),
        Just(()).prop_map(|_| Box::new(Sobel::new()) as Box<dyn ImageOperation>),
        (0.0f32..3.0).prop_map(|v| Box::new(Brightness::new(v)) as Box<dyn ImageOperation>),
        (0.0f32..3.0).prop_map(|v| Box::new(Contrast::new(v)) as Box<dyn ImageOperation>),
        (0.0f32..3.0).prop_map(|v| Box::new(Saturation::new(v)) as Box<dyn ImageOperation>),
    ]
}

fn assert_close(a: &PixelBuffer, b: &PixelBuffer) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.samples().iter().zip(b.samples()) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-6);
    }
}

fn descriptors(json: &str) -> Vec<RawDescriptor> {
    serde_json::from_str(json).unwrap()
}

proptest! {
    #[test]
    fn operators_stay_in_unit_range(image in image_strategy(), op in operator_strategy()) {
        let out = op.apply(&image).unwrap();
        prop_assert!(out.is_normalized());
    }

    #[test]
    fn operators_preserve_shape_and_rank(image in image_strategy(), op in operator_strategy()) {
        let out = op.apply(&image).unwrap();
        prop_assert_eq!(out.shape(), image.shape());
    }

    #[test]
    fn identity_parameters(image in image_strategy()) {
        assert_close(&Brightness::new(1.0).apply(&image).unwrap(), &image);
        assert_close(&Contrast::new(1.0).apply(&image).unwrap(), &image);
        assert_close(&Saturation::new(1.0).apply(&image).unwrap(), &image);
        assert_close(&BoxBlur::new(1, 1).unwrap().apply(&image).unwrap(), &image);
        assert_close(&Sharpen::new(0.0).apply(&image).unwrap(), &image);
    }

    #[test]
    fn constant_image_survives_blur(
        value in 0.0f32..=1.0,
        height in 1usize..10,
        width in 1usize..10,
        half_w in 0i64..5,
        half_h in 0i64..5,
    ) {
        let image = PixelBuffer::filled(height, width, 3, value).unwrap();
        let blur = BoxBlur::new(2 * half_w + 1, 2 * half_h + 1).unwrap();
        assert_close(&blur.apply(&image).unwrap(), &image);
    }

    #[test]
    fn flat_image_has_no_edges(value in 0.0f32..=1.0, height in 1usize..10, width in 1usize..10) {
        let image = PixelBuffer::filled_grayscale(height, width, value).unwrap();
        let out = Sobel::new().apply(&image).unwrap();
        prop_assert!(out.samples().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn saturation_ignores_single_channel(
        value in -1.0f32..4.0,
        data in prop::collection::vec(0.0f32..=1.0, 12),
    ) {
        let flat = PixelBuffer::grayscale(3, 4, data.clone()).unwrap();
        prop_assert_eq!(Saturation::new(value).apply(&flat).unwrap(), flat);

        let single = PixelBuffer::interleaved(3, 4, 1, data).unwrap();
        prop_assert_eq!(Saturation::new(value).apply(&single).unwrap(), single);
    }
}

#[test]
fn brightness_on_mid_gray() {
    let pipeline = OperationPipeline::with_builtins();
    let image = PixelBuffer::filled_grayscale(4, 4, 0.5).unwrap();

    let result = pipeline.run(image, &descriptors(r#"[{"type": "brightness", "value": 1.2}]"#), None);

    assert_eq!(result.image.shape().to_string(), "(4, 4)");
    for &v in result.image.samples() {
        assert_abs_diff_eq!(v, 0.6, epsilon = 1e-6);
    }
}

#[test]
fn missing_parameter_skips_only_that_step() {
    let pipeline = OperationPipeline::with_builtins();
    let image = PixelBuffer::interleaved(
        3,
        3,
        3,
        (0..27).map(|i| i as f32 / 27.0).collect(),
    )
    .unwrap();

    let result = pipeline.run(
        image.clone(),
        &descriptors(r#"[{"type": "blur", "width": 3, "height": 3}, {"type": "sharpen"}]"#),
        None,
    );

    let blurred = BoxBlur::new(3, 3).unwrap().apply(&image).unwrap();
    assert_eq!(result.image, blurred);
    assert_eq!(result.failures().count(), 1);
    assert!(matches!(
        result.steps[1].status,
        StepStatus::Failed {
            error: OperationError::MissingParameter { .. }
        }
    ));
}

#[test]
fn factors_beyond_f32_range_are_rejected() {
    let pipeline = OperationPipeline::with_builtins();
    let image = PixelBuffer::grayscale(1, 3, vec![0.0, 0.5, 1.0]).unwrap();

    for json in [
        r#"[{"type": "brightness", "value": 1e39}]"#,
        r#"[{"type": "contrast", "value": 1e39}]"#,
        r#"[{"type": "sharpen", "alpha": 1e39}]"#,
        r#"[{"type": "saturation", "value": -1e39}]"#,
    ] {
        let result = pipeline.run(image.clone(), &descriptors(json), None);

        assert_eq!(result.failed_count(), 1, "{}", json);
        assert!(matches!(
            result.steps[0].status,
            StepStatus::Failed {
                error: OperationError::InvalidParameter { .. }
            }
        ));
        assert!(result.image.is_normalized());
        assert_eq!(result.image, image);
    }
}

#[test]
fn oversized_blur_fails_alone() {
    let pipeline = OperationPipeline::with_builtins();
    let image = PixelBuffer::grayscale(1, 2, vec![0.1, 0.2]).unwrap();

    let result = pipeline.run(
        image,
        &descriptors(
            r#"[
                {"type": "blur", "width": 9223372036854775807, "height": 1},
                {"type": "brightness", "value": 2}
            ]"#,
        ),
        None,
    );

    assert!(matches!(
        result.steps[0].status,
        StepStatus::Failed {
            error: OperationError::Buffer {
                error: BufferError::KernelTooLarge { .. },
                ..
            }
        }
    ));
    assert!(result.steps[1].is_applied());
    assert_abs_diff_eq!(result.image.samples()[0], 0.2, epsilon = 1e-6);
    assert_abs_diff_eq!(result.image.samples()[1], 0.4, epsilon = 1e-6);
}

#[test]
fn unsupported_types_never_reach_execution() {
    let pipeline = OperationPipeline::with_builtins();
    let image = PixelBuffer::filled_grayscale(2, 2, 0.3).unwrap();

    let result = pipeline.run(
        image.clone(),
        &descriptors(r#"[{"type": "emboss"}, {"type": "  Contrast ", "value": 1.0}]"#),
        None,
    );

    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps[0].operation, "contrast");
    assert_eq!(
        result.validation.errors,
        vec![ValidationError::UnsupportedOperation {
            index: 0,
            op_type: "emboss".to_string(),
        }]
    );
    assert_close(&result.image, &image);
}

#[test]
fn editor_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.png");
    let output = dir.path().join("out").join("result.png");
    let config_path = dir.path().join("config.json");

    let rgba = PixelBuffer::interleaved(2, 2, 4, vec![0.8; 16]).unwrap();
    save_image(&rgba, &input).unwrap();

    let config = serde_json::json!({
        "input": input,
        "output": output,
        "operations": [
            {"type": "saturation", "value": 0.0},
            {"type": "brightness"}
        ]
    });
    std::fs::write(&config_path, config.to_string()).unwrap();

    let editor = ImageEditor::new(EditorConfig::from_path(&config_path).unwrap()).unwrap();
    let outcome = editor.run(None).unwrap();

    assert_eq!(outcome.result.applied_count(), 1);
    assert_eq!(outcome.result.failed_count(), 1);

    let written = load_image(outcome.saved_to.unwrap()).unwrap();
    assert_eq!(written.channels(), 3);
}
