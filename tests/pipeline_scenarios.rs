mod common;

use common::{FIELD, INNER, LOBE, canvas, emblem_scene, init_logging, paint, paint_emblem};
use emblem_scan::config::Bounds;
use emblem_scan::detector::features::FeatureIdGen;
use emblem_scan::pipeline::{extract_features, segment};
use emblem_scan::{
    Detector, DetectorConfig, EmblemError, Image, PixelFormat, PipelineTelemetry, Rect, detect,
};

#[test]
fn single_emblem_is_found_with_its_ring() {
    init_logging();
    let scene = emblem_scene();

    let detections = detect(&scene).unwrap();

    assert_eq!(detections.len(), 1);
    let emblem = detections[0];
    assert_eq!(emblem.rect, Rect::new(55, 55, 96, 96));
    // 2 x 24 x 24 inner pixels less the 8 patch corners the median
    // filter rounds off, over the 60x60 lobe rectangle
    assert!((emblem.fill_ratio - 1144.0 / 3600.0).abs() < 1e-9);
    assert!(emblem.ring_compactness > 0.5 && emblem.ring_compactness < 1.0);
}

#[test]
fn telemetry_follows_each_stage() {
    init_logging();
    let (_, telemetry) = Detector::default()
        .detect_with_telemetry(&emblem_scene())
        .unwrap();

    assert_eq!(
        telemetry,
        PipelineTelemetry {
            components: 2,
            quarter_candidates: 2,
            candidates: 2,
            pairs: 1,
            fill_accepted: 1,
            ring_rejected: 0,
            detections: 1,
        }
    );
}

#[test]
fn lone_lobe_is_not_an_emblem() {
    init_logging();
    let mut scene = emblem_scene();
    paint(&mut scene, 100..130, 100..130, FIELD);

    let (detections, telemetry) = Detector::default()
        .detect_with_telemetry(&scene)
        .unwrap();

    assert!(detections.is_empty());
    assert_eq!(telemetry.components, 1);
    assert_eq!(telemetry.candidates, 0);
    assert_eq!(telemetry.pairs, 0);
}

#[test]
fn lobes_without_inner_field_are_dropped() {
    init_logging();
    let mut scene = emblem_scene();
    paint(&mut scene, 73..97, 103..127, FIELD);
    paint(&mut scene, 103..127, 73..97, FIELD);

    let (detections, telemetry) = Detector::default()
        .detect_with_telemetry(&scene)
        .unwrap();

    assert!(detections.is_empty());
    assert_eq!(telemetry.components, 2);
    assert_eq!(telemetry.candidates, 0);
}

#[test]
fn distant_small_lobes_have_no_partner() {
    init_logging();
    // 10x10 lobes 110 rows apart on a tall field: each search window
    // spans only twice the lobe width around its centroid.
    let mut scene = canvas(200, 200);
    paint(&mut scene, 20..180, 15..75, FIELD);
    paint(&mut scene, 30..170, 30..60, INNER);
    paint(&mut scene, 40..50, 40..50, LOBE);
    paint(&mut scene, 150..160, 40..50, LOBE);

    let (detections, telemetry) = Detector::default()
        .detect_with_telemetry(&scene)
        .unwrap();

    assert!(detections.is_empty());
    assert_eq!(telemetry.components, 2);
    assert_eq!(telemetry.candidates, 0);
    assert_eq!(telemetry.pairs, 0);
}

#[test]
fn two_emblems_are_reported_in_scan_order() {
    init_logging();
    let mut scene = canvas(400, 200);
    paint_emblem(&mut scene, 50, 50);
    paint_emblem(&mut scene, 250, 50);

    let detections = detect(&scene).unwrap();

    let rects: Vec<Rect> = detections.iter().map(|d| d.rect).collect();
    assert_eq!(
        rects,
        vec![Rect::new(55, 55, 96, 96), Rect::new(255, 55, 96, 96)]
    );
}

#[test]
fn irregular_ring_threshold_rejects_pair() {
    init_logging();
    let detector = Detector::new(DetectorConfig {
        max_ring_compactness: 0.5,
        ..DetectorConfig::default()
    });

    let (detections, telemetry) = detector.detect_with_telemetry(&emblem_scene()).unwrap();

    assert!(detections.is_empty());
    assert_eq!(telemetry.fill_accepted, 1);
    assert_eq!(telemetry.ring_rejected, 1);
}

#[test]
fn white_fill_window_is_applied() {
    init_logging();
    let detector = Detector::new(DetectorConfig {
        white_fill: Bounds::open(0.35, 0.55),
        ..DetectorConfig::default()
    });

    let (detections, telemetry) = detector.detect_with_telemetry(&emblem_scene()).unwrap();

    assert!(detections.is_empty());
    assert_eq!(telemetry.pairs, 1);
    assert_eq!(telemetry.fill_accepted, 0);
}

#[test]
fn identifiers_restart_for_every_run() {
    let scene = emblem_scene();
    let config = DetectorConfig::default();

    for _ in 0..2 {
        let masks = segment(&scene, &config).unwrap();
        let mut ids = FeatureIdGen::new();
        let features = extract_features(&masks.blue, &config, &mut ids).unwrap();
        let labels: Vec<u32> = features.iter().map(|f| f.id().0).collect();
        assert_eq!(labels, vec![1, 2]);
    }

    let first = detect(&scene).unwrap();
    let second = detect(&scene).unwrap();
    assert_eq!(first, second);
}

#[test]
fn input_image_is_left_untouched() {
    let scene = emblem_scene();
    let before = scene.clone();
    detect(&scene).unwrap();
    assert_eq!(scene, before);
    assert_eq!(scene.pixel(110, 80), &INNER);
}

#[test]
fn malformed_inputs_are_rejected() {
    assert!(matches!(
        Image::from_raw(8, 8, 4, vec![0; 8 * 8 * 4]),
        Err(EmblemError::UnsupportedChannels(4))
    ));

    let mask = Image::new(8, 8, PixelFormat::Gray).unwrap();
    let err = detect(&mask).unwrap_err();
    assert!(err.is_precondition());
    assert!(matches!(err, EmblemError::FormatMismatch { .. }));
}
