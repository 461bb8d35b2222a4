#![cfg(feature = "rayon")]

//! Parallel classification must match the sequential result exactly.

use wheelmatch::correlate::rayon::correlate_plan_par;
use wheelmatch::{
    classify, correlate_plan, ClassifyConfig, ImageView, Template, TemplateLibrary, TemplatePlan,
};

fn noise(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let v = (x as u32)
                .wrapping_mul(2654435761)
                .wrapping_add((y as u32).wrapping_mul(40503))
                .wrapping_add(seed.wrapping_mul(2246822519));
            data.push(((v ^ (v >> 13)) & 0xFF) as u8);
        }
    }
    data
}

#[test]
fn parallel_classification_matches_sequential() {
    let templates = (0u8..=36)
        .map(|label| Template::new(label, noise(14, 14, 500 + label as u32), 14, 14).unwrap())
        .collect();
    let library = TemplateLibrary::from_templates(templates).unwrap();

    let target = noise(40, 32, 7777);
    let view = ImageView::from_slice(&target, 40, 32).unwrap();

    let seq_cfg = ClassifyConfig::default();
    let par_cfg = ClassifyConfig {
        parallel: true,
        ..seq_cfg
    };

    let seq = classify(view, &library, &seq_cfg).unwrap();
    let par = classify(view, &library, &par_cfg).unwrap();
    assert_eq!(seq, par);
}

#[test]
fn row_parallel_scan_matches_scalar() {
    let image = noise(64, 48, 11);
    let tpl = noise(9, 9, 12);
    let image_view = ImageView::from_slice(&image, 64, 48).unwrap();
    let tpl_view = ImageView::from_slice(&tpl, 9, 9).unwrap();
    let plan = TemplatePlan::from_view(tpl_view).unwrap();

    let scalar = correlate_plan(image_view, &plan, 1e-8).unwrap();
    let parallel = correlate_plan_par(image_view, &plan, 1e-8).unwrap();

    assert_eq!((scalar.x, scalar.y), (parallel.x, parallel.y));
    assert!((scalar.score - parallel.score).abs() <= 1e-6);
}
