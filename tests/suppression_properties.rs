use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tinydet::{iou, suppress, BBox, SuppressionPolicy};

fn random_boxes(rng: &mut StdRng, count: usize) -> Vec<BBox> {
    (0..count)
        .map(|_| {
            let class = rng.random_range(0..3usize);
            BBox {
                class,
                label: format!("class{class}"),
                confidence: rng.random_range(0.0..1.0),
                x: rng.random_range(0.0..300.0),
                y: rng.random_range(0.0..300.0),
                width: rng.random_range(0.0..120.0),
                height: rng.random_range(0.0..120.0),
            }
        })
        .collect()
}

#[test]
fn never_exceeds_max_boxes_and_only_returns_inputs() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        let candidates = random_boxes(&mut rng, 60);
        let max_boxes = rng.random_range(0..10);
        let threshold = rng.random_range(0.0..1.0);

        let kept = suppress(
            candidates.clone(),
            max_boxes,
            threshold,
            SuppressionPolicy::ClassAgnostic,
        );
        assert!(kept.len() <= max_boxes.min(candidates.len()));
        for b in &kept {
            assert!(candidates.contains(b));
        }
    }
}

#[test]
fn survivors_are_sorted_and_pairwise_below_threshold() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..10 {
        let candidates = random_boxes(&mut rng, 80);
        let threshold = rng.random_range(0.1..0.9);
        let kept = suppress(
            candidates,
            usize::MAX,
            threshold,
            SuppressionPolicy::ClassAgnostic,
        );

        for pair in kept.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
        for (i, a) in kept.iter().enumerate() {
            for b in kept.iter().skip(i + 1) {
                assert!(iou(a, b) < threshold);
            }
        }
    }
}

#[test]
fn suppression_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..10 {
        let candidates = random_boxes(&mut rng, 40);
        let threshold = rng.random_range(0.1..0.9);
        let max_boxes = rng.random_range(1..20);

        for policy in [
            SuppressionPolicy::ClassAgnostic,
            SuppressionPolicy::ClassAware,
        ] {
            let once = suppress(candidates.clone(), max_boxes, threshold, policy);
            let twice = suppress(once.clone(), max_boxes, threshold, policy);
            assert_eq!(once, twice);
        }
    }
}

#[test]
fn empty_input_returns_empty() {
    assert!(suppress(Vec::new(), 5, 0.5, SuppressionPolicy::ClassAgnostic).is_empty());
    assert!(suppress(Vec::new(), 0, 0.0, SuppressionPolicy::ClassAware).is_empty());
}

#[test]
fn threshold_zero_keeps_a_single_box() {
    // Every remaining candidate has IoU >= 0 with the first pick, so the
    // most aggressive threshold reduces any pool to one box.
    let mut rng = StdRng::seed_from_u64(19);
    let candidates = random_boxes(&mut rng, 30);
    let best = candidates
        .iter()
        .cloned()
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
        .unwrap();

    let kept = suppress(candidates, 10, 0.0, SuppressionPolicy::ClassAgnostic);
    assert_eq!(kept, vec![best]);
}

#[test]
fn equal_confidence_ties_keep_input_order() {
    let mk = |x: f32| BBox {
        class: 0,
        label: "tie".to_string(),
        confidence: 0.7,
        x,
        y: 0.0,
        width: 10.0,
        height: 10.0,
    };
    // Three disjoint boxes with identical confidence: the stable sort must
    // not reorder them.
    let candidates = vec![mk(0.0), mk(100.0), mk(200.0)];
    let kept = suppress(
        candidates.clone(),
        5,
        0.5,
        SuppressionPolicy::ClassAgnostic,
    );
    assert_eq!(kept, candidates);
}

#[test]
fn degenerate_boxes_survive_alongside_anything() {
    let line = BBox {
        class: 0,
        label: "line".to_string(),
        confidence: 0.9,
        x: 5.0,
        y: 5.0,
        width: 0.0,
        height: 50.0,
    };
    let solid = BBox {
        class: 0,
        label: "solid".to_string(),
        confidence: 0.8,
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    };
    // IoU with a zero-area box is defined as 0, so both are kept.
    let kept = suppress(
        vec![line.clone(), solid.clone()],
        5,
        0.5,
        SuppressionPolicy::ClassAgnostic,
    );
    assert_eq!(kept, vec![line, solid]);
}
