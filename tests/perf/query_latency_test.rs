use std::rc::Rc;
use std::time::Instant;

use crate::collation::Collation;
use crate::index::build_index;
use crate::search::search;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn warm_prefix_query_p95_under_15ms() {
    let collation = Rc::new(Collation::for_locale("en").expect("en collation should load"));
    let mut sources: Vec<(String, Rc<usize>)> = (0..10_000)
        .map(|i| (format!("Contact {i:05}"), Rc::new(i)))
        .collect();
    sources.push(("John Smith".to_string(), Rc::new(10_000)));
    let index = build_index(collation, sources);

    for _ in 0..30 {
        let _ = search(&index, "042");
        let _ = search(&index, "smi");
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(80);
        for _ in 0..80 {
            let start = Instant::now();
            let numbered = search(&index, "042");
            let named = search(&index, "smi");
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
            assert_eq!(numbered.len(), 100);
            assert_eq!(named.len(), 1);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 15.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 15.0ms); batches={batch_p95:?}",
    );
}
