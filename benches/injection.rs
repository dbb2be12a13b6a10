//! Highlight Injection Benchmarks
//!
//! Measures a full injection pass over a long chapter.
//!
//! Run with: `cargo bench --bench injection`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use los_libros_highlights::{Highlight, HighlightInjector};

/// Build a chapter of numbered paragraphs
fn create_chapter(paragraphs: usize) -> String {
    let mut html = String::from("<html><body>");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>Paragraph {} talks about the caf&eacute; on the corner, \
             where &#x201C;everything&#x201D; happened in chapter {}.</p>",
            i, i
        ));
    }
    html.push_str("</body></html>");
    html
}

/// One highlight per `step` paragraphs, anchored on the paragraph number
fn create_highlights(paragraphs: usize, step: usize) -> Vec<Highlight> {
    (0..paragraphs)
        .step_by(step)
        .map(|i| {
            Highlight::new("talks about the café").with_context(&format!("Paragraph {} ", i), " on the corner")
        })
        .collect()
}

fn bench_injection(c: &mut Criterion) {
    let mut group = c.benchmark_group("inject_highlights");
    let injector = HighlightInjector::default();

    for paragraphs in [50, 200] {
        let html = create_chapter(paragraphs);
        let highlights = create_highlights(paragraphs, 10);

        group.bench_with_input(
            BenchmarkId::from_parameter(paragraphs),
            &(html, highlights),
            |b, (html, highlights)| {
                b.iter(|| injector.inject(black_box(html), black_box(highlights)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_injection);
criterion_main!(benches);
