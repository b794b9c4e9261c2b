use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::path::Path;

use sitemerge::{
    from_xml_str, merge_fragments, parse_fragment, render, xml, Classified, RecordingReporter,
    RootKind, SITEMAP_NAMESPACE,
};

fn urlset(file: usize, urls: usize) -> String {
    let body: String = (0..urls)
        .map(|i| {
            format!(
                "\n  <url>\n    <loc>https://example.com/{file}/{i}</loc>\n    <lastmod>2024-01-01</lastmod>\n  </url>"
            )
        })
        .collect();
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{SITEMAP_NAMESPACE}\">{body}\n</urlset>")
}

fn bench_parse(c: &mut Criterion) {
    let input = urlset(0, 1_000);
    c.bench_function("sitemerge_parse_1k_urls", |b| {
        b.iter(|| from_xml_str(black_box(&input)))
    });
}

fn bench_merge_render(c: &mut Criterion) {
    let inputs: Vec<String> = (0..10).map(|file| urlset(file, 200)).collect();
    c.bench_function("sitemerge_merge_render_10x200", |b| {
        b.iter(|| {
            let population: Vec<Classified> = inputs
                .iter()
                .filter_map(|input| {
                    parse_fragment(Path::new("bench.xml"), input.as_bytes(), xml::Config::default())
                        .ok()
                })
                .map(Classified::Parsed)
                .collect();
            let (document, _) =
                merge_fragments(RootKind::UrlSet, population, &mut RecordingReporter::new());
            render(&document.into_element(), &xml::FormatConfig::default())
        })
    });
}

criterion_group!(benches, bench_parse, bench_merge_render);
criterion_main!(benches);
