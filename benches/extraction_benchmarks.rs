#![allow(missing_docs)]
//! Catalogue extraction benchmarks.
//!
//! Compares mapping a synthetic DCAT catalogue dataset by dataset against the
//! rayon-parallel `extract_catalog`.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dcat_harvester::{
    extract_catalog, extract_dataset, GraphAccessor, HarvestConfig, RdfFormat, RdfGraph,
};

/// Builds a Turtle catalogue with `count` datasets of two distributions each.
fn synthetic_catalog(count: usize) -> String {
    let mut turtle = String::from(
        "@prefix dcat: <http://www.w3.org/ns/dcat#> .\n\
         @prefix dct: <http://purl.org/dc/terms/> .\n\
         @prefix vcard: <http://www.w3.org/2006/vcard/ns#> .\n",
    );
    for n in 0..count {
        turtle.push_str(&format!(
            "<http://ex.org/ds/{n}> a dcat:Dataset ;\n\
               dct:identifier \"https://data.bl.ch/explore/dataset/{n}/\" ;\n\
               dct:title \"Datensatz {n}\"@de, \"Dataset {n}\"@en ;\n\
               dct:description \"<p>Beschreibung {n}</p>\"@de ;\n\
               dcat:keyword \"statistik\"@de, \"statistics\"@en ;\n\
               dcat:theme <http://publications.europa.eu/resource/authority/data-theme/ECON> ;\n\
               dct:relation \"http://ex.org/a/{n}; http://ex.org/b/{n}\" ;\n\
               dcat:contactPoint [ vcard:fn \"Statistisches Amt\" ; vcard:hasEmail <mailto:stat@bl.ch> ] ;\n\
               dcat:distribution [ dct:title \"CSV\"@de ; dcat:mediaType <https://www.iana.org/assignments/media-types/text/csv> ;\n\
                                   dcat:downloadURL <https://data.bl.ch/{n}.csv> ],\n\
                                 [ dcat:mediaType <https://www.iana.org/assignments/media-types/application/pdf> ] .\n"
        ));
    }
    turtle
}

fn load_graph(count: usize) -> RdfGraph {
    RdfGraph::parse(&synthetic_catalog(count), RdfFormat::Turtle).expect("synthetic catalogue parses")
}

/// Benchmark parsing a 500-dataset catalogue.
fn benchmark_parse_500(c: &mut Criterion) {
    let turtle = synthetic_catalog(500);

    c.bench_function("parse_500_datasets", |b| {
        b.iter(|| RdfGraph::parse(black_box(&turtle), RdfFormat::Turtle).map(|g| g.len()));
    });
}

/// Benchmark sequential mapping of a 500-dataset catalogue.
fn benchmark_sequential_500(c: &mut Criterion) {
    let graph = load_graph(500);
    let config = HarvestConfig::default();

    c.bench_function("sequential_extract_500_datasets", |b| {
        b.iter(|| {
            let acc = GraphAccessor::new(&graph, &config);
            graph
                .dataset_nodes()
                .into_iter()
                .map(|node| extract_dataset(&acc, node))
                .filter(|e| e.outcome.mapped().is_some())
                .count()
        });
    });
}

/// Benchmark parallel mapping of a 500-dataset catalogue.
fn benchmark_parallel_500(c: &mut Criterion) {
    let graph = load_graph(500);
    let config = HarvestConfig::default();

    c.bench_function("parallel_extract_500_datasets", |b| {
        b.iter(|| extract_catalog(black_box(&graph), &config).len());
    });
}

/// Benchmark serializing and pruning mapped documents.
fn benchmark_documents_500(c: &mut Criterion) {
    let graph = load_graph(500);
    let config = HarvestConfig::default();
    let extractions = extract_catalog(&graph, &config);

    c.bench_function("documents_500_datasets", |b| {
        b.iter(|| {
            extractions
                .iter()
                .filter_map(|e| e.outcome.mapped())
                .filter_map(|d| d.to_document().ok())
                .count()
        });
    });
}

criterion_group!(
    benches,
    benchmark_parse_500,
    benchmark_sequential_500,
    benchmark_parallel_500,
    benchmark_documents_500
);
criterion_main!(benches);
