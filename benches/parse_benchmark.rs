//! Benchmarks for sehatpdf extraction and parsing.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic PDFs with compressed content streams.

use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flate2::write::ZlibEncoder;
use flate2::Compression;

const CMAP: &str = "begincmap
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
2 beginbfchar
<0010> <2013>
<0011> <2022>
endbfchar
endcmap
";

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn stream_object(id: usize, body: &[u8]) -> Vec<u8> {
    let mut obj = format!("{} 0 obj\n<< /Length {} /Filter /FlateDecode >>\nstream\n", id, body.len())
        .into_bytes();
    obj.extend_from_slice(body);
    obj.extend_from_slice(b"\r\nendstream\nendobj\n");
    obj
}

/// Creates a synthetic document with `citizens` profiles spread over pages of
/// twenty profiles each.
fn create_test_pdf(citizens: usize) -> Vec<u8> {
    let mut pages = vec![String::from(
        "BT\n(Hospital Facilities \\(Major Cities\\)) Tj\n(Karachi) Tj\n\
         [(City Hospital ) <0010> ( 12 Main Road.)] TJ\n(Lahore) Tj\n\
         [(Services Hospital ) <0010> ( Jail Road.)] TJ\n\
         (Example User Profiles \\(Sehat Card Data\\)) Tj\nET\n",
    )];

    for chunk in (0..citizens).collect::<Vec<_>>().chunks(20) {
        let mut page = String::from("BT\n");
        for i in chunk {
            page.push_str(&format!(
                "(Name: Citizen {i}<br>) Tj\n(Father's Name: Parent {i}<br>) Tj\n\
                 (CNIC: 42101-{i:07}-1<br>) Tj\n(City: Karachi<br>) Tj\n\
                 (Income Group: Low<br>) Tj\n(Eligibility Status: Eligible<br>) Tj\n\
                 (Past Diseases: None<br>) Tj\n(Remaining Credits: 100000) Tj\n"
            ));
        }
        page.push_str("ET\n");
        pages.push(page);
    }

    pages.push(String::from(
        "BT\n(Note:) Tj\n[<0011> ( Renew yearly. Visit a panel hospital.)] TJ\nET\n",
    ));

    let mut pdf = b"%PDF-1.5\n".to_vec();
    pdf.extend(stream_object(1, &zlib(CMAP.as_bytes())));
    for (i, page) in pages.iter().enumerate() {
        pdf.extend(stream_object(i + 2, &zlib(page.as_bytes())));
    }
    pdf.extend_from_slice(b"%%EOF\n");
    pdf
}

/// Benchmark PDF format detection.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_data = create_test_pdf(1);
    let non_pdf_data = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| sehatpdf::detect_format_from_bytes(black_box(&pdf_data)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| sehatpdf::detect_format_from_bytes(black_box(non_pdf_data)).is_err());
    });
}

/// Benchmark text extraction alone.
fn bench_text_extraction(c: &mut Criterion) {
    let data = create_test_pdf(100);

    c.bench_function("extract_text_100_citizens", |b| {
        b.iter(|| sehatpdf::extract_text_from_bytes(black_box(&data)).unwrap());
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for citizens in [10, 100, 500].iter() {
        let data = create_test_pdf(*citizens);

        group.bench_function(format!("{}_citizens", citizens), |b| {
            b.iter(|| {
                let doc = sehatpdf::parse_bytes(black_box(&data)).unwrap();
                sehatpdf::render::to_json(&doc, sehatpdf::JsonFormat::Compact).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_text_extraction,
    bench_pipeline,
);
criterion_main!(benches);
