// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the ausweis-extract crate: barcode decoding per
// dialect and the OCR rule cascade on a typical front-of-card capture.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use ausweis_extract::{BarcodeDecoder, OcrExtractor};

const ANSI_PAYLOAD: &str = "@\n\u{1e}\rANSI 636014040002DL00410278ZC03190024DLDAQC5494170\n\
    DCSSMITH\nDACJOHN\nDADALLEN\nDBB01131976\nDBA01132015\nDBD08312009\nDBC1\n\
    DAU069 IN\nDAYBLU\nDAG123 MAIN ST\nDAISACRAMENTO\nDAJCA\nDAK958180000\nDCAC\n\
    DCBNONE\nDCDNONE\nDCFHHHH32\nDDAF\nDDK1";

const CARET_PAYLOAD: &str = "^SMITH$JOHN$01/13/1976$C5494170";

const FRONT_TEXT: &str = "CALIFORNIA DRIVER LICENSE\nDL C5494170\nEXP 01/13/2015\n\
    SMITH JOHN ALLEN\n123 MAIN ST\nSACRAMENTO, CA 95818\nDOB 01/13/1976\nRSTR NONE\n\
    CLASS C END NONE\nSEX M 5'-09\" 185 lb BLU\nISS 08/31/2009";

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Decoding cost per dialect, including the embedded-code scan.
fn bench_barcode_decode(c: &mut Criterion) {
    let decoder = BarcodeDecoder::default();
    c.bench_function("barcode_decode (ansi lines)", |b| {
        b.iter(|| black_box(decoder.decode(black_box(ANSI_PAYLOAD))));
    });
    c.bench_function("barcode_decode (caret delimited)", |b| {
        b.iter(|| black_box(decoder.decode(black_box(CARET_PAYLOAD))));
    });
}

/// The full OCR cascade, including overlapping retries on rejected name runs.
fn bench_ocr_extract(c: &mut Criterion) {
    let extractor = OcrExtractor::default();
    c.bench_function("ocr_extract (front capture)", |b| {
        b.iter(|| black_box(extractor.extract_detailed(black_box(FRONT_TEXT))));
    });
}

criterion_group!(benches, bench_barcode_decode, bench_ocr_extract);
criterion_main!(benches);
