// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Algoflow-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Algoflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt::Write as _;

use algoflow::format::mermaid::{check_flowchart, extract, repair};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// A fenced model answer with `steps` chained process nodes, each carrying the usual defects:
/// quoted labels, illegal characters, dashed ids and inline edge labels.
fn messy_response(steps: usize) -> String {
    let mut out = String::from("Here is the diagram:\n```mermaid\ngraph TD;\n");
    out.push_str("    start([\"Start\"]) --> step-0\n");
    for idx in 0..steps {
        let next = idx + 1;
        let _ = writeln!(
            out,
            "    step-{idx}[\"Do (part {idx}): a, b\"] --> check-{idx}{{\"Done {idx}?\"}}"
        );
        let _ = writeln!(out, "    check-{idx} -- yes --> step-{next}");
        let _ = writeln!(out, "    check-{idx} -.-> step-{idx}");
    }
    let _ = writeln!(out, "    step-{steps} ==> end([End])");
    out.push_str("    style start fill:#f9f\n```\nThat's all.");
    out
}

// Case IDs (`small`, `medium`, `large`) stay stable so results remain comparable.
fn benches_repair(c: &mut Criterion) {
    let cases = [("small", 5usize), ("medium", 50), ("large", 500)];

    {
        let mut group = c.benchmark_group("format.repair");
        for (case_id, steps) in cases {
            let raw = messy_response(steps);
            group.throughput(Throughput::Bytes(raw.len() as u64));
            group.bench_function(case_id, move |b| {
                b.iter(|| {
                    let candidate = extract(black_box(&raw));
                    black_box(repair(&candidate))
                })
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("format.check_flowchart");
        for (case_id, steps) in cases {
            let repaired = repair(&extract(&messy_response(steps)));
            group.throughput(Throughput::Elements(steps as u64 * 3 + 2));
            group.bench_function(case_id, move |b| {
                b.iter(|| black_box(check_flowchart(black_box(repaired.as_str())).is_ok()))
            });
        }
        group.finish();
    }
}

criterion_group!(benches, benches_repair);
criterion_main!(benches);
