use criterion::{criterion_group, criterion_main, Criterion};
use mask_editor::mask::binarize::{binarize, DEFAULT_THRESHOLD};
use mask_editor::mask::{BrushState, PixelBuffer, Rgba, StrokeRasterizer};

fn bench_stroke(c: &mut Criterion) {
    let blank = PixelBuffer::new(2048, 2048, Rgba::BLACK);
    let brush = BrushState::new(Rgba::WHITE, 5.0, 1.0).expect("brush");
    c.bench_function("stroke_diagonal_2048", |b| {
        b.iter(|| {
            let mut buffer = blank.clone();
            let mut stroke = StrokeRasterizer::new(brush);
            stroke.begin_stroke(&mut buffer, 0.0, 0.0);
            stroke.continue_stroke(&mut buffer, 2047.0, 2047.0);
            stroke.end_stroke();
            binarize(&mut buffer, DEFAULT_THRESHOLD)
        })
    });

    let magic = BrushState::new(Rgba::MAGIC_PEN, 200.0, 1.0).expect("brush");
    c.bench_function("magic_pen_sweep_2048", |b| {
        b.iter(|| {
            let mut buffer = blank.clone();
            let mut stroke = StrokeRasterizer::new(magic);
            stroke.begin_stroke(&mut buffer, 100.0, 1024.0);
            stroke.continue_stroke(&mut buffer, 1948.0, 1024.0);
            stroke.end_stroke();
        })
    });
}

criterion_group!(benches, bench_stroke);
criterion_main!(benches);
