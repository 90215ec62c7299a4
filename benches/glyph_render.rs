use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_overworld::core::{CorrelationId, Event};
use tui_overworld::server::SharedWorld;
use tui_overworld::term::{ColorProfile, GlyphRenderer, LuminanceRenderer, RasterRenderer};
use tui_overworld::types::Direction;

fn bench_glyph_cold_cache(c: &mut Criterion) {
    let world = SharedWorld::builtin().unwrap();
    let frame = world.session().viewport();

    c.bench_function("glyph_render_cold_cache", |b| {
        b.iter(|| {
            let mut renderer = GlyphRenderer::new(ColorProfile::TrueColor);
            black_box(renderer.render(black_box(&frame)));
        })
    });
}

fn bench_glyph_warm_cache(c: &mut Criterion) {
    let world = SharedWorld::builtin().unwrap();
    let frame = world.session().viewport();
    let mut renderer = GlyphRenderer::new(ColorProfile::TrueColor);
    let mut out = String::with_capacity(256 * 1024);
    renderer.render_into(&frame, &mut out);

    c.bench_function("glyph_render_warm_cache", |b| {
        b.iter(|| {
            out.clear();
            renderer.render_into(black_box(&frame), &mut out);
        })
    });
}

fn bench_luminance(c: &mut Criterion) {
    let world = SharedWorld::builtin().unwrap();
    let frame = world.session().viewport();
    let mut renderer = LuminanceRenderer::new(ColorProfile::TrueColor);
    let mut out = String::with_capacity(256 * 1024);

    c.bench_function("luminance_render", |b| {
        b.iter(|| {
            out.clear();
            renderer.render_into(black_box(&frame), &mut out);
        })
    });
}

fn bench_viewport(c: &mut Criterion) {
    let world = SharedWorld::builtin().unwrap();
    let session = world.session();

    c.bench_function("viewport_compose", |b| {
        b.iter(|| {
            black_box(session.viewport());
        })
    });
}

fn bench_session_update(c: &mut Criterion) {
    let world = SharedWorld::builtin().unwrap();

    c.bench_function("session_stride_cycle", |b| {
        b.iter(|| {
            let mut session = world.session();
            let id = session.animation().correlation_id;
            black_box(session.update(Event::Key(Direction::Down)));
            black_box(session.update(Event::Move(Direction::Down)));
            for _ in 0..8 {
                black_box(session.update(Event::Inbetween));
            }
            black_box(session.update(Event::StrideComplete(id)));
        })
    });

    c.bench_function("session_stale_timer", |b| {
        let mut session = world.session();
        let stale = CorrelationId::from_bytes([0; 8]);
        b.iter(|| {
            black_box(session.update(Event::StrideComplete(black_box(stale))));
        })
    });
}

criterion_group!(
    benches,
    bench_glyph_cold_cache,
    bench_glyph_warm_cache,
    bench_luminance,
    bench_viewport,
    bench_session_update
);
criterion_main!(benches);
