use criterion::{black_box, criterion_group, criterion_main, Criterion};
use yeargrid::{
    compute_layout, render, render_dot_grid, BlockGlyphs, CalendarInfo, RenderConfig, RenderMode,
};

fn bench_layout(c: &mut Criterion) {
    let config = RenderConfig::new(1080, 2400);
    c.bench_function("compute_layout 1080x2400", |b| {
        b.iter(|| compute_layout(black_box(365), black_box(100), 1080, 2400, &config))
    });
}

fn bench_dot_grid(c: &mut Criterion) {
    let cal = CalendarInfo::new(2024, 200).unwrap();
    let config = RenderConfig::new(1024, 1024);
    c.bench_function("render_dot_grid 1024x1024", |b| {
        b.iter(|| render_dot_grid(black_box(&cal), &config))
    });
}

fn bench_wallpaper(c: &mut Criterion) {
    let cal = CalendarInfo::new(2023, 100).unwrap();
    let config = RenderConfig::new(1080, 2400);
    let layout = compute_layout(365, 100, 1080, 2400, &config).unwrap();
    c.bench_function("render wallpaper 1080x2400", |b| {
        b.iter(|| render(black_box(&cal), &layout, &config, RenderMode::Wallpaper(&BlockGlyphs)))
    });
}

criterion_group!(benches, bench_layout, bench_dot_grid, bench_wallpaper);
criterion_main!(benches);
