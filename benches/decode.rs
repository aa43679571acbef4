//! Decoding and voxelization throughput on synthetic scans.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ply_voxel::{read_geometry, voxelize, VoxelizeOptions};
use std::io::Cursor;

fn generate_binary_ply(vertex_count: usize) -> Vec<u8> {
    let header = format!(
        r#"ply
format binary_little_endian 1.0
comment Benchmark scan data
element vertex {vertex_count}
property float x
property float y
property float z
property float nx
property float ny
property float nz
property uchar red
property uchar green
property uchar blue
end_header
"#
    );

    let mut binary_data = header.into_bytes();
    for i in 0..vertex_count {
        let base = i as f32 * 0.01;
        binary_data.extend_from_slice(&base.to_le_bytes());
        binary_data.extend_from_slice(&(base * 0.5 - 3.0).to_le_bytes());
        binary_data.extend_from_slice(&(base.sin() * 10.0).to_le_bytes());
        for _ in 0..3 {
            binary_data.extend_from_slice(&0.0f32.to_le_bytes());
        }
        binary_data.extend_from_slice(&[(i % 256) as u8, 128, 255]);
    }
    binary_data
}

fn generate_ascii_ply(vertex_count: usize) -> String {
    let mut ply = format!(
        r#"ply
format ascii 1.0
element vertex {vertex_count}
property float x
property float y
property float z
property float nx
property float ny
property float nz
property uchar red
property uchar green
property uchar blue
end_header
"#
    );
    for i in 0..vertex_count {
        let base = i as f32 * 0.01;
        ply.push_str(&format!(
            "{} {} {} 0 0 1 {} 128 255\n",
            base,
            base * 0.5 - 3.0,
            base.sin() * 10.0,
            i % 256
        ));
    }
    ply
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let vertex_count = 50_000;

    let binary_data = generate_binary_ply(vertex_count);
    group.throughput(Throughput::Bytes(binary_data.len() as u64));
    group.bench_function("binary", |b| {
        b.iter(|| read_geometry(Cursor::new(black_box(&binary_data))).unwrap())
    });

    let ascii_data = generate_ascii_ply(vertex_count);
    group.throughput(Throughput::Bytes(ascii_data.len() as u64));
    group.bench_function("ascii", |b| {
        b.iter(|| read_geometry(Cursor::new(black_box(&ascii_data))).unwrap())
    });

    group.finish();
}

fn benchmark_voxelize(c: &mut Criterion) {
    let geometry = read_geometry(Cursor::new(generate_binary_ply(50_000))).unwrap();

    let mut group = c.benchmark_group("voxelize");
    group.throughput(Throughput::Elements(geometry.len() as u64));
    for scale in [1, 16] {
        let options = VoxelizeOptions::with_scale(scale);
        group.bench_function(format!("scale_{scale}"), |b| {
            b.iter(|| voxelize(black_box(&geometry), &options))
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_decode, benchmark_voxelize);
criterion_main!(benches);
