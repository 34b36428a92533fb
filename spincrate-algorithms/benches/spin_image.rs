use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use spincrate_algorithms::{SpinImageBuilder, SpinImageConfig};
use spincrate_core::{OrientedPoint, OrientedPointCloud, Point3d, Vector3d};

const CLOUD_SIZES: [usize; 3] = [1_000, 10_000, 100_000];
const RESOLUTIONS: [usize; 3] = [16, 40, 80];

fn sphere_cloud(num_points: usize) -> OrientedPointCloud {
    let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;
    (0..num_points)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / golden_ratio;
            let phi = (1.0 - 2.0 * (i as f64 + 0.5) / num_points as f64).acos();
            let normal = Vector3d::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
            OrientedPoint::new(Point3d::from(normal), normal)
        })
        .collect()
}

fn single_build(c: &mut Criterion) {
    let mut g = c.benchmark_group("spin image build");
    g.sample_size(20);

    for size in CLOUD_SIZES {
        let cloud = sphere_cloud(size);
        let neighbors = cloud.to_neighbor_set();
        let builder =
            SpinImageBuilder::new(SpinImageConfig::default().with_bin_size(0.03)).unwrap();
        let reference = cloud[size / 2];

        g.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(&builder, &neighbors),
            |b, &(builder, neighbors)| {
                b.iter(|| {
                    let neighbors = std::hint::black_box(neighbors).as_neighbor_set();
                    std::hint::black_box(builder).build(&reference, &neighbors)
                });
            },
        );
    }

    g.finish();
}

fn batch_build(c: &mut Criterion) {
    let cloud = sphere_cloud(10_000);
    let indices: Vec<usize> = (0..cloud.len()).step_by(100).collect();

    let mut g = c.benchmark_group("spin image batch");
    g.sample_size(10);

    for resolution in RESOLUTIONS {
        let builder = SpinImageBuilder::new(
            SpinImageConfig::default()
                .with_resolution(resolution)
                .with_bin_size(2.4 / resolution as f64),
        )
        .unwrap();

        g.bench_with_input(BenchmarkId::from_parameter(resolution), &builder, |b, builder| {
            b.iter(|| std::hint::black_box(builder).build_for_cloud(&cloud, &indices));
        });
    }

    g.finish();
}

criterion_group!(benches, single_build, batch_build);
criterion_main!(benches);
