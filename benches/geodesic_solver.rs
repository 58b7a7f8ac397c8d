use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use geocoord::ellipsoid::EllipsoidParameters;
use geocoord::geodesic::{solve_direct, solve_inverse, EarthShape};

const SAMPLES: usize = 10_000;

/// Random (latitude, west-positive longitude) in radians.
#[inline]
fn random_point(rng: &mut StdRng) -> (f64, f64) {
    let lat = rng.random_range(-89.0f64..89.0).to_radians();
    let lon = rng.random_range(-180.0f64..180.0).to_radians();
    (lat, lon)
}

fn bench_direct(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED_D1EC);

    for (name, shape) in [
        ("solve_direct/sphere", EarthShape::Sphere),
        (
            "solve_direct/wgs84",
            EarthShape::Ellipsoid(EllipsoidParameters::WGS84),
        ),
    ] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || {
                    (0..SAMPLES)
                        .map(|_| {
                            let (lat, lon) = random_point(&mut rng);
                            let bearing = rng.random_range(0.0..std::f64::consts::TAU);
                            let distance = rng.random_range(1.0..10_000_000.0);
                            (lat, lon, bearing, distance)
                        })
                        .collect::<Vec<_>>()
                },
                |cases| {
                    for (lat, lon, bearing, distance) in cases {
                        black_box(solve_direct(
                            black_box(lat),
                            black_box(lon),
                            black_box(bearing),
                            black_box(distance),
                            &shape,
                        ));
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
}

fn bench_inverse(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x1B7E_45E0);
    let shape = EarthShape::Ellipsoid(EllipsoidParameters::WGS84);

    c.bench_function("solve_inverse/wgs84", |b| {
        b.iter_batched(
            || {
                (0..SAMPLES)
                    .map(|_| (random_point(&mut rng), random_point(&mut rng)))
                    .collect::<Vec<_>>()
            },
            |cases| {
                for ((lat1, lon1), (lat2, lon2)) in cases {
                    black_box(solve_inverse(
                        black_box(lat1),
                        black_box(lon1),
                        black_box(lat2),
                        black_box(lon2),
                        &shape,
                    ));
                }
            },
            BatchSize::LargeInput,
        )
    });

    // pairs close to antipodal, where the iteration converges slowly or not at all
    c.bench_function("solve_inverse/wgs84_near_antipodal", |b| {
        b.iter(|| {
            black_box(solve_inverse(
                black_box(0.0),
                black_box(0.0),
                black_box(0.5f64.to_radians()),
                black_box(-179.7f64.to_radians()),
                &shape,
            ))
        })
    });
}

criterion_group!(benches, bench_direct, bench_inverse);
criterion_main!(benches);
