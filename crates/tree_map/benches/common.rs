use std::collections::BTreeMap;
use std::hint::black_box;
use std::time::Duration;

use bench::{apply_small_runtime_config, default_rng, lookup_probes, shuffled_keys};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use tree_map::TreeMap;

const SIZES: [usize; 3] = [1_000, 16_000, 256_000];
const PROBES_PER_ITER: usize = 200;

trait Map {
    fn new() -> Self;
    fn insert(&mut self, key: u64, value: u64);
    fn get(&self, key: &u64) -> Option<&u64>;
    fn len(&self) -> usize;
    fn sum_values(&self) -> u64;
}

impl Map for TreeMap<u64, u64> {
    fn new() -> Self {
        TreeMap::new()
    }
    fn insert(&mut self, key: u64, value: u64) {
        TreeMap::insert(self, key, value);
    }
    fn get(&self, key: &u64) -> Option<&u64> {
        TreeMap::get(self, key)
    }
    fn len(&self) -> usize {
        TreeMap::len(self)
    }
    fn sum_values(&self) -> u64 {
        self.values().sum()
    }
}

impl Map for BTreeMap<u64, u64> {
    fn new() -> Self {
        BTreeMap::new()
    }
    fn insert(&mut self, key: u64, value: u64) {
        BTreeMap::insert(self, key, value);
    }
    fn get(&self, key: &u64) -> Option<&u64> {
        BTreeMap::get(self, key)
    }
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
    fn sum_values(&self) -> u64 {
        self.values().sum()
    }
}

pub fn bench_all_insert<M: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, M>) {
    bench_insert::<TreeMap<u64, u64>, M>(group, "tree_map");
    bench_insert::<BTreeMap<u64, u64>, M>(group, "std_btreemap");
}

pub fn bench_all_read<M: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, M>) {
    bench_read::<TreeMap<u64, u64>, M>(group, "tree_map");
    bench_read::<BTreeMap<u64, u64>, M>(group, "std_btreemap");
}

pub fn bench_all_scan<M: Measurement<Value = Duration>>(group: &mut BenchmarkGroup<'_, M>) {
    bench_scan::<TreeMap<u64, u64>, M>(group, "tree_map");
    bench_scan::<BTreeMap<u64, u64>, M>(group, "std_btreemap");
}

fn populated<P: Map>(size: usize) -> (P, Vec<u64>) {
    let mut rng = default_rng();
    let keys = shuffled_keys(&mut rng, size);
    let mut map = P::new();
    for &key in &keys {
        map.insert(key, key.wrapping_mul(0x9E37_79B9));
    }
    let probes = lookup_probes(&mut rng, size, PROBES_PER_ITER);
    (map, probes)
}

fn bench_insert<P, M>(group: &mut BenchmarkGroup<'_, M>, label: &str)
where
    P: Map,
    M: Measurement<Value = Duration>,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let mut rng = default_rng();
        let keys = shuffled_keys(&mut rng, size);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                let mut map = P::new();
                for &key in &keys {
                    map.insert(black_box(key), key);
                }
                black_box(map.len())
            })
        });
    }
}

fn bench_read<P, M>(group: &mut BenchmarkGroup<'_, M>, label: &str)
where
    P: Map,
    M: Measurement<Value = Duration>,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let (map, probes) = populated::<P>(size);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| {
                let mut hits = 0_usize;
                for probe in &probes {
                    if map.get(black_box(probe)).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
    }
}

fn bench_scan<P, M>(group: &mut BenchmarkGroup<'_, M>, label: &str)
where
    P: Map,
    M: Measurement<Value = Duration>,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let (map, _probes) = populated::<P>(size);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter(|| black_box(map.sum_values()))
        });
    }
}
