use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use implex_index::{DuplicatePolicy, ImplementorEntry, ImplementorIndex, TraitKey};
use parking_lot::Mutex;

use crate::consumer::{CollectingConsumer, Consumer};
use crate::registry::{ContributeOutcome, ImplementorRegistry};

/// Deterministic pseudo-random number generator for reproducible stress tests.
struct Xorshift64(u64);

impl Xorshift64 {
	fn new(seed: u64) -> Self {
		Self(seed)
	}

	fn next(&mut self) -> u64 {
		let mut x = self.0;
		x ^= x << 13;
		x ^= x >> 7;
		x ^= x << 17;
		self.0 = x;
		x
	}

	fn next_usize(&mut self, bound: usize) -> usize {
		(self.next() % bound as u64) as usize
	}
}

/// Reference model of the consumer's eventual cumulative view: an ordered
/// list of (trait, implementor type paths), maintained with plain loops.
struct ViewModel {
	policy: DuplicatePolicy,
	traits: Vec<(String, Vec<String>)>,
}

impl ViewModel {
	fn new(policy: DuplicatePolicy) -> Self {
		Self {
			policy,
			traits: Vec::new(),
		}
	}

	/// Applies one contribution; returns whether the key already existed.
	fn insert(&mut self, key: &str, type_paths: Vec<String>) -> bool {
		if let Some((_, existing)) = self.traits.iter_mut().find(|(k, _)| k == key) {
			match self.policy {
				DuplicatePolicy::Replace => *existing = type_paths,
				DuplicatePolicy::Union => {
					for path in type_paths {
						if !existing.contains(&path) {
							existing.push(path);
						}
					}
				}
			}
			true
		} else {
			self.traits.push((key.to_string(), type_paths));
			false
		}
	}

	fn contents(&self) -> Vec<(String, Vec<String>)> {
		self.traits.clone()
	}
}

fn flatten(index: &ImplementorIndex) -> Vec<(String, Vec<String>)> {
	index
		.iter()
		.map(|(key, entries)| {
			let paths = entries.iter().map(|e| e.type_path().to_string()).collect();
			(key.as_str().to_string(), paths)
		})
		.collect()
}

fn run_interleaving(policy: DuplicatePolicy, seed: u64) {
	const OPS: usize = 2_000;
	let key_space = 6;

	let registry = ImplementorRegistry::with_policy(policy);
	let collector = CollectingConsumer::with_policy(policy);
	let view = collector.handle();
	let mut collector = Some(collector);

	let mut model = ViewModel::new(policy);
	let mut rng = Xorshift64::new(seed);
	let attach_at = rng.next_usize(OPS);
	let mut attached = false;

	for i in 0..OPS {
		if i == attach_at {
			if let Some(collector) = collector.take() {
				registry.attach(collector).unwrap();
			}
			attached = true;
		}

		let key_name = format!("k::T{}", rng.next_usize(key_space));
		// A quarter of the contributions are empty and must be ignored.
		let count = rng.next_usize(4);
		let entries: Vec<ImplementorEntry> = (0..count)
			.map(|n| {
				let path = format!("impls::Type{i}_{n}");
				ImplementorEntry::new(path.clone(), format!("impl Example for {path}"))
			})
			.collect();
		let type_paths: Vec<String> = entries.iter().map(|e| e.type_path().to_string()).collect();

		let outcome = registry.contribute(TraitKey::new(key_name.as_str()), entries);

		let expected = if count == 0 {
			ContributeOutcome::Ignored
		} else if attached {
			model.insert(&key_name, type_paths);
			ContributeOutcome::Delivered
		} else {
			match (model.insert(&key_name, type_paths), policy) {
				(false, _) => ContributeOutcome::Buffered,
				(true, DuplicatePolicy::Replace) => ContributeOutcome::BufferedReplaced,
				(true, DuplicatePolicy::Union) => ContributeOutcome::BufferedMerged,
			}
		};
		assert_eq!(outcome, expected, "op {i}: outcome mismatch for {key_name}");
	}

	assert_eq!(flatten(&view.snapshot()), model.contents(), "final view mismatch");
}

#[test]
fn stress_replace_interleaving_matches_model() {
	run_interleaving(DuplicatePolicy::Replace, 0xDEAD_BEEF);
}

#[test]
fn stress_union_interleaving_matches_model() {
	run_interleaving(DuplicatePolicy::Union, 0xCAFE_BABE);
}

// ── Concurrency: contributions racing an attach are never lost ──

#[derive(Clone, Default)]
struct Deliveries {
	batches: Arc<Mutex<Vec<ImplementorIndex>>>,
}

impl Consumer for Deliveries {
	fn accept(&mut self, index: ImplementorIndex) {
		self.batches.lock().push(index);
	}
}

#[test]
fn concurrent_contributions_are_never_lost_or_duplicated() {
	const THREADS: usize = 8;
	const KEYS_PER_THREAD: usize = 50;
	let total = THREADS * KEYS_PER_THREAD;

	let registry = Arc::new(ImplementorRegistry::new());
	let deliveries = Deliveries::default();

	let mut handles = Vec::new();
	for t in 0..THREADS {
		let registry = Arc::clone(&registry);
		handles.push(thread::spawn(move || {
			for n in 0..KEYS_PER_THREAD {
				let path = format!("worker{t}::Type{n}");
				let entry = ImplementorEntry::new(path.clone(), format!("impl Example for {path}"));
				registry.contribute(TraitKey::new(format!("k::W{t}_{n}")), vec![entry]);
			}
		}));
	}

	// Attach while producers are mid-stream; the split between the flushed
	// buffer and live deliveries is arbitrary, the union must not be.
	registry.attach(deliveries.clone()).unwrap();

	for handle in handles {
		handle.join().unwrap();
	}

	let batches = deliveries.batches.lock();
	let mut seen: HashMap<String, usize> = HashMap::new();
	for batch in batches.iter() {
		for (key, entries) in batch.iter() {
			assert_eq!(entries.len(), 1, "{key}: one entry per contributed trait");
			*seen.entry(key.as_str().to_string()).or_default() += 1;
		}
	}

	assert_eq!(seen.len(), total, "every contributed trait must arrive");
	for (key, count) in &seen {
		assert_eq!(*count, 1, "{key}: delivered exactly once");
	}
}
