//! Which aggregate clauses each model supports.

use std::collections::HashMap;

use crate::input::InputTypeDescriptor;

/// Aggregate clauses of one model, in emission order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateCapability {
	pub count: bool,
	pub min: bool,
	pub max: bool,
	pub avg: bool,
	pub sum: bool,
}

/// Clause key, aggregate input kind.
pub const AGGREGATE_CLAUSES: [(&str, &str); 5] = [
	("_count", "Count"),
	("_min", "Min"),
	("_max", "Max"),
	("_avg", "Avg"),
	("_sum", "Sum"),
];

impl AggregateCapability {
	fn set(&mut self, kind: &str) {
		match kind {
			"Count" => self.count = true,
			"Min" => self.min = true,
			"Max" => self.max = true,
			"Avg" => self.avg = true,
			"Sum" => self.sum = true,
			_ => {}
		}
	}

	pub fn supports(&self, kind: &str) -> bool {
		match kind {
			"Count" => self.count,
			"Min" => self.min,
			"Max" => self.max,
			"Avg" => self.avg,
			"Sum" => self.sum,
			_ => false,
		}
	}

	/// Supported `(clause, kind)` pairs in fixed order.
	pub fn clauses(self) -> impl Iterator<Item = (&'static str, &'static str)> {
		AGGREGATE_CLAUSES
			.into_iter()
			.filter(move |(_, kind)| self.supports(kind))
	}
}

#[derive(Debug, Clone, Default)]
pub struct AggregateCapabilities(HashMap<String, AggregateCapability>);

impl AggregateCapabilities {
	pub fn from_descriptors<'a>(descriptors: impl IntoIterator<Item = &'a InputTypeDescriptor>) -> Self {
		let mut map = HashMap::<String, AggregateCapability>::new();

		for descriptor in descriptors {
			let Some(head) = descriptor.name.strip_suffix("AggregateInput") else {
				continue;
			};

			if let Some((model, kind)) = AGGREGATE_CLAUSES
				.iter()
				.find_map(|&(_, kind)| head.strip_suffix(kind).map(|model| (model, kind)))
				.filter(|(model, _)| !model.is_empty())
			{
				map.entry(model.to_string()).or_default().set(kind);
			}
		}

		Self(map)
	}

	/// Models without any aggregate input support no clause.
	pub fn get(&self, model: &str) -> AggregateCapability {
		self.0.get(model).copied().unwrap_or_default()
	}
}
