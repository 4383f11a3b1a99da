use tracing::debug;

use crate::input::InputTypeDescriptor;

const UNIQUE_LOOKUP_MARKER: &str = "WhereUniqueInput";

pub fn is_unique_lookup(name: &str) -> bool {
	name.contains(UNIQUE_LOOKUP_MARKER)
}

/// Turns the uniqueness constraints of unique-lookup input types into
/// required fields. Must run before any field is resolved.
pub fn mark_required_fields(descriptors: &mut [InputTypeDescriptor]) {
	for descriptor in descriptors
		.iter_mut()
		.filter(|d| is_unique_lookup(&d.name))
	{
		let constraints = &descriptor.constraints;

		if constraints.min_required == Some(1) && constraints.max_required == Some(1) {
			debug!(input_type = %descriptor.name, "single-field unique lookup, all fields required");
			for field in &mut descriptor.fields {
				field.is_required = true;
			}
		} else if let Some(required) = constraints
			.required_fields
			.as_ref()
			.filter(|fields| !fields.is_empty())
		{
			for field in &mut descriptor.fields {
				if required.contains(&field.name) {
					field.is_required = true;
				}
			}
		}
	}
}
