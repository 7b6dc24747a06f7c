use crate::context::ContextId;
use crate::handle::{ObjectName, ResourceKind};
use crate::resource::TextureFormat;
use thiserror::Error;

/// Every contract violation the tracking layer can report. Guard checks run
/// before any mutation, so a returned error always leaves the tracker state
/// untouched. These are programming-contract violations, not transient
/// faults; none of them is retryable.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TrackedError {
	/// Liveness is always checked before ownership, so a deleted object
	/// misused from a foreign context still reports `Deleted`.
	#[error("{kind:?} {name:?} has already been deleted")]
	Deleted { kind: ResourceKind, name: ObjectName },
	#[error("{kind:?} {name:?} belongs to context {owner:?} and is not usable from context {current:?}")]
	WrongContext {
		kind: ResourceKind,
		name: ObjectName,
		owner: ContextId,
		current: ContextId,
	},
	#[error("no context is current")]
	NoContextCurrent,
	/// `name` is the object that was expected at the binding point, or `None`
	/// when the operation needs *some* object of `kind` bound and none is.
	#[error("operation requires a bound {kind:?} ({name:?})")]
	NotBound {
		kind: ResourceKind,
		name: Option<ObjectName>,
	},
	#[error("program {program:?} has no attribute or uniform named {name:?}")]
	AttributeMissing { program: ObjectName, name: String },
	#[error("{what} {value} is outside the valid range [{lower}, {upper}]")]
	RangeInvalid {
		what: &'static str,
		value: u64,
		lower: u64,
		upper: u64,
	},
	#[error("texture unit context is not the current context")]
	ContextNotActive,
	#[error("texture unit context stack limit of {limit} nested contexts reached")]
	ContextLimitReached { limit: usize },
	#[error("out of texture units: required {required}, available {available}")]
	TextureUnitsExhausted { required: usize, available: usize },
	#[error("{kind:?} {name:?} with format {format:?} cannot be attached at the {point} attachment")]
	FormatIncompatible {
		kind: ResourceKind,
		name: ObjectName,
		format: TextureFormat,
		point: &'static str,
	},
}

/// Range check in the style of the native layer's argument validation:
/// `offset + len` must stay within `size` octets.
pub(crate) fn check_octet_range(
	what: &'static str,
	offset: u64,
	len: u64,
	size: u64,
) -> Result<(), TrackedError> {
	let end = offset.checked_add(len).ok_or(TrackedError::RangeInvalid {
		what,
		value: u64::MAX,
		lower: 0,
		upper: size,
	})?;
	if end > size {
		return Err(TrackedError::RangeInvalid {
			what,
			value: end,
			lower: 0,
			upper: size,
		});
	}
	Ok(())
}
