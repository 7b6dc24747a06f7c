#![cfg(test)]

use crate::tracked;
use rust_gl_tracked::error::TrackedError;
use rust_gl_tracked::handle::ResourceKind;
use rust_gl_tracked::resource::UsageHint;

#[test]
fn test_array_buffer_lifecycle() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();

	// allocate a 100-element buffer, bind it, delete it: the binding must
	// clear as part of the delete, not afterwards
	let a = gl.array_buffer_allocate(100, UsageHint::StaticDraw)?;
	gl.array_buffer_bind(a)?;
	assert_eq!(gl.array_buffer_bound()?, Some(a));

	gl.array_buffer_delete(a)?;
	assert_eq!(gl.array_buffer_bound()?, None);
	assert!(gl.is_deleted(a));
	Ok(())
}

#[test]
fn test_array_object_index_buffer_references() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();

	let builder = gl.array_object_builder();
	let ao = gl.array_object_allocate(&builder)?;
	let ib = gl.index_buffer_allocate(6, UsageHint::StaticDraw)?;

	gl.index_buffer_bind(ib)?;
	assert_eq!(gl.references(ao).len(), 1);
	assert_eq!(gl.referring_containers(ib).len(), 1);

	gl.index_buffer_unbind()?;
	assert_eq!(gl.references(ao).len(), 0);
	assert_eq!(gl.referring_containers(ib).len(), 0);
	Ok(())
}

#[test]
fn test_deleting_referable_updates_containers() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();

	let builder = gl.array_object_builder();
	let ao = gl.array_object_allocate(&builder)?;
	let ib = gl.index_buffer_allocate(6, UsageHint::StaticDraw)?;
	gl.index_buffer_bind(ib)?;

	gl.index_buffer_delete(ib)?;
	assert!(gl.is_deleted(ib));
	assert_eq!(gl.references(ao).len(), 0);
	assert_eq!(gl.array_object_index_buffer(ao)?, None);
	Ok(())
}

#[test]
fn test_deletion_leaves_unrelated_siblings_alone() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();

	let a = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;
	let b = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;
	gl.array_buffer_bind(a)?;

	gl.array_buffer_delete(b)?;
	assert_eq!(gl.array_buffer_bound()?, Some(a));
	assert!(!gl.is_deleted(a));
	Ok(())
}

#[test]
fn test_double_delete_reports_deleted() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();

	let a = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;
	gl.array_buffer_delete(a)?;
	assert_eq!(
		gl.array_buffer_delete(a),
		Err(TrackedError::Deleted {
			kind: ResourceKind::ArrayBuffer,
			name: a.name(),
		})
	);
	Ok(())
}

#[test]
fn test_deleted_handle_refuses_every_operation() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();

	let a = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;
	gl.array_buffer_delete(a)?;

	let deleted = Err(TrackedError::Deleted {
		kind: ResourceKind::ArrayBuffer,
		name: a.name(),
	});
	assert_eq!(gl.array_buffer_bind(a), deleted.clone());
	assert_eq!(gl.array_buffer_update(a, 0, &[0; 4]), deleted.clone());
	assert_eq!(gl.array_buffer_read(a, 0, 4), deleted.clone().map(|()| vec![]));
	assert_eq!(gl.array_buffer_size(a), deleted.map(|()| 0));

	// identity and liveness queries still work
	assert_eq!(a, a);
	assert!(gl.is_deleted(a));
	Ok(())
}

#[test]
fn test_operations_require_a_current_context() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();
	gl.context_release_current();

	assert_eq!(
		gl.array_buffer_allocate(16, UsageHint::StaticDraw),
		Err(TrackedError::NoContextCurrent)
	);
	assert_eq!(gl.array_buffer_bound(), Err(TrackedError::NoContextCurrent));
	Ok(())
}
