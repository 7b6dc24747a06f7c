#![cfg(test)]

use crate::tracked;
use rust_gl_tracked::error::TrackedError;
use rust_gl_tracked::handle::ResourceKind;
use rust_gl_tracked::resource::UsageHint;

#[test]
fn test_wrong_context_delete_mutates_nothing() -> anyhow::Result<()> {
	let (mut gl, a) = tracked();

	let buffer = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;

	// an unrelated context must not be able to delete the buffer
	let b = gl.context_create();
	gl.context_make_current(b);
	assert_eq!(
		gl.array_buffer_delete(buffer),
		Err(TrackedError::WrongContext {
			kind: ResourceKind::ArrayBuffer,
			name: buffer.name(),
			owner: a,
			current: b,
		})
	);
	assert!(!gl.is_deleted(buffer));

	// and the buffer stays fully usable from its owner
	gl.context_make_current(a);
	gl.array_buffer_bind(buffer)?;
	assert_eq!(gl.array_buffer_bound()?, Some(buffer));
	Ok(())
}

#[test]
fn test_shared_contexts_use_one_namespace() -> anyhow::Result<()> {
	let (mut gl, a) = tracked();

	let buffer = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;

	let b = gl.context_create_shared(a);
	gl.context_make_current(b);
	gl.array_buffer_bind(buffer)?;
	gl.array_buffer_update(buffer, 0, &[9; 16])?;

	// deletion from a sharing context is legal and visible everywhere
	gl.array_buffer_delete(buffer)?;
	assert!(gl.is_deleted(buffer));
	assert_eq!(gl.array_buffer_bound()?, None);

	gl.context_make_current(a);
	assert!(gl.is_deleted(buffer));
	assert_eq!(gl.array_buffer_bound()?, None);
	Ok(())
}

#[test]
fn test_delete_clears_bindings_across_the_share_group() -> anyhow::Result<()> {
	let (mut gl, a) = tracked();

	let buffer = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;
	gl.array_buffer_bind(buffer)?;

	let b = gl.context_create_shared(a);
	gl.context_make_current(b);
	gl.array_buffer_bind(buffer)?;

	gl.context_make_current(a);
	gl.array_buffer_delete(buffer)?;

	assert_eq!(gl.array_buffer_bound()?, None);
	gl.context_make_current(b);
	assert_eq!(gl.array_buffer_bound()?, None);
	Ok(())
}

#[test]
fn test_unrelated_context_cannot_use_resources() -> anyhow::Result<()> {
	let (mut gl, _) = tracked();

	let buffer = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;

	let lone = gl.context_create();
	gl.context_make_current(lone);
	assert!(matches!(
		gl.array_buffer_bind(buffer),
		Err(TrackedError::WrongContext { .. })
	));
	assert!(matches!(
		gl.array_buffer_update(buffer, 0, &[0; 4]),
		Err(TrackedError::WrongContext { .. })
	));
	Ok(())
}

#[test]
fn test_deleted_wins_over_wrong_context() -> anyhow::Result<()> {
	let (mut gl, a) = tracked();

	let buffer = gl.array_buffer_allocate(16, UsageHint::StaticDraw)?;
	gl.array_buffer_delete(buffer)?;

	// liveness is checked first: the foreign context still sees Deleted
	let b = gl.context_create();
	gl.context_make_current(b);
	assert_eq!(
		gl.array_buffer_bind(buffer),
		Err(TrackedError::Deleted {
			kind: ResourceKind::ArrayBuffer,
			name: buffer.name(),
		})
	);

	gl.context_make_current(a);
	Ok(())
}

#[test]
fn test_timer_queries_never_cross_contexts() -> anyhow::Result<()> {
	let (mut gl, a) = tracked();

	let timer = gl.timer_query_allocate()?;
	let b = gl.context_create_shared(a);
	gl.context_make_current(b);

	// pseudo-unshared: sharing the namespace is not enough for timers
	assert_eq!(
		gl.timer_query_begin(timer),
		Err(TrackedError::WrongContext {
			kind: ResourceKind::TimerQuery,
			name: timer.name(),
			owner: a,
			current: b,
		})
	);
	Ok(())
}
