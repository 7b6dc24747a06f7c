use crate::binding::BindTarget;
use crate::handle::{ObjectName, ResourceKind};
use crate::resource::{ProgramInterface, ShaderStage, TextureFormat};

pub mod soft;

/// The native driver adapter. Implementations are mechanical: they perform
/// raw native side effects keyed by integer names and report native-level
/// information back. Liveness, ownership, binding state and reference
/// bookkeeping all live in the tracker above this seam, which is why none of
/// these methods can fail in tracker terms.
pub trait TrackedPlatform: 'static {
	/// Allocate a fresh name for an object of `kind`. Names must not be
	/// reused while any live handle exists; the soft platform uses a
	/// monotonic counter.
	fn allocate(&mut self, kind: ResourceKind) -> ObjectName;

	fn delete(&mut self, kind: ResourceKind, name: ObjectName);

	/// Bind `name` to `target`, or reset the target when `None`.
	fn bind(&mut self, target: BindTarget, name: Option<ObjectName>);

	/// Create the data store of a buffer object.
	fn buffer_storage(&mut self, kind: ResourceKind, name: ObjectName, size: u64);

	fn buffer_write(&mut self, kind: ResourceKind, name: ObjectName, offset: u64, data: &[u8]);

	fn buffer_read(&self, kind: ResourceKind, name: ObjectName, offset: u64, len: u64) -> Vec<u8>;

	/// Create the storage of a 2D texture.
	fn texture_storage(&mut self, name: ObjectName, width: u32, height: u32, format: TextureFormat);

	/// Replace the full image of a previously created texture.
	fn texture_write(&mut self, name: ObjectName, data: &[u8]);

	fn compile_shader(&mut self, name: ObjectName, stage: ShaderStage, source: &str);

	/// Link a program from the given stage sources and report its reflected
	/// interface.
	fn link_program(
		&mut self,
		name: ObjectName,
		vertex_source: &str,
		fragment_source: &str,
	) -> ProgramInterface;

	fn timer_begin(&mut self, name: ObjectName);

	fn timer_end(&mut self, name: ObjectName);

	fn timer_elapsed(&self, name: ObjectName) -> u64;
}
