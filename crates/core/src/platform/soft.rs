use crate::binding::BindTarget;
use crate::handle::{ObjectName, ResourceKind};
use crate::platform::TrackedPlatform;
use crate::resource::{ProgramInterface, ShaderStage, TextureFormat};
use rustc_hash::FxHashMap;

/// An in-process stand-in for a native driver: it hands out monotonically
/// increasing names, stores buffer and texture bytes in host memory and
/// derives program interfaces by scanning the shader source for plain `in`
/// and `uniform` declarations. Useful for tests and for exercising client
/// code without a device.
pub struct SoftPlatform {
	next_name: u32,
	buffers: FxHashMap<ObjectName, Vec<u8>>,
	textures: FxHashMap<ObjectName, Vec<u8>>,
	timers: FxHashMap<ObjectName, SoftTimer>,
	/// fake monotonic clock, advanced by every mutating native call
	ticks: u64,
}

#[derive(Default)]
struct SoftTimer {
	started_at: Option<u64>,
	elapsed: u64,
}

impl SoftPlatform {
	pub fn new() -> Self {
		Self {
			// name 0 is the traditional "no object" value, never hand it out
			next_name: 1,
			buffers: FxHashMap::default(),
			textures: FxHashMap::default(),
			timers: FxHashMap::default(),
			ticks: 0,
		}
	}

	/// Stored bytes of a buffer object, for inspection in tests.
	pub fn buffer_bytes(&self, name: ObjectName) -> Option<&[u8]> {
		self.buffers.get(&name).map(Vec::as_slice)
	}

	/// Stored bytes of a texture object, for inspection in tests.
	pub fn texture_bytes(&self, name: ObjectName) -> Option<&[u8]> {
		self.textures.get(&name).map(Vec::as_slice)
	}

	fn tick(&mut self) -> u64 {
		self.ticks += 1;
		self.ticks
	}
}

impl Default for SoftPlatform {
	fn default() -> Self {
		Self::new()
	}
}

impl TrackedPlatform for SoftPlatform {
	fn allocate(&mut self, kind: ResourceKind) -> ObjectName {
		self.tick();
		let name = ObjectName::new(self.next_name);
		self.next_name += 1;
		if kind == ResourceKind::TimerQuery {
			self.timers.insert(name, SoftTimer::default());
		}
		name
	}

	fn delete(&mut self, _kind: ResourceKind, name: ObjectName) {
		self.tick();
		self.buffers.remove(&name);
		self.textures.remove(&name);
		self.timers.remove(&name);
	}

	fn bind(&mut self, _target: BindTarget, _name: Option<ObjectName>) {
		self.tick();
	}

	fn buffer_storage(&mut self, _kind: ResourceKind, name: ObjectName, size: u64) {
		self.tick();
		self.buffers.insert(name, vec![0; size as usize]);
	}

	fn buffer_write(&mut self, _kind: ResourceKind, name: ObjectName, offset: u64, data: &[u8]) {
		self.tick();
		if let Some(store) = self.buffers.get_mut(&name) {
			let offset = offset as usize;
			if let Some(target) = store.get_mut(offset..offset + data.len()) {
				target.copy_from_slice(data);
			}
		}
	}

	fn buffer_read(&self, _kind: ResourceKind, name: ObjectName, offset: u64, len: u64) -> Vec<u8> {
		self.buffers
			.get(&name)
			.and_then(|store| store.get(offset as usize..(offset + len) as usize))
			.map(<[u8]>::to_vec)
			.unwrap_or_default()
	}

	fn texture_storage(&mut self, name: ObjectName, width: u32, height: u32, format: TextureFormat) {
		self.tick();
		let size = width as usize * height as usize * format.bytes_per_pixel() as usize;
		self.textures.insert(name, vec![0; size]);
	}

	fn texture_write(&mut self, name: ObjectName, data: &[u8]) {
		self.tick();
		if let Some(store) = self.textures.get_mut(&name) {
			if store.len() == data.len() {
				store.copy_from_slice(data);
			}
		}
	}

	fn compile_shader(&mut self, _name: ObjectName, _stage: ShaderStage, _source: &str) {
		self.tick();
	}

	fn link_program(
		&mut self,
		_name: ObjectName,
		vertex_source: &str,
		fragment_source: &str,
	) -> ProgramInterface {
		self.tick();
		let mut interface = ProgramInterface::default();
		for line in vertex_source.lines() {
			if let Some(name) = declared_name(line, "in ") {
				let location = interface.attributes.len() as u32;
				interface.attributes.entry(name).or_insert(location);
			}
		}
		for line in vertex_source.lines().chain(fragment_source.lines()) {
			if let Some(name) = declared_name(line, "uniform ") {
				let location = interface.uniforms.len() as u32;
				interface.uniforms.entry(name).or_insert(location);
			}
		}
		interface
	}

	fn timer_begin(&mut self, name: ObjectName) {
		let now = self.tick();
		if let Some(timer) = self.timers.get_mut(&name) {
			timer.started_at = Some(now);
		}
	}

	fn timer_end(&mut self, name: ObjectName) {
		let now = self.tick();
		if let Some(timer) = self.timers.get_mut(&name) {
			if let Some(started_at) = timer.started_at.take() {
				timer.elapsed += now - started_at;
			}
		}
	}

	fn timer_elapsed(&self, name: ObjectName) -> u64 {
		self.timers.get(&name).map_or(0, |timer| timer.elapsed)
	}
}

/// `in vec3 position;` -> `position`. Deliberately naive: the soft platform
/// only understands unqualified declarations.
fn declared_name(line: &str, prefix: &str) -> Option<String> {
	let declaration = line.trim().strip_prefix(prefix)?;
	let declaration = declaration.trim_end().trim_end_matches(';');
	declaration
		.rsplit(char::is_whitespace)
		.next()
		.filter(|name| !name.is_empty())
		.map(str::to_string)
}
