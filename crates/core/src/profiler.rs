use crate::error::TrackedError;
use crate::handle::{Handle, TimerQuery};
use crate::platform::TrackedPlatform;
use crate::tracked::Tracked;
use rustc_hash::FxHashMap;

struct Node {
	timer: Option<Handle<TimerQuery>>,
	elapsed: u64,
	children: FxHashMap<String, Node>,
}

impl Node {
	fn new() -> Self {
		Self {
			timer: None,
			elapsed: 0,
			children: FxHashMap::default(),
		}
	}
}

/// A cache of named measurement nodes, addressed by path and reused across
/// frames so steady-state rendering allocates no new timer queries at all.
/// Timers are allocated lazily on first measurement of a path; [`trim`]
/// deletes every cached timer and drops the whole tree, forcing a rebuild
/// when the set of measured paths has changed.
///
/// Timer queries are context-affine, so measurement and trimming must happen
/// on the context that first measured a path.
///
/// [`trim`]: Profiling::trim
pub struct Profiling {
	enabled: bool,
	children: FxHashMap<String, Node>,
}

impl Profiling {
	pub fn new() -> Self {
		Self {
			enabled: false,
			children: FxHashMap::default(),
		}
	}

	#[inline]
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	/// Zero the per-frame measurements. Nodes and their timers stay cached.
	pub fn start_frame(&mut self) {
		fn reset(nodes: &mut FxHashMap<String, Node>) {
			for node in nodes.values_mut() {
				node.elapsed = 0;
				reset(&mut node.children);
			}
		}
		reset(&mut self.children);
	}

	/// Begin measuring `path`, creating nodes along it as needed and lazily
	/// allocating the leaf's timer query. A no-op while disabled.
	pub fn measure_begin<P: TrackedPlatform>(
		&mut self,
		gl: &mut Tracked<P>,
		path: &[&str],
	) -> Result<(), TrackedError> {
		if !self.enabled {
			return Ok(());
		}
		let node = walk_or_create(&mut self.children, path);
		let timer = match node.timer {
			Some(timer) => timer,
			None => {
				let timer = gl.timer_query_allocate()?;
				node.timer = Some(timer);
				timer
			}
		};
		gl.timer_query_begin(timer)
	}

	/// Finish measuring `path` and record the timer's accumulated time on the
	/// node. A no-op while disabled or when `path` was never begun.
	pub fn measure_end<P: TrackedPlatform>(
		&mut self,
		gl: &mut Tracked<P>,
		path: &[&str],
	) -> Result<(), TrackedError> {
		if !self.enabled {
			return Ok(());
		}
		let Some(node) = walk(&mut self.children, path) else {
			return Ok(());
		};
		let Some(timer) = node.timer else {
			return Ok(());
		};
		gl.timer_query_end(timer)?;
		node.elapsed = gl.timer_query_elapsed(timer)?;
		Ok(())
	}

	/// Most recent measurement of `path`, if the node exists.
	pub fn elapsed(&self, path: &[&str]) -> Option<u64> {
		let mut nodes = &self.children;
		let (last, prefix) = path.split_last()?;
		for segment in prefix {
			nodes = &nodes.get(*segment)?.children;
		}
		nodes.get(*last).map(|node| node.elapsed)
	}

	/// Timer query backing `path`, once one has been allocated.
	pub fn timer_of(&self, path: &[&str]) -> Option<Handle<TimerQuery>> {
		let mut nodes = &self.children;
		let (last, prefix) = path.split_last()?;
		for segment in prefix {
			nodes = &nodes.get(*segment)?.children;
		}
		nodes.get(*last).and_then(|node| node.timer)
	}

	/// Total cached nodes, mostly interesting to assert cache reuse.
	pub fn node_count(&self) -> usize {
		fn count(nodes: &FxHashMap<String, Node>) -> usize {
			nodes.len() + nodes.values().map(|node| count(&node.children)).sum::<usize>()
		}
		count(&self.children)
	}

	/// Delete every cached timer query and drop every cached node. The next
	/// measurement rebuilds the tree from scratch.
	pub fn trim<P: TrackedPlatform>(&mut self, gl: &mut Tracked<P>) -> Result<(), TrackedError> {
		fn collect(nodes: &mut FxHashMap<String, Node>, timers: &mut Vec<Handle<TimerQuery>>) {
			for node in nodes.values_mut() {
				if let Some(timer) = node.timer.take() {
					timers.push(timer);
				}
				collect(&mut node.children, timers);
			}
		}
		log::debug!("trim profiling contexts");
		let mut timers = Vec::new();
		collect(&mut self.children, &mut timers);
		self.children.clear();
		for timer in timers {
			gl.timer_query_delete(timer)?;
		}
		Ok(())
	}
}

impl Default for Profiling {
	fn default() -> Self {
		Self::new()
	}
}

fn walk_or_create<'a>(nodes: &'a mut FxHashMap<String, Node>, path: &[&str]) -> &'a mut Node {
	let (first, rest) = match path.split_first() {
		Some(split) => split,
		// degenerate empty path measures an unnamed root node
		None => (&"", &[][..]),
	};
	let node = nodes.entry((*first).to_string()).or_insert_with(Node::new);
	if rest.is_empty() {
		node
	} else {
		walk_or_create(&mut node.children, rest)
	}
}

fn walk<'a>(nodes: &'a mut FxHashMap<String, Node>, path: &[&str]) -> Option<&'a mut Node> {
	let (last, prefix) = path.split_last()?;
	let mut nodes = nodes;
	for segment in prefix {
		nodes = &mut nodes.get_mut(*segment)?.children;
	}
	nodes.get_mut(*last)
}
