//! Host document implementations.

pub mod memory;
pub mod sidebar;

pub use memory::{MemoryDocument, NodeId, ScrollRecord};
pub use sidebar::{append_server, mount_server_list, render_server_list};
