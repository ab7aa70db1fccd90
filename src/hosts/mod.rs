//! Hosts file editing.
//!
//! hostop keeps no state outside the hosts file. Every block it writes is
//! delimited by a start marker carrying a unique identifier and a shared
//! end marker, and that identifier is the only link between a write and its
//! later removal.
//!
//! - [`write_block`] appends a new block, never touching existing lines
//! - [`remove_block`] deletes exactly the block(s) tagged with an identifier
//! - [`list_blocks`] reports the blocks currently present
//!
//! Both writer and remover hold an exclusive advisory lock on the file while
//! doing I/O. Editors that ignore advisory locks can still race a removal.

mod error;
mod lock;
pub mod marker;
mod remover;
mod writer;

pub use error::HostsError;
pub use marker::{
    ActiveBlock, END_MARKER, REDIRECT_ADDRESS, match_block, render_block, start_marker,
};
pub use remover::{list_blocks, remove_block};
pub use writer::{HOSTS_FILE_MODE, write_block};

/// Default hosts file location.
pub const DEFAULT_HOSTS_FILE: &str = "/etc/hosts";
