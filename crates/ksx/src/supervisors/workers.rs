//! 🧵 Workers: the ones who actually do the work while the Supervisor takes all
//! the credit in the sprint retro.
//!
//! There is exactly one kind right now, the virtual user. It is enough.
//! Two hundred of them can make a two-shard stream reconsider its career. 🦆

use anyhow::Result;
use tokio::task::JoinHandle;

mod virtual_user;
pub(crate) use virtual_user::VirtualUser;

/// 🏗️ A background worker, that does work. duh.
///
/// `start` consumes the worker and hands back the task, so the supervisor can
/// join it and find out how things went.
pub(crate) trait Worker {
    fn start(self) -> JoinHandle<Result<()>>;
}
