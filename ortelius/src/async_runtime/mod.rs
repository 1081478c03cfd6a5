use std::future::Future;

use maybe_sync::MaybeSend;
use tokio::task::JoinHandle;

pub(crate) fn spawn<T>(future: T) -> JoinHandle<T::Output>
where
    T: Future + MaybeSend + 'static,
    T::Output: MaybeSend + 'static,
{
    tokio::spawn(future)
}
