//! Media sources: where track changes and playback positions come from.
//!
//! A source is subscribed once with the app's event sender and pushes
//! `MediaEvent`s until it runs dry or the returned `Subscription` is dropped.

pub mod mpv;
pub mod script;

use crate::app::events::Event;
use std::future::Future;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use mpv::MpvSource;
pub use script::ScriptSource;

pub trait MediaSource {
    fn subscribe(
        self,
        event_tx: mpsc::Sender<Event>,
    ) -> impl Future<Output = anyhow::Result<Subscription>> + Send;
}

/// Live subscription to a media source; dropping it stops event delivery.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
