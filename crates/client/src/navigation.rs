//! Navigation and user notices as injected capabilities.
//!
//! The core decides *that* the user must go somewhere or be told something;
//! the router and the toast/alert layer decide *how*.

use tokio::sync::mpsc;

pub trait Navigator: Send + Sync {
    /// Client-side route change to `path`.
    fn navigate(&self, path: &str);
    /// Return to the previous view.
    fn back(&self);
}

pub trait Notifier: Send + Sync {
    /// Show a user-visible message.
    fn notify(&self, message: &str);
}

/// A UI side effect requested by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    Navigate(String),
    Back,
    Notice(String),
}

/// Forwards every effect into an unbounded channel, in order. The UI loop
/// (or a test) drains the receiver.
#[derive(Debug, Clone)]
pub struct EffectChannel {
    tx: mpsc::UnboundedSender<UiEffect>,
}

impl EffectChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiEffect>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, effect: UiEffect) {
        if self.tx.send(effect).is_err() {
            tracing::debug!("UI effect dropped; receiver is gone");
        }
    }
}

impl Navigator for EffectChannel {
    fn navigate(&self, path: &str) {
        self.emit(UiEffect::Navigate(path.to_string()));
    }

    fn back(&self) {
        self.emit(UiEffect::Back);
    }
}

impl Notifier for EffectChannel {
    fn notify(&self, message: &str) {
        self.emit(UiEffect::Notice(message.to_string()));
    }
}

/// Drain everything currently queued without waiting.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<UiEffect>) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    while let Ok(effect) = rx.try_recv() {
        effects.push(effect);
    }
    effects
}
