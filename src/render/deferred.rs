// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Single-shot results computed on a worker thread.
//!
//! A [`Deferred`] is polled from the UI thread once per frame and yields
//! its value exactly once. Work that needs no waiting is created already
//! resolved. There is no cancellation: dropping a `Deferred` lets the
//! worker finish and discards its result.

use std::sync::mpsc::{channel, Receiver, TryRecvError};

pub enum Deferred<T> {
    Ready(Option<T>),
    Pending(Receiver<T>),
}

/// Outcome of [`Deferred::poll`].
#[derive(Debug, PartialEq, Eq)]
pub enum Poll<T> {
    Ready(T),
    Pending,
    /// The value was already taken, or the worker died without sending.
    Gone,
}

impl<T: Send + 'static> Deferred<T> {
    /// Run `work` on a background thread.
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = channel();
        std::thread::spawn(move || {
            let _ = sender.send(work());
        });
        Deferred::Pending(receiver)
    }
}

impl<T> Deferred<T> {
    /// An already resolved value.
    pub fn ready(value: T) -> Self {
        Deferred::Ready(Some(value))
    }

    /// Take the value if it has arrived.
    pub fn poll(&mut self) -> Poll<T> {
        match self {
            Deferred::Ready(value) => match value.take() {
                Some(v) => Poll::Ready(v),
                None => Poll::Gone,
            },
            Deferred::Pending(receiver) => match receiver.try_recv() {
                Ok(v) => {
                    *self = Deferred::Ready(None);
                    Poll::Ready(v)
                }
                Err(TryRecvError::Empty) => Poll::Pending,
                Err(TryRecvError::Disconnected) => {
                    *self = Deferred::Ready(None);
                    Poll::Gone
                }
            },
        }
    }

    /// Block until the value arrives. `None` if it was already taken or
    /// the worker died.
    pub fn wait(self) -> Option<T> {
        match self {
            Deferred::Ready(value) => value,
            Deferred::Pending(receiver) => receiver.recv().ok(),
        }
    }
}
