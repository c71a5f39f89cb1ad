// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Transient notifications shown in the corner of the window.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Instant,
}

/// Queue of notices that disappear on their own.
pub struct Notifications {
    notices: Vec<Notice>,
    duration: Duration,
}

impl Notifications {
    pub fn new(duration: Duration) -> Self {
        Self { notices: Vec::new(), duration }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push_at(NoticeKind::Success, message.into(), Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push_at(NoticeKind::Error, message.into(), Instant::now());
    }

    fn push_at(&mut self, kind: NoticeKind, message: String, now: Instant) {
        self.notices.push(Notice { kind, message, expires_at: now + self.duration });
    }

    /// Drop notices that have expired by `now`.
    pub fn prune(&mut self, now: Instant) {
        self.notices.retain(|n| n.expires_at > now);
    }

    pub fn active(&self) -> &[Notice] {
        &self.notices
    }

    /// Draw the live notices, newest at the bottom.
    pub fn show(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.prune(now);
        let Some(next_expiry) = self.notices.iter().map(|n| n.expires_at).min() else {
            return;
        };

        egui::Area::new(egui::Id::new("notifications"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ctx, |ui| {
                for notice in &self.notices {
                    let color = match notice.kind {
                        NoticeKind::Success => egui::Color32::from_rgb(0x10, 0xB9, 0x81),
                        NoticeKind::Error => egui::Color32::from_rgb(0xEF, 0x44, 0x44),
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(egui::RichText::new(&notice.message).color(color).size(15.0));
                    });
                    ui.add_space(6.0);
                }
            });

        ctx.request_repaint_after(next_expiry.saturating_duration_since(now));
    }
}
