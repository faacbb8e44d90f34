use eframe::egui;

/// The host loop that drains lab messages and draws frames.
pub trait Scheduler: Send + Sync {
    /// A message is waiting to be processed.
    fn wake(&self);
    /// Give the host one frame before continuing.
    fn next_frame(&self);
}

pub struct SchedulerEgui {
    ctx: egui::Context,
}

impl SchedulerEgui {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl Scheduler for SchedulerEgui {
    fn wake(&self) {
        self.ctx.request_repaint();
    }

    fn next_frame(&self) {
        self.ctx.request_repaint();
        std::thread::yield_now();
    }
}
