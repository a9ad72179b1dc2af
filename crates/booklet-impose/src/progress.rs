//! Progress reporting for long-running passes

use tokio::sync::mpsc::UnboundedSender;

/// A progress milestone: percent complete plus a short status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub message: String,
}

/// Receives coarse progress updates (start, per sheet, completion)
pub trait ProgressSink: Send {
    fn report(&mut self, percent: u8, message: &str);
}

/// Discards all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8, _message: &str) {}
}

/// Collects updates in memory
impl ProgressSink for Vec<ProgressUpdate> {
    fn report(&mut self, percent: u8, message: &str) {
        self.push(ProgressUpdate {
            percent,
            message: message.to_string(),
        });
    }
}

/// Forwards updates to another task; a closed receiver is ignored
impl ProgressSink for UnboundedSender<ProgressUpdate> {
    fn report(&mut self, percent: u8, message: &str) {
        let _ = self.send(ProgressUpdate {
            percent,
            message: message.to_string(),
        });
    }
}

impl<P: ProgressSink + ?Sized> ProgressSink for &mut P {
    fn report(&mut self, percent: u8, message: &str) {
        (**self).report(percent, message);
    }
}
