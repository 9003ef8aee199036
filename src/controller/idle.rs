//! Idle-teardown timer

use super::{PlayerController, SessionState};

impl PlayerController {
    /// Start (or restart) the idle window. When it elapses with the session
    /// still idle and nothing pending, the voice connection is released.
    pub(crate) fn schedule_idle_teardown(&self, state: &mut SessionState) {
        self.cancel_idle_teardown(state);
        if state.connection.is_none() {
            return;
        }

        state.idle_epoch += 1;
        let epoch = state.idle_epoch;
        let timeout = self.config.idle_timeout;
        let controller = self.clone();

        tracing::debug!(timeout_secs = timeout.as_secs(), "Idle teardown scheduled");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            controller.on_idle_timeout(epoch).await;
        });
        state.idle_timer = Some(handle.abort_handle());
    }

    pub(crate) fn cancel_idle_teardown(&self, state: &mut SessionState) {
        if let Some(timer) = state.idle_timer.take() {
            timer.abort();
            tracing::debug!("Idle teardown cancelled");
        }
    }

    async fn on_idle_timeout(&self, epoch: u64) {
        let mut state = self.state.lock().await;

        let still_idle = state.model.playback.status.is_idle() && state.model.queue().is_empty();
        if self.is_terminated() || state.idle_epoch != epoch || !still_idle {
            return;
        }

        // this task is the timer; nothing left to abort
        state.idle_timer = None;
        tracing::info!(
            timeout_secs = self.config.idle_timeout.as_secs(),
            "Idle window elapsed, leaving voice channel"
        );
        self.release_audio(&mut state).await;
        self.retire(&mut state).await;
    }
}
