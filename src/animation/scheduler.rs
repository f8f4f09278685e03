//! Render chain scheduling on the tokio timer.
//!
//! One task per armed chain. Each tick renders, then sleeps for the
//! animation's interval; the next render only happens after the previous
//! frame has been written. A chain exits as soon as it wakes to find its
//! animation stopped or re-armed under a newer generation.

use super::AnimationHandle;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::error;

pub(super) fn spawn_chain(
    runtime: &Handle,
    animation: AnimationHandle,
    generation: u64,
    first_delay: Duration,
) {
    runtime.spawn(run_chain(animation, generation, first_delay));
}

async fn run_chain(animation: AnimationHandle, generation: u64, first_delay: Duration) {
    let mut delay = first_delay;
    loop {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if !animation.is_live(generation) {
            break;
        }
        if let Err(e) = animation.render() {
            animation.stop();
            error!(id = animation.id(), "Render failed, animation stopped: {}", e);
            break;
        }
        delay = animation.tick_interval();
    }
}
