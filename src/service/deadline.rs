//! Deadline racing with guaranteed timer cleanup.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Marker failure produced when the timer wins the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineElapsed {
    pub limit: Duration,
}

/// Race `task` against a timer.
///
/// Returns the task's output if it settles first, otherwise
/// [`DeadlineElapsed`] once `limit` passes. Whichever branch wins, the
/// losing future is dropped, so neither the timer nor the task outlives
/// the race.
pub async fn race_with_deadline<T>(
    task: impl Future<Output = T>,
    limit: Duration,
) -> Result<T, DeadlineElapsed> {
    tokio::select! {
        result = task => Ok(result),
        () = sleep(limit) => Err(DeadlineElapsed { limit }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn task_settling_first_wins() {
        let result = race_with_deadline(
            async {
                sleep(Duration::from_millis(10)).await;
                42
            },
            Duration::from_millis(100),
        )
        .await;
        assert_eq!(result, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_winning_reports_the_limit() {
        let started = tokio::time::Instant::now();
        let result = race_with_deadline(
            async {
                sleep(Duration::from_secs(60)).await;
                42
            },
            Duration::from_millis(100),
        )
        .await;
        assert_eq!(
            result,
            Err(DeadlineElapsed {
                limit: Duration::from_millis(100)
            })
        );
        assert_eq!(started.elapsed(), Duration::from_millis(100));
    }
}
