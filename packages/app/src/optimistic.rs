//! Apply a change locally, then confirm it with the store.

use std::future::Future;

use store::StoreError;

/// Runs `apply` on `state` before awaiting `write`; if the write fails,
/// `rollback` runs and the error is returned.
///
/// `write` must not have started yet. Store futures are lazy, so passing
/// `store.update_task(..)` directly is fine.
pub async fn optimistic<T, R, W>(
    state: &mut T,
    apply: impl FnOnce(&mut T),
    write: W,
    rollback: impl FnOnce(&mut T),
) -> Result<R, StoreError>
where
    W: Future<Output = Result<R, StoreError>>,
{
    apply(state);
    match write.await {
        Ok(value) => Ok(value),
        Err(err) => {
            rollback(state);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_keeps_the_change() {
        let mut items = vec![1, 2, 3];
        let result = optimistic(
            &mut items,
            |items| items.retain(|&i| i != 2),
            async { Ok::<_, StoreError>(()) },
            |items| items.push(2),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(items, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_failure_rolls_back() {
        let mut flag = false;
        let result: Result<(), _> = optimistic(
            &mut flag,
            |flag| *flag = true,
            async { Err(StoreError::Transport("offline".into())) },
            |flag| *flag = false,
        )
        .await;
        assert!(matches!(result, Err(StoreError::Transport(_))));
        assert!(!flag);
    }
}
