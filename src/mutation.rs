//! Async writes with outcomes delivered back to the UI task.
//!
//! The write-side counterpart of [`Query`](crate::query::Query): each call to
//! `mutate()` spawns one request, and `poll()` drains whatever has settled
//! since the last tick, paired with the variables that produced it. Overlapping
//! mutations are independent and surface in completion order.

use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use tokio::sync::mpsc;

/// A settled mutation
#[derive(Debug)]
pub struct MutationOutcome<V, T> {
  /// Variables passed to `mutate()`
  pub variables: V,
  pub result: Result<T, String>,
}

type MutatorFn<V, T> = Box<dyn Fn(V) -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

pub struct Mutation<V, T> {
  mutator: MutatorFn<V, T>,
  tx: mpsc::UnboundedSender<MutationOutcome<V, T>>,
  rx: mpsc::UnboundedReceiver<MutationOutcome<V, T>>,
  pending: usize,
}

impl<V, T> Mutation<V, T>
where
  V: Clone + Send + 'static,
  T: Send + 'static,
{
  pub fn new<F, Fut>(mutator: F) -> Self
  where
    F: Fn(V) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      mutator: Box::new(move |variables| mutator(variables).boxed()),
      tx,
      rx,
      pending: 0,
    }
  }

  /// Start a request for `variables`.
  pub fn mutate(&mut self, variables: V) {
    let future = (self.mutator)(variables.clone());
    let tx = self.tx.clone();
    self.pending += 1;

    tokio::spawn(async move {
      let result = future.await;
      // Dropped receiver means the owner is gone, the outcome is discarded
      let _ = tx.send(MutationOutcome { variables, result });
    });
  }

  /// Number of requests that have not been drained by `poll()` yet.
  pub fn pending(&self) -> usize {
    self.pending
  }

  /// Drain every outcome that has settled, in completion order.
  pub fn poll(&mut self) -> Vec<MutationOutcome<V, T>> {
    let mut settled = Vec::new();
    while let Ok(outcome) = self.rx.try_recv() {
      settled.push(outcome);
    }
    self.pending = self.pending.saturating_sub(settled.len());
    settled
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn test_outcome_carries_variables() {
    let mut mutation = Mutation::new(|n: u32| async move { Ok::<_, String>(n * 2) });

    mutation.mutate(21);
    assert_eq!(mutation.pending(), 1);

    tokio::time::sleep(Duration::from_millis(10)).await;

    let settled = mutation.poll();
    assert_eq!(settled.len(), 1);
    assert_eq!(settled[0].variables, 21);
    assert_eq!(settled[0].result, Ok(42));
    assert_eq!(mutation.pending(), 0);
  }

  #[tokio::test]
  async fn test_errors_are_reported() {
    let mut mutation: Mutation<u32, ()> =
      Mutation::new(|n: u32| async move { Err(format!("no such product {}", n)) });

    mutation.mutate(7);
    tokio::time::sleep(Duration::from_millis(10)).await;

    let settled = mutation.poll();
    assert_eq!(settled[0].result, Err("no such product 7".to_string()));
  }

  #[tokio::test]
  async fn test_overlapping_mutations_settle_in_completion_order() {
    let mut mutation = Mutation::new(|delay: u64| async move {
      tokio::time::sleep(Duration::from_millis(delay)).await;
      Ok::<_, String>(delay)
    });

    mutation.mutate(60);
    mutation.mutate(5);
    assert_eq!(mutation.pending(), 2);

    tokio::time::sleep(Duration::from_millis(30)).await;
    let first = mutation.poll();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].variables, 5);
    assert_eq!(mutation.pending(), 1);

    tokio::time::sleep(Duration::from_millis(80)).await;
    let second = mutation.poll();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].variables, 60);
  }

  #[tokio::test]
  async fn test_poll_with_nothing_settled() {
    let mut mutation = Mutation::new(|_: ()| async { Ok::<_, String>(()) });
    assert!(mutation.poll().is_empty());
  }
}
