use std::time::Duration;

use fanout_core::DispatchError;
use fanout_task_channels::Dispatcher;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

fn identity() -> impl Fn(u32) -> Result<u32, String> + Send + Sync + 'static {
    |n| Ok(n)
}

async fn collect_values(mut stream: fanout_task_channels::DispatchStream<u32, String>) -> Vec<u32> {
    let mut values = Vec::new();
    while let Some(outcome) = stream.recv().await {
        values.push(outcome.into_result().expect("no failures expected"));
    }
    values
}

// ============================================================
// Completion and counting
// ============================================================

#[tokio::test]
async fn test_liveness_ten_items_three_workers_permutation() {
    let dispatcher = Dispatcher::new(3).unwrap();
    let stream = dispatcher.dispatch(0..10u32, identity());

    let mut values = collect_values(stream).await;
    values.sort_unstable();

    assert_eq!(values, (0..10).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_liveness_empty_input_immediate_end_of_stream() {
    let dispatcher = Dispatcher::new(5).unwrap();
    let mut stream = dispatcher.dispatch(Vec::<u32>::new(), identity());

    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn test_liveness_result_multiset_stable_across_worker_counts() {
    let mut baseline: Option<Vec<u32>> = None;

    for workers in [1, 2, 3, 8] {
        let dispatcher = Dispatcher::new(workers).unwrap();
        let stream = dispatcher.dispatch(0..100u32, |n: u32| Ok::<u32, String>(n * 3));

        let mut values = collect_values(stream).await;
        values.sort_unstable();

        match &baseline {
            Some(expected) => assert_eq!(
                &values, expected,
                "worker count {} changed the result multiset",
                workers
            ),
            None => baseline = Some(values),
        }
    }
}

// ============================================================
// Ordering
// ============================================================

#[tokio::test]
async fn test_safety_single_worker_preserves_order() {
    let dispatcher = Dispatcher::new(1).unwrap();
    let mut stream = dispatcher.dispatch(0..50u32, identity());

    let mut outcomes = Vec::new();
    while let Some(outcome) = stream.recv().await {
        outcomes.push(outcome);
    }

    let seqs: Vec<u64> = outcomes.iter().map(|o| o.seq).collect();
    assert_eq!(seqs, (0..50).collect::<Vec<u64>>());
    let values: Vec<u32> = outcomes
        .into_iter()
        .map(|o| o.into_result().unwrap())
        .collect();
    assert_eq!(values, (0..50).collect::<Vec<u32>>());
}

// ============================================================
// End-of-stream semantics
// ============================================================

#[tokio::test]
async fn test_safety_end_of_stream_sticky() {
    let dispatcher = Dispatcher::new(2).unwrap();
    let mut stream = dispatcher.dispatch(0..4u32, identity());

    let mut seen = 0;
    while stream.recv().await.is_some() {
        seen += 1;
    }
    assert_eq!(seen, 4);

    // Once closed, the stream stays closed.
    assert!(stream.recv().await.is_none());
    assert!(stream.recv().await.is_none());
}

// ============================================================
// Failure policy: tag and continue
// ============================================================

#[tokio::test]
async fn test_safety_failed_item_tagged_and_stream_continues() {
    let dispatcher = Dispatcher::new(3).unwrap();
    let mut stream = dispatcher.dispatch(0..10u32, |n: u32| {
        if n == 5 {
            Err(format!("bad item {}", n))
        } else {
            Ok(n)
        }
    });

    let mut outcomes = Vec::new();
    while let Some(outcome) = stream.recv().await {
        outcomes.push(outcome);
    }

    assert_eq!(outcomes.len(), 10, "failures count as outcomes too");
    let failures: Vec<_> = outcomes.iter().filter(|o| o.is_failure()).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].seq, 5);
}

#[tokio::test]
async fn test_safety_panicking_processor_does_not_hang_dispatch() {
    let dispatcher = Dispatcher::new(2).unwrap();
    let mut stream = dispatcher.dispatch(0..10u32, |n: u32| {
        if n == 3 {
            panic!("processor exploded on {}", n);
        }
        Ok::<u32, String>(n)
    });

    let drained = tokio::time::timeout(Duration::from_secs(5), async {
        let mut values = Vec::new();
        while let Some(outcome) = stream.recv().await {
            values.push(outcome.into_result().unwrap());
        }
        values
    })
    .await
    .expect("stream must terminate despite the panicked worker");

    // The panicked worker takes its in-flight item down with it; the
    // surviving worker drains everything else.
    let mut values = drained;
    values.sort_unstable();
    assert_eq!(values, vec![0, 1, 2, 4, 5, 6, 7, 8, 9]);
}

// ============================================================
// Cancellation
// ============================================================

#[tokio::test]
async fn test_liveness_cancellation_terminates_unbounded_dispatch() {
    let dispatcher = Dispatcher::new(3).unwrap();
    let token = dispatcher.cancellation_token();

    // Unbounded input: without cancellation this dispatch never ends.
    let mut stream = dispatcher.dispatch(0u32.., identity());

    for _ in 0..10 {
        assert!(stream.recv().await.is_some());
    }
    token.cancel();

    tokio::time::timeout(Duration::from_secs(5), async {
        while stream.recv().await.is_some() {}
    })
    .await
    .expect("stream must terminate after cancellation");
}

// ============================================================
// Streamed input
// ============================================================

#[tokio::test]
async fn test_liveness_channel_input_streams_results() {
    let dispatcher = Dispatcher::new(4).unwrap();
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        for n in 0..20u32 {
            if tx.send(n).await.is_err() {
                return;
            }
        }
        // Dropping tx marks the input exhausted.
    });

    let stream = dispatcher.dispatch_channel(rx, identity());
    let mut values = collect_values(stream).await;
    values.sort_unstable();

    assert_eq!(values, (0..20).collect::<Vec<u32>>());
}

// ============================================================
// Backpressure
// ============================================================

#[tokio::test]
async fn test_liveness_bounded_capacity_with_slow_consumer() {
    let dispatcher = Dispatcher::new(2).unwrap().with_capacity(1).unwrap();
    let mut stream = dispatcher.dispatch(0..100u32, identity());

    let mut values = Vec::new();
    while let Some(outcome) = stream.recv().await {
        values.push(outcome.into_result().unwrap());
        // Make the workers block on the output channel.
        tokio::time::sleep(Duration::from_micros(100)).await;
    }
    values.sort_unstable();

    assert_eq!(values, (0..100).collect::<Vec<u32>>());
}

// ============================================================
// Configuration errors
// ============================================================

#[tokio::test]
async fn test_safety_zero_workers_rejected() {
    assert_eq!(Dispatcher::new(0).err(), Some(DispatchError::ZeroWorkers));
}

#[tokio::test]
async fn test_safety_zero_capacity_rejected() {
    let result = Dispatcher::new(2).unwrap().with_capacity(0);
    assert_eq!(result.err(), Some(DispatchError::ZeroCapacity));
}

// ============================================================
// Stream adapter
// ============================================================

#[tokio::test]
async fn test_liveness_stream_adapter_collects_all_outcomes() {
    let dispatcher = Dispatcher::new(3).unwrap();
    let stream = dispatcher.dispatch(0..25u32, identity());

    let outcomes: Vec<_> = stream.into_stream().collect().await;

    assert_eq!(outcomes.len(), 25);
    assert!(outcomes.iter().all(|o| !o.is_failure()));
}
