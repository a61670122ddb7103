// Integration tests for callback dispatch through the script queue
//
// Producers run on plain std threads while the queue worker lives on the
// tokio runtime, the way domain events reach scripts in the host app.

use dashmap::DashMap;
use scriptlink::callback::{CallbackDispatcher, ScriptQueue, TokenChange};
use std::sync::{Arc, Mutex};
use std::thread;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn panel_callbacks() -> DashMap<String, String> {
    let callbacks = DashMap::new();
    callbacks.insert("onChangeToken".to_string(), "v1@lib:panel;".to_string());
    callbacks.insert("onChangeToken_2".to_string(), "v2@lib:panel;".to_string());
    callbacks
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_producers_preserve_per_call_order() {
    let ran = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&ran);
    let (queue, worker) = ScriptQueue::spawn(0, move |invocation: &str| -> anyhow::Result<()> {
        sink.lock().unwrap().push(invocation.to_string());
        Ok(())
    });

    let dispatcher = Arc::new(CallbackDispatcher::new(queue));
    let callbacks = Arc::new(panel_callbacks());

    let producers: Vec<_> = (0..4)
        .map(|producer| {
            let dispatcher = Arc::clone(&dispatcher);
            let callbacks = Arc::clone(&callbacks);
            thread::spawn(move || {
                for seq in 0..100 {
                    let change = TokenChange::new(&format!("tok-{}-{}", producer, seq))
                        .with_update("MoveToken")
                        .with_parameters([format!("{},{}", producer, seq)]);
                    let submitted = dispatcher.token_changed(&change, &*callbacks).unwrap();
                    assert_eq!(submitted, 2);
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    assert_eq!(worker.shutdown().await.unwrap(), 4 * 100 * 2);

    let ran = ran.lock().unwrap();
    for producer in 0..4 {
        let prefix_v1 = format!("v1@lib:panel;tok-{}-", producer);
        let prefix_v2 = format!(r#"v2@lib:panel;{{"tokenId":"tok-{}-"#, producer);

        // Each producer's own submissions stay in submission order
        let own: Vec<&String> = ran
            .iter()
            .filter(|s| s.starts_with(&prefix_v1) || s.starts_with(&prefix_v2))
            .collect();
        assert_eq!(own.len(), 200);

        for seq in 0..100 {
            assert_eq!(*own[seq * 2], format!("v1@lib:panel;tok-{}-{}", producer, seq));
            assert_eq!(
                *own[seq * 2 + 1],
                format!(
                    r#"v2@lib:panel;{{"tokenId":"tok-{}-{}","update":"MoveToken","parameters":["{}%2C{}"]}};"#,
                    producer, seq, producer, seq
                )
            );
        }
    }
}

#[tokio::test]
async fn test_callback_map_edits_apply_to_next_dispatch() {
    let ran = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&ran);
    let (queue, worker) = ScriptQueue::spawn(16, move |invocation: &str| -> anyhow::Result<()> {
        sink.lock().unwrap().push(invocation.to_string());
        Ok(())
    });
    let dispatcher = CallbackDispatcher::new(queue);
    let callbacks = panel_callbacks();

    let change = TokenChange::new("tok-1");
    assert_eq!(dispatcher.token_changed(&change, &callbacks).unwrap(), 2);

    // Panel drops its version-2 handler
    callbacks.remove("onChangeToken_2");
    assert_eq!(dispatcher.token_changed(&change, &callbacks).unwrap(), 1);

    assert_eq!(worker.shutdown().await.unwrap(), 3);
    assert_eq!(
        *ran.lock().unwrap(),
        vec![
            "v1@lib:panel;tok-1",
            r#"v2@lib:panel;{"tokenId":"tok-1"};"#,
            "v1@lib:panel;tok-1",
        ]
    );
}
