//! Concurrent Channel Usage Tests

use secure_messenger::crypto::KeyPair;
use secure_messenger::messaging::SecureChannel;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_send_receive_same_key_pair() {
    let channel = SecureChannel::default();
    let alice = Arc::new(KeyPair::generate());
    let bob = Arc::new(KeyPair::generate());

    let mut tasks = vec![];
    for i in 0..32 {
        let channel = channel.clone();
        let alice = alice.clone();
        let bob = bob.clone();

        tasks.push(tokio::task::spawn_blocking(move || {
            let message = format!("concurrent message {}", i);
            let package = channel.send(&message, &alice, bob.public_key()).unwrap();
            let result = channel.receive(package.as_str(), bob.private_key(), alice.public_key());
            (message, result)
        }));
    }

    for task in tasks {
        let (message, result) = task.await.unwrap();
        assert!(result.is_verified());
        assert_eq!(result.message(), Some(message.as_str()));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_conversations_do_not_cross() {
    let channel = Arc::new(SecureChannel::default());

    let mut tasks = vec![];
    for i in 0..16 {
        let channel = channel.clone();

        tasks.push(tokio::task::spawn_blocking(move || {
            let sender = KeyPair::generate();
            let receiver = KeyPair::generate();
            let outsider = KeyPair::generate();
            let message = format!("pair {}", i);

            let package = channel.send(&message, &sender, receiver.public_key()).unwrap();
            let good = channel.receive(package.as_str(), receiver.private_key(), sender.public_key());
            let bad = channel.receive(package.as_str(), outsider.private_key(), sender.public_key());
            (message, good, bad)
        }));
    }

    for task in tasks {
        let (message, good, bad) = task.await.unwrap();
        assert_eq!(good.message(), Some(message.as_str()));
        assert!(!bad.is_verified());
        assert_eq!(bad.message(), None);
    }
}
