use chat_realtime_rs::{
    BroadcastConnectivityMonitor, ChatEvent, ChatSocketClient, ChatSocketOptions,
    ConnectivitySignal, SessionListener,
};
use std::sync::Arc;
use std::time::Duration;

struct StatusListener;

impl SessionListener for StatusListener {
    fn on_failed(&self, message: &str, code: i32) {
        println!("\n🔴 Failed: {} ({})", message, code);
    }

    fn on_connection_established(&self) {
        println!("\n🟢 Connection established");
    }

    fn on_event(&self, _event: &ChatEvent) {}

    fn on_raw_frame(&self, _bytes: &[u8]) {}
}

/// Test reconnection behavior against a real chat server
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing to see logs
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("🦀 Testing Reconnection\n");

    let url = std::env::var("CHAT_WS_URL").expect("CHAT_WS_URL must be set in .env");

    println!("📡 Connecting to: {}\n", url);

    let monitor = Arc::new(BroadcastConnectivityMonitor::new());
    let client = ChatSocketClient::builder(ChatSocketOptions {
        health_check_interval: Some(4000),
        ..Default::default()
    })
    .endpoint(&url)
    .connectivity_monitor(monitor.clone())
    .build()?;
    client.subscribe(Arc::new(StatusListener));

    // Test 1: Connect and verify
    println!("✅ Test 1: Initial connection...");
    client.connect()?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(client.is_connected(), "Should be connected");
    println!("✅ Connected with client id {:?}\n", client.client_id());

    // Test 2: Simulated network loss; the health checker reconnects
    println!("⚠️  Test 2: Simulating network loss...");
    monitor.report(ConnectivitySignal::Lost);
    monitor.report(ConnectivitySignal::Lost);
    println!("   (Only one failure should be printed)\n");

    for i in 1..=10 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        print!(
            "\r⏱  Second {}/10 - Status: {:?}",
            i,
            client.state()
        );
        std::io::Write::flush(&mut std::io::stdout())?;
    }
    monitor.report(ConnectivitySignal::Restored);
    println!("\n");

    if client.is_connected() {
        println!("✅ Reconnected with client id {:?}", client.client_id());
    } else {
        println!("⚠️  Not reconnected yet: {:?}", client.state());
    }

    // Test 3: Permanent disconnect stays disconnected
    println!("\n✅ Test 3: Manual disconnect (should NOT auto-reconnect)...");
    client.disconnect();
    tokio::time::sleep(Duration::from_secs(5)).await;

    if !client.is_connected() {
        println!("✅ Correctly stayed disconnected after manual disconnect!\n");
    } else {
        return Err("Should NOT reconnect after manual disconnect".into());
    }

    println!("🎉 Reconnection tests completed!");

    Ok(())
}
