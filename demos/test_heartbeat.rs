use chat_realtime_rs::{ChatEvent, ChatSocketClient, ChatSocketOptions, SessionListener};
use std::sync::Arc;
use std::time::Duration;

struct QuietListener;

impl SessionListener for QuietListener {
    fn on_failed(&self, message: &str, code: i32) {
        println!("❌ Failed: {} ({})", message, code);
    }

    fn on_connection_established(&self) {
        println!("✅ Handshake complete");
    }

    fn on_event(&self, _event: &ChatEvent) {}

    fn on_raw_frame(&self, _bytes: &[u8]) {}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    // Initialize tracing to see keepalive logs
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("🦀 Testing Health Check Mechanism\n");

    let url = std::env::var("CHAT_WS_URL").expect("CHAT_WS_URL must be set in .env");

    println!("📡 Connecting to: {}\n", url);

    let client = ChatSocketClient::new(
        &url,
        ChatSocketOptions {
            health_check_interval: Some(5000),
            ..Default::default()
        },
    )?;
    client.subscribe(Arc::new(QuietListener));

    println!("✅ Test 1: Connecting with health check enabled...");
    client.connect()?;

    println!("⏳ Waiting 15 seconds to observe keepalives...");
    println!("   (Watch for 'Sent keepalive' in logs)\n");

    tokio::time::sleep(Duration::from_secs(15)).await;

    println!("\n✅ Test 2: Disconnecting (should stop health checker)...");
    client.disconnect();
    assert!(!client.is_health_check_running());
    println!("✅ Disconnected!\n");

    println!("⏳ Waiting 5 seconds to confirm keepalives stopped...");
    tokio::time::sleep(Duration::from_secs(5)).await;
    println!("✅ No more keepalives - task was properly cleaned up!\n");

    println!("🎉 All tests passed!");

    Ok(())
}
