use chat_realtime_rs::{ChatEvent, ChatSocketClient, ChatSocketOptions, SessionListener};
use std::sync::Arc;
use std::time::Duration;

struct PrintListener;

impl SessionListener for PrintListener {
    fn on_failed(&self, message: &str, code: i32) {
        println!("❌ Failed: {} ({})", message, code);
    }

    fn on_connection_established(&self) {
        println!("✅ Connection established");
    }

    fn on_event(&self, event: &ChatEvent) {
        println!("📨 {} {}", event.event_type, event.cid.as_deref().unwrap_or("-"));
    }

    fn on_raw_frame(&self, bytes: &[u8]) {
        println!("📦 {} raw bytes", bytes.len());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let url = std::env::var("CHAT_WS_URL").expect("CHAT_WS_URL must be set in .env");

    let client = ChatSocketClient::new(&url, ChatSocketOptions::default())?;
    client.subscribe(Arc::new(PrintListener));
    client.connect()?;

    tokio::time::sleep(Duration::from_secs(10)).await;
    println!("🆔 Client id: {:?}", client.client_id());

    client.disconnect();
    Ok(())
}
