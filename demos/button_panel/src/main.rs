//! Button Panel Demo
//!
//! A main menu with three widgets wired to one dispatcher. A HUD listens to
//! every click, an audio system only to clicks from buttons. Run with
//! `RUST_LOG=tidings_bus=trace` to watch the routing.

use std::sync::Arc;
use tidings_bus::{Dispatcher, DispatcherConfig, SenderFilter, SubscriberId};
use tidings_ui::{Button, ClickPublisher, PublisherConfig, SelectableEvent, Slider, Toggle};
use tracing_subscriber::EnvFilter;

const BUS_CONFIG: &str = "(prune: Always, label: \"main_menu\")";
const START_CONFIG: &str = "(mode: CustomString, custom_message: \"start_game\")";
const MUTE_CONFIG: &str = "(mode: EventTypeAsEnum)";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Tidings Button Panel Demo ===\n");

    let bus_config = match DispatcherConfig::from_ron(BUS_CONFIG) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "invalid bus config, using defaults");
            DispatcherConfig::default()
        }
    };
    let bus = Arc::new(Dispatcher::with_config(bus_config));

    let hud = SubscriberId::next();
    let audio = SubscriberId::next();

    bus.subscribe::<String, _>(hud, |sender, msg| {
        let from = sender
            .and_then(|s| s.downcast_ref::<Button>())
            .map(|b| b.label.as_str())
            .unwrap_or("?");
        println!("  [hud]   {} (from {})", msg, from);
    });
    bus.subscribe::<SelectableEvent, _>(hud, |_, event| {
        println!("  [hud]   {:?}", event);
    });
    bus.subscribe_from::<Button, String, _>(audio, |_, _| {
        println!("  [audio] *click*");
    });

    let start = ClickPublisher::attach(
        Some(Arc::new(Button::new("Start"))),
        PublisherConfig::from_ron(START_CONFIG).unwrap_or_else(|_| PublisherConfig::custom("start_game")),
        Arc::clone(&bus),
    );
    let mute = ClickPublisher::attach(
        Some(Arc::new(Button::new("Mute"))),
        PublisherConfig::from_ron(MUTE_CONFIG).unwrap_or_default(),
        Arc::clone(&bus),
    );
    let subtitles = ClickPublisher::attach(
        Some(Arc::new(Toggle::new("Subtitles"))),
        PublisherConfig::default(),
        Arc::clone(&bus),
    );
    let volume = ClickPublisher::attach(
        Some(Arc::new(Slider::new("Volume", 0.7))),
        PublisherConfig::default(),
        Arc::clone(&bus),
    );
    let orphan: ClickPublisher<Button> = ClickPublisher::attach(None, PublisherConfig::default(), Arc::clone(&bus));

    println!("Click Start:");
    start.click();
    println!("Click Mute:");
    mute.click();
    println!("Click Subtitles (not wired: {}):", !subtitles.is_wired());
    subtitles.click();
    println!("Click Volume (not wired: {}):", !volume.is_wired());
    volume.click();
    println!("Click orphan publisher (published: {})", orphan.click());

    println!("\nAudio leaves:");
    bus.unsubscribe_sender(audio, SenderFilter::of::<Button>());
    start.click();

    println!("\nHUD leaves:");
    bus.unsubscribe(hud);
    start.click();

    println!("\nTopics left: {}", bus.topic_count());
}
