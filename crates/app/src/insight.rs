//! Bridge between the async insight fetcher and the Bevy frame loop
//!
//! Requests run as tasks on a small tokio runtime owned by this plugin and
//! hand their result back over a crossbeam channel. Requests are never
//! cancelled; every one that resolves replaces the panel content, so the
//! last to resolve wins. The loading indicator stays on while any request
//! is still in flight.

use std::sync::Arc;

use bevy::prelude::*;
use cantilever_config::InsightConfig;
use cantilever_insight::{GeminiTransport, InsightFetcher};
use cantilever_ipc::{Insight, InsightCommand, SceneToUi, UiToScene};
use cantilever_scene::{OutboundUiMessages, SceneCommand, SceneSystems};
use crossbeam_channel::{Receiver, Sender};

/// Count of unresolved requests driving the loading indicator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InFlight(usize);

impl InFlight {
    /// Record a new request; true if the indicator should switch on
    pub fn start(&mut self) -> bool {
        self.0 += 1;
        self.0 == 1
    }

    /// Record a resolved request; true if the indicator should switch off
    pub fn finish(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        self.0 == 0
    }

    pub fn is_loading(&self) -> bool {
        self.0 > 0
    }
}

/// Runtime, fetcher and result channel for insight requests
#[derive(Resource)]
pub struct InsightBridge {
    runtime: tokio::runtime::Runtime,
    fetcher: Arc<InsightFetcher<GeminiTransport>>,
    sender: Sender<Insight>,
    receiver: Receiver<Insight>,
    in_flight: InFlight,
}

impl InsightBridge {
    pub fn new(config: &InsightConfig) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("cantilever-insight")
            .enable_all()
            .build()?;
        let (sender, receiver) = crossbeam_channel::unbounded();
        Ok(Self {
            runtime,
            fetcher: Arc::new(InsightFetcher::from_config(config)),
            sender,
            receiver,
            in_flight: InFlight::default(),
        })
    }

    fn request(&mut self) -> bool {
        let fetcher = Arc::clone(&self.fetcher);
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let insight = fetcher.fetch().await;
            // The receiver only goes away when the app is shutting down
            let _ = sender.send(insight);
        });
        self.in_flight.start()
    }
}

pub struct InsightPlugin {
    config: InsightConfig,
}

impl InsightPlugin {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }
}

impl Plugin for InsightPlugin {
    fn build(&self, app: &mut App) {
        match InsightBridge::new(&self.config) {
            Ok(bridge) => {
                if bridge.fetcher.has_credential() {
                    info!("Insight service configured at {}", self.config.endpoint);
                } else {
                    warn!("No API key set, insights will use the built-in description");
                }
                app.insert_resource(bridge);
            }
            Err(e) => error!("Failed to start insight runtime: {e}"),
        }

        app.add_systems(
            Update,
            (handle_insight_commands, collect_insight_results)
                .chain()
                .in_set(SceneSystems::Input),
        );
    }
}

fn handle_insight_commands(
    mut commands: MessageReader<SceneCommand>,
    mut bridge: Option<ResMut<InsightBridge>>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    for SceneCommand(command) in commands.read() {
        let UiToScene::Insight(command) = command else {
            continue;
        };
        match command {
            InsightCommand::Request => {
                let Some(bridge) = bridge.as_deref_mut() else {
                    warn!("Insight requested but the runtime is unavailable");
                    continue;
                };
                info!("Requesting design insight");
                if bridge.request() {
                    outbound.send(SceneToUi::InsightLoading { loading: true });
                }
            }
            InsightCommand::Dismiss => outbound.send(SceneToUi::InsightDismissed),
        }
    }
}

fn collect_insight_results(
    bridge: Option<ResMut<InsightBridge>>,
    mut outbound: ResMut<OutboundUiMessages>,
) {
    let Some(mut bridge) = bridge else {
        return;
    };
    // Reading through Deref keeps an idle bridge from being marked changed
    if bridge.receiver.is_empty() {
        return;
    }
    let bridge = &mut *bridge;
    while let Ok(insight) = bridge.receiver.try_recv() {
        info!("Design insight ready: {}", insight.title);
        outbound.send(SceneToUi::InsightReady { insight });
        if bridge.in_flight.finish() {
            outbound.send(SceneToUi::InsightLoading { loading: false });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_turns_on_once() {
        let mut in_flight = InFlight::default();
        assert!(in_flight.start());
        assert!(!in_flight.start());
        assert!(in_flight.is_loading());
    }

    #[test]
    fn test_loading_stays_on_until_last_request_resolves() {
        let mut in_flight = InFlight::default();
        in_flight.start();
        in_flight.start();
        assert!(!in_flight.finish());
        assert!(in_flight.is_loading());
        assert!(in_flight.finish());
        assert!(!in_flight.is_loading());
    }

    #[test]
    fn test_stray_result_does_not_underflow() {
        let mut in_flight = InFlight::default();
        assert!(!in_flight.finish());
        assert!(!in_flight.is_loading());
    }

    #[test]
    fn test_request_without_key_resolves_to_fallback() {
        let config = InsightConfig {
            api_key: None,
            fallback_delay_ms: 0,
            ..InsightConfig::default()
        };
        let mut bridge = InsightBridge::new(&config).unwrap();
        assert!(bridge.request());
        assert!(!bridge.request());

        let first = bridge.receiver.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        let second = bridge.receiver.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
        assert_eq!(first, cantilever_insight::fallback_insight());
        assert_eq!(first, second);
    }
}
