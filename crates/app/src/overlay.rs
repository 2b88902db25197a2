//! Text overlay drawn with bevy_ui
//!
//! The overlay only mirrors state: it drains the scene's outbound UI
//! messages every frame, folds them into [`OverlayState`] and rewrites the
//! text nodes when that state changes.

use bevy::picking::prelude::Pickable;
use bevy::prelude::*;
use cantilever_ipc::{BuildingId, Insight, SceneToUi, TransformMode};
use cantilever_scene::{OutboundUiMessages, SceneSystems, ViewSettings};

const HELP_TEXT: &str = "WASD / arrows walk   drag orbit   wheel zoom   click select   \
G move   R rotate   L guides   - / = FOV   I insight   Esc close";

const PANEL_BACKGROUND: Color = Color::srgba(1.0, 1.0, 1.0, 0.85);
const ACCENT: Color = Color::srgb(0.03, 0.57, 0.7);
const MUTED: Color = Color::srgb(0.42, 0.45, 0.5);
const INK: Color = Color::srgb(0.12, 0.14, 0.17);

/// Everything the overlay shows, rebuilt from scene messages
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub selected: Option<BuildingId>,
    pub mode: TransformMode,
    pub guides_visible: bool,
    pub fov_degrees: f32,
    pub loading: bool,
    pub insight: Option<Insight>,
}

impl OverlayState {
    pub fn from_view(view: &ViewSettings) -> Self {
        Self {
            selected: None,
            mode: view.transform_mode,
            guides_visible: view.show_guides,
            fov_degrees: view.fov_degrees,
            loading: false,
            insight: None,
        }
    }

    pub fn apply(&mut self, message: SceneToUi) {
        match message {
            SceneToUi::SelectionChanged { selected } => self.selected = selected,
            SceneToUi::TransformModeChanged { mode } => self.mode = mode,
            SceneToUi::GuidesChanged { visible } => self.guides_visible = visible,
            SceneToUi::FovChanged { degrees } => self.fov_degrees = degrees,
            SceneToUi::InsightLoading { loading } => self.loading = loading,
            SceneToUi::InsightReady { insight } => self.insight = Some(insight),
            SceneToUi::InsightDismissed => self.insight = None,
            // Positions are only logged for now
            SceneToUi::BuildingTransformed { .. } => {}
        }
    }

    pub fn text(&self, slot: OverlayText) -> String {
        match slot {
            OverlayText::Editing => self
                .selected
                .map(|id| format!("Editing: {}", id.label().to_uppercase()))
                .unwrap_or_default(),
            OverlayText::InsightButton => {
                if self.loading {
                    "Analyzing...".to_string()
                } else {
                    "AI Design Insight [I]".to_string()
                }
            }
            OverlayText::InsightTitle => self
                .insight
                .as_ref()
                .map(|insight| insight.title.clone())
                .unwrap_or_default(),
            OverlayText::InsightBody => self
                .insight
                .as_ref()
                .map(|insight| {
                    let mut body = insight.description.clone();
                    for feature in &insight.features {
                        body.push_str("\n- ");
                        body.push_str(feature);
                    }
                    body
                })
                .unwrap_or_default(),
            OverlayText::Toolbar => format!(
                "{}   Guides {}   FOV {:.0}",
                self.mode.label().to_uppercase(),
                if self.guides_visible { "on" } else { "off" },
                self.fov_degrees
            ),
        }
    }

    pub fn is_shown(&self, panel: OverlayPanel) -> bool {
        match panel {
            OverlayPanel::EditingPill => self.selected.is_some(),
            OverlayPanel::InsightCard => self.insight.is_some(),
        }
    }
}

/// Text node slots, each filled from [`OverlayState::text`]
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayText {
    Editing,
    InsightButton,
    InsightTitle,
    InsightBody,
    Toolbar,
}

/// Containers that appear and disappear with the state
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPanel {
    EditingPill,
    InsightCard,
}

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        let state = app
            .world()
            .get_resource::<ViewSettings>()
            .map(OverlayState::from_view)
            .unwrap_or_else(|| OverlayState::from_view(&ViewSettings::default()));

        app.insert_resource(state)
            .add_systems(Startup, spawn_overlay)
            .add_systems(
                Update,
                (apply_ui_messages, refresh_overlay)
                    .chain()
                    .after(SceneSystems::Draw),
            );
    }
}

fn label(text: impl Into<String>, size: f32, color: Color) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Pickable::IGNORE,
    )
}

/// Layout node that lets clicks through to the scene
fn pane(node: Node) -> impl Bundle {
    (node, Pickable::IGNORE)
}

fn spawn_overlay(mut commands: Commands, state: Res<OverlayState>) {
    // Full-screen root so children can be pinned to edges
    commands
        .spawn(pane(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        }))
        .with_children(|root| {
            root.spawn((
                pane(Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(24.0),
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                }),
                OverlayPanel::EditingPill,
                if state.is_shown(OverlayPanel::EditingPill) {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                },
            ))
            .with_children(|pill| {
                pill.spawn((
                    pane(Node {
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                        ..default()
                    }),
                    BackgroundColor(PANEL_BACKGROUND),
                ))
                .with_children(|pill| {
                    pill.spawn((
                        label(state.text(OverlayText::Editing), 13.0, ACCENT),
                        OverlayText::Editing,
                    ));
                });
            });

            root.spawn(pane(Node {
                position_type: PositionType::Absolute,
                top: Val::Px(24.0),
                right: Val::Px(24.0),
                width: Val::Px(320.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::End,
                row_gap: Val::Px(12.0),
                ..default()
            }))
            .with_children(|column| {
                column
                    .spawn((
                        pane(Node {
                            padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                            ..default()
                        }),
                        BackgroundColor(PANEL_BACKGROUND),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            label(state.text(OverlayText::InsightButton), 14.0, INK),
                            OverlayText::InsightButton,
                        ));
                    });

                column
                    .spawn((
                        pane(Node {
                            width: Val::Percent(100.0),
                            padding: UiRect::all(Val::Px(20.0)),
                            flex_direction: FlexDirection::Column,
                            row_gap: Val::Px(10.0),
                            ..default()
                        }),
                        BackgroundColor(PANEL_BACKGROUND),
                        OverlayPanel::InsightCard,
                        Visibility::Hidden,
                    ))
                    .with_children(|card| {
                        card.spawn((label("", 18.0, INK), OverlayText::InsightTitle));
                        card.spawn((label("", 12.0, MUTED), OverlayText::InsightBody));
                        card.spawn(label("Esc to close", 10.0, MUTED));
                    });
            });

            root.spawn(pane(Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(6.0),
                ..default()
            }))
            .with_children(|footer| {
                footer.spawn((
                    label(state.text(OverlayText::Toolbar), 13.0, INK),
                    OverlayText::Toolbar,
                ));
                footer.spawn(label(HELP_TEXT, 11.0, MUTED));
            });
        });

    debug!("UI overlay spawned");
}

fn apply_ui_messages(mut outbound: ResMut<OutboundUiMessages>, mut state: ResMut<OverlayState>) {
    if outbound.messages.is_empty() {
        return;
    }
    for message in outbound.drain() {
        debug!("UI message: {:?}", message);
        state.apply(message);
    }
}

fn refresh_overlay(
    state: Res<OverlayState>,
    mut texts: Query<(&OverlayText, &mut Text)>,
    mut panels: Query<(&OverlayPanel, &mut Visibility)>,
) {
    if !state.is_changed() {
        return;
    }
    for (slot, mut text) in &mut texts {
        let wanted = state.text(*slot);
        if text.0 != wanted {
            text.0 = wanted;
        }
    }
    for (panel, mut visibility) in &mut panels {
        let wanted = if state.is_shown(*panel) {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(wanted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_insight() -> Insight {
        Insight {
            title: "Floating Volumes".into(),
            description: "Stacked boxes.".into(),
            features: vec!["Cantilever".into(), "Glass".into()],
        }
    }

    #[test]
    fn test_overlay_never_blocks_scene_picking() {
        let mut app = App::new();
        app.insert_resource(OverlayState::from_view(&ViewSettings::default()))
            .add_systems(Startup, spawn_overlay);
        app.update();

        let world = app.world_mut();
        let mut nodes = world.query_filtered::<Option<&Pickable>, With<Node>>();
        let pickables: Vec<_> = nodes.iter(world).collect();
        assert!(pickables.len() > 10);
        for pickable in pickables {
            let pickable = pickable.expect("overlay node without Pickable");
            assert!(!pickable.should_block_lower);
            assert!(!pickable.is_hoverable);
        }
    }

    #[test]
    fn test_editing_pill_follows_selection() {
        let mut state = OverlayState::from_view(&ViewSettings::default());
        assert!(!state.is_shown(OverlayPanel::EditingPill));

        state.apply(SceneToUi::SelectionChanged {
            selected: Some(BuildingId::MainVilla),
        });
        assert!(state.is_shown(OverlayPanel::EditingPill));
        assert_eq!(state.text(OverlayText::Editing), "Editing: MAIN VILLA");

        state.apply(SceneToUi::SelectionChanged {
            selected: Some(BuildingId::Annex),
        });
        assert_eq!(state.text(OverlayText::Editing), "Editing: ANNEX");

        state.apply(SceneToUi::SelectionChanged { selected: None });
        assert!(!state.is_shown(OverlayPanel::EditingPill));
    }

    #[test]
    fn test_insight_button_shows_loading() {
        let mut state = OverlayState::from_view(&ViewSettings::default());
        state.apply(SceneToUi::InsightLoading { loading: true });
        assert_eq!(state.text(OverlayText::InsightButton), "Analyzing...");
        state.apply(SceneToUi::InsightLoading { loading: false });
        assert_eq!(state.text(OverlayText::InsightButton), "AI Design Insight [I]");
    }

    #[test]
    fn test_latest_insight_replaces_panel_until_dismissed() {
        let mut state = OverlayState::from_view(&ViewSettings::default());
        state.apply(SceneToUi::InsightReady {
            insight: sample_insight(),
        });
        let mut newer = sample_insight();
        newer.title = "Second Opinion".into();
        state.apply(SceneToUi::InsightReady { insight: newer });

        assert!(state.is_shown(OverlayPanel::InsightCard));
        assert_eq!(state.text(OverlayText::InsightTitle), "Second Opinion");
        assert_eq!(
            state.text(OverlayText::InsightBody),
            "Stacked boxes.\n- Cantilever\n- Glass"
        );

        state.apply(SceneToUi::InsightDismissed);
        assert!(!state.is_shown(OverlayPanel::InsightCard));
        assert!(state.text(OverlayText::InsightTitle).is_empty());
    }

    #[test]
    fn test_toolbar_reflects_view_settings() {
        let mut state = OverlayState::from_view(&ViewSettings::default());
        assert_eq!(state.text(OverlayText::Toolbar), "MOVE   Guides on   FOV 45");
        state.apply(SceneToUi::TransformModeChanged {
            mode: TransformMode::Rotate,
        });
        state.apply(SceneToUi::GuidesChanged { visible: false });
        state.apply(SceneToUi::FovChanged { degrees: 60.0 });
        assert_eq!(state.text(OverlayText::Toolbar), "ROTATE   Guides off   FOV 60");
    }
}
