use panel_core::{update, Msg, PanelState};

#[test]
fn update_is_noop() {
    let state = PanelState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
