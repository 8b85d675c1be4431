//! Integration tests for the command parser driving a session
//!
//! Mirrors what the REPL does with each parsed line

use std::sync::Arc;

use gosp::core::{
    parse_command, placement_for, snap_placement, Catalog, Command, SessionStore,
};
use gosp::types::{DispatchOutput, DsmState, ReasonCode, TemplateId};
use gosp::GospError;

/// Run one line against the store; `None` for commands that only print
fn run_line(store: &mut SessionStore, line: &str) -> Result<Option<DispatchOutput>, GospError> {
    let output = match parse_command(line)? {
        Command::Dispatch(intent) => store.dispatch(&intent),
        Command::Place { dehydron, template } => {
            let template = template
                .or(store.state().selected_template)
                .unwrap_or(TemplateId::Trehalose);
            let intent = placement_for(store.catalog(), &dehydron, template);
            store.dispatch(&intent)
        }
        Command::Click(point) => match snap_placement(store.state(), store.catalog(), point) {
            Some(intent) => store.dispatch(&intent),
            None => return Ok(None),
        },
        Command::Reset => store.dispatch(&gosp::types::Intent::Reset),
        _ => return Ok(None),
    };
    Ok(Some(output))
}

#[test]
fn test_scripted_session() {
    let mut store = SessionStore::new(Arc::new(Catalog::default()));

    let out = run_line(&mut store, "dsm native").unwrap().unwrap();
    assert_eq!(out.dsm_state, DsmState::Native);

    let out = run_line(&mut store, "dsm stabilized").unwrap().unwrap();
    assert_eq!(out.reason, ReasonCode::R101_DSM_ILLEGAL_TRANSITION);

    run_line(&mut store, "dsm breathing").unwrap();
    run_line(&mut store, "template glycerol").unwrap();
    let out = run_line(&mut store, "place hb1").unwrap().unwrap();
    assert_eq!(out.reason, ReasonCode::R200_STABILIZER_PLACED);
    assert_eq!(store.state().placed_stabilizers[0].template_id, TemplateId::Glycerol);

    let out = run_line(&mut store, "place hb6 tmao").unwrap().unwrap();
    assert_eq!(out.wrapped, 2);

    let out = run_line(&mut store, "advance").unwrap().unwrap();
    assert_eq!(out.cascade_step, 1);

    let out = run_line(&mut store, "remove stab_1").unwrap().unwrap();
    assert_eq!(out.reason, ReasonCode::R205_STABILIZER_REMOVED);
    assert_eq!(out.cascade_step, -1);

    let out = run_line(&mut store, "speed 0.5").unwrap().unwrap();
    assert_eq!(store.state().breathing_speed, 0.5);
    assert_eq!(out.reason, ReasonCode::R403_SPEED_SET);

    run_line(&mut store, "toggle water").unwrap();
    assert!(!store.state().visibility.water);

    let out = run_line(&mut store, "RESET").unwrap().unwrap();
    assert_eq!(out.reason, ReasonCode::R500_SESSION_RESET);
    assert_eq!(out.placed, 0);
}

#[test]
fn test_click_command() {
    let catalog = Arc::new(Catalog::default());
    let mut store = SessionStore::new(Arc::clone(&catalog));
    let m = catalog.bond("hb13").unwrap().midpoint;
    let line = format!("click {} {} {}", m[0], m[1], m[2]);

    // Inspect tool: the click does nothing
    assert!(run_line(&mut store, &line).unwrap().is_none());

    run_line(&mut store, "template trehalose").unwrap();
    let out = run_line(&mut store, &line).unwrap().unwrap();
    assert_eq!(out.reason, ReasonCode::R200_STABILIZER_PLACED);
    assert!(store.state().is_wrapped("hb13"));
}

#[test]
fn test_bad_lines_do_not_touch_state() {
    let mut store = SessionStore::new(Arc::new(Catalog::default()));
    for line in ["dsm", "template water", "residue -1", "click 1 2", "warp 9"] {
        assert!(matches!(run_line(&mut store, line), Err(GospError::Command(_))), "{}", line);
    }
    assert_eq!(store.revision(), 0);
}

#[test]
fn test_lock_commands_parse() {
    assert_eq!(parse_command("identify 4.5 4.5 2").unwrap(), Command::Identify(Some([4.5, 4.5, 2.0])));
    assert_eq!(
        parse_command("verify -17.2 true").unwrap(),
        Command::Verify { energy: Some(-17.2), ramachandran_valid: Some(true) }
    );
}
