// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Click intake rules of a knife session

use meshknife::knife::CutSnap;
use meshknife::{ClickOutcome, KnifeConfig, KnifeLimits, KnifeSession, Primitive, RejectReason, Vec2};

fn config() -> KnifeConfig {
    KnifeConfig::default()
}

#[test]
fn test_duplicate_click_on_edge_point() {
    let mesh = Primitive::unit_square().to_mesh().unwrap();
    let mut session = KnifeSession::new(false, &config());

    assert_eq!(session.click(&mesh, Vec2::new(0.5, 0.0), &config()), ClickOutcome::Accepted(0));
    assert_eq!(
        session.click(&mesh, Vec2::new(0.5, 0.0), &config()),
        ClickOutcome::Ignored(RejectReason::Duplicate)
    );
    assert_eq!(session.cuts().len(), 1);
}

#[test]
fn test_disconnected_face_rejected() {
    let mesh = Primitive::DisjointPair { gap: 1.0 }.to_mesh().unwrap();
    let mut session = KnifeSession::new(false, &config());

    assert_eq!(session.click(&mesh, Vec2::new(0.5, 0.5), &config()), ClickOutcome::Accepted(0));
    assert_eq!(
        session.click(&mesh, Vec2::new(2.5, 0.5), &config()),
        ClickOutcome::Ignored(RejectReason::Disconnected)
    );
    assert_eq!(session.cut_faces(), &[0]);
}

#[test]
fn test_non_adjacent_grid_face_rejected() {
    let mesh = Primitive::Grid { cols: 3, rows: 1, cell: 1.0 }.to_mesh().unwrap();
    let mut session = KnifeSession::new(false, &config());

    session.click(&mesh, Vec2::new(0.5, 0.5), &config());
    assert_eq!(
        session.click(&mesh, Vec2::new(2.5, 0.5), &config()),
        ClickOutcome::Ignored(RejectReason::Disconnected)
    );
    // The middle face touches the first, after which the last one is reachable
    assert_eq!(session.click(&mesh, Vec2::new(1.5, 0.5), &config()), ClickOutcome::Accepted(1));
    assert_eq!(session.click(&mesh, Vec2::new(2.5, 0.5), &config()), ClickOutcome::Accepted(2));
    assert_eq!(session.cut_faces(), &[0, 1, 2]);
}

#[test]
fn test_click_outside_mesh() {
    let mesh = Primitive::unit_square().to_mesh().unwrap();
    let mut session = KnifeSession::new(false, &config());
    assert_eq!(
        session.click(&mesh, Vec2::new(3.0, 3.0), &config()),
        ClickOutcome::Ignored(RejectReason::NoFace)
    );
    assert!(session.cuts().is_empty());
}

#[test]
fn test_restricted_to_selected_faces() {
    let mut mesh = Primitive::Grid { cols: 2, rows: 1, cell: 1.0 }.to_mesh().unwrap();
    mesh.faces[1].selected = true;
    let mut session = KnifeSession::new(true, &config());

    assert_eq!(
        session.click(&mesh, Vec2::new(0.5, 0.5), &config()),
        ClickOutcome::Ignored(RejectReason::NotSelectable)
    );
    assert_eq!(session.click(&mesh, Vec2::new(1.5, 0.5), &config()), ClickOutcome::Accepted(0));
    assert!(!session.is_face_valid_for_cut(&mesh, 0));
    assert!(session.is_face_valid_for_cut(&mesh, 1));
}

#[test]
fn test_snapping() {
    let mesh = Primitive::unit_square().to_mesh().unwrap();
    let mut session = KnifeSession::new(false, &config());

    session.click(&mesh, Vec2::new(0.1, 0.05), &config());
    session.click(&mesh, Vec2::new(0.5, 0.95), &config());
    session.click(&mesh, Vec2::new(0.6, 0.5), &config());

    let cuts = session.cuts();
    assert_eq!(cuts[0].snap, CutSnap::Vertex(0));
    assert_eq!(cuts[0].position, Vec2::new(0.0, 0.0));
    assert!(matches!(cuts[1].snap, CutSnap::Edge { .. }));
    assert!((cuts[1].position.y - 1.0).abs() < 1e-6);
    assert_eq!(cuts[2].snap, CutSnap::None);
    assert_eq!(cuts[2].position, Vec2::new(0.6, 0.5));
    assert!(cuts.iter().all(|c| c.face == Some(0)));
}

#[test]
fn test_close_needs_two_cuts() {
    let mesh = Primitive::unit_square().to_mesh().unwrap();
    let mut session = KnifeSession::new(false, &config());

    session.click(&mesh, Vec2::new(0.3, 0.3), &config());
    assert_eq!(
        session.click(&mesh, Vec2::new(0.3, 0.3), &config()),
        ClickOutcome::Ignored(RejectReason::Duplicate)
    );
    session.click(&mesh, Vec2::new(0.7, 0.3), &config());
    assert_eq!(session.click(&mesh, Vec2::new(0.32, 0.3), &config()), ClickOutcome::Closed);

    let last = session.cuts().last().unwrap();
    assert_eq!(last.snap, CutSnap::Close { edge: None });
    assert_eq!(last.position, Vec2::new(0.3, 0.3));
}

#[test]
fn test_cut_capacity() {
    let mut config = config();
    config.limits = KnifeLimits { max_cuts: 2, ..KnifeLimits::default() };
    let mesh = Primitive::unit_square().to_mesh().unwrap();
    let mut session = KnifeSession::new(false, &config);

    session.click(&mesh, Vec2::new(0.3, 0.3), &config);
    session.click(&mesh, Vec2::new(0.7, 0.3), &config);
    assert_eq!(
        session.click(&mesh, Vec2::new(0.5, 0.7), &config),
        ClickOutcome::Ignored(RejectReason::CutCapacity)
    );
}

#[test]
fn test_add_face_to_cut_is_idempotent() {
    let mut config = config();
    config.limits.max_cut_faces = 2;
    let mut session = KnifeSession::new(false, &config);

    assert!(session.add_face_to_cut(3));
    assert!(session.add_face_to_cut(3));
    assert!(session.add_face_to_cut(5));
    assert!(!session.add_face_to_cut(7));
    assert_eq!(session.cut_faces(), &[3, 5]);
}

#[test]
fn test_preview_records_crossings() {
    let mesh = Primitive::Grid { cols: 2, rows: 1, cell: 1.0 }.to_mesh().unwrap();
    let mut session = KnifeSession::new(false, &config());

    session.click(&mesh, Vec2::new(0.5, 0.5), &config());
    session.click(&mesh, Vec2::new(1.5, 0.5), &config());
    assert!(session
        .preview_points()
        .iter()
        .any(|p| (p - Vec2::new(1.0, 0.5)).norm() < 1e-5));
}
