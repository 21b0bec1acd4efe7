//! Scheduling tests
//!
//! Tests for:
//! - Modification-driven scheduling through the client hooks
//! - Root-first ordering of the schedule list
//! - Delinking during subtree walks
//! - Slow-parent rescheduling across frames

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use glam::Vec3;
use spatial_graph::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn queued_node(graph: &mut SceneGraph) -> NodeKey {
    graph.insert(SceneNode::new(QueueingCallbacks::shared()))
}

/// Schedules like [`QueueingCallbacks`] and counts hook invocations.
#[derive(Default)]
struct CountingScheduler {
    calls: AtomicUsize,
}

impl NodeCallbacks for CountingScheduler {
    fn schedule_for_update(&self, node: &SceneNode, queue: &ScheduleQueue) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        node.schedule(queue)
    }
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn modification_schedules_once() -> anyhow::Result<()> {
    let scheduler = Arc::new(CountingScheduler::default());
    let mut graph = SceneGraph::new();
    let node = graph.insert(SceneNode::new(scheduler.clone()));

    graph.set_local_position(node, Vec3::X)?;
    graph.relative_translate(node, Vec3::Y, true)?;
    graph.set_local_scale(node, Vec3::splat(2.0))?;

    assert_eq!(scheduler.calls.load(Ordering::SeqCst), 1);
    assert_eq!(graph.schedule_queue().scheduled_keys(), vec![node]);
    assert_eq!(graph.schedule_queue().membership(node), Membership::InSchedule);
    Ok(())
}

#[test]
fn default_callbacks_never_schedule() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let node = graph.create_node();
    graph.set_local_position(node, Vec3::X)?;
    assert!(graph.schedule_queue().is_empty());
    assert_eq!(graph.schedule_queue().membership(node), Membership::NotLinked);
    Ok(())
}

#[test]
fn roots_are_drained_first() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let root_a = queued_node(&mut graph);
    let root_b = queued_node(&mut graph);
    let child = queued_node(&mut graph);
    graph.add_child(root_a, child)?;

    // child was scheduled by the attach; roots jump ahead of it.
    graph.set_local_position(root_a, Vec3::X)?;
    graph.set_local_position(root_b, Vec3::Y)?;

    assert_eq!(graph.get_next_scheduled(), Some(root_b));
    assert_eq!(graph.get_next_scheduled(), Some(root_a));
    assert_eq!(graph.get_next_scheduled(), Some(child));
    assert_eq!(graph.get_next_scheduled(), None);
    Ok(())
}

#[test]
fn explicit_schedule_is_idempotent() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let node = graph.create_node();
    assert!(graph.schedule(node)?);
    assert!(!graph.schedule(node)?);
    assert_eq!(graph.schedule_queue().len(), 1);
    Ok(())
}

#[test]
fn subtree_walk_unlinks_descendants() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let root = queued_node(&mut graph);
    let mid = queued_node(&mut graph);
    let leaf = queued_node(&mut graph);
    graph.add_child(root, mid)?;
    graph.add_child(mid, leaf)?;
    graph.set_local_position(root, Vec3::X)?;
    assert_eq!(graph.schedule_queue().len(), 3);

    graph.update_world_data(root, 0.0, false)?;

    assert!(graph.schedule_queue().is_empty());
    for key in [root, mid, leaf] {
        assert_eq!(graph.schedule_queue().membership(key), Membership::NotLinked);
    }
    Ok(())
}

#[test]
fn frame_pass_updates_everything_once() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let root = queued_node(&mut graph);
    let child = queued_node(&mut graph);
    let other = queued_node(&mut graph);
    graph.add_child(root, child)?;
    graph.set_local_position(root, Vec3::X)?;
    graph.set_local_position(child, Vec3::X)?;
    graph.set_local_position(other, Vec3::Z)?;

    // root and other are walked; child is reached through root.
    assert_eq!(transform_system::update_scheduled(&graph, 0.0), 2);
    assert!(graph.schedule_queue().is_empty());

    let world = graph.world_transform(child).expect("child");
    assert!(world.position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
    assert_eq!(transform_system::update_scheduled(&graph, 0.0), 0);
    Ok(())
}

// ============================================================================
// Rescheduling
// ============================================================================

#[test]
fn slow_parent_parks_itself_for_later() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let root = queued_node(&mut graph);
    let child = queued_node(&mut graph);
    graph.add_child(root, child)?;
    graph.set_parent_relation(child, SlowParentRelation::boxed(1.0))?;

    graph.update_world_data(root, 0.0, false)?;

    assert_eq!(graph.schedule_queue().membership(child), Membership::InReschedule);
    assert_eq!(graph.schedule_queue().membership(root), Membership::NotLinked);
    assert_eq!(graph.get_next_rescheduled(), Some(child));
    assert_eq!(graph.get_next_rescheduled(), None);
    Ok(())
}

#[test]
fn slow_parent_keeps_converging_across_frames() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let root = queued_node(&mut graph);
    let child = queued_node(&mut graph);
    graph.add_child(root, child)?;
    graph.set_parent_relation(child, SlowParentRelation::boxed(1.0))?;

    transform_system::update_scheduled(&graph, 0.0);
    assert_eq!(graph.schedule_queue().scheduled_keys(), vec![child]);

    graph.set_local_position(root, Vec3::new(4.0, 0.0, 0.0))?;
    transform_system::update_scheduled(&graph, 0.0);
    // The root's walk reaches the child first and unlinks it, so the child
    // is blended once this frame.
    let position = graph.world_transform(child).expect("child").position;
    assert!(position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));

    for _ in 0..40 {
        transform_system::update_scheduled(&graph, 0.0);
    }
    let position = graph.world_transform(child).expect("child").position;
    assert!(position.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-5));
    // Still parked for the next frame.
    assert!(graph.schedule_queue().is_scheduled(child));
    Ok(())
}

#[test]
fn scheduling_pulls_node_out_of_reschedule_list() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let node = graph.create_node();
    assert!(graph.reschedule(node)?);
    assert_eq!(graph.schedule_queue().rescheduled_len(), 1);

    assert!(graph.schedule(node)?);
    assert_eq!(graph.schedule_queue().membership(node), Membership::InSchedule);
    assert_eq!(graph.schedule_queue().rescheduled_len(), 0);
    Ok(())
}

#[test]
fn rescheduled_node_is_not_rescheduled_twice() -> anyhow::Result<()> {
    let mut graph = SceneGraph::new();
    let node = graph.create_node();
    assert!(graph.reschedule(node)?);
    assert!(!graph.reschedule(node)?);
    assert_eq!(graph.promote_rescheduled(), 1);
    assert_eq!(graph.get_next_scheduled(), Some(node));
    Ok(())
}
