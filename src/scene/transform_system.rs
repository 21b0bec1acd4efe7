//! Transform System
//!
//! Frame-level drivers that drain the [`ScheduleQueue`](crate::ScheduleQueue)
//! of a [`SceneGraph`] and propagate world transforms.
//!
//! A pass dequeues every scheduled node and walks its subtree. Nodes reached
//! through an ancestor's walk are unlinked then, so nothing is updated twice.
//! After the pass, nodes parked in the reschedule list (slow parents still
//! converging) are moved into the schedule list for the next frame.
//!
//! # Parallelism
//!
//! [`update_scheduled_parallel`] hands the drained nodes to scoped workers.
//! Every walk runs under the node's family lock, so two workers never touch
//! the same tree at once while unrelated trees proceed side by side.

use std::thread;

use rustc_hash::FxHashSet;

use crate::errors::{Result, SceneGraphError};
use crate::scene::NodeKey;
use crate::scene::graph::SceneGraph;

/// Updates every scheduled node on the calling thread.
///
/// Returns the number of nodes dequeued.
pub fn update_scheduled(graph: &SceneGraph, time: f64) -> usize {
    let mut count = 0;
    while let Some(key) = graph.get_next_scheduled() {
        // Keys are taken from the queue, which forgets destructed nodes.
        if graph.update_world_data(key, time, false).is_ok() {
            count += 1;
        }
    }

    let promoted = graph.promote_rescheduled();
    log::trace!("update pass: {count} scheduled, {promoted} promoted for next frame");
    count
}

/// Updates every scheduled node on `settings.worker_threads` workers.
///
/// Nodes whose ancestor is also scheduled are left to the ancestor's walk.
/// Returns the number of subtree walks performed.
///
/// For rigid and vertex relations the result is identical to
/// [`update_scheduled`]. A slow-parented node is blended once per pass here,
/// even if the sequential driver would have reached it twice.
pub fn update_scheduled_parallel(graph: &SceneGraph, time: f64) -> Result<usize> {
    let drained = drain(graph);
    let work = topmost(graph, &drained);
    let workers = graph.settings().effective_workers().min(work.len());

    if workers <= 1 {
        for &key in &work {
            graph.update_world_data_thread(key, time, false)?;
        }
    } else {
        run_workers(graph, &work, workers, time)?;
    }

    let promoted = graph.promote_rescheduled();
    log::trace!(
        "parallel update pass: {} drained, {} walks on {workers} workers, {promoted} promoted",
        drained.len(),
        work.len()
    );
    Ok(work.len())
}

fn drain(graph: &SceneGraph) -> Vec<NodeKey> {
    let mut drained = Vec::with_capacity(graph.schedule_queue().len());
    while let Some(key) = graph.get_next_scheduled() {
        drained.push(key);
    }
    drained
}

/// Keeps the drained nodes none of whose ancestors were drained too, in
/// drain order.
fn topmost(graph: &SceneGraph, drained: &[NodeKey]) -> Vec<NodeKey> {
    let set: FxHashSet<NodeKey> = drained.iter().copied().collect();
    drained
        .iter()
        .copied()
        .filter(|&key| graph.contains(key))
        .filter(|&key| {
            let mut cursor = graph.parent(key);
            while let Some(parent) = cursor {
                if set.contains(&parent) {
                    return false;
                }
                cursor = graph.parent(parent);
            }
            true
        })
        .collect()
}

fn run_workers(graph: &SceneGraph, work: &[NodeKey], workers: usize, time: f64) -> Result<()> {
    let (tx, rx) = flume::unbounded::<NodeKey>();
    for &key in work {
        tx.send(key).ok();
    }
    drop(tx);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                let rx = rx.clone();
                scope.spawn(move || -> Result<()> {
                    for key in rx.iter() {
                        graph.update_world_data_thread(key, time, false)?;
                    }
                    Ok(())
                })
            })
            .collect();

        let mut outcome = Ok(());
        for handle in handles {
            let result = handle.join().unwrap_or_else(|_| {
                log::warn!("transform worker panicked");
                Err(SceneGraphError::WorkerPanicked)
            });
            if outcome.is_ok() {
                outcome = result;
            }
        }
        outcome
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::callbacks::QueueingCallbacks;
    use crate::scene::node::SceneNode;
    use glam::Vec3;

    fn queued(graph: &mut SceneGraph) -> NodeKey {
        graph.insert(SceneNode::new(QueueingCallbacks::shared()))
    }

    #[test]
    fn topmost_drops_scheduled_descendants() {
        let mut graph = SceneGraph::new();
        let root = queued(&mut graph);
        let mid = queued(&mut graph);
        let leaf = queued(&mut graph);
        let other = queued(&mut graph);
        graph.add_child(root, mid).unwrap();
        graph.add_child(mid, leaf).unwrap();

        let kept = topmost(&graph, &[leaf, other, root]);
        assert_eq!(kept, vec![other, root]);
    }

    #[test]
    fn empty_queue_is_a_noop() {
        let graph = SceneGraph::new();
        assert_eq!(update_scheduled(&graph, 0.0), 0);
        assert_eq!(update_scheduled_parallel(&graph, 0.0), Ok(0));
    }

    #[test]
    fn sequential_pass_drains_queue() {
        let mut graph = SceneGraph::new();
        let root = queued(&mut graph);
        let child = queued(&mut graph);
        graph.add_child(root, child).unwrap();
        graph.set_local_position(root, Vec3::X).unwrap();
        graph.set_local_position(child, Vec3::Y).unwrap();

        assert_eq!(update_scheduled(&graph, 0.0), 1);
        assert!(graph.schedule_queue().is_empty());
        let world = graph.world_transform(child).unwrap();
        assert!(world.position.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }
}
