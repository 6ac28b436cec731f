//! Asynchronous request dispatch.
//!
//! A [`PathDispatcher`] owns a pool of named worker threads fed from a
//! single request queue. Workers run the same [`PathGrid::find_path`] as
//! the synchronous API and post the completed [`SearchResult`] back on a
//! per-request channel, surfaced to the caller as a [`PathTicket`].
//!
//! Requests hold only a [`Weak`] grid handle: callers keep ownership, and a
//! request whose grid is gone by the time a worker picks it up completes
//! with [`PathStatus::GridNotReady`]. Requests against one grid serialise
//! on that grid's mutex; requests against independent grids run in
//! parallel across the pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use pathgrid_core::{DiagonalMode, Index, PathCell};

use crate::error::{PathStatus, SearchResult};
use crate::grid::PathGrid;

struct PathRequest<C: PathCell> {
    grid: Weak<Mutex<PathGrid<C>>>,
    start: Index,
    end: Index,
    mode: DiagonalMode,
    reply: Sender<SearchResult>,
    queued_at: Instant,
}

/// Receipt for one queued search.
///
/// Dropping the ticket discards the result on delivery; there is no
/// mid-search cancellation.
pub struct PathTicket {
    rx: Receiver<SearchResult>,
}

impl PathTicket {
    /// Block until the result arrives. `None` means the request was
    /// dropped before it ran (dispatcher shut down while it was queued).
    pub fn wait(self) -> Option<SearchResult> {
        self.rx.recv().ok()
    }

    /// Poll for the result without blocking.
    pub fn try_wait(&self) -> Option<SearchResult> {
        self.rx.try_recv().ok()
    }
}

/// Worker-thread pool executing grid searches off the control thread.
pub struct PathDispatcher<C: PathCell + Send + 'static> {
    tx: Option<Sender<PathRequest<C>>>,
    workers: Vec<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl<C: PathCell + Send + 'static> PathDispatcher<C> {
    /// Spawn a dispatcher with `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        let (tx, rx) = mpsc::channel::<PathRequest<C>>();
        let rx = Arc::new(Mutex::new(rx));
        let running = Arc::new(AtomicBool::new(true));

        let workers = (0..workers.max(1))
            .map(|i| {
                let rx = Arc::clone(&rx);
                let running = Arc::clone(&running);
                thread::Builder::new()
                    .name(format!("pathfind-{i}"))
                    .spawn(move || worker_loop(rx, running))
                    .expect("failed to spawn pathfinder worker")
            })
            .collect();

        Self {
            tx: Some(tx),
            workers,
            running,
        }
    }

    /// Queue a search against `grid` and return a ticket for the result.
    pub fn dispatch(
        &self,
        grid: &Arc<Mutex<PathGrid<C>>>,
        start: Index,
        end: Index,
        mode: DiagonalMode,
    ) -> PathTicket {
        let (reply, rx) = mpsc::channel();
        let request = PathRequest {
            grid: Arc::downgrade(grid),
            start,
            end,
            mode,
            reply,
            queued_at: Instant::now(),
        };
        if let Some(tx) = &self.tx {
            if tx.send(request).is_err() {
                log::warn!("path dispatcher queue is closed; request dropped");
            }
        }
        PathTicket { rx }
    }
}

impl<C: PathCell + Send + 'static> Drop for PathDispatcher<C> {
    fn drop(&mut self) {
        // Stop intake first so queued-but-not-started requests are dropped
        // without side effects, then let the workers drain out.
        self.running.store(false, Ordering::SeqCst);
        self.tx = None;
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop<C: PathCell + Send>(
    rx: Arc<Mutex<Receiver<PathRequest<C>>>>,
    running: Arc<AtomicBool>,
) {
    loop {
        // Hold the queue lock only for the receive itself, so other
        // workers can pick up requests while this one searches.
        let request = {
            let rx = rx.lock().expect("path dispatcher queue lock poisoned");
            rx.recv()
        };
        let Ok(request) = request else {
            break;
        };
        if !running.load(Ordering::SeqCst) {
            continue;
        }

        let result = match request.grid.upgrade() {
            None => SearchResult::status(PathStatus::GridNotReady),
            Some(grid) => {
                let mut grid = grid.lock().expect("path grid lock poisoned");
                grid.find_path(request.start, request.end, request.mode)
            }
        };
        log::trace!(
            "request {} -> {} served as {} after {:?}",
            request.start,
            request.end,
            result.status,
            request.queued_at.elapsed()
        );
        // A closed reply channel just means the caller discarded the
        // ticket; the result is dropped.
        let _ = request.reply.send(result);
    }
}

#[cfg(test)]
mod tests {
    use pathgrid_core::{GridCell, Vec3};

    use super::*;

    fn shared_grid(size: usize) -> Arc<Mutex<PathGrid<GridCell>>> {
        let cells = (0..size * size)
            .map(|i| {
                let x = (i % size) as f32;
                let y = (i / size) as f32;
                GridCell::new(Vec3::new(x, 0.0, y))
            })
            .collect();
        Arc::new(Mutex::new(PathGrid::new(cells, size, size).unwrap()))
    }

    #[test]
    fn async_result_matches_synchronous_search() {
        let grid = shared_grid(5);
        let sync = grid.lock().unwrap().find_path(
            Index::new(0, 0),
            Index::new(4, 4),
            DiagonalMode::Diagonal,
        );

        let dispatcher = PathDispatcher::new(2);
        let ticket = dispatcher.dispatch(&grid, Index::new(0, 0), Index::new(4, 4), DiagonalMode::Diagonal);
        let result = ticket.wait().expect("worker delivers a result");

        assert_eq!(result.status, PathStatus::PathFound);
        assert_eq!(
            result.path.unwrap().to_index_array(),
            sync.path.unwrap().to_index_array()
        );
    }

    #[test]
    fn requests_on_one_grid_serialise() {
        let grid = shared_grid(6);
        let dispatcher = PathDispatcher::new(4);

        let tickets: Vec<PathTicket> = (0..8)
            .map(|_| dispatcher.dispatch(&grid, Index::new(0, 0), Index::new(5, 5), DiagonalMode::Diagonal))
            .collect();

        let mut routes = Vec::new();
        for ticket in tickets {
            let result = ticket.wait().expect("worker delivers a result");
            assert_eq!(result.status, PathStatus::PathFound);
            routes.push(result.path.unwrap().to_index_array().to_vec());
        }
        // Identical requests on an unchanged grid are idempotent even when
        // raced across the pool.
        for route in &routes[1..] {
            assert_eq!(route, &routes[0]);
        }
    }

    #[test]
    fn dropped_grid_reports_not_ready() {
        let held = shared_grid(4);
        let dropped = shared_grid(4);
        let dispatcher = PathDispatcher::new(1);

        // Stall the single worker on the first grid's mutex so the second
        // request stays queued while its grid goes away.
        let guard = held.lock().unwrap();
        let first = dispatcher.dispatch(&held, Index::new(0, 0), Index::new(3, 3), DiagonalMode::Diagonal);
        let second = dispatcher.dispatch(&dropped, Index::new(0, 0), Index::new(3, 3), DiagonalMode::Diagonal);
        drop(dropped);
        drop(guard);

        assert_eq!(first.wait().unwrap().status, PathStatus::PathFound);
        assert_eq!(second.wait().unwrap().status, PathStatus::GridNotReady);
    }

    #[test]
    fn independent_grids_run_in_parallel() {
        let a = shared_grid(4);
        let b = shared_grid(4);
        let dispatcher = PathDispatcher::new(2);

        let ta = dispatcher.dispatch(&a, Index::new(0, 0), Index::new(3, 0), DiagonalMode::NoDiagonal);
        let tb = dispatcher.dispatch(&b, Index::new(0, 0), Index::new(0, 3), DiagonalMode::NoDiagonal);

        let ra = ta.wait().unwrap();
        let rb = tb.wait().unwrap();
        assert_eq!(ra.path.unwrap().node_count(), 4);
        assert_eq!(rb.path.unwrap().node_count(), 4);
    }

    #[test]
    fn try_wait_polls_without_blocking() {
        let grid = shared_grid(3);
        let dispatcher = PathDispatcher::new(1);
        let ticket = dispatcher.dispatch(&grid, Index::new(0, 0), Index::new(2, 2), DiagonalMode::Diagonal);

        let mut polled = ticket.try_wait();
        while polled.is_none() {
            std::thread::yield_now();
            polled = ticket.try_wait();
        }
        assert_eq!(polled.unwrap().status, PathStatus::PathFound);
    }
}
