//=========================================================================
// Core Systems Orchestrator
//
// Central coordinator for the event-routing systems running on the logic
// (non-platform) thread.
//
// Responsibilities:
// - Own the input system, message bus and id generator
// - Receive platform events via the crossbeam channel
// - Maintain deterministic pacing using a fixed tick rate (TPS)
// - Turn window closure into a broadcast Quit and stop cleanly
//
// Notes:
// The orchestrator runs independently from the platform layer.
// Communication with the platform occurs only through message passing,
// plus one shared flag telling the platform the core has stopped.
//
//=========================================================================

//=== Public Modules ======================================================
pub mod globals;
pub mod id;
pub mod input;
pub mod message_bus;
pub mod spatial;

//=== Internal Modules ====================================================
pub(crate) mod platform_bridge;

//=== Re-exports ==========================================================
pub use globals::GlobalSystems;

//=== Standard Library Imports ============================================
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

//=== External Crates =====================================================
use crossbeam_channel::Receiver;
use log::{debug, info};

//=== Internal Imports ====================================================
use id::ElementId;
use input::clock::{Clock, SystemClock};
use message_bus::{Message, MessageKind};
use platform_bridge::{EventCollector, PlatformEvent, TickControl};

//=== CoreSystemsOrchestrator =============================================
//
// Owns the systems and drives them one tick at a time. The shell itself is
// a bus recipient: it subscribes to Quit so game logic can stop the engine
// by broadcasting it.
//
pub(crate) struct CoreSystemsOrchestrator<C: Clock = SystemClock> {
    systems: GlobalSystems<C>,
    shell: ElementId,
    quit: Arc<AtomicBool>,
}

impl<C: Clock> CoreSystemsOrchestrator<C> {
    //--- Construction -----------------------------------------------------
    pub(crate) fn new(systems: GlobalSystems<C>) -> Self {
        let shell = systems.ids.next();
        let quit = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&quit);
        systems.bus.subscribe(shell, MessageKind::Quit, move |_| {
            flag.store(true, Ordering::Release);
        });
        debug!(target: "core", "Shell subscribed to Quit as {}", shell);

        Self {
            systems,
            shell,
            quit,
        }
    }

    /// Gives application code mutable access to the systems before start.
    pub(crate) fn init_systems<F>(&mut self, init_fn: F)
    where
        F: FnOnce(&mut GlobalSystems<C>),
    {
        init_fn(&mut self.systems);
    }

    //--- tick() -----------------------------------------------------------
    //
    // One pass of the loop:
    //  1. Collect platform events
    //  2. Feed them to the input system and drain the bus
    //  3. Exit if the window closed or someone broadcast Quit
    //
    pub(crate) fn tick(&mut self, collector: &mut EventCollector) -> TickControl {
        let control = collector.collect_frame();
        self.systems.update(collector.batches());

        if control == TickControl::Exit {
            let notified = self.systems.bus.broadcast(Message::Quit);
            self.systems.bus.drain();
            info!(target: "core", "Window closed, Quit sent to {} recipients", notified);
            return TickControl::Exit;
        }

        if self.quit.load(Ordering::Acquire) {
            info!(target: "core", "Quit received by shell {}", self.shell);
            return TickControl::Exit;
        }

        TickControl::Continue
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Spawns the logic thread ticking the systems at a fixed frequency.
    // `running` is cleared when the loop ends so the platform can close
    // the window.
    //
    pub(crate) fn spawn_core_thread(
        mut self,
        receiver: Receiver<PlatformEvent>,
        tps: f64,
        running: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / tps);

        thread::spawn(move || {
            let mut collector = EventCollector::new(receiver);
            info!(target: "core", "Core thread started ({:?} per tick)", frame_duration);

            loop {
                let frame_start = Instant::now();

                if self.tick(&mut collector) == TickControl::Exit {
                    break;
                }

                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            running.store(false, Ordering::Release);
            info!(target: "core", "Core thread exiting.");
        })
    }

    //--- Test Accessors ---------------------------------------------------
    #[cfg(test)]
    pub(crate) fn systems(&self) -> &GlobalSystems<C> {
        &self.systems
    }

    #[cfg(test)]
    pub(crate) fn shell_id(&self) -> ElementId {
        self.shell
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
