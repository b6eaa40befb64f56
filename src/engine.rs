//=========================================================================
// Sweeper Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ init() registers elements
//         ├─ with_world_bounds()     └─ run() spawns the core thread,
//         └─ with_click_timeout()       runs the platform and blocks
//                                       until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::input::clock::SystemClock;
use crate::core::input::gesture::GestureConfig;
use crate::core::platform_bridge::PlatformEvent;
use crate::core::spatial::Bounds;
use crate::core::{CoreSystemsOrchestrator, GlobalSystems};
use crate::platform::{Platform, WindowConfig};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (logic updates per second)
/// - **Channel capacity**: 128 events
/// - **World bounds**: 480x480 at the origin
/// - **Title**: "Minesweeper"
/// - **Click timeout**: 120ms
/// - **Long press threshold**: 300ms
///
/// # Examples
///
/// Simple usage with defaults:
/// ```no_run
/// use sweeper_engine::EngineBuilder;
///
/// EngineBuilder::new().build().run();
/// ```
///
/// Advanced configuration:
/// ```no_run
/// use std::time::Duration;
/// use sweeper_engine::EngineBuilder;
/// use sweeper_engine::core::spatial::Bounds;
///
/// let board = Bounds::new(0, 0, 300, 330).expect("non-empty board");
///
/// EngineBuilder::new()
///     .with_tps(120.0)
///     .with_world_bounds(board)
///     .with_title("Sweeper 10x10")
///     .with_click_timeout(Duration::from_millis(200))
///     .build()
///     .run();
/// ```
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    world: Bounds,
    title: String,
    gestures: GestureConfig,
}

impl EngineBuilder {
    const DEFAULT_WORLD: Bounds = Bounds::from_parts(0, 0, 480, 480);

    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            world: Self::DEFAULT_WORLD,
            title: "Minesweeper".to_string(),
            gestures: GestureConfig::default(),
        }
    }

    /// Sets the target ticks per second for the logic thread.
    ///
    /// Gesture timing is resolved once per tick, so the rate bounds how
    /// late a single click can be confirmed after its timeout.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the region covered by the spatial index.
    ///
    /// The window spans from the window origin to the region's bottom-right
    /// edge, so every point of the region is reachable by the cursor.
    /// Elements outside this region can be enrolled but never receive
    /// gestures.
    pub fn with_world_bounds(mut self, world: Bounds) -> Self {
        self.world = world;
        self
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets how long a released click waits for a second press.
    ///
    /// # Panics
    ///
    /// Panics if `timeout` is zero.
    pub fn with_click_timeout(mut self, timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "Click timeout must be non-zero");
        self.gestures.click_timeout = timeout;
        self
    }

    /// Sets how long a press must be held to become a long click.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is zero.
    pub fn with_long_press_threshold(mut self, threshold: Duration) -> Self {
        assert!(!threshold.is_zero(), "Long press threshold must be non-zero");
        self.gestures.long_press_threshold = threshold;
        self
    }

    /// Builds the engine instance.
    ///
    /// Call [`Engine::init`] to enrol elements and subscribe handlers
    /// before running.
    pub fn build(self) -> Engine {
        info!(
            "Building engine (TPS: {}, channel: {}, world: {}x{})",
            self.tps,
            self.channel_capacity,
            self.world.width(),
            self.world.height()
        );

        let systems = GlobalSystems::new(self.world, SystemClock, self.gestures);

        Engine {
            orchestrator: CoreSystemsOrchestrator::new(systems),
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            window: WindowConfig {
                title: self.title,
                width: window_extent(self.world.right()),
                height: window_extent(self.world.bottom()),
            },
        }
    }
}

/// Logical window size needed to reach an exclusive edge, at least 1.
fn window_extent(edge: i32) -> u32 {
    edge.max(1).unsigned_abs()
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Sweeper Engine runtime.
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Logic Thread @ TPS)
///   │     └─► InputSystem → MessageBus → handlers
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Pointer Input
///
/// Communication: bounded channel (PlatformEvent)
/// ```
///
/// # Examples
///
/// ```no_run
/// use sweeper_engine::prelude::*;
///
/// struct Cell {
///     id: ElementId,
///     bounds: Bounds,
/// }
///
/// impl Interactive for Cell {
///     fn id(&self) -> ElementId { self.id }
///     fn bounds(&self) -> Bounds { self.bounds }
/// }
///
/// EngineBuilder::new()
///     .build()
///     .init(|systems| {
///         let cell = Cell {
///             id: systems.ids.next(),
///             bounds: Bounds::new(0, 0, 30, 30).expect("cell size"),
///         };
///         systems
///             .input
///             .enrol_for(&cell, &[GestureKind::Click, GestureKind::LongClick]);
///         systems.bus.subscribe_many(
///             cell.id,
///             &[MessageKind::GameReset],
///             |message| println!("cell got {:?}", message),
///         );
///     })
///     .run();
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    channel_capacity: usize,
    window: WindowConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to [`GlobalSystems`] before the engine starts.
    ///
    /// Enrol interactive elements, subscribe their handlers and mint ids
    /// here. Handlers may keep clones of `systems.bus` and `systems.ids`.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut GlobalSystems),
    {
        info!("Initializing engine systems");

        self.orchestrator.init_systems(init_fn);

        info!("Engine initialization complete");
        self
    }

    //--- Execution --------------------------------------------------------

    /// Starts the engine runtime and blocks until the application exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates a bounded channel for platform → core communication
    /// 2. Spawns the logic thread running at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: `WindowClosed` reaches the core, which
    ///    broadcasts `Quit` and stops. On a `Quit` broadcast from game
    ///    logic: the core stops and the platform closes the window.
    ///
    /// Platform errors and a panicking core thread are logged, not
    /// propagated.
    pub fn run(self) {
        info!("Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);
        let running = Arc::new(AtomicBool::new(true));

        info!("Channel created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the core logic thread -------------------------------
        let core_handle = self
            .orchestrator
            .spawn_core_thread(rx, self.tps, Arc::clone(&running));
        info!("Core logic thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, running, self.window);
        info!("Platform initialized, entering event loop");

        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: Wait for logic thread to terminate --------------
        match core_handle.join() {
            Ok(()) => {
                info!("Core thread terminated cleanly");
            }
            Err(e) => {
                error!("Core thread panicked: {:?}", e);
            }
        }

        info!("Engine shutdown complete");
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
