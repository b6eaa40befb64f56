//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the engine's core thread.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  Core Systems        │
//  │   ↓                      │    │                      │
//  │  InputProcessor          │    │  InputSystem         │
//  │   ├─ Converts Winit      │    │   ├─ SpatialIndex    │
//  │   └─ Tracks cursor       │    │   └─ Gestures        │
//  │   ↓                      │    │  ↓                   │
//  │  InputBuffer             │    │  MessageBus          │
//  │   ├─ discrete: Vec<>     │    │  ↓                   │
//  │   └─ continuous: Set<>   │    │  Handlers            │
//  │   ↓                      │    └──────────────────────┘
//  │  RedrawRequested         │             ↑
//  │   ↓ (flush)              │             │
//  │  Crossbeam Channel ──────┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: all buffered input is sent as
//   one batch, preserving press/release order
// - **Positions in logical pixels**: the cursor is converted with the
//   window's scale factor so hit regions match the layout coordinates
// - **Graceful channel disconnect**: if the core thread dies, the platform
//   logs a warning and keeps running so the window can still be closed
// - **Core-initiated shutdown**: when the core stops (e.g. game logic
//   broadcast Quit), the platform notices the cleared `running` flag on the
//   next frame and exits the event loop
//
//=========================================================================

//=== Submodules ==========================================================
mod input_buffer;
mod input_processor;

//=== External Crates =====================================================
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== WindowConfig ========================================================

/// Window parameters chosen through the engine builder.
#[derive(Debug, Clone)]
pub(crate) struct WindowConfig {
    pub(crate) title: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

//=== Platform ============================================================

/// Window manager and input event aggregator.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and sends
/// batched events to the core thread.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(sender, ...)` initializes subsystems
/// 2. **Execution**: `platform.run()` starts the event loop
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: window closed → `WindowClosed` sent → loop exits; or
///    core stopped → `running` cleared → loop exits
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    /// Buffers discrete/continuous input until frame boundary.
    buffer: InputBuffer,

    /// Channel to send events to core thread.
    event_sender: Sender<PlatformEvent>,

    /// Converts Winit events to engine InputEvents.
    input_processor: InputProcessor,

    /// Cleared by the core thread when it stops.
    running: Arc<AtomicBool>,

    config: WindowConfig,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub(crate) fn new(
        event_sender: Sender<PlatformEvent>,
        running: Arc<AtomicBool>,
        config: WindowConfig,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");

        Self {
            window: None,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
            running,
            config,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window closes or the core stops.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Flushes buffered input events to the core thread.
    ///
    /// If the channel is disconnected (core thread exited), logs a warning
    /// and drops the events.
    fn flush_input_buffer(&mut self) {
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };

        let discrete_count = discrete.len();
        let continuous_count = continuous.len();

        trace!(
            target: "platform::input",
            "Flushing {} discrete + {} continuous events",
            discrete_count,
            continuous_count
        );

        if self
            .event_sender
            .send(PlatformEvent::Inputs { discrete, continuous })
            .is_err()
        {
            warn!(
                target: "platform::input",
                "Channel disconnected, dropping {} events ({} discrete, {} continuous)",
                discrete_count + continuous_count,
                discrete_count,
                continuous_count
            );
        }
    }

    fn core_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    //--- Test Accessors ---------------------------------------------------
    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.flush_input_buffer();
                let _ = self.event_sender.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, Window::scale_factor);
                let logical = position.to_logical::<f64>(scale);
                let event = self.input_processor.process_mouse_move(logical.x, logical.y);
                self.buffer.push_continuous(event);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                match self.input_processor.process_mouse_button(*button, *state) {
                    Some(event) => self.buffer.push_discrete(event),
                    None => trace!(target: "platform::input", "Unmapped button {:?} ignored", button),
                }
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: flush all buffered input
                self.flush_input_buffer();

                if !self.core_running() {
                    info!(target: "platform", "Core stopped, closing window");
                    event_loop.exit();
                    return;
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {
                // Ignore: Resized, Focused, keyboard, etc.
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
