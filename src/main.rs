mod wayland;

use anglechain::animator::{LoopScheduler, TickQueue};
use anglechain::app::App;
use anglechain::config::Config;
use anglechain::gfx::canvas::Surface;
use anglechain::gfx::draw::DrawContext;
use anglechain::gfx::gl::solid_color_program;
use anyhow::{anyhow, Context, Result};
use calloop::EventLoop;
use log::{info, warn};
use std::io::ErrorKind;
use std::time::Duration;
use wayland::egl::EglContext;
use wayland::WaylandState;
use wayland_client::backend::WaylandError;
use wayland_client::protocol::wl_surface::WlSurface;
use wayland_client::{Connection, EventQueue, Proxy};

/// Longest wait for a timer before checking the Wayland socket again.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// The on-screen drawing surface. `draw` is declared first so GL objects are
/// released while the EGL context still exists.
struct Window {
    draw: DrawContext,
    egl: EglContext,
    surface: WlSurface,
}

impl Surface for Window {
    type Canvas = DrawContext;

    fn begin_frame(&mut self) -> &mut DrawContext {
        self.draw.begin();
        &mut self.draw
    }

    fn present(&mut self) -> Result<()> {
        self.draw.flush();
        self.egl.swap_buffers()?;
        self.surface.commit();
        Ok(())
    }
}

/// Reads whatever is waiting on the socket without blocking, then dispatches.
fn pump_wayland(event_queue: &mut EventQueue<WaylandState>, state: &mut WaylandState) -> Result<()> {
    event_queue.flush()?;
    if let Some(guard) = event_queue.prepare_read() {
        match guard.read() {
            Ok(_) => {}
            Err(WaylandError::Io(err)) if err.kind() == ErrorKind::WouldBlock => {}
            Err(err) => return Err(err.into()),
        }
    }
    event_queue.dispatch_pending(state)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    info!("Starting anglechain...");

    let config = Config::load().unwrap_or_else(|err| {
        warn!("Falling back to default config: {:#}", err);
        Config::default()
    });
    let scene = config.scene().context("invalid configuration")?;

    info!("Connecting to Wayland...");
    let conn = Connection::connect_to_env()?;
    let display = conn.display();
    let mut event_queue = conn.new_event_queue();
    let qh = event_queue.handle();
    let _registry = display.get_registry(&qh, ());

    let mut state = WaylandState::new();
    event_queue.roundtrip(&mut state)?;

    state.create_surface(&config.surface, &qh)?;
    while !state.configured {
        event_queue.blocking_dispatch(&mut state)?;
    }

    let size = config
        .surface
        .size
        .map(|s| [s.width, s.height])
        .or(state.size)
        .or(state.output_size)
        .ok_or_else(|| anyhow!("compositor did not report a surface size"))?;
    info!("Surface configured at {}x{}", size[0], size[1]);

    let surface = state
        .surface
        .clone()
        .ok_or_else(|| anyhow!("surface was not created"))?;

    info!("Initializing EGL...");
    let display_ptr = display.id().as_ptr() as *mut _;
    let egl = EglContext::new(display_ptr, &surface, size)?;
    let gl = unsafe { glow::Context::from_loader_function(|s| egl.get_proc_address(s)) };
    let program = solid_color_program(&gl)?;
    let draw = DrawContext::new(gl, program, [size[0] as f32, size[1] as f32])?;
    let mut window = Window { draw, egl, surface };

    let mut event_loop: EventLoop<'static, TickQueue> = EventLoop::try_new()?;
    let mut scheduler = LoopScheduler::new(event_loop.handle());
    let mut ticks = TickQueue::default();

    let mut app = App::new(scene);
    app.draw(&mut window)?;

    info!("Ready, tap to animate");
    while state.running && app.is_running() {
        pump_wayland(&mut event_queue, &mut state)?;
        for ev in state.pending_events.drain(..) {
            app.handle_event(ev, &mut scheduler)?;
        }

        event_loop.dispatch(Some(POLL_INTERVAL), &mut ticks)?;
        for _ in 0..ticks.take() {
            app.tick(&mut scheduler, &mut window)?;
        }
    }

    info!("Exiting");
    Ok(())
}
