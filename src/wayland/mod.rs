pub mod egl;

use anglechain::app::UiEvent;
use anglechain::config::{Anchor, SurfaceConfig};
use anglechain::gfx::math::Vec2;
use log::{debug, info};
use wayland_client::{
    protocol::{wl_compositor, wl_output, wl_pointer, wl_registry, wl_seat, wl_surface},
    Connection, Dispatch, QueueHandle, WEnum,
};
use wayland_protocols_wlr::layer_shell::v1::client::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};

pub struct WaylandState {
    pub running: bool,
    pub configured: bool,
    pub compositor: Option<wl_compositor::WlCompositor>,
    pub layer_shell: Option<zwlr_layer_shell_v1::ZwlrLayerShellV1>,
    pub surface: Option<wl_surface::WlSurface>,
    pub layer_surface: Option<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1>,
    pub seat: Option<wl_seat::WlSeat>,
    pub pointer: Option<wl_pointer::WlPointer>,
    pub output: Option<wl_output::WlOutput>,
    pub output_size: Option<[u32; 2]>,
    /// Size from the first configure; later configures do not resize.
    pub size: Option<[u32; 2]>,
    pub pointer_pos: Vec2,
    pub pending_events: Vec<UiEvent>,
}

impl WaylandState {
    pub fn new() -> Self {
        Self {
            running: true,
            configured: false,
            compositor: None,
            layer_shell: None,
            surface: None,
            layer_surface: None,
            seat: None,
            pointer: None,
            output: None,
            output_size: None,
            size: None,
            pointer_pos: Vec2::default(),
            pending_events: Vec::new(),
        }
    }

    /// Creates the layer surface described by `config` and commits it so the
    /// compositor sends the first configure.
    pub fn create_surface(&mut self, config: &SurfaceConfig, qh: &QueueHandle<Self>) -> anyhow::Result<()> {
        let compositor = self
            .compositor
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("compositor does not offer wl_compositor"))?;
        let layer_shell = self
            .layer_shell
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("compositor does not offer zwlr_layer_shell_v1"))?;

        let surface = compositor.create_surface(qh, ());
        let layer_surface = layer_shell.get_layer_surface(
            &surface,
            None,
            zwlr_layer_shell_v1::Layer::Top,
            "anglechain".to_string(),
            qh,
            (),
        );
        place_layer_surface(&layer_surface, config);
        surface.commit();

        self.surface = Some(surface);
        self.layer_surface = Some(layer_surface);
        Ok(())
    }
}

fn anchor_bits(anchor: Anchor) -> zwlr_layer_surface_v1::Anchor {
    use zwlr_layer_surface_v1::Anchor as Edge;
    match anchor {
        Anchor::Center => Edge::empty(),
        Anchor::TopLeft => Edge::Top | Edge::Left,
        Anchor::TopRight => Edge::Top | Edge::Right,
        Anchor::BottomLeft => Edge::Bottom | Edge::Left,
        Anchor::BottomRight => Edge::Bottom | Edge::Right,
    }
}

/// Fixed-size surfaces sit at their anchor; without a size the surface is
/// stretched over the whole output.
fn place_layer_surface(layer_surface: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1, config: &SurfaceConfig) {
    use zwlr_layer_surface_v1::Anchor as Edge;
    match config.size {
        Some(size) => {
            layer_surface.set_anchor(anchor_bits(config.anchor));
            layer_surface.set_size(size.width, size.height);
            layer_surface.set_exclusive_zone(0);
        }
        None => {
            layer_surface.set_anchor(Edge::Top | Edge::Bottom | Edge::Left | Edge::Right);
            layer_surface.set_size(0, 0);
            layer_surface.set_exclusive_zone(-1);
        }
    }
    let m = config.margins;
    layer_surface.set_margin(m.top, m.right, m.bottom, m.left);
}

/// Outputs advertise every supported mode; only the one flagged current
/// describes the screen.
fn is_current_mode(flags: WEnum<wl_output::Mode>) -> bool {
    matches!(flags, WEnum::Value(mode) if mode.contains(wl_output::Mode::Current))
}

impl Dispatch<wl_registry::WlRegistry, ()> for WaylandState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global { name, interface, version } = event {
            match &interface[..] {
                "wl_compositor" => {
                    state.compositor = Some(registry.bind(name, version.min(4), qh, ()));
                }
                "zwlr_layer_shell_v1" => {
                    state.layer_shell = Some(registry.bind(name, version.min(1), qh, ()));
                }
                "wl_seat" => {
                    state.seat = Some(registry.bind(name, version.min(5), qh, ()));
                }
                "wl_output" if state.output.is_none() => {
                    state.output = Some(registry.bind(name, version.min(2), qh, ()));
                }
                _ => {}
            }
        }
    }
}

impl Dispatch<wl_compositor::WlCompositor, ()> for WaylandState {
    fn event(_: &mut Self, _: &wl_compositor::WlCompositor, _: wl_compositor::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<wl_surface::WlSurface, ()> for WaylandState {
    fn event(_: &mut Self, _: &wl_surface::WlSurface, _: wl_surface::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<wl_pointer::WlPointer, ()> for WaylandState {
    fn event(
        state: &mut Self,
        _: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_pointer::Event::Enter { surface_x, surface_y, .. } => {
                state.pointer_pos = Vec2::new(surface_x as f32, surface_y as f32);
                state.pending_events.push(UiEvent::PointerEnter { pos: state.pointer_pos });
            }
            wl_pointer::Event::Leave { .. } => {
                state.pending_events.push(UiEvent::PointerLeave);
            }
            wl_pointer::Event::Motion { surface_x, surface_y, .. } => {
                state.pointer_pos = Vec2::new(surface_x as f32, surface_y as f32);
            }
            wl_pointer::Event::Button { button, state: btn_state, .. } => {
                let ev = match btn_state {
                    WEnum::Value(wl_pointer::ButtonState::Pressed) => UiEvent::PointerDown { pos: state.pointer_pos, button },
                    WEnum::Value(wl_pointer::ButtonState::Released) => UiEvent::PointerUp,
                    _ => return,
                };
                state.pending_events.push(ev);
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for WaylandState {
    fn event(
        state: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_seat::Event::Capabilities { capabilities: WEnum::Value(caps) } = event {
            if caps.contains(wl_seat::Capability::Pointer) && state.pointer.is_none() {
                state.pointer = Some(seat.get_pointer(qh, ()));
            }
        }
    }
}

impl Dispatch<wl_output::WlOutput, ()> for WaylandState {
    fn event(
        state: &mut Self,
        _: &wl_output::WlOutput,
        event: wl_output::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_output::Event::Mode { flags, width, height, .. } = event {
            if is_current_mode(flags) {
                state.output_size = Some([width as u32, height as u32]);
            }
        }
    }
}

impl Dispatch<zwlr_layer_shell_v1::ZwlrLayerShellV1, ()> for WaylandState {
    fn event(_: &mut Self, _: &zwlr_layer_shell_v1::ZwlrLayerShellV1, _: zwlr_layer_shell_v1::Event, _: &(), _: &Connection, _: &QueueHandle<Self>) {}
}

impl Dispatch<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1, ()> for WaylandState {
    fn event(
        state: &mut Self,
        surface: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            zwlr_layer_surface_v1::Event::Configure { serial, width, height } => {
                debug!("Layer surface configure: {}x{} (serial {})", width, height, serial);
                surface.ack_configure(serial);
                if state.size.is_none() && width > 0 && height > 0 {
                    info!("Surface size fixed at {}x{}", width, height);
                    state.size = Some([width, height]);
                }
                state.configured = true;
            }
            zwlr_layer_surface_v1::Event::Closed => {
                state.pending_events.push(UiEvent::Closed);
                state.running = false;
            }
            _ => {}
        }
    }
}
