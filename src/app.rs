use crate::animator::Scheduler;
use crate::chain::Transition;
use crate::config::Scene;
use crate::gfx::canvas::Surface;
use crate::gfx::math::Vec2;
use crate::renderer::Renderer;
use anyhow::Result;
use log::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    PointerEnter { pos: Vec2 },
    PointerLeave,
    PointerDown { pos: Vec2, button: u32 },
    PointerUp,
    Closed,
}

pub struct App<H> {
    pub renderer: Renderer<H>,
    running: bool,
}

impl<H> App<H> {
    pub fn new(scene: Scene) -> Self {
        Self {
            renderer: Renderer::new(scene),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn handle_event<S>(&mut self, event: UiEvent, scheduler: &mut S) -> Result<()>
    where
        S: Scheduler<Handle = H>,
    {
        match event {
            UiEvent::PointerDown { pos, button } => {
                debug!("Pointer down at ({}, {}), button {:#x}", pos.x, pos.y, button);
                if self.renderer.handle_trigger(scheduler)? == Transition::Running {
                    debug!("Ignoring trigger, shape still animating");
                }
            }
            UiEvent::Closed => {
                info!("Surface closed");
                self.running = false;
            }
            UiEvent::PointerEnter { .. } | UiEvent::PointerLeave | UiEvent::PointerUp => {}
        }
        Ok(())
    }

    pub fn tick<S, F>(&mut self, scheduler: &mut S, surface: &mut F) -> Result<Transition>
    where
        S: Scheduler<Handle = H>,
        F: Surface,
    {
        self.renderer.tick(scheduler, surface)
    }

    pub fn draw<F: Surface>(&self, surface: &mut F) -> Result<()> {
        self.renderer.draw_frame(surface)
    }
}
