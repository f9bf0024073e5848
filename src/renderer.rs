use crate::animator::{Animator, Scheduler};
use crate::chain::{Chain, Transition};
use crate::config::Scene;
use crate::gfx::canvas::{Canvas, Surface};
use crate::gfx::shapes::draw_indexed_shape;
use anyhow::Result;
use log::{debug, info};

/// Couples the shape chain with the animator that drives it.
pub struct Renderer<H> {
    scene: Scene,
    chain: Chain,
    animator: Animator<H>,
}

impl<H> Renderer<H> {
    pub fn new(scene: Scene) -> Self {
        let chain = Chain::new(scene.colors().len());
        let animator = Animator::new(scene.interval());
        Self { scene, chain, animator }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Clears to the background and draws the current shape.
    pub fn render(&self, canvas: &mut impl Canvas) {
        let size = canvas.size();
        canvas.set_fill_color(self.scene.background());
        canvas.fill_rect(0.0, 0.0, size.x, size.y);

        let node = self.chain.current();
        draw_indexed_shape(canvas, node.index(), node.state().scale(), &self.scene);
    }

    pub fn draw_frame<S: Surface>(&self, surface: &mut S) -> Result<()> {
        self.render(surface.begin_frame());
        surface.present()
    }

    /// Starts the current shape's transition and the ticker. A trigger that
    /// arrives mid-transition is ignored.
    pub fn handle_trigger<S>(&mut self, scheduler: &mut S) -> Result<Transition>
    where
        S: Scheduler<Handle = H>,
    {
        let transition = self.chain.start_updating();
        if transition == Transition::Started {
            info!(
                "shape {} started ({:?})",
                self.chain.current_index(),
                self.chain.current().state().motion()
            );
            self.animator.start(scheduler)?;
        }
        Ok(transition)
    }

    /// One animator tick: redraw, step the chain, and on completion stop
    /// ticking and redraw the final state.
    pub fn tick<S, F>(&mut self, scheduler: &mut S, surface: &mut F) -> Result<Transition>
    where
        S: Scheduler<Handle = H>,
        F: Surface,
    {
        if !self.animator.is_running() {
            return Ok(Transition::Idle);
        }

        self.draw_frame(surface)?;
        let transition = self.chain.update(self.scene.gap());
        if transition == Transition::Completed {
            self.animator.stop(scheduler);
            debug!(
                "transition complete, next shape {} ({:?})",
                self.chain.current_index(),
                self.chain.direction()
            );
            self.draw_frame(surface)?;
        }
        Ok(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::testing::ManualScheduler;
    use crate::chain::Direction;
    use crate::config::Config;
    use crate::gfx::canvas::testing::Recorder;
    use crate::gfx::math::Color;

    fn renderer(config: Config) -> Renderer<u32> {
        Renderer::new(config.scene().unwrap())
    }

    #[test]
    fn render_fills_background_first() {
        let renderer = renderer(Config::default());
        let mut surface = Recorder::new(200.0, 100.0);
        renderer.draw_frame(&mut surface).unwrap();

        assert_eq!(surface.frames, 1);
        assert_eq!(surface.fills.len(), 1);
        assert_eq!(surface.fills[0].color, Color::rgba(0xbd, 0xbd, 0xbd, 255));
        assert_eq!(surface.fills[0].size.x, 200.0);
        // Shape at rest has zero-length arms.
        assert!(surface.strokes.is_empty());
    }

    #[test]
    fn chain_has_one_node_per_color() {
        let mut config = Config::default();
        config.colors = vec!["#000000".to_string(), "#ffffff".to_string()];
        let renderer = renderer(config);
        assert_eq!(renderer.chain().len(), renderer.scene().colors().len());
        assert_eq!(renderer.chain().len(), 2);
    }

    #[test]
    fn tick_without_trigger_does_nothing() {
        let mut renderer = renderer(Config::default());
        let mut scheduler = ManualScheduler::default();
        let mut surface = Recorder::new(100.0, 100.0);

        assert_eq!(renderer.tick(&mut scheduler, &mut surface).unwrap(), Transition::Idle);
        assert_eq!(surface.frames, 0);
    }

    #[test]
    fn repeated_triggers_run_one_animation() {
        let mut renderer = renderer(Config::default());
        let mut scheduler = ManualScheduler::default();

        assert_eq!(renderer.handle_trigger(&mut scheduler).unwrap(), Transition::Started);
        assert_eq!(renderer.handle_trigger(&mut scheduler).unwrap(), Transition::Running);
        assert_eq!(scheduler.scheduled, 1);
        assert_eq!(scheduler.active[0].1, renderer.scene().interval());
    }

    #[test]
    fn one_trigger_runs_one_transition() {
        let mut config = Config::default();
        config.gap = Some(0.22);
        let mut renderer = renderer(config);
        let mut scheduler = ManualScheduler::default();
        let mut surface = Recorder::new(100.0, 100.0);

        renderer.handle_trigger(&mut scheduler).unwrap();

        let mut scales = Vec::new();
        let mut ticks = 0;
        loop {
            ticks += 1;
            let transition = renderer.tick(&mut scheduler, &mut surface).unwrap();
            if transition == Transition::Completed {
                break;
            }
            assert_eq!(transition, Transition::Running);
            scales.push(renderer.chain().current().state().scale());
        }

        // Four in-between values, strictly rising, then a single snap to 1.
        assert_eq!(scales.len(), 4);
        assert!(scales.windows(2).all(|w| w[0] < w[1]));
        assert!(scales.iter().all(|s| *s > 0.0 && *s < 1.0));
        assert_eq!(ticks, 5);

        // One frame per tick plus the final redraw.
        assert_eq!(surface.frames, ticks + 1);
        assert!(!renderer.is_animating());
        assert!(scheduler.active.is_empty());

        // The cursor moved on; the finished shape rests at 1.
        assert_eq!(renderer.chain().current_index(), 1);
        assert_eq!(renderer.chain().direction(), Direction::Forward);

        // Further ticks are ignored until the next trigger.
        assert_eq!(renderer.tick(&mut scheduler, &mut surface).unwrap(), Transition::Idle);
        assert_eq!(surface.frames, ticks + 1);
    }

    #[test]
    fn final_frame_shows_next_shape_at_rest() {
        let mut config = Config::default();
        config.gap = Some(0.5);
        config.variant = crate::config::Variant::Linear;
        let mut renderer = renderer(config);
        let mut scheduler = ManualScheduler::default();
        let mut surface = Recorder::new(100.0, 100.0);

        renderer.handle_trigger(&mut scheduler).unwrap();
        while renderer.tick(&mut scheduler, &mut surface).unwrap() != Transition::Completed {}

        // Next shape is at rest, so the last frame is background only.
        assert_eq!(surface.fills.len(), 1);
        assert!(surface.strokes.is_empty());
    }

    #[test]
    fn full_cycle_visits_every_shape_twice() {
        let mut config = Config::default();
        config.gap = Some(0.5);
        let mut renderer = renderer(config);
        let mut scheduler = ManualScheduler::default();
        let mut surface = Recorder::new(100.0, 100.0);

        let mut order = Vec::new();
        for _ in 0..10 {
            order.push(renderer.chain().current_index());
            renderer.handle_trigger(&mut scheduler).unwrap();
            while renderer.tick(&mut scheduler, &mut surface).unwrap() != Transition::Completed {}
        }
        assert_eq!(order, vec![0, 1, 2, 3, 4, 4, 3, 2, 1, 0]);
        assert_eq!(renderer.chain().direction(), Direction::Forward);
    }
}
